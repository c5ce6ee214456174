//! Console runtime settings
//!
//! These are plain values owned by the embedding client's settings system;
//! the console only reads them. Setters exist for the two values that need
//! range clamping (font scale and background override) so a bad value can
//! never reach the geometry or render paths.

use serde::{Deserialize, Serialize};

/// Default notify line lifetime, seconds
pub const DEFAULT_NOTIFY_TIME: f32 = 3.0;

/// Default console open/close scroll speed
pub const DEFAULT_CONSOLE_SPEED: f32 = 3.0;

/// Default console font scale
pub const DEFAULT_SCALE: f32 = 0.8;

/// Allowed font scale range
pub const SCALE_RANGE: (f32, f32) = (0.5, 8.0);

/// Console clock display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockMode {
    Off,
    /// 24-hour clock, `HH:MM:SS`
    #[default]
    TwentyFourHour,
    /// 12-hour clock, `HH:MMAM` / `HH:MMPM`
    TwelveHour,
}

/// Runtime settings consumed by the console core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// How long a notify line stays on screen before fading, seconds
    pub notify_time: f32,
    /// Console open/close slide speed, fractions per second
    pub console_speed: f32,
    /// Clear the input field when the console closes
    pub autoclear: bool,
    /// Clock shown in the console header
    pub clock: ClockMode,
    /// Drop all console output (demo playback)
    pub noprint: bool,
    scale: f32,
    background: Option<[f32; 4]>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            notify_time: DEFAULT_NOTIFY_TIME,
            console_speed: DEFAULT_CONSOLE_SPEED,
            autoclear: true,
            clock: ClockMode::default(),
            noprint: false,
            scale: DEFAULT_SCALE,
            background: None,
        }
    }
}

impl ConsoleConfig {
    /// Console font scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the font scale, clamped to the allowed range
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(SCALE_RANGE.0, SCALE_RANGE.1);
    }

    /// Background color override, normalized RGBA
    pub fn background(&self) -> Option<[f32; 4]> {
        self.background
    }

    /// Set the background override from four 0-255 components
    pub fn set_background(&mut self, rgba: [u8; 4]) {
        self.background = Some([
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        ]);
    }

    /// Remove the background override
    pub fn clear_background(&mut self) {
        self.background = None;
    }

    /// Notify line lifetime in milliseconds
    pub fn notify_time_ms(&self) -> u64 {
        (self.notify_time * 1000.0) as u64
    }
}

/// Format the console header clock for the given wall time
///
/// Returns `None` when the clock is off. In the 12-hour form, hours
/// below 13 read as AM.
pub fn format_clock(mode: ClockMode, hour: u32, minute: u32, second: u32) -> Option<String> {
    match mode {
        ClockMode::Off => None,
        ClockMode::TwentyFourHour => Some(format!("{:02}:{:02}:{:02}", hour, minute, second)),
        ClockMode::TwelveHour => {
            let (hour, meridiem) = if hour < 13 {
                (hour, "AM")
            } else {
                (hour - 12, "PM")
            };
            Some(format!("{:02}:{:02}{}", hour, minute, meridiem))
        }
    }
}
