//! Console manager
//!
//! Owns the fixed channel array and the "currently active" tab index,
//! routes incoming text to channel buffers, derives console geometry from
//! the viewport each frame, and exposes the read-only views the renderer
//! consumes: visible rows, the notify overlay, the tab strip, and the
//! open/close display fraction.

use serde::{Deserialize, Serialize};

use crate::buffer::{DEFAULT_VIS_PAGE, DEFAULT_WIDTH, MAX_WIDTH, TEXT_CAPACITY};
use crate::cell::Cell;
use crate::channel::{Channel, ChannelKind, TabState, MAX_CHANNELS};
use crate::config::{format_clock, ConsoleConfig};
use crate::error::{ConsoleError, Result};
use crate::notify::{notify_lines, NotifyLine};
use crate::route;

/// Unscaled glyph cell width of the console font, pixels
pub const CHAR_WIDTH: u32 = 8;

/// Unscaled glyph cell height of the console font, pixels
pub const CHAR_HEIGHT: u32 = 16;

// reference height the font scale is derived against
const REFERENCE_HEIGHT: u32 = 480;

/// Display surface geometry, polled each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// The console: channel buffers, routing, tabs, and geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Console {
    channels: Vec<Channel>,
    active: usize,
    config: ConsoleConfig,
    open: bool,
    font_factor: f32,
    field_width: usize,
    char_width: u32,
    char_height: u32,
    last_viewport: Option<Viewport>,
    applied_scale: Option<f32>,
}

impl Console {
    /// Create a console with the standard per-channel capacity
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_capacity(config, TEXT_CAPACITY)
    }

    /// Create a console with a custom per-channel cell capacity
    pub fn with_capacity(config: ConsoleConfig, capacity: usize) -> Self {
        let channels = ChannelKind::ALL_KINDS
            .iter()
            .map(|&kind| Channel::new(kind, capacity, true))
            .collect();

        Console {
            channels,
            active: ChannelKind::All.index(),
            config,
            open: false,
            font_factor: 1.0,
            field_width: DEFAULT_WIDTH,
            char_width: 0,
            char_height: 0,
            last_viewport: None,
            applied_scale: None,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConsoleConfig {
        &mut self.config
    }

    /// Extra font scaling applied on top of the configured scale
    pub fn set_font_factor(&mut self, factor: f32) {
        self.font_factor = factor;
    }

    // ------------------------------------------------------------------
    // printing

    /// Print untagged (system) text
    pub fn print(&mut self, text: &str, now_ms: u64) {
        self.print_tagged(None, text, now_ms);
    }

    /// Print text with a provenance tag
    ///
    /// The tag picks the destination channel (tell > team > chat, system
    /// otherwise); the message is mirrored into "all". A chat-family
    /// destination that is not the active tab gets its unseen flag set.
    pub fn print_tagged(&mut self, tag: Option<&str>, text: &str, now_ms: u64) {
        if self.config.noprint {
            return;
        }

        let (text, skip_notify) = route::strip_skip_notify(text);

        let kind = tag.map(route::classify).unwrap_or(ChannelKind::System);
        let idx = kind.index();

        if kind.is_chat_family() && idx != self.active {
            self.channels[idx].set_notify(true);
        }

        self.channels[idx].buffer.append(text, now_ms, skip_notify);
        if idx != ChannelKind::All.index() {
            let all = ChannelKind::All.index();
            self.channels[all].buffer.append(text, now_ms, skip_notify);
        }
    }

    // ------------------------------------------------------------------
    // geometry

    /// Re-derive console geometry if the viewport or font scale changed
    ///
    /// A repeated call with identical metrics is a no-op. Degenerate
    /// metrics are refused and the previous geometry kept.
    pub fn check_resize(&mut self, viewport: Viewport) -> Result<()> {
        let scale = self.config.scale();
        if self.last_viewport == Some(viewport) && self.applied_scale == Some(scale) {
            return Ok(());
        }

        if viewport.width == 0 {
            // video is not up yet; size lazily at the default width
            for channel in &mut self.channels {
                if !channel.buffer.is_sized() {
                    channel.buffer.init_size(DEFAULT_WIDTH, DEFAULT_VIS_PAGE);
                }
            }
            self.field_width = DEFAULT_WIDTH;
            self.last_viewport = Some(viewport);
            self.applied_scale = Some(scale);
            return Ok(());
        }

        // integer step against the reference height, then the configured
        // scale and font factor
        let scale_px =
            (viewport.height / REFERENCE_HEIGHT) as f32 * scale * self.font_factor;
        let char_w = (CHAR_WIDTH as f32 * scale_px) as i64;
        let char_h = (CHAR_HEIGHT as f32 * scale_px) as i64;

        let columns = if char_w > 0 {
            viewport.width as i64 / char_w - 2
        } else {
            0
        };
        let vis_page = if char_h > 0 {
            viewport.height as i64 / (char_h * 2) - 1
        } else {
            0
        };

        if columns <= 0 || vis_page <= 0 {
            tracing::warn!(
                "refusing console resize: {}x{} px at scale {} yields {} columns",
                viewport.width,
                viewport.height,
                scale,
                columns
            );
            return Err(ConsoleError::InvalidGeometry {
                viewport_width: viewport.width,
                viewport_height: viewport.height,
                columns,
            });
        }

        // the input field follows the uncapped column count
        self.field_width = columns as usize;
        let width = (columns as usize).min(MAX_WIDTH);

        self.char_width = char_w as u32;
        self.char_height = char_h as u32;
        self.last_viewport = Some(viewport);
        self.applied_scale = Some(scale);

        for channel in &mut self.channels {
            channel.buffer.resize(width, vis_page as usize);
        }

        Ok(())
    }

    /// Width of the input field in characters
    pub fn field_width(&self) -> usize {
        self.field_width
    }

    /// Scaled glyph cell size in pixels, (width, height)
    pub fn char_metrics(&self) -> (u32, u32) {
        (self.char_width, self.char_height)
    }

    // ------------------------------------------------------------------
    // open/close state

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Toggle the console, clearing the active channel's notify stamps
    pub fn toggle(&mut self) {
        self.clear_notify();
        self.open = !self.open;
    }

    /// Close immediately, skipping the slide animation
    pub fn close(&mut self) {
        self.clear_notify();
        self.open = false;
        let active = self.active;
        self.channels[active].snap_closed();
    }

    /// Advance the open/close slide animation by one frame
    pub fn run_frame(&mut self, dt_ms: f32) {
        let speed = self.config.console_speed;
        let open = self.open;
        for channel in &mut self.channels {
            channel.run_frame(speed, dt_ms, open);
        }
    }

    /// Fraction of the screen the active channel's console covers
    pub fn display_frac(&self) -> f32 {
        self.channels[self.active].display_frac()
    }

    // ------------------------------------------------------------------
    // tabs

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_channel(&self) -> &Channel {
        &self.channels[self.active]
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        &self.channels[kind.index()]
    }

    /// Enable or disable a channel's tab
    pub fn set_tab_active(&mut self, kind: ChannelKind, active: bool) {
        self.channels[kind.index()].set_active(active);
    }

    /// Switch to the next active tab, wrapping around
    pub fn next_tab(&mut self) {
        let n = self.channels.len();
        let mut index = self.active;
        for _ in 0..n {
            index = (index + 1) % n;
            if self.channels[index].is_active() {
                break;
            }
        }
        self.activate(index);
    }

    /// Switch to the previous active tab, wrapping around
    pub fn prev_tab(&mut self) {
        let n = self.channels.len();
        let mut index = self.active;
        for _ in 0..n {
            index = (index + n - 1) % n;
            if self.channels[index].is_active() {
                break;
            }
        }
        self.activate(index);
    }

    /// Switch directly to a tab; out-of-range indices are ignored
    pub fn switch_to_tab(&mut self, index: usize) {
        if index >= self.channels.len() {
            return;
        }
        self.activate(index);
    }

    fn activate(&mut self, index: usize) {
        self.active = index;
        self.channels[index].set_notify(false);
    }

    /// Tab strip state for the renderer
    pub fn tabs(&self) -> Vec<TabState> {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, channel)| TabState {
                name: channel.name(),
                accent: channel.kind().accent(),
                active: channel.is_active(),
                notify: channel.has_notify(),
                current: i == self.active,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // active-channel commands

    /// Clear the active channel's scrollback
    pub fn clear(&mut self) {
        self.channels[self.active].buffer.clear();
    }

    /// Drop the active channel's notify stamps
    pub fn clear_notify(&mut self) {
        self.channels[self.active].buffer.clear_notify();
    }

    pub fn page_up(&mut self, lines: Option<usize>) {
        self.channels[self.active].buffer.page_up(lines);
    }

    pub fn page_down(&mut self, lines: Option<usize>) {
        self.channels[self.active].buffer.page_down(lines);
    }

    pub fn scroll_top(&mut self) {
        self.channels[self.active].buffer.top();
    }

    pub fn scroll_bottom(&mut self) {
        self.channels[self.active].buffer.bottom();
    }

    // ------------------------------------------------------------------
    // render queries

    /// Visible rows of the active channel, oldest first
    pub fn visible_rows(&self, rows: usize) -> Vec<&[Cell]> {
        self.active_channel().buffer().visible_rows(rows)
    }

    /// Whether the active channel is scrolled away from the newest line
    pub fn is_backscrolled(&self) -> bool {
        !self.active_channel().buffer().is_at_bottom()
    }

    /// Notify overlay lines for the active channel
    pub fn notify_overlay(&self, now_ms: u64) -> Vec<NotifyLine<'_>> {
        notify_lines(
            self.active_channel().buffer(),
            now_ms,
            self.config.notify_time_ms(),
        )
    }

    /// Console header clock text for the given wall time
    pub fn clock_text(&self, hour: u32, minute: u32, second: u32) -> Option<String> {
        format_clock(self.config.clock, hour, minute, second)
    }

    /// Background override for the console surface, normalized RGBA
    pub fn background(&self) -> Option<[f32; 4]> {
        self.config.background()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

// keep the channel count honest against the kind table
const _: () = assert!(ChannelKind::ALL_KINDS.len() == MAX_CHANNELS);
