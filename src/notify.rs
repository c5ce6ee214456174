//! Notify overlay computation
//!
//! The last few printed lines are shown transparently over the game view
//! while the console is closed. Each line lives for the configured notify
//! time plus two fade intervals; across the final stretch its alpha ramps
//! to zero and its row height collapses. This is a pure read model: the
//! renderer calls it fresh each frame and nothing here mutates state.

use crate::buffer::{ChannelBuffer, NUM_NOTIFY_TIMES};
use crate::cell::Cell;

/// Time a notify line takes to fade away, milliseconds
pub const NOTIFY_FADE_TIME_MS: u64 = 250;

/// One line of the notify overlay
#[derive(Debug, Clone)]
pub struct NotifyLine<'a> {
    /// Logical line index in the channel buffer
    pub line: i64,
    pub cells: &'a [Cell],
    /// Opacity, 1.0 fresh to 0.0 gone
    pub alpha: f32,
    /// Row height fraction for the collapse animation
    pub height_frac: f32,
}

/// Overlay lines for a channel at the given time
///
/// Walks the most recent timestamp slots; lines with a zero stamp
/// (suppressed or cleared) never appear.
pub fn notify_lines(buffer: &ChannelBuffer, now_ms: u64, notify_time_ms: u64) -> Vec<NotifyLine<'_>> {
    let mut out = Vec::new();
    let window = notify_time_ms + 2 * NOTIFY_FADE_TIME_MS;
    let current = buffer.current_line();

    for line in (current - NUM_NOTIFY_TIMES as i64 + 1)..=current {
        if line < 0 {
            continue;
        }
        let stamp = buffer.notify_stamp(line);
        if stamp == 0 || now_ms < stamp {
            continue;
        }
        let elapsed = now_ms - stamp;
        if elapsed >= window {
            continue;
        }

        let remaining = window - elapsed;
        let fade = if remaining < 2 * NOTIFY_FADE_TIME_MS {
            remaining as f32 / NOTIFY_FADE_TIME_MS as f32
        } else {
            2.0
        };

        let cells = match buffer.line_cells(line) {
            Some(cells) => cells,
            None => continue,
        };

        out.push(NotifyLine {
            line,
            cells,
            alpha: (fade - 1.0).clamp(0.0, 1.0),
            height_frac: fade.min(1.0),
        });
    }

    out
}
