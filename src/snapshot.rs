//! Channel snapshots and plain-text dumps
//!
//! Snapshots capture a channel's scrollback in a serializable form for
//! deterministic testing and automation. The dump helper externalizes the
//! retained lines as plain text; the caller owns the destination and its
//! failures.

use std::io;

use serde::{Deserialize, Serialize};

use crate::buffer::ChannelBuffer;
use crate::channel::Channel;

/// A snapshot of one channel's scrollback state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub name: String,
    pub line_width: usize,
    pub total_lines: usize,
    pub current: i64,
    pub display: i64,
    pub cursor_x: usize,
    pub at_bottom: bool,
    /// Retained lines oldest to newest, trailing blanks trimmed
    pub rows: Vec<String>,
}

impl ChannelSnapshot {
    pub fn from_channel(channel: &Channel) -> Self {
        let buffer = channel.buffer();
        ChannelSnapshot {
            name: channel.name().to_string(),
            line_width: buffer.line_width(),
            total_lines: buffer.total_lines(),
            current: buffer.current_line(),
            display: buffer.display_line(),
            cursor_x: buffer.cursor_x(),
            at_bottom: buffer.is_at_bottom(),
            rows: buffer
                .iter_lines()
                .map(|cells| {
                    let s: String = cells.iter().map(|c| c.ch).collect();
                    s.trim_end().to_string()
                })
                .collect(),
        }
    }

    /// The snapshot's text content, one line per row
    pub fn text(&self) -> String {
        self.rows.join("\n")
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Write every retained line of a channel, oldest first
///
/// Each line is emitted with trailing spaces trimmed and a terminating
/// newline, matching the console dump format. Errors come only from the
/// writer.
pub fn dump_lines<W: io::Write>(buffer: &ChannelBuffer, out: &mut W) -> io::Result<()> {
    for cells in buffer.iter_lines() {
        let line: String = cells.iter().map(|c| c.ch).collect();
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelKind;

    fn channel_with(text: &str) -> Channel {
        let mut channel = Channel::new(ChannelKind::System, 200, true);
        channel.buffer_mut().init_size(10, 4);
        channel.buffer_mut().append(text, 100, false);
        channel
    }

    #[test]
    fn test_snapshot_rows() {
        let channel = channel_with("alpha\nbeta\n");
        let snapshot = ChannelSnapshot::from_channel(&channel);
        assert_eq!(snapshot.name, "sys");
        assert_eq!(snapshot.rows.last().unwrap(), "beta");
        assert!(snapshot.at_bottom);
        assert!(snapshot.text().contains("alpha"));
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let channel = channel_with("alpha\nbeta\n");
        let snapshot = ChannelSnapshot::from_channel(&channel);
        let restored = ChannelSnapshot::from_json(&snapshot.to_json()).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_dump_trims_and_terminates() {
        let channel = channel_with("hi\n");
        let mut out = Vec::new();
        dump_lines(channel.buffer(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // the blank origin line dumps as an empty line
        assert_eq!(text, "\nhi\n");
    }

    #[test]
    fn test_dump_wrapped_buffer_keeps_newest() {
        let mut channel = Channel::new(ChannelKind::System, 50, true);
        channel.buffer_mut().init_size(10, 4);
        for i in 0..12 {
            channel.buffer_mut().append(&format!("line{:02}\n", i), 100, false);
        }
        let mut out = Vec::new();
        dump_lines(channel.buffer(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), channel.buffer().total_lines());
        assert_eq!(*lines.last().unwrap(), "line11");
    }
}
