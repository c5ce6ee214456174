//! Channel identity and tab state
//!
//! A channel pairs a scrollback buffer with its tab identity: a fixed
//! kind, whether it participates in tab cycling, the unseen-message flag,
//! and the open/close slide animation the renderer reads each frame.

use serde::{Deserialize, Serialize};

use crate::buffer::ChannelBuffer;
use crate::color::ColorIndex;

/// Number of console channels
pub const MAX_CHANNELS: usize = 5;

/// Console display fraction when the console is open
pub const OPEN_FRAC: f32 = 0.5;

/// The fixed set of console channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Mirrors every message
    All = 0,
    /// Default destination for unclassified messages
    System = 1,
    Chat = 2,
    Team = 3,
    Tell = 4,
}

impl ChannelKind {
    pub const ALL_KINDS: [ChannelKind; MAX_CHANNELS] = [
        ChannelKind::All,
        ChannelKind::System,
        ChannelKind::Chat,
        ChannelKind::Team,
        ChannelKind::Tell,
    ];

    /// Tab label
    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::All => "all",
            ChannelKind::System => "sys",
            ChannelKind::Chat => "chat",
            ChannelKind::Team => "team",
            ChannelKind::Tell => "tell",
        }
    }

    /// Accent color for the tab label
    pub fn accent(self) -> ColorIndex {
        match self {
            ChannelKind::All => ColorIndex::new(1),
            ChannelKind::System => ColorIndex::new(8),
            ChannelKind::Chat => ColorIndex::new(2),
            ChannelKind::Team => ColorIndex::new(5),
            ChannelKind::Tell => ColorIndex::new(6),
        }
    }

    /// Chat-family channels are the only ones that raise the unseen flag
    pub fn is_chat_family(self) -> bool {
        matches!(
            self,
            ChannelKind::Chat | ChannelKind::Team | ChannelKind::Tell
        )
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One console channel: scrollback plus tab state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    kind: ChannelKind,
    pub(crate) buffer: ChannelBuffer,
    active: bool,
    notify: bool,
    display_frac: f32,
    final_frac: f32,
}

impl Channel {
    pub fn new(kind: ChannelKind, capacity: usize, active: bool) -> Self {
        Channel {
            kind,
            buffer: ChannelBuffer::with_capacity(capacity),
            active,
            notify: false,
            display_frac: 0.0,
            final_frac: 0.0,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn buffer(&self) -> &ChannelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut ChannelBuffer {
        &mut self.buffer
    }

    /// Whether this channel participates in tab cycling
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Unseen-message flag for tab highlighting
    pub fn has_notify(&self) -> bool {
        self.notify
    }

    pub(crate) fn set_notify(&mut self, notify: bool) {
        self.notify = notify;
    }

    /// Fraction of the screen the console currently covers
    pub fn display_frac(&self) -> f32 {
        self.display_frac
    }

    pub(crate) fn snap_closed(&mut self) {
        self.display_frac = 0.0;
        self.final_frac = 0.0;
    }

    /// Slide the console toward its open or closed height
    pub(crate) fn run_frame(&mut self, speed: f32, dt_ms: f32, open: bool) {
        self.final_frac = if open { OPEN_FRAC } else { 0.0 };

        if self.final_frac < self.display_frac {
            self.display_frac -= speed * dt_ms * 0.001;
            if self.final_frac > self.display_frac {
                self.display_frac = self.final_frac;
            }
        } else if self.final_frac > self.display_frac {
            self.display_frac += speed * dt_ms * 0.001;
            if self.final_frac < self.display_frac {
                self.display_frac = self.final_frac;
            }
        }
    }
}

/// Tab state handed to the renderer for the tab strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabState {
    pub name: &'static str,
    pub accent: ColorIndex,
    pub active: bool,
    pub notify: bool,
    /// This tab is the one currently rendered
    pub current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<&str> = ChannelKind::ALL_KINDS.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["all", "sys", "chat", "team", "tell"]);
    }

    #[test]
    fn test_kind_indices() {
        for (i, kind) in ChannelKind::ALL_KINDS.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_chat_family() {
        assert!(!ChannelKind::All.is_chat_family());
        assert!(!ChannelKind::System.is_chat_family());
        assert!(ChannelKind::Chat.is_chat_family());
        assert!(ChannelKind::Team.is_chat_family());
        assert!(ChannelKind::Tell.is_chat_family());
    }

    #[test]
    fn test_run_frame_opens_and_clamps() {
        let mut channel = Channel::new(ChannelKind::All, 100, true);
        channel.run_frame(3.0, 100.0, true);
        assert!(channel.display_frac() > 0.0);
        // a long frame overshoots and is clamped at the target
        channel.run_frame(3.0, 10_000.0, true);
        assert_eq!(channel.display_frac(), OPEN_FRAC);
        channel.run_frame(3.0, 10_000.0, false);
        assert_eq!(channel.display_frac(), 0.0);
    }

    #[test]
    fn test_snap_closed() {
        let mut channel = Channel::new(ChannelKind::All, 100, true);
        channel.run_frame(3.0, 50.0, true);
        channel.snap_closed();
        assert_eq!(channel.display_frac(), 0.0);
    }
}
