//! Conch: multi-channel scrollback console core
//!
//! This crate provides the platform-independent console core of a game
//! client:
//! - Fixed-capacity ring-buffered scrollback with stable logical line
//!   indices
//! - Line-feed/word-wrap engine with inline color escapes
//! - Width-preserving reflow when the display geometry changes
//! - Independent channels ("tabs") with provenance routing
//! - Transient notify overlay with fade-out timing
//!
//! This crate has NO rendering or I/O dependencies and can be driven
//! headlessly for testing; the renderer, input editor, and command
//! dispatcher are external collaborators.

pub mod buffer;
pub mod cell;
pub mod channel;
pub mod color;
pub mod config;
pub mod console;
pub mod error;
pub mod notify;
pub mod route;
pub mod snapshot;

pub use buffer::{ChannelBuffer, NUM_NOTIFY_TIMES, TEXT_CAPACITY};
pub use cell::Cell;
pub use channel::{Channel, ChannelKind, TabState, MAX_CHANNELS};
pub use color::{color_table, ColorIndex, COLOR_ESCAPE, NUM_COLORS};
pub use config::{format_clock, ClockMode, ConsoleConfig};
pub use console::{Console, Viewport};
pub use error::{ConsoleError, Result};
pub use notify::{NotifyLine, NOTIFY_FADE_TIME_MS};
pub use snapshot::{dump_lines, ChannelSnapshot};
