//! Message provenance classification
//!
//! Incoming text carries an origin tag (the server command that produced
//! it). Tags are classified by prefix, most specific first: tell beats
//! team beats chat, and anything unrecognized lands in the system
//! channel. A message is never dropped for failing to classify.

use crate::channel::ChannelKind;

/// Marker found inside a chat command that carries a private message
pub const PRIVATE_MESSAGE_MARK: char = '\u{19}';

/// Leading marker that keeps a message out of the notify overlay
pub const SKIP_NOTIFY_PREFIX: &str = "[skipnotify]";

/// Classify an origin tag into its destination channel
pub fn classify(tag: &str) -> ChannelKind {
    if tag.starts_with("tell") || is_private_chat(tag) {
        ChannelKind::Tell
    } else if tag.starts_with("tchat") {
        ChannelKind::Team
    } else if tag.starts_with("chat") {
        ChannelKind::Chat
    } else {
        ChannelKind::System
    }
}

// a chat command whose quoted payload opens with the private-message mark
fn is_private_chat(tag: &str) -> bool {
    let mut prefix = String::from("chat \"");
    prefix.push(PRIVATE_MESSAGE_MARK);
    tag.starts_with(&prefix)
}

/// Strip the skip-notify marker, returning the remaining text and
/// whether it was present
pub fn strip_skip_notify(text: &str) -> (&str, bool) {
    match text.strip_prefix(SKIP_NOTIFY_PREFIX) {
        Some(rest) => (rest, true),
        None => (text, false),
    }
}
