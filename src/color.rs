//! Console color handling
//!
//! Text streams carry inline two-character color escapes: a `'^'` sentinel
//! followed by a selector character. The selector maps into a 64-entry
//! palette; the resulting index tags every cell printed until the next
//! escape. The escape is re-evaluated per character because color state
//! persists across emitted cells.

use serde::{Deserialize, Serialize};

/// Sentinel byte that starts a color escape sequence
pub const COLOR_ESCAPE: char = '^';

/// In-band byte that toggles raw mode; consumed without emitting a cell
pub const RAW_TOGGLE: char = '\u{1}';

/// Number of distinct color indices (6 bits)
pub const NUM_COLORS: usize = 64;

/// A 6-bit index into the console color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorIndex(u8);

impl ColorIndex {
    pub const BLACK: ColorIndex = ColorIndex(0);
    pub const RED: ColorIndex = ColorIndex(1);
    pub const GREEN: ColorIndex = ColorIndex(2);
    pub const YELLOW: ColorIndex = ColorIndex(3);
    pub const BLUE: ColorIndex = ColorIndex(4);
    pub const CYAN: ColorIndex = ColorIndex(5);
    pub const MAGENTA: ColorIndex = ColorIndex(6);
    pub const WHITE: ColorIndex = ColorIndex(7);

    /// Create an index, masked into the 6-bit range
    pub const fn new(index: u8) -> Self {
        ColorIndex(index & 63)
    }

    /// Map an escape selector character to its color index
    ///
    /// Selectors are offset from `'0'`, so `"^1"` is red and `"^7"` is
    /// white; anything else wraps into the 6-bit range.
    pub fn from_escape(selector: char) -> Self {
        ColorIndex((selector as u32).wrapping_sub('0' as u32) as u8 & 63)
    }

    /// The palette slot for this index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for ColorIndex {
    fn default() -> Self {
        ColorIndex::WHITE
    }
}

/// Check for a color escape at the current stream position
///
/// A `'^'` introduces an escape only when a selector follows and the
/// selector is neither another `'^'` nor a line terminator; otherwise the
/// caret passes through as a printable character.
pub fn is_color_escape(c: char, next: Option<char>) -> bool {
    c == COLOR_ESCAPE && matches!(next, Some(n) if n != COLOR_ESCAPE && n != '\n')
}

/// RGBA color, components in 0.0..=1.0
pub type Rgba = [f32; 4];

/// Render palette for the 64 color indices
///
/// Slots 0-7 are the classic console colors. The remaining slots are a
/// generated ramp: seven hues at eight brightness steps, darkest last.
pub fn color_table() -> [Rgba; NUM_COLORS] {
    let mut table = [[0.0, 0.0, 0.0, 1.0]; NUM_COLORS];

    table[0] = [0.0, 0.0, 0.0, 1.0]; // black
    table[1] = [1.0, 0.0, 0.0, 1.0]; // red
    table[2] = [0.0, 1.0, 0.0, 1.0]; // green
    table[3] = [1.0, 1.0, 0.0, 1.0]; // yellow
    table[4] = [0.0, 0.0, 1.0, 1.0]; // blue
    table[5] = [0.0, 1.0, 1.0, 1.0]; // cyan
    table[6] = [1.0, 0.0, 1.0, 1.0]; // magenta
    table[7] = [1.0, 1.0, 1.0, 1.0]; // white

    // hue ramp for the extended slots (8-63)
    let hues: [[f32; 3]; 7] = [
        [1.0, 0.5, 0.0], // orange
        [0.5, 1.0, 0.0], // lime
        [0.0, 1.0, 0.5], // spring
        [0.0, 0.5, 1.0], // azure
        [0.5, 0.0, 1.0], // violet
        [1.0, 0.0, 0.5], // rose
        [0.7, 0.7, 0.7], // gray
    ];
    for (i, slot) in (8..NUM_COLORS).enumerate() {
        let hue = hues[i % hues.len()];
        let level = 1.0 - 0.1 * (i / hues.len()) as f32;
        table[slot] = [hue[0] * level, hue[1] * level, hue[2] * level, 1.0];
    }

    table
}
