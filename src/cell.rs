//! Console cell representation
//!
//! A cell is one fixed-width storage unit in a channel's scrollback ring:
//! a character plus the color index that was current when it was printed.

use serde::{Deserialize, Serialize};

use crate::color::ColorIndex;

/// A single cell in a channel's scrollback buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character stored in this cell
    pub ch: char,
    /// Color index active when the character was printed
    pub color: ColorIndex,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            color: ColorIndex::WHITE,
        }
    }
}

impl Cell {
    /// Create a new cell with the given character and color
    pub fn new(ch: char, color: ColorIndex) -> Self {
        Cell { ch, color }
    }

    /// A blank cell (space in the default color)
    pub fn blank() -> Self {
        Cell::default()
    }

    /// Check if this cell is blank (a space, any color)
    ///
    /// The renderer skips blank cells, so a colored space is still blank.
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }

    /// Reset the cell to the blank state
    pub fn reset(&mut self) {
        *self = Cell::default();
    }
}
