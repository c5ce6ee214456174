//! Per-channel scrollback buffer
//!
//! A `ChannelBuffer` owns a fixed-capacity ring of cells organized into
//! fixed-width lines. Line indices are logical: `current` grows forever
//! and maps to physical storage modulo `total_lines`, so physical offsets
//! are always re-derived and never stored. The buffer also owns the
//! line-feed/word-wrap state machine, the resize reflow, the scroll
//! position, and the small timestamp ring behind the notify overlay.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::color::{is_color_escape, ColorIndex, RAW_TOGGLE};

/// Cells per channel scrollback ring
pub const TEXT_CAPACITY: usize = 65536;

/// Notify timestamp slots; timestamps are meaningful only for the most
/// recent `NUM_NOTIFY_TIMES` lines
pub const NUM_NOTIFY_TIMES: usize = 8;

/// Console width used before any display geometry is known
pub const DEFAULT_WIDTH: usize = 78;

/// Maximum console width in cells
pub const MAX_WIDTH: usize = 120;

/// Visible page size used before any display geometry is known
pub const DEFAULT_VIS_PAGE: usize = 4;

/// Fixed-capacity scrollback ring for one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelBuffer {
    cells: Vec<Cell>,
    capacity: usize,
    /// Cells per logical line; 0 until the first sizing
    line_width: usize,
    /// Lines in the ring, recomputed with `line_width` on every resize
    total_lines: usize,
    /// Logical index of the line being written; never wraps
    current: i64,
    /// Column for the next character
    x: usize,
    /// Logical line shown at the bottom of the viewport
    display: i64,
    /// Rows that fit the viewport
    vis_page: usize,
    /// A line feed happened but the fresh line is not open yet
    pending_newline: bool,
    /// Creation time (ms) of the most recent lines, keyed by line mod
    /// `NUM_NOTIFY_TIMES`; 0 means no notify
    times: [u64; NUM_NOTIFY_TIMES],
    /// In-band raw-mode toggle state; consumed from the stream but
    /// otherwise unused here
    raw: bool,
}

impl ChannelBuffer {
    /// Create an unsized buffer with the standard capacity
    pub fn new() -> Self {
        Self::with_capacity(TEXT_CAPACITY)
    }

    /// Create an unsized buffer with a custom cell capacity
    pub fn with_capacity(capacity: usize) -> Self {
        ChannelBuffer {
            cells: vec![Cell::blank(); capacity],
            capacity,
            line_width: 0,
            total_lines: 0,
            current: 0,
            x: 0,
            display: 0,
            vis_page: 0,
            pending_newline: true,
            times: [0; NUM_NOTIFY_TIMES],
            raw: false,
        }
    }

    /// Whether the buffer has been given real line geometry yet
    pub fn is_sized(&self) -> bool {
        self.line_width > 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Logical index of the line currently being written
    pub fn current_line(&self) -> i64 {
        self.current
    }

    /// Logical line at the bottom of the viewport
    pub fn display_line(&self) -> i64 {
        self.display
    }

    pub fn cursor_x(&self) -> usize {
        self.x
    }

    pub fn vis_page(&self) -> usize {
        self.vis_page
    }

    /// Raw-mode toggle state accumulated from the stream
    pub fn raw_mode(&self) -> bool {
        self.raw
    }

    /// Lines holding real content: the whole ring once it has wrapped
    pub fn filled_lines(&self) -> usize {
        if self.current >= self.total_lines as i64 {
            self.total_lines
        } else {
            (self.current + 1) as usize
        }
    }

    pub fn is_at_bottom(&self) -> bool {
        self.display == self.current
    }

    /// First sizing: adopt geometry and start from a blank buffer
    pub fn init_size(&mut self, width: usize, vis_page: usize) {
        debug_assert!(width > 0 && width <= self.capacity);
        self.line_width = width;
        self.total_lines = self.capacity / width;
        self.vis_page = vis_page;
        self.clear();
    }

    /// Adopt new geometry, preserving as much recent content as fits
    ///
    /// A second call with identical geometry is a no-op. The first call
    /// ever falls back to a plain sizing since there is nothing to keep.
    pub fn resize(&mut self, width: usize, vis_page: usize) {
        if !self.is_sized() {
            self.init_size(width, vis_page);
            return;
        }
        if width == self.line_width && vis_page == self.vis_page {
            return;
        }
        self.reflow(width, vis_page);
    }

    fn reflow(&mut self, new_width: usize, new_vis_page: usize) {
        debug_assert!(new_width > 0 && new_width <= self.capacity);

        let old_width = self.line_width;
        let old_total = self.total_lines;
        let old_current = self.current;

        self.line_width = new_width;
        self.total_lines = self.capacity / new_width;
        self.vis_page = new_vis_page;

        let num_chars = old_width.min(new_width);
        let live = if old_current >= old_total as i64 {
            old_total
        } else {
            (old_current + 1) as usize
        };
        let num_lines = live.min(self.total_lines);

        // reflow through a scratch copy; memory use stays bounded by the
        // fixed capacity
        let scratch = self.cells.clone();
        for cell in &mut self.cells {
            cell.reset();
        }

        // newest old content lands on the newest new line
        for i in 0..num_lines {
            let src_row = (old_current - i as i64).rem_euclid(old_total as i64) as usize;
            let src = &scratch[src_row * old_width..src_row * old_width + num_chars];
            let dst_start = (num_lines - 1 - i) * self.line_width;
            self.cells[dst_start..dst_start + num_chars].copy_from_slice(src);
        }

        // positions changed, so the timestamps no longer mean anything
        self.clear_notify();

        self.current = num_lines as i64 - 1;
        self.display = self.current;
        self.x = self.x.min(self.line_width - 1);

        tracing::debug!(
            "console reflow {}x{} -> {}x{}, kept {} lines",
            old_width,
            old_total,
            self.line_width,
            self.total_lines,
            num_lines
        );
    }

    /// Reset to a blank buffer at the origin; geometry is kept
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        self.x = 0;
        self.current = 0;
        self.pending_newline = true;
        self.bottom();
    }

    /// Drop all notify timestamps
    pub fn clear_notify(&mut self) {
        self.times = [0; NUM_NOTIFY_TIMES];
    }

    /// Notify timestamp for a logical line (0 = none); meaningful only
    /// for the most recent `NUM_NOTIFY_TIMES` lines
    pub fn notify_stamp(&self, line: i64) -> u64 {
        self.times[line.rem_euclid(NUM_NOTIFY_TIMES as i64) as usize]
    }

    /// Append a decoded text stream at the write cursor
    ///
    /// Handles color escapes, the raw-mode toggle, `'\n'`, `'\r'`, hard
    /// wrap at the line width, and the greedy word-wrap lookahead. With
    /// `skip_notify` the affected lines are kept out of the notify
    /// overlay.
    pub fn append(&mut self, text: &str, now_ms: u64, skip_notify: bool) {
        if !self.is_sized() {
            self.init_size(DEFAULT_WIDTH, DEFAULT_VIS_PAGE);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut color = ColorIndex::WHITE;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if is_color_escape(c, chars.get(i + 1).copied()) {
                color = ColorIndex::from_escape(chars[i + 1]);
                i += 2;
                continue;
            }

            // measure the word starting here, capped at one line
            let mut l = 0;
            while l < self.line_width && i + l < chars.len() && chars[i + l] > ' ' {
                l += 1;
            }

            // break before a word that would overflow the line; a word as
            // wide as the line hard-wraps instead
            if l != self.line_width && self.x + l >= self.line_width {
                self.linefeed(now_ms, skip_notify);
            }

            i += 1;

            match c {
                RAW_TOGGLE => {
                    self.raw = !self.raw;
                }
                '\n' => {
                    self.linefeed(now_ms, skip_notify);
                }
                '\r' => {
                    self.x = 0;
                }
                _ => {
                    if self.pending_newline {
                        self.open_line();
                        self.fix_up();
                        self.pending_newline = false;
                    }
                    let row = self.current.rem_euclid(self.total_lines as i64) as usize;
                    self.cells[row * self.line_width + self.x] = Cell::new(c, color);
                    self.x += 1;
                    if self.x >= self.line_width {
                        self.linefeed(now_ms, skip_notify);
                    }
                }
            }
        }

        // stamp the still-open line for the notify overlay; a suppressed
        // print also retracts the previous slot
        let slot = self.current.rem_euclid(NUM_NOTIFY_TIMES as i64) as usize;
        if skip_notify {
            let prev = (slot + NUM_NOTIFY_TIMES - 1) % NUM_NOTIFY_TIMES;
            self.times[prev] = 0;
        } else {
            self.times[slot] = now_ms;
        }
    }

    /// Close the current line, deferring the fresh one until the next
    /// printable character
    fn linefeed(&mut self, now_ms: u64, skip_notify: bool) {
        let slot = self.current.rem_euclid(NUM_NOTIFY_TIMES as i64) as usize;
        self.times[slot] = if skip_notify { 0 } else { now_ms };

        if self.pending_newline {
            self.open_line();
        } else {
            self.pending_newline = true;
            self.x = 0;
        }

        self.fix_up();
    }

    /// Advance to a fresh physical line, cleared to blanks
    fn open_line(&mut self) {
        // follow the last line
        if self.display == self.current {
            self.display += 1;
        }
        self.current += 1;

        let row = self.current.rem_euclid(self.total_lines as i64) as usize;
        for cell in &mut self.cells[row * self.line_width..(row + 1) * self.line_width] {
            cell.reset();
        }

        self.x = 0;
    }

    /// Re-clamp the scroll position after any mutation
    pub fn fix_up(&mut self) {
        let filled = self.filled_lines() as i64;
        let vis_page = self.vis_page as i64;

        if filled <= vis_page {
            self.display = self.current;
        } else if self.current - self.display > filled - vis_page {
            self.display = self.current - filled + vis_page;
        } else if self.display > self.current {
            self.display = self.current;
        }
    }

    /// Scroll back by `lines`, default just under one page
    pub fn page_up(&mut self, lines: Option<usize>) {
        let n = lines.unwrap_or_else(|| self.vis_page.saturating_sub(2));
        self.display -= n as i64;
        self.fix_up();
    }

    /// Scroll forward by `lines`, default just under one page
    pub fn page_down(&mut self, lines: Option<usize>) {
        let n = lines.unwrap_or_else(|| self.vis_page.saturating_sub(2));
        self.display += n as i64;
        self.fix_up();
    }

    /// Scroll to the oldest retained line
    pub fn top(&mut self) {
        // generally out of range; fix_up pulls it back in
        self.display = self.current - self.total_lines as i64;
        self.fix_up();
    }

    /// Scroll to the newest line
    pub fn bottom(&mut self) {
        self.display = self.current;
        self.fix_up();
    }

    /// Cells of a retained logical line, or None when the line has
    /// wrapped out of the ring or never existed
    pub fn line_cells(&self, line: i64) -> Option<&[Cell]> {
        if !self.is_sized() || line < 0 || line > self.current {
            return None;
        }
        if self.current - line >= self.total_lines as i64 {
            return None;
        }
        Some(self.row_for(line))
    }

    /// Text of a retained logical line, trailing blanks trimmed
    pub fn line_text(&self, line: i64) -> String {
        match self.line_cells(line) {
            Some(cells) => {
                let s: String = cells.iter().map(|c| c.ch).collect();
                s.trim_end().to_string()
            }
            None => String::new(),
        }
    }

    /// Rows for the scrollback view ending at the display line, oldest
    /// first; rows scrolled out of retention are skipped
    pub fn visible_rows(&self, rows: usize) -> Vec<&[Cell]> {
        let mut out = Vec::new();
        if !self.is_sized() {
            return out;
        }
        for line in (self.display - rows as i64 + 1)..=self.display {
            if line < 0 || line > self.current {
                continue;
            }
            if self.current - line >= self.total_lines as i64 {
                // past the scrollback wrap point
                continue;
            }
            out.push(self.row_for(line));
        }
        out
    }

    /// All retained lines, oldest to newest
    pub fn iter_lines(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        let filled = self.filled_lines() as i64;
        let start = self.current + 1 - filled;
        (start..=self.current).map(move |line| self.row_for(line))
    }

    fn row_for(&self, line: i64) -> &[Cell] {
        let row = line.rem_euclid(self.total_lines as i64) as usize;
        &self.cells[row * self.line_width..(row + 1) * self.line_width]
    }
}

impl Default for ChannelBuffer {
    fn default() -> Self {
        Self::new()
    }
}
