//! Terminal state management
//!
//! This module defines the cell grid, cursor, margins, modes and attributes
//! that dispatch handlers and text insertion mutate.

use std::fmt;

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

use crate::grapheme;

/// Titles and icon names longer than this are truncated
pub const MAX_TITLE_LEN: usize = 1024;

const VS16: char = '\u{FE0F}';

/// Terminal state holding all screen data
#[derive(Clone, Debug, PartialEq)]
pub struct TerminalState {
    pub cols: u16,
    pub rows: u16,
    pub screen: ScreenBuffer,
    pub cursor: CursorState,
    pub current_attrs: CellAttrs,
    pub modes: Modes,
    /// Modes restored by the reset handlers
    pub baseline_modes: Modes,
    pub title: String,
    pub icon_name: String,
    /// Scroll region (top, bottom) - 0-indexed, inclusive
    pub scroll_region: (u16, u16),
    /// Cell written by the last inserted character, while it may still grow
    last_cell: Option<(u16, u16)>,
}

impl TerminalState {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            screen: ScreenBuffer::new(cols, rows),
            cursor: CursorState::default(),
            current_attrs: CellAttrs::default(),
            modes: Modes::baseline(true),
            baseline_modes: Modes::baseline(true),
            title: String::new(),
            icon_name: String::new(),
            scroll_region: (0, rows - 1),
            last_cell: None,
        }
    }

    /// Replace the reset baseline and apply it immediately.
    pub fn set_baseline_modes(&mut self, modes: Modes) {
        self.baseline_modes = modes;
        self.modes = modes;
    }

    /// Resize the terminal
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let cols = cols.max(1);
        let rows = rows.max(1);
        self.cols = cols;
        self.rows = rows;
        self.screen.resize(cols, rows);
        self.scroll_region = (0, rows - 1);
        self.last_cell = None;

        self.cursor.col = self.cursor.col.min(cols - 1);
        self.cursor.row = self.cursor.row.min(rows - 1);
    }

    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.screen
            .rows
            .get(row as usize)
            .and_then(|r| r.cells.get(col as usize))
    }

    /// Stop growing the last written cell. Called whenever a control
    /// sequence intervenes between two characters.
    pub fn break_cluster(&mut self) {
        self.last_cell = None;
    }

    /// Insert a run of printable text
    pub fn put_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.put_char(ch);
        }
    }

    /// Put a character at the current cursor position
    pub fn put_char(&mut self, ch: char) {
        if self.extend_emoji(ch) {
            return;
        }

        let width = (ch.width().unwrap_or(0) as u16).min(self.cols);
        if width == 0 {
            // Combining character - append to previous cell
            self.append_to_previous_cell(ch);
            return;
        }

        // Wrap when the character does not fit on the rest of the line
        if self.cursor.col >= self.cols || self.cursor.col + width > self.cols {
            if self.modes.contains(Modes::AUTO_WRAP) {
                self.screen.rows[self.cursor.row as usize].wrapped = true;
                self.cursor.col = 0;
                self.linefeed();
            } else {
                self.cursor.col = self.cols.saturating_sub(width);
            }
        }

        let (row, col) = (self.cursor.row as usize, self.cursor.col as usize);

        if self.modes.contains(Modes::INSERT) {
            self.insert_chars(width);
        }

        self.handle_wide_char_overwrite(row, col);
        if width == 2 {
            self.clear_right_neighbor(row, col);
        }

        let attrs = self.current_attrs;
        let cols = self.cols as usize;
        let cells = &mut self.screen.rows[row].cells;

        cells[col] = Cell {
            content: CellContent::new(ch),
            width: width as u8,
            attrs,
        };

        // For wide characters, mark next cell as continuation (only if it fits)
        if width == 2 && col + 1 < cols {
            cells[col + 1] = Cell::continuation(&attrs);
        }

        self.last_cell = Some((row as u16, col as u16));
        self.cursor.col += width;
    }

    /// Grow the last written cell when `ch` continues a known emoji sequence.
    fn extend_emoji(&mut self, ch: char) -> bool {
        let Some((row, col)) = self.last_cell else {
            return false;
        };
        let (r, c) = (row as usize, col as usize);
        let cell = &mut self.screen.rows[r].cells[c];

        if cell.content.is_empty() || !grapheme::extends(cell.content.as_slice(), ch) {
            return false;
        }
        if !cell.content.push(ch) {
            return false;
        }

        // Emoji presentation selector turns a narrow symbol into a wide one
        if ch == VS16 && cell.width == 1 && c + 1 < self.cols as usize {
            cell.width = 2;
            let attrs = cell.attrs;
            self.clear_right_neighbor(r, c);
            self.screen.rows[r].cells[c + 1] = Cell::continuation(&attrs);
            if self.cursor.row == row && self.cursor.col == col + 1 {
                self.cursor.col += 1;
            }
        }
        true
    }

    fn append_to_previous_cell(&mut self, ch: char) {
        let target = match self.last_cell {
            Some(pos) => Some(pos),
            None => {
                let (row, mut col) = (self.cursor.row, self.cursor.col.min(self.cols));
                // Skip back over the right half of a wide character
                let cells = &self.screen.rows[row as usize].cells;
                while col > 0 && cells[col as usize - 1].is_continuation() {
                    col -= 1;
                }
                col.checked_sub(1).map(|c| (row, c))
            }
        };

        if let Some((row, col)) = target {
            // Overlong clusters drop the extra codepoints
            let _ = self.screen.rows[row as usize].cells[col as usize].content.push(ch);
        }
    }

    fn handle_wide_char_overwrite(&mut self, row: usize, col: usize) {
        let attrs = self.current_attrs;
        let cols = self.cols as usize;
        let cells = &mut self.screen.rows[row].cells;

        // Overwriting the right half of a wide char
        if col > 0 && cells[col].is_continuation() {
            cells[col - 1].clear(&attrs);
        }

        // Overwriting the left half of a wide char
        if cells[col].width == 2 && col + 1 < cols {
            cells[col + 1].clear(&attrs);
        }
    }

    /// A wide character also covers `col + 1`; free whatever was there.
    fn clear_right_neighbor(&mut self, row: usize, col: usize) {
        let attrs = self.current_attrs;
        let cols = self.cols as usize;
        let cells = &mut self.screen.rows[row].cells;
        if col + 2 < cols && cells[col + 1].width == 2 {
            cells[col + 2].clear(&attrs);
        }
    }

    /// Carriage return - move cursor to column 0
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    /// Line feed - move cursor down, scroll if needed
    pub fn linefeed(&mut self) {
        let scroll_bottom = self.scroll_region.1;

        if self.cursor.row == scroll_bottom {
            self.scroll_up(1);
        } else if self.cursor.row < self.rows - 1 {
            self.cursor.row += 1;
        }
    }

    /// Index - cursor down, scroll if at bottom
    pub fn index(&mut self) {
        self.linefeed();
    }

    /// Next line - CR + LF
    pub fn next_line(&mut self) {
        self.carriage_return();
        self.linefeed();
    }

    /// Reverse index - cursor up, scroll if at top
    pub fn reverse_index(&mut self) {
        if self.cursor.row == self.scroll_region.0 {
            self.scroll_down(1);
        } else {
            self.cursor_up(1);
        }
    }

    /// Backspace - move cursor left
    pub fn backspace(&mut self) {
        self.cursor.col = self.cursor.col.min(self.cols - 1).saturating_sub(1);
    }

    /// Horizontal tab
    pub fn horizontal_tab(&mut self) {
        // Move to next tab stop (every 8 columns)
        let next = ((self.cursor.col / 8) + 1) * 8;
        self.cursor.col = next.min(self.cols - 1);
    }

    /// Scroll the region up by n lines
    pub fn scroll_up(&mut self, n: u16) {
        let (top, bottom) = self.scroll_region;
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.screen.rows.remove(top as usize);
            self.screen.rows.insert(bottom as usize, Row::new(self.cols));
        }
    }

    /// Scroll the region down by n lines
    pub fn scroll_down(&mut self, n: u16) {
        let (top, bottom) = self.scroll_region;
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.screen.rows.remove(bottom as usize);
            self.screen.rows.insert(top as usize, Row::new(self.cols));
        }
    }

    /// Rows the cursor may move between: the scroll region in origin mode,
    /// the whole page otherwise.
    fn vertical_bounds(&self) -> (u16, u16) {
        if self.modes.contains(Modes::ORIGIN) {
            self.scroll_region
        } else {
            (0, self.rows - 1)
        }
    }

    /// Cursor up
    pub fn cursor_up(&mut self, n: u16) {
        // Stop at the top margin when starting inside the region
        let top = if self.cursor.row >= self.scroll_region.0 {
            self.scroll_region.0
        } else {
            0
        };
        self.cursor.row = self.cursor.row.saturating_sub(n).max(top);
    }

    /// Cursor down
    pub fn cursor_down(&mut self, n: u16) {
        let bottom = if self.cursor.row <= self.scroll_region.1 {
            self.scroll_region.1
        } else {
            self.rows - 1
        };
        self.cursor.row = self.cursor.row.saturating_add(n).min(bottom);
    }

    /// Cursor forward (right)
    pub fn cursor_forward(&mut self, n: u16) {
        self.cursor.col = self.cursor.col.saturating_add(n).min(self.cols - 1);
    }

    /// Cursor backward (left)
    pub fn cursor_backward(&mut self, n: u16) {
        self.cursor.col = self.cursor.col.min(self.cols - 1).saturating_sub(n);
    }

    /// Set cursor position (1-indexed parameters, relative to the scroll
    /// region in origin mode)
    pub fn cursor_position(&mut self, row: u16, col: u16) {
        self.set_row(row);
        self.set_column(col);
    }

    /// Absolute column (1-indexed)
    pub fn set_column(&mut self, col: u16) {
        self.cursor.col = col.saturating_sub(1).min(self.cols - 1);
    }

    /// Absolute row (1-indexed)
    pub fn set_row(&mut self, row: u16) {
        let (top, bottom) = self.vertical_bounds();
        self.cursor.row = top.saturating_add(row.saturating_sub(1)).min(bottom);
    }

    /// Move to the home position
    pub fn home(&mut self) {
        self.cursor.row = self.vertical_bounds().0;
        self.cursor.col = 0;
    }

    /// Cursor position as reported by CPR: 1-indexed, origin-relative.
    pub fn report_position(&self) -> (u16, u16) {
        let top = self.vertical_bounds().0;
        (
            self.cursor.row.saturating_sub(top) + 1,
            self.cursor.col.min(self.cols - 1) + 1,
        )
    }

    /// Erase in display
    pub fn erase_in_display(&mut self, mode: u16) {
        let attrs = self.current_attrs;
        let cursor_row = self.cursor.row as usize;
        match mode {
            0 => {
                // From cursor to end
                self.erase_in_line(0);
                for row in &mut self.screen.rows[cursor_row + 1..] {
                    row.clear(&attrs);
                }
            }
            1 => {
                // From start to cursor
                for row in &mut self.screen.rows[..cursor_row] {
                    row.clear(&attrs);
                }
                self.erase_in_line(1);
            }
            2 | 3 => {
                // Entire screen
                for row in &mut self.screen.rows {
                    row.clear(&attrs);
                }
            }
            _ => {}
        }
    }

    /// Erase in line
    pub fn erase_in_line(&mut self, mode: u16) {
        let attrs = self.current_attrs;
        let col = (self.cursor.col as usize).min(self.cols as usize - 1);
        let row = &mut self.screen.rows[self.cursor.row as usize];

        match mode {
            0 => row.cells[col..].iter_mut().for_each(|c| c.clear(&attrs)),
            1 => row.cells[..=col].iter_mut().for_each(|c| c.clear(&attrs)),
            2 => row.clear(&attrs),
            _ => {}
        }
    }

    /// Insert lines at cursor position, inside the scroll region
    pub fn insert_lines(&mut self, n: u16) {
        let (top, bottom) = self.scroll_region;
        let row = self.cursor.row;
        if row < top || row > bottom {
            return;
        }
        for _ in 0..n.min(bottom - row + 1) {
            self.screen.rows.remove(bottom as usize);
            self.screen.rows.insert(row as usize, Row::new(self.cols));
        }
        self.cursor.col = 0;
    }

    /// Delete lines at cursor position, inside the scroll region
    pub fn delete_lines(&mut self, n: u16) {
        let (top, bottom) = self.scroll_region;
        let row = self.cursor.row;
        if row < top || row > bottom {
            return;
        }
        for _ in 0..n.min(bottom - row + 1) {
            self.screen.rows.remove(row as usize);
            self.screen.rows.insert(bottom as usize, Row::new(self.cols));
        }
        self.cursor.col = 0;
    }

    /// Insert blank cells at the cursor, shifting the rest of the line right
    pub fn insert_chars(&mut self, n: u16) {
        let cols = self.cols as usize;
        let col = (self.cursor.col as usize).min(cols - 1);
        let n = (n as usize).min(cols - col);
        let attrs = self.current_attrs;
        let cells = &mut self.screen.rows[self.cursor.row as usize].cells;

        cells.truncate(cols - n);
        let blank = Cell::blank(&attrs);
        cells.splice(col..col, std::iter::repeat(blank).take(n));
    }

    /// Delete cells at the cursor, shifting the rest of the line left
    pub fn delete_chars(&mut self, n: u16) {
        let cols = self.cols as usize;
        let col = (self.cursor.col as usize).min(cols - 1);
        let n = (n as usize).min(cols - col);
        let attrs = self.current_attrs;
        let cells = &mut self.screen.rows[self.cursor.row as usize].cells;

        cells.drain(col..col + n);
        cells.resize(cols, Cell::blank(&attrs));
    }

    /// Erase cells at the cursor without moving anything
    pub fn erase_chars(&mut self, n: u16) {
        let cols = self.cols as usize;
        let col = (self.cursor.col as usize).min(cols - 1);
        let end = (col + n as usize).min(cols);
        let attrs = self.current_attrs;
        self.screen.rows[self.cursor.row as usize].cells[col..end]
            .iter_mut()
            .for_each(|c| c.clear(&attrs));
    }

    /// Set scroll region (1-indexed, inclusive). Invalid margins are
    /// ignored; a valid change homes the cursor.
    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) -> bool {
        if top == 0 || top >= bottom || bottom > self.rows {
            return false;
        }
        self.scroll_region = (top - 1, bottom - 1);
        self.home();
        true
    }

    /// Save cursor position
    pub fn save_cursor(&mut self) {
        self.cursor.saved = Some(SavedCursor {
            col: self.cursor.col,
            row: self.cursor.row,
            attrs: self.current_attrs,
            origin: self.modes.contains(Modes::ORIGIN),
        });
    }

    /// Restore cursor position
    pub fn restore_cursor(&mut self) {
        match self.cursor.saved {
            Some(saved) => {
                self.cursor.col = saved.col.min(self.cols - 1);
                self.cursor.row = saved.row.min(self.rows - 1);
                self.current_attrs = saved.attrs;
                self.modes.set(Modes::ORIGIN, saved.origin);
            }
            None => {
                self.modes.remove(Modes::ORIGIN);
                self.current_attrs.reset();
                self.home();
            }
        }
    }

    /// Set ANSI mode. Returns false for modes this terminal does not know.
    pub fn set_mode(&mut self, mode: u16, enable: bool) -> bool {
        let flag = match mode {
            4 => Modes::INSERT,
            20 => Modes::LINEFEED_NEWLINE,
            _ => return false,
        };
        self.modes.set(flag, enable);
        true
    }

    /// Set DEC private mode. Returns false for unknown modes.
    pub fn set_private_mode(&mut self, mode: u16, enable: bool) -> bool {
        let flag = match mode {
            1 => Modes::APPLICATION_CURSOR,
            6 => Modes::ORIGIN,
            7 => Modes::AUTO_WRAP,
            18 => Modes::PRINT_FORM_FEED,
            19 => Modes::PRINT_EXTENT,
            25 => Modes::CURSOR_VISIBLE,
            2004 => Modes::BRACKETED_PASTE,
            _ => return false,
        };
        self.modes.set(flag, enable);
        if flag == Modes::ORIGIN {
            self.home();
        }
        true
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = truncate_title(title);
    }

    pub fn set_icon_name(&mut self, name: &str) {
        self.icon_name = truncate_title(name);
    }

    /// DECALN: fill the screen with `E`, reset margins and home
    pub fn screen_alignment(&mut self) {
        self.scroll_region = (0, self.rows - 1);
        let fill = Cell {
            content: CellContent::new('E'),
            width: 1,
            attrs: CellAttrs::default(),
        };
        for row in &mut self.screen.rows {
            row.cells.fill(fill);
            row.wrapped = false;
        }
        self.modes.remove(Modes::ORIGIN);
        self.home();
    }

    /// Soft reset: baseline modes, full margins, default attributes, home.
    /// Screen contents are kept.
    pub fn soft_reset(&mut self) {
        self.modes = self.baseline_modes;
        self.scroll_region = (0, self.rows - 1);
        self.current_attrs.reset();
        self.cursor = CursorState::default();
        self.last_cell = None;
    }

    /// Full reset: soft reset plus a cleared screen, title and icon name
    pub fn full_reset(&mut self) {
        self.soft_reset();
        self.screen = ScreenBuffer::new(self.cols, self.rows);
        self.title.clear();
        self.icon_name.clear();
    }

    /// Text of one row with trailing blanks trimmed
    pub fn row_text(&self, row: u16) -> String {
        self.screen
            .rows
            .get(row as usize)
            .map(Row::text)
            .unwrap_or_default()
    }

    /// Text of the whole screen, one line per row
    pub fn screen_text(&self) -> String {
        self.screen
            .rows
            .iter()
            .map(Row::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn truncate_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_LEN).collect()
}

/// Screen buffer
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenBuffer {
    /// Visible rows
    pub rows: Vec<Row>,
}

impl ScreenBuffer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            rows: (0..rows).map(|_| Row::new(cols)).collect(),
        }
    }

    pub fn resize(&mut self, new_cols: u16, new_rows: u16) {
        self.rows.resize_with(new_rows as usize, || Row::new(new_cols));
        for row in &mut self.rows {
            row.resize(new_cols);
        }
    }
}

/// A single row
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub wrapped: bool,
}

impl Row {
    pub fn new(cols: u16) -> Self {
        Self {
            cells: vec![Cell::default(); cols as usize],
            wrapped: false,
        }
    }

    pub fn resize(&mut self, new_cols: u16) {
        self.cells.resize(new_cols as usize, Cell::default());
    }

    pub fn clear(&mut self, attrs: &CellAttrs) {
        for cell in &mut self.cells {
            cell.clear(attrs);
        }
        self.wrapped = false;
    }

    pub fn text(&self) -> String {
        let mut line = String::new();
        for cell in self.cells.iter().filter(|c| !c.is_continuation()) {
            if cell.content.is_empty() {
                line.push(' ');
            } else {
                line.extend(cell.content.as_slice());
            }
        }
        line.truncate(line.trim_end_matches(' ').len());
        line
    }
}

/// Content of one cell: a base codepoint plus the codepoints that joined it.
///
/// Stored inline so cells stay `Copy`; two cells showing the same cluster
/// compare equal.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellContent {
    chars: [char; CellContent::MAX_LEN],
    len: u8,
}

impl CellContent {
    /// Longest cluster a cell can hold
    pub const MAX_LEN: usize = 10;

    pub const EMPTY: Self = Self {
        chars: ['\0'; Self::MAX_LEN],
        len: 0,
    };

    pub fn new(c: char) -> Self {
        let mut content = Self::EMPTY;
        content.chars[0] = c;
        content.len = 1;
        content
    }

    /// Append a codepoint. Returns false, leaving the content unchanged,
    /// when the cell is full.
    #[must_use]
    pub fn push(&mut self, c: char) -> bool {
        let len = self.len as usize;
        if len >= Self::MAX_LEN {
            return false;
        }
        self.chars[len] = c;
        self.len += 1;
        true
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The base codepoint
    pub fn base(&self) -> Option<char> {
        self.as_slice().first().copied()
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}

impl fmt::Debug for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

/// A single cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    /// Columns taken: 1, 2 for wide characters, 0 for the right half
    pub width: u8,
    pub attrs: CellAttrs,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: CellContent::EMPTY,
            width: 1,
            attrs: CellAttrs::default(),
        }
    }
}

impl Cell {
    pub fn blank(attrs: &CellAttrs) -> Self {
        Self {
            attrs: *attrs,
            ..Self::default()
        }
    }

    pub fn clear(&mut self, attrs: &CellAttrs) {
        *self = Self::blank(attrs);
    }

    pub fn continuation(attrs: &CellAttrs) -> Self {
        Self {
            content: CellContent::EMPTY,
            width: 0,
            attrs: *attrs,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }
}

/// Cell attributes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellAttrs {
    pub fg: Color,
    pub bg: Color,
    pub flags: AttrFlags,
}

impl CellAttrs {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Color definition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct AttrFlags: u16 {
        const BOLD          = 0b0000_0000_0001;
        const DIM           = 0b0000_0000_0010;
        const ITALIC        = 0b0000_0000_0100;
        const UNDERLINE     = 0b0000_0000_1000;
        const BLINK         = 0b0000_0001_0000;
        const INVERSE       = 0b0000_0010_0000;
        const HIDDEN        = 0b0000_0100_0000;
        const STRIKETHROUGH = 0b0000_1000_0000;
    }
}

bitflags! {
    /// Per-session terminal modes
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modes: u16 {
        /// DECCKM
        const APPLICATION_CURSOR = 1 << 0;
        /// DECOM
        const ORIGIN             = 1 << 1;
        /// DECAWM
        const AUTO_WRAP          = 1 << 2;
        /// DECTCEM
        const CURSOR_VISIBLE     = 1 << 3;
        /// IRM
        const INSERT             = 1 << 4;
        /// LNM
        const LINEFEED_NEWLINE   = 1 << 5;
        const BRACKETED_PASTE    = 1 << 6;
        /// DECPFF: form feed after a print screen
        const PRINT_FORM_FEED    = 1 << 7;
        /// DECPEX: print the full page instead of the scroll region
        const PRINT_EXTENT       = 1 << 8;
        /// MC ?5i
        const AUTO_PRINT         = 1 << 9;
        /// MC 5i
        const PRINTER_CONTROLLER = 1 << 10;
        /// MC ?9i
        const PRINTER_SESSION    = 1 << 11;
    }
}

impl Modes {
    /// Modes after power-up or reset
    pub fn baseline(auto_wrap: bool) -> Self {
        let mut modes = Modes::CURSOR_VISIBLE;
        modes.set(Modes::AUTO_WRAP, auto_wrap);
        modes
    }
}

/// Cursor state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CursorState {
    pub col: u16,
    pub row: u16,
    pub saved: Option<SavedCursor>,
}

/// Saved cursor state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavedCursor {
    pub col: u16,
    pub row: u16,
    pub attrs: CellAttrs,
    pub origin: bool,
}
