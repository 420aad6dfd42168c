//! Screen painting for the typing test.
//!
//! All drawing goes through [`Surface`], a minimal character-grid interface.
//! Writes that fall outside the grid are dropped, so a shrinking terminal can
//! never abort an attempt mid-draw.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    Frame,
};

use crate::{
    stats::{Metrics, TestResult},
    text::{PreparedText, LINE_WIDTH},
    tracker::{BlinkState, InputState},
};

pub const MIN_COLS: u16 = 60;
pub const MIN_ROWS: u16 = 10;

pub const HEADER: &str = "Type the following text:";
pub const TOO_SMALL: &str = "Terminal too small! Minimum 60x10";

const RESULTS_WIDTH: i32 = 50;

/// Character-cell grid the render functions paint onto.
pub trait Surface {
    /// (columns, rows)
    fn size(&self) -> (u16, u16);
    /// Draw `text` starting at (`x`, `y`); cells outside the grid are skipped.
    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style);
    /// Place the visible terminal cursor. Out-of-bounds positions are ignored.
    fn move_cursor(&mut self, x: u16, y: u16);
}

fn put_str(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
    for (offset, ch) in text.chars().enumerate() {
        let Some(cx) = usize::from(x)
            .checked_add(offset)
            .and_then(|cx| u16::try_from(cx).ok())
        else {
            return;
        };
        if let Some(cell) = buf.cell_mut((cx, y)) {
            cell.set_char(ch).set_style(style);
        }
    }
}

impl Surface for Frame<'_> {
    fn size(&self) -> (u16, u16) {
        let area = self.area();
        (area.width, area.height)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) {
        put_str(self.buffer_mut(), x, y, text, style);
    }

    fn move_cursor(&mut self, x: u16, y: u16) {
        if self.area().contains(Position::new(x, y)) {
            self.set_cursor_position(Position::new(x, y));
        }
    }
}

/// A [`Frame`] that remembers where the cursor was last placed, since the
/// backend only exposes whether it is shown after the frame is flushed.
pub struct TrackedFrame<'a, 'b> {
    frame: &'a mut Frame<'b>,
    pub cursor: Option<Position>,
}

impl<'a, 'b> TrackedFrame<'a, 'b> {
    pub fn new(frame: &'a mut Frame<'b>) -> Self {
        Self {
            frame,
            cursor: None,
        }
    }
}

impl Surface for TrackedFrame<'_, '_> {
    fn size(&self) -> (u16, u16) {
        Surface::size(&*self.frame)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) {
        self.frame.draw_text(x, y, text, style);
    }

    fn move_cursor(&mut self, x: u16, y: u16) {
        if self.frame.area().contains(Position::new(x, y)) {
            self.frame.set_cursor_position(Position::new(x, y));
            self.cursor = Some(Position::new(x, y));
        }
    }
}

/// In-memory surface, used by tests and headless runs.
#[derive(Debug, Clone)]
pub struct BufferSurface {
    pub buffer: Buffer,
    pub cursor: Option<Position>,
}

impl BufferSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, cols, rows)),
            cursor: None,
        }
    }

    /// Contents of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: u16) -> String {
        let area = self.buffer.area;
        let row: String = (area.left()..area.right())
            .filter_map(|x| self.buffer.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect();
        row.trim_end().to_string()
    }
}

impl Surface for BufferSurface {
    fn size(&self) -> (u16, u16) {
        (self.buffer.area.width, self.buffer.area.height)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) {
        put_str(&mut self.buffer, x, y, text, style);
    }

    fn move_cursor(&mut self, x: u16, y: u16) {
        if self.buffer.area.contains(Position::new(x, y)) {
            self.cursor = Some(Position::new(x, y));
        }
    }
}

pub fn fits(cols: u16, rows: u16) -> bool {
    cols >= MIN_COLS && rows >= MIN_ROWS
}

fn to_u16(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

/// Screen placement of the text block for a given terminal size.
///
/// The block is a [`LINE_WIDTH`]-column frame centered horizontally; each line
/// is centered inside that frame, and the whole block is centered vertically
/// with room for the header and status rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub start_row: u16,
    pub col_pad: u16,
    pub line_count: u16,
    pub cols: u16,
}

impl Layout {
    pub fn new(cols: u16, rows: u16, line_count: usize) -> Self {
        let line_count = u16::try_from(line_count).unwrap_or(u16::MAX);
        let start_row = ((i32::from(rows) - i32::from(line_count) - 6) / 2).max(2);
        Self {
            start_row: to_u16(start_row),
            col_pad: cols.saturating_sub(LINE_WIDTH as u16) / 2,
            line_count,
            cols,
        }
    }

    /// Column where a string of `len` characters starts when centered in the frame.
    pub fn centered_x(&self, len: usize) -> u16 {
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        let offset = (LINE_WIDTH as i32 - len).div_euclid(2);
        to_u16(i32::from(self.col_pad) + offset)
    }

    pub fn header_row(&self) -> u16 {
        self.start_row - 2
    }

    pub fn status_row(&self) -> u16 {
        self.start_row.saturating_add(self.line_count).saturating_add(2)
    }

    /// Screen cell of flat index `idx`.
    pub fn cell_of(&self, text: &PreparedText, idx: usize) -> (u16, u16) {
        let (line, col) = text.position_of(idx);
        let line_len = text.lines().get(line).map_or(0, String::len);
        let x = self
            .centered_x(line_len)
            .saturating_add(u16::try_from(col).unwrap_or(u16::MAX));
        let y = self
            .start_row
            .saturating_add(u16::try_from(line).unwrap_or(u16::MAX));
        (x, y)
    }

    /// Insertion point: just after the last typed character, or on the first
    /// character before anything is typed.
    ///
    /// When "just after" falls off the right edge of the grid the cursor wraps
    /// to the next character to type, or stays on the last column at the end
    /// of the text.
    pub fn cursor_cell(&self, text: &PreparedText, typed_len: usize) -> (u16, u16) {
        let Some(last) = typed_len.checked_sub(1) else {
            return self.cell_of(text, 0);
        };
        let (x, y) = self.cell_of(text, last);
        let after = x.saturating_add(1);
        if after < self.cols {
            (after, y)
        } else if typed_len < text.len() {
            self.cell_of(text, typed_len)
        } else {
            (self.cols.saturating_sub(1), y)
        }
    }
}

/// Everything needed to paint one frame of an attempt in progress.
#[derive(Debug, Clone, Copy)]
pub struct TestView<'a> {
    pub text: &'a PreparedText,
    pub input: &'a InputState,
    pub blink: &'a BlinkState,
    pub metrics: &'a Metrics,
    pub goal: u32,
}

pub fn status_line(metrics: &Metrics, goal: u32) -> String {
    format!(
        "WPM: {:.1} (Goal: {}) | Accuracy: {}",
        metrics.wpm,
        goal,
        metrics.accuracy_label()
    )
}

fn draw_centered<S: Surface + ?Sized>(surface: &mut S, layout: &Layout, y: u16, text: &str, style: Style) {
    surface.draw_text(layout.centered_x(text.len()), y, text, style);
}

pub fn paint_test<S: Surface + ?Sized>(surface: &mut S, view: &TestView<'_>) {
    let (cols, rows) = surface.size();
    let layout = Layout::new(cols, rows, view.text.lines().len());

    let green_style = Style::default().fg(Color::Green);
    let red_style = Style::default().fg(Color::Red);

    draw_centered(surface, &layout, layout.header_row(), HEADER, Style::default());

    let typed = view.input.typed();
    let mut buf = [0u8; 4];
    for (idx, expected) in view.text.flat().chars().enumerate() {
        let style = match typed.get(idx) {
            Some(actual) if *actual == expected => green_style,
            Some(_) => red_style,
            None => Style::default(),
        };
        let (x, y) = layout.cell_of(view.text, idx);
        surface.draw_text(x, y, expected.encode_utf8(&mut buf), style);
    }

    draw_centered(
        surface,
        &layout,
        layout.status_row(),
        &status_line(view.metrics, view.goal),
        Style::default(),
    );

    if view.blink.visible() {
        let (x, y) = layout.cursor_cell(view.text, typed.len());
        surface.move_cursor(x, y);
    }
}

pub fn result_message(result: &TestResult) -> &'static str {
    if result.passed {
        "Success! Press any key to exit..."
    } else {
        "Failed! Press any key to try again..."
    }
}

pub fn paint_results<S: Surface + ?Sized>(surface: &mut S, result: &TestResult) {
    let (cols, rows) = surface.size();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let red_style = Style::default().fg(Color::Red);

    let y = to_u16(i32::from(rows) / 2 - 3);
    let x = to_u16((i32::from(cols) - RESULTS_WIDTH) / 2);

    surface.draw_text(x, y, "Test Complete!", bold_style);
    surface.draw_text(x, y.saturating_add(1), &format!("WPM: {:.1}", result.wpm), Style::default());
    surface.draw_text(
        x,
        y.saturating_add(2),
        &format!("Accuracy: {:.1}%", result.accuracy * 100.0),
        Style::default(),
    );
    surface.draw_text(x, y.saturating_add(3), &format!("Goal: {} WPM", result.goal), Style::default());
    surface.draw_text(
        x,
        y.saturating_add(5),
        result_message(result),
        if result.passed { bold_style } else { red_style },
    );
}

pub fn paint_too_small<S: Surface + ?Sized>(surface: &mut S) {
    surface.draw_text(0, 0, TOO_SMALL, Style::default());
}
