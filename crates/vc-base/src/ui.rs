//! Shared UI helpers for panel rendering.
//!
//! Provides Cell, Align, render_table and width helpers so that module crates
//! can lay out text without depending on the main binary.

use ratatui::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::chars;
use crate::config::theme;

/// Column alignment for table cells
#[derive(Clone, Copy, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A single table cell with text, style, and alignment
pub struct Cell {
    pub text: String,
    pub style: Style,
    pub align: Align,
}

impl Cell {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style, align: Align::Left }
    }
    pub fn right(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style, align: Align::Right }
    }
}

/// Pad a string to a target display width using spaces, respecting alignment.
pub fn pad_to_width(text: &str, target: usize, align: Align) -> String {
    let w = UnicodeWidthStr::width(text);
    let deficit = target.saturating_sub(w);
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(deficit)),
        Align::Right => format!("{}{}", " ".repeat(deficit), text),
    }
}

/// Cut `text` to at most `max` display cells, ending with an ellipsis when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(chars::ELLIPSIS);
    out
}

/// Render a table with Unicode box-drawing separators.
///
/// - `header`: column headers (bold, accent-colored)
/// - `rows`: data rows as `Vec<Vec<Cell>>`
/// - `indent`: number of leading spaces before each row
///
/// Returns `Vec<Line>` with aligned columns using ` │ ` separators and `─┼─` header underline.
pub fn render_table<'a>(header: &[Cell], rows: &[Vec<Cell>], indent: usize) -> Vec<Line<'a>> {
    let num_cols = header.len();

    let mut col_widths: Vec<usize> = header.iter().map(|c| UnicodeWidthStr::width(c.text.as_str())).collect();
    col_widths.resize(num_cols, 0);

    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            if col < num_cols {
                col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(cell.text.as_str()));
            }
        }
    }

    let pad = " ".repeat(indent);
    let mut lines: Vec<Line> = Vec::new();

    // Header row (bold accent)
    {
        let mut spans: Vec<Span<'static>> = vec![Span::raw(pad.clone())];
        for (col, hdr) in header.iter().enumerate() {
            if col > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(theme::border())));
            }
            let padded = pad_to_width(&hdr.text, col_widths[col], hdr.align);
            spans.push(Span::styled(padded, Style::default().fg(theme::accent()).bold()));
        }
        lines.push(Line::from(spans));
    }

    // Header separator
    {
        let mut spans: Vec<Span<'static>> = vec![Span::raw(pad.clone())];
        for (col, width) in col_widths.iter().enumerate() {
            if col > 0 {
                spans.push(Span::styled("─┼─", Style::default().fg(theme::border())));
            }
            spans.push(Span::styled(chars::HORIZONTAL.repeat(*width), Style::default().fg(theme::border())));
        }
        lines.push(Line::from(spans));
    }

    for row in rows {
        let mut spans: Vec<Span<'static>> = vec![Span::raw(pad.clone())];
        for (col, col_w) in col_widths.iter().enumerate() {
            if col > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(theme::border())));
            }
            match row.get(col) {
                Some(cell) => spans.push(Span::styled(pad_to_width(&cell.text, *col_w, cell.align), cell.style)),
                None => spans.push(Span::raw(" ".repeat(*col_w))),
            }
        }
        lines.push(Line::from(spans));
    }

    lines
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(frame: u64) -> &'static str {
    SPINNER_FRAMES[(frame % SPINNER_FRAMES.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn table_aligns_columns() {
        let header = [Cell::new("Branch", Style::default()), Cell::right("M", Style::default())];
        let rows = vec![
            vec![Cell::new("main", Style::default()), Cell::right("3", Style::default())],
            vec![Cell::new("feature/long", Style::default()), Cell::right("12", Style::default())],
        ];
        let lines = render_table(&header, &rows, 1);
        assert_eq!(lines.len(), 4);
        assert_eq!(line_text(&lines[0]), " Branch       │  M");
        assert_eq!(line_text(&lines[2]), " main         │  3");
        assert_eq!(line_text(&lines[3]), " feature/long │ 12");
    }

    #[test]
    fn truncation_respects_width() {
        assert_eq!(truncate_to_width("abcdef", 10), "abcdef");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("abcdef", 0), "");
    }
}
