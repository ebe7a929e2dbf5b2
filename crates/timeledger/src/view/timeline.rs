//! Lane view of a timeline.
//!
//! One row per category, sent on top and inbox at the bottom, with the
//! axis labels underneath:
//!
//! ```text
//!     sent |··o·····O·····|
//!   images |·········2····|
//!  history |o·············|
//!    inbox |·····o·······o|
//!           ^     ^      ^
//!           2023-01-01   2023-01-09
//! ```

use std::io::IsTerminal;

use crossterm::terminal;
use timeledger_core::{AxisLabel, Category, Marker, Settings, Timeline};

use crate::style::Palette;

/// Width of the lane name column.
const LANE_NAME_WIDTH: usize = 8;
/// Columns before the first track cell: name, space, bar.
const TRACK_OFFSET: usize = LANE_NAME_WIDTH + 2;

const EMPTY: char = '·';

/// Track width used when output is not a terminal.
const FALLBACK_TRACK_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    count: usize,
    boosted: bool,
}

impl Cell {
    fn glyph(self) -> Option<char> {
        match self.count {
            0 => None,
            _ if self.boosted => Some('O'),
            1 => Some('o'),
            n @ 2..=9 => char::from_digit(u32::try_from(n).unwrap_or(9), 10),
            _ => Some('+'),
        }
    }
}

/// Maps a 0-100 position onto a track of `width` cells.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)] // Positions are clamped to 0..=100
pub fn column(position: f64, width: usize) -> usize {
    let last = width.max(1) - 1;
    let column = (position.clamp(0.0, 100.0) / 100.0 * last as f64).round() as usize;
    column.min(last)
}

/// Terminal width in columns, when stdout is a terminal.
pub fn terminal_columns() -> Option<u16> {
    if !std::io::stdout().is_terminal() {
        return None;
    }
    terminal::size().ok().map(|(columns, _)| columns)
}

/// Resolves the track width: a configured width wins, otherwise the track
/// fills the terminal after the lane name and both bars.
pub fn track_width(configured: Option<usize>, columns: Option<u16>) -> usize {
    configured.unwrap_or_else(|| {
        columns.map_or(FALLBACK_TRACK_WIDTH, |columns| {
            usize::from(columns)
                .saturating_sub(TRACK_OFFSET + 1)
                .max(Settings::MIN_TRACK_WIDTH)
        })
    })
}

/// Draws every lane plus the label rows.
pub fn render_timeline(timeline: &Timeline, width: usize, palette: Palette) -> String {
    let width = width.max(1);
    let mut out = String::new();

    out.push_str(&format!(
        "{} events, {} .. {}\n",
        timeline.markers.len(),
        timeline.labels.first().map_or("", |l| l.display.as_str()),
        timeline.labels.last().map_or("", |l| l.display.as_str()),
    ));

    for category in Category::ALL {
        out.push_str(&render_lane(category, &timeline.markers, width, palette));
        out.push('\n');
    }

    let (ticks, text) = render_labels(&timeline.labels, width);
    out.push_str(&palette.dim(&ticks));
    out.push('\n');
    out.push_str(&palette.dim(&text));
    out.push('\n');
    out
}

fn render_lane(category: Category, markers: &[Marker], width: usize, palette: Palette) -> String {
    let mut cells = vec![Cell::default(); width];
    for marker in markers.iter().filter(|m| m.category == category) {
        let cell = &mut cells[column(marker.position, width)];
        cell.count += 1;
        cell.boosted |= marker.boosted;
    }

    let track: String = cells
        .iter()
        .map(|cell| match cell.glyph() {
            Some(glyph) => palette.lane(category, cell.boosted, &glyph.to_string()),
            None => EMPTY.to_string(),
        })
        .collect();

    let padding = " ".repeat(LANE_NAME_WIDTH.saturating_sub(category.as_str().len()));
    format!(
        "{padding}{} |{track}|",
        palette.lane(category, false, category.as_str())
    )
}

/// Tick row and text row for the axis labels.
///
/// Label text is centered under its tick and dropped when it would overlap
/// the previous one.
fn render_labels(labels: &[AxisLabel], width: usize) -> (String, String) {
    let mut ticks = vec![' '; width];
    let mut text = vec![' '; width];
    let mut cursor = 0;

    for label in labels {
        let col = column(label.position, width);
        ticks[col] = '^';

        let chars: Vec<char> = label.display.chars().collect();
        if chars.len() > width {
            continue;
        }
        let start = col
            .saturating_sub(chars.len() / 2)
            .min(width - chars.len());
        if start < cursor {
            continue;
        }
        text[start..start + chars.len()].copy_from_slice(&chars);
        cursor = start + chars.len() + 1;
    }

    let indent = " ".repeat(TRACK_OFFSET);
    let ticks: String = ticks.into_iter().collect();
    let text: String = text.into_iter().collect();
    (
        format!("{indent}{}", ticks.trim_end()),
        format!("{indent}{}", text.trim_end()),
    )
}
