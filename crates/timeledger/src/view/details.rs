//! Numbered marker list.

use timeledger_core::{ClickAction, Marker};

use crate::style::Palette;

/// Splits a tooltip into its header lines and body preview.
fn split_tooltip(tooltip: &str) -> (&str, &str) {
    tooltip.split_once("\n\n").unwrap_or((tooltip, ""))
}

const fn click_hint(click: Option<&ClickAction>) -> &'static str {
    match click {
        Some(ClickAction::CopyText(_)) => " [copy]",
        Some(ClickAction::OpenPath(_) | ClickAction::OpenUrl(_)) => " [open]",
        None => "",
    }
}

/// One line per marker, numbered from 1 in marker order.
///
/// With `previews`, mail body previews follow on an indented line.
pub fn render_details(markers: &[Marker], previews: bool, palette: Palette) -> String {
    let mut out = String::new();

    for (index, marker) in markers.iter().enumerate() {
        let (header, preview) = split_tooltip(&marker.tooltip);
        let headline = header.lines().collect::<Vec<_>>().join(" | ");
        let star = if marker.boosted { '*' } else { ' ' };

        out.push_str(&format!(
            "{:>4}.{star}{} {headline}{}\n",
            index + 1,
            palette.lane(
                marker.category,
                marker.boosted,
                &format!("{:<7}", marker.category.as_str())
            ),
            click_hint(marker.click.as_ref()),
        ));

        if previews && !preview.is_empty() {
            out.push_str(&format!("        {}\n", palette.dim(preview)));
        }
    }
    out
}
