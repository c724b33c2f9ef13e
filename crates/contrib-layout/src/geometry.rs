//! Cell geometry solver.
//!
//! Fits `week_count` columns of seven cells into a viewport. Gutter sizes
//! depend on the cell size and the cell size depends on the area left after
//! the gutters, so the solve runs twice: once on the whole graph area to
//! size the gutters, then again on the area that remains.

use contrib_core::{LayoutFlags, Viewport, DAYS_PER_WEEK};
use serde::Serialize;

const DAYS: f64 = DAYS_PER_WEEK as f64;

const MAX_PADDING: f64 = 8.0;
const MAX_HEADER: f64 = 40.0;
const MAX_FOOTER: f64 = 24.0;
const MIN_GRAPH_WIDTH: f64 = 80.0;
const MIN_GRAPH_HEIGHT: f64 = 40.0;
const MIN_CELL: f64 = 2.0;
const MAX_CELL: f64 = 80.0;
const MIN_GUTTER: f64 = 12.0;
const MIN_MONTH_ROW: f64 = 8.0;
const MIN_FONT: f64 = 6.0;
const MAX_FONT: f64 = 14.0;

/// Pixel geometry for every region of the widget.
///
/// `padding`, `header_height` and `footer_height` are fractional; everything
/// else is snapped to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub padding: f64,
    pub header_height: f64,
    pub footer_height: f64,
    pub day_label_gutter_width: u32,
    pub month_row_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub cell_gap: u32,
    pub cell_corner_radius: u32,
    pub label_font_size: u32,
}

/// Extent of one cell when `count` cells and `count - 1` gaps share `span`.
fn cell_extent(span: f64, count: f64, gap: f64) -> f64 {
    (span - (count - 1.0) * gap) / count
}

/// Solve the layout. Pure and deterministic; a `week_count` of zero is
/// treated as one.
pub fn compute_layout(viewport: Viewport, week_count: usize, flags: LayoutFlags) -> LayoutMetrics {
    let Viewport { width, height } = viewport.sanitized();
    let weeks = week_count.max(1) as f64;

    let padding = MAX_PADDING.min(width * 0.02).min(height * 0.02);
    let header_height = if flags.show_header {
        MAX_HEADER.min(height * 0.1)
    } else {
        0.0
    };
    let footer_height = if flags.show_footer {
        MAX_FOOTER.min(height * 0.06)
    } else {
        0.0
    };

    let mut graph_width = (width - 2.0 * padding).max(MIN_GRAPH_WIDTH);
    let mut graph_height =
        (height - 2.0 * padding - header_height - footer_height).max(MIN_GRAPH_HEIGHT);

    let smallest_dim = (graph_width / weeks).min(graph_height / DAYS);
    let gap = (smallest_dim * 0.12).round().max(1.0);

    // First pass: no gutters.
    let raw_cell_width = cell_extent(graph_width, weeks, gap);
    let raw_cell_height = cell_extent(graph_height, DAYS, gap);
    let cell_min = raw_cell_width.min(raw_cell_height);

    let gutter = if flags.show_day_labels {
        (cell_min * 1.2).floor().max(MIN_GUTTER)
    } else {
        0.0
    };
    let month_row = if flags.show_labels {
        (raw_cell_height * 0.7).floor().max(MIN_MONTH_ROW)
    } else {
        0.0
    };

    // Second pass on what the gutters left.
    graph_width -= gutter;
    graph_height -= month_row;

    let cell_width = cell_extent(graph_width, weeks, gap)
        .clamp(MIN_CELL, MAX_CELL)
        .floor();
    let cell_height = cell_extent(graph_height, DAYS, gap)
        .clamp(MIN_CELL, MAX_CELL)
        .floor();
    let gap = gap.floor().max(1.0);

    let min_dim = cell_width.min(cell_height);
    let corner_radius = (min_dim * 0.15).round().max(1.0);
    let font_size = (min_dim * 0.6).round().clamp(MIN_FONT, MAX_FONT);

    LayoutMetrics {
        padding,
        header_height,
        footer_height,
        day_label_gutter_width: gutter as u32,
        month_row_height: month_row as u32,
        cell_width: cell_width as u32,
        cell_height: cell_height as u32,
        cell_gap: gap as u32,
        cell_corner_radius: corner_radius as u32,
        label_font_size: font_size as u32,
    }
}
