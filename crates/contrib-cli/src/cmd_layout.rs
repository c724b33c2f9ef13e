use contrib_core::{LayoutFlags, Viewport};
use contrib_layout::{compute_layout, LayoutMetrics};

/// `contrib-graph layout`
pub fn execute(width: f64, height: f64, weeks: usize, flags: LayoutFlags, json: bool) -> anyhow::Result<()> {
    let metrics = compute_layout(Viewport::new(width, height), weeks, flags);
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        for line in describe(&metrics) {
            println!("{line}");
        }
    }
    Ok(())
}

fn describe(m: &LayoutMetrics) -> Vec<String> {
    vec![
        format!("cell          {}x{}px", m.cell_width, m.cell_height),
        format!("gap           {}px", m.cell_gap),
        format!("radius        {}px", m.cell_corner_radius),
        format!("padding       {:.1}px", m.padding),
        format!("header        {:.1}px", m.header_height),
        format!("footer        {:.1}px", m.footer_height),
        format!("month row     {}px", m.month_row_height),
        format!("day gutter    {}px", m.day_label_gutter_width),
        format!("label font    {}px", m.label_font_size),
    ]
}
