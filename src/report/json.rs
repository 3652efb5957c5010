use serde::Serialize;

use crate::report::{HistogramBar, SummaryData};

pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

#[derive(Serialize)]
struct Histogram<'a> {
    column: &'static str,
    bars: &'a [HistogramBar],
}

/// Histogram contract: fixed category order with colours, counts taken from
/// the filtered category column.
pub fn render_histogram_json(bars: &[HistogramBar]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Histogram {
        column: "filtered_category",
        bars,
    })
}
