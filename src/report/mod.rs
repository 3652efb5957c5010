pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::categories::{RegulationCategory, display_order, taxonomy};
use crate::model::layers::Layer;
use crate::model::thresholds::LayerCutoffs;
use crate::pipeline::stage1_normalize::{NormalizeStats, RowPolicy};
use crate::pipeline::stage2_threshold::CallCounts;
use crate::pipeline::stage4_assemble::{RunWarning, UnifiedRecord};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStat {
    pub name: &'static str,
    pub count: usize,
    pub fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramBar {
    pub category: &'static str,
    pub colour: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub layer: Layer,
    pub path: String,
    pub gene_id_column: String,
    pub effect_column: String,
    pub padj_column: String,
    pub cutoffs: LayerCutoffs,
    pub normalize: NormalizeStats,
    pub genes: usize,
    pub calls: CallCounts,
    pub dropped_by_join: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub background_formula: String,
    pub row_policy: RowPolicy,
    pub layers: Vec<LayerSummary>,
    pub shared_genes: usize,
    pub background_genes: usize,
    pub categories: Vec<CategoryStat>,
    pub filtered_categories: Vec<CategoryStat>,
    pub warnings: Vec<RunWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    Raw,
    Filtered,
}

fn pick(record: &UnifiedRecord, column: CategoryColumn) -> RegulationCategory {
    match column {
        CategoryColumn::Raw => record.category,
        CategoryColumn::Filtered => record.filtered_category,
    }
}

pub fn count_category(
    records: &[UnifiedRecord],
    column: CategoryColumn,
    category: RegulationCategory,
) -> usize {
    records
        .iter()
        .filter(|r| pick(r, column) == category)
        .count()
}

/// Counts per label in taxonomy order; the filtered column also reports
/// `Background`.
pub fn category_stats(records: &[UnifiedRecord], column: CategoryColumn) -> Vec<CategoryStat> {
    let mut labels = taxonomy().to_vec();
    if column == CategoryColumn::Filtered {
        labels.push(RegulationCategory::Background);
    }
    let total = records.len();
    labels
        .into_iter()
        .map(|category| {
            let count = count_category(records, column, category);
            CategoryStat {
                name: category.as_str(),
                count,
                fraction: fraction(count, total),
            }
        })
        .collect()
}

pub fn histogram_bars(records: &[UnifiedRecord]) -> Vec<HistogramBar> {
    display_order()
        .iter()
        .filter_map(|&category| {
            Some(HistogramBar {
                category: category.as_str(),
                colour: category.colour()?,
                count: count_category(records, CategoryColumn::Filtered, category),
            })
        })
        .collect()
}

pub fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
