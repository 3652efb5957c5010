use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, MalformedRowError, ValidationError};
use crate::input::RawTable;
use crate::model::layers::{Layer, LayerRecord};

/// What to do with a row whose effect size or p-value is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    #[default]
    FailFast,
    CoerceUnchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSchema {
    pub gene_id_column: String,
    pub effect_column: String,
    pub padj_column: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub missing_id_dropped: usize,
    pub coerced: usize,
}

#[derive(Debug, Clone)]
pub struct LayerTable {
    pub layer: Layer,
    pub records: Vec<LayerRecord>,
    pub stats: NormalizeStats,
    index: HashMap<String, usize>,
}

impl LayerTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn position(&self, gene_id: &str) -> Option<usize> {
        self.index.get(gene_id).copied()
    }
}

struct ColumnIndices {
    gene_id: usize,
    effect: usize,
    padj: usize,
}

fn resolve_columns(table: &RawTable, schema: &LayerSchema) -> Result<ColumnIndices, ValidationError> {
    if table.headers.is_empty() && table.rows.is_empty() {
        return Err(ValidationError::EmptyTable { layer: table.layer });
    }
    let find = |column: &str| {
        table
            .column_index(column)
            .ok_or_else(|| ValidationError::MissingColumn {
                layer: table.layer,
                column: column.to_string(),
                available: table.headers.clone(),
            })
    };
    Ok(ColumnIndices {
        gene_id: find(&schema.gene_id_column)?,
        effect: find(&schema.effect_column)?,
        padj: find(&schema.padj_column)?,
    })
}

/// Checks that every column named by the schema is present, without reading rows.
pub fn validate_schema(table: &RawTable, schema: &LayerSchema) -> Result<(), ValidationError> {
    resolve_columns(table, schema).map(|_| ())
}

pub fn normalize_layer(
    table: &RawTable,
    schema: &LayerSchema,
    policy: RowPolicy,
) -> Result<LayerTable, EngineError> {
    let cols = resolve_columns(table, schema)?;
    if table.rows.is_empty() {
        return Err(ValidationError::EmptyTable { layer: table.layer }.into());
    }

    let mut stats = NormalizeStats {
        rows_read: table.rows.len(),
        ..NormalizeStats::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());
    let mut index = HashMap::with_capacity(table.rows.len());

    for row in &table.rows {
        let gene_id = row.cell(cols.gene_id).trim();
        if gene_id.is_empty() {
            tracing::warn!(
                layer = %table.layer,
                line = row.line,
                "row has no gene identifier; dropping"
            );
            stats.missing_id_dropped += 1;
            continue;
        }
        if index.contains_key(gene_id) {
            return Err(ValidationError::DuplicateGeneId {
                layer: table.layer,
                gene_id: gene_id.to_string(),
                line: row.line,
            }
            .into());
        }

        let effect = parse_effect(row.cell(cols.effect));
        let padj = parse_padj(row.cell(cols.padj));
        let record = match (effect, padj) {
            (Some(effect), Some(padj)) => LayerRecord::new(gene_id, effect, padj),
            (effect, _) => {
                let (column, value) = if effect.is_none() {
                    (&schema.effect_column, row.cell(cols.effect))
                } else {
                    (&schema.padj_column, row.cell(cols.padj))
                };
                match policy {
                    RowPolicy::FailFast => {
                        return Err(MalformedRowError {
                            layer: table.layer,
                            gene_id: gene_id.to_string(),
                            line: row.line,
                            column: column.clone(),
                            value: value.to_string(),
                        }
                        .into());
                    }
                    RowPolicy::CoerceUnchanged => {
                        tracing::warn!(
                            layer = %table.layer,
                            gene_id,
                            line = row.line,
                            column = %column,
                            value,
                            "unusable value; gene coerced to Unchanged"
                        );
                        stats.coerced += 1;
                        LayerRecord {
                            gene_id: gene_id.to_string(),
                            effect_size: 0.0,
                            adjusted_p: 1.0,
                            coerced: true,
                        }
                    }
                }
            }
        };

        index.insert(record.gene_id.clone(), records.len());
        records.push(record);
    }

    if records.is_empty() {
        return Err(ValidationError::EmptyTable { layer: table.layer }.into());
    }

    tracing::info!(
        layer = %table.layer,
        path = %table.path.display(),
        genes = records.len(),
        dropped = stats.missing_id_dropped,
        coerced = stats.coerced,
        "normalized layer table"
    );

    Ok(LayerTable {
        layer: table.layer,
        records,
        stats,
        index,
    })
}

fn parse_effect(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_padj(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
}

/// Builds a table directly from records, enforcing id uniqueness.
#[cfg(test)]
pub fn layer_table_from_records(
    layer: Layer,
    records: Vec<LayerRecord>,
) -> Result<LayerTable, ValidationError> {
    let mut index = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if index.insert(record.gene_id.clone(), idx).is_some() {
            return Err(ValidationError::DuplicateGeneId {
                layer,
                gene_id: record.gene_id.clone(),
                line: idx as u64 + 2,
            });
        }
    }
    Ok(LayerTable {
        layer,
        stats: NormalizeStats {
            rows_read: records.len(),
            ..NormalizeStats::default()
        },
        records,
        index,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_normalize.rs"]
mod tests;
