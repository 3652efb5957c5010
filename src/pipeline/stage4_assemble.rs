use rayon::prelude::*;
use serde::Serialize;

use crate::model::background::BackgroundExpr;
use crate::model::categories::RegulationCategory;
use crate::model::layers::{DirectionalCall, Layer, LayerCalls};
use crate::pipeline::stage1_normalize::LayerTable;
use crate::pipeline::stage2_threshold::ClassifiedLayer;
use crate::pipeline::stage3_regulation::{filtered_category, map_category};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedRecord {
    pub gene_id: String,
    pub meth_call: DirectionalCall,
    pub rna_call: DirectionalCall,
    pub prot_call: DirectionalCall,
    pub is_background: bool,
    pub category: RegulationCategory,
    pub filtered_category: RegulationCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunWarning {
    EmptyIntersection,
    EmptyAfterBackground,
}

impl RunWarning {
    pub fn message(self) -> &'static str {
        match self {
            RunWarning::EmptyIntersection => {
                "no gene is present in all three layers; outputs are empty"
            }
            RunWarning::EmptyAfterBackground => {
                "every shared gene is background; filtered outputs are empty"
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinDiagnostics {
    pub genes_per_layer: [usize; 3],
    pub dropped_per_layer: [usize; 3],
    pub intersection: usize,
    pub background: usize,
    pub warnings: Vec<RunWarning>,
}

impl JoinDiagnostics {
    pub fn dropped(&self, layer: Layer) -> usize {
        self.dropped_per_layer[layer_slot(layer)]
    }
}

#[derive(Debug, Clone)]
pub struct UnifiedTable {
    pub records: Vec<UnifiedRecord>,
    pub diagnostics: JoinDiagnostics,
}

#[derive(Debug, Clone, Copy)]
pub struct LayerInput<'a> {
    pub table: &'a LayerTable,
    pub classified: &'a ClassifiedLayer,
}

#[derive(Debug, Clone, Copy)]
pub struct Stage4Inputs<'a> {
    pub methylation: LayerInput<'a>,
    pub rna: LayerInput<'a>,
    pub protein: LayerInput<'a>,
    pub background: &'a BackgroundExpr,
}

fn layer_slot(layer: Layer) -> usize {
    match layer {
        Layer::Methylation => 0,
        Layer::Rna => 1,
        Layer::Protein => 2,
    }
}

/// Shared gene ids as (methylation, rna, protein) record positions, in
/// methylation table order.
pub fn intersect(
    methylation: &LayerTable,
    rna: &LayerTable,
    protein: &LayerTable,
) -> Vec<(usize, usize, usize)> {
    methylation
        .records
        .iter()
        .enumerate()
        .filter_map(|(m, record)| {
            let r = rna.position(&record.gene_id)?;
            let p = protein.position(&record.gene_id)?;
            Some((m, r, p))
        })
        .collect()
}

pub fn assemble_gene(gene_id: &str, calls: LayerCalls, background: &BackgroundExpr) -> UnifiedRecord {
    let is_background = background.evaluate(&calls);
    let category = map_category(&calls);
    UnifiedRecord {
        gene_id: gene_id.to_string(),
        meth_call: calls.methylation,
        rna_call: calls.rna,
        prot_call: calls.protein,
        is_background,
        category,
        filtered_category: filtered_category(category, is_background),
    }
}

pub fn run_stage4(inputs: &Stage4Inputs<'_>) -> UnifiedTable {
    let meth = inputs.methylation;
    let rna = inputs.rna;
    let prot = inputs.protein;

    let shared = intersect(meth.table, rna.table, prot.table);

    let records = shared
        .par_iter()
        .map(|&(m, r, p)| {
            let calls = LayerCalls::new(
                meth.classified.calls[m],
                rna.classified.calls[r],
                prot.classified.calls[p],
            );
            assemble_gene(&meth.table.records[m].gene_id, calls, inputs.background)
        })
        .collect::<Vec<_>>();

    let genes_per_layer = [meth.table.len(), rna.table.len(), prot.table.len()];
    let intersection = records.len();
    let dropped_per_layer = genes_per_layer.map(|n| n - intersection);
    let background = records.iter().filter(|r| r.is_background).count();

    for layer in Layer::ALL {
        let dropped = dropped_per_layer[layer_slot(layer)];
        if dropped > 0 {
            tracing::info!(
                layer = %layer,
                dropped,
                "genes not present in all three layers were dropped"
            );
        }
    }

    let mut warnings = Vec::new();
    if intersection == 0 {
        warnings.push(RunWarning::EmptyIntersection);
    } else if background == intersection {
        warnings.push(RunWarning::EmptyAfterBackground);
    }
    for warning in &warnings {
        tracing::warn!("{}", warning.message());
    }

    tracing::info!(
        shared_genes = intersection,
        background,
        formula = %inputs.background,
        "assembled unified table"
    );

    UnifiedTable {
        records,
        diagnostics: JoinDiagnostics {
            genes_per_layer,
            dropped_per_layer,
            intersection,
            background,
            warnings,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_assemble.rs"]
mod tests;
