use serde::Serialize;

use crate::model::layers::{DirectionalCall, Layer, LayerRecord};
use crate::model::thresholds::LayerCutoffs;
use crate::pipeline::stage1_normalize::LayerTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallCounts {
    pub up: usize,
    pub down: usize,
    pub unchanged: usize,
}

impl CallCounts {
    pub fn add(&mut self, call: DirectionalCall) {
        match call {
            DirectionalCall::Up => self.up += 1,
            DirectionalCall::Down => self.down += 1,
            DirectionalCall::Unchanged => self.unchanged += 1,
        }
    }
}

/// Calls for one layer, aligned with `LayerTable::records`.
#[derive(Debug, Clone)]
pub struct ClassifiedLayer {
    pub layer: Layer,
    pub cutoffs: LayerCutoffs,
    pub calls: Vec<DirectionalCall>,
    pub counts: CallCounts,
}

pub fn classify(record: &LayerRecord, cutoffs: &LayerCutoffs) -> DirectionalCall {
    if record.coerced || record.adjusted_p > cutoffs.padj {
        return DirectionalCall::Unchanged;
    }
    if record.effect_size >= cutoffs.effect_size {
        DirectionalCall::Up
    } else if record.effect_size <= -cutoffs.effect_size {
        DirectionalCall::Down
    } else {
        DirectionalCall::Unchanged
    }
}

pub fn run_stage2(table: &LayerTable, cutoffs: LayerCutoffs) -> ClassifiedLayer {
    let mut counts = CallCounts::default();
    let mut calls = Vec::with_capacity(table.len());
    for record in &table.records {
        let call = classify(record, &cutoffs);
        counts.add(call);
        calls.push(call);
    }

    tracing::info!(
        layer = %table.layer,
        effect_cutoff = cutoffs.effect_size,
        padj_cutoff = cutoffs.padj,
        up = counts.up,
        down = counts.down,
        unchanged = counts.unchanged,
        "classified layer"
    );

    ClassifiedLayer {
        layer: table.layer,
        cutoffs,
        calls,
        counts,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_threshold.rs"]
mod tests;
