use serde::Serialize;

use crate::error::ValidationError;
use crate::model::layers::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerCutoffs {
    pub effect_size: f64,
    pub padj: f64,
}

impl LayerCutoffs {
    pub fn new(layer: Layer, effect_size: f64, padj: f64) -> Result<Self, ValidationError> {
        if !effect_size.is_finite() || effect_size < 0.0 {
            return Err(ValidationError::InvalidCutoff {
                layer,
                name: "effect size",
                value: effect_size.to_string(),
                reason: "must be a finite, non-negative number",
            });
        }
        if !padj.is_finite() || padj <= 0.0 || padj > 1.0 {
            return Err(ValidationError::InvalidCutoff {
                layer,
                name: "adjusted p-value",
                value: padj.to_string(),
                reason: "must lie in (0, 1]",
            });
        }
        Ok(Self { effect_size, padj })
    }

    /// Builds cutoffs from user-entered text, as typed into a form or CLI.
    pub fn parse(layer: Layer, effect_size: &str, padj: &str) -> Result<Self, ValidationError> {
        let effect = parse_number(layer, "effect size", effect_size)?;
        let padj = parse_number(layer, "adjusted p-value", padj)?;
        Self::new(layer, effect, padj)
    }
}

fn parse_number(layer: Layer, name: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidCutoff {
            layer,
            name,
            value: raw.to_string(),
            reason: "is not a number",
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutoffProfile {
    pub methylation: LayerCutoffs,
    pub rna: LayerCutoffs,
    pub protein: LayerCutoffs,
}

impl CutoffProfile {
    pub fn default_v1() -> Self {
        Self {
            methylation: LayerCutoffs {
                effect_size: 0.1,
                padj: 0.05,
            },
            rna: LayerCutoffs {
                effect_size: 1.0,
                padj: 0.05,
            },
            protein: LayerCutoffs {
                effect_size: 0.5,
                padj: 0.05,
            },
        }
    }

    pub fn get(&self, layer: Layer) -> LayerCutoffs {
        match layer {
            Layer::Methylation => self.methylation,
            Layer::Rna => self.rna,
            Layer::Protein => self.protein,
        }
    }

    pub fn set(&mut self, layer: Layer, cutoffs: LayerCutoffs) {
        match layer {
            Layer::Methylation => self.methylation = cutoffs,
            Layer::Rna => self.rna = cutoffs,
            Layer::Protein => self.protein = cutoffs,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/thresholds.rs"]
mod tests;
