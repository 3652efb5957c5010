use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Methylation,
    Rna,
    Protein,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Methylation, Layer::Rna, Layer::Protein];

    /// Symbol used for this layer in background formulas.
    pub fn symbol(self) -> char {
        match self {
            Layer::Methylation => 'M',
            Layer::Rna => 'R',
            Layer::Protein => 'P',
        }
    }

    pub fn from_symbol(c: char) -> Option<Layer> {
        match c {
            'M' => Some(Layer::Methylation),
            'R' => Some(Layer::Rna),
            'P' => Some(Layer::Protein),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Methylation => "methylation",
            Layer::Rna => "rna",
            Layer::Protein => "protein",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DirectionalCall {
    Up,
    Down,
    Unchanged,
}

impl DirectionalCall {
    pub fn as_str(self) -> &'static str {
        match self {
            DirectionalCall::Up => "Up",
            DirectionalCall::Down => "Down",
            DirectionalCall::Unchanged => "Unchanged",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DirectionalCall::Up => 0,
            DirectionalCall::Down => 1,
            DirectionalCall::Unchanged => 2,
        }
    }
}

impl fmt::Display for DirectionalCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One gene of one omics layer after normalization.
///
/// `coerced` marks rows whose numeric cells could not be read under the
/// coerce-to-unchanged row policy; those records never classify as
/// significant.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub gene_id: String,
    pub effect_size: f64,
    pub adjusted_p: f64,
    pub coerced: bool,
}

impl LayerRecord {
    pub fn new(gene_id: impl Into<String>, effect_size: f64, adjusted_p: f64) -> Self {
        Self {
            gene_id: gene_id.into(),
            effect_size,
            adjusted_p,
            coerced: false,
        }
    }
}

/// Ordered (methylation, rna, protein) calls for one gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerCalls {
    pub methylation: DirectionalCall,
    pub rna: DirectionalCall,
    pub protein: DirectionalCall,
}

impl LayerCalls {
    pub fn new(
        methylation: DirectionalCall,
        rna: DirectionalCall,
        protein: DirectionalCall,
    ) -> Self {
        Self {
            methylation,
            rna,
            protein,
        }
    }

    pub fn get(&self, layer: Layer) -> DirectionalCall {
        match layer {
            Layer::Methylation => self.methylation,
            Layer::Rna => self.rna,
            Layer::Protein => self.protein,
        }
    }

    pub fn is_unchanged(&self, layer: Layer) -> bool {
        self.get(layer) == DirectionalCall::Unchanged
    }
}
