use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EngineError, ValidationError};
use crate::input::reader::parse_separator;
use crate::model::background::{BackgroundExpr, DEFAULT_BACKGROUND};
use crate::model::layers::Layer;
use crate::model::thresholds::{CutoffProfile, LayerCutoffs};
use crate::pipeline::stage1_normalize::{LayerSchema, RowPolicy};
use crate::pipeline::stage5_report::UNIFIED_COLUMNS;

pub const DEFAULT_PREFIX: &str = "SiRCle";

/// Cutoffs may be written as JSON numbers or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CutoffValue {
    Number(f64),
    Text(String),
}

impl CutoffValue {
    fn as_text(&self) -> String {
        match self {
            CutoffValue::Number(v) => v.to_string(),
            CutoffValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerFileConfig {
    pub path: Option<PathBuf>,
    pub effect_col: Option<String>,
    pub padj_col: Option<String>,
    pub effect_cutoff: Option<CutoffValue>,
    pub padj_cutoff: Option<CutoffValue>,
}

impl LayerFileConfig {
    fn overlay(self, top: LayerFileConfig) -> LayerFileConfig {
        LayerFileConfig {
            path: top.path.or(self.path),
            effect_col: top.effect_col.or(self.effect_col),
            padj_col: top.padj_col.or(self.padj_col),
            effect_cutoff: top.effect_cutoff.or(self.effect_cutoff),
            padj_cutoff: top.padj_cutoff.or(self.padj_cutoff),
        }
    }
}

/// Run configuration as read from JSON or collected from the command line.
/// Every field is optional so the two sources can be layered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub gene_id: Option<String>,
    pub background: Option<String>,
    pub row_policy: Option<RowPolicy>,
    pub sep: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub keep_background_in_flow: Option<bool>,
    pub threads: Option<usize>,
    #[serde(default)]
    pub methylation: LayerFileConfig,
    #[serde(default)]
    pub rna: LayerFileConfig,
    #[serde(default)]
    pub protein: LayerFileConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| EngineError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Values set in `top` win over values set in `self`.
    pub fn overlay(self, top: FileConfig) -> FileConfig {
        FileConfig {
            gene_id: top.gene_id.or(self.gene_id),
            background: top.background.or(self.background),
            row_policy: top.row_policy.or(self.row_policy),
            sep: top.sep.or(self.sep),
            out_dir: top.out_dir.or(self.out_dir),
            prefix: top.prefix.or(self.prefix),
            keep_background_in_flow: top.keep_background_in_flow.or(self.keep_background_in_flow),
            threads: top.threads.or(self.threads),
            methylation: self.methylation.overlay(top.methylation),
            rna: self.rna.overlay(top.rna),
            protein: self.protein.overlay(top.protein),
        }
    }

    fn layer(&self, layer: Layer) -> &LayerFileConfig {
        match layer {
            Layer::Methylation => &self.methylation,
            Layer::Rna => &self.rna,
            Layer::Protein => &self.protein,
        }
    }

    pub fn resolve(self) -> Result<RunSettings, EngineError> {
        let gene_id = self
            .gene_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| missing("gene_id (--gene-id)"))?;
        if UNIFIED_COLUMNS.contains(&gene_id.as_str()) {
            return Err(ValidationError::GeneIdColumnClash(gene_id).into());
        }

        let defaults = CutoffProfile::default_v1();
        let mut cutoffs = defaults;
        let mut resolve_layer = |layer: Layer| -> Result<LayerSettings, EngineError> {
            let cfg = self.layer(layer);
            let flag = cli_prefix(layer);
            let path = cfg
                .path
                .clone()
                .ok_or_else(|| missing(&format!("{layer}.path (--{flag})")))?;
            let effect_col = cfg.effect_col.clone().ok_or_else(|| {
                missing(&format!(
                    "{layer}.effect_col (--{flag}-{}-col)",
                    effect_flag(layer)
                ))
            })?;
            let padj_col = cfg
                .padj_col
                .clone()
                .ok_or_else(|| missing(&format!("{layer}.padj_col (--{flag}-padj-col)")))?;

            let base = defaults.get(layer);
            let effect = cfg
                .effect_cutoff
                .as_ref()
                .map(CutoffValue::as_text)
                .unwrap_or_else(|| base.effect_size.to_string());
            let padj = cfg
                .padj_cutoff
                .as_ref()
                .map(CutoffValue::as_text)
                .unwrap_or_else(|| base.padj.to_string());
            cutoffs.set(layer, LayerCutoffs::parse(layer, &effect, &padj)?);

            Ok(LayerSettings {
                layer,
                path,
                schema: LayerSchema {
                    gene_id_column: gene_id.clone(),
                    effect_column: effect_col,
                    padj_column: padj_col,
                },
            })
        };
        let methylation = resolve_layer(Layer::Methylation)?;
        let rna = resolve_layer(Layer::Rna)?;
        let protein = resolve_layer(Layer::Protein)?;

        let background_text = self
            .background
            .clone()
            .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());
        let background = BackgroundExpr::parse(&background_text)?;

        let sep = match &self.sep {
            Some(raw) => {
                parse_separator(raw).ok_or_else(|| ValidationError::InvalidSeparator(raw.clone()))?
            }
            None => b',',
        };

        Ok(RunSettings {
            gene_id_column: gene_id,
            methylation,
            rna,
            protein,
            cutoffs,
            background,
            row_policy: self.row_policy.unwrap_or_default(),
            sep,
            out_dir: self.out_dir.unwrap_or_else(|| PathBuf::from(".")),
            prefix: self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            keep_background_in_flow: self.keep_background_in_flow.unwrap_or(false),
            threads: self.threads.filter(|&n| n > 0),
        })
    }
}

fn missing(what: &str) -> EngineError {
    ValidationError::MissingSetting(what.to_string()).into()
}

fn cli_prefix(layer: Layer) -> &'static str {
    match layer {
        Layer::Methylation => "meth",
        Layer::Rna => "rna",
        Layer::Protein => "prot",
    }
}

fn effect_flag(layer: Layer) -> &'static str {
    match layer {
        Layer::Methylation => "diff",
        Layer::Rna | Layer::Protein => "logfc",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    pub layer: Layer,
    pub path: PathBuf,
    pub schema: LayerSchema,
}

/// Fully validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub gene_id_column: String,
    pub methylation: LayerSettings,
    pub rna: LayerSettings,
    pub protein: LayerSettings,
    pub cutoffs: CutoffProfile,
    pub background: BackgroundExpr,
    pub row_policy: RowPolicy,
    pub sep: u8,
    pub out_dir: PathBuf,
    pub prefix: String,
    pub keep_background_in_flow: bool,
    pub threads: Option<usize>,
}

impl RunSettings {
    pub fn layer(&self, layer: Layer) -> &LayerSettings {
        match layer {
            Layer::Methylation => &self.methylation,
            Layer::Rna => &self.rna,
            Layer::Protein => &self.protein,
        }
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
