pub mod stage1_normalize;
pub mod stage2_threshold;
pub mod stage3_regulation;
pub mod stage4_assemble;
pub mod stage5_report;

use crate::config::RunSettings;
use crate::error::EngineError;
use crate::input::{RawTable, load_layer_table};
use crate::model::background::BackgroundExpr;
use crate::model::layers::Layer;
use crate::model::thresholds::CutoffProfile;
use crate::report::{CategoryColumn, LayerSummary, SummaryData, ToolMeta, category_stats};
use stage1_normalize::{LayerTable, normalize_layer, validate_schema};
use stage2_threshold::{ClassifiedLayer, run_stage2};
use stage4_assemble::{LayerInput, Stage4Inputs, UnifiedTable, run_stage4};
use stage5_report::{OutputFiles, Stage5Input, write_reports};

#[derive(Debug)]
pub struct RunOutcome {
    pub table: UnifiedTable,
    pub summary: SummaryData,
    pub files: OutputFiles,
}

#[derive(Debug, Clone)]
pub struct ClassifiedLayers {
    pub methylation: ClassifiedLayer,
    pub rna: ClassifiedLayer,
    pub protein: ClassifiedLayer,
}

/// Classifies three normalized tables and joins them into the unified table.
pub fn classify_and_assemble(
    methylation: &LayerTable,
    rna: &LayerTable,
    protein: &LayerTable,
    cutoffs: &CutoffProfile,
    background: &BackgroundExpr,
) -> (UnifiedTable, ClassifiedLayers) {
    let classified = ClassifiedLayers {
        methylation: run_stage2(methylation, cutoffs.methylation),
        rna: run_stage2(rna, cutoffs.rna),
        protein: run_stage2(protein, cutoffs.protein),
    };
    let table = run_stage4(&Stage4Inputs {
        methylation: LayerInput {
            table: methylation,
            classified: &classified.methylation,
        },
        rna: LayerInput {
            table: rna,
            classified: &classified.rna,
        },
        protein: LayerInput {
            table: protein,
            classified: &classified.protein,
        },
        background,
    });
    (table, classified)
}

pub fn run(settings: &RunSettings) -> Result<RunOutcome, EngineError> {
    tracing::info!(formula = %settings.background, "background formula parsed");

    // All three headers are checked before any row is normalized.
    let load = |layer: Layer| -> Result<RawTable, EngineError> {
        let layer_settings = settings.layer(layer);
        let raw = load_layer_table(&layer_settings.path, layer, settings.sep)?;
        validate_schema(&raw, &layer_settings.schema)?;
        Ok(raw)
    };
    let raw_methylation = load(Layer::Methylation)?;
    let raw_rna = load(Layer::Rna)?;
    let raw_protein = load(Layer::Protein)?;

    let methylation = normalize_layer(
        &raw_methylation,
        &settings.methylation.schema,
        settings.row_policy,
    )?;
    let rna = normalize_layer(&raw_rna, &settings.rna.schema, settings.row_policy)?;
    let protein = normalize_layer(&raw_protein, &settings.protein.schema, settings.row_policy)?;

    let (table, classified) = match settings.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()?
            .install(|| {
                classify_and_assemble(
                    &methylation,
                    &rna,
                    &protein,
                    &settings.cutoffs,
                    &settings.background,
                )
            }),
        None => classify_and_assemble(
            &methylation,
            &rna,
            &protein,
            &settings.cutoffs,
            &settings.background,
        ),
    };

    let summary = build_summary(settings, [&methylation, &rna, &protein], &classified, &table);
    let files = write_reports(
        &Stage5Input {
            records: &table.records,
            summary: &summary,
            gene_id_column: &settings.gene_id_column,
            prefix: &settings.prefix,
            keep_background_in_flow: settings.keep_background_in_flow,
        },
        &settings.out_dir,
    )?;

    Ok(RunOutcome {
        table,
        summary,
        files,
    })
}

pub fn build_summary(
    settings: &RunSettings,
    tables: [&LayerTable; 3],
    classified: &ClassifiedLayers,
    table: &UnifiedTable,
) -> SummaryData {
    let calls = [&classified.methylation, &classified.rna, &classified.protein];
    let layers = tables
        .iter()
        .zip(calls)
        .map(|(t, layer_classified)| {
            let layer_settings = settings.layer(layer_classified.layer);
            LayerSummary {
                layer: layer_classified.layer,
                path: layer_settings.path.display().to_string(),
                gene_id_column: layer_settings.schema.gene_id_column.clone(),
                effect_column: layer_settings.schema.effect_column.clone(),
                padj_column: layer_settings.schema.padj_column.clone(),
                cutoffs: layer_classified.cutoffs,
                normalize: t.stats,
                genes: t.len(),
                calls: layer_classified.counts,
                dropped_by_join: table.diagnostics.dropped(t.layer),
            }
        })
        .collect();

    SummaryData {
        tool: ToolMeta {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        background_formula: settings.background.to_string(),
        row_policy: settings.row_policy,
        layers,
        shared_genes: table.diagnostics.intersection,
        background_genes: table.diagnostics.background,
        categories: category_stats(&table.records, CategoryColumn::Raw),
        filtered_categories: category_stats(&table.records, CategoryColumn::Filtered),
        warnings: table.diagnostics.warnings.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
