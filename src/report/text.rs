use crate::report::{CategoryStat, SummaryData, format_f64_6};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Signature Regulatory Clustering Report\n");
    out.push_str("======================================\n\n");

    out.push_str("1. Run settings\n");
    out.push_str(&format!("Background formula: {}\n", data.background_formula));
    out.push_str(&format!("Row policy: {:?}\n", data.row_policy));
    for layer in &data.layers {
        out.push_str(&format!(
            "{}: |effect| >= {}, padj <= {} ({} / {})\n",
            layer.layer,
            layer.cutoffs.effect_size,
            layer.cutoffs.padj,
            layer.effect_column,
            layer.padj_column
        ));
    }
    out.push('\n');

    out.push_str("2. Layers\n");
    for layer in &data.layers {
        out.push_str(&format!(
            "{}: {} genes (up {}, down {}, unchanged {}); {} dropped by join",
            layer.layer,
            layer.genes,
            layer.calls.up,
            layer.calls.down,
            layer.calls.unchanged,
            layer.dropped_by_join
        ));
        if layer.normalize.missing_id_dropped > 0 {
            out.push_str(&format!(
                "; {} rows without gene id",
                layer.normalize.missing_id_dropped
            ));
        }
        if layer.normalize.coerced > 0 {
            out.push_str(&format!(
                "; {} rows coerced to Unchanged",
                layer.normalize.coerced
            ));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str("3. Regulatory categories\n");
    out.push_str(&format!("Genes in all three layers: {}\n", data.shared_genes));
    out.push_str(&format!("Background genes: {}\n", data.background_genes));
    out.push_str(&format!(
        "Dominant categories: {}\n",
        dominant_categories(&data.filtered_categories)
    ));
    for stat in &data.filtered_categories {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            stat.name,
            stat.count,
            format_f64_6(stat.fraction)
        ));
    }

    if !data.warnings.is_empty() {
        out.push_str("\n4. Warnings\n");
        for warning in &data.warnings {
            out.push_str(&format!("{}\n", warning.message()));
        }
    }

    out
}

fn dominant_categories(stats: &[CategoryStat]) -> String {
    let mut sorted = stats
        .iter()
        .filter(|s| s.count > 0 && s.name != "None" && s.name != "Background")
        .collect::<Vec<_>>();
    if sorted.is_empty() {
        return "none".to_string();
    }
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(b.name)));
    sorted
        .iter()
        .take(2)
        .map(|s| format!("{} ({})", s.name, format_f64_6(s.fraction)))
        .collect::<Vec<_>>()
        .join(", ")
}
