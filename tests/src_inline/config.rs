use super::*;

fn layer(path: &str, effect: &str) -> LayerFileConfig {
    LayerFileConfig {
        path: Some(PathBuf::from(path)),
        effect_col: Some(effect.to_string()),
        padj_col: Some("padj".to_string()),
        ..LayerFileConfig::default()
    }
}

fn complete() -> FileConfig {
    FileConfig {
        gene_id: Some("gene".to_string()),
        methylation: layer("m.csv", "diff"),
        rna: layer("r.csv", "logFC"),
        protein: layer("p.csv", "logFC"),
        ..FileConfig::default()
    }
}

#[test]
fn test_resolve_defaults() {
    let s = complete().resolve().unwrap();
    assert_eq!(s.gene_id_column, "gene");
    assert_eq!(s.cutoffs, CutoffProfile::default_v1());
    assert_eq!(s.background.to_string(), DEFAULT_BACKGROUND);
    assert_eq!(s.row_policy, RowPolicy::FailFast);
    assert_eq!(s.sep, b',');
    assert_eq!(s.out_dir, PathBuf::from("."));
    assert_eq!(s.prefix, "SiRCle");
    assert!(!s.keep_background_in_flow);
    assert_eq!(s.threads, None);
    assert_eq!(s.layer(Layer::Rna).path, PathBuf::from("r.csv"));
    assert_eq!(s.methylation.schema.gene_id_column, "gene");
    assert_eq!(s.methylation.schema.effect_column, "diff");
}

#[test]
fn test_overlay_top_wins() {
    let base = FileConfig {
        prefix: Some("from_file".to_string()),
        sep: Some("\\t".to_string()),
        ..complete()
    };
    let mut top = FileConfig {
        prefix: Some("from_cli".to_string()),
        threads: Some(4),
        ..FileConfig::default()
    };
    top.rna.effect_cutoff = Some(CutoffValue::Text("2".to_string()));
    top.protein.path = Some(PathBuf::from("other.csv"));

    let s = base.overlay(top).resolve().unwrap();
    assert_eq!(s.prefix, "from_cli");
    assert_eq!(s.sep, b'\t');
    assert_eq!(s.threads, Some(4));
    assert_eq!(s.cutoffs.rna.effect_size, 2.0);
    assert_eq!(s.cutoffs.rna.padj, 0.05);
    assert_eq!(s.protein.path, PathBuf::from("other.csv"));
    assert_eq!(s.protein.schema.effect_column, "logFC");
}

#[test]
fn test_missing_settings() {
    let mut cfg = complete();
    cfg.gene_id = None;
    match cfg.resolve() {
        Err(EngineError::Validation(ValidationError::MissingSetting(what))) => {
            assert!(what.contains("--gene-id"))
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut cfg = complete();
    cfg.protein.padj_col = None;
    match cfg.resolve() {
        Err(EngineError::Validation(ValidationError::MissingSetting(what))) => {
            assert!(what.contains("--prot-padj-col"))
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let mut cfg = complete();
    cfg.methylation.effect_col = None;
    match cfg.resolve() {
        Err(EngineError::Validation(ValidationError::MissingSetting(what))) => {
            assert!(what.contains("--meth-diff-col"))
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_invalid_cutoff_text() {
    let mut cfg = complete();
    cfg.methylation.padj_cutoff = Some(CutoffValue::Text("five".to_string()));
    assert!(matches!(
        cfg.resolve(),
        Err(EngineError::Validation(ValidationError::InvalidCutoff {
            layer: Layer::Methylation,
            ..
        }))
    ));

    let mut cfg = complete();
    cfg.rna.padj_cutoff = Some(CutoffValue::Number(0.0));
    assert!(cfg.resolve().is_err());
}

#[test]
fn test_bad_background_formula() {
    let mut cfg = complete();
    cfg.background = Some("P|Q".to_string());
    assert!(matches!(
        cfg.resolve(),
        Err(EngineError::ExpressionSyntax(_))
    ));
}

#[test]
fn test_invalid_separator() {
    let mut cfg = complete();
    cfg.sep = Some("||".to_string());
    assert!(matches!(
        cfg.resolve(),
        Err(EngineError::Validation(ValidationError::InvalidSeparator(_)))
    ));
}

#[test]
fn test_gene_id_clashing_with_output_column() {
    for name in ["category", "rna", "filtered_category"] {
        let mut cfg = complete();
        cfg.gene_id = Some(name.to_string());
        match cfg.resolve() {
            Err(EngineError::Validation(ValidationError::GeneIdColumnClash(column))) => {
                assert_eq!(column, name)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    let mut cfg = complete();
    cfg.gene_id = Some("gene_category".to_string());
    assert_eq!(cfg.resolve().unwrap().gene_id_column, "gene_category");
}

#[test]
fn test_zero_threads_means_default_pool() {
    let mut cfg = complete();
    cfg.threads = Some(0);
    assert_eq!(cfg.resolve().unwrap().threads, None);
}

#[test]
fn test_json_config() {
    let json = r#"{
        "gene_id": "gene_name",
        "background": "(P&M)|(P&R)|(M&R)",
        "row_policy": "coerce-unchanged",
        "methylation": {"path": "m.csv", "effect_col": "diff", "padj_col": "padj", "effect_cutoff": 0.2},
        "rna": {"path": "r.csv", "effect_col": "logFC", "padj_col": "padj", "padj_cutoff": "0.01"},
        "protein": {"path": "p.csv", "effect_col": "logFC", "padj_col": "padj"}
    }"#;
    let cfg: FileConfig = serde_json::from_str(json).unwrap();
    assert_eq!(cfg.methylation.effect_cutoff, Some(CutoffValue::Number(0.2)));
    assert_eq!(
        cfg.rna.padj_cutoff,
        Some(CutoffValue::Text("0.01".to_string()))
    );

    let s = cfg.resolve().unwrap();
    assert_eq!(s.row_policy, RowPolicy::CoerceUnchanged);
    assert_eq!(s.cutoffs.methylation.effect_size, 0.2);
    assert_eq!(s.cutoffs.rna.padj, 0.01);
    assert_eq!(s.background.to_string(), "(P&M)|(P&R)|(M&R)");
}

#[test]
fn test_json_rejects_unknown_fields() {
    assert!(serde_json::from_str::<FileConfig>(r#"{"gene": "x"}"#).is_err());
    assert!(serde_json::from_str::<FileConfig>(r#"{"rna": {"file": "x"}}"#).is_err());
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("kira_sircle_no_such_config.json");
    assert!(matches!(
        FileConfig::load(&path),
        Err(EngineError::ConfigFile { .. })
    ));
}
