use super::*;
use crate::input::RawRow;
use std::path::PathBuf;

fn schema() -> LayerSchema {
    LayerSchema {
        gene_id_column: "gene".to_string(),
        effect_column: "logFC".to_string(),
        padj_column: "padj".to_string(),
    }
}

fn raw(layer: Layer, rows: &[[&str; 3]]) -> RawTable {
    RawTable {
        layer,
        path: PathBuf::from("mem.csv"),
        headers: vec!["gene".to_string(), "logFC".to_string(), "padj".to_string()],
        rows: rows
            .iter()
            .enumerate()
            .map(|(i, r)| RawRow {
                line: i as u64 + 2,
                cells: r.iter().map(|c| c.to_string()).collect(),
            })
            .collect(),
    }
}

#[test]
fn test_normalize_basic() {
    let t = raw(Layer::Rna, &[["A", "1.5", "0.01"], ["B", " -2 ", "1"]]);
    let out = normalize_layer(&t, &schema(), RowPolicy::FailFast).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out.records[0], LayerRecord::new("A", 1.5, 0.01));
    assert_eq!(out.position("B"), Some(1));
    assert_eq!(out.records[1].effect_size, -2.0);
    assert_eq!(out.position("C"), None);
    assert_eq!(out.stats.rows_read, 2);
}

#[test]
fn test_missing_column_reported_before_rows() {
    let t = raw(Layer::Protein, &[["A", "x", "y"]]);
    let mut s = schema();
    s.padj_column = "FDR".to_string();
    match normalize_layer(&t, &s, RowPolicy::FailFast) {
        Err(EngineError::Validation(ValidationError::MissingColumn {
            layer,
            column,
            available,
        })) => {
            assert_eq!(layer, Layer::Protein);
            assert_eq!(column, "FDR");
            assert_eq!(available.len(), 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(validate_schema(&t, &s).is_err());
    assert!(validate_schema(&t, &schema()).is_ok());
}

#[test]
fn test_empty_table() {
    let t = raw(Layer::Methylation, &[]);
    assert!(matches!(
        normalize_layer(&t, &schema(), RowPolicy::FailFast),
        Err(EngineError::Validation(ValidationError::EmptyTable { .. }))
    ));

    let headerless = RawTable {
        layer: Layer::Rna,
        path: PathBuf::from("empty.csv"),
        headers: Vec::new(),
        rows: Vec::new(),
    };
    assert!(matches!(
        validate_schema(&headerless, &schema()),
        Err(ValidationError::EmptyTable { .. })
    ));
}

#[test]
fn test_missing_ids_dropped() {
    let t = raw(Layer::Rna, &[["", "1", "0.01"], ["  ", "1", "0.01"], ["C", "0", "1"]]);
    let out = normalize_layer(&t, &schema(), RowPolicy::FailFast).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out.stats.missing_id_dropped, 2);
}

#[test]
fn test_all_ids_missing_is_empty() {
    let t = raw(Layer::Rna, &[["", "1", "0.01"]]);
    assert!(matches!(
        normalize_layer(&t, &schema(), RowPolicy::FailFast),
        Err(EngineError::Validation(ValidationError::EmptyTable { .. }))
    ));
}

#[test]
fn test_duplicate_gene_id_is_error() {
    let t = raw(Layer::Rna, &[["A", "1", "0.01"], ["A", "2", "0.02"]]);
    match normalize_layer(&t, &schema(), RowPolicy::FailFast) {
        Err(EngineError::Validation(ValidationError::DuplicateGeneId { gene_id, line, .. })) => {
            assert_eq!(gene_id, "A");
            assert_eq!(line, 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_fail_fast_on_malformed_row() {
    let t = raw(Layer::Protein, &[["A", "1", "0.01"], ["B", "NA", "0.01"]]);
    match normalize_layer(&t, &schema(), RowPolicy::FailFast) {
        Err(EngineError::MalformedRow(err)) => {
            assert_eq!(err.layer, Layer::Protein);
            assert_eq!(err.gene_id, "B");
            assert_eq!(err.column, "logFC");
            assert_eq!(err.value, "NA");
            assert_eq!(err.line, 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_out_of_range_p_value_is_malformed() {
    for bad in ["1.5", "-0.1", "nan", "inf", ""] {
        let t = raw(Layer::Rna, &[["A", "1", bad]]);
        match normalize_layer(&t, &schema(), RowPolicy::FailFast) {
            Err(EngineError::MalformedRow(err)) => assert_eq!(err.column, "padj"),
            other => panic!("unexpected result for {bad:?}: {other:?}"),
        }
    }
}

#[test]
fn test_coerce_policy_keeps_row() {
    let t = raw(Layer::Rna, &[["A", "oops", "0.01"], ["B", "3", "0.01"]]);
    let out = normalize_layer(&t, &schema(), RowPolicy::CoerceUnchanged).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.records[0].coerced);
    assert_eq!(out.records[0].adjusted_p, 1.0);
    assert!(!out.records[1].coerced);
    assert_eq!(out.stats.coerced, 1);
}

#[test]
fn test_table_from_records_rejects_duplicates() {
    let ok = layer_table_from_records(
        Layer::Rna,
        vec![LayerRecord::new("a", 1.0, 0.01), LayerRecord::new("b", 1.0, 0.01)],
    )
    .unwrap();
    assert_eq!(ok.len(), 2);
    assert!(
        layer_table_from_records(
            Layer::Rna,
            vec![LayerRecord::new("a", 1.0, 0.01), LayerRecord::new("a", 1.0, 0.01)],
        )
        .is_err()
    );
}
