use super::*;

#[test]
fn test_taxonomy_labels() {
    let labels: Vec<&str> = taxonomy().iter().map(|c| c.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "MDS",
            "MDS_TMDE",
            "MDE",
            "MDE_TMDS",
            "TMDE",
            "TMDS",
            "TPDE",
            "TPDE_TMDS",
            "TPDS",
            "TPDS_TMDE",
            "None"
        ]
    );
    assert!(!taxonomy().contains(&RegulationCategory::Background));
}

#[test]
fn test_colours_only_for_plotted_categories() {
    for category in display_order() {
        assert!(category.colour().is_some());
    }
    assert_eq!(RegulationCategory::NoRegulation.colour(), None);
    assert_eq!(RegulationCategory::Background.colour(), None);
    assert_eq!(RegulationCategory::TpdsTmde.colour(), Some("#9b29b7"));
}

#[test]
fn test_serializes_as_label() {
    let json = serde_json::to_string(&[
        RegulationCategory::NoRegulation,
        RegulationCategory::MdeTmds,
    ])
    .unwrap();
    assert_eq!(json, r#"["None","MDE_TMDS"]"#);
    assert_eq!(RegulationCategory::Background.to_string(), "Background");
}
