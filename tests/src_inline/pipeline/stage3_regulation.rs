use super::*;
use crate::model::categories::taxonomy;

const CALLS: [DirectionalCall; 3] = [Up, Down, Unchanged];

fn calls(m: DirectionalCall, r: DirectionalCall, p: DirectionalCall) -> LayerCalls {
    LayerCalls::new(m, r, p)
}

#[test]
fn test_table_is_total_and_in_taxonomy() {
    let mut seen = 0;
    for m in CALLS {
        for r in CALLS {
            for p in CALLS {
                let category = map_category(&calls(m, r, p));
                assert_ne!(category, RegulationCategory::Background);
                assert!(taxonomy().contains(&category), "{category} not in taxonomy");
                seen += 1;
            }
        }
    }
    assert_eq!(seen, 27);
}

#[test]
fn test_table_keys_follow_index() {
    for (idx, ((m, r, p), _)) in REGULATION_TABLE.iter().enumerate() {
        assert_eq!(table_index(&calls(*m, *r, *p)), idx);
    }
}

#[test]
fn test_known_combinations() {
    assert_eq!(map_category(&calls(Up, Up, Up)), RegulationCategory::Tpde);
    assert_eq!(map_category(&calls(Down, Up, Up)), RegulationCategory::Mde);
    assert_eq!(map_category(&calls(Down, Up, Down)), RegulationCategory::MdeTmds);
    assert_eq!(map_category(&calls(Up, Down, Down)), RegulationCategory::Mds);
    assert_eq!(map_category(&calls(Up, Down, Up)), RegulationCategory::MdsTmde);
    assert_eq!(map_category(&calls(Unchanged, Down, Up)), RegulationCategory::TpdsTmde);
    assert_eq!(map_category(&calls(Unchanged, Up, Down)), RegulationCategory::TpdeTmds);
    assert_eq!(map_category(&calls(Up, Unchanged, Up)), RegulationCategory::Tmde);
    assert_eq!(map_category(&calls(Down, Unchanged, Down)), RegulationCategory::Tmds);
    assert_eq!(
        map_category(&calls(Unchanged, Unchanged, Unchanged)),
        RegulationCategory::NoRegulation
    );
}

#[test]
fn test_flat_rna_ignores_methylation() {
    for m in CALLS {
        for p in CALLS {
            assert_eq!(
                map_category(&calls(m, Unchanged, p)),
                map_category(&calls(Unchanged, Unchanged, p))
            );
        }
    }
}

#[test]
fn test_mapping_is_deterministic() {
    let c = calls(Down, Down, Unchanged);
    assert_eq!(map_category(&c), map_category(&c));
}

#[test]
fn test_filtered_category() {
    assert_eq!(
        filtered_category(RegulationCategory::Tpde, true),
        RegulationCategory::Background
    );
    assert_eq!(
        filtered_category(RegulationCategory::Tpde, false),
        RegulationCategory::Tpde
    );
    assert_eq!(
        filtered_category(RegulationCategory::NoRegulation, false),
        RegulationCategory::NoRegulation
    );
}

#[test]
fn test_render_table_tsv() {
    let tsv = render_table_tsv();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 28);
    assert!(lines[0].starts_with("methylation\trna\tprotein\tcategory"));
    assert!(lines[1].starts_with("Up\tUp\tUp\tTPDE\t"));
    assert!(lines[27].starts_with("Unchanged\tUnchanged\tUnchanged\tNone\t"));
}
