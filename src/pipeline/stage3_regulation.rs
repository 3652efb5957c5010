//! Mapping of (methylation, rna, protein) calls to a regulatory category.
//!
//! Methylation `Up` is hypermethylation and `Down` hypomethylation. A
//! methylation change opposite in sign to the RNA change explains it (MD*);
//! any other RNA change is transcription/processing driven (TP*); with flat
//! RNA a protein change is translation/modification driven (TM*). A protein
//! change against the RNA direction adds the TMDE/TMDS suffix.

use crate::model::categories::RegulationCategory;
use crate::model::layers::{DirectionalCall, LayerCalls};

use DirectionalCall::{Down, Unchanged, Up};
use RegulationCategory as C;

type Triple = (DirectionalCall, DirectionalCall, DirectionalCall);

/// Keyed by (methylation, rna, protein); row order follows `table_index`.
pub const REGULATION_TABLE: [(Triple, RegulationCategory); 27] = [
    ((Up, Up, Up), C::Tpde),
    ((Up, Up, Down), C::TpdeTmds),
    ((Up, Up, Unchanged), C::Tpde),
    ((Up, Down, Up), C::MdsTmde),
    ((Up, Down, Down), C::Mds),
    ((Up, Down, Unchanged), C::Mds),
    ((Up, Unchanged, Up), C::Tmde),
    ((Up, Unchanged, Down), C::Tmds),
    ((Up, Unchanged, Unchanged), C::NoRegulation),
    ((Down, Up, Up), C::Mde),
    ((Down, Up, Down), C::MdeTmds),
    ((Down, Up, Unchanged), C::Mde),
    ((Down, Down, Up), C::TpdsTmde),
    ((Down, Down, Down), C::Tpds),
    ((Down, Down, Unchanged), C::Tpds),
    ((Down, Unchanged, Up), C::Tmde),
    ((Down, Unchanged, Down), C::Tmds),
    ((Down, Unchanged, Unchanged), C::NoRegulation),
    ((Unchanged, Up, Up), C::Tpde),
    ((Unchanged, Up, Down), C::TpdeTmds),
    ((Unchanged, Up, Unchanged), C::Tpde),
    ((Unchanged, Down, Up), C::TpdsTmde),
    ((Unchanged, Down, Down), C::Tpds),
    ((Unchanged, Down, Unchanged), C::Tpds),
    ((Unchanged, Unchanged, Up), C::Tmde),
    ((Unchanged, Unchanged, Down), C::Tmds),
    ((Unchanged, Unchanged, Unchanged), C::NoRegulation),
];

fn table_index(calls: &LayerCalls) -> usize {
    calls.methylation.index() * 9 + calls.rna.index() * 3 + calls.protein.index()
}

pub fn map_category(calls: &LayerCalls) -> RegulationCategory {
    let (key, category) = REGULATION_TABLE[table_index(calls)];
    debug_assert_eq!(key, (calls.methylation, calls.rna, calls.protein));
    category
}

pub fn filtered_category(category: RegulationCategory, is_background: bool) -> RegulationCategory {
    if is_background {
        RegulationCategory::Background
    } else {
        category
    }
}

/// Tab-separated dump of the full table, one row per call combination.
pub fn render_table_tsv() -> String {
    let mut out = String::from("methylation\trna\tprotein\tcategory\tdescription\n");
    for ((meth, rna, prot), category) in REGULATION_TABLE {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            meth,
            rna,
            prot,
            category,
            category.description()
        ));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_regulation.rs"]
mod tests;
