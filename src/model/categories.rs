use std::fmt;

use serde::{Serialize, Serializer};

/// Regulatory mechanism label assigned to a gene.
///
/// `NoRegulation` renders as `None`. `Background` is a sentinel that only
/// appears in the filtered category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegulationCategory {
    Mds,
    MdsTmde,
    Mde,
    MdeTmds,
    Tmde,
    Tmds,
    Tpde,
    TpdeTmds,
    Tpds,
    TpdsTmde,
    NoRegulation,
    Background,
}

impl RegulationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RegulationCategory::Mds => "MDS",
            RegulationCategory::MdsTmde => "MDS_TMDE",
            RegulationCategory::Mde => "MDE",
            RegulationCategory::MdeTmds => "MDE_TMDS",
            RegulationCategory::Tmde => "TMDE",
            RegulationCategory::Tmds => "TMDS",
            RegulationCategory::Tpde => "TPDE",
            RegulationCategory::TpdeTmds => "TPDE_TMDS",
            RegulationCategory::Tpds => "TPDS",
            RegulationCategory::TpdsTmde => "TPDS_TMDE",
            RegulationCategory::NoRegulation => "None",
            RegulationCategory::Background => "Background",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RegulationCategory::Mds => "methylation-driven suppression",
            RegulationCategory::MdsTmde => {
                "methylation-driven suppression with translation/modification-driven protein enhancement"
            }
            RegulationCategory::Mde => "methylation-driven enhancement",
            RegulationCategory::MdeTmds => {
                "methylation-driven enhancement with translation/modification-driven protein suppression"
            }
            RegulationCategory::Tmde => "translation/protein-modification-driven enhancement",
            RegulationCategory::Tmds => "translation/protein-modification-driven suppression",
            RegulationCategory::Tpde => "transcription/processing-driven enhancement",
            RegulationCategory::TpdeTmds => {
                "transcription/processing-driven enhancement with protein suppression"
            }
            RegulationCategory::Tpds => "transcription/processing-driven suppression",
            RegulationCategory::TpdsTmde => {
                "transcription/processing-driven suppression with protein enhancement"
            }
            RegulationCategory::NoRegulation => "no informative concordance",
            RegulationCategory::Background => "background gene",
        }
    }

    /// Fixed histogram colour; `None` and `Background` are never plotted.
    pub fn colour(self) -> Option<&'static str> {
        match self {
            RegulationCategory::Mds => Some("#d8419b"),
            RegulationCategory::MdsTmde => Some("#e585c0"),
            RegulationCategory::Mde => Some("#6aaf44"),
            RegulationCategory::MdeTmds => Some("#0e8e6d"),
            RegulationCategory::Tmde => Some("#fe2323"),
            RegulationCategory::Tmds => Some("#2952ff"),
            RegulationCategory::Tpde => Some("#e68e25"),
            RegulationCategory::TpdeTmds => Some("#844c0f"),
            RegulationCategory::Tpds => Some("#462d76"),
            RegulationCategory::TpdsTmde => Some("#9b29b7"),
            RegulationCategory::NoRegulation | RegulationCategory::Background => None,
        }
    }
}

impl fmt::Display for RegulationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RegulationCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Display order of the ten plotted categories.
pub fn display_order() -> &'static [RegulationCategory] {
    &[
        RegulationCategory::Mds,
        RegulationCategory::MdsTmde,
        RegulationCategory::Mde,
        RegulationCategory::MdeTmds,
        RegulationCategory::Tmde,
        RegulationCategory::Tmds,
        RegulationCategory::Tpde,
        RegulationCategory::TpdeTmds,
        RegulationCategory::Tpds,
        RegulationCategory::TpdsTmde,
    ]
}

/// Every label the mapper may return, in report order.
pub fn taxonomy() -> &'static [RegulationCategory] {
    &[
        RegulationCategory::Mds,
        RegulationCategory::MdsTmde,
        RegulationCategory::Mde,
        RegulationCategory::MdeTmds,
        RegulationCategory::Tmde,
        RegulationCategory::Tmds,
        RegulationCategory::Tpde,
        RegulationCategory::TpdeTmds,
        RegulationCategory::Tpds,
        RegulationCategory::TpdsTmde,
        RegulationCategory::NoRegulation,
    ]
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/categories.rs"]
mod tests;
