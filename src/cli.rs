use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{CutoffValue, FileConfig, LayerFileConfig};
use crate::pipeline::stage1_normalize::RowPolicy;

#[derive(Parser, Debug)]
#[command(name = "kira-sircle", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence"
    )]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    /// Classify genes from three differential tables and write the results
    #[command(name = "run")]
    Run(RunArgs),
    /// Print the (methylation, rna, protein) to category table
    #[command(name = "categories")]
    Categories,
}

#[derive(Debug, Default, clap::Args)]
pub struct RunArgs {
    #[arg(long = "config", value_name = "FILE", help = "JSON run configuration; flags override it")]
    pub config: Option<PathBuf>,

    #[arg(long = "meth", value_name = "FILE", help = "Differential DNA methylation table")]
    pub meth: Option<PathBuf>,
    #[arg(long = "rna", value_name = "FILE", help = "Differential RNA table")]
    pub rna: Option<PathBuf>,
    #[arg(long = "prot", value_name = "FILE", help = "Differential protein table")]
    pub prot: Option<PathBuf>,

    #[arg(long = "gene-id", value_name = "COL", help = "Gene identifier column shared by all three tables")]
    pub gene_id: Option<String>,

    #[arg(long = "meth-diff-col", value_name = "COL")]
    pub meth_diff_col: Option<String>,
    #[arg(long = "meth-padj-col", value_name = "COL")]
    pub meth_padj_col: Option<String>,
    #[arg(long = "rna-logfc-col", value_name = "COL")]
    pub rna_logfc_col: Option<String>,
    #[arg(long = "rna-padj-col", value_name = "COL")]
    pub rna_padj_col: Option<String>,
    #[arg(long = "prot-logfc-col", value_name = "COL")]
    pub prot_logfc_col: Option<String>,
    #[arg(long = "prot-padj-col", value_name = "COL")]
    pub prot_padj_col: Option<String>,

    #[arg(long = "meth-diff-cutoff", value_name = "X", allow_hyphen_values = true, help = "Default 0.1")]
    pub meth_diff_cutoff: Option<String>,
    #[arg(long = "meth-padj-cutoff", value_name = "X", allow_hyphen_values = true, help = "Default 0.05")]
    pub meth_padj_cutoff: Option<String>,
    #[arg(long = "rna-logfc-cutoff", value_name = "X", allow_hyphen_values = true, help = "Default 1.0")]
    pub rna_logfc_cutoff: Option<String>,
    #[arg(long = "rna-padj-cutoff", value_name = "X", allow_hyphen_values = true, help = "Default 0.05")]
    pub rna_padj_cutoff: Option<String>,
    #[arg(long = "prot-logfc-cutoff", value_name = "X", allow_hyphen_values = true, help = "Default 0.5")]
    pub prot_logfc_cutoff: Option<String>,
    #[arg(long = "prot-padj-cutoff", value_name = "X", allow_hyphen_values = true, help = "Default 0.05")]
    pub prot_padj_cutoff: Option<String>,

    #[arg(
        long = "background",
        value_name = "FORMULA",
        help = "Background formula over M, R, P with ~ & | and parentheses [default: P|(M&R)]"
    )]
    pub background: Option<String>,

    #[arg(long = "row-policy", value_enum, help = "Handling of rows with unusable numbers [default: fail-fast]")]
    pub row_policy: Option<RowPolicy>,

    #[arg(long = "sep", value_name = "CHAR", help = "Input field separator [default: ,]")]
    pub sep: Option<String>,

    #[arg(long = "out", value_name = "DIR", help = "Output directory [default: .]")]
    pub out: Option<PathBuf>,

    #[arg(long = "prefix", value_name = "NAME", help = "Output file prefix [default: SiRCle]")]
    pub prefix: Option<String>,

    #[arg(
        long = "keep-background-in-flow",
        overrides_with = "no_keep_background_in_flow",
        help = "Keep background genes in the flow table"
    )]
    pub keep_background_in_flow: bool,

    #[arg(
        long = "no-keep-background-in-flow",
        overrides_with = "keep_background_in_flow",
        help = "Drop background genes from the flow table, even if the config file keeps them"
    )]
    pub no_keep_background_in_flow: bool,

    #[arg(short = 't', long = "threads", value_name = "THREADS", help = "Worker threads for per-gene classification")]
    pub threads: Option<usize>,
}

fn cutoff(raw: &Option<String>) -> Option<CutoffValue> {
    raw.clone().map(CutoffValue::Text)
}

impl RunArgs {
    pub fn to_overrides(&self) -> FileConfig {
        FileConfig {
            gene_id: self.gene_id.clone(),
            background: self.background.clone(),
            row_policy: self.row_policy,
            sep: self.sep.clone(),
            out_dir: self.out.clone(),
            prefix: self.prefix.clone(),
            keep_background_in_flow: match (
                self.keep_background_in_flow,
                self.no_keep_background_in_flow,
            ) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            threads: self.threads,
            methylation: LayerFileConfig {
                path: self.meth.clone(),
                effect_col: self.meth_diff_col.clone(),
                padj_col: self.meth_padj_col.clone(),
                effect_cutoff: cutoff(&self.meth_diff_cutoff),
                padj_cutoff: cutoff(&self.meth_padj_cutoff),
            },
            rna: LayerFileConfig {
                path: self.rna.clone(),
                effect_col: self.rna_logfc_col.clone(),
                padj_col: self.rna_padj_col.clone(),
                effect_cutoff: cutoff(&self.rna_logfc_cutoff),
                padj_cutoff: cutoff(&self.rna_padj_cutoff),
            },
            protein: LayerFileConfig {
                path: self.prot.clone(),
                effect_col: self.prot_logfc_col.clone(),
                padj_col: self.prot_padj_col.clone(),
                effect_cutoff: cutoff(&self.prot_logfc_cutoff),
                padj_cutoff: cutoff(&self.prot_padj_cutoff),
            },
        }
    }
}
