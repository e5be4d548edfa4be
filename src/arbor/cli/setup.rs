use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// "0.3.2" when built outside git, "0.3.2@abc1234 2026-10-16" otherwise.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "arbor", bin_name = "arbor", version = get_version())]
#[command(about = "Outline editing from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log engine operations to stderr (ARBOR_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a document with one empty node
    New {
        file: PathBuf,
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Print the outline
    Show {
        file: PathBuf,
        /// Include nodes inside collapsed subtrees
        #[arg(long)]
        all: bool,
        /// Print node ids
        #[arg(long)]
        ids: bool,
    },

    /// Add a node
    Add {
        file: PathBuf,
        text: String,
        #[command(flatten)]
        place: PlaceArgs,
    },

    /// Change a node's text, memo or decorations
    Edit {
        file: PathBuf,
        id: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        memo: Option<String>,
        /// Toggle bold
        #[arg(long)]
        bold: bool,
        /// red, blue, green, orange, purple or none
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete nodes with their subtrees
    #[command(alias = "rm")]
    Delete {
        file: PathBuf,
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Move a node
    #[command(alias = "mv")]
    Move {
        file: PathBuf,
        id: String,
        #[command(flatten)]
        to: MoveArgs,
    },

    /// Copy a subtree and paste it under the same parent
    Duplicate { file: PathBuf, id: String },

    /// Collapse or expand a node
    Collapse { file: PathBuf, id: String },

    /// Expand every node
    ExpandAll { file: PathBuf },

    /// Find nodes whose text contains QUERY, ignoring case
    Search {
        file: PathBuf,
        query: String,
        /// Also search inside collapsed subtrees
        #[arg(long)]
        all: bool,
    },

    /// Export as Markdown or plain text
    Export {
        file: PathBuf,
        /// markdown (md) or text (txt)
        #[arg(short, long, default_value = "markdown")]
        format: String,
        /// Output path, or - for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Copy a subtree to the system clipboard as a tab outline
    Copy { file: PathBuf, id: String },

    /// Validate a document
    Check { file: PathBuf },

    /// Show or change configuration
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
#[group(required = false, multiple = false)]
pub struct PlaceArgs {
    /// As the last child of this node
    #[arg(long, value_name = "ID")]
    pub under: Option<String>,
    /// Right after this node
    #[arg(long, value_name = "ID")]
    pub after: Option<String>,
    /// Right before this node
    #[arg(long, value_name = "ID")]
    pub before: Option<String>,
}

#[derive(Args, Debug, Default)]
#[group(required = true, multiple = false)]
pub struct MoveArgs {
    /// Make it the last child of this node
    #[arg(long, value_name = "ID")]
    pub into: Option<String>,
    /// Place it right before this node
    #[arg(long, value_name = "ID")]
    pub before: Option<String>,
    /// Place it right after this node
    #[arg(long, value_name = "ID")]
    pub after: Option<String>,
    /// Before the previous node on the same level
    #[arg(long)]
    pub up: bool,
    /// After the next node on the same level
    #[arg(long)]
    pub down: bool,
    /// After its parent
    #[arg(long)]
    pub left: bool,
    /// Into the previous sibling
    #[arg(long)]
    pub right: bool,
    /// Under the previous sibling
    #[arg(long)]
    pub indent: bool,
    /// Out to follow its parent
    #[arg(long)]
    pub outdent: bool,
    /// Swap with the previous sibling
    #[arg(long)]
    pub swap_up: bool,
    /// Swap with the next sibling
    #[arg(long)]
    pub swap_down: bool,
}
