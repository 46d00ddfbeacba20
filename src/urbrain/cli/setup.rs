use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// "0.3.0" for releases, "0.3.0@abc1234" for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "urbrain", bin_name = "urbrain", version = get_version())]
#[command(about = "Folders, notes and tabs in your terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding data and config (default: $URBRAIN_DATA, then the platform data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, rename, delete and browse folders
    Folder {
        #[command(subcommand)]
        action: FolderCommands,
    },

    /// Create, edit, delete and read notes
    Note {
        #[command(subcommand)]
        action: NoteCommands,
    },

    /// Interactive tab session, one action per line on stdin
    Session,

    /// Check stored data for inconsistencies
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (key-prefix, preview-length, log-level)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },

    /// Delete every folder, note and sticky note
    Clear {
        /// Required, there is no undo
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum FolderCommands {
    /// Create a folder
    Create {
        /// Folder name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Parent folder id or prefix (default: top level)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Rename a folder
    Rename {
        /// Folder id or prefix
        folder: String,

        /// New name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Delete a folder with all its subfolders and notes
    Delete {
        /// Folder id or prefix
        folder: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the folder tree
    #[command(alias = "ls")]
    List,

    /// Print a folder's breadcrumb, subfolders and notes
    Show {
        /// Folder id or prefix
        folder: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Create a note
    Create {
        /// Note title (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        /// Folder id or prefix
        #[arg(long)]
        folder: String,

        /// Note body
        #[arg(long, default_value = "")]
        content: String,
    },

    /// Change a note's title or content
    Edit {
        /// Note id or prefix
        note: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note id or prefix
        note: String,
    },

    /// Print a note
    Show {
        /// Note id or prefix
        note: String,
    },
}
