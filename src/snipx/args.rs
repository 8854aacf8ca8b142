use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snipx", version)]
#[command(about = "Store code snippets and run them with pluggable execution modes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new snippet
    #[command(alias = "n")]
    Add {
        /// Name of the snippet (bumped to name_1, name_2... if taken)
        name: String,

        /// Code of the snippet (read from --file or stdin if omitted)
        code: Option<String>,

        /// Execution mode
        #[arg(short, long)]
        mode: Option<String>,

        /// Category
        #[arg(short, long)]
        category: Option<String>,

        /// Read the code from a file
        #[arg(short, long, conflicts_with = "code")]
        file: Option<PathBuf>,
    },

    /// List snippets
    #[command(alias = "ls")]
    List {
        /// Sort order: name, created or edited, with optional -asc/-desc
        #[arg(long)]
        sort: Option<String>,

        /// Fuzzy name search
        #[arg(short, long)]
        search: Option<String>,

        /// Only snippets in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only snippets with this execution mode
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Show one or more snippets
    #[command(alias = "v")]
    Show {
        /// Snippet names or ids
        #[arg(required = true, num_args = 1..)]
        snippets: Vec<String>,
    },

    /// Rename a snippet
    #[command(alias = "mv")]
    Rename { snippet: String, new_name: String },

    /// Replace a snippet's code
    #[command(alias = "e")]
    Edit {
        snippet: String,

        /// New code (read from --file or stdin if omitted)
        #[arg(long)]
        code: Option<String>,

        /// Read the code from a file
        #[arg(short, long, conflicts_with = "code")]
        file: Option<PathBuf>,
    },

    /// Set a snippet's execution mode ("None" clears it)
    Mode { snippet: String, mode: String },

    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Pin one or more snippets
    #[command(alias = "p")]
    Pin {
        #[arg(required = true, num_args = 1..)]
        snippets: Vec<String>,
    },

    /// Unpin one or more snippets
    #[command(alias = "u")]
    Unpin {
        #[arg(required = true, num_args = 1..)]
        snippets: Vec<String>,
    },

    /// Delete one or more snippets
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        snippets: Vec<String>,
    },

    /// Copy one or more snippets under new names
    #[command(alias = "dup")]
    Duplicate {
        #[arg(required = true, num_args = 1..)]
        snippets: Vec<String>,
    },

    /// Run a snippet with its execution mode
    #[command(alias = "r")]
    Run { snippet: String },

    /// Work with the unsaved draft snippet
    #[command(subcommand)]
    Draft(DraftCommands),

    /// Import files as snippets
    Import {
        /// Files or directories
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,

        /// Execution mode for every imported file (guessed from the extension otherwise)
        #[arg(short, long)]
        mode: Option<String>,

        /// Category for every imported file
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Export snippets as a JSON bundle (all of them if none given)
    Export {
        snippets: Vec<String>,

        /// Write the bundle to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add the snippets of a JSON bundle
    Paste {
        /// Read the bundle from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List registered execution modes
    Modes,

    /// Print a snippet's code with its imports expanded
    Resolve { snippet: String },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. name_max_length)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    #[command(alias = "ls")]
    List,

    /// Create a category
    Add { name: String },

    /// Rename a category; its snippets follow
    Rename { old: String, new: String },

    /// Delete a category
    #[command(alias = "rm")]
    Delete {
        name: String,

        /// Delete the category's snippets too (otherwise they keep no category)
        #[arg(long)]
        with_snippets: bool,
    },

    /// Put a snippet in a category, creating it if needed
    Set { snippet: String, category: String },

    /// Remove a snippet from its category
    Clear { snippet: String },
}

#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// Show the draft
    Show,

    /// Replace the draft's code
    Set {
        /// New code (read from --file or stdin if omitted)
        code: Option<String>,

        #[arg(short, long, conflicts_with = "code")]
        file: Option<PathBuf>,
    },

    /// Set the draft's execution mode
    Mode { mode: String },

    /// Run the draft
    Run,

    /// Save the draft as a snippet and clear its code
    Save {
        name: String,

        #[arg(short, long)]
        category: Option<String>,
    },
}
