use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carrel")]
#[command(about = "Keyword-indexed personal library manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory override (also honoured via CARREL_HOME)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an item to the library
    #[command(alias = "a")]
    Add {
        /// Title of the item
        title: String,

        /// Category key (e.g. lecture-notes, paper, reference)
        #[arg(short, long, default_value = "other")]
        category: String,

        /// File path the item catalogues
        #[arg(short, long)]
        path: Option<String>,

        /// Media URL
        #[arg(long)]
        url: Option<String>,

        /// Tags (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Rating, 1 to 5
        #[arg(short, long)]
        rating: Option<u8>,
    },

    /// List all items by title
    #[command(alias = "ls")]
    List,

    /// Ranked keyword search
    #[command(alias = "s")]
    Search {
        /// Query terms
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },

    /// Show one item in full (records the view)
    #[command(alias = "v")]
    Show {
        /// Item number from the listing
        number: usize,
    },

    /// Edit an item's fields
    #[command(alias = "e")]
    Edit {
        /// Item number from the listing
        number: usize,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        rating: Option<u8>,

        /// Tags to add (repeatable)
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,

        /// Tags to remove (repeatable)
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },

    /// Delete an item (and its tasks)
    #[command(alias = "rm")]
    Delete {
        /// Item number from the listing
        number: usize,
    },

    /// Reverse the most recent change
    Undo,

    /// Recently viewed items, newest first
    Recent,

    /// Step back to the previously viewed item
    Back {
        /// Item number you are currently looking at
        number: usize,
    },

    /// Tag usage counts
    Tags,

    /// Manage follow-up tasks
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Import supported files from a directory tree
    Import {
        /// Directory to walk
        dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task against an item
    #[command(alias = "a")]
    Add {
        /// Item number from the listing
        item: usize,

        /// What needs doing
        description: String,

        /// Hours until the deadline (negative for already overdue)
        #[arg(long, default_value_t = 168)]
        due_in: i64,

        /// low, medium, high or urgent
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },

    /// Complete a task
    #[command(alias = "d")]
    Done {
        /// Task number from the task listing
        number: usize,
    },

    /// List tasks by urgency
    #[command(alias = "ls")]
    List,

    /// Show the most urgent task
    Next,
}
