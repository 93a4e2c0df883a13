use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sitecache")]
#[command(about = "Inspect the local site cache and merge duplicate cached sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log merge decisions for every duplicate class
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage cached accounts
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Manage cached blogs
    Blog {
        #[command(subcommand)]
        command: BlogCommands,
    },
    /// Manage cached posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },
    /// Merge duplicate cached blogs
    Dedup {
        /// Account ID, ID prefix, or username (all accounts when omitted)
        #[arg(long)]
        account: Option<String>,
        /// Show what would be merged without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show recently committed merges
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or update CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add an account
    Add {
        /// Remote username
        username: String,
    },
    /// List accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum BlogCommands {
    /// Add a cached blog (duplicates are accepted, as a racing sync would)
    Add {
        /// Account ID, ID prefix, or username
        #[arg(long)]
        account: String,
        /// Site id assigned by the remote service
        #[arg(long)]
        remote_id: Option<i64>,
        /// XML-RPC endpoint URL
        #[arg(long)]
        xmlrpc: Option<String>,
        /// Public site URL
        #[arg(long)]
        url: Option<String>,
        /// Site title
        #[arg(long)]
        name: Option<String>,
    },
    /// List an account's cached blogs
    List {
        /// Account ID, ID prefix, or username
        #[arg(long)]
        account: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PostCommands {
    /// Add a post to a cached blog
    Add {
        /// Blog ID or unique ID prefix
        #[arg(long)]
        blog: String,
        /// Post id assigned by the remote service (omit for a local-only draft)
        #[arg(long)]
        remote_id: Option<i64>,
        /// Publication status
        #[arg(long, default_value = "draft")]
        status: String,
        /// Post title
        title: Vec<String>,
    },
    /// List a blog's posts
    List {
        /// Blog ID or unique ID prefix
        #[arg(long)]
        blog: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Persist a default database path
    SetDbPath {
        /// Database file path
        path: PathBuf,
    },
    /// Persist a default log filter (e.g. `sitecache=debug`)
    SetLogFilter {
        /// `tracing` env-filter directive
        filter: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
