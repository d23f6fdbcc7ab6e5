use crate::utils::logger::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sp-rest")]
#[command(about = "Browse and manage SharePoint folders, files and list items over REST")]
pub struct CliConfig {
    /// Site url, e.g. https://contoso.sharepoint.com/sites/dev
    #[arg(long, env = "SP_SITE_URL")]
    pub site_url: Option<String>,

    #[arg(long, env = "SP_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// TOML profile; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List sub folders (of the web when no path is given)
    Folders {
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        top: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },
    /// Show a folder's properties
    Info {
        #[arg(long)]
        path: String,
    },
    /// List the files in a folder
    Files {
        #[arg(long)]
        path: String,
    },
    ItemCount {
        #[arg(long)]
        path: String,
    },
    /// Create a folder; absolute when NAME starts with '/'
    Add {
        #[arg(long)]
        parent: Option<String>,
        name: String,
    },
    Delete {
        #[arg(long)]
        path: String,
        #[arg(long, default_value = "*")]
        etag: String,
    },
    /// Move a folder to the recycle bin
    Recycle {
        #[arg(long)]
        path: String,
    },
    /// Print a file's contents
    Cat {
        #[arg(long)]
        path: String,
    },
}
