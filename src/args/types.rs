use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::validators::validate;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::utils::path_utils::resolve_user_path;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// INI file holding AWS_REGION, ACCESS_TOKEN and SECRET_KEY
    #[arg(
        short = 'c',
        long,
        value_name = "PATH",
        default_value = DEFAULT_CONFIG_FILE,
        value_parser = resolve_user_path
    )]
    pub config: PathBuf,

    /// Print extra stuff (use -v -v or --verbose --verbose for request details)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the bucket if needed, then upload files under a directory prefix
    Upload {
        /// Target bucket; spaces become hyphens, created when missing
        #[arg(short, long)]
        bucket: String,
        /// Directory (key prefix) to upload into
        #[arg(short, long)]
        dir: String,
        /// Where files are staged before transfer; defaults to the system temp dir
        #[arg(long, value_name = "PATH", value_parser = resolve_user_path)]
        staging_dir: Option<PathBuf>,
        /// Local files to upload
        #[arg(required = true, value_parser = resolve_user_path)]
        files: Vec<PathBuf>,
    },
    /// List the files stored under a directory prefix, with their public links
    List {
        #[arg(short, long)]
        bucket: String,
        #[arg(short, long)]
        dir: String,
    },
    /// Delete a single file (mode 1) or a whole directory prefix (mode 2)
    Delete {
        #[arg(short, long, value_parser = clap::value_parser!(u8))]
        mode: u8,
        #[arg(short, long)]
        bucket: String,
        #[arg(short, long)]
        dir: String,
        /// Full object key, required for mode 1
        #[arg(short = 'k', long)]
        file_key: Option<String>,
    },
    /// List the buckets visible to the configured credentials
    Buckets {
        /// Show creation dates as well as names
        #[arg(long)]
        details: bool,
    },
}

impl Args {
    /// Check combinations clap can't express
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid for the selected command.
    pub fn validate(&self) -> Result<(), String> {
        validate(self)
    }
}
