use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jot", about = concat!("[>] jot v", env!("CARGO_PKG_VERSION"), " - one text box, slash commands"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data file (default: from config, else jot.json)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file (default: jot.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one input line exactly as it would be typed in the chat box
    Exec(ExecArgs),
    /// List stored timeline items, newest first
    List(ListArgs),
    /// List projects
    Projects,
}

#[derive(Args)]
pub struct ExecArgs {
    /// The line; a leading slash makes it a command, anything else is a note
    #[arg(trailing_var_arg = true, required = true)]
    pub line: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Restrict to one item type: task, event or note
    #[arg(long)]
    pub kind: Option<String>,
}
