use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blog", about = "Minimal blog backend", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON database file (overrides the config file)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print a config file with a fresh signing key
    InitConfig,
    /// Manage user accounts
    User(UserArgs),
    /// List posts
    Posts(PostsArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user
    Add {
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long, default_value = "reader")]
        role: String,
    },
    /// Delete a user that owns no posts or comments
    Delete { username: String },
    /// List users
    List,
}

#[derive(Args)]
pub struct PostsArgs {
    #[arg(long, default_value = "0")]
    pub skip: usize,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
