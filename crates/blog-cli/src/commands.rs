use std::path::Path;

use anyhow::Context;
use blog_crypto::SigningKey;
use blog_server::{BlogServer, ServerConfig};
use blog_service::AccountService;
use colored::Colorize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = || load_config(cli.config.as_deref(), cli.data.as_deref());
    match cli.command {
        Command::Serve(args) => cmd_serve(config()?, args),
        Command::InitConfig => cmd_init_config(),
        Command::User(args) => cmd_user(config()?, args.action),
        Command::Posts(args) => cmd_posts(config()?, args),
    }
}

fn load_config(path: Option<&Path>, data: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(data) = data {
        config.data_path = Some(data.to_path_buf());
    }
    Ok(config)
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind.parse().with_context(|| format!("invalid bind address {bind}"))?;
    }
    let server = BlogServer::new(config)?;
    println!(
        "{} blog server on {}",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_init_config() -> anyhow::Result<()> {
    let config = ServerConfig {
        data_path: Some("blog.json".into()),
        signing_key: Some(SigningKey::generate().to_hex()),
        ..ServerConfig::default()
    };
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Opens the configured database for a one-shot admin command.
fn open_offline(config: ServerConfig) -> anyhow::Result<BlogServer> {
    if config.data_path.is_none() {
        eprintln!(
            "{} no --data file configured; changes will not be kept",
            "warning:".yellow().bold()
        );
    }
    Ok(BlogServer::new(config)?)
}

fn cmd_user(config: ServerConfig, action: UserAction) -> anyhow::Result<()> {
    let server = open_offline(config)?;
    let accounts = &server.blog().accounts;
    match action {
        UserAction::Add { username, password, role } => {
            let role = AccountService::parse_role(&role)?;
            let user = accounts.register(&username, &password, role)?;
            println!(
                "{} Registered {} ({}) as #{}",
                "✓".green().bold(),
                user.username.bold(),
                user.role.to_string().cyan(),
                user.id
            );
        }
        UserAction::Delete { username } => {
            let user = accounts.delete_user(&username)?;
            println!("{} Deleted {}", "✓".green().bold(), user.username.bold());
        }
        UserAction::List => {
            let users = accounts.list_users()?;
            if users.is_empty() {
                println!("No users.");
            }
            for user in users {
                println!(
                    "{:>4}  {:<20} {}",
                    user.id.to_string().dimmed(),
                    user.username,
                    user.role.to_string().cyan()
                );
            }
        }
    }
    Ok(())
}

fn cmd_posts(config: ServerConfig, args: PostsArgs) -> anyhow::Result<()> {
    let server = open_offline(config)?;
    let posts = server.blog().posts.list_posts(args.skip, args.limit)?;
    if posts.is_empty() {
        println!("No posts.");
    }
    for post in posts {
        println!(
            "{:>4}  {}  {}",
            post.id.to_string().yellow(),
            post.title.bold(),
            format!("(owner #{})", post.owner_id).dimmed()
        );
    }
    Ok(())
}
