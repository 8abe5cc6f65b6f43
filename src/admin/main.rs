//! Blogsite admin CLI entry point.
//!
//! Operator commands against the same storage the server uses. Settings are
//! read from the environment (and `.env`) exactly as the server reads them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use blogsite::backend::auth::accounts::{ensure_admin, reset_password, set_admin_by_username, EnsureAdmin};
use blogsite::backend::server::Settings;
use blogsite::backend::storage::Storage;
use blogsite::shared::user::Credentials;

/// Blogsite operator tool
#[derive(Debug, Parser)]
#[command(name = "blogsite-admin", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an admin account, or promote an existing one and reset its password
    CreateAdmin {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "BLOGSITE_ADMIN_PASSWORD")]
        password: String,
    },
    /// Grant or revoke admin rights
    SetAdmin {
        username: String,
        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },
    /// Replace a user's password
    ResetPassword {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "BLOGSITE_ADMIN_PASSWORD")]
        password: String,
    },
    /// List all accounts
    ListUsers,
    /// Connect with the configured settings and report what was selected
    Check,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env().context("Failed to load settings")?;
    let storage = Storage::connect(&settings).await.context("Failed to open storage")?;

    match cli.command {
        Command::CreateAdmin { username, password } => {
            let credentials = Credentials::new(&username, &password)?;
            match ensure_admin(storage.users(), &credentials, true).await? {
                EnsureAdmin::Created(user) => println!("Created admin {}", user.username),
                EnsureAdmin::Promoted(user) => println!("Promoted {} to admin and set the password", user.username),
                EnsureAdmin::PasswordReset(user) => println!("{} is already an admin; password reset", user.username),
                EnsureAdmin::Unchanged(user) => println!("{} is already an admin", user.username),
            }
        }
        Command::SetAdmin { username, revoke } => {
            let user = set_admin_by_username(storage.users(), &username, !revoke).await?;
            let role = if user.is_admin { "admin" } else { "regular user" };
            println!("{} is now a {}", user.username, role);
        }
        Command::ResetPassword { username, password } => {
            let user = reset_password(storage.users(), &username, &password).await?;
            println!("Password reset for {}", user.username);
        }
        Command::ListUsers => {
            let users = storage.users().find_all().await?;
            println!("{:<38} {:<24} {:<6} CREATED", "ID", "USERNAME", "ADMIN");
            for user in users {
                println!(
                    "{:<38} {:<24} {:<6} {}",
                    user.id,
                    user.username,
                    user.is_admin,
                    user.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Check => {
            let users = storage.users().find_all().await?;
            let posts = storage.posts().find_all().await?;
            println!("environment: {}", settings.environment);
            println!("backend:     {}", storage.kind());
            println!("users:       {} ({} admin)", users.len(), users.iter().filter(|u| u.is_admin).count());
            println!("posts:       {}", posts.len());
        }
    }

    Ok(())
}
