//! Admin CLI: run the server and manage user accounts.
//!
//! User accounts have no HTTP registration endpoint; they are provisioned
//! here, out of band.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::auth;
use crate::config;
use crate::database::{queries, schema, DatabaseManager};

#[derive(Parser)]
#[command(name = "cpadmin")]
#[command(about = "Admin CLI for the client-project API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Port to listen on (defaults to configuration)")]
        port: Option<u16>,
    },

    #[command(about = "User account management")]
    User {
        #[command(subcommand)]
        cmd: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Add {
        #[arg(help = "Username, unique across accounts")]
        username: String,
        #[arg(help = "Password, stored as a salted hash")]
        password: String,
    },

    #[command(about = "List user accounts")]
    List,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config::config().server.port);
            crate::server::serve(port).await
        }
        Commands::User { cmd } => user_command(cmd).await,
    }
}

async fn user_command(cmd: UserCommands) -> Result<()> {
    let pool = DatabaseManager::pool()
        .await
        .context("failed to connect to database")?;
    schema::ensure_schema(&pool)
        .await
        .context("failed to bootstrap schema")?;

    match cmd {
        UserCommands::Add { username, password } => {
            let username = username.trim();
            if username.is_empty() {
                bail!("username must not be empty");
            }
            if password.is_empty() {
                bail!("password must not be empty");
            }
            if queries::find_user_by_username(&pool, username).await?.is_some() {
                bail!("user '{}' already exists", username);
            }

            let user =
                queries::insert_user(&pool, username, &auth::hash_password(&password)).await?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        UserCommands::List => {
            for user in queries::list_users(&pool).await? {
                println!("{}\t{}", user.id, user.username);
            }
        }
    }

    Ok(())
}
