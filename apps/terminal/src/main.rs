//! # Shopfront Terminal
//!
//! The interactive single-terminal storefront.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Terminal                               │
//! │                                                                         │
//! │  main.rs ────► logging, database connection, login page loop           │
//! │                                                                         │
//! │  auth.rs ────► login / register flows                                  │
//! │                                                                         │
//! │  customer.rs ► search, product details, cart, checkout, history        │
//! │                                                                         │
//! │  sales.rs ───► product edits, weekly report, top products              │
//! │                                                                         │
//! │  prompt.rs ──► line-input helpers (all retries live up here)           │
//! │                                                                         │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  shopfront-db ──► repositories + the checkout transaction              │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  SQLite database file                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (RUST_LOG, default `info`)
//! 2. Parse arguments (database path, `--create`)
//! 3. Connect to the database & run migrations
//! 4. Enter the login page loop

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopfront_core::{Role, User};
use shopfront_db::{Database, DbConfig};

mod auth;
mod customer;
mod prompt;
mod sales;

/// Single-terminal retail storefront.
#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about = "Single-terminal retail storefront")]
struct Args {
    /// Path to the SQLite database file
    db: PathBuf,

    /// Create and migrate the database file if it does not exist
    #[arg(long)]
    create: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.create && !args.db.exists() {
        anyhow::bail!(
            "database file not found: {} (pass --create to initialize a new store)",
            args.db.display()
        );
    }

    let db = Database::connect(DbConfig::new(&args.db).create_if_missing(args.create))
        .await
        .with_context(|| format!("opening database {}", args.db.display()))?;

    info!(path = %args.db.display(), "Store opened");
    println!("Connected to {}", args.db.display());

    login_page(&db).await?;

    db.close().await;
    println!("\nThank you for visiting. Goodbye!");
    Ok(())
}

/// The outer menu: login, register or exit.
async fn login_page(db: &Database) -> anyhow::Result<()> {
    loop {
        println!("\n========= Login Page =========");
        println!("1. Login");
        println!("2. Register");
        println!("3. Exit");
        println!("==============================");

        match prompt::prompt("Please enter your choice: ")?.as_str() {
            "1" => {
                if let Some(user) = auth::login(db).await? {
                    run_user(db, &user).await?;
                }
            }
            "2" => {
                if let Some(user) = auth::register(db).await? {
                    run_user(db, &user).await?;
                }
            }
            "3" => return Ok(()),
            _ => println!("\n[x] Invalid input! Please select 1, 2 or 3."),
        }
    }
}

/// Routes a logged-in account to its menu. Customers get a session
/// opened for the visit and closed again at logout.
async fn run_user(db: &Database, user: &User) -> anyhow::Result<()> {
    match user.role {
        Role::Customer => {
            let session = db.sessions().open(user.id).await?;
            let key = session.key();
            customer::customer_menu(db, user, &key).await?;
            db.sessions().close(&key).await?;
        }
        Role::Sales => sales::sales_menu(db, user).await?,
    }
    Ok(())
}
