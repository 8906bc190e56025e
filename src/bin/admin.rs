//! CLI administration tool for snipurl.
//!
//! Manages short links and checks storage without going through the HTTP
//! API. Uses the same configuration and service layer as the server.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (optionally with an alias and expiry in days)
//! cargo run --bin admin -- link create https://example.com/page --alias mylink --expires-in 7
//!
//! # Show a link with click statistics
//! cargo run --bin admin -- link show 42
//!
//! # Delete a link
//! cargo run --bin admin -- link delete 42
//!
//! # Check storage connectivity
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`snipurl::config`].

use snipurl::application::services::CreateUrl;
use snipurl::config::{self, StorageBackend};
use snipurl::server::build_url_service;
use snipurl::state::DynUrlService;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing snipurl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Storage operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Custom alias (3-10 letters or digits)
        #[arg(short, long)]
        alias: Option<String>,

        /// Days until the link expires (default: server setting)
        #[arg(short, long)]
        expires_in: Option<i64>,
    },

    /// Show a link and its click statistics
    Show {
        /// Link id
        id: i64,
    },

    /// Delete a link
    Delete {
        /// Link id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Storage diagnostic subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check storage connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    if config.storage_backend == StorageBackend::Memory {
        println!(
            "{}",
            "Warning: STORAGE_BACKEND=memory, changes are discarded on exit".yellow()
        );
    }

    let service = build_url_service(&config).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &service).await?,
        Commands::Db { action } => handle_db_action(action, &service).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, service: &DynUrlService) -> Result<()> {
    match action {
        LinkAction::Create {
            url,
            alias,
            expires_in,
        } => create_link(service, url, alias, expires_in).await,
        LinkAction::Show { id } => show_link(service, id).await,
        LinkAction::Delete { id, yes } => delete_link(service, id, yes).await,
    }
}

async fn create_link(
    service: &DynUrlService,
    url: String,
    alias: Option<String>,
    expires_in: Option<i64>,
) -> Result<()> {
    println!("{}", "Create short link".bright_blue().bold());
    println!();

    let request = CreateUrl {
        original_url: url,
        custom_alias: alias,
        expires_in_days: expires_in,
    };
    let created = service.create_short_url(request, "").await?;

    println!("{}", "Link created".green().bold());
    println!("  ID:        {}", created.link.id.to_string().bright_black());
    println!("  Short URL: {}", created.short_url.bright_yellow().bold());
    println!("  Target:    {}", created.link.original_url.cyan());
    println!("  Expires:   {}", format_expiry(created.link.expires_at));
    println!();

    Ok(())
}

/// Prints a link with its click statistics.
///
/// # Output Format
///
/// ```text
/// Link 42
///
///   Code:       mylink (alias)
///   Target:     https://example.com/page
///   Created:    2025-01-15 10:30
///   Expires:    never
///   Clicks:     17
///   Last click: 2025-01-20 08:12
/// ```
async fn show_link(service: &DynUrlService, id: i64) -> Result<()> {
    let details = service.get_url_by_id(id).await?;
    let link = details.link;

    println!("{}", format!("Link {id}").bright_blue().bold());
    println!();

    let code = if link.custom_alias.is_some() {
        format!("{} (alias)", link.short_code)
    } else {
        link.short_code.clone()
    };

    println!("  Code:       {}", code.cyan());
    println!("  Short URL:  {}", service.short_url(&link.short_code).bright_yellow());
    println!("  Target:     {}", link.original_url);
    println!(
        "  Created:    {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );

    let expiry = format_expiry(link.expires_at);
    if link.is_expired() {
        println!("  Expires:    {} {}", expiry, "EXPIRED".red());
    } else {
        println!("  Expires:    {}", expiry);
    }

    println!(
        "  Clicks:     {}",
        details.stats.click_count.to_string().bright_green().bold()
    );
    println!(
        "  Last click: {}",
        details
            .stats
            .last_click
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &DynUrlService, id: i64, skip_confirm: bool) -> Result<()> {
    let details = service.get_url_by_id(id).await?;

    println!("{}", "Delete short link".bright_blue().bold());
    println!();
    println!("  Code:   {}", details.link.short_code.cyan());
    println!("  Target: {}", details.link.original_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    service.delete_url(id).await?;

    println!("{}", "Link deleted".green().bold());
    println!();

    Ok(())
}

/// Handles storage diagnostic commands.
async fn handle_db_action(action: DbAction, service: &DynUrlService) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking storage connection...".bright_blue());

            service.storage_health().await?;

            println!("{}", "Storage connection OK".green().bold());
        }
    }

    Ok(())
}

fn format_expiry(expires_at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    expires_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}
