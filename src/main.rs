// src/main.rs
// =============================================================================
// This is the entry point of the docs-source CLI.
//
// What happens here:
// 1. Set up logging (DOCS_SOURCE_LOG controls verbosity, output on stderr)
// 2. Parse command-line arguments using clap
// 3. Build the GraphQL client from the configuration
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = found, 1 = nothing found, 2 = error)
// =============================================================================

mod badge;   // src/badge/ - ref badge rendering
mod cli;     // src/cli.rs - command-line parsing
mod config;  // src/config.rs - runtime configuration
mod error;   // src/error.rs - GraphQL layer errors
mod github;  // src/github/ - GitHub queries

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use badge::{RefBadge, RefContext, SourceType};
use cli::{Cli, Commands};
use config::Config;
use github::{GraphQlClient, SourceDescriptor};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("DOCS_SOURCE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = something was found
//   Ok(1) = nothing found
//   Err   = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = Config::from_args(&cli.global)?;

    match cli.command {
        Commands::Paths { repository, dir, json } => {
            let client = GraphQlClient::new(&config)?;
            let dir = dir.unwrap_or_else(|| config.layout.content_root.clone());
            handle_paths(&client, &repository, &dir, json).await
        }
        Commands::PullRequest { owner, repository, number, json } => {
            let client = GraphQlClient::new(&config)?;
            handle_pull_request(&client, &owner, &repository, &number, json).await
        }
        Commands::Contents { owner, repository, path, git_ref, pull_request, json } => {
            let client = GraphQlClient::new(&config)?;
            let source =
                SourceDescriptor::resolve(&client, owner, repository, path, git_ref, pull_request).await;
            handle_contents(&client, &source, json).await
        }
        Commands::Badge { owner, repository, git_ref, source_type } => {
            handle_badge(&owner, &repository, &git_ref, source_type)
        }
    }
}

// Handles the 'paths' subcommand
async fn handle_paths(client: &GraphQlClient, repository: &str, dir: &str, json: bool) -> Result<i32> {
    info!("Discovering pages in {} under {}", repository, dir);

    let slugs = github::discover_paths(client, repository, dir).await;

    if json {
        print_json(&slugs)?;
    } else {
        for slug in &slugs {
            println!("{}", slug);
        }
    }

    Ok(if slugs.is_empty() { 1 } else { 0 })
}

// Handles the 'pull-request' subcommand
async fn handle_pull_request(
    client: &GraphQlClient,
    owner: &str,
    repository: &str,
    number: &str,
    json: bool,
) -> Result<i32> {
    let Some(metadata) = github::resolve_pull_request(client, owner, repository, number).await else {
        warn!("Could not resolve pull request {} in {}/{}", number, owner, repository);
        return Ok(1);
    };

    if json {
        print_json(&metadata)?;
    } else {
        println!("{}/{}@{}", metadata.owner, metadata.repository, metadata.git_ref);
    }

    Ok(0)
}

// Handles the 'contents' subcommand
async fn handle_contents(client: &GraphQlClient, source: &SourceDescriptor, json: bool) -> Result<i32> {
    let Some(contents) = github::fetch_contents(client, source).await else {
        warn!("Repository {}/{} not found", source.owner, source.repository);
        return Ok(1);
    };

    if json {
        print_json(&contents)?;
        return Ok(0);
    }

    println!("Repository:  {}/{}", source.owner, source.repository);
    println!("Ref:         {}", source.git_ref);
    println!("Base branch: {}", contents.base_branch);
    println!("Fork:        {}", contents.is_fork);
    println!("Config:      {}", if contents.config.is_some() { "found" } else { "missing" });

    match &contents.md {
        Some(md) => {
            println!();
            println!("{}", md);
        }
        None => println!("Page:        missing ({})", source.path),
    }

    Ok(0)
}

// Handles the 'badge' subcommand
fn handle_badge(owner: &str, repository: &str, git_ref: &str, source_type: SourceType) -> Result<i32> {
    let (_context, receiver) =
        tokio::sync::watch::channel(RefContext::new(owner, repository, git_ref, source_type));

    match RefBadge::new(receiver).render() {
        Some(html) => {
            println!("{}", html);
            Ok(0)
        }
        None => Ok(1),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
