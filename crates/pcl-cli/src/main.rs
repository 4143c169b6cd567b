//! PCL - turn local changes into a Jira issue or a commit message
//!
//! ## Commands
//!
//! - `branches`: list local branches usable as a base
//! - `issue`: generate, validate and create a Jira issue for the change set
//! - `commit-message`: generate a commit message for the change set
//!
//! Logs go to stderr; stdout carries only the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pcl_core::config::{Config, DEFAULT_CONFIG_PATH};
use pcl_core::{
    list_branches, run_commit_message_pipeline, run_issue_pipeline, CommitMessageOutcome,
    IssueOutcome, IssueRun,
};
use pcl_remote::{JiraClient, JiraConfig, OpenAiClient, OpenAiConfig};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "pcl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn local git changes into Jira issues and commit messages", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, env = "PCL_CONFIG", default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List local branches
    Branches {
        /// Repository directory
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },

    /// Create a Jira issue describing the changes since the base branch
    Issue {
        /// Base branch to compare against
        #[arg(short, long)]
        base: String,

        /// Validate the generated issue and print it without creating it
        #[arg(long)]
        dry_run: bool,

        /// Repository directory
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },

    /// Generate a commit message for the changes since the base branch
    CommitMessage {
        /// Base branch to compare against
        #[arg(short, long)]
        base: String,

        /// Repository directory
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    pcl_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Branches { repo } => cmd_branches(&repo),
        Commands::Issue {
            base,
            dry_run,
            repo,
        } => cmd_issue(&cli.config, repo, base, dry_run).await,
        Commands::CommitMessage { base, repo } => {
            cmd_commit_message(&cli.config, &repo, &base).await
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

fn cmd_branches(repo: &Path) -> Result<()> {
    let branches = list_branches(repo).context("Failed to list branches")?;
    for branch in branches {
        println!("{branch}");
    }
    Ok(())
}

async fn cmd_issue(config_path: &Path, repo: PathBuf, base: String, dry_run: bool) -> Result<()> {
    let cfg = load_config(config_path)?;
    cfg.validate_for_jira().context("Invalid configuration")?;

    let generator =
        OpenAiClient::new(OpenAiConfig::from(&cfg)).context("Failed to build OpenAI client")?;
    let tracker = JiraClient::new(JiraConfig::from(&cfg)).context("Failed to build Jira client")?;

    let run = IssueRun {
        repo_dir: repo,
        candidate_base: base,
        project_key: cfg.jira_project.clone(),
        dry_run,
    };

    let outcome = run_issue_pipeline(&run, &generator, &tracker)
        .await
        .context("Issue generation failed")?;

    match outcome {
        IssueOutcome::NoChanges { base } => {
            info!(base = %base, "no changes to compare");
        }
        IssueOutcome::NoIssue { base } => {
            info!(base = %base, "changes are cosmetic, no issue created");
        }
        IssueOutcome::Drafted { payload, .. } => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        IssueOutcome::Created { payload, issue, .. } => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            println!("Created {}", issue.key);
        }
    }

    Ok(())
}

async fn cmd_commit_message(config_path: &Path, repo: &Path, base: &str) -> Result<()> {
    let cfg = load_config(config_path)?;
    cfg.validate_for_ai().context("Invalid configuration")?;

    let generator =
        OpenAiClient::new(OpenAiConfig::from(&cfg)).context("Failed to build OpenAI client")?;

    match run_commit_message_pipeline(repo, base, &generator)
        .await
        .context("Commit message generation failed")?
    {
        CommitMessageOutcome::NoChanges { base } => {
            info!(base = %base, "no changes to compare");
        }
        CommitMessageOutcome::Message { message, .. } => println!("{message}"),
    }

    Ok(())
}
