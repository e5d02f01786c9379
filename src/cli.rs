use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::{controller::SubmissionForm, storage::history::HISTORY_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "phishguard", version, about = "Scan email content for phishing")]
pub struct Cli {
    /// Show info-level logs on stderr during scans
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Scans print their own report, so routine logs stay off the console.
    pub fn quiet_console(&self) -> bool {
        matches!(self.command, Command::Scan(_)) && !self.verbose
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit an email for classification
    Scan(ScanArgs),
    /// Show locally stored scan history, newest first
    History {
        #[arg(long, default_value_t = HISTORY_LIMIT)]
        limit: usize,
    },
    /// Show the last email stored with --store-local
    Last,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,
    /// Read the body from a file, or from stdin when the path is `-`
    #[arg(long)]
    pub body_file: Option<PathBuf>,
    /// Keep a copy of this email in local storage
    #[arg(long)]
    pub store_local: bool,
    /// Also write the verdict panel as an HTML page
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Keep history and snapshots in memory only for this run
    #[arg(long, conflicts_with = "store_local")]
    pub ephemeral: bool,
}

impl ScanArgs {
    pub fn to_form(&self) -> Result<SubmissionForm> {
        let body = match &self.body_file {
            Some(path) if path.as_os_str() == "-" => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read body from stdin")?;
                Some(text)
            }
            Some(path) => Some(
                fs::read_to_string(path)
                    .with_context(|| format!("failed to read body file {}", path.display()))?,
            ),
            None => self.body.clone(),
        };

        Ok(SubmissionForm {
            subject: self.subject.clone(),
            body,
            store_locally: self.store_local,
        })
    }
}
