use std::{process::ExitCode, sync::Arc};

use anyhow::Result;
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;

use crate::{
    cli::{Command, ScanArgs},
    config::AppConfig,
    controller::{SubmissionController, SubmitOutcome},
    domain::HistoryEntry,
    fallback::HttpFormSubmitter,
    infrastructure::directories::ResolvedPaths,
    predict::PredictClient,
    storage::{FileStore, LocalHistory, MemoryStore},
    ui::TerminalView,
};

const FALLBACK_PAGE: &str = "fallback.html";

pub struct PhishGuardApp {
    config: Arc<AppConfig>,
    paths: ResolvedPaths,
    http: Client,
    history: LocalHistory,
}

impl PhishGuardApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("phishguard-rust/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let history = LocalHistory::new(Arc::new(FileStore::new(&paths.storage_path)));

        Ok(Self {
            config: Arc::new(config),
            paths,
            http,
            history,
        })
    }

    pub async fn run(self, command: Command) -> Result<ExitCode> {
        match command {
            Command::Scan(args) => self.scan(args).await,
            Command::History { limit } => {
                self.print_history(limit)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Last => {
                match self.history.last_email()? {
                    Some(snapshot) => {
                        println!("Subject: {}", snapshot.subject);
                        println!();
                        println!("{}", snapshot.body);
                    }
                    None => println!("No email stored locally."),
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    async fn scan(&self, args: ScanArgs) -> Result<ExitCode> {
        let form = args.to_form()?;
        let endpoint = &self.config.endpoint;

        let predict = PredictClient::new(
            self.http.clone(),
            endpoint.predict_url()?,
            endpoint.request_timeout,
        );
        let submitter = HttpFormSubmitter::new(
            self.http.clone(),
            endpoint.form_action_url()?,
            self.paths.data_dir.join(FALLBACK_PAGE),
            endpoint.request_timeout,
        );
        let history = if args.ephemeral {
            LocalHistory::new(Arc::new(MemoryStore::new()))
        } else {
            self.history.clone()
        };
        let controller = SubmissionController::new(
            Arc::new(predict),
            Arc::new(submitter),
            history,
            Arc::new(TerminalView::new(args.report.clone())),
        );

        let outcome = controller.handle_submit(&form).await;
        tracing::debug!(target: "app", ?outcome, "submission finished");
        Ok(match outcome {
            SubmitOutcome::Rendered(_) => ExitCode::SUCCESS,
            SubmitOutcome::FellBack => {
                println!(
                    "Submitted via classic form; result page saved to {}",
                    self.paths.data_dir.join(FALLBACK_PAGE).display()
                );
                ExitCode::SUCCESS
            }
            SubmitOutcome::Rejected(_) | SubmitOutcome::ServerError(_) => ExitCode::FAILURE,
        })
    }

    fn print_history(&self, limit: usize) -> Result<()> {
        let tz: Tz = self.config.timezone.parse().unwrap_or(chrono_tz::UTC);
        let entries = self.history.entries()?;
        if entries.is_empty() {
            println!("No scans recorded yet.");
            return Ok(());
        }
        for entry in entries.iter().take(limit) {
            println!("{}", format_history_line(entry, &tz));
        }
        Ok(())
    }
}

fn format_history_line(entry: &HistoryEntry, tz: &Tz) -> String {
    let when = Utc
        .timestamp_millis_opt(entry.timestamp)
        .single()
        .map(|ts| ts.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| entry.timestamp.to_string());
    let subject = if entry.subject.is_empty() {
        "(no subject)"
    } else {
        entry.subject.as_str()
    };
    format!("{when}  [{}]  {subject}", entry.verdict)
}
