use std::{fs, path::PathBuf};

use crate::domain::RiskLevel;

use super::{render::VerdictView, report::render_report, Notice, SubmissionView};

const BAR_CELLS: i64 = 20;

/// Prints verdicts to stdout and notices to stderr; optionally also writes an
/// HTML report of the verdict panel.
pub struct TerminalView {
    report_path: Option<PathBuf>,
}

impl TerminalView {
    pub fn new(report_path: Option<PathBuf>) -> Self {
        Self { report_path }
    }
}

impl SubmissionView for TerminalView {
    fn show_overlay(&self, visible: bool) {
        if visible {
            eprintln!("Scanning...");
        }
    }

    fn render_verdict(&self, view: &VerdictView) {
        println!("[{}] {}", view.badge, view.title);
        println!("{}", view.subtitle);
        println!("Risk: {} {}", risk_bar(view.risk, view.percent), view.risk_text);
        println!("Subject: {}", view.preview_subject);
        println!("Key indicators:");
        for indicator in &view.indicators {
            println!("  - {indicator}");
        }
        println!("Domains:");
        for domain in &view.domains {
            println!("  - {domain}");
        }

        if let Some(path) = &self.report_path {
            match fs::write(path, render_report(view)) {
                Ok(()) => {
                    tracing::info!(target: "ui", path = %path.display(), "verdict report written")
                }
                Err(err) => tracing::warn!(
                    target: "ui",
                    error = %err,
                    path = %path.display(),
                    "failed to write verdict report"
                ),
            }
        }
    }

    fn notify(&self, notice: &Notice) {
        eprintln!("{notice}");
    }
}

fn risk_bar(risk: RiskLevel, percent: i64) -> String {
    let filled = (percent.clamp(0, 100) * BAR_CELLS / 100) as usize;
    let fill = match risk {
        RiskLevel::Phishing => '#',
        RiskLevel::Safe => '=',
    };
    format!(
        "[{}{}]",
        fill.to_string().repeat(filled),
        " ".repeat(BAR_CELLS as usize - filled)
    )
}
