use std::io::{self, IsTerminal};

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// How much of the log stream reaches stderr. The file layer always gets
/// everything the env filter lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleOutput {
    pub level: LevelFilter,
    pub ansi: bool,
}

impl ConsoleOutput {
    /// A quiet console only shows warnings, keeping the scan report readable.
    pub fn new(quiet: bool, stderr_is_terminal: bool) -> Self {
        Self {
            level: if quiet { LevelFilter::WARN } else { LevelFilter::TRACE },
            ansi: stderr_is_terminal,
        }
    }

    pub fn detect(quiet: bool) -> Self {
        Self::new(quiet, io::stderr().is_terminal())
    }
}

pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths, console: ConsoleOutput) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, "phishguard.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_ansi(console.ansi)
            .with_filter(console.level);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        tracing::debug!(
            logs = %paths.logs_dir.display(),
            console_level = %console.level,
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}
