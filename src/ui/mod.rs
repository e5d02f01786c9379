pub mod render;
pub mod report;
mod terminal;

use std::fmt;

use crate::domain::ValidationError;

pub use render::{render_verdict, VerdictView};
pub use terminal::TerminalView;

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(ValidationError),
    ServerError(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Validation(err) => write!(f, "{err}"),
            Notice::ServerError(msg) => write!(f, "Server error: {msg}"),
        }
    }
}

/// Display surface driven by the submission controller.
///
/// Every update has a no-op default: a surface without a given element
/// simply skips that update.
pub trait SubmissionView: Send + Sync {
    fn show_overlay(&self, _visible: bool) {}

    fn render_verdict(&self, _view: &VerdictView) {}

    fn reveal_verdict_panel(&self) {}

    fn notify(&self, notice: &Notice) {
        tracing::warn!(target: "ui", notice = %notice, "notice dropped by view");
    }
}
