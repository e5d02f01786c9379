use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Client;
use url::Url;

use crate::domain::SubmissionInput;

/// The classic, non-interactive form submission used when the prediction
/// request cannot be completed or understood.
pub trait FormSubmitter: Send + Sync {
    fn submit<'a>(&'a self, input: &'a SubmissionInput) -> BoxFuture<'a, Result<()>>;
}

/// Posts the form fields urlencoded to the page's form action and keeps the
/// server-rendered result page on disk.
pub struct HttpFormSubmitter {
    http: Client,
    action: Url,
    page_path: PathBuf,
    timeout: Option<Duration>,
}

impl HttpFormSubmitter {
    pub fn new(http: Client, action: Url, page_path: PathBuf, timeout: Option<Duration>) -> Self {
        Self {
            http,
            action,
            page_path,
            timeout,
        }
    }

    pub async fn post_form(&self, input: &SubmissionInput) -> Result<()> {
        tracing::info!(target: "fallback", action = %self.action, "submitting classic form");
        let mut request = self.http.post(self.action.clone()).form(&[
            ("subject", input.subject.as_str()),
            ("body", input.body.as_str()),
        ]);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("failed to submit form to {}", self.action))?;
        let status = response.status();
        let page = response.text().await?;

        tokio::fs::write(&self.page_path, page.as_bytes())
            .await
            .with_context(|| format!("failed to save result page {}", self.page_path.display()))?;

        tracing::info!(
            target: "fallback",
            status = status.as_u16(),
            page = %self.page_path.display(),
            "server-rendered result saved"
        );
        Ok(())
    }
}

impl FormSubmitter for HttpFormSubmitter {
    fn submit<'a>(&'a self, input: &'a SubmissionInput) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.post_form(input))
    }
}
