use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client,
};
use url::Url;

use crate::domain::{ClassificationResult, SubmissionInput};

use super::{
    protocol::{check_response, FallbackReason, PredictOutcome, PredictRequest, JSON_CONTENT_TYPE},
    ClassificationEndpoint,
};

#[derive(Clone)]
pub struct PredictClient {
    http: Client,
    url: Url,
    timeout: Option<Duration>,
}

impl PredictClient {
    pub fn new(http: Client, url: Url, timeout: Option<Duration>) -> Self {
        Self { http, url, timeout }
    }

    pub async fn predict(&self, input: &SubmissionInput) -> PredictOutcome {
        tracing::info!(target: "predict", url = %self.url, "attempting classification request");
        match self.try_predict(input).await {
            Ok(data) => PredictOutcome::Success(data),
            Err(reason) => {
                tracing::warn!(
                    target: "predict",
                    url = %self.url,
                    reason = %reason,
                    "classification request unusable; falling back"
                );
                PredictOutcome::Fallback(reason)
            }
        }
    }

    async fn try_predict(&self, input: &SubmissionInput) -> Result<ClassificationResult, FallbackReason> {
        let mut request = self
            .http
            .post(self.url.clone())
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .json(&PredictRequest::from(input));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|err| FallbackReason::from_transport(&err))?;

        let status = response.status();
        tracing::info!(target: "predict", status = status.as_u16(), "classification response received");

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        check_response(status, &content_type)?;

        let payload = response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| FallbackReason::from_transport(&err))?;
        Ok(ClassificationResult::from_payload(payload))
    }
}

impl ClassificationEndpoint for PredictClient {
    fn classify<'a>(&'a self, input: &'a SubmissionInput) -> BoxFuture<'a, PredictOutcome> {
        Box::pin(self.predict(input))
    }
}
