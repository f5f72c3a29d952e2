//! Match client. All calls to the matching backend go through here.
//!
//! Each `MatchRequest` maps onto exactly one endpoint. No retries, no deduplication,
//! no cancellation: one request in, one result or one error out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{backend_message, MatchError};
use crate::session::{ImageFile, MatchRequest};

/// Anything that can execute a built request. The console holds it as
/// `Arc<dyn MatchBackend>`; tests swap in scripted doubles.
#[async_trait]
pub trait MatchBackend: Send + Sync {
    async fn send(&self, request: &MatchRequest) -> Result<Value, MatchError>;
}

/// HTTP implementation against the matching service.
#[derive(Clone)]
pub struct HttpMatchClient {
    client: Client,
    base_url: String,
}

impl HttpMatchClient {
    /// `timeout: None` leaves calls unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, MatchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(builder.build()?, base_url))
    }

    /// Wraps an already configured `reqwest` client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl MatchBackend for HttpMatchClient {
    async fn send(&self, request: &MatchRequest) -> Result<Value, MatchError> {
        let url = self.url(request.endpoint());
        let builder = self.client.post(&url);

        let builder = match request {
            MatchRequest::Text(body) => builder.json(body),
            MatchRequest::MultiText(body) => builder.json(body),
            MatchRequest::Image {
                resume,
                job,
                threshold,
            } => builder.multipart(
                Form::new()
                    .part("resume_file", image_part(resume)?)
                    .part("job_file", image_part(job)?)
                    .text("threshold", threshold.to_string()),
            ),
            MatchRequest::MultiImage {
                resumes,
                job,
                threshold,
            } => {
                let mut form = Form::new();
                for resume in resumes {
                    form = form.part("resume_files", image_part(resume)?);
                }
                builder.multipart(
                    form.part("job_file", image_part(job)?)
                        .text("threshold", threshold.to_string()),
                )
            }
        };

        debug!("POST {url}");
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = backend_message(status.as_u16(), &body);
            warn!("Matching backend returned {status}: {message}");
            return Err(MatchError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        debug!("POST {url} succeeded");
        Ok(payload)
    }
}

fn image_part(image: &ImageFile) -> Result<Part, MatchError> {
    Part::bytes(image.bytes.to_vec())
        .file_name(image.name.clone())
        .mime_str(&image.content_type)
        .map_err(|_| MatchError::InvalidImage(image.name.clone()))
}
