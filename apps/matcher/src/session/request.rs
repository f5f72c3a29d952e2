//! Request construction: one parameterized builder for all four modes.

use serde::Serialize;
use tracing::debug;

use crate::errors::ValidationFailure;
use crate::session::inputs::{ImageFile, InputAccumulator, Threshold};
use crate::session::mode::Mode;

/// JSON body for `POST /match-text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMatchBody {
    pub resume_text: String,
    pub job_text: String,
    pub threshold: f64,
}

/// JSON body for `POST /match-text-multiple`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiTextMatchBody {
    pub resume_texts: Vec<String>,
    pub job_text: String,
    pub threshold: f64,
}

/// Exactly one outbound payload, shaped for the mode that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRequest {
    Text(TextMatchBody),
    Image {
        resume: ImageFile,
        job: ImageFile,
        threshold: f64,
    },
    MultiText(MultiTextMatchBody),
    MultiImage {
        resumes: Vec<ImageFile>,
        job: ImageFile,
        threshold: f64,
    },
}

impl MatchRequest {
    pub fn mode(&self) -> Mode {
        match self {
            MatchRequest::Text(_) => Mode::TextMatch,
            MatchRequest::Image { .. } => Mode::ImageMatch,
            MatchRequest::MultiText(_) => Mode::MultiTextMatch,
            MatchRequest::MultiImage { .. } => Mode::MultiImageMatch,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.mode().endpoint()
    }
}

/// Builds the request for `mode` from the current input, or reports what is missing.
///
/// Text fields are sent as-is (empty strings included); the threshold is coerced here
/// and passed through unvalidated.
pub fn build(
    mode: Mode,
    inputs: &InputAccumulator,
    threshold: &Threshold,
) -> Result<MatchRequest, ValidationFailure> {
    let threshold = threshold.value();

    let request = match mode {
        Mode::TextMatch => MatchRequest::Text(TextMatchBody {
            resume_text: inputs.resume_text().to_string(),
            job_text: inputs.job_text().to_string(),
            threshold,
        }),
        Mode::ImageMatch => {
            let (resume, job) = match (inputs.resume_images().first(), inputs.job_image()) {
                (Some(resume), Some(job)) => (resume.clone(), job.clone()),
                _ => return Err(ValidationFailure::MissingImagePair),
            };
            MatchRequest::Image {
                resume,
                job,
                threshold,
            }
        }
        Mode::MultiTextMatch => {
            if inputs.resume_texts().is_empty() {
                return Err(ValidationFailure::MissingResumeTexts);
            }
            MatchRequest::MultiText(MultiTextMatchBody {
                resume_texts: inputs.resume_texts().to_vec(),
                job_text: inputs.job_text().to_string(),
                threshold,
            })
        }
        Mode::MultiImageMatch => {
            let job = match inputs.job_image() {
                Some(job) if !inputs.resume_images().is_empty() => job.clone(),
                _ => return Err(ValidationFailure::MissingMultiImages),
            };
            MatchRequest::MultiImage {
                resumes: inputs.resume_images().to_vec(),
                job,
                threshold,
            }
        }
    };

    debug!("Built {} request for {}", mode, request.endpoint());
    Ok(request)
}
