//! Session reconciler. A submit goes through validation, request construction and
//! the backend call, and the result is folded back into a single live outcome.
//!
//! Phases: `Idle → Submitting → Succeeded | Failed`. A failed validation jumps
//! straight to `Failed`. A mode change or a fresh submit clears the outcome first.
//!
//! Every outcome reset bumps an epoch. Accepted submissions carry the epoch they
//! were issued under, and `complete` drops any response whose epoch is no longer
//! current, so a response that outlives a mode switch cannot overwrite newer state.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{MatchError, SubmitRejected};
#[cfg(test)]
use crate::match_client::MatchBackend;
use crate::session::inputs::{InputAccumulator, Threshold};
use crate::session::mode::Mode;
use crate::session::request::{self, MatchRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// The one live result of the most recent submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pending,
    Success(Value),
    Failure(String),
}

/// Identifies one accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub submission_id: Uuid,
    pub mode: Mode,
}

/// A submission that passed validation and is now `Submitting`.
/// The caller sends `request` and hands the result back with `ticket`.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: Ticket,
    pub request: MatchRequest,
}

#[derive(Debug, Default)]
pub struct SessionState {
    mode: Mode,
    inputs: InputAccumulator,
    threshold: Threshold,
    outcome: Option<Outcome>,
    epoch: u64,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn inputs(&self) -> &InputAccumulator {
        &self.inputs
    }

    /// Input handlers mutate the accumulator directly; outcome state is not reachable from here.
    pub fn inputs_mut(&mut self) -> &mut InputAccumulator {
        &mut self.inputs
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.threshold = threshold;
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn phase(&self) -> Phase {
        match self.outcome {
            None => Phase::Idle,
            Some(Outcome::Pending) => Phase::Submitting,
            Some(Outcome::Success(_)) => Phase::Succeeded,
            Some(Outcome::Failure(_)) => Phase::Failed,
        }
    }

    /// The busy flag: true while a call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Submitting
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Some(Outcome::Success(payload)) => Some(payload),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Failure(message)) => Some(message),
            _ => None,
        }
    }

    /// Changes when the visible panel must be redrawn.
    pub fn render_key(&self) -> (Mode, u64) {
        (self.mode, self.epoch)
    }

    /// Switches mode and clears the outcome. Accumulated input is kept.
    pub fn select_mode(&mut self, mode: Mode) {
        if self.is_busy() {
            info!("Mode changed to {mode} mid-request; the pending response will be dropped");
        }
        self.mode = mode;
        self.reset_outcome();
    }

    fn reset_outcome(&mut self) {
        self.outcome = None;
        self.completed_at = None;
        self.epoch += 1;
    }

    /// Validates and builds the request for the active mode and enters `Submitting`.
    ///
    /// A validation failure becomes the `Failed` outcome without entering `Submitting`.
    /// While another call is outstanding the submit is rejected and nothing changes.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.is_busy() {
            warn!("Submit ignored: a {} request is already in flight", self.mode);
            return Err(SubmitRejected::Busy);
        }

        self.reset_outcome();

        let request = match request::build(self.mode, &self.inputs, &self.threshold) {
            Ok(request) => request,
            Err(failure) => {
                info!("{} submit failed validation: {failure}", self.mode);
                self.fail(failure.to_string());
                return Err(SubmitRejected::Invalid(failure));
            }
        };

        let ticket = Ticket {
            epoch: self.epoch,
            submission_id: Uuid::new_v4(),
            mode: self.mode,
        };
        self.outcome = Some(Outcome::Pending);

        info!(
            "Submission {} → {} (threshold {})",
            ticket.submission_id,
            request.endpoint(),
            self.threshold.raw()
        );
        Ok(Submission { ticket, request })
    }

    /// Folds a backend result into the session. Returns `false` when the ticket is stale
    /// and the result was discarded.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Value, MatchError>) -> bool {
        if ticket.epoch != self.epoch || !self.is_busy() {
            warn!(
                "Discarding stale response for submission {} ({})",
                ticket.submission_id, ticket.mode
            );
            return false;
        }

        match result {
            Ok(payload) => {
                info!("Submission {} succeeded", ticket.submission_id);
                self.outcome = Some(Outcome::Success(payload));
                self.completed_at = Some(Utc::now());
            }
            Err(e) => {
                warn!("Submission {} failed: {e}", ticket.submission_id);
                self.fail(e.to_string());
            }
        }
        true
    }

    fn fail(&mut self, message: String) {
        self.outcome = Some(Outcome::Failure(message));
        self.completed_at = Some(Utc::now());
    }

    /// Runs one full submit cycle inline and returns the phase it settled in.
    /// The console splits this into `begin_submit` and `complete` around a spawned call.
    #[cfg(test)]
    pub async fn submit(&mut self, backend: &dyn MatchBackend) -> Phase {
        let Submission { ticket, request } = match self.begin_submit() {
            Ok(submission) => submission,
            Err(_) => return self.phase(),
        };
        let result = backend.send(&request).await;
        self.complete(ticket, result);
        self.phase()
    }
}
