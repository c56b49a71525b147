//! Submission state machine.

use serde::Serialize;
use tracing::debug;

use crate::error::SubmitError;
use crate::order::{MissingRequirement, OrderOutcome};

/// Where the checkout is in the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Some readiness condition is unmet.
    #[default]
    Idle,
    /// Every condition holds; submit is allowed.
    Ready,
    /// A submission is outstanding.
    Submitting,
    /// An order was placed. Terminal.
    Succeeded,
    /// The last attempt failed; the next evaluation returns to `Idle` or `Ready`.
    Failed,
}

/// Gates submission and records its result.
///
/// Transitions:
///
/// ```text
/// Idle <-> Ready -> Submitting -> Succeeded
///                          \-> Failed -> Idle | Ready
/// ```
#[derive(Debug, Clone, Default)]
pub struct SubmissionMachine {
    state: SubmissionState,
    outcome: Option<OrderOutcome>,
    last_failure: Option<SubmitError>,
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn outcome(&self) -> Option<&OrderOutcome> {
        self.outcome.as_ref()
    }

    pub fn last_failure(&self) -> Option<&SubmitError> {
        self.last_failure.as_ref()
    }

    /// Re-derive `Idle`/`Ready` from the current readiness gaps.
    ///
    /// `Submitting` and `Succeeded` are left alone.
    pub fn evaluate(&mut self, missing: &[MissingRequirement]) -> SubmissionState {
        match self.state {
            SubmissionState::Submitting | SubmissionState::Succeeded => {}
            SubmissionState::Idle | SubmissionState::Ready | SubmissionState::Failed => {
                self.state = if missing.is_empty() {
                    SubmissionState::Ready
                } else {
                    SubmissionState::Idle
                };
            }
        }
        self.state
    }

    /// Enter `Submitting` if allowed.
    pub fn begin(&mut self, missing: &[MissingRequirement]) -> Result<(), SubmitError> {
        match self.state {
            SubmissionState::Succeeded => return Err(SubmitError::AlreadySubmitted),
            SubmissionState::Submitting => return Err(SubmitError::InProgress),
            _ => {}
        }
        if self.evaluate(missing) != SubmissionState::Ready {
            return Err(SubmitError::Incomplete(missing.to_vec()));
        }
        debug!("submission started");
        self.state = SubmissionState::Submitting;
        self.last_failure = None;
        Ok(())
    }

    pub fn succeed(&mut self, outcome: OrderOutcome) {
        self.state = SubmissionState::Succeeded;
        self.outcome = Some(outcome);
    }

    pub fn fail(&mut self, err: SubmitError) {
        self.state = SubmissionState::Failed;
        self.last_failure = Some(err);
    }
}
