//! Advice requests: parse, evaluate, then log.
//!
//! The evaluator never touches storage. This service owns the decision to
//! log, and a failing log never costs the requester their advice.

use std::sync::Arc;

use cropwise_core::{parse_form, AdviceError, AdviceForm, AdviceRequest, AdviceResult, Evaluator, MissingFieldPolicy};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{LogEntryId, UserProfile};
use crate::traits::AdviceLog;

/// What an advice request produced.
#[derive(Debug, Clone, Serialize)]
pub struct AdviceOutcome {
    pub request: AdviceRequest,
    pub result: AdviceResult,

    /// Id of the audit entry, when logging succeeded
    pub log_entry: Option<LogEntryId>,

    /// Why logging failed, when it did
    pub log_error: Option<String>,
}

/// Evaluates advice forms and records them in an [`AdviceLog`].
pub struct AdviceService {
    evaluator: Evaluator,
    log: Arc<dyn AdviceLog>,
    policy: MissingFieldPolicy,
}

impl AdviceService {
    pub fn new(log: Arc<dyn AdviceLog>, policy: MissingFieldPolicy) -> Self {
        Self {
            evaluator: Evaluator::new(),
            log,
            policy,
        }
    }

    pub fn policy(&self) -> MissingFieldPolicy {
        self.policy
    }

    /// Use a different missing-field policy for subsequent requests.
    pub fn with_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse, evaluate and log one form submission.
    ///
    /// Invalid numeric input fails before any rule runs and nothing is logged.
    pub fn advise(&self, user: Option<&UserProfile>, form: &AdviceForm) -> Result<AdviceOutcome, AdviceError> {
        let request = parse_form(form, self.policy).inspect_err(|e| {
            info!(field = %e.field(), "rejected advice form");
        })?;

        let result = self.evaluator.evaluate(&request);
        let user_id = user.map(|u| u.id);

        let (log_entry, log_error) = match self.log.record(user_id, &request, &result) {
            Ok(id) => (Some(id), None),
            Err(e) => {
                warn!(error = %e, "failed to record advice; returning advice anyway");
                (None, Some(e.to_string()))
            }
        };

        Ok(AdviceOutcome {
            request,
            result,
            log_entry,
            log_error,
        })
    }
}
