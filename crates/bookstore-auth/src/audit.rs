//! Audit trail for authentication decisions.
//!
//! Every register, login and lookup attempt produces one [`AuthEvent`]
//! classified by [`AuthOutcome`]. Events are handed to an [`AuditSink`];
//! the default [`TracingAuditSink`] writes them as structured `tracing`
//! records under the `audit` target, so they land in the same console and
//! JSON log files as the rest of the application.
//!
//! Events never carry passwords, hashes or tokens.

use std::fmt;
use std::sync::Mutex;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Register,
    Login,
    Lookup,
    Authorize,
}

impl AuthAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthAction::Register => "register",
            AuthAction::Login => "login",
            AuthAction::Lookup => "lookup",
            AuthAction::Authorize => "authorize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    BadCredentials,
    Duplicate,
    LookupFailure,
    InvalidInput,
    PersistenceFailure,
    InternalFailure,
    Unauthenticated,
    Forbidden,
}

impl AuthOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthOutcome::Success => "success",
            AuthOutcome::BadCredentials => "bad_credentials",
            AuthOutcome::Duplicate => "duplicate",
            AuthOutcome::LookupFailure => "lookup_failure",
            AuthOutcome::InvalidInput => "invalid_input",
            AuthOutcome::PersistenceFailure => "persistence_failure",
            AuthOutcome::InternalFailure => "internal_failure",
            AuthOutcome::Unauthenticated => "unauthenticated",
            AuthOutcome::Forbidden => "forbidden",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success)
    }
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub action: AuthAction,
    pub outcome: AuthOutcome,
    pub username: Option<String>,
    pub user_id: Option<i64>,
}

impl AuthEvent {
    pub fn new(action: AuthAction, outcome: AuthOutcome) -> Self {
        Self {
            action,
            outcome,
            username: None,
            user_id: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Receives audit events. Implementations must not block for long; they run
/// inline with the request.
pub trait AuditSink: Send + Sync + fmt::Debug {
    fn record(&self, event: AuthEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuthEvent) {
        let username = event.username.as_deref().unwrap_or("-");
        if event.outcome.is_success() {
            info!(
                target: "audit",
                action = event.action.as_str(),
                outcome = event.outcome.as_str(),
                username,
                user_id = event.user_id,
                "auth event"
            );
        } else {
            warn!(
                target: "audit",
                action = event.action.as_str(),
                outcome = event.outcome.as_str(),
                username,
                user_id = event.user_id,
                "auth event"
            );
        }
    }
}

/// Keeps events in memory. Useful in tests and for inspecting recent activity.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuthEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuthEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn outcomes(&self) -> Vec<(AuthAction, AuthOutcome)> {
        self.events()
            .into_iter()
            .map(|e| (e.action, e.outcome))
            .collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuthEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
