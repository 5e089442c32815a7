use std::sync::Arc;

use bookstore_auth::{AuditSink, AuthAction, AuthError, AuthEvent, AuthOutcome};
use bookstore_core::{MAX_PASSWORD_BYTES, PasswordHasher};
use bookstore_db::{RepositoryError, UserRepository};
use bookstore_models::{NewUser, User, UserRole};
use tracing::instrument;

fn persistence(err: RepositoryError) -> AuthError {
    AuthError::Persistence(err.into())
}

/// Registration, login and user lookup.
///
/// Every call reports exactly one [`AuthEvent`] to the audit sink.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    audit: Arc<dyn AuditSink>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            users,
            hasher,
            audit,
        }
    }

    /// Creates a user with a freshly hashed password.
    ///
    /// Soft-deleted accounts still hold their username.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let result = self.try_register(username, password, role).await;
        self.record(AuthAction::Register, Some(username), &result);
        result
    }

    /// Checks credentials. Unknown usernames and wrong passwords are
    /// indistinguishable to the caller, in both error and timing.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let result = self.try_login(username, password).await;
        self.record(AuthAction::Login, Some(username), &result);
        result
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<User, AuthError> {
        let result = self
            .users
            .find_by_id(id)
            .await
            .map_err(persistence)
            .and_then(|user| user.ok_or(AuthError::NotFound));
        self.record(AuthAction::Lookup, None, &result);
        result
    }

    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<User, AuthError> {
        let result = self
            .users
            .find_by_username(username, false)
            .await
            .map_err(persistence)
            .and_then(|user| user.ok_or(AuthError::NotFound));
        self.record(AuthAction::Lookup, Some(username), &result);
        result
    }

    /// Audits a request whose body was rejected before reaching the service.
    pub fn record_rejected(&self, action: AuthAction) {
        self.audit
            .record(AuthEvent::new(action, AuthOutcome::InvalidInput));
    }

    async fn try_register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let role = role
            .parse::<UserRole>()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if username.is_empty() {
            return Err(AuthError::Validation("username is required".to_string()));
        }

        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Validation(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let existing = self
            .users
            .count_by_username(username)
            .await
            .map_err(persistence)?;
        if existing > 0 {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = self.hasher.hash(password).await?;

        self.users
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await
            .map_err(|err| {
                // Lost a race with a concurrent registration.
                if err.is_conflict() {
                    AuthError::DuplicateUsername
                } else {
                    persistence(err)
                }
            })
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_username(username, false)
            .await
            .map_err(persistence)?;

        let Some(user) = user else {
            self.hasher.verify_dummy(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    fn record(&self, action: AuthAction, username: Option<&str>, result: &Result<User, AuthError>) {
        let event = match result {
            Ok(user) => AuthEvent::new(action, AuthOutcome::Success)
                .with_username(user.username.clone())
                .with_user_id(user.id),
            Err(err) => {
                let event = AuthEvent::new(action, err.outcome());
                match username {
                    Some(username) => event.with_username(username),
                    None => event,
                }
            }
        };
        self.audit.record(event);
    }
}
