//! Core business logic for the authentication system.

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use validator::Validate;

use crate::auth::models::{
    Access, AccessLevel, AuthSuccess, DenialReason, LoginRequest, RegisterRequest,
    RegistrationOutcome, Role, Session, VerificationOutcome,
};
use crate::auth::token::{SessionClaims, TokenCodec};
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::audit_repository::AuditRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::EmailService;
use crate::store::RecordStore;
use crate::store::models::{AuditAction, AuditEvent, User};
use crate::utils::random::generate_url_safe_token;

/// Verification tokens carry 32 bytes (256 bits) of entropy.
const VERIFY_TOKEN_BYTES: usize = 32;

/// Authentication service handling registration, verification, sign-in,
/// authorization, and the login audit trail.
pub struct AuthService<'a> {
    /// Shared record store
    store: &'a dyn RecordStore,
    config: Config,
    codec: TokenCodec,
    /// SMTP notifier, absent when email is not configured
    email_service: Option<EmailService>,
}

impl<'a> AuthService<'a> {
    /// Creates a new AuthService instance.
    pub fn new(store: &'a dyn RecordStore, config: Config) -> Self {
        let email_service = match config.email_config() {
            Some(email_config) => match EmailService::new(email_config.clone()) {
                Ok(service) => Some(service),
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize email service: {}. Verification email disabled.",
                        e
                    );
                    None
                }
            },
            None => None,
        };

        let codec = TokenCodec::new(&config.session_secret);

        AuthService {
            store,
            config,
            codec,
            email_service,
        }
    }

    /// Registers a new user.
    ///
    /// The first user ever registered becomes admin; everyone after gets the
    /// non-privileged default role. The account starts unverified and a
    /// verification email is attempted; email failure downgrades the outcome
    /// but never the registration itself.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures and duplicate
    /// usernames or email addresses (compared case-insensitively).
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegistrationOutcome> {
        validate_request(&request)?;

        let username = request.username.trim().to_string();
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();

        let repo = UserRepository::new(self.store);
        let users = repo.load_all().await?;

        // The duplicate check and the append below are not atomic; two
        // concurrent registrations with the same username can race
        // (last-writer-wins), matching the store's append-only contract.
        for existing in &users {
            if existing.username.to_lowercase() == username.to_lowercase() {
                return Err(ServiceError::duplicate_username(username));
            }
            if existing.email.to_lowercase() == email.to_lowercase() {
                return Err(ServiceError::duplicate_email(email));
            }
        }

        // First user on an empty table becomes admin.
        let role = if users.is_empty() {
            Role::Admin
        } else {
            Role::Personal
        };

        let password_hash = hash_password(&request.password)?;
        let verify_token = generate_url_safe_token(VERIFY_TOKEN_BYTES);

        let user = User {
            row_id: users.len(),
            username: username.clone(),
            name: name.clone(),
            email: email.clone(),
            password_hash,
            role,
            verified: false,
            verify_token: Some(verify_token.clone()),
            created_at: Utc::now().format("%Y-%m-%d %H:%M").to_string(),
        };
        repo.create_user(&user).await?;

        tracing::info!(username = %user.username, role = %role, "user registered");

        match &self.email_service {
            Some(service) => {
                match service
                    .send_verification_email(&email, &name, &verify_token)
                    .await
                {
                    Ok(()) => Ok(RegistrationOutcome::EmailSent { email }),
                    Err(e) => {
                        tracing::warn!(username = %user.username, error = %e, "verification email failed");
                        Ok(RegistrationOutcome::EmailUnavailable {
                            role,
                            reason: e.to_string(),
                        })
                    }
                }
            }
            None => Ok(RegistrationOutcome::EmailUnavailable {
                role,
                reason: "SMTP not configured".to_string(),
            }),
        }
    }

    /// Redeems an email verification token.
    ///
    /// Tokens are single-use: redemption clears the stored token. Redeeming
    /// for an already-verified account is an idempotent success.
    ///
    /// # Errors
    /// `InvalidToken` if no user holds this exact token.
    pub async fn verify_email(&self, token: &str) -> ServiceResult<VerificationOutcome> {
        let repo = UserRepository::new(self.store);
        let user = repo
            .find_by_token(token.trim())
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        if user.verified {
            return Ok(VerificationOutcome::AlreadyVerified);
        }

        repo.set_verified(user.row_id).await?;
        tracing::info!(username = %user.username, "email verified");
        Ok(VerificationOutcome::Verified)
    }

    /// Authenticates a user and issues a session plus its signed token.
    ///
    /// A Login audit event is written best-effort; its failure never blocks
    /// the sign-in.
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown username or wrong password
    /// - `NotVerified` for a known user who has not redeemed their token
    ///   (checked before the password, as the original flow did)
    pub async fn authenticate(&self, request: LoginRequest) -> ServiceResult<AuthSuccess> {
        validate_request(&request)?;

        let repo = UserRepository::new(self.store);
        let user = repo
            .find_by_username(request.username.trim())
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !user.verified {
            return Err(ServiceError::NotVerified);
        }

        if !check_password(&request.password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let expires_at = Utc::now() + self.config.session_ttl();
        let session = Session {
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            expires_at,
            health_unlocked: false,
        };

        let token = self.codec.encode(&SessionClaims {
            sub: session.username.clone(),
            name: session.name.clone(),
            role: session.role,
            exp: expires_at.timestamp(),
        })?;

        self.record_audit(&user, AuditAction::Login).await;
        tracing::info!(username = %user.username, role = %user.role, "signed in");

        Ok(AuthSuccess { session, token })
    }

    /// Rebuilds a session from a persisted signed token (e.g. a cookie found
    /// after an app restart). The health unlock never survives this path.
    ///
    /// # Errors
    /// `InvalidToken` on tamper, malformed structure, or expiry.
    pub fn resume_session(&self, token: &str) -> ServiceResult<Session> {
        let claims = self.codec.decode(token)?;
        Ok(Session {
            username: claims.sub,
            name: claims.name,
            role: claims.role,
            expires_at: chrono::DateTime::from_timestamp(claims.exp, 0)
                .ok_or(ServiceError::InvalidToken)?,
            health_unlocked: false,
        })
    }

    /// Checks whether `session` may access `level` and slides its expiry
    /// forward on success.
    ///
    /// Expiry is evaluated lazily here; there is no background eviction. The
    /// personal level additionally requires the health unlock — for admins
    /// too. A denial never alters the session.
    pub fn authorize(&self, session: &mut Session, level: AccessLevel) -> Access {
        if session.is_expired() {
            return Access::Denied(DenialReason::SessionExpired);
        }

        let role_allows = match level {
            AccessLevel::Business => matches!(session.role, Role::Admin | Role::Business),
            AccessLevel::Personal => matches!(session.role, Role::Admin | Role::Personal),
        };
        if !role_allows {
            return Access::Denied(DenialReason::InsufficientRole(level));
        }

        if level == AccessLevel::Personal && !session.health_unlocked {
            return Access::Denied(DenialReason::HealthLocked);
        }

        session.touch(self.config.session_ttl());
        Access::Granted
    }

    /// Attempts the secondary health unlock. Exact-match comparison against
    /// the configured shared passphrase; a wrong guess leaves the
    /// authenticated session untouched so the caller can re-prompt.
    pub fn unlock_health(&self, session: &mut Session, passphrase: &str) -> bool {
        if passphrase == self.config.health_password {
            session.health_unlocked = true;
            true
        } else {
            false
        }
    }

    /// Changes a user's password after re-verifying the current one.
    ///
    /// Other active sessions are not revoked; they simply age out.
    ///
    /// # Errors
    /// - `Validation` if the new password is shorter than 8 characters
    /// - `InvalidCredentials` if the user is unknown or the current password
    ///   does not verify
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        if new_password.len() < 8 {
            return Err(ServiceError::validation(
                "Password must be at least 8 characters",
            ));
        }

        let repo = UserRepository::new(self.store);
        let user = repo
            .find_by_username(username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !check_password(current_password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password)?;
        repo.set_password_hash(user.row_id, &new_hash).await?;
        tracing::info!(username = %user.username, "password changed");
        Ok(())
    }

    /// Updates a user's display name.
    pub async fn update_display_name(&self, username: &str, new_name: &str) -> ServiceResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ServiceError::validation("Your name is required"));
        }

        let repo = UserRepository::new(self.store);
        let user = repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::validation(format!("Unknown user: {username}")))?;

        repo.set_name(user.row_id, new_name).await?;
        Ok(())
    }

    /// Ends a session. The Logout audit event is best-effort and this never
    /// fails; clearing the client-side token is the caller's job.
    pub async fn logout(&self, session: Session) {
        let event = AuditEvent {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M").to_string(),
            username: session.username.clone(),
            name: session.name.clone(),
            role: session.role,
            action: AuditAction::Logout,
        };
        if let Err(e) = AuditRepository::new(self.store).append_event(&event).await {
            tracing::warn!(username = %session.username, error = %e, "logout audit write failed");
        }
        tracing::info!(username = %session.username, "signed out");
        // Session dropped here; in-process state is gone.
    }

    /// Writes a login-log entry, swallowing failures.
    async fn record_audit(&self, user: &User, action: AuditAction) {
        let event = AuditEvent {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M").to_string(),
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            action,
        };
        if let Err(e) = AuditRepository::new(self.store).append_event(&event).await {
            tracing::warn!(username = %user.username, error = %e, "audit write failed");
        }
    }
}

/// Hashes a password with bcrypt before storing.
fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ServiceError::validation(format!("Password hashing failed: {e}")))
}

/// Verifies a password against a stored bcrypt hash. A malformed hash
/// verifies as false rather than erroring.
fn check_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

/// Flattens validator errors into one `ServiceError::Validation` message.
fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
    if let Err(validation_errors) = request.validate() {
        let error_messages: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        return Err(ServiceError::validation(error_messages.join(", ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_hash_verifies_as_false() {
        assert!(!check_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn hash_and_check_roundtrip() {
        let hashed = hash_password("correct horse battery staple").unwrap();
        assert!(check_password("correct horse battery staple", &hashed));
        assert!(!check_password("wrong password", &hashed));
    }
}
