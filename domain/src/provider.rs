//! # Auth Provider
//!
//! The hosted auth service sits behind this trait so the session machine and
//! the action handlers can run against the real REST client in the browser
//! and against an in-memory fake in tests.

use async_trait::async_trait;
use shared::{AuthEvent, Session, SignUpMetadata};
use std::fmt;
use std::rc::Rc;

use crate::error::AuthError;

/// Change-feed listener: event kind plus the session after the change
pub type SessionCallback = Rc<dyn Fn(AuthEvent, Option<Session>)>;

/// Result of an email/password sign-up
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignUpOutcome {
    /// Present when the service does not require email confirmation
    pub session: Option<Session>,
}

/// Operations the page needs from the hosted auth service
#[async_trait(?Send)]
pub trait AuthProvider {
    /// Session left over from an earlier visit or a completed redirect
    async fn get_current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Register for session changes, delivered in emission order
    fn subscribe(&self, callback: SessionCallback) -> Result<Subscription, AuthError>;

    /// Start a redirect-based sign-in. Success only means the redirect was
    /// requested; the session arrives later through the change feed.
    async fn sign_in_with_redirect(&self, provider: &str, redirect_to: &str) -> Result<(), AuthError>;

    async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Handle for a change-feed registration; dropping it unsubscribes
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(id: u64, cancel: impl FnOnce() + 'static) -> Self {
        Self { id, cancel: Some(Box::new(cancel)) }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Human label for a provider key ("github" -> "GitHub")
pub fn provider_display_name(provider: &str) -> String {
    match provider.to_ascii_lowercase().as_str() {
        "github" => "GitHub".to_string(),
        "gitlab" => "GitLab".to_string(),
        "google" => "Google".to_string(),
        "linkedin" | "linkedin_oidc" => "LinkedIn".to_string(),
        _ => {
            let mut chars = provider.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}
