//! # Auth Action Handlers
//!
//! User-triggered auth operations. Each one calls the provider, reports the
//! outcome through a single toast, and returns the error (if any) to the
//! caller after the user has been told about it.
//!
//! Successful email sign-in and sign-up with an immediate session finish
//! with the dashboard redirect: close login, close signup, settle, open the
//! dashboard.

use shared::{ModalId, NotificationKind, SignUpMetadata};
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};

use crate::delay::Delay;
use crate::error::AuthError;
use crate::page::Page;
use crate::provider::{provider_display_name, AuthProvider};
use crate::session::SessionMachine;

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Signup successful. Please check your email to confirm your account.";
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Logged in successfully!";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
pub const SIGN_OUT_FAILED_MESSAGE: &str = "Failed to sign out";

const EMAIL_METHOD: &str = "email";

pub struct AuthActions {
    provider: Rc<dyn AuthProvider>,
    machine: Rc<SessionMachine>,
    page: Rc<Page>,
    delay: Rc<dyn Delay>,
    redirect_to: String,
    settle: Duration,
}

impl AuthActions {
    pub fn new(
        provider: Rc<dyn AuthProvider>,
        machine: Rc<SessionMachine>,
        page: Rc<Page>,
        delay: Rc<dyn Delay>,
        redirect_to: impl Into<String>,
        settle: Duration,
    ) -> Self {
        Self {
            provider,
            machine,
            page,
            delay,
            redirect_to: redirect_to.into(),
            settle,
        }
    }

    /// Ask the provider to navigate away to `provider`'s sign-in page.
    /// The session, if any, comes back later through the change feed.
    pub async fn sign_in_with_provider_redirect(&self, provider: &str) -> Result<(), AuthError> {
        let label = provider_display_name(provider);

        if !self.machine.methods().allows_provider(provider) {
            let err = AuthError::MethodDisabled(provider.to_string());
            warn!("Rejected redirect sign-in: {}", err);
            self.page.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        }

        info!("Requesting {} sign-in redirect to {}", label, self.redirect_to);
        match self.provider.sign_in_with_redirect(provider, &self.redirect_to).await {
            Ok(()) => {
                self.page
                    .notify(format!("Redirecting to {}...", label), NotificationKind::Info);
                Ok(())
            }
            Err(e) => {
                warn!("{} sign-in failed: {}", label, e);
                self.page
                    .notify(format!("Failed to sign in with {}", label), NotificationKind::Error);
                Err(e)
            }
        }
    }

    pub async fn sign_up_with_email_password(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<(), AuthError> {
        self.require_email_method()?;

        info!("Signing up {}", email);
        match self.provider.sign_up_with_password(email, password, metadata).await {
            Ok(outcome) => {
                self.page.notify(SIGNUP_SUCCESS_MESSAGE, NotificationKind::Success);
                if outcome.session.is_some() {
                    self.redirect_to_dashboard().await;
                }
                Ok(())
            }
            Err(e) => {
                warn!("Sign-up failed for {}: {}", email, e);
                self.page
                    .notify(e.user_message(SIGNUP_FAILED_MESSAGE), NotificationKind::Error);
                Err(e)
            }
        }
    }

    pub async fn sign_in_with_email_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.require_email_method()?;

        info!("Signing in {}", email);
        match self.provider.sign_in_with_password(email, password).await {
            Ok(_) => {
                self.page.notify(LOGIN_SUCCESS_MESSAGE, NotificationKind::Success);
                self.redirect_to_dashboard().await;
                Ok(())
            }
            Err(e) => {
                warn!("Sign-in failed for {}: {}", email, e);
                self.page
                    .notify(e.user_message(LOGIN_FAILED_MESSAGE), NotificationKind::Error);
                Err(e)
            }
        }
    }

    /// On failure the session state is left as it was
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        info!("Signing out");
        match self.provider.sign_out().await {
            Ok(()) => {
                self.machine.apply(None);
                Ok(())
            }
            Err(e) => {
                warn!("Sign-out failed: {}", e);
                self.page
                    .notify(e.user_message(SIGN_OUT_FAILED_MESSAGE), NotificationKind::Error);
                Err(e)
            }
        }
    }

    pub async fn redirect_to_dashboard(&self) {
        self.page.close_modal(ModalId::Login);
        self.page.close_modal(ModalId::Signup);
        self.delay.sleep(self.settle).await;
        self.page.open_modal(ModalId::Dashboard);
    }

    fn require_email_method(&self) -> Result<(), AuthError> {
        if self.machine.methods().email_password {
            return Ok(());
        }
        let err = AuthError::MethodDisabled(EMAIL_METHOD.to_string());
        warn!("Rejected email sign-in: {}", err);
        self.page.notify(err.to_string(), NotificationKind::Error);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignInMethods;
    use crate::session::SessionState;
    use crate::testing::{session_for, FakeAuthProvider, RecordingDelay};

    struct Fixture {
        provider: Rc<FakeAuthProvider>,
        page: Rc<Page>,
        machine: Rc<SessionMachine>,
        delay: Rc<RecordingDelay>,
        actions: AuthActions,
    }

    fn fixture(methods: SignInMethods) -> Fixture {
        let provider = FakeAuthProvider::new();
        let page = Page::standard();
        let machine = SessionMachine::new(provider.clone(), page.clone(), methods);
        let delay = RecordingDelay::new();
        let actions = AuthActions::new(
            provider.clone(),
            machine.clone(),
            page.clone(),
            delay.clone(),
            "https://food.example/",
            Duration::from_millis(300),
        );
        Fixture { provider, page, machine, delay, actions }
    }

    fn toast(page: &Page) -> Option<(String, NotificationKind)> {
        page.read()
            .notifications
            .current()
            .map(|n| (n.message.clone(), n.kind))
    }

    #[tokio::test]
    async fn test_redirect_sign_in_success() {
        let f = fixture(SignInMethods::default());

        f.actions.sign_in_with_provider_redirect("github").await.unwrap();

        assert_eq!(f.provider.calls().redirects, vec!["github".to_string()]);
        assert_eq!(
            toast(&f.page),
            Some(("Redirecting to GitHub...".to_string(), NotificationKind::Info))
        );
        assert_eq!(f.machine.state(), SessionState::Unknown);
    }

    #[tokio::test]
    async fn test_redirect_sign_in_failure() {
        let f = fixture(SignInMethods::default());
        f.provider.fail_redirect(AuthError::Network("offline".to_string()));

        assert!(f.actions.sign_in_with_provider_redirect("github").await.is_err());
        assert_eq!(
            toast(&f.page),
            Some(("Failed to sign in with GitHub".to_string(), NotificationKind::Error))
        );
    }

    #[tokio::test]
    async fn test_disabled_provider_is_not_called() {
        let f = fixture(SignInMethods::default());

        let err = f.actions.sign_in_with_provider_redirect("gitlab").await.unwrap_err();

        assert_eq!(err, AuthError::MethodDisabled("gitlab".to_string()));
        assert!(f.provider.calls().redirects.is_empty());
        assert_eq!(toast(&f.page).map(|t| t.1), Some(NotificationKind::Error));
    }

    #[tokio::test]
    async fn test_disabled_email_method_is_not_called() {
        let f = fixture(SignInMethods { email_password: false, oauth_providers: vec![] });

        let err = f.actions.sign_in_with_email_password("a@b.com", "pw").await.unwrap_err();

        assert_eq!(err, AuthError::MethodDisabled("email".to_string()));
        assert_eq!(f.provider.calls().password_sign_ins, 0);
    }

    #[tokio::test]
    async fn test_sign_in_redirects_to_dashboard() {
        let f = fixture(SignInMethods::default());
        f.page.open_modal(ModalId::Login);
        f.provider.set_sign_in_result(Ok(session_for("a@b.com")));

        f.actions.sign_in_with_email_password("a@b.com", "pw").await.unwrap();

        assert_eq!(toast(&f.page).map(|t| t.0), Some(LOGIN_SUCCESS_MESSAGE.to_string()));
        assert!(!f.page.is_modal_open(ModalId::Login));
        assert!(f.page.is_modal_open(ModalId::Dashboard));
        assert_eq!(f.delay.recorded(), vec![Duration::from_millis(300)]);
    }

    #[tokio::test]
    async fn test_sign_in_failure_uses_provider_message() {
        let f = fixture(SignInMethods::default());
        f.provider
            .set_sign_in_result(Err(AuthError::provider("Invalid login credentials")));

        assert!(f.actions.sign_in_with_email_password("a@b.com", "bad").await.is_err());
        assert_eq!(
            toast(&f.page),
            Some(("Invalid login credentials".to_string(), NotificationKind::Error))
        );
        assert!(!f.page.is_modal_open(ModalId::Dashboard));
    }

    #[tokio::test]
    async fn test_sign_up_without_session_stays_put() {
        let f = fixture(SignInMethods::default());
        f.page.open_modal(ModalId::Signup);

        f.actions
            .sign_up_with_email_password("new@b.com", "pw", &SignUpMetadata::default())
            .await
            .unwrap();

        assert_eq!(toast(&f.page).map(|t| t.0), Some(SIGNUP_SUCCESS_MESSAGE.to_string()));
        assert!(f.page.is_modal_open(ModalId::Signup));
        assert!(f.delay.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_failure_falls_back_to_generic_message() {
        let f = fixture(SignInMethods::default());
        f.provider
            .set_sign_up_result(Err(AuthError::Provider { message: None }));

        assert!(f
            .actions
            .sign_up_with_email_password("new@b.com", "pw", &SignUpMetadata::default())
            .await
            .is_err());
        assert_eq!(toast(&f.page).map(|t| t.0), Some(SIGNUP_FAILED_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_sign_out_success_clears_session() {
        let f = fixture(SignInMethods::default());
        f.machine.apply(Some(session_for("a@b.com")));
        f.provider.mute_events();

        f.actions.sign_out().await.unwrap();

        assert_eq!(f.machine.state(), SessionState::Unauthenticated);
        assert_eq!(f.page.read().navigation.buttons[0].caption, "Login");
    }
}
