//! In-memory doubles for the auth provider and the delay strategy.
//!
//! Compiled into the library so both the unit tests and the `tests/`
//! integration suite can drive the page without a browser.

use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::{AuthEvent, Session, SignUpMetadata};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::delay::Delay;
use crate::error::AuthError;
use crate::provider::{AuthProvider, SessionCallback, SignUpOutcome, Subscription};

/// Session as the provider would report it for `email`
pub fn session_for(email: &str) -> Session {
    Session {
        user_id: format!("user-{}", email),
        email: email.to_string(),
        provider: Some("email".to_string()),
        app_metadata: Map::new(),
        user_metadata: Map::new(),
        access_token: format!("token-{}", email),
        refresh_token: None,
        expires_at: None,
    }
}

/// `session_for` with sign-up metadata filled in
pub fn member_session(email: &str, full_name: &str, role: &str) -> Session {
    let mut session = session_for(email);
    session
        .user_metadata
        .insert("full_name".to_string(), Value::String(full_name.to_string()));
    session
        .user_metadata
        .insert("role".to_string(), Value::String(role.to_string()));
    session
}

/// What the fake has been asked to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderCalls {
    pub session_queries: usize,
    pub redirects: Vec<String>,
    pub password_sign_ins: usize,
    pub sign_ups: Vec<(String, SignUpMetadata)>,
    pub sign_outs: usize,
}

type Subscribers = Rc<RefCell<Vec<(u64, SessionCallback)>>>;

/// Scriptable [`AuthProvider`].
///
/// Successful password sign-in emits `SIGNED_IN` and successful sign-out
/// emits `SIGNED_OUT` on the change feed, the way the hosted service does,
/// unless [`mute_events`](Self::mute_events) was called.
#[derive(Default)]
pub struct FakeAuthProvider {
    current: RefCell<Option<Session>>,
    current_error: RefCell<Option<AuthError>>,
    subscribe_error: RefCell<Option<AuthError>>,
    redirect_error: RefCell<Option<AuthError>>,
    sign_in_result: RefCell<Option<Result<Session, AuthError>>>,
    sign_up_result: RefCell<Option<Result<SignUpOutcome, AuthError>>>,
    sign_out_error: RefCell<Option<AuthError>>,
    muted: RefCell<bool>,
    calls: RefCell<ProviderCalls>,
    subscribers: Subscribers,
    next_subscription: RefCell<u64>,
}

impl FakeAuthProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_session(session: Session) -> Rc<Self> {
        let provider = Self::new();
        *provider.current.borrow_mut() = Some(session);
        provider
    }

    pub fn fail_current_session(&self, message: &str) {
        *self.current_error.borrow_mut() = Some(AuthError::Network(message.to_string()));
    }

    pub fn fail_subscribe(&self, message: &str) {
        *self.subscribe_error.borrow_mut() = Some(AuthError::Network(message.to_string()));
    }

    pub fn fail_redirect(&self, error: AuthError) {
        *self.redirect_error.borrow_mut() = Some(error);
    }

    pub fn fail_sign_out(&self, error: AuthError) {
        *self.sign_out_error.borrow_mut() = Some(error);
    }

    /// Without a scripted result, sign-in succeeds with `session_for(email)`
    pub fn set_sign_in_result(&self, result: Result<Session, AuthError>) {
        *self.sign_in_result.borrow_mut() = Some(result);
    }

    /// Without a scripted result, sign-up succeeds with no session
    pub fn set_sign_up_result(&self, result: Result<SignUpOutcome, AuthError>) {
        *self.sign_up_result.borrow_mut() = Some(result);
    }

    /// Stop emitting change-feed events from sign-in and sign-out
    pub fn mute_events(&self) {
        *self.muted.borrow_mut() = true;
    }

    pub fn calls(&self) -> ProviderCalls {
        self.calls.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver one change-feed event to every subscriber, in order
    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        *self.current.borrow_mut() = session.clone();
        let callbacks: Vec<SessionCallback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(event.clone(), session.clone());
        }
    }

    fn emit_unless_muted(&self, event: AuthEvent, session: Option<Session>) {
        if *self.muted.borrow() {
            *self.current.borrow_mut() = session;
        } else {
            self.emit(event, session);
        }
    }
}

#[async_trait(?Send)]
impl AuthProvider for FakeAuthProvider {
    async fn get_current_session(&self) -> Result<Option<Session>, AuthError> {
        self.calls.borrow_mut().session_queries += 1;
        if let Some(err) = self.current_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.current.borrow().clone())
    }

    fn subscribe(&self, callback: SessionCallback) -> Result<Subscription, AuthError> {
        if let Some(err) = self.subscribe_error.borrow().clone() {
            return Err(err);
        }
        let id = {
            let mut next = self.next_subscription.borrow_mut();
            *next += 1;
            *next
        };
        self.subscribers.borrow_mut().push((id, callback));

        let subscribers = Rc::downgrade(&self.subscribers);
        Ok(Subscription::new(id, move || {
            if let Some(subscribers) = subscribers.upgrade() {
                subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        }))
    }

    async fn sign_in_with_redirect(&self, provider: &str, _redirect_to: &str) -> Result<(), AuthError> {
        self.calls.borrow_mut().redirects.push(provider.to_string());
        match self.redirect_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn sign_up_with_password(
        &self,
        email: &str,
        _password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUpOutcome, AuthError> {
        self.calls
            .borrow_mut()
            .sign_ups
            .push((email.to_string(), metadata.clone()));
        let result = self
            .sign_up_result
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(SignUpOutcome::default()));
        if let Ok(SignUpOutcome { session: Some(session) }) = &result {
            self.emit_unless_muted(AuthEvent::SignedIn, Some(session.clone()));
        }
        result
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        self.calls.borrow_mut().password_sign_ins += 1;
        let result = self
            .sign_in_result
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(session_for(email)));
        if let Ok(session) = &result {
            self.emit_unless_muted(AuthEvent::SignedIn, Some(session.clone()));
        }
        result
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.calls.borrow_mut().sign_outs += 1;
        if let Some(err) = self.sign_out_error.borrow().clone() {
            return Err(err);
        }
        self.emit_unless_muted(AuthEvent::SignedOut, None);
        Ok(())
    }
}

/// [`Delay`] that returns at once and records what it was asked to wait
#[derive(Default)]
pub struct RecordingDelay {
    recorded: RefCell<Vec<Duration>>,
    on_sleep: RefCell<Option<Box<dyn Fn(Duration)>>>,
}

impl RecordingDelay {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Run `hook` at the moment each sleep starts
    pub fn on_sleep(&self, hook: impl Fn(Duration) + 'static) {
        *self.on_sleep.borrow_mut() = Some(Box::new(hook));
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.recorded.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.recorded.borrow_mut().push(duration);
        if let Some(hook) = self.on_sleep.borrow().as_ref() {
            hook(duration);
        }
    }
}
