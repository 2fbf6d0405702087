//! # Session State Machine
//!
//! Mirrors the auth provider's notion of "who is signed in" and keeps the
//! auth-dependent part of the page in step with it.
//!
//! ```text
//!   Unknown ──initial query──▶ Authenticated(session) ◀──┐
//!      │                            │  ▲                  │ change feed,
//!      └────────────────────────────┼──┼──────────────────┤ sign-out
//!                                   ▼  │                  │
//!                              Unauthenticated ───────────┘
//! ```
//!
//! Every transition re-renders the auth region from scratch. The machine
//! never builds a [`Session`] itself; it only records what the provider
//! reports.

use shared::{AuthEvent, NotificationKind, Session};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};

use crate::config::SignInMethods;
use crate::navigation::AuthRegion;
use crate::page::Page;
use crate::provider::{AuthProvider, SessionCallback, Subscription};

pub const SIGNED_IN_MESSAGE: &str = "Successfully signed in!";
pub const SIGNED_OUT_MESSAGE: &str = "Signed out successfully";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Before the provider has answered
    Unknown,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionState {
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unauthenticated,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

pub struct SessionMachine {
    provider: Rc<dyn AuthProvider>,
    page: Rc<Page>,
    methods: SignInMethods,
    state: RefCell<SessionState>,
    subscription: RefCell<Option<Subscription>>,
}

impl SessionMachine {
    pub fn new(provider: Rc<dyn AuthProvider>, page: Rc<Page>, methods: SignInMethods) -> Rc<Self> {
        Rc::new(Self {
            provider,
            page,
            methods,
            state: RefCell::new(SessionState::Unknown),
            subscription: RefCell::new(None),
        })
    }

    /// Subscribe to the change feed, then adopt whatever session the
    /// provider already has. Failures leave the page signed out.
    pub async fn initialize(self: &Rc<Self>) {
        self.subscribe();

        let session = match self.provider.get_current_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not fetch the current session: {}", e);
                None
            }
        };
        info!("Initial session resolved (authenticated: {})", session.is_some());
        self.apply(session);
    }

    fn subscribe(self: &Rc<Self>) {
        let machine = Rc::downgrade(self);
        let callback: SessionCallback = Rc::new(move |event, session| {
            if let Some(machine) = machine.upgrade() {
                machine.handle_event(event, session);
            }
        });

        match self.provider.subscribe(callback) {
            Ok(subscription) => {
                *self.subscription.borrow_mut() = Some(subscription);
            }
            Err(e) => {
                warn!("Could not subscribe to session changes: {}", e);
                self.apply(None);
            }
        }
    }

    /// One change-feed delivery. The state always follows the payload; only
    /// sign-in and sign-out raise a toast.
    pub fn handle_event(&self, event: AuthEvent, session: Option<Session>) {
        info!("Auth event {} (session present: {})", event, session.is_some());
        self.apply(session);

        match event {
            AuthEvent::SignedIn => {
                self.page.notify(SIGNED_IN_MESSAGE, NotificationKind::Success);
            }
            AuthEvent::SignedOut => {
                self.page.notify(SIGNED_OUT_MESSAGE, NotificationKind::Info);
            }
            _ => {}
        }
    }

    /// Record `session` as current and re-render
    pub fn apply(&self, session: Option<Session>) {
        *self.state.borrow_mut() = SessionState::from_session(session);
        self.render();
    }

    /// Rebuild the auth region and header from the current state
    pub fn render(&self) {
        let region = {
            let state = self.state.borrow();
            match &*state {
                SessionState::Unknown => AuthRegion::Pending,
                other => AuthRegion::for_session(other.session(), &self.methods),
            }
        };
        self.page.render_auth(region);
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Authenticated(_))
    }

    pub fn methods(&self) -> &SignInMethods {
        &self.methods
    }

    /// Stop listening to the change feed
    pub fn shutdown(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
    }
}
