//! One-time attachment of submit handlers to forms.
//!
//! The page may run the binding step more than once (every initialization
//! does); a form that already has a handler keeps it and never gets a
//! second one.

use shared::{NotificationKind, SignUpMetadata};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

use crate::actions::AuthActions;
use crate::page::Page;
use crate::validation::{FieldKind, FormId, FormLayout, FormValues};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please provide email and password.";

pub type SubmitTask = Pin<Box<dyn Future<Output = ()>>>;
pub type SubmitHandler = Rc<dyn Fn(FormValues) -> SubmitTask>;

#[derive(Default)]
pub struct FormBinder {
    handlers: RefCell<BTreeMap<FormId, SubmitHandler>>,
}

impl FormBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` unless the form already has one
    pub fn bind(&self, form: FormId, handler: SubmitHandler) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        if handlers.contains_key(&form) {
            debug!("Form {:?} already bound", form);
            return false;
        }
        debug!("Binding submit handler to {:?}", form);
        handlers.insert(form, handler);
        true
    }

    pub fn is_bound(&self, form: FormId) -> bool {
        self.handlers.borrow().contains_key(&form)
    }

    /// Number of forms with a handler attached
    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Start the bound handler for `form`; `None` when nothing is attached
    pub fn submit(&self, form: FormId, values: FormValues) -> Option<SubmitTask> {
        let handler = self.handlers.borrow().get(&form).cloned()?;
        Some(handler(values))
    }
}

/// Which auth form a layout is, judged by its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFormKind {
    Login,
    Signup,
}

impl AuthFormKind {
    pub fn detect(layout: &FormLayout) -> Option<Self> {
        let has_email_password = |email: &str, password: &str| {
            layout.has_field(email, FieldKind::Email) && layout.has_field(password, FieldKind::Password)
        };
        if has_email_password("loginEmail", "loginPassword") {
            Some(AuthFormKind::Login)
        } else if has_email_password("signupEmail", "signupPassword") {
            Some(AuthFormKind::Signup)
        } else {
            None
        }
    }

    fn form_id(&self) -> FormId {
        match self {
            AuthFormKind::Login => FormId::Login,
            AuthFormKind::Signup => FormId::Signup,
        }
    }
}

/// Credentials pulled from a submitted auth form
#[derive(Debug, Clone, PartialEq)]
struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    fn read(values: &FormValues, email_field: &str, password_field: &str) -> Option<Self> {
        let email = values.get(email_field).map(|v| v.trim()).unwrap_or_default();
        let password = values.get(password_field).map(String::as_str).unwrap_or_default();
        if email.is_empty() || password.trim().is_empty() {
            return None;
        }
        Some(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

fn value(values: &FormValues, name: &str) -> String {
    values.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Attach the login and signup handlers to whichever auth forms the page
/// has. Returns how many new handlers were attached.
pub fn bind_email_forms(binder: &FormBinder, page: &Rc<Page>, actions: &Rc<AuthActions>) -> usize {
    let mut attached = 0;
    for layout in page.form_layouts() {
        let Some(kind) = AuthFormKind::detect(&layout) else {
            continue;
        };
        if binder.is_bound(kind.form_id()) {
            continue;
        }
        let handler = auth_handler(kind, page.clone(), actions.clone());
        if binder.bind(kind.form_id(), handler) {
            attached += 1;
        }
    }
    attached
}

fn auth_handler(kind: AuthFormKind, page: Rc<Page>, actions: Rc<AuthActions>) -> SubmitHandler {
    Rc::new(move |values: FormValues| -> SubmitTask {
        let page = page.clone();
        let actions = actions.clone();
        Box::pin(async move {
            let (email_field, password_field) = match kind {
                AuthFormKind::Login => ("loginEmail", "loginPassword"),
                AuthFormKind::Signup => ("signupEmail", "signupPassword"),
            };
            let Some(credentials) = Credentials::read(&values, email_field, password_field) else {
                page.notify(MISSING_CREDENTIALS_MESSAGE, NotificationKind::Error);
                return;
            };

            // The action has already told the user about any failure
            let _ = match kind {
                AuthFormKind::Login => {
                    actions
                        .sign_in_with_email_password(&credentials.email, &credentials.password)
                        .await
                }
                AuthFormKind::Signup => {
                    let metadata = SignUpMetadata {
                        full_name: value(&values, "signupName"),
                        role: value(&values, "role"),
                    };
                    actions
                        .sign_up_with_email_password(&credentials.email, &credentials.password, &metadata)
                        .await
                }
            };
        })
    })
}
