//! Auth-dependent header: the auth region and the two nav affordances.

use shared::{ModalId, Session};

use crate::config::SignInMethods;
use crate::provider::provider_display_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Outline,
}

impl ButtonStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "btn btn-primary",
            ButtonStyle::Secondary => "btn btn-secondary",
            ButtonStyle::Outline => "btn btn-outline",
        }
    }
}

/// Header button whose click opens `target`
#[derive(Debug, Clone, PartialEq)]
pub struct NavButton {
    pub caption: String,
    pub target: ModalId,
    pub style: ButtonStyle,
}

impl NavButton {
    fn new(caption: &str, target: ModalId, style: ButtonStyle) -> Self {
        Self { caption: caption.to_string(), target, style }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavBar {
    pub buttons: Vec<NavButton>,
}

impl NavBar {
    /// Header as served: Login and Sign Up
    pub fn guest() -> Self {
        Self {
            buttons: vec![
                NavButton::new("Login", ModalId::Login, ButtonStyle::Primary),
                NavButton::new("Sign Up", ModalId::Signup, ButtonStyle::Secondary),
            ],
        }
    }

    /// Point guest buttons at the member overlays
    pub fn show_member(&mut self) {
        self.retarget(ModalId::Login, "Dashboard", ModalId::Dashboard, ButtonStyle::Secondary);
        self.retarget(ModalId::Signup, "Profile", ModalId::Profile, ButtonStyle::Outline);
    }

    /// Point member buttons back at the guest overlays
    pub fn show_guest(&mut self) {
        self.retarget(ModalId::Dashboard, "Login", ModalId::Login, ButtonStyle::Primary);
        self.retarget(ModalId::Profile, "Sign Up", ModalId::Signup, ButtonStyle::Secondary);
    }

    pub fn find(&self, target: ModalId) -> Option<&NavButton> {
        self.buttons.iter().find(|b| b.target == target)
    }

    // A button that is not there is simply skipped
    fn retarget(&mut self, from: ModalId, caption: &str, to: ModalId, style: ButtonStyle) {
        if let Some(button) = self.buttons.iter_mut().find(|b| b.target == from) {
            *button = NavButton::new(caption, to, style);
        }
    }
}

/// Sign-in entry point for one redirect provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    pub provider: String,
    pub label: String,
}

/// Contents of the auth mount point, rebuilt whole on every transition
#[derive(Debug, Clone, PartialEq)]
pub enum AuthRegion {
    /// The provider has not answered yet
    Pending,
    Guest {
        email_login: bool,
        providers: Vec<ProviderEntry>,
    },
    Member {
        email: String,
        provider_label: String,
        display_name: Option<String>,
    },
}

impl AuthRegion {
    pub fn for_session(session: Option<&Session>, methods: &SignInMethods) -> Self {
        match session {
            Some(session) => AuthRegion::Member {
                email: session.email.clone(),
                provider_label: session.provider_label().to_string(),
                display_name: session.display_name().map(str::to_string),
            },
            None => AuthRegion::Guest {
                email_login: methods.email_password,
                providers: methods
                    .oauth_providers
                    .iter()
                    .map(|p| ProviderEntry {
                        provider: p.clone(),
                        label: provider_display_name(p),
                    })
                    .collect(),
            },
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, AuthRegion::Member { .. })
    }
}
