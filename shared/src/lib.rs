use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub mod gotrue;

/// Provider label shown when the auth service does not report one
pub const DEFAULT_PROVIDER_LABEL: &str = "email";

/// Authenticated identity as reported by the hosted auth service.
///
/// The page never builds one of these on its own; it only mirrors what the
/// provider hands back from sign-in, sign-up or the change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    /// Name of the sign-in provider ("github", "email", ...)
    pub provider: Option<String>,
    /// Opaque provider metadata (the service's `app_metadata`)
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
    /// Metadata supplied at sign-up (`full_name`, `role`)
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds
    pub expires_at: Option<i64>,
}

impl Session {
    /// Provider label for the auth region, falling back to "email"
    pub fn provider_label(&self) -> &str {
        self.provider
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PROVIDER_LABEL)
    }

    /// Display name captured at sign-up, if any
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user_metadata
            .get("role")
            .and_then(Value::as_str)
            .and_then(|role| role.parse().ok())
    }

    /// True once `now_secs` has reached the recorded expiry
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| now_secs >= expires_at)
    }
}

/// Kind of a change-feed event pushed by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
    /// Event names this page does not know about
    Other(String),
}

impl AuthEvent {
    pub fn as_str(&self) -> &str {
        match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated => "USER_UPDATED",
            AuthEvent::PasswordRecovery => "PASSWORD_RECOVERY",
            AuthEvent::Other(name) => name,
        }
    }
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual flavour of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "notification notification-success",
            NotificationKind::Error => "notification notification-error",
            NotificationKind::Info => "notification notification-info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fas fa-check-circle",
            NotificationKind::Error => "fas fa-exclamation-circle",
            NotificationKind::Info => "fas fa-info-circle",
        }
    }
}

/// Logical names of the page's overlay panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModalId {
    Login,
    Signup,
    Dashboard,
    Profile,
    Donation,
    Request,
}

impl ModalId {
    /// DOM id of the overlay container
    pub fn element_id(&self) -> &'static str {
        match self {
            ModalId::Login => "loginModal",
            ModalId::Signup => "signupModal",
            ModalId::Dashboard => "dashboardModal",
            ModalId::Profile => "profileModal",
            ModalId::Donation => "donationModal",
            ModalId::Request => "requestModal",
        }
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Role picked on the sign-up form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Recipient,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Donor => "donor",
            UserRole::Recipient => "recipient",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Donor => "Food Donor",
            UserRole::Recipient => "Recipient Organization",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "donor" => Ok(UserRole::Donor),
            "recipient" => Ok(UserRole::Recipient),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Metadata attached to an email/password sign-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    /// Raw role value from the radio group; empty when nothing was picked
    pub role: String,
}

/// Review status of a donation or request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Approved,
    Completed,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Completed => "completed",
        }
    }
}

/// Urgency picked on a food request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(format!("Unknown urgency: {}", other)),
        }
    }
}

/// A food donation offered by a donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    /// Epoch millis at submission
    pub id: u64,
    pub food_type: String,
    pub quantity: String,
    /// ISO date (YYYY-MM-DD)
    pub expiry_date: String,
    pub pickup_location: String,
    pub description: String,
    pub contact_phone: String,
    pub status: ListingStatus,
    /// RFC 3339 timestamp
    pub date_submitted: String,
    pub donor: String,
}

/// A request for food posted by a recipient organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRequest {
    pub id: u64,
    pub org_name: String,
    pub org_type: String,
    pub people_count: u32,
    pub food_needs: String,
    pub delivery_address: String,
    pub urgency: Urgency,
    pub org_contact: String,
    pub status: ListingStatus,
    /// RFC 3339 timestamp
    pub date_submitted: String,
    pub organization: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session_with(provider: Option<&str>, metadata: Value) -> Session {
        Session {
            user_id: "user-1".to_string(),
            email: "a@b.com".to_string(),
            provider: provider.map(str::to_string),
            app_metadata: Map::new(),
            user_metadata: metadata.as_object().cloned().unwrap_or_default(),
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: Some(100),
        }
    }

    #[test]
    fn test_provider_label_falls_back_to_email() {
        assert_eq!(session_with(Some("github"), json!({})).provider_label(), "github");
        assert_eq!(session_with(None, json!({})).provider_label(), "email");
        assert_eq!(session_with(Some("  "), json!({})).provider_label(), "email");
    }

    #[test]
    fn test_session_metadata_accessors() {
        let session = session_with(None, json!({"full_name": " Ada ", "role": "donor"}));
        assert_eq!(session.display_name(), Some("Ada"));
        assert_eq!(session.role(), Some(UserRole::Donor));

        let bare = session_with(None, json!({"full_name": "", "role": ""}));
        assert_eq!(bare.display_name(), None);
        assert_eq!(bare.role(), None);
    }

    #[test]
    fn test_session_expiry() {
        let session = session_with(None, json!({}));
        assert!(!session.is_expired(99));
        assert!(session.is_expired(100));
    }

    #[test]
    fn test_auth_event_names() {
        assert_eq!(AuthEvent::SignedIn.to_string(), "SIGNED_IN");
        assert_eq!(AuthEvent::TokenRefreshed.to_string(), "TOKEN_REFRESHED");
        assert_eq!(AuthEvent::Other("MFA_CHALLENGE_VERIFIED".to_string()).as_str(), "MFA_CHALLENGE_VERIFIED");
    }

    #[test]
    fn test_modal_element_ids() {
        assert_eq!(ModalId::Login.element_id(), "loginModal");
        assert_eq!(ModalId::Dashboard.to_string(), "dashboardModal");
    }

    #[test]
    fn test_role_and_urgency_parsing() {
        assert_eq!("Recipient".parse::<UserRole>().unwrap(), UserRole::Recipient);
        assert!("chef".parse::<UserRole>().is_err());
        assert_eq!("HIGH".parse::<Urgency>().unwrap(), Urgency::High);
    }

    #[test]
    fn test_listing_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ListingStatus::Approved).unwrap(), "\"approved\"");
    }
}
