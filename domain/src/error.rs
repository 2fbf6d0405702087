use thiserror::Error;

/// Failure reported by, or on the way to, the auth provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// The provider answered and refused; `message` is its explanation
    #[error("{}", .message.as_deref().unwrap_or("Auth provider rejected the request"))]
    Provider { message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Sign-in method is not enabled: {0}")]
    MethodDisabled(String),
}

impl AuthError {
    pub fn provider(message: impl Into<String>) -> Self {
        AuthError::Provider { message: Some(message.into()) }
    }

    /// Text for the user: the provider's own message when it sent one,
    /// `fallback` otherwise
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Provider { message: Some(message) } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Configuration could not be used
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration document: {0}")]
    Parse(String),

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_provider_text() {
        let err = AuthError::provider("Invalid login credentials");
        assert_eq!(err.user_message("Login failed."), "Invalid login credentials");
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(
            AuthError::Provider { message: None }.user_message("Login failed."),
            "Login failed."
        );
        assert_eq!(
            AuthError::Network("offline".to_string()).user_message("Login failed."),
            "Login failed."
        );
        assert_eq!(AuthError::provider("  ").user_message("Nope"), "Nope");
    }

    #[test]
    fn test_display() {
        assert_eq!(AuthError::Provider { message: None }.to_string(), "Auth provider rejected the request");
        assert_eq!(AuthError::provider("boom").to_string(), "boom");
    }
}
