use async_trait::async_trait;
use food_share_domain::{AuthError, AuthProvider, SessionCallback, SignUpOutcome, Subscription};
use gloo::net::http::{Request, RequestBuilder, Response};
use gloo::storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::gotrue::{
    authorize_url, parse_redirect_fragment, GoTrueErrorBody, GoTrueUser, PasswordCredentials,
    RedirectFragment, RedirectTokens, RefreshTokenRequest, SignUpRequest, SignUpResponse,
    TokenResponse,
};
use shared::{AuthEvent, Session, SignUpMetadata};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::JsValue;

const STORAGE_KEY: &str = "food-share.auth.session";

type Subscribers = Rc<RefCell<Vec<(u64, SessionCallback)>>>;

/// Auth provider backed by the hosted GoTrue REST API
pub struct SupabaseAuth {
    base_url: String,
    anon_key: String,
    subscribers: Subscribers,
    next_subscription: Cell<u64>,
    redirect_checked: Cell<bool>,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_subscription: Cell::new(0),
            redirect_checked: Cell::new(false),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn request(&self, builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let builder = builder.header("apikey", &self.anon_key);
        match access_token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AuthError> {
        let response = self
            .request(Request::post(&self.endpoint(path)), None)
            .json(body)
            .map_err(|e| AuthError::Network(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn fetch_user(&self, access_token: &str) -> Result<GoTrueUser, AuthError> {
        let response = self
            .request(Request::get(&self.endpoint("/user")), Some(access_token))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = RefreshTokenRequest { refresh_token: refresh_token.to_string() };
        let response: TokenResponse = self.post_json("/token?grant_type=refresh_token", &body).await?;
        Ok(Session::from_token_response(response, now_secs()))
    }

    /// Finish a redirect sign-in whose tokens came back in the URL fragment
    async fn complete_redirect(&self) -> Result<Option<Session>, AuthError> {
        if self.redirect_checked.replace(true) {
            return Ok(None);
        }
        let Some(fragment) = current_fragment() else {
            return Ok(None);
        };

        match parse_redirect_fragment(&fragment) {
            None => Ok(None),
            Some(RedirectFragment::Error(message)) => {
                clear_fragment();
                Err(AuthError::provider(message))
            }
            Some(RedirectFragment::Tokens(tokens)) => {
                clear_fragment();
                let session = self.session_from_redirect(tokens).await?;
                info!("Redirect sign-in completed for {}", session.email);
                store_session(&session);
                self.emit(AuthEvent::SignedIn, Some(session.clone()));
                Ok(Some(session))
            }
        }
    }

    async fn session_from_redirect(&self, tokens: RedirectTokens) -> Result<Session, AuthError> {
        let user = self.fetch_user(&tokens.access_token).await?;
        let expires_at = tokens.expires_at(now_secs());
        Ok(Session::from_user(user, tokens.access_token, tokens.refresh_token, expires_at))
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>) {
        let callbacks: Vec<SessionCallback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        debug!("Emitting {} to {} subscriber(s)", event, callbacks.len());
        for callback in callbacks {
            callback(event.clone(), session.clone());
        }
    }

    /// Persisted session, refreshed when it has expired
    async fn stored_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(stored) = load_session() else {
            return Ok(None);
        };
        if !stored.is_expired(now_secs()) {
            return Ok(Some(stored));
        }

        let Some(refresh_token) = stored.refresh_token.clone() else {
            info!("Stored session expired without a refresh token");
            clear_session();
            return Ok(None);
        };
        match self.refresh(&refresh_token).await {
            Ok(session) => {
                store_session(&session);
                self.emit(AuthEvent::TokenRefreshed, Some(session.clone()));
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Dropping expired session after failed refresh: {}", e);
                clear_session();
                Ok(None)
            }
        }
    }

    fn accept_session(&self, session: Session) -> Session {
        store_session(&session);
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        session
    }
}

#[async_trait(?Send)]
impl AuthProvider for SupabaseAuth {
    async fn get_current_session(&self) -> Result<Option<Session>, AuthError> {
        match self.complete_redirect().await {
            Ok(Some(session)) => return Ok(Some(session)),
            Ok(None) => {}
            Err(e) => warn!("Redirect sign-in failed, using stored session: {}", e),
        }
        self.stored_session().await
    }

    fn subscribe(&self, callback: SessionCallback) -> Result<Subscription, AuthError> {
        let id = self.next_subscription.get() + 1;
        self.next_subscription.set(id);
        self.subscribers.borrow_mut().push((id, callback));

        let subscribers = Rc::downgrade(&self.subscribers);
        Ok(Subscription::new(id, move || {
            if let Some(subscribers) = subscribers.upgrade() {
                subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        }))
    }

    async fn sign_in_with_redirect(&self, provider: &str, redirect_to: &str) -> Result<(), AuthError> {
        let url = authorize_url(&self.base_url, provider, redirect_to);
        let window = web_sys::window().ok_or_else(|| AuthError::Network("No window available".to_string()))?;
        window
            .location()
            .set_href(&url)
            .map_err(|e| AuthError::Network(js_error(&e)))
    }

    async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUpOutcome, AuthError> {
        let body = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            data: metadata.clone(),
        };
        match self.post_json::<_, SignUpResponse>("/signup", &body).await? {
            SignUpResponse::Session(response) => {
                let session = self.accept_session(Session::from_token_response(response, now_secs()));
                Ok(SignUpOutcome { session: Some(session) })
            }
            SignUpResponse::User(user) => {
                debug!("Sign-up for {} awaits confirmation", user.email.unwrap_or_default());
                Ok(SignUpOutcome { session: None })
            }
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let body = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: TokenResponse = self.post_json("/token?grant_type=password", &body).await?;
        Ok(self.accept_session(Session::from_token_response(response, now_secs())))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = load_session() {
            let response = self
                .request(Request::post(&self.endpoint("/logout")), Some(&session.access_token))
                .send()
                .await
                .map_err(|e| AuthError::Network(e.to_string()))?;
            if !response.ok() {
                return Err(error_from(response).await);
            }
        }
        clear_session();
        self.emit(AuthEvent::SignedOut, None);
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    if !response.ok() {
        return Err(error_from(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AuthError::Network(format!("Unreadable response: {}", e)))
}

async fn error_from(response: Response) -> AuthError {
    let status = response.status();
    let message = response
        .json::<GoTrueErrorBody>()
        .await
        .ok()
        .and_then(GoTrueErrorBody::into_message);
    warn!("Auth service answered {}: {:?}", status, message);
    AuthError::Provider { message }
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn load_session() -> Option<Session> {
    LocalStorage::get::<Session>(STORAGE_KEY).ok()
}

fn store_session(session: &Session) {
    if let Err(e) = LocalStorage::set(STORAGE_KEY, session) {
        warn!("Could not persist session: {}", e);
    }
}

fn clear_session() {
    LocalStorage::delete(STORAGE_KEY);
}

fn current_fragment() -> Option<String> {
    let hash = web_sys::window()?.location().hash().ok()?;
    (!hash.is_empty()).then_some(hash)
}

/// Drop the token fragment from the address bar without reloading
fn clear_fragment() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let path = format!(
        "{}{}",
        location.pathname().unwrap_or_default(),
        location.search().unwrap_or_default()
    );
    let replaced = window
        .history()
        .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&path)));
    if let Err(e) = replaced {
        warn!("Could not clear the redirect fragment: {}", js_error(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn stored(email: &str, expires_at: Option<i64>) -> Session {
        Session {
            user_id: format!("user-{}", email),
            email: email.to_string(),
            provider: Some("email".to_string()),
            app_metadata: Map::new(),
            user_metadata: Map::new(),
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at,
        }
    }

    fn set_fragment(fragment: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_hash(fragment);
        }
    }

    #[wasm_bindgen_test]
    fn test_session_storage_round_trip() {
        let session = stored("a@b.com", None);
        store_session(&session);
        assert_eq!(load_session(), Some(session));

        clear_session();
        assert_eq!(load_session(), None);
    }

    #[wasm_bindgen_test]
    async fn test_redirect_error_falls_back_to_stored_session() {
        let session = stored("a@b.com", None);
        store_session(&session);
        set_fragment("error=access_denied&error_description=Denied");

        let auth = SupabaseAuth::new("http://localhost:54321", "anon");
        let current = auth.get_current_session().await;

        assert_eq!(current, Ok(Some(session)));
        assert_eq!(current_fragment(), None);
        clear_session();
    }

    #[wasm_bindgen_test]
    async fn test_expired_session_without_refresh_token_is_dropped() {
        store_session(&stored("a@b.com", Some(1)));

        let auth = SupabaseAuth::new("http://localhost:54321", "anon");
        assert_eq!(auth.get_current_session().await, Ok(None));
        assert_eq!(load_session(), None);
    }
}
