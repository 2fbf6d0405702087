use chrono::{NaiveDate, TimeZone, Utc};
use food_share_domain::app::AppContext;
use food_share_domain::binding::MISSING_CREDENTIALS_MESSAGE;
use food_share_domain::navigation::AuthRegion;
use food_share_domain::page::{Page, PageLayout};
use food_share_domain::testing::{session_for, FakeAuthProvider, RecordingDelay};
use food_share_domain::validation::FormId;
use food_share_domain::{AppConfig, AuthError, SessionState, SignUpOutcome};
use shared::{AuthEvent, ModalId, NotificationKind};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

struct Harness {
    app: Rc<AppContext>,
    provider: Rc<FakeAuthProvider>,
    delay: Rc<RecordingDelay>,
}

fn harness() -> Harness {
    harness_with(FakeAuthProvider::new())
}

fn harness_with(provider: Rc<FakeAuthProvider>) -> Harness {
    let delay = RecordingDelay::new();
    let app = AppContext::new(AppConfig::default(), provider.clone(), delay.clone());
    Harness { app, provider, delay }
}

fn toast(page: &Page) -> Option<(String, NotificationKind)> {
    page.read()
        .notifications
        .current()
        .map(|n| (n.message.clone(), n.kind))
}

fn captions(page: &Page) -> Vec<String> {
    page.read()
        .navigation
        .buttons
        .iter()
        .map(|b| b.caption.clone())
        .collect()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()
}

async fn submit(h: &Harness, form: FormId) {
    let now = Utc.with_ymd_and_hms(2024, 1, 21, 8, 0, 0).unwrap();
    h.app.submit_form(form, now, today()).await;
}

#[tokio::test]
async fn initial_load_without_session_shows_guest_state() {
    let h = harness();
    h.app.start().await;

    let page = h.app.page();
    assert_eq!(h.app.machine().state(), SessionState::Unauthenticated);
    assert!(matches!(page.read().auth_region, Some(AuthRegion::Guest { .. })));
    assert_eq!(captions(page), vec!["Login", "Sign Up"]);
    assert!(toast(page).is_none());
}

#[tokio::test]
async fn initial_load_with_session_shows_member_state() {
    let h = harness_with(FakeAuthProvider::with_session(session_for("a@b.com")));
    h.app.start().await;

    let page = h.app.page();
    assert_eq!(
        page.read().auth_region,
        Some(AuthRegion::Member {
            email: "a@b.com".to_string(),
            provider_label: "email".to_string(),
            display_name: None,
        })
    );
    assert_eq!(captions(page), vec!["Dashboard", "Profile"]);
}

#[tokio::test]
async fn auth_region_follows_last_event() {
    let h = harness();
    h.app.start().await;

    h.provider.emit(AuthEvent::SignedIn, Some(session_for("a@b.com")));
    h.provider.emit(AuthEvent::TokenRefreshed, Some(session_for("a@b.com")));
    h.provider.emit(AuthEvent::SignedOut, None);
    h.provider.emit(AuthEvent::Other("MFA_CHALLENGE".to_string()), Some(session_for("c@d.org")));

    match &h.app.page().read().auth_region {
        Some(AuthRegion::Member { email, .. }) => assert_eq!(email, "c@d.org"),
        other => panic!("expected member region, got {:?}", other),
    }
    assert_eq!(captions(h.app.page()), vec!["Dashboard", "Profile"]);
}

#[tokio::test]
async fn signed_out_event_returns_to_guest_state() {
    let h = harness_with(FakeAuthProvider::with_session(session_for("a@b.com")));
    h.app.start().await;

    h.provider.emit(AuthEvent::SignedOut, None);

    let page = h.app.page();
    assert!(!h.app.machine().is_authenticated());
    assert_eq!(
        toast(page),
        Some(("Signed out successfully".to_string(), NotificationKind::Info))
    );
    assert_eq!(captions(page), vec!["Login", "Sign Up"]);
}

#[tokio::test]
async fn binding_twice_attaches_one_handler_per_form() {
    let h = harness();
    h.app.start().await;
    h.app.bind_forms();
    h.app.start().await;

    assert_eq!(h.app.binder().listener_count(), 2);
    assert!(h.app.binder().is_bound(FormId::Login));
    assert!(h.app.binder().is_bound(FormId::Signup));
}

#[tokio::test]
async fn empty_password_never_reaches_provider() {
    let h = harness();
    h.app.start().await;
    h.app.page().set_field(FormId::Login, "loginEmail", "a@b.com");

    submit(&h, FormId::Login).await;

    assert_eq!(h.provider.calls().password_sign_ins, 0);
    assert_eq!(
        toast(h.app.page()),
        Some((MISSING_CREDENTIALS_MESSAGE.to_string(), NotificationKind::Error))
    );
}

#[tokio::test]
async fn email_sign_in_opens_dashboard_after_delay() {
    let h = harness();
    h.app.start().await;
    let page = h.app.page().clone();
    page.open_modal(ModalId::Login);
    page.set_field(FormId::Login, "loginEmail", " a@b.com ");
    page.set_field(FormId::Login, "loginPassword", "secret");

    let checked = Rc::new(Cell::new(false));
    let seen = checked.clone();
    let during = page.clone();
    h.delay.on_sleep(move |_| {
        assert!(!during.is_modal_open(ModalId::Login));
        assert!(!during.is_modal_open(ModalId::Signup));
        assert!(!during.is_modal_open(ModalId::Dashboard));
        seen.set(true);
    });

    submit(&h, FormId::Login).await;

    assert!(checked.get());
    assert_eq!(h.delay.recorded(), vec![Duration::from_millis(300)]);
    assert!(page.is_modal_open(ModalId::Dashboard));
    assert_eq!(
        toast(&page),
        Some(("Logged in successfully!".to_string(), NotificationKind::Success))
    );
    assert_eq!(h.app.machine().current_session().map(|s| s.email), Some("a@b.com".to_string()));
    // the login form was reset when its modal closed
    assert_eq!(page.field_value(FormId::Login, "loginEmail"), "");
}

#[tokio::test]
async fn signup_passes_name_and_role() {
    let h = harness();
    h.app.start().await;
    let page = h.app.page();
    page.set_field(FormId::Signup, "signupName", "Ada");
    page.set_field(FormId::Signup, "signupEmail", "ada@b.com");
    page.set_field(FormId::Signup, "signupPassword", "pw");
    page.set_field(FormId::Signup, "role", "recipient");

    submit(&h, FormId::Signup).await;

    let calls = h.provider.calls();
    assert_eq!(calls.sign_ups.len(), 1);
    assert_eq!(calls.sign_ups[0].1.full_name, "Ada");
    assert_eq!(calls.sign_ups[0].1.role, "recipient");
    assert_eq!(
        toast(page).map(|t| t.0),
        Some("Signup successful. Please check your email to confirm your account.".to_string())
    );
}

#[tokio::test]
async fn signup_with_immediate_session_opens_dashboard() {
    let h = harness();
    h.app.start().await;
    h.provider.set_sign_up_result(Ok(SignUpOutcome {
        session: Some(session_for("ada@b.com")),
    }));
    let page = h.app.page();
    page.open_modal(ModalId::Signup);
    page.set_field(FormId::Signup, "signupEmail", "ada@b.com");
    page.set_field(FormId::Signup, "signupPassword", "pw");

    submit(&h, FormId::Signup).await;

    assert!(page.is_modal_open(ModalId::Dashboard));
    assert!(!page.is_modal_open(ModalId::Signup));
    assert_eq!(h.delay.recorded(), vec![Duration::from_millis(300)]);
    assert!(h.app.machine().is_authenticated());
}

#[tokio::test]
async fn bound_login_failure_shows_provider_message() {
    let h = harness();
    h.app.start().await;
    h.provider
        .set_sign_in_result(Err(AuthError::provider("Invalid login credentials")));
    let page = h.app.page();
    page.open_modal(ModalId::Login);
    page.set_field(FormId::Login, "loginEmail", "a@b.com");
    page.set_field(FormId::Login, "loginPassword", "wrong");

    submit(&h, FormId::Login).await;

    assert_eq!(h.provider.calls().password_sign_ins, 1);
    assert_eq!(
        toast(page),
        Some(("Invalid login credentials".to_string(), NotificationKind::Error))
    );
    assert!(page.is_modal_open(ModalId::Login));
    assert!(!page.is_modal_open(ModalId::Dashboard));
    assert!(h.delay.recorded().is_empty());
    assert!(!h.app.machine().is_authenticated());
}

#[tokio::test]
async fn bound_signup_failure_shows_provider_message() {
    let h = harness();
    h.app.start().await;
    h.provider
        .set_sign_up_result(Err(AuthError::provider("User already registered")));
    let page = h.app.page();
    page.set_field(FormId::Signup, "signupEmail", "ada@b.com");
    page.set_field(FormId::Signup, "signupPassword", "pw");

    submit(&h, FormId::Signup).await;

    assert_eq!(h.provider.calls().sign_ups.len(), 1);
    assert_eq!(
        toast(page),
        Some(("User already registered".to_string(), NotificationKind::Error))
    );
    assert!(!h.app.machine().is_authenticated());
}

#[tokio::test]
async fn sign_out_failure_reports_once_and_keeps_state() {
    let h = harness_with(FakeAuthProvider::with_session(session_for("a@b.com")));
    h.app.start().await;
    h.provider.fail_sign_out(AuthError::provider("Session not found"));

    let before = h.app.machine().state();
    let result = h.app.actions().sign_out().await;

    assert!(result.is_err());
    assert_eq!(h.app.machine().state(), before);
    let state = h.app.page().read();
    assert_eq!(state.notifications.visible_count(), 1);
    let current = state.notifications.current().unwrap();
    assert_eq!(current.message, "Session not found");
    assert_eq!(current.kind, NotificationKind::Error);
}

#[tokio::test]
async fn sign_out_success_shows_guest_state() {
    let h = harness_with(FakeAuthProvider::with_session(session_for("a@b.com")));
    h.app.start().await;

    h.app.actions().sign_out().await.unwrap();

    assert_eq!(h.app.machine().state(), SessionState::Unauthenticated);
    assert_eq!(captions(h.app.page()), vec!["Login", "Sign Up"]);
}

#[tokio::test]
async fn second_notification_replaces_first() {
    let h = harness();
    let page = h.app.page();

    let first = page.notify("first", NotificationKind::Info);
    page.notify("second", NotificationKind::Error);

    assert_eq!(page.read().notifications.visible_count(), 1);
    assert_eq!(toast(page), Some(("second".to_string(), NotificationKind::Error)));
    // a late auto-dismiss of the first must not remove the second
    assert!(!page.dismiss_notification(first));
    assert!(toast(page).is_some());
}

#[tokio::test]
async fn page_without_auth_mount_still_toggles_navigation() {
    let mut layout = PageLayout::standard(Duration::from_secs(5));
    layout.auth_mount = false;
    let provider = FakeAuthProvider::with_session(session_for("a@b.com"));
    let app = AppContext::with_page(
        AppConfig::default(),
        provider,
        RecordingDelay::new(),
        Page::new(layout),
    );

    app.start().await;

    assert!(app.page().read().auth_region.is_none());
    assert_eq!(captions(app.page()), vec!["Dashboard", "Profile"]);
}
