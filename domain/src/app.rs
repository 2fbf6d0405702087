//! # Application Context
//!
//! Wires the page, the session machine, the auth actions and the form
//! bindings together. The browser shell builds one of these at startup and
//! hands it to every component.
//!
//! ## Startup
//!
//! ```text
//! start()
//!   ├── SessionMachine::initialize   (subscribe, query, render)
//!   └── bind_email_forms             (idempotent)
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use shared::{ModalId, NotificationKind};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::actions::AuthActions;
use crate::binding::{bind_email_forms, FormBinder};
use crate::config::AppConfig;
use crate::delay::Delay;
use crate::listings::{donation_from_form, request_from_form, DashboardTab};
use crate::page::{Page, PageLayout};
use crate::provider::AuthProvider;
use crate::session::SessionMachine;
use crate::validation::{FormId, FormValues};

pub const DONATION_SUBMITTED_MESSAGE: &str = "Donation submitted successfully!";
pub const REQUEST_SUBMITTED_MESSAGE: &str = "Request submitted successfully!";
pub const CONTACT_SUBMITTED_MESSAGE: &str = "Thank you for your message! We'll get back to you soon.";

const ANONYMOUS: &str = "Anonymous";

pub struct AppContext {
    config: AppConfig,
    page: Rc<Page>,
    machine: Rc<SessionMachine>,
    actions: Rc<AuthActions>,
    binder: FormBinder,
    delay: Rc<dyn Delay>,
}

impl AppContext {
    pub fn new(config: AppConfig, provider: Rc<dyn AuthProvider>, delay: Rc<dyn Delay>) -> Rc<Self> {
        let page = Page::new(PageLayout::standard(config.notification_timeout()));
        Self::with_page(config, provider, delay, page)
    }

    /// Build around an existing page, e.g. one without an auth mount point
    pub fn with_page(
        config: AppConfig,
        provider: Rc<dyn AuthProvider>,
        delay: Rc<dyn Delay>,
        page: Rc<Page>,
    ) -> Rc<Self> {
        let machine = SessionMachine::new(provider.clone(), page.clone(), config.sign_in.clone());
        let redirect_to = config.redirect_url.clone().unwrap_or_else(|| "/".to_string());
        let actions = Rc::new(AuthActions::new(
            provider,
            machine.clone(),
            page.clone(),
            delay.clone(),
            redirect_to,
            config.redirect_settle(),
        ));

        Rc::new(Self {
            config,
            page,
            machine,
            actions,
            binder: FormBinder::new(),
            delay,
        })
    }

    pub async fn start(&self) {
        info!("Starting page against {}", self.config.supabase_url);
        self.machine.initialize().await;
        self.bind_forms();
    }

    /// Attach auth form handlers that are not attached yet
    pub fn bind_forms(&self) -> usize {
        let attached = bind_email_forms(&self.binder, &self.page, &self.actions);
        debug!("Attached {} auth form handler(s)", attached);
        attached
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn page(&self) -> &Rc<Page> {
        &self.page
    }

    pub fn machine(&self) -> &Rc<SessionMachine> {
        &self.machine
    }

    pub fn actions(&self) -> &Rc<AuthActions> {
        &self.actions
    }

    pub fn binder(&self) -> &FormBinder {
        &self.binder
    }

    /// Open the dashboard on the tab that suits the signed-in user
    pub fn open_dashboard(&self) {
        let role = self.machine.current_session().and_then(|s| s.role());
        self.page.select_tab(DashboardTab::default_for(role));
        self.page.open_modal(ModalId::Dashboard);
    }

    /// Handle a submit of `form` with its current values
    pub async fn submit_form(&self, form: FormId, now: DateTime<Utc>, today: NaiveDate) {
        match form {
            FormId::Login | FormId::Signup => {
                let Some(values) = self.page.form_values(form) else {
                    return;
                };
                match self.binder.submit(form, values) {
                    Some(task) => task.await,
                    None => debug!("No handler bound to {:?}", form),
                }
            }
            FormId::Donation => self.submit_donation(now, today).await,
            FormId::Request => self.submit_request(now, today).await,
            FormId::Contact => self.submit_contact(today),
        }
    }

    async fn submit_donation(&self, now: DateTime<Utc>, today: NaiveDate) {
        let Some(values) = self.validated_values(FormId::Donation, today) else {
            return;
        };
        let donation = donation_from_form(&values, now, &self.member_name());
        info!("Donation {} submitted", donation.id);
        self.page.update_board(|board| board.add_donation(donation));
        self.page
            .show_form_message(FormId::Donation, DONATION_SUBMITTED_MESSAGE, NotificationKind::Success);

        self.delay.sleep(self.config.form_close_delay()).await;
        self.page.close_modal(ModalId::Donation);
    }

    async fn submit_request(&self, now: DateTime<Utc>, today: NaiveDate) {
        let Some(values) = self.validated_values(FormId::Request, today) else {
            return;
        };
        let request = match request_from_form(&values, now, &self.member_name()) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected request form: {}", e);
                self.page.show_form_message(FormId::Request, e, NotificationKind::Error);
                return;
            }
        };
        info!("Request {} submitted", request.id);
        self.page.update_board(|board| board.add_request(request));
        self.page
            .show_form_message(FormId::Request, REQUEST_SUBMITTED_MESSAGE, NotificationKind::Success);

        self.delay.sleep(self.config.form_close_delay()).await;
        self.page.close_modal(ModalId::Request);
    }

    fn submit_contact(&self, today: NaiveDate) {
        if self.validated_values(FormId::Contact, today).is_none() {
            return;
        }
        self.page.reset_form(FormId::Contact);
        self.page
            .show_form_message(FormId::Contact, CONTACT_SUBMITTED_MESSAGE, NotificationKind::Success);
    }

    fn validated_values(&self, form: FormId, today: NaiveDate) -> Option<FormValues> {
        if !self.page.validate_form(form, today) {
            debug!("{:?} form has invalid fields", form);
            return None;
        }
        self.page.form_values(form)
    }

    /// Name stamped on new listings
    fn member_name(&self) -> String {
        self.machine
            .current_session()
            .map(|s| s.display_name().map(str::to_string).unwrap_or(s.email))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string())
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{member_session, FakeAuthProvider, RecordingDelay};
    use chrono::TimeZone;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 21, 8, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn app() -> (Rc<AppContext>, Rc<FakeAuthProvider>, Rc<RecordingDelay>) {
        let provider = FakeAuthProvider::new();
        let delay = RecordingDelay::new();
        let app = AppContext::new(AppConfig::default(), provider.clone(), delay.clone());
        (app, provider, delay)
    }

    fn fill_donation(page: &Page) {
        for (name, value) in [
            ("foodType", "Dairy"),
            ("quantity", "3 crates"),
            ("expiryDate", "2024-01-30"),
            ("pickupLocation", "Main St"),
            ("contactPhone", "+1 (555) 012-3456"),
        ] {
            page.set_field(FormId::Donation, name, value);
        }
    }

    #[tokio::test]
    async fn test_start_binds_auth_forms_once() {
        let (app, _, _) = app();
        app.start().await;
        app.start().await;

        assert_eq!(app.binder().listener_count(), 2);
        assert_eq!(app.bind_forms(), 0);
    }

    #[tokio::test]
    async fn test_donation_submit_appends_and_closes() {
        let (app, provider, delay) = app();
        provider.mute_events();
        app.machine().apply(Some(member_session("a@b.com", "Ada Lovelace", "donor")));
        app.page().open_modal(ModalId::Donation);
        fill_donation(app.page());

        let page = app.page().clone();
        delay.on_sleep(move |_| {
            let state = page.read();
            let message = state.form(FormId::Donation).and_then(|f| f.message.clone());
            assert_eq!(message.map(|m| m.text), Some(DONATION_SUBMITTED_MESSAGE.to_string()));
        });

        app.submit_form(FormId::Donation, now(), today()).await;

        let state = app.page().read();
        let added = state.board.donations().last().unwrap();
        assert_eq!(added.donor, "Ada Lovelace");
        assert_eq!(state.board.donations().len(), 3);
        assert!(!state.modals.is_open(ModalId::Donation));
        assert_eq!(delay.recorded(), vec![Duration::from_millis(1500)]);
    }

    #[tokio::test]
    async fn test_invalid_donation_keeps_modal_open() {
        let (app, _, delay) = app();
        app.page().open_modal(ModalId::Donation);
        fill_donation(app.page());
        app.page().set_field(FormId::Donation, "expiryDate", "2024-01-01");

        app.submit_form(FormId::Donation, now(), today()).await;

        let state = app.page().read();
        assert_eq!(state.board.donations().len(), 2);
        assert!(state.modals.is_open(ModalId::Donation));
        assert!(state.form(FormId::Donation).unwrap().error("expiryDate").is_some());
        assert!(delay.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_request() {
        let (app, _, _) = app();
        for (name, value) in [
            ("orgName", "Soup Kitchen"),
            ("orgType", "Food Bank"),
            ("peopleCount", "40"),
            ("foodNeeds", "Bread"),
            ("deliveryAddress", "1 Road"),
            ("urgent", "high"),
            ("orgContact", "Sam"),
        ] {
            app.page().set_field(FormId::Request, name, value);
        }

        app.submit_form(FormId::Request, now(), today()).await;

        let state = app.page().read();
        assert_eq!(state.board.requests().last().unwrap().organization, "Anonymous");
    }

    #[tokio::test]
    async fn test_contact_resets_and_thanks() {
        let (app, _, _) = app();
        app.page().set_field(FormId::Contact, "contactName", "Sam");
        app.page().set_field(FormId::Contact, "contactEmail", "sam@example.org");
        app.page().set_field(FormId::Contact, "contactMessage", "Hello");

        app.submit_form(FormId::Contact, now(), today()).await;

        let state = app.page().read();
        let form = state.form(FormId::Contact).unwrap();
        assert!(form.values.is_empty());
        assert_eq!(form.message.as_ref().map(|m| m.text.as_str()), Some(CONTACT_SUBMITTED_MESSAGE));
    }

    #[tokio::test]
    async fn test_open_dashboard_picks_tab_by_role() {
        let (app, provider, _) = app();
        provider.mute_events();
        app.machine().apply(Some(member_session("d@b.com", "Dee", "donor")));

        app.open_dashboard();

        assert_eq!(app.page().read().dashboard_tab, DashboardTab::Donations);
        assert!(app.page().is_modal_open(ModalId::Dashboard));
    }
}
