//! # Page Model
//!
//! The document the browser shell renders: the toast, the overlays, the auth
//! mount point and header, the forms, and the dashboard listings.
//!
//! Every mutation goes through [`Page`], which notifies registered listeners
//! once the borrow is released so a listener may read the page again.

use chrono::NaiveDate;
use shared::{ModalId, NotificationKind};
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

use crate::listings::{DashboardTab, ListingBoard};
use crate::modal::ModalController;
use crate::navigation::{AuthRegion, NavBar};
use crate::notification::{NotificationCenter, NotificationId};
use crate::validation::{standard_layouts, FormId, FormLayout, FormState, FormValues};

#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub notifications: NotificationCenter,
    pub modals: ModalController,
    /// `None` when the page has no auth mount point
    pub auth_region: Option<AuthRegion>,
    pub navigation: NavBar,
    pub forms: BTreeMap<FormId, FormState>,
    pub board: ListingBoard,
    pub dashboard_tab: DashboardTab,
}

impl PageState {
    pub fn form(&self, id: FormId) -> Option<&FormState> {
        self.forms.get(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

/// Builder for the static structure of a page
pub struct PageLayout {
    pub auth_mount: bool,
    pub navigation: NavBar,
    pub forms: Vec<FormLayout>,
    pub board: ListingBoard,
    pub notification_timeout: Duration,
}

impl PageLayout {
    /// The page as served: auth mount, guest header, every form, demo listings
    pub fn standard(notification_timeout: Duration) -> Self {
        Self {
            auth_mount: true,
            navigation: NavBar::guest(),
            forms: standard_layouts(),
            board: ListingBoard::sample(),
            notification_timeout,
        }
    }
}

pub struct Page {
    state: RefCell<PageState>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: RefCell<u64>,
}

impl Page {
    pub fn new(layout: PageLayout) -> Rc<Self> {
        let forms = layout
            .forms
            .into_iter()
            .map(|l| (l.id, FormState::new(l)))
            .collect();
        Rc::new(Self {
            state: RefCell::new(PageState {
                notifications: NotificationCenter::new(layout.notification_timeout),
                modals: ModalController::default(),
                auth_region: layout.auth_mount.then_some(AuthRegion::Pending),
                navigation: layout.navigation,
                forms,
                board: layout.board,
                dashboard_tab: DashboardTab::Donations,
            }),
            listeners: RefCell::new(Vec::new()),
            next_listener: RefCell::new(1),
        })
    }

    pub fn standard() -> Rc<Self> {
        Self::new(PageLayout::standard(Duration::from_secs(5)))
    }

    /// Read access for rendering; drop the guard before mutating
    pub fn read(&self) -> Ref<'_, PageState> {
        self.state.borrow()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> ListenerId {
        let mut next = self.next_listener.borrow_mut();
        let id = ListenerId(*next);
        *next += 1;
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    fn update<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let result = {
            let mut state = self.state.borrow_mut();
            f(&mut state)
        };
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener();
        }
        result
    }

    // --- notifications ---

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let message = message.into();
        debug!("Notification ({:?}): {}", kind, message);
        self.update(|s| s.notifications.show(message, kind))
    }

    pub fn dismiss_notification(&self, id: NotificationId) -> bool {
        self.update(|s| s.notifications.dismiss(id))
    }

    // --- overlays ---

    pub fn open_modal(&self, id: ModalId) {
        self.update(|s| {
            s.modals.open(id);
        });
    }

    /// Hide the overlay and reset its form; a closed overlay is left alone
    pub fn close_modal(&self, id: ModalId) -> bool {
        self.update(|s| {
            let closed = s.modals.close(id);
            if closed {
                reset_form_in(s, id);
            }
            closed
        })
    }

    /// Hide every overlay; form contents are kept
    pub fn close_all_modals(&self) {
        self.update(|s| {
            s.modals.close_all();
        });
    }

    pub fn switch_modal(&self, from: ModalId, to: ModalId) {
        self.close_modal(from);
        self.open_modal(to);
    }

    pub fn is_modal_open(&self, id: ModalId) -> bool {
        self.read().modals.is_open(id)
    }

    // --- auth region and header ---

    /// Replace the auth region wholesale and flip the header buttons
    pub fn render_auth(&self, region: AuthRegion) {
        self.update(|s| {
            if region.is_member() {
                s.navigation.show_member();
            } else {
                s.navigation.show_guest();
            }
            if let Some(mount) = s.auth_region.as_mut() {
                *mount = region;
            }
        });
    }

    // --- forms ---

    pub fn has_form(&self, id: FormId) -> bool {
        self.read().forms.contains_key(&id)
    }

    pub fn form_layouts(&self) -> Vec<FormLayout> {
        self.read().forms.values().map(|f| f.layout.clone()).collect()
    }

    pub fn set_field(&self, form: FormId, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.update(|s| {
            if let Some(f) = s.forms.get_mut(&form) {
                f.set_value(name, value);
            }
        });
    }

    pub fn field_value(&self, form: FormId, name: &str) -> String {
        self.read()
            .forms
            .get(&form)
            .map(|f| f.value(name).to_string())
            .unwrap_or_default()
    }

    pub fn form_values(&self, form: FormId) -> Option<FormValues> {
        self.read().forms.get(&form).map(|f| f.values.clone())
    }

    /// Blur-time check of a single field
    pub fn validate_field(&self, form: FormId, name: &str, today: NaiveDate) -> bool {
        self.update(|s| {
            s.forms
                .get_mut(&form)
                .map(|f| f.validate_field(name, today))
                .unwrap_or(true)
        })
    }

    /// Submit-time check of every field; a missing form is invalid
    pub fn validate_form(&self, form: FormId, today: NaiveDate) -> bool {
        self.update(|s| s.forms.get_mut(&form).is_some_and(|f| f.validate(today)))
    }

    pub fn show_form_message(&self, form: FormId, text: impl Into<String>, kind: NotificationKind) {
        let text = text.into();
        self.update(|s| {
            if let Some(f) = s.forms.get_mut(&form) {
                f.show_message(text, kind);
            }
        });
    }

    pub fn reset_form(&self, form: FormId) {
        self.update(|s| {
            if let Some(f) = s.forms.get_mut(&form) {
                f.reset();
            }
        });
    }

    // --- dashboard ---

    pub fn select_tab(&self, tab: DashboardTab) {
        self.update(|s| s.dashboard_tab = tab);
    }

    pub fn update_board(&self, f: impl FnOnce(&mut ListingBoard)) {
        self.update(|s| f(&mut s.board));
    }
}

fn reset_form_in(state: &mut PageState, modal: ModalId) {
    if let Some(form) = FormId::for_modal(modal).and_then(|id| state.forms.get_mut(&id)) {
        form.reset();
    }
}
