//! # Food Share Domain
//!
//! UI-agnostic logic for the food-donation coordination page.
//!
//! Everything the page does that is not drawing pixels lives here, so it can
//! be exercised natively against a fake auth provider. The browser shell
//! (`food-share-frontend`) renders [`page::PageState`] and forwards user
//! input back into these services.
//!
//! ## Module Organization
//!
//! - **provider**: the auth provider seam and change-feed subscription handle
//! - **session**: the session state machine mirroring the provider's session
//! - **actions**: user-triggered auth operations and the dashboard redirect
//! - **binding**: one-time attachment of submit handlers to the auth forms
//! - **page**: the document model (toast, overlays, auth region, forms, listings)
//! - **notification** / **modal** / **navigation**: pieces of the page model
//! - **validation**: field and form checks with inline error messages
//! - **listings**: donations, requests and the dashboard cards
//! - **delay**: injectable delay strategy used for presentation sequencing
//! - **config** / **error**: ambient configuration and error types
//! - **testing**: in-memory provider and delay doubles (`testing` feature)
//!
//! ## Execution Model
//!
//! Single-threaded and cooperative. Shared state sits behind `Rc<RefCell<_>>`
//! and no borrow is ever held across an `.await`.

pub mod actions;
pub mod app;
pub mod binding;
pub mod config;
pub mod delay;
pub mod error;
pub mod listings;
pub mod modal;
pub mod navigation;
pub mod notification;
pub mod page;
pub mod provider;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod validation;

pub use actions::AuthActions;
pub use app::AppContext;
pub use binding::{AuthFormKind, FormBinder};
pub use config::{AppConfig, SignInMethods};
pub use delay::Delay;
pub use error::AuthError;
pub use page::{Page, PageState};
pub use provider::{AuthProvider, SessionCallback, SignUpOutcome, Subscription};
pub use session::{SessionMachine, SessionState};
