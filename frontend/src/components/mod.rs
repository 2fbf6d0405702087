pub mod auth_modals;
pub mod dashboard_modal;
pub mod form_view;
pub mod header;
pub mod listing_modals;
pub mod modal;
pub mod notification_toast;
pub mod profile_modal;

pub use auth_modals::{LoginModal, SignupModal};
pub use dashboard_modal::DashboardModal;
pub use form_view::FormView;
pub use header::Header;
pub use listing_modals::{DonationModal, RequestModal};
pub use notification_toast::NotificationToast;
pub use profile_modal::ProfileModal;
