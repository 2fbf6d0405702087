use async_trait::async_trait;
use std::time::Duration;

/// Strategy for presentation pauses (modal close-then-open, form close).
#[async_trait(?Send)]
pub trait Delay {
    async fn sleep(&self, duration: Duration);
}
