use async_trait::async_trait;
use food_share_domain::Delay;
use gloo::timers::future::TimeoutFuture;
use std::time::Duration;

/// Real browser timer behind the domain's delay strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooDelay;

#[async_trait(?Send)]
impl Delay for GlooDelay {
    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(millis(duration)).await;
    }
}

/// Timer milliseconds, saturating at the browser's `u32` limit
pub fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
