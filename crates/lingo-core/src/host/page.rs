use crate::error::Result;
use async_trait::async_trait;

/// Page-level facts about the host chat client.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// Resolves once the user is logged into the chat client.
    async fn wait_for_login(&self);

    /// Chat-account id of the logged-in user, if the page exposes one.
    fn user_id(&self) -> Option<i64>;
}

/// Stable per-machine identifier that binds a token to one device.
pub trait DeviceIdProvider: Send + Sync {
    fn device_id(&self) -> Result<String>;
}

/// Sink for "open another window" requests.
pub trait WindowSignal: Send + Sync {
    fn request_new_window(&self);
}
