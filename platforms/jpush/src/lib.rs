//! 极光推送 (JPush v2) 客户端：签名、表单编码与发送。

use common::{PlatformFactory, PushError, PushPlatform, PushPlatformCapabilities};
use log::*;
use serde_json::Value;

mod message;
mod push;
mod pusher;

pub use message::{Notification, UserDefinedMessage};
pub use push::{FormBody, MsgType, Push, ReceiverType};
pub use pusher::{DEFAULT_HOST, JPushConfig, Pusher};

pub const PLATFORM_NAME: &str = "jpush";

// --- Platform Factory ---

pub struct JPushPlatformFactory;

impl PlatformFactory for JPushPlatformFactory {
    fn create(&self, config: Value) -> Result<Box<dyn PushPlatformCapabilities>, PushError> {
        let config: JPushConfig =
            serde_json::from_value(config).map_err(|e| PushError::Config(e.to_string()))?;
        if config.app_key.is_empty() || config.master_secret.is_empty() {
            return Err(PushError::Config(
                "app_key and master_secret must not be empty".to_string(),
            ));
        }
        debug!("Creating {} platform for {}", PLATFORM_NAME, config.host);
        Ok(Box::new(<Pusher as PushPlatform<JPushConfig>>::new(config)))
    }

    fn name(&self) -> &'static str {
        PLATFORM_NAME
    }
}
