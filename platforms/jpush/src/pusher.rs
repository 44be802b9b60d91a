use crate::push::{FormBody, Push};
use crate::PLATFORM_NAME;
use async_trait::async_trait;
use common::{
    PlatformInfo, PushError, PushInitConfig, PushPlatform, PushPlatformCapabilities, PushResult,
};
use log::*;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_HOST: &str = "http://api.jpush.cn:8800/v2/push";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// 极光推送配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JPushConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub app_key: String,
    pub master_secret: String,
}

impl PushInitConfig for JPushConfig {
    fn platform_name(&self) -> &str {
        PLATFORM_NAME
    }

    fn endpoint(&self) -> &str {
        &self.host
    }

    fn secret(&self) -> Option<&str> {
        Some(&self.master_secret)
    }
}

/// 极光推送客户端。构造后只读，可跨线程共享引用。
pub struct Pusher {
    config: JPushConfig,
    http_client: Client,
}

impl Pusher {
    pub fn new(
        host: impl Into<String>,
        app_key: impl Into<String>,
        master_secret: impl Into<String>,
    ) -> Self {
        <Self as PushPlatform<JPushConfig>>::new(JPushConfig {
            host: host.into(),
            app_key: app_key.into(),
            master_secret: master_secret.into(),
        })
    }

    pub fn config(&self) -> &JPushConfig {
        &self.config
    }

    /// 生成带签名的请求表单，不发送
    pub fn encode(&self, push: &Push) -> FormBody {
        push.to_form(&self.config.app_key, &self.config.master_secret)
    }

    /// 发送一次推送并解析返回结果。响应体中途读取失败按解析失败处理
    pub async fn push(&self, push: &Push) -> Result<PushResult, PushError> {
        let response = self.post(push).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| PushError::Decode(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| PushError::Decode(e.to_string()))
    }

    /// 发送一次推送，读完响应体但不解析
    pub async fn push_discarding(&self, push: &Push) -> Result<(), PushError> {
        let response = self.post(push).await?;
        response
            .bytes()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn post(&self, push: &Push) -> Result<Response, PushError> {
        let form = self.encode(push);
        debug!(
            "Posting push sendno={} receiver_type={} to {}",
            push.sendno,
            push.receiver_type.as_code(),
            self.config.host
        );

        self.http_client
            .post(&self.config.host)
            .form(form.pairs())
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))
    }
}

#[async_trait]
impl PushPlatformCapabilities for Pusher {
    async fn send(&self, message: Value) -> Result<PushResult, PushError> {
        let push: Push =
            serde_json::from_value(message).map_err(|e| PushError::Message(e.to_string()))?;
        self.push(&push).await
    }

    fn platform_info(&self) -> PlatformInfo {
        PlatformInfo {
            name: PLATFORM_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            message_types: vec!["notification".to_string(), "user_defined".to_string()],
            device_platforms: vec!["android".to_string(), "ios".to_string()],
        }
    }
}

impl PushPlatform<JPushConfig> for Pusher {
    fn new(config: JPushConfig) -> Self
    where
        Self: Sized,
    {
        Self {
            config,
            http_client: Client::new(),
        }
    }
}
