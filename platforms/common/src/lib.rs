use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 推送平台错误类型
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// 发送请求时的网络错误，不做重试。
    /// 不解析响应时，读取响应体失败也归为此类
    #[error("Transport error: {0}")]
    Transport(String),

    /// 响应体读取中断、不是合法的 JSON，或结构不符
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Message error: {0}")]
    Message(String),
}

/// 推送结果，对应服务端返回的 `{"errcode", "errmsg", "msg_id"}`。
/// 缺失的字段取零值，出错时服务端通常不返回 `msg_id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushResult {
    /// 错误码，0 表示成功
    pub errcode: u32,
    /// 错误信息
    pub errmsg: String,
    /// 服务端分配的消息ID
    pub msg_id: String,
}

impl PushResult {
    pub fn is_success(&self) -> bool {
        self.errcode == 0
    }
}

/// 初始化配置trait
pub trait PushInitConfig: Send + Sync {
    /// 获取平台名称
    fn platform_name(&self) -> &str;

    /// 获取推送接口地址
    fn endpoint(&self) -> &str;

    /// 获取密钥
    fn secret(&self) -> Option<&str>;
}

/// 推送平台能力trait（用于dyn兼容）
#[async_trait]
pub trait PushPlatformCapabilities: Send + Sync {
    /// 通用发送方法，消息格式由具体平台解释
    async fn send(&self, message: Value) -> Result<PushResult, PushError>;

    /// 获取平台信息
    fn platform_info(&self) -> PlatformInfo;
}

/// 推送平台trait（用于具体实现）
pub trait PushPlatform<C: PushInitConfig>: PushPlatformCapabilities {
    /// 创建一个新的推送平台实例
    fn new(config: C) -> Self
    where
        Self: Sized;
}

/// 平台信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// 平台名称
    pub name: String,
    /// 版本
    pub version: String,
    /// 支持的消息类型
    pub message_types: Vec<String>,
    /// 支持的终端平台
    pub device_platforms: Vec<String>,
}

/// 平台工厂trait
pub trait PlatformFactory: Send + Sync {
    /// 根据JSON Value创建平台实例
    fn create(&self, config: Value) -> Result<Box<dyn PushPlatformCapabilities>, PushError>;

    /// 获取平台名称
    fn name(&self) -> &'static str;
}

/// 平台注册表
#[derive(Default)]
pub struct PlatformRegistry {
    factories: HashMap<String, Box<dyn PlatformFactory>>,
}

impl PlatformRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册平台工厂
    pub fn register(&mut self, factory: Box<dyn PlatformFactory>) {
        self.factories.insert(factory.name().to_string(), factory);
    }

    /// 获取平台工厂
    pub fn get_factory(&self, name: &str) -> Option<&dyn PlatformFactory> {
        self.factories.get(name).map(|f| f.as_ref())
    }

    /// 获取所有支持的平台名称
    pub fn list_platforms(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPlatform;

    #[async_trait]
    impl PushPlatformCapabilities for EchoPlatform {
        async fn send(&self, message: Value) -> Result<PushResult, PushError> {
            Ok(PushResult {
                msg_id: message.to_string(),
                ..Default::default()
            })
        }

        fn platform_info(&self) -> PlatformInfo {
            PlatformInfo {
                name: "echo".to_string(),
                version: "0".to_string(),
                message_types: vec![],
                device_platforms: vec![],
            }
        }
    }

    struct EchoFactory;

    impl PlatformFactory for EchoFactory {
        fn create(&self, config: Value) -> Result<Box<dyn PushPlatformCapabilities>, PushError> {
            if config.is_null() {
                return Err(PushError::Config("missing config".to_string()));
            }
            Ok(Box::new(EchoPlatform))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[test]
    fn test_push_result_decode() {
        let result: PushResult =
            serde_json::from_str(r#"{"errcode":0,"errmsg":"","msg_id":"abc123"}"#).unwrap();
        assert_eq!(result.errcode, 0);
        assert_eq!(result.msg_id, "abc123");
        assert!(result.is_success());
    }

    #[test]
    fn test_push_result_error_code() {
        let result: PushResult =
            serde_json::from_str(r#"{"errcode":1011,"errmsg":"no target","msg_id":""}"#).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.errmsg, "no target");
    }

    #[test]
    fn test_push_result_missing_fields() {
        let result: PushResult = serde_json::from_str(
            r#"{"sendno":"0","errcode":1011,"errmsg":"cannot find user"}"#,
        )
        .unwrap();
        assert_eq!(result.errcode, 1011);
        assert_eq!(result.errmsg, "cannot find user");
        assert!(result.msg_id.is_empty());

        let empty: PushResult = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PushResult::default());
    }

    #[test]
    fn test_platform_registry() {
        let mut registry = PlatformRegistry::new();
        assert!(registry.list_platforms().is_empty());

        registry.register(Box::new(EchoFactory));
        assert_eq!(registry.list_platforms(), vec!["echo".to_string()]);
        assert!(registry.get_factory("missing").is_none());

        let factory = registry.get_factory("echo").unwrap();
        assert!(matches!(factory.create(Value::Null), Err(PushError::Config(_))));
        assert!(factory.create(serde_json::json!({})).is_ok());
    }

    #[tokio::test]
    async fn test_dyn_platform_send() {
        let platform: Box<dyn PushPlatformCapabilities> = Box::new(EchoPlatform);
        let result = platform.send(serde_json::json!("hi")).await.unwrap();
        assert_eq!(result.msg_id, "\"hi\"");
    }
}
