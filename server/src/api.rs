use chrono::{DateTime, Utc};
use common::PushResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 推送请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequest {
    /// 目标平台
    pub platform: String,
    /// 平台的配置信息 (e.g., host, app_key, master_secret)
    /// 使用 serde_json::Value 以支持不同平台的异构配置
    pub config: Value,
    /// 消息内容，由平台自行解析
    pub message: Value,
}

/// 推送响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    /// 服务端返回的推送结果
    pub result: PushResult,
    pub timestamp: DateTime<Utc>,
}

impl PushResponse {
    pub fn new(result: PushResult) -> Self {
        Self {
            result,
            timestamp: Utc::now(),
        }
    }
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}
