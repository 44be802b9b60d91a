//! `msg_content` 的两种结构化载荷。
//!
//! 可选字段为空时不输出，键按字母序排列（`serde_json::Map` 默认有序）。

use common::PushError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 通知消息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// 通知栏样式ID，可选，未设置时为 0
    #[serde(default)]
    pub n_builder_id: u32,
    pub n_content: String,
    /// 附加字段，可选
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_extras: Option<Map<String, Value>>,
    /// 通知标题，可选
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub n_title: String,
}

impl Notification {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            n_content: content.into(),
            ..Default::default()
        }
    }

    pub fn builder_id(mut self, id: u32) -> Self {
        self.n_builder_id = id;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.n_title = title.into();
        self
    }

    /// 添加一个附加字段
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.n_extras
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// 序列化为 `msg_content` 字符串
    pub fn to_msg_content(&self) -> Result<String, PushError> {
        serde_json::to_string(self).map_err(|e| PushError::Message(e.to_string()))
    }
}

/// 自定义消息，只支持 Android 终端
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDefinedMessage {
    /// `null` 与未设置等同，不输出
    #[serde(default, skip_serializing_if = "is_unset")]
    pub content_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

fn is_unset(value: &Option<Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

impl UserDefinedMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn content_type(mut self, content_type: impl Into<Value>) -> Self {
        self.content_type = Some(content_type.into()).filter(|v| !v.is_null());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn to_msg_content(&self) -> Result<String, PushError> {
        serde_json::to_string(self).map_err(|e| PushError::Message(e.to_string()))
    }
}
