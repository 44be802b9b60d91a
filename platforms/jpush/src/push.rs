//! 推送请求的签名与表单编码。

use crate::message::{Notification, UserDefinedMessage};
use common::PushError;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// 接收者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiverType {
    /// 由tag列表标示的终端群组接收该消息（群发）
    Tag,
    /// 由alias列表标示的终端接收该消息（一对多）
    Alias,
    /// 由app标示的所有终端接收该消息（应用范围广播），不需要填接收者
    App,
}

impl ReceiverType {
    pub fn as_code(&self) -> &'static str {
        match self {
            ReceiverType::Tag => "2",
            ReceiverType::Alias => "3",
            ReceiverType::App => "4",
        }
    }

    fn carries_value(&self) -> bool {
        matches!(self, ReceiverType::Tag | ReceiverType::Alias)
    }
}

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgType {
    Notification,
    /// 只支持Android终端
    UserDefined,
}

impl MsgType {
    pub fn as_code(&self) -> &'static str {
        match self {
            MsgType::Notification => "1",
            MsgType::UserDefined => "2",
        }
    }
}

/// 一次推送请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Push {
    pub sendno: u32,
    pub receiver_type: ReceiverType,
    #[serde(default)]
    pub receiver_value: Vec<String>,
    pub msg_type: MsgType,
    /// 已序列化好的消息内容
    pub msg_content: String,
    /// 关于本消息的描述，不会发送给接收者
    #[serde(default)]
    pub send_description: String,
    /// 终端平台类型，如：android，ios
    #[serde(default)]
    pub platform: Vec<String>,
    /// 离线保存时间，单位：秒，最长为10天（864000秒）。
    /// 0 表示该消息不保存离线，当前不在线用户将不会收到此消息
    #[serde(default)]
    pub time_to_live: u32,
    /// 待覆盖的上一条消息的ID
    #[serde(default)]
    pub override_msg_id: String,
}

impl Push {
    pub fn new(
        sendno: u32,
        receiver_type: ReceiverType,
        msg_type: MsgType,
        msg_content: impl Into<String>,
    ) -> Self {
        Self {
            sendno,
            receiver_type,
            receiver_value: Vec::new(),
            msg_type,
            msg_content: msg_content.into(),
            send_description: String::new(),
            platform: Vec::new(),
            time_to_live: 0,
            override_msg_id: String::new(),
        }
    }

    pub fn notification(
        sendno: u32,
        receiver_type: ReceiverType,
        notification: &Notification,
    ) -> Result<Self, PushError> {
        Ok(Self::new(
            sendno,
            receiver_type,
            MsgType::Notification,
            notification.to_msg_content()?,
        ))
    }

    pub fn user_defined(
        sendno: u32,
        receiver_type: ReceiverType,
        message: &UserDefinedMessage,
    ) -> Result<Self, PushError> {
        Ok(Self::new(
            sendno,
            receiver_type,
            MsgType::UserDefined,
            message.to_msg_content()?,
        ))
    }

    pub fn receivers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receiver_value = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platform = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn ttl(mut self, seconds: u32) -> Self {
        self.time_to_live = seconds;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.send_description = description.into();
        self
    }

    pub fn overriding(mut self, msg_id: impl Into<String>) -> Self {
        self.override_msg_id = msg_id.into();
        self
    }

    /// 以逗号拼接的接收者，app 广播时为 `None`
    pub fn joined_receiver_value(&self) -> Option<String> {
        self.receiver_type
            .carries_value()
            .then(|| self.receiver_value.join(","))
    }

    /// `md5(sendno + receiver_type + receiver_value + master_secret)` 的小写十六进制。
    ///
    /// app 广播同样计算，只是 receiver_value 段为空。拼接顺序与服务端一致，不可调整。
    pub fn verification_code(&self, master_secret: &str) -> String {
        let receiver_value = self.joined_receiver_value().unwrap_or_default();

        let mut hasher = Md5::new();
        hasher.update(self.sendno.to_string());
        hasher.update(self.receiver_type.as_code());
        hasher.update(receiver_value);
        hasher.update(master_secret);
        format!("{:x}", hasher.finalize())
    }

    /// 生成带签名的表单
    pub fn to_form(&self, app_key: &str, master_secret: &str) -> FormBody {
        let mut form = FormBody::default();

        form.add("sendno", self.sendno.to_string());
        form.add("app_key", app_key);
        form.add("receiver_type", self.receiver_type.as_code());
        if let Some(receiver_value) = self.joined_receiver_value() {
            form.add("receiver_value", receiver_value);
        }
        form.add("verification_code", self.verification_code(master_secret));
        form.add("msg_type", self.msg_type.as_code());
        form.add("msg_content", self.msg_content.as_str());
        if !self.send_description.is_empty() {
            form.add("send_description", self.send_description.as_str());
        }
        form.add("platform", self.platform.join(","));
        form.add("time_to_live", self.time_to_live.to_string());
        if !self.override_msg_id.is_empty() {
            form.add("override_msg_id", self.override_msg_id.as_str());
        }

        form
    }
}

/// 有序的 `application/x-www-form-urlencoded` 键值对
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    pairs: Vec<(&'static str, String)>,
}

impl FormBody {
    fn add(&mut self, key: &'static str, value: impl Into<String>) {
        self.pairs.push((key, value.into()));
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn encode(&self) -> Result<String, PushError> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| PushError::Message(e.to_string()))
    }
}
