use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use uuid::Uuid;

/// 用户账号类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountType {
    #[default]
    None,
    Facebook,
    Twitter,
    Google,
    Github,
    Other,
}

/// 用户性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

/// 被识别的用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub identifier: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub anonymous: bool,
}

impl User {
    pub fn new(identifier: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            identifier: identifier.into(),
            account_type,
            name: None,
            email: None,
            birth_date: None,
            gender: Gender::Unknown,
            anonymous: false,
        }
    }

    /// 生成匿名用户（随机 UUID 作为标识）
    pub fn anonymous() -> Self {
        Self {
            anonymous: true,
            ..Self::new(Uuid::new_v4().to_string(), AccountType::None)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }
}
