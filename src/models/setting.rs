use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Declared type of a configuration entry (`tipo_dato`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Decimal,
    Integer,
    Boolean,
    #[serde(rename = "string")]
    Text,
}

impl SettingType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SettingType::Decimal => "decimal",
            SettingType::Integer => "integer",
            SettingType::Boolean => "boolean",
            SettingType::Text => "string",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "decimal" => Some(SettingType::Decimal),
            "integer" => Some(SettingType::Integer),
            "boolean" => Some(SettingType::Boolean),
            "string" | "text" => Some(SettingType::Text),
            _ => None,
        }
    }
}

/// A typed configuration value, parsed once from its stored text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Decimal(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl SettingValue {
    pub fn parse(raw: &str, kind: SettingType) -> AppResult<Self> {
        let trimmed = raw.trim();
        let bad = || {
            AppError::InvalidSettingValue(format!(
                "'{}' is not a valid {}",
                raw,
                kind.to_db_str()
            ))
        };

        match kind {
            SettingType::Decimal => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(SettingValue::Decimal)
                .ok_or_else(bad),
            SettingType::Integer => trimmed
                .parse::<i64>()
                .map(SettingValue::Integer)
                .map_err(|_| bad()),
            SettingType::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "1" | "yes" | "si" | "sí" => Ok(SettingValue::Boolean(true)),
                "false" | "0" | "no" => Ok(SettingValue::Boolean(false)),
                _ => Err(bad()),
            },
            SettingType::Text => Ok(SettingValue::Text(raw.to_string())),
        }
    }

    pub fn kind(&self) -> SettingType {
        match self {
            SettingValue::Decimal(_) => SettingType::Decimal,
            SettingValue::Integer(_) => SettingType::Integer,
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Text(_) => SettingType::Text,
        }
    }

    /// Numeric view used by the rate/weeks accessors.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Decimal(v) => Some(*v),
            SettingValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(v) => Some(*v),
            SettingValue::Decimal(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Text stored in `system_config.value`.
    pub fn to_db_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Decimal(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
            SettingValue::Boolean(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: SettingValue,
    pub kind: SettingType,
    pub description: String,
    pub created_by: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}
