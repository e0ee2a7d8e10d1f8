use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::settings::{
    delete_setting, insert_setting, load_setting, load_settings, update_setting,
};
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::setting::{Setting, SettingType, SettingValue};
use regex::Regex;
use std::sync::OnceLock;

pub const HOURLY_RATE_KEY: &str = "costo_por_hora";
pub const SEMESTER_WEEKS_KEY: &str = "semanas_semestre";

pub const DEFAULT_HOURLY_RATE: f64 = 9965.0;
pub const DEFAULT_SEMESTER_WEEKS: i64 = 14;

fn key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("static regex"))
}

/// Lowercase the key and check it only holds `[a-z0-9_]`.
pub fn normalize_key(key: &str) -> AppResult<String> {
    let k = key.trim().to_lowercase();
    if !key_pattern().is_match(&k) {
        return Err(AppError::InvalidSettingKey(key.to_string()));
    }
    Ok(k)
}

/// Typed key/value settings stored in `system_config`.
pub struct SettingsLogic;

impl SettingsLogic {
    /// Typed value for `key`, or `default` when the key is absent.
    pub fn get(pool: &DbPool, key: &str, default: SettingValue) -> AppResult<SettingValue> {
        let key = normalize_key(key)?;
        Ok(load_setting(&pool.conn, &key)?
            .map(|s| s.value)
            .unwrap_or(default))
    }

    pub fn get_hourly_rate(pool: &DbPool) -> AppResult<f64> {
        let v = Self::get(
            pool,
            HOURLY_RATE_KEY,
            SettingValue::Decimal(DEFAULT_HOURLY_RATE),
        )?;
        Ok(v.as_f64().unwrap_or(DEFAULT_HOURLY_RATE))
    }

    pub fn get_semester_weeks(pool: &DbPool) -> AppResult<i64> {
        let v = Self::get(
            pool,
            SEMESTER_WEEKS_KEY,
            SettingValue::Integer(DEFAULT_SEMESTER_WEEKS),
        )?;
        Ok(v.as_i64().unwrap_or(DEFAULT_SEMESTER_WEEKS))
    }

    pub fn get_setting(pool: &DbPool, key: &str) -> AppResult<Setting> {
        let key = normalize_key(key)?;
        load_setting(&pool.conn, &key)?.ok_or(AppError::SettingNotFound(key))
    }

    pub fn list(pool: &DbPool) -> AppResult<Vec<Setting>> {
        load_settings(&pool.conn)
    }

    /// Create a new entry. Existing keys are refused; use [`Self::update`].
    pub fn set(
        pool: &mut DbPool,
        actor: &Actor,
        key: &str,
        raw_value: &str,
        kind: SettingType,
        description: &str,
    ) -> AppResult<Setting> {
        actor.require_director()?;
        let key = normalize_key(key)?;

        if load_setting(&pool.conn, &key)?.is_some() {
            return Err(AppError::DuplicateKey(key));
        }

        let value = SettingValue::parse(raw_value, kind)?;
        insert_setting(&pool.conn, &key, &value, description.trim(), actor.id)?;

        audit(
            &pool.conn,
            actor.id,
            "config_set",
            &key,
            &format!("Created {} = {} ({})", key, value, kind.to_db_str()),
        )?;

        Self::get_setting(pool, &key)
    }

    /// Change the value of an existing entry. The stored type is kept and the
    /// new value must parse as that type.
    pub fn update(
        pool: &mut DbPool,
        actor: &Actor,
        key: &str,
        raw_value: &str,
        description: Option<&str>,
    ) -> AppResult<Setting> {
        actor.require_director()?;
        let current = Self::get_setting(pool, key)?;

        let value = SettingValue::parse(raw_value, current.kind)?;
        let description = description
            .map(|d| d.trim().to_string())
            .unwrap_or(current.description);

        update_setting(&pool.conn, &current.key, &value, &description)?;

        audit(
            &pool.conn,
            actor.id,
            "config_update",
            &current.key,
            &format!("{}: {} → {}", current.key, current.value, value),
        )?;

        Self::get_setting(pool, &current.key)
    }

    pub fn delete(pool: &mut DbPool, actor: &Actor, key: &str) -> AppResult<()> {
        actor.require_director()?;
        let key = normalize_key(key)?;

        if delete_setting(&pool.conn, &key)? == 0 {
            return Err(AppError::SettingNotFound(key));
        }

        audit(&pool.conn, actor.id, "config_del", &key, "Deleted setting")?;
        Ok(())
    }

    /// Create the bootstrap entries that are still missing. Returns the keys
    /// that were created.
    pub fn initialize_defaults(pool: &mut DbPool, actor: &Actor) -> AppResult<Vec<String>> {
        actor.require_director()?;

        let defaults = [
            (
                HOURLY_RATE_KEY,
                SettingValue::Decimal(DEFAULT_HOURLY_RATE),
                "Cost per worked hour",
            ),
            (
                SEMESTER_WEEKS_KEY,
                SettingValue::Integer(DEFAULT_SEMESTER_WEEKS),
                "Number of weeks in the semester",
            ),
        ];

        let mut created = Vec::new();
        for (key, value, description) in defaults {
            if load_setting(&pool.conn, key)?.is_some() {
                continue;
            }
            insert_setting(&pool.conn, key, &value, description, actor.id)?;
            created.push(key.to_string());
        }

        if !created.is_empty() {
            audit(
                &pool.conn,
                actor.id,
                "config_init",
                "system_config",
                &format!("Initialized {}", created.join(", ")),
            )?;
        }

        Ok(created)
    }
}
