use shiftledger::core::settings::{
    DEFAULT_HOURLY_RATE, DEFAULT_SEMESTER_WEEKS, HOURLY_RATE_KEY, SEMESTER_WEEKS_KEY,
    SettingsLogic, normalize_key,
};
use shiftledger::errors::{AppError, ErrorKind};
use shiftledger::models::setting::{SettingType, SettingValue};

mod common;
use common::{director, monitor, pool};

#[test]
fn typed_accessors_fall_back_to_defaults() {
    let pool = pool();
    assert_eq!(SettingsLogic::get_hourly_rate(&pool).unwrap(), 9965.0);
    assert_eq!(SettingsLogic::get_semester_weeks(&pool).unwrap(), 14);

    let v = SettingsLogic::get(&pool, "missing_key", SettingValue::Boolean(true)).unwrap();
    assert_eq!(v, SettingValue::Boolean(true));
}

#[test]
fn initialize_defaults_only_creates_missing_keys() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");

    let created = SettingsLogic::initialize_defaults(&mut pool, &boss).unwrap();
    assert_eq!(created, vec![HOURLY_RATE_KEY.to_string(), SEMESTER_WEEKS_KEY.to_string()]);

    let rate = SettingsLogic::get_setting(&pool, HOURLY_RATE_KEY).unwrap();
    assert_eq!(rate.kind, SettingType::Decimal);
    assert_eq!(rate.value, SettingValue::Decimal(DEFAULT_HOURLY_RATE));
    assert_eq!(rate.created_by, Some(boss.id));

    let weeks = SettingsLogic::get_setting(&pool, SEMESTER_WEEKS_KEY).unwrap();
    assert_eq!(weeks.value, SettingValue::Integer(DEFAULT_SEMESTER_WEEKS));

    assert!(SettingsLogic::initialize_defaults(&mut pool, &boss).unwrap().is_empty());
}

#[test]
fn set_is_create_only() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");

    SettingsLogic::set(&mut pool, &boss, "semanas_semestre", "16", SettingType::Integer, "weeks")
        .unwrap();
    assert_eq!(SettingsLogic::get_semester_weeks(&pool).unwrap(), 16);

    let err = SettingsLogic::set(&mut pool, &boss, "Semanas_Semestre", "18", SettingType::Integer, "")
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateKey(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn keys_are_normalized() {
    assert_eq!(normalize_key("  Costo_Por_Hora ").unwrap(), "costo_por_hora");
    assert_eq!(normalize_key("max_2").unwrap(), "max_2");

    for bad in ["bad-key", "with space", "", "ñandú"] {
        let err = normalize_key(bad).unwrap_err();
        assert!(matches!(err, AppError::InvalidSettingKey(_)), "{:?}", bad);
    }
}

#[test]
fn values_must_match_their_type() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");

    let err = SettingsLogic::set(&mut pool, &boss, "weeks", "abc", SettingType::Integer, "")
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidSettingValue(_)));

    let flag = SettingsLogic::set(&mut pool, &boss, "strict_mode", "yes", SettingType::Boolean, "")
        .unwrap();
    assert_eq!(flag.value, SettingValue::Boolean(true));

    let note = SettingsLogic::set(&mut pool, &boss, "note", "hello world", SettingType::Text, "")
        .unwrap();
    assert_eq!(note.value.to_string(), "hello world");
}

#[test]
fn update_keeps_the_stored_type() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    SettingsLogic::initialize_defaults(&mut pool, &boss).unwrap();

    let updated = SettingsLogic::update(&mut pool, &boss, HOURLY_RATE_KEY, "12000.5", None).unwrap();
    assert_eq!(updated.kind, SettingType::Decimal);
    assert_eq!(updated.description, "Cost per worked hour");
    assert_eq!(SettingsLogic::get_hourly_rate(&pool).unwrap(), 12000.5);

    let err = SettingsLogic::update(&mut pool, &boss, SEMESTER_WEEKS_KEY, "14.5", None).unwrap_err();
    assert!(matches!(err, AppError::InvalidSettingValue(_)));

    let err = SettingsLogic::update(&mut pool, &boss, "nope", "1", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn delete_and_permissions() {
    let mut pool = pool();
    let boss = director(&mut pool, "boss");
    let mon = monitor(&mut pool, "mon", "Mario");
    SettingsLogic::initialize_defaults(&mut pool, &boss).unwrap();

    let err = SettingsLogic::set(&mut pool, &mon, "x", "1", SettingType::Integer, "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = SettingsLogic::delete(&mut pool, &mon, HOURLY_RATE_KEY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    SettingsLogic::delete(&mut pool, &boss, HOURLY_RATE_KEY).unwrap();
    assert_eq!(SettingsLogic::list(&pool).unwrap().len(), 1);
    // back to the built-in default
    assert_eq!(SettingsLogic::get_hourly_rate(&pool).unwrap(), 9965.0);

    let err = SettingsLogic::delete(&mut pool, &boss, HOURLY_RATE_KEY).unwrap_err();
    assert!(matches!(err, AppError::SettingNotFound(_)));
}
