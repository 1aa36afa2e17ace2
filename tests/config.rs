use std::{env, io::Write, num::NonZeroUsize};

use fanout::{ConfigError, OverflowKind, OverflowPolicy, Settings};
use serial_test::serial;

/// Очищает переменные окружения, которые трогают тесты.
fn clear_env() {
    for key in [
        "FANOUT_HUB__OVERFLOW",
        "FANOUT_HUB__CAPACITY",
        "FANOUT_FEED__CONSUMERS",
        "FANOUT_LOGGING__LEVEL",
    ] {
        env::remove_var(key);
    }
}

/// Тест проверяет загрузку без файла и окружения.
#[test]
#[serial]
fn test_load_defaults() {
    clear_env();
    let settings = Settings::load(None).unwrap();

    assert_eq!(settings.hub.overflow, OverflowKind::Unbounded);
    assert_eq!(settings.feed.consumers, 4);
    assert_eq!(settings.feed.messages, 200);
    assert_eq!(settings.feed.interval_ms, 10);
    assert_eq!(settings.logging.level, "info");
    assert_eq!(settings.hub.policy().unwrap(), OverflowPolicy::Unbounded);
}

/// Тест проверяет чтение TOML-файла.
#[test]
#[serial]
fn test_load_from_toml_file() {
    clear_env();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[hub]
overflow = "drop_oldest"
capacity = 32

[feed]
consumers = 2
messages = 10
interval_ms = 0

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let settings = Settings::load(Some(file.path())).unwrap();
    assert_eq!(
        settings.hub.policy().unwrap(),
        OverflowPolicy::DropOldest(NonZeroUsize::new(32).unwrap())
    );
    assert_eq!(settings.feed.consumers, 2);
    assert_eq!(settings.feed.messages, 10);
    assert_eq!(settings.feed.interval_ms, 0);
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.logging.format, fanout::logging::LogFormat::Json);
    assert!(settings.validate().is_ok());
}

/// Тест проверяет, что переменные окружения перекрывают файл.
#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[feed]\nconsumers = 2\n").unwrap();

    env::set_var("FANOUT_FEED__CONSUMERS", "6");
    env::set_var("FANOUT_HUB__OVERFLOW", "drop_newest");
    env::set_var("FANOUT_HUB__CAPACITY", "8");
    let settings = Settings::load(Some(file.path()));
    clear_env();

    let settings = settings.unwrap();
    assert_eq!(settings.feed.consumers, 6);
    assert_eq!(
        settings.hub.policy().unwrap(),
        OverflowPolicy::DropNewest(NonZeroUsize::new(8).unwrap())
    );
}

/// Тест проверяет, что ограниченная политика без ёмкости не проходит
/// проверку.
#[test]
#[serial]
fn test_bounded_policy_without_capacity_rejected() {
    clear_env();
    env::set_var("FANOUT_HUB__OVERFLOW", "drop_oldest");
    let settings = Settings::load(None);
    clear_env();

    let settings = settings.unwrap();
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::MissingCapacity { .. })
    ));
}

/// Тест проверяет ошибку при отсутствующем файле.
#[test]
#[serial]
fn test_missing_file_is_load_error() {
    clear_env();
    let path = std::path::Path::new("/definitely/not/here/fanout.toml");
    assert!(matches!(
        Settings::load(Some(path)),
        Err(ConfigError::Load(_))
    ));
}
