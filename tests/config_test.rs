// ==========================================
// 配置集成测试
// ==========================================
// 测试目标: config_kv 覆写 → ImportSettings 快照
// ==========================================

mod test_helpers;

use broker_crm::config::{config_keys, ConfigManager, ImportConfigReader, ImportSettings};
use broker_crm::domain::types::FileFormat;
use std::path::PathBuf;
use test_helpers::create_test_db;

#[tokio::test]
async fn test_settings_default_on_fresh_database() {
    let (_dir, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    let settings = ImportSettings::load(&config).await.unwrap();

    assert_eq!(settings, ImportSettings::default());
}

#[tokio::test]
async fn test_settings_reflect_overrides() {
    let (_dir, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();
    config.set_global_config_value(config_keys::MAX_UPLOAD_BYTES, "1024").unwrap();
    config.set_global_config_value(config_keys::ALLOWED_EXTENSIONS, "xlsx").unwrap();
    config.set_global_config_value(config_keys::UPLOAD_DIR, "/var/tmp/crm").unwrap();

    // 新连接读取到相同值
    let reopened = ConfigManager::new(&db_path).unwrap();
    let settings = ImportSettings::load(&reopened).await.unwrap();

    assert_eq!(settings.max_upload_bytes, 1024);
    assert_eq!(settings.allowed_formats, vec![FileFormat::Xlsx]);
    assert_eq!(settings.upload_dir, PathBuf::from("/var/tmp/crm"));
    assert_eq!(settings.admit("clients.csv"), None);
    assert_eq!(settings.admit("clients.XLSX"), Some(FileFormat::Xlsx));
}

#[tokio::test]
async fn test_zero_size_limit_falls_back() {
    let (_dir, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();
    config.set_global_config_value(config_keys::MAX_UPLOAD_BYTES, "0").unwrap();

    assert_eq!(config.get_max_upload_bytes().await.unwrap(), 10 * 1024 * 1024);
}
