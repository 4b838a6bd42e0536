// ==========================================
// Courtier CRM - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod import_settings;

pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ConfigError, ImportConfigReader};
pub use import_settings::ImportSettings;
