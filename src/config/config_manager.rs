// ==========================================
// Courtier CRM - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// 格式错误的值回退默认值并记录 warn
// ==========================================

use crate::config::import_config_trait::{ConfigError, ImportConfigReader};
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::types::FileFormat;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ConfigError> {
        Ok(self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?)
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.lock()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError> {
        let default = defaults::MAX_UPLOAD_BYTES.to_string();
        let value = self.get_config_or_default(config_keys::MAX_UPLOAD_BYTES, &default)?;

        match value.trim().parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => {
                warn!(
                    config_key = config_keys::MAX_UPLOAD_BYTES,
                    raw_value = %value,
                    "上传大小配置格式错误，使用默认值"
                );
                Ok(defaults::MAX_UPLOAD_BYTES)
            }
        }
    }

    async fn get_allowed_formats(&self) -> Result<Vec<FileFormat>, ConfigError> {
        let value = self.get_config_or_default(
            config_keys::ALLOWED_EXTENSIONS,
            defaults::ALLOWED_EXTENSIONS,
        )?;

        let mut formats: Vec<FileFormat> = Vec::new();
        for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match FileFormat::from_extension(raw) {
                Some(format) if !formats.contains(&format) => formats.push(format),
                Some(_) => {}
                None => warn!(
                    config_key = config_keys::ALLOWED_EXTENSIONS,
                    extension = raw,
                    "不支持的扩展名，已忽略"
                ),
            }
        }

        if formats.is_empty() {
            Ok(defaults::allowed_formats())
        } else {
            Ok(formats)
        }
    }

    async fn get_upload_dir(&self) -> Result<PathBuf, ConfigError> {
        let value = self.get_config_or_default(config_keys::UPLOAD_DIR, defaults::UPLOAD_DIR)?;
        let trimmed = value.trim();

        if trimmed.is_empty() {
            Ok(PathBuf::from(defaults::UPLOAD_DIR))
        } else {
            Ok(PathBuf::from(trimmed))
        }
    }

    async fn get_locale(&self) -> Result<String, ConfigError> {
        let value = self.get_config_or_default(config_keys::LOCALE, defaults::LOCALE)?;

        match value.trim().to_lowercase().as_str() {
            "fr" => Ok("fr".to_string()),
            "en" => Ok("en".to_string()),
            _ => {
                warn!(config_key = config_keys::LOCALE, raw_value = %value, "未知语言，使用默认值");
                Ok(defaults::LOCALE.to_string())
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const MAX_UPLOAD_BYTES: &str = "import/max_upload_bytes";
    pub const ALLOWED_EXTENSIONS: &str = "import/allowed_extensions";
    pub const UPLOAD_DIR: &str = "import/upload_dir";

    // 界面
    pub const LOCALE: &str = "app/locale";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    use crate::domain::types::FileFormat;

    pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
    pub const ALLOWED_EXTENSIONS: &str = "csv,xlsx,xls";
    pub const UPLOAD_DIR: &str = "uploads/imports";
    pub const LOCALE: &str = "fr";

    pub fn allowed_formats() -> Vec<FileFormat> {
        vec![FileFormat::Csv, FileFormat::Xlsx, FileFormat::Xls]
    }
}
