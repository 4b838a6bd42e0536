// ==========================================
// Courtier CRM - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入入口所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::FileFormat;
use async_trait::async_trait;
use std::error::Error;
use std::path::PathBuf;

pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10485760 (10 MiB)
    async fn get_max_upload_bytes(&self) -> Result<u64, ConfigError>;

    /// 允许的文件格式
    ///
    /// # 默认值
    /// - csv, xlsx, xls
    async fn get_allowed_formats(&self) -> Result<Vec<FileFormat>, ConfigError>;

    /// 上传暂存目录
    ///
    /// # 默认值
    /// - uploads/imports
    async fn get_upload_dir(&self) -> Result<PathBuf, ConfigError>;

    /// 界面语言
    ///
    /// # 默认值
    /// - fr
    async fn get_locale(&self) -> Result<String, ConfigError>;
}
