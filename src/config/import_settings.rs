// ==========================================
// Courtier CRM - 导入设置快照
// ==========================================
// 职责: 一次请求内使用的导入配置值（不再访问数据库）
// 来源: ImportConfigReader（config_kv）或 Default
// ==========================================

use crate::config::config_manager::defaults;
use crate::config::import_config_trait::{ConfigError, ImportConfigReader};
use crate::domain::types::FileFormat;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub max_upload_bytes: u64,
    pub allowed_formats: Vec<FileFormat>,
    pub upload_dir: PathBuf,
    pub locale: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            allowed_formats: defaults::allowed_formats(),
            upload_dir: PathBuf::from(defaults::UPLOAD_DIR),
            locale: defaults::LOCALE.to_string(),
        }
    }
}

impl ImportSettings {
    /// 从配置读取器加载快照
    pub async fn load(reader: &dyn ImportConfigReader) -> Result<Self, ConfigError> {
        Ok(Self {
            max_upload_bytes: reader.get_max_upload_bytes().await?,
            allowed_formats: reader.get_allowed_formats().await?,
            upload_dir: reader.get_upload_dir().await?,
            locale: reader.get_locale().await?,
        })
    }

    /// 使用指定暂存目录（其他值保持不变）
    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// 按文件名判断格式是否允许（扩展名大小写不敏感）
    ///
    /// # 返回
    /// - Some(FileFormat): 已识别且在允许列表内
    /// - None: 未识别或不允许
    pub fn admit(&self, file_name: &str) -> Option<FileFormat> {
        FileFormat::from_file_name(file_name).filter(|f| self.allowed_formats.contains(f))
    }
}
