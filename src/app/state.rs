// ==========================================
// Courtier CRM - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::ImportApi;
use crate::config::{ConfigManager, ImportSettings};
use crate::db::open_sqlite_connection;
use crate::i18n;
use crate::repository::ClientRepositoryImpl;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "BROKER_CRM_DB_PATH";

/// 应用状态
///
/// 所有组件共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 客户仓储
    pub client_repo: Arc<ClientRepositoryImpl>,

    /// 客户导入API
    pub import_api: Arc<ImportApi<Arc<ClientRepositoryImpl>>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并建表
    /// 2. 从 config_kv 加载导入设置并应用语言
    /// 3. 创建仓储与API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );
        let settings = ImportSettings::load(config.as_ref())
            .await
            .map_err(|e| format!("导入设置加载失败: {}", e))?;
        i18n::set_locale(&settings.locale);

        let client_repo = Arc::new(ClientRepositoryImpl::from_connection(conn));
        let import_api = Arc::new(ImportApi::new(client_repo.clone(), settings));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            client_repo,
            import_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 BROKER_CRM_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./broker_crm.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("broker-crm");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("broker_crm.db");
    }

    path.to_string_lossy().to_string()
}
