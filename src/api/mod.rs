// ==========================================
// Courtier CRM - API 层
// ==========================================
// 职责: 提供业务 API 接口，供传输层（HTTP / CLI）调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse, TemplateDownload, UploadStore, UploadedFile};
