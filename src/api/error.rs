// ==========================================
// Courtier CRM - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将导入/仓储错误转换为面向用户的消息
// 每个错误对应一个 HTTP 风格状态码（供上层传输层使用）
// ==========================================

use crate::i18n::t;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求准入错误
    // ==========================================
    #[error("{}", t("import.no_file"))]
    NoFile,

    #[error("{}", t("import.unauthorized"))]
    Unauthorized,

    #[error("Type de fichier non supporté: {0} (seuls .xlsx, .xls et .csv sont acceptés)")]
    UnsupportedFileType(String),

    #[error("Fichier trop volumineux: {size} octets (maximum {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Entrée invalide: {0}")]
    InvalidInput(String),

    #[error("Ressource introuvable: {0}")]
    NotFound(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("{}: {}", t("import.failed"), .0)]
    ImportFailed(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Erreur de base de données: {0}")]
    DatabaseError(String),

    #[error("Connexion à la base impossible: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Erreur interne: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NoFile | ApiError::InvalidInput(_) => 400,
            ApiError::Unauthorized => 401,
            ApiError::NotFound(_) => 404,
            ApiError::FileTooLarge { .. } => 413,
            ApiError::UnsupportedFileType(_) => 415,
            ApiError::ImportFailed(_)
            | ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => 500,
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedFormat(ext) => ApiError::UnsupportedFileType(ext),
            ImportError::FileTooLarge { size, max } => ApiError::FileTooLarge { size, max },
            ImportError::FileNotFound(msg) => ApiError::NotFound(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportFailed(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("verrou indisponible: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("champ {}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
