// ==========================================
// Courtier CRM - 客户导入API
// ==========================================
// 职责: 上传准入（操作员/文件/格式/大小）→ 导入 → 响应封装；模板下载
// 准入失败时暂存文件同样被删除
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportSettings;
use crate::domain::client::ClientRecord;
use crate::domain::import::{ImportRowError, ImportSummary};
use crate::domain::types::FileFormat;
use crate::i18n::t_in;
use crate::importer::error::ImportError;
use crate::importer::{ClientImporter, ClientImporterImpl, TempUpload, TEMPLATE_CSV, TEMPLATE_FILE_NAME};
use crate::repository::ClientRepository;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 已暂存的上传文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// 客户端提供的原始文件名（用于格式判断）
    pub original_name: String,
    /// 暂存路径
    pub path: PathBuf,
    /// 字节数
    pub size: u64,
}

/// 上传暂存目录
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 写入上传字节到唯一文件名 `<毫秒时间戳>-<uuid>.<扩展名>`
    pub async fn stage(&self, bytes: &[u8], original_name: &str) -> ApiResult<UploadedFile> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ApiError::InternalError(format!("{}: {}", self.dir.display(), e)))?;

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        let file_name = format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        );
        let path = self.dir.join(file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::InternalError(format!("{}: {}", path.display(), e)))?;

        Ok(UploadedFile {
            original_name: original_name.to_string(),
            path,
            size: bytes.len() as u64,
        })
    }
}

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 本地化摘要（如 "Import terminé: 2 clients importés"）
    pub message: String,
    pub imported_count: usize,
    pub error_count: usize,
    /// 新建的客户记录（按文件顺序）
    pub clients: Vec<ClientRecord>,
    /// 行级错误（按文件顺序）
    pub errors: Vec<ImportRowError>,
}

impl ImportApiResponse {
    pub fn from_summary(summary: ImportSummary, locale: &str) -> Self {
        let count = summary.imported_count.to_string();
        Self {
            message: t_in(locale, "import.completed", &[("count", count.as_str())]),
            imported_count: summary.imported_count,
            error_count: summary.error_count,
            clients: summary.created_records,
            errors: summary.errors,
        }
    }
}

/// 模板下载内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDownload {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub content: &'static str,
}

/// 客户导入API
pub struct ImportApi<R>
where
    R: ClientRepository,
{
    importer: ClientImporterImpl<R>,
    upload_store: UploadStore,
    settings: ImportSettings,
}

impl<R> ImportApi<R>
where
    R: ClientRepository,
{
    /// 创建新的 ImportApi 实例
    pub fn new(repo: R, settings: ImportSettings) -> Self {
        Self::with_importer(ClientImporterImpl::new(repo), settings)
    }

    pub fn with_importer(importer: ClientImporterImpl<R>, settings: ImportSettings) -> Self {
        Self {
            importer: importer.with_locale(settings.locale.clone()),
            upload_store: UploadStore::new(settings.upload_dir.clone()),
            settings,
        }
    }

    pub fn upload_store(&self) -> &UploadStore {
        &self.upload_store
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// 导入客户文件
    ///
    /// # 参数
    /// - upload: 已暂存的上传文件（None 表示请求未携带文件）
    /// - operator_id: 已认证操作员（None 表示未认证）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入汇总
    /// - Err(ApiError): 准入失败或致命导入错误
    #[instrument(skip(self, upload))]
    pub async fn import_clients(
        &self,
        upload: Option<UploadedFile>,
        operator_id: Option<i64>,
    ) -> ApiResult<ImportApiResponse> {
        // 暂存文件立即交给守卫，任何准入失败都会删除
        let staged = upload.map(|file| {
            let guard = TempUpload::new(file.path.clone());
            (file, guard)
        });

        let operator_id = operator_id.ok_or(ApiError::Unauthorized)?;
        let (file, guard) = match staged {
            Some((file, guard)) if !file.original_name.trim().is_empty() => (file, guard),
            _ => return Err(ApiError::NoFile),
        };

        let format = self.admit(&file)?;

        info!(
            original_name = %file.original_name,
            size = file.size,
            %format,
            "上传准入通过"
        );

        let summary = self.importer.import_file(guard, format, operator_id).await?;

        Ok(ImportApiResponse::from_summary(summary, &self.settings.locale))
    }

    /// 下载导入模板
    pub fn download_template(&self) -> TemplateDownload {
        TemplateDownload {
            file_name: TEMPLATE_FILE_NAME,
            content_type: "text/csv; charset=utf-8",
            content: TEMPLATE_CSV,
        }
    }

    // 格式与大小检查（在解码之前）
    fn admit(&self, file: &UploadedFile) -> Result<FileFormat, ImportError> {
        let format = self.settings.admit(&file.original_name).ok_or_else(|| {
            let ext = Path::new(&file.original_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e))
                .unwrap_or_else(|| file.original_name.clone());
            warn!(original_name = %file.original_name, "文件类型不支持");
            ImportError::UnsupportedFormat(ext)
        })?;

        if file.size > self.settings.max_upload_bytes {
            warn!(size = file.size, max = self.settings.max_upload_bytes, "文件超过大小上限");
            return Err(ImportError::FileTooLarge {
                size: file.size,
                max: self.settings.max_upload_bytes,
            });
        }

        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::NewClientRecord;
    use crate::repository::RepositoryResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct CountingRepo {
        next_id: AtomicI64,
    }

    #[async_trait]
    impl ClientRepository for CountingRepo {
        async fn create_client(&self, client: NewClientRecord) -> RepositoryResult<ClientRecord> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ClientRecord::from_new(id, client, Utc::now()))
        }
    }

    fn api(dir: &Path) -> ImportApi<CountingRepo> {
        let settings = ImportSettings::default().with_upload_dir(dir);
        ImportApi::new(CountingRepo::default(), settings)
    }

    #[tokio::test]
    async fn test_stage_uses_unique_names_and_lowercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("imports"));

        let a = store.stage(b"a", "Clients.CSV").await.unwrap();
        let b = store.stage(b"bb", "Clients.CSV").await.unwrap();

        assert_ne!(a.path, b.path);
        assert!(a.path.to_string_lossy().ends_with(".csv"));
        assert_eq!(b.size, 2);
        assert_eq!(a.original_name, "Clients.CSV");
    }

    #[tokio::test]
    async fn test_template_imports_two_clients() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(dir.path());
        let template = api.download_template();
        let upload = api
            .upload_store()
            .stage(template.content.as_bytes(), template.file_name)
            .await
            .unwrap();
        let staged_path = upload.path.clone();

        let response = api.import_clients(Some(upload), Some(1)).await.unwrap();

        assert_eq!(response.imported_count, 2);
        assert_eq!(response.error_count, 0);
        assert_eq!(response.message, "Import terminé: 2 clients importés");
        assert!(!staged_path.exists());
    }

    #[tokio::test]
    async fn test_missing_operator_is_unauthorized_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(dir.path());
        let upload = api.upload_store().stage(b"nom\n", "a.csv").await.unwrap();
        let staged_path = upload.path.clone();

        let err = api.import_clients(Some(upload), None).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert!(!staged_path.exists());
    }

    #[tokio::test]
    async fn test_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(dir.path());

        let err = api.import_clients(None, Some(1)).await.unwrap_err();

        assert!(matches!(err, ApiError::NoFile));
        assert_eq!(err.to_string(), "Aucun fichier téléversé");
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(dir.path());
        let upload = api.upload_store().stage(b"%PDF-1.4", "contrat.pdf").await.unwrap();
        let staged_path = upload.path.clone();

        let err = api.import_clients(Some(upload), Some(1)).await.unwrap_err();

        assert!(matches!(err, ApiError::UnsupportedFileType(ref ext) if ext == ".pdf"));
        assert!(!staged_path.exists());
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ImportSettings::default()
            .with_upload_dir(dir.path())
            .with_max_upload_bytes(8);
        let api = ImportApi::new(CountingRepo::default(), settings);
        let upload = api.upload_store().stage(TEMPLATE_CSV.as_bytes(), "t.csv").await.unwrap();
        let staged_path = upload.path.clone();

        let err = api.import_clients(Some(upload), Some(1)).await.unwrap_err();

        assert!(matches!(err, ApiError::FileTooLarge { max: 8, .. }));
        assert!(!staged_path.exists());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let mut summary = ImportSummary::new();
        summary.record_failure(3, "email manquant");

        let json = serde_json::to_value(ImportApiResponse::from_summary(summary, "fr")).unwrap();

        assert_eq!(json["importedCount"], 0);
        assert_eq!(json["errorCount"], 1);
        assert_eq!(json["errors"][0]["line"], 3);
        assert_eq!(json["errors"][0]["reason"], "email manquant");
        assert_eq!(json["message"], "Import terminé: 0 clients importés");
    }

    #[test]
    fn test_response_message_follows_locale() {
        let response = ImportApiResponse::from_summary(ImportSummary::new(), "en");
        assert_eq!(response.message, "Import finished: 0 clients imported");
    }

    #[tokio::test]
    async fn test_row_reasons_share_response_locale() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = ImportSettings::default().with_upload_dir(dir.path());
        settings.locale = "en".to_string();
        let api = ImportApi::new(CountingRepo::default(), settings);
        let content = "nom,prenom,email,telephone,date_naissance,numero_secu,adresse,situation_familiale\n\
                       Martin,Marie,,0200000000,1985-05-20,222,Lyon,celibataire\n\
                       Petit,Paul,p@x.fr,0300000000,20/05/1985,333,Nantes,marie\n";
        let upload = api.upload_store().stage(content.as_bytes(), "c.csv").await.unwrap();

        let response = api.import_clients(Some(upload), Some(1)).await.unwrap();

        assert_eq!(response.message, "Import finished: 0 clients imported");
        assert_eq!(response.errors[0].reason, "email missing");
        assert_eq!(response.errors[1].reason, "invalid date_naissance: 20/05/1985");
    }
}
