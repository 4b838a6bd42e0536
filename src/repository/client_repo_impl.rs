// ==========================================
// Courtier CRM - 客户 Repository 实现
// ==========================================
// 职责: 客户表读写（使用 rusqlite）
// 依据: db::init_schema 中的 clients 表
// 红线: Repository 不含业务规则，只做数据映射
// 约束: numero_secu 唯一，重复插入返回 UniqueConstraintViolation
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::client::{ClientRecord, NewClientRecord};
use crate::domain::types::{ClientStatus, FamilySituation};
use crate::repository::client_repo::ClientRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    id, nom, prenom, date_naissance, numero_secu, telephone, email, adresse,
    situation_familiale, nombre_ayants_droit, mutuelle_actuelle, niveau_couverture,
    statut, notes, created_at, updated_at, created_by
"#;

// ==========================================
// ClientRepositoryImpl
// ==========================================
pub struct ClientRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ClientRepositoryImpl {
    /// 打开数据库文件并创建仓储
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（表结构需已通过 db::init_schema 建立）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 复用已有连接（与 ConfigManager 共享）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入客户并返回带 id 的记录
    pub fn insert(&self, client: NewClientRecord) -> RepositoryResult<ClientRecord> {
        let conn = self.get_conn()?;
        let now = Utc::now();

        conn.execute(
            r#"
            INSERT INTO clients (
                nom, prenom, date_naissance, numero_secu, telephone, email, adresse,
                situation_familiale, nombre_ayants_droit, mutuelle_actuelle, niveau_couverture,
                statut, notes, created_at, updated_at, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                client.last_name,
                client.first_name,
                client.birth_date.format("%Y-%m-%d").to_string(),
                client.national_id,
                client.phone,
                client.email,
                client.address,
                client.family_situation.code(),
                client.dependents,
                client.current_insurer,
                client.coverage_level,
                client.status.code(),
                client.notes,
                now.to_rfc3339(),
                now.to_rfc3339(),
                client.created_by,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Ok(ClientRecord::from_new(id, client, now))
    }

    /// 按 id 查询客户
    pub fn get_client(&self, id: i64) -> RepositoryResult<Option<ClientRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM clients WHERE id = ?1", SELECT_COLUMNS);

        let raw = conn
            .query_row(&sql, params![id], ClientRow::from_row)
            .optional()?;

        raw.map(ClientRow::into_record).transpose()
    }

    /// 按社保号查询客户
    pub fn find_by_national_id(&self, national_id: &str) -> RepositoryResult<Option<ClientRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM clients WHERE numero_secu = ?1", SELECT_COLUMNS);

        let raw = conn
            .query_row(&sql, params![national_id], ClientRow::from_row)
            .optional()?;

        raw.map(ClientRow::into_record).transpose()
    }

    /// 全部客户（按 id 升序）
    pub fn list_clients(&self) -> RepositoryResult<Vec<ClientRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM clients ORDER BY id", SELECT_COLUMNS);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], ClientRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ClientRow::into_record).collect()
    }

    pub fn count_clients(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[async_trait]
impl ClientRepository for ClientRepositoryImpl {
    async fn create_client(&self, client: NewClientRecord) -> RepositoryResult<ClientRecord> {
        self.insert(client)
    }
}

// ==========================================
// ClientRow - 数据库原始行
// ==========================================
// 枚举与日期以文本存储，读出后再解析
struct ClientRow {
    id: i64,
    last_name: String,
    first_name: String,
    birth_date: String,
    national_id: String,
    phone: String,
    email: String,
    address: String,
    family_situation: String,
    dependents: i64,
    current_insurer: Option<String>,
    coverage_level: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
    created_by: Option<i64>,
}

impl ClientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            last_name: row.get(1)?,
            first_name: row.get(2)?,
            birth_date: row.get(3)?,
            national_id: row.get(4)?,
            phone: row.get(5)?,
            email: row.get(6)?,
            address: row.get(7)?,
            family_situation: row.get(8)?,
            dependents: row.get(9)?,
            current_insurer: row.get(10)?,
            coverage_level: row.get(11)?,
            status: row.get(12)?,
            notes: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
            created_by: row.get(16)?,
        })
    }

    fn into_record(self) -> RepositoryResult<ClientRecord> {
        let birth_date = NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d")
            .map_err(|e| field_error("date_naissance", e))?;
        let family_situation = FamilySituation::from_code(&self.family_situation)
            .ok_or_else(|| field_error("situation_familiale", &self.family_situation))?;
        let status = ClientStatus::from_code(&self.status)
            .ok_or_else(|| field_error("statut", &self.status))?;
        let dependents =
            u32::try_from(self.dependents).map_err(|e| field_error("nombre_ayants_droit", e))?;

        Ok(ClientRecord {
            id: self.id,
            last_name: self.last_name,
            first_name: self.first_name,
            birth_date,
            national_id: self.national_id,
            phone: self.phone,
            email: self.email,
            address: self.address,
            family_situation,
            dependents,
            current_insurer: self.current_insurer,
            coverage_level: self.coverage_level,
            status,
            notes: self.notes,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
            created_by: self.created_by,
        })
    }
}

fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| field_error(field, e))
}

fn field_error(field: &str, message: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message: message.to_string(),
    }
}
