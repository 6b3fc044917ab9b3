// ==========================================
// 工坊盈利核算系统 - OS 诊断记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 语义: 诊断记录只插入不更新,原始输入与派生结论一并冗余落库
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::service_order::{OsTotals, ServiceOrderDiagnostic};
use crate::domain::types::OrderClassification;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 时间戳存储格式
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// OsDiagnosticRepository - 诊断记录仓储
// ==========================================
pub struct OsDiagnosticRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OsDiagnosticRepository {
    /// 创建新的仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入一条诊断记录
    pub fn insert(&self, record: &ServiceOrderDiagnostic) -> RepositoryResult<()> {
        let parts_json = serde_json::to_string(&record.parts)?;
        let services_json = serde_json::to_string(&record.services)?;
        let third_party_json = serde_json::to_string(&record.third_party_services)?;
        let totals_json = serde_json::to_string(&record.totals)?;
        let recommendations_json = serde_json::to_string(&record.recommendations)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO os_diagnostic (
                diagnostic_id, workshop_id, os_number, reference_month,
                parts_json, services_json, third_party_json, totals_json,
                revenue_percentage, investment_percentage,
                ideal_hour_value, current_hour_value, total_estimated_time,
                tcmp2_ideal_value, tcmp2_difference,
                classification, recommendations_json, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
            )
            "#,
            params![
                record.diagnostic_id,
                record.workshop_id,
                record.os_number,
                record.reference_month,
                parts_json,
                services_json,
                third_party_json,
                totals_json,
                record.revenue_percentage,
                record.investment_percentage,
                record.ideal_hour_value,
                record.current_hour_value,
                record.total_estimated_time,
                record.tcmp2_ideal_value,
                record.tcmp2_difference,
                record.classification.to_db_str(),
                recommendations_json,
                record.created_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// 按诊断 ID 查询
    pub fn find_by_id(
        &self,
        diagnostic_id: &str,
    ) -> RepositoryResult<Option<ServiceOrderDiagnostic>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE diagnostic_id = ?1",
            SELECT_COLUMNS
        ))?;

        let result = stmt.query_row(params![diagnostic_id], map_row);

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某工坊某 OS 单号的全部诊断 (按时间升序)
    pub fn list_by_os_number(
        &self,
        workshop_id: &str,
        os_number: &str,
    ) -> RepositoryResult<Vec<ServiceOrderDiagnostic>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE workshop_id = ?1 AND os_number = ?2 ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![workshop_id, os_number], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 查询某工坊某参考月的全部诊断
    pub fn list_by_reference_month(
        &self,
        workshop_id: &str,
        reference_month: &str,
    ) -> RepositoryResult<Vec<ServiceOrderDiagnostic>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE workshop_id = ?1 AND reference_month = ?2 ORDER BY created_at ASC",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![workshop_id, reference_month], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 全库记录数 (CLI 概览用)
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM os_diagnostic", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

// ==========================================
// 行映射
// ==========================================

const SELECT_COLUMNS: &str = r#"
    SELECT
        diagnostic_id, workshop_id, os_number, reference_month,
        parts_json, services_json, third_party_json, totals_json,
        revenue_percentage, investment_percentage,
        ideal_hour_value, current_hour_value, total_estimated_time,
        tcmp2_ideal_value, tcmp2_difference,
        classification, recommendations_json, created_at
    FROM os_diagnostic
"#;

fn map_row(row: &Row) -> SqliteResult<ServiceOrderDiagnostic> {
    let totals: OsTotals = serde_json::from_str(&row.get::<_, String>(7)?).unwrap_or_default();

    Ok(ServiceOrderDiagnostic {
        diagnostic_id: row.get(0)?,
        workshop_id: row.get(1)?,
        os_number: row.get(2)?,
        reference_month: row.get(3)?,
        parts: serde_json::from_str(&row.get::<_, String>(4)?).unwrap_or_default(),
        services: serde_json::from_str(&row.get::<_, String>(5)?).unwrap_or_default(),
        third_party_services: serde_json::from_str(&row.get::<_, String>(6)?)
            .unwrap_or_default(),
        totals,
        revenue_percentage: row.get(8)?,
        investment_percentage: row.get(9)?,
        ideal_hour_value: row.get(10)?,
        current_hour_value: row.get(11)?,
        total_estimated_time: row.get(12)?,
        tcmp2_ideal_value: row.get(13)?,
        tcmp2_difference: row.get(14)?,
        classification: OrderClassification::from_str(&row.get::<_, String>(15)?),
        recommendations: serde_json::from_str(&row.get::<_, String>(16)?).unwrap_or_default(),
        created_at: chrono::NaiveDateTime::parse_from_str(
            &row.get::<_, String>(17)?,
            TIMESTAMP_FORMAT,
        )
        .unwrap_or_else(|_| chrono::NaiveDateTime::default()),
    })
}
