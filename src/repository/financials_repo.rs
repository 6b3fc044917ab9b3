// ==========================================
// 工坊盈利核算系统 - 月度财务记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑,派生指标由调用方算好后传入
// 语义: 每 (workshop_id, month) 一条,INSERT OR REPLACE 实现 upsert
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::financials::{
    CostsInRate, CostsOutOfRate, MonthlyFinancials, PartsCost, RevenueBreakdown,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 时间戳存储格式
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// MonthlyFinancialsRepository - 月度财务仓储
// ==========================================
/// 月度财务记录仓储
/// 职责: 管理 monthly_financials 表的 CRUD 操作
/// 语义: 保存即覆盖 (last-write-wins),无乐观并发控制
pub struct MonthlyFinancialsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MonthlyFinancialsRepository {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入一条月度记录 (upsert)
    ///
    /// # 说明
    /// - 使用 INSERT OR REPLACE,主键 (workshop_id, month)
    /// - 嵌套分组序列化为 JSON 列
    pub fn upsert(&self, record: &MonthlyFinancials) -> RepositoryResult<()> {
        let revenue_json = serde_json::to_string(&record.revenue)?;
        let costs_in_rate_json = serde_json::to_string(&record.costs_in_rate)?;
        let costs_out_of_rate_json = serde_json::to_string(&record.costs_out_of_rate)?;
        let parts_cost_json = serde_json::to_string(&record.parts_cost)?;
        let calculated_json = record
            .calculated
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO monthly_financials (
                workshop_id, month,
                productive_technicians, monthly_hours_per_technician,
                revenue_json, costs_in_rate_json, costs_out_of_rate_json,
                parts_cost_json, calculated_json, note, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.workshop_id,
                record.month,
                record.productive_technicians,
                record.monthly_hours_per_technician,
                revenue_json,
                costs_in_rate_json,
                costs_out_of_rate_json,
                parts_cost_json,
                calculated_json,
                record.note,
                record.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// 按 (workshop_id, month) 查询
    pub fn find_by_month(
        &self,
        workshop_id: &str,
        month: &str,
    ) -> RepositoryResult<Option<MonthlyFinancials>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE workshop_id = ?1 AND month = ?2",
            SELECT_COLUMNS
        ))?;

        let result = stmt.query_row(params![workshop_id, month], map_row);

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某工坊在闭区间 [from, to] 内的所有月度记录
    ///
    /// YYYY-MM 字符串按字典序即时间序
    pub fn find_by_range(
        &self,
        workshop_id: &str,
        from: &str,
        to: &str,
    ) -> RepositoryResult<Vec<MonthlyFinancials>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE workshop_id = ?1 AND month >= ?2 AND month <= ?3 ORDER BY month ASC",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![workshop_id, from, to], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 查询某工坊的全部月度记录 (按月份升序)
    pub fn list_by_workshop(&self, workshop_id: &str) -> RepositoryResult<Vec<MonthlyFinancials>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE workshop_id = ?1 ORDER BY month ASC",
            SELECT_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![workshop_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 删除某月记录
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数 (0 或 1)
    pub fn delete_by_month(&self, workshop_id: &str, month: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count = conn.execute(
            "DELETE FROM monthly_financials WHERE workshop_id = ?1 AND month = ?2",
            params![workshop_id, month],
        )?;
        Ok(count)
    }

    /// 全库记录数 (CLI 概览用)
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM monthly_financials", [], |row| {
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
        workshop_id, month,
        productive_technicians, monthly_hours_per_technician,
        revenue_json, costs_in_rate_json, costs_out_of_rate_json,
        parts_cost_json, calculated_json, note, updated_at
    FROM monthly_financials
"#;

/// 将数据库行映射为领域记录
///
/// JSON 列损坏时回退为默认值,不让单行坏数据拖垮整页查询
fn map_row(row: &Row) -> SqliteResult<MonthlyFinancials> {
    let revenue: RevenueBreakdown = parse_json_column(row.get::<_, String>(4)?);
    let costs_in_rate: CostsInRate = parse_json_column(row.get::<_, String>(5)?);
    let costs_out_of_rate: CostsOutOfRate = parse_json_column(row.get::<_, String>(6)?);
    let parts_cost: PartsCost = parse_json_column(row.get::<_, String>(7)?);
    let calculated = row
        .get::<_, Option<String>>(8)?
        .and_then(|s| serde_json::from_str(&s).ok());

    Ok(MonthlyFinancials {
        workshop_id: row.get(0)?,
        month: row.get(1)?,
        productive_technicians: row.get(2)?,
        monthly_hours_per_technician: row.get(3)?,
        revenue,
        costs_in_rate,
        costs_out_of_rate,
        parts_cost,
        calculated,
        note: row.get(9)?,
        updated_at: chrono::NaiveDateTime::parse_from_str(
            &row.get::<_, String>(10)?,
            TIMESTAMP_FORMAT,
        )
        .unwrap_or_else(|_| chrono::NaiveDateTime::default()),
    })
}

fn parse_json_column<T: serde::de::DeserializeOwned + Default>(raw: String) -> T {
    serde_json::from_str(&raw).unwrap_or_default()
}
