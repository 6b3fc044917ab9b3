// ==========================================
// 工坊盈利核算系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句，避免各仓储各自维护 schema
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化核心表结构（幂等）
///
/// 表:
/// - monthly_financials: 月度财务记录，主键 (workshop_id, month)，upsert 语义
/// - os_diagnostic: OS 定价诊断记录，写入后不再修改
/// - config_kv: 键值配置，scope_id 预留多级覆写
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS monthly_financials (
            workshop_id                  TEXT NOT NULL,
            month                        TEXT NOT NULL,
            productive_technicians       INTEGER NOT NULL,
            monthly_hours_per_technician REAL NOT NULL,
            revenue_json                 TEXT NOT NULL,
            costs_in_rate_json           TEXT NOT NULL,
            costs_out_of_rate_json       TEXT NOT NULL,
            parts_cost_json              TEXT NOT NULL,
            calculated_json              TEXT,
            note                         TEXT,
            updated_at                   TEXT NOT NULL,
            PRIMARY KEY (workshop_id, month)
        );

        CREATE TABLE IF NOT EXISTS os_diagnostic (
            diagnostic_id         TEXT PRIMARY KEY,
            workshop_id           TEXT NOT NULL,
            os_number             TEXT NOT NULL,
            reference_month       TEXT NOT NULL,
            parts_json            TEXT NOT NULL,
            services_json         TEXT NOT NULL,
            third_party_json      TEXT NOT NULL,
            totals_json           TEXT NOT NULL,
            revenue_percentage    REAL NOT NULL,
            investment_percentage REAL NOT NULL,
            ideal_hour_value      REAL NOT NULL,
            current_hour_value    REAL NOT NULL,
            total_estimated_time  REAL NOT NULL,
            tcmp2_ideal_value     REAL NOT NULL,
            tcmp2_difference      REAL NOT NULL,
            classification        TEXT NOT NULL,
            recommendations_json  TEXT NOT NULL,
            created_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_os_diagnostic_os
            ON os_diagnostic (workshop_id, os_number);
        CREATE INDEX IF NOT EXISTS idx_os_diagnostic_month
            ON os_diagnostic (workshop_id, reference_month);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

/// 打开连接并初始化表结构
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}
