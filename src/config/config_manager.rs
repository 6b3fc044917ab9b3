// ==========================================
// 工坊盈利核算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (scope_id='global')
// 约定: 配置缺失或解析失败时回退到代码内默认值
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::thresholds::DEFAULT_MONTHLY_HOURS_PER_TECHNICIAN;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 配置键全集
pub mod config_keys {
    /// 人均月工时默认值,新建月度记录预填
    pub const DEFAULT_MONTHLY_HOURS: &str = "default_monthly_hours_per_technician";
    /// 界面语言 ("zh-CN" 或 "en")
    pub const UI_LOCALE: &str = "ui_locale";
}

/// 默认界面语言
const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致,会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入配置值 (scope_id='global',存在即覆盖)
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取浮点配置值,解析失败视为缺失
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        Ok(self
            .get_value(key)?
            .and_then(|s| s.trim().parse::<f64>().ok()))
    }

    // ==========================================
    // 类型化读取 (带默认值)
    // ==========================================

    /// 人均月工时默认值
    pub fn default_monthly_hours(&self) -> Result<f64> {
        Ok(self
            .get_f64(config_keys::DEFAULT_MONTHLY_HOURS)?
            .unwrap_or(DEFAULT_MONTHLY_HOURS_PER_TECHNICIAN))
    }

    /// 界面语言
    pub fn ui_locale(&self) -> Result<String> {
        Ok(self
            .get_value(config_keys::UI_LOCALE)?
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string()))
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn test_config_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_get_missing_returns_none() {
        let config = test_config_manager();
        assert!(config.get_value("no_such_key").unwrap().is_none());
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let config = test_config_manager();
        config.set_value("k", "v1").unwrap();
        config.set_value("k", "v2").unwrap();
        assert_eq!(config.get_value("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_default_monthly_hours_fallback() {
        let config = test_config_manager();
        assert_eq!(
            config.default_monthly_hours().unwrap(),
            DEFAULT_MONTHLY_HOURS_PER_TECHNICIAN
        );

        config
            .set_value(config_keys::DEFAULT_MONTHLY_HOURS, "180")
            .unwrap();
        assert_eq!(config.default_monthly_hours().unwrap(), 180.0);
    }

    #[test]
    fn test_unparseable_f64_falls_back() {
        let config = test_config_manager();
        config
            .set_value(config_keys::DEFAULT_MONTHLY_HOURS, "abc")
            .unwrap();
        assert_eq!(
            config.default_monthly_hours().unwrap(),
            DEFAULT_MONTHLY_HOURS_PER_TECHNICIAN
        );
    }

    #[test]
    fn test_ui_locale_default() {
        let config = test_config_manager();
        assert_eq!(config.ui_locale().unwrap(), "zh-CN");
    }
}
