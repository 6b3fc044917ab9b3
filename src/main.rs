// ==========================================
// 工坊盈利核算系统 - CLI 主入口
// ==========================================
// 职责: 初始化日志/数据库/配置,输出库内概览
// 用法: workshop-profit [db_path]
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use workshop_profit::config::ConfigManager;
use workshop_profit::repository::{MonthlyFinancialsRepository, OsDiagnosticRepository};
use workshop_profit::{db, i18n, logging, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    // 数据库路径: 命令行参数优先,否则用户数据目录
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let conn = Arc::new(Mutex::new(db::open_and_init(&db_path)?));
    tracing::info!("{}", i18n::t("cli.db_ready"));

    // 按配置切换界面语言
    let config = ConfigManager::from_connection(conn.clone())?;
    i18n::set_locale(&config.ui_locale()?);
    tracing::info!("{}", i18n::t("cli.started"));

    // 库内概览
    let financials_repo = MonthlyFinancialsRepository::from_connection(conn.clone());
    let diagnostic_repo = OsDiagnosticRepository::from_connection(conn);

    let months = financials_repo.count_all()?;
    let diagnostics = diagnostic_repo.count_all()?;
    tracing::info!(
        "{}",
        i18n::t_with_args(
            "cli.summary",
            &[
                ("months", &months.to_string()),
                ("diagnostics", &diagnostics.to_string()),
            ],
        )
    );

    Ok(())
}

/// 默认数据库路径
///
/// 优先用户数据目录,不可用时退回当前目录
fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./workshop_profit.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("workshop-profit");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("workshop_profit.db");
    }

    path.to_string_lossy().to_string()
}
