// ==========================================
// 工坊盈利核算系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 连锁汽修工坊的盈利核算与定价诊断 (决策支持)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 核算与诊断规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AmountTier, OrderClassification};

// 领域实体
pub use domain::{
    CostsInRate, CostsOutOfRate, DerivedFinancials, GoalProgress, MonthlyFinancials,
    MonthlyGoal, OsDiagnosticResult, OsTotals, PartItem, PartsCost, RevenueBreakdown,
    ServiceItem, ServiceOrderDiagnostic, ServiceOrderInput, ThirdPartyService,
};

// 引擎
pub use engine::{DreAverager, DreEngine, GoalEngine, OsDiagnosticEngine};

// API
pub use api::{DiagnosticApi, FinancialsApi, ReferenceRateProvider};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工坊盈利核算系统";

// ==========================================
// 预编译检查
// ==========================================
