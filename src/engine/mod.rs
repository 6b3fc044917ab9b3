// ==========================================
// 工坊盈利核算系统 - 引擎层
// ==========================================
// 职责: 实现核算与诊断规则,纯函数
// 红线: Engine 不碰数据库,所有判定必须可解释
// ==========================================

pub mod aggregate;
pub mod averager;
pub mod diagnostic;
pub mod dre;
pub mod goal;
pub mod thresholds;

// 重导出核心引擎
pub use averager::{DreAverager, AVERAGE_MONTH_SENTINEL};
pub use diagnostic::OsDiagnosticEngine;
pub use dre::DreEngine;
pub use goal::GoalEngine;
