// ==========================================
// 工坊盈利核算系统 - 月度营收目标
// ==========================================
// 职责: 目标与进度的领域结构,计算逻辑见 engine::goal
// ==========================================

use serde::{Deserialize, Serialize};

/// 月度营收目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGoal {
    pub workshop_id: String,
    /// 格式 YYYY-MM
    pub month: String,
    pub revenue_target: f64,
}

/// 目标进度 (派生)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub revenue_target: f64,
    /// 按 22 个工作日折算的日均目标
    pub daily_target: f64,
    pub actual_revenue: f64,
    /// 实际完成百分比
    pub progress_percentage: f64,
    /// 按已过工作日应达到的百分比
    pub expected_percentage: f64,
}
