// ==========================================
// 工坊盈利核算系统 - 营收目标引擎
// ==========================================
// 职责: 月度目标 → 日均目标与进度
// 红线: 纯函数,按 22 个工作日折算
// ==========================================

use crate::domain::goal::{GoalProgress, MonthlyGoal};
use crate::engine::aggregate::pct_or_zero;
use crate::engine::thresholds::WORKING_DAYS_PER_MONTH;

// ==========================================
// GoalEngine - 目标进度引擎
// ==========================================
pub struct GoalEngine;

impl GoalEngine {
    pub fn new() -> Self {
        Self
    }

    /// 日均营收目标 = 月目标 / 22 个工作日
    pub fn daily_target(&self, revenue_target: f64) -> f64 {
        revenue_target / WORKING_DAYS_PER_MONTH
    }

    /// 计算目标进度
    ///
    /// # 参数
    /// - `goal`: 月度目标
    /// - `actual_revenue`: 截至当前的实际营收
    /// - `working_days_elapsed`: 已过工作日数 (超出 22 按 22 计)
    pub fn progress(
        &self,
        goal: &MonthlyGoal,
        actual_revenue: f64,
        working_days_elapsed: u32,
    ) -> GoalProgress {
        let daily_target = self.daily_target(goal.revenue_target);
        let elapsed = (working_days_elapsed as f64).min(WORKING_DAYS_PER_MONTH);

        GoalProgress {
            revenue_target: goal.revenue_target,
            daily_target,
            actual_revenue,
            progress_percentage: pct_or_zero(actual_revenue, goal.revenue_target),
            expected_percentage: pct_or_zero(elapsed * daily_target, goal.revenue_target),
        }
    }
}

impl Default for GoalEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: f64) -> MonthlyGoal {
        MonthlyGoal {
            workshop_id: "W001".to_string(),
            month: "2026-05".to_string(),
            revenue_target: target,
        }
    }

    #[test]
    fn test_daily_target() {
        let engine = GoalEngine::new();
        assert_eq!(engine.daily_target(22000.0), 1000.0);
    }

    #[test]
    fn test_progress_mid_month() {
        let engine = GoalEngine::new();
        let p = engine.progress(&goal(22000.0), 5500.0, 11);

        assert_eq!(p.daily_target, 1000.0);
        assert_eq!(p.progress_percentage, 25.0);
        assert_eq!(p.expected_percentage, 50.0);
    }

    #[test]
    fn test_progress_zero_target_guard() {
        let engine = GoalEngine::new();
        let p = engine.progress(&goal(0.0), 1000.0, 5);

        assert_eq!(p.progress_percentage, 0.0);
        assert_eq!(p.expected_percentage, 0.0);
    }

    #[test]
    fn test_elapsed_days_clamped() {
        let engine = GoalEngine::new();
        let p = engine.progress(&goal(22000.0), 22000.0, 30);

        assert_eq!(p.expected_percentage, 100.0);
    }
}
