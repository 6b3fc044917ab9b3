// ==========================================
// 工坊盈利核算系统 - DRE/TCMP² 核算引擎
// ==========================================
// 依据: TCMP² 核算方法论 - 月度损益口径
// 职责: 月度营收/成本拆分 → 时率、R70/I30、利润
// 红线: 纯函数,无状态,除数为 0 时结果为 0,永不抛错
// ==========================================

use crate::domain::financials::{
    CostsInRate, CostsOutOfRate, DerivedFinancials, MonthlyFinancials,
};
use crate::engine::aggregate::{div_or_zero, pct_or_zero, safe_sum};

// ==========================================
// DreEngine - DRE 核算引擎
// ==========================================
pub struct DreEngine {
    // 无状态引擎,持久化由调用方处理
}

impl DreEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算月度派生指标
    ///
    /// 表单每次编辑都会重算,复杂度 O(1),可逐键调用
    ///
    /// # 参数
    /// - `input`: 月度财务记录 (原始字段)
    ///
    /// # 返回
    /// DerivedFinancials 派生指标快照
    pub fn calculate(&self, input: &MonthlyFinancials) -> DerivedFinancials {
        // 1. 营收合计
        let total_revenue = safe_sum([
            input.revenue.parts_applied,
            input.revenue.services,
            input.revenue.other,
        ]);

        // 2. 成本合计
        let total_costs_in_rate = self.total_costs_in_rate(&input.costs_in_rate);
        let total_costs_out_of_rate = self.total_costs_out_of_rate(&input.costs_out_of_rate);

        // 3. 技师总可用工时与 TCMP² 时率
        let total_hours =
            input.productive_technicians as f64 * input.monthly_hours_per_technician;
        let tcmp2_value = div_or_zero(total_costs_in_rate, total_hours);

        // 4. R70/I30 营收构成比
        // 不变量: i30 恒等于 100 - r70,不独立计算
        let r70_base =
            total_revenue - input.parts_cost.applied_cost - input.parts_cost.stock_purchase;
        let r70_percentage = pct_or_zero(r70_base, total_revenue);
        let i30_percentage = 100.0 - r70_percentage;

        // 5. 利润
        // 不计入时率的成本不进时率,但计入利润口径
        let total_costs =
            total_costs_in_rate + total_costs_out_of_rate + input.parts_cost.applied_cost;
        let profit = total_revenue - total_costs;
        let profit_percentage = pct_or_zero(profit, total_revenue);

        DerivedFinancials {
            total_revenue,
            total_costs_in_rate,
            total_costs_out_of_rate,
            total_hours,
            tcmp2_value,
            r70_base,
            r70_percentage,
            i30_percentage,
            total_costs,
            profit,
            profit_percentage,
        }
    }

    // ==========================================
    // 成本分组求和
    // ==========================================

    fn total_costs_in_rate(&self, costs: &CostsInRate) -> f64 {
        safe_sum([
            costs.operational,
            costs.people,
            costs.pro_labore,
            costs.marketing,
            costs.maintenance,
            costs.third_party,
            costs.administrative,
        ])
    }

    fn total_costs_out_of_rate(&self, costs: &CostsOutOfRate) -> f64 {
        safe_sum([
            costs.financing,
            costs.consortium,
            costs.equipment_installments,
            costs.parts_invoices,
            costs.legal_processes,
            costs.land_purchase,
            costs.investments,
        ])
    }
}

impl Default for DreEngine {
    fn default() -> Self {
        Self::new()
    }
}
