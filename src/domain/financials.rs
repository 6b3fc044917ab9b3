// ==========================================
// 工坊盈利核算系统 - 月度财务记录 (DRE)
// ==========================================
// 依据: TCMP² 核算方法论 - DRE 月度损益口径
// 红线: calculated 永远由原始字段重算,不允许手工修改
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// 营收构成
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    /// 已用配件销售收入
    pub parts_applied: f64,
    /// 工时服务收入
    pub services: f64,
    /// 其他收入
    pub other: f64,
}

// ==========================================
// 计入时率的成本 (进入 TCMP² 分子)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostsInRate {
    pub operational: f64,
    pub people: f64,
    pub pro_labore: f64,
    pub marketing: f64,
    pub maintenance: f64,
    pub third_party: f64,
    pub administrative: f64,
}

// ==========================================
// 不计入时率的成本 (不进时率,计入利润)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostsOutOfRate {
    pub financing: f64,
    pub consortium: f64,
    pub equipment_installments: f64,
    pub parts_invoices: f64,
    pub legal_processes: f64,
    pub land_purchase: f64,
    pub investments: f64,
}

// ==========================================
// 配件成本
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartsCost {
    /// 已用配件成本
    pub applied_cost: f64,
    /// 备件采购支出
    pub stock_purchase: f64,
}

// ==========================================
// 派生指标 (Derived Financials)
// ==========================================
// 全部由 DreEngine 计算得出,持久化时作为冗余快照一并存储
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFinancials {
    pub total_revenue: f64,
    pub total_costs_in_rate: f64,
    pub total_costs_out_of_rate: f64,
    /// 技师总可用工时 = 技师数 × 人均月工时
    pub total_hours: f64,
    /// 每技术工时运营成本率
    pub tcmp2_value: f64,
    /// R70 基数 = 总营收 - 已用配件成本 - 备件采购
    pub r70_base: f64,
    pub r70_percentage: f64,
    /// 恒等于 100 - r70_percentage
    pub i30_percentage: f64,
    pub total_costs: f64,
    /// 可为负
    pub profit: f64,
    pub profit_percentage: f64,
}

// ==========================================
// 月度财务记录 (MonthlyFinancials)
// ==========================================
// 每 (workshop_id, month) 唯一一条,保存即覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFinancials {
    pub workshop_id: String,
    /// 格式 YYYY-MM；合成平均记录使用哨兵值,见 engine::averager
    pub month: String,
    /// 生产性技师数量 (>= 1)
    pub productive_technicians: u32,
    pub monthly_hours_per_technician: f64,
    pub revenue: RevenueBreakdown,
    pub costs_in_rate: CostsInRate,
    pub costs_out_of_rate: CostsOutOfRate,
    pub parts_cost: PartsCost,
    /// 派生指标,保存前由调用方重算
    pub calculated: Option<DerivedFinancials>,
    /// 备注；合成平均记录在此标注来源月数
    pub note: Option<String>,
    pub updated_at: NaiveDateTime,
}
