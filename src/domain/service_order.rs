// ==========================================
// 工坊盈利核算系统 - 服务订单 (OS) 诊断记录
// ==========================================
// 依据: TCMP² 核算方法论 - OS 定价健康诊断
// 红线: 诊断结论落库后不可变,读取时不重算
// ==========================================

use crate::domain::types::OrderClassification;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// 订单行项
// ==========================================

/// 配件行项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartItem {
    pub name: String,
    pub sale_value: f64,
    pub cost_value: f64,
    /// 常规易耗件(机油/滤芯等),定价应对标市场价
    pub is_commodity: bool,
}

/// 工时服务行项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub name: String,
    pub charged_value: f64,
    pub description_steps: Vec<String>,
    /// 推算工时(小时),由诊断引擎填充,输入时为 0
    pub estimated_time: f64,
}

/// 外协服务行项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdPartyService {
    pub name: String,
    pub cost: f64,
}

// ==========================================
// 诊断输入
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderInput {
    pub parts: Vec<PartItem>,
    pub services: Vec<ServiceItem>,
    pub third_party_services: Vec<ThirdPartyService>,
}

// ==========================================
// 订单合计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OsTotals {
    pub total_parts_sale: f64,
    pub total_parts_cost: f64,
    pub total_services_value: f64,
    pub total_third_party_costs: f64,
    /// 订单总额 = 配件销售 + 工时服务
    pub total_os: f64,
}

// ==========================================
// 诊断结果 (引擎输出)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsDiagnosticResult {
    /// 服务行项,estimated_time 已填充
    pub services: Vec<ServiceItem>,
    pub totals: OsTotals,
    pub revenue_percentage: f64,
    pub investment_percentage: f64,
    /// 参考月 TCMP² 费率,参考月缺失时为 0
    pub ideal_hour_value: f64,
    pub current_hour_value: f64,
    pub total_estimated_time: f64,
    pub tcmp2_ideal_value: f64,
    pub tcmp2_difference: f64,
    pub classification: OrderClassification,
    /// 建议列表,插入顺序即展示顺序
    pub recommendations: Vec<String>,
}

// ==========================================
// 诊断记录 (持久化实体)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderDiagnostic {
    pub diagnostic_id: String,
    pub workshop_id: String,
    pub os_number: String,
    /// 格式 YYYY-MM,弱引用对应月度财务记录
    pub reference_month: String,
    pub parts: Vec<PartItem>,
    pub services: Vec<ServiceItem>,
    pub third_party_services: Vec<ThirdPartyService>,
    pub totals: OsTotals,
    pub revenue_percentage: f64,
    pub investment_percentage: f64,
    pub ideal_hour_value: f64,
    pub current_hour_value: f64,
    pub total_estimated_time: f64,
    pub tcmp2_ideal_value: f64,
    pub tcmp2_difference: f64,
    pub classification: OrderClassification,
    pub recommendations: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl ServiceOrderDiagnostic {
    /// 参考月费率是否可用
    ///
    /// ideal_hour_value == 0 表示参考月无 TCMP² 费率,
    /// 工时推算字段全部按 0 降级,前端应展示"费率缺失"而非"定价完美"
    pub fn reference_rate_available(&self) -> bool {
        self.ideal_hour_value > 0.0
    }
}
