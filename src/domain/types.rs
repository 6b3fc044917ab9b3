// ==========================================
// 工坊盈利核算系统 - 领域类型定义
// ==========================================
// 依据: TCMP² 核算方法论 - 订单定价健康分级
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单分级 (Order Classification)
// ==========================================
// 红线: 分级互斥,判定顺序固定
// 序列化格式: snake_case (与存储及前端约定一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderClassification {
    Approved,            // 基本合格
    LowRevenueAlert,     // R70 占比不足告警
    HighInvestmentAlert, // I30 占比过高告警
    Rejected,            // 双项不达标,需整单复核
    Perfect,             // 定价健康
}

impl fmt::Display for OrderClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl OrderClassification {
    /// 从字符串解析分级
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low_revenue_alert" => OrderClassification::LowRevenueAlert,
            "high_investment_alert" => OrderClassification::HighInvestmentAlert,
            "rejected" => OrderClassification::Rejected,
            "perfect" => OrderClassification::Perfect,
            _ => OrderClassification::Approved, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OrderClassification::Approved => "approved",
            OrderClassification::LowRevenueAlert => "low_revenue_alert",
            OrderClassification::HighInvestmentAlert => "high_investment_alert",
            OrderClassification::Rejected => "rejected",
            OrderClassification::Perfect => "perfect",
        }
    }

    /// 是否告警级别（含 rejected）
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            OrderClassification::LowRevenueAlert
                | OrderClassification::HighInvestmentAlert
                | OrderClassification::Rejected
        )
    }
}

// ==========================================
// 订单金额档位 (Amount Tier)
// ==========================================
// 用于选择交付建议话术,仅取一档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmountTier {
    InformalSettlement, // 小额,可口头/线上结算
    ConfirmationCall,   // 中额,交付前电话确认
    InPersonDelivery,   // 大额,需到店当面交付
}

impl fmt::Display for AmountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountTier::InformalSettlement => write!(f, "INFORMAL_SETTLEMENT"),
            AmountTier::ConfirmationCall => write!(f, "CONFIRMATION_CALL"),
            AmountTier::InPersonDelivery => write!(f, "IN_PERSON_DELIVERY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_roundtrip() {
        for c in [
            OrderClassification::Approved,
            OrderClassification::LowRevenueAlert,
            OrderClassification::HighInvestmentAlert,
            OrderClassification::Rejected,
            OrderClassification::Perfect,
        ] {
            assert_eq!(OrderClassification::from_str(c.to_db_str()), c);
        }
    }

    #[test]
    fn test_classification_serde_codes() {
        let json = serde_json::to_string(&OrderClassification::LowRevenueAlert).unwrap();
        assert_eq!(json, "\"low_revenue_alert\"");
        assert_eq!(OrderClassification::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_is_alert() {
        assert!(OrderClassification::Rejected.is_alert());
        assert!(!OrderClassification::Perfect.is_alert());
        assert!(!OrderClassification::Approved.is_alert());
    }
}
