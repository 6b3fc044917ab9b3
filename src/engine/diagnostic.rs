// ==========================================
// 工坊盈利核算系统 - OS 定价诊断引擎
// ==========================================
// 依据: TCMP² 核算方法论 - 订单定价健康诊断
// 职责: 订单行项 + 参考月时率 → 工时推算、偏差、分级、建议
// 红线: 纯函数,除数为 0 时结果为 0; 分级判定顺序固定不可调
// ==========================================

use crate::domain::service_order::{
    OsDiagnosticResult, OsTotals, ServiceItem, ServiceOrderInput,
};
use crate::domain::types::{AmountTier, OrderClassification};
use crate::engine::aggregate::{div_or_zero, pct_or_zero, safe_sum};
use crate::engine::thresholds::{
    CONFIRMATION_CALL_LIMIT, I30_LIMIT_PCT, INFORMAL_SETTLEMENT_LIMIT, LABOR_MARKUP_FACTOR,
    R70_TARGET_PCT, TCMP2_DIFFERENCE_TOLERANCE,
};

// ==========================================
// OsDiagnosticEngine - 订单诊断引擎
// ==========================================
pub struct OsDiagnosticEngine {
    // 无状态引擎,参考月费率由调用方查询后传入
}

impl OsDiagnosticEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 诊断一张服务订单
    ///
    /// # 参数
    /// - `order`: 订单行项 (配件/工时服务/外协)
    /// - `ideal_hour_value`: 参考月 TCMP² 时率,参考月缺失时传 0
    ///
    /// # 返回
    /// OsDiagnosticResult,其中 services 的 estimated_time 已填充
    ///
    /// # 降级
    /// ideal_hour_value == 0 时工时推算字段全部为 0,
    /// 分级仍按营收/配件占比计算,结果照常可落库
    pub fn diagnose(&self, order: &ServiceOrderInput, ideal_hour_value: f64) -> OsDiagnosticResult {
        // 1. 订单合计
        let totals = self.calculate_totals(order);

        // 2. 营收/配件占比 (R70/I30 的订单口径)
        let revenue_percentage =
            pct_or_zero(totals.total_os - totals.total_parts_cost, totals.total_os);
        let investment_percentage = pct_or_zero(totals.total_parts_cost, totals.total_os);

        // 3. 逐服务工时推算
        // 定价恒等式: 报价 = 2 × 工时 × 时率
        let services: Vec<ServiceItem> = order
            .services
            .iter()
            .map(|s| ServiceItem {
                estimated_time: div_or_zero(
                    s.charged_value,
                    LABOR_MARKUP_FACTOR * ideal_hour_value,
                ),
                ..s.clone()
            })
            .collect();

        let total_estimated_time = safe_sum(services.iter().map(|s| s.estimated_time));
        let tcmp2_ideal_value = total_estimated_time * LABOR_MARKUP_FACTOR * ideal_hour_value;
        let tcmp2_difference = totals.total_services_value - tcmp2_ideal_value;
        let current_hour_value = div_or_zero(totals.total_services_value, total_estimated_time);

        // 4. 分级
        let classification =
            self.classify(revenue_percentage, investment_percentage, tcmp2_difference);

        // 5. 建议列表
        let recommendations = self.build_recommendations(
            order,
            revenue_percentage,
            investment_percentage,
            tcmp2_difference,
            totals.total_os,
        );

        OsDiagnosticResult {
            services,
            totals,
            revenue_percentage,
            investment_percentage,
            ideal_hour_value,
            current_hour_value,
            total_estimated_time,
            tcmp2_ideal_value,
            tcmp2_difference,
            classification,
            recommendations,
        }
    }

    // ==========================================
    // 订单合计
    // ==========================================

    fn calculate_totals(&self, order: &ServiceOrderInput) -> OsTotals {
        let total_parts_sale = safe_sum(order.parts.iter().map(|p| p.sale_value));
        let total_parts_cost = safe_sum(order.parts.iter().map(|p| p.cost_value));
        let total_services_value = safe_sum(order.services.iter().map(|s| s.charged_value));
        let total_third_party_costs =
            safe_sum(order.third_party_services.iter().map(|t| t.cost));

        OsTotals {
            total_parts_sale,
            total_parts_cost,
            total_services_value,
            total_third_party_costs,
            total_os: total_parts_sale + total_services_value,
        }
    }

    // ==========================================
    // 分级判定
    // ==========================================

    /// 订单分级
    ///
    /// 判定顺序 (固定):
    /// 1. 初始为 approved
    /// 2. 营收占比 < 70 → low_revenue_alert
    /// 3. 配件占比 > 30 → 已是 low_revenue_alert 则 rejected,否则 high_investment_alert
    /// 4. 终检无条件执行: 占比双达标且差额不低于容差 → perfect
    ///    (该终检会覆盖此前写入的告警状态)
    fn classify(
        &self,
        revenue_percentage: f64,
        investment_percentage: f64,
        tcmp2_difference: f64,
    ) -> OrderClassification {
        let mut classification = OrderClassification::Approved;

        if revenue_percentage < R70_TARGET_PCT {
            classification = OrderClassification::LowRevenueAlert;
        }

        if investment_percentage > I30_LIMIT_PCT {
            classification = if classification == OrderClassification::LowRevenueAlert {
                OrderClassification::Rejected
            } else {
                OrderClassification::HighInvestmentAlert
            };
        }

        if revenue_percentage >= R70_TARGET_PCT
            && investment_percentage <= I30_LIMIT_PCT
            && tcmp2_difference >= TCMP2_DIFFERENCE_TOLERANCE
        {
            classification = OrderClassification::Perfect;
        }

        classification
    }

    // ==========================================
    // 建议生成
    // ==========================================

    /// 生成建议列表
    ///
    /// 追加顺序固定,列表顺序即前端展示顺序:
    /// 1. 营收占比不足
    /// 2. 配件占比过高
    /// 3. 定价健康确认
    /// 4. 工时定价偏低 (带具体差额)
    /// 5. 易耗件市场比价
    /// 6. 金额档位交付话术 (恰好一条)
    fn build_recommendations(
        &self,
        order: &ServiceOrderInput,
        revenue_percentage: f64,
        investment_percentage: f64,
        tcmp2_difference: f64,
        total_os: f64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if revenue_percentage < R70_TARGET_PCT {
            recommendations.push(format!(
                "营收占比 {:.1}%,低于 70% 目标,建议提高工时服务收入占比",
                revenue_percentage
            ));
        }

        if investment_percentage > I30_LIMIT_PCT {
            recommendations.push(format!(
                "配件投入占比 {:.1}%,高于 30% 上限,建议复核配件成本与售价",
                investment_percentage
            ));
        }

        if revenue_percentage >= R70_TARGET_PCT
            && investment_percentage <= I30_LIMIT_PCT
            && tcmp2_difference >= TCMP2_DIFFERENCE_TOLERANCE
        {
            recommendations.push("订单定价健康,保持当前定价策略".to_string());
        }

        if tcmp2_difference < TCMP2_DIFFERENCE_TOLERANCE {
            recommendations.push(format!(
                "工时定价低于 TCMP² 基准 {:.2},建议按时率复核工时报价",
                tcmp2_difference.abs()
            ));
        }

        if order.parts.iter().any(|p| p.is_commodity) {
            recommendations.push("订单含常规易耗件,建议对照市场价进行基准比价".to_string());
        }

        recommendations.push(self.amount_tier_message(total_os).to_string());

        recommendations
    }

    /// 订单金额档位
    fn amount_tier(&self, total_os: f64) -> AmountTier {
        if total_os < INFORMAL_SETTLEMENT_LIMIT {
            AmountTier::InformalSettlement
        } else if total_os <= CONFIRMATION_CALL_LIMIT {
            AmountTier::ConfirmationCall
        } else {
            AmountTier::InPersonDelivery
        }
    }

    /// 金额档位对应的交付话术
    fn amount_tier_message(&self, total_os: f64) -> &'static str {
        match self.amount_tier(total_os) {
            AmountTier::InformalSettlement => "订单金额较小,可口头或线上协商结算",
            AmountTier::ConfirmationCall => "订单金额中等,交付前需电话确认",
            AmountTier::InPersonDelivery => "订单金额较大,需到店当面交付确认",
        }
    }
}

impl Default for OsDiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}
