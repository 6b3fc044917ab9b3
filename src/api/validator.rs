// ==========================================
// 工坊盈利核算系统 - 输入净化与校验
// ==========================================
// 职责: 表单层口径的入参净化,引擎假定入参已是规范数值
// 规则: 非有限/负数金额一律置 0,技师数下限 1,月份必须为 YYYY-MM
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::financials::MonthlyFinancials;
use crate::domain::service_order::ServiceOrderInput;
use chrono::NaiveDate;

/// 校验月份格式 (YYYY-MM)
pub fn validate_month(month: &str) -> ApiResult<()> {
    let well_formed = month.len() == 7
        && month.as_bytes()[4] == b'-'
        && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok();

    if well_formed {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!(
            "月份格式无效: {},应为 YYYY-MM",
            month
        )))
    }
}

/// 校验工坊 ID 非空
pub fn validate_workshop_id(workshop_id: &str) -> ApiResult<()> {
    if workshop_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("工坊 ID 不能为空".to_string()));
    }
    Ok(())
}

/// 金额净化: 非有限或负数 → 0
pub fn sanitize_money(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// 净化月度财务记录的全部数值叶字段
pub fn sanitize_financials(record: &mut MonthlyFinancials) {
    record.productive_technicians = record.productive_technicians.max(1);
    record.monthly_hours_per_technician = sanitize_money(record.monthly_hours_per_technician);

    let r = &mut record.revenue;
    r.parts_applied = sanitize_money(r.parts_applied);
    r.services = sanitize_money(r.services);
    r.other = sanitize_money(r.other);

    let c = &mut record.costs_in_rate;
    c.operational = sanitize_money(c.operational);
    c.people = sanitize_money(c.people);
    c.pro_labore = sanitize_money(c.pro_labore);
    c.marketing = sanitize_money(c.marketing);
    c.maintenance = sanitize_money(c.maintenance);
    c.third_party = sanitize_money(c.third_party);
    c.administrative = sanitize_money(c.administrative);

    let o = &mut record.costs_out_of_rate;
    o.financing = sanitize_money(o.financing);
    o.consortium = sanitize_money(o.consortium);
    o.equipment_installments = sanitize_money(o.equipment_installments);
    o.parts_invoices = sanitize_money(o.parts_invoices);
    o.legal_processes = sanitize_money(o.legal_processes);
    o.land_purchase = sanitize_money(o.land_purchase);
    o.investments = sanitize_money(o.investments);

    let p = &mut record.parts_cost;
    p.applied_cost = sanitize_money(p.applied_cost);
    p.stock_purchase = sanitize_money(p.stock_purchase);
}

/// 净化订单行项
///
/// estimated_time 为派生字段,入参中一律清零,由诊断引擎填充
pub fn sanitize_order(order: &mut ServiceOrderInput) {
    for part in &mut order.parts {
        part.sale_value = sanitize_money(part.sale_value);
        part.cost_value = sanitize_money(part.cost_value);
    }
    for service in &mut order.services {
        service.charged_value = sanitize_money(service.charged_value);
        service.estimated_time = 0.0;
    }
    for third_party in &mut order.third_party_services {
        third_party.cost = sanitize_money(third_party.cost);
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service_order::ServiceItem;

    #[test]
    fn test_validate_month() {
        assert!(validate_month("2026-05").is_ok());
        assert!(validate_month("2026-13").is_err());
        assert!(validate_month("2026-5").is_err());
        assert!(validate_month("202605").is_err());
        assert!(validate_month("AVERAGE").is_err());
        assert!(validate_month("").is_err());
    }

    #[test]
    fn test_sanitize_money() {
        assert_eq!(sanitize_money(12.5), 12.5);
        assert_eq!(sanitize_money(0.0), 0.0);
        assert_eq!(sanitize_money(-3.0), 0.0);
        assert_eq!(sanitize_money(f64::NAN), 0.0);
        assert_eq!(sanitize_money(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_sanitize_order_resets_estimated_time() {
        let mut order = ServiceOrderInput {
            parts: vec![],
            services: vec![ServiceItem {
                name: "保养".to_string(),
                charged_value: -100.0,
                description_steps: vec![],
                estimated_time: 7.0,
            }],
            third_party_services: vec![],
        };

        sanitize_order(&mut order);

        assert_eq!(order.services[0].charged_value, 0.0);
        assert_eq!(order.services[0].estimated_time, 0.0);
    }
}
