// ==========================================
// OS 定价诊断引擎集成测试
// ==========================================
// 测试目标: 工时推算、分级判定顺序、建议列表顺序与金额档位
// ==========================================


use test_helpers::OrderBuilder;
use workshop_profit::domain::types::OrderClassification;
use workshop_profit::engine::OsDiagnosticEngine;

// ==========================================
// 工时推算
// ==========================================

#[test]
fn test_estimated_time_at_rate_100() {
    // 时率 100,报价 300 → 推算 1.5h,理想值 300,差额 0
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new().service("大保养", 300.0).build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.services[0].estimated_time, 1.5);
    assert_eq!(result.tcmp2_ideal_value, 300.0);
    assert_eq!(result.tcmp2_difference, 0.0);
}

#[test]
fn test_zero_rate_zeroes_all_time_fields() {
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new()
        .service("换油", 150.0)
        .service("检查", 100.0)
        .part("滤芯", 80.0, 30.0)
        .build();

    let result = engine.diagnose(&order, 0.0);

    assert!(result.services.iter().all(|s| s.estimated_time == 0.0));
    assert_eq!(result.total_estimated_time, 0.0);
    assert_eq!(result.tcmp2_ideal_value, 0.0);
    assert_eq!(result.current_hour_value, 0.0);
}

#[test]
fn test_empty_services_classified_from_percentages_only() {
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new().part("轮胎", 1000.0, 400.0).build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.total_estimated_time, 0.0);
    assert_eq!(result.revenue_percentage, 60.0);
    assert_eq!(result.investment_percentage, 40.0);
    assert_eq!(result.classification, OrderClassification::Rejected);
}

#[test]
fn test_empty_order_is_all_zero() {
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new().build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.totals.total_os, 0.0);
    assert_eq!(result.revenue_percentage, 0.0);
    assert_eq!(result.investment_percentage, 0.0);
}

// ==========================================
// 分级判定
// ==========================================

#[test]
fn test_classification_rejected_65_35() {
    // 营收 65% / 配件 35% → rejected
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new()
        .part("变速箱油", 500.0, 350.0)
        .service("换变速箱油", 500.0)
        .build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.revenue_percentage, 65.0);
    assert_eq!(result.investment_percentage, 35.0);
    assert_eq!(result.classification, OrderClassification::Rejected);
}

#[test]
fn test_classification_perfect_when_on_target() {
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new()
        .part("刹车片", 300.0, 90.0)
        .service("更换刹车片", 700.0)
        .build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.revenue_percentage, 91.0);
    assert_eq!(result.classification, OrderClassification::Perfect);
}

#[test]
fn test_third_party_costs_excluded_from_ratios() {
    // 外协成本只进合计,不进 R70/I30 占比口径
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new()
        .part("水泵", 400.0, 280.0)
        .service("更换水泵", 600.0)
        .third_party("外协加工", 50.0)
        .build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.revenue_percentage, 72.0);
    // 28% 未超 30%,营收占比达标 → perfect
    assert_eq!(result.classification, OrderClassification::Perfect);
    assert_eq!(result.totals.total_third_party_costs, 50.0);
}

// ==========================================
// 建议列表
// ==========================================

#[test]
fn test_recommendations_order_and_commodity_advice() {
    let engine = OsDiagnosticEngine::new();
    let order = OrderBuilder::new()
        .commodity_part("机油", 500.0, 500.0)
        .service("换油", 500.0)
        .build();

    let result = engine.diagnose(&order, 100.0);

    assert_eq!(result.recommendations.len(), 4);
    assert!(result.recommendations[0].contains("营收占比"));
    assert!(result.recommendations[1].contains("配件投入占比"));
    assert!(result.recommendations[2].contains("易耗件"));
    assert!(result.recommendations[3].contains("订单金额中等"));
}

#[test]
fn test_amount_tier_messages() {
    let engine = OsDiagnosticEngine::new();
    let cases = [
        (500.0, "可口头或线上协商结算"),
        (1500.0, "交付前需电话确认"),
        (2500.0, "需到店当面交付确认"),
    ];

    for (charged, expected) in cases {
        let order = OrderBuilder::new().service("综合维修", charged).build();
        let result = engine.diagnose(&order, 100.0);

        let tier_message = result.recommendations.last().unwrap();
        assert!(
            tier_message.contains(expected),
            "total_os={} 应命中话术 {}",
            charged,
            expected
        );
    }
}

#[test]
fn test_tier_boundaries_inclusive() {
    let engine = OsDiagnosticEngine::new();

    let at_600 = engine.diagnose(&OrderBuilder::new().service("维修", 600.0).build(), 100.0);
    assert!(at_600.recommendations.last().unwrap().contains("电话确认"));

    let at_2000 = engine.diagnose(&OrderBuilder::new().service("维修", 2000.0).build(), 100.0);
    assert!(at_2000.recommendations.last().unwrap().contains("电话确认"));
}
