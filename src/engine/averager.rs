// ==========================================
// 工坊盈利核算系统 - 历史月份平均引擎
// ==========================================
// 依据: TCMP² 核算方法论 - 多月平均口径
// 职责: 多条历史 DRE 记录 → 一条合成"平均月"记录
// 红线: 只平均原始字段,派生指标一律重算,避免比率的比率
// ==========================================

use crate::domain::financials::{
    CostsInRate, CostsOutOfRate, MonthlyFinancials, PartsCost, RevenueBreakdown,
};
use crate::engine::aggregate::mean_of;
use crate::engine::dre::DreEngine;
use chrono::Utc;

/// 合成平均记录的月份哨兵值
///
/// 该记录仅用于展示,不对应任何真实月份,不允许 upsert 落库
pub const AVERAGE_MONTH_SENTINEL: &str = "AVERAGE";

// ==========================================
// DreAverager - 平均引擎
// ==========================================
pub struct DreAverager {
    engine: DreEngine,
}

impl DreAverager {
    pub fn new() -> Self {
        Self {
            engine: DreEngine::new(),
        }
    }

    /// 对历史记录逐叶字段求均值,并重算派生指标
    ///
    /// # 参数
    /// - `records`: 历史月度记录列表
    ///
    /// # 返回
    /// - Some(MonthlyFinancials): 合成平均记录,month 为哨兵值
    /// - None: 输入为空,调用方展示"暂无数据"
    pub fn average(&self, records: &[MonthlyFinancials]) -> Option<MonthlyFinancials> {
        if records.is_empty() {
            return None;
        }

        // 技师数取整到最近整数,其余字段保留浮点精度
        let technicians = mean_of(records, |r| r.productive_technicians as f64)
            .round()
            .max(1.0) as u32;

        let mut averaged = MonthlyFinancials {
            workshop_id: records[0].workshop_id.clone(),
            month: AVERAGE_MONTH_SENTINEL.to_string(),
            productive_technicians: technicians,
            monthly_hours_per_technician: mean_of(records, |r| r.monthly_hours_per_technician),
            revenue: RevenueBreakdown {
                parts_applied: mean_of(records, |r| r.revenue.parts_applied),
                services: mean_of(records, |r| r.revenue.services),
                other: mean_of(records, |r| r.revenue.other),
            },
            costs_in_rate: CostsInRate {
                operational: mean_of(records, |r| r.costs_in_rate.operational),
                people: mean_of(records, |r| r.costs_in_rate.people),
                pro_labore: mean_of(records, |r| r.costs_in_rate.pro_labore),
                marketing: mean_of(records, |r| r.costs_in_rate.marketing),
                maintenance: mean_of(records, |r| r.costs_in_rate.maintenance),
                third_party: mean_of(records, |r| r.costs_in_rate.third_party),
                administrative: mean_of(records, |r| r.costs_in_rate.administrative),
            },
            costs_out_of_rate: CostsOutOfRate {
                financing: mean_of(records, |r| r.costs_out_of_rate.financing),
                consortium: mean_of(records, |r| r.costs_out_of_rate.consortium),
                equipment_installments: mean_of(records, |r| {
                    r.costs_out_of_rate.equipment_installments
                }),
                parts_invoices: mean_of(records, |r| r.costs_out_of_rate.parts_invoices),
                legal_processes: mean_of(records, |r| r.costs_out_of_rate.legal_processes),
                land_purchase: mean_of(records, |r| r.costs_out_of_rate.land_purchase),
                investments: mean_of(records, |r| r.costs_out_of_rate.investments),
            },
            parts_cost: PartsCost {
                applied_cost: mean_of(records, |r| r.parts_cost.applied_cost),
                stock_purchase: mean_of(records, |r| r.parts_cost.stock_purchase),
            },
            calculated: None,
            note: Some(format!("由 {} 个月合成的平均记录", records.len())),
            updated_at: Utc::now().naive_utc(),
        };

        averaged.calculated = Some(self.engine.calculate(&averaged));
        Some(averaged)
    }
}

impl Default for DreAverager {
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
    use chrono::NaiveDateTime;

    fn month_record(month: &str, technicians: u32, services_revenue: f64) -> MonthlyFinancials {
        MonthlyFinancials {
            workshop_id: "W001".to_string(),
            month: month.to_string(),
            productive_technicians: technicians,
            monthly_hours_per_technician: 219.0,
            revenue: RevenueBreakdown {
                parts_applied: 10000.0,
                services: services_revenue,
                other: 0.0,
            },
            costs_in_rate: CostsInRate {
                operational: 8000.0,
                people: 12000.0,
                ..CostsInRate::default()
            },
            costs_out_of_rate: CostsOutOfRate::default(),
            parts_cost: PartsCost {
                applied_cost: 6000.0,
                stock_purchase: 1000.0,
            },
            calculated: None,
            note: None,
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_average_empty_returns_none() {
        let averager = DreAverager::new();
        assert!(averager.average(&[]).is_none());
    }

    #[test]
    fn test_average_single_record_keeps_raw_fields() {
        let averager = DreAverager::new();
        let record = month_record("2026-03", 3, 30000.0);

        let averaged = averager.average(std::slice::from_ref(&record)).unwrap();

        // 单条记录: 均值即自身
        assert_eq!(averaged.productive_technicians, record.productive_technicians);
        assert_eq!(
            averaged.monthly_hours_per_technician,
            record.monthly_hours_per_technician
        );
        assert_eq!(averaged.revenue, record.revenue);
        assert_eq!(averaged.costs_in_rate, record.costs_in_rate);
        assert_eq!(averaged.costs_out_of_rate, record.costs_out_of_rate);
        assert_eq!(averaged.parts_cost, record.parts_cost);

        // 派生指标与直接核算一致
        let direct = DreEngine::new().calculate(&record);
        assert_eq!(averaged.calculated, Some(direct));
    }

    #[test]
    fn test_average_marks_synthetic_record() {
        let averager = DreAverager::new();
        let records = vec![month_record("2026-03", 2, 30000.0)];

        let averaged = averager.average(&records).unwrap();

        assert_eq!(averaged.month, AVERAGE_MONTH_SENTINEL);
        assert!(averaged.note.as_deref().unwrap().contains("1 个月"));
    }

    #[test]
    fn test_average_two_months_field_by_field() {
        let averager = DreAverager::new();
        let records = vec![
            month_record("2026-03", 2, 20000.0),
            month_record("2026-04", 3, 40000.0),
        ];

        let averaged = averager.average(&records).unwrap();

        assert_eq!(averaged.revenue.services, 30000.0);
        assert_eq!(averaged.revenue.parts_applied, 10000.0);
        // 2.5 → 最近整数 (远离零方向) 3
        assert_eq!(averaged.productive_technicians, 3);
    }

    #[test]
    fn test_average_rederives_instead_of_averaging_ratios() {
        let averager = DreAverager::new();
        let records = vec![
            month_record("2026-03", 2, 20000.0),
            month_record("2026-04", 2, 40000.0),
        ];

        let averaged = averager.average(&records).unwrap();
        let derived = averaged.calculated.unwrap();

        // 重算自平均后的原始字段,而不是平均各月的比率
        let expected = DreEngine::new().calculate(&averaged);
        assert_eq!(derived, expected);
    }
}
