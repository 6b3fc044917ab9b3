// ==========================================
// 工坊盈利核算系统 - 月度财务 API
// ==========================================
// 职责: 月度财务记录的保存/查询/多月平均流程
// 流程: 净化 → 重算派生指标 → upsert (保存即覆盖)
// 红线: calculated 只在此处重算后落库,读取时不再计算
// ==========================================

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::rate_provider::ReferenceRateProvider;
use crate::api::validator;
use crate::config::ConfigManager;
use crate::domain::financials::{
    CostsInRate, CostsOutOfRate, MonthlyFinancials, PartsCost, RevenueBreakdown,
};
use crate::engine::{DreAverager, DreEngine};
use crate::repository::MonthlyFinancialsRepository;

// ==========================================
// FinancialsApi - 月度财务 API
// ==========================================
pub struct FinancialsApi {
    repo: Arc<MonthlyFinancialsRepository>,
    config: Arc<ConfigManager>,
    engine: DreEngine,
    averager: DreAverager,
}

impl FinancialsApi {
    /// 创建新的 FinancialsApi 实例
    pub fn new(repo: Arc<MonthlyFinancialsRepository>, config: Arc<ConfigManager>) -> Self {
        Self {
            repo,
            config,
            engine: DreEngine::new(),
            averager: DreAverager::new(),
        }
    }

    /// 保存一个月的财务记录
    ///
    /// # 流程
    /// 1. 校验工坊 ID 与月份格式
    /// 2. 净化数值字段 (表单口径)
    /// 3. 重算派生指标并写入 calculated
    /// 4. upsert 落库 (每工坊每月一条,保存即覆盖)
    ///
    /// # 返回
    /// 落库后的完整记录 (含 calculated)
    pub async fn save_month(&self, mut record: MonthlyFinancials) -> ApiResult<MonthlyFinancials> {
        validator::validate_workshop_id(&record.workshop_id)?;
        validator::validate_month(&record.month)?;
        validator::sanitize_financials(&mut record);

        record.calculated = Some(self.engine.calculate(&record));
        record.updated_at = Utc::now().naive_utc();

        self.repo.upsert(&record)?;

        tracing::info!(
            workshop_id = %record.workshop_id,
            month = %record.month,
            tcmp2_value = record.calculated.as_ref().map(|c| c.tcmp2_value),
            "月度财务记录已保存"
        );
        Ok(record)
    }

    /// 查询某月记录
    pub async fn get_month(
        &self,
        workshop_id: &str,
        month: &str,
    ) -> ApiResult<Option<MonthlyFinancials>> {
        validator::validate_workshop_id(workshop_id)?;
        validator::validate_month(month)?;
        Ok(self.repo.find_by_month(workshop_id, month)?)
    }

    /// 查询某工坊全部月度记录 (按月份升序)
    pub async fn list_months(&self, workshop_id: &str) -> ApiResult<Vec<MonthlyFinancials>> {
        validator::validate_workshop_id(workshop_id)?;
        Ok(self.repo.list_by_workshop(workshop_id)?)
    }

    /// 对闭区间 [from, to] 内已落库的月份求平均
    ///
    /// # 返回
    /// - Ok(Some): 合成平均记录,month 为哨兵值,仅用于展示
    /// - Ok(None): 区间内无记录,调用方展示"暂无数据"
    pub async fn average_range(
        &self,
        workshop_id: &str,
        from: &str,
        to: &str,
    ) -> ApiResult<Option<MonthlyFinancials>> {
        validator::validate_workshop_id(workshop_id)?;
        validator::validate_month(from)?;
        validator::validate_month(to)?;
        if from > to {
            return Err(ApiError::InvalidInput(format!(
                "区间起止颠倒: {} > {}",
                from, to
            )));
        }

        let records = self.repo.find_by_range(workshop_id, from, to)?;
        Ok(self.averager.average(&records))
    }

    /// 新建月度记录模板 (表单预填)
    ///
    /// 数值全部为 0,人均月工时取配置默认值
    pub async fn month_template(
        &self,
        workshop_id: &str,
        month: &str,
    ) -> ApiResult<MonthlyFinancials> {
        validator::validate_workshop_id(workshop_id)?;
        validator::validate_month(month)?;

        let default_hours = self
            .config
            .default_monthly_hours()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        Ok(MonthlyFinancials {
            workshop_id: workshop_id.to_string(),
            month: month.to_string(),
            productive_technicians: 1,
            monthly_hours_per_technician: default_hours,
            revenue: RevenueBreakdown::default(),
            costs_in_rate: CostsInRate::default(),
            costs_out_of_rate: CostsOutOfRate::default(),
            parts_cost: PartsCost::default(),
            calculated: None,
            note: None,
            updated_at: Utc::now().naive_utc(),
        })
    }
}

// ==========================================
// 参考费率读取实现
// ==========================================
// 诊断流程对月度记录是弱引用: 只按键读取 tcmp2_value
#[async_trait]
impl ReferenceRateProvider for FinancialsApi {
    async fn tcmp2_rate(&self, workshop_id: &str, month: &str) -> ApiResult<Option<f64>> {
        let record = self.repo.find_by_month(workshop_id, month)?;
        Ok(record.and_then(|r| r.calculated).map(|c| c.tcmp2_value))
    }
}
