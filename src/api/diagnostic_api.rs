// ==========================================
// 工坊盈利核算系统 - OS 诊断 API
// ==========================================
// 职责: 服务订单定价诊断的完整流程
// 流程: 净化 → 查参考月费率 → 诊断引擎 → 落库
// 降级: 参考月缺失时按 0 费率继续,结果照常落库并打警告日志
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::rate_provider::ReferenceRateProvider;
use crate::api::validator;
use crate::domain::service_order::{ServiceOrderDiagnostic, ServiceOrderInput};
use crate::engine::OsDiagnosticEngine;
use crate::repository::OsDiagnosticRepository;

// ==========================================
// DiagnosticApi - OS 诊断 API
// ==========================================
pub struct DiagnosticApi {
    repo: Arc<OsDiagnosticRepository>,
    rates: Arc<dyn ReferenceRateProvider>,
    engine: OsDiagnosticEngine,
}

impl DiagnosticApi {
    /// 创建新的 DiagnosticApi 实例
    ///
    /// # 参数
    /// - repo: 诊断记录仓储
    /// - rates: 参考费率读取接口 (通常由 FinancialsApi 实现)
    pub fn new(repo: Arc<OsDiagnosticRepository>, rates: Arc<dyn ReferenceRateProvider>) -> Self {
        Self {
            repo,
            rates,
            engine: OsDiagnosticEngine::new(),
        }
    }

    /// 诊断一张服务订单并落库
    ///
    /// # 参数
    /// - workshop_id: 工坊 ID
    /// - os_number: OS 单号
    /// - reference_month: 参考月 (YYYY-MM),弱引用对应月度记录
    /// - order: 订单行项
    ///
    /// # 返回
    /// 落库后的完整诊断记录 (原始输入 + 派生结论)
    pub async fn diagnose_and_save(
        &self,
        workshop_id: &str,
        os_number: &str,
        reference_month: &str,
        mut order: ServiceOrderInput,
    ) -> ApiResult<ServiceOrderDiagnostic> {
        validator::validate_workshop_id(workshop_id)?;
        validator::validate_month(reference_month)?;
        if os_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("OS 单号不能为空".to_string()));
        }

        validator::sanitize_order(&mut order);

        // 参考月费率: 缺失时按 0 降级,前端据此展示"费率缺失"
        let ideal_hour_value = match self.rates.tcmp2_rate(workshop_id, reference_month).await? {
            Some(rate) => rate,
            None => {
                tracing::warn!(
                    workshop_id,
                    reference_month,
                    "参考月无 TCMP² 费率,诊断按 0 费率降级计算"
                );
                0.0
            }
        };

        let result = self.engine.diagnose(&order, ideal_hour_value);

        let record = ServiceOrderDiagnostic {
            diagnostic_id: Uuid::new_v4().to_string(),
            workshop_id: workshop_id.to_string(),
            os_number: os_number.to_string(),
            reference_month: reference_month.to_string(),
            parts: order.parts,
            services: result.services,
            third_party_services: order.third_party_services,
            totals: result.totals,
            revenue_percentage: result.revenue_percentage,
            investment_percentage: result.investment_percentage,
            ideal_hour_value: result.ideal_hour_value,
            current_hour_value: result.current_hour_value,
            total_estimated_time: result.total_estimated_time,
            tcmp2_ideal_value: result.tcmp2_ideal_value,
            tcmp2_difference: result.tcmp2_difference,
            classification: result.classification,
            recommendations: result.recommendations,
            created_at: Utc::now().naive_utc(),
        };

        self.repo.insert(&record)?;

        tracing::info!(
            workshop_id,
            os_number,
            classification = %record.classification,
            "OS 诊断已落库"
        );
        Ok(record)
    }

    /// 按诊断 ID 查询
    pub async fn find_by_id(
        &self,
        diagnostic_id: &str,
    ) -> ApiResult<Option<ServiceOrderDiagnostic>> {
        Ok(self.repo.find_by_id(diagnostic_id)?)
    }

    /// 查询某 OS 单号的历史诊断
    pub async fn list_by_os(
        &self,
        workshop_id: &str,
        os_number: &str,
    ) -> ApiResult<Vec<ServiceOrderDiagnostic>> {
        validator::validate_workshop_id(workshop_id)?;
        Ok(self.repo.list_by_os_number(workshop_id, os_number)?)
    }

    /// 查询某参考月的全部诊断
    pub async fn list_by_month(
        &self,
        workshop_id: &str,
        reference_month: &str,
    ) -> ApiResult<Vec<ServiceOrderDiagnostic>> {
        validator::validate_workshop_id(workshop_id)?;
        validator::validate_month(reference_month)?;
        Ok(self.repo.list_by_reference_month(workshop_id, reference_month)?)
    }
}
