// ==========================================
// 工坊盈利核算系统 - 参考费率读取 Trait
// ==========================================
// 职责: 定义诊断流程所需的参考月 TCMP² 费率读取接口
// 红线: 只读接口,不包含写入,不包含业务逻辑
// ==========================================

use crate::api::error::ApiResult;
use async_trait::async_trait;

// ==========================================
// ReferenceRateProvider Trait
// ==========================================
// 用途: 诊断 API 查询参考月费率的接口
// 实现者: FinancialsApi (从已落库的月度记录读取)
#[async_trait]
pub trait ReferenceRateProvider: Send + Sync {
    /// 查询某工坊某月的 TCMP² 时率
    ///
    /// # 返回
    /// - Ok(Some(rate)): 参考月存在且派生指标已落库
    /// - Ok(None): 参考月缺失,诊断按 0 费率降级
    async fn tcmp2_rate(&self, workshop_id: &str, month: &str) -> ApiResult<Option<f64>>;
}
