// ==========================================
// 工坊盈利核算系统 - 核算策略常量
// ==========================================
// 依据: TCMP² 核算方法论 - 固定口径
// 红线: 禁止在公式中出现裸数字,策略调整只改本文件
// ==========================================

/// 工时报价加成系数
///
/// 定价恒等式: 报价 = 2 × 工时 × 时率。行业固定口径,不做配置项
pub const LABOR_MARKUP_FACTOR: f64 = 2.0;

/// 每月工作日数,用于日均目标折算
pub const WORKING_DAYS_PER_MONTH: f64 = 22.0;

/// 人均月工时默认值,新建月度记录时预填
pub const DEFAULT_MONTHLY_HOURS_PER_TECHNICIAN: f64 = 219.0;

/// R70 目标占比: 营收中扣除配件成本后的部分应不低于 70%
pub const R70_TARGET_PCT: f64 = 70.0;

/// I30 上限占比: 配件成本负担应不高于 30%
pub const I30_LIMIT_PCT: f64 = 30.0;

/// TCMP² 差额容差: 差额不低于 -1 视为与基准一致
pub const TCMP2_DIFFERENCE_TOLERANCE: f64 = -1.0;

/// 金额档位: 低于此值可口头/线上结算
pub const INFORMAL_SETTLEMENT_LIMIT: f64 = 600.0;

/// 金额档位: 低于等于此值需电话确认,高于需到店交付
pub const CONFIRMATION_CALL_LIMIT: f64 = 2000.0;
