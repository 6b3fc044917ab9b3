// ==========================================
// 工坊盈利核算系统 - 数值聚合纯函数库
// ==========================================
// 职责: 受保护的求和/均值/除法,供各引擎复用
// 红线: 无状态、无副作用、任何输入都不产生 NaN/Infinity
// ==========================================

/// 受保护除法
///
/// # 规则
/// - 除数为 0 → 0
/// - 任一操作数非有限 → 0
/// - 结果非有限 → 0
pub fn div_or_zero(numerator: f64, denominator: f64) -> f64 {
    if !numerator.is_finite() || !denominator.is_finite() || denominator == 0.0 {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() {
        quotient
    } else {
        0.0
    }
}

/// 受保护百分比: (part / whole) * 100
pub fn pct_or_zero(part: f64, whole: f64) -> f64 {
    div_or_zero(part, whole) * 100.0
}

/// 受保护求和,跳过非有限值
pub fn safe_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| v.is_finite()).sum()
}

/// 受保护算术均值,空输入返回 0
pub fn safe_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    div_or_zero(sum, count as f64)
}

/// 按字段取值器对记录列表求均值
///
/// 嵌套分组的逐叶平均通过显式取值器完成,不走字符串路径反射
pub fn mean_of<T, F>(records: &[T], leaf: F) -> f64
where
    F: Fn(&T) -> f64,
{
    safe_mean(records.iter().map(leaf))
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_or_zero_normal() {
        assert_eq!(div_or_zero(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_div_or_zero_zero_denominator() {
        assert_eq!(div_or_zero(10.0, 0.0), 0.0);
        assert_eq!(div_or_zero(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_div_or_zero_non_finite() {
        assert_eq!(div_or_zero(f64::NAN, 2.0), 0.0);
        assert_eq!(div_or_zero(1.0, f64::INFINITY), 0.0);
        assert_eq!(div_or_zero(f64::INFINITY, 2.0), 0.0);
    }

    #[test]
    fn test_pct_or_zero() {
        assert_eq!(pct_or_zero(30.0, 100.0), 30.0);
        assert_eq!(pct_or_zero(30.0, 0.0), 0.0);
    }

    #[test]
    fn test_safe_sum_skips_non_finite() {
        assert_eq!(safe_sum([1.0, 2.0, f64::NAN, 3.0]), 6.0);
        assert_eq!(safe_sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_safe_mean() {
        assert_eq!(safe_mean([2.0, 4.0]), 3.0);
        assert_eq!(safe_mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_mean_of_with_getter() {
        struct Row {
            v: f64,
        }
        let rows = vec![Row { v: 10.0 }, Row { v: 20.0 }];
        assert_eq!(mean_of(&rows, |r| r.v), 15.0);
    }
}
