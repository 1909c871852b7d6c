//! 价格比较
//!
//! 合并K线后的价格可能来自不同的取值路径，存在极小的浮点误差，
//! 因此所有方向与包含判断都经过此处的容差比较，而非直接使用`<`, `>`, `==`。

/// 价格比较容差
pub const EPSILON: f64 = 1e-7;

/// a严格大于b
#[inline]
pub fn greater(a: f64, b: f64) -> bool {
    a - b > EPSILON
}

/// a严格小于b
#[inline]
pub fn less(a: f64, b: f64) -> bool {
    a - b < -EPSILON
}

/// a与b在容差内相等
#[inline]
pub fn equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
