use crate::cmp;
use chrono::NaiveDateTime;
use serde_derive::*;
use std::fmt;

/// K线
///
/// 原始输入，处理过程中从不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub symbol: String,
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} o:{} h:{} l:{} c:{} v:{}",
            self.symbol,
            self.time.format("%Y-%m-%d %H:%M"),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}

/// 走向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

/// 独立K线
///
/// 由一根或多根存在包含关系的原始K线合并而成。
/// pos_begin和pos_end为覆盖的原始K线索引（闭区间），
/// pos_extreme为决定最高点或最低点的原始K线索引。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReducedBar {
    pub range_low: f64,
    pub range_high: f64,
    pub pos_begin: usize,
    pub pos_end: usize,
    pub pos_extreme: usize,
    pub direction: Direction,
}

impl ReducedBar {
    /// 由单根原始K线构造，初始走向为向下
    pub fn single(index: usize, bar: &Bar) -> Self {
        ReducedBar {
            range_low: bar.low,
            range_high: bar.high,
            pos_begin: index,
            pos_end: index,
            pos_extreme: index,
            direction: Direction::Down,
        }
    }

    /// 与后一根K线是否存在包含关系
    ///
    /// 高低点同时抬高或同时降低才视为独立，其余情况（含完全相等）均为包含
    pub fn is_inclusive(&self, next: &ReducedBar) -> bool {
        let up = cmp::greater(next.range_high, self.range_high)
            && cmp::greater(next.range_low, self.range_low);
        let down = cmp::less(next.range_high, self.range_high)
            && cmp::less(next.range_low, self.range_low);
        !up && !down
    }

    /// 覆盖的原始K线数量
    #[inline]
    pub fn n(&self) -> usize {
        self.pos_end - self.pos_begin + 1
    }
}

/// 分型类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalKind {
    Top,
    Bottom,
    None,
}

/// 分型
///
/// 由相邻三根独立K线构成，index为中间K线极值所在的原始K线索引。
/// kind为None时仅为占位，不参与后续处理。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fractal {
    pub index: usize,
    pub kind: FractalKind,
    pub lowest: f64,
    pub highest: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<ReducedBar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<ReducedBar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extremal: Option<ReducedBar>,
}

impl Fractal {
    /// 占位分型
    pub fn none(index: usize) -> Self {
        Fractal {
            index,
            kind: FractalKind::None,
            lowest: 0.0,
            highest: 0.0,
            left: None,
            right: None,
            extremal: None,
        }
    }

    pub(crate) fn from_window(
        kind: FractalKind,
        left: &ReducedBar,
        cur: &ReducedBar,
        right: &ReducedBar,
    ) -> Self {
        Fractal {
            index: cur.pos_extreme,
            kind,
            lowest: cur.range_low,
            highest: cur.range_high,
            left: Some(*left),
            right: Some(*right),
            extremal: Some(*cur),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.kind == FractalKind::None
    }

    /// 极值价格：顶分型取最高价，底分型取最低价
    pub fn extremum(&self) -> Option<f64> {
        match self.kind {
            FractalKind::Top => Some(self.highest),
            FractalKind::Bottom => Some(self.lowest),
            FractalKind::None => None,
        }
    }
}

impl fmt::Display for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FractalKind::Top => write!(f, "top[{}] {:.2}", self.index, self.highest),
            FractalKind::Bottom => write!(f, "bottom[{}] {:.2}", self.index, self.lowest),
            FractalKind::None => write!(
                f,
                "none[{}] {:.2}~{:.2}",
                self.index, self.lowest, self.highest
            ),
        }
    }
}

/// 笔
///
/// 向上笔由底至顶，向下笔由顶至底
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub pos_begin: usize,
    pub pos_end: usize,
    pub top: Fractal,
    pub bottom: Fractal,
    pub highest: f64,
    pub lowest: f64,
    pub side: Direction,
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (begin_price, end_price) = match self.side {
            Direction::Up => (self.lowest, self.highest),
            Direction::Down => (self.highest, self.lowest),
        };
        write!(
            f,
            "{} [{}] {:.2} -> [{}] {:.2}",
            self.side, self.pos_begin, begin_price, self.pos_end, end_price
        )
    }
}
