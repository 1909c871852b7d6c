use crate::cmp;
use crate::shape::{Fractal, FractalKind, ReducedBar};
use log::debug;

/// 在独立K线序列上识别顶底分型
///
/// 返回长度为original_len的分型序列，每个原始K线索引对应一个位置，
/// 分型记录在中间K线的极值索引处，其余位置为None。
pub fn detect_fractals(reduced: &[ReducedBar], original_len: usize) -> Vec<Fractal> {
    detect(reduced, original_len, |_| true)
}

/// 仅识别顶分型
pub fn detect_tops(reduced: &[ReducedBar], original_len: usize) -> Vec<Fractal> {
    detect(reduced, original_len, |kind| kind == FractalKind::Top)
}

/// 仅识别底分型
pub fn detect_bottoms(reduced: &[ReducedBar], original_len: usize) -> Vec<Fractal> {
    detect(reduced, original_len, |kind| kind == FractalKind::Bottom)
}

/// 合并顶分型与底分型序列，去除占位并按索引升序排列
pub fn merge_fractals(tops: &[Fractal], bottoms: &[Fractal]) -> Vec<Fractal> {
    let mut merged: Vec<Fractal> = tops
        .iter()
        .chain(bottoms.iter())
        .filter(|f| !f.is_none())
        .cloned()
        .collect();
    merged.sort_by_key(|f| f.index);
    merged
}

/// 判断相邻三根K线构成的分型类型
///
/// 顶分型要求中间K线的高点和低点均严格高于两侧，底分型反之。
/// 仅单侧突出不构成分型。
pub fn classify(left: &ReducedBar, cur: &ReducedBar, right: &ReducedBar) -> FractalKind {
    if cmp::greater(cur.range_high, left.range_high)
        && cmp::greater(cur.range_high, right.range_high)
        && cmp::greater(cur.range_low, left.range_low)
        && cmp::greater(cur.range_low, right.range_low)
    {
        return FractalKind::Top;
    }
    if cmp::less(cur.range_high, left.range_high)
        && cmp::less(cur.range_high, right.range_high)
        && cmp::less(cur.range_low, left.range_low)
        && cmp::less(cur.range_low, right.range_low)
    {
        return FractalKind::Bottom;
    }
    FractalKind::None
}

fn detect<F>(reduced: &[ReducedBar], original_len: usize, accept: F) -> Vec<Fractal>
where
    F: Fn(FractalKind) -> bool,
{
    let mut slots: Vec<Fractal> = (0..original_len).map(Fractal::none).collect();
    if reduced.len() < 3 {
        return slots;
    }
    let mut n = 0;
    for w in reduced.windows(3) {
        let (left, cur, right) = (&w[0], &w[1], &w[2]);
        let kind = classify(left, cur, right);
        if kind == FractalKind::None || !accept(kind) {
            continue;
        }
        if let Some(slot) = slots.get_mut(cur.pos_extreme) {
            *slot = Fractal::from_window(kind, left, cur, right);
            n += 1;
        }
    }
    debug!(
        "detected {} fractals over {} independent bars",
        n,
        reduced.len()
    );
    slots
}
