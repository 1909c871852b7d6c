use crate::cmp;
use crate::config::StrokeConfig;
use crate::index_map::IndexMap;
use crate::shape::{Fractal, FractalKind};
use log::{debug, trace};

/// 过滤分型序列，得到顶底交替、可以成笔的分型
///
/// 使用默认配置，即顶底之间至少5根独立K线
pub fn filter_fractals(fractals: &[Fractal], index_map: &IndexMap) -> Vec<Fractal> {
    FractalFilter::new(index_map, StrokeConfig::default()).run(fractals)
}

/// 分型过滤器
///
/// 从第一个分型作为基准开始向后扫描：
/// 1. 同型分型：更高的顶/更低的底替换基准，否则忽略。
/// 2. 异型分型：与基准之间的独立K线数量不少于min_span，
///    且价格不与基准交叉时，成为新的基准；否则忽略并继续向后寻找。
/// 扫描结束时若基准从未配对，则丢弃。
pub struct FractalFilter<'m> {
    index_map: &'m IndexMap,
    cfg: StrokeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    // 向后寻找异型分型，途中遇到更强的同型分型则替换基准
    SeekOppositeOrStronger(usize),
    // 检查候选异型分型与基准的距离及价格关系
    CheckSpan(usize),
    // 候选分型确认，成为新的基准
    Accept(usize),
    Exhausted,
}

impl<'m> FractalFilter<'m> {
    pub fn new(index_map: &'m IndexMap, cfg: StrokeConfig) -> Self {
        FractalFilter { index_map, cfg }
    }

    /// 输入可以是按原始索引排列的分型序列（含None占位），也可以是合并后的分型列表
    pub fn run(&self, fractals: &[Fractal]) -> Vec<Fractal> {
        let mut candidates: Vec<Fractal> =
            fractals.iter().filter(|f| !f.is_none()).cloned().collect();
        candidates.sort_by_key(|f| f.index);

        let mut base = match candidates.first() {
            Some(first) => *first,
            None => return Vec::new(),
        };
        let mut body: Vec<Fractal> = Vec::new();
        let mut state = ScanState::SeekOppositeOrStronger(1);
        loop {
            state = match state {
                ScanState::SeekOppositeOrStronger(i) => match candidates.get(i) {
                    None => ScanState::Exhausted,
                    Some(f) if f.kind != base.kind => ScanState::CheckSpan(i),
                    Some(f) => {
                        if dominates(f, &base) {
                            trace!("{} replaces {}", f, base);
                            base = *f;
                        } else {
                            trace!("{} is weaker than {}, ignored", f, base);
                        }
                        ScanState::SeekOppositeOrStronger(i + 1)
                    }
                },
                ScanState::CheckSpan(i) => {
                    let f = &candidates[i];
                    if !self.separated(&base, f) {
                        trace!("{} too close to {}, ignored", f, base);
                        ScanState::SeekOppositeOrStronger(i + 1)
                    } else if crosses(&base, f) {
                        trace!("{} crosses {}, ignored", f, base);
                        ScanState::SeekOppositeOrStronger(i + 1)
                    } else {
                        ScanState::Accept(i)
                    }
                }
                ScanState::Accept(i) => {
                    trace!("{} accepted after {}", candidates[i], base);
                    body.push(base);
                    base = candidates[i];
                    ScanState::SeekOppositeOrStronger(i + 1)
                }
                ScanState::Exhausted => break,
            };
        }

        if body.is_empty() {
            debug!("no fractal pairs with {} after filtering", base);
            return body;
        }
        body.push(base);
        debug!(
            "filtered {} fractals down to {}",
            candidates.len(),
            body.len()
        );
        body
    }

    // 两分型之间（含两端）的独立K线数量满足要求
    fn separated(&self, base: &Fractal, f: &Fractal) -> bool {
        self.index_map
            .span(base.index, f.index)
            .map_or(false, |n| n >= self.cfg.min_span)
    }
}

/// 同型分型中，f是否比base更强（相等时取后者）
fn dominates(f: &Fractal, base: &Fractal) -> bool {
    match base.kind {
        FractalKind::Top => !cmp::less(f.highest, base.highest),
        FractalKind::Bottom => !cmp::greater(f.lowest, base.lowest),
        FractalKind::None => false,
    }
}

/// 异型分型价格交叉：顶后的底高于顶，或底后的顶低于底
fn crosses(base: &Fractal, f: &Fractal) -> bool {
    match base.kind {
        FractalKind::Top => cmp::greater(f.lowest, base.highest),
        FractalKind::Bottom => cmp::less(f.highest, base.lowest),
        FractalKind::None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_map::build_index_map;
    use crate::shape::{Direction, ReducedBar};

    #[test]
    fn test_filter_empty() {
        let im = identity_map(10);
        assert!(filter_fractals(&[], &im).is_empty());
        let slots: Vec<Fractal> = (0..10).map(Fractal::none).collect();
        assert!(filter_fractals(&slots, &im).is_empty());
    }

    #[test]
    fn test_filter_span_four_rejected() {
        let im = identity_map(10);
        let fs = vec![bottom(0, 10.00), top(3, 11.00)];
        assert!(filter_fractals(&fs, &im).is_empty());
    }

    #[test]
    fn test_filter_span_five_accepted() {
        let im = identity_map(10);
        let fs = vec![bottom(0, 10.00), top(4, 11.00)];
        let r = filter_fractals(&fs, &im);
        assert_eq!(vec![0, 4], indices(&r));
    }

    #[test]
    fn test_filter_span_counts_independent_bars() {
        // 原始K线0~9，其中1~3与5~6各自合并为一根独立K线
        let im = build_index_map(&[
            rb(0, 0),
            rb(1, 3),
            rb(4, 4),
            rb(5, 6),
            rb(7, 7),
            rb(8, 8),
            rb(9, 9),
        ]);
        // 原始K线0~7共8根，合并后为5根独立K线
        let r = filter_fractals(&[bottom(0, 10.00), top(7, 11.00)], &im);
        assert_eq!(vec![0, 7], indices(&r));
        // 原始K线0~6共7根，合并后仅4根独立K线
        assert!(filter_fractals(&[bottom(0, 10.00), top(6, 11.00)], &im).is_empty());
    }

    #[test]
    fn test_filter_same_kind_keeps_higher_top() {
        let im = identity_map(12);
        let fs = vec![top(0, 11.00), top(3, 12.00), bottom(8, 10.00)];
        assert_eq!(vec![3, 8], indices(&filter_fractals(&fs, &im)));

        let fs = vec![top(0, 12.00), top(3, 11.00), bottom(8, 10.00)];
        assert_eq!(vec![0, 8], indices(&filter_fractals(&fs, &im)));
    }

    #[test]
    fn test_filter_same_kind_keeps_lower_bottom() {
        let im = identity_map(12);
        let fs = vec![bottom(0, 10.00), bottom(2, 9.50), top(9, 11.00)];
        assert_eq!(vec![2, 9], indices(&filter_fractals(&fs, &im)));
    }

    #[test]
    fn test_filter_same_kind_across_rejected_opposite() {
        init_log();
        let im = identity_map(12);
        // 中间的底距离太近，两个顶之间没有有效的底
        let fs = vec![top(0, 11.00), bottom(2, 10.00), top(4, 12.00), bottom(10, 9.00)];
        let r = filter_fractals(&fs, &im);
        assert_eq!(vec![4, 10], indices(&r));
        assert_eq!(12.00, r[0].highest);
    }

    #[test]
    fn test_filter_keeps_searching_after_close_candidate() {
        let im = identity_map(12);
        let fs = vec![bottom(0, 10.00), top(2, 11.00), bottom(3, 10.50), top(6, 11.50)];
        let r = filter_fractals(&fs, &im);
        assert_eq!(vec![0, 6], indices(&r));
    }

    #[test]
    fn test_filter_rejects_crossing_candidate() {
        let im = identity_map(20);
        // 顶后的底高于顶
        let fs = vec![top(0, 10.00), bottom(6, 10.50), bottom(12, 9.00)];
        let r = filter_fractals(&fs, &im);
        assert_eq!(vec![0, 12], indices(&r));
    }

    #[test]
    fn test_filter_accepted_top_can_be_replaced() {
        let im = identity_map(20);
        let fs = vec![
            bottom(0, 10.00),
            top(5, 11.00),
            bottom(7, 10.80),
            top(9, 11.50),
            bottom(15, 10.20),
        ];
        let r = filter_fractals(&fs, &im);
        assert_eq!(vec![0, 9, 15], indices(&r));
    }

    #[test]
    fn test_filter_accepts_slots_out_of_order() {
        let im = identity_map(12);
        let mut slots: Vec<Fractal> = (0..12).map(Fractal::none).collect();
        slots[1] = bottom(1, 10.00);
        slots[7] = top(7, 11.00);
        let r = filter_fractals(&slots, &im);
        assert_eq!(vec![1, 7], indices(&r));

        let r = filter_fractals(&[top(7, 11.00), bottom(1, 10.00)], &im);
        assert_eq!(vec![1, 7], indices(&r));
    }

    #[test]
    fn test_filter_custom_min_span() {
        let im = identity_map(10);
        let fs = vec![bottom(0, 10.00), top(2, 11.00), bottom(4, 10.20)];
        let r = FractalFilter::new(&im, StrokeConfig { min_span: 3 }).run(&fs);
        assert_eq!(vec![0, 2, 4], indices(&r));
        assert!(filter_fractals(&fs, &im).is_empty());
    }

    #[test]
    fn test_filter_alternates_and_spans() {
        init_log();
        let im = identity_map(40);
        let fs = vec![
            bottom(0, 10.00),
            top(2, 10.60),
            bottom(3, 10.10),
            top(6, 10.80),
            top(8, 10.90),
            bottom(10, 10.30),
            bottom(13, 10.20),
            top(15, 10.70),
            bottom(20, 10.00),
            top(22, 10.40),
            top(27, 11.20),
            bottom(29, 10.90),
        ];
        let r = filter_fractals(&fs, &im);
        // 底13被更低的底20替换
        assert_eq!(vec![0, 8, 20, 27], indices(&r));
        for pair in r.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
            assert!(im.span(pair[0].index, pair[1].index).unwrap() >= 5);
        }
    }

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn indices(fs: &[Fractal]) -> Vec<usize> {
        fs.iter().map(|f| f.index).collect()
    }

    fn top(index: usize, price: f64) -> Fractal {
        Fractal {
            kind: FractalKind::Top,
            highest: price,
            lowest: price - 0.10,
            ..Fractal::none(index)
        }
    }

    fn bottom(index: usize, price: f64) -> Fractal {
        Fractal {
            kind: FractalKind::Bottom,
            highest: price + 0.10,
            lowest: price,
            ..Fractal::none(index)
        }
    }

    fn identity_map(n: usize) -> IndexMap {
        let rbs: Vec<ReducedBar> = (0..n).map(|i| rb(i, i)).collect();
        build_index_map(&rbs)
    }

    fn rb(begin: usize, end: usize) -> ReducedBar {
        ReducedBar {
            range_low: 0.0,
            range_high: 0.0,
            pos_begin: begin,
            pos_end: end,
            pos_extreme: begin,
            direction: Direction::Up,
        }
    }
}
