use crate::cmp;
use crate::shape::{Bar, Direction, ReducedBar};
use log::debug;

/// 处理K线包含关系，得到独立K线序列
///
/// 相邻独立K线之间的高点与低点同时抬高（向上）或同时降低（向下），
/// 不再存在包含关系。原始K线不被修改。
pub fn reduce_containment(bars: &[Bar]) -> Vec<ReducedBar> {
    ContainmentReducer::new(bars).run()
}

struct ContainmentReducer<'b> {
    bars: &'b [Bar],
    body: Vec<ReducedBar>,
}

impl<'b> ContainmentReducer<'b> {
    fn new(bars: &'b [Bar]) -> Self {
        ContainmentReducer {
            bars,
            body: Vec::with_capacity(bars.len()),
        }
    }

    fn run(mut self) -> Vec<ReducedBar> {
        for (index, bar) in self.bars.iter().enumerate() {
            self.consume(ReducedBar::single(index, bar));
        }
        let widest = self.body.iter().map(|rb| rb.n()).max().unwrap_or(0);
        debug!(
            "reduced {} bars into {} independent bars, widest covers {}",
            self.bars.len(),
            self.body.len(),
            widest
        );
        self.body
    }

    fn consume(&mut self, cur: ReducedBar) {
        let prev = match self.body.last() {
            Some(prev) => *prev,
            None => {
                self.body.push(cur);
                return;
            }
        };

        // 高点升，低点也升
        if cmp::greater(cur.range_high, prev.range_high)
            && cmp::greater(cur.range_low, prev.range_low)
        {
            self.body.push(ReducedBar {
                direction: Direction::Up,
                ..cur
            });
            return;
        }

        // 高点降，低点也降
        if cmp::less(cur.range_high, prev.range_high) && cmp::less(cur.range_low, prev.range_low) {
            self.body.push(ReducedBar {
                direction: Direction::Down,
                ..cur
            });
            return;
        }

        // 包含，替换最后一根独立K线
        let merged = Self::merge(&prev, &cur);
        if let Some(last) = self.body.last_mut() {
            *last = merged;
        }
    }

    /// 合并存在包含关系的两根K线
    ///
    /// 向上时高点取高、低点取高，向下时高点取低、低点取低。
    /// 极值位置：极值价格相同则保留左侧，否则取右侧K线。
    fn merge(prev: &ReducedBar, cur: &ReducedBar) -> ReducedBar {
        // 第二根K线与首根K线之间尚无走向，按向上合并
        let upward = cur.pos_begin == 1 || prev.direction == Direction::Up;
        // 右包含：后者高点更高或低点更低
        let right = cmp::greater(cur.range_high, prev.range_high)
            || cmp::less(cur.range_low, prev.range_low);

        // 高低点按方向同取高或同取低，保证与前一根独立K线仍然单调
        let (range_low, range_high) = if upward {
            (
                prev.range_low.max(cur.range_low),
                prev.range_high.max(cur.range_high),
            )
        } else {
            (
                prev.range_low.min(cur.range_low),
                prev.range_high.min(cur.range_high),
            )
        };

        let pos_extreme = match (right, upward) {
            (true, true) if !cmp::equal(cur.range_high, prev.range_high) => cur.pos_begin,
            (true, false) if !cmp::equal(cur.range_low, prev.range_low) => cur.pos_begin,
            // 左包含或极值相同，极值仍在左侧
            _ => prev.pos_extreme,
        };

        ReducedBar {
            range_low,
            range_high,
            pos_begin: prev.pos_begin,
            pos_end: cur.pos_end,
            pos_extreme,
            direction: prev.direction,
        }
    }
}
