use crate::shape::{Direction, Fractal, FractalKind, Stroke};
use log::{debug, warn};

/// 将过滤后的分型序列转换为笔序列
///
/// 相邻两个异型分型构成一笔：底到顶为向上笔，顶到底为向下笔。
/// 输入应当顶底交替，出现相邻同型分型时跳过该对并记录警告。
pub fn build_strokes(fractals: &[Fractal]) -> Vec<Stroke> {
    StrokeShaper::new(fractals).run()
}

struct StrokeShaper<'f> {
    fractals: &'f [Fractal],
    sks: Vec<Stroke>,
}

impl<'f> StrokeShaper<'f> {
    fn new(fractals: &'f [Fractal]) -> Self {
        StrokeShaper {
            fractals,
            sks: Vec::with_capacity(fractals.len().saturating_sub(1)),
        }
    }

    fn run(mut self) -> Vec<Stroke> {
        for pair in self.fractals.windows(2) {
            self.consume(&pair[0], &pair[1]);
        }
        debug!(
            "built {} strokes from {} fractals",
            self.sks.len(),
            self.fractals.len()
        );
        self.sks
    }

    fn consume(&mut self, start: &Fractal, end: &Fractal) {
        let (side, bottom, top) = match (start.kind, end.kind) {
            (FractalKind::Bottom, FractalKind::Top) => (Direction::Up, start, end),
            (FractalKind::Top, FractalKind::Bottom) => (Direction::Down, end, start),
            _ => {
                warn!("cannot build stroke between {} and {}, skipped", start, end);
                return;
            }
        };
        self.sks.push(Stroke {
            pos_begin: start.index,
            pos_end: end.index,
            top: *top,
            bottom: *bottom,
            highest: top.highest,
            lowest: bottom.lowest,
            side,
        });
    }
}
