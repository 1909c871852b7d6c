use crate::cmp;
use crate::config::StrokeConfig;
use crate::filter::FractalFilter;
use crate::fractal::detect_fractals;
use crate::index_map::build_index_map;
use crate::reduce::reduce_containment;
use crate::shape::{Bar, Fractal, ReducedBar, Stroke};
use crate::stroke::build_strokes;
use crate::{Error, Result};
use log::debug;
use serde_derive::*;

/// 形态分析结果，包含各阶段的输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morphology {
    /// 独立K线
    pub reduced: Vec<ReducedBar>,
    /// 过滤后顶底交替的分型
    pub fractals: Vec<Fractal>,
    pub strokes: Vec<Stroke>,
}

/// 对K线序列做完整的形态分析：包含处理、分型识别、分型过滤、成笔
pub fn analyze(bars: &[Bar], cfg: &StrokeConfig) -> Result<Morphology> {
    validate(bars)?;
    let reduced = reduce_containment(bars);
    let slots = detect_fractals(&reduced, bars.len());
    let index_map = build_index_map(&reduced);
    let fractals = FractalFilter::new(&index_map, cfg.clone()).run(&slots);
    let strokes = build_strokes(&fractals);
    debug!(
        "analyzed {} bars: {} independent bars, {} fractals, {} strokes",
        bars.len(),
        reduced.len(),
        fractals.len(),
        strokes.len()
    );
    Ok(Morphology {
        reduced,
        fractals,
        strokes,
    })
}

/// 将K线序列解析为笔序列，使用默认配置
pub fn bars_to_strokes(bars: &[Bar]) -> Result<Vec<Stroke>> {
    let m = analyze(bars, &StrokeConfig::default())?;
    Ok(m.strokes)
}

fn validate(bars: &[Bar]) -> Result<()> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.high.is_finite() || !bar.low.is_finite() {
            return Err(Error(format!("bar {} has non-finite price: {}", i, bar)));
        }
        if cmp::less(bar.high, bar.low) {
            return Err(Error(format!("bar {} has high below low: {}", i, bar)));
        }
    }
    Ok(())
}
