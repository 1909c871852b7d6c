use crate::{Error, Result};
use serde_derive::*;
use std::env;

/// 最小成笔独立K线数量的环境变量
pub const MIN_SPAN_VAR: &str = "CHANBI_MIN_SPAN";

/// 成笔配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// 顶底分型之间（含两端）至少包含的独立K线数量
    pub min_span: usize,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        StrokeConfig { min_span: 5 }
    }
}

impl StrokeConfig {
    /// 从环境变量（及当前目录下的.env文件）读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let mut cfg = StrokeConfig::default();
        match env::var(MIN_SPAN_VAR) {
            Ok(s) => cfg.min_span = parse_min_span(&s)?,
            Err(env::VarError::NotPresent) => (),
            Err(e) => return Err(e.into()),
        }
        Ok(cfg)
    }
}

fn parse_min_span(s: &str) -> Result<usize> {
    let min_span: usize = s.trim().parse()?;
    // 顶底分型至少各占一根独立K线
    if min_span < 2 {
        return Err(Error(format!(
            "invalid {}: {}, must be at least 2",
            MIN_SPAN_VAR, min_span
        )));
    }
    Ok(min_span)
}
