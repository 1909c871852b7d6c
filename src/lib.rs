//! 缠论K线形态分析：包含处理、分型、笔
//!
//! 核心实现位于chanbi-morph，此处统一导出。
pub use chanbi_morph::*;
