use crate::shape::ReducedBar;
use serde_derive::*;

/// 原始K线索引到独立K线序号的映射
///
/// 独立K线依次覆盖连续的原始K线区间，因此以原始索引为下标的数组即可表达。
/// 未被任何独立K线覆盖的原始索引没有归属。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMap {
    owners: Vec<Option<usize>>,
}

/// 构建原始K线索引到独立K线序号的映射
pub fn build_index_map(reduced: &[ReducedBar]) -> IndexMap {
    let len = reduced.iter().map(|rb| rb.pos_end + 1).max().unwrap_or(0);
    let mut owners = vec![None; len];
    for (ordinal, rb) in reduced.iter().enumerate() {
        for index in rb.pos_begin..=rb.pos_end {
            owners[index] = Some(ordinal);
        }
    }
    IndexMap { owners }
}

impl IndexMap {
    /// 原始K线所属独立K线的序号
    pub fn owner(&self, index: usize) -> Option<usize> {
        self.owners.get(index).and_then(|owner| *owner)
    }

    /// 两个原始K线索引之间（含两端）的独立K线数量
    ///
    /// 任一索引不在映射内，或end早于begin时返回None
    pub fn span(&self, begin: usize, end: usize) -> Option<usize> {
        let b = self.owner(begin)?;
        let e = self.owner(end)?;
        e.checked_sub(b).map(|d| d + 1)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
