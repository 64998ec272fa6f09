//! 中继节点
//!
//! 每个中继是一个 owner：它的状态只在它自己的事件里被修改。

use super::id::RelayId;

/// 中继统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub received: u64,
    pub forwarded: u64,
    pub delivered: u64,
    pub bytes: u64,
}

/// 中继节点
#[derive(Debug)]
pub struct Relay {
    id: RelayId,
    name: String,
    pub stats: RelayStats,
}

impl Relay {
    /// 创建新中继
    pub fn new(id: RelayId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            stats: RelayStats::default(),
        }
    }

    pub fn id(&self) -> RelayId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
