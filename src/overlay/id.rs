//! 标识符类型
//!
//! 定义中继节点和链路的唯一标识符。

use crate::sim::OwnerId;

/// 中继节点标识符（同时作为事件的 owner 分区键）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayId(pub usize);

/// 链路标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub usize);

impl From<RelayId> for OwnerId {
    fn from(id: RelayId) -> Self {
        OwnerId(id.0)
    }
}
