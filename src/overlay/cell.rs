//! 信元类型
//!
//! 定义沿电路（circuit）逐跳传输的固定大小信元。

use super::id::RelayId;
use std::sync::Arc;

/// Tor 风格的固定信元大小（字节）
pub const CELL_BYTES: u32 = 512;

/// 沿电路传输的信元
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: u64,
    pub circuit_id: u64,
    pub size_bytes: u32,
    pub path: Arc<[RelayId]>,
    pub hop: usize, // 当前所在中继在 path 中的索引
}

impl Cell {
    /// 电路入口
    pub fn src(&self) -> Option<RelayId> {
        self.path.first().copied()
    }

    /// 电路出口
    pub fn dst(&self) -> Option<RelayId> {
        self.path.last().copied()
    }

    /// 当前所在中继
    pub fn at(&self) -> Option<RelayId> {
        self.path.get(self.hop).copied()
    }

    /// 下一跳中继（如果有）
    pub fn next(&self) -> Option<RelayId> {
        self.path.get(self.hop + 1).copied()
    }

    /// 前进到下一跳
    pub fn advance(mut self) -> Self {
        self.hop += 1;
        self
    }
}
