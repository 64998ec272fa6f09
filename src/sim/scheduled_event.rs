//! 调度事件
//!
//! 定义调度事件结构及其优先级比较。

use super::event::{Event, OwnerId};
use super::time::SimTime;
use std::cmp::Ordering;

/// 调度事件，包含执行时间、归属者、序列号和事件对象。
///
/// 时间和 owner 在提交时从事件中取出缓存，避免在队列比较时走虚调用。
pub struct ScheduledEvent {
    pub(crate) at: SimTime,
    pub(crate) owner: Option<OwnerId>,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event>,
}

impl ScheduledEvent {
    pub(crate) fn new(seq: u64, ev: Box<dyn Event>) -> Self {
        Self {
            at: ev.time(),
            owner: ev.owner(),
            seq,
            ev,
        }
    }

    pub fn at(&self) -> SimTime {
        self.at
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn name(&self) -> &'static str {
        self.ev.name()
    }
}

impl std::fmt::Debug for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("at", &self.at)
            .field("owner", &self.owner)
            .field("seq", &self.seq)
            .field("ev", &self.ev.name())
            .finish()
    }
}

// BinaryHeap 是 max-heap；我们需要最小时间优先，因此反向比较。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.at.cmp(&other.at) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ord => ord,
        }
        .reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}
