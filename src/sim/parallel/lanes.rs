//! Owner 通道表（lane arena）
//!
//! 以 `OwnerId` 为键，每个槽位是该 owner 的待执行事件队列。
//! owner id 可以是任意整数（例如稀疏的中继编号），所以用哈希表而不是按 id 下标的数组。
//! 槽位存在当且仅当有一个 drain task 正在负责该 owner：
//! 首次提交时创建，drain task 发现队列为空时删除。
//! 创建与删除都在同一把锁内完成，因此追加与删除不会互相错过。

use crate::sim::event::OwnerId;
use crate::sim::scheduled_event::ScheduledEvent;
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

/// 入队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Enqueued {
    /// 新建了通道，调用方需要派生一个 drain task
    Opened,
    /// 追加到已有通道，已有 drain task 会处理它
    Appended,
}

#[derive(Default)]
struct Slots {
    lanes: HashMap<OwnerId, BinaryHeap<ScheduledEvent>>,
    queued: usize,
}

#[derive(Default)]
pub(crate) struct LaneArena {
    inner: Mutex<Slots>,
}

impl LaneArena {
    pub fn enqueue(&self, owner: OwnerId, item: ScheduledEvent) -> Enqueued {
        let mut guard = self.inner.lock();
        let s = &mut *guard;
        s.queued += 1;
        match s.lanes.entry(owner) {
            Entry::Occupied(mut lane) => {
                lane.get_mut().push(item);
                Enqueued::Appended
            }
            Entry::Vacant(slot) => {
                slot.insert(BinaryHeap::from([item]));
                Enqueued::Opened
            }
        }
    }

    /// 取出 owner 的下一个事件；队列已空时删除通道并返回 `None`，结束该 drain task。
    pub fn take(&self, owner: OwnerId) -> Option<ScheduledEvent> {
        let mut guard = self.inner.lock();
        let s = &mut *guard;
        let next = s.lanes.get_mut(&owner)?.pop();
        match next {
            Some(item) => {
                s.queued -= 1;
                Some(item)
            }
            None => {
                s.lanes.remove(&owner);
                None
            }
        }
    }

    /// 当前排队（尚未取出）的事件数
    pub fn queued(&self) -> usize {
        self.inner.lock().queued
    }

    /// 当前活跃通道数（即活跃的 drain task 数）
    pub fn live(&self) -> usize {
        self.inner.lock().lanes.len()
    }
}
