//! 运行统计
//!
//! 定义仿真运行结束后返回的统计数据结构。

use super::time::SimTime;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 一次运行的统计结果
///
/// `executed` 包含执行失败（fault）的事件；
/// 正常结束时满足 `submitted == executed + pending`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub submitted: u64,
    pub executed: u64,
    pub faulted: u64,
    /// 顺序引擎中为 0
    pub windows: u64,
    /// 到达结束时间时仍在队列中的事件数
    pub pending: u64,
    pub final_time: SimTime,
    #[serde(skip)]
    pub wall_time: Duration,
}

/// 运行期间各线程共享的计数器
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub submitted: AtomicU64,
    pub executed: AtomicU64,
    pub faulted: AtomicU64,
    pub windows: AtomicU64,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self, pending: u64, final_time: SimTime, wall_time: Duration) -> RunReport {
        RunReport {
            submitted: self.submitted.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            faulted: self.faulted.load(Ordering::Relaxed),
            windows: self.windows.load(Ordering::Relaxed),
            pending,
            final_time,
            wall_time,
        }
    }
}
