//! 事件 trait
//!
//! 定义仿真事件接口，以及事件在执行时用来提交后续事件的调度接口。

use super::error::EventFault;
use super::time::SimTime;
use serde::{Deserialize, Serialize};

/// 事件归属者（分区键），例如一个仿真节点。
///
/// 同一 owner 的事件按时间顺序串行执行，永不并发；
/// 没有 owner 的事件只受时间窗口约束。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub usize);

/// 事件：带时间戳、可执行、只执行一次的工作单元。
/// 使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: Send + 'static {
    /// 调度时间（不可变）
    fn time(&self) -> SimTime;

    /// 归属者；`None` 表示可以在任意工作线程上执行。
    fn owner(&self) -> Option<OwnerId> {
        None
    }

    /// 执行事件。执行过程中通常会通过 `sched` 提交后续事件。
    ///
    /// 并行模式下 `sched.now()` 是当前窗口的起点，可能早于本事件的时间；
    /// 计算后续事件时间时应以 `self.time()` 为准。
    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault>;

    /// 用于日志的事件描述
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// 调度接口：顺序仿真器和并行编排器都实现它。
pub trait Scheduler {
    /// 当前仿真时间
    fn now(&self) -> SimTime;

    /// 提交一个事件
    fn submit(&self, ev: Box<dyn Event>);

    /// 近似的待处理事件数，只用于进度报告。
    fn estimated_pending_count(&self) -> usize;
}

impl<'a> dyn Scheduler + 'a {
    /// 提交一个具体类型的事件
    pub fn schedule<E: Event>(&self, ev: E) {
        self.submit(Box::new(ev));
    }
}
