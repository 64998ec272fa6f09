//! 仿真错误类型
//!
//! `SimError` 均为致命错误：出现即终止本次运行。
//! `EventFault` 是单个事件的可恢复失败，只记录日志，不影响运行。

use super::time::SimTime;
use thiserror::Error;

/// 终止运行的致命错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// 到达结束时间之前，未来事件队列已空。
    #[error("event queue ran dry at {now} before the end time was reached")]
    Starvation { now: SimTime },

    /// 事件的调度时间早于当前虚拟时间。
    #[error("event scheduled at {event_time} executed after the clock reached {now}")]
    CausalityViolation { event_time: SimTime, now: SimTime },

    /// 时钟被要求倒退。
    #[error("clock may not move backwards from {from} to {to}")]
    ClockReversed { from: SimTime, to: SimTime },

    /// 运行前没有设置结束时间。
    #[error("end time must be set before running the simulation")]
    ClockNotConfigured,

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// 编排器或工作线程在事件边界之外崩溃（引擎自身的缺陷）。
    #[error("an engine thread panicked outside of event execution")]
    EnginePanicked,
}

/// 单个事件执行失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EventFault(pub String);

impl EventFault {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
