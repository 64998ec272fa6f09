//! 虚拟时钟
//!
//! 单写者（调度器/编排器）、多读者（所有工作线程）。时钟对象由引擎持有，
//! 并通过调用链显式传递，不存在全局单例。

use super::error::SimError;
use super::time::SimTime;
use std::sync::atomic::{AtomicU64, Ordering};

/// 仿真时钟：当前时间 + 结束时间（horizon）。
#[derive(Debug, Default)]
pub struct SimClock {
    now: AtomicU64,
    end: AtomicU64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建并设置结束时间
    pub fn with_end_time(end: SimTime) -> Self {
        let clock = Self::new();
        clock.set_end_time(end);
        clock
    }

    /// 当前仿真时间
    pub fn now(&self) -> SimTime {
        SimTime(self.now.load(Ordering::Acquire))
    }

    pub fn end_time(&self) -> SimTime {
        SimTime(self.end.load(Ordering::Acquire))
    }

    /// 设置结束时间；只应在运行前调用一次。
    pub fn set_end_time(&self, end: SimTime) {
        self.end.store(end.0, Ordering::Release);
    }

    pub fn is_configured(&self) -> bool {
        self.end_time() > SimTime::ZERO
    }

    /// 当前时间是否已到达结束时间
    pub fn is_expired(&self) -> bool {
        self.now() >= self.end_time()
    }

    /// 把时钟推进到 `t`；不允许倒退。
    pub fn advance_to(&self, t: SimTime) -> Result<(), SimError> {
        let from = self.now();
        if t < from {
            return Err(SimError::ClockReversed { from, to: t });
        }
        self.now.store(t.0, Ordering::Release);
        Ok(())
    }
}
