//! 引擎配置
//!
//! 工作线程数、窗口宽度（runahead）和结束时间。数值配置由上层（CLI/JSON）
//! 解析后传入，这里只负责校验和归一化。

use super::error::SimError;
use super::time::SimTime;
use serde::{Deserialize, Serialize};

/// 引擎配置
///
/// `runahead` 必须不大于任意两个 owner 之间的最小因果传播时延；
/// 引擎无法检查这一点，违反时表现为静默的顺序错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 工作线程数；0 表示每个 CPU 一个线程，1 表示顺序执行。
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// 并行窗口宽度
    #[serde(default)]
    pub runahead: SimTime,
    /// 仿真结束时间
    pub end_time: SimTime,
}

fn default_workers() -> usize {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            runahead: SimTime::ZERO,
            end_time: SimTime::ZERO,
        }
    }
}

impl EngineConfig {
    /// 设置线程池大小与窗口宽度
    pub fn configure(mut self, workers: usize, runahead: SimTime) -> Self {
        self.workers = workers;
        self.runahead = runahead;
        self
    }

    /// 设置结束时间
    pub fn configure_end(mut self, end_time: SimTime) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.end_time == SimTime::ZERO {
            return Err(SimError::InvalidConfig(
                "end_time must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// 实际使用的工作线程数（0 解析为可用 CPU 数）
    pub fn resolved_workers(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.workers
        }
    }

    /// 有效窗口宽度：时间是整数，宽度为 0 时窗口只包含 `positionTime` 这一刻。
    pub fn window_width(&self) -> SimTime {
        SimTime(self.runahead.0.max(1))
    }
}
