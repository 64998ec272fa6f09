//! 仿真核心模块
//!
//! 此模块包含离散事件仿真的核心组件：仿真时间、虚拟时钟、事件、
//! 顺序仿真器以及按时间窗口/owner 分区的并行编排器。

// 子模块声明
mod clock;
mod config;
mod engine;
mod error;
mod event;
mod exec;
mod parallel;
mod scheduled_event;
mod simulator;
mod stats;
mod time;

// 重新导出公共接口
pub use clock::SimClock;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EventFault, SimError};
pub use event::{Event, OwnerId, Scheduler};
pub use parallel::Orchestrator;
pub use scheduled_event::ScheduledEvent;
pub use simulator::Simulator;
pub use stats::RunReport;
pub use time::SimTime;
