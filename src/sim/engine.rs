//! 引擎入口
//!
//! 根据配置选择顺序仿真器（一个工作线程）或并行编排器，两者对外接口一致。

use super::clock::SimClock;
use super::config::EngineConfig;
use super::error::SimError;
use super::event::{Event, Scheduler};
use super::parallel::Orchestrator;
use super::simulator::Simulator;
use super::stats::RunReport;
use tracing::info;

pub enum Engine {
    Sequential(Simulator),
    Parallel(Orchestrator),
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Result<Self, SimError> {
        config.validate()?;
        let workers = config.resolved_workers();
        let engine = if workers <= 1 {
            Engine::Sequential(Simulator::new(config.end_time))
        } else {
            Engine::Parallel(Orchestrator::new(config)?)
        };
        info!(
            workers,
            runahead = ?config.runahead,
            end = ?config.end_time,
            parallel = engine.is_parallel(),
            "🛠️  引擎已配置"
        );
        Ok(engine)
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, Engine::Parallel(_))
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        match self {
            Engine::Sequential(sim) => sim,
            Engine::Parallel(orch) => orch,
        }
    }

    pub fn clock(&self) -> &SimClock {
        match self {
            Engine::Sequential(sim) => sim.clock(),
            Engine::Parallel(orch) => orch.clock(),
        }
    }

    pub fn submit(&self, ev: Box<dyn Event>) {
        self.scheduler().submit(ev);
    }

    pub fn schedule<E: Event>(&self, ev: E) {
        self.submit(Box::new(ev));
    }

    /// 近似的待处理事件数，只用于进度报告
    pub fn estimated_pending_count(&self) -> usize {
        self.scheduler().estimated_pending_count()
    }

    /// 阻塞运行直到时钟到期或出现致命错误
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        match self {
            Engine::Sequential(sim) => sim.run(),
            Engine::Parallel(orch) => orch.run(),
        }
    }
}
