//! 通用工作链
//!
//! 两类自我续期的事件：无 owner 的随机时延链，以及按固定周期运行的 owner 链。

use crate::rng::SimRng;
use crate::sim::{Event, EventFault, OwnerId, Scheduler, SimTime};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 随机链的汇总：运行次数与时间戳之和，都与执行顺序无关。
#[derive(Debug, Default)]
pub struct ChainTally {
    runs: AtomicU64,
    time_sum: AtomicU64,
}

impl ChainTally {
    pub fn record(&self, at: SimTime) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.time_sum.fetch_add(at.0, Ordering::Relaxed);
    }

    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn time_sum(&self) -> u64 {
        self.time_sum.load(Ordering::Relaxed)
    }
}

/// 无 owner 的随机链：每次执行后在 `[0, max_delay)` 的随机时延之后再次提交自己。
pub struct RandomWorkChain {
    pub at: SimTime,
    pub max_delay: SimTime,
    pub rng: SimRng,
    pub tally: Arc<ChainTally>,
}

impl Event for RandomWorkChain {
    fn time(&self) -> SimTime {
        self.at
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let mut me = *self;
        me.tally.record(me.at);
        let delay = me.rng.below(me.max_delay.0);
        me.at = me.at.after(SimTime(delay));
        sched.schedule(me);
        Ok(())
    }
}

/// owner 链的执行轨迹
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTrace {
    pub runs: u64,
    pub last: SimTime,
    /// 所有执行是否按时间非递减
    pub ordered: bool,
}

/// 各 owner 链的执行记录
#[derive(Debug, Default)]
pub struct ChainLog {
    traces: Mutex<BTreeMap<OwnerId, ChainTrace>>,
}

impl ChainLog {
    pub fn record(&self, owner: OwnerId, at: SimTime) {
        let mut traces = self.traces.lock();
        let trace = traces.entry(owner).or_insert(ChainTrace {
            runs: 0,
            last: at,
            ordered: true,
        });
        trace.ordered &= at >= trace.last;
        trace.runs += 1;
        trace.last = at;
    }

    pub fn get(&self, owner: OwnerId) -> Option<ChainTrace> {
        self.traces.lock().get(&owner).copied()
    }

    pub fn snapshot(&self) -> BTreeMap<OwnerId, ChainTrace> {
        self.traces.lock().clone()
    }
}

/// owner 链：每 `period` 运行一次。
pub struct PeriodicChain {
    pub owner: OwnerId,
    pub at: SimTime,
    pub period: SimTime,
    pub log: Arc<ChainLog>,
}

impl Event for PeriodicChain {
    fn time(&self) -> SimTime {
        self.at
    }

    fn owner(&self) -> Option<OwnerId> {
        Some(self.owner)
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let mut me = *self;
        if me.period == SimTime::ZERO {
            return Err(EventFault::new(format!(
                "chain for {:?} has a zero period",
                me.owner
            )));
        }
        me.log.record(me.owner, me.at);
        me.at = me.at.after(me.period);
        sched.schedule(me);
        Ok(())
    }
}
