//! 测试用的事件

use crate::sim::{EngineConfig, Event, EventFault, OwnerId, Scheduler, SimTime};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;

pub fn config(workers: usize, runahead: u64, end: u64) -> EngineConfig {
    EngineConfig::default()
        .configure(workers, SimTime(runahead))
        .configure_end(SimTime(end))
}

/// 记录 (id, 执行时看到的时钟)
pub type ProbeLog = Arc<Mutex<Vec<(u32, SimTime)>>>;

pub struct Probe {
    pub id: u32,
    pub at: SimTime,
    pub owner: Option<OwnerId>,
    pub log: ProbeLog,
}

impl Event for Probe {
    fn time(&self) -> SimTime {
        self.at
    }

    fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        self.log.lock().push((self.id, sched.now()));
        Ok(())
    }
}

/// 执行时提交另一个事件
pub struct Spawn {
    pub at: SimTime,
    pub owner: Option<OwnerId>,
    pub child: Box<dyn Event>,
}

impl Spawn {
    pub fn new<E: Event>(at: SimTime, child: E) -> Self {
        Self {
            at,
            owner: None,
            child: Box::new(child),
        }
    }
}

impl Event for Spawn {
    fn time(&self) -> SimTime {
        self.at
    }

    fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        sched.submit(self.child);
        Ok(())
    }
}

/// 无 owner：计数并在 `step` 之后再次提交自己
pub struct Counting {
    pub at: SimTime,
    pub step: SimTime,
    pub counter: Arc<AtomicU64>,
}

impl Event for Counting {
    fn time(&self) -> SimTime {
        self.at
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let mut me = *self;
        me.counter.fetch_add(1, Ordering::SeqCst);
        me.at = me.at.after(me.step);
        sched.schedule(me);
        Ok(())
    }
}

/// 失败或 panic 的事件
pub struct Faulty {
    pub at: SimTime,
    pub panic: bool,
}

impl Event for Faulty {
    fn time(&self) -> SimTime {
        self.at
    }

    fn execute(self: Box<Self>, _sched: &dyn Scheduler) -> Result<(), EventFault> {
        if self.panic {
            panic!("boom at {}", self.at);
        }
        Err(EventFault::new("refused"))
    }
}

/// 检测同一 owner 是否被并发执行，并记录执行时间
pub struct OwnerProbe {
    pub busy: Vec<AtomicBool>,
    pub overlaps: AtomicU64,
    /// (执行时看到的时钟, 事件时间)
    pub clock_seen: Mutex<Vec<(SimTime, SimTime)>>,
    pub runs: Mutex<Vec<Vec<SimTime>>>,
}

impl OwnerProbe {
    pub fn new(owners: usize) -> Arc<Self> {
        Arc::new(Self {
            busy: (0..owners).map(|_| AtomicBool::new(false)).collect(),
            overlaps: AtomicU64::new(0),
            clock_seen: Mutex::new(Vec::new()),
            runs: Mutex::new(vec![Vec::new(); owners]),
        })
    }
}

pub struct Exclusive {
    pub at: SimTime,
    pub owner: OwnerId,
    pub period: SimTime,
    pub probe: Arc<OwnerProbe>,
}

impl Event for Exclusive {
    fn time(&self) -> SimTime {
        self.at
    }

    fn owner(&self) -> Option<OwnerId> {
        Some(self.owner)
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let mut me = *self;
        let probe = Arc::clone(&me.probe);
        probe.clock_seen.lock().push((sched.now(), me.at));
        if probe.busy[me.owner.0].swap(true, Ordering::SeqCst) {
            probe.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        probe.runs.lock()[me.owner.0].push(me.at);
        for _ in 0..8 {
            std::thread::yield_now();
        }
        probe.busy[me.owner.0].store(false, Ordering::SeqCst);

        me.at = me.at.after(me.period);
        sched.schedule(me);
        Ok(())
    }
}
