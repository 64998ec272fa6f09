//! 仿真器（顺序参考引擎）
//!
//! 单一全局时间队列，没有窗口也没有线程：每次取出最早的事件，推进时钟，执行。
//! 作为并行引擎的正确性基准，也是小规模运行的低开销路径（等价于一个工作线程）。

use super::clock::SimClock;
use super::error::SimError;
use super::event::{Event, Scheduler};
use super::exec::execute_guarded;
use super::scheduled_event::ScheduledEvent;
use super::stats::{Counters, RunReport};
use super::time::SimTime;
use std::cell::{Cell, RefCell};
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, error, info, trace};

/// 事件驱动仿真器：维护时钟与事件队列。
#[derive(Default)]
pub struct Simulator {
    clock: SimClock,
    next_seq: Cell<u64>,
    q: RefCell<BinaryHeap<ScheduledEvent>>,
    counters: Counters,
}

impl Simulator {
    /// 创建仿真器并设置结束时间
    pub fn new(end_time: SimTime) -> Self {
        Self {
            clock: SimClock::with_end_time(end_time),
            ..Self::default()
        }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// 调度一个具体类型的事件
    pub fn schedule<E: Event>(&self, ev: E) {
        self.submit(Box::new(ev));
    }

    /// 运行直到时钟到达结束时间。
    ///
    /// 队列在结束时间之前耗尽，或事件时间早于当前时间，都是致命错误。
    #[tracing::instrument(skip(self), fields(end = ?self.clock.end_time()))]
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        if !self.clock.is_configured() {
            return Err(SimError::ClockNotConfigured);
        }
        let started = Instant::now();
        info!("▶️  开始运行仿真（顺序模式）");
        debug!(now = ?self.clock.now(), queue_size = self.q.get_mut().len(), "初始状态");

        loop {
            let Some(item) = self.q.get_mut().pop() else {
                let now = self.clock.now();
                error!(now = ?now, "事件队列在仿真期间耗尽");
                return Err(SimError::Starvation { now });
            };

            let now = self.clock.now();
            if item.at < now {
                error!(event_time = ?item.at, now = ?now, seq = item.seq, "事件发生在过去");
                return Err(SimError::CausalityViolation {
                    event_time: item.at,
                    now,
                });
            }

            // 推进后若已到期，该事件不再执行，留在队列中计入 pending
            self.clock.advance_to(item.at)?;
            if self.clock.is_expired() {
                self.q.get_mut().push(item);
                break;
            }

            trace!(
                now = ?item.at,
                seq = item.seq,
                event_type = item.name(),
                remaining_queue = self.q.get_mut().len(),
                "取出事件"
            );
            execute_guarded(item, &*self, &self.counters);
        }

        let report = self.counters.report(
            self.q.get_mut().len() as u64,
            self.clock.now(),
            started.elapsed(),
        );
        info!(
            executed = report.executed,
            faulted = report.faulted,
            pending = report.pending,
            final_time = ?report.final_time,
            "✅ 仿真完成"
        );
        Ok(report)
    }
}

impl Scheduler for Simulator {
    fn now(&self) -> SimTime {
        self.clock.now()
    }

    #[tracing::instrument(level = "trace", skip(self, ev), fields(event_type = ev.name(), schedule_at = ?ev.time()))]
    fn submit(&self, ev: Box<dyn Event>) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq.wrapping_add(1));
        Counters::bump(&self.counters.submitted);
        self.q.borrow_mut().push(ScheduledEvent::new(seq, ev));
    }

    fn estimated_pending_count(&self) -> usize {
        self.q.borrow().len()
    }
}
