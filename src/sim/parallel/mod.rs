//! 并行仿真引擎
//!
//! 按时间窗口推进：窗口为 `[position, leash)`，`leash = min(position + runahead, end)`。
//! 窗口内的事件按 owner 分区，分发给固定数量的工作线程执行：
//!
//! ```text
//!   submit(ev) ──┬── ev.time >= leash ──────────────► future（全局时间堆）
//!                ├── owner == None ─────────────────► ready（就绪队列）+1 许可
//!                └── owner == Some(o)
//!                       ├── 通道 o 不存在 ──► 新建通道 + Drain(o) 进 ready，+1 许可
//!                       └── 通道 o 已存在 ──► 追加到通道（已有 drain task 负责）
//!
//!   worker:  acquire 许可 → take_ready_work → 执行（Drain 则循环取该 owner 的事件）→ report_done
//!   编排器:  等待闸门 → 取 future 堆顶作为新 position → 推进时钟 → 把窗口内事件重新分类 → 循环
//! ```
//!
//! 正确性依赖调用方保证的前提：`runahead` 不大于任意因果影响传到另一个 owner 所需的最小时延。
//! 在此前提下，窗口 W 内产生的事件不会落回 W 内的其他 owner，按 owner 看与顺序引擎等价。
//! 无 owner 的事件在窗口内被假定可交换（由领域模型保证，引擎不检查）。

mod lanes;
mod sync;
mod worker;

use crate::sim::clock::SimClock;
use crate::sim::config::EngineConfig;
use crate::sim::error::SimError;
use crate::sim::event::{Event, OwnerId, Scheduler};
use crate::sim::exec::execute_guarded;
use crate::sim::scheduled_event::ScheduledEvent;
use crate::sim::stats::{Counters, RunReport};
use crate::sim::time::SimTime;
use crossbeam_queue::SegQueue;
use lanes::{Enqueued, LaneArena};
use parking_lot::Mutex;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;
use sync::{Gate, Permits};
use tracing::{debug, error, info, trace};

/// 就绪队列中的一项工作
pub(crate) enum ReadyWork {
    /// 无 owner 的事件，可在任意线程执行
    Event(ScheduledEvent),
    /// 某个 owner 的 drain task：按顺序执行该 owner 的全部待处理事件
    Drain(OwnerId),
}

/// 离开作用域时关闭工作线程（包括 panic 展开时）
struct ReleaseWorkers<'a>(&'a Orchestrator);

impl Drop for ReleaseWorkers<'_> {
    fn drop(&mut self) {
        self.0.shutdown_workers();
    }
}

/// 并行编排器：持有全局未来事件堆、owner 通道表和就绪队列，负责开窗与静止检测。
pub struct Orchestrator {
    workers: usize,
    width: SimTime,
    clock: SimClock,
    next_seq: AtomicU64,

    future: Mutex<BinaryHeap<ScheduledEvent>>,
    ready: SegQueue<ReadyWork>,
    lanes: LaneArena,

    permits: Permits,
    gate: Gate,
    /// 已入就绪队列但尚未完成的工作数（含开窗期间的编排器自身）；归零即静止。
    in_flight: AtomicUsize,

    position: AtomicU64,
    leash: AtomicU64,
    started: AtomicBool,
    shutdown: AtomicBool,
    aborted: AtomicBool,
    fatal: Mutex<Option<SimError>>,
    counters: Counters,
}

impl Orchestrator {
    pub fn new(config: &EngineConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            workers: config.resolved_workers().max(1),
            width: config.window_width(),
            clock: SimClock::with_end_time(config.end_time),
            next_seq: AtomicU64::new(0),
            future: Mutex::new(BinaryHeap::new()),
            ready: SegQueue::new(),
            lanes: LaneArena::default(),
            permits: Permits::default(),
            gate: Gate::new_open(),
            in_flight: AtomicUsize::new(0),
            position: AtomicU64::new(0),
            leash: AtomicU64::new(0),
            started: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            aborted: AtomicBool::new(false),
            fatal: Mutex::new(None),
            counters: Counters::default(),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// 当前窗口 `[position, leash)`
    pub fn window(&self) -> (SimTime, SimTime) {
        (
            SimTime(self.position.load(Ordering::Acquire)),
            SimTime(self.leash.load(Ordering::Acquire)),
        )
    }

    /// 调度一个具体类型的事件
    pub fn schedule<E: Event>(&self, ev: E) {
        self.submit(Box::new(ev));
    }

    /// 运行直到时钟到期（正常结束）或出现致命错误。阻塞调用。
    #[tracing::instrument(skip(self), fields(workers = self.workers, runahead = ?self.width))]
    pub fn run(&self) -> Result<RunReport, SimError> {
        if !self.clock.is_configured() {
            return Err(SimError::ClockNotConfigured);
        }
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(SimError::InvalidConfig(
                "the engine has already been run".to_string(),
            ));
        }
        let started = Instant::now();
        info!(
            queued = self.future.lock().len(),
            end = ?self.clock.end_time(),
            "▶️  开始运行仿真（并行模式）"
        );

        let outcome = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for index in 0..self.workers {
                let spawned = thread::Builder::new()
                    .name(format!("sim-worker-{index}"))
                    .spawn_scoped(scope, move || worker::run_worker(self, index));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        self.shutdown_workers();
                        return Err(SimError::InvalidConfig(format!(
                            "failed to spawn worker {index}: {e}"
                        )));
                    }
                }
            }

            // 无论 drive 正常返回还是 panic，都要放行工作线程，否则 scope 永远等不到它们
            let outcome = {
                let _release = ReleaseWorkers(self);
                panic::catch_unwind(AssertUnwindSafe(|| self.drive()))
                    .unwrap_or(Err(SimError::EnginePanicked))
            };

            let mut panicked = false;
            for handle in handles {
                panicked |= handle.join().is_err();
            }
            if panicked && outcome.is_ok() {
                return Err(SimError::EnginePanicked);
            }
            outcome
        });

        if let Err(err) = outcome {
            error!(error = %err, now = ?self.clock.now(), "💥 仿真异常终止");
            return Err(err);
        }

        let report = self.counters.report(
            self.pending_count() as u64,
            self.clock.now(),
            started.elapsed(),
        );
        info!(
            executed = report.executed,
            faulted = report.faulted,
            windows = report.windows,
            pending = report.pending,
            final_time = ?report.final_time,
            "✅ 仿真完成"
        );
        Ok(report)
    }

    /// 编排器主循环：每次闸门打开（上一个窗口完全排空）后开启下一个窗口。
    fn drive(&self) -> Result<(), SimError> {
        loop {
            self.gate.wait();
            if let Some(err) = self.fatal.lock().take() {
                return Err(err);
            }

            // 补充窗口期间编排器自身算作一项进行中的工作，
            // 保证窗口内工作在补充完成前就执行完时，闸门也能被打开。
            self.gate.arm();
            self.in_flight.fetch_add(1, Ordering::SeqCst);

            let Some(position) = self.future.lock().peek().map(ScheduledEvent::at) else {
                let now = self.clock.now();
                error!(now = ?now, "未来事件队列在仿真期间耗尽");
                return Err(SimError::Starvation { now });
            };
            // 窗口不越过结束时间：到期时刻及之后的事件一律留在 future 中
            let end = self.clock.end_time();
            let leash = position.after(self.width).min(end);
            self.position.store(position.0, Ordering::Release);
            self.leash.store(leash.0, Ordering::Release);
            self.clock.advance_to(position)?;

            if self.clock.is_expired() {
                info!(now = ?position, "⏹️  到达结束时间");
                return Ok(());
            }
            Counters::bump(&self.counters.windows);

            let admitted = {
                let mut future = self.future.lock();
                let mut admitted = Vec::new();
                while future.peek().is_some_and(|top| top.at < leash) {
                    if let Some(item) = future.pop() {
                        admitted.push(item);
                    }
                }
                admitted
            };
            debug!(
                position = ?position,
                leash = ?leash,
                admitted = admitted.len(),
                "🪟 开启窗口"
            );
            for item in admitted {
                self.classify(item);
            }
            trace!(live_lanes = self.lanes.live(), "窗口已分发");

            self.report_done();
        }
    }

    /// 按时间和 owner 把事件放入 future、ready 或 owner 通道。
    fn classify(&self, item: ScheduledEvent) {
        if item.at.0 >= self.leash.load(Ordering::Acquire) {
            trace!(at = ?item.at, seq = item.seq, "推迟到后续窗口");
            self.future.lock().push(item);
            return;
        }
        match item.owner {
            None => self.push_ready(ReadyWork::Event(item)),
            Some(owner) => {
                if self.lanes.enqueue(owner, item) == Enqueued::Opened {
                    trace!(owner = ?owner, "新建 owner 通道");
                    self.push_ready(ReadyWork::Drain(owner));
                }
            }
        }
    }

    fn push_ready(&self, work: ReadyWork) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.ready.push(work);
        self.permits.release(1);
    }

    /// 空闲工作线程拿到许可后调用：取出一项就绪工作。
    pub(crate) fn take_ready_work(&self) -> Option<ReadyWork> {
        self.ready.pop()
    }

    /// drain task 调用：取出 owner 的下一个事件；队列空时注销通道并返回 `None`。
    pub(crate) fn take_owner_work(&self, owner: OwnerId) -> Option<ScheduledEvent> {
        self.lanes.take(owner)
    }

    /// 工作线程完成一项工作后调用；全部完成（静止）时打开闸门。
    pub(crate) fn report_done(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            trace!("窗口已排空");
            self.gate.open();
        }
    }

    /// 在工作线程上执行一个事件，先检查因果性；中止后只丢弃不执行。
    pub(crate) fn perform(&self, item: ScheduledEvent) {
        if self.aborted.load(Ordering::Acquire) {
            return;
        }
        let now = self.clock.now();
        if item.at < now {
            error!(event_time = ?item.at, now = ?now, seq = item.seq, owner = ?item.owner, "事件发生在过去");
            self.abort(SimError::CausalityViolation {
                event_time: item.at,
                now,
            });
            return;
        }
        execute_guarded(item, self, &self.counters);
    }

    fn abort(&self, err: SimError) {
        let mut fatal = self.fatal.lock();
        if fatal.is_none() {
            *fatal = Some(err);
        }
        self.aborted.store(true, Ordering::Release);
    }

    fn shutdown_workers(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.permits.release(self.workers);
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    fn pending_count(&self) -> usize {
        self.future.lock().len() + self.ready.len() + self.lanes.queued()
    }
}

impl Scheduler for Orchestrator {
    fn now(&self) -> SimTime {
        self.clock.now()
    }

    #[tracing::instrument(level = "trace", skip(self, ev), fields(event_type = ev.name(), schedule_at = ?ev.time()))]
    fn submit(&self, ev: Box<dyn Event>) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        Counters::bump(&self.counters.submitted);
        self.classify(ScheduledEvent::new(seq, ev));
    }

    /// 近似值：各队列分别加锁读取，彼此之间不是同一时刻的快照。
    fn estimated_pending_count(&self) -> usize {
        self.pending_count()
    }
}
