use super::support::{Counting, Faulty, Probe, ProbeLog, Spawn};
use crate::sim::{SimError, SimTime, Simulator};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

fn keep_alive(sim: &Simulator, step: u64) -> Arc<AtomicU64> {
    let counter = Arc::new(AtomicU64::new(0));
    sim.schedule(Counting {
        at: SimTime::ZERO,
        step: SimTime(step),
        counter: Arc::clone(&counter),
    });
    counter
}

fn probe(id: u32, at: u64, log: &ProbeLog) -> Probe {
    Probe {
        id,
        at: SimTime(at),
        owner: None,
        log: Arc::clone(log),
    }
}

#[test]
fn simulator_runs_events_in_time_then_submission_order() {
    let mut sim = Simulator::new(SimTime(100));
    keep_alive(&sim, 10);
    let log = ProbeLog::default();
    sim.schedule(probe(0, 5, &log));
    sim.schedule(probe(1, 5, &log));
    sim.schedule(probe(2, 5, &log));
    sim.schedule(probe(3, 3, &log));

    sim.run().expect("run");

    let order: Vec<u32> = log.lock().iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec![3, 0, 1, 2]);
    // 顺序引擎中时钟等于事件时间
    assert_eq!(log.lock()[0].1, SimTime(3));
    assert_eq!(log.lock()[1].1, SimTime(5));
}

#[test]
fn simulator_runs_same_time_follow_on_after_its_parent() {
    let mut sim = Simulator::new(SimTime(100));
    keep_alive(&sim, 10);
    let log = ProbeLog::default();
    sim.schedule(Spawn::new(SimTime(5), probe(9, 5, &log)));
    sim.schedule(probe(1, 5, &log));

    sim.run().expect("run");

    let order: Vec<u32> = log.lock().iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec![1, 9]);
}

#[test]
fn simulator_with_nothing_submitted_starves_immediately() {
    let mut sim = Simulator::new(SimTime(100));
    let err = sim.run().expect_err("empty run must fail");
    assert_eq!(err, SimError::Starvation { now: SimTime::ZERO });
}

#[test]
fn simulator_starves_when_work_runs_out_before_end() {
    let mut sim = Simulator::new(SimTime(100));
    let log = ProbeLog::default();
    sim.schedule(probe(0, 10, &log));
    let err = sim.run().expect_err("must starve");
    assert_eq!(err, SimError::Starvation { now: SimTime(10) });
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn simulator_requires_end_time() {
    let mut sim = Simulator::default();
    sim.schedule(Counting {
        at: SimTime::ZERO,
        step: SimTime(1),
        counter: Arc::default(),
    });
    assert_eq!(sim.run(), Err(SimError::ClockNotConfigured));
}

#[test]
fn simulator_rejects_event_in_the_past() {
    let mut sim = Simulator::new(SimTime(1_000));
    keep_alive(&sim, 10);
    let log = ProbeLog::default();
    sim.schedule(Spawn::new(SimTime(100), probe(0, 50, &log)));

    let err = sim.run().expect_err("causality violation");
    assert_eq!(
        err,
        SimError::CausalityViolation {
            event_time: SimTime(50),
            now: SimTime(100)
        }
    );
    assert!(log.lock().is_empty());
}

#[test]
fn simulator_stops_at_end_time_and_leaves_rest_pending() {
    let mut sim = Simulator::new(SimTime(100));
    let counter = keep_alive(&sim, 10);
    let log = ProbeLog::default();
    sim.schedule(probe(0, 100, &log));
    sim.schedule(probe(1, 500, &log));

    let report = sim.run().expect("run");

    assert_eq!(counter.load(Ordering::SeqCst), 10);
    assert!(log.lock().is_empty());
    assert_eq!(report.final_time, SimTime(100));
    // 计数链在 100 的下一次执行 + 两个探针
    assert_eq!(report.pending, 3);
    assert_eq!(report.submitted, report.executed + report.pending);
    assert_eq!(report.windows, 0);
}

#[test]
fn simulator_counts_faults_and_keeps_running() {
    let mut sim = Simulator::new(SimTime(100));
    let counter = keep_alive(&sim, 10);
    sim.schedule(Faulty {
        at: SimTime(5),
        panic: false,
    });
    sim.schedule(Faulty {
        at: SimTime(15),
        panic: true,
    });

    let report = sim.run().expect("faults are not fatal");

    assert_eq!(counter.load(Ordering::SeqCst), 10);
    assert_eq!(report.faulted, 2);
    assert_eq!(report.executed, 12);
    assert_eq!(report.submitted, 13);
    assert_eq!(report.pending, 1);
    assert_eq!(report.submitted, report.executed + report.pending);
}
