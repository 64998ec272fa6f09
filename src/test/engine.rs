use super::support::{Counting, config};
use crate::sim::{Engine, EngineConfig, SimError, SimTime};
use std::sync::Arc;

#[test]
fn engine_picks_sequential_for_one_worker() {
    let engine = Engine::new(&config(1, 50, 100)).expect("engine");
    assert!(!engine.is_parallel());
    assert_eq!(engine.clock().end_time(), SimTime(100));
}

#[test]
fn engine_picks_parallel_for_several_workers() {
    let engine = Engine::new(&config(3, 50, 100)).expect("engine");
    assert!(engine.is_parallel());
    match &engine {
        Engine::Parallel(orch) => assert_eq!(orch.workers(), 3),
        Engine::Sequential(_) => panic!("expected parallel engine"),
    }
}

#[test]
fn engine_rejects_missing_end_time() {
    let err = Engine::new(&EngineConfig::default()).err().expect("no end time");
    assert!(matches!(err, SimError::InvalidConfig(_)));
}

#[test]
fn engine_reports_pending_events_before_run() {
    for workers in [1, 2] {
        let mut engine = Engine::new(&config(workers, 10, 100)).expect("engine");
        for at in [0, 5, 500] {
            engine.schedule(Counting {
                at: SimTime(at),
                step: SimTime(50),
                counter: Arc::default(),
            });
        }
        assert_eq!(engine.estimated_pending_count(), 3);

        let report = engine.run().expect("run");
        assert_eq!(report.submitted, report.executed + report.pending);
        assert_eq!(report.final_time, SimTime(100));
    }
}
