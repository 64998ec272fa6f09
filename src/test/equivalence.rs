//! 顺序引擎与并行引擎在同一工作负载上的结果必须一致。

use crate::sim::{Engine, RunReport, SimTime};
use crate::workload::{self, EngineSpec, OwnerChainSpec, RandomChainSpec, WorkloadSpec};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, PartialEq)]
struct Outcome {
    runs: u64,
    time_sum: u64,
    traces: BTreeMap<crate::sim::OwnerId, crate::workload::ChainTrace>,
    submitted: u64,
    executed: u64,
    pending: u64,
    final_time: SimTime,
}

fn run_with(mut spec: WorkloadSpec, workers: usize) -> Outcome {
    spec.engine.workers = Some(workers);
    let mut engine = Engine::new(&spec.engine_config()).expect("engine");
    let installed = workload::install(&spec, engine.scheduler()).expect("install");
    let RunReport {
        submitted,
        executed,
        pending,
        final_time,
        ..
    } = engine.run().expect("run");
    let tally = installed.random.expect("random chains installed");
    Outcome {
        runs: tally.runs(),
        time_sum: tally.time_sum(),
        traces: installed.chains.snapshot(),
        submitted,
        executed,
        pending,
        final_time,
    }
}

fn spec_of(
    chains: usize,
    seed: u64,
    max_delay_us: u64,
    periods: Vec<u64>,
    runahead_us: u64,
) -> WorkloadSpec {
    WorkloadSpec {
        schema_version: workload::SCHEMA_VERSION,
        meta: None,
        engine: EngineSpec {
            workers: None,
            runahead_us: Some(runahead_us),
            end_ms: 5,
        },
        heartbeat_ms: None,
        random_chains: Some(RandomChainSpec {
            chains,
            seed,
            max_delay_us,
            start_spread_us: 100,
        }),
        owner_chains: periods
            .into_iter()
            .enumerate()
            .map(|(owner, period_us)| OwnerChainSpec {
                owner,
                period_us,
                start_us: owner as u64,
            })
            .collect(),
        overlay: None,
    }
}

#[test]
fn engines_agree_on_fixed_workload() {
    let spec = spec_of(64, 324_528_439, 200, vec![7, 11, 13, 250], 5);
    let sequential = run_with(spec.clone(), 1);
    let parallel = run_with(spec, 4);
    assert!(sequential.runs > 0);
    assert_eq!(sequential.traces.len(), 4);
    assert_eq!(sequential, parallel);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn engines_agree_on_random_workloads(
        chains in 1usize..40,
        seed in any::<u64>(),
        max_delay_us in 10u64..500,
        periods in proptest::collection::vec(1u64..400, 0..6),
        runahead_us in 0u64..100,
        workers in 2usize..6,
    ) {
        let spec = spec_of(chains, seed, max_delay_us, periods, runahead_us);
        let sequential = run_with(spec.clone(), 1);
        let parallel = run_with(spec, workers);
        prop_assert_eq!(sequential, parallel);
    }
}
