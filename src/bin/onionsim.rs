//! 覆盖网络流量仿真
//!
//! 读取 workload.json（或使用内置的小规模示例），按配置选择顺序或并行引擎运行。

use clap::Parser;
use onionsim_rs::sim::{Engine, SimTime};
use onionsim_rs::workload::{
    self, EngineSpec, OverlaySpec, RandomChainSpec, SCHEMA_VERSION, WorkloadSpec,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};

#[derive(Debug, Parser)]
#[command(name = "onionsim", about = "覆盖网络离散事件仿真（顺序/并行引擎）")]
struct Args {
    /// Path to workload.json; a small built-in workload is used when absent
    #[arg(long)]
    workload: Option<PathBuf>,

    /// Worker threads: 0 = one per CPU, 1 = sequential engine
    #[arg(long)]
    workers: Option<usize>,

    /// Window width (microseconds); must not exceed the minimum cross-owner delay
    #[arg(long)]
    runahead_us: Option<u64>,

    /// End of simulated time (milliseconds)
    #[arg(long)]
    end_ms: Option<u64>,

    /// Print the run report as JSON instead of the summary line
    #[arg(long)]
    json: bool,
}

fn builtin_workload() -> WorkloadSpec {
    WorkloadSpec {
        schema_version: SCHEMA_VERSION,
        meta: None,
        engine: EngineSpec {
            workers: Some(1),
            runahead_us: None,
            end_ms: 1_000,
        },
        heartbeat_ms: Some(100),
        random_chains: Some(RandomChainSpec {
            chains: 1_000,
            seed: 324_528_439,
            max_delay_us: 200_000,
            start_spread_us: 100,
        }),
        owner_chains: Vec::new(),
        overlay: Some(OverlaySpec {
            relays: 16,
            circuits: 32,
            hops: Some(3),
            link_latency_us: 10_000,
            link_mbps: Some(100),
            cells_per_circuit: 100,
            cell_gap_us: 1_000,
            seed: 7,
        }),
    }
}

fn main() -> ExitCode {
    // 初始化 tracing（写到 stderr，stdout 只留给结果）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut spec = match &args.workload {
        Some(path) => match workload::load(path) {
            Ok(spec) => spec,
            Err(e) => {
                error!(error = %e, "无法加载 workload");
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => builtin_workload(),
    };
    if let Some(w) = args.workers {
        spec.engine.workers = Some(w);
    }
    if let Some(us) = args.runahead_us {
        spec.engine.runahead_us = Some(us);
    }
    if let Some(ms) = args.end_ms {
        spec.engine.end_ms = ms;
    }

    let config = spec.engine_config();
    let mut engine = match Engine::new(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let installed = match workload::install(&spec, engine.scheduler()) {
        Ok(installed) => installed,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let (Some(net), true) = (&installed.overlay, engine.is_parallel()) {
        if net.min_latency().is_some_and(|l| config.runahead > l) {
            warn!(
                runahead = ?config.runahead,
                min_latency = ?net.min_latency(),
                "runahead 大于最小链路时延，跨中继事件顺序可能被破坏"
            );
        }
    }

    let report = match engine.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!(
        "done @ {:?}, submitted={}, executed={}, faulted={}, windows={}, pending={}, wall_ms={}",
        report.final_time,
        report.submitted,
        report.executed,
        report.faulted,
        report.windows,
        report.pending,
        report.wall_time.as_millis()
    );
    if let Some(tally) = &installed.random {
        println!("random_chains runs={} time_sum={}", tally.runs(), tally.time_sum());
    }
    for (owner, trace) in installed.chains.snapshot() {
        println!(
            "owner_chain owner={} runs={} last={} ordered={}",
            owner.0, trace.runs, trace.last.0, trace.ordered
        );
    }
    if let Some(net) = &installed.overlay {
        println!(
            "overlay injected_cells={} delivered_cells={} min_latency={:?}",
            net.stats.injected_cells(),
            net.stats.delivered_cells(),
            net.min_latency().unwrap_or(SimTime::ZERO)
        );
    }
    ExitCode::SUCCESS
}
