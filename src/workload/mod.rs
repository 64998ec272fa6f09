//! 工作负载
//!
//! 从 JSON 描述构建初始事件：随机链、owner 链、心跳和覆盖网络电路流量。

mod chains;
mod heartbeat;
mod spec;

pub use chains::{ChainLog, ChainTally, ChainTrace, PeriodicChain, RandomWorkChain};
pub use heartbeat::Heartbeat;
pub use spec::{
    EngineSpec, OverlaySpec, OwnerChainSpec, RandomChainSpec, WorkloadMeta, WorkloadSpec,
};

use crate::overlay::{CELL_BYTES, InjectCells, MeshOpts, OverlayNetwork, build_mesh, pick_circuit};
use crate::rng::SimRng;
use crate::sim::{OwnerId, Scheduler, SimTime};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("failed to read workload {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse workload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported schema_version {0}")]
    Schema(u32),
    #[error("invalid workload: {0}")]
    Invalid(String),
}

/// 读取并解析 workload.json
pub fn load(path: &Path) -> Result<WorkloadSpec, WorkloadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| WorkloadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&raw)
}

pub fn parse(raw: &str) -> Result<WorkloadSpec, WorkloadError> {
    let spec: WorkloadSpec = serde_json::from_str(raw)?;
    if spec.schema_version != SCHEMA_VERSION {
        return Err(WorkloadError::Schema(spec.schema_version));
    }
    Ok(spec)
}

/// 已安装的工作负载：运行结束后用来读取领域侧的结果。
#[derive(Default)]
pub struct Installed {
    pub random: Option<Arc<ChainTally>>,
    pub chains: Arc<ChainLog>,
    pub overlay: Option<Arc<OverlayNetwork>>,
}

/// 按描述提交所有初始事件
pub fn install(spec: &WorkloadSpec, sched: &dyn Scheduler) -> Result<Installed, WorkloadError> {
    let mut installed = Installed::default();

    if let Some(ms) = spec.heartbeat_ms {
        sched.schedule(Heartbeat {
            at: SimTime::ZERO,
            interval: SimTime::from_millis(ms),
        });
    }

    if let Some(rc) = &spec.random_chains {
        if rc.max_delay_us == 0 {
            return Err(WorkloadError::Invalid(
                "random_chains.max_delay_us must be greater than zero".to_string(),
            ));
        }
        let tally = Arc::new(ChainTally::default());
        let mut rng = SimRng::new(rc.seed);
        let spread = SimTime::from_micros(rc.start_spread_us);
        for _ in 0..rc.chains {
            sched.schedule(RandomWorkChain {
                at: SimTime(rng.below(spread.0)),
                max_delay: SimTime::from_micros(rc.max_delay_us),
                rng: rng.fork(),
                tally: Arc::clone(&tally),
            });
        }
        debug!(chains = rc.chains, "随机链已提交");
        installed.random = Some(tally);
    }

    for oc in &spec.owner_chains {
        if oc.period_us == 0 {
            return Err(WorkloadError::Invalid(format!(
                "owner chain {} has a zero period",
                oc.owner
            )));
        }
        sched.schedule(PeriodicChain {
            owner: OwnerId(oc.owner),
            at: SimTime::from_micros(oc.start_us),
            period: SimTime::from_micros(oc.period_us),
            log: Arc::clone(&installed.chains),
        });
    }

    if let Some(ov) = &spec.overlay {
        installed.overlay = Some(install_overlay(ov, sched)?);
    }
    Ok(installed)
}

fn install_overlay(
    ov: &OverlaySpec,
    sched: &dyn Scheduler,
) -> Result<Arc<OverlayNetwork>, WorkloadError> {
    if ov.relays < 2 || ov.hops() < 2 {
        return Err(WorkloadError::Invalid(
            "overlay needs at least 2 relays and 2 hops per circuit".to_string(),
        ));
    }
    let net = Arc::new(build_mesh(&MeshOpts {
        relays: ov.relays,
        link_latency: SimTime::from_micros(ov.link_latency_us),
        bandwidth_bps: ov.bandwidth_bps(),
    }));

    let mut rng = SimRng::new(ov.seed);
    let gap = SimTime::from_micros(ov.cell_gap_us);
    for circuit_id in 0..ov.circuits as u64 {
        let path: Arc<[_]> = pick_circuit(&mut rng, ov.relays, ov.hops()).into();
        sched.schedule(InjectCells {
            at: SimTime(rng.below(gap.0.max(1))),
            circuit_id,
            path,
            cell_bytes: CELL_BYTES,
            remaining: ov.cells_per_circuit,
            gap,
            net: Arc::clone(&net),
        });
    }
    info!(
        relays = ov.relays,
        circuits = ov.circuits,
        min_latency = ?net.min_latency(),
        "🧅 覆盖网络已构建"
    );
    Ok(net)
}
