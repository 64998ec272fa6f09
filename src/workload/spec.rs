//! 工作负载描述（workload.json）

use crate::sim::{EngineConfig, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<WorkloadMeta>,
    pub engine: EngineSpec,
    /// 心跳间隔；缺省时不产生心跳
    #[serde(default)]
    pub heartbeat_ms: Option<u64>,
    #[serde(default)]
    pub random_chains: Option<RandomChainSpec>,
    #[serde(default)]
    pub owner_chains: Vec<OwnerChainSpec>,
    #[serde(default)]
    pub overlay: Option<OverlaySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSpec {
    /// 0 表示每个 CPU 一个线程，1 表示顺序执行
    #[serde(default)]
    pub workers: Option<usize>,
    /// 窗口宽度；有覆盖网络时缺省为链路时延
    #[serde(default)]
    pub runahead_us: Option<u64>,
    pub end_ms: u64,
}

/// 无 owner 的随机时延链
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomChainSpec {
    pub chains: usize,
    #[serde(default)]
    pub seed: u64,
    pub max_delay_us: u64,
    /// 各链的起始时间均匀分布在 `[0, start_spread_us)`
    #[serde(default)]
    pub start_spread_us: u64,
}

/// 每 `period_us` 运行一次的 owner 链
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerChainSpec {
    pub owner: usize,
    pub period_us: u64,
    #[serde(default)]
    pub start_us: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub relays: usize,
    pub circuits: usize,
    #[serde(default)]
    pub hops: Option<usize>,
    pub link_latency_us: u64,
    #[serde(default)]
    pub link_mbps: Option<u64>,
    pub cells_per_circuit: u64,
    pub cell_gap_us: u64,
    #[serde(default)]
    pub seed: u64,
}

impl OverlaySpec {
    pub const DEFAULT_HOPS: usize = 3;
    pub const DEFAULT_LINK_MBPS: u64 = 100;

    pub fn hops(&self) -> usize {
        self.hops.unwrap_or(Self::DEFAULT_HOPS)
    }

    pub fn bandwidth_bps(&self) -> u64 {
        self.link_mbps
            .unwrap_or(Self::DEFAULT_LINK_MBPS)
            .saturating_mul(1_000_000)
    }
}

impl WorkloadSpec {
    /// 由 `engine` 段得到引擎配置
    pub fn engine_config(&self) -> EngineConfig {
        let runahead = match (self.engine.runahead_us, &self.overlay) {
            (Some(us), _) => SimTime::from_micros(us),
            (None, Some(overlay)) => SimTime::from_micros(overlay.link_latency_us),
            (None, None) => SimTime::ZERO,
        };
        EngineConfig::default()
            .configure(self.engine.workers.unwrap_or(1), runahead)
            .configure_end(SimTime::from_millis(self.engine.end_ms))
    }
}
