//! 覆盖网络拓扑构建

use super::id::RelayId;
use super::network::OverlayNetwork;
use crate::rng::SimRng;
use crate::sim::SimTime;

/// 全互联拓扑配置
#[derive(Debug, Clone)]
pub struct MeshOpts {
    pub relays: usize,
    pub link_latency: SimTime,
    pub bandwidth_bps: u64,
}

impl Default for MeshOpts {
    fn default() -> Self {
        Self {
            relays: 16,
            link_latency: SimTime::from_millis(10),
            bandwidth_bps: 100_000_000,
        }
    }
}

/// 构建全互联覆盖网络：任意两个中继之间都有一对单向链路。
pub fn build_mesh(opts: &MeshOpts) -> OverlayNetwork {
    let mut net = OverlayNetwork::default();
    let ids: Vec<RelayId> = (0..opts.relays)
        .map(|i| net.add_relay(format!("r{i}")))
        .collect();
    for &a in &ids {
        for &b in &ids {
            if a != b {
                net.connect(a, b, opts.link_latency, opts.bandwidth_bps);
            }
        }
    }
    net
}

/// 随机选择 `hops` 个互不相同的中继组成电路路径（入口在前）。
pub fn pick_circuit(rng: &mut SimRng, relays: usize, hops: usize) -> Vec<RelayId> {
    let hops = hops.min(relays);
    let mut pool: Vec<usize> = (0..relays).collect();
    // 部分 Fisher-Yates：只洗前 hops 个
    for i in 0..hops {
        let j = i + rng.below((relays - i) as u64) as usize;
        pool.swap(i, j);
    }
    pool.truncate(hops);
    pool.into_iter().map(RelayId).collect()
}
