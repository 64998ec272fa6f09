//! 覆盖网络拓扑
//!
//! 中继、单向链路和信元转发。构建完成后放进 `Arc` 在事件之间共享；
//! 中继和链路各自带锁，但同一中继的事件由引擎串行执行，锁不会发生竞争。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::cell::Cell;
use super::cell_arrive::CellArrive;
use super::id::{LinkId, RelayId};
use super::link::Link;
use super::relay::{Relay, RelayStats};
use crate::sim::{EventFault, Scheduler, SimTime};
use parking_lot::Mutex;
use tracing::{debug, trace};

/// 全网统计
#[derive(Debug, Default)]
pub struct NetStats {
    pub injected_cells: AtomicU64,
    pub delivered_cells: AtomicU64,
    pub delivered_bytes: AtomicU64,
}

impl NetStats {
    pub fn delivered_cells(&self) -> u64 {
        self.delivered_cells.load(Ordering::Relaxed)
    }

    pub fn injected_cells(&self) -> u64 {
        self.injected_cells.load(Ordering::Relaxed)
    }
}

/// 覆盖网络
#[derive(Default)]
pub struct OverlayNetwork {
    relays: Vec<Mutex<Relay>>,
    links: Vec<Mutex<Link>>,
    edges: HashMap<(RelayId, RelayId), LinkId>,
    next_cell_id: AtomicU64,
    pub stats: NetStats,
}

impl OverlayNetwork {
    /// 添加中继
    pub fn add_relay(&mut self, name: impl Into<String>) -> RelayId {
        let id = RelayId(self.relays.len());
        self.relays.push(Mutex::new(Relay::new(id, name)));
        id
    }

    /// 连接两个中继（创建单向链路）
    pub fn connect(
        &mut self,
        from: RelayId,
        to: RelayId,
        latency: SimTime,
        bandwidth_bps: u64,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        self.links
            .push(Mutex::new(Link::new(from, to, latency, bandwidth_bps)));
        self.edges.insert((from, to), id);
        id
    }

    pub fn relay_count(&self) -> usize {
        self.relays.len()
    }

    pub fn relay_stats(&self, id: RelayId) -> Option<RelayStats> {
        self.relays.get(id.0).map(|r| r.lock().stats)
    }

    /// 所有链路中的最小传播时延：并行运行时 runahead 不应超过它。
    pub fn min_latency(&self) -> Option<SimTime> {
        self.links.iter().map(|l| l.lock().latency).min()
    }

    /// 创建信元
    pub fn make_cell(&self, circuit_id: u64, size_bytes: u32, path: Arc<[RelayId]>) -> Cell {
        let id = self.next_cell_id.fetch_add(1, Ordering::Relaxed);
        Cell {
            id,
            circuit_id,
            size_bytes,
            path,
            hop: 0,
        }
    }

    /// 中继 `to` 在 `now` 收到信元：到达出口则计为送达，否则继续转发。
    #[tracing::instrument(level = "debug", skip(self, cell, sched), fields(cell_id = cell.id, circuit_id = cell.circuit_id, to = ?to))]
    pub fn deliver(
        self: &Arc<Self>,
        to: RelayId,
        cell: Cell,
        now: SimTime,
        sched: &dyn Scheduler,
    ) -> Result<(), EventFault> {
        let relay = self
            .relays
            .get(to.0)
            .ok_or_else(|| EventFault::new(format!("unknown relay {to:?}")))?;
        let at_exit = {
            let mut relay = relay.lock();
            relay.stats.received += 1;
            relay.stats.bytes += cell.size_bytes as u64;
            if Some(to) == cell.dst() {
                relay.stats.delivered += 1;
                true
            } else {
                relay.stats.forwarded += 1;
                false
            }
        };

        if at_exit {
            trace!(now = ?now, "✅ 信元到达出口");
            self.stats.delivered_cells.fetch_add(1, Ordering::Relaxed);
            self.stats
                .delivered_bytes
                .fetch_add(cell.size_bytes as u64, Ordering::Relaxed);
            return Ok(());
        }
        self.forward_from(to, cell, now, sched)
    }

    /// 从指定中继把信元发往下一跳；`now` 是当前事件的时间。
    pub fn forward_from(
        self: &Arc<Self>,
        from: RelayId,
        cell: Cell,
        now: SimTime,
        sched: &dyn Scheduler,
    ) -> Result<(), EventFault> {
        let to = cell
            .next()
            .ok_or_else(|| EventFault::new(format!("cell {} has no next hop", cell.id)))?;
        let link_id = *self
            .edges
            .get(&(from, to))
            .ok_or_else(|| EventFault::new(format!("no link from {from:?} to {to:?}")))?;

        let (depart, arrive) = self.links[link_id.0].lock().transmit(now, cell.size_bytes);
        debug!(
            cell_id = cell.id,
            from = ?from,
            to = ?to,
            depart = ?depart,
            arrive = ?arrive,
            "🚀 转发信元"
        );

        sched.schedule(CellArrive {
            at: arrive,
            to,
            cell: cell.advance(),
            net: Arc::clone(self),
        });
        Ok(())
    }
}
