//! 电路流量注入事件

use super::id::RelayId;
use super::network::OverlayNetwork;
use crate::sim::{Event, EventFault, OwnerId, Scheduler, SimTime};
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// 客户端在电路入口周期性注入信元，由入口中继拥有。
pub struct InjectCells {
    pub at: SimTime,
    pub circuit_id: u64,
    pub path: Arc<[RelayId]>,
    pub cell_bytes: u32,
    pub remaining: u64,
    pub gap: SimTime,
    pub net: Arc<OverlayNetwork>,
}

impl Event for InjectCells {
    fn time(&self) -> SimTime {
        self.at
    }

    fn owner(&self) -> Option<OwnerId> {
        self.path.first().map(|&r| r.into())
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let mut me = *self;
        if me.remaining == 0 {
            return Ok(());
        }

        let cell = me
            .net
            .make_cell(me.circuit_id, me.cell_bytes, Arc::clone(&me.path));
        me.net.stats.injected_cells.fetch_add(1, Ordering::Relaxed);
        let src = cell
            .src()
            .ok_or_else(|| EventFault::new(format!("circuit {} has an empty path", me.circuit_id)))?;
        // 从入口直接发往下一跳（forward 会调度 CellArrive）
        me.net.forward_from(src, cell, me.at, sched)?;

        me.remaining -= 1;
        if me.remaining > 0 {
            me.at = me.at.after(me.gap);
            sched.schedule(me);
        }
        Ok(())
    }
}
