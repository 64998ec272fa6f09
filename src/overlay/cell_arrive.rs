//! 信元到达事件
//!
//! 由接收端中继拥有：同一中继的所有到达事件按时间串行处理。

use super::cell::Cell;
use super::id::RelayId;
use super::network::OverlayNetwork;
use crate::sim::{Event, EventFault, OwnerId, Scheduler, SimTime};
use std::sync::Arc;

/// 事件：把一个信元交给某个中继处理。
pub struct CellArrive {
    pub at: SimTime,
    pub to: RelayId,
    pub cell: Cell,
    pub net: Arc<OverlayNetwork>,
}

impl Event for CellArrive {
    fn time(&self) -> SimTime {
        self.at
    }

    fn owner(&self) -> Option<OwnerId> {
        Some(self.to.into())
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let CellArrive { at, to, cell, net } = *self;
        net.deliver(to, cell, at, sched)
    }
}
