//! 心跳事件：周期性输出进度。

use crate::sim::{Event, EventFault, Scheduler, SimTime};
use tracing::info;

/// 无 owner 的周期事件：记录仿真时间和近似的待处理事件数，然后在一个周期后再次提交自己。
pub struct Heartbeat {
    pub at: SimTime,
    pub interval: SimTime,
}

impl Event for Heartbeat {
    fn time(&self) -> SimTime {
        self.at
    }

    fn execute(self: Box<Self>, sched: &dyn Scheduler) -> Result<(), EventFault> {
        let mut me = *self;
        info!(
            sim_ms = me.at.as_millis(),
            pending = sched.estimated_pending_count(),
            "💓 heartbeat"
        );
        if me.interval > SimTime::ZERO {
            me.at = me.at.after(me.interval);
            sched.schedule(me);
        }
        Ok(())
    }
}
