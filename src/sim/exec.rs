//! 单个事件的执行边界
//!
//! 顺序引擎与并行工作线程共用：捕获事件返回的错误和 panic，记录日志后继续。

use super::event::Scheduler;
use super::scheduled_event::ScheduledEvent;
use super::stats::Counters;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, trace};

/// 执行一个事件；失败只记日志和计数，不向上传播。返回事件是否失败。
pub(crate) fn execute_guarded(
    item: ScheduledEvent,
    sched: &dyn Scheduler,
    counters: &Counters,
) -> bool {
    let ScheduledEvent { at, owner, seq, ev } = item;
    let name = ev.name();
    trace!(at = ?at, owner = ?owner, seq, event_type = name, "执行事件");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| ev.execute(sched)));
    Counters::bump(&counters.executed);

    let fault = match outcome {
        Ok(Ok(())) => return false,
        Ok(Err(fault)) => fault.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    Counters::bump(&counters.faulted);
    error!(
        at = ?at,
        owner = ?owner,
        seq,
        event_type = name,
        fault = %fault,
        "❌ 事件执行失败，继续运行"
    );
    true
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
