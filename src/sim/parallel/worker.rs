//! 工作线程与 owner drain task

use super::{Orchestrator, ReadyWork};
use crate::sim::event::OwnerId;
use tracing::{debug, trace};

/// 工作线程主循环：等待许可，执行一项就绪工作，报告完成。
///
/// 关闭时编排器给每个线程补一个许可，线程看到关闭标记后退出，不再取工作。
pub(super) fn run_worker(orch: &Orchestrator, index: usize) {
    debug!(worker = index, "工作线程启动");
    let mut items = 0u64;
    loop {
        orch.permits.acquire();
        if orch.is_shutdown() {
            break;
        }
        // 许可与就绪项一一对应，拿到许可时就绪队列中必有一项
        let Some(work) = orch.take_ready_work() else {
            continue;
        };
        match work {
            ReadyWork::Event(item) => orch.perform(item),
            ReadyWork::Drain(owner) => drain_owner(orch, owner),
        }
        orch.report_done();
        items += 1;
    }
    debug!(worker = index, items, "工作线程退出");
}

/// drain task：独占地按时间顺序执行一个 owner 的待处理事件，直到该 owner 的队列为空。
fn drain_owner(orch: &Orchestrator, owner: OwnerId) {
    let mut ran = 0usize;
    while let Some(item) = orch.take_owner_work(owner) {
        orch.perform(item);
        ran += 1;
    }
    trace!(owner = ?owner, ran, "owner 通道已排空");
}
