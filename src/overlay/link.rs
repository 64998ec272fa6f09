//! 链路类型
//!
//! 定义中继之间的单向链路及其传输时延计算。

use super::id::RelayId;
use crate::sim::SimTime;

/// 单向链路。只由发送端中继的事件修改，因此受该中继的串行执行保护。
#[derive(Debug)]
pub struct Link {
    pub from: RelayId,
    pub to: RelayId,
    pub latency: SimTime,
    pub bandwidth_bps: u64,
    pub busy_until: SimTime,
}

impl Link {
    /// 创建新链路
    pub fn new(from: RelayId, to: RelayId, latency: SimTime, bandwidth_bps: u64) -> Self {
        Self {
            from,
            to,
            latency,
            bandwidth_bps,
            busy_until: SimTime::ZERO,
        }
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        // ceil(bytes*8 / bps) 秒 -> 纳秒
        if self.bandwidth_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128) + (self.bandwidth_bps as u128 - 1))
            / self.bandwidth_bps as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 从 `now` 开始排队发送 `bytes`，返回 (离开时刻, 到达时刻)
    pub(crate) fn transmit(&mut self, now: SimTime, bytes: u32) -> (SimTime, SimTime) {
        let start = now.max(self.busy_until);
        let depart = start.after(self.tx_time(bytes));
        self.busy_until = depart;
        (depart, depart.after(self.latency))
    }
}
