//! 覆盖网络模型
//!
//! 中继（owner）、单向链路、电路和信元。它只通过 `Event`/`Scheduler` 接口使用引擎：
//! 每一跳是一个由接收中继拥有的 `CellArrive` 事件，时间为发送端链路的离开时刻加传播时延，
//! 因此链路最小时延就是并行运行时 runahead 的安全上限。

mod cell;
mod cell_arrive;
mod id;
mod inject;
mod link;
mod network;
mod relay;
mod topo;

pub use cell::{CELL_BYTES, Cell};
pub use cell_arrive::CellArrive;
pub use id::{LinkId, RelayId};
pub use inject::InjectCells;
pub use link::Link;
pub use network::{NetStats, OverlayNetwork};
pub use relay::{Relay, RelayStats};
pub use topo::{MeshOpts, build_mesh, pick_circuit};
