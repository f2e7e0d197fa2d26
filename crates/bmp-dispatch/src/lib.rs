//! The evaluation orchestrator: a message-bus-backed dispatch client that
//! submits candidate scenarios to an external simulator fleet and
//! correlates replies back by UUID.

pub mod bus;
pub mod client;
pub mod session;

pub use bus::{MessageBus, RedisBus};
pub use client::{parse_sim_result, DispatchClient};
pub use session::RunSession;
