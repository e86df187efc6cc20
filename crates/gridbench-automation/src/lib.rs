//! Automation gateway adapters
//!
//! Implements the core's automation and network-emulation contracts on top
//! of the external `ansible-playbook` CLI.

pub mod error;
pub mod netem;
pub mod playbook;

pub use error::AutomationError;
pub use netem::{NETCHECK_UNIT, NETEM_UNIT, TcEmulator};
pub use playbook::PlaybookRunner;
