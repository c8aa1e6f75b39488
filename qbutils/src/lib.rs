//! Network address helpers shared by the QuestBridge crates.
//!
//! The HTTP sync server binds on all interfaces, so the startup banner needs
//! to show the address other devices on the LAN (the headset, a phone) can
//! actually reach. [`guess_local_ip`] answers that question without sending
//! any traffic.

mod ip_utils;

pub use ip_utils::{guess_local_ip, local_addresses};
