//! OSC transport for QuestBridge
//!
//! This crate implements the subset of OSC 1.0 that the VRChat chatbox
//! understands, plus the UDP plumbing around it:
//!
//! - [`codec`]: message encoding/decoding (address, type tags, big-endian
//!   payloads, 4-byte field padding)
//! - [`transport`]: fire-and-forget UDP sender with chatbox helpers
//! - [`listener`]: cancellable inbound listener forwarding decoded packets
//!   to a channel
//!
//! Datagrams are best-effort by design: sends are not retried or
//! acknowledged, and malformed inbound packets are discarded without ever
//! reaching the caller as an error.
//!
//! # Example
//!
//! ```no_run
//! use qbosc::{OscArg, OscSender};
//!
//! # fn main() -> qbosc::Result<()> {
//! let sender = OscSender::new("127.0.0.1:9000".parse().unwrap())?;
//! sender.send_chatbox("hello from the bridge", true)?;
//! sender.send("/chatbox/typing", &[OscArg::Bool(false)])?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod listener;
pub mod transport;

pub use codec::{decode, encode, OscArg};
pub use error::{Error, Result};
pub use listener::{InboundMessage, OscListener};
pub use transport::OscSender;
