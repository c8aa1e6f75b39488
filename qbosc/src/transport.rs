//! Fire-and-forget UDP sender
//!
//! One socket, one destination, no retries and no acknowledgements. A send
//! failure (unreachable destination, local socket error) surfaces to the
//! caller as an error but never takes the process down; the next message is
//! simply attempted on its own.

use crate::codec::{encode, OscArg};
use crate::error::Result;
use std::net::{SocketAddr, UdpSocket};
use tracing::debug;

/// OSC sender bound to a single destination.
///
/// The destination address is validated by the caller (configuration layer)
/// before this type is constructed; from here on every send is best-effort.
#[derive(Debug)]
pub struct OscSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscSender {
    /// Creates a sender towards `target`.
    ///
    /// Binds an ephemeral local UDP port. Fails only if no local socket can
    /// be created.
    pub fn new(target: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self { socket, target })
    }

    /// The destination this sender transmits to
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Encodes and transmits a single OSC message
    pub fn send(&self, address: &str, args: &[OscArg]) -> Result<()> {
        let msg = encode(address, args);
        self.socket.send_to(&msg, self.target)?;
        debug!(address, bytes = msg.len(), "OSC message sent");
        Ok(())
    }

    /// Sends a chatbox message.
    ///
    /// `immediate` bypasses the in-game keyboard and posts the text right
    /// away; the trailing `false` skips the notification sound. These are
    /// the three `/chatbox/input` arguments VRChat expects.
    pub fn send_chatbox(&self, text: &str, immediate: bool) -> Result<()> {
        self.send(
            "/chatbox/input",
            &[
                OscArg::Str(text.to_string()),
                OscArg::Bool(immediate),
                OscArg::Bool(false),
            ],
        )
    }

    /// Toggles the chatbox typing indicator
    pub fn send_typing(&self, active: bool) -> Result<()> {
        self.send("/chatbox/typing", &[OscArg::Bool(active)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    #[test]
    fn test_send_reaches_local_receiver() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let target = receiver.local_addr().unwrap();

        let sender = OscSender::new(target).unwrap();
        sender.send_chatbox("ping", true).unwrap();

        let mut buf = [0u8; 1024];
        let (n, _) = receiver.recv_from(&mut buf).unwrap();
        let (address, args) = decode(&buf[..n]).unwrap();
        assert_eq!(address, "/chatbox/input");
        assert_eq!(
            args,
            vec![
                OscArg::Str("ping".to_string()),
                OscArg::Bool(true),
                OscArg::Bool(false),
            ]
        );
    }

    #[test]
    fn test_typing_message_shape() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let sender = OscSender::new(receiver.local_addr().unwrap()).unwrap();
        sender.send_typing(false).unwrap();

        let mut buf = [0u8; 64];
        let (n, _) = receiver.recv_from(&mut buf).unwrap();
        let (address, args) = decode(&buf[..n]).unwrap();
        assert_eq!(address, "/chatbox/typing");
        assert_eq!(args, vec![OscArg::Bool(false)]);
    }
}
