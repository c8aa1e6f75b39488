//! Inbound OSC listener
//!
//! Receives datagrams on a dedicated thread, decodes them, and forwards
//! every valid message to a channel. The receive call uses a short timeout
//! so a stop request is observed within one poll interval; malformed
//! packets are logged at debug level and dropped.

use crate::codec::{decode, OscArg};
use crate::error::Result;
use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on how long a stop request can go unobserved
const POLL_TIMEOUT: Duration = Duration::from_millis(500);

/// A decoded inbound OSC message with its receive timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub address: String,
    pub args: Vec<OscArg>,
    pub received_at: DateTime<Utc>,
}

/// Handle to a running inbound listener.
///
/// Dropping the handle requests a stop; [`OscListener::stop`] additionally
/// waits for the receive thread to exit.
pub struct OscListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    port: u16,
}

impl OscListener {
    /// Binds `0.0.0.0:port` and starts the receive loop.
    ///
    /// Every successfully decoded packet is sent to `sink`; the loop also
    /// ends on its own if the receiving side of `sink` is dropped. A bind
    /// failure is returned immediately and no thread is started.
    pub fn start(port: u16, sink: Sender<InboundMessage>) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_read_timeout(Some(POLL_TIMEOUT))?;

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; 8192];
            loop {
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                match socket.recv_from(&mut buf) {
                    Ok((n, src)) => match decode(&buf[..n]) {
                        Ok((address, args)) => {
                            let msg = InboundMessage {
                                address,
                                args,
                                received_at: Utc::now(),
                            };
                            if sink.send(msg).is_err() {
                                // Nobody is listening anymore
                                break;
                            }
                        }
                        Err(e) => debug!(%src, "Dropping malformed OSC packet: {}", e),
                    },
                    Err(e)
                        if e.kind() == std::io::ErrorKind::WouldBlock
                            || e.kind() == std::io::ErrorKind::TimedOut =>
                    {
                        // Timeout, loop around to check the stop flag
                        continue;
                    }
                    Err(e) => {
                        warn!("❌ OSC receive error: {}", e);
                    }
                }
            }
            info!("OSC listener on port {} stopped", port);
        });

        info!("✅ OSC listener started on port {}", port);
        Ok(Self {
            stop,
            handle: Some(handle),
            port,
        })
    }

    /// Port the listener is bound to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Requests a stop and waits for the receive thread to exit.
    ///
    /// Returns within roughly one poll timeout.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for OscListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crossbeam_channel::unbounded;

    fn free_udp_port() -> u16 {
        // Bind port 0, read back the assigned port, release it
        UdpSocket::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[test]
    fn test_listener_forwards_decoded_packets() {
        let port = free_udp_port();
        let (tx, rx) = unbounded();
        let listener = OscListener::start(port, tx).unwrap();

        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        let msg = encode("/avatar/parameters/mute", &[OscArg::Bool(true)]);
        sock.send_to(&msg, ("127.0.0.1", port)).unwrap();

        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received.address, "/avatar/parameters/mute");
        assert_eq!(received.args, vec![OscArg::Bool(true)]);

        listener.stop();
    }

    #[test]
    fn test_listener_drops_malformed_packets() {
        let port = free_udp_port();
        let (tx, rx) = unbounded();
        let listener = OscListener::start(port, tx).unwrap();

        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        sock.send_to(b"\xff\xfe not osc", ("127.0.0.1", port)).unwrap();
        sock.send_to(&encode("/ok", &[]), ("127.0.0.1", port)).unwrap();

        // Only the valid packet comes through
        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(received.address, "/ok");
        assert!(rx.try_recv().is_err());

        listener.stop();
    }

    #[test]
    fn test_bind_conflict_reports_error() {
        let port = free_udp_port();
        let (tx, _rx) = unbounded();
        let first = OscListener::start(port, tx.clone());
        assert!(first.is_ok());
        // Second bind on the same port must fail without spawning a loop
        assert!(OscListener::start(port, tx).is_err());
        first.unwrap().stop();
    }
}
