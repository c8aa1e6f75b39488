use get_if_addrs::get_if_addrs;
use std::collections::HashMap;
use std::net::UdpSocket;

/// Guess the local IP address used for outbound traffic.
///
/// Binds a UDP socket and "connects" it towards a public DNS server, then
/// reads back the local address the OS picked for that route. UDP connect
/// never sends a packet; it only asks the kernel which interface would be
/// used.
///
/// Falls back to `127.0.0.1` if any step fails (no network, no route).
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// List the non-loopback IPv4 addresses of every network interface.
///
/// Returns a map of interface name to its addresses. IPv6 and loopback
/// addresses are skipped. An empty map means the interface enumeration
/// failed or the machine has no usable address.
pub fn local_addresses() -> HashMap<String, Vec<String>> {
    let mut result = HashMap::new();

    if let Ok(interfaces) = get_if_addrs() {
        for iface in interfaces {
            let ip = iface.ip();
            if ip.is_loopback() || !ip.is_ipv4() {
                continue;
            }
            result
                .entry(iface.name)
                .or_insert_with(Vec::new)
                .push(ip.to_string());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[test]
    fn test_guess_local_ip_is_parsable() {
        let ip = guess_local_ip();
        assert!(ip.parse::<IpAddr>().is_ok());
    }

    #[test]
    fn test_local_addresses_excludes_loopback() {
        for addrs in local_addresses().values() {
            for addr in addrs {
                let ip: IpAddr = addr.parse().expect("interface address should parse");
                assert!(!ip.is_loopback());
            }
        }
    }
}
