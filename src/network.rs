use crate::error::Result;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use tracing::debug;

/// Public address used to pick the outbound interface. No packet is sent.
const PROBE_TARGET: &str = "8.8.8.8:80";

/// Address of the interface the device would use to reach the network
pub fn local_address() -> Result<IpAddr> {
    let target: SocketAddr = PROBE_TARGET
        .parse()
        .map_err(|e| crate::error::SmileBackError::system(format!("bad probe target: {}", e)))?;
    probe_address(target)
}

/// Local address the OS routes `target` through. Connecting a UDP socket only
/// selects a route.
pub fn probe_address(target: SocketAddr) -> Result<IpAddr> {
    let bind: SocketAddr = match target {
        SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
        SocketAddr::V6(_) => ([0u16; 8], 0).into(),
    };

    let socket = UdpSocket::bind(bind)?;
    socket.connect(target)?;
    let address = socket.local_addr()?.ip();

    debug!("Route to {} uses local address {}", target, address);
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_route_uses_loopback_address() {
        let address = probe_address("127.0.0.1:9".parse().unwrap()).unwrap();
        assert!(address.is_loopback());
    }
}
