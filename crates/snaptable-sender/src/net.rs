//! Local address discovery

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Outbound IP address of this machine, or `127.0.0.1` if none
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// interface that would route to a public address.
pub fn local_ip_address() -> IpAddr {
    outbound_ip().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn outbound_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}
