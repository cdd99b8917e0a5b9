use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::protocol::ARTNET_PORT;

/// Unroutable documentation address used to ask the OS for its outbound
/// interface; nothing is sent to it.
const ROUTE_TARGET: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);

/// Subnet-directed broadcast address (`ip | !netmask`).
///
/// ```
/// use std::net::Ipv4Addr;
/// use artstrip::net::subnet_broadcast;
///
/// assert_eq!(
///     Ipv4Addr::new(192, 168, 1, 255),
///     subnet_broadcast(Ipv4Addr::new(192, 168, 1, 50), Ipv4Addr::new(255, 255, 255, 0)),
/// );
/// ```
#[must_use]
pub fn subnet_broadcast(ip: Ipv4Addr, netmask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) | !u32::from(netmask))
}

/// Address poll replies are broadcast to.
///
/// An explicit broadcast wins; otherwise the subnet broadcast is derived from
/// `ip` and `netmask`; otherwise the limited broadcast address is used.
#[must_use]
pub fn reply_destination(
    broadcast: Option<Ipv4Addr>,
    ip: Option<Ipv4Addr>,
    netmask: Option<Ipv4Addr>,
) -> SocketAddr {
    let address = match (broadcast, ip, netmask) {
        (Some(broadcast), _, _) => broadcast,
        (None, Some(ip), Some(netmask)) => subnet_broadcast(ip, netmask),
        _ => Ipv4Addr::BROADCAST,
    };
    SocketAddr::from((address, ARTNET_PORT))
}

/// Best-effort local IPv4 address of the default route.
///
/// Falls back to `0.0.0.0` when the host has no route.
pub async fn detect_local_ipv4() -> Ipv4Addr {
    let lookup = async {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.connect((ROUTE_TARGET, ARTNET_PORT)).await?;
        Ok::<_, std::io::Error>(socket.local_addr()?)
    };

    match lookup.await {
        Ok(SocketAddr::V4(local)) => {
            debug!(ip = %local.ip(), "detected local address");
            *local.ip()
        }
        Ok(SocketAddr::V6(_)) => Ipv4Addr::UNSPECIFIED,
        Err(error) => {
            warn!(%error, "could not detect local address; reporting 0.0.0.0");
            Ipv4Addr::UNSPECIFIED
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::slash_24([192, 168, 1, 100], [255, 255, 255, 0], [192, 168, 1, 255])]
    #[case::slash_16([10, 0, 5, 42], [255, 255, 0, 0], [10, 0, 255, 255])]
    #[case::slash_30([172, 16, 0, 1], [255, 255, 255, 252], [172, 16, 0, 3])]
    fn subnet_broadcast_sets_host_bits(
        #[case] ip: [u8; 4],
        #[case] netmask: [u8; 4],
        #[case] expected: [u8; 4],
    ) {
        assert_eq!(
            Ipv4Addr::from(expected),
            subnet_broadcast(Ipv4Addr::from(ip), Ipv4Addr::from(netmask))
        );
    }

    #[test]
    fn reply_destination_prefers_explicit_broadcast() {
        let destination = reply_destination(
            Some(Ipv4Addr::new(2, 255, 255, 255)),
            Some(Ipv4Addr::new(192, 168, 1, 1)),
            Some(Ipv4Addr::new(255, 255, 255, 0)),
        );

        assert_eq!(
            SocketAddr::from((Ipv4Addr::new(2, 255, 255, 255), 6454)),
            destination
        );
    }

    #[test]
    fn reply_destination_defaults_to_limited_broadcast() {
        assert_eq!(
            SocketAddr::from((Ipv4Addr::BROADCAST, 6454)),
            reply_destination(None, Some(Ipv4Addr::new(10, 0, 0, 2)), None)
        );
    }
}
