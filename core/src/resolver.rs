use std::net::{IpAddr, Ipv4Addr};

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

use garp_common::error::ResolveError;
use garp_common::network::address::IpResolver;

trait NetworkInterfaceExtension {
    fn first_ipv4(&self) -> Option<Ipv4Addr>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn first_ipv4(&self) -> Option<Ipv4Addr> {
        self.ips.iter().find_map(|ip| match ip {
            IpNetwork::V4(ipv4) => Some(ipv4.ip()),
            IpNetwork::V6(_) => None,
        })
    }
}

/// Resolves an interface's current IPv4 address from the kernel's interface list.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnetIpResolver;

impl IpResolver for PnetIpResolver {
    fn resolve(&self, interface_name: &str) -> Result<IpAddr, ResolveError> {
        find_ipv4(&datalink::interfaces(), interface_name)
    }
}

fn find_ipv4(interfaces: &[NetworkInterface], name: &str) -> Result<IpAddr, ResolveError> {
    let interface = interfaces
        .iter()
        .find(|interface| interface.name == name)
        .ok_or_else(|| ResolveError::InterfaceNotFound(name.to_string()))?;

    interface
        .first_ipv4()
        .map(IpAddr::V4)
        .ok_or_else(|| ResolveError::NoIpv4Address(name.to_string()))
}
