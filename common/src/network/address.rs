//! # Announced Addresses
//!
//! An [`InterfaceAddress`] pairs an interface name with a way of obtaining the
//! IP literal to announce on it. Two flavours exist:
//! * [`SimpleInterfaceAddress`]: the IP is known up front.
//! * [`ResolvingInterfaceAddress`]: the IP is looked up through an [`IpResolver`]
//!   every time it is asked for, so late DHCP leases are picked up between passes.
//!
//! [`AddressSpec`] is the textual form accepted on the command line.

use std::net::IpAddr;
use std::str::FromStr;

use crate::error::ResolveError;

pub trait InterfaceAddress {
    fn interface_name(&self) -> &str;
    fn ip(&self) -> Result<String, ResolveError>;
}

impl<T: InterfaceAddress + ?Sized> InterfaceAddress for Box<T> {
    fn interface_name(&self) -> &str {
        (**self).interface_name()
    }

    fn ip(&self) -> Result<String, ResolveError> {
        (**self).ip()
    }
}

impl<T: InterfaceAddress + ?Sized> InterfaceAddress for &T {
    fn interface_name(&self) -> &str {
        (**self).interface_name()
    }

    fn ip(&self) -> Result<String, ResolveError> {
        (**self).ip()
    }
}

/// Looks up the current address of a named interface.
pub trait IpResolver {
    fn resolve(&self, interface_name: &str) -> Result<IpAddr, ResolveError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleInterfaceAddress {
    interface_name: String,
    ip: String,
}

impl SimpleInterfaceAddress {
    pub fn new(interface_name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            interface_name: interface_name.into(),
            ip: ip.into(),
        }
    }
}

impl InterfaceAddress for SimpleInterfaceAddress {
    fn interface_name(&self) -> &str {
        &self.interface_name
    }

    fn ip(&self) -> Result<String, ResolveError> {
        Ok(self.ip.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ResolvingInterfaceAddress<R> {
    interface_name: String,
    resolver: R,
}

impl<R: IpResolver> ResolvingInterfaceAddress<R> {
    pub fn new(interface_name: impl Into<String>, resolver: R) -> Self {
        Self {
            interface_name: interface_name.into(),
            resolver,
        }
    }
}

impl<R: IpResolver> InterfaceAddress for ResolvingInterfaceAddress<R> {
    fn interface_name(&self) -> &str {
        &self.interface_name
    }

    fn ip(&self) -> Result<String, ResolveError> {
        self.resolver
            .resolve(&self.interface_name)
            .map(|ip| ip.to_string())
    }
}

/// An address as written by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    /// Announce whatever IPv4 address the interface currently holds.
    Resolve { interface: String },
    /// Announce a fixed IP on the interface.
    Fixed { interface: String, ip: IpAddr },
}

impl AddressSpec {
    pub fn interface(&self) -> &str {
        match self {
            AddressSpec::Resolve { interface } | AddressSpec::Fixed { interface, .. } => interface,
        }
    }

    /// Turns the spec into an address, using `resolver` for [`AddressSpec::Resolve`].
    pub fn into_address<R>(self, resolver: R) -> Box<dyn InterfaceAddress>
    where
        R: IpResolver + 'static,
    {
        match self {
            AddressSpec::Resolve { interface } => {
                Box::new(ResolvingInterfaceAddress::new(interface, resolver))
            }
            AddressSpec::Fixed { interface, ip } => {
                Box::new(SimpleInterfaceAddress::new(interface, ip.to_string()))
            }
        }
    }
}

impl FromStr for AddressSpec {
    type Err = ResolveError;

    /// Parses a string into an `AddressSpec`.
    ///
    /// Supported formats:
    /// * **Interface**: "eth0", the IP is resolved at broadcast time.
    /// * **Interface and IP**: "eth0=10.0.0.5".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, ip) = match s.split_once('=') {
            Some((name, ip)) => (name.trim(), Some(ip.trim())),
            None => (s.trim(), None),
        };

        validate_interface_name(name)?;
        let interface = name.to_string();

        match ip {
            None => Ok(AddressSpec::Resolve { interface }),
            Some(ip) => {
                let ip = ip
                    .parse::<IpAddr>()
                    .map_err(|_| ResolveError::Invalid(format!("bad IP for {interface}: '{ip}'")))?;
                Ok(AddressSpec::Fixed { interface, ip })
            }
        }
    }
}

fn validate_interface_name(name: &str) -> Result<(), ResolveError> {
    if name.is_empty() {
        return Err(ResolveError::Invalid("empty interface name".to_string()));
    }
    // Names become a path component below the sysfs root.
    if name.contains('/') || name == "." || name == ".." {
        return Err(ResolveError::Invalid(format!("interface name '{name}'")));
    }
    Ok(())
}
