use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::EndpointError;
use crate::validation::host::HostKind;
use crate::validation::port::PortCandidate;

/// A validated `host:port` pair.
///
/// `host` never carries IPv6 brackets. Formatting an endpoint adds them back, so
/// `parse_host_port(s)?.to_string() == s` for canonical inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
    kind: HostKind,
}

impl Endpoint {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_ipv6(&self) -> bool {
        self.kind == HostKind::Ipv6
    }

    pub fn into_parts(self) -> (String, u16) {
        (self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_host_port(s)
    }
}

/// Split `input` into a validated host and port.
///
/// IPv6 hosts must be bracketed (`[fe80::1]:8080`). Every other host is split off
/// at the last colon and must be an IPv4 literal, a short hostname or an FQDN.
pub fn parse_host_port(input: &str) -> Result<Endpoint, EndpointError> {
    let invalid = |reason: &'static str| {
        debug!(input, reason, "Rejected endpoint");
        EndpointError::InvalidEndpoint(input.to_string())
    };

    let (host, port, bracketed) = if let Some(rest) = input.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| invalid("unmatched bracket"))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| invalid("missing port after bracketed host"))?;
        (host, port, true)
    } else {
        let (host, port) = input
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port"))?;
        if host.contains(':') {
            return Err(invalid("unbracketed IPv6 literal"));
        }
        (host, port, false)
    };

    if host.is_empty() {
        return Err(invalid("empty host"));
    }

    let port = port.to_port().ok_or_else(|| invalid("invalid port"))?;

    let kind = HostKind::classify(host).ok_or_else(|| invalid("invalid host"))?;
    if bracketed != (kind == HostKind::Ipv6) {
        return Err(invalid("brackets are only allowed around IPv6 literals"));
    }

    Ok(Endpoint {
        host: host.to_string(),
        port,
        kind,
    })
}
