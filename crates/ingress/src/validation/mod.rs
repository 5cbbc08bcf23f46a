//! Validation of caller-supplied addresses.
//!
//! [`parse_host_port`] is the entry point for `host:port` strings; the host
//! predicates are exposed on their own for callers that only hold a host.

mod endpoint;
mod host;
mod identifier;
mod port;

pub use endpoint::{Endpoint, parse_host_port};
pub use host::{MAX_FQDN_LENGTH, is_valid_fqdn, is_valid_hostname, is_valid_ipv4, is_valid_ipv6};
pub use identifier::is_uuid_like;
pub use port::{PortCandidate, is_valid_port};
