//! Syntactic host predicates.
//!
//! None of these resolve anything; they only check that a string has the shape of
//! an address literal or a DNS name. All of them return `false` for invalid input
//! instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv6Addr;

/// Maximum length of a fully-qualified domain name.
pub const MAX_FQDN_LENGTH: usize = 255;

/// A single DNS label: alphanumerics with internal hyphens, 1 to 63 characters.
static LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("label pattern is valid")
});

/// Top-level labels are letters only.
static TOP_LEVEL_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{1,63}$").expect("top-level label pattern is valid"));

/// Classification of a host candidate, in the order the parser tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum HostKind {
    Ipv4,
    Ipv6,
    ShortHostname,
    Fqdn,
}

impl HostKind {
    /// Returns the first kind `host` satisfies, or `None` if it is not a host at all.
    pub(crate) fn classify(host: &str) -> Option<HostKind> {
        if is_valid_ipv4(host) {
            Some(HostKind::Ipv4)
        } else if is_valid_ipv6(host) {
            Some(HostKind::Ipv6)
        } else if is_valid_hostname(host) {
            Some(HostKind::ShortHostname)
        } else if is_valid_fqdn(host) {
            Some(HostKind::Fqdn)
        } else {
            None
        }
    }
}

/// Dotted-quad IPv4 check.
///
/// Unlike [`std::net::Ipv4Addr`]'s parser this accepts leading zeros in a group
/// (`010.1.1.1`), only the numeric range of each group matters.
pub fn is_valid_ipv4(s: &str) -> bool {
    let mut groups = 0;
    for group in s.split('.') {
        groups += 1;
        if groups > 4
            || group.is_empty()
            || group.len() > 3
            || !group.bytes().all(|b| b.is_ascii_digit())
        {
            return false;
        }
        match group.parse::<u16>() {
            Ok(value) if value <= 255 => {}
            _ => return false,
        }
    }
    groups == 4
}

/// IPv6 literal check, without brackets.
pub fn is_valid_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// A short, single-label hostname such as `localhost`.
pub fn is_valid_hostname(s: &str) -> bool {
    LABEL.is_match(s)
}

/// A dotted name of at least two labels whose last label is alphabetic.
pub fn is_valid_fqdn(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_FQDN_LENGTH {
        return false;
    }

    let Some((rest, tld)) = s.rsplit_once('.') else {
        return false;
    };

    TOP_LEVEL_LABEL.is_match(tld) && rest.split('.').all(|label| LABEL.is_match(label))
}
