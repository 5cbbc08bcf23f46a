//! Endpoint validation and bounded streaming for network services.
//!
//! Two independent pieces live here:
//!
//! - [`validation`]: strict parsing of caller-supplied `host:port` strings and
//!   the host/port predicates it is built from.
//! - [`streaming`]: readers that yield between chunks and enforce a byte budget
//!   while large bodies are moved to disk or the network.

pub mod config;
pub mod error;
pub mod streaming;
pub mod validation;

pub use error::{EndpointError, StreamError};
pub use streaming::{ChunkSource, CooperativeReader, IterSource, LimitingReader, ReadSource};
pub use validation::{Endpoint, parse_host_port};
