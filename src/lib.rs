//! Resolve domains over DNS-over-HTTPS and pick the fastest reachable IP.
//!
//! Domains are resolved through a primary DoH provider, with a secondary
//! provider retried only for the domains the primary could not serve.
//! Candidate IPs are ranked by TCP connect latency, and the winners are
//! rendered as hosts-file lines grouped by CDN membership.

pub mod cdn;
pub mod cli;
pub mod dns;
pub mod domains;
pub mod error;
pub mod output;
pub mod probe;
pub mod provider;
pub mod resolve;
pub mod select;
pub mod transport;

pub use cdn::CdnRanges;
pub use error::SolveError;
pub use resolve::{dns_solve, Resolver};
pub use transport::{Provider, ResolutionRecord, SolveConfig};
