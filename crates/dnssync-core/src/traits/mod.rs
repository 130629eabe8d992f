//! Collaborator traits for the DNS sync engine
//!
//! - [`DnsProvider`]: List and write records through a provider API
//! - [`ChangeSource`]: Report changed files and their contents from version control

pub mod change_source;
pub mod dns_provider;

pub use change_source::ChangeSource;
pub use dns_provider::DnsProvider;
