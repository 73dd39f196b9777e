//! Wire-format structs and loaders for the three external input files named
//! in `spec.md` §6: the config JSON, the network JSON and the requests CSV.
//! Kept separate from the domain types in `crate::network`/`crate::request`,
//! matching the source's wire/domain split (`json_serialisation` module).

pub mod config_file;
pub mod network_file;
pub mod requests_file;

pub use config_file::load_config;
pub use network_file::load_network;
pub use requests_file::load_requests;
