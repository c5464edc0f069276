//! Integration tests: the protocol dispatcher end to end over the in-memory
//! provider.

pub mod discovery;
pub mod idp_replay;
pub mod resources;
