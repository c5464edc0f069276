//! Resource provider implementations.
//!
//! [`InMemoryProvider`] is the bundled reference store. Production deployments
//! implement [`ResourceProvider`](crate::resource::ResourceProvider) over their own
//! directory and report failures as [`ProviderError`].

pub mod error;
pub mod in_memory;

pub use error::ProviderError;
pub use in_memory::InMemoryProvider;
