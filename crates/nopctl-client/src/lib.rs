//! nopctl-client: remote-state cache for the instrumentation endpoint.
//!
//! Owns the client-side mirror of the server's function table and the
//! read/refresh/write cycles that keep it consistent. The HTTP transport
//! sits behind the `InstrumentationTransport` trait so tests (and other
//! drivers) can substitute a recording mock.

pub mod cache;
pub mod error;
pub mod mock;
pub mod transport;
pub mod wire;

pub use cache::RemoteCache;
pub use error::{ClientError, TransportError};
pub use mock::{RecordingTransport, TransportCall};
pub use transport::{HttpTransport, InstrumentationTransport};
pub use wire::{FunctionEntry, FunctionList};

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "nopctl-client"
}
