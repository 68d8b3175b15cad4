//! Error taxonomy for cache and transport operations.

/// Failure at the transport layer: the request never completed, or the
/// server answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned status {0}")]
    Status(u16),
}

/// Failure of a `RemoteCache` operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Port outside the valid TCP range.
    #[error("port {0} is outside 0-65535")]
    InvalidPort(i64),
    /// Cache operation attempted without an open session.
    #[error("not connected to an instrumentation server")]
    NotConnected,
    /// Write referenced a name absent from the mirror; nothing was applied.
    #[error("function {0:?} is not in the function table")]
    UnknownFunction(String),
    /// Transport failure on connect/refresh/write; the mirror keeps its
    /// pre-call value.
    #[error("instrumentation request failed: {0}")]
    Connection(#[from] TransportError),
}
