//! Client-side mirror of the server's function table.
//!
//! Every successful round trip replaces the whole mirror with the server's
//! response (full-resync). The mirror is therefore never more stale than
//! the last successful request, at the cost of re-transmitting tables that
//! are at most a few thousand entries.

use nopctl_core::FunctionTable;

use crate::error::ClientError;
use crate::transport::{HttpTransport, InstrumentationTransport};
use crate::wire::FunctionList;

fn endpoint_url(port: i64) -> String {
    format!("http://127.0.0.1:{port}/instrumentation")
}

/// Remote-state cache over one instrumentation endpoint.
///
/// Disconnected until `connect` succeeds; `read`, `refresh`, and `write`
/// all require an open session.
pub struct RemoteCache {
    transport: Box<dyn InstrumentationTransport>,
    url: Option<String>,
    mirror: FunctionTable,
}

impl Default for RemoteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(Box::new(HttpTransport::new()))
    }

    #[must_use]
    pub fn with_transport(transport: Box<dyn InstrumentationTransport>) -> Self {
        Self {
            transport,
            url: None,
            mirror: FunctionTable::new(),
        }
    }

    /// Open a session against `127.0.0.1:<port>` and perform the initial
    /// full fetch. Any prior session is closed first. A failed fetch tears
    /// the new session down again.
    pub fn connect(&mut self, port: i64) -> Result<(), ClientError> {
        if !(0..=65535).contains(&port) {
            return Err(ClientError::InvalidPort(port));
        }
        self.disconnect();
        self.url = Some(endpoint_url(port));
        if let Err(err) = self.refresh() {
            self.disconnect();
            return Err(err);
        }
        Ok(())
    }

    /// Release the session and clear the mirror. No-op when already
    /// disconnected.
    pub fn disconnect(&mut self) {
        self.url = None;
        self.mirror.clear();
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.url.is_some()
    }

    /// Re-fetch the full table from the server, replacing the mirror
    /// wholesale. The mirror keeps its pre-call value on failure.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        let url = self.url.as_deref().ok_or(ClientError::NotConnected)?;
        let list = self.transport.get(url)?;
        self.mirror = list.into_table();
        Ok(())
    }

    /// Read-only view of the mirror.
    pub fn read(&self) -> Result<&FunctionTable, ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        Ok(&self.mirror)
    }

    /// Apply `partial` on top of the mirror and push the entire resulting
    /// table to the server.
    ///
    /// Every key of `partial` is validated against the mirror before
    /// anything is applied; an unknown name fails the whole call with the
    /// mirror untouched. On success the mirror is replaced with whatever
    /// table the server echoed back. On a transport failure the mirror
    /// also keeps its pre-call value, though the server may by then be
    /// ahead of it if the write was partially applied before the response
    /// was lost (documented limitation of the protocol).
    pub fn write(&mut self, partial: &FunctionTable) -> Result<(), ClientError> {
        let url = self.url.as_deref().ok_or(ClientError::NotConnected)?;
        for name in partial.keys() {
            if !self.mirror.contains_key(name) {
                return Err(ClientError::UnknownFunction(name.clone()));
            }
        }

        let mut desired = self.mirror.clone();
        for (name, active) in partial {
            desired.insert(name.clone(), *active);
        }
        let echoed = self.transport.put(url, &FunctionList::from_table(&desired))?;
        self.mirror = echoed.into_table();
        Ok(())
    }
}
