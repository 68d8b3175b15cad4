//! Transport seam between the cache and the instrumentation endpoint.
//!
//! `RemoteCache` only ever talks through `InstrumentationTransport`, so the
//! network edge can be swapped for a recording mock in tests.

use crate::error::TransportError;
use crate::wire::FunctionList;

/// GET/PUT of the wire body against a fully-formed URL.
///
/// Calls block until the server answers; no two requests are ever in
/// flight at once under the single-threaded driving loop.
pub trait InstrumentationTransport {
    /// Fetch the full current table.
    fn get(&self, url: &str) -> Result<FunctionList, TransportError>;

    /// Send the full desired table; returns the full resulting table as
    /// the server echoed it (the server is authoritative and may adjust
    /// values).
    fn put(&self, url: &str, body: &FunctionList) -> Result<FunctionList, TransportError>;
}

impl<T: InstrumentationTransport + ?Sized> InstrumentationTransport for std::rc::Rc<T> {
    fn get(&self, url: &str) -> Result<FunctionList, TransportError> {
        (**self).get(url)
    }

    fn put(&self, url: &str, body: &FunctionList) -> Result<FunctionList, TransportError> {
        (**self).put(url, body)
    }
}

/// Production transport over a blocking HTTP client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    fn decode(response: reqwest::blocking::Response) -> Result<FunctionList, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        response
            .json::<FunctionList>()
            .map_err(|err| TransportError::Request(err.to_string()))
    }
}

impl InstrumentationTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<FunctionList, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Self::decode(response)
    }

    fn put(&self, url: &str, body: &FunctionList) -> Result<FunctionList, TransportError> {
        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Self::decode(response)
    }
}
