//! Recording transport for unit tests.
//!
//! Captures every request and replays pre-scripted responses in order.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::transport::InstrumentationTransport;
use crate::wire::FunctionList;

/// A recorded call to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Get { url: String },
    Put { url: String, body: FunctionList },
}

/// Mock implementation of `InstrumentationTransport`.
///
/// Responses are consumed front-to-back; once the script runs out, every
/// further call fails with a transport error.
#[derive(Default)]
pub struct RecordingTransport {
    calls: RefCell<Vec<TransportCall>>,
    responses: RefCell<VecDeque<Result<FunctionList, TransportError>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    #[must_use]
    pub fn with_response(self, list: FunctionList) -> Self {
        self.responses.borrow_mut().push_back(Ok(list));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn with_error(self, err: TransportError) -> Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    /// All recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn next_response(&self) -> Result<FunctionList, TransportError> {
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response".to_owned())))
    }
}

impl InstrumentationTransport for RecordingTransport {
    fn get(&self, url: &str) -> Result<FunctionList, TransportError> {
        self.calls.borrow_mut().push(TransportCall::Get {
            url: url.to_owned(),
        });
        self.next_response()
    }

    fn put(&self, url: &str, body: &FunctionList) -> Result<FunctionList, TransportError> {
        self.calls.borrow_mut().push(TransportCall::Put {
            url: url.to_owned(),
            body: body.clone(),
        });
        self.next_response()
    }
}
