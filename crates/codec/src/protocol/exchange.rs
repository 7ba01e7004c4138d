//! A response paired with the request that produced it.

use crate::protocol::BodySource;
use http::{Request, Response};

/// A live response together with its originating request.
///
/// Response capture needs the request context twice: the reduced request
/// fragment is embedded into the snapshot, and response decoding interprets
/// the frame against the request method (a response to `HEAD` never carries
/// a body). The request side is optional so that responses observed without
/// their context can still be represented; encoding such an exchange fails
/// with [`EncodeError::MissingContext`].
///
/// [`EncodeError::MissingContext`]: crate::protocol::EncodeError::MissingContext
#[derive(Debug)]
pub struct Exchange {
    request: Option<Request<BodySource>>,
    response: Response<BodySource>,
}

impl Exchange {
    /// Pairs a response with its originating request.
    pub fn new(request: Request<BodySource>, response: Response<BodySource>) -> Self {
        Self { request: Some(request), response }
    }

    /// Wraps a response that has no request context attached.
    pub fn without_request(response: Response<BodySource>) -> Self {
        Self { request: None, response }
    }

    pub fn request(&self) -> Option<&Request<BodySource>> {
        self.request.as_ref()
    }

    pub fn request_mut(&mut self) -> Option<&mut Request<BodySource>> {
        self.request.as_mut()
    }

    pub fn response(&self) -> &Response<BodySource> {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response<BodySource> {
        &mut self.response
    }

    /// Splits the exchange back into its request and response halves.
    pub fn into_parts(self) -> (Option<Request<BodySource>>, Response<BodySource>) {
        (self.request, self.response)
    }
}

impl From<Response<BodySource>> for Exchange {
    fn from(response: Response<BodySource>) -> Self {
        Self::without_request(response)
    }
}
