//! Mock implementations for testing
//!
//! Hand-written doubles for the transport and authentication seams so that
//! services can be exercised without HTTP calls. Responses are replayed in
//! the order they were queued.

mod mock_auth;
mod mock_transport;

pub use mock_auth::MockAuthManager;
pub use mock_transport::{MockHttpTransport, MockRequest};
