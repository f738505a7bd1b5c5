//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions, in-memory store)
//!
//! Handlers then pull the visitor's store out of the session with the
//! [`ViewStore`] extractor.

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod view_store;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use view_store::ViewStore;
