//! `retryable-http` wraps an async HTTP transport with bounded retry and a
//! fixed delay between attempts.
//!
//! - [`RetryingExecutor::execute`] sends a request until it is accepted or the
//!   attempt budget is spent, returning the final attempt either way.
//! - [`Builder`] validates the attempt budget, delay, transport and
//!   acceptability check before an executor exists.
//! - [`Transport`] is the seam: `reqwest::Client` implements it, and so does
//!   [`RetryingExecutor`] itself.

mod check;
mod error;
mod executor;
mod options;
mod transport;

pub use check::{default_check, AcceptabilityCheck, StatusRange};
pub use error::{ConfigError, ExecuteError, Failure, Rejection, TransportError};
pub use executor::{Builder, RetryingExecutor};
pub use options::RetryOptions;
pub use transport::{HttpResponse, Transport};

