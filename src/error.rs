use std::fmt;

/// Configuration error returned by [`Builder::build`](crate::Builder::build).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No transport was supplied.
    #[error("transport is not set")]
    NilTransport,
    /// Attempt budget below one.
    #[error("attempt budget must be at least 1, got {0}")]
    InvalidAttemptBudget(i64),
    /// Negative inter-attempt delay.
    #[error("delay must not be negative, got {0} ms")]
    InvalidDelay(i64),
    /// No acceptability check was supplied.
    #[error("acceptability check is not set")]
    NilAcceptabilityCheck,
}

/// Reason an acceptability check rejected an attempt.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// The attempt produced no response to inspect.
    #[error("response is absent")]
    NilResponse,
    /// Status code outside the accepted range.
    #[error("unsuccessful status code {0}")]
    UnsuccessfulStatusCode(u16),
    /// Condition defined by a caller-supplied check.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Rejection {
    /// Wraps any error as a [`Rejection::Custom`].
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Custom(err.into())
    }
}

/// Error observed on a single attempt.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError<E> {
    /// The transport failed before producing a response.
    #[error("transport error: {0}")]
    Transport(#[source] E),
    /// The response did not pass the acceptability check.
    #[error("response rejected: {0}")]
    Rejected(#[source] Rejection),
}

impl<E> ExecuteError<E> {
    /// True when the transport failed before producing a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True when the acceptability check rejected a response.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Outcome of the final attempt when no attempt succeeded.
///
/// Holds the final attempt's response (absent when the transport failed) next
/// to the error that attempt produced, so callers can still read a final status
/// code or error body.
pub struct Failure<R, E> {
    response: Option<R>,
    error: ExecuteError<E>,
    attempts: u32,
}

impl<R, E> Failure<R, E> {
    pub(crate) fn new(response: Option<R>, error: ExecuteError<E>, attempts: u32) -> Self {
        Self {
            response,
            error,
            attempts,
        }
    }

    /// Response of the final attempt, if the transport produced one.
    pub fn response(&self) -> Option<&R> {
        self.response.as_ref()
    }

    /// Error of the final attempt.
    pub fn error(&self) -> &ExecuteError<E> {
        &self.error
    }

    /// Number of transport invocations made.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Takes the final response, e.g. to read its error body.
    pub fn into_response(self) -> Option<R> {
        self.response
    }

    /// Takes the final error, dropping any response.
    pub fn into_error(self) -> ExecuteError<E> {
        self.error
    }

    /// Splits into the final response and error.
    pub fn into_parts(self) -> (Option<R>, ExecuteError<E>) {
        (self.response, self.error)
    }
}

impl<R, E: fmt::Debug> fmt::Debug for Failure<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("response", &self.response.as_ref().map(|_| "<response>"))
            .field("error", &self.error)
            .field("attempts", &self.attempts)
            .finish()
    }
}

impl<R, E: fmt::Display> fmt::Display for Failure<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed after {} attempt(s): ", self.attempts)?;
        fmt::Display::fmt(&self.error, f)
    }
}

impl<R, E> std::error::Error for Failure<R, E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Error from the built-in `reqwest::Client` transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Network or request execution error from `reqwest`.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    /// The request body is a stream and cannot be replayed for an attempt.
    #[error("request body cannot be cloned for another attempt")]
    UnclonableRequest,
}

#[cfg(test)]
mod tests {
    use super::{ExecuteError, Failure, Rejection};

    #[derive(Debug, thiserror::Error)]
    #[error("socket closed")]
    struct SocketClosed;

    #[test]
    fn failure_debug_hides_response_value() {
        let failure: Failure<&str, SocketClosed> = Failure::new(
            Some("secret body"),
            ExecuteError::Rejected(Rejection::UnsuccessfulStatusCode(503)),
            3,
        );
        let debug = format!("{failure:?}");
        assert!(debug.contains("<response>"));
        assert!(!debug.contains("secret body"));
    }

    #[test]
    fn failure_display_names_final_error() {
        let failure: Failure<(), SocketClosed> =
            Failure::new(None, ExecuteError::Transport(SocketClosed), 2);
        assert_eq!(
            failure.to_string(),
            "request failed after 2 attempt(s): transport error: socket closed"
        );
    }

    #[test]
    fn custom_rejection_displays_inner_message() {
        let rejection = Rejection::custom("missing etag");
        assert_eq!(rejection.to_string(), "missing etag");
    }
}
