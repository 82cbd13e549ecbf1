use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::{
    default_check, AcceptabilityCheck, ConfigError, ExecuteError, Failure, RetryOptions, Transport,
};

/// Transport decorator that retries a request a bounded number of times with
/// a fixed delay between attempts.
///
/// An attempt succeeds when the transport returns a response and the
/// acceptability check passes it. The first successful response is returned
/// immediately. Otherwise the final attempt's response and error are returned
/// once the attempt budget is spent.
pub struct RetryingExecutor<T: Transport> {
    transport: T,
    max_attempts: u32,
    delay: Duration,
    check: Arc<dyn AcceptabilityCheck<T::Response>>,
}

impl<T: Transport + Clone> Clone for RetryingExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            max_attempts: self.max_attempts,
            delay: self.delay,
            check: Arc::clone(&self.check),
        }
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for RetryingExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingExecutor")
            .field("transport", &self.transport)
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("check", &"<check>")
            .finish()
    }
}

impl RetryingExecutor<reqwest::Client> {
    /// Starts a builder around a fresh `reqwest::Client`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use retryable_http::RetryingExecutor;
    ///
    /// let executor = RetryingExecutor::builder()
    ///     .max_attempts(3)
    ///     .delay(Duration::from_millis(250))
    ///     .build()
    ///     .expect("valid retry configuration");
    /// ```
    pub fn builder() -> Builder<reqwest::Client> {
        Builder::new().transport(reqwest::Client::new())
    }
}

impl<T: Transport> RetryingExecutor<T> {
    /// Wraps `transport` with the default policy: one attempt, no delay and
    /// [`default_check`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
            check: Arc::new(default_check::<T::Response>),
        }
    }

    /// The wrapped transport, e.g. for building requests on a `reqwest::Client`.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Maximum transport invocations per [`execute`](Self::execute) call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fixed pause between consecutive attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sends `request` until an attempt is accepted or the budget runs out.
    ///
    /// The same request is handed to every attempt. A transport error skips
    /// the acceptability check and becomes that attempt's error.
    pub async fn execute(
        &self,
        request: &T::Request,
    ) -> Result<T::Response, Failure<T::Response, T::Error>> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let (response, error) = match self.transport.invoke(request).await {
                Ok(response) => match self.check.check(Some(&response)) {
                    Ok(()) => return Ok(response),
                    Err(rejection) => (Some(response), ExecuteError::Rejected(rejection)),
                },
                Err(err) => (None, ExecuteError::Transport(err)),
            };

            if attempt >= self.max_attempts {
                #[cfg(feature = "tracing")]
                tracing::debug!("request failed after {} attempt(s): {}", attempt, error);

                return Err(Failure::new(response, error, attempt));
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                "attempt {}/{} failed: {}; retrying after {} ms",
                attempt,
                self.max_attempts,
                error,
                self.delay.as_millis()
            );

            // Release the rejected response (and its connection) before waiting.
            drop(response);
            self.wait_before_retry().await;
        }
    }

    async fn wait_before_retry(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

impl<T: Transport> Transport for RetryingExecutor<T> {
    type Request = T::Request;
    type Response = T::Response;
    type Error = Failure<T::Response, T::Error>;

    fn invoke(
        &self,
        request: &Self::Request,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send {
        self.execute(request)
    }
}

const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Assembles a [`RetryingExecutor`], validating each setting as it is applied.
///
/// The first invalid setting is recorded and every later setter is ignored;
/// [`Builder::build`] then returns that error.
pub struct Builder<T: Transport> {
    transport: Option<T>,
    max_attempts: u32,
    delay: Duration,
    check: Arc<dyn AcceptabilityCheck<T::Response>>,
    error: Option<ConfigError>,
}

impl<T: Transport> Builder<T> {
    /// Default policy with no transport set yet.
    pub fn new() -> Self {
        Self {
            transport: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
            check: Arc::new(default_check::<T::Response>),
            error: None,
        }
    }

    /// Sets the wrapped transport. `None` fails with [`ConfigError::NilTransport`].
    pub fn transport<I>(mut self, transport: I) -> Self
    where
        I: Into<Option<T>>,
    {
        if self.error.is_some() {
            return self;
        }
        match transport.into() {
            Some(transport) => self.transport = Some(transport),
            None => self.error = Some(ConfigError::NilTransport),
        }
        self
    }

    /// Sets the maximum number of transport invocations per request.
    /// Zero fails with [`ConfigError::InvalidAttemptBudget`].
    pub fn max_attempts(self, max_attempts: u32) -> Self {
        self.attempt_budget(i64::from(max_attempts))
    }

    /// Sets the fixed pause between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        if self.error.is_none() {
            self.delay = delay;
        }
        self
    }

    /// Sets the pause between attempts in milliseconds.
    /// Negative values fail with [`ConfigError::InvalidDelay`].
    pub fn delay_ms(mut self, delay_ms: i64) -> Self {
        if self.error.is_some() {
            return self;
        }
        match u64::try_from(delay_ms) {
            Ok(ms) => self.delay = Duration::from_millis(ms),
            Err(_) => self.error = Some(ConfigError::InvalidDelay(delay_ms)),
        }
        self
    }

    /// Replaces [`default_check`]. `None` fails with
    /// [`ConfigError::NilAcceptabilityCheck`]; name the check type when passing
    /// it, as in `.check::<StatusRange, _>(None)`.
    ///
    /// Closures need an annotated parameter, e.g.
    /// `|res: Option<&reqwest::Response>| ...`.
    pub fn check<C, I>(mut self, check: I) -> Self
    where
        C: AcceptabilityCheck<T::Response> + 'static,
        I: Into<Option<C>>,
    {
        if self.error.is_some() {
            return self;
        }
        match check.into() {
            Some(check) => self.check = Arc::new(check),
            None => self.error = Some(ConfigError::NilAcceptabilityCheck),
        }
        self
    }

    /// Applies [`RetryOptions`]: attempt budget first, then delay.
    pub fn options(self, options: RetryOptions) -> Self {
        self.attempt_budget(options.max_attempts)
            .delay_ms(options.delay_ms)
    }

    /// Returns the first recorded setting error, or [`ConfigError::NilTransport`]
    /// when no transport was ever set.
    pub fn build(self) -> Result<RetryingExecutor<T>, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let transport = self.transport.ok_or(ConfigError::NilTransport)?;
        Ok(RetryingExecutor {
            transport,
            max_attempts: self.max_attempts,
            delay: self.delay,
            check: self.check,
        })
    }

    fn attempt_budget(mut self, max_attempts: i64) -> Self {
        if self.error.is_some() {
            return self;
        }
        match u32::try_from(max_attempts) {
            Ok(n) if n >= 1 => self.max_attempts = n,
            _ => self.error = Some(ConfigError::InvalidAttemptBudget(max_attempts)),
        }
        self
    }
}

impl<T: Transport> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("transport_set", &self.transport.is_some())
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("error", &self.error)
            .finish()
    }
}
