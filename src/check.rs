use std::ops::RangeInclusive;

use crate::{HttpResponse, Rejection};

/// Decides whether a response (or its absence) counts as a successful attempt.
///
/// Implemented for every `Fn(Option<&R>) -> Result<(), Rejection>` closure or
/// function that is `Send + Sync`.
pub trait AcceptabilityCheck<R>: Send + Sync {
    /// `Ok(())` accepts the attempt; any [`Rejection`] triggers a retry.
    fn check(&self, response: Option<&R>) -> Result<(), Rejection>;
}

impl<R, F> AcceptabilityCheck<R> for F
where
    F: Fn(Option<&R>) -> Result<(), Rejection> + Send + Sync,
{
    fn check(&self, response: Option<&R>) -> Result<(), Rejection> {
        self(response)
    }
}

/// Accepts any response whose status code lies in `200..=299`.
pub fn default_check<R: HttpResponse>(response: Option<&R>) -> Result<(), Rejection> {
    StatusRange::SUCCESS.check(response)
}

/// Accepts responses whose status code lies in an inclusive range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusRange {
    range: RangeInclusive<u16>,
}

impl StatusRange {
    /// The `2xx` range used by [`default_check`].
    pub const SUCCESS: StatusRange = StatusRange { range: 200..=299 };

    /// Accepts any status code in `range`, bounds included.
    pub fn new(range: RangeInclusive<u16>) -> Self {
        Self { range }
    }

    /// Accepts exactly one status code.
    pub fn only(code: u16) -> Self {
        Self::new(code..=code)
    }
}

impl<R: HttpResponse> AcceptabilityCheck<R> for StatusRange {
    fn check(&self, response: Option<&R>) -> Result<(), Rejection> {
        let response = response.ok_or(Rejection::NilResponse)?;
        let code = response.status_code();
        if !self.range.contains(&code) {
            return Err(Rejection::UnsuccessfulStatusCode(code));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{default_check, AcceptabilityCheck, StatusRange};
    use crate::{HttpResponse, Rejection};

    struct Status(u16);

    impl HttpResponse for Status {
        fn status_code(&self) -> u16 {
            self.0
        }
    }

    #[test]
    fn default_check_rejects_missing_response() {
        let result = default_check::<Status>(None);
        assert!(matches!(result, Err(Rejection::NilResponse)));
    }

    #[test]
    fn default_check_accepts_2xx_bounds() {
        for code in [200, 204, 299] {
            assert!(default_check(Some(&Status(code))).is_ok(), "code {code}");
        }
    }

    #[test]
    fn default_check_rejects_codes_outside_2xx() {
        for code in [100, 199, 300, 404, 503] {
            match default_check(Some(&Status(code))) {
                Err(Rejection::UnsuccessfulStatusCode(got)) => assert_eq!(got, code),
                other => panic!("expected status rejection for {code}, got {other:?}"),
            }
        }
    }

    #[test]
    fn status_range_only_accepts_single_code() {
        let check = StatusRange::only(200);
        assert!(check.check(Some(&Status(200))).is_ok());
        assert!(matches!(
            check.check(Some(&Status(201))),
            Err(Rejection::UnsuccessfulStatusCode(201))
        ));
    }

    #[test]
    fn closures_act_as_checks() {
        let check = |response: Option<&Status>| match response {
            Some(status) if status.0 == 418 => Err(Rejection::custom("teapot")),
            _ => Ok(()),
        };
        assert!(AcceptabilityCheck::check(&check, Some(&Status(200))).is_ok());
        let err = AcceptabilityCheck::check(&check, Some(&Status(418))).unwrap_err();
        assert_eq!(err.to_string(), "teapot");
    }
}
