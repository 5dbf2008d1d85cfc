//! Checker construction and tolerance configuration.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tolerant_equal::{to_value, CaptureError, DeepEqual, TypeTag, Value};
use tracing::debug;

/// Default absolute epsilon for float comparisons.
pub const DEFAULT_FLOAT_EPSILON: f64 = 0.001;

/// Default bucket width for timestamp comparisons.
pub const DEFAULT_TIME_GRANULARITY: Duration = Duration::from_secs(1);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero bucket width would make the bucket index degenerate.
    #[error("time granularity must be a positive duration")]
    ZeroTimeGranularity,
}

/// Deep equality checker with configurable float and time tolerances.
///
/// Reconfiguration consumes and returns the checker so calls chain:
///
/// ```
/// use std::time::Duration;
/// use tolerant_checker::TolerantChecker;
///
/// let checker = TolerantChecker::default()
///     .use_float_epsilon(0.5)
///     .use_time_granularity(Duration::from_millis(100))
///     .unwrap();
/// assert_eq!(checker.check(&2.0_f64, &2.5_f64), Ok(true));
/// ```
///
/// Comparisons take `&self` and registrations take ownership, so a shared
/// checker can serve concurrent read-only checks but cannot be reconfigured
/// mid-check.
pub struct TolerantChecker {
    engine: DeepEqual,
}

impl TolerantChecker {
    /// Builds a checker with the given float epsilon and time bucket width.
    pub fn new(float_epsilon: f64, time_granularity: Duration) -> Result<Self, ConfigError> {
        let mut checker = TolerantChecker {
            engine: DeepEqual::new(),
        };
        checker.register_float_overrides(float_epsilon);
        checker.register_time_override(time_granularity)?;
        Ok(checker)
    }

    /// Replaces the float overrides, keeping the time override untouched.
    pub fn use_float_epsilon(mut self, delta: f64) -> Self {
        self.register_float_overrides(delta);
        self
    }

    /// Replaces the time override, keeping the float overrides untouched.
    pub fn use_time_granularity(mut self, granularity: Duration) -> Result<Self, ConfigError> {
        self.register_time_override(granularity)?;
        Ok(self)
    }

    /// Registers an arbitrary equivalence override on the underlying engine.
    pub fn with_override<F>(mut self, tag: TypeTag, equivalence: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        debug!(?tag, "registering custom equivalence override");
        self.engine.register(tag, equivalence);
        self
    }

    /// Compares two already-captured values. Pure query.
    pub fn deep_equal(&self, obtained: &Value, expected: &Value) -> bool {
        self.engine.deep_equal(obtained, expected)
    }

    /// Captures both arguments and compares them.
    ///
    /// A capture failure surfaces as the error, never as `Ok(false)`, so
    /// "could not compare" stays distinguishable from "not equal".
    pub fn check<O, E>(&self, obtained: &O, expected: &E) -> Result<bool, CaptureError>
    where
        O: Serialize + ?Sized,
        E: Serialize + ?Sized,
    {
        let obtained = to_value(obtained)?;
        let expected = to_value(expected)?;
        Ok(self.engine.deep_equal(&obtained, &expected))
    }

    fn register_float_overrides(&mut self, delta: f64) {
        debug!(delta, "registering float tolerance overrides");
        self.engine.register(TypeTag::F32, move |a, b| match (a, b) {
            (Value::F32(x), Value::F32(y)) => f64::from(x - y).abs() <= delta,
            _ => false,
        });
        self.engine.register(TypeTag::F64, move |a, b| match (a, b) {
            (Value::F64(x), Value::F64(y)) => (x - y).abs() <= delta,
            _ => false,
        });
    }

    fn register_time_override(&mut self, granularity: Duration) -> Result<(), ConfigError> {
        if granularity.is_zero() {
            return Err(ConfigError::ZeroTimeGranularity);
        }
        debug!(?granularity, "registering time bucket override");
        let grain_nanos = granularity.as_nanos() as i128;
        self.engine.register(TypeTag::Time, move |a, b| match (a, b) {
            (Value::Time(x), Value::Time(y)) => {
                time_bucket(x, grain_nanos) == time_bucket(y, grain_nanos)
            }
            _ => false,
        });
        Ok(())
    }
}

impl Default for TolerantChecker {
    fn default() -> Self {
        match Self::new(DEFAULT_FLOAT_EPSILON, DEFAULT_TIME_GRANULARITY) {
            Ok(checker) => checker,
            // The default granularity is non-zero.
            Err(_) => unreachable!("default time granularity is positive"),
        }
    }
}

/// Floored bucket index of an instant on a `grain_nanos`-wide grid.
///
/// Nanoseconds are computed in `i128` so far-past and far-future instants
/// never overflow, and the division is floored so buckets stay uniform on
/// both sides of the epoch.
fn time_bucket(instant: &DateTime<Utc>, grain_nanos: i128) -> i128 {
    let nanos = i128::from(instant.timestamp()) * 1_000_000_000
        + i128::from(instant.timestamp_subsec_nanos());
    nanos.div_euclid(grain_nanos)
}
