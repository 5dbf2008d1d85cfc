//! tolerant-checker - Tolerant deep equality for test assertions.
//!
//! Wraps a [`tolerant_equal::DeepEqual`] engine with two default equivalence
//! overrides and a fluent configuration surface:
//!
//! - **Float epsilon**: `f32` and `f64` leaves are equal when their absolute
//!   difference is within a configured epsilon. NaN never compares equal,
//!   including to itself.
//! - **Time bucketing**: two timestamps are equal when they fall into the
//!   same fixed-width bucket of the timeline, regardless of their absolute
//!   distance.
//!
//! The documented defaults are an epsilon of `0.001` and a one second bucket
//! width; [`TolerantChecker::default`] builds exactly that configuration.
//!
//! ```
//! use tolerant_checker::TolerantChecker;
//!
//! let checker = TolerantChecker::default();
//! assert_eq!(checker.check(&1.0_f64, &1.0004_f64), Ok(true));
//! assert_eq!(checker.check(&1.0_f64, &1.1_f64), Ok(false));
//! ```

mod checker;
mod plugin;

pub use checker::{
    ConfigError, TolerantChecker, DEFAULT_FLOAT_EPSILON, DEFAULT_TIME_GRANULARITY,
};
pub use plugin::{Checker, CheckerInfo};
