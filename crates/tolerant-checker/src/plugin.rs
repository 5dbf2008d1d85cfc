//! Assertion-framework checker contract.
//!
//! Assertion frameworks consume checkers as named plugins: a checker exposes
//! its name and the ordered names of its parameters, and decides a parameter
//! list in one call. The explanation string is empty on a clean comparison;
//! a non-empty explanation means the comparison could not be performed and
//! the verdict is not a statement about the values.

use tolerant_equal::Value;

use crate::checker::TolerantChecker;

/// Identity of a checker as presented to an assertion framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerInfo {
    pub name: &'static str,
    pub params: &'static [&'static str],
}

/// A named assertion checker over captured values.
pub trait Checker {
    fn info(&self) -> &CheckerInfo;

    /// Decides the parameter list, returning the verdict and an optional
    /// explanation.
    fn check(&self, params: &[Value]) -> (bool, String);
}

static TOLERANT_DEEP_EQUALS_INFO: CheckerInfo = CheckerInfo {
    name: "TolerantDeepEquals",
    params: &["obtained", "expected"],
};

impl Checker for TolerantChecker {
    fn info(&self) -> &CheckerInfo {
        &TOLERANT_DEEP_EQUALS_INFO
    }

    fn check(&self, params: &[Value]) -> (bool, String) {
        match params {
            [obtained, expected] => (self.deep_equal(obtained, expected), String::new()),
            _ => (
                false,
                format!(
                    "TolerantDeepEquals takes 2 parameters, got {}",
                    params.len()
                ),
            ),
        }
    }
}
