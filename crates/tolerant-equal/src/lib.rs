//! tolerant-equal - Deep structural equality with per-type equivalence overrides.
//!
//! Provides [`DeepEqual`], a recursive comparator over the dynamic [`Value`]
//! tree. Before recursing structurally, the comparator consults a registry of
//! equivalence functions keyed by [`TypeTag`]; a registered function decides
//! equality for its type outright, which is how tolerant comparisons (float
//! epsilon, time bucketing) plug into an otherwise exact deep equality.
//!
//! Arbitrary Rust data enters the engine through [`to_value`], a
//! `serde::Serializer` that captures any `Serialize` type as a [`Value`].

mod capture;
mod deep_equal;
mod value;

pub use capture::{to_value, CaptureError, Timestamp};
pub use deep_equal::{DeepEqual, Equivalence};
pub use value::{TypeTag, Value};
