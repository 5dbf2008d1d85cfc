//! Recursive structural comparison with override dispatch.

use std::collections::HashMap;

use crate::value::{TypeTag, Value};

/// A type-specific equivalence predicate.
///
/// The engine only invokes a registered function with two non-absent values
/// whose tags both equal the registered [`TypeTag`]; absence and type
/// mismatch are resolved before dispatch. Functions must be pure: no
/// mutation, no side effects, guaranteed termination.
pub type Equivalence = Box<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Deep structural equality engine.
///
/// Walks two [`Value`] trees in lockstep, depth first. A registered override
/// takes precedence over structural recursion for its type, including for
/// composite types, so an override can short-circuit deep traversal
/// entirely.
#[derive(Default)]
pub struct DeepEqual {
    overrides: HashMap<TypeTag, Equivalence>,
}

impl DeepEqual {
    pub fn new() -> Self {
        DeepEqual {
            overrides: HashMap::new(),
        }
    }

    /// Registers `equivalence` for `tag`, replacing any prior registration
    /// for the same tag.
    pub fn register<F>(&mut self, tag: TypeTag, equivalence: F)
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.overrides.insert(tag, Box::new(equivalence));
    }

    /// Decides structural equality between `obtained` and `expected`.
    ///
    /// Mismatched runtime types are inequality (`false`), never an error.
    pub fn deep_equal(&self, obtained: &Value, expected: &Value) -> bool {
        let tag = match (obtained.type_tag(), expected.type_tag()) {
            (None, None) => return true,
            (None, Some(_)) | (Some(_), None) => return false,
            (Some(a), Some(b)) => {
                if a != b {
                    return false;
                }
                a
            }
        };
        if let Some(equivalence) = self.overrides.get(&tag) {
            return equivalence(obtained, expected);
        }
        match (obtained, expected) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| self.deep_equal(x, y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, x)| match b.get(key) {
                        Some(y) => self.deep_equal(x, y),
                        None => false,
                    })
            }
            (Value::Record { fields: a, .. }, Value::Record { fields: b, .. }) => {
                // Record names already matched through the tag.
                a.len() == b.len()
                    && a.iter().all(|(field, x)| {
                        b.iter()
                            .find(|(other, _)| other == field)
                            .is_some_and(|(_, y)| self.deep_equal(x, y))
                    })
            }
            // Equal tags guarantee equal variants.
            _ => false,
        }
    }
}
