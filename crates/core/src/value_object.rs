//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — identity does
/// not matter, only the values do. `Money` is the canonical example here:
/// two `Money::from_minor(100)` values are interchangeable, whereas two
/// accounts holding 1.00 are not.
///
/// The trait requires `Clone + PartialEq + Debug` so values stay cheap to
/// copy, comparable in assertions, and printable in logs.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
