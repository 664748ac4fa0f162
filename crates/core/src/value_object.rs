//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two values with the same attributes are
/// equal. They are immutable; "changing" one means building a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Age { years: u32, months: u32, days: u32 }
///
/// impl ValueObject for Age {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
