//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity** - they are defined entirely by their
//! attribute values. Two value objects with the same values are equal.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: a calendar month key, a run configuration, a monthly
///   data point. Two of them with the same fields are interchangeable.
/// - **Entity**: a product group. It is identified by its `ProductId`, not by
///   the records it currently holds.
///
/// Value objects are immutable once built; "changing" one means building a
/// new one. The trait requires `Clone + PartialEq + Debug` so values can be
/// copied around freely, compared in tests, and logged.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// struct MonthKey {
///     year: i32,
///     month0: u32,
/// }
///
/// impl ValueObject for MonthKey {}
///
/// assert_eq!(MonthKey { year: 2024, month0: 0 }, MonthKey { year: 2024, month0: 0 });
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
