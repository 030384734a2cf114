/// Data layer: core types, loading, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, coerce cells → HappinessDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  years ∧ region ∧ country → filtered records
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐      ┌───────────┐
///   │ aggregate  │ ◄─── │ reconcile │  boundary name → dataset name
///   └───────────┘      └───────────┘
///        │
///        ▼
///     query    one read-only surface for the views
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
pub mod reconcile;
