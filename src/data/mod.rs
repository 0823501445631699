//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file, drop incomplete rows → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<EventRecord>, year bounds, countries (immutable)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year range + country set → filtered indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate │  per-year sums, per-country counts
//!   └───────────┘
//! ```
//!
//! `view::FilteredView::compute` runs the last two stages as one pure call.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
