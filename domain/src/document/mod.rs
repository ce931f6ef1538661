//! Document domain module
//!
//! Documents are schema-drifted JSON objects read from named collections
//! (`bookings`, `staff`, `clients`, `shows`, `availability`). Historical
//! records encode the same fact several different ways — a staff name may
//! be `name` or `firstName`/`lastName`, availability dates may live under
//! `availableDates` or the legacy `dates`, a show span may be
//! `startDate`/`endDate` or a singular `date`.
//!
//! Rather than scattering inline fallbacks, each legacy variant is handled
//! by an ordered set of shape-detection strategies in [`shapes`], so the
//! precedence order is a single reviewable table per field.
//!
//! - [`fields`] — typed accessors over `serde_json::Value` documents
//! - [`shapes`] — legacy-shape extraction strategies
//! - [`matching`] — case-insensitive exact/fuzzy name matching
//! - [`query`] — filter/sort/projection primitives for in-memory queries

pub mod fields;
pub mod matching;
pub mod query;
pub mod shapes;

pub use matching::{fuzzy_matches, matches_exact_name, suggestion_names};
pub use query::{Direction, FieldFilter, FilterOp, OrderBy};
pub use shapes::{availability_dates, display_name, show_date_span};
