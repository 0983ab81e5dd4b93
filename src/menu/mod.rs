//! Menu domain model and normalization.
//!
//! Maps the loosely-typed upstream menu document into the owned, nullable-safe
//! schema consumers see.

pub mod normalize;
pub mod nutrients;
pub mod types;

pub use normalize::normalize;
pub use types::{Macros, MealPeriod, MenuItem, NormalizedMenu, Station};
