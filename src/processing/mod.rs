//! In-memory building blocks shared by the transforms.
//!
//! - [`filter()`]: order-preserving selection by predicate (JSON transform)
//! - [`SampleStats`]: numeric summary of collected samples (CSV aggregation)
//!
//! ```rust
//! use upload_transform::processing::{filter, SampleStats};
//!
//! let ages = vec![29, 35, 41];
//! let adults = filter(&ages, |a| *a >= 30);
//! assert_eq!(adults, vec![35, 41]);
//!
//! let stats: SampleStats = [5.0, 10.0].into_iter().collect();
//! assert_eq!(stats.mean(), Some(7.5));
//! ```

pub mod filter;
pub mod reduce;

pub use filter::filter;
pub use reduce::SampleStats;
