//! Core types for signed histogram templates
//!
//! This crate holds the pieces every other template crate leans on: the
//! shared error taxonomy and the two scale-to-area primitives.
//!
//! - [`scale`] rescales bin counts so that their *absolute* area equals a
//!   target while every bin keeps its sign.
//! - [`rescale_to_sum`] rescales bin counts so that their *plain* signed sum
//!   equals a target. The signal-region resampler normalizes this way.
//!
//! The two differ as soon as a histogram contains negative bins:
//!
//! ```rust
//! use template_core::{rescale_to_sum, scale};
//!
//! let counts = [3.0, -1.0];
//! let by_abs = scale(&counts, 2.0).unwrap();
//! let by_sum = rescale_to_sum(&counts, 2.0).unwrap();
//!
//! assert_eq!(by_abs, vec![1.5, -0.5]);
//! assert_eq!(by_sum, vec![3.0, -1.0]);
//! ```

pub mod error;
pub mod scale;

pub use error::{Error, Result};
pub use scale::{any_nonzero, abs_sum, rescale_to_sum, scale, signed_sum};
