//! Histogram records and binning strategies for signed templates
//!
//! This crate turns raw sample arrays into `(counts, edges)` records that a
//! downstream fit can consume. Counts may be negative; every operation keeps
//! track of signs explicitly.
//!
//! # Key Features
//!
//! - **Explicit edges**: [`BinEdges`] are chosen once per batch and passed to
//!   every call, so all histograms of a batch stay summable
//! - **Area normalization**: [`normalize`] / [`BatchNormalizer`] scale a
//!   histogram to a target absolute area without flipping any bin's sign
//! - **Signal-region binning**: [`SignalRegionLayout`] spends more bins inside
//!   a region of interest while keeping the total bin count exact
//! - **Signed split**: [`HistogramOps::split_signed`] turns one signed
//!   histogram into two non-negative ones
//!
//! # Examples
//!
//! ## Oversampling a signal region
//!
//! ```rust
//! use template_histogram::{SignalRegion, SignalRegionLayout};
//!
//! let region = SignalRegion::new(7.0, 8.0).unwrap();
//! let layout = SignalRegionLayout::new(20, 40, (6.0, 9.0), Some(region)).unwrap();
//!
//! assert_eq!(layout.edges().num_bins(), 40);
//! assert_eq!(layout.allocation().region, 20);
//!
//! let hist = layout.resample(&[6.5, 7.25, 7.5, 8.5], 2.0).unwrap();
//! assert!((hist.integral() - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Splitting a signed histogram
//!
//! ```rust
//! use template_histogram::{BinEdges, Histogram1D, HistogramOps};
//!
//! let edges = BinEdges::uniform(3, (0.0, 3.0)).unwrap();
//! let interference = Histogram1D::new(vec![0.4, -0.1, 0.0], edges).unwrap();
//!
//! let (pos, neg) = interference.split_signed();
//! assert_eq!(pos.counts(), &[0.4, 0.0, 0.0]);
//! assert_eq!(neg.counts(), &[0.0, 0.1, 0.0]);
//! ```

pub mod background;
pub mod builders;
pub mod normalize;
pub mod ops;
pub mod resample;
pub mod sample;
pub mod traits;
pub mod types;

// Re-export main types and traits
pub use background::{BackgroundSet, CombinedBackground};
pub use builders::{fill_counts, FixedWidthBuilder, GridBuilder, VariableWidthBuilder};
pub use normalize::{normalize, normalize_2d, AxisSpec, BatchNormalizer, BatchNormalizer2D};
pub use ops::{sum_all, HistogramOps};
pub use resample::{resample, resample_2d, BinAllocation, SignalRegion, SignalRegionLayout};
pub use sample::Sample;
pub use traits::HistogramBuilder;
pub use types::{BinEdges, BinSpec, Histogram1D, Histogram2D};

pub use template_core::{Error, Result};
