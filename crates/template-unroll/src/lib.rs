//! 2-D template unrolling
//!
//! A fit that only understands 1-D non-negative templates gets each 2-D
//! template as a sequence of `nx * ny` bins, split into a positive and a
//! negative component. Background templates have their empty bins padded
//! with a small floor so the fit never sees a zero-rate bin.
//!
//! ```rust
//! use template_histogram::{BinEdges, Histogram2D};
//! use template_unroll::Unroller;
//!
//! let x = BinEdges::uniform(2, (6.0, 9.0)).unwrap();
//! let y = BinEdges::uniform(2, (0.0, 1.0)).unwrap();
//! let bkg = Histogram2D::from_rows(&[vec![5.0, 0.0], vec![0.0, -3.0]], x, y).unwrap();
//!
//! let outcome = Unroller::new().unroll("bkg_ggzz", &bkg).unwrap();
//! assert_eq!(outcome.positive.counts(), &[5.0, 0.05, 0.05, 0.0]);
//! assert_eq!(outcome.negative.counts(), &[0.0, 0.0, 0.0, 3.0]);
//! assert_eq!(outcome.names.positive, "bkg_ggzz");
//! ```

pub mod naming;
pub mod unroll;

pub use naming::{classify, component_names, ComponentNames, NamingRule, DATA_OBS};
pub use unroll::{
    clamp_negative, fill_empty, flatten, scan, traversal, Scan, UnrollOutcome, Unroller,
    DEFAULT_BACKGROUND_MARKER, DEFAULT_FILL_FRACTION,
};

pub use template_core::{Error, Result};
