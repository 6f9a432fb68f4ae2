//! # gentree
//!
//! `gentree` is a Rust library for generic spatial trees over weighted point tables,
//! designed to be used in Rust as well as compiled to WebAssembly (WASM). It builds
//! metric trees (ball bounds) and kd-trees (box bounds) over the same table type and
//! ships a stress harness that checks the structural and geometric invariants of both.
//!
//! ## Features
//!
//! - **Pluggable splitting**: the [`TreeBuilder`] is generic over a [`SplitPolicy`],
//!   with [`MetricTreeSplit`] and [`KdTreeSplit`] provided.
//! - **In-place partitioning**: indexing reorders table rows so every node owns a
//!   contiguous range, while keeping the permutation to the original order.
//! - **Self-consistent bounds**: every [`Bound`] can sample points that it is
//!   guaranteed to contain.
//! - **Exact persistence**: tables save to and load from delimited text without
//!   losing precision.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`Table`] struct, usually through the
//! [`MetricTreeTable`] and [`KdTreeTable`] aliases.

pub mod bounds;
mod error;
pub mod method_form;
mod metric;
mod point;
pub mod stress;
mod table;
pub mod tree;
mod wasm;

pub use bounds::BallBound;
pub use bounds::Bound;
pub use bounds::HRectBound;
pub use error::Result;
pub use error::TableError;
pub use metric::L2Metric;
pub use metric::LMetric;
pub use metric::Metric;
pub use point::DensePoint;
pub use point::RowBlock;
pub use table::KdTreeTable;
pub use table::MetricTreeTable;
pub use table::Table;
pub use tree::KdTreeSplit;
pub use tree::MetricTreeSplit;
pub use tree::SplitPolicy;
pub use tree::TreeBuilder;
pub use tree::TreeEntry;
pub use tree::TreeIterator;
pub use tree::TreeNode;
pub use wasm::SpatialIndex;
