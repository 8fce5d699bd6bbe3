//! Linear-time suffix-tree construction over a single sequence, plus the
//! analyses that consume the finished tree: leaf-interval annotation, BWT
//! extraction and longest-exact-repeat search.
//!
//! Construction is McCreight-style: suffixes are inserted left to right and
//! each insertion point is found through suffix links and node-hopping, so
//! the whole tree costs time proportional to the input length. The tree is
//! an arena of nodes addressed by index; parent and suffix-link references
//! are plain indices and never own anything.
//!
//! # Examples
//!
//! ```
//! use mccreight_rs::SuffixTree;
//!
//! let mut tree = SuffixTree::build("banana", &['a', 'b', 'n']).unwrap();
//! tree.annotate(0);
//!
//! let repeat = tree.longest_repeat();
//! assert_eq!(repeat.length, 3); // "ana"
//! assert_eq!(repeat.positions, vec![1, 3]);
//! assert_eq!(tree.bwt(), b"annb$aa");
//! ```

mod annotate;
mod build;
pub mod error;
pub mod query;
pub mod tree;

pub use error::SuffixTreeError;
pub use query::RepeatReport;
pub use tree::{Node, NodeIdx, SuffixTree, TreeStats, SENTINEL};
