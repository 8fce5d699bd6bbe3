//! Post-order leaf-interval annotation.
//!
//! Ranks every leaf by its left-to-right (lexicographic) position and gives
//! every node whose string depth reaches the threshold the contiguous range
//! of leaf ranks in its subtree. Children stay lexicographically sorted from
//! construction, so an internal interval is just the extremes of its first
//! and last child. Tree topology is never touched.

use log::debug;

use crate::tree::{SuffixTree, ROOT};

impl SuffixTree {
    /// Assign leaf ranks and, for every node with `string_depth >= lambda`,
    /// the interval of leaf ranks spanned by its subtree.
    ///
    /// Runs over the whole finished tree; re-running replaces any previous
    /// annotation, so equal thresholds reproduce identical intervals and a
    /// different threshold never leaves stale ones behind.
    pub fn annotate(&mut self, lambda: usize) {
        for node in &mut self.nodes {
            node.leaf_interval = None;
        }
        self.leaf_order.clear();

        // Explicit traversal stack of (node, next child) frames; highly
        // repetitive inputs produce trees as deep as the input is long.
        let mut stack: Vec<(usize, usize)> = vec![(ROOT, 0)];
        while let Some(frame) = stack.last_mut() {
            let (idx, cursor) = *frame;
            if cursor < self.nodes[idx].children.len() {
                frame.1 += 1;
                let child = self.nodes[idx].children[cursor];
                stack.push((child, 0));
                continue;
            }
            stack.pop();

            if self.nodes[idx].children.is_empty() {
                let rank = self.leaf_order.len();
                self.leaf_order.push(self.nodes[idx].id);
                if self.nodes[idx].string_depth >= lambda {
                    self.nodes[idx].leaf_interval = Some((rank, rank));
                }
            } else if self.nodes[idx].string_depth >= lambda {
                // Children are strictly deeper than their parent, so both
                // extremes already carry intervals whenever the parent
                // qualifies.
                let first = self.nodes[idx].children[0];
                let last = self.nodes[idx].children[self.nodes[idx].children.len() - 1];
                if let (Some((lo, _)), Some((_, hi))) = (
                    self.nodes[first].leaf_interval,
                    self.nodes[last].leaf_interval,
                ) {
                    self.nodes[idx].leaf_interval = Some((lo, hi));
                }
            }
        }

        self.lambda = Some(lambda);
        debug!(
            "annotated {} leaves with threshold {}",
            self.leaf_order.len(),
            lambda
        );
    }
}
