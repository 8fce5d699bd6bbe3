//! Suffix-link-driven construction.
//!
//! Suffixes are inserted left to right; after the first one lands under the
//! root, each insertion point is located through one of four cases keyed on
//! the previous attachment node and its parent (the classical McCreight
//! dispatch). A known suffix link is an O(1) jump; a missing one is resolved
//! by hopping from the parent's link along the attachment node's edge label.
//! The string depth along hop paths strictly shrinks the remaining work, so
//! total construction cost stays proportional to the input length.

use log::debug;

use crate::error::SuffixTreeError;
use crate::tree::{Node, NodeIdx, SuffixTree, ROOT, SENTINEL};

/// Construction state: the growing tree plus the id counter for internal
/// nodes, scoped to one `build` call.
struct Builder {
    tree: SuffixTree,
    next_id: usize,
}

fn validate(input: &str, alphabet: &[char]) -> Result<(), SuffixTreeError> {
    if input.is_empty() {
        return Err(SuffixTreeError::InvalidInput("input is empty".into()));
    }
    if !input.is_ascii() {
        return Err(SuffixTreeError::InvalidInput(
            "only ASCII symbols are supported".into(),
        ));
    }
    for (pos, ch) in input.chars().enumerate() {
        if ch == SENTINEL as char {
            return Err(SuffixTreeError::InvalidInput(format!(
                "sentinel character '{}' occurs in the input at position {pos}",
                SENTINEL as char
            )));
        }
        if !alphabet.contains(&ch) {
            return Err(SuffixTreeError::InvalidInput(format!(
                "symbol {ch:?} at position {pos} is not in the alphabet"
            )));
        }
    }
    Ok(())
}

impl SuffixTree {
    /// Construct the suffix tree for `input` over `alphabet`.
    ///
    /// The sentinel is appended internally, so `input` must not contain it.
    /// The finished tree is fully linked: every internal node carries a
    /// suffix link and every leaf id equals the starting offset of the
    /// suffix it terminates.
    pub fn build(input: &str, alphabet: &[char]) -> Result<Self, SuffixTreeError> {
        validate(input, alphabet)?;

        let mut text = input.as_bytes().to_vec();
        text.push(SENTINEL);
        let n = text.len();

        // Internal ids start at the leaf count; the root takes the first.
        let root = Node {
            id: n,
            label_start: 0,
            label_end: 0,
            string_depth: 0,
            parent: ROOT,
            suffix_link: Some(ROOT),
            children: Vec::new(),
            leaf_interval: None,
        };

        let mut builder = Builder {
            tree: SuffixTree {
                text,
                nodes: vec![root],
                leaf_order: Vec::new(),
                lambda: None,
            },
            next_id: n + 1,
        };

        // Suffix 0 hangs directly under the root.
        let first = builder.new_leaf(ROOT, 0, 0);
        builder.insert_child(ROOT, first);

        let mut u = ROOT;
        for suffix in 1..n {
            u = builder.insert_suffix(u, suffix)?;
        }

        debug!(
            "constructed suffix tree: {} leaves, {} internal nodes",
            n,
            builder.tree.nodes.len() - n
        );
        Ok(builder.tree)
    }
}

impl Builder {
    /// Locate the attachment point for `suffix` starting from the previous
    /// attachment node `u`, insert the suffix there, and return the node the
    /// new leaf hangs from.
    fn insert_suffix(&mut self, u: NodeIdx, suffix: usize) -> Result<NodeIdx, SuffixTreeError> {
        match (self.tree.nodes[u].suffix_link, u == ROOT) {
            // Case IA: u carries a link below the root. Jump and skip the
            // linked node's depth worth of already-matched characters.
            (Some(v), false) => {
                let start = suffix + self.tree.nodes[v].string_depth;
                self.find_path(v, start, suffix)
            }
            // Case IB: u is the root, linked to itself.
            (Some(_), true) => self.find_path(ROOT, suffix, suffix),
            (None, _) => {
                let up = self.tree.nodes[u].parent;
                let (beta_start, beta_end) = {
                    let node = &self.tree.nodes[u];
                    (node.label_start, node.label_end)
                };
                if up != ROOT {
                    // Case IIA: hop from the parent's linked node along u's
                    // incoming edge label, then resolve u's link to wherever
                    // the hop lands.
                    let vp = self.tree.nodes[up].suffix_link.ok_or_else(|| {
                        SuffixTreeError::InternalConsistency(format!(
                            "grandparent of suffix {suffix} attachment has no suffix link"
                        ))
                    })?;
                    match self.hop(vp, beta_start, beta_end)? {
                        Some(v) => {
                            self.tree.nodes[u].suffix_link = Some(v);
                            let start = suffix + self.tree.nodes[v].string_depth;
                            self.find_path(v, start, suffix)
                        }
                        None => {
                            let start = suffix + self.tree.nodes[vp].string_depth;
                            self.find_path(vp, start, suffix)
                        }
                    }
                } else {
                    // Case IIB: the parent is the root. The first label
                    // character was consumed by the edge out of the root and
                    // has no counterpart one level up, so hop past it.
                    match self.hop(ROOT, beta_start + 1, beta_end)? {
                        Some(v) => {
                            self.tree.nodes[u].suffix_link = Some(v);
                            let start = suffix + self.tree.nodes[v].string_depth;
                            self.find_path(v, start, suffix)
                        }
                        None => self.find_path(ROOT, suffix, suffix),
                    }
                }
            }
        }
    }

    /// Descend from `from` consuming `text[start..end]` against edge labels.
    ///
    /// Returns the node at which the string is exhausted, splitting an edge
    /// when it ends mid-label. `None` means no child supplies the next
    /// character. A character mismatch along a partially matching edge is a
    /// caller bug: hopping is only ever invoked along a path that suffix
    /// links guarantee to exist.
    fn hop(
        &mut self,
        mut from: NodeIdx,
        mut start: usize,
        end: usize,
    ) -> Result<Option<NodeIdx>, SuffixTreeError> {
        loop {
            if start >= end {
                return Ok(Some(from));
            }
            let Some(pos) = self.find_branch(from, self.tree.text[start]) else {
                return Ok(None);
            };
            let child = self.tree.nodes[from].children[pos];
            let (ls, le) = {
                let node = &self.tree.nodes[child];
                (node.label_start, node.label_end)
            };
            let edge_len = le - ls;
            let s_len = end - start;

            if s_len < edge_len {
                if self.tree.text[ls..ls + s_len] == self.tree.text[start..end] {
                    return Ok(Some(self.split_edge(from, pos, s_len)));
                }
            } else if self.tree.text[ls..le] == self.tree.text[start..start + edge_len] {
                if s_len == edge_len {
                    return Ok(Some(child));
                }
                from = child;
                start += edge_len;
                continue;
            }
            return Err(SuffixTreeError::InternalConsistency(
                "node hop mismatched along a path that suffix links guarantee to exist".into(),
            ));
        }
    }

    /// Walk from `u` along `text[start..]`, attach a leaf for `suffix_id`
    /// where the walk ends, and return the node the leaf hangs from.
    ///
    /// A mismatch right at a node attaches the leaf directly; a mismatch
    /// mid-edge splits the edge first. A fully matching edge is descended:
    /// the sentinel makes every suffix unique, so the walk always ends in
    /// one of the two mismatch forms.
    fn find_path(
        &mut self,
        mut u: NodeIdx,
        mut start: usize,
        suffix_id: usize,
    ) -> Result<NodeIdx, SuffixTreeError> {
        let n = self.tree.text.len();
        loop {
            if start >= n {
                return Err(SuffixTreeError::InternalConsistency(format!(
                    "path insertion for suffix {suffix_id} ran out of characters"
                )));
            }
            let Some(pos) = self.find_branch(u, self.tree.text[start]) else {
                let leaf = self.new_leaf(u, start, suffix_id);
                self.insert_child(u, leaf);
                return Ok(u);
            };
            let child = self.tree.nodes[u].children[pos];
            let (ls, le) = {
                let node = &self.tree.nodes[child];
                (node.label_start, node.label_end)
            };
            let m = (le - ls).min(n - start);
            let mut matched = 0;
            while matched < m && self.tree.text[ls + matched] == self.tree.text[start + matched] {
                matched += 1;
            }
            if matched < m {
                // First mismatch sits mid-edge: break the edge right before
                // it and hang the rest of the suffix off the fresh node.
                let mid = self.split_edge(u, pos, matched);
                let leaf = self.new_leaf(mid, start + matched, suffix_id);
                self.insert_child(mid, leaf);
                return Ok(mid);
            }
            u = child;
            start += matched;
        }
    }

    /// Index of the child of `u` whose edge label starts with `first`.
    /// Children are sorted by label and siblings never share a first
    /// character, so the first byte is a binary-search key.
    fn find_branch(&self, u: NodeIdx, first: u8) -> Option<usize> {
        self.tree.nodes[u]
            .children
            .binary_search_by_key(&first, |&child| {
                self.tree.text[self.tree.nodes[child].label_start]
            })
            .ok()
    }

    /// Insert `child` among `parent`'s children in lexicographic label
    /// order. A search hit would mean two siblings share a first character,
    /// which construction never produces.
    fn insert_child(&mut self, parent: NodeIdx, child: NodeIdx) {
        let first = self.tree.text[self.tree.nodes[child].label_start];
        let slot = self.tree.nodes[parent]
            .children
            .binary_search_by_key(&first, |&c| {
                self.tree.text[self.tree.nodes[c].label_start]
            })
            .unwrap_or_else(|slot| slot);
        self.tree.nodes[parent].children.insert(slot, child);
    }

    /// Break the edge to `parent`'s child at `child_pos` after `offset`
    /// characters. The fresh internal node adopts the child and takes over
    /// the upper half of the label; its suffix link stays unresolved until a
    /// later insertion step supplies it.
    fn split_edge(&mut self, parent: NodeIdx, child_pos: usize, offset: usize) -> NodeIdx {
        let child = self.tree.nodes[parent].children[child_pos];
        let label_start = self.tree.nodes[child].label_start;
        let depth = self.tree.nodes[parent].string_depth + offset;

        let mid = self.tree.nodes.len();
        self.tree.nodes.push(Node {
            id: self.next_id,
            label_start,
            label_end: label_start + offset,
            string_depth: depth,
            parent,
            suffix_link: None,
            children: vec![child],
            leaf_interval: None,
        });
        self.next_id += 1;

        let lower = &mut self.tree.nodes[child];
        lower.label_start = label_start + offset;
        lower.parent = mid;

        // The fresh node starts with the same character the child did, so
        // it takes over the same slot among the siblings.
        self.tree.nodes[parent].children[child_pos] = mid;
        mid
    }

    fn new_leaf(&mut self, parent: NodeIdx, start: usize, suffix_id: usize) -> NodeIdx {
        let n = self.tree.text.len();
        let idx = self.tree.nodes.len();
        self.tree.nodes.push(Node {
            id: suffix_id,
            label_start: start,
            label_end: n,
            string_depth: self.tree.nodes[parent].string_depth + (n - start),
            parent,
            suffix_link: None,
            children: Vec::new(),
            leaf_interval: None,
        });
        idx
    }
}
