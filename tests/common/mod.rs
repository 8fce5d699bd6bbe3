//! Shared helpers for integration tests: a quadratic reference
//! construction and plain-sort oracles for the derived queries.

use mccreight_rs::{NodeIdx, SuffixTree};

/// Reference tree node: children sorted by edge label, leaves tagged with
/// their suffix offset.
#[derive(Debug, Default)]
pub struct RefNode {
    pub children: Vec<(Vec<u8>, RefNode)>,
    pub leaf_id: Option<usize>,
}

/// O(n^2) reference construction: every suffix is inserted from the root
/// with plain character comparison and no suffix links.
pub fn naive_tree(input: &str) -> RefNode {
    let mut text = input.as_bytes().to_vec();
    text.push(b'$');
    let mut root = RefNode::default();
    for start in 0..text.len() {
        naive_insert(&mut root, &text[start..], start);
    }
    root
}

fn naive_insert(node: &mut RefNode, s: &[u8], id: usize) {
    match node.children.iter().position(|(label, _)| label[0] == s[0]) {
        None => {
            let slot = node
                .children
                .iter()
                .position(|(label, _)| label[0] > s[0])
                .unwrap_or(node.children.len());
            node.children.insert(
                slot,
                (
                    s.to_vec(),
                    RefNode {
                        children: Vec::new(),
                        leaf_id: Some(id),
                    },
                ),
            );
        }
        Some(pos) => {
            let common = {
                let (label, _) = &node.children[pos];
                label.iter().zip(s).take_while(|(a, b)| a == b).count()
            };
            let (label, child) = &mut node.children[pos];
            if common == label.len() {
                // The sentinel keeps every suffix unique, so s is always
                // strictly longer than a fully matched edge.
                naive_insert(child, &s[common..], id);
            } else {
                let lower_label = label[common..].to_vec();
                let upper_label = label[..common].to_vec();
                let old_child = std::mem::take(child);
                let mut mid = RefNode::default();
                mid.children.push((lower_label, old_child));
                let leaf = RefNode {
                    children: Vec::new(),
                    leaf_id: Some(id),
                };
                let rest = s[common..].to_vec();
                let slot = mid
                    .children
                    .iter()
                    .position(|(l, _)| l[0] > rest[0])
                    .unwrap_or(mid.children.len());
                mid.children.insert(slot, (rest, leaf));
                node.children[pos] = (upper_label, mid);
            }
        }
    }
}

/// Canonical DFS form of the reference tree: (edge label, leaf id) per node.
pub fn ref_shape(root: &RefNode) -> Vec<(Vec<u8>, Option<usize>)> {
    let mut out = vec![(Vec::new(), root.leaf_id)];
    fn walk(node: &RefNode, out: &mut Vec<(Vec<u8>, Option<usize>)>) {
        for (label, child) in &node.children {
            out.push((label.clone(), child.leaf_id));
            walk(child, out);
        }
    }
    walk(root, &mut out);
    out
}

/// Canonical DFS form of the engine tree, comparable with `ref_shape`.
pub fn engine_shape(tree: &SuffixTree) -> Vec<(Vec<u8>, Option<usize>)> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeIdx> = vec![tree.root()];
    let mut ordered = Vec::new();
    while let Some(idx) = stack.pop() {
        ordered.push(idx);
        for &child in tree.children(idx).iter().rev() {
            stack.push(child);
        }
    }
    for idx in ordered {
        let node = tree.node(idx);
        let leaf_id = node.is_leaf().then_some(node.id);
        out.push((tree.label(idx).to_vec(), leaf_id));
    }
    out
}

/// Suffix array of the sentinel-terminated input by plain sorting.
pub fn oracle_suffix_array(input: &str) -> Vec<usize> {
    let mut text = input.as_bytes().to_vec();
    text.push(b'$');
    let mut sa: Vec<usize> = (0..text.len()).collect();
    sa.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
    sa
}

/// BWT from the sorted-suffix oracle.
pub fn oracle_bwt(input: &str) -> Vec<u8> {
    let mut text = input.as_bytes().to_vec();
    text.push(b'$');
    let n = text.len();
    oracle_suffix_array(input)
        .into_iter()
        .map(|i| text[(i + n - 1) % n])
        .collect()
}

/// Longest repeated substring length: the maximum common prefix between
/// lexicographically adjacent suffixes.
pub fn oracle_repeat_length(input: &str) -> usize {
    let mut text = input.as_bytes().to_vec();
    text.push(b'$');
    let sa = oracle_suffix_array(input);
    sa.windows(2)
        .map(|w| {
            text[w[0]..]
                .iter()
                .zip(&text[w[1]..])
                .take_while(|(a, b)| a == b)
                .count()
        })
        .max()
        .unwrap_or(0)
}

/// Inverse BWT via LF-mapping; reconstructs the sentinel-terminated input.
pub fn inverse_bwt(bwt: &[u8]) -> Vec<u8> {
    let n = bwt.len();
    let mut counts = [0usize; 256];
    for &b in bwt {
        counts[b as usize] += 1;
    }
    let mut starts = [0usize; 256];
    let mut acc = 0;
    for c in 0..256 {
        starts[c] = acc;
        acc += counts[c];
    }
    let mut occ = [0usize; 256];
    let mut lf = vec![0usize; n];
    for (i, &b) in bwt.iter().enumerate() {
        lf[i] = starts[b as usize] + occ[b as usize];
        occ[b as usize] += 1;
    }

    let mut out = Vec::with_capacity(n);
    let mut row = 0;
    for _ in 0..n {
        out.push(bwt[row]);
        row = lf[row];
    }
    out.reverse();
    // The backward walk starts at the sentinel rotation; rotate it to the
    // conventional "input then sentinel" form.
    out.rotate_left(1);
    out
}

/// Alphabet of an ASCII test string, as the engine expects it.
pub fn alphabet_of(input: &str) -> Vec<char> {
    let mut chars: Vec<char> = input.chars().collect();
    chars.sort_unstable();
    chars.dedup();
    chars
}
