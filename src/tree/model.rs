//! An indexed, rooted tree with O(1)/O(depth) structural queries.
//!
//! Ported from the Euler-tour technique used by the original `literal_tree`:
//! a single depth-first pass records, for every vertex, the position of its
//! first and last occurrence in a flattened tour array, which is enough to
//! answer subtree-membership queries without walking the tree again.

use super::syntax::{NodeKind, SyntaxTree};

pub const ROOT_PARENT: i64 = -1;

/// A static, index-addressed rooted tree built once from a [`SyntaxTree`].
#[derive(Debug, Clone)]
pub struct Tree {
    names: Vec<String>,
    kinds: Vec<NodeKind>,
    parent: Vec<i64>,
    children: Vec<Vec<usize>>,
    euler_start: Vec<usize>,
    euler_end: Vec<usize>,
    tour: Vec<usize>,
    root: usize,
}

impl Tree {
    /// Flattens a [`SyntaxTree`] into arcs, in tree-index order, then builds
    /// the indexed representation. Index 0 is always the root.
    pub fn from_syntax(syntax: &SyntaxTree) -> Self {
        let mut names = Vec::new();
        let mut kinds = Vec::new();
        let mut arcs: Vec<(i64, usize)> = Vec::new();

        fn visit(
            node: &super::syntax::SyntaxNode,
            parent: i64,
            names: &mut Vec<String>,
            kinds: &mut Vec<NodeKind>,
            arcs: &mut Vec<(i64, usize)>,
        ) {
            let idx = names.len();
            names.push(node.name.clone());
            kinds.push(node.kind);
            arcs.push((parent, idx));
            for child in &node.children {
                visit(child, idx as i64, names, kinds, arcs);
            }
        }

        visit(&syntax.root, ROOT_PARENT, &mut names, &mut kinds, &mut arcs);
        Self::build(names, kinds, arcs)
    }

    fn build(names: Vec<String>, kinds: Vec<NodeKind>, arcs: Vec<(i64, usize)>) -> Self {
        let n = names.len();
        let mut parent = vec![ROOT_PARENT; n];
        for &(p, c) in &arcs {
            parent[c] = p;
        }

        let mut sorted = arcs.clone();
        sorted.sort_by_key(|&(p, c)| (p, c));

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for &(p, c) in &sorted {
            if p >= 0 {
                children[p as usize].push(c);
            }
        }

        let root = parent
            .iter()
            .position(|&p| p == ROOT_PARENT)
            .expect("a tree built from a SyntaxTree always has exactly one root");

        let mut tour = vec![0usize; 2 * n.max(1)];
        let mut euler_start = vec![0usize; n];
        let mut euler_end = vec![0usize; n];

        fn recurse(
            children: &[Vec<usize>],
            tour: &mut [usize],
            start: &mut [usize],
            end: &mut [usize],
            pos: usize,
            curr: usize,
        ) -> usize {
            tour[pos] = curr;
            start[curr] = pos;
            let mut pos = pos + 1;
            for &child in &children[curr] {
                pos = recurse(children, tour, start, end, pos, child);
            }
            tour[pos] = curr;
            end[curr] = pos;
            pos + 1
        }

        recurse(&children, &mut tour, &mut euler_start, &mut euler_end, 0, root);

        Tree {
            names,
            kinds,
            parent,
            children,
            euler_start,
            euler_end,
            tour,
            root,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, i: usize) -> &str {
        &self.names[i]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn is_region(&self, i: usize) -> bool {
        self.kinds[i] == NodeKind::Region
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn is_root(&self, i: usize) -> bool {
        self.parent[i] == ROOT_PARENT
    }

    /// Returns `None` for the root.
    pub fn parent(&self, i: usize) -> Option<usize> {
        let p = self.parent[i];
        if p < 0 {
            None
        } else {
            Some(p as usize)
        }
    }

    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    pub fn is_parent(&self, parent_idx: usize, child_idx: usize) -> bool {
        self.parent(child_idx) == Some(parent_idx)
    }

    pub fn is_ancestor(&self, ancestor: usize, mut node: usize) -> bool {
        loop {
            if ancestor == node {
                return true;
            }
            match self.parent(node) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    pub fn depth(&self, mut i: usize) -> usize {
        let mut d = 0;
        while let Some(p) = self.parent(i) {
            d += 1;
            i = p;
        }
        d
    }

    pub fn distance(&self, x: usize, y: usize) -> usize {
        self.depth(x) + self.depth(y) - 2 * self.depth(self.lca(x, y))
    }

    /// Lowest common ancestor via depth-equalize-then-walk-up.
    pub fn lca(&self, mut x: usize, mut y: usize) -> usize {
        let mut dx = self.depth(x);
        let mut dy = self.depth(y);
        while dx > dy {
            x = self.parent(x).unwrap();
            dx -= 1;
        }
        while dy > dx {
            y = self.parent(y).unwrap();
            dy -= 1;
        }
        while x != y {
            x = self.parent(x).unwrap();
            y = self.parent(y).unwrap();
        }
        x
    }

    /// The child of `lca(x, y)` lying on `x`'s side of the split, i.e. the
    /// subtree root that must be exited when transitioning away from `x`
    /// towards `y`. Returns `x` itself when `x` already is the lca.
    pub fn before_lca(&self, x: usize, y: usize) -> usize {
        let lca = self.lca(x, y);
        let mut pred = x;
        while pred != lca && self.parent(pred) != Some(lca) {
            pred = self.parent(pred).unwrap();
        }
        pred
    }

    /// The path from `x` to `y` inclusive of both endpoints and the lca.
    pub fn path(&self, mut x: usize, mut y: usize) -> Vec<usize> {
        let lca = self.lca(x, y);
        let mut result = Vec::new();
        while x != lca {
            result.push(x);
            x = self.parent(x).unwrap();
        }
        result.push(lca);
        let mid = result.len();

        let mut tail = Vec::new();
        while y != lca {
            tail.push(y);
            y = self.parent(y).unwrap();
        }
        tail.reverse();
        result.extend(tail);
        let _ = mid;
        result
    }

    /// All descendants of `x`, excluding `x`, in an order where every
    /// descendant precedes its own ancestors (safe for bottom-up exit).
    pub fn subtree_exclusive(&self, x: usize) -> Vec<usize> {
        let mut result = Vec::new();
        for i in self.euler_start[x]..self.euler_end[x] {
            let node = self.tour[i];
            if self.euler_start[node] == i && node != x {
                result.push(node);
            }
        }
        result.reverse();
        result
    }

    pub fn subtree_inclusive(&self, x: usize) -> Vec<usize> {
        let mut result = self.subtree_exclusive(x);
        result.push(x);
        result
    }

    pub fn is_cross_arc(&self, x: usize, y: usize) -> bool {
        let lca = self.lca(x, y);
        lca != x && lca != y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::syntax::parse;

    fn sample() -> Tree {
        // Root |-- P (|-- A |-- B) |-- Q (|-- C)
        let text = "Root\n|-- P\n|   |-- A\n|   |-- B\n|-- Q\n|   |-- C\n";
        Tree::from_syntax(&parse(text).unwrap())
    }

    #[test]
    fn lca_is_idempotent_and_bounded() {
        let t = sample();
        for x in 0..t.len() {
            for y in 0..t.len() {
                let l = t.lca(x, y);
                assert_eq!(t.lca(x, l), l);
                assert!(t.depth(l) <= t.depth(x).min(t.depth(y)));
                assert!(t.is_ancestor(l, x));
                assert!(t.is_ancestor(l, y));
            }
        }
    }

    #[test]
    fn cross_subtree_lca() {
        let t = sample();
        let a = t.index_of("A").unwrap();
        let c = t.index_of("C").unwrap();
        let p = t.index_of("P").unwrap();
        let q = t.index_of("Q").unwrap();
        let root = t.root();
        assert_eq!(t.lca(a, c), root);
        assert_eq!(t.before_lca(a, c), p);
        assert_eq!(t.before_lca(c, a), q);
    }

    #[test]
    fn subtree_exclusive_orders_descendants_before_ancestors() {
        let t = sample();
        let p = t.index_of("P").unwrap();
        let a = t.index_of("A").unwrap();
        let b = t.index_of("B").unwrap();
        let subtree = t.subtree_exclusive(p);
        assert_eq!(subtree.len(), 2);
        assert!(subtree.contains(&a) && subtree.contains(&b));
    }

    #[test]
    fn path_includes_lca_once() {
        let t = sample();
        let a = t.index_of("A").unwrap();
        let c = t.index_of("C").unwrap();
        let root = t.root();
        let path = t.path(a, c);
        assert_eq!(path.first(), Some(&a));
        assert_eq!(path.last(), Some(&c));
        assert_eq!(path.iter().filter(|&&i| i == root).count(), 1);
    }
}
