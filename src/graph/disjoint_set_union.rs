// disjoint set union over clique ids, used when clusters of a clique tree
// are coarsened. Elements need not be contiguous, so storage is keyed.
// See: https://www.cs.princeton.edu/~wayne/kleinberg-tardos/pdf/UnionFind-2x2.pdf

use super::CliqueId;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub(crate) struct DisjointSetUnion {
    parents: IndexMap<CliqueId, CliqueId>,
    sizes: IndexMap<CliqueId, usize>,
}

impl DisjointSetUnion {
    pub(crate) fn new<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = CliqueId>,
    {
        let parents: IndexMap<CliqueId, CliqueId> =
            elements.into_iter().map(|x| (x, x)).collect();
        let sizes = parents.keys().map(|&x| (x, 1)).collect();
        Self { parents, sizes }
    }

    /// joins the sets of `x` and `y`, hanging the smaller below the larger
    pub(crate) fn union(&mut self, x: CliqueId, y: CliqueId) {
        let (mut big, mut small) = (self.root(x), self.root(y));
        if big == small {
            return;
        }
        if self.sizes[&big] < self.sizes[&small] {
            std::mem::swap(&mut big, &mut small);
        }
        let moved = self.sizes[&small];
        self.parents[&small] = big;
        self.sizes[&big] += moved;
    }

    pub(crate) fn root(&mut self, x: CliqueId) -> CliqueId {
        let mut x = x;
        while self.parents[&x] != x {
            let grandparent = self.parents[&self.parents[&x]];
            self.parents[&x] = grandparent; //path halving
            x = grandparent;
        }
        x
    }

    /// the members of each set, keyed by the set's root, in element order
    pub(crate) fn sets(&mut self) -> IndexMap<CliqueId, Vec<CliqueId>> {
        let elements: Vec<CliqueId> = self.parents.keys().copied().collect();
        let mut sets: IndexMap<CliqueId, Vec<CliqueId>> = IndexMap::new();
        for x in elements {
            let r = self.root(x);
            sets.entry(r).or_default().push(x);
        }
        sets
    }
}

#[cfg(test)]
impl DisjointSetUnion {
    fn in_same_set(&mut self, x: CliqueId, y: CliqueId) -> bool {
        self.root(x) == self.root(y)
    }
}

#[test]
fn test_union_by_size() {
    let mut dsu = DisjointSetUnion::new(0..6);
    dsu.union(0, 1);
    dsu.union(0, 2);
    dsu.union(3, 4);

    // the pair {3,4} goes below the triple
    let triple = dsu.root(0);
    dsu.union(4, 1);
    assert_eq!(dsu.root(3), triple);
    assert!(dsu.in_same_set(2, 4));
    assert!(!dsu.in_same_set(5, 0));

    dsu.union(5, 5);
    assert_eq!(dsu.sets().len(), 2);
}

#[test]
fn test_sparse_ids() {
    let mut dsu = DisjointSetUnion::new([3, 10, 42, 7]);
    dsu.union(10, 7);
    assert!(dsu.in_same_set(7, 10));
    assert!(!dsu.in_same_set(3, 42));

    let sets = dsu.sets();
    assert_eq!(sets.len(), 3);
    let root = dsu.root(10);
    assert_eq!(sets[&root], vec![10, 7]);
}
