/// Tarjan's Union-Find data structure over the dense index space `0..len`.
///
/// The size is fixed at construction: every element starts in its own
/// singleton set. `find_set` compresses paths, `union_set` unions by rank.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet {
    /// Parent of each element, in continuous memory. Roots point to themselves.
    parent: Vec<usize>,
    /// Upper bound on the height of the tree rooted at each element.
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        DisjointSet {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of the subset in which `x` is,
    /// flattening the path from `x` to it.
    ///
    /// # Panics
    ///
    /// Will panic if `x` is out of range.
    pub fn find_set(&mut self, x: usize) -> usize {
        let root = self.find(x);
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Returns the representative of the subset in which `x` is,
    /// without modifying the structure.
    ///
    /// # Panics
    ///
    /// Will panic if `x` is out of range.
    pub fn find(&self, x: usize) -> usize {
        let mut node = x;
        while self.parent[node] != node {
            node = self.parent[node];
        }
        node
    }

    /// Union the subsets to which `x` and `y` belong.
    /// Returns the representative of the unified subset.
    pub fn union_set(&mut self, x: usize, y: usize) -> usize {
        let x_root = self.find_set(x);
        let y_root = self.find_set(y);
        if x_root == y_root {
            return x_root;
        }
        match self.rank[x_root].cmp(&self.rank[y_root]) {
            std::cmp::Ordering::Less => {
                self.parent[x_root] = y_root;
                y_root
            }
            std::cmp::Ordering::Greater => {
                self.parent[y_root] = x_root;
                x_root
            }
            std::cmp::Ordering::Equal => {
                self.parent[y_root] = x_root;
                self.rank[x_root] += 1;
                x_root
            }
        }
    }

    /// Whether `x` and `y` belong to the same subset.
    pub fn same_set(&self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}

#[test]
fn it_works() {
    let mut ds = DisjointSet::new(6);

    assert!(ds.find(1) != ds.find(2));
    assert!(ds.find(2) != ds.find(3));
    ds.union_set(1, 2);
    ds.union_set(2, 3);
    assert!(ds.find_set(1) == ds.find_set(3));

    assert!(!ds.same_set(0, 4));
    ds.union_set(5, 4);
    assert!(ds.find(5) != ds.find(3));

    ds.union_set(4, 2);
    assert!(ds.same_set(5, 1));
    assert!(!ds.same_set(0, 1));
}

#[test]
fn repeated_union_keeps_representative() {
    let mut ds = DisjointSet::new(4);
    let root = ds.union_set(0, 1);
    assert_eq!(ds.union_set(1, 0), root);
    assert_eq!(ds.find(0), ds.find(1));
    assert_eq!(ds.len(), 4);
}
