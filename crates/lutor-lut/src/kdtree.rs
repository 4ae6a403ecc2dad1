//! Static k-d tree over 8-bit RGB points.
//!
//! Nearest-neighbor search is exact and ordered by `(squared distance,
//! insertion index)`, so equal distances resolve to the earliest sample. The
//! result is identical to a full linear scan ([`brute_force_nearest`]); the
//! tree only skips subtrees that cannot contain a better candidate.
//!
//! The tree is implicit: points are permuted in place so that every slice
//! `[lo, hi)` has its splitting node at `lo + (hi - lo) / 2`, with smaller or
//! equal coordinates on the left and larger or equal on the right.

use lutor_core::Rgb8;

/// A neighbor returned by a k-NN query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Index of the point in the slice the tree was built from.
    pub index: usize,
    /// Squared Euclidean distance to the query.
    pub distance_sq: u32,
}

impl Neighbor {
    #[inline]
    fn key(&self) -> (u32, usize) {
        (self.distance_sq, self.index)
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    point: [i32; 3],
    index: usize,
}

/// Exact k-NN index over a fixed set of colors.
#[derive(Debug, Clone)]
pub struct KdTree {
    nodes: Vec<Node>,
}

#[inline]
fn distance_sq(a: [i32; 3], b: [i32; 3]) -> u32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db) as u32
}

#[inline]
fn widen(c: Rgb8) -> [i32; 3] {
    [c[0] as i32, c[1] as i32, c[2] as i32]
}

/// Inserts `cand` into the sorted `best` list, keeping at most `k` entries.
#[inline]
fn offer(best: &mut Vec<Neighbor>, k: usize, cand: Neighbor) {
    if best.len() == k {
        match best.last() {
            Some(worst) if cand.key() < worst.key() => {
                best.pop();
            }
            _ => return,
        }
    }
    let pos = best.partition_point(|n| n.key() < cand.key());
    best.insert(pos, cand);
}

impl KdTree {
    /// Builds the tree. Indices in query results refer to `points`.
    pub fn build(points: &[Rgb8]) -> Self {
        let mut nodes: Vec<Node> = points
            .iter()
            .enumerate()
            .map(|(index, &c)| Node {
                point: widen(c),
                index,
            })
            .collect();
        Self::split(&mut nodes, 0);
        Self { nodes }
    }

    fn split(nodes: &mut [Node], depth: usize) {
        if nodes.len() <= 1 {
            return;
        }
        let axis = depth % 3;
        let mid = nodes.len() / 2;
        nodes.select_nth_unstable_by_key(mid, |n| n.point[axis]);
        let (left, right) = nodes.split_at_mut(mid);
        Self::split(left, depth + 1);
        Self::split(&mut right[1..], depth + 1);
    }

    /// Number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The `k` nearest points to `query`, closest first.
    pub fn nearest(&self, query: Rgb8, k: usize) -> Vec<Neighbor> {
        let mut best = Vec::with_capacity(k + 1);
        self.nearest_into(query, k, &mut best);
        best
    }

    /// Like [`nearest`](Self::nearest) but reuses `best` as the output buffer.
    pub fn nearest_into(&self, query: Rgb8, k: usize, best: &mut Vec<Neighbor>) {
        best.clear();
        if k == 0 {
            return;
        }
        self.search(0, self.nodes.len(), 0, widen(query), k, best);
    }

    fn search(&self, lo: usize, hi: usize, depth: usize, q: [i32; 3], k: usize, best: &mut Vec<Neighbor>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let node = self.nodes[mid];
        offer(
            best,
            k,
            Neighbor {
                index: node.index,
                distance_sq: distance_sq(node.point, q),
            },
        );

        let axis = depth % 3;
        let diff = q[axis] - node.point[axis];
        let (near, far) = if diff < 0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(near.0, near.1, depth + 1, q, k, best);

        // Equal plane distance can still hold an earlier-index tie.
        let plane = (diff * diff) as u32;
        let need_far = best.len() < k || best.last().is_some_and(|w| plane <= w.distance_sq);
        if need_far {
            self.search(far.0, far.1, depth + 1, q, k, best);
        }
    }
}

/// Linear-scan k-NN with the same ordering as [`KdTree::nearest`].
pub fn brute_force_nearest(points: &[Rgb8], query: Rgb8, k: usize) -> Vec<Neighbor> {
    let q = widen(query);
    let mut all: Vec<Neighbor> = points
        .iter()
        .enumerate()
        .map(|(index, &c)| Neighbor {
            index,
            distance_sq: distance_sq(widen(c), q),
        })
        .collect();
    all.sort_unstable_by_key(Neighbor::key);
    all.truncate(k);
    all
}
