use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SIZES: [usize; 3] = [1_024, 4_096, 16_384];
pub const OPS_PER_SIZE: usize = 2_000;
pub const VALUE_RANGE: std::ops::RangeInclusive<i64> = -1_000_000..=1_000_000;
pub const DELTA_RANGE: std::ops::RangeInclusive<i64> = -1_000..=1_000;

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

fn rng_for(kind: u64, size: usize) -> StdRng {
    let seed = 0x1C7_2026_u64
        ^ kind.wrapping_mul(SEED_MIX)
        ^ (size as u64).wrapping_mul(SEED_MIX.rotate_left(23));
    StdRng::seed_from_u64(seed)
}

pub fn generate_values(rng: &mut impl Rng, n: usize) -> Vec<i64> {
    (0..n).map(|_| rng.random_range(VALUE_RANGE)).collect()
}

/// Random rooted tree as `(child, parent)` link pairs.
pub fn generate_tree_edges(rng: &mut impl Rng, n: usize) -> Vec<(usize, usize)> {
    (1..n).map(|i| (i, rng.random_range(0..i))).collect()
}

#[derive(Clone, Copy, Debug)]
pub enum PathOp {
    VertexAdd { v: usize, delta: i64 },
    PathAdd { u: usize, v: usize, delta: i64 },
    PathSum { u: usize, v: usize },
}

/// Edge replacement keeping the forest a single tree: cut `v` from its
/// current parent, then link it under `new_parent` (outside `v`'s
/// component at that point).
#[derive(Clone, Copy, Debug)]
pub struct Relink {
    pub v: usize,
    pub new_parent: usize,
}

pub struct PathCase {
    pub values: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub ops: Vec<PathOp>,
}

pub fn generate_path_case(size: usize) -> PathCase {
    let mut rng = rng_for(1, size);
    let values = generate_values(&mut rng, size);
    let edges = generate_tree_edges(&mut rng, size);
    let ops = (0..OPS_PER_SIZE)
        .map(|_| {
            let u = rng.random_range(0..size);
            let v = rng.random_range(0..size);
            match rng.random_range(0..3) {
                0 => PathOp::VertexAdd {
                    v,
                    delta: rng.random_range(DELTA_RANGE),
                },
                1 => PathOp::PathAdd {
                    u,
                    v,
                    delta: rng.random_range(DELTA_RANGE),
                },
                _ => PathOp::PathSum { u, v },
            }
        })
        .collect();
    PathCase { values, edges, ops }
}

pub struct RelinkCase {
    pub values: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub ops: Vec<Relink>,
}

/// Mirrors the forest semantics offline: `link(child, parent)` everts
/// the child first, so the model re-roots the child's component before
/// attaching it.
pub fn generate_relink_case(size: usize) -> RelinkCase {
    let mut rng = rng_for(2, size);
    let values = generate_values(&mut rng, size);
    let edges = generate_tree_edges(&mut rng, size);

    let mut parent = vec![usize::MAX; size];
    for &(c, p) in &edges {
        evert_model(&mut parent, c);
        parent[c] = p;
    }

    let mut ops = Vec::with_capacity(OPS_PER_SIZE);
    for _ in 0..OPS_PER_SIZE {
        let v = loop {
            let v = rng.random_range(0..size);
            if parent[v] != usize::MAX {
                break v;
            }
        };
        parent[v] = usize::MAX;
        let new_parent = loop {
            let u = rng.random_range(0..size);
            if !reaches(&parent, u, v) {
                break u;
            }
        };
        evert_model(&mut parent, v);
        parent[v] = new_parent;
        ops.push(Relink { v, new_parent });
    }
    RelinkCase { values, edges, ops }
}

fn evert_model(parent: &mut [usize], v: usize) {
    let mut prev = usize::MAX;
    let mut cur = v;
    while cur != usize::MAX {
        let next = parent[cur];
        parent[cur] = prev;
        prev = cur;
        cur = next;
    }
}

/// Whether walking parent pointers from `u` reaches `v`.
fn reaches(parent: &[usize], u: usize, v: usize) -> bool {
    let mut cur = u;
    while cur != usize::MAX {
        if cur == v {
            return true;
        }
        cur = parent[cur];
    }
    false
}
