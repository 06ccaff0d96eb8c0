use thiserror::Error;

use crate::edge_set::EdgeDeltaSet;
use crate::event::{Edge, EdgeRole, Events, MutationEvent};

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Id(u32);

impl Id {
    const NIL: Self = Self(u32::MAX);

    #[inline(always)]
    fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[inline(always)]
fn id(v: usize) -> Id {
    debug_assert!(v < u32::MAX as usize);
    Id(v as u32)
}

#[derive(Clone, Copy, Debug)]
struct Node {
    ch: [Id; 2],
    p: Id,
    rev: bool,

    value: i64,
    sum: i64,
    sz: u32,

    lazy: i64,
}

impl Node {
    fn new(value: i64) -> Self {
        Self {
            ch: [Id::NIL, Id::NIL],
            p: Id::NIL,
            rev: false,
            value,
            sum: value,
            sz: 1,
            lazy: 0,
        }
    }
}

/// Cutting a vertex whose exposed path has no vertex above it: the
/// vertex is the root of its represented tree, so there is no parent
/// edge to remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("vertex {vertex} has no parent edge")]
pub struct CutError {
    pub vertex: usize,
}

/// Dynamic forest of rooted trees under link/cut/evert with vertex-sum
/// path queries, backed by splay trees over preferred paths.
///
/// Every structural mutation is recorded in a [`MutationEvent`] trace;
/// each top-level operation returns the drain of the records it
/// produced, which must be consumed (or dropped) before the next call.
pub struct LinkCutForest {
    nodes: Vec<Node>,
    events: Vec<MutationEvent>,
}

impl LinkCutForest {
    pub fn new(values: &[i64]) -> Self {
        let mut nodes = Vec::with_capacity(values.len());
        for &v in values {
            debug_assert!(nodes.len() < u32::MAX as usize);
            nodes.push(Node::new(v));
        }
        Self {
            nodes,
            events: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    fn node(&self, x: Id) -> &Node {
        debug_assert!(!x.is_nil());
        debug_assert!(x.idx() < self.nodes.len());
        if cfg!(debug_assertions) {
            &self.nodes[x.idx()]
        } else {
            // SAFETY: `Id` values are only created from valid indices and `NIL` is checked.
            unsafe { self.nodes.get_unchecked(x.idx()) }
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, x: Id) -> &mut Node {
        debug_assert!(!x.is_nil());
        debug_assert!(x.idx() < self.nodes.len());
        if cfg!(debug_assertions) {
            &mut self.nodes[x.idx()]
        } else {
            // SAFETY: `Id` values are only created from valid indices and `NIL` is checked.
            unsafe { self.nodes.get_unchecked_mut(x.idx()) }
        }
    }

    /// A node heads its auxiliary tree iff its parent pointer is absent
    /// or not reciprocated by a child slot (path-parent edge).
    fn is_aux_root(&self, x: Id) -> bool {
        let p = self.node(x).p;
        if p.is_nil() {
            return true;
        }
        self.node(p).ch[0] != x && self.node(p).ch[1] != x
    }

    fn apply_rev(&mut self, x: Id) {
        if x.is_nil() {
            return;
        }
        let nx = self.node_mut(x);
        nx.ch.swap(0, 1);
        nx.rev ^= true;
    }

    /// Lazily add `delta` to every value in `x`'s auxiliary subtree:
    /// the node takes it immediately, the children on their next push.
    fn apply_add(&mut self, x: Id, delta: i64) {
        if x.is_nil() {
            return;
        }
        let nx = self.node_mut(x);
        nx.value = nx.value.wrapping_add(delta);
        nx.sum = nx.sum.wrapping_add(delta.wrapping_mul(nx.sz as i64));
        nx.lazy = nx.lazy.wrapping_add(delta);
    }

    /// Flush pending flags onto the children and record the flush.
    fn push(&mut self, x: Id) {
        let (l, r, lazy, rev) = {
            let nx = self.node(x);
            (nx.ch[0], nx.ch[1], nx.lazy, nx.rev)
        };
        if lazy != 0 {
            self.apply_add(l, lazy);
            self.apply_add(r, lazy);
        }
        if rev {
            self.apply_rev(l);
            self.apply_rev(r);
        }
        let nx = self.node_mut(x);
        nx.lazy = 0;
        nx.rev = false;
        self.events.push(MutationEvent::LazyPushed { vertex: x.0 });
    }

    /// Recompute `sz`/`sum` from the children. Valid only once pending
    /// flags above `x` have been pushed down to it.
    fn pull(&mut self, x: Id) {
        let (l, r, value) = {
            let nx = self.node(x);
            (nx.ch[0], nx.ch[1], nx.value)
        };
        let mut sz = 1_u32;
        let mut sum = value;
        if !l.is_nil() {
            let nl = self.node(l);
            sz = sz.wrapping_add(nl.sz);
            sum = sum.wrapping_add(nl.sum);
        }
        if !r.is_nil() {
            let nr = self.node(r);
            sz = sz.wrapping_add(nr.sz);
            sum = sum.wrapping_add(nr.sum);
        }
        let nx = self.node_mut(x);
        nx.sz = sz;
        nx.sum = sum;
    }

    /// Mark `x`'s auxiliary subtree reversed and record the flip.
    fn toggle(&mut self, x: Id) {
        self.apply_rev(x);
        self.events.push(MutationEvent::ReversalToggled { vertex: x.0 });
    }

    /// Solid child edges of each participant, plus the light parent
    /// edge of whichever participant heads its auxiliary tree. Every
    /// recorded edge has its upper endpoint among the participants.
    fn aux_edges(&self, parts: [Id; 3]) -> EdgeDeltaSet {
        let mut set = EdgeDeltaSet::new();
        for n in parts {
            if n.is_nil() {
                continue;
            }
            let node = self.node(n);
            for (slot, role) in [(0, EdgeRole::Left), (1, EdgeRole::Right)] {
                let ch = node.ch[slot];
                if !ch.is_nil() {
                    set.insert(Edge::new(ch.0, n.0, role));
                }
            }
            if !node.p.is_nil() && self.is_aux_root(n) {
                set.insert(Edge::new(n.0, node.p.0, EdgeRole::Light));
            }
        }
        set
    }

    /// One splay rotation promoting `x` above its parent, preserving
    /// in-order path order. The emitted record carries the exact edge
    /// diff around `x`, its old parent and its old grandparent.
    fn rotate(&mut self, x: Id) {
        debug_assert!(!self.is_aux_root(x), "rotating the head of an auxiliary tree");
        let p = self.node(x).p;
        let g = self.node(p).p;

        let parts = [x, p, g];
        let pre = self.aux_edges(parts);

        let side = usize::from(self.node(p).ch[1] == x);
        let b = self.node(x).ch[side ^ 1];

        self.node_mut(p).ch[side] = b;
        if !b.is_nil() {
            self.node_mut(b).p = p;
        }
        self.node_mut(x).ch[side ^ 1] = p;
        self.node_mut(p).p = x;
        self.node_mut(x).p = g;
        self.pull(p);
        self.pull(x);
        if !g.is_nil() {
            if self.node(g).ch[0] == p {
                self.node_mut(g).ch[0] = x;
                self.pull(g);
            } else if self.node(g).ch[1] == p {
                self.node_mut(g).ch[1] = x;
                self.pull(g);
            }
        }

        let post = self.aux_edges(parts);
        let added = post.diff(&pre).into_vec();
        let removed = pre.diff(&post).into_vec();
        let nodes = parts.iter().filter(|n| !n.is_nil()).map(|n| n.0).collect();
        self.events.push(MutationEvent::Rotation {
            nodes,
            added,
            removed,
        });
    }

    /// Push pending flags along the auxiliary-tree path from its head
    /// down to `x`. Afterwards the children of every node on the path,
    /// `x` included, are settled and safe to read.
    fn push_path(&mut self, x: Id) {
        let mut path = Vec::new();
        let mut cur = x;
        loop {
            path.push(cur);
            if self.is_aux_root(cur) {
                break;
            }
            cur = self.node(cur).p;
        }
        while let Some(n) = path.pop() {
            self.push(n);
        }
    }

    /// Rotate `x` to the head of its auxiliary tree. The whole access
    /// path is pushed first, so the zig / zig-zig / zig-zag rotations
    /// run over settled children.
    fn splay(&mut self, x: Id) {
        self.push_path(x);
        while !self.is_aux_root(x) {
            let p = self.node(x).p;
            if self.is_aux_root(p) {
                self.rotate(x);
            } else {
                let g = self.node(p).p;
                let zigzig = (self.node(g).ch[0] == p) == (self.node(p).ch[0] == x);
                if zigzig {
                    self.rotate(p);
                } else {
                    self.rotate(x);
                }
                self.rotate(x);
            }
        }
    }

    fn expose_inner(&mut self, x: Id) {
        let mut r = Id::NIL;
        let mut cur = x;
        while !cur.is_nil() {
            self.splay(cur);
            let prev = self.node(cur).ch[1];
            if prev != r {
                // The old preferred child drops to a light edge; the
                // path built so far becomes the solid right child.
                self.node_mut(cur).ch[1] = r;
                if !r.is_nil() {
                    self.node_mut(r).p = cur;
                }
                self.pull(cur);
                if !prev.is_nil() {
                    self.events
                        .push(MutationEvent::EdgeRemoved(Edge::new(prev.0, cur.0, EdgeRole::Right)));
                    self.events
                        .push(MutationEvent::EdgeAdded(Edge::new(prev.0, cur.0, EdgeRole::Light)));
                }
                if !r.is_nil() {
                    self.events
                        .push(MutationEvent::EdgeRemoved(Edge::new(r.0, cur.0, EdgeRole::Light)));
                    self.events
                        .push(MutationEvent::EdgeAdded(Edge::new(r.0, cur.0, EdgeRole::Right)));
                }
            }
            r = cur;
            cur = self.node(cur).p;
        }
        // The splay pushes the whole access path, so callers may read
        // and detach the target's children directly.
        self.splay(x);
        debug_assert!(self.node(x).ch[1].is_nil());
    }

    fn evert_inner(&mut self, x: Id) {
        self.expose_inner(x);
        self.toggle(x);
        self.push(x);
    }

    fn drain(&mut self) -> Events<'_> {
        self.events.drain(..)
    }

    /// Append an isolated vertex; returns its id and the trace.
    pub fn append_node(&mut self, value: i64) -> (usize, Events<'_>) {
        let v = self.nodes.len();
        debug_assert!(v < u32::MAX as usize);
        self.nodes.push(Node::new(value));
        self.events.push(MutationEvent::VertexAdded { vertex: v as u32 });
        (v, self.drain())
    }

    /// Make the root-to-`v` path the current auxiliary tree, headed by
    /// `v` with no right child.
    pub fn expose(&mut self, v: usize) -> Events<'_> {
        debug_assert!(v < self.len());
        self.expose_inner(id(v));
        self.drain()
    }

    /// Re-root `v`'s represented tree at `v` by reversing the exposed
    /// root-to-`v` path.
    pub fn evert(&mut self, v: usize) -> Events<'_> {
        debug_assert!(v < self.len());
        self.evert_inner(id(v));
        self.drain()
    }

    /// Attach `child`'s tree below `parent`.
    ///
    /// `child` and `parent` must be in different trees; linking within
    /// one tree silently corrupts the forest and is not detected.
    pub fn link(&mut self, child: usize, parent: usize) -> Events<'_> {
        debug_assert!(child < self.len() && parent < self.len());
        let c = id(child);
        let p = id(parent);
        self.evert_inner(c);
        self.expose_inner(c);
        self.expose_inner(p);
        self.node_mut(c).p = p;
        self.node_mut(p).ch[1] = c;
        self.pull(p);
        self.events
            .push(MutationEvent::EdgeAdded(Edge::new(c.0, p.0, EdgeRole::Right)));
        self.drain()
    }

    /// Remove the edge between `v` and its parent in the represented
    /// tree. Fails if `v` is the root of its tree; the check is
    /// structural (after exposing, the left child of `v` is exactly its
    /// represented parent). On failure the partial trace is discarded.
    pub fn cut(&mut self, v: usize) -> Result<Events<'_>, CutError> {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose_inner(x);
        let l = self.node(x).ch[0];
        if l.is_nil() {
            self.events.clear();
            return Err(CutError { vertex: v });
        }
        self.node_mut(x).ch[0] = Id::NIL;
        self.pull(x);
        self.node_mut(l).p = Id::NIL;
        self.events
            .push(MutationEvent::EdgeRemoved(Edge::new(l.0, x.0, EdgeRole::Left)));
        Ok(self.drain())
    }

    /// Add `delta` to the value at `v` only.
    pub fn vertex_add(&mut self, v: usize, delta: i64) -> Events<'_> {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose_inner(x);
        let nx = self.node_mut(x);
        nx.value = nx.value.wrapping_add(delta);
        self.pull(x);
        self.drain()
    }

    /// Add `delta` to every vertex on the exposed root-to-`v` path.
    pub fn path_add(&mut self, v: usize, delta: i64) -> Events<'_> {
        debug_assert!(v < self.len());
        let x = id(v);
        self.expose_inner(x);
        self.apply_add(x, delta);
        self.push(x);
        self.drain()
    }

    /// Sum over the currently exposed path headed by `v`. The caller
    /// composes `evert(u); expose(v)` beforehand to query the u-v path.
    pub fn path_sum(&self, v: usize) -> i64 {
        debug_assert!(v < self.len());
        debug_assert!(
            self.is_aux_root(id(v)),
            "path_sum target must head the exposed path"
        );
        self.node(id(v)).sum
    }
}
