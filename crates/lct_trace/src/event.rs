//! Mutation event stream types.
//!
//! Forest operations mutate the node arena eagerly and append one record
//! per `push`, `toggle` and `rotate`, plus a structural record per
//! top-level call. Each top-level operation returns an [`Events`] drain
//! over the accumulated records; the `&mut` borrow it holds keeps the
//! forest untouchable until the stream is consumed (or dropped, which
//! discards the rest; the mutations already happened either way).

/// Role an auxiliary-tree edge plays at the moment it is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeRole {
    /// Solid edge: child sits in its parent's left slot.
    Left,
    /// Solid edge: child sits in its parent's right slot.
    Right,
    /// Path-parent edge: parent pointer of a splay-root, not
    /// reciprocated by a child slot.
    Light,
}

/// Directed `(from, to, role)` triple; `from` is the lower endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
    pub role: EdgeRole,
}

impl Edge {
    pub fn new(from: u32, to: u32, role: EdgeRole) -> Self {
        Self { from, to, role }
    }
}

/// One structural-delta record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationEvent {
    VertexAdded {
        vertex: u32,
    },
    EdgeAdded(Edge),
    EdgeRemoved(Edge),
    /// A single rotation: the nodes it touched and the exact edge diff
    /// around them. `added` and `removed` are disjoint.
    Rotation {
        nodes: Vec<u32>,
        added: Vec<Edge>,
        removed: Vec<Edge>,
    },
    ReversalToggled {
        vertex: u32,
    },
    LazyPushed {
        vertex: u32,
    },
}

/// Single-pass event stream of one top-level forest operation.
pub type Events<'a> = std::vec::Drain<'a, MutationEvent>;
