mod edge_set;
mod event;
mod forest;
pub mod judge;

pub use edge_set::EdgeDeltaSet;
pub use event::{Edge, EdgeRole, Events, MutationEvent};
pub use forest::{CutError, LinkCutForest};
