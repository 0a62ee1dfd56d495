//!
//! Tree passes that repair definition lists after the base builder has run.
//!
//! Each pass is a small, named transformation over the whole tree. The pipeline decides
//! which passes run and in which order; see [`crate::pipeline`].

use crate::mdast::Node;

mod cleanup;
mod coalescer;
mod detail_merger;
mod list_kind;
mod orphans;
mod prenormalize;
mod sibling_list;

pub use cleanup::Cleanup;
pub use coalescer::Coalescer;
pub use detail_merger::DetailMerger;
pub use list_kind::ListKindResolver;
pub use orphans::OrphanAbsorber;
pub use prenormalize::{PRENORMALIZER_NAME, Prenormalizer};
pub use sibling_list::SiblingListAbsorber;

/// Facts about the run that passes may depend on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassContext {
    /// The source text was rewritten by the pre-normalizer before the builder ran
    pub prenormalized: bool,
}

/// A tree transformation applied after the base builder.
pub trait Pass: Send + Sync {
    /// Stable name, used by `disable` in configuration
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn apply(&self, tree: &mut Node, ctx: &PassContext);

    /// Only the advanced variant runs this pass
    fn advanced_only(&self) -> bool {
        false
    }
}

/// Every tree pass in pipeline order.
pub fn all_passes() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(DetailMerger),
        Box::new(SiblingListAbsorber),
        Box::new(ListKindResolver),
        Box::new(Cleanup),
        Box::new(OrphanAbsorber),
        Box::new(Coalescer),
    ]
}

/// Names accepted by `disable`, the text pre-normalizer included.
pub fn known_names() -> Vec<&'static str> {
    std::iter::once(PRENORMALIZER_NAME)
        .chain(all_passes().iter().map(|pass| pass.name()))
        .collect()
}
