//! # Occurrence Overlays
//!
//! Per-occurrence metadata for parameter values.
//!
//! The graph is read-only and shared: the same literal or node can appear in
//! many places. Flags such as "lazy" or "unique" belong to one occurrence of a
//! value in one resolution, so they live in an arena of overlay records next
//! to the graph instead of on the node.
//!
//! # Determinism
//! - `OverlayId` ordering is by its inner `u32`.
//! - Records are append-only; an id is never reused within one resolution.

use crate::graph::GraphStore;
use crate::range::check::Observed;
use crate::range::literal::Scalar;
use crate::{Literal, NodeId};

/// Dense overlay record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(u32);

/// A parameter value flowing through the pipeline: a graph node plus an
/// optional overlay describing this occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueRef {
    pub source: NodeId,
    pub overlay: Option<OverlayId>,
}

impl ValueRef {
    /// A plain occurrence of a graph node.
    #[must_use]
    pub const fn new(source: NodeId) -> Self {
        Self {
            source,
            overlay: None,
        }
    }
}

/// Metadata attached to one value occurrence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    /// Literal substituted for a variable node.
    pub literal: Option<Literal>,
    /// Native value produced by a literal range.
    pub cast: Option<Scalar>,
    /// Construction is deferred until the value is invoked.
    pub lazy: bool,
    /// The value is a single private instance, not a shared one.
    pub unique: bool,
}

/// Append-only arena of overlay records.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    records: Vec<Overlay>,
}

impl Overlays {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.records.get(id.0 as usize)
    }

    /// The overlay of a value occurrence, if it has one.
    #[must_use]
    pub fn overlay_of(&self, value: ValueRef) -> Option<&Overlay> {
        value.overlay.and_then(|id| self.get(id))
    }

    /// Derive a new occurrence of `value` with edited metadata.
    ///
    /// The previous overlay is copied, never modified, so other occurrences
    /// of the same node keep their own metadata.
    pub fn annotate(&mut self, value: ValueRef, edit: impl FnOnce(&mut Overlay)) -> ValueRef {
        let mut record = self.overlay_of(value).cloned().unwrap_or_default();
        edit(&mut record);
        let id = OverlayId(self.records.len() as u32);
        self.records.push(record);
        ValueRef {
            source: value.source,
            overlay: Some(id),
        }
    }

    #[must_use]
    pub fn is_unique(&self, value: ValueRef) -> bool {
        self.overlay_of(value).is_some_and(|o| o.unique)
    }

    #[must_use]
    pub fn is_lazy(&self, value: ValueRef) -> bool {
        self.overlay_of(value).is_some_and(|o| o.lazy)
    }

    /// Observe a value for range checking, preferring a substituted literal.
    pub fn observe<'a, G: GraphStore>(&'a self, graph: &'a G, value: ValueRef) -> Observed<'a> {
        match self.overlay_of(value).and_then(|o| o.literal.as_ref()) {
            Some(literal) => Observed::Literal(literal),
            None => Observed::of(graph, value.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Graph;

    #[test]
    fn annotate_creates_distinct_occurrences() {
        let mut graph = Graph::new();
        let node = graph.string("shared");
        let mut overlays = Overlays::new();

        let plain = ValueRef::new(node);
        let lazy = overlays.annotate(plain, |o| o.lazy = true);
        let unique = overlays.annotate(lazy, |o| o.unique = true);

        assert_eq!(overlays.len(), 2);
        assert_ne!(lazy, unique);
        assert_eq!(lazy.source, unique.source);
        assert!(overlays.is_lazy(lazy) && !overlays.is_unique(lazy));
        assert!(overlays.is_lazy(unique) && overlays.is_unique(unique));
        assert!(!overlays.is_lazy(plain));
    }

    #[test]
    fn observe_prefers_substitution() {
        let mut graph = Graph::new();
        let variable = graph.named("urn:var");
        let mut overlays = Overlays::new();
        let plain = ValueRef::new(variable);
        assert_eq!(overlays.observe(&graph, plain), Observed::Node(variable));

        let substituted = overlays.annotate(plain, |o| o.literal = Some(Literal::string("v")));
        assert!(matches!(
            overlays.observe(&graph, substituted),
            Observed::Literal(l) if l.value == "v"
        ));
    }
}
