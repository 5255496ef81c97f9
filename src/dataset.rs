//! Dataset attribute inspection.
//!
//! A graph collection is scanned once to know which of the labeled/attributed code paths
//! every kernel engine must take. The result is a small read only record, and the 8 possible
//! node x edge combinations are summarized by the [LabelShape] enum so call sites dispatch
//! with one exhaustive match instead of nested boolean tests.


use crate::graph::LabeledGraph;

/// how the nodes (or the edges) of a collection are decorated
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LabelShape {
    /// neither symbolic labels nor numeric attributes
    Unlabeled,
    /// symbolic labels only
    SymbolicOnly,
    /// numeric attribute vectors only
    AttributedOnly,
    /// both symbolic labels and numeric attributes
    Mixed,
} // end of LabelShape


fn shape_of(labeled: bool, attr_dim: usize) -> LabelShape {
    match (labeled, attr_dim > 0) {
        (false, false) => LabelShape::Unlabeled,
        (true, false) => LabelShape::SymbolicOnly,
        (false, true) => LabelShape::AttributedOnly,
        (true, true) => LabelShape::Mixed,
    }
}

/// the classification of a graph collection. Computed once, read by every engine.
#[derive(Copy, Clone, Debug)]
pub struct DatasetAttributes {
    pub node_labeled: bool,
    pub node_attr_dim: usize,
    pub edge_labeled: bool,
    pub edge_attr_dim: usize,
    pub is_directed: bool,
}

impl DatasetAttributes {
    /// scan a collection. An empty collection gives all flags false and dimensions 0.
    pub fn from_graphs(gn: &[LabeledGraph]) -> Self {
        let mut attrs = DatasetAttributes {
            node_labeled: false,
            node_attr_dim: 0,
            edge_labeled: false,
            edge_attr_dim: 0,
            is_directed: false,
        };
        for g in gn {
            if g.is_directed() {
                attrs.is_directed = true;
            }
            for n in 0..g.nb_nodes() {
                let data = g.get_node(n);
                if data.get_label().is_some() {
                    attrs.node_labeled = true;
                }
                attrs.node_attr_dim = attrs.node_attr_dim.max(data.get_attributes().len());
            }
            for (_, _, data) in g.edges() {
                if data.get_label().is_some() {
                    attrs.edge_labeled = true;
                }
                attrs.edge_attr_dim = attrs.edge_attr_dim.max(data.get_attributes().len());
            }
        }
        log::debug!("dataset attributes : {:?}", attrs);
        attrs
    } // end of from_graphs

    pub fn node_shape(&self) -> LabelShape {
        shape_of(self.node_labeled, self.node_attr_dim)
    }

    pub fn edge_shape(&self) -> LabelShape {
        shape_of(self.edge_labeled, self.edge_attr_dim)
    }
} // end of impl DatasetAttributes


//==============================================================================

// end of mod tests
