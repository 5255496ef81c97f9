//! The kernel engines.
//!
//! Each engine exposes a compute function taking a graph collection and options and returning
//! a Gram matrix together with the elapsed system time in seconds. Pairwise work goes through
//! [crate::parallel::parallel_gram].

pub mod randomwalk;
pub mod spkernel;
pub mod wl;

use std::collections::HashMap;

use crate::basekernel::BaseKernels;
use crate::dataset::LabelShape;
use crate::graph::LabeledGraph;

/// hashed lookup tables on node or edge pair indices are on the hot path of every engine
pub(crate) type PairMap<K> = HashMap<K, f64, ahash::RandomState>;

/// Decide whether stored edge weights will be used. A request for weights on a collection
/// whose edges carry none falls back to unit weights with a warning, never an error.
pub(crate) fn resolve_edge_weight(gn: &[LabeledGraph], requested: bool) -> bool {
    if !requested {
        log::info!("no edge weight specified, all weights set to 1");
        return false;
    }
    let some_weight = gn
        .iter()
        .flat_map(|g| g.edges())
        .next()
        .and_then(|(_, _, data)| data.get_weight());
    if some_weight.is_some() {
        true
    } else {
        log::warn!("edge weight requested but not found in the edge data, all weights set to 1");
        false
    }
} // end of resolve_edge_weight

/// Vertex kernel lookup table over the node cross product of 2 graphs (the FCSP factoring :
/// each node pair is evaluated once and reused across all substructure comparisons).
/// Empty for an unlabeled collection.
pub(crate) fn compute_vertex_kernels(
    g1: &LabeledGraph,
    g2: &LabeledGraph,
    shape: LabelShape,
    node_kernels: &BaseKernels,
) -> PairMap<(usize, usize)> {
    let mut vk_dict = PairMap::<(usize, usize)>::default();
    if shape == LabelShape::Unlabeled {
        return vk_dict;
    }
    for n1 in 0..g1.nb_nodes() {
        let d1 = g1.get_node(n1);
        for n2 in 0..g2.nb_nodes() {
            let d2 = g2.get_node(n2);
            let kernel = match shape {
                LabelShape::Unlabeled => unreachable!(),
                LabelShape::SymbolicOnly => {
                    (node_kernels.symb)(d1.get_label().unwrap_or(""), d2.get_label().unwrap_or(""))
                }
                LabelShape::AttributedOnly => {
                    (node_kernels.nsymb)(d1.get_attributes(), d2.get_attributes())
                }
                LabelShape::Mixed => (node_kernels.mix)(
                    d1.get_label().unwrap_or(""),
                    d2.get_label().unwrap_or(""),
                    d1.get_attributes(),
                    d2.get_attributes(),
                ),
            };
            vk_dict.insert((n1, n2), kernel);
        }
    }
    vk_dict
} // end of compute_vertex_kernels
