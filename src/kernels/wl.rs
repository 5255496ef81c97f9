//! Weisfeiler-Lehman kernels.
//!
//! Based on the paper:
//!     Shervashidze, Schweitzer, van Leeuwen, Mehlhorn, Borgwardt.
//!     Weisfeiler-Lehman graph kernels. JMLR 12, 2011.
//!
//! At each refinement height every node label is replaced by a canonical symbol derived from
//! its current label and the sorted multiset of its neighbours labels. Identical signatures
//! compress to identical symbols through an explicit [LabelCompressor] context, scoped to the
//! whole collection for the subtree variant and to a single pair for the sp variant.
//! Refinement never touches the input graphs : each height produces a fresh label layer.
//! The kernel accumulates a base contribution at every height 0..=height.


use anyhow::{anyhow, bail, Result};

use std::collections::HashMap;
use std::str::FromStr;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use ndarray::Array2;

use crate::basekernel::BaseKernels;
use crate::graph::LabeledGraph;
use crate::kernels::spkernel::structural_sp_kernel_pair;
use crate::parallel::parallel_gram;

/// the base kernel accumulated at each refinement height
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WlBase {
    /// dot product of label count vectors, the classical WL subtree kernel
    Subtree,
    /// shortest path kernel on the refined labels, pair scoped compression
    Sp,
    /// WL edge kernel. Not implemented
    Edge,
}

impl FromStr for WlBase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "subtree" => Ok(WlBase::Subtree),
            "sp" => Ok(WlBase::Sp),
            "edge" => Ok(WlBase::Edge),
            _ => Err(anyhow!(
                "base kernel name incorrect : {}. Available base kernels : subtree, sp, edge",
                s
            )),
        }
    }
} // end of impl FromStr for WlBase


/// The label compression context : maps neighbour multiset signatures to canonical symbols,
/// issuing a fresh symbol from a monotonic counter for every novel signature. Identical
/// multisets compress to identical symbols wherever the same context is threaded.
pub struct LabelCompressor {
    table: HashMap<String, u64, ahash::RandomState>,
    next_symbol: u64,
}

impl LabelCompressor {
    pub fn new() -> Self {
        LabelCompressor { table: HashMap::default(), next_symbol: 0 }
    }

    /// canonical symbol of a signature
    pub fn compress(&mut self, signature: &str) -> u64 {
        if let Some(&symbol) = self.table.get(signature) {
            return symbol;
        }
        let symbol = self.next_symbol;
        self.table.insert(signature.to_string(), symbol);
        self.next_symbol += 1;
        symbol
    }

    pub fn nb_symbols(&self) -> u64 {
        self.next_symbol
    }
} // end of impl LabelCompressor

impl Default for LabelCompressor {
    fn default() -> Self {
        Self::new()
    }
}


// label count vector of a graph, indexed by label
type LabelCounts = HashMap<String, u64, ahash::RandomState>;

fn initial_labels(g: &LabeledGraph) -> Vec<String> {
    (0..g.nb_nodes())
        .map(|n| g.get_node(n).get_label().unwrap_or("").to_string())
        .collect()
}

/// one refinement step : each node gets the compressed symbol of its
/// label + sorted neighbour multiset signature
fn refine_labels(g: &LabeledGraph, current: &[String], compressor: &mut LabelCompressor) -> Vec<String> {
    (0..g.nb_nodes())
        .map(|n| {
            let mut neighbour_labels: Vec<&str> =
                g.neighbors(n).iter().map(|&v| current[v].as_str()).collect();
            neighbour_labels.sort_unstable();
            let mut signature = current[n].clone();
            for l in neighbour_labels {
                signature.push('|');
                signature.push_str(l);
            }
            compressor.compress(&signature).to_string()
        })
        .collect()
} // end of refine_labels

fn count_labels(labels: &[String]) -> LabelCounts {
    let mut counts = LabelCounts::default();
    for l in labels {
        *counts.entry(l.clone()).or_insert(0) += 1;
    }
    counts
}

// bag of labels inner product. Labels absent from one side count 0, so only the
// intersection contributes
fn dot_counts(c1: &LabelCounts, c2: &LabelCounts) -> f64 {
    let (small, large) = if c1.len() <= c2.len() { (c1, c2) } else { (c2, c1) };
    small
        .iter()
        .filter_map(|(label, &n1)| large.get(label).map(|&n2| (n1 * n2) as f64))
        .sum()
} // end of dot_counts


/// Computes the Weisfeiler-Lehman kernel matrix of a graph collection.
///
/// The input graphs are left untouched : refinement builds label layers aside.
/// Returns the Gram matrix and the elapsed system time in seconds.
pub fn weisfeiler_lehman_kernel(
    graphs: &[LabeledGraph],
    height: usize,
    base: WlBase,
    n_jobs: usize,
) -> Result<(Array2<f64>, f64)> {
    let sys_now = SystemTime::now();
    let cpu_start = ProcessTime::now();
    let kmatrix = match base {
        WlBase::Subtree => wl_subtree(graphs, height, n_jobs)?,
        WlBase::Sp => parallel_gram(graphs.len(), n_jobs, |i, j| {
            wl_sp_pair(&graphs[i], &graphs[j], height)
        })?,
        WlBase::Edge => bail!("Weisfeiler-Lehman edge base kernel is not implemented"),
    };
    let sys_t = sys_now.elapsed().unwrap().as_secs_f64();
    log::info!(
        "Weisfeiler-Lehman {:?} kernel matrix of size {} built, sys time(s) {:.3e}, cpu time(s) {:.3e}",
        base,
        graphs.len(),
        sys_t,
        cpu_start.elapsed().as_secs_f64()
    );
    Ok((kmatrix, sys_t))
} // end of weisfeiler_lehman_kernel


// subtree variant : one compressor for the whole collection, so count vectors are
// comparable across graphs at every height
fn wl_subtree(graphs: &[LabeledGraph], height: usize, n_jobs: usize) -> Result<Array2<f64>> {
    let mut compressor = LabelCompressor::new();
    let mut labelings: Vec<Vec<String>> = graphs.iter().map(initial_labels).collect();
    // label count vectors per height per graph
    let mut counts_per_height: Vec<Vec<LabelCounts>> = Vec::with_capacity(height + 1);
    counts_per_height.push(labelings.iter().map(|l| count_labels(l)).collect());
    for h in 1..=height {
        labelings = graphs
            .iter()
            .zip(labelings.iter())
            .map(|(g, l)| refine_labels(g, l, &mut compressor))
            .collect();
        counts_per_height.push(labelings.iter().map(|l| count_labels(l)).collect());
        log::debug!("height {} : {} symbols issued", h, compressor.nb_symbols());
    }
    // the kernel is the sum over all heights of the count vector dot products
    parallel_gram(graphs.len(), n_jobs, |i, j| {
        Ok(counts_per_height.iter().map(|ch| dot_counts(&ch[i], &ch[j])).sum())
    })
} // end of wl_subtree


/// sp variant between 2 graphs : a pair scoped compressor refines both graphs together and a
/// shortest path kernel value (Dirac kernel on the current labels) is added at every height.
pub fn wl_sp_pair(g1: &LabeledGraph, g2: &LabeledGraph, height: usize) -> Result<f64> {
    let node_kernels = BaseKernels::dirac_gaussian(1.);
    let edge_kernels = BaseKernels::dirac_gaussian(1.);
    let mut compressor = LabelCompressor::new();
    let mut labels1 = initial_labels(g1);
    let mut labels2 = initial_labels(g2);
    let mut kernel = 0.;
    for h in 0..=height {
        if h > 0 {
            labels1 = refine_labels(g1, &labels1, &mut compressor);
            labels2 = refine_labels(g2, &labels2, &mut compressor);
        }
        let (k, _) = structural_sp_kernel_pair(
            &g1.with_node_labels(&labels1),
            &g2.with_node_labels(&labels2),
            false,
            &node_kernels,
            &edge_kernels,
        )?;
        kernel += k;
    }
    Ok(kernel)
} // end of wl_sp_pair


//==============================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::{EdgeData, NodeData};

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn graph_with(labels: &[&str], edges: &[(usize, usize)]) -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        for l in labels {
            g.add_node(NodeData::with_label(l));
        }
        for &(u, v) in edges {
            g.add_edge(u, v, EdgeData::unlabeled());
        }
        g
    }

    #[test]
    fn test_label_compressor() {
        log_init_test();
        let mut compressor = LabelCompressor::new();
        let s1 = compressor.compress("C|H|H");
        let s2 = compressor.compress("C|H|O");
        let s3 = compressor.compress("C|H|H");
        assert_eq!(s1, s3);
        assert_ne!(s1, s2);
        assert_eq!(compressor.nb_symbols(), 2);
    } // end of test_label_compressor

    #[test]
    fn test_wl_height0_ignores_edges() {
        log_init_test();
        // same node labels, different edge structure : identical kernel at height 0
        let labels = ["C", "C", "O", "H"];
        let g_path = graph_with(&labels, &[(0, 1), (1, 2), (2, 3)]);
        let g_star = graph_with(&labels, &[(0, 1), (0, 2), (0, 3)]);
        let g_other = graph_with(&labels, &[(0, 2), (1, 3)]);
        let gn = vec![g_path, g_star, g_other];
        let (k, _) = weisfeiler_lehman_kernel(&gn, 0, WlBase::Subtree, 1).unwrap();
        // bag of labels : 2*2 + 1 + 1 = 6 for every pair
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(k[[i, j]], 6.);
            }
        }
    } // end of test_wl_height0_ignores_edges

    #[test]
    fn test_wl_monotone_in_height() {
        log_init_test();
        let g1 = graph_with(&["C", "O", "C"], &[(0, 1), (1, 2)]);
        let g2 = graph_with(&["C", "O", "C"], &[(0, 1), (1, 2), (2, 0)]);
        let gn = vec![g1, g2];
        let mut previous = 0.;
        for height in 0..4 {
            let (k, _) = weisfeiler_lehman_kernel(&gn, height, WlBase::Subtree, 1).unwrap();
            assert!(crate::gram::is_symmetric(&k, 1.0e-12));
            assert!(k[[0, 1]] >= previous);
            previous = k[[0, 1]];
        }
    } // end of test_wl_monotone_in_height

    #[test]
    fn test_wl_identical_graphs_refine_identically(){
        log_init_test();
        let g1 = graph_with(&["C", "O", "C", "H"], &[(0, 1), (1, 2), (2, 3)]);
        let g2 = graph_with(&["C", "O", "C", "H"], &[(0, 1), (1, 2), (2, 3)]);
        let gn = vec![g1, g2];
        let (k, _) = weisfeiler_lehman_kernel(&gn, 2, WlBase::Subtree, 1).unwrap();
        // identical graphs keep identical count vectors at every height
        assert_eq!(k[[0, 0]], k[[0, 1]]);
        assert_eq!(k[[1, 1]], k[[0, 1]]);
    } // end of test_wl_identical_graphs_refine_identically

    #[test]
    fn test_wl_edge_base_unimplemented() {
        log_init_test();
        let gn = vec![graph_with(&["C"], &[])];
        assert!(weisfeiler_lehman_kernel(&gn, 1, WlBase::Edge, 1).is_err());
        assert!(WlBase::from_str("edge").is_ok());
        assert!(WlBase::from_str("bogus").is_err());
    } // end of test_wl_edge_base_unimplemented

    #[test]
    fn test_wl_sp_single_nodes() {
        log_init_test();
        // two identical single node graphs : the sp kernel is 1 at every height
        let g1 = graph_with(&["C"], &[]);
        let g2 = graph_with(&["C"], &[]);
        let height = 2;
        let kernel = wl_sp_pair(&g1, &g2, height).unwrap();
        assert!((kernel - (height + 1) as f64).abs() < 1.0e-12);
    } // end of test_wl_sp_single_nodes

    #[test]
    fn test_wl_sp_matrix_symmetric() {
        log_init_test();
        let gn = vec![
            graph_with(&["C", "O"], &[(0, 1)]),
            graph_with(&["C", "O", "C"], &[(0, 1), (1, 2)]),
            graph_with(&["C"], &[]),
        ];
        let (k, _) = weisfeiler_lehman_kernel(&gn, 1, WlBase::Sp, 2).unwrap();
        assert!(crate::gram::is_symmetric(&k, 1.0e-12));
        for i in 0..3 {
            assert!(k[[i, i]] >= 0.);
        }
    } // end of test_wl_sp_matrix_symmetric
} // end of mod tests
