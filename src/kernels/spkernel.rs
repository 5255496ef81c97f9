//! Mean average structural shortest path kernel.
//!
//! Based on the paper:
//!     Suard F, Rakotomamonjy A, Bensrhair A.
//!     Kernel on Bag of Paths For Measuring Similarity of Shapes. ESANN 2007.
//!
//! For every graph the list of all shortest paths between all node pairs is computed once
//! (plus every single node as a length 0 path). The kernel between 2 graphs is the mean over
//! all pairs of equal length paths of the product of vertex kernels along corresponding
//! positions times edge kernels along corresponding segments. Vertex and edge kernel values
//! are precomputed in lookup tables over the node and edge cross products (FCSP factoring).


use anyhow::Result;

use std::collections::BinaryHeap;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use ndarray::Array2;
use rayon::prelude::*;

use super::{compute_vertex_kernels, resolve_edge_weight, PairMap};
use crate::basekernel::BaseKernels;
use crate::dataset::{DatasetAttributes, LabelShape};
use crate::graph::LabeledGraph;
use crate::parallel::parallel_gram;

/// tolerance on distance comparisons when enumerating equal length shortest paths
const DIST_EPS: f64 = 1.0e-9;

/// Computes the shortest path kernel matrix of a graph collection.
///
/// * use_edge_weight : use the stored edge weight in shortest path computations. Falls back
///   to unit weights with a warning when edges carry no weight.
/// * node_kernels, edge_kernels : base kernel tables, dispatched on the dataset label shape.
/// * n_jobs : worker count for the pairwise dispatch, 0 means one per cpu, 1 sequential.
///
/// Returns the Gram matrix and the elapsed system time in seconds.
pub fn structural_sp_kernel(
    graphs: &[LabeledGraph],
    use_edge_weight: bool,
    node_kernels: &BaseKernels,
    edge_kernels: &BaseKernels,
    n_jobs: usize,
) -> Result<(Array2<f64>, f64)> {
    let weighted = resolve_edge_weight(graphs, use_edge_weight);
    let ds_attrs = DatasetAttributes::from_graphs(graphs);
    //
    let sys_now = SystemTime::now();
    let cpu_start = ProcessTime::now();
    // shortest path lists, one graph per task
    let splist: Vec<Vec<Vec<usize>>> = graphs
        .par_iter()
        .map(|g| get_shortest_paths(g, weighted))
        .collect();
    //
    let kmatrix = parallel_gram(graphs.len(), n_jobs, |i, j| {
        Ok(sp_kernel_do(
            &graphs[i],
            &graphs[j],
            &splist[i],
            &splist[j],
            &ds_attrs,
            node_kernels,
            edge_kernels,
            (i, j),
        ))
    })?;
    //
    let sys_t = sys_now.elapsed().unwrap().as_secs_f64();
    log::info!(
        "shortest path kernel matrix of size {} built, sys time(s) {:.3e}, cpu time(s) {:.3e}",
        graphs.len(),
        sys_t,
        cpu_start.elapsed().as_secs_f64()
    );
    Ok((kmatrix, sys_t))
} // end of structural_sp_kernel


/// kernel between 2 graphs only, computed sequentially.
/// Only the cross cell is evaluated, the self kernels of the matrix path are skipped.
pub fn structural_sp_kernel_pair(
    g1: &LabeledGraph,
    g2: &LabeledGraph,
    use_edge_weight: bool,
    node_kernels: &BaseKernels,
    edge_kernels: &BaseKernels,
) -> Result<(f64, f64)> {
    let gn = [g1.clone(), g2.clone()];
    let weighted = resolve_edge_weight(&gn, use_edge_weight);
    let ds_attrs = DatasetAttributes::from_graphs(&gn);
    //
    let sys_now = SystemTime::now();
    let spl1 = get_shortest_paths(g1, weighted);
    let spl2 = get_shortest_paths(g2, weighted);
    let kernel = sp_kernel_do(g1, g2, &spl1, &spl2, &ds_attrs, node_kernels, edge_kernels, (0, 1));
    Ok((kernel, sys_now.elapsed().unwrap().as_secs_f64()))
} // end of structural_sp_kernel_pair


// one symmetric cell of the Gram matrix
#[allow(clippy::too_many_arguments)]
fn sp_kernel_do(
    g1: &LabeledGraph,
    g2: &LabeledGraph,
    spl1: &[Vec<usize>],
    spl2: &[Vec<usize>],
    ds_attrs: &DatasetAttributes,
    node_kernels: &BaseKernels,
    edge_kernels: &BaseKernels,
    ij: (usize, usize),
) -> f64 {
    let vk_dict = compute_vertex_kernels(g1, g2, ds_attrs.node_shape(), node_kernels);
    let ek_dict = compute_edge_kernels(g1, g2, ds_attrs.edge_shape(), edge_kernels);
    //
    let mut kernel = 0.;
    if !vk_dict.is_empty() {
        if !ek_dict.is_empty() {
            for p1 in spl1 {
                for p2 in spl2 {
                    if p1.len() != p2.len() {
                        continue;
                    }
                    let mut kpath = vk_dict[&(p1[0], p2[0])];
                    if kpath == 0. {
                        continue;
                    }
                    for idx in 1..p1.len() {
                        kpath *= vk_dict[&(p1[idx], p2[idx])]
                            * ek_dict
                                .get(&((p1[idx - 1], p1[idx]), (p2[idx - 1], p2[idx])))
                                .unwrap_or(&0.);
                        if kpath == 0. {
                            break;
                        }
                    }
                    kernel += kpath;
                }
            }
        } else {
            for p1 in spl1 {
                for p2 in spl2 {
                    if p1.len() != p2.len() {
                        continue;
                    }
                    let mut kpath = vk_dict[&(p1[0], p2[0])];
                    if kpath == 0. {
                        continue;
                    }
                    for idx in 1..p1.len() {
                        kpath *= vk_dict[&(p1[idx], p2[idx])];
                        if kpath == 0. {
                            break;
                        }
                    }
                    kernel += kpath;
                }
            }
        }
    } else if !ek_dict.is_empty() {
        for p1 in spl1 {
            for p2 in spl2 {
                if p1.len() != p2.len() {
                    continue;
                }
                if p1.len() == 1 {
                    kernel += 1.;
                } else {
                    let mut kpath = 1.;
                    for idx in 0..p1.len() - 1 {
                        kpath *= ek_dict
                            .get(&((p1[idx], p1[idx + 1]), (p2[idx], p2[idx + 1])))
                            .unwrap_or(&0.);
                        if kpath == 0. {
                            break;
                        }
                    }
                    kernel += kpath;
                }
            }
        }
    } else {
        // fully unlabeled : count pairs of equal length paths
        for p1 in spl1 {
            for p2 in spl2 {
                if p1.len() == p2.len() {
                    kernel += 1.;
                }
            }
        }
    }
    kernel /= (spl1.len() * spl2.len()) as f64;
    // a normalized path kernel should not exceed 1. Surface the anomaly, do not clamp
    if kernel > 1. {
        log::warn!("kernel value {} > 1 for pair {:?}", kernel, ij);
    }
    kernel
} // end of sp_kernel_do


/// Edge kernel lookup table over the edge cross product of 2 graphs.
/// Both orientations of each edge are stored so path segments need no orientation branching.
/// Empty for an unlabeled collection.
fn compute_edge_kernels(
    g1: &LabeledGraph,
    g2: &LabeledGraph,
    shape: LabelShape,
    edge_kernels: &BaseKernels,
) -> PairMap<((usize, usize), (usize, usize))> {
    let mut ek_dict = PairMap::<((usize, usize), (usize, usize))>::default();
    if shape == LabelShape::Unlabeled {
        return ek_dict;
    }
    for (u1, v1, d1) in g1.edges() {
        for (u2, v2, d2) in g2.edges() {
            let kernel = match shape {
                LabelShape::Unlabeled => unreachable!(),
                LabelShape::SymbolicOnly => {
                    (edge_kernels.symb)(d1.get_label().unwrap_or(""), d2.get_label().unwrap_or(""))
                }
                LabelShape::AttributedOnly => {
                    (edge_kernels.nsymb)(d1.get_attributes(), d2.get_attributes())
                }
                LabelShape::Mixed => (edge_kernels.mix)(
                    d1.get_label().unwrap_or(""),
                    d2.get_label().unwrap_or(""),
                    d1.get_attributes(),
                    d2.get_attributes(),
                ),
            };
            ek_dict.insert(((u1, v1), (u2, v2)), kernel);
            ek_dict.insert(((v1, u1), (u2, v2)), kernel);
            ek_dict.insert(((u1, v1), (v2, u2)), kernel);
            ek_dict.insert(((v1, u1), (v2, u2)), kernel);
        }
    }
    ek_dict
} // end of compute_edge_kernels


//==============================================================================
// shortest path enumeration


/// All shortest paths of a graph : for every node pair (n1, n2), n1 < n2, every shortest path
/// from n1 to n2 ; reversed copies are appended for undirected graphs (each edge walk is
/// counted twice, starting from both its extreme nodes) ; every single node as a length 0
/// path. Unreachable pairs contribute no path.
pub fn get_shortest_paths(g: &LabeledGraph, use_weight: bool) -> Vec<Vec<usize>> {
    let nb_nodes = g.nb_nodes();
    let mut sp = Vec::<Vec<usize>>::new();
    for source in 0..nb_nodes {
        let (dist, preds) = shortest_path_dag(g, source, use_weight);
        for target in source + 1..nb_nodes {
            if !dist[target].is_finite() {
                continue;
            }
            let paths = enumerate_paths(&preds, source, target);
            if !g.is_directed() {
                for p in &paths {
                    sp.push(p.iter().rev().copied().collect());
                }
            }
            sp.extend(paths);
        }
    }
    // single nodes as length 0 paths
    for n in 0..nb_nodes {
        sp.push(vec![n]);
    }
    sp
} // end of get_shortest_paths


// entry of the dijkstra heap, ordered by decreasing distance for a min heap
struct HeapEntry {
    dist: f64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist.total_cmp(&other.dist).is_eq()
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    // total order so a pathological (nan) weight cannot panic inside the heap
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.dist.total_cmp(&self.dist)
    }
}

/// single source dijkstra keeping every predecessor realizing the shortest distance,
/// so that all shortest paths can be enumerated. Edge weights must be non negative.
/// Unit weights when use_weight is false.
fn shortest_path_dag(g: &LabeledGraph, source: usize, use_weight: bool) -> (Vec<f64>, Vec<Vec<usize>>) {
    let nb_nodes = g.nb_nodes();
    let mut dist = vec![f64::INFINITY; nb_nodes];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); nb_nodes];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.;
    heap.push(HeapEntry { dist: 0., node: source });
    while let Some(HeapEntry { dist: d, node: u }) = heap.pop() {
        if d > dist[u] + DIST_EPS {
            continue; // stale entry
        }
        for v in g.neighbors(u) {
            let w = if use_weight {
                g.get_edge(u, v).map(|e| e.weight_or_one()).unwrap_or(1.)
            } else {
                1.
            };
            let nd = d + w;
            if nd < dist[v] - DIST_EPS {
                dist[v] = nd;
                preds[v] = vec![u];
                heap.push(HeapEntry { dist: nd, node: v });
            } else if (nd - dist[v]).abs() <= DIST_EPS && !preds[v].contains(&u) {
                preds[v].push(u);
            }
        }
    }
    (dist, preds)
} // end of shortest_path_dag


// backtrack the predecessor dag from target to source
fn enumerate_paths(preds: &[Vec<usize>], source: usize, target: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut suffix = Vec::new();
    collect_paths(preds, source, target, &mut suffix, &mut out);
    out
}

fn collect_paths(
    preds: &[Vec<usize>],
    source: usize,
    node: usize,
    suffix: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    suffix.push(node);
    if node == source {
        out.push(suffix.iter().rev().copied().collect());
    } else {
        for &p in &preds[node] {
            collect_paths(preds, source, p, suffix, out);
        }
    }
    suffix.pop();
} // end of collect_paths


//==============================================================================

// end of mod tests
