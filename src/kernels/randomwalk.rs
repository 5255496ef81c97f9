//! Random walk kernels.
//!
//! Based on the paper:
//!     Vishwanathan, Schraudolph, Kondor, Borgwardt. Graph Kernels.
//!     Journal of Machine Learning Research 11, 2010.
//!
//! Four interchangeable numeric formulations operate on the weight matrix of the direct
//! product of 2 graphs : a dense solve of the vectorized discrete Sylvester equation, a
//! conjugate gradient solve of (I - lambda W) x = b, a fixed point iteration on
//! x = b + lambda W x, and a spectral decomposition combining per graph eigendecompositions.
//! Graphs without edges are removed first (no walk exists in them and the weight matrix
//! between such a graph and itself would be zero) ; the surviving original indices are
//! returned so the caller can realign.


use anyhow::{anyhow, bail, Result};

use std::str::FromStr;
use std::time::SystemTime;

use cpu_time::ProcessTime;
use ndarray::linalg::kron;
use ndarray::{Array1, Array2, ScalarOperand};
use ndarray_linalg::{Eigh, Solve, UPLO};
use num_traits::Float;

use super::{compute_vertex_kernels, resolve_edge_weight, PairMap};
use crate::basekernel::BaseKernels;
use crate::dataset::{DatasetAttributes, LabelShape};
use crate::graph::LabeledGraph;
use crate::parallel::parallel_gram;

/// the numeric formulation used to compute the kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComputeMethod {
    /// dense solve of the discrete Sylvester equation, labels ignored
    Sylvester,
    /// conjugate gradient linear solve on the direct product weight matrix
    Conjugate,
    /// fixed point iteration on the direct product weight matrix
    FixedPoint,
    /// spectral decomposition, labels ignored, undirected graphs only
    Spectral,
    /// nearest Kronecker product approximation. Not implemented
    Kron,
}

impl FromStr for ComputeMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sylvester" => Ok(ComputeMethod::Sylvester),
            "conjugate" => Ok(ComputeMethod::Conjugate),
            "fp" => Ok(ComputeMethod::FixedPoint),
            "spectral" => Ok(ComputeMethod::Spectral),
            "kron" => Ok(ComputeMethod::Kron),
            _ => Err(anyhow!(
                "compute method name incorrect : {}. Available methods : sylvester, conjugate, fp, spectral, kron",
                s
            )),
        }
    }
} // end of impl FromStr for ComputeMethod


/// the transform applied to eigenvalue products by the spectral method
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubKernel {
    /// exp(lambda * d1 * d2)
    Exp,
    /// 1 / (1 - lambda * d1 * d2)
    Geo,
}

impl FromStr for SubKernel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "exp" => Ok(SubKernel::Exp),
            "geo" => Ok(SubKernel::Geo),
            _ => Err(anyhow!("sub kernel name incorrect : {}. Available sub kernels : exp, geo", s)),
        }
    }
} // end of impl FromStr for SubKernel


/// options of the random walk kernel engine
pub struct RandomWalkParams {
    pub compute_method: ComputeMethod,
    /// the decay weight lambda of the walk series
    pub weight: f64,
    /// start distribution over node pairs. None means uniform. Non uniform is not supported
    pub p: Option<Vec<f64>>,
    /// stop distribution over node pairs. None means uniform. Non uniform is not supported
    pub q: Option<Vec<f64>>,
    /// eigenvalue transform of the spectral method
    pub sub_kernel: Option<SubKernel>,
    /// use the stored edge weight in adjacency matrices
    pub use_edge_weight: bool,
    /// worker count for the pairwise dispatch, 0 means one per cpu, 1 sequential
    pub n_jobs: usize,
}

impl RandomWalkParams {
    pub fn new(compute_method: ComputeMethod, weight: f64) -> Self {
        RandomWalkParams {
            compute_method,
            weight,
            p: None,
            q: None,
            sub_kernel: None,
            use_edge_weight: false,
            n_jobs: 1,
        }
    }
} // end of impl RandomWalkParams


/// tolerance and iteration cap of the fixed point method
const FP_XTOL: f64 = 1.0e-6;
const FP_MAX_ITER: usize = 1000;
/// conjugate gradient stopping criterion
const CG_TOL: f64 = 1.0e-8;


/// Computes the random walk kernel matrix of a graph collection.
///
/// Graphs with no edge are excluded ; the second return value is the strictly increasing
/// list of surviving original indices, the matrix rows/columns follow that list.
/// node_kernels and edge_kernels are required by the conjugate and fp methods when the
/// collection is labeled, and ignored by sylvester and spectral.
pub fn random_walk_kernel(
    graphs: &[LabeledGraph],
    params: &RandomWalkParams,
    node_kernels: Option<&BaseKernels>,
    edge_kernels: Option<&BaseKernels>,
) -> Result<(Array2<f64>, f64, Vec<usize>)> {
    if params.p.is_some() || params.q.is_some() {
        bail!("non uniform start/stop distributions are not supported, leave p and q to None");
    }
    let weighted = resolve_edge_weight(graphs, params.use_edge_weight);
    let mut ds_attrs = DatasetAttributes::from_graphs(graphs);
    // numeric attribute vectors are not used by random walk kernels
    ds_attrs.node_attr_dim = 0;
    ds_attrs.edge_attr_dim = 0;
    //
    // remove graphs with no edges, as no walk can be found in their structures
    let idx: Vec<usize> = (0..graphs.len()).filter(|&i| graphs[i].nb_edges() != 0).collect();
    if idx.len() != graphs.len() {
        log::warn!("{} graphs removed as they do not contain edges", graphs.len() - idx.len());
    }
    let gn: Vec<&LabeledGraph> = idx.iter().map(|&i| &graphs[i]).collect();
    //
    let sys_now = SystemTime::now();
    let cpu_start = ProcessTime::now();
    let kmatrix = match params.compute_method {
        ComputeMethod::Sylvester => {
            log::warn!("sylvester method : all labels are ignored");
            sylvester_equation(&gn, params.weight, weighted, params.n_jobs)?
        }
        ComputeMethod::Conjugate => {
            conjugate_gradient_method(&gn, params.weight, &ds_attrs, node_kernels, edge_kernels, params.n_jobs)?
        }
        ComputeMethod::FixedPoint => {
            fixed_point_method(&gn, params.weight, &ds_attrs, node_kernels, edge_kernels, params.n_jobs)?
        }
        ComputeMethod::Spectral => {
            log::warn!("spectral method : all labels are ignored");
            let sub_kernel = params
                .sub_kernel
                .ok_or_else(|| anyhow!("spectral method requires a sub kernel : exp or geo"))?;
            if ds_attrs.is_directed {
                bail!("spectral method only works for undirected graphs");
            }
            spectral_decomposition(&gn, params.weight, sub_kernel, weighted, params.n_jobs)?
        }
        ComputeMethod::Kron => {
            bail!("nearest Kronecker product approximation method is not implemented");
        }
    };
    //
    let sys_t = sys_now.elapsed().unwrap().as_secs_f64();
    log::info!(
        "random walk kernel matrix of size {} built, sys time(s) {:.3e}, cpu time(s) {:.3e}",
        gn.len(),
        sys_t,
        cpu_start.elapsed().as_secs_f64()
    );
    Ok((kmatrix, sys_t, idx))
} // end of random_walk_kernel


//==============================================================================
// sylvester


fn sylvester_equation(gn: &[&LabeledGraph], lmda: f64, weighted: bool, n_jobs: usize) -> Result<Array2<f64>> {
    // transposed adjacency matrices, computed once and shared read only
    let a_wave_list: Vec<Array2<f64>> = gn.iter().map(|g| g.transposed_adjacency(weighted)).collect();
    parallel_gram(gn.len(), n_jobs, |i, j| sylvester_do(&a_wave_list[i], &a_wave_list[j], lmda))
}

// Solves X = lambda * A_wave2 * X * A_wave1^t + M0 with uniform M0, then contracts with the
// uniform stop distribution. Vectorized : (I - lambda * (A_wave1 kron A_wave2)) x = vec(M0).
fn sylvester_do(a_wave1: &Array2<f64>, a_wave2: &Array2<f64>, lmda: f64) -> Result<f64> {
    let nb_pd = a_wave1.nrows() * a_wave2.nrows();
    let w = kron(a_wave1, a_wave2);
    let a = Array2::<f64>::eye(nb_pd) - &(w * lmda);
    let p_times_uni = 1. / nb_pd as f64;
    let b = Array1::<f64>::from_elem(nb_pd, p_times_uni);
    let x = a.solve(&b)?;
    Ok(x.sum() * p_times_uni)
} // end of sylvester_do


//==============================================================================
// conjugate gradient and fixed point


fn check_labeled_kernels(
    ds_attrs: &DatasetAttributes,
    node_kernels: Option<&BaseKernels>,
    edge_kernels: Option<&BaseKernels>,
) -> Result<()> {
    if ds_attrs.node_shape() != LabelShape::Unlabeled && node_kernels.is_none() {
        bail!("node kernels are required for a node labeled dataset");
    }
    if ds_attrs.edge_shape() != LabelShape::Unlabeled && edge_kernels.is_none() {
        bail!("edge kernels are required for an edge labeled dataset");
    }
    Ok(())
}

fn conjugate_gradient_method(
    gn: &[&LabeledGraph],
    lmda: f64,
    ds_attrs: &DatasetAttributes,
    node_kernels: Option<&BaseKernels>,
    edge_kernels: Option<&BaseKernels>,
    n_jobs: usize,
) -> Result<Array2<f64>> {
    check_labeled_kernels(ds_attrs, node_kernels, edge_kernels)?;
    parallel_gram(gn.len(), n_jobs, |i, j| {
        let (w, w_dim) = direct_product_weight(gn[i], gn[j], ds_attrs, node_kernels, edge_kernels);
        let p_times_uni = 1. / w_dim as f64;
        let a = Array2::<f64>::eye(w_dim) - &(w * lmda);
        let b = Array1::<f64>::from_elem(w_dim, p_times_uni);
        let x = conjugate_gradient(&a, &b, CG_TOL, 10 * w_dim);
        Ok(x.sum() * p_times_uni)
    })
} // end of conjugate_gradient_method


fn fixed_point_method(
    gn: &[&LabeledGraph],
    lmda: f64,
    ds_attrs: &DatasetAttributes,
    node_kernels: Option<&BaseKernels>,
    edge_kernels: Option<&BaseKernels>,
    n_jobs: usize,
) -> Result<Array2<f64>> {
    check_labeled_kernels(ds_attrs, node_kernels, edge_kernels)?;
    parallel_gram(gn.len(), n_jobs, |i, j| {
        let (w, w_dim) = direct_product_weight(gn[i], gn[j], ds_attrs, node_kernels, edge_kernels);
        let p_times_uni = 1. / w_dim as f64;
        let b = Array1::<f64>::from_elem(w_dim, p_times_uni);
        let x = fixed_point_solve(&w, &b, lmda, FP_XTOL, FP_MAX_ITER)?;
        Ok(x.sum() * p_times_uni)
    })
} // end of fixed_point_method


/// Weight matrix of the direct product graph of 2 graphs, indexed by flattened node pairs :
/// entry ((u1,u2),(v1,v2)) is the product of the vertex kernels at (u1,u2) and (v1,v2) times
/// the edge kernel of edges (u1,v1) and (u2,v2), present when both edges exist. For
/// undirected graphs both alignments of an edge pair are summed. O(n1^2 n2^2) memory,
/// built per pair and discarded after use.
fn direct_product_weight(
    g1: &LabeledGraph,
    g2: &LabeledGraph,
    ds_attrs: &DatasetAttributes,
    node_kernels: Option<&BaseKernels>,
    edge_kernels: Option<&BaseKernels>,
) -> (Array2<f64>, usize) {
    let n2 = g2.nb_nodes();
    let w_dim = g1.nb_nodes() * n2;
    let mut w_times = Array2::<f64>::zeros((w_dim, w_dim));
    let vk_dict = match node_kernels {
        Some(kernels) => compute_vertex_kernels(g1, g2, ds_attrs.node_shape(), kernels),
        None => PairMap::<(usize, usize)>::default(),
    };
    for (u1, v1, d1) in g1.edges() {
        for (u2, v2, d2) in g2.edges() {
            let ek_temp = match ds_attrs.edge_shape() {
                LabelShape::SymbolicOnly | LabelShape::Mixed => (edge_kernels.unwrap().symb)(
                    d1.get_label().unwrap_or(""),
                    d2.get_label().unwrap_or(""),
                ),
                LabelShape::Unlabeled | LabelShape::AttributedOnly => 1.,
            };
            let w_idx = (u1 * n2 + u2, v1 * n2 + v2);
            let val = if vk_dict.is_empty() {
                // node unlabeled : the edge kernel alone carries the weight
                ek_temp
            } else if ds_attrs.is_directed {
                vk_dict[&(u1, u2)] * ek_temp * vk_dict[&(v1, v2)]
            } else {
                // both alignments of the edge pair contribute
                vk_dict[&(u1, u2)] * ek_temp * vk_dict[&(v1, v2)]
                    + vk_dict[&(u1, v2)] * ek_temp * vk_dict[&(v1, u2)]
            };
            if ds_attrs.is_directed {
                w_times[[w_idx.0, w_idx.1]] = val;
            } else {
                w_times[[w_idx.0, w_idx.1]] = val;
                w_times[[w_idx.1, w_idx.0]] = val;
                let w_idx2 = (u1 * n2 + v2, v1 * n2 + u2);
                w_times[[w_idx2.0, w_idx2.1]] = val;
                w_times[[w_idx2.1, w_idx2.0]] = val;
            }
        }
    }
    (w_times, w_dim)
} // end of direct_product_weight


/// standard conjugate gradient on a x = b. Returns the current iterate when the iteration
/// cap is reached, as an iterative solver inside a kernel estimate need not be exact.
fn conjugate_gradient<F>(a: &Array2<F>, b: &Array1<F>, tol: F, max_iter: usize) -> Array1<F>
where
    F: Float + ScalarOperand + ndarray::LinalgScalar + std::fmt::Debug,
{
    let mut x = Array1::<F>::zeros(b.len());
    let mut r = b - &a.dot(&x);
    let mut p = r.clone();
    let mut rs_old = r.dot(&r);
    for iter in 0..max_iter {
        if rs_old.sqrt() < tol {
            log::trace!("cg converged at iteration {}", iter);
            return x;
        }
        let ap = a.dot(&p);
        let alpha = rs_old / p.dot(&ap);
        x = x + &p * alpha;
        r = r - &ap * alpha;
        let rs_new = r.dot(&r);
        p = &r + &(&p * (rs_new / rs_old));
        rs_old = rs_new;
    }
    log::debug!("cg reached iteration cap, residual {:?}", rs_old.sqrt());
    x
} // end of conjugate_gradient


/// fixed point iteration x = b + lambda * w * x
fn fixed_point_solve<F>(w: &Array2<F>, b: &Array1<F>, lmda: F, xtol: F, max_iter: usize) -> Result<Array1<F>>
where
    F: Float + ScalarOperand + ndarray::LinalgScalar + std::fmt::Debug,
{
    let mut x = b.clone();
    for _ in 0..max_iter {
        let x_new = b + &(w.dot(&x) * lmda);
        let delta = x_new
            .iter()
            .zip(x.iter())
            .fold(F::zero(), |m, (a, b)| m.max((*a - *b).abs()));
        x = x_new;
        if delta < xtol {
            return Ok(x);
        }
    }
    bail!("fixed point iteration did not converge in {} iterations", max_iter)
} // end of fixed_point_solve


//==============================================================================
// spectral


fn spectral_decomposition(
    gn: &[&LabeledGraph],
    lmda: f64,
    sub_kernel: SubKernel,
    weighted: bool,
    n_jobs: usize,
) -> Result<Array2<f64>> {
    // per graph symmetric eigendecomposition, computed once and shared read only
    let mut d_list = Vec::<Array1<f64>>::with_capacity(gn.len());
    let mut p_list = Vec::<Array2<f64>>::with_capacity(gn.len());
    for g in gn {
        let a = g.transposed_adjacency(weighted);
        let (eigenvalues, eigenvectors) = a.eigh(UPLO::Lower)?;
        d_list.push(eigenvalues);
        p_list.push(eigenvectors);
    }
    // uniform stop distributions
    let q_t_list: Vec<Array1<f64>> = gn
        .iter()
        .map(|g| Array1::from_elem(g.nb_nodes(), 1. / g.nb_nodes() as f64))
        .collect();
    //
    parallel_gram(gn.len(), n_jobs, |i, j| {
        Ok(spectral_do(
            &q_t_list[i], &q_t_list[j], &p_list[i], &p_list[j], &d_list[i], &d_list[j], lmda, sub_kernel,
        ))
    })
} // end of spectral_decomposition


// combines (q1^t P1) kron (q2^t P2) with the diagonal middle term built from pairwise
// eigenvalue products
#[allow(clippy::too_many_arguments)]
fn spectral_do(
    q_t1: &Array1<f64>,
    q_t2: &Array1<f64>,
    p1: &Array2<f64>,
    p2: &Array2<f64>,
    d1: &Array1<f64>,
    d2: &Array1<f64>,
    lmda: f64,
    sub_kernel: SubKernel,
) -> f64 {
    let c1 = q_t1.dot(p1);
    let c2 = q_t2.dot(p2);
    let mut kernel = 0.;
    for i in 0..c1.len() {
        for j in 0..c2.len() {
            let d_prod = d1[i] * d2[j];
            let middle = match sub_kernel {
                SubKernel::Exp => (lmda * d_prod).exp(),
                SubKernel::Geo => 1. / (1. - lmda * d_prod),
            };
            let kl = c1[i] * c2[j];
            kernel += kl * middle * kl;
        }
    }
    kernel
} // end of spectral_do


//==============================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::{EdgeData, NodeData};

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cycle_graph(labels: &[&str]) -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        for l in labels {
            g.add_node(NodeData::with_label(l));
        }
        let n = labels.len();
        for i in 0..n {
            g.add_edge(i, (i + 1) % n, EdgeData::unlabeled());
        }
        g
    }

    fn path_graph(labels: &[&str]) -> LabeledGraph {
        let mut g = LabeledGraph::new(false);
        for l in labels {
            g.add_node(NodeData::with_label(l));
        }
        for i in 1..labels.len() {
            g.add_edge(i - 1, i, EdgeData::unlabeled());
        }
        g
    }

    fn unlabeled_copy(g: &LabeledGraph) -> LabeledGraph {
        let mut out = LabeledGraph::new(g.is_directed());
        for _ in 0..g.nb_nodes() {
            out.add_node(NodeData::unlabeled());
        }
        for (u, v, data) in g.edges() {
            out.add_edge(u, v, data.clone());
        }
        out
    }

    #[test]
    fn test_bogus_method_rejected() {
        log_init_test();
        let err = ComputeMethod::from_str("bogus").unwrap_err();
        assert!(err.to_string().contains("sylvester"));
        assert!(ComputeMethod::from_str("fp").unwrap() == ComputeMethod::FixedPoint);
    } // end of test_bogus_method_rejected

    #[test]
    fn test_kron_unimplemented() {
        log_init_test();
        let gn = vec![cycle_graph(&["C", "C", "C"]), path_graph(&["C", "C"])];
        let params = RandomWalkParams::new(ComputeMethod::Kron, 0.05);
        assert!(random_walk_kernel(&gn, &params, None, None).is_err());
    } // end of test_kron_unimplemented

    #[test]
    fn test_zero_edge_graphs_excluded() {
        log_init_test();
        let mut isolated = LabeledGraph::new(false);
        isolated.add_node(NodeData::with_label("C"));
        let gn = vec![cycle_graph(&["C", "C", "C"]), isolated, path_graph(&["C", "C"])];
        let params = RandomWalkParams::new(ComputeMethod::Sylvester, 0.05);
        let (k, _, idx) = random_walk_kernel(&gn, &params, None, None).unwrap();
        assert_eq!(idx, vec![0, 2]);
        assert_eq!(k.nrows(), 2);
        assert!(crate::gram::is_symmetric(&k, 1.0e-12));
        assert!(k[[0, 0]] >= 0. && k[[1, 1]] >= 0.);
    } // end of test_zero_edge_graphs_excluded

    #[test]
    fn test_conjugate_fp_agree() {
        log_init_test();
        let gn = vec![cycle_graph(&["C", "O", "C"]), path_graph(&["C", "O", "C", "H"])];
        let node_kernels = BaseKernels::dirac_gaussian(1.);
        let edge_kernels = BaseKernels::dirac_gaussian(1.);
        let params_cg = RandomWalkParams::new(ComputeMethod::Conjugate, 0.05);
        let params_fp = RandomWalkParams::new(ComputeMethod::FixedPoint, 0.05);
        let (k_cg, _, _) =
            random_walk_kernel(&gn, &params_cg, Some(&node_kernels), Some(&edge_kernels)).unwrap();
        let (k_fp, _, _) =
            random_walk_kernel(&gn, &params_fp, Some(&node_kernels), Some(&edge_kernels)).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!(
                    (k_cg[[i, j]] - k_fp[[i, j]]).abs() < 1.0e-4,
                    "cg {} fp {}",
                    k_cg[[i, j]],
                    k_fp[[i, j]]
                );
            }
        }
    } // end of test_conjugate_fp_agree

    #[test]
    fn test_sylvester_conjugate_agree_unlabeled() {
        log_init_test();
        // on an unlabeled undirected pair both methods solve the same linear system
        let gn = vec![
            unlabeled_copy(&cycle_graph(&["C", "C", "C"])),
            unlabeled_copy(&path_graph(&["C", "C", "C", "C"])),
        ];
        let params_sy = RandomWalkParams::new(ComputeMethod::Sylvester, 0.05);
        let params_cg = RandomWalkParams::new(ComputeMethod::Conjugate, 0.05);
        let (k_sy, _, _) = random_walk_kernel(&gn, &params_sy, None, None).unwrap();
        let (k_cg, _, _) = random_walk_kernel(&gn, &params_cg, None, None).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!((k_sy[[i, j]] - k_cg[[i, j]]).abs() < 1.0e-5);
            }
        }
    } // end of test_sylvester_conjugate_agree_unlabeled

    #[test]
    fn test_spectral_geo_agrees_with_conjugate() {
        log_init_test();
        let gn = vec![
            unlabeled_copy(&cycle_graph(&["C", "C", "C", "C"])),
            unlabeled_copy(&path_graph(&["C", "C", "C"])),
        ];
        let mut params_sd = RandomWalkParams::new(ComputeMethod::Spectral, 0.05);
        params_sd.sub_kernel = Some(SubKernel::Geo);
        let params_cg = RandomWalkParams::new(ComputeMethod::Conjugate, 0.05);
        let (k_sd, _, _) = random_walk_kernel(&gn, &params_sd, None, None).unwrap();
        let (k_cg, _, _) = random_walk_kernel(&gn, &params_cg, None, None).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert!((k_sd[[i, j]] - k_cg[[i, j]]).abs() < 1.0e-4);
            }
        }
    } // end of test_spectral_geo_agrees_with_conjugate

    #[test]
    fn test_non_uniform_distribution_rejected() {
        log_init_test();
        let gn = vec![cycle_graph(&["C", "C", "C"])];
        let node_kernels = BaseKernels::dirac_gaussian(1.);
        let edge_kernels = BaseKernels::dirac_gaussian(1.);
        let mut params = RandomWalkParams::new(ComputeMethod::Conjugate, 0.05);
        params.q = Some(vec![0.5, 0.3, 0.2]);
        assert!(random_walk_kernel(&gn, &params, Some(&node_kernels), Some(&edge_kernels)).is_err());
        params.q = None;
        params.p = Some(vec![0.5, 0.3, 0.2]);
        assert!(random_walk_kernel(&gn, &params, Some(&node_kernels), Some(&edge_kernels)).is_err());
    } // end of test_non_uniform_distribution_rejected

    #[test]
    fn test_labeled_dataset_requires_kernels() {
        log_init_test();
        // node labeled collection without a node kernel table
        let gn = vec![cycle_graph(&["C", "O", "C"]), path_graph(&["C", "C"])];
        let params = RandomWalkParams::new(ComputeMethod::Conjugate, 0.05);
        assert!(random_walk_kernel(&gn, &params, None, None).is_err());
        let params = RandomWalkParams::new(ComputeMethod::FixedPoint, 0.05);
        assert!(random_walk_kernel(&gn, &params, None, None).is_err());
    } // end of test_labeled_dataset_requires_kernels

    #[test]
    fn test_spectral_rejects_directed() {
        log_init_test();
        let mut g = LabeledGraph::new(true);
        g.add_node(NodeData::unlabeled());
        g.add_node(NodeData::unlabeled());
        g.add_edge(0, 1, EdgeData::unlabeled());
        let mut params = RandomWalkParams::new(ComputeMethod::Spectral, 0.05);
        params.sub_kernel = Some(SubKernel::Geo);
        assert!(random_walk_kernel(&[g], &params, None, None).is_err());
    } // end of test_spectral_rejects_directed

    #[test]
    fn test_spectral_requires_sub_kernel() {
        log_init_test();
        let gn = vec![unlabeled_copy(&cycle_graph(&["C", "C", "C"]))];
        let params = RandomWalkParams::new(ComputeMethod::Spectral, 0.05);
        assert!(random_walk_kernel(&gn, &params, None, None).is_err());
    } // end of test_spectral_requires_sub_kernel

    #[test]
    fn test_parallel_matches_sequential() {
        log_init_test();
        let gn = vec![
            cycle_graph(&["C", "O", "C"]),
            path_graph(&["C", "C", "O"]),
            cycle_graph(&["C", "C", "C", "O"]),
        ];
        let node_kernels = BaseKernels::dirac_gaussian(1.);
        let edge_kernels = BaseKernels::dirac_gaussian(1.);
        let mut params = RandomWalkParams::new(ComputeMethod::Conjugate, 0.05);
        let (k_seq, _, _) =
            random_walk_kernel(&gn, &params, Some(&node_kernels), Some(&edge_kernels)).unwrap();
        params.n_jobs = 4;
        let (k_par, _, _) =
            random_walk_kernel(&gn, &params, Some(&node_kernels), Some(&edge_kernels)).unwrap();
        assert_eq!(k_seq, k_par);
    } // end of test_parallel_matches_sequential
} // end of mod tests
