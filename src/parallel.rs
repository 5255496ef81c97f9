//! Parallel pairwise dispatch used by all kernel engines.
//!
//! A Gram matrix computation is a map over the index set {(i,j) : 0 <= i <= j < n},
//! each pair filling two symmetric cells. Pairs are partitioned in chunks dispatched on a
//! rayon thread pool ; results complete in any order, every pair is computed exactly once.
//! Shared read only artifacts (shortest path lists, adjacency matrices, eigendecompositions)
//! are captured by the closure environment, so nothing is re-serialized per pair.
//! An error inside a worker aborts the whole computation : no partial matrix is returned.


use anyhow::Result;

use ndarray::Array2;
use rayon::prelude::*;

/// chunk size heuristic : small pair counts get one chunk per worker, large pair counts a
/// fixed chunk size amortizing dispatch overhead.
fn chunk_size(nb_pairs: usize, n_jobs: usize) -> usize {
    if nb_pairs < 1000 * n_jobs {
        nb_pairs / n_jobs + 1
    } else {
        1000
    }
}

/// effective worker count : 0 means one per logical cpu
pub fn resolve_n_jobs(n_jobs: usize) -> usize {
    if n_jobs == 0 {
        num_cpus::get()
    } else {
        n_jobs
    }
}

/// Computes a symmetric n x n matrix by mapping compute over all pairs (i,j), i <= j.
/// With n_jobs == 1 the loop is strictly sequential, with n_jobs == 0 one worker per cpu.
pub fn parallel_gram<F>(n: usize, n_jobs: usize, compute: F) -> Result<Array2<f64>>
where
    F: Fn(usize, usize) -> Result<f64> + Sync + Send,
{
    let mut kmatrix = Array2::<f64>::zeros((n, n));
    let pairs: Vec<(usize, usize)> =
        (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
    //
    let n_jobs = resolve_n_jobs(n_jobs);
    let results: Vec<(usize, usize, f64)> = if n_jobs <= 1 {
        let mut res = Vec::with_capacity(pairs.len());
        for &(i, j) in &pairs {
            res.push((i, j, compute(i, j)?));
        }
        res
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(n_jobs).build()?;
        let csize = chunk_size(pairs.len(), n_jobs);
        log::debug!(
            "parallel_gram : {} pairs, {} workers, chunk size {}",
            pairs.len(),
            n_jobs,
            csize
        );
        pool.install(|| {
            pairs
                .par_chunks(csize)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|&(i, j)| Ok((i, j, compute(i, j)?)))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()
        })?
        .into_iter()
        .flatten()
        .collect()
    };
    // symmetric fill, each pair owns its 2 cells
    for (i, j, kernel) in results {
        kmatrix[[i, j]] = kernel;
        kmatrix[[j, i]] = kernel;
    }
    Ok(kmatrix)
} // end of parallel_gram


//==============================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use anyhow::anyhow;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_parallel_gram_symmetric() {
        log_init_test();
        let k = parallel_gram(17, 4, |i, j| Ok((i * 31 + j) as f64)).unwrap();
        for i in 0..17 {
            for j in i..17 {
                assert_eq!(k[[i, j]], (i * 31 + j) as f64);
                assert_eq!(k[[j, i]], k[[i, j]]);
            }
        }
    } // end of test_parallel_gram_symmetric

    #[test]
    fn test_parallel_matches_sequential() {
        log_init_test();
        let f = |i: usize, j: usize| Ok(((i + 1) * (j + 1)) as f64 / 7.);
        let seq = parallel_gram(23, 1, f).unwrap();
        let par = parallel_gram(23, 4, f).unwrap();
        assert_eq!(seq, par);
    } // end of test_parallel_matches_sequential

    #[test]
    fn test_worker_error_aborts() {
        log_init_test();
        let res = parallel_gram(10, 2, |i, j| {
            if i == 3 && j == 5 {
                Err(anyhow!("worker failure"))
            } else {
                Ok(1.)
            }
        });
        assert!(res.is_err());
    } // end of test_worker_error_aborts
} // end of mod tests
