//! To ease access to most frequently used items
//!


pub use crate::graph::{EdgeData, LabeledGraph, NodeData};

pub use crate::dataset::{DatasetAttributes, LabelShape};

pub use crate::basekernel::{delta, gaussian, linear, polynomial, BaseKernels};

pub use crate::gram::{has_non_finite, is_symmetric, normalize_gram};
pub use crate::parallel::parallel_gram;

pub use crate::kernels::randomwalk::{random_walk_kernel, ComputeMethod, RandomWalkParams, SubKernel};
pub use crate::kernels::spkernel::{structural_sp_kernel, structural_sp_kernel_pair};
pub use crate::kernels::wl::{weisfeiler_lehman_kernel, wl_sp_pair, LabelCompressor, WlBase};
