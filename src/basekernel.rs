//! Base kernel functions on node or edge decorations.
//!
//! Kernel engines never interpret labels or attribute vectors themselves : the caller supplies
//! a table of scalar similarity functions, one entry per decoration shape. The symb entry
//! compares two symbolic labels, nsymb two numeric vectors, and mix takes both. A classical
//! choice is the Dirac delta on labels together with a gaussian on vectors, provided by
//! [BaseKernels::dirac_gaussian].


/// kernel on symbolic labels
pub type SymbKernelFn = Box<dyn Fn(&str, &str) -> f64 + Send + Sync>;
/// kernel on numeric attribute vectors
pub type NsymbKernelFn = Box<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>;
/// kernel on both
pub type MixKernelFn = Box<dyn Fn(&str, &str, &[f64], &[f64]) -> f64 + Send + Sync>;

/// the table of base kernel functions supplied by the caller, one for nodes and one for edges.
pub struct BaseKernels {
    pub symb: SymbKernelFn,
    pub nsymb: NsymbKernelFn,
    pub mix: MixKernelFn,
}

impl BaseKernels {
    pub fn new(symb: SymbKernelFn, nsymb: NsymbKernelFn, mix: MixKernelFn) -> Self {
        BaseKernels { symb, nsymb, mix }
    }

    /// Dirac delta on labels, gaussian of bandwidth sigma on vectors, product of both for mix
    pub fn dirac_gaussian(sigma: f64) -> Self {
        BaseKernels {
            symb: Box::new(delta),
            nsymb: Box::new(move |x, y| gaussian(x, y, sigma)),
            mix: Box::new(move |l1, l2, x, y| delta(l1, l2) * gaussian(x, y, sigma)),
        }
    } // end of dirac_gaussian
} // end of impl BaseKernels


/// Dirac kernel : 1. on equal labels, 0. else
pub fn delta(l1: &str, l2: &str) -> f64 {
    if l1 == l2 {
        1.
    } else {
        0.
    }
}

/// gaussian kernel between 2 vectors
pub fn gaussian(x: &[f64], y: &[f64], sigma: f64) -> f64 {
    let d2: f64 = x.iter().zip(y.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
    (-d2 / (2. * sigma * sigma)).exp()
}

/// linear kernel between 2 vectors
pub fn linear(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

/// polynomial kernel of degree d with offset c
pub fn polynomial(x: &[f64], y: &[f64], d: i32, c: f64) -> f64 {
    (linear(x, y) + c).powi(d)
}


//==============================================================================

// end of mod tests
