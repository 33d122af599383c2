//! Sparse storage for the exposed element artifacts
//!
//! Element matrices are small (n <= 24) but mostly zero: a link couples 2 of
//! 144 stiffness entries, a membrane leaves every rotational row empty. The
//! assembler-facing artifacts are therefore stored in CSR form; the dense
//! working matrices stay private to each element.

use nalgebra::{DMatrix, Dim, Matrix, RawStorage};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Convert a dense element matrix to CSR, dropping exact zeros
pub fn to_csr<R, C, S>(dense: &Matrix<f64, R, C, S>) -> CsrMatrix<f64>
where
    R: Dim,
    C: Dim,
    S: RawStorage<f64, R, C>,
{
    let (nrows, ncols) = dense.shape();
    let mut coo = CooMatrix::new(nrows, ncols);
    for i in 0..nrows {
        for j in 0..ncols {
            let value = dense[(i, j)];
            if value != 0.0 {
                coo.push(i, j, value);
            }
        }
    }
    CsrMatrix::from(&coo)
}

/// Expand a CSR artifact back to dense form (assembler-side debugging and
/// tests)
pub fn to_dense(sparse: &CsrMatrix<f64>) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(sparse.nrows(), sparse.ncols());
    for (i, j, value) in sparse.triplet_iter() {
        out[(i, j)] += value;
    }
    out
}
