//! Mathematical kernels shared by the element implementations

pub mod plate;
pub mod quadrature;
pub mod sparse;
pub mod surface;

use nalgebra::{DMatrix, Matrix3, SMatrix, SVector, Vector3};

use crate::csys::CartesianFrame;
use crate::error::{ElementError, ElementResult};

// Re-export sparse utilities
pub use sparse::{to_csr, to_dense};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for line element stiffness and mass
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for line element forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Absolute tolerance on a condensation pivot `|K[p,p]|`
pub const PIVOT_TOL: f64 = 1e-12;

/// Tolerance used when classifying line elements as vertical
pub const VERTICAL_TOL: f64 = 1e-6;

/// Local frame and length for a two-node line element.
///
/// Local x runs from `i` to `j`. The reference point fixing the local z
/// plane is offset from `i` in global z, or in global x when the two ends
/// share their x and y coordinates within `tol` (a vertical element).
pub fn line_frame(
    i: &Vector3<f64>,
    j: &Vector3<f64>,
    tol: f64,
) -> ElementResult<(CartesianFrame, f64)> {
    let length = (j - i).norm();
    if length < tol {
        return Err(ElementError::GeometryDegenerate(
            "line element has zero length".to_string(),
        ));
    }

    let mut p2 = *i;
    if (i.x - j.x).abs() < tol && (i.y - j.y).abs() < tol {
        p2.x += 1.0;
    } else {
        p2.z += 1.0;
    }

    let frame = CartesianFrame::new(*i, *j, p2)?;
    Ok((frame, length))
}

/// Block-diagonal local-to-global transformation: `blocks` copies of the
/// frame's 3x3 axis matrix along the diagonal. A 12-DOF line uses 4 blocks;
/// a surface element uses 2 blocks per node.
pub fn block_transformation(frame: &CartesianFrame, blocks: usize) -> DMatrix<f64> {
    let v = frame.axes();
    let n = 3 * blocks;
    let mut t = DMatrix::zeros(n, n);

    for b in 0..blocks {
        let offset = 3 * b;
        for row in 0..3 {
            for col in 0..3 {
                t[(offset + row, offset + col)] = v[(row, col)];
            }
        }
    }

    t
}

/// Condense released DOFs out of a line element's local system by successive
/// rank-1 pivot elimination, in index order 0..11.
///
/// Each released pivot `p` zeroes row and column `p` of both matrices
/// (diagonal included) and folds the released force component into the
/// remaining entries of `r`. The matrices keep their 12x12 layout so the
/// assembler never has to renumber element DOFs.
pub fn condense_released(
    k: &mut Mat12,
    m: &mut Mat12,
    r: &mut Vec12,
    released: &[bool; 12],
) -> ElementResult<()> {
    for p in 0..12 {
        if !released[p] {
            continue;
        }

        let kp = k[(p, p)];
        if kp.abs() < PIVOT_TOL {
            return Err(ElementError::SingularCondensation { dof: p });
        }
        let mp = m[(p, p)];
        if mp.abs() < PIVOT_TOL {
            return Err(ElementError::SingularCondensation { dof: p });
        }

        let k_row = k.row(p).clone_owned();
        let k_col = k.column(p).clone_owned();
        let m_row = m.row(p).clone_owned();
        let m_col = m.column(p).clone_owned();
        let rp = r[p];

        for i in 0..12 {
            r[i] -= rp * k_row[i] / kp;
            for j in 0..12 {
                k[(i, j)] -= k_col[i] * k_row[j] / kp;
                m[(i, j)] -= m_col[i] * m_row[j] / mp;
            }
        }
    }

    Ok(())
}
