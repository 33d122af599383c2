//! Thin-plate bending machinery for the 4-node plate element
//!
//! Implements the DKQ (Discrete Kirchhoff Quadrilateral) formulation:
//! Batoz, J.-L. and Ben Tahar, M., "Evaluation of a new quadrilateral thin
//! plate bending element", International Journal for Numerical Methods in
//! Engineering, Vol. 18 (1982).
//!
//! The element carries 12 bending DOFs, (w, rx, ry) at each corner. The
//! rotations βx, βy are interpolated through the 8-node serendipity
//! functions with per-edge geometric constants; enforcing the Kirchhoff
//! condition at discrete points eliminates the mid-side DOFs and yields a
//! curvature matrix B_b(ξ, η) that reproduces constant-curvature states
//! exactly on arbitrary convex quadrilaterals.

use nalgebra::{Matrix3, SMatrix, Vector2};

use super::quadrature;
use super::surface;
use super::Mat12;
use crate::error::{ElementError, ElementResult};

/// Curvature strain-displacement matrix: 3 rows (kx, ky, kxy) by 12 bending
/// DOFs ordered (w, rx, ry) per corner
pub type BendingB = SMatrix<f64, 3, 12>;

/// Per-edge geometric constants of the DKQ rotation interpolation.
/// Edge k joins corner k and corner (k + 1) % 4.
#[derive(Debug, Clone)]
pub struct DkqEdges {
    a: [f64; 4],
    b: [f64; 4],
    c: [f64; 4],
    d: [f64; 4],
    e: [f64; 4],
}

/// Compute the DKQ edge constants from the projected corner coordinates
pub fn dkq_edges(xy: &[Vector2<f64>; 4]) -> ElementResult<DkqEdges> {
    let mut edges = DkqEdges {
        a: [0.0; 4],
        b: [0.0; 4],
        c: [0.0; 4],
        d: [0.0; 4],
        e: [0.0; 4],
    };

    for k in 0..4 {
        let i = k;
        let j = (k + 1) % 4;
        let xij = xy[i].x - xy[j].x;
        let yij = xy[i].y - xy[j].y;
        let l2 = xij * xij + yij * yij;
        if l2 < 1e-24 {
            return Err(ElementError::GeometryDegenerate(
                "plate edge has zero length".to_string(),
            ));
        }

        edges.a[k] = -xij / l2;
        edges.b[k] = 0.75 * xij * yij / l2;
        edges.c[k] = (0.25 * xij * xij - 0.5 * yij * yij) / l2;
        edges.d[k] = -yij / l2;
        edges.e[k] = (0.25 * yij * yij - 0.5 * xij * xij) / l2;
    }

    Ok(edges)
}

/// Derivatives of the 8-node serendipity shape functions with respect to the
/// natural coordinates. Corners 1-4 cyclic at (-1,-1), (1,-1), (1,1),
/// (-1,1); mid-side 5-8 on edges (1,2), (2,3), (3,4), (4,1).
fn serendipity_dn(xi: f64, eta: f64) -> ([f64; 8], [f64; 8]) {
    let dn_dxi = [
        0.25 * (1.0 - eta) * (2.0 * xi + eta),
        0.25 * (1.0 - eta) * (2.0 * xi - eta),
        0.25 * (1.0 + eta) * (2.0 * xi + eta),
        0.25 * (1.0 + eta) * (2.0 * xi - eta),
        -xi * (1.0 - eta),
        0.5 * (1.0 - eta * eta),
        -xi * (1.0 + eta),
        -0.5 * (1.0 - eta * eta),
    ];
    let dn_deta = [
        0.25 * (1.0 - xi) * (2.0 * eta + xi),
        0.25 * (1.0 + xi) * (2.0 * eta - xi),
        0.25 * (1.0 + xi) * (2.0 * eta + xi),
        0.25 * (1.0 - xi) * (2.0 * eta - xi),
        -0.5 * (1.0 - xi * xi),
        -eta * (1.0 + xi),
        0.5 * (1.0 - xi * xi),
        -eta * (1.0 - xi),
    ];
    (dn_dxi, dn_deta)
}

/// Natural-coordinate derivatives of the rotation interpolants Hx and Hy.
/// `dn` holds the serendipity derivatives in the requested direction.
fn h_derivatives(edges: &DkqEdges, dn: &[f64; 8]) -> ([f64; 12], [f64; 12]) {
    let mut hx = [0.0; 12];
    let mut hy = [0.0; 12];

    for n in 0..4 {
        let k = n; // edge after corner n
        let m = (n + 3) % 4; // edge before corner n
        let dnk = dn[4 + k];
        let dnm = dn[4 + m];
        let col = 3 * n;

        hx[col] = 1.5 * (edges.a[k] * dnk - edges.a[m] * dnm);
        hx[col + 1] = edges.b[k] * dnk + edges.b[m] * dnm;
        hx[col + 2] = dn[n] - edges.c[k] * dnk - edges.c[m] * dnm;

        hy[col] = 1.5 * (edges.d[k] * dnk - edges.d[m] * dnm);
        hy[col + 1] = -dn[n] + edges.e[k] * dnk + edges.e[m] * dnm;
        hy[col + 2] = -edges.b[k] * dnk - edges.b[m] * dnm;
    }

    (hx, hy)
}

/// Curvature matrix B_b and Jacobian determinant at the natural point
/// (ξ, η)
pub fn dkq_b_matrix(
    xy: &[Vector2<f64>; 4],
    edges: &DkqEdges,
    xi: f64,
    eta: f64,
) -> ElementResult<(BendingB, f64)> {
    let jac = surface::quad_jacobian(xy, xi, eta);
    let (inv, det) = surface::invert_jacobian(&jac)?;

    let (dn_dxi, dn_deta) = serendipity_dn(xi, eta);
    let (hx_xi, hy_xi) = h_derivatives(edges, &dn_dxi);
    let (hx_eta, hy_eta) = h_derivatives(edges, &dn_deta);

    let mut b = BendingB::zeros();
    for i in 0..12 {
        let hx_x = inv[(0, 0)] * hx_xi[i] + inv[(0, 1)] * hx_eta[i];
        let hx_y = inv[(1, 0)] * hx_xi[i] + inv[(1, 1)] * hx_eta[i];
        let hy_x = inv[(0, 0)] * hy_xi[i] + inv[(0, 1)] * hy_eta[i];
        let hy_y = inv[(1, 0)] * hy_xi[i] + inv[(1, 1)] * hy_eta[i];

        b[(0, i)] = hx_x;
        b[(1, i)] = hy_y;
        b[(2, i)] = hx_y + hy_x;
    }

    Ok((b, det))
}

/// Bending stiffness over the 12 bending DOFs:
/// `K_b = ∫∫ B_bᵀ D_b B_b det J dξ dη` with the 2x2 Gauss rule (exact for
/// the DKQ curvature fields).
///
/// `d_b` is the plate rigidity matrix `t³/12 · D_planestress`.
pub fn dkq_bending_stiffness(
    xy: &[Vector2<f64>; 4],
    d_b: &Matrix3<f64>,
) -> ElementResult<Mat12> {
    let edges = dkq_edges(xy)?;

    let mut k = Mat12::zeros();
    for ((xi, eta), w) in quadrature::reference_square(2) {
        let (b, det) = dkq_b_matrix(xy, &edges, xi, eta)?;
        k += b.transpose() * d_b * b * (det * w);
    }

    Ok(k)
}
