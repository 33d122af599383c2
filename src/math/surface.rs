//! Surface-element geometry: areas, local frames, projections, and the
//! plane-stress elasticity matrix

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

use crate::csys::CartesianFrame;
use crate::error::{ElementError, ElementResult};

/// Geometric area of a triangle in 3-D
pub fn triangle_area(i: &Vector3<f64>, j: &Vector3<f64>, k: &Vector3<f64>) -> f64 {
    0.5 * (j - i).cross(&(k - i)).norm()
}

/// Area of a quadrilateral as the sum of the two triangles either side of
/// diagonal i-k
pub fn quad_area(
    i: &Vector3<f64>,
    j: &Vector3<f64>,
    k: &Vector3<f64>,
    l: &Vector3<f64>,
) -> f64 {
    triangle_area(i, j, k) + triangle_area(i, k, l)
}

/// Signed area of a triangle in projected 2-D coordinates, positive when the
/// corners wind counterclockwise
pub fn triangle_signed_area_2d(p: &[Vector2<f64>; 3]) -> f64 {
    0.5 * ((p[1].x - p[0].x) * (p[2].y - p[0].y) - (p[2].x - p[0].x) * (p[1].y - p[0].y))
}

/// Local frame for a triangle: origin at the centroid, local x toward the
/// second corner, local z normal to the triangle plane.
pub fn triangle_frame(p: &[Vector3<f64>; 3]) -> ElementResult<CartesianFrame> {
    let centroid = (p[0] + p[1] + p[2]) / 3.0;
    CartesianFrame::new(centroid, p[1], p[0])
}

/// Local frame for a quadrilateral: origin at the corner centroid, local x
/// toward the midpoint of edge i-j, local z oriented so the midpoint of edge
/// j-k lies in the positive-y half plane. For a convex quadrilateral this
/// makes the projected corners wind counterclockwise.
pub fn quad_frame(p: &[Vector3<f64>; 4]) -> ElementResult<CartesianFrame> {
    let centroid = (p[0] + p[1] + p[2] + p[3]) / 4.0;
    let p1 = (p[0] + p[1]) / 2.0;
    let p2 = (p[1] + p[2]) / 2.0;
    CartesianFrame::new(centroid, p1, p2)
}

/// Project node positions onto a frame's local xy plane
pub fn project_nodes<const N: usize>(
    frame: &CartesianFrame,
    positions: &[Vector3<f64>; N],
) -> [Vector2<f64>; N] {
    positions.map(|p| frame.project(&p))
}

/// Plane-stress elasticity matrix relating in-plane stress to in-plane
/// strain under zero out-of-plane stress
pub fn plane_stress_d(e: f64, nu: f64) -> Matrix3<f64> {
    let d0 = e / (1.0 - nu * nu);
    Matrix3::new(
        d0,
        d0 * nu,
        0.0,
        d0 * nu,
        d0,
        0.0,
        0.0,
        0.0,
        d0 * (1.0 - nu) / 2.0,
    )
}

/// Derivatives of the bilinear shape functions with respect to the natural
/// coordinates (r, s). Corners are assigned cyclically to (-1,-1), (1,-1),
/// (1,1), (-1,1).
pub fn bilinear_dn(r: f64, s: f64) -> ([f64; 4], [f64; 4]) {
    let dn_dr = [
        -(1.0 - s) / 4.0,
        (1.0 - s) / 4.0,
        (1.0 + s) / 4.0,
        -(1.0 + s) / 4.0,
    ];
    let dn_ds = [
        -(1.0 - r) / 4.0,
        -(1.0 + r) / 4.0,
        (1.0 + r) / 4.0,
        (1.0 - r) / 4.0,
    ];
    (dn_dr, dn_ds)
}

/// Bilinear shape function values at (r, s)
pub fn bilinear_n(r: f64, s: f64) -> [f64; 4] {
    [
        (1.0 - r) * (1.0 - s) / 4.0,
        (1.0 + r) * (1.0 - s) / 4.0,
        (1.0 + r) * (1.0 + s) / 4.0,
        (1.0 - r) * (1.0 + s) / 4.0,
    ]
}

/// Jacobian of the bilinear map from the reference square to the projected
/// quadrilateral at (r, s)
pub fn quad_jacobian(xy: &[Vector2<f64>; 4], r: f64, s: f64) -> Matrix2<f64> {
    let (dn_dr, dn_ds) = bilinear_dn(r, s);

    let mut j = Matrix2::zeros();
    for n in 0..4 {
        j[(0, 0)] += dn_dr[n] * xy[n].x;
        j[(0, 1)] += dn_dr[n] * xy[n].y;
        j[(1, 0)] += dn_ds[n] * xy[n].x;
        j[(1, 1)] += dn_ds[n] * xy[n].y;
    }
    j
}

/// Invert a quadrature-point Jacobian, rejecting non-positive determinants
pub fn invert_jacobian(j: &Matrix2<f64>) -> ElementResult<(Matrix2<f64>, f64)> {
    let det = j[(0, 0)] * j[(1, 1)] - j[(0, 1)] * j[(1, 0)];
    if det <= 1e-12 {
        return Err(ElementError::GeometryDegenerate(
            "non-positive Jacobian determinant".to_string(),
        ));
    }
    let inv = Matrix2::new(j[(1, 1)], -j[(0, 1)], -j[(1, 0)], j[(0, 0)]) / det;
    Ok((inv, det))
}
