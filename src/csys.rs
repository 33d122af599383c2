//! Local Cartesian coordinate frames
//!
//! Every element carries a right-handed orthonormal frame derived from its
//! node geometry. Stiffness and mass are formed in this frame; the
//! block-diagonal transformation built from it maps them back to global
//! coordinates.

use nalgebra::{Matrix3, Vector2, Vector3};

use crate::error::{ElementError, ElementResult};

/// Norm below which a direction vector is treated as degenerate
const NORM_TOL: f64 = 1e-12;

/// A right-handed orthonormal frame: origin plus a 3x3 matrix whose rows are
/// the local x, y, z unit vectors expressed in global coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianFrame {
    origin: Vector3<f64>,
    axes: Matrix3<f64>,
}

impl CartesianFrame {
    /// Build a frame from three points: local x runs from `origin` toward
    /// `p1`; local z is normal to the plane spanned by local x and
    /// `p2 - origin`; local y completes the right-handed triad (`y = z × x`).
    pub fn new(
        origin: Vector3<f64>,
        p1: Vector3<f64>,
        p2: Vector3<f64>,
    ) -> ElementResult<Self> {
        let v1 = p1 - origin;
        let n1 = v1.norm();
        if n1 < NORM_TOL {
            return Err(ElementError::GeometryDegenerate(
                "frame origin and x-axis point coincide".to_string(),
            ));
        }
        let x = v1 / n1;

        let zn = x.cross(&(p2 - origin));
        let nz = zn.norm();
        if nz < NORM_TOL {
            return Err(ElementError::GeometryDegenerate(
                "frame points are collinear".to_string(),
            ));
        }
        let z = zn / nz;
        let y = z.cross(&x);

        let axes = Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]);
        Ok(Self { origin, axes })
    }

    /// Frame origin in global coordinates
    pub fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    /// Row-orthonormal axis matrix (rows are local x, y, z)
    pub fn axes(&self) -> &Matrix3<f64> {
        &self.axes
    }

    /// Local x unit vector in global coordinates
    pub fn x_axis(&self) -> Vector3<f64> {
        self.axes.row(0).transpose()
    }

    /// Local y unit vector in global coordinates
    pub fn y_axis(&self) -> Vector3<f64> {
        self.axes.row(1).transpose()
    }

    /// Local z unit vector in global coordinates
    pub fn z_axis(&self) -> Vector3<f64> {
        self.axes.row(2).transpose()
    }

    /// Express a global position in this frame's coordinates
    pub fn to_local(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.axes * (p - self.origin)
    }

    /// Project a global position onto the local xy plane
    pub fn project(&self, p: &Vector3<f64>) -> Vector2<f64> {
        let q = self.to_local(p);
        Vector2::new(q.x, q.y)
    }
}
