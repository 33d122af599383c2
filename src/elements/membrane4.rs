//! Membrane4 element - 4-node isoparametric membrane quadrilateral

use std::sync::Arc;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, Vector2, Vector3};
use nalgebra_sparse::CsrMatrix;
use uuid::Uuid;

use crate::csys::CartesianFrame;
use crate::elements::{Element, Material, Node};
use crate::error::{ElementError, ElementResult};
use crate::math::{self, quadrature, surface};

/// Strain-displacement matrix: 3 strain rows by 8 translational DOFs
type StrainB = SMatrix<f64, 3, 8>;

/// Rows of the 24-DOF layout holding the native in-plane translations
const SCATTER: [usize; 8] = [0, 1, 6, 7, 12, 13, 18, 19];

/// Gauss rule order: 4x4 tensor product, exact for degree-7 integrands
const GAUSS_ORDER: usize = 4;

/// A four-node bilinear membrane quadrilateral.
///
/// The native 8x8 stiffness is integrated numerically over the reference
/// square and scattered into the 24-DOF layout; only the in-plane
/// translations carry stiffness.
#[derive(Debug, Clone)]
pub struct Membrane4 {
    name: String,
    id: Option<usize>,
    nodes: [Arc<Node>; 4],
    frame: CartesianFrame,
    area: f64,
    thickness: f64,
    total_mass: f64,
    d: Matrix3<f64>,
    xy: [Vector2<f64>; 4],
    transform: CsrMatrix<f64>,
    stiffness: CsrMatrix<f64>,
    mass: CsrMatrix<f64>,
    nodal_force: DVector<f64>,
}

impl Membrane4 {
    /// Create a new membrane quadrilateral. Corners must be given in cyclic
    /// order; the winding direction does not matter.
    pub fn new(
        node_i: Arc<Node>,
        node_j: Arc<Node>,
        node_k: Arc<Node>,
        node_l: Arc<Node>,
        t: f64,
        material: &Material,
    ) -> ElementResult<Self> {
        if t <= 0.0 || !t.is_finite() {
            return Err(ElementError::InvalidParameter { name: "t", value: t });
        }

        let p = [
            node_i.position(),
            node_j.position(),
            node_k.position(),
            node_l.position(),
        ];
        let frame = surface::quad_frame(&p)?;
        let xy = surface::project_nodes(&frame, &p);
        let area = surface::quad_area(&p[0], &p[1], &p[2], &p[3]);

        let d = surface::plane_stress_d(material.e, material.nu);

        let mut k_native = SMatrix::<f64, 8, 8>::zeros();
        for ((r, s), w) in quadrature::reference_square(GAUSS_ORDER) {
            let (b, det) = b_matrix(&xy, r, s)?;
            k_native += b.transpose() * d * b * (det * w * t);
        }

        let mut ke = DMatrix::zeros(24, 24);
        for (i, &gi) in SCATTER.iter().enumerate() {
            for (j, &gj) in SCATTER.iter().enumerate() {
                ke[(gi, gj)] = k_native[(i, j)];
            }
        }

        let total_mass = material.rho * area * t;
        let mut me = DMatrix::zeros(24, 24);
        for n in 0..4 {
            for c in 0..3 {
                me[(6 * n + c, 6 * n + c)] = total_mass / 4.0;
            }
        }

        Ok(Self {
            name: Uuid::new_v4().to_string(),
            id: None,
            nodes: [node_i, node_j, node_k, node_l],
            frame: frame.clone(),
            area,
            thickness: t,
            total_mass,
            d,
            xy,
            transform: math::to_csr(&math::block_transformation(&frame, 8)),
            stiffness: math::to_csr(&ke),
            mass: math::to_csr(&me),
            nodal_force: DVector::zeros(24),
        })
    }

    /// Replace the auto-generated name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Quadrilateral area
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Membrane thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Projected corner coordinates in the local xy plane
    pub fn local_coords(&self) -> &[Vector2<f64>; 4] {
        &self.xy
    }

    /// In-plane stress (sx, sy, txy) at the natural point (r, s) from the
    /// element-local displacement vector
    pub fn stress_at(&self, u: &DVector<f64>, r: f64, s: f64) -> ElementResult<Vector3<f64>> {
        if u.len() != 24 {
            return Err(ElementError::InvalidLength {
                expected: 24,
                actual: u.len(),
            });
        }
        let mut u_native = SMatrix::<f64, 8, 1>::zeros();
        for (i, &gi) in SCATTER.iter().enumerate() {
            u_native[i] = u[gi];
        }
        let (b, _) = b_matrix(&self.xy, r, s)?;
        Ok(self.d * b * u_native)
    }

    /// Set the local nodal force vector
    pub fn set_nodal_force(&mut self, force: &[f64]) -> ElementResult<()> {
        if force.len() != 24 {
            return Err(ElementError::InvalidLength {
                expected: 24,
                actual: force.len(),
            });
        }
        self.nodal_force = DVector::from_row_slice(force);
        Ok(())
    }
}

/// Plane-stress strain-displacement matrix and Jacobian determinant at the
/// natural point (r, s)
fn b_matrix(xy: &[Vector2<f64>; 4], r: f64, s: f64) -> ElementResult<(StrainB, f64)> {
    let jac = surface::quad_jacobian(xy, r, s);
    let (inv, det) = surface::invert_jacobian(&jac)?;
    let (dn_dr, dn_ds) = surface::bilinear_dn(r, s);

    let mut b = StrainB::zeros();
    for n in 0..4 {
        let dn_dx = inv[(0, 0)] * dn_dr[n] + inv[(0, 1)] * dn_ds[n];
        let dn_dy = inv[(1, 0)] * dn_dr[n] + inv[(1, 1)] * dn_ds[n];

        b[(0, 2 * n)] = dn_dx;
        b[(1, 2 * n + 1)] = dn_dy;
        b[(2, 2 * n)] = dn_dy;
        b[(2, 2 * n + 1)] = dn_dx;
    }

    Ok((b, det))
}

impl Element for Membrane4 {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<usize> {
        self.id
    }

    fn set_id(&mut self, id: usize) {
        self.id = Some(id);
    }

    fn dimension(&self) -> usize {
        2
    }

    fn dof(&self) -> usize {
        24
    }

    fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    fn frame(&self) -> &CartesianFrame {
        &self.frame
    }

    fn transform(&self) -> &CsrMatrix<f64> {
        &self.transform
    }

    fn stiffness(&self) -> &CsrMatrix<f64> {
        &self.stiffness
    }

    fn mass(&self) -> &CsrMatrix<f64> {
        &self.mass
    }

    fn nodal_force(&self) -> &DVector<f64> {
        &self.nodal_force
    }

    fn total_mass(&self) -> f64 {
        self.total_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use crate::math::to_dense;

    fn material() -> Material {
        Material::isotropic(1e9, 0.25, 1000.0).unwrap()
    }

    fn quad(points: [[f64; 3]; 4]) -> Membrane4 {
        let nodes: Vec<Arc<Node>> = points
            .iter()
            .enumerate()
            .map(|(n, p)| Arc::new(Node::new(&format!("N{}", n + 1), p[0], p[1], p[2])))
            .collect();
        Membrane4::new(
            nodes[0].clone(),
            nodes[1].clone(),
            nodes[2].clone(),
            nodes[3].clone(),
            0.01,
            &material(),
        )
        .unwrap()
    }

    #[test]
    fn rotated_quad_matches_axis_aligned_local_stiffness() {
        let h = std::f64::consts::SQRT_2 / 2.0;
        let rotated = quad([
            [0.0, 0.0, 0.0],
            [h, h, 0.0],
            [2.0 * h, 0.0, 0.0],
            [h, -h, 0.0],
        ]);
        assert_relative_eq!(rotated.area(), 1.0, epsilon = 1e-12);

        // The same unit square, axis-aligned, with the node ordering the
        // 45-degree rotation maps onto
        let aligned = quad([
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
        ]);

        let k_rot = to_dense(rotated.stiffness());
        let k_ali = to_dense(aligned.stiffness());
        for i in 0..24 {
            for j in 0..24 {
                assert_relative_eq!(
                    k_rot[(i, j)],
                    k_ali[(i, j)],
                    epsilon = 1e-4,
                    max_relative = 1e-10
                );
            }
        }
    }

    #[test]
    fn uniform_strain_patch_test() {
        let m = quad([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let t = to_dense(m.transform());

        // u_x = x, u_y = 0 in global coordinates
        let mut u_global = DVector::zeros(24);
        for n in 0..4 {
            u_global[6 * n] = m.nodes()[n].x;
        }
        let u_local = &t * &u_global;

        // Uniform stress at every Gauss point
        let first = m.stress_at(&u_local, 0.0, 0.0).unwrap();
        for &((r, s), _) in &quadrature::reference_square(GAUSS_ORDER) {
            let sigma = m.stress_at(&u_local, r, s).unwrap();
            for c in 0..3 {
                assert_abs_diff_eq!(sigma[c], first[c], epsilon = 1e-9 * first.norm());
            }
        }

        // Stress rotated back to global axes matches the closed form
        let x = m.frame().x_axis();
        let y = m.frame().y_axis();
        let q = nalgebra::Matrix2::new(x.x, y.x, x.y, y.y);
        let sigma_local = nalgebra::Matrix2::new(first[0], first[2], first[2], first[1]);
        let sigma_global = q * sigma_local * q.transpose();

        let d0 = 1e9 / (1.0 - 0.25 * 0.25);
        assert_relative_eq!(sigma_global[(0, 0)], d0, epsilon = 1.0, max_relative = 1e-9);
        assert_relative_eq!(
            sigma_global[(1, 1)],
            0.25 * d0,
            epsilon = 1.0,
            max_relative = 1e-9
        );
        assert_abs_diff_eq!(sigma_global[(0, 1)], 0.0, epsilon = 1e-3);

        // Reaction forces balance
        let k_global = t.transpose() * to_dense(m.stiffness()) * &t;
        let f = &k_global * &u_global;
        for axis in 0..3 {
            let total: f64 = (0..4).map(|n| f[6 * n + axis]).sum();
            assert_abs_diff_eq!(total, 0.0, epsilon = 1e-12 * k_global.norm());
        }
    }

    #[test]
    fn stiffness_is_symmetric() {
        let m = quad([
            [0.0, 0.0, 0.0],
            [1.2, 0.1, 0.0],
            [1.0, 0.9, 0.0],
            [-0.1, 0.8, 0.0],
        ]);
        let k = to_dense(m.stiffness());
        for i in 0..24 {
            for j in 0..24 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn bowtie_ordering_is_rejected() {
        let m = Membrane4::new(
            Arc::new(Node::new("N1", 0.0, 0.0, 0.0)),
            Arc::new(Node::new("N2", 1.0, 0.0, 0.0)),
            Arc::new(Node::new("N3", 0.0, 1.0, 0.0)),
            Arc::new(Node::new("N4", 1.0, 1.0, 0.0)),
            0.01,
            &material(),
        );
        assert!(matches!(m, Err(ElementError::GeometryDegenerate(_))));
    }

    #[test]
    fn concave_quad_fails_the_jacobian_check() {
        let m = Membrane4::new(
            Arc::new(Node::new("N1", 0.0, 0.0, 0.0)),
            Arc::new(Node::new("N2", 1.0, 0.0, 0.0)),
            Arc::new(Node::new("N3", 0.3, 0.3, 0.0)),
            Arc::new(Node::new("N4", 0.0, 1.0, 0.0)),
            0.01,
            &material(),
        );
        assert!(matches!(m, Err(ElementError::GeometryDegenerate(_))));
    }

    #[test]
    fn lumped_mass_matches_element_mass() {
        let m = quad([
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        assert_relative_eq!(m.total_mass(), 1000.0 * 2.0 * 0.01, epsilon = 1e-12);

        let mm = to_dense(m.mass());
        let translational: f64 = (0..4)
            .flat_map(|n| (0..3).map(move |c| 6 * n + c))
            .map(|p| mm[(p, p)])
            .sum();
        assert_relative_eq!(translational, 3.0 * m.total_mass(), epsilon = 1e-12);
    }
}
