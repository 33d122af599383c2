//! Cross-element invariants and the reference scenarios every element kind
//! must satisfy.

use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{DMatrix, DVector, Vector3};

use fe_elements::math::to_dense;
use fe_elements::prelude::*;

fn node(name: &str, x: f64, y: f64, z: f64) -> Arc<Node> {
    Arc::new(Node::new(name, x, y, z))
}

fn steel() -> Material {
    Material::isotropic(200e9, 0.3, 7850.0).unwrap()
}

/// One element of each kind, all with lumped mass
fn sample_elements() -> Vec<Box<dyn Element>> {
    let section = Section::new(1e-3, 1e-6, 2e-6, 1e-6).unwrap();

    let link = Link::new(
        node("L1", 0.0, 0.0, 0.0),
        node("L2", 1.0, 2.0, 0.5),
        200e9,
        1e-4,
        7850.0,
    )
    .unwrap();

    let beam = Beam::new(
        node("B1", 0.0, 0.0, 0.0),
        node("B2", 2.0, 1.0, 0.0),
        &steel(),
        &section,
        MassModel::Lumped,
    )
    .unwrap();

    let tri = Membrane3::new(
        node("T1", 0.0, 0.0, 0.0),
        node("T2", 1.0, 0.1, 0.0),
        node("T3", 0.2, 0.9, 0.0),
        0.01,
        &steel(),
    )
    .unwrap();

    let quad = Membrane4::new(
        node("Q1", 0.0, 0.0, 0.0),
        node("Q2", 1.1, 0.0, 0.0),
        node("Q3", 1.2, 1.0, 0.0),
        node("Q4", -0.1, 0.9, 0.0),
        0.01,
        &steel(),
    )
    .unwrap();

    let plate = Plate4::new(
        node("P1", 0.0, 0.0, 0.0),
        node("P2", 1.0, 0.0, 0.0),
        node("P3", 1.1, 1.0, 0.0),
        node("P4", 0.0, 0.9, 0.0),
        0.01,
        &steel(),
    )
    .unwrap();

    vec![
        Box::new(link),
        Box::new(beam),
        Box::new(tri),
        Box::new(quad),
        Box::new(plate),
    ]
}

fn inf_norm(m: &DMatrix<f64>) -> f64 {
    m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

#[test]
fn stiffness_matrices_are_symmetric() {
    for element in sample_elements() {
        let k = to_dense(element.stiffness());
        let asym = inf_norm(&(&k - k.transpose()));
        assert!(
            asym < 1e-10 * inf_norm(&k),
            "asymmetric stiffness for {}",
            element.name()
        );
    }
}

#[test]
fn transformations_are_orthogonal_with_unit_determinant() {
    for element in sample_elements() {
        let t = to_dense(element.transform());
        let n = element.dof();
        assert_eq!(t.nrows(), n);

        let gram = t.transpose() * &t;
        let eye = DMatrix::<f64>::identity(n, n);
        assert!(
            inf_norm(&(&gram - &eye)) < 1e-12,
            "non-orthogonal transform for {}",
            element.name()
        );
        assert_relative_eq!(t.determinant(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn rigid_body_modes_carry_no_stiffness() {
    for element in sample_elements() {
        let t = to_dense(element.transform());
        let k_local = to_dense(element.stiffness());
        let k_global = t.transpose() * &k_local * &t;
        let k_scale = inf_norm(&k_global);

        let nodes = element.nodes();
        let centroid = nodes
            .iter()
            .fold(Vector3::zeros(), |acc, n| acc + n.position())
            / nodes.len() as f64;

        // Three rigid translations
        for axis in 0..3 {
            let mut u = DVector::zeros(element.dof());
            for (n, _) in nodes.iter().enumerate() {
                u[6 * n + axis] = 1.0;
            }
            let f = &k_global * &u;
            assert!(
                f.amax() <= 1e-8 * k_scale,
                "translation mode {} resisted by {}",
                axis,
                element.name()
            );
        }

        // Three rigid rotations about the centroid
        for axis in 0..3 {
            let mut omega = Vector3::zeros();
            omega[axis] = 1.0;
            let mut u = DVector::zeros(element.dof());
            for (n, nd) in nodes.iter().enumerate() {
                let disp = omega.cross(&(nd.position() - centroid));
                for c in 0..3 {
                    u[6 * n + c] = disp[c];
                    u[6 * n + 3 + c] = omega[c];
                }
            }
            let f = &k_global * &u;
            assert!(
                f.amax() <= 1e-8 * k_scale,
                "rotation mode {} resisted by {}",
                axis,
                element.name()
            );
        }
    }
}

#[test]
fn lumped_mass_reproduces_element_mass_per_axis() {
    for element in sample_elements() {
        let m = to_dense(element.mass());
        let translational: f64 = (0..element.nodes().len())
            .flat_map(|n| (0..3).map(move |c| 6 * n + c))
            .map(|p| m[(p, p)])
            .sum();
        assert_relative_eq!(
            translational,
            3.0 * element.total_mass(),
            epsilon = 1e-10,
            max_relative = 1e-12
        );
    }
}

#[test]
fn mass_matrices_are_symmetric_positive_semidefinite() {
    for element in sample_elements() {
        let m = to_dense(element.mass());
        let asym = inf_norm(&(&m - m.transpose()));
        assert!(asym <= 1e-12 * inf_norm(&m).max(1.0));

        // Shifted Cholesky: M + eps I must factor if M is PSD
        let n = element.dof();
        let shifted = &m + DMatrix::<f64>::identity(n, n) * (1e-9 * inf_norm(&m).max(1e-30));
        assert!(
            shifted.cholesky().is_some(),
            "indefinite mass matrix for {}",
            element.name()
        );
    }
}

// Scenario A: axial link between (0,0,0) and (1,0,0)
#[test]
fn scenario_a_axial_link() {
    let link = Link::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", 1.0, 0.0, 0.0),
        200e9,
        1e-4,
        7850.0,
    )
    .unwrap();

    let k = to_dense(link.stiffness());
    assert_relative_eq!(k[(0, 0)], 2.0e7, epsilon = 1e-3);
    assert_relative_eq!(k[(0, 6)], -2.0e7, epsilon = 1e-3);

    let t = to_dense(link.transform());
    let eye = DMatrix::<f64>::identity(12, 12);
    assert!(inf_norm(&(&t - &eye)) < 1e-12);

    assert_relative_eq!(link.total_mass(), 0.785, epsilon = 1e-12);
}

// Scenario B: cantilever tip deflection FL^3/(3 E I3)
#[test]
fn scenario_b_cantilever_tip_deflection() {
    let material = Material::isotropic(2e11, 0.3, 7850.0).unwrap();
    let section = Section::new(1e-3, 1e-6, 1e-6, 2e-6).unwrap();
    let beam = Beam::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", 1.0, 0.0, 0.0),
        &material,
        &section,
        MassModel::Lumped,
    )
    .unwrap();

    let k = to_dense(beam.stiffness());
    let mut kff = DMatrix::zeros(6, 6);
    for i in 0..6 {
        for j in 0..6 {
            kff[(i, j)] = k[(6 + i, 6 + j)];
        }
    }
    let mut f = DVector::zeros(6);
    f[1] = 1.0;
    let u = kff.lu().solve(&f).unwrap();

    let expected = 1.0 / (3.0 * 2e11 * 1e-6);
    assert_relative_eq!(u[1], expected, max_relative = 1e-10);
}

// Scenario C: moment release about local 3 at end j
#[test]
fn scenario_c_released_beam_matches_propped_cantilever() {
    let material = Material::isotropic(2e11, 0.3, 7850.0).unwrap();
    let section = Section::new(1e-3, 1e-6, 1e-6, 2e-6).unwrap();
    let mut beam = Beam::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", 1.0, 0.0, 0.0),
        &material,
        &section,
        MassModel::Lumped,
    )
    .unwrap();

    let mut releases = [false; 12];
    releases[11] = true;
    beam.set_releases(&releases).unwrap();

    let k = to_dense(beam.stiffness());
    for j in 0..12 {
        assert_abs_diff_eq!(k[(11, j)], 0.0, epsilon = 1e-9);
    }
    // Tip translational stiffness of a propped member: 3EI/L^3
    assert_relative_eq!(k[(7, 7)], 3.0 * 2e11 * 1e-6, epsilon = 1e-4);
}

// Scenario D: CST patch test
#[test]
fn scenario_d_cst_patch_test() {
    let material = Material::isotropic(1e9, 0.25, 1000.0).unwrap();
    let tri = Membrane3::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", 1.0, 0.0, 0.0),
        node("N3", 0.0, 1.0, 0.0),
        0.01,
        &material,
    )
    .unwrap();

    let t = to_dense(tri.transform());
    let mut u_global = DVector::zeros(18);
    for n in 0..3 {
        u_global[6 * n] = tri.nodes()[n].x;
    }

    let k_global = t.transpose() * to_dense(tri.stiffness()) * &t;
    let f = &k_global * &u_global;
    for axis in 0..3 {
        let total: f64 = (0..3).map(|n| f[6 * n + axis]).sum();
        assert_abs_diff_eq!(total, 0.0, epsilon = 1e-12 * inf_norm(&k_global));
    }

    // Constant stress sigma_xx = E / (1 - nu^2) once rotated back to global
    let u_local = &t * &u_global;
    let sigma = tri.stress(&u_local).unwrap();
    let x = tri.frame().x_axis();
    let y = tri.frame().y_axis();
    let q = nalgebra::Matrix2::new(x.x, y.x, x.y, y.y);
    let sigma_tensor = nalgebra::Matrix2::new(sigma[0], sigma[2], sigma[2], sigma[1]);
    let sigma_global = q * sigma_tensor * q.transpose();

    let d0 = 1e9 / (1.0 - 0.25 * 0.25);
    assert_relative_eq!(sigma_global[(0, 0)], d0, max_relative = 1e-9);
}

// Scenario E: quadrilateral rotated 45 degrees
#[test]
fn scenario_e_rotated_quad() {
    let h = std::f64::consts::SQRT_2 / 2.0;
    let material = Material::isotropic(1e9, 0.25, 1000.0).unwrap();

    let rotated = Membrane4::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", h, h, 0.0),
        node("N3", 2.0 * h, 0.0, 0.0),
        node("N4", h, -h, 0.0),
        0.01,
        &material,
    )
    .unwrap();
    assert_relative_eq!(rotated.area(), 1.0, epsilon = 1e-12);

    // Rotating the element by 45 degrees maps its corners onto the
    // axis-aligned unit square traversed as (0,0), (0,1), (1,1), (1,0);
    // both project to identical local coordinates, so the local stiffness
    // matrices must agree entry for entry.
    let aligned = Membrane4::new(
        node("M1", 0.0, 0.0, 0.0),
        node("M2", 0.0, 1.0, 0.0),
        node("M3", 1.0, 1.0, 0.0),
        node("M4", 1.0, 0.0, 0.0),
        0.01,
        &material,
    )
    .unwrap();

    let k_rot = to_dense(rotated.stiffness());
    let k_ali = to_dense(aligned.stiffness());
    let scale = inf_norm(&k_ali);
    assert!(inf_norm(&(&k_rot - &k_ali)) < 1e-10 * scale);

    // And the global matrices agree after conjugating with the rotation
    let t_rot = to_dense(rotated.transform());
    let t_ali = to_dense(aligned.transform());
    let g_rot = t_rot.transpose() * &k_rot * &t_rot;
    let g_ali = t_ali.transpose() * &k_ali * &t_ali;

    let (sin, cos) = std::f64::consts::FRAC_PI_4.sin_cos();
    let rot3 = nalgebra::Matrix3::new(cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0);
    let mut r_block = DMatrix::zeros(24, 24);
    for b in 0..8 {
        for i in 0..3 {
            for j in 0..3 {
                r_block[(3 * b + i, 3 * b + j)] = rot3[(i, j)];
            }
        }
    }
    let g_mapped = r_block.transpose() * &g_ali * &r_block;
    assert!(inf_norm(&(&g_rot - &g_mapped)) < 1e-10 * scale);
}

// Scenario F: vertical beam gets a well-defined frame
#[test]
fn scenario_f_vertical_beam_orientation() {
    let beam = Beam::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", 0.0, 0.0, 1.0),
        &steel(),
        &Section::new(1e-3, 1e-6, 1e-6, 2e-6).unwrap(),
        MassModel::Lumped,
    )
    .unwrap();

    // Local x maps onto global z
    let t = to_dense(beam.transform());
    assert_relative_eq!(t[(0, 2)], 1.0, epsilon = 1e-12);
    assert_relative_eq!(t.determinant(), 1.0, epsilon = 1e-12);
}

// Condensation idempotence and force recovery against closed forms
#[test]
fn beam_force_recovery_matches_analytical_load_cases() {
    let e = 2e11;
    let (a, i2, i3, j) = (1e-3, 1e-6, 1e-6, 2e-6);
    let material = Material::isotropic(e, 0.3, 7850.0).unwrap();
    let section = Section::new(a, i2, i3, j).unwrap();
    let g = e / (2.0 * 1.3);
    let l = 1.0;

    let beam = Beam::new(
        node("N1", 0.0, 0.0, 0.0),
        node("N2", 1.0, 0.0, 0.0),
        &material,
        &section,
        MassModel::Lumped,
    )
    .unwrap();

    // Pure axial stretch
    let mut u = DVector::zeros(12);
    u[6] = 1e-6;
    let f = beam.element_force(&u).unwrap();
    assert_relative_eq!(f[6], e * a / l * 1e-6, max_relative = 1e-10);
    assert_relative_eq!(f[0], -e * a / l * 1e-6, max_relative = 1e-10);

    // Pure torsion
    let mut u = DVector::zeros(12);
    u[9] = 1e-4;
    let f = beam.element_force(&u).unwrap();
    assert_relative_eq!(f[9], g * j / l * 1e-4, max_relative = 1e-10);
    assert_relative_eq!(f[3], -g * j / l * 1e-4, max_relative = 1e-10);

    // Cantilever bending: tip displacement and rotation of the exact
    // solution under a unit tip load
    let ei = e * i3;
    let mut u = DVector::zeros(12);
    u[7] = l * l * l / (3.0 * ei);
    u[11] = l * l / (2.0 * ei);
    let f = beam.element_force(&u).unwrap();
    assert_relative_eq!(f[7], 1.0, max_relative = 1e-8);
    assert_abs_diff_eq!(f[11], 0.0, epsilon = 1e-6);
    assert_relative_eq!(f[1], -1.0, max_relative = 1e-8);
    assert_relative_eq!(f[5], -l, max_relative = 1e-8);
}

#[test]
fn data_types_round_trip_through_serde() {
    let material = steel();
    let json = serde_json::to_string(&material).unwrap();
    let back: Material = serde_json::from_str(&json).unwrap();
    assert_eq!(back.e, material.e);
    assert_eq!(back.nu, material.nu);

    let section = Section::rectangular(0.3, 0.5).unwrap();
    let json = serde_json::to_string(&section).unwrap();
    let back: Section = serde_json::from_str(&json).unwrap();
    assert_eq!(back.a, section.a);
    assert_eq!(back.j, section.j);
}

#[test]
fn elements_report_their_layout() {
    let expected: Vec<(usize, usize, usize)> = vec![
        (1, 12, 2), // link
        (1, 12, 2), // beam
        (2, 18, 3), // membrane3
        (2, 24, 4), // membrane4
        (2, 24, 4), // plate4
    ];
    for (element, (dim, dof, nodes)) in sample_elements().iter().zip(expected) {
        assert_eq!(element.dimension(), dim);
        assert_eq!(element.dof(), dof);
        assert_eq!(element.nodes().len(), nodes);
        assert_eq!(element.nodal_force().len(), dof);
        assert!(element.id().is_none());
    }
}

#[test]
fn assembler_ids_are_settable() {
    let mut elements = sample_elements();
    for (i, element) in elements.iter_mut().enumerate() {
        element.set_id(i);
        assert_eq!(element.id(), Some(i));
    }
}
