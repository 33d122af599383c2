//! Gauss-Legendre quadrature over the reference square [-1, 1] x [-1, 1]

/// 1-point rule, exact for linear polynomials
const GAUSS_1: [(f64, f64); 1] = [(0.0, 2.0)];

/// 2-point rule, exact for cubics
const GAUSS_2: [(f64, f64); 2] = [
    (-0.577_350_269_189_625_8, 1.0),
    (0.577_350_269_189_625_8, 1.0),
];

/// 3-point rule, exact for quintics
const GAUSS_3: [(f64, f64); 3] = [
    (-0.774_596_669_241_483_4, 5.0 / 9.0),
    (0.0, 8.0 / 9.0),
    (0.774_596_669_241_483_4, 5.0 / 9.0),
];

/// 4-point rule, exact for degree-7 polynomials
const GAUSS_4: [(f64, f64); 4] = [
    (-0.861_136_311_594_052_6, 0.347_854_845_137_453_9),
    (-0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
    (0.339_981_043_584_856_3, 0.652_145_154_862_546_1),
    (0.861_136_311_594_052_6, 0.347_854_845_137_453_9),
];

/// Points and weights `(x, w)` of the n-point Gauss-Legendre rule on
/// [-1, 1], exact for polynomials of degree `2n - 1`. `n` is clamped to the
/// 1..=4 range.
pub fn gauss_legendre(n: usize) -> &'static [(f64, f64)] {
    match n {
        0 | 1 => &GAUSS_1,
        2 => &GAUSS_2,
        3 => &GAUSS_3,
        _ => &GAUSS_4,
    }
}

/// Tensor-product rule over the reference square, yielding `((r, s), w)`.
pub fn reference_square(n: usize) -> Vec<((f64, f64), f64)> {
    let pts = gauss_legendre(n);
    let mut rule = Vec::with_capacity(pts.len() * pts.len());
    for &(r, wr) in pts {
        for &(s, ws) in pts {
            rule.push(((r, s), wr * ws));
        }
    }
    rule
}
