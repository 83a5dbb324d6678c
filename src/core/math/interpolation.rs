use nalgebra::{Point2, Vector3};

/// Denominator magnitude below which a screen-space triangle is treated as
/// degenerate (zero-area projection) and skipped.
pub const DEGENERATE_EPSILON: f32 = 1e-5;

/// The line function f_ij(p) = (y_i - y_j) x + (x_j - x_i) y + x_i y_j - x_j y_i.
///
/// Proportional to the signed distance of p from the line through i and j.
#[inline]
fn edge_function(p: Point2<f32>, i: Point2<f32>, j: Point2<f32>) -> f32 {
    (i.y - j.y) * p.x + (j.x - i.x) * p.y + i.x * j.y - j.x * i.y
}

/// Barycentric weight solver for one screen-space triangle (a, b, c).
///
/// The three denominators f_bc(a), f_ac(b), f_ab(c) are precomputed once per
/// triangle; `weights` then costs three line evaluations per pixel.
pub struct Barycentric {
    a: Point2<f32>,
    b: Point2<f32>,
    c: Point2<f32>,
    inv_fa: f32,
    inv_fb: f32,
    inv_fc: f32,
}

impl Barycentric {
    /// Returns `None` if any denominator is near zero, i.e. the projected
    /// triangle is degenerate (collinear screen points).
    pub fn new(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> Option<Self> {
        let fa = edge_function(a, b, c);
        let fb = edge_function(b, a, c);
        let fc = edge_function(c, a, b);
        if fa.abs() < DEGENERATE_EPSILON
            || fb.abs() < DEGENERATE_EPSILON
            || fc.abs() < DEGENERATE_EPSILON
        {
            return None;
        }
        Some(Self {
            a,
            b,
            c,
            inv_fa: 1.0 / fa,
            inv_fb: 1.0 / fb,
            inv_fc: 1.0 / fc,
        })
    }

    /// The weights (alpha, beta, gamma) of p with respect to (a, b, c).
    /// They sum to 1 for any p; each lies in [0, 1] iff p is inside the
    /// triangle (inclusive of edges).
    #[inline]
    pub fn weights(&self, p: Point2<f32>) -> Vector3<f32> {
        Vector3::new(
            edge_function(p, self.b, self.c) * self.inv_fa,
            edge_function(p, self.a, self.c) * self.inv_fb,
            edge_function(p, self.a, self.b) * self.inv_fc,
        )
    }
}

/// Inclusive containment test: every weight within [0, 1]. The closed
/// interval keeps pixels that land exactly on a shared edge; overlap between
/// neighboring triangles is resolved by the depth test.
#[inline]
pub fn is_inside_triangle(bary: &Vector3<f32>) -> bool {
    (0.0..=1.0).contains(&bary.x)
        && (0.0..=1.0).contains(&bary.y)
        && (0.0..=1.0).contains(&bary.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Barycentric {
        Barycentric::new(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        )
        .unwrap()
    }

    #[test]
    fn weights_partition_unity_inside() {
        let b = tri();
        for &(x, y) in &[(1.0, 1.0), (3.0, 4.0), (5.0, 2.5), (0.5, 8.0)] {
            let w = b.weights(Point2::new(x, y));
            assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5);
            assert!(is_inside_triangle(&w));
        }
    }

    #[test]
    fn weights_are_unit_basis_at_vertices() {
        let b = tri();
        let wa = b.weights(Point2::new(0.0, 0.0));
        assert!((wa - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-5);
        let wb = b.weights(Point2::new(10.0, 0.0));
        assert!((wb - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-5);
        let wc = b.weights(Point2::new(0.0, 10.0));
        assert!((wc - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn edge_points_count_as_inside() {
        // Midpoint of the a-b edge has gamma exactly 0 and must be kept.
        let b = tri();
        let w = b.weights(Point2::new(5.0, 0.0));
        assert!(w.z.abs() < 1e-6);
        assert!(is_inside_triangle(&w));
    }

    #[test]
    fn outside_points_are_rejected() {
        let b = tri();
        let w = b.weights(Point2::new(8.0, 8.0));
        assert!(!is_inside_triangle(&w));
        let w = b.weights(Point2::new(-1.0, 5.0));
        assert!(!is_inside_triangle(&w));
    }

    #[test]
    fn collinear_triangle_is_degenerate() {
        let degenerate = Barycentric::new(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(10.0, 10.0),
        );
        assert!(degenerate.is_none());
    }
}
