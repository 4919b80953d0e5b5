use std::ops::{Add, Mul};

use crate::{vec3::Vec3, vec4::Vec4};

/// Row-major 4x4 matrix.
///
/// Index notation is: i, j - row, column.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Matrix4x4<T>([Vec4<T>; 4]);

impl<T: Copy> Matrix4x4<T> {
    pub fn new(v: [[T; 4]; 4]) -> Self {
        Matrix4x4([Vec4::from(v[0]), Vec4::from(v[1]), Vec4::from(v[2]), Vec4::from(v[3])])
    }
}

impl Matrix4x4<f64> {
    pub fn identity() -> Self {
        Matrix4x4::new([[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]])
    }

    pub fn translation(offset: Vec3<f64>) -> Self {
        Matrix4x4::new([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(factors: Vec3<f64>) -> Self {
        Matrix4x4::new([
            [factors.x, 0.0, 0.0, 0.0],
            [0.0, factors.y, 0.0, 0.0],
            [0.0, 0.0, factors.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();

        Matrix4x4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();

        Matrix4x4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();

        Matrix4x4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Embeds a linear 3x3 map into a 4x4 matrix with zero translation.
    pub fn from_linear(m: &Matrix3x3<f64>) -> Self {
        let r = &m.0;

        Matrix4x4::new([
            [r[0].x, r[0].y, r[0].z, 0.0],
            [r[1].x, r[1].y, r[1].z, 0.0],
            [r[2].x, r[2].y, r[2].z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// The upper-left 3x3 block.
    pub fn linear(&self) -> Matrix3x3<f64> {
        let a = &self.0;

        Matrix3x3::new([
            [a[0][0], a[0][1], a[0][2]],
            [a[1][0], a[1][1], a[1][2]],
            [a[2][0], a[2][1], a[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// 2x2 minors of the upper (`s`) and lower (`c`) row pairs.
    fn minors(&self) -> ([f64; 6], [f64; 6]) {
        let a = &self.0;

        let s = [
            a[0][0] * a[1][1] - a[1][0] * a[0][1],
            a[0][0] * a[1][2] - a[1][0] * a[0][2],
            a[0][0] * a[1][3] - a[1][0] * a[0][3],
            a[0][1] * a[1][2] - a[1][1] * a[0][2],
            a[0][1] * a[1][3] - a[1][1] * a[0][3],
            a[0][2] * a[1][3] - a[1][2] * a[0][3],
        ];

        let c = [
            a[2][0] * a[3][1] - a[3][0] * a[2][1],
            a[2][0] * a[3][2] - a[3][0] * a[2][2],
            a[2][0] * a[3][3] - a[3][0] * a[2][3],
            a[2][1] * a[3][2] - a[3][1] * a[2][2],
            a[2][1] * a[3][3] - a[3][1] * a[2][3],
            a[2][2] * a[3][3] - a[3][2] * a[2][3],
        ];

        (s, c)
    }

    /// Returns the inverse, or `None` when the matrix is singular.
    ///
    /// Singularity is judged relative to the product of the row lengths, which
    /// bounds `|det|` from above, so uniformly tiny or huge scales still invert.
    pub fn try_inverse(&self) -> Option<Self> {
        let (s, c) = self.minors();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];

        let a = &self.0;
        let row_lengths: f64 = (0..4)
            .map(|i| (0..4).map(|j| a[i][j] * a[i][j]).sum::<f64>().sqrt())
            .product();

        if !det.is_finite() || det.abs() <= f64::EPSILON * row_lengths {
            return None;
        }

        let inv_det = 1.0 / det;
        let mut m = [[0.0; 4]; 4];

        m[0][0] = ( a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3]) * inv_det;
        m[0][1] = (-a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3]) * inv_det;
        m[0][2] = ( a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3]) * inv_det;
        m[0][3] = (-a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3]) * inv_det;

        m[1][0] = (-a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1]) * inv_det;
        m[1][1] = ( a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1]) * inv_det;
        m[1][2] = (-a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1]) * inv_det;
        m[1][3] = ( a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1]) * inv_det;

        m[2][0] = ( a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0]) * inv_det;
        m[2][1] = (-a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0]) * inv_det;
        m[2][2] = ( a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0]) * inv_det;
        m[2][3] = (-a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0]) * inv_det;

        m[3][0] = (-a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0]) * inv_det;
        m[3][1] = ( a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0]) * inv_det;
        m[3][2] = (-a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0]) * inv_det;
        m[3][3] = ( a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0]) * inv_det;

        Some(Matrix4x4::new(m))
    }

    #[inline]
    pub fn transform_point(&self, p: Vec3<f64>) -> Vec3<f64> {
        (self * Vec4::point(p)).into()
    }

    #[inline]
    pub fn transform_vector(&self, v: Vec3<f64>) -> Vec3<f64> {
        (self * Vec4::direction(v)).into()
    }
}

impl<'a, T: Copy + Add<Output = T> + Mul<Output = T>> Mul<Vec4<T>> for &'a Matrix4x4<T> {
    type Output = Vec4<T>;

    fn mul(self, vec: Vec4<T>) -> Self::Output {
        Vec4::new(
            vec[0] * self.0[0][0] + vec[1] * self.0[0][1] + vec[2] * self.0[0][2] + vec[3] * self.0[0][3],
            vec[0] * self.0[1][0] + vec[1] * self.0[1][1] + vec[2] * self.0[1][2] + vec[3] * self.0[1][3],
            vec[0] * self.0[2][0] + vec[1] * self.0[2][1] + vec[2] * self.0[2][2] + vec[3] * self.0[2][3],
            vec[0] * self.0[3][0] + vec[1] * self.0[3][1] + vec[2] * self.0[3][2] + vec[3] * self.0[3][3],
        )
    }
}

impl Mul<Matrix4x4<f64>> for Matrix4x4<f64> {
    type Output = Matrix4x4<f64>;

    fn mul(self, o: Matrix4x4<f64>) -> Self::Output {
        let mut out = Matrix4x4::<f64>::default();

        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    out.0[i][j] = out.0[i][j] + self.0[i][k] * o.0[k][j];
                }
            }
        }

        out
    }
}

/// Row-major 3x3 matrix, used for linear maps such as the normal matrix.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Matrix3x3<T>([Vec3<T>; 3]);

impl<T: Copy> Matrix3x3<T> {
    pub fn new(v: [[T; 3]; 3]) -> Self {
        Matrix3x3([Vec3::from(v[0]), Vec3::from(v[1]), Vec3::from(v[2])])
    }
}

impl Matrix3x3<f64> {
    pub fn transpose(&self) -> Self {
        let r = &self.0;

        Matrix3x3::new([
            [r[0].x, r[1].x, r[2].x],
            [r[0].y, r[1].y, r[2].y],
            [r[0].z, r[1].z, r[2].z],
        ])
    }
}

impl<'a> Mul<Vec3<f64>> for &'a Matrix3x3<f64> {
    type Output = Vec3<f64>;

    #[inline]
    fn mul(self, v: Vec3<f64>) -> Self::Output {
        Vec3::new(self.0[0].dot(&v), self.0[1].dot(&v), self.0[2].dot(&v))
    }
}

#[test]
fn mul_matrix_vec() {
    let matrix = &Matrix4x4::new([[1, 0, 0, 10], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]);
    let vec = Vec4::new(10, 10, 10, 1);

    assert_eq!(Vec4::new(20, 10, 10, 1), matrix * vec);
}

#[test]
fn inverse_identity() {
    let i = Matrix4x4::identity();
    assert_eq!(Some(i), i.try_inverse());
}

#[test]
fn inverse_undoes_affine_map() {
    let m = Matrix4x4::translation(Vec3::new(1.0, -2.0, 3.0))
        * Matrix4x4::rotation_y(0.7)
        * Matrix4x4::scaling(Vec3::new(2.0, 0.5, 3.0));
    let inv = m.try_inverse().unwrap();

    let p = Vec3::new(0.3, 4.0, -1.5);
    let back = inv.transform_point(m.transform_point(p));

    assert!((back - p).len() < 1e-12);

    let product = m * inv;
    let identity = Matrix4x4::identity();
    for i in 0..4 {
        for j in 0..4 {
            assert!((product.0[i][j] - identity.0[i][j]).abs() < 1e-12);
        }
    }
}

#[test]
fn singular_matrix_has_no_inverse() {
    let flat = Matrix4x4::scaling(Vec3::new(1.0, 0.0, 1.0));

    assert_eq!(0.0, flat.determinant());
    assert!(flat.try_inverse().is_none());
}

#[test]
fn tiny_uniform_scale_is_invertible() {
    let m = Matrix4x4::scaling(Vec3::new(5e-5, 5e-5, 5e-5));
    let inv = m.try_inverse().unwrap();

    let p = Vec3::new(1.0, -2.0, 0.5);
    assert!((inv.transform_point(m.transform_point(p)) - p).len() < 1e-9);

    let almost_flat = Matrix4x4::new([
        [1.0, 1.0, 0.0, 0.0],
        [1.0, 1.0 + 1e-17, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    assert!(almost_flat.try_inverse().is_none());
}

#[test]
fn vectors_ignore_translation() {
    let m = Matrix4x4::translation(Vec3::new(5.0, 5.0, 5.0));
    let v = Vec3::new(1.0, 2.0, 3.0);

    assert_eq!(v, m.transform_vector(v));
    assert_eq!(Vec3::new(6.0, 7.0, 8.0), m.transform_point(v));
}

#[test]
fn linear_block_round_trip() {
    let linear = Matrix3x3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
    let m = Matrix4x4::from_linear(&linear);

    assert_eq!(linear, m.linear());
    assert_eq!(linear, linear.transpose().transpose());
    assert_eq!(Vec3::new(14.0, 32.0, 50.0), &linear * Vec3::new(1.0, 2.0, 3.0));
}
