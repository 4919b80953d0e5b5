//! Affine transform wrapper.
//!
//! Any [`Geometry`] can be translated, rotated, scaled or sheared by wrapping
//! it in a [`Transform`]. Rays are mapped into the wrapped primitive's local
//! space with the inverse matrix, and hits are mapped back out: points with
//! the forward matrix, normals with the inverse transpose.

use crate::{
    error::{Error, Result},
    geometry::{Geometry, CAST_EPSILON},
    hit::{HitRecord, MaterialId},
    matrix::{Matrix3x3, Matrix4x4},
    ray::Ray,
};

/// Surfaces skipped in local space because their world distance is within
/// [`CAST_EPSILON`] of the origin.
const MAX_RECASTS: usize = 4;

pub struct Transform {
    inner: Box<dyn Geometry>,
    matrix: Matrix4x4<f64>,
    inverse: Matrix4x4<f64>,
    normal_matrix: Matrix3x3<f64>,
    material: Option<MaterialId>,
}

impl Transform {
    /// Wraps `inner` in `matrix`.
    ///
    /// A singular matrix cannot map rays into local space. It is replaced by
    /// the identity (with a warning), so the primitive renders untransformed.
    /// Use [`Transform::try_new`] to reject it instead.
    pub fn new<G: Geometry + 'static>(inner: G, matrix: Matrix4x4<f64>) -> Self {
        Transform::from_boxed(Box::new(inner), matrix)
    }

    pub fn from_boxed(inner: Box<dyn Geometry>, matrix: Matrix4x4<f64>) -> Self {
        match matrix.try_inverse() {
            Some(inverse) => Transform::with_inverse(inner, matrix, inverse),
            None => {
                warn!(
                    "singular transformation matrix (determinant {}), falling back to identity",
                    matrix.determinant()
                );
                let identity = Matrix4x4::identity();
                Transform::with_inverse(inner, identity, identity)
            }
        }
    }

    pub fn try_new<G: Geometry + 'static>(inner: G, matrix: Matrix4x4<f64>) -> Result<Self> {
        Transform::try_from_boxed(Box::new(inner), matrix)
    }

    pub fn try_from_boxed(inner: Box<dyn Geometry>, matrix: Matrix4x4<f64>) -> Result<Self> {
        let inverse = matrix.try_inverse().ok_or_else(|| Error::SingularMatrix(matrix.determinant()))?;
        Ok(Transform::with_inverse(inner, matrix, inverse))
    }

    /// Wraps `inner` in a linear map with zero translation.
    pub fn linear<G: Geometry + 'static>(inner: G, matrix: Matrix3x3<f64>) -> Self {
        Transform::new(inner, Matrix4x4::from_linear(&matrix))
    }

    fn with_inverse(inner: Box<dyn Geometry>, matrix: Matrix4x4<f64>, inverse: Matrix4x4<f64>) -> Self {
        Self {
            inner,
            matrix,
            inverse,
            normal_matrix: inverse.linear().transpose(),
            material: None,
        }
    }

    /// Material reported for every hit, replacing the wrapped primitive's.
    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.material = material;
        self
    }

    pub fn matrix(&self) -> &Matrix4x4<f64> {
        &self.matrix
    }

    pub fn inverse(&self) -> &Matrix4x4<f64> {
        &self.inverse
    }
}

impl Geometry for Transform {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        let local = ray.transformed(&self.inverse);
        let mut hit = self.inner.intersect(&local);

        for _ in 0..MAX_RECASTS {
            if !hit.hit {
                return HitRecord::miss();
            }

            let point = self.matrix.transform_point(hit.point);

            // Local `t` is measured in scaled units; measure again along the world ray.
            let t = (point - ray.origin()).dot(ray.direction());
            if t > CAST_EPSILON {
                return HitRecord {
                    hit: true,
                    t,
                    point,
                    normal: (&self.normal_matrix * hit.normal).unit(),
                    material: self.material.or(hit.material),
                    uv: hit.uv,
                };
            }

            // Cleared the epsilon only in shrunken local units: look past it.
            let restart = Ray::new(hit.point, *local.direction()).with_depth(local.depth());
            hit = self.inner.intersect(&restart);
        }

        HitRecord::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Ball, Cuboid, Paraboloid, PlaneUV},
        vec3::Vec3,
    };

    fn assert_close(expected: Vec3<f64>, actual: Vec3<f64>) {
        assert!((expected - actual).len() < 1e-9, "expected {:?}, got {:?}", expected, actual);
    }

    #[test]
    fn identity_changes_nothing() {
        let ball = Ball::new(Vec3::new(0.5, 0.0, 0.0), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.3, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let direct = ball.intersect(&ray);
        let wrapped = Transform::new(ball, Matrix4x4::identity()).intersect(&ray);

        assert!(wrapped.hit);
        assert!((direct.t - wrapped.t).abs() < 1e-9);
        assert_close(direct.point, wrapped.point);
        assert_close(direct.normal, wrapped.normal);
    }

    #[test]
    fn translation_moves_hit() {
        let ball = Ball::new(Vec3::zero(), 1.0);
        let moved = Transform::new(ball, Matrix4x4::translation(Vec3::new(0.0, 0.0, -5.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = moved.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 14.0).abs() < 1e-9);
        assert_close(Vec3::new(0.0, 0.0, -4.0), hit.point);
        assert_close(Vec3::new(0.0, 0.0, 1.0), hit.normal);
    }

    #[test]
    fn scaling_reports_world_distance() {
        let ball = Ball::new(Vec3::zero(), 1.0);
        let scaled = Transform::new(ball, Matrix4x4::scaling(Vec3::new(1.0, 1.0, 3.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = scaled.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 7.0).abs() < 1e-9);
        assert_close(Vec3::new(0.0, 0.0, 3.0), hit.point);
    }

    #[test]
    fn non_uniform_scale_uses_inverse_transpose() {
        // Ellipsoid x²/4 + y² + z² = 1. At P = (√2, √2/2, 0) its gradient
        // (x/2, 2y, 0) points along (1, 2, 0); a sphere-like normal would
        // point along P itself, i.e. (2, 1, 0).
        let ellipsoid = Transform::new(Ball::new(Vec3::zero(), 1.0), Matrix4x4::scaling(Vec3::new(2.0, 1.0, 1.0)));

        let p = Vec3::new(2f64.sqrt(), 2f64.sqrt() / 2.0, 0.0);
        let n = Vec3::new(1.0, 2.0, 0.0).unit();
        let ray = Ray::new(p + n.scale(5.0), -n);

        let hit = ellipsoid.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 5.0).abs() < 1e-9);
        assert_close(p, hit.point);
        assert_close(n, hit.normal);
        assert!((hit.normal - p.unit()).len() > 0.1);
    }

    #[test]
    fn rotated_cube_face_normal() {
        let cube = Cuboid::cube(Vec3::zero(), 1.0);
        let rotated = Transform::new(cube, Matrix4x4::rotation_z(std::f64::consts::FRAC_PI_4));
        let ray = Ray::new(Vec3::new(10.0, 0.2, 0.3), Vec3::new(-1.0, 0.0, 0.0));

        let hit = rotated.intersect(&ray);

        // The +x face now lies on x + y = √2.
        assert!(hit.hit);
        assert!((hit.point.x - (2f64.sqrt() - 0.2)).abs() < 1e-9);
        assert_close(Vec3::new(1.0, 1.0, 0.0).unit(), hit.normal);
    }

    #[test]
    fn downscaled_hit_inside_world_epsilon_is_skipped() {
        // The front face sits 0.5e-4 away in world units but 5e-4 in local units.
        let small = Transform::new(Ball::new(Vec3::zero(), 1.0), Matrix4x4::scaling(Vec3::new(0.1, 0.1, 0.1)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.10005), Vec3::new(0.0, 0.0, -1.0));

        let hit = small.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 0.20005).abs() < 1e-9);
        assert_close(Vec3::new(0.0, 0.0, -0.1), hit.point);
        assert_close(Vec3::new(0.0, 0.0, -1.0), hit.normal);
    }

    #[test]
    fn tiny_scale_is_not_singular() {
        let tiny = Matrix4x4::scaling(Vec3::new(5e-5, 5e-5, 5e-5));
        let wrapped = Transform::try_new(Ball::new(Vec3::zero(), 1.0), tiny).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = wrapped.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.point.z - 5e-5).abs() < 1e-12);
        assert!((hit.t - (10.0 - 5e-5)).abs() < 1e-9);
        assert_close(Vec3::new(0.0, 0.0, 1.0), hit.normal);
    }

    #[test]
    fn miss_propagates() {
        let moved = Transform::new(Ball::new(Vec3::zero(), 1.0), Matrix4x4::translation(Vec3::new(10.0, 0.0, 0.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(HitRecord::miss(), moved.intersect(&ray));
    }

    #[test]
    fn singular_matrix_falls_back_to_identity() {
        let ball = Ball::new(Vec3::zero(), 1.0);
        let flat = Matrix4x4::scaling(Vec3::new(1.0, 0.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let wrapped = Transform::new(ball, flat);
        assert_eq!(&Matrix4x4::identity(), wrapped.matrix());
        assert_eq!(ball.intersect(&ray), wrapped.intersect(&ray));

        assert!(matches!(Transform::try_new(ball, flat), Err(Error::SingularMatrix(_))));
    }

    #[test]
    fn linear_input_has_no_translation() {
        let linear = Matrix3x3::new([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = Transform::linear(Ball::new(Vec3::zero(), 1.0), linear).intersect(&ray);

        assert!(hit.hit);
        assert_close(Vec3::new(0.0, 0.0, 2.0), hit.point);
    }

    #[test]
    fn material_override_and_passthrough() {
        let ray = Ray::new(Vec3::new(0.5, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let paraboloid = Paraboloid::new(0.0, 2.0, Some(MaterialId(1)));

        let passthrough = Transform::new(paraboloid, Matrix4x4::identity());
        assert_eq!(Some(MaterialId(1)), passthrough.intersect(&ray).material);

        let overridden = Transform::new(paraboloid, Matrix4x4::identity()).with_material(Some(MaterialId(2)));
        assert_eq!(Some(MaterialId(2)), overridden.intersect(&ray).material);
    }

    #[test]
    fn uv_passes_through() {
        let floor = PlaneUV::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let lifted = Transform::new(floor, Matrix4x4::translation(Vec3::new(0.0, 1.0, 0.0)));
        let ray = Ray::new(Vec3::new(2.0, 5.0, 3.0), Vec3::new(0.0, -1.0, 0.0));

        let hit = lifted.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 4.0).abs() < 1e-9);
        let (u, v) = hit.uv.unwrap();
        assert!((u - 2.0).abs() < 1e-9 && (v - 3.0).abs() < 1e-9);
    }

    #[test]
    fn nested_transforms_compose() {
        let ball = Ball::new(Vec3::zero(), 1.0);
        let inner = Transform::new(ball, Matrix4x4::scaling(Vec3::new(2.0, 2.0, 2.0)));
        let outer = Transform::new(inner, Matrix4x4::translation(Vec3::new(0.0, 0.0, -3.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = outer.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 11.0).abs() < 1e-9);
        assert_close(Vec3::new(0.0, 0.0, -1.0), hit.point);
    }
}
