use crate::{
    geometry::{Geometry, CAST_EPSILON, PARALLEL_EPSILON},
    hit::HitRecord,
    ray::Ray,
    vec3::Vec3,
};

/// Infinite plane through `point`, facing along `normal`.
///
/// The normal is reported as-is for hits from either side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    point: Vec3<f64>,
    normal: Vec3<f64>,
}

impl Plane {
    pub fn new(point: Vec3<f64>, normal: Vec3<f64>) -> Self {
        Self {
            point,
            normal: normal.unit(),
        }
    }

    /// Ray parameter of the crossing, if it lies past the cast epsilon.
    fn crossing(&self, ray: &Ray<f64>) -> Option<f64> {
        let denominator = self.normal.dot(ray.direction());

        if denominator.abs() > PARALLEL_EPSILON {
            let p0r0 = self.point - ray.origin();
            let t = p0r0.dot(&self.normal) / denominator;

            if t > CAST_EPSILON {
                return Some(t);
            }
        }

        None
    }
}

impl Geometry for Plane {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        match self.crossing(ray) {
            Some(t) => HitRecord::new(t, ray.point_at(t), self.normal),
            None => HitRecord::miss(),
        }
    }
}

/// Plane carrying a 2-D surface parameterization, e.g. for checkerboard textures.
///
/// `u` runs along `normal × forward` and `v` along `forward`, both measured
/// from `point`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneUV {
    plane: Plane,
    forward: Vec3<f64>,
    right: Vec3<f64>,
}

impl PlaneUV {
    /// `forward` is projected onto the plane, so it need not be exactly
    /// perpendicular to `normal`.
    pub fn new(point: Vec3<f64>, normal: Vec3<f64>, forward: Vec3<f64>) -> Self {
        let plane = Plane::new(point, normal);
        let forward = (forward - plane.normal.scale(forward.dot(&plane.normal))).unit();
        let right = plane.normal.cross(&forward).unit();

        Self { plane, forward, right }
    }
}

impl Geometry for PlaneUV {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        let t = match self.plane.crossing(ray) {
            Some(t) => t,
            None => return HitRecord::miss(),
        };

        let point = ray.point_at(t);
        let offset = point - self.plane.point;

        HitRecord::new(t, point, self.plane.normal).with_uv(offset.dot(&self.right), offset.dot(&self.forward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_hit_from_above() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.0, -1.0, 0.0));

        let hit = plane.intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 5.0).abs() < 1e-9);
        assert_eq!(Vec3::new(0.0, 1.0, 0.0), hit.normal);
        assert_eq!(None, hit.uv);
    }

    #[test]
    fn parallel_and_receding_rays_miss() {
        let plane = Plane::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));

        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(!plane.intersect(&parallel).hit);

        let receding = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(!plane.intersect(&receding).hit);
    }

    #[test]
    fn origin_on_plane_is_rejected() {
        let plane = Plane::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::new(3.0, 0.0, 3.0), Vec3::new(0.0, -1.0, 0.0));

        assert!(!plane.intersect(&ray).hit);
    }

    #[test]
    fn uv_follows_right_and_forward() {
        let plane = PlaneUV::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let ray = Ray::new(Vec3::new(2.0, 5.0, 3.0), Vec3::new(0.0, -1.0, 0.0));

        let hit = plane.intersect(&ray);

        assert!(hit.hit);
        let (u, v) = hit.uv.unwrap();
        assert!((u - 2.0).abs() < 1e-9);
        assert!((v - 3.0).abs() < 1e-9);
    }

    #[test]
    fn uv_forward_is_projected_onto_plane() {
        let plane = PlaneUV::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 4.0), Vec3::new(0.0, -1.0, 0.0));

        let (u, v) = plane.intersect(&ray).uv.unwrap();

        assert!(u.abs() < 1e-9);
        assert!((v - 4.0).abs() < 1e-9);
    }
}
