//! Finite cylinder with flat end caps.

use crate::{
    geometry::{Geometry, CAST_EPSILON, PARALLEL_EPSILON},
    hit::HitRecord,
    ray::Ray,
    vec3::Vec3,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    center: Vec3<f64>,
    axis: Vec3<f64>,
    radius: f64,
    height: f64,
}

impl Cylinder {
    /// `center` is the midpoint of the axis segment; the caps lie `height / 2`
    /// away from it on either side.
    pub fn new(center: Vec3<f64>, axis: Vec3<f64>, radius: f64, height: f64) -> Self {
        Self {
            center,
            axis: axis.unit(),
            radius,
            height,
        }
    }

    /// Lateral surface, clipped to the axis segment.
    fn intersect_body(&self, ray: &Ray<f64>, closest: &mut HitRecord) {
        let oc = ray.origin() - self.center;

        let d_perp = *ray.direction() - self.axis.scale(ray.direction().dot(&self.axis));
        let oc_perp = oc - self.axis.scale(oc.dot(&self.axis));

        let a = d_perp.dot(&d_perp);
        if a.abs() <= PARALLEL_EPSILON {
            return;
        }

        let b = 2.0 * d_perp.dot(&oc_perp);
        let c = oc_perp.dot(&oc_perp) - self.radius.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return;
        }

        let sqrt = discriminant.sqrt();
        let half_height = self.height / 2.0;

        for &t in &[(-b - sqrt) / (2.0 * a), (-b + sqrt) / (2.0 * a)] {
            if t <= CAST_EPSILON || t >= closest.t {
                continue;
            }

            let point = ray.point_at(t);
            let along = (point - self.center).dot(&self.axis);
            if along.abs() > half_height {
                continue;
            }

            let on_axis = self.center + self.axis.scale(along);
            *closest = HitRecord::new(t, point, (point - on_axis).unit());
        }
    }

    fn intersect_caps(&self, ray: &Ray<f64>, closest: &mut HitRecord) {
        for &sign in &[1.0, -1.0] {
            let normal = self.axis.scale(sign);
            let cap_center = self.center + normal.scale(self.height / 2.0);

            let denominator = ray.direction().dot(&normal);
            if denominator.abs() <= PARALLEL_EPSILON {
                continue;
            }

            let t = (cap_center - ray.origin()).dot(&normal) / denominator;
            if t <= CAST_EPSILON || t >= closest.t {
                continue;
            }

            let point = ray.point_at(t);
            let offset = point - cap_center;
            if offset.dot(&offset) <= self.radius.powi(2) {
                *closest = HitRecord::new(t, point, normal);
            }
        }
    }
}

impl Geometry for Cylinder {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        let mut closest = HitRecord::miss();

        self.intersect_body(ray, &mut closest);
        self.intersect_caps(ray, &mut closest);

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upright() -> Cylinder {
        Cylinder::new(Vec3::zero(), Vec3::new(0.0, 2.0, 0.0), 0.5, 3.0)
    }

    #[test]
    fn hits_body_with_radial_normal() {
        let ray = Ray::new(Vec3::new(5.0, 1.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));

        let hit = upright().intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 4.5).abs() < 1e-9);
        assert!((hit.normal - Vec3::new(1.0, 0.0, 0.0)).len() < 1e-9);
    }

    #[test]
    fn axis_parallel_ray_hits_cap() {
        let ray = Ray::new(Vec3::new(0.3, 10.0, 0.1), Vec3::new(0.0, -1.0, 0.0));

        let hit = upright().intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 8.5).abs() < 1e-9);
        assert_eq!(Vec3::new(0.0, 1.0, 0.0), hit.normal);
    }

    #[test]
    fn bottom_cap_faces_down() {
        let ray = Ray::new(Vec3::new(0.0, -4.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

        let hit = upright().intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 2.5).abs() < 1e-9);
        assert_eq!(Vec3::new(0.0, -1.0, 0.0), hit.normal);
    }

    #[test]
    fn ray_beyond_segment_misses() {
        let ray = Ray::new(Vec3::new(5.0, 2.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(!upright().intersect(&ray).hit);

        let outside_radius = Ray::new(Vec3::new(0.6, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(!upright().intersect(&outside_radius).hit);
    }

    #[test]
    fn slanted_ray_prefers_nearer_cap() {
        // Enters through the top cap, would leave through the side.
        let ray = Ray::new(Vec3::new(0.0, 2.5, 0.0), Vec3::new(0.3, -1.0, 0.0));

        let hit = upright().intersect(&ray);

        assert!(hit.hit);
        assert_eq!(Vec3::new(0.0, 1.0, 0.0), hit.normal);
        assert!((hit.point.y - 1.5).abs() < 1e-9);
    }
}
