use crate::{hit::HitRecord, ray::Ray};

mod cuboid;
mod cylinder;
mod implicit;
mod paraboloid;
mod plane;
mod sphere;
pub mod surfaces;

pub use self::cuboid::Cuboid;
pub use self::cylinder::Cylinder;
pub use self::implicit::{Field, ImplicitSurface};
pub use self::paraboloid::{DoubleSidedParaboloid, Paraboloid};
pub use self::plane::{Plane, PlaneUV};
pub use self::sphere::Ball;

/// Hits at or below this distance are discarded, so a ray restarted on a
/// surface does not immediately re-hit that same surface.
pub const CAST_EPSILON: f64 = 1e-4;

/// Denominators smaller than this mean the ray runs parallel to the surface.
pub(crate) const PARALLEL_EPSILON: f64 = 1e-6;

/// Anything a ray can be tested against.
///
/// Implementations never fail: a miss is reported as [`HitRecord::miss`].
/// Primitives are immutable once built, so one instance can be shared
/// between threads that cast rays concurrently.
pub trait Geometry: Send + Sync {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord;
}

impl<G: Geometry + ?Sized> Geometry for Box<G> {
    #[inline]
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        (**self).intersect(ray)
    }
}
