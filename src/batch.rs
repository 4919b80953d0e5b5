//! Casting many rays against one primitive in parallel.

use rayon::prelude::*;

use crate::{geometry::Geometry, hit::HitRecord, ray::Ray};

/// Intersects every ray with `geometry`, one independent call per ray.
///
/// The result is index-aligned with `rays`.
pub fn intersect_all<G: Geometry + ?Sized>(geometry: &G, rays: &[Ray<f64>]) -> Vec<HitRecord> {
    rays.par_iter().map(|ray| geometry.intersect(ray)).collect()
}

/// Number of rays in `rays` that hit `geometry`.
pub fn count_hits<G: Geometry + ?Sized>(geometry: &G, rays: &[Ray<f64>]) -> usize {
    rays.par_iter().filter(|ray| geometry.intersect(ray).hit).count()
}
