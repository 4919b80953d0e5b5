//! Renders a normal map of one configured primitive.
//!
//! Usage: `hitscan [config.json] [width] [height] [output.png]`

#[macro_use]
extern crate log;

use std::{env, error::Error, time::Instant};

use env_logger::Env;
use image::{Rgb, RgbImage};

use hitscan::{batch, HitRecord, PrimitiveConfig, Ray, Vec3};

const DEFAULT_LOGGING_LEVEL: &str = "info";
const DEFAULT_CONFIG: &str = "scene.json";
const DEFAULT_OUTPUT: &str = "normals.png";
const DEFAULT_SIZE: u32 = 400;

/// Half the side of the square window covered by the shorter image axis.
const VIEW_HALF_WIDTH: f64 = 4.0;
const EYE_DISTANCE: f64 = 50.0;
const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);

/// Orthographic rays looking down -z, one per pixel center, row-major.
fn camera_rays(width: u32, height: u32) -> Vec<Ray<f64>> {
    let pixel = 2.0 * VIEW_HALF_WIDTH / width.min(height) as f64;
    let direction = Vec3::new(0.0, 0.0, -1.0);

    (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                let sx = (x as f64 + 0.5 - width as f64 / 2.0) * pixel;
                let sy = (height as f64 / 2.0 - y as f64 - 0.5) * pixel;
                Ray::new(Vec3::new(sx, sy, EYE_DISTANCE), direction)
            })
        })
        .collect()
}

/// Row-major index of pixel `(x, y)`, computed in `usize` so large images do not wrap.
fn pixel_index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

fn shade(hit: &HitRecord) -> Rgb<u8> {
    if !hit.hit {
        return BACKGROUND;
    }

    let channel = |c: f64| ((c * 0.5 + 0.5) * 255.0).round().max(0.0).min(255.0) as u8;
    Rgb([channel(hit.normal.x), channel(hit.normal.y), channel(hit.normal.z)])
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();
    let args: Vec<String> = env::args().collect();
    debug!("args are: {:?}", args);

    let path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG);
    let width = args.get(2).map(|s| s.parse::<u32>()).transpose()?.unwrap_or(DEFAULT_SIZE);
    let height = args.get(3).map(|s| s.parse::<u32>()).transpose()?.unwrap_or(width);
    let output = args.get(4).map(String::as_str).unwrap_or(DEFAULT_OUTPUT);

    let config = PrimitiveConfig::load(&path)?;
    let geometry = config.build()?;
    info!("loaded {} primitive from {}", config.kind(), path);

    let rays = camera_rays(width, height);

    let now = Instant::now();
    let hits = batch::intersect_all(geometry.as_ref(), &rays);
    let elapsed = now.elapsed();

    let hit_count = hits.iter().filter(|hit| hit.hit).count();
    info!(
        "cast {} rays, {} hits, elapsed: {:.3} ms",
        rays.len(),
        hit_count,
        elapsed.as_secs_f64() * 1000.0
    );

    let image = RgbImage::from_fn(width, height, |x, y| shade(&hits[pixel_index(x, y, width)]));
    image.save(output)?;
    info!("result saved to {}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_index_does_not_wrap() {
        assert_eq!(7, pixel_index(1, 2, 3));
        assert_eq!(70_000 * 70_000 - 1, pixel_index(69_999, 69_999, 70_000));
    }

    #[test]
    fn one_ray_per_pixel() {
        let rays = camera_rays(4, 2);

        assert_eq!(8, rays.len());
        assert!(rays.iter().all(|ray| *ray.direction() == Vec3::new(0.0, 0.0, -1.0)));
    }
}
