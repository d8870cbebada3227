//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a bounce budget
//! - Russian roulette termination of dim paths
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::material::{Color, ScatterResult};
use crate::sampling::gen_f32;
use crate::settings::{RenderConfig, RenderSettings};
use crate::{Camera, Hittable};
use oray_math::{Interval, Ray};
use rand::RngCore;
use std::path::Path;

/// Minimum hit distance for secondary rays, to avoid shadow acne.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Lowest survival probability roulette will use.
const MIN_SURVIVAL: f32 = 0.05;

/// Compute the color seen by a ray.
///
/// `depth` is the remaining bounce budget; a budget of 0 yields black.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    trace(ray, world, depth, 0, config, rng)
}

fn trace(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    bounce: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_EPSILON, f32::INFINITY)) else {
        return sky_gradient(ray);
    };

    let Some(ScatterResult {
        scattered,
        mut attenuation,
    }) = rec.material.scatter(ray, &rec, rng)
    else {
        // Absorbed
        return Color::ZERO;
    };

    if config.roulette.enabled && bounce >= config.roulette.min_bounces {
        // Survivors are reweighted by 1/p, keeping the estimator unbiased
        let survival = attenuation.max_element().clamp(MIN_SURVIVAL, 1.0);
        if gen_f32(rng) > survival {
            return Color::ZERO;
        }
        attenuation /= survival;
    }

    attenuation * trace(&scattered, world, depth - 1, bounce + 1, config, rng)
}

/// Background seen by rays that escape the scene: white straight up,
/// sky blue straight down.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (1.0 - unit_direction.y);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f32| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Render a single pixel with multi-sampling.
///
/// Pixel (0, 0) is the top-left of the image; each sample is jittered
/// inside the pixel before being mapped to screen coordinates.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let config = settings.render_config();
    let width_span = settings.image_width.saturating_sub(1).max(1) as f32;
    let height_span = settings.image_height.saturating_sub(1).max(1) as f32;
    let row_from_bottom = settings.image_height.saturating_sub(1 + y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..settings.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width_span;
        let t = (row_from_bottom + gen_f32(rng)) / height_span;
        let ray = camera.get_ray(s, t);
        pixel_color += ray_color(&ray, world, config.max_depth, &config, rng);
    }

    pixel_color / settings.samples_per_pixel.max(1) as f32
}

/// Linear color image, stored row-major from the top-left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to gamma-corrected RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = self.pixels.iter().map(|c| color_to_rgba(*c)).collect();
        bytemuck::cast_slice(&pixels).to_vec()
    }

    /// Write the gamma-corrected image; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded; see [`crate::render_parallel`] for the bucket renderer.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(settings.image_width, settings.image_height);

    for y in 0..settings.image_height {
        for x in 0..settings.image_width {
            let color = render_pixel(camera, world, x, y, settings, rng);
            image.set(x, y, color);
        }
    }

    image
}
