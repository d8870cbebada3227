//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered independently
//! and in parallel using rayon. Every bucket draws its samples from its own
//! generator, so the picture does not depend on thread scheduling.

use crate::material::Color;
use crate::renderer::{render_pixel, ImageBuffer};
use crate::settings::RenderSettings;
use crate::{Camera, Hittable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets are rendered from the center outward so that a progressive
/// display shows the middle of the frame first.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center. Ties keep grid order.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Seed for a bucket's generator, derived from the render seed.
pub fn bucket_seed(seed: u64, bucket_index: usize) -> u64 {
    seed ^ (bucket_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order; rows not reached stay black
    pub pixels: Vec<Color>,
    /// False if the render was stopped part way through this bucket
    pub complete: bool,
}

/// Render a single bucket.
///
/// `cancel` is checked before every scanline of the bucket.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    cancel: &AtomicBool,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket_seed(settings.seed, bucket.index));
    let mut pixels = vec![Color::ZERO; bucket.pixel_count() as usize];

    for local_y in 0..bucket.height {
        if cancel.load(Ordering::Relaxed) {
            return BucketResult {
                bucket: *bucket,
                pixels,
                complete: false,
            };
        }
        for local_x in 0..bucket.width {
            let color = render_pixel(
                camera,
                world,
                bucket.x + local_x,
                bucket.y + local_y,
                settings,
                &mut rng,
            );
            pixels[(local_y * bucket.width + local_x) as usize] = color;
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
        complete: true,
    }
}

/// How a parallel render ended.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// Every bucket was rendered.
    Completed(ImageBuffer),
    /// The stop flag was raised; the image holds whatever was finished.
    Cancelled(ImageBuffer),
}

impl RenderOutcome {
    pub fn image(&self) -> &ImageBuffer {
        match self {
            RenderOutcome::Completed(image) | RenderOutcome::Cancelled(image) => image,
        }
    }

    pub fn into_image(self) -> ImageBuffer {
        match self {
            RenderOutcome::Completed(image) | RenderOutcome::Cancelled(image) => image,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RenderOutcome::Completed(_))
    }
}

/// Render the scene across all cores.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    cancel: &AtomicBool,
) -> RenderOutcome {
    render_parallel_with(camera, world, settings, cancel, |_| {})
}

/// Render the scene across all cores, handing each finished bucket to
/// `on_bucket` as soon as it is done (for progressive display).
pub fn render_parallel_with<F>(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    cancel: &AtomicBool,
    on_bucket: F,
) -> RenderOutcome
where
    F: Fn(&BucketResult) + Sync,
{
    let start = Instant::now();
    let buckets = generate_buckets(settings.image_width, settings.image_height, settings.bucket_size);
    let total = buckets.len();
    let finished = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} at {} spp in {} buckets",
        settings.image_width,
        settings.image_height,
        settings.samples_per_pixel,
        total
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let result = render_bucket(bucket, camera, world, settings, cancel);
            on_bucket(&result);
            if result.complete {
                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Bucket {} done ({done}/{total})", bucket.index);
            }
            Some(result)
        })
        .collect();

    let mut image = ImageBuffer::new(settings.image_width, settings.image_height);
    for result in &results {
        let bucket = &result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                image.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    let done = finished.load(Ordering::Relaxed);
    if done < total {
        log::info!(
            "Render cancelled after {done}/{total} buckets ({:.2?})",
            start.elapsed()
        );
        RenderOutcome::Cancelled(image)
    } else {
        log::info!("Render finished in {:.2?}", start.elapsed());
        RenderOutcome::Completed(image)
    }
}
