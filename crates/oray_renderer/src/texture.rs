//! Textures: surface color as a function of (u, v) and the world-space point.

use crate::Color;
use image::RgbImage;
use oray_math::Vec3;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Returned by [`ImageTexture`] when it has no bitmap to sample.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Trait for anything that colors a surface.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates (u, v) and world point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }

    pub fn color(&self) -> Color {
        self.albedo
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two textures.
///
/// The pattern is evaluated on the world-space point rather than on (u, v),
/// so it stays intact across UV seams and degenerate per-face mappings.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
    scale: f32,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>, scale: f32) -> Self {
        Self { even, odd, scale }
    }

    /// Checkerboard of two solid colors.
    pub fn from_colors(even: Color, odd: Color, scale: f32) -> Self {
        Self::new(
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
            scale,
        )
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (self.scale * p.x).sin() * (self.scale * p.y).sin() * (self.scale * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// A bitmap mapped onto the surface through (u, v), tiled `scale` times.
///
/// A texture whose file could not be read still renders: every lookup
/// returns [`MISSING_TEXTURE_COLOR`].
#[derive(Clone)]
pub struct ImageTexture {
    image: Option<RgbImage>,
    scale: f32,
}

impl ImageTexture {
    /// Load `path`, falling back to the missing-texture color on failure.
    pub fn open(path: impl AsRef<Path>, scale: f32) -> Self {
        let path = path.as_ref();
        let image = match Self::load(path) {
            Ok(image) => {
                log::info!(
                    "Loaded texture: {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Some(image)
            }
            Err(err) => {
                log::warn!("{err}; rendering with the missing-texture color");
                None
            }
        };
        Self { image, scale }
    }

    /// Read and decode an image file into 8-bit RGB.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<RgbImage> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TextureError::Load {
                path: path.display().to_string(),
                source,
            })?
            .to_rgb8();

        if image.width() == 0 || image.height() == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }
        Ok(image)
    }

    /// Wrap an already decoded bitmap.
    pub fn from_image(image: RgbImage, scale: f32) -> Self {
        let image = (image.width() > 0 && image.height() > 0).then_some(image);
        Self { image, scale }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        // Tile, then flip v: image rows run top to bottom, v runs bottom to top
        let u = (u * self.scale).rem_euclid(1.0);
        let v = 1.0 - (v * self.scale).rem_euclid(1.0);

        let x = ((u * image.width() as f32) as u32).min(image.width() - 1);
        let y = ((v * image.height() as f32) as u32).min(image.height() - 1);

        let pixel = image.get_pixel(x, y);
        Color::new(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// 2x2 bitmap: top row red, green; bottom row blue, white.
    fn quad_image() -> RgbImage {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));
        image.put_pixel(0, 1, Rgb([0, 0, 255]));
        image.put_pixel(1, 1, Rgb([255, 255, 255]));
        image
    }

    #[test]
    fn test_solid_color_ignores_inputs() {
        let tex = SolidColor::from_rgb(1.0, 0.5, 0.0);
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.7, 0.2, Vec3::splat(9.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_uses_world_point() {
        let even = Color::ONE;
        let odd = Color::ZERO;
        let tex = CheckerTexture::from_colors(even, odd, 1.0);

        // sin(1)^3 > 0
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(1.0)), even);
        // sin(-1) * sin(1) * sin(1) < 0
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-1.0, 1.0, 1.0)), odd);
        // Same point, different (u, v): same answer
        assert_eq!(tex.value(0.9, 0.1, Vec3::new(-1.0, 1.0, 1.0)), odd);
    }

    #[test]
    fn test_checker_nested_textures() {
        let inner = Arc::new(CheckerTexture::from_colors(Color::X, Color::Y, 10.0));
        let tex = CheckerTexture::new(inner, Arc::new(SolidColor::new(Color::Z)), 1.0);
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(-1.0, 1.0, 1.0)), Color::Z);
    }

    #[test]
    fn test_image_texture_flips_v() {
        let tex = ImageTexture::from_image(quad_image(), 1.0);
        assert!(tex.is_loaded());

        // v = 0 is the bottom of the image, v close to 1 the top
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(0.99, 0.0, Vec3::ZERO), Color::ONE);
        assert_eq!(tex.value(0.0, 0.99, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.99, 0.99, Vec3::ZERO), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_image_texture_tiles() {
        let tex = ImageTexture::from_image(quad_image(), 2.0);
        // u = 0.5 * 2 wraps back to the left column
        assert_eq!(tex.value(0.5, 0.0, Vec3::ZERO), tex.value(0.0, 0.0, Vec3::ZERO));
        // Negative coordinates wrap as well
        assert_eq!(tex.value(-0.5, 0.0, Vec3::ZERO), tex.value(0.0, 0.0, Vec3::ZERO));
    }

    #[test]
    fn test_missing_image_uses_sentinel() {
        let tex = ImageTexture::open("definitely/not/a/texture.png", 1.0);
        assert!(!tex.is_loaded());
        assert_eq!(tex.value(0.3, 0.6, Vec3::ZERO), MISSING_TEXTURE_COLOR);
    }

    #[test]
    fn test_load_reports_error() {
        let err = ImageTexture::load("definitely/not/a/texture.png").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
        assert!(err.to_string().contains("texture.png"));
    }

    #[test]
    fn test_empty_image_uses_sentinel() {
        let tex = ImageTexture::from_image(RgbImage::new(0, 0), 1.0);
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);
    }
}
