//! OpenRay renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over spheres and boxes, accelerated by a
//! bounding volume hierarchy that is rebuilt for every render pass.

mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod hittable;
mod material;
mod renderer;
mod sampling;
mod scene;
mod settings;
mod sphere;
mod texture;

pub use bucket::{
    bucket_seed, generate_buckets, render_bucket, render_parallel, render_parallel_with, Bucket,
    BucketResult, RenderOutcome,
};
pub use bvh::{BvhChild, BvhNode};
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, ImageBuffer,
    SHADOW_EPSILON,
};
pub use sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
pub use scene::{Scene, SceneObject};
pub use settings::{
    RenderConfig, RenderSettings, RouletteSettings, SettingsError, SettingsResult,
    DEFAULT_BUCKET_SIZE,
};
pub use sphere::Sphere;
pub use texture::{
    CheckerTexture, ImageTexture, SolidColor, Texture, TextureError, TextureResult,
    MISSING_TEXTURE_COLOR,
};

/// Re-export Vec3 and common math types from oray_math
pub use oray_math::{Aabb, Interval, Ray, Vec3, Vec3Ext};
