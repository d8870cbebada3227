use anyhow::{Context, Result};
use oray_renderer::{render_parallel, Camera, RenderOutcome, RenderSettings, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

const DEFAULT_OUTPUT: &str = "render.png";

/// Command line: `oray [settings.json] [output.png]`
struct Args {
    settings: Option<PathBuf>,
    output: PathBuf,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args_os().skip(1);
        let settings = args.next().map(PathBuf::from);
        let output = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        Self { settings, output }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting OpenRay");

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("could not use settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };

    let scene = Scene::default_scene();
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let world = scene.build_world(&mut rng);
    let camera = Camera::from_settings(&settings);

    // Nothing raises the flag from the command line; a front end with a
    // stop button would share it with its event loop.
    let cancel = AtomicBool::new(false);
    let image = match render_parallel(&camera, world.as_ref(), &settings, &cancel) {
        RenderOutcome::Completed(image) => image,
        RenderOutcome::Cancelled(image) => {
            log::warn!("Render was cancelled; saving the partial image");
            image
        }
    };

    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
