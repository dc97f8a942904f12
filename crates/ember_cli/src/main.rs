//! `ember` - render a built-in scene to an image file.

mod mesh;
mod scenes;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use ember_tracer::{render, save, Background, ImageTexture};
use scenes::{SceneInputs, SceneKind};
use settings::RenderSettings;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "ember", version, about = "Offline Monte Carlo path tracer")]
struct Cli {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Cornell)]
    scene: SceneKind,

    /// Output image (.ppm, .png, .jpg, .bmp or .tga)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// JSON file with render settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel, rounded down to a square number
    #[arg(short, long)]
    spp: Option<u32>,

    /// Maximum bounce depth
    #[arg(short, long)]
    depth: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    bucket_size: Option<u32>,

    /// Equirectangular environment map used as the background
    #[arg(long)]
    environment: Option<PathBuf>,

    /// OBJ mesh for the triangles scene
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Globe image for the earth and final scenes
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn scene_inputs(&self) -> SceneInputs<'_> {
        SceneInputs {
            mesh: self.obj.as_deref(),
            texture: self.texture.as_deref(),
        }
    }

    fn settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.spp,
            max_depth: self.depth,
            seed: self.seed,
            bucket_size: self.bucket_size,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!("Starting ember");
    let start = Instant::now();

    let setup = scenes::build(cli.scene, cli.scene_inputs())?;

    let mut settings = setup.defaults;
    if let Some(path) = &cli.config {
        settings = settings.overlay(&RenderSettings::load(path)?);
    }
    let settings = settings.overlay(&cli.settings());

    let (width, height) = settings.resolution((800, 450));
    let mut camera = setup.camera.with_resolution(width, height);
    camera.initialize();

    let mut builder = setup.builder;
    if let Some(path) = &cli.environment {
        let image = ImageTexture::load(path)
            .with_context(|| format!("Failed to load environment {}", path.display()))?;
        builder.background(Background::Environment(Arc::new(image)));
    }
    let scene = builder.build().context("Failed to build scene")?;

    let config = settings.render_config();
    let image = render(&camera, &scene, &config);

    save(&image, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags_become_settings() {
        let cli = Cli::parse_from([
            "ember",
            "--scene",
            "cornell-smoke",
            "--spp",
            "16",
            "--width",
            "64",
            "-o",
            "out.ppm",
        ]);
        assert_eq!(cli.scene, SceneKind::CornellSmoke);
        assert_eq!(cli.output, PathBuf::from("out.ppm"));

        let settings = cli.settings();
        assert_eq!(settings.samples_per_pixel, Some(16));
        assert_eq!(settings.width, Some(64));
        assert_eq!(settings.height, None);
    }

    #[test]
    fn test_texture_flag_reaches_scene_inputs() {
        let cli = Cli::parse_from(["ember", "--scene", "earth", "--texture", "maps/earth.jpg"]);
        assert_eq!(cli.scene, SceneKind::Earth);

        let inputs = cli.scene_inputs();
        assert_eq!(inputs.texture, Some(std::path::Path::new("maps/earth.jpg")));
        assert_eq!(inputs.mesh, None);
    }
}
