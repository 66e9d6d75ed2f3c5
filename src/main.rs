use clap::Parser;
use lab_rasterizer::io::config::{Config, ShadingModel};
use lab_rasterizer::io::image::{save_color, save_depth};
use lab_rasterizer::pipeline::passes::{render_frame, render_sequence};
use lab_rasterizer::scene::loader::init_scene_resources;
use log::{error, info};
use std::process::ExitCode;
use std::time::Instant;

/// TOML-driven software rasterizer.
#[derive(Parser, Debug)]
#[command(name = "lab-rasterizer", version, about)]
struct Cli {
    /// Scene configuration (TOML). Defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// OBJ model to render, overrides [model] path.
    #[arg(short, long, value_name = "FILE")]
    model: Option<String>,

    /// Diffuse texture, overrides [model] texture.
    #[arg(short, long, value_name = "FILE")]
    texture: Option<String>,

    /// Color output path, overrides [render] output.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Shading model, overrides [render] shader.
    #[arg(short, long, value_enum)]
    shader: Option<ShadingModel>,

    /// Render the orbit animation instead of a single frame.
    #[arg(long)]
    animate: bool,

    /// Number of animation frames, overrides [animation] frames.
    #[arg(long)]
    frames: Option<usize>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if let Some(texture) = &self.texture {
            config.model.texture = Some(texture.clone());
        }
        if let Some(output) = &self.output {
            config.render.output = output.clone();
        }
        if let Some(shader) = self.shader {
            config.render.shader = shader;
        }
        if self.animate {
            config.animation.enabled = true;
        }
        if let Some(frames) = self.frames {
            config.animation.frames = frames;
        }
    }
}

fn run(cli: &Cli) -> lab_rasterizer::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading config: {}", path);
            Config::load(path)?
        }
        None => {
            info!("Using default settings");
            Config::default()
        }
    };
    cli.apply_overrides(&mut config);

    let start_time = Instant::now();
    let context = init_scene_resources(&config)?;

    if config.animation.enabled {
        let frames = render_sequence(&config, &context)?;
        info!(
            "Animation finished: {} frames in {:?}",
            frames.len(),
            start_time.elapsed()
        );
    } else {
        let (renderer, _) = render_frame(&config, &context);
        save_color(&renderer.framebuffer, &config.render.output)?;
        if let Some(depth_path) = &config.render.depth_output {
            save_depth(&renderer.framebuffer, depth_path)?;
        }
        info!("Frame finished in {:?}", start_time.elapsed());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
