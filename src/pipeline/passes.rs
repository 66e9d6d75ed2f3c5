use crate::core::color::to_rgb8;
use crate::error::Result;
use crate::io::config::{Config, ShadingModel};
use crate::io::image::save_color;
use crate::pipeline::renderer::{RenderStats, Renderer};
use crate::pipeline::shaders::flat::FlatShader;
use crate::pipeline::shaders::lambert::LambertShader;
use crate::pipeline::shaders::phong::{PhongParams, PhongShader};
use crate::scene::animation::OrbitAnimation;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::Light;
use log::info;
use nalgebra::Vector3;
use std::path::PathBuf;

/// Builds a renderer sized and configured from `[render]`.
pub fn create_renderer(config: &Config) -> Renderer {
    let mut renderer = Renderer::new(config.render.width, config.render.height);
    renderer.rasterizer.wireframe = config.render.wireframe;
    renderer.rasterizer.wireframe_color = to_rgb8(Vector3::from(config.render.wireframe_color));
    renderer
}

/// Executes the Main Rendering Pass: clears, then draws the mesh seen from `camera`
/// and lit by `light` with the configured shading model.
pub fn render_main_pass(
    config: &Config,
    context: &RenderContext,
    camera: &Camera,
    light: Light,
    renderer: &mut Renderer,
) -> RenderStats {
    renderer.clear(Vector3::from(config.render.background));

    let mesh = &context.mesh;
    let texture = context.texture.as_ref();

    match config.render.shader {
        ShadingModel::Flat => {
            let shader = FlatShader::new(mesh, camera, light, texture);
            renderer.draw_mesh(mesh, &shader)
        }
        ShadingModel::Lambert => {
            let shader = LambertShader::new(mesh, camera, light, texture);
            renderer.draw_mesh(mesh, &shader)
        }
        ShadingModel::Phong => {
            let params = PhongParams {
                ambient_strength: config.phong.ambient_strength,
                specular_strength: config.phong.specular_strength,
                shininess: config.phong.shininess,
            };
            let shader = PhongShader::new(mesh, camera, light, texture, params);
            renderer.draw_mesh(mesh, &shader)
        }
    }
}

/// Renders the context's own camera and light into a fresh renderer.
pub fn render_frame(config: &Config, context: &RenderContext) -> (Renderer, RenderStats) {
    let mut renderer = create_renderer(config);
    let stats = render_main_pass(config, context, &context.camera, context.light, &mut renderer);
    log_stats("frame", &stats);
    (renderer, stats)
}

/// Renders the orbit described by `[animation]`, one frame at a time, and writes
/// each to `<output_dir>/<prefix>_<k>.png`. Returns the written paths in order.
pub fn render_sequence(config: &Config, context: &RenderContext) -> Result<Vec<PathBuf>> {
    let animation = OrbitAnimation {
        frames: config.animation.frames,
        pulse_amplitude: config.animation.pulse_amplitude,
        pulse_cycles: config.animation.pulse_cycles,
    };
    let frames = animation.frames(&context.camera)?;
    info!("Rendering {} animation frames", frames.len());

    let mut written = Vec::with_capacity(frames.len());
    for frame in frames {
        // Each frame starts from a clean framebuffer.
        let mut renderer = create_renderer(config);
        let stats = render_main_pass(config, context, &frame.camera, frame.light, &mut renderer);
        log_stats(&format!("frame {}", frame.index), &stats);

        let path = config.animation.frame_path(frame.index);
        save_color(&renderer.framebuffer, &path)?;
        written.push(path);
    }
    Ok(written)
}

fn log_stats(label: &str, stats: &RenderStats) {
    info!(
        "Rendered {}: {} triangles, {} degenerate, {} fragments written",
        label, stats.triangles, stats.degenerate, stats.fragments_written
    );
}
