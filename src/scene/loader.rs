use crate::error::Result;
use crate::io::config::Config;
use crate::io::obj_loader::load_obj;
use crate::scene::camera::{Camera, Perspective};
use crate::scene::context::RenderContext;
use crate::scene::light::Light;
use crate::scene::texture::Texture;
use log::info;
use nalgebra::{Point3, Vector3};

/// Builds the camera described by `[camera]`; aspect ratio follows `[render]`.
pub fn build_camera(config: &Config) -> Result<Camera> {
    let lens = Perspective {
        fov_y_deg: config.camera.fov,
        aspect_ratio: config.aspect_ratio(),
        near: config.camera.near,
        far: config.camera.far,
    };
    Camera::new(
        Point3::from(config.camera.position),
        Point3::from(config.camera.target),
        Vector3::from(config.camera.up),
        lens,
        config.render.width,
        config.render.height,
    )
}

pub fn build_light(config: &Config) -> Light {
    Light::new(
        Vector3::from(config.light.direction),
        Vector3::from(config.light.color),
        config.light.intensity,
    )
}

/// Initial resource loading (Heavy I/O). Returns a RenderContext.
///
/// A texture that is configured but cannot be decoded fails the whole load.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext> {
    // 1. Camera
    let camera = build_camera(config)?;

    // 2. Light
    let light = build_light(config);

    // 3. Mesh
    let mut mesh = load_obj(&config.model.path)?;
    if config.model.normalize {
        let (center, scale) = mesh.normalize_and_center();
        info!(
            "Model normalized: center {:?}, scale {:.4}",
            center.coords.as_slice(),
            scale
        );
    }

    // 4. Texture
    let texture = config
        .model
        .texture
        .as_ref()
        .map(|path| Texture::load(path).map(|t| t.with_filter(config.render.texture_filter)))
        .transpose()?;

    info!(
        "Scene initialized: {} triangles, texture: {}",
        mesh.num_faces(),
        config.model.texture.as_deref().unwrap_or("none")
    );

    Ok(RenderContext {
        mesh,
        texture,
        camera,
        light,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_matches_config() {
        let config = Config::default();
        let camera = build_camera(&config).unwrap();
        assert_eq!(camera.position, Point3::new(0.0, 1.0, -1.0));
        assert_eq!((camera.width, camera.height), (800, 800));
        assert_eq!(camera.lens.aspect_ratio, 1.0);
    }

    #[test]
    fn light_direction_is_normalized() {
        let mut config = Config::default();
        config.light.direction = [0.0, -2.0, 0.0];
        let light = build_light(&config);
        assert_relative_eq!(light.direction, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn degenerate_camera_fails_setup() {
        let mut config = Config::default();
        config.camera.position = [0.0, 2.0, 0.0];
        assert!(matches!(
            init_scene_resources(&config),
            Err(RenderError::DegenerateCamera(_))
        ));
    }

    #[test]
    fn missing_model_fails_setup() {
        let mut config = Config::default();
        config.model.path = "no/such/model.obj".to_string();
        assert!(matches!(
            init_scene_resources(&config),
            Err(RenderError::Io { .. })
        ));
    }
}
