use crate::core::color::Color;
use crate::error::{RenderError, Result};
use crate::io::config::{Config, LightConfig, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::{Attenuation, Light, LightSet, SpotCone};
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::model::Model;
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::Texture;
use crate::scene::utils::normalize_and_center_mesh;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

fn build_light(config: &LightConfig) -> Result<Light> {
    let position = Point3::from(config.position);
    let intensity = Color::from(config.intensity);
    let [a, b, c] = config.attenuation;
    let attenuation = Attenuation::new(a, b, c);

    let needs_attenuation = matches!(config.r#type.as_str(), "point" | "spot");
    if needs_attenuation && attenuation.is_degenerate() {
        return Err(RenderError::InvalidLight(format!(
            "{} light at {:?} has all-zero attenuation",
            config.r#type, config.position
        )));
    }

    let mut light = match config.r#type.as_str() {
        "ambient" => Light::ambient(intensity),
        "directional" => Light::directional(position, intensity),
        "point" => Light::point(position, intensity, attenuation),
        "spot" => Light::spot(
            position,
            intensity,
            attenuation,
            SpotCone {
                inner: config.inner_angle,
                outer: config.outer_angle,
            },
        ),
        other => {
            return Err(RenderError::InvalidLight(format!(
                "unknown light type '{}'",
                other
            )));
        }
    };
    light.enabled = config.enabled;
    Ok(light)
}

/// Builds the light set from config. The unlit light is prepended.
pub fn build_lights_from_config(config: &Config) -> Result<LightSet> {
    let lights = config
        .lights
        .iter()
        .map(build_light)
        .collect::<Result<Vec<_>>>()?;
    Ok(LightSet::new(lights))
}

fn load_texture(path: &str, label: &str) -> Option<Arc<Texture>> {
    match Texture::load(path) {
        Ok(tex) => Some(Arc::new(tex)),
        Err(e) => {
            warn!("Failed to load {} '{}': {}", label, path, e);
            None
        }
    }
}

fn build_object(config: &ObjectConfig) -> SceneObject {
    let mesh = match &config.path {
        Some(path) => match load_obj(path) {
            Ok(mut mesh) => {
                normalize_and_center_mesh(&mut mesh);
                mesh
            }
            Err(e) => {
                error!("Error loading model '{}': {}. Using fallback cube.", path, e);
                Mesh::cube()
            }
        },
        None => Mesh::cube(),
    };

    let texture = config.texture.as_deref().and_then(|p| load_texture(p, "texture"));
    let normal_map = config
        .normal_map
        .as_deref()
        .and_then(|p| load_texture(p, "normal map"));

    let [r, g, b] = config.reflection;
    let mut model = Model::new(mesh).with_material(Material::new(r, g, b));
    if let Some(texture) = texture {
        model = model.with_texture(texture);
    }
    if let Some(normal_map) = normal_map {
        model = model.with_normal_map(normal_map);
        model.normal_map_enabled = config.normal_map_enabled;
    }

    let mut object = SceneObject::new(model);
    object.position = Vector3::from(config.position);
    object.rotation = Vector3::from(config.rotation);
    object.scale = Vector3::from(config.scale);
    object.spin = config.spin;
    object.pulse = config.pulse;
    object
}

/// Initial resource loading (Heavy I/O). Returns a RenderContext.
///
/// Only an invalid light description is fatal; unreadable models and textures
/// fall back to the built-in cube and untextured rendering.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext> {
    // 1. Camera
    let camera = Camera::new(
        Vector3::from(config.camera.rotation),
        Point3::from(config.camera.position),
        config.render.width,
        config.render.height,
    );

    // 2. Lights
    let lights = build_lights_from_config(config)?;

    // 3. Objects
    let objects: Vec<SceneObject> = config.objects.iter().map(build_object).collect();

    info!(
        "Scene initialized with {} objects and {} lights.",
        objects.len(),
        lights.scene_lights().len()
    );

    Ok(RenderContext {
        camera,
        lights,
        objects,
        background: Color::from(config.render.background),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::light::LightCategory;

    #[test]
    fn default_config_builds_scene() {
        let context = init_scene_resources(&Config::default()).unwrap();
        assert_eq!(context.objects.len(), 2);
        assert_eq!(context.background, Color::STEEL_BLUE);

        let categories: Vec<LightCategory> =
            context.lights.scene_lights().iter().map(|l| l.category()).collect();
        assert_eq!(
            categories,
            vec![LightCategory::Directional, LightCategory::Ambient, LightCategory::Point]
        );
        assert!(!context.lights.unlit().enabled);
    }

    #[test]
    fn zero_attenuation_is_rejected() {
        let mut config = Config::parse("").unwrap();
        config.lights = vec![LightConfig {
            r#type: "point".to_string(),
            attenuation: [0.0, 0.0, 0.0],
            ..LightConfig::default()
        }];
        assert!(matches!(
            build_lights_from_config(&config),
            Err(RenderError::InvalidLight(_))
        ));
    }

    #[test]
    fn zero_attenuation_is_fine_for_ambient() {
        let mut config = Config::parse("").unwrap();
        config.lights = vec![LightConfig {
            r#type: "ambient".to_string(),
            attenuation: [0.0, 0.0, 0.0],
            ..LightConfig::default()
        }];
        assert_eq!(build_lights_from_config(&config).unwrap().scene_lights().len(), 1);
    }

    #[test]
    fn unknown_light_type_is_rejected() {
        let mut config = Config::parse("").unwrap();
        config.lights = vec![LightConfig {
            r#type: "area".to_string(),
            ..LightConfig::default()
        }];
        assert!(init_scene_resources(&config).is_err());
    }

    #[test]
    fn missing_model_falls_back_to_cube() {
        let object = build_object(&ObjectConfig {
            path: Some("missing/model.obj".to_string()),
            spin: 0.5,
            ..ObjectConfig::default()
        });
        assert_eq!(object.model.polygons().len(), 12);
        assert!(object.model.texture().is_none());
        assert_eq!(object.spin, 0.5);
    }
}
