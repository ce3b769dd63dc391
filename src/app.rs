use crate::core::rasterizer::DrawMode;
use crate::error::{RenderError, Result};
use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::passes::{DisplayMode, FrameState};
use crate::pipeline::renderer::Renderer;
use crate::scene::context::RenderContext;
use crate::scene::loader::init_scene_resources;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Draws every scene object for one frame, in scene order.
pub fn render_frame(
    context: &mut RenderContext,
    renderer: &mut Renderer,
    frame: &FrameState,
    mode: DrawMode,
) {
    renderer.begin_frame(context.background);
    for object in &mut context.objects {
        let transform = object.transform(frame);
        renderer.render_model(
            &mut object.model,
            &transform,
            &context.camera,
            context.lights.all(),
            mode,
        );
    }
    debug!(
        "Frame at angle {:.2}: {} polygons rendered",
        frame.angle,
        renderer.polygons_rendered()
    );
}

/// `out.png` with index 3 becomes `out_3.png`.
pub fn indexed_output_path(output: &str, index: usize) -> PathBuf {
    let path = Path::new(output);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    path.with_file_name(format!("{}_{}.{}", stem, index, ext))
}

/// Picks the draw mode for a single-frame run. A display mode index wins
/// over the draw mode name and also switches the scene's lights.
fn select_draw_mode(config: &Config, context: &mut RenderContext) -> Result<DrawMode> {
    match config.render.display_mode {
        Some(index) => {
            let display = DisplayMode::from_index(index).ok_or_else(|| {
                RenderError::UnknownDrawMode(format!("display mode {}", index))
            })?;
            info!("Display mode {}: {}", index, display.name());
            display.apply(&mut context.lights, &mut context.objects);
            Ok(display.draw_mode())
        }
        None => config.render.mode.parse(),
    }
}

/// Runs a headless render and writes the result to disk.
///
/// With `all_modes`, every display mode is rendered from the same animation
/// frame and saved under an indexed file name.
pub fn run_cli(config: Config, all_modes: bool) -> Result<()> {
    info!("Starting CLI mode...");
    let mut context = init_scene_resources(&config)?;
    let start_time = Instant::now();

    let width = config.render.width;
    let height = config.render.height;
    let mut renderer = Renderer::new(width, height);
    let frame = FrameState::advanced_by(config.render.frames);

    if all_modes {
        for (index, display) in DisplayMode::ALL.iter().enumerate() {
            display.apply(&mut context.lights, &mut context.objects);
            render_frame(&mut context, &mut renderer, &frame, display.draw_mode());

            let path = indexed_output_path(&config.render.output, index);
            info!("{} -> '{}'", display.name(), path.display());
            save_buffer_to_image(renderer.framebuffer().pixels(), width, height, &path)?;
        }
    } else {
        let mode = select_draw_mode(&config, &mut context)?;
        render_frame(&mut context, &mut renderer, &frame, mode);
        info!(
            "Rendered {} polygons in {:.2?}",
            renderer.polygons_rendered(),
            start_time.elapsed()
        );

        info!("Saving output to '{}'...", config.render.output);
        save_buffer_to_image(
            renderer.framebuffer().pixels(),
            width,
            height,
            &config.render.output,
        )?;
    }

    info!("Done in {:.2?}.", start_time.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_paths_keep_directory_and_extension() {
        assert_eq!(
            indexed_output_path("renders/frame.png", 7),
            PathBuf::from("renders/frame_7.png")
        );
        assert_eq!(indexed_output_path("out", 0), PathBuf::from("out_0.png"));
    }

    #[test]
    fn display_mode_index_overrides_mode_name() {
        let mut config = Config::default();
        config.render.mode = "flat".to_string();
        config.render.display_mode = Some(0);
        let mut context = init_scene_resources(&config).unwrap();
        assert_eq!(select_draw_mode(&config, &mut context).unwrap(), DrawMode::Wireframe);

        config.render.display_mode = Some(99);
        assert!(select_draw_mode(&config, &mut context).is_err());
    }

    #[test]
    fn mode_name_is_parsed_without_display_mode() {
        let mut config = Config::default();
        config.render.mode = "textured".to_string();
        let mut context = init_scene_resources(&config).unwrap();
        assert_eq!(select_draw_mode(&config, &mut context).unwrap(), DrawMode::Textured);

        config.render.mode = "raytraced".to_string();
        assert!(matches!(
            select_draw_mode(&config, &mut context),
            Err(RenderError::UnknownDrawMode(_))
        ));
    }
}
