use std::time::Instant;

use glam::{Mat4, Vec3};
use glow::HasContext;
use sdl2::keyboard::Keycode;

use crate::abs::*;
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::input::{KeyboardState, UpdateContext};
use crate::model::ObjModel;
use crate::transform::ModelTransform;

mod abs;
mod camera;
mod config;
mod input;
mod model;
mod transform;

const MODEL_PATH: &str = "car.obj";
const VIEWER_CONFIG_JSON: &str = include_str!("assets/viewer.json");

fn init_logging() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ViewerConfig::new(VIEWER_CONFIG_JSON)?;
    let mut app = App::new(
        &config.window.title,
        config.window.width,
        config.window.height,
    )?;

    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
    }

    let model = ObjModel::load(MODEL_PATH)?;
    log::info!(
        "Loaded {} vertices from {} ({} submeshes)",
        model.vertex_count(),
        MODEL_PATH,
        model.submeshes().len()
    );

    let max_extent = model.aabb().max_extent();
    let fit = Mat4::from_scale(Vec3::splat(config.fit_size / max_extent));
    let camera = Camera::framing(max_extent, config.fit_size, config.fov_degrees);
    let view = camera.view();
    let projection =
        camera.projection(config.window.width as f32 / config.window.height as f32);

    let mesh = Mesh::new(&app.gl, &model.vertices());

    let vert_shader = Shader::new(
        &app.gl,
        glow::VERTEX_SHADER,
        include_str!("shaders/color/vertex_shader.glsl"),
    )?;
    let frag_shader = Shader::new(
        &app.gl,
        glow::FRAGMENT_SHADER,
        include_str!("shaders/color/fragment_shader.glsl"),
    )?;
    let shader_program = ShaderProgram::new(&app.gl, &[&vert_shader, &frag_shader])?;

    let mut keyboard = KeyboardState::default();
    let mut transform = ModelTransform::new();
    let mut last_time = Instant::now();

    let [r, g, b, a] = config.clear_color;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                sdl2::event::Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    keyboard.down.insert(key);
                }
                sdl2::event::Event::KeyUp {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    keyboard.down.remove(&key);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let delta_time = now.duration_since(last_time).as_secs_f32();
        last_time = now;

        let update_ctx = UpdateContext::new(&keyboard, delta_time);
        transform.update(&update_ctx, &view, &config);

        unsafe {
            app.gl.clear_color(r, g, b, a);
            app.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        shader_program.use_program();
        shader_program.set_uniform("model", fit * transform.matrix());
        shader_program.set_uniform("view", view);
        shader_program.set_uniform("projection", projection);
        for submesh in model.submeshes() {
            shader_program.set_uniform("material_color", submesh.color);
            mesh.draw_range(submesh.offset, submesh.vertex_count);
        }

        app.window.gl_swap_window();
    }

    Ok(())
}
