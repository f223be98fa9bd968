//! Frame demo
//!
//! Drives the scene renderer through a few frames on the headless backend and
//! prints what each frame submitted to the GPU.
//!
//! ```text
//! frame_demo [config.toml|config.ron] [--backend opengl|dx9] [--frames N]
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgMatches};
use scene_renderer::backend::{Command, HeadlessBackend, HeadlessContext};
use scene_renderer::foundation::logging;
use scene_renderer::graphics::BufferUsageHint;
use scene_renderer::prelude::*;

const DEFAULT_BACKEND: &str = "opengl";
const DEFAULT_FRAMES: &str = "3";

/// Errors that end the demo
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] scene_renderer::config::ConfigError),

    #[error(transparent)]
    Renderer(#[from] RendererError),

    #[error("Could not prepare the cube mesh: {0}")]
    Mesh(#[from] scene_renderer::graphics::BackendError),
}

#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    backend: String,
    frames: u32,
}

fn cli() -> clap::Command {
    clap::Command::new("frame_demo")
        .about("Renders a few frames on the headless backend and prints what each one submitted")
        .arg(
            Arg::new("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Renderer configuration file (.toml or .ron)"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("ID")
                .default_value(DEFAULT_BACKEND)
                .help("Backend identifier reported to the renderer (opengl, dx9)"),
        )
        .arg(
            Arg::new("frames")
                .long("frames")
                .value_name("N")
                .value_parser(value_parser!(u32))
                .default_value(DEFAULT_FRAMES)
                .help("Number of frames to render"),
        )
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            backend: matches
                .get_one::<String>("backend")
                .cloned()
                .unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
            frames: matches.get_one::<u32>("frames").copied().unwrap_or(3),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RendererConfig, DemoError> {
    match path {
        Some(path) => {
            log::info!("Loading renderer configuration from {}", path.display());
            Ok(RendererConfig::load_from_file(path)?)
        }
        None => Ok(RendererConfig::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../resources/shaders"))),
    }
}

/// Unit cube, six faces of two triangles, one colour per face
fn cube_vertices() -> Vec<Vertex> {
    let faces: [([f32; 3], [f32; 3], [f32; 3], Color); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], Color::rgba(1.0, 0.2, 0.2, 1.0)),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], Color::rgba(0.2, 1.0, 0.2, 1.0)),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], Color::rgba(0.2, 0.2, 1.0, 1.0)),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], Color::rgba(1.0, 1.0, 0.2, 1.0)),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], Color::rgba(0.2, 1.0, 1.0, 1.0)),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], Color::rgba(1.0, 0.2, 1.0, 1.0)),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, right, up, color) in faces {
        let corner = |s: f32, t: f32| {
            let position = [
                0.5 * (normal[0] + s * right[0] + t * up[0]),
                0.5 * (normal[1] + s * right[1] + t * up[1]),
                0.5 * (normal[2] + s * right[2] + t * up[2]),
            ];
            Vertex::new(position, color, [(s + 1.0) * 0.5, (1.0 - t) * 0.5])
        };

        let quad = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];
        vertices.extend_from_slice(&[quad[0], quad[1], quad[2], quad[0], quad[2], quad[3]]);
    }
    vertices
}

fn summarize(frame: u32, commands: &[Command]) {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for command in commands {
        let name = match command {
            Command::BindProgram(_) => "program binds",
            Command::SetUniformI32 { .. } | Command::SetUniformMat4 { .. } => "uniform updates",
            Command::BindTexture { .. } => "texture binds",
            Command::UploadVertices { .. } => "vertex uploads",
            Command::Draw { .. } => "draw calls",
            Command::SetScissor { .. } => "scissor changes",
            _ => continue,
        };
        *counts.entry(name).or_default() += 1;
    }

    println!("frame {frame}: {} backend calls", commands.len());
    for (name, count) in counts {
        println!("  {name:<16} {count}");
    }
}

fn run(options: &Options) -> Result<(), DemoError> {
    let config = load_config(options.config.as_ref())?;
    let backend = HeadlessBackend::new(options.backend.as_str());
    let context = HeadlessContext::new(backend.clone(), 1280.0, 720.0);

    let mut cube = context.backend().create_vertex_buffer()?;
    cube.upload(&cube_vertices(), PrimitiveType::Triangles, BufferUsageHint::Static)?;

    let mut camera = PerspectiveCamera::new(Vec3::new(2.0, 2.0, 6.0), 45.0, 0.1, 100.0);
    camera.look_at(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

    {
        let mut renderer = SimpleRenderer::new(config);
        renderer.initialize(&context)?;
        backend.take_commands();

        for frame in 0..options.frames {
            let spin = frame as f32 * 15.0;

            renderer.begin_frame();
            renderer.use_camera(&mut camera);
            renderer.submit_mesh(MeshRenderItem::new(cube.as_ref()).with_rotation(Vec3::new(0.0, spin, 0.0)));
            renderer.submit_mesh(
                MeshRenderItem::new(cube.as_ref())
                    .with_position(Vec3::new(-1.5, 0.0, -1.0))
                    .with_scale(Vec3::new(0.5, 0.5, 0.5)),
            );
            renderer.submit_ui(UiRenderItem::rect(
                Vec2::new(16.0, 16.0),
                Vec2::new(240.0, 32.0),
                Color::rgba(0.0, 0.0, 0.0, 0.6),
            ));
            renderer.end_frame();

            summarize(frame, &backend.take_commands());
        }
    }

    cube.destroy();
    log::info!(
        "Rendered {} frames, {} GPU objects still alive",
        options.frames,
        backend.live_resources()
    );
    Ok(())
}

fn main() {
    logging::init();

    let options = Options::from_matches(&cli().get_matches());
    if let Err(e) = run(&options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        let matches = cli().try_get_matches_from(std::iter::once("frame_demo").chain(args.iter().copied()))?;
        Ok(Options::from_matches(&matches))
    }

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).expect("no arguments");
        assert_eq!(options.config, None);
        assert_eq!(options.backend, "opengl");
        assert_eq!(options.frames, 3);
    }

    #[test]
    fn test_all_options() {
        let options = parse(&["renderer.toml", "--backend", "dx9", "--frames", "10"]).expect("valid arguments");
        assert_eq!(options.config, Some(PathBuf::from("renderer.toml")));
        assert_eq!(options.backend, "dx9");
        assert_eq!(options.frames, 10);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse(&["--frames", "many"]).is_err());
        assert!(parse(&["--frames"]).is_err());
        assert!(parse(&["--unknown"]).is_err());
    }
}
