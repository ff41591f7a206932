mod script;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use perspective_core::geom::{CanvasSize, Vec2, Vec3};
use perspective_scene::config::SceneConfig;
use perspective_scene::construct::{TetrahedronSide, TriangleSide};
use perspective_scene::drag::CursorType;
use perspective_scene::{DragTarget, Scene};
use script::ReplayScript;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "perspective")]
#[command(about = "Perspective ground-plane construction: equilateral triangle and regular tetrahedron.")]
struct Cli {
    #[arg(short, long, action = ArgAction::Count, global = true, help = "-v info, -vv debug, -vvv trace")]
    verbose: u8,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Top,
    Bottom,
}

impl From<SideArg> for TriangleSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Top => TriangleSide::Top,
            SideArg::Bottom => TriangleSide::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ApexArg {
    Above,
    Below,
}

impl From<ApexArg> for TetrahedronSide {
    fn from(side: ApexArg) -> Self {
        match side {
            ApexArg::Above => TetrahedronSide::Above,
            ApexArg::Below => TetrahedronSide::Below,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Build a scene and print its derived state as JSON")]
    Snapshot {
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_point, help = "screen position of A as X,Y")]
        a: Option<Vec2>,
        #[arg(long, value_parser = parse_point, help = "screen position of B as X,Y")]
        b: Option<Vec2>,
        #[arg(long)]
        vp_x: Option<f64>,
        #[arg(long)]
        horizon_y: Option<f64>,
        #[arg(long, value_enum)]
        triangle_side: Option<SideArg>,
        #[arg(long, value_enum)]
        tetrahedron_side: Option<ApexArg>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    #[command(about = "Feed a recorded event script through a scene")]
    Replay {
        script: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, help = "emit a snapshot after every event")]
        every_step: bool,
    },
    #[command(about = "Report what sits under a screen position")]
    Probe {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long)]
        vp_x: Option<f64>,
        #[arg(long)]
        horizon_y: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Snapshot {
            width,
            height,
            config,
            a,
            b,
            vp_x,
            horizon_y,
            triangle_side,
            tetrahedron_side,
            out,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(side) = triangle_side {
                cfg.layout.triangle_side = side.into();
            }
            if let Some(side) = tetrahedron_side {
                cfg.layout.tetrahedron_side = side.into();
            }
            let mut scene = new_scene(cfg, width, height)?;
            place(&mut scene, horizon_y, vp_x);
            if let Some(p) = a {
                scene.move_point(scene.point_a(), p);
            }
            if let Some(p) = b {
                scene.move_point(scene.point_b(), p);
            }
            emit(&scene.snapshot(), out.as_deref())
        }
        Command::Replay {
            script,
            width,
            height,
            config,
            out,
            every_step,
        } => {
            ensure_input_file(&script)?;
            let session = ReplayScript::load(&script)?;
            let cfg = load_config(config.as_deref())?;
            let canvas = session
                .canvas()
                .unwrap_or(CanvasSize::new(width, height));
            let mut scene = new_scene(cfg, canvas.width, canvas.height)?;
            let frames = script::replay(&mut scene, session.events(), every_step)?;
            if every_step {
                emit(&frames, out.as_deref())
            } else {
                match frames.last() {
                    Some(last) => emit(last, out.as_deref()),
                    None => bail!("replay produced no snapshot"),
                }
            }
        }
        Command::Probe {
            x,
            y,
            width,
            height,
            vp_x,
            horizon_y,
        } => {
            let mut scene = new_scene(SceneConfig::default(), width, height)?;
            place(&mut scene, horizon_y, vp_x);
            let pointer = Vec2::new(x, y);
            let camera = scene.camera();
            let ground = camera.screen_to_ground(pointer);
            let report = ProbeReport {
                pointer,
                ground,
                reprojected: ground.and_then(|g| camera.ground_to_screen(g)),
                perspective_scale: ground.map(|g| camera.perspective_scale(g.z)),
                target: scene.hit_test(pointer),
                cursor: scene.cursor_at(pointer),
            };
            emit(&report, None)
        }
    }
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    pointer: Vec2,
    ground: Option<Vec3>,
    reprojected: Option<Vec2>,
    perspective_scale: Option<f64>,
    target: Option<DragTarget>,
    cursor: CursorType,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn new_scene(cfg: SceneConfig, width: f64, height: f64) -> Result<Scene> {
    Scene::new(cfg, CanvasSize::new(width, height)).context("build scene")
}

fn place(scene: &mut Scene, horizon_y: Option<f64>, vp_x: Option<f64>) {
    if let Some(y) = horizon_y {
        scene.move_horizon(y);
    }
    if let Some(x) = vp_x {
        scene.move_vanishing_point(x);
    }
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    ensure_input_file(path)?;
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {path:?}"))?;
    let cfg: SceneConfig =
        serde_json::from_str(&text).with_context(|| format!("parse config: {path:?}"))?;
    cfg.validate().with_context(|| format!("invalid config: {path:?}"))?;
    Ok(cfg)
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x {x:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y {y:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn emit<T: Serialize + ?Sized>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        std::fs::write(path, &json).with_context(|| format!("write output: {path:?}"))?;
    } else {
        println!("{json}");
    }
    Ok(())
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => bail!("input is not a file: {input:?}"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
