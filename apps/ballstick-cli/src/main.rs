use anyhow::{Context, bail};
use ballstick_assets::MoleculeLibrary;
use ballstick_camera::NamedView;
use ballstick_common::{Molecule, VisibilityMask};
use ballstick_input::{Command, InputEvent};
use ballstick_persist::ViewStore;
use ballstick_render::{RecordingSurface, Surface};
use ballstick_scene::Scene;
use ballstick_viewer::{Viewer, ViewerConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ballstick", about = "Ball-and-stick molecule viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List molecules in the library
    List {
        /// Molecule library JSON; the bundled samples when omitted
        #[arg(short, long)]
        library: Option<PathBuf>,
    },
    /// Show the scene a molecule and mask produce
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Render one frame to PNG
    Render {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        camera: CameraArgs,
        #[command(flatten)]
        surface: SurfaceArgs,
        /// Output PNG path
        #[arg(short, long, default_value = "molecule.png")]
        output: PathBuf,
        /// Print the draw calls instead of writing an image
        #[arg(long)]
        dry_run: bool,
    },
    /// Spin the molecule and write one PNG per tick
    Spin {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        camera: CameraArgs,
        #[command(flatten)]
        surface: SurfaceArgs,
        /// Number of frames to write
        #[arg(short, long, default_value = "30")]
        frames: usize,
        /// Directory for frame_0000.png, frame_0001.png, ...
        #[arg(short = 'd', long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Manage saved views
    Views {
        /// Saved view store
        #[arg(long, default_value = "views.json")]
        store: PathBuf,
        #[command(subcommand)]
        action: ViewAction,
    },
}

#[derive(Subcommand)]
enum ViewAction {
    /// List saved views
    List,
    /// Save a view under a name
    Save {
        name: String,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        camera: CameraArgs,
    },
    /// Delete a saved view
    Delete { name: String },
}

/// Which molecule to show and which elements to hide.
#[derive(Args, Clone)]
struct SourceArgs {
    /// Molecule id
    molecule: String,
    /// Molecule library JSON; the bundled samples when omitted
    #[arg(short, long)]
    library: Option<PathBuf>,
    /// Element symbols to hide, comma separated
    #[arg(long, value_delimiter = ',')]
    hide: Vec<String>,
}

/// Camera setup, applied in order: saved view, named view, zoom, drag, wheel.
#[derive(Args, Clone, Default)]
struct CameraArgs {
    /// Start from a saved view (camera and mask)
    #[arg(long)]
    saved_view: Option<String>,
    /// Saved view store used by --saved-view
    #[arg(long, default_value = "views.json")]
    views: PathBuf,
    /// Named view: front, top, side or iso
    #[arg(long)]
    view: Option<NamedView>,
    /// Zoom factor, clamped to the camera range
    #[arg(long)]
    zoom: Option<f64>,
    /// Horizontal drag in pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    drag_x: f64,
    /// Vertical drag in pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    drag_y: f64,
    /// Wheel notches; positive zooms out, negative zooms in
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    wheel: i32,
}

#[derive(Args, Clone)]
struct SurfaceArgs {
    /// Viewer config (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Surface width, overriding the config
    #[arg(long)]
    width: Option<u32>,
    /// Surface height, overriding the config
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("ballstick v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", ballstick_common::crate_info());
            println!("render: {}", ballstick_render::crate_info());
            println!("assets: {}", ballstick_assets::crate_info());
            println!("persist: {}", ballstick_persist::crate_info());
            println!("viewer: {}", ballstick_viewer::crate_info());
        }
        Commands::List { library } => {
            let library = open_library(library.as_deref())?;
            for m in library.iter() {
                println!(
                    "{:<16} {:<16} {:<8} atoms={} bonds={}",
                    m.id,
                    m.name,
                    m.formula,
                    m.atoms.len(),
                    m.bonds.len()
                );
            }
        }
        Commands::Inspect { source } => {
            let library = open_library(source.library.as_deref())?;
            let molecule = library.require(&source.molecule)?;
            let scene = Scene::from_molecule(molecule, &mask_from(&source.hide));
            println!("{} ({}, {})", molecule.name, molecule.id, molecule.formula);
            println!("{}", scene.summary());
            if scene.is_empty() {
                println!("Nothing visible with the current mask.");
            }
        }
        Commands::Render {
            source,
            camera,
            surface,
            output,
            dry_run,
        } => {
            let config = load_config(&surface)?;
            let library = open_library(source.library.as_deref())?;
            let molecule = library.require(&source.molecule)?;
            if dry_run {
                let mut viewer =
                    Viewer::new(RecordingSurface::new(config.width, config.height), &config);
                prepare(&mut viewer, molecule, &source, &camera)?;
                print!("{}", viewer.surface().describe_last_frame());
                println!("{}", viewer.last_frame());
            } else {
                let mut viewer = Viewer::raster(&config);
                prepare(&mut viewer, molecule, &source, &camera)?;
                viewer
                    .surface()
                    .save_png(&output)
                    .with_context(|| format!("writing {}", output.display()))?;
                println!("{} -> {}", viewer.last_frame(), output.display());
            }
        }
        Commands::Spin {
            source,
            camera,
            surface,
            frames,
            out_dir,
        } => {
            let config = load_config(&surface)?;
            let library = open_library(source.library.as_deref())?;
            let molecule = library.require(&source.molecule)?;
            let mut viewer = Viewer::raster(&config);
            prepare(&mut viewer, molecule, &source, &camera)?;
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;

            let mut response = viewer.handle_command(&Command::ToggleSpin);
            let mut written = 0;
            while response.schedule_tick && written < frames {
                response = viewer.tick();
                let path = out_dir.join(format!("frame_{written:04}.png"));
                viewer
                    .surface()
                    .save_png(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                written += 1;
            }
            viewer.handle_command(&Command::ToggleSpin);
            println!(
                "Wrote {written} frames to {} (rotation_y={:.2})",
                out_dir.display(),
                viewer.camera().rotation_y()
            );
        }
        Commands::Views { store, action } => {
            let mut views = ViewStore::open(&store)
                .with_context(|| format!("opening {}", store.display()))?;
            match action {
                ViewAction::List => {
                    if views.is_empty() {
                        println!("No saved views in {}", store.display());
                    }
                    for v in views.iter() {
                        let c = &v.camera;
                        let hidden: Vec<&str> = v.visibility.hidden().collect();
                        println!(
                            "{:<16} molecule={:<16} rot=({:.2}, {:.2}) zoom={:.2} hidden=[{}]",
                            v.name,
                            v.molecule_id.as_deref().unwrap_or("-"),
                            c.rotation_x(),
                            c.rotation_y(),
                            c.zoom(),
                            hidden.join(",")
                        );
                    }
                }
                ViewAction::Save {
                    name,
                    source,
                    camera,
                } => {
                    let library = open_library(source.library.as_deref())?;
                    let molecule = library.require(&source.molecule)?;
                    let config = ViewerConfig::default();
                    let mut viewer =
                        Viewer::new(RecordingSurface::new(config.width, config.height), &config);
                    prepare(&mut viewer, molecule, &source, &camera)?;
                    let replaced = views.put(viewer.save_view(&name))?;
                    let verb = if replaced.is_some() { "Updated" } else { "Saved" };
                    println!("{verb} view {name:?} in {}", store.display());
                }
                ViewAction::Delete { name } => {
                    views.remove(&name)?;
                    println!("Deleted view {name:?}");
                }
            }
        }
    }

    Ok(())
}

fn open_library(path: Option<&Path>) -> anyhow::Result<MoleculeLibrary> {
    match path {
        Some(path) => MoleculeLibrary::load(path)
            .with_context(|| format!("loading library {}", path.display())),
        None => Ok(MoleculeLibrary::with_samples()),
    }
}

fn load_config(args: &SurfaceArgs) -> anyhow::Result<ViewerConfig> {
    let config = match &args.config {
        Some(path) => {
            ViewerConfig::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => ViewerConfig::default(),
    };
    let width = args.width.unwrap_or(config.width);
    let height = args.height.unwrap_or(config.height);
    Ok(config.with_size(width, height)?)
}

fn mask_from(hide: &[String]) -> VisibilityMask {
    hide.iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| (e, false))
        .collect()
}

/// Load the molecule and drive the viewer through the camera arguments the
/// way a user would: events and commands. `--zoom` has no event form and is
/// written to the camera, which clamps it.
fn prepare<S: Surface>(
    viewer: &mut Viewer<S>,
    molecule: &Molecule,
    source: &SourceArgs,
    camera: &CameraArgs,
) -> anyhow::Result<()> {
    let mut mask = mask_from(&source.hide);

    if let Some(name) = &camera.saved_view {
        let store = ViewStore::open(&camera.views)
            .with_context(|| format!("opening {}", camera.views.display()))?;
        let saved = store.require(name)?;
        if let Some(id) = saved.molecule_id.as_deref().filter(|id| *id != molecule.id) {
            tracing::warn!(view = %name, saved_for = %id, "view was saved for another molecule");
        }
        for element in saved.visibility.hidden() {
            mask.hide(element);
        }
        viewer.set_molecule(Some(molecule), &mask);
        viewer.restore_view(&ballstick_persist::SavedView {
            visibility: mask,
            ..saved.clone()
        });
    } else {
        viewer.set_molecule(Some(molecule), &mask);
    }

    if let Some(view) = camera.view {
        viewer.handle_command(&Command::SetView(view.to_string()));
    }
    if let Some(zoom) = camera.zoom {
        let mut c = *viewer.camera();
        c.set_zoom(zoom);
        viewer.set_camera(c);
    }
    if camera.drag_x != 0.0 || camera.drag_y != 0.0 {
        let (cx, cy) = center(viewer.surface());
        viewer.handle_event(InputEvent::PointerDown { x: cx, y: cy });
        viewer.handle_event(InputEvent::PointerMove {
            x: cx + camera.drag_x,
            y: cy + camera.drag_y,
        });
        viewer.handle_event(InputEvent::PointerUp);
    }
    let notch = if camera.wheel < 0 { -1.0 } else { 1.0 };
    for _ in 0..camera.wheel.unsigned_abs() {
        viewer.handle_event(InputEvent::Wheel { delta: notch });
    }

    if viewer.scene().is_empty() {
        bail!("nothing visible: every element of {} is hidden", molecule.id);
    }
    Ok(())
}

fn center<S: Surface>(surface: &S) -> (f64, f64) {
    (surface.width() as f64 / 2.0, surface.height() as f64 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballstick_assets::samples;

    fn source(molecule: &str, hide: &[&str]) -> SourceArgs {
        SourceArgs {
            molecule: molecule.into(),
            library: None,
            hide: hide.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn recording_viewer() -> Viewer<RecordingSurface> {
        Viewer::new(RecordingSurface::new(200, 100), &ViewerConfig::default())
    }

    #[test]
    fn parses_render_arguments() {
        let cli = Cli::try_parse_from([
            "ballstick", "render", "water", "--hide", "H,C", "--view", "top", "--drag-x", "-50",
            "--wheel", "-2", "--dry-run",
        ])
        .unwrap();
        let Commands::Render {
            source,
            camera,
            dry_run,
            ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(source.hide, vec!["H", "C"]);
        assert_eq!(camera.view, Some(NamedView::Top));
        assert_eq!(camera.drag_x, -50.0);
        assert_eq!(camera.wheel, -2);
        assert!(dry_run);
    }

    #[test]
    fn rejects_unknown_named_view() {
        assert!(Cli::try_parse_from(["ballstick", "render", "water", "--view", "bogus"]).is_err());
    }

    #[test]
    fn mask_hides_listed_elements_only() {
        let mask = mask_from(&["H".into(), " ".into()]);
        assert!(!mask.is_visible("H"));
        assert!(mask.is_visible("O"));
    }

    #[test]
    fn prepare_applies_drag_and_wheel() {
        let mut viewer = recording_viewer();
        let camera = CameraArgs {
            view: Some(NamedView::Front),
            drag_x: 100.0,
            wheel: -1,
            ..CameraArgs::default()
        };
        prepare(&mut viewer, &samples::water(), &source("water", &[]), &camera).unwrap();
        assert!((viewer.camera().rotation_y() - 1.0).abs() < 1e-9);
        assert_eq!(viewer.camera().rotation_x(), 0.0);
        assert!((viewer.camera().zoom() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn prepare_fails_when_everything_is_hidden() {
        let mut viewer = recording_viewer();
        let err = prepare(
            &mut viewer,
            &samples::water(),
            &source("water", &["H", "O"]),
            &CameraArgs::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("nothing visible"));
    }

    #[test]
    fn dry_run_lists_only_the_last_frame() {
        let mut viewer = recording_viewer();
        let camera = CameraArgs {
            zoom: Some(2.0),
            ..CameraArgs::default()
        };
        prepare(&mut viewer, &samples::water(), &source("water", &[]), &camera).unwrap();
        assert!(viewer.frames() > 1);
        let listing = viewer.surface().describe_last_frame();
        assert!(listing.contains(&format!("({} commands)", 2 + 2 + 3 * 4)));
    }

    #[test]
    fn zoom_argument_is_clamped() {
        let mut viewer = recording_viewer();
        let camera = CameraArgs {
            zoom: Some(50.0),
            ..CameraArgs::default()
        };
        prepare(&mut viewer, &samples::water(), &source("water", &[]), &camera).unwrap();
        assert_eq!(viewer.camera().zoom(), ballstick_camera::MAX_ZOOM);

        let parsed = Cli::try_parse_from(["ballstick", "render", "water", "--zoom", "50"]).unwrap();
        let Commands::Render { camera, .. } = parsed.command else {
            panic!("expected render");
        };
        assert_eq!(camera.zoom, Some(50.0));
    }
}
