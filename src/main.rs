//! `sdccm` command-line front end.
//!
//! `view` runs the viewer pipeline against the headless renderer: it loads
//! one dataset on the background loader, pumps the scene until the load
//! settles, then logs a per-slice summary and optionally exports the point
//! clouds. `synth` writes a random dataset file.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use sdccm::dataset::DccmDataset;
use sdccm::engine::{DatasetLoader, DatasetManager, ManagerEvent};
use sdccm::options::{panel, Options};
use sdccm::renderer::HeadlessRenderer;
use sdccm::scene::Scene;
use sdccm::source::DefaultSource;
use sdccm::util::frame_timing::FrameTiming;
use sdccm::{format, DccmError};

#[derive(Parser, Debug)]
#[command(version, about = "Sliced DCCM loader and point-cloud builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Options preset (TOML). Missing fields use defaults.
    #[arg(short, long, global = true, value_name = "PATH")]
    options: Option<PathBuf>,

    /// Increase verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a dataset and build its slice point clouds.
    View(ViewArgs),
    /// Write a random dataset file.
    Synth(SynthArgs),
    /// Print the parameter-panel JSON schema.
    Schema,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Dataset URL or path. Defaults to the location selected in the options.
    location: Option<String>,

    /// Simulation system (e.g. wt, asp84glu_lig).
    #[arg(long)]
    simulation: Option<String>,

    /// Replica number.
    #[arg(long)]
    replica: Option<String>,

    /// Window-size variant of the file.
    #[arg(long)]
    variant: Option<String>,

    /// Base URL or directory that dataset paths are resolved against.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Negative threshold of the dead zone, in [0, 1].
    #[arg(long, value_name = "FLOAT")]
    negative: Option<f32>,

    /// Positive threshold of the dead zone, in [0, 1].
    #[arg(long, value_name = "FLOAT")]
    positive: Option<f32>,

    /// Slice to emphasize; -1 shows all slices.
    #[arg(long, value_name = "INT", allow_negative_numbers = true)]
    slice: Option<i32>,

    /// Hide slices other than the selected one.
    #[arg(long)]
    hide_unselected: bool,

    /// Write the built point clouds as JSON.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Event-loop rate while waiting for the load.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Give up after this many seconds.
    #[arg(long, default_value_t = 30.0)]
    timeout: f32,
}

impl ViewArgs {
    fn apply(&self, options: &mut Options) {
        let data = &mut options.data;
        if let Some(base) = &self.base_url {
            data.base_url.clone_from(base);
        }
        if let Some(simulation) = &self.simulation {
            data.dataset.simulation.clone_from(simulation);
        }
        if let Some(replica) = &self.replica {
            data.dataset.replica.clone_from(replica);
        }
        if let Some(variant) = &self.variant {
            data.dataset.file_variant.clone_from(variant);
        }

        let filter = &mut options.filter;
        if let Some(negative) = self.negative {
            filter.negative_threshold = negative.clamp(0.0, 1.0);
        }
        if let Some(positive) = self.positive {
            filter.positive_threshold = positive.clamp(0.0, 1.0);
        }
        if let Some(slice) = self.slice {
            filter.selected_slice = slice;
        }
        if self.hide_unselected {
            filter.show_unselected_layers = false;
        }
    }
}

#[derive(Args, Debug)]
struct SynthArgs {
    /// Output file.
    output: PathBuf,

    /// Number of time slices.
    #[arg(long, default_value_t = 10)]
    slices: usize,

    /// Number of residues.
    #[arg(long, default_value_t = 50)]
    atoms: usize,

    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

fn view(mut options: Options, args: &ViewArgs) -> Result<(), DccmError> {
    args.apply(&mut options);
    let key = options.data.dataset.clone();
    let location = args
        .location
        .clone()
        .unwrap_or_else(|| options.data.active_location());

    let loader = DatasetLoader::background(DefaultSource::new("."))?;
    let mut scene = Scene::new(DatasetManager::new(loader, options));
    let mut renderer = HeadlessRenderer::new();
    if let Some(manager) = scene.dataset_mut() {
        let _ = manager.request(key, location.clone());
    }

    let mut timing = FrameTiming::new(args.fps);
    let failure = 'frames: loop {
        for event in scene.on_frame(&mut renderer) {
            match event {
                ManagerEvent::DatasetReady { .. } => break 'frames None,
                ManagerEvent::LoadFailed { message, .. } => {
                    break 'frames Some(message)
                }
                ManagerEvent::SelectionReset => {
                    log::warn!("selected slice out of range; showing all");
                }
            }
        }
        if timing.elapsed() > args.timeout {
            break Some(format!("no response after {:.0}s", args.timeout));
        }
        std::thread::sleep(timing.remaining());
        timing.end_frame();
    };
    log::debug!(
        "settled after {} frames ({:.1} fps)",
        timing.frame_count(),
        timing.fps()
    );

    if let Some(message) = failure {
        scene.dispose(&mut renderer);
        return Err(DccmError::Transport {
            url: location,
            message,
        });
    }

    if let Some(manager) = scene.dataset() {
        for (visual, id) in manager.slices() {
            let visible = renderer.cloud(id).is_some_and(|c| c.style.visible);
            log::info!(
                "slice {:>3}: {:>7} points{}",
                visual.slice_index(),
                visual.len(),
                if visible { "" } else { " (hidden)" }
            );
        }
    }

    if let Some(path) = &args.export {
        let json = renderer
            .export_json()
            .map_err(|e| DccmError::OptionsParse(e.to_string()))?;
        std::fs::write(path, json)?;
        log::info!("wrote {}", path.display());
    }

    scene.dispose(&mut renderer);
    Ok(())
}

fn synth(args: &SynthArgs) -> Result<(), DccmError> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let dataset = DccmDataset::synthetic(args.slices, args.atoms, &mut rng);
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&args.output)?;
    format::write_to(&dataset, std::io::BufWriter::new(file))?;
    log::info!(
        "wrote {} ({} slices x {} residues)",
        args.output.display(),
        args.slices,
        args.atoms
    );
    Ok(())
}

fn schema(options: &Options) -> Result<(), DccmError> {
    let schema = panel::panel_schema(options, None);
    let text = serde_json::to_string_pretty(&schema)
        .map_err(|e| DccmError::OptionsParse(e.to_string()))?;
    writeln!(std::io::stdout().lock(), "{text}")?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), DccmError> {
    let options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    match cli.command {
        Command::View(args) => view(options, &args),
        Command::Synth(args) => synth(&args),
        Command::Schema => schema(&options),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
