//! capillary-enclosure: parametric OpenSCAD models for capillary sensor enclosures
//!
//! Generates assembly views and laser-cutting layouts as `.scad` files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use capillary_enclosure::config::{self, Config};
use capillary_enclosure::enclosure::{
    load_params, ArrayedEnclosure, AssemblyOptions, CapillaryEnclosure, Enclosure,
    EnclosureParams, PartSet,
};
use capillary_enclosure::error::Error;
use capillary_enclosure::scad::{Node, ScadProgram};

/// Parametric OpenSCAD generator for capillary sensor enclosures.
///
/// Writes assembly views and flat laser-cutting layouts as OpenSCAD scripts.
#[derive(Parser, Debug)]
#[command(name = "capillary-enclosure")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the assembled 3D view
    Assembly {
        /// Enclosure parameter file (JSON)
        #[arg(short, long, value_name = "PARAMS_FILE")]
        params: Option<PathBuf>,

        /// Render a sensor array on a shared bottom plate
        #[arg(long)]
        arrayed: bool,

        /// Leave a part out of the assembly (repeatable)
        #[arg(long, value_enum, value_name = "PART")]
        hide: Vec<Part>,

        /// Exploded-view offsets as X,Y,Z
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
        explode: [f64; 3],

        /// Output file
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },

    /// Write a flat laser-cutting layout
    Projection {
        /// Which parts to lay out
        #[arg(value_enum)]
        kind: ProjectionKind,

        /// Enclosure parameter file (JSON)
        #[arg(short, long, value_name = "PARAMS_FILE")]
        params: Option<PathBuf>,

        /// Omit the one inch reference cube
        #[arg(long)]
        no_ref_cube: bool,

        /// Gap between parts, in wall thicknesses
        #[arg(long, value_parser = parse_spacing)]
        spacing: Option<f64>,

        /// Output file
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },

    /// Print the effective enclosure parameters as JSON
    Params {
        /// Enclosure parameter file (JSON)
        #[arg(short, long, value_name = "PARAMS_FILE")]
        params: Option<PathBuf>,
    },
}

/// Assembly parts that can be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Part {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
    Standoffs,
    Sensor,
    Capillary,
    GuidePlates,
    GuideTop,
    LedPcb,
    Diffuser,
    DiffuserStandoffs,
    Clamp,
}

impl Part {
    const fn flag(self) -> PartSet {
        match self {
            Self::Top => PartSet::TOP,
            Self::Bottom => PartSet::BOTTOM,
            Self::Front => PartSet::FRONT,
            Self::Back => PartSet::BACK,
            Self::Left => PartSet::LEFT,
            Self::Right => PartSet::RIGHT,
            Self::Standoffs => PartSet::STANDOFFS,
            Self::Sensor => PartSet::SENSOR,
            Self::Capillary => PartSet::CAPILLARY,
            Self::GuidePlates => PartSet::GUIDE_PLATES,
            Self::GuideTop => PartSet::GUIDE_TOP,
            Self::LedPcb => PartSet::LED_PCB,
            Self::Diffuser => PartSet::DIFFUSER,
            Self::DiffuserStandoffs => PartSet::DIFFUSER_STANDOFFS,
            Self::Clamp => PartSet::CLAMP,
        }
    }
}

/// Laser-cutting layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProjectionKind {
    /// Box panels and capillary clamp
    Box,
    /// The two side guide plates
    GuideSide,
    /// The top guide plate
    GuideTop,
    /// The LED diffuser
    Diffuser,
    /// The shared bottom plate of a sensor array
    ArrayBottom,
}

impl ProjectionKind {
    const fn file_name(self) -> &'static str {
        match self {
            Self::Box => "enclosure_box_projection.scad",
            Self::GuideSide => "enclosure_guide_side_projection.scad",
            Self::GuideTop => "enclosure_guide_top_projection.scad",
            Self::Diffuser => "enclosure_diffuser_projection.scad",
            Self::ArrayBottom => "enclosure_array_bottom_projection.scad",
        }
    }
}

/// Parses an `X,Y,Z` triple.
fn parse_vec3(s: &str) -> Result<[f64; 3], String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;

    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(format!("values must be finite, got {v}"));
    }

    <[f64; 3]>::try_from(values).map_err(|v| format!("expected 3 values, got {}", v.len()))
}

/// Parses a layout spacing factor.
fn parse_spacing(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number '{s}': {e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("spacing must be a finite number >= 0, got {value}"))
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads parameters from the CLI path, the configured path, or the defaults.
fn resolve_params(cli_path: Option<&Path>, cfg: &Config) -> Result<EnclosureParams, Error> {
    match cli_path.or(cfg.params_path.as_deref()) {
        Some(path) => {
            info!(path = %path.display(), "Loading enclosure parameters");
            Ok(load_params(path)?)
        }
        None => {
            info!("Using default enclosure parameters");
            let params = EnclosureParams::default();
            params.validate()?;
            Ok(params)
        }
    }
}

/// Writes `nodes` as an OpenSCAD program.
fn write_program(cfg: &Config, nodes: Vec<Node>, path: &Path) -> Result<(), Error> {
    let count = nodes.len();
    let mut program = ScadProgram::new().with_segments(cfg.render.segments);
    program.add(nodes);
    program.write(path)?;

    info!(path = %path.display(), parts = count, "Wrote OpenSCAD file");
    Ok(())
}

fn run(command: Command, cfg: &Config) -> Result<(), Error> {
    match command {
        Command::Assembly {
            params,
            arrayed,
            hide,
            explode,
            output,
        } => {
            let params = resolve_params(params.as_deref(), cfg)?;
            let parts = hide
                .iter()
                .fold(PartSet::all(), |parts, part| parts - part.flag());
            let options = AssemblyOptions { parts, explode };

            let enclosure: Box<dyn Enclosure> = if arrayed {
                Box::new(ArrayedEnclosure::new(&params)?)
            } else {
                Box::new(CapillaryEnclosure::new(&params)?)
            };
            let file_name = if arrayed {
                "arrayed_assembly.scad"
            } else {
                "enclosure_assembly.scad"
            };

            let path = output.unwrap_or_else(|| cfg.output_path(file_name));
            write_program(cfg, enclosure.assembly(&options), &path)
        }
        Command::Projection {
            kind,
            params,
            no_ref_cube,
            spacing,
            output,
        } => {
            let params = resolve_params(params.as_deref(), cfg)?;
            let show_ref_cube = cfg.layout.show_ref_cube && !no_ref_cube;

            let nodes = match kind {
                ProjectionKind::Box => {
                    let spacing = spacing.unwrap_or(cfg.layout.box_spacing_factor);
                    CapillaryEnclosure::new(&params)?.box_projection(show_ref_cube, spacing)
                }
                ProjectionKind::ArrayBottom => {
                    let spacing = spacing.unwrap_or(cfg.layout.part_spacing_factor);
                    ArrayedEnclosure::new(&params)?.array_bottom_projection(show_ref_cube, spacing)
                }
                ProjectionKind::GuideSide | ProjectionKind::GuideTop | ProjectionKind::Diffuser => {
                    let spacing = spacing.unwrap_or(cfg.layout.part_spacing_factor);
                    let enclosure = CapillaryEnclosure::new(&params)?;
                    match kind {
                        ProjectionKind::GuideSide => {
                            enclosure.guide_side_projection(show_ref_cube, spacing)
                        }
                        ProjectionKind::GuideTop => {
                            enclosure.guide_top_projection(show_ref_cube, spacing)
                        }
                        _ => enclosure.diffuser_projection(show_ref_cube, spacing),
                    }
                }
            };

            let path = output.unwrap_or_else(|| cfg.output_path(kind.file_name()));
            write_program(cfg, nodes, &path)
        }
        Command::Params { params } => {
            let params = resolve_params(params.as_deref(), cfg)?;
            let json = serde_json::to_string_pretty(&params).map_err(Error::Serialize)?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Entry point for the capillary-enclosure generator.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting capillary-enclosure"
    );

    match run(args.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Generation failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn parse_explode_triple() {
        let v = parse_vec3("1.5,-2,0").unwrap();
        assert!((v[0] - 1.5).abs() < f64::EPSILON);
        assert!((v[1] + 2.0).abs() < f64::EPSILON);
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn parse_explode_rejects_non_finite() {
        assert!(parse_vec3("nan,0,0").is_err());
        assert!(parse_vec3("0,inf,0").is_err());
        assert!(parse_vec3("0,0,-inf").is_err());
    }

    #[test]
    fn parse_spacing_bounds() {
        assert!((parse_spacing("2.5").unwrap() - 2.5).abs() < f64::EPSILON);
        assert!(parse_spacing("0").is_ok());
        assert!(parse_spacing("-1").is_err());
        assert!(parse_spacing("nan").is_err());
        assert!(parse_spacing("inf").is_err());

        let result = Args::try_parse_from([
            "capillary-enclosure",
            "projection",
            "box",
            "--spacing",
            "nan",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn hide_flags_map_to_parts() {
        assert_eq!(Part::GuideTop.flag(), PartSet::GUIDE_TOP);
        assert_eq!(Part::DiffuserStandoffs.flag(), PartSet::DIFFUSER_STANDOFFS);
    }

    #[test]
    fn parse_assembly_args() {
        let args = Args::try_parse_from([
            "capillary-enclosure",
            "assembly",
            "--arrayed",
            "--hide",
            "top",
            "--hide",
            "led-pcb",
            "--explode",
            "0,0,-5",
        ])
        .unwrap();

        let Command::Assembly {
            arrayed,
            hide,
            explode,
            ..
        } = args.command
        else {
            panic!("expected assembly command");
        };
        assert!(arrayed);
        assert_eq!(hide, vec![Part::Top, Part::LedPcb]);
        assert!((explode[2] + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn log_level_resolution() {
        assert_eq!(get_log_level(0, true, "debug"), Level::ERROR);
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "bogus"), Level::WARN);
    }
}
