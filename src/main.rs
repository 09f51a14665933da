//! Command line front end for the square tiling SAT reducer

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use square_tiling_sat::{
    config::{CliOverrides, OutputFormat, Settings, SolverBackend},
    problem::{TilingOutcome, TilingProblem, TilingSolution},
    sat::{SolverGateway, UnifiedSolver},
    tiling::{create_example_instance, load_instance_from_file, Instance},
    utils::{ColorOutput, TilingFormatter},
};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const EXIT_SATISFIABLE: u8 = 10;
const EXIT_UNSATISFIABLE: u8 = 20;
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "square_tiling_sat")]
#[command(about = "Edge-matching square tiling via SAT")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a k×k grid can be tiled and print a tiling if so
    Solve {
        /// Grid side length
        k: usize,

        /// Instance file
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Solver backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// External solver executable (overrides config)
        #[arg(short, long)]
        solver: Option<PathBuf>,

        /// Solver timeout in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Reject malformed tile lines instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Print the CNF formula before solving
        #[arg(long)]
        print_dimacs: bool,

        /// Print statistics reported by the solver
        #[arg(long)]
        solver_stats: bool,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the CNF encoding in DIMACS format without solving
    Encode {
        /// Grid side length
        k: usize,

        /// Instance file
        input: PathBuf,

        /// Destination file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reject malformed tile lines instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

struct SolveArgs {
    k: usize,
    input: PathBuf,
    config: PathBuf,
    overrides: CliOverrides,
    print_dimacs: bool,
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Solve { verbose: true, .. });
    init_tracing(verbose);

    let result = match cli.command {
        Commands::Solve {
            k, input, config, backend, solver, timeout, strict,
            print_dimacs, solver_stats, format, verbose,
        } => {
            let overrides = CliOverrides {
                backend,
                executable: solver,
                timeout_seconds: timeout,
                strict,
                format,
                show_statistics: solver_stats,
            };
            solve_command(SolveArgs { k, input, config, overrides, print_dimacs, verbose })
                .map(ExitCode::from)
        }
        Commands::Encode { k, input, output, strict } => {
            encode_command(k, input, output, strict).map(|()| ExitCode::SUCCESS)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force).map(|()| ExitCode::SUCCESS)
        }
    };

    result.unwrap_or_else(|err| {
        eprintln!("{}", ColorOutput::error(&format!("Error: {:#}", err)));
        ExitCode::from(EXIT_FAILURE)
    })
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::INFO } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // A subscriber may already be installed when running under a test harness
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
        Ok(Settings::default())
    }
}

fn solve_command(args: SolveArgs) -> Result<u8> {
    let mut settings = load_settings(&args.config)?;
    settings.merge_with_cli(&args.overrides);
    settings.validate().context("Configuration validation failed")?;

    let format = settings.output.format;

    if args.verbose {
        emit(format, &format!(
            "Configuration:\n  Backend: {:?}\n  Executable: {}\n  Timeout: {}s\n  Parse mode: {:?}\n",
            settings.solver.backend,
            settings.solver.executable.display(),
            settings.solver.timeout_seconds,
            settings.parsing.mode,
        ));
    }

    let problem = TilingProblem::from_file(settings.clone(), &args.input, args.k)
        .context("Failed to create tiling problem")?;

    if args.verbose {
        emit(format, &problem.encoding_statistics().to_string());
    }

    if args.print_dimacs {
        emit(format, &problem.formula().to_dimacs());
    }

    let mut solver = UnifiedSolver::new(&settings.solver);
    info!("Using {} backend", solver.name());

    let outcome = match problem.solve(&mut solver) {
        Ok(outcome) => outcome,
        Err(err) => {
            // No verdict from the solver counts as unsatisfiable
            eprintln!("{}", ColorOutput::error(&format!("Solver failure: {:#}", err)));
            report_unsatisfiable(settings.output.format)?;
            return Ok(EXIT_UNSATISFIABLE);
        }
    };

    if settings.output.show_statistics {
        emit(format, &outcome.statistics().to_string());
    }

    match outcome {
        TilingOutcome::Unsatisfiable { .. } => {
            report_unsatisfiable(settings.output.format)?;
            Ok(EXIT_UNSATISFIABLE)
        }
        TilingOutcome::Solved(solution) => {
            match settings.output.format {
                OutputFormat::Json => {
                    let report = json!({
                        "satisfiable": true,
                        "summary": solution.summary(),
                        "solution": solution,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Text => {
                    let placeholder = &settings.output.unfilled_symbol;
                    print!("{}", render_solution(&solution, problem.instance(), placeholder));

                    if args.verbose {
                        println!("\nSolved in {:.3}s", solution.solve_time.as_secs_f64());
                    }

                    if solution.is_valid() {
                        info!("{}", ColorOutput::success("Tiling verified"));
                    } else {
                        eprintln!("{}", ColorOutput::warning(&solution.validation.to_string()));
                    }
                }
            }
            Ok(EXIT_SATISFIABLE)
        }
    }
}

/// Diagnostics go to stdout, except in JSON mode where stdout carries only the report
fn emit(format: OutputFormat, text: &str) {
    let _ = emit_into(format, text, &mut std::io::stdout(), &mut std::io::stderr());
}

fn emit_into<O: Write, E: Write>(
    format: OutputFormat,
    text: &str,
    stdout: &mut O,
    stderr: &mut E,
) -> std::io::Result<()> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    match format {
        OutputFormat::Text => writeln!(stdout, "{}", text),
        OutputFormat::Json => writeln!(stderr, "{}", text),
    }
}

/// Status line, index model, then the colour-name tiling
fn render_solution(solution: &TilingSolution, instance: &Instance, placeholder: &str) -> String {
    let mut output = String::from("s SATISFIABLE\nModel:\n");
    output.push_str(&TilingFormatter::format_index_grid(&solution.grid, placeholder));
    output.push_str("Tiling:\n");
    output.push_str(&TilingFormatter::format_tiling(&solution.grid, instance, placeholder));
    output
}

fn report_unsatisfiable(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "satisfiable": false }))?);
        }
        OutputFormat::Text => println!("s UNSATISFIABLE"),
    }
    Ok(())
}

fn encode_command(k: usize, input: PathBuf, output: Option<PathBuf>, strict: bool) -> Result<()> {
    let mut settings = Settings::default();
    settings.merge_with_cli(&CliOverrides { strict, ..Default::default() });

    let instance = load_instance_from_file(&input, settings.parsing.mode)?;
    let problem = TilingProblem::new(settings, instance, k)?;
    let formula = problem.formula();

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            formula.write_dimacs(&mut writer)?;
            writer.flush()
                .with_context(|| format!("Failed to write DIMACS to {}", path.display()))?;
            println!("Wrote DIMACS to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            formula.write_dimacs(&mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input");

    for dir in [&config_dir, &input_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // Embedded solver, no external executable required
    let cadical_path = config_dir.join("examples/cadical.yaml");
    if !cadical_path.exists() || force {
        let mut cadical = Settings::default();
        cadical.solver.backend = SolverBackend::Cadical;
        cadical.to_file(&cadical_path)?;
        println!("Created: {}", cadical_path.display());
    }

    create_example_instance(&input_dir).context("Failed to create example instance")?;
    println!("Created example instance in: {}", input_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: square_tiling_sat solve 4 {}", input_dir.join("checkerboard.txt").display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use square_tiling_sat::problem::TilingValidator;
    use square_tiling_sat::sat::{CadicalSolver, SolverStatistics};
    use square_tiling_sat::tiling::{parse_instance, TilingGrid};
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "square_tiling_sat",
            "solve",
            "3",
            "tiles.txt",
            "--backend",
            "cadical",
            "--timeout",
            "10",
            "--print-dimacs",
            "--solver-stats",
        ])
        .unwrap();

        match cli.command {
            Commands::Solve { k, input, backend, timeout, print_dimacs, solver_stats, strict, .. } => {
                assert_eq!(k, 3);
                assert_eq!(input, PathBuf::from("tiles.txt"));
                assert_eq!(backend, Some(SolverBackend::Cadical));
                assert_eq!(timeout, Some(10));
                assert!(print_dimacs);
                assert!(solver_stats);
                assert!(!strict);
            }
            _ => panic!("expected solve command"),
        }
    }

    #[test]
    fn test_cli_rejects_negative_k() {
        assert!(Cli::try_parse_from(["square_tiling_sat", "solve", "-1", "tiles.txt"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/examples/cadical.yaml").exists());
        assert!(temp_dir.path().join("input/checkerboard.txt").exists());

        let loaded = Settings::from_file(temp_dir.path().join("config/default.yaml")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_encode_command_writes_dimacs() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("one.txt");
        let output = temp_dir.path().join("one.cnf");
        std::fs::write(&input, "R G\n<R,G,R,G>\n").unwrap();

        encode_command(1, input, Some(output.clone()), false).unwrap();
        assert_eq!(std::fs::read_to_string(output).unwrap(), "p cnf 1 1\n1 0\n");
    }

    #[test]
    fn test_encode_command_rejects_zero_k() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("one.txt");
        std::fs::write(&input, "R G\n<R,G,R,G>\n").unwrap();

        assert!(encode_command(0, input, None, false).is_err());
    }

    #[test]
    fn test_solved_tiling_renders_colour_names() {
        let instance = parse_instance("red,green\n<red,green,red,green>\n<green,red,green,red>\n");
        let problem = TilingProblem::new(Settings::default(), instance, 2).unwrap();
        let outcome = problem.solve(&mut CadicalSolver::new(Duration::from_secs(30))).unwrap();
        let solution = outcome.solution().unwrap();

        let rendered = render_solution(solution, problem.instance(), ".");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "s SATISFIABLE");
        assert_eq!(lines[1], "Model:");
        assert_eq!(lines[4], "Tiling:");
        assert_eq!(lines.len(), 7);
        for row in &lines[5..] {
            let cells: Vec<&str> = row.split(' ').collect();
            assert_eq!(cells.len(), 2);
            for cell in cells {
                assert!(cell == "<red,green,red,green>" || cell == "<green,red,green,red>");
            }
        }
    }

    #[test]
    fn test_partial_tiling_renders_placeholder() {
        let instance = parse_instance("a\n<a,a,a,a>\n");
        let mut grid = TilingGrid::new(2);
        grid.set(0, 0, 0).unwrap();
        let solution = TilingSolution {
            validation: TilingValidator::new(&instance).validate(&grid),
            grid,
            backend: "test".to_string(),
            solve_time: Duration::ZERO,
            statistics: SolverStatistics::default(),
        };

        assert_eq!(
            render_solution(&solution, &instance, "_"),
            "s SATISFIABLE\nModel:\n0 _\n_ _\nTiling:\n<a,a,a,a> _\n_ _\n"
        );
    }

    #[test]
    fn test_diagnostics_leave_json_stdout_clean() {
        let dimacs = "p cnf 1 1\n1 0\n";

        let (mut out, mut err) = (Vec::new(), Vec::new());
        emit_into(OutputFormat::Json, dimacs, &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), dimacs);

        let (mut out, mut err) = (Vec::new(), Vec::new());
        emit_into(OutputFormat::Text, dimacs, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), dimacs);
        assert!(err.is_empty());
    }

    #[test]
    fn test_solve_command_exit_codes() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("pair.txt");
        std::fs::write(&input, "a b c d\n<a,b,c,d>\n<b,c,d,a>\n").unwrap();

        let args = |k| SolveArgs {
            k,
            input: input.clone(),
            config: temp_dir.path().join("missing.yaml"),
            overrides: CliOverrides {
                backend: Some(SolverBackend::Cadical),
                ..Default::default()
            },
            print_dimacs: false,
            verbose: false,
        };

        assert_eq!(solve_command(args(1)).unwrap(), EXIT_SATISFIABLE);
        assert_eq!(solve_command(args(2)).unwrap(), EXIT_UNSATISFIABLE);
    }
}
