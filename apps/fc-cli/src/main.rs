use clap::{Parser, Subcommand, ValueEnum};
use fc_engine::{DEFAULT_SAMPLES, RuleMatrix, sweep};
use fc_project::{Project, ProjectResult, RULE_BLOCK_NAME, compile_engine, compile_simulation};
use fc_sim::{SimOptions, SimulationMode, run_sim};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(about = "FuzzyCar CLI - fuzzy lane-keeping controller and simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default 5x5 controller project
    Init {
        /// Path of the project file to create (.yaml or .json)
        project_path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Print the generated rule matrix and rule texts
    Rules {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Run a single inference
    Eval {
        /// Path to the project file
        project_path: PathBuf,
        /// Lateral displacement
        #[arg(long, allow_negative_numbers = true)]
        displacement: f64,
        /// Lateral velocity
        #[arg(long, allow_negative_numbers = true)]
        velocity: f64,
    },
    /// Sample one input across its range with the other inputs held
    Sweep {
        /// Path to the project file
        project_path: PathBuf,
        /// Input variable to sweep (defaults to the displacement binding)
        #[arg(long)]
        input: Option<String>,
        /// Value every other input is held at
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        hold: f64,
        /// Number of samples
        #[arg(long, default_value_t = DEFAULT_SAMPLES)]
        samples: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the lane-keeping simulation and print the trajectory as CSV
    Simulate {
        /// Path to the project file
        project_path: PathBuf,
        /// Number of steps
        #[arg(long, default_value_t = 100)]
        steps: usize,
        /// Frame time for continuous mode in seconds
        #[arg(long, default_value_t = 0.1)]
        dt: f64,
        /// Record every N-th step
        #[arg(long, default_value_t = 1)]
        record_every: usize,
        /// Override the project's time-advance mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Override the initial displacement
        #[arg(long, allow_negative_numbers = true)]
        displacement: Option<f64>,
        /// Override the initial velocity
        #[arg(long, allow_negative_numbers = true)]
        velocity: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Continuous,
    Discrete,
}

impl From<ModeArg> for SimulationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Continuous => SimulationMode::Continuous,
            ModeArg::Discrete => SimulationMode::Discrete,
        }
    }
}

fn main() -> ProjectResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            project_path,
            force,
        } => cmd_init(&project_path, force),
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Rules { project_path } => cmd_rules(&project_path),
        Commands::Eval {
            project_path,
            displacement,
            velocity,
        } => cmd_eval(&project_path, displacement, velocity),
        Commands::Sweep {
            project_path,
            input,
            hold,
            samples,
            output,
        } => cmd_sweep(
            &project_path,
            input.as_deref(),
            hold,
            samples,
            output.as_deref(),
        ),
        Commands::Simulate {
            project_path,
            steps,
            dt,
            record_every,
            mode,
            displacement,
            velocity,
            output,
        } => cmd_simulate(
            &project_path,
            SimOptions {
                steps,
                dt,
                record_every,
            },
            mode.map(SimulationMode::from),
            (displacement, velocity),
            output.as_deref(),
        ),
    }
}

fn cmd_init(project_path: &Path, force: bool) -> ProjectResult<()> {
    if project_path.exists() && !force {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists (use --force to overwrite)", project_path.display()),
        )
        .into());
    }
    fc_project::save(project_path, &Project::steering_default())?;
    println!("✓ Wrote default project to {}", project_path.display());
    Ok(())
}

fn cmd_validate(project_path: &Path) -> ProjectResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = fc_project::load(project_path)?;
    let engine = compile_engine(&project)?;
    println!("✓ Project is valid");
    for input in engine.inputs() {
        println!(
            "  input  {} [{}, {}] with {} terms",
            input.name(),
            input.variable().min(),
            input.variable().max(),
            input.variable().terms().len()
        );
    }
    for output in engine.outputs() {
        println!(
            "  output {} [{}, {}] with {} terms",
            output.name(),
            output.variable().min(),
            output.variable().max(),
            output.variable().terms().len()
        );
    }
    Ok(())
}

fn cmd_rules(project_path: &Path) -> ProjectResult<()> {
    let project = fc_project::load(project_path)?;
    let engine = compile_engine(&project)?;
    let rules = &project.rules;

    let count = |name: &str| {
        project
            .variable(name)
            .map_or(0, |v| v.terms.term_count())
    };
    let matrix = RuleMatrix::generate(
        count(&rules.displacement),
        count(&rules.velocity),
        count(&rules.steering),
    )?;

    println!(
        "Rule matrix (rows: {}, columns: {}, cells: {} term index):",
        rules.displacement, rules.velocity, rules.steering
    );
    print!("{matrix}");

    if let Some(block) = engine
        .rule_block_id(RULE_BLOCK_NAME)
        .and_then(|id| engine.rule_block(id))
    {
        println!("\nRules ({}):", block.rules().len());
        for rule in block.rules() {
            println!("  {rule}");
        }
    }
    Ok(())
}

fn cmd_eval(project_path: &Path, displacement: f64, velocity: f64) -> ProjectResult<()> {
    let project = fc_project::load(project_path)?;
    let mut engine = compile_engine(&project)?;
    let rules = &project.rules;

    engine.set_input(&rules.displacement, displacement)?;
    engine.set_input(&rules.velocity, velocity)?;
    let report = engine.process()?;

    for input in engine.inputs() {
        println!("{} = {:.3}: {}", input.name(), input.value(), input.fuzzify());
    }
    println!(
        "{} = {:.6}",
        rules.steering,
        engine.get_output(&rules.steering)?
    );
    println!("  rules fired: {}", report.fired);
    if !report.is_complete() {
        println!("  no rule fired for: {}", report.held.join(", "));
    }
    Ok(())
}

fn cmd_sweep(
    project_path: &Path,
    input: Option<&str>,
    hold: f64,
    samples: usize,
    output: Option<&Path>,
) -> ProjectResult<()> {
    let project = fc_project::load(project_path)?;
    let mut engine = compile_engine(&project)?;
    let input = input.unwrap_or(&project.rules.displacement);

    let held: Vec<String> = engine
        .inputs()
        .iter()
        .map(|i| i.name().to_string())
        .filter(|name| name != input)
        .collect();
    for name in &held {
        engine.set_input(name, hold)?;
    }
    info!(input, hold, samples, "sweeping");
    let points = sweep(&mut engine, input, &project.rules.steering, samples)?;

    // Build CSV
    let mut csv = format!("{input},{},held\n", project.rules.steering);
    for p in &points {
        csv.push_str(&format!("{},{},{}\n", p.input, p.output, p.held));
    }

    write_csv(output, &csv, points.len())
}

fn cmd_simulate(
    project_path: &Path,
    opts: SimOptions,
    mode: Option<SimulationMode>,
    initial: (Option<f64>, Option<f64>),
    output: Option<&Path>,
) -> ProjectResult<()> {
    let project = fc_project::load(project_path)?;
    let mut sim = compile_simulation(&project)?;

    let (displacement, velocity) = initial;
    if displacement.is_some() || velocity.is_some() {
        sim.restart(
            displacement.unwrap_or(sim.initial().displacement),
            velocity.unwrap_or(sim.initial().velocity),
        )?;
    }
    if let Some(mode) = mode {
        sim.set_mode(mode);
    }

    let record = run_sim(&mut sim, &opts)?;

    // Build CSV
    let mut csv = String::from("time_s,displacement,velocity,steering\n");
    for (t, x) in record.t.iter().zip(&record.x) {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            t, x.displacement, x.velocity, x.steering
        ));
    }

    write_csv(output, &csv, record.len())
}

fn write_csv(output: Option<&Path>, csv: &str, rows: usize) -> ProjectResult<()> {
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} data points to {}", rows, path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}
