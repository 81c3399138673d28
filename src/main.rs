use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::{Parser, Subcommand};
use supervisor_allocation::driver::{self, RunOutput};
use supervisor_allocation::parameters::MatchParameters;
use supervisor_allocation::setup::setup_logging;
use supervisor_allocation::{AllocError, Result, Scope, ScopeLocks};

#[derive(Parser)]
#[command(about = "Allocate students to project supervisors by research interest")]
struct Opts {
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a snapshot of randomly generated students and supervisors
    Generate {
        #[arg(long, default_value_t = 500)]
        students: usize,
        #[arg(long, default_value_t = 60)]
        supervisors: usize,
        #[arg(long, short)]
        output: PathBuf,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Run an allocation over a saved snapshot
    Run {
        /// bincode snapshot written by `generate`
        #[arg(long, short, conflicts_with = "json", required_unless_present = "json")]
        input: Option<PathBuf>,
        /// JSON snapshot exported from the database
        #[arg(long)]
        json: Option<PathBuf>,
        #[command(flatten)]
        tuning: TuningArgs,
        /// Write the resulting allocations here as JSON
        #[arg(long)]
        output_json: Option<PathBuf>,
    },
    /// Generate sample data and allocate it in one go
    Simulate {
        #[arg(long, default_value_t = 500)]
        students: usize,
        #[arg(long, default_value_t = 60)]
        supervisors: usize,
        #[command(flatten)]
        tuning: TuningArgs,
    },
}

#[derive(clap::Args)]
struct ScopeArgs {
    #[arg(long, default_value = "default")]
    department: String,
    #[arg(long, default_value = "current")]
    session: String,
}

#[derive(clap::Args)]
struct TuningArgs {
    /// Score window inside which less loaded supervisors are preferred
    #[arg(long)]
    tie_threshold: Option<f64>,
    /// Allow pairings with no word overlap at all
    #[arg(long)]
    allow_zero_score: bool,
}

impl TuningArgs {
    fn apply(&self, parameters: &mut MatchParameters) {
        if let Some(threshold) = self.tie_threshold {
            parameters.config.tie_threshold = threshold;
        }
        if self.allow_zero_score {
            parameters.config.require_overlap = false;
        }
    }
}

fn main() {
    let opts = Opts::parse();
    setup_logging(opts.verbose);

    if let Err(e) = run(opts.command) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate { students, supervisors, output, scope } => {
            let scope = Scope::new(scope.department, scope.session);
            let parameters = driver::generate_match_parameters(students, supervisors, scope);
            save_params(&parameters, &output)
        }
        Command::Run { input, json, tuning, output_json } => {
            let mut parameters = load_params(input, json)?;
            tuning.apply(&mut parameters);
            let output = driver::run_allocation(&parameters, &ScopeLocks::new())?;
            report(&output);
            if let Some(path) = output_json {
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(std::io::BufWriter::new(file), &output.allocations)
                    .map_err(|e| AllocError::SerializationError(e.to_string()))?;
                log::info!("Wrote {} allocations to {}", output.allocations.len(), path.display());
            }
            Ok(())
        }
        Command::Simulate { students, supervisors, tuning } => {
            let mut parameters = driver::generate_match_parameters(students, supervisors, Scope::default());
            tuning.apply(&mut parameters);
            let output = driver::run_allocation(&parameters, &ScopeLocks::new())?;
            report(&output);
            Ok(())
        }
    }
}

fn load_params(input: Option<PathBuf>, json: Option<PathBuf>) -> Result<MatchParameters> {
    let start = Instant::now();
    let (parameters, path) = match (input, json) {
        (_, Some(path)) => (MatchParameters::from_json_file(&path)?, path),
        (Some(path), None) => (MatchParameters::open(&path)?, path),
        (None, None) => return Err("no snapshot given".to_string().into()),
    };
    log::info!("Loaded data from {} in {:.2?}.", path.display(), start.elapsed());
    Ok(parameters)
}

fn save_params(parameters: &MatchParameters, datafile: &Path) -> Result<()> {
    let start = Instant::now();
    parameters.save(datafile)?;
    log::info!("Saved data to {} in {:.2?}.", datafile.display(), start.elapsed());
    Ok(())
}

fn report(output: &RunOutput) {
    println!("{}", output.report.summary());
    for failure in output.report.failures() {
        if let Err(ref e) = failure.result {
            println!("Not saved: {} -> {}: {}",
                     failure.allocation.student_id, failure.allocation.supervisor_id, e);
        }
    }
}
