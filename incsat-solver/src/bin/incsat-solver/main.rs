mod os_signal;
mod parsers;
mod resource_limits;
mod result;

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use flate2::read::GzDecoder;
use incsat_core::analysis::flush_run_log;
use incsat_core::analysis::AnalysisSink;
use incsat_core::analysis::JsonLinesSink;
use incsat_core::convert_case::Case;
use incsat_core::engine::EngineOptions;
use incsat_core::engine::LearningOptions;
use incsat_core::engine::RestartOptions;
use incsat_core::engine::SatEngine;
use incsat_core::instrumentation::InstrumentationRecorder;
use incsat_core::ordering::OrderingRegistry;
use incsat_core::ordering::VariableOrdering;
use incsat_core::proof::ProofLog;
use incsat_core::statistics::configure_statistic_logging;
use incsat_core::termination::CancellationController;
use incsat_core::EmptyClausePolicy;
use incsat_core::Session;
use incsat_core::SessionOptions;
use incsat_core::SolveResult;
use itertools::Itertools;
use log::debug;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use parsers::dimacs::read_session;
use result::IncsatError;
use result::IncsatResult;

/// The exit code when the last instance was proven unsatisfiable.
const EXIT_UNSATISFIABLE: u8 = 20;
/// The exit code when the batch was interrupted.
const EXIT_INTERRUPTED: u8 = 1;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The instances to solve, in the DIMACS CNF format. Files ending in '.gz' are decompressed
    /// while they are read.
    ///
    /// Every instance is solved by a fresh session, in the given order.
    #[arg(required = true, verbatim_doc_comment)]
    instances: Vec<PathBuf>,

    /// The verbosity of the log messages.
    ///
    /// - 0 only prints warnings and errors
    /// - 1 additionally prints progress and statistics
    /// - 2 additionally prints debug messages
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2), verbatim_doc_comment)]
    verb: u8,

    /// Print the satisfying assignment as a 'v' line.
    #[arg(long)]
    model: bool,

    /// Print a progress line every this many conflicts.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long, verbatim_doc_comment)]
    vv: Option<u64>,

    /// Simplify the clauses at the root before solving.
    ///
    /// Possible values: bool
    #[arg(long, default_value_t = true, action = ArgAction::Set, verbatim_doc_comment)]
    pre: bool,

    /// Write the simplified problem of the first instance to this file in DIMACS CNF, and exit
    /// without solving.
    #[arg(long, verbatim_doc_comment)]
    dimacs: Option<PathBuf>,

    /// The CPU time the whole batch may use, given in seconds. When it is used up, the running
    /// solve is interrupted.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "cpu-lim", verbatim_doc_comment)]
    cpu_lim: Option<u64>,

    /// The virtual memory ceiling in megabytes. Running out of memory stops the batch with an
    /// INDETERMINATE verdict.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "mem-lim", verbatim_doc_comment)]
    mem_lim: Option<u64>,

    /// Emit a DRUP certificate of unsatisfiability. Only possible for a single instance.
    #[arg(long, verbatim_doc_comment)]
    certified: bool,

    /// The file to which the certificate is written. Without it, the certificate is written to
    /// stdout.
    #[arg(long = "certified-output", verbatim_doc_comment)]
    certified_output: Option<PathBuf>,

    /// The directory to which the run log of the batch is exported, as a JSON-lines record
    /// stream. Without it, the run log is not exported.
    #[arg(long = "analysis-output", verbatim_doc_comment)]
    analysis_output: Option<PathBuf>,

    /// The variable ordering used to seed the branching order. If it is unknown, the activity
    /// order of the engine is used.
    ///
    /// Possible values: occurrence (Optional)
    #[arg(long, verbatim_doc_comment)]
    ordering: Option<String>,

    /// The random seed of the engine.
    ///
    /// Possible values: f64 (Optional)
    #[arg(long = "random-seed", verbatim_doc_comment)]
    random_seed: Option<f64>,

    /// The probability with which a decision picks a random variable.
    ///
    /// Possible values: f64
    #[arg(long = "random-freq", default_value_t = 0.0, verbatim_doc_comment)]
    random_freq: f64,

    /// What an empty clause in an instance means.
    #[arg(long = "empty-clause", value_enum, default_value_t = EmptyClausePolicy::AssertFalse)]
    empty_clause: EmptyClausePolicy,

    /// Write the verdict of the last instance to this file: 'SAT' followed by the model, 'UNSAT'
    /// or 'INDET'.
    #[arg(long = "result-output", verbatim_doc_comment)]
    result_output: Option<PathBuf>,

    /// Record a metric sample every this many conflicts.
    ///
    /// Possible values: u64
    #[arg(long = "metric-interval", default_value_t = 1, verbatim_doc_comment)]
    metric_interval: u64,

    /// Determines that no restarts are allowed by the engine.
    ///
    /// Possible values: bool
    #[arg(long = "no-restarts", verbatim_doc_comment)]
    no_restarts: bool,

    /// Decides whether learnt clauses are minimised after computing the 1-UIP.
    ///
    /// If this flag is present then the minimisation is turned off.
    ///
    /// Possible values: bool
    #[arg(long = "no-learning-minimise", verbatim_doc_comment)]
    no_learning_clause_minimisation: bool,
}

impl Args {
    fn session_options(&self) -> SessionOptions {
        let engine_options = EngineOptions {
            restart_options: RestartOptions {
                no_restarts: self.no_restarts,
                ..RestartOptions::default()
            },
            learning_options: LearningOptions {
                minimise_learnt_clauses: !self.no_learning_clause_minimisation,
                ..LearningOptions::default()
            },
            random_decision_frequency: self.random_freq,
            progress_interval: self.vv,
            metric_interval: self.metric_interval.max(1),
            ..EngineOptions::default()
        };

        SessionOptions {
            empty_clause_policy: self.empty_clause,
            engine_options,
        }
    }
}

/// How the processing of one instance ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InstanceOutcome {
    Solved(SolveResult),
    /// The solve was stopped through the cancellation controller.
    Interrupted,
    /// The engine ran out of memory.
    OutOfMemory,
    /// The simplified problem was written; nothing was solved.
    DimacsWritten,
}

fn configure_logging(verbosity: u8) {
    let level_filter = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    let _ = configure_statistic_logging("c", Some(Case::Camel), None);
    debug!("Logging successfully configured");
}

fn main() -> ExitCode {
    match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("Execution failed, error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run() -> IncsatResult<ExitCode> {
    let args = Args::parse();
    configure_logging(args.verb);

    if args.certified && args.instances.len() > 1 {
        return Err(IncsatError::CertificateForBatch(args.instances.len()));
    }

    os_signal::install()?;

    if let Some(seconds) = args.cpu_lim {
        resource_limits::limit_cpu_time(seconds);
    }
    if let Some(megabytes) = args.mem_lim {
        resource_limits::limit_memory(megabytes);
    }

    let registry = OrderingRegistry::with_defaults();
    let ordering = args.ordering.as_deref().and_then(|name| registry.get(name));

    let mut sink = args
        .analysis_output
        .as_ref()
        .and_then(|directory| match JsonLinesSink::create(directory) {
            Ok(sink) => {
                info!("Exporting the run log to {}", sink.path().display());
                Some(sink)
            }
            Err(e) => {
                warn!("{e}; the run log is not exported");
                None
            }
        });

    let mut recorder = InstrumentationRecorder::default();
    let mut last_outcome = None;

    for instance_path in &args.instances {
        let outcome = solve_instance(&args, instance_path, ordering, &mut recorder)?;
        last_outcome = Some(outcome);

        if !matches!(outcome, InstanceOutcome::Solved(_)) {
            if args.instances.len() > 1 {
                warn!("Skipping the remaining instances of the batch");
            }
            break;
        }
    }

    let sink = match sink.as_mut() {
        Some(sink) => Some::<&mut dyn AnalysisSink>(sink),
        None => None,
    };
    let report = flush_run_log(recorder.run_log(), recorder.solved_instances(), sink);
    debug!(
        "Exported {} runs ({} failures)",
        report.exported_runs, report.failures
    );

    let exit_code = match last_outcome {
        Some(InstanceOutcome::Solved(SolveResult::Unsatisfiable)) => {
            ExitCode::from(EXIT_UNSATISFIABLE)
        }
        Some(InstanceOutcome::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        _ => ExitCode::SUCCESS,
    };
    Ok(exit_code)
}

fn solve_instance(
    args: &Args,
    instance_path: &Path,
    ordering: Option<&dyn VariableOrdering>,
    recorder: &mut InstrumentationRecorder,
) -> IncsatResult<InstanceOutcome> {
    let instance_name = instance_path.display().to_string();
    let mut session = read_instance(instance_path, args.session_options())?;
    info!(
        "Read {instance_name}: {} variables, {} clauses",
        session.num_variables(),
        session.engine().num_clauses(),
    );

    if let Some(seed) = args.random_seed {
        session.set_random_seed(seed)?;
    }

    if args.certified {
        let proof_log = match &args.certified_output {
            Some(path) => ProofLog::drup_file(path)?,
            None => ProofLog::drup(std::io::stdout())?,
        };
        session.attach_proof_log(proof_log);
    }

    let consistent = if args.pre {
        session.simplify()
    } else {
        session.is_consistent()
    };

    if !consistent {
        info!("Solved by simplification");
        let run = recorder.begin(&session, instance_name);
        let _ = recorder.finish(run, &session, SolveResult::Unsatisfiable);

        report_verdict(args, &session, SolveResult::Unsatisfiable)?;
        return Ok(InstanceOutcome::Solved(SolveResult::Unsatisfiable));
    }

    if let Some(dimacs_path) = &args.dimacs {
        session.write_dimacs(File::create(dimacs_path)?)?;
        info!("Wrote the simplified problem to {}", dimacs_path.display());
        return Ok(InstanceOutcome::DimacsWritten);
    }

    if let Some(ordering) = ordering {
        session.apply_ordering(ordering);
    }

    let mut run = recorder.begin(&session, instance_name);
    run.set_alternate_mode(ordering.is_some());
    let result = session.solve();
    let record = recorder.finish(run, &session, result);
    debug!(
        "Recorded {} in {:.3}s",
        record.instance_name, record.cpu_time_seconds
    );

    let outcome = if session.resource_exhausted() {
        InstanceOutcome::OutOfMemory
    } else if result == SolveResult::Indeterminate
        && CancellationController::process().is_requested()
    {
        InstanceOutcome::Interrupted
    } else {
        InstanceOutcome::Solved(result)
    };

    // An interrupted session already printed its statistics.
    if args.verb > 0 && outcome != InstanceOutcome::Interrupted {
        session.print_incremental_stats();
    }
    report_verdict(args, &session, result)?;

    Ok(outcome)
}

fn read_instance(instance_path: &Path, options: SessionOptions) -> IncsatResult<Session> {
    let file_name = instance_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| IncsatError::invalid_instance(instance_path.display()))?;

    let file = File::open(instance_path)?;
    let source: Box<dyn Read> = if file_name.ends_with(".cnf.gz") {
        Box::new(GzDecoder::new(file))
    } else if file_name.ends_with(".cnf") {
        Box::new(file)
    } else {
        return Err(IncsatError::invalid_instance(instance_path.display()));
    };

    Ok(read_session(source, options)?)
}

/// Prints the `s` line (and with `--model` the `v` line), and writes the result file.
fn report_verdict(args: &Args, session: &Session, result: SolveResult) -> IncsatResult<()> {
    println!("s {result}");

    let model = if result == SolveResult::Satisfiable {
        (1..=session.num_variables() as i32)
            .map(|code| match session.value_of(code) {
                Ok(true) => Ok(code),
                Ok(false) => Ok(-code),
                Err(e) => Err(e),
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![]
    };

    if args.model && result == SolveResult::Satisfiable {
        println!("v {}", model.iter().chain([&0]).join(" "));
    }

    if let Some(path) = &args.result_output {
        let mut file = File::create(path)?;
        match result {
            SolveResult::Satisfiable => {
                writeln!(file, "SAT")?;
                writeln!(file, "{}", model.iter().chain([&0]).join(" "))?;
            }
            SolveResult::Unsatisfiable => writeln!(file, "UNSAT")?,
            SolveResult::Indeterminate => writeln!(file, "INDET")?,
        }
    }

    Ok(())
}
