// calcflow: concurrent calculator program runner with execution replay

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use calcflow::engine::pool::default_workers;
use calcflow::engine::{
    ExecError, ExecutorConfig, Instruction, InstructionExecutor, PrintResult, ShortCircuitPolicy,
    WorkerPool,
};
use calcflow::parser::json::{render_error, render_results, ErrorResponse};
use calcflow::parser::{parse_program, Format, ParseError};
use calcflow::trace::{ExecutionTrace, TraceRecorder};
use calcflow::ui::App;

/// Exit code for a rejected program (bad syntax, undefined names, cycles).
const EXIT_PROGRAM_ERROR: u8 = 2;
/// Exit code for internal faults and I/O failures.
const EXIT_FAILURE: u8 = 1;

#[derive(ClapParser)]
#[command(name = "calcflow")]
#[command(about = "Run a calculator program and print the requested values")]
struct Cli {
    /// Program file (.json for the JSON format, anything else is text)
    file: PathBuf,

    /// Override the format inferred from the file extension
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Worker threads (at least 2; defaults to the available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Simulated cost of each arithmetic operation, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// How arithmetic identities interact with the operation delay
    #[arg(long, value_enum, default_value_t = ShortCircuit::SkipDelay)]
    short_circuit: ShortCircuit,

    /// Result rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    output: OutputFormat,

    /// Replay the execution in the terminal viewer
    #[arg(long)]
    tui: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShortCircuit {
    SkipDelay,
    Disabled,
}

impl From<InputFormat> for Format {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Text => Format::Text,
            InputFormat::Json => Format::Json,
        }
    }
}

impl From<ShortCircuit> for ShortCircuitPolicy {
    fn from(policy: ShortCircuit) -> Self {
        match policy {
            ShortCircuit::SkipDelay => ShortCircuitPolicy::SkipDelay,
            ShortCircuit::Disabled => ShortCircuitPolicy::Disabled,
        }
    }
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let format = cli
        .format
        .map(Format::from)
        .unwrap_or_else(|| Format::from_path(&cli.file));

    let instructions = match parse_program(&source, format) {
        Ok(instructions) => instructions,
        Err(err) => {
            report_parse_error(cli.output, &err);
            return Ok(ExitCode::from(EXIT_PROGRAM_ERROR));
        }
    };
    debug!(
        "loaded {} instruction(s) from {}",
        instructions.len(),
        cli.file.display()
    );

    let pool = WorkerPool::new(cli.workers.unwrap_or_else(default_workers))
        .context("failed to start worker pool")?;
    info!("worker pool started with {} threads", pool.workers());

    let recorder = Arc::new(TraceRecorder::new());
    let config = ExecutorConfig::new()
        .with_operation_delay(Duration::from_millis(cli.delay_ms))
        .with_short_circuit(cli.short_circuit.into())
        .with_observer(recorder.clone());
    let executor = InstructionExecutor::new(&pool, config);

    let outcome = executor.execute(&instructions);
    let trace = recorder.finish();

    let code = match &outcome {
        Ok(results) => {
            report_results(cli.output, results);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_exec_error(cli.output, err);
            if err.is_client_error() {
                ExitCode::from(EXIT_PROGRAM_ERROR)
            } else {
                ExitCode::from(EXIT_FAILURE)
            }
        }
    };

    if cli.tui {
        run_viewer(instructions, outcome, trace).context("terminal viewer failed")?;
    }

    Ok(code)
}

fn report_results(output: OutputFormat, results: &[PrintResult]) {
    match output {
        OutputFormat::Plain => {
            for result in results {
                println!("{} = {}", result.var, result.value);
            }
        }
        OutputFormat::Json => println!("{}", render_results(results)),
    }
}

fn report_exec_error(output: OutputFormat, err: &ExecError) {
    match output {
        OutputFormat::Plain => eprintln!("Execution error: {}", err),
        OutputFormat::Json => println!("{}", render_error(err)),
    }
}

fn report_parse_error(output: OutputFormat, err: &ParseError) {
    match output {
        OutputFormat::Plain => eprintln!("Parse error: {}", err),
        OutputFormat::Json => {
            let body = ErrorResponse {
                message: err.to_string(),
            };
            println!("{}", serde_json::to_string(&body).unwrap_or_default());
        }
    }
}

fn run_viewer(
    instructions: Vec<Instruction>,
    outcome: Result<Vec<PrintResult>, ExecError>,
    trace: ExecutionTrace,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(instructions, outcome, trace);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
