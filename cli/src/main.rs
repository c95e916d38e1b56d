use clap::Parser;
use miette::{Diagnostic, Result};
use thiserror::Error;
use tracing::debug;
use tsrpn::{
    Bindings, DEFAULT_DELIMITER, DEFAULT_SECONDS_PER_INTERVAL, ErrorReport, Program,
    ProgramOptions, Value,
};

/// tsrpn - Evaluate RRDtool-style RPN expressions
#[derive(Parser, Debug)]
#[command(name = "tsrpn")]
#[command(about = "Simplify and evaluate RPN expressions", long_about = None)]
struct Args {
    /// Token delimiter
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Seconds between successive samples of a series
    #[arg(long, default_value_t = DEFAULT_SECONDS_PER_INTERVAL)]
    interval: f64,

    /// Bind NAME to a number, or to a comma-separated series of numbers
    #[arg(long = "bind", value_name = "NAME=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, Value)>,

    /// Print the residual program instead of evaluating it
    #[arg(long)]
    partial: bool,

    /// Expression to evaluate
    expression: String,
}

#[derive(Error, Diagnostic, Debug)]
enum BindError {
    #[error("expected NAME=VALUE, found {0:?}")]
    #[diagnostic(code(tsrpn::cli::bind))]
    MissingEquals(String),

    #[error("binding name is empty")]
    #[diagnostic(code(tsrpn::cli::bind))]
    EmptyName,

    #[error("cannot parse {0:?} as a number")]
    #[diagnostic(code(tsrpn::cli::bind), help("use a decimal number, NaN or UNKN"))]
    NotANumber(String),
}

fn parse_number(text: &str) -> Result<f64, BindError> {
    let text = text.trim();
    if text == "UNKN" {
        return Ok(f64::NAN);
    }
    text.parse()
        .map_err(|_| BindError::NotANumber(text.to_string()))
}

fn parse_binding(arg: &str) -> Result<(String, Value), BindError> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| BindError::MissingEquals(arg.to_string()))?;
    if name.is_empty() {
        return Err(BindError::EmptyName);
    }
    let value = if value.contains(',') {
        let series = value
            .split(',')
            .map(parse_number)
            .collect::<Result<Vec<_>, _>>()?;
        Value::F64s(series)
    } else {
        Value::F64(parse_number(value)?)
    };
    Ok((name.to_string(), value))
}

fn run(args: Args) -> Result<()> {
    let options = ProgramOptions::default()
        .with_delimiter(args.delimiter)
        .with_seconds_per_interval(args.interval);
    let report = |e: tsrpn::Error| ErrorReport::new(e, args.expression.clone(), args.delimiter);

    let program = Program::with_options(&args.expression, options).map_err(report)?;
    let bindings: Bindings = args.bindings.into_iter().collect();
    debug!(bindings = bindings.len(), partial = args.partial, "Running program");

    if args.partial {
        let residual = program.partial(&bindings).map_err(report)?;
        println!("{}", residual);
        let open = residual.open_bindings();
        if !open.is_empty() {
            eprintln!("open bindings: {}", open.join(","));
        }
    } else {
        let value = program.evaluate(&bindings).map_err(report)?;
        println!("{}", value);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control log level, default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run(args)
}
