use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use declass::{convert_file, ConvertError, MixinMode, TransformOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "declass", version, about = "Converts Vue Class Components to <script setup>")]
struct Cli {
    /// Component to convert (.vue, .ts or .js)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Same as the positional input
    #[arg(long = "input", value_name = "INPUT", conflicts_with = "input")]
    input_flag: Option<PathBuf>,

    /// Where to write the result, defaults to the input file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite the input without asking
    #[arg(short, long)]
    yes: bool,

    /// Fail instead of reporting naming collisions in a comment
    #[arg(long)]
    stop_on_collisions: bool,

    /// Print the result instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// How exported or `*Mixin` classes are converted
    #[arg(long, value_enum, default_value_t = MixinArg::Auto)]
    mixin: MixinArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum MixinArg {
    Auto,
    Component,
    Composable,
}

impl From<MixinArg> for MixinMode {
    fn from(value: MixinArg) -> Self {
        match value {
            MixinArg::Auto => MixinMode::Auto,
            MixinArg::Component => MixinMode::Component,
            MixinArg::Composable => MixinMode::Composable,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ConvertError> {
    let Some(input) = cli.input.or(cli.input_flag) else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "an input file is required")
            .exit()
    };

    let options = TransformOptions {
        stop_on_collisions: cli.stop_on_collisions,
        mixin_mode: cli.mixin.into(),
    };

    let output = convert_file(&input, &options)?;
    for warning in output.warnings.iter() {
        tracing::warn!("{}: {warning}", input.display());
    }

    if cli.dry_run {
        print!("{}", output.code);
        return Ok(());
    }

    let target = match cli.output {
        Some(path) => path,
        None if cli.yes => input,
        None => {
            if !confirm_overwrite(&input)? {
                eprintln!("Nothing was written");
                return Ok(());
            }
            input
        }
    };

    std::fs::write(&target, output.code).map_err(|source| ConvertError::Io {
        path: target.to_owned(),
        source,
    })?;

    tracing::info!(path = %target.display(), "converted");

    Ok(())
}

/// Asks on stdin, anything but `y`/`yes` is a no
fn confirm_overwrite(path: &Path) -> Result<bool, ConvertError> {
    let stdin_error = |source| ConvertError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    };

    print!("Overwrite {}? [y/N] ", path.display());
    io::stdout().flush().map_err(stdin_error)?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).map_err(stdin_error)?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Logs go to stderr. `DECLASS_LOG` takes precedence over `RUST_LOG`,
/// without either only the conversion warnings are shown.
fn init_tracing() {
    let filter = match std::env::var("DECLASS_LOG") {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) if std::env::var_os("RUST_LOG").is_some() => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new("warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
