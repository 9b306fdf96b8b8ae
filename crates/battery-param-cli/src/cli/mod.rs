mod commands;
mod helpers;

use battery_param_core::domain::ParamError;
use clap::Parser;

pub fn run_from_env() -> i32 {
    helpers::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let param_error = error.as_param_error();
            eprintln!("{}", param_error.diagnostic_line());
            param_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("battery-param".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "battery-param",
    version,
    about = "Battery model parameterisation pipelines"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// List the preset pipelines and their stages
    List,
    /// Run a preset pipeline and write the requested artifacts
    Run(commands::RunArgs),
    /// Summarise a cached parameters.json
    Report(commands::ReportArgs),
    /// Tabulate the open-circuit balance of a preset as CSV
    Ocv(commands::OcvArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::List => commands::run_list_command(),
        CliCommand::Run(args) => commands::run_pipeline_command(args),
        CliCommand::Report(args) => commands::run_report_command(args),
        CliCommand::Ocv(args) => commands::run_ocv_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ParamError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_param_error(&self) -> ParamError {
        match self {
            Self::Usage(message) => {
                ParamError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => ParamError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
