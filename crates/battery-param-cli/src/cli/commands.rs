use super::CliError;
use super::helpers::*;
use anyhow::Context;
use battery_param_core::DirectEntry;
use battery_param_core::pipeline::{cache_path, read_cache};
use battery_param_core::report::{LatexReport, open_circuit_curve, render_open_circuit_csv};
use battery_param_core::presets::{DEFAULT_SEI_GROWTH_PERCENT_PER_MONTH, DEFAULT_TEMPERATURE};
use battery_param_core::{Preset, PresetOptions};
use std::fs;
use std::path::PathBuf;
use tracing::info;

const DEFAULT_OCV_POINTS: usize = 101;

#[derive(clap::Args)]
pub(super) struct RunArgs {
    /// Preset pipeline to run
    #[arg(long)]
    preset: String,

    /// Directory that receives parameters.json
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory that receives latex/generated/*.tex
    #[arg(long)]
    latex_dir: Option<PathBuf>,

    /// JSON object of extra numeric parameters appended as a final stage
    #[arg(long)]
    extra_parameters: Option<PathBuf>,

    /// Reference, ambient and initial temperature [K]
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// Target SEI growth [% of initial thickness per month]
    #[arg(long, default_value_t = DEFAULT_SEI_GROWTH_PERCENT_PER_MONTH)]
    sei_growth: f64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct ReportArgs {
    /// Cached parameters.json to summarise
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct OcvArgs {
    /// Preset pipeline to tabulate
    #[arg(long)]
    preset: String,

    /// Number of evenly spaced states of charge
    #[arg(long, default_value_t = DEFAULT_OCV_POINTS)]
    points: usize,

    /// Reference, ambient and initial temperature [K]
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// CSV output path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RunArgs {
    fn preset_options(&self) -> PresetOptions {
        PresetOptions {
            temperature: self.temperature,
            target_sei_growth_percent_per_month: self.sei_growth,
            cache_dir: self.cache_dir.clone(),
        }
    }
}

pub(super) fn run_list_command() -> Result<i32, CliError> {
    for preset in Preset::all() {
        let pipeline = preset
            .pipeline(&PresetOptions::default())
            .map_err(CliError::Compute)?;
        println!("{}: {}", preset, preset.description());
        for name in pipeline.stage_names() {
            println!("  - {}", name);
        }
    }
    Ok(0)
}

pub(super) fn run_pipeline_command(args: RunArgs) -> Result<i32, CliError> {
    let preset = Preset::from_name(&args.preset).map_err(CliError::Compute)?;
    let mut pipeline = preset
        .pipeline(&args.preset_options())
        .map_err(CliError::Compute)?;

    if let Some(path) = &args.extra_parameters {
        let source = format!("Parameters from {}", path.display());
        let entry = DirectEntry::from_json_file(path, source).map_err(CliError::Compute)?;
        pipeline
            .push_stage(EXTRA_PARAMETERS_STAGE, Box::new(entry))
            .map_err(CliError::Compute)?;
    }

    pipeline.run().map_err(CliError::Compute)?;
    info!(preset = %preset, stages = pipeline.len(), "pipeline complete");

    let latex_files = match &args.latex_dir {
        Some(directory) => LatexReport::new(directory)
            .write_parameters(&pipeline)
            .map_err(CliError::Compute)?,
        None => Vec::new(),
    };

    let summary = RunSummary::from_pipeline(
        preset.as_str(),
        &pipeline,
        args.cache_dir.as_deref().map(cache_path),
        latex_files,
    )
    .map_err(CliError::Compute)?;
    print_summary(&summary, args.json)?;
    Ok(0)
}

pub(super) fn run_report_command(args: ReportArgs) -> Result<i32, CliError> {
    let report = read_cache(&args.file).map_err(CliError::Compute)?;
    let summary = RunSummary::from_report(&args.file.display().to_string(), &report);
    print_summary(&summary, args.json)?;
    Ok(0)
}

pub(super) fn run_ocv_command(args: OcvArgs) -> Result<i32, CliError> {
    let preset = Preset::from_name(&args.preset).map_err(CliError::Compute)?;
    let options = PresetOptions {
        temperature: args.temperature,
        ..PresetOptions::default()
    };
    let parameters = preset
        .pipeline(&options)
        .and_then(|mut pipeline| pipeline.run())
        .map_err(CliError::Compute)?;

    let curve = open_circuit_curve(parameters.view(), args.points).map_err(CliError::Compute)?;
    let csv = render_open_circuit_csv(&curve);

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory '{}'", parent.display())
                })?;
            }
            fs::write(path, csv)
                .with_context(|| format!("failed to write OCV table '{}'", path.display()))?;
            println!("OCV table: {} ({} points)", path.display(), curve.len());
        }
        None => print!("{}", csv),
    }
    Ok(0)
}
