use super::CliError;
use anyhow::Context;
use battery_param_core::domain::{ParamError, ParamResult};
use battery_param_core::pipeline::{Pipeline, RunReport, StageReport};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub(super) const EXTRA_PARAMETERS_STAGE: &str = "extra parameters";
const DEFAULT_LOG_FILTER: &str = "warn";

pub(super) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct StageSummary {
    pub(super) name: String,
    #[serde(rename = "type")]
    pub(super) kind: String,
    pub(super) source: String,
    pub(super) parameters: usize,
}

impl StageSummary {
    fn new(name: &str, report: &StageReport) -> Self {
        Self {
            name: name.to_string(),
            kind: report.kind.clone(),
            source: report.source.clone(),
            parameters: report.parameters.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(super) struct RunSummary {
    pub(super) origin: String,
    pub(super) stages: Vec<StageSummary>,
    pub(super) parameter_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) cache: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) latex: Vec<PathBuf>,
}

impl RunSummary {
    pub(super) fn from_report(origin: &str, report: &RunReport) -> Self {
        Self {
            origin: origin.to_string(),
            stages: report
                .iter()
                .map(|(name, stage)| StageSummary::new(name, stage))
                .collect(),
            parameter_count: report.parameter_count(),
            cache: None,
            latex: Vec::new(),
        }
    }

    pub(super) fn from_pipeline(
        origin: &str,
        pipeline: &Pipeline,
        cache: Option<PathBuf>,
        latex: Vec<PathBuf>,
    ) -> ParamResult<Self> {
        let report = pipeline.report().ok_or_else(|| {
            ParamError::input_validation(
                "INPUT.CLI_SUMMARY",
                "pipeline has no run report; run it before summarising",
            )
        })?;
        let mut summary = Self::from_report(origin, report);
        summary.cache = cache.filter(|path| path.is_file());
        summary.latex = latex;
        Ok(summary)
    }
}

pub(super) fn render_human_summary(summary: &RunSummary) -> String {
    let mut lines = vec![format!(
        "{}: {} stages, {} parameters",
        summary.origin,
        summary.stages.len(),
        summary.parameter_count
    )];
    let name_width = summary
        .stages
        .iter()
        .map(|stage| stage.name.len())
        .max()
        .unwrap_or(0);
    for stage in &summary.stages {
        lines.push(format!(
            "  {:<width$}  {:<12} {:>3}  {}",
            stage.name,
            stage.kind,
            stage.parameters,
            stage.source,
            width = name_width
        ));
    }
    if let Some(cache) = &summary.cache {
        lines.push(format!("Cache: {}", cache.display()));
    }
    if !summary.latex.is_empty() {
        lines.push(format!("LaTeX fragments: {}", summary.latex.len()));
    }
    lines.join("\n")
}

pub(super) fn print_summary(summary: &RunSummary, json: bool) -> Result<(), CliError> {
    if json {
        let rendered = serde_json::to_string_pretty(summary)
            .context("failed to serialize run summary")?;
        println!("{}", rendered);
    } else {
        println!("{}", render_human_summary(summary));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RunSummary, StageSummary, render_human_summary};
    use battery_param_core::domain::StageKind;
    use battery_param_core::parameters::ParameterSet;
    use battery_param_core::pipeline::{RunReport, StageReport};

    fn sample_report() -> RunReport {
        let mut report = RunReport::new();
        report.insert(
            "temperatures",
            StageReport::new(
                "All 'temperature' parameters set to 298.15 [K]",
                StageKind::DirectEntry,
                &ParameterSet::new()
                    .with("Reference temperature [K]", 298.15)
                    .with("Ambient temperature [K]", 298.15),
            ),
        );
        report.insert(
            "capacity",
            StageReport::new(
                "Calculation of electrode capacity from loading",
                StageKind::Calculation,
                &ParameterSet::new().with("Cyclable lithium capacity [A.h]", 3.2),
            ),
        );
        report
    }

    #[test]
    fn summary_counts_stage_contributions() {
        let summary = RunSummary::from_report("parameters.json", &sample_report());
        assert_eq!(summary.parameter_count, 3);
        assert_eq!(
            summary.stages[1],
            StageSummary {
                name: "capacity".to_string(),
                kind: "calculation".to_string(),
                source: "Calculation of electrode capacity from loading".to_string(),
                parameters: 1,
            }
        );

        let json = serde_json::to_value(&summary).expect("summary serializes");
        assert_eq!(json["stages"][0]["type"], "direct entry");
        assert!(json.get("cache").is_none());
    }

    #[test]
    fn human_summary_lists_stages_in_order() {
        let summary = RunSummary::from_report("parameters.json", &sample_report());
        let rendered = render_human_summary(&summary);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "parameters.json: 2 stages, 3 parameters");
        assert!(lines[1].trim_start().starts_with("temperatures"));
        assert!(lines[2].trim_start().starts_with("capacity"));
        assert!(lines[2].ends_with("Calculation of electrode capacity from loading"));
    }
}
