//! Sequential parameter accumulator.
//!
//! A [`Pipeline`] runs named [`Stage`]s in declaration order. Each stage sees a
//! read-only view of what earlier stages contributed and returns new entries;
//! contributing a key that already exists aborts the run. After a successful
//! run the stage reports can be persisted as `parameters.json` in a cache
//! directory.

pub mod report;
mod stage;

pub use report::{
    CACHE_FILE_NAME, RunReport, StageReport, cache_path, read_cache, serialize_parameters,
    write_cache,
};
pub use stage::Stage;

use crate::domain::{ParamError, ParamResult};
use crate::parameters::ParameterSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Created,
    Running,
    Completed,
    Failed,
}

/// What one stage contributed during a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub name: String,
    pub report: StageReport,
    pub contributed: ParameterSet,
}

pub struct Pipeline {
    named_stages: Vec<(String, Box<dyn Stage>)>,
    cache: Option<PathBuf>,
    state: PipelineState,
    parameters: ParameterSet,
    records: Vec<StageRecord>,
    report: Option<RunReport>,
}

impl Pipeline {
    pub fn new<S>(named_stages: Vec<(S, Box<dyn Stage>)>) -> Self
    where
        S: Into<String>,
    {
        Self {
            named_stages: named_stages
                .into_iter()
                .map(|(name, stage)| (name.into(), stage))
                .collect(),
            cache: None,
            state: PipelineState::Created,
            parameters: ParameterSet::new(),
            records: Vec::new(),
            report: None,
        }
    }

    pub fn with_cache(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache = Some(cache_dir.into());
        self
    }

    /// Appends a stage; only allowed before the pipeline has run.
    pub fn push_stage(
        &mut self,
        name: impl Into<String>,
        stage: Box<dyn Stage>,
    ) -> ParamResult<()> {
        self.ensure_created()?;
        self.named_stages.push((name.into(), stage));
        Ok(())
    }

    pub fn cache(&self) -> Option<&Path> {
        self.cache.as_deref()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.named_stages.iter().map(|(name, _)| name.as_str())
    }

    pub fn stages(&self) -> impl Iterator<Item = (&str, &dyn Stage)> {
        self.named_stages
            .iter()
            .map(|(name, stage)| (name.as_str(), stage.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.named_stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named_stages.is_empty()
    }

    /// Run report; `None` until a run has completed.
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    /// Accumulated parameters, including what a failed run left behind.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub fn run(&mut self) -> ParamResult<ParameterSet> {
        self.ensure_created()?;
        self.state = PipelineState::Running;

        match self.execute_stages() {
            Ok(report) => {
                if let Some(cache_dir) = self.cache.as_deref() {
                    if report.is_empty() {
                        debug!(cache = %cache_dir.display(), "empty run report, cache not written");
                    } else if let Err(error) = write_cache(cache_dir, &report) {
                        self.state = PipelineState::Failed;
                        return Err(error);
                    } else {
                        info!(
                            cache = %cache_path(cache_dir).display(),
                            stages = report.len(),
                            "wrote parameter report"
                        );
                    }
                }
                self.report = Some(report);
                self.state = PipelineState::Completed;
                Ok(self.parameters.clone())
            }
            Err(error) => {
                self.state = PipelineState::Failed;
                Err(error)
            }
        }
    }

    fn execute_stages(&mut self) -> ParamResult<RunReport> {
        let mut report = RunReport::new();

        for (name, stage) in &self.named_stages {
            debug!(stage = %name, kind = %stage.kind(), "running stage");
            let contributed = stage.run(self.parameters.view())?;

            if let Some(key) = self.parameters.first_conflict(&contributed) {
                return Err(ParamError::duplicate_parameter(key));
            }

            let stage_report = stage.describe(&contributed);
            debug!(stage = %name, contributed = contributed.len(), "stage complete");
            report.insert(name.clone(), stage_report.clone());
            self.records.push(StageRecord {
                name: name.clone(),
                report: stage_report,
                contributed: contributed.clone(),
            });
            self.parameters.absorb(contributed);
        }

        Ok(report)
    }

    fn ensure_created(&self) -> ParamResult<()> {
        if self.state == PipelineState::Created {
            Ok(())
        } else {
            Err(ParamError::input_validation(
                "INPUT.PIPELINE_STATE",
                format!(
                    "pipeline has already been run (state {:?}); build a new pipeline instead",
                    self.state
                ),
            ))
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names().collect::<Vec<_>>())
            .field("cache", &self.cache)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Pipeline, PipelineState, Stage};
    use crate::domain::{ParamErrorCategory, ParamResult, StageKind};
    use crate::parameters::{ParameterSet, ParameterView};
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(ParameterSet);

    impl Stage for Fixed {
        fn source(&self) -> &str {
            "fixed values"
        }

        fn kind(&self) -> StageKind {
            StageKind::DirectEntry
        }

        fn run(&self, _parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
            Ok(self.0.clone())
        }
    }

    struct Doubler {
        input: &'static str,
        output: &'static str,
    }

    impl Stage for Doubler {
        fn source(&self) -> &str {
            "doubles a value"
        }

        fn kind(&self) -> StageKind {
            StageKind::Calculation
        }

        fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
            let value = parameters.number(self.input)?;
            Ok(ParameterSet::new().with(self.output, 2.0 * value))
        }
    }

    fn fixed(key: &str, value: f64) -> Box<dyn Stage> {
        Box::new(Fixed(ParameterSet::new().with(key, value)))
    }

    #[test]
    fn fresh_pipeline_has_no_cache_and_no_report() {
        let pipeline = Pipeline::new(Vec::<(String, Box<dyn Stage>)>::new());
        assert!(pipeline.cache().is_none());
        assert!(pipeline.report().is_none());
        assert_eq!(pipeline.state(), PipelineState::Created);
    }

    #[test]
    fn disjoint_stages_accumulate_in_order() {
        let mut pipeline = Pipeline::new(vec![("a", fixed("x", 1.0)), ("b", fixed("y", 2.0))]);
        let parameters = pipeline.run().expect("pipeline should run");

        assert_eq!(parameters, ParameterSet::new().with("x", 1.0).with("y", 2.0));
        let report = pipeline.report().expect("report after run");
        assert_eq!(report.stage_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(report.get("a").expect("a").parameters["x"], "1");
        assert_eq!(report.get("b").expect("b").parameters["y"], "2");
        assert_eq!(pipeline.state(), PipelineState::Completed);
    }

    #[test]
    fn calculation_stages_read_prior_contributions() {
        let mut pipeline = Pipeline::new(vec![
            ("base", fixed("x", 1.5)),
            (
                "double",
                Box::new(Doubler {
                    input: "x",
                    output: "2x",
                }) as Box<dyn Stage>,
            ),
        ]);
        let parameters = pipeline.run().expect("pipeline should run");
        assert_eq!(parameters.view().number("2x").expect("derived"), 3.0);
        assert_eq!(pipeline.records()[1].report.kind, "calculation");
    }

    #[test]
    fn duplicate_key_aborts_and_leaves_prior_state() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut pipeline = Pipeline::new(vec![("a", fixed("x", 1.0)), ("b", fixed("x", 2.0))])
            .with_cache(temp.path());

        let error = pipeline.run().expect_err("duplicate should fail");
        assert_eq!(error.category(), ParamErrorCategory::DuplicateParameter);
        assert_eq!(error.key(), Some("x"));
        assert!(error.to_string().contains("'x'"));

        assert_eq!(pipeline.parameters(), &ParameterSet::new().with("x", 1.0));
        assert!(pipeline.report().is_none());
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert!(!temp.path().join("parameters.json").exists());
    }

    #[test]
    fn forward_references_fail_with_key_not_found() {
        let mut pipeline = Pipeline::new(vec![
            (
                "double",
                Box::new(Doubler {
                    input: "x",
                    output: "2x",
                }) as Box<dyn Stage>,
            ),
            ("later", fixed("x", 1.0)),
        ]);
        let error = pipeline.run().expect_err("x is not available yet");
        assert_eq!(error.category(), ParamErrorCategory::KeyNotFound);
        assert_eq!(error.key(), Some("x"));
        assert!(pipeline.parameters().is_empty());
    }

    #[test]
    fn pipelines_are_single_shot() {
        let mut pipeline = Pipeline::new(vec![("a", fixed("x", 1.0))]);
        pipeline.run().expect("first run");
        let error = pipeline.run().expect_err("second run must fail");
        assert_eq!(error.placeholder(), "INPUT.PIPELINE_STATE");
        assert!(pipeline.push_stage("late", fixed("y", 1.0)).is_err());
    }

    #[test]
    fn successful_run_writes_cache() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut pipeline = Pipeline::new(vec![("a", fixed("x", 1.0))]).with_cache(temp.path());
        pipeline.run().expect("pipeline should run");

        let content =
            fs::read_to_string(temp.path().join("parameters.json")).expect("cache written");
        let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
        assert_eq!(parsed["a"]["type"], "direct entry");
        assert_eq!(parsed["a"]["source"], "fixed values");
        assert_eq!(parsed["a"]["parameters"]["x"], "1");
    }

    #[test]
    fn empty_pipeline_returns_empty_mapping_without_cache_file() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut pipeline =
            Pipeline::new(Vec::<(String, Box<dyn Stage>)>::new()).with_cache(temp.path());

        let parameters = pipeline.run().expect("empty pipeline runs");
        assert!(parameters.is_empty());
        assert!(pipeline.report().expect("report").is_empty());
        assert!(!temp.path().join("parameters.json").exists());
    }

    #[test]
    fn describe_is_idempotent() {
        let stage = Fixed(ParameterSet::new().with("x", 1.0));
        let contributed = ParameterSet::new().with("x", 1.0);
        assert_eq!(stage.describe(&contributed), stage.describe(&contributed));
    }
}
