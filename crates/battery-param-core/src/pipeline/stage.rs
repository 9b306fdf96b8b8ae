use super::report::StageReport;
use crate::domain::{ParamResult, StageKind};
use crate::parameters::{ParameterSet, ParameterView};

/// One unit of parameter contribution in a [`Pipeline`](super::Pipeline).
pub trait Stage {
    /// Human-readable provenance (citation or description of the calculation).
    fn source(&self) -> &str;

    fn kind(&self) -> StageKind;

    /// Parameters this stage adds, given everything contributed before it.
    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet>;

    fn describe(&self, contributed: &ParameterSet) -> StageReport {
        StageReport::new(self.source(), self.kind(), contributed)
    }
}

impl<T> Stage for Box<T>
where
    T: Stage + ?Sized,
{
    fn source(&self) -> &str {
        (**self).source()
    }

    fn kind(&self) -> StageKind {
        (**self).kind()
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        (**self).run(parameters)
    }

    fn describe(&self, contributed: &ParameterSet) -> StageReport {
        (**self).describe(contributed)
    }
}

#[cfg(test)]
mod tests {
    use super::Stage;
    use crate::domain::{ParamError, ParamErrorCategory, ParamResult, StageKind};
    use crate::parameters::{ParameterSet, ParameterView};

    struct FailingStage;

    impl Stage for FailingStage {
        fn source(&self) -> &str {
            "always fails"
        }

        fn kind(&self) -> StageKind {
            StageKind::Calculation
        }

        fn run(&self, _parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
            Err(ParamError::computation("RUN.STAGE", "stage execution failed"))
        }
    }

    #[test]
    fn stage_uses_shared_error_types() {
        let empty = ParameterSet::new();
        let error = FailingStage.run(empty.view()).expect_err("stage should fail");
        assert_eq!(error.category(), ParamErrorCategory::Computation);
        assert_eq!(error.placeholder(), "RUN.STAGE");
    }

    #[test]
    fn boxed_stages_delegate_to_the_inner_stage() {
        let boxed: Box<dyn Stage> = Box::new(FailingStage);
        assert_eq!(boxed.source(), "always fails");
        assert_eq!(boxed.kind(), StageKind::Calculation);

        let report = boxed.describe(&ParameterSet::new().with("x", 1.0));
        assert_eq!(report.source, "always fails");
        assert_eq!(report.kind, "calculation");
        assert_eq!(report.parameters.get("x").map(String::as_str), Some("1"));
    }
}
