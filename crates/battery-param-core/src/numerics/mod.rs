pub mod interpolation;
pub mod roots;

pub use interpolation::{BilinearTable, InterpolationError, interpolate_linear, linspace};
pub use roots::{Bracket, BrentSolver, RootFindError, RootFindingApi, expand_bracket};

use crate::domain::ParamError;

impl From<RootFindError> for ParamError {
    fn from(error: RootFindError) -> Self {
        ParamError::computation("RUN.ROOT_FINDING", error.to_string())
    }
}

impl From<InterpolationError> for ParamError {
    fn from(error: InterpolationError) -> Self {
        ParamError::computation("RUN.INTERPOLATION", error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{Bracket, BrentSolver, InterpolationError, RootFindError, RootFindingApi};
    use crate::domain::{ParamError, ParamErrorCategory};

    #[test]
    fn numeric_failures_map_to_computation_errors() {
        let root_error = BrentSolver::default()
            .find_root(&mut |_| 1.0, Bracket::new(0.0, 1.0))
            .expect_err("constant objective");
        let error = ParamError::from(root_error);
        assert_eq!(error.category(), ParamErrorCategory::Computation);
        assert_eq!(error.placeholder(), "RUN.ROOT_FINDING");

        let error = ParamError::from(InterpolationError::NonFiniteQuery { value: f64::NAN });
        assert_eq!(error.placeholder(), "RUN.INTERPOLATION");
        assert!(error.message().contains("finite"));

        let error = ParamError::from(RootFindError::NoConvergence {
            iterations: 3,
            estimate: 0.5,
        });
        assert!(error.message().contains("3 iterations"));
    }
}
