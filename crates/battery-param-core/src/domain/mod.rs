pub mod errors;

pub use errors::{ParamError, ParamErrorCategory, ParamResult};

use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Report label for functions that carry no declared name.
pub const ANONYMOUS_FUNCTION_LABEL: &str = "partial";

type Evaluator = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// Curve-fit or tabulated function of physical state (stoichiometry,
/// concentration, temperature) stored as a parameter value.
#[derive(Clone)]
pub struct ParameterFunction {
    name: Option<String>,
    expression: Option<String>,
    arity: usize,
    evaluator: Arc<Evaluator>,
}

impl ParameterFunction {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        evaluator: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Some(name.into()),
            expression: None,
            arity,
            evaluator: Arc::new(evaluator),
        }
    }

    pub fn anonymous(
        arity: usize,
        evaluator: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: None,
            expression: None,
            arity,
            evaluator: Arc::new(evaluator),
        }
    }

    pub fn unary(name: impl Into<String>, function: fn(f64) -> f64) -> Self {
        Self::new(name, 1, move |args| function(args[0]))
    }

    pub fn binary(name: impl Into<String>, function: fn(f64, f64) -> f64) -> Self {
        Self::new(name, 2, move |args| function(args[0], args[1]))
    }

    pub fn quaternary(name: impl Into<String>, function: fn(f64, f64, f64, f64) -> f64) -> Self {
        Self::new(name, 4, move |args| {
            function(args[0], args[1], args[2], args[3])
        })
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub const fn arity(&self) -> usize {
        self.arity
    }

    pub fn report_label(&self) -> &str {
        self.name().unwrap_or(ANONYMOUS_FUNCTION_LABEL)
    }

    pub fn call(&self, args: &[f64]) -> ParamResult<f64> {
        if args.len() != self.arity {
            return Err(ParamError::computation(
                "RUN.FUNCTION_ARITY",
                format!(
                    "function '{}' expects {} argument(s), got {}",
                    self.report_label(),
                    self.arity,
                    args.len()
                ),
            ));
        }
        Ok((self.evaluator)(args))
    }
}

impl Debug for ParameterFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ParameterFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.arity == other.arity
            && Arc::ptr_eq(&self.evaluator, &other.evaluator)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Number(f64),
    Function(ParameterFunction),
}

impl ParameterValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&ParameterFunction> {
        match self {
            Self::Number(_) => None,
            Self::Function(function) => Some(function),
        }
    }

    /// Scalars act as constant functions of any state.
    pub fn evaluate(&self, args: &[f64]) -> ParamResult<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Function(function) => function.call(args),
        }
    }

    /// Lossy string form used in run reports.
    pub fn report_value(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Function(function) => function.report_label().to_string(),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<ParameterFunction> for ParameterValue {
    fn from(function: ParameterFunction) -> Self {
        Self::Function(function)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    DirectEntry,
    Calculation,
}

impl StageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DirectEntry => "direct entry",
            Self::Calculation => "calculation",
        }
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Negative,
    Positive,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Negative, Side::Positive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
        }
    }

    pub const fn capitalized(self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Positive => "Positive",
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
