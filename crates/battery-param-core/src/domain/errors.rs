use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamErrorCategory {
    DuplicateParameter,
    KeyNotFound,
    ImmutableWrite,
    InputValidation,
    Computation,
    IoSystem,
}

impl ParamErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::DuplicateParameter => 2,
            Self::KeyNotFound => 3,
            Self::ImmutableWrite => 4,
            Self::InputValidation => 5,
            Self::Computation => 6,
            Self::IoSystem => 7,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateParameter => "DuplicateParameterError",
            Self::KeyNotFound => "KeyNotFoundError",
            Self::ImmutableWrite => "ImmutableWriteError",
            Self::InputValidation => "InputValidationError",
            Self::Computation => "ComputationError",
            Self::IoSystem => "IoSystemError",
        }
    }
}

impl Display for ParamErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    category: ParamErrorCategory,
    placeholder: &'static str,
    message: String,
    key: Option<String>,
}

impl ParamError {
    pub fn new(
        category: ParamErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
            key: None,
        }
    }

    pub fn duplicate_parameter(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            category: ParamErrorCategory::DuplicateParameter,
            placeholder: "RUN.DUPLICATE_PARAMETER",
            message: format!("parameter '{}' already exists in parameter values", key),
            key: Some(key),
        }
    }

    pub fn key_not_found(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            category: ParamErrorCategory::KeyNotFound,
            placeholder: "RUN.KEY_NOT_FOUND",
            message: format!("parameter '{}' has not been contributed by any prior stage", key),
            key: Some(key),
        }
    }

    pub fn immutable_write(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            category: ParamErrorCategory::ImmutableWrite,
            placeholder: "RUN.IMMUTABLE_WRITE",
            message: format!(
                "cannot assign parameter '{}' through a read-only parameter view",
                key
            ),
            key: Some(key),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ParamErrorCategory::InputValidation, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ParamErrorCategory::Computation, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ParamErrorCategory::IoSystem, placeholder, message)
    }

    pub const fn category(&self) -> ParamErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Parameter key the error refers to, for duplicate, missing and write errors.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }
}

impl Display for ParamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::{ParamError, ParamErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (ParamErrorCategory::DuplicateParameter, 2, "DuplicateParameterError"),
            (ParamErrorCategory::KeyNotFound, 3, "KeyNotFoundError"),
            (ParamErrorCategory::ImmutableWrite, 4, "ImmutableWriteError"),
            (ParamErrorCategory::InputValidation, 5, "InputValidationError"),
            (ParamErrorCategory::Computation, 6, "ComputationError"),
            (ParamErrorCategory::IoSystem, 7, "IoSystemError"),
        ];

        for (category, exit_code, name) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn duplicate_parameter_error_names_the_key() {
        let error = ParamError::duplicate_parameter("Electrode area [m2]");
        assert_eq!(error.category(), ParamErrorCategory::DuplicateParameter);
        assert_eq!(error.key(), Some("Electrode area [m2]"));
        assert!(error.message().contains("'Electrode area [m2]'"));
        assert_eq!(
            error.to_string(),
            "DuplicateParameterError [RUN.DUPLICATE_PARAMETER] parameter 'Electrode area [m2]' already exists in parameter values"
        );
    }

    #[test]
    fn generic_constructors_do_not_carry_a_key() {
        let error = ParamError::computation("RUN.ROOT", "no convergence");
        assert_eq!(error.key(), None);
        assert_eq!(error.exit_code(), 6);
        assert_eq!(error.diagnostic_line(), "ERROR: [RUN.ROOT] no convergence");
    }
}
