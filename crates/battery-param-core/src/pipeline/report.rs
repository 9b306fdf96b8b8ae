use crate::domain::{ParamError, ParamResult, StageKind};
use crate::parameters::ParameterSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = "parameters.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub parameters: IndexMap<String, String>,
}

impl StageReport {
    pub fn new(source: &str, kind: StageKind, contributed: &ParameterSet) -> Self {
        Self {
            source: source.to_string(),
            kind: kind.as_str().to_string(),
            parameters: serialize_parameters(contributed),
        }
    }
}

/// Stage reports keyed by stage name, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    stages: IndexMap<String, StageReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, report: StageReport) {
        self.stages.insert(name.into(), report);
    }

    pub fn get(&self, name: &str) -> Option<&StageReport> {
        self.stages.get(name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StageReport)> {
        self.stages
            .iter()
            .map(|(name, report)| (name.as_str(), report))
    }

    pub fn parameter_count(&self) -> usize {
        self.stages
            .values()
            .map(|report| report.parameters.len())
            .sum()
    }

    pub fn to_pretty_json(&self) -> ParamResult<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer).map_err(|source| {
            ParamError::computation(
                "RUN.REPORT_SERIALIZE",
                format!("failed to serialize run report: {}", source),
            )
        })?;
        String::from_utf8(buffer).map_err(|source| {
            ParamError::computation(
                "RUN.REPORT_SERIALIZE",
                format!("run report is not valid UTF-8: {}", source),
            )
        })
    }
}

pub fn serialize_parameters(parameters: &ParameterSet) -> IndexMap<String, String> {
    parameters
        .iter()
        .map(|(key, value)| (key.clone(), value.report_value()))
        .collect()
}

pub fn cache_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILE_NAME)
}

/// Writes `report` to `<cache_dir>/parameters.json`, replacing any previous file.
pub fn write_cache(cache_dir: &Path, report: &RunReport) -> ParamResult<PathBuf> {
    fs::create_dir_all(cache_dir).map_err(|source| {
        ParamError::io_system(
            "IO.CACHE_DIRECTORY",
            format!(
                "failed to create cache directory '{}': {}",
                cache_dir.display(),
                source
            ),
        )
    })?;

    let path = cache_path(cache_dir);
    write_text_artifact(&path, &report.to_pretty_json()?).map_err(|source| {
        ParamError::io_system(
            "IO.CACHE_WRITE",
            format!("failed to write cache '{}': {}", path.display(), source),
        )
    })?;
    Ok(path)
}

pub fn read_cache(path: &Path) -> ParamResult<RunReport> {
    let content = fs::read_to_string(path).map_err(|source| {
        ParamError::io_system(
            "IO.CACHE_READ",
            format!("failed to read run report '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&content).map_err(|source| {
        ParamError::input_validation(
            "INPUT.CACHE_PARSE",
            format!("failed to parse run report '{}': {}", path.display(), source),
        )
    })
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}
