use crate::domain::{ParamError, ParamResult, ParameterValue};
use crate::parameters::ParameterSet;
use crate::pipeline::report::write_text_artifact;
use crate::pipeline::{Pipeline, PipelineState};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONTENTS_FILE_NAME: &str = "contents.tex";
const SIGNIFICANT_FIGURES: usize = 4;

/// Writes one LaTeX fragment per stage of a completed pipeline under
/// `<output_dir>/latex/generated/`, plus a `contents.tex` that inputs them in
/// stage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexReport {
    output_dir: PathBuf,
}

impl LatexReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.output_dir.join("latex").join("generated")
    }

    /// Returns the written paths, `contents.tex` last.
    pub fn write_parameters(&self, pipeline: &Pipeline) -> ParamResult<Vec<PathBuf>> {
        if pipeline.state() != PipelineState::Completed {
            return Err(ParamError::input_validation(
                "INPUT.REPORT_STATE",
                format!(
                    "LaTeX report needs a completed pipeline run (state {:?})",
                    pipeline.state()
                ),
            ));
        }

        let generated = self.generated_dir();
        fs::create_dir_all(&generated).map_err(|source| {
            ParamError::io_system(
                "IO.LATEX_DIRECTORY",
                format!(
                    "failed to create LaTeX directory '{}': {}",
                    generated.display(),
                    source
                ),
            )
        })?;

        let mut written = Vec::with_capacity(pipeline.records().len() + 1);
        let mut contents = String::new();
        for record in pipeline.records() {
            let stem = fragment_stem(&record.name);
            contents.push_str(&format!("\\input{{generated/{}.tex}}\n", stem));

            let fragment = format!(
                "\\subsection{{{}}}\n\n{}\n\n{}",
                capitalize(&record.name),
                record.report.source,
                parameter_table(&record.contributed)
            );
            let path = generated.join(format!("{}.tex", stem));
            write_latex(&path, &fragment)?;
            written.push(path);
        }

        let contents_path = generated.join(CONTENTS_FILE_NAME);
        write_latex(&contents_path, &contents)?;
        written.push(contents_path);

        info!(
            directory = %generated.display(),
            fragments = pipeline.records().len(),
            "wrote LaTeX parameter report"
        );
        Ok(written)
    }
}

/// File stem for a stage fragment; path separators and other characters
/// outside `[A-Za-z0-9 _-]` become `_`.
fn fragment_stem(name: &str) -> String {
    name.chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || matches!(character, ' ' | '_' | '-') {
                character
            } else {
                '_'
            }
        })
        .collect()
}

fn write_latex(path: &Path, content: &str) -> ParamResult<()> {
    write_text_artifact(path, content).map_err(|source| {
        ParamError::io_system(
            "IO.LATEX_WRITE",
            format!("failed to write '{}': {}", path.display(), source),
        )
    })
}

/// Booktabs table of the numeric parameters, followed by a verbatim block
/// for every function that carries an expression.
pub fn parameter_table(parameters: &ParameterSet) -> String {
    let mut lines = vec![
        r"\begin{center}".to_string(),
        r"\begin{tabular}{ll}".to_string(),
        r"\toprule".to_string(),
        r"Parameter & Value \\".to_string(),
        r"\midrule".to_string(),
    ];

    let mut functions = Vec::new();
    for (key, value) in parameters {
        match value {
            ParameterValue::Number(number) => lines.push(format!(
                "\t{} & {} \\\\",
                escape_latex(key),
                format_significant(*number, SIGNIFICANT_FIGURES)
            )),
            ParameterValue::Function(function) => {
                if let Some(expression) = function.expression() {
                    functions.push(format!(
                        "Function for `{}':\n\\begin{{verbatim}}\n{}\n\\end{{verbatim}}",
                        escape_latex(key),
                        expression
                    ));
                }
            }
        }
    }

    lines.push(r"\bottomrule".to_string());
    lines.push(r"\end{tabular}".to_string());
    lines.push(r"\end{center}".to_string());
    lines.push(functions.join("\n"));
    lines.join("\n")
}

/// `printf`-style `%.Ng`: N significant figures, scientific notation for very
/// small or large magnitudes, trailing zeros removed.
pub fn format_significant(value: f64, figures: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let figures = figures.max(1);
    let scientific = format!("{:.*e}", figures - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= figures as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (figures as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '&' | '%' | '#' | '_') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

fn capitalize(name: &str) -> String {
    let mut characters = name.chars();
    match characters.next() {
        Some(first) => first
            .to_uppercase()
            .chain(characters.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{LatexReport, capitalize, format_significant, fragment_stem, parameter_table};
    use crate::direct_entries::DirectEntry;
    use crate::domain::ParameterFunction;
    use crate::parameters::ParameterSet;
    use crate::pipeline::{Pipeline, Stage};
    use std::fs;
    use tempfile::TempDir;

    fn identity(x: f64) -> f64 {
        x
    }

    #[test]
    fn significant_figures_match_printf_g() {
        assert_eq!(format_significant(1.0, 4), "1");
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(298.15, 4), "298.1");
        assert_eq!(format_significant(34_684.0, 4), "3.468e+04");
        assert_eq!(format_significant(6.01e-5, 4), "6.01e-05");
        assert_eq!(format_significant(-0.5, 4), "-0.5");
        assert_eq!(format_significant(0.0001234, 4), "0.0001234");
        assert_eq!(format_significant(9999.6, 4), "1e+04");
        assert_eq!(format_significant(1234.0, 4), "1234");
    }

    #[test]
    fn names_are_capitalized_like_section_titles() {
        assert_eq!(capitalize("electrode SOH calculations"), "Electrode soh calculations");
        assert_eq!(capitalize("Sturm2018"), "Sturm2018");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn stage_names_become_safe_file_stems() {
        assert_eq!(fragment_stem("electrode SOH calculations"), "electrode SOH calculations");
        assert_eq!(fragment_stem("cell/electrolyte"), "cell_electrolyte");
        assert_eq!(fragment_stem("../up"), "___up");
    }

    #[test]
    fn stage_name_with_separator_stays_inside_generated_dir() {
        let temp = TempDir::new().expect("tempdir should be created");
        let stages: Vec<(&str, Box<dyn Stage>)> = vec![(
            "cell/electrolyte",
            Box::new(DirectEntry::new(
                ParameterSet::new().with("Cation transference number", 0.38),
                "Electrolyte data",
            )) as Box<dyn Stage>,
        )];
        let mut pipeline = Pipeline::new(stages);
        pipeline.run().expect("pipeline should run");

        let written = LatexReport::new(temp.path())
            .write_parameters(&pipeline)
            .expect("report written");
        let generated = temp.path().join("latex/generated");
        assert_eq!(written[0], generated.join("cell_electrolyte.tex"));

        let contents = fs::read_to_string(generated.join("contents.tex")).expect("contents");
        assert_eq!(contents, "\\input{generated/cell_electrolyte.tex}\n");
        let fragment = fs::read_to_string(&written[0]).expect("fragment");
        assert!(fragment.starts_with("\\subsection{Cell/electrolyte}\n\nElectrolyte data\n\n"));
    }

    #[test]
    fn table_lists_numbers_and_function_expressions() {
        let parameters = ParameterSet::new()
            .with("Negative electrode thickness [m]", 6.01e-5)
            .with(
                "Negative electrode OCP [V]",
                ParameterFunction::unary("identity", identity).with_expression("sto"),
            )
            .with("Unnamed [-]", ParameterFunction::anonymous(2, |args| args[0]));
        let table = parameter_table(&parameters);

        assert!(table.starts_with("\\begin{center}\n\\begin{tabular}{ll}\n\\toprule"));
        assert!(table.contains("\tNegative electrode thickness [m] & 6.01e-05 \\\\"));
        assert!(table.contains(
            "Function for `Negative electrode OCP [V]':\n\\begin{verbatim}\nsto\n\\end{verbatim}"
        ));
        assert!(!table.contains("Unnamed"));
        assert!(table.contains("\\bottomrule\n\\end{tabular}\n\\end{center}"));
    }

    #[test]
    fn report_writes_one_fragment_per_stage_and_contents() {
        let temp = TempDir::new().expect("tempdir should be created");
        let stages: Vec<(&str, Box<dyn Stage>)> = vec![
            (
                "temperatures",
                Box::new(DirectEntry::new(
                    ParameterSet::new().with("Reference temperature [K]", 298.15),
                    "Reference conditions",
                )) as Box<dyn Stage>,
            ),
            (
                "cell",
                Box::new(DirectEntry::new(
                    ParameterSet::new().with("Nominal cell capacity [A.h]", 3.35),
                    "Cell data",
                )) as Box<dyn Stage>,
            ),
        ];
        let mut pipeline = Pipeline::new(stages);

        let report = LatexReport::new(temp.path());
        assert!(report.write_parameters(&pipeline).is_err());

        pipeline.run().expect("pipeline should run");
        let written = report.write_parameters(&pipeline).expect("report written");
        assert_eq!(written.len(), 3);

        let generated = temp.path().join("latex/generated");
        let contents = fs::read_to_string(generated.join("contents.tex")).expect("contents");
        assert_eq!(
            contents,
            "\\input{generated/temperatures.tex}\n\\input{generated/cell.tex}\n"
        );

        let fragment = fs::read_to_string(generated.join("temperatures.tex")).expect("fragment");
        assert!(fragment.starts_with("\\subsection{Temperatures}\n\nReference conditions\n\n"));
        assert!(fragment.contains("Reference temperature [K] & 298.1 \\\\"));
    }
}
