//! Tabulated electrolyte transport properties exported by the Advanced
//! Electrolyte Model (AEM).
//!
//! The export is a CSV table with one row per (temperature, concentration)
//! sample. Each property column is resampled per temperature onto a common
//! concentration grid, then exposed as a bilinear function of
//! `(c_e [mol.m-3], T [K])`.

use super::DirectEntry;
use crate::common::constants::{CELSIUS_TO_KELVIN, LITRES_PER_CUBIC_METRE};
use crate::domain::{ParamError, ParamResult, ParameterFunction};
use crate::numerics::{BilinearTable, interpolate_linear, linspace};
use crate::parameters::ParameterSet;
use std::fs;
use std::path::Path;

/// (parameter key, AEM column, factor converting the column to SI units)
pub const ADVANCED_ELECTROLYTE_COLUMNS: [(&str, &str, f64); 3] = [
    ("Electrolyte conductivity [S.m-1]", "Cond (mS) 2", 0.1),
    ("Cation transference number", "t+(a)", 1.0),
    ("Electrolyte diffusivity [m2.s-1]", "Diff. Coeff. cm^2/s", 1.0e-4),
];

const TEMPERATURE_COLUMN: &str = "Temperature(C)";
const CONCENTRATION_COLUMN: &str = "c";
const RESAMPLE_POINTS: usize = 1000;
const RESAMPLE_MAX_MOLAR: f64 = 3.0;
const TYPICAL_CONCENTRATION: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ElectrolyteTable {
    header: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ElectrolyteTable {
    pub fn parse(content: &str) -> ParamResult<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Err(ParamError::input_validation(
                "INPUT.ELECTROLYTE_TABLE",
                "electrolyte table is empty",
            ));
        };
        let header = split_fields(header_line)
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for (index, line) in lines {
            let row = split_fields(line)
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        ParamError::input_validation(
                            "INPUT.ELECTROLYTE_TABLE",
                            format!(
                                "line {}: value '{}' is not a number",
                                index + 1,
                                field
                            ),
                        )
                    })
                })
                .collect::<ParamResult<Vec<_>>>()?;
            if row.len() != header.len() {
                return Err(ParamError::input_validation(
                    "INPUT.ELECTROLYTE_TABLE",
                    format!(
                        "line {}: expected {} fields, found {}",
                        index + 1,
                        header.len(),
                        row.len()
                    ),
                ));
            }
            rows.push(row);
        }

        Ok(Self { header, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> ParamResult<usize> {
        self.header
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| {
                ParamError::input_validation(
                    "INPUT.ELECTROLYTE_COLUMN",
                    format!("electrolyte table has no column '{}'", name),
                )
            })
    }

    /// Distinct temperatures in the table, ascending, in degrees Celsius.
    pub fn temperatures_celsius(&self) -> ParamResult<Vec<f64>> {
        let column = self.column_index(TEMPERATURE_COLUMN)?;
        let mut temperatures = self.rows.iter().map(|row| row[column]).collect::<Vec<_>>();
        temperatures.sort_by(f64::total_cmp);
        temperatures.dedup();
        Ok(temperatures)
    }

    /// Resamples `column` onto 1000 concentrations in [0, 3] mol/L for every
    /// temperature, scaled by `factor`, as a table over (mol.m-3, K).
    pub fn resample(&self, column: &str, factor: f64) -> ParamResult<BilinearTable> {
        let temperature_index = self.column_index(TEMPERATURE_COLUMN)?;
        let concentration_index = self.column_index(CONCENTRATION_COLUMN)?;
        let value_index = self.column_index(column)?;
        let temperatures = self.temperatures_celsius()?;
        let molar_grid = linspace(0.0, RESAMPLE_MAX_MOLAR, RESAMPLE_POINTS);

        let mut per_temperature = Vec::with_capacity(temperatures.len());
        for temperature in &temperatures {
            let mut samples = self
                .rows
                .iter()
                .filter(|row| row[temperature_index] == *temperature)
                .map(|row| (row[concentration_index], row[value_index]))
                .collect::<Vec<_>>();
            samples.sort_by(|left, right| left.0.total_cmp(&right.0));
            let (concentrations, values): (Vec<f64>, Vec<f64>) = samples.into_iter().unzip();

            let resampled = molar_grid
                .iter()
                .map(|c| interpolate_linear(*c, &concentrations, &values))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| {
                    ParamError::input_validation(
                        "INPUT.ELECTROLYTE_TABLE",
                        format!(
                            "column '{}' at {} C cannot be interpolated: {}",
                            column, temperature, error
                        ),
                    )
                })?;
            per_temperature.push(resampled);
        }

        let mut grid_values = Vec::with_capacity(RESAMPLE_POINTS * temperatures.len());
        for c_index in 0..molar_grid.len() {
            for series in &per_temperature {
                grid_values.push(factor * series[c_index]);
            }
        }

        BilinearTable::new(
            molar_grid
                .iter()
                .map(|c| c * LITRES_PER_CUBIC_METRE)
                .collect(),
            temperatures
                .iter()
                .map(|t| t + CELSIUS_TO_KELVIN)
                .collect(),
            grid_values,
        )
        .map_err(|error| {
            ParamError::input_validation(
                "INPUT.ELECTROLYTE_TABLE",
                format!("column '{}' does not form a 2-D grid: {}", column, error),
            )
        })
    }
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|field| field.trim().trim_matches('"'))
}

pub fn advanced_electrolyte_model(path: impl AsRef<Path>) -> ParamResult<DirectEntry> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|error| {
        ParamError::io_system(
            "IO.ELECTROLYTE_TABLE",
            format!(
                "failed to read electrolyte table '{}': {}",
                path.display(),
                error
            ),
        )
    })?;
    advanced_electrolyte_model_from_str(&content, &path.display().to_string())
}

pub fn advanced_electrolyte_model_from_str(
    content: &str,
    data_label: &str,
) -> ParamResult<DirectEntry> {
    let table = ElectrolyteTable::parse(content)?;

    let mut parameters = ParameterSet::new()
        .with("Typical electrolyte concentration [mol.m-3]", TYPICAL_CONCENTRATION)
        .with("Initial concentration in electrolyte [mol.m-3]", TYPICAL_CONCENTRATION)
        .with("1 + dlnf/dlnc", 1.0);

    for (key, column, factor) in ADVANCED_ELECTROLYTE_COLUMNS {
        let grid = table.resample(column, factor)?;
        parameters.insert(
            key,
            ParameterFunction::anonymous(2, move |args| grid.evaluate(args[0], args[1])),
        );
    }

    let source = format!(
        "Electrolyte properties from Advanced Electrolyte Model (with data from \\verb!{}!)",
        data_label
    );
    Ok(DirectEntry::new(parameters, source))
}

#[cfg(test)]
mod tests {
    use super::{ElectrolyteTable, advanced_electrolyte_model, advanced_electrolyte_model_from_str};
    use crate::domain::ParamErrorCategory;
    use crate::pipeline::Stage;
    use std::fs;
    use tempfile::TempDir;

    // Conductivity rises linearly with c and T; transference and diffusivity
    // are constant so the conversions are easy to check.
    const AEM_EXPORT: &str = "\
Temperature(C),c,Cond (mS) 2,t+(a),Diff. Coeff. cm^2/s
25,0.5,5.0,0.4,3.0e-6
25,1.5,15.0,0.4,3.0e-6
25,1.0,10.0,0.4,3.0e-6
45,0.5,7.0,0.4,3.0e-6
45,1.0,12.0,0.4,3.0e-6
45,1.5,17.0,0.4,3.0e-6
";

    #[test]
    fn table_parsing_reads_header_and_rows() {
        let table = ElectrolyteTable::parse(AEM_EXPORT).expect("table parses");
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.column_index("t+(a)").expect("column"), 3);
        assert_eq!(table.temperatures_celsius().expect("temperatures"), vec![25.0, 45.0]);
    }

    #[test]
    fn resampled_conductivity_is_converted_to_si() {
        let table = ElectrolyteTable::parse(AEM_EXPORT).expect("table parses");
        let grid = table.resample("Cond (mS) 2", 0.1).expect("resamples");

        assert_eq!(grid.x_grid().len(), 1000);
        assert_eq!(grid.y_grid(), &[298.15, 318.15]);
        // 10 mS/cm at 1 mol/L and 25 C is 1 S/m.
        assert!((grid.evaluate(1000.0, 298.15) - 1.0).abs() < 1.0e-3);
        // Linear extrapolation below the first sample: 0 mS/cm at c = 0.
        assert!(grid.evaluate(0.0, 298.15).abs() < 1.0e-9);
        assert!((grid.evaluate(1000.0, 308.15) - 1.1).abs() < 1.0e-3);
    }

    #[test]
    fn model_entry_exposes_two_argument_functions() {
        let entry = advanced_electrolyte_model_from_str(AEM_EXPORT, "aem.csv").expect("builds");
        let parameters = entry.parameters();
        let view = parameters.view();

        let diffusivity = view
            .evaluate("Electrolyte diffusivity [m2.s-1]", &[1000.0, 298.15])
            .expect("diffusivity evaluates");
        assert!((diffusivity - 3.0e-10).abs() < 1.0e-16);
        assert!(
            (view
                .evaluate("Cation transference number", &[800.0, 310.0])
                .expect("transference evaluates")
                - 0.4)
                .abs()
                < 1.0e-12
        );
        assert_eq!(view.number("1 + dlnf/dlnc").expect("thermodynamic factor"), 1.0);
        assert!(entry.source().contains("\\verb!aem.csv!"));

        let report = entry.describe(parameters);
        assert_eq!(report.parameters["Electrolyte conductivity [S.m-1]"], "partial");
    }

    #[test]
    fn malformed_tables_are_rejected() {
        let missing_column = "Temperature(C),c\n25,1.0\n45,1.0\n";
        let error = advanced_electrolyte_model_from_str(missing_column, "bad.csv")
            .expect_err("columns missing");
        assert_eq!(error.category(), ParamErrorCategory::InputValidation);
        assert!(error.message().contains("Cond (mS) 2"));

        let bad_number = "Temperature(C),c\n25,abc\n";
        assert!(ElectrolyteTable::parse(bad_number).is_err());
        assert!(ElectrolyteTable::parse("").is_err());

        let single_temperature = "\
Temperature(C),c,Cond (mS) 2,t+(a),Diff. Coeff. cm^2/s
25,0.5,5.0,0.4,3.0e-6
25,1.0,10.0,0.4,3.0e-6
";
        assert!(advanced_electrolyte_model_from_str(single_temperature, "one.csv").is_err());
    }

    #[test]
    fn file_loader_reports_io_errors() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = advanced_electrolyte_model(temp.path().join("missing.csv"))
            .expect_err("missing file");
        assert_eq!(error.category(), ParamErrorCategory::IoSystem);

        let path = temp.path().join("aem.csv");
        fs::write(&path, AEM_EXPORT).expect("write table");
        assert!(advanced_electrolyte_model(&path).is_ok());
    }
}
