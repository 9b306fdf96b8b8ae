use crate::calculations::StoichiometryLimits;
use crate::domain::{ParamError, ParamResult};
use crate::numerics::linspace;
use crate::parameters::ParameterView;
use serde::Serialize;
use std::fmt::Write as _;

pub const OPEN_CIRCUIT_CSV_HEADER: &str =
    "soc,negative_stoichiometry,positive_stoichiometry,negative_ocp_v,positive_ocp_v,cell_voltage_v";

/// One row of the open-circuit balance across the stoichiometry window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenCircuitPoint {
    pub soc: f64,
    pub negative_stoichiometry: f64,
    pub positive_stoichiometry: f64,
    pub negative_ocp: f64,
    pub positive_ocp: f64,
    pub cell_voltage: f64,
}

/// Tabulates U_n(x), U_p(y) and U_p - U_n for `points` states of charge
/// evenly spaced over [0, 1].
pub fn open_circuit_curve(
    parameters: ParameterView<'_>,
    points: usize,
) -> ParamResult<Vec<OpenCircuitPoint>> {
    if points < 2 {
        return Err(ParamError::input_validation(
            "INPUT.OCV_POINTS",
            format!("open-circuit table needs at least 2 points, got {}", points),
        ));
    }

    let limits = StoichiometryLimits::from_parameters(parameters)?;
    let negative_ocp = parameters.get("Negative electrode OCP [V]")?;
    let positive_ocp = parameters.get("Positive electrode OCP [V]")?;

    linspace(0.0, 1.0, points)
        .into_iter()
        .map(|soc| {
            let (x, y) = limits.at_soc(soc);
            let u_n = negative_ocp.evaluate(&[x])?;
            let u_p = positive_ocp.evaluate(&[y])?;
            Ok(OpenCircuitPoint {
                soc,
                negative_stoichiometry: x,
                positive_stoichiometry: y,
                negative_ocp: u_n,
                positive_ocp: u_p,
                cell_voltage: u_p - u_n,
            })
        })
        .collect()
}

pub fn render_open_circuit_csv(points: &[OpenCircuitPoint]) -> String {
    let mut csv = String::with_capacity(OPEN_CIRCUIT_CSV_HEADER.len() + 1 + points.len() * 96);
    csv.push_str(OPEN_CIRCUIT_CSV_HEADER);
    csv.push('\n');
    for point in points {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{}",
            point.soc,
            point.negative_stoichiometry,
            point.positive_stoichiometry,
            point.negative_ocp,
            point.positive_ocp,
            point.cell_voltage
        );
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::{OPEN_CIRCUIT_CSV_HEADER, open_circuit_curve, render_open_circuit_csv};
    use crate::domain::{ParamErrorCategory, ParameterFunction};
    use crate::parameters::ParameterSet;

    fn negative(x: f64) -> f64 {
        1.0 - x
    }

    fn positive(y: f64) -> f64 {
        5.0 - y
    }

    fn balanced_cell() -> ParameterSet {
        ParameterSet::new()
            .with("Minimum stoichiometry in negative electrode", 0.0)
            .with("Maximum stoichiometry in negative electrode", 1.0)
            .with("Minimum stoichiometry in positive electrode", 0.0)
            .with("Maximum stoichiometry in positive electrode", 1.0)
            .with("Negative electrode OCP [V]", ParameterFunction::unary("negative", negative))
            .with("Positive electrode OCP [V]", ParameterFunction::unary("positive", positive))
    }

    #[test]
    fn curve_spans_empty_to_full() {
        let parameters = balanced_cell();
        let curve = open_circuit_curve(parameters.view(), 3).expect("curve tabulates");

        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0].soc, 0.0);
        assert_eq!(curve[0].cell_voltage, 3.0);
        assert_eq!(curve[1].negative_stoichiometry, 0.5);
        assert_eq!(curve[2].cell_voltage, 5.0);
    }

    #[test]
    fn csv_has_header_and_one_row_per_point() {
        let parameters = balanced_cell();
        let curve = open_circuit_curve(parameters.view(), 2).expect("curve tabulates");
        let csv = render_open_circuit_csv(&curve);

        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], OPEN_CIRCUIT_CSV_HEADER);
        assert_eq!(lines[1], "0,0,1,1,4,3");
        assert_eq!(lines[2], "1,1,0,0,5,5");
    }

    #[test]
    fn curve_needs_two_points_and_a_window() {
        let parameters = balanced_cell();
        let error = open_circuit_curve(parameters.view(), 1).expect_err("too few points");
        assert_eq!(error.category(), ParamErrorCategory::InputValidation);

        let empty = ParameterSet::new();
        let error = open_circuit_curve(empty.view(), 10).expect_err("no window");
        assert_eq!(error.category(), ParamErrorCategory::KeyNotFound);
    }
}
