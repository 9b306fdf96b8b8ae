pub mod latex;
pub mod open_circuit;

pub use latex::{CONTENTS_FILE_NAME, LatexReport, format_significant, parameter_table};
pub use open_circuit::{
    OPEN_CIRCUIT_CSV_HEADER, OpenCircuitPoint, open_circuit_curve, render_open_circuit_csv,
};
