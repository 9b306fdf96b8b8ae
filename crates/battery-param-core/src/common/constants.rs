//! Physical constants (CODATA 2018) and unit conversions shared by the
//! calculation stages.

pub const FARADAY: f64 = 96_485.332_12_f64;
pub const GAS_CONSTANT: f64 = 8.314_462_618_f64;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_MONTH: f64 = 60.0 * 60.0 * 24.0 * 30.0;
pub const CELSIUS_TO_KELVIN: f64 = 273.15;
pub const SQUARE_CENTIMETRES_PER_SQUARE_METRE: f64 = 1.0e4;
pub const LITRES_PER_CUBIC_METRE: f64 = 1.0e3;

/// Charge per mole of lithium expressed in A.h.
pub const AMP_HOURS_PER_MOLE: f64 = FARADAY / SECONDS_PER_HOUR;
