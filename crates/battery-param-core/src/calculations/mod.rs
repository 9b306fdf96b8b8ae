mod capacity;
mod geometric;
mod sei;

pub use capacity::{CellCapacity, ElectrodeSoh, InitialSoc, KnownValue, StoichiometryLimits};
pub use geometric::{AreaToSquareWidthHeight, ElectrodeVolumeFractionFromLoading, SurfaceArea};
pub use sei::{InitialSeiThickness, ReactionLimitedSei, SeiKinetics, TargetSeiCalendarRate};

use crate::common::constants::AMP_HOURS_PER_MOLE;
use crate::domain::{ParamResult, ParameterValue, Side};
use crate::parameters::ParameterView;

pub(crate) const ELECTRODE_HEIGHT: &str = "Electrode height [m]";
pub(crate) const ELECTRODE_WIDTH: &str = "Electrode width [m]";
pub(crate) const ELECTRODE_AREA: &str = "Electrode area [m2]";

pub(crate) fn thickness_key(side: Side) -> String {
    format!("{} electrode thickness [m]", side.capitalized())
}

pub(crate) fn volume_fraction_key(side: Side) -> String {
    format!("{} electrode active material volume fraction", side.capitalized())
}

pub(crate) fn max_concentration_key(side: Side) -> String {
    format!("Maximum concentration in {} electrode [mol.m-3]", side)
}

pub(crate) fn initial_concentration_key(side: Side) -> String {
    format!("Initial concentration in {} electrode [mol.m-3]", side)
}

pub(crate) fn electrode_capacity_key(side: Side) -> String {
    format!("{} electrode capacity [A.h]", side.capitalized())
}

pub(crate) fn ocp_key(side: Side) -> String {
    format!("{} electrode OCP [V]", side.capitalized())
}

pub(crate) fn min_stoichiometry_key(side: Side) -> String {
    format!("Minimum stoichiometry in {} electrode", side)
}

pub(crate) fn max_stoichiometry_key(side: Side) -> String {
    format!("Maximum stoichiometry in {} electrode", side)
}

/// Current-collector area from the electrode height and width.
pub(crate) fn electrode_area(parameters: ParameterView<'_>) -> ParamResult<f64> {
    Ok(parameters.number(ELECTRODE_HEIGHT)? * parameters.number(ELECTRODE_WIDTH)?)
}

/// Theoretical capacity per unit area, L * eps * c_max * F / 3600, in A.h.m-2.
pub(crate) fn areal_capacity(parameters: ParameterView<'_>, side: Side) -> ParamResult<f64> {
    let thickness = parameters.number(&thickness_key(side))?;
    let volume_fraction = parameters.number(&volume_fraction_key(side))?;
    let c_max = parameters.number(&max_concentration_key(side))?;
    Ok(thickness * volume_fraction * c_max * AMP_HOURS_PER_MOLE)
}

/// Single-argument curve (an OCP) resolved from the parameter set.
///
/// The arity is checked once on construction so the solvers can evaluate it
/// as a plain `f64 -> f64` closure.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Curve<'a> {
    value: &'a ParameterValue,
}

impl<'a> Curve<'a> {
    pub(crate) fn resolve(parameters: ParameterView<'a>, key: &str) -> ParamResult<Self> {
        let value = parameters.get(key)?;
        value.evaluate(&[0.5])?;
        Ok(Self { value })
    }

    pub(crate) fn ocp(parameters: ParameterView<'a>, side: Side) -> ParamResult<Self> {
        Self::resolve(parameters, &ocp_key(side))
    }

    pub(crate) fn at(&self, x: f64) -> f64 {
        self.value.evaluate(&[x]).unwrap_or(f64::NAN)
    }
}
