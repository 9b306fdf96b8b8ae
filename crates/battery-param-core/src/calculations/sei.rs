use super::{
    Curve, ELECTRODE_AREA, electrode_capacity_key, initial_concentration_key,
    max_concentration_key, thickness_key,
};
use crate::calculations::capacity::CYCLABLE_LITHIUM;
use crate::common::constants::{AMP_HOURS_PER_MOLE, FARADAY, GAS_CONSTANT, SECONDS_PER_MONTH};
use crate::domain::{ParamResult, Side, StageKind};
use crate::numerics::{Bracket, BrentSolver, RootFindingApi, expand_bracket};
use crate::parameters::{ParameterSet, ParameterView};
use crate::pipeline::Stage;
use std::fmt::{Debug, Formatter};
use tracing::debug;

const SEI_PARTIAL_MOLAR_VOLUME: &str = "SEI partial molar volume [m3.mol-1]";
const SEI_LITHIUM_RATIO: &str = "Ratio of lithium moles to SEI moles";
const INITIAL_SEI_THICKNESS: &str = "Initial SEI thickness [m]";
const SEI_EXCHANGE_CURRENT_DENSITY: &str = "SEI reaction exchange current density [A.m-2]";

const INITIAL_EXCHANGE_BRACKET: Bracket = Bracket {
    lower: 0.0,
    upper: 1.0e-9,
};
const BRACKET_GROWTH_FACTOR: f64 = 10.0;
const MAX_BRACKET_EXPANSIONS: usize = 30;

/// SEI left behind by formation, from the lithium inventory lost between the
/// positive electrode capacity and the cyclable lithium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialSeiThickness;

impl Stage for InitialSeiThickness {
    fn source(&self) -> &str {
        "Calculation of initial SEI thickness from min/max stoichiometries"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let q_p = parameters.number(&electrode_capacity_key(Side::Positive))?;
        let q_li = parameters.number(CYCLABLE_LITHIUM)?;
        let thickness = parameters.number(&thickness_key(Side::Negative))?;
        let area = parameters.number(ELECTRODE_AREA)?;
        let partial_molar_volume = parameters.number(SEI_PARTIAL_MOLAR_VOLUME)?;
        let surface_area =
            parameters.number("Negative electrode surface area to volume ratio [m-1]")?;

        let capacity_lost = q_p - q_li;
        let moles = capacity_lost / AMP_HOURS_PER_MOLE;
        let concentration = moles / (thickness * area);
        let sei_thickness = concentration * partial_molar_volume / surface_area;

        Ok(ParameterSet::new()
            .with("Capacity lost to SEI in formation [A.h]", capacity_lost)
            .with("Moles of SEI formed in formation [mol]", moles)
            .with("Initial SEI concentration [mol.m-3]", concentration)
            .with(INITIAL_SEI_THICKNESS, sei_thickness))
    }
}

/// Rate law giving the SEI current density of a cell at rest.
pub trait SeiKinetics {
    fn name(&self) -> &str;

    /// SEI current density [A.m-2] (negative while the layer grows) for a
    /// trial exchange current density [A.m-2].
    fn current_density(
        &self,
        parameters: ParameterView<'_>,
        exchange_current_density: f64,
    ) -> ParamResult<f64>;
}

/// Reaction-limited SEI growth at open circuit:
/// j = -j0 * exp(E / R * (1 / T_ref - 1 / T)) * exp(-alpha * F * (U_n - U_sei) / (R * T)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionLimitedSei;

impl SeiKinetics for ReactionLimitedSei {
    fn name(&self) -> &str {
        "reaction limited"
    }

    fn current_density(
        &self,
        parameters: ParameterView<'_>,
        exchange_current_density: f64,
    ) -> ParamResult<f64> {
        let temperature = parameters.number("Ambient temperature [K]")?;
        let reference_temperature = parameters.number("Reference temperature [K]")?;
        let activation_energy = parameters.number("SEI growth activation energy [J.mol-1]")?;
        let transfer_coefficient = parameters.number("SEI growth transfer coefficient")?;
        let sei_ocp = parameters.number("SEI open-circuit potential [V]")?;

        let stoichiometry = parameters.number(&initial_concentration_key(Side::Negative))?
            / parameters.number(&max_concentration_key(Side::Negative))?;
        let negative_ocp = Curve::ocp(parameters, Side::Negative)?.at(stoichiometry);

        let arrhenius = (activation_energy / GAS_CONSTANT
            * (1.0 / reference_temperature - 1.0 / temperature))
            .exp();
        let overpotential = negative_ocp - sei_ocp;
        Ok(-exchange_current_density
            * arrhenius
            * (-transfer_coefficient * FARADAY * overpotential / (GAS_CONSTANT * temperature))
                .exp())
    }
}

/// Fits the SEI exchange current density so that the SEI grows by a target
/// percentage of its initial thickness per month.
pub struct TargetSeiCalendarRate {
    target_percent_growth_per_month: f64,
    kinetics: Box<dyn SeiKinetics>,
}

impl TargetSeiCalendarRate {
    pub fn new(target_percent_growth_per_month: f64, kinetics: Box<dyn SeiKinetics>) -> Self {
        Self {
            target_percent_growth_per_month,
            kinetics,
        }
    }

    pub fn reaction_limited(target_percent_growth_per_month: f64) -> Self {
        Self::new(target_percent_growth_per_month, Box::new(ReactionLimitedSei))
    }

    pub fn target_percent_growth_per_month(&self) -> f64 {
        self.target_percent_growth_per_month
    }

    pub fn kinetics(&self) -> &dyn SeiKinetics {
        self.kinetics.as_ref()
    }

    /// SEI current density [A.m-2] that produces the target growth rate.
    pub fn target_current_density(&self, parameters: ParameterView<'_>) -> ParamResult<f64> {
        let initial_thickness = parameters.number(INITIAL_SEI_THICKNESS)?;
        let partial_molar_volume = parameters.number(SEI_PARTIAL_MOLAR_VOLUME)?;
        let lithium_ratio = parameters.number(SEI_LITHIUM_RATIO)?;

        let growth_rate =
            initial_thickness * 0.01 * self.target_percent_growth_per_month / SECONDS_PER_MONTH;
        Ok(growth_rate / (-partial_molar_volume / (FARADAY * lithium_ratio)))
    }
}

impl Debug for TargetSeiCalendarRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSeiCalendarRate")
            .field(
                "target_percent_growth_per_month",
                &self.target_percent_growth_per_month,
            )
            .field("kinetics", &self.kinetics.name())
            .finish()
    }
}

impl Stage for TargetSeiCalendarRate {
    fn source(&self) -> &str {
        "SEI parameters to hit a target aging rate"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let target = self.target_current_density(parameters)?;
        // Surface missing inputs before the solver sees NaN.
        self.kinetics.current_density(parameters, 0.0)?;

        let mut residual = |exchange_current_density: f64| {
            self.kinetics
                .current_density(parameters, exchange_current_density)
                .map(|current| current - target)
                .unwrap_or(f64::NAN)
        };
        let bracket = expand_bracket(
            &mut residual,
            INITIAL_EXCHANGE_BRACKET,
            BRACKET_GROWTH_FACTOR,
            MAX_BRACKET_EXPANSIONS,
        )?;
        let exchange_current_density = BrentSolver::default().find_root(&mut residual, bracket)?;
        debug!(
            kinetics = self.kinetics.name(),
            target_current_density = target,
            exchange_current_density,
            "fitted SEI exchange current density"
        );

        Ok(ParameterSet::new().with(SEI_EXCHANGE_CURRENT_DENSITY, exchange_current_density))
    }
}
