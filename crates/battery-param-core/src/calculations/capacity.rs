use super::{
    Curve, areal_capacity, electrode_area, electrode_capacity_key, initial_concentration_key,
    max_concentration_key, max_stoichiometry_key, min_stoichiometry_key,
};
use crate::common::constants::SQUARE_CENTIMETRES_PER_SQUARE_METRE;
use crate::domain::{ParamError, ParamResult, Side, StageKind};
use crate::numerics::{Bracket, BrentSolver, RootFindError, RootFindingApi};
use crate::parameters::{ParameterSet, ParameterView};
use crate::pipeline::Stage;

pub(crate) const UPPER_VOLTAGE: &str = "Upper voltage cut-off [V]";
pub(crate) const LOWER_VOLTAGE: &str = "Lower voltage cut-off [V]";
pub(crate) const CYCLABLE_LITHIUM: &str = "Cyclable lithium capacity [A.h]";
pub(crate) const NOMINAL_CAPACITY: &str = "Nominal cell capacity [A.h]";
const INITIAL_SOC: &str = "Initial SOC";

/// Stoichiometry window of a cell.
///
/// `x` is the negative-electrode stoichiometry and `y` the positive one; the
/// suffix is the state of charge in percent, so the cell is full at
/// (`x_100`, `y_100`) and empty at (`x_0`, `y_0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoichiometryLimits {
    pub x_0: f64,
    pub x_100: f64,
    pub y_100: f64,
    pub y_0: f64,
}

impl StoichiometryLimits {
    pub fn from_parameters(parameters: ParameterView<'_>) -> ParamResult<Self> {
        Ok(Self {
            x_0: parameters.number(&min_stoichiometry_key(Side::Negative))?,
            x_100: parameters.number(&max_stoichiometry_key(Side::Negative))?,
            y_100: parameters.number(&min_stoichiometry_key(Side::Positive))?,
            y_0: parameters.number(&max_stoichiometry_key(Side::Positive))?,
        })
    }

    /// Electrode stoichiometries at `soc` (0 = empty, 1 = full).
    pub fn at_soc(&self, soc: f64) -> (f64, f64) {
        (
            self.x_0 + soc * (self.x_100 - self.x_0),
            self.y_0 - soc * (self.y_0 - self.y_100),
        )
    }

    fn into_parameters(self, c_n_max: f64, c_p_max: f64) -> ParameterSet {
        ParameterSet::new()
            .with(initial_concentration_key(Side::Negative), c_n_max * self.x_100)
            .with(max_stoichiometry_key(Side::Negative), self.x_100)
            .with(min_stoichiometry_key(Side::Negative), self.x_0)
            .with(initial_concentration_key(Side::Positive), c_p_max * self.y_100)
            .with(min_stoichiometry_key(Side::Positive), self.y_100)
            .with(max_stoichiometry_key(Side::Positive), self.y_0)
    }
}

/// Electrode capacities from loading, plus the whole-cell quantities that
/// follow from the stoichiometry window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellCapacity;

impl Stage for CellCapacity {
    fn source(&self) -> &str {
        "Calculation of electrode capacity from loading"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let area = electrode_area(parameters)?;
        let limits = StoichiometryLimits::from_parameters(parameters)?;

        let mut contributed = ParameterSet::new();
        let mut electrode_capacities = [0.0; 2];
        let mut cell_capacities = [0.0; 2];
        for (index, side) in Side::BOTH.into_iter().enumerate() {
            let loading = areal_capacity(parameters, side)?;
            let capacity = loading * area;
            let window = parameters.number(&max_stoichiometry_key(side))?
                - parameters.number(&min_stoichiometry_key(side))?;

            contributed.insert(
                format!("{} electrode loading [A.h.cm-2]", side.capitalized()),
                loading / SQUARE_CENTIMETRES_PER_SQUARE_METRE,
            );
            contributed.insert(electrode_capacity_key(side), capacity);
            contributed.insert(
                format!("Cell capacity from {} electrode [A.h]", side),
                capacity * window,
            );
            electrode_capacities[index] = capacity;
            cell_capacities[index] = capacity * window;
        }

        let u_n = Curve::ocp(parameters, Side::Negative)?;
        let u_p = Curve::ocp(parameters, Side::Positive)?;
        let [q_n, q_p] = electrode_capacities;

        contributed.insert(UPPER_VOLTAGE, u_p.at(limits.y_100) - u_n.at(limits.x_100));
        contributed.insert(LOWER_VOLTAGE, u_p.at(limits.y_0) - u_n.at(limits.x_0));
        contributed.insert(CYCLABLE_LITHIUM, q_n * limits.x_100 + q_p * limits.y_100);
        contributed.insert(NOMINAL_CAPACITY, (cell_capacities[0] + cell_capacities[1]) / 2.0);
        Ok(contributed)
    }
}

/// Initial electrode concentrations for the target `Initial SOC`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialSoc;

impl Stage for InitialSoc {
    fn source(&self) -> &str {
        "Initial concentrations for a target SOC"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let limits = StoichiometryLimits::from_parameters(parameters)?;
        let soc = parameters.number(INITIAL_SOC)?;
        let (x, y) = limits.at_soc(soc);

        let c_n_max = parameters.number(&max_concentration_key(Side::Negative))?;
        let c_p_max = parameters.number(&max_concentration_key(Side::Positive))?;
        Ok(ParameterSet::new()
            .with(initial_concentration_key(Side::Negative), x * c_n_max)
            .with(initial_concentration_key(Side::Positive), y * c_p_max))
    }
}

/// Which whole-cell quantity pins the electrode state-of-health solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownValue {
    /// `Nominal cell capacity [A.h]`
    CellCapacity,
    /// `Cyclable lithium capacity [A.h]`
    CyclableLithium,
}

/// Electrode state-of-health (eSOH) solve for the stoichiometry window.
///
/// Finds the window in which the cell voltage spans
/// [`Lower voltage cut-off`, `Upper voltage cut-off`] given electrode
/// capacities from geometry and one known cell quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectrodeSoh {
    known: KnownValue,
}

impl ElectrodeSoh {
    pub fn new(known: KnownValue) -> Self {
        Self { known }
    }

    pub fn known(&self) -> KnownValue {
        self.known
    }
}

impl Default for ElectrodeSoh {
    fn default() -> Self {
        Self::new(KnownValue::CellCapacity)
    }
}

impl Stage for ElectrodeSoh {
    fn source(&self) -> &str {
        match self.known {
            KnownValue::CellCapacity => {
                "Calculation of electrode SOH variables from target capacity"
            }
            KnownValue::CyclableLithium => {
                "Calculation of electrode SOH variables from cyclable lithium capacity"
            }
        }
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let problem = EsohProblem::from_parameters(parameters)?;
        let solver = BrentSolver::default();

        let limits = match self.known {
            KnownValue::CellCapacity => {
                problem.solve_for_capacity(&solver, parameters.number(NOMINAL_CAPACITY)?)?
            }
            KnownValue::CyclableLithium => problem
                .solve_for_cyclable_lithium(&solver, parameters.number(CYCLABLE_LITHIUM)?)?,
        };

        let c_n_max = parameters.number(&max_concentration_key(Side::Negative))?;
        let c_p_max = parameters.number(&max_concentration_key(Side::Positive))?;
        Ok(limits.into_parameters(c_n_max, c_p_max))
    }
}

struct EsohProblem<'a> {
    u_n: Curve<'a>,
    u_p: Curve<'a>,
    q_n: f64,
    q_p: f64,
    v_min: f64,
    v_max: f64,
}

impl<'a> EsohProblem<'a> {
    fn from_parameters(parameters: ParameterView<'a>) -> ParamResult<Self> {
        let area = electrode_area(parameters)?;
        Ok(Self {
            u_n: Curve::ocp(parameters, Side::Negative)?,
            u_p: Curve::ocp(parameters, Side::Positive)?,
            q_n: areal_capacity(parameters, Side::Negative)? * area,
            q_p: areal_capacity(parameters, Side::Positive)? * area,
            v_min: parameters.number(LOWER_VOLTAGE)?,
            v_max: parameters.number(UPPER_VOLTAGE)?,
        })
    }

    fn cell_voltage(&self, x: f64, y: f64) -> f64 {
        self.u_p.at(y) - self.u_n.at(x)
    }

    /// x_100 - x_0 = C / Q_n and y_0 - y_100 = C / Q_p, with both voltage
    /// limits met. For a trial x_100 the upper limit fixes y_100; the lower
    /// limit residual then drives the outer solve.
    fn solve_for_capacity(
        &self,
        solver: &dyn RootFindingApi,
        capacity: f64,
    ) -> ParamResult<StoichiometryLimits> {
        let dx = capacity / self.q_n;
        let dy = capacity / self.q_p;
        if !(dx < 1.0 && dy < 1.0) {
            return Err(ParamError::computation(
                "RUN.ESOH_INFEASIBLE",
                format!(
                    "cell capacity {} A.h exceeds an electrode capacity (negative {} A.h, positive {} A.h)",
                    capacity, self.q_n, self.q_p
                ),
            ));
        }

        let full_positive = |x_100: f64| {
            solver.find_root(
                &mut |y_100| self.cell_voltage(x_100, y_100) - self.v_max,
                Bracket::new(0.0, 1.0 - dy),
            )
        };

        let mut inner_failure: Option<RootFindError> = None;
        let mut lower_limit_residual = |x_100: f64| match full_positive(x_100) {
            Ok(y_100) => self.cell_voltage(x_100 - dx, y_100 + dy) - self.v_min,
            Err(error) => {
                inner_failure.get_or_insert(error);
                f64::NAN
            }
        };
        let outer = solver.find_root(&mut lower_limit_residual, Bracket::new(dx, 1.0));
        let x_100 = match outer {
            Ok(x_100) => x_100,
            Err(error) => return Err(inner_failure.unwrap_or(error).into()),
        };

        let y_100 = full_positive(x_100)?;
        Ok(StoichiometryLimits {
            x_0: x_100 - dx,
            x_100,
            y_100,
            y_0: y_100 + dy,
        })
    }

    /// Q_n * x + Q_p * y = Q_Li holds at both ends of the window, so each
    /// voltage limit is a one-dimensional solve in x.
    fn solve_for_cyclable_lithium(
        &self,
        solver: &dyn RootFindingApi,
        cyclable_lithium: f64,
    ) -> ParamResult<StoichiometryLimits> {
        let lower = ((cyclable_lithium - self.q_p) / self.q_n).max(0.0);
        let upper = (cyclable_lithium / self.q_n).min(1.0);
        if !(lower < upper) {
            return Err(ParamError::computation(
                "RUN.ESOH_INFEASIBLE",
                format!(
                    "cyclable lithium {} A.h is incompatible with electrode capacities (negative {} A.h, positive {} A.h)",
                    cyclable_lithium, self.q_n, self.q_p
                ),
            ));
        }

        let positive_for = |x: f64| (cyclable_lithium - self.q_n * x) / self.q_p;
        let bracket = Bracket::new(lower, upper);
        let x_100 = solver.find_root(
            &mut |x| self.cell_voltage(x, positive_for(x)) - self.v_max,
            bracket,
        )?;
        let x_0 = solver.find_root(
            &mut |x| self.cell_voltage(x, positive_for(x)) - self.v_min,
            bracket,
        )?;

        Ok(StoichiometryLimits {
            x_0,
            x_100,
            y_100: positive_for(x_100),
            y_0: positive_for(x_0),
        })
    }
}
