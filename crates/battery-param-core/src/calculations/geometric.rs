use super::{
    ELECTRODE_AREA, ELECTRODE_HEIGHT, ELECTRODE_WIDTH, electrode_area, electrode_capacity_key,
    max_concentration_key, thickness_key, volume_fraction_key,
};
use crate::common::constants::{AMP_HOURS_PER_MOLE, SQUARE_CENTIMETRES_PER_SQUARE_METRE};
use crate::domain::{ParamResult, Side, StageKind};
use crate::parameters::{ParameterSet, ParameterView};
use crate::pipeline::Stage;

/// Square electrode: height = width = sqrt(area).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaToSquareWidthHeight;

impl Stage for AreaToSquareWidthHeight {
    fn source(&self) -> &str {
        "Setting electrode height and width to be the square root of area"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let side_length = parameters.number(ELECTRODE_AREA)?.sqrt();
        Ok(ParameterSet::new()
            .with(ELECTRODE_HEIGHT, side_length)
            .with(ELECTRODE_WIDTH, side_length))
    }
}

/// Active material volume fraction implied by the electrode loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectrodeVolumeFractionFromLoading {
    sides: Vec<Side>,
}

impl ElectrodeVolumeFractionFromLoading {
    pub fn both() -> Self {
        Self {
            sides: Side::BOTH.to_vec(),
        }
    }

    pub fn side(side: Side) -> Self {
        Self { sides: vec![side] }
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }
}

impl Default for ElectrodeVolumeFractionFromLoading {
    fn default() -> Self {
        Self::both()
    }
}

impl Stage for ElectrodeVolumeFractionFromLoading {
    fn source(&self) -> &str {
        "Calculation of electrode volume fraction from loading"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let area = electrode_area(parameters)?;

        let mut contributed = ParameterSet::new();
        for side in &self.sides {
            let thickness = parameters.number(&thickness_key(*side))?;
            let c_max = parameters.number(&max_concentration_key(*side))?;
            let loading = parameters.number(&format!(
                "{} electrode loading [A.h.cm-2]",
                side.capitalized()
            ))?;

            let capacity = loading * area * SQUARE_CENTIMETRES_PER_SQUARE_METRE;
            let theoretical = area * thickness * c_max * AMP_HOURS_PER_MOLE;
            contributed.insert(electrode_capacity_key(*side), capacity);
            contributed.insert(volume_fraction_key(*side), capacity / theoretical);
        }
        Ok(contributed)
    }
}

/// Surface area to volume ratio of spherical particles, a = 3 * eps / R.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceArea;

impl Stage for SurfaceArea {
    fn source(&self) -> &str {
        "Calculation of surface area to volume ratio from particle radius and active material volume fraction"
    }

    fn kind(&self) -> StageKind {
        StageKind::Calculation
    }

    fn run(&self, parameters: ParameterView<'_>) -> ParamResult<ParameterSet> {
        let mut contributed = ParameterSet::new();
        for side in Side::BOTH {
            let volume_fraction = parameters.number(&volume_fraction_key(side))?;
            let radius =
                parameters.number(&format!("{} particle radius [m]", side.capitalized()))?;
            contributed.insert(
                format!(
                    "{} electrode surface area to volume ratio [m-1]",
                    side.capitalized()
                ),
                3.0 * volume_fraction / radius,
            );
        }
        Ok(contributed)
    }
}
