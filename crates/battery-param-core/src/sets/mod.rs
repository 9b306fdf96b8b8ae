//! Literature parameter sets and the preset pipelines assembled from them.

pub mod presets;
pub mod schimpe2018;
pub mod sturm2018;

pub use presets::{Preset, PresetOptions};
pub use schimpe2018::schimpe2018;
pub use sturm2018::sturm2018;

use crate::direct_entries::DirectEntry;
use crate::parameters::ParameterSet;

pub fn standard_sei_parameters() -> DirectEntry {
    let parameters = ParameterSet::new()
        .with("Ratio of lithium moles to SEI moles", 2.0)
        .with("SEI partial molar volume [m3.mol-1]", 9.585e-5)
        .with("Bulk solvent concentration [mol.m-3]", 2636.0)
        .with("Lithium interstitial reference concentration [mol.m-3]", 15.0)
        .with("EC initial concentration in electrolyte [mol.m-3]", 4541.0)
        .with("SEI open-circuit potential [V]", 0.4)
        .with("SEI growth activation energy [J.mol-1]", 0.0)
        .with("SEI growth transfer coefficient", 0.5);
    DirectEntry::new(parameters, "Standard parameters for SEI")
}
