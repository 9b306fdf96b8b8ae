//! LG MJ1 (NMC811 / graphite-SiOx) parameters from Sturm et al. (2018).

use crate::common::constants::FARADAY;
use crate::direct_entries::DirectEntry;
use crate::domain::ParameterFunction;
use crate::parameters::ParameterSet;

pub const SOURCE: &str = "Parameters for a LGMJ1 cell from Sturm et al. (2018)";

const REFERENCE_TEMPERATURE: f64 = 298.15;
const EXCHANGE_ACTIVATION_TEMPERATURE: f64 = 3600.0;

pub fn negative_ocp(sto: f64) -> f64 {
    1.9793 * (-39.3631 * sto).exp() + 0.2482
        - 0.0909 * (29.8538 * (sto - 0.1234)).tanh()
        - 0.04478 * (14.9159 * (sto - 0.2769)).tanh()
        - 0.0205 * (30.4444 * (sto - 0.6103)).tanh()
}

pub fn positive_ocp(sto: f64) -> f64 {
    -0.8090 * sto + 4.4875
        - 0.0428 * (18.5138 * (sto - 0.5542)).tanh()
        - 17.7326 * (15.7890 * (sto - 0.3117)).tanh()
        + 17.5842 * (15.9308 * (sto - 0.3120)).tanh()
}

fn exchange_current_density(
    rate_constant: f64,
    c_e: f64,
    c_s_surf: f64,
    c_s_max: f64,
    t: f64,
) -> f64 {
    let arrhenius =
        (EXCHANGE_ACTIVATION_TEMPERATURE * (1.0 / REFERENCE_TEMPERATURE - 1.0 / t)).exp();
    rate_constant
        * FARADAY
        * arrhenius
        * c_e.sqrt()
        * c_s_surf.sqrt()
        * (c_s_max - c_s_surf).sqrt()
}

pub fn negative_exchange_current_density(c_e: f64, c_s_surf: f64, c_s_max: f64, t: f64) -> f64 {
    exchange_current_density(1.0e-11, c_e, c_s_surf, c_s_max, t)
}

pub fn positive_exchange_current_density(c_e: f64, c_s_surf: f64, c_s_max: f64, t: f64) -> f64 {
    exchange_current_density(3.0e-11, c_e, c_s_surf, c_s_max, t)
}

/// Valoen and Reimers (2005); `ln` in the paper is log10.
pub fn electrolyte_diffusivity_valoen2005(c_e: f64, t: f64) -> f64 {
    let c_e = c_e / 1000.0;
    let t_g = 229.0 + 5.0 * c_e;
    let d_0 = -4.43 - 54.0 / (t - t_g);
    let d_1 = -0.22;
    10f64.powf(d_0 + d_1 * c_e) * 1.0e-4
}

pub fn electrolyte_conductivity_valoen2005(c_e: f64, t: f64) -> f64 {
    let c_e = c_e / 1000.0;
    let polynomial = (-10.5 + 0.0740 * t - 6.96e-5 * t * t)
        + c_e * (0.668 - 0.0178 * t + 2.80e-5 * t * t)
        + c_e * c_e * (0.494 - 8.86e-4 * t);
    // mS/cm to S/m
    0.1 * c_e * polynomial * polynomial
}

pub fn parameters() -> ParameterSet {
    ParameterSet::new()
        // negative electrode
        .with("Maximum concentration in negative electrode [mol.m-3]", 34_684.0)
        .with("Negative electrode thickness [m]", 86.7e-6)
        .with("Negative electrode active material volume fraction", 0.694)
        .with("Negative electrode porosity", 0.216)
        .with(
            "Negative electrode OCP [V]",
            ParameterFunction::unary("negative_ocp", negative_ocp).with_expression(
                "1.9793 * exp(-39.3631 * sto) + 0.2482\n\
                 - 0.0909 * tanh(29.8538 * (sto - 0.1234))\n\
                 - 0.04478 * tanh(14.9159 * (sto - 0.2769))\n\
                 - 0.0205 * tanh(30.4444 * (sto - 0.6103))",
            ),
        )
        .with(
            "Negative electrode exchange-current density [A.m-2]",
            ParameterFunction::quaternary(
                "negative_exchange_current_density",
                negative_exchange_current_density,
            )
            .with_expression(
                "1e-11 * F * exp(3600 * (1 / 298.15 - 1 / T))\n\
                 * c_e^0.5 * c_s_surf^0.5 * (c_s_max - c_s_surf)^0.5",
            ),
        )
        .with("Negative electrode OCP entropic change [V.K-1]", 0.0)
        .with("Negative particle radius [m]", 6.1e-6)
        .with("Negative electrode Bruggeman coefficient (electrolyte)", 1.5)
        .with("Negative electrode Bruggeman coefficient (electrode)", 1.5)
        .with("Negative electrode conductivity [S.m-1]", 100.0)
        .with("Negative electrode diffusivity [m2.s-1]", 5.0e-14)
        // separator
        .with("Separator thickness [m]", 12.0e-6)
        .with("Separator porosity", 0.45)
        .with("Separator Bruggeman coefficient (electrolyte)", 1.5)
        // positive electrode
        .with("Maximum concentration in positive electrode [mol.m-3]", 50_060.0)
        .with("Positive electrode thickness [m]", 66.2e-6)
        .with("Positive electrode active material volume fraction", 0.745)
        .with("Positive electrode porosity", 0.171)
        .with(
            "Positive electrode OCP [V]",
            ParameterFunction::unary("positive_ocp", positive_ocp).with_expression(
                "-0.8090 * sto + 4.4875\n\
                 - 0.0428 * tanh(18.5138 * (sto - 0.5542))\n\
                 - 17.7326 * tanh(15.7890 * (sto - 0.3117))\n\
                 + 17.5842 * tanh(15.9308 * (sto - 0.3120))",
            ),
        )
        .with(
            "Positive electrode exchange-current density [A.m-2]",
            ParameterFunction::quaternary(
                "positive_exchange_current_density",
                positive_exchange_current_density,
            )
            .with_expression(
                "3e-11 * F * exp(3600 * (1 / 298.15 - 1 / T))\n\
                 * c_e^0.5 * c_s_surf^0.5 * (c_s_max - c_s_surf)^0.5",
            ),
        )
        .with("Positive electrode OCP entropic change [V.K-1]", 0.0)
        .with("Positive particle radius [m]", 3.8e-6)
        .with("Positive electrode Bruggeman coefficient (electrolyte)", 1.85)
        .with("Positive electrode Bruggeman coefficient (electrode)", 1.85)
        .with("Positive electrode conductivity [S.m-1]", 0.17)
        .with("Positive electrode diffusivity [m2.s-1]", 5.0e-13)
        // electrolyte
        .with("Typical electrolyte concentration [mol.m-3]", 1000.0)
        .with("Initial concentration in electrolyte [mol.m-3]", 1000.0)
        .with("Cation transference number", 0.38)
        .with(
            "Electrolyte diffusivity [m2.s-1]",
            ParameterFunction::binary(
                "electrolyte_diffusivity_Valoen2005",
                electrolyte_diffusivity_valoen2005,
            )
            .with_expression(
                "c = c_e / 1000\n\
                 1e-4 * 10^(-4.43 - 54 / (T - (229 + 5 * c)) - 0.22 * c)",
            ),
        )
        .with(
            "Electrolyte conductivity [S.m-1]",
            ParameterFunction::binary(
                "electrolyte_conductivity_Valoen2005",
                electrolyte_conductivity_valoen2005,
            )
            .with_expression(
                "c = c_e / 1000\n\
                 0.1 * c * ((-10.5 + 0.0740 T - 6.96e-5 T^2)\n\
                 + c (0.668 - 0.0178 T + 2.80e-5 T^2)\n\
                 + c^2 (0.494 - 8.86e-4 T))^2",
            ),
        )
        .with("1 + dlnf/dlnc", 1.0)
        // cell
        .with("Electrode height [m]", 5.8e-2)
        .with("Electrode width [m]", 61.5e-2 * 2.0)
        .with("Lower voltage cut-off [V]", 2.5)
        .with("Upper voltage cut-off [V]", 4.2)
        .with("Typical current [A]", 3.35)
        .with("Current function [A]", 3.35)
        .with("Nominal cell capacity [A.h]", 3.35)
}

pub fn sturm2018() -> DirectEntry {
    DirectEntry::new(parameters(), SOURCE)
}
