//! Graphite / LFP parameters from Schimpe et al. (2018).

use crate::direct_entries::DirectEntry;
use crate::domain::ParameterFunction;
use crate::parameters::ParameterSet;

pub const SOURCE: &str = "Parameters for a graphite-LFP system from Schimpe et al. (2018)";

pub fn negative_ocp(sto: f64) -> f64 {
    0.6379 + 0.5416 * (-305.5309 * sto).exp() + 0.044 * (-(sto - 0.1958) / 0.1088).tanh()
        - 0.1978 * ((sto - 1.0571) / 0.0854).tanh()
        - 0.6875 * ((sto + 0.0117) / 0.0529).tanh()
        - 0.0175 * ((sto - 0.5692) / 0.0875).tanh()
}

pub fn positive_ocp(sto: f64) -> f64 {
    let delithiated = 1.0 - sto;
    3.4323 - 0.8428 * (-80.2493 * delithiated.powf(1.3198)).exp()
        - 3.2474e-6 * (20.2645 * delithiated.powf(3.8003)).exp()
        + 3.2482e-6 * (20.2646 * delithiated.powf(3.7995)).exp()
}

pub fn parameters() -> ParameterSet {
    ParameterSet::new()
        // negative electrode
        .with("Maximum concentration in negative electrode [mol.m-3]", 3.14e4)
        .with("Negative electrode thickness [m]", 6.01e-5)
        .with("Negative electrode active material volume fraction", 0.486)
        .with(
            "Negative electrode OCP [V]",
            ParameterFunction::unary("negative_ocp", negative_ocp).with_expression(
                "0.6379 + 0.5416 * exp(-305.5309 * sto)\n\
                 + 0.044 * tanh(-(sto - 0.1958) / 0.1088)\n\
                 - 0.1978 * tanh((sto - 1.0571) / 0.0854)\n\
                 - 0.6875 * tanh((sto + 0.0117) / 0.0529)\n\
                 - 0.0175 * tanh((sto - 0.5692) / 0.0875)",
            ),
        )
        .with("Negative electrode OCP entropic change [V.K-1]", 0.0)
        .with("Maximum stoichiometry in negative electrode", 0.78)
        .with("Minimum stoichiometry in negative electrode", 0.0085)
        .with("Negative particle radius [m]", 1.0e-6)
        // positive electrode
        .with("Maximum concentration in positive electrode [mol.m-3]", 2.28e4)
        .with("Positive electrode thickness [m]", 7.9e-5)
        .with("Positive electrode active material volume fraction", 0.455)
        .with(
            "Positive electrode OCP [V]",
            ParameterFunction::unary("positive_ocp", positive_ocp).with_expression(
                "3.4323 - 0.8428 * exp(-80.2493 * (1 - sto)^1.3198)\n\
                 - 3.2474e-6 * exp(20.2645 * (1 - sto)^3.8003)\n\
                 + 3.2482e-6 * exp(20.2646 * (1 - sto)^3.7995)",
            ),
        )
        .with("Positive electrode OCP entropic change [V.K-1]", 0.0)
        .with("Minimum stoichiometry in positive electrode", 0.045)
        .with("Maximum stoichiometry in positive electrode", 0.916)
        .with("Positive particle radius [m]", 1.0e-6)
        // cell
        .with("Electrode area [m2]", 1.57e-1)
        .with("Initial SOC", 1.0)
}

pub fn schimpe2018() -> DirectEntry {
    DirectEntry::new(parameters(), SOURCE)
}

#[cfg(test)]
mod tests {
    use super::{negative_ocp, positive_ocp, schimpe2018};
    use crate::pipeline::Stage;

    #[test]
    fn lfp_plateau_is_flat_and_graphite_is_low() {
        assert!((positive_ocp(0.5) - 3.43).abs() < 0.01);
        assert!((positive_ocp(0.2) - positive_ocp(0.8)).abs() < 0.05);
        assert!(negative_ocp(0.78) > 0.05 && negative_ocp(0.78) < 0.15);
        assert!(negative_ocp(0.0085) > negative_ocp(0.5));
    }

    #[test]
    fn direct_entry_carries_the_stoichiometry_window() {
        let entry = schimpe2018();
        let parameters = entry.parameters().view();
        assert_eq!(
            parameters
                .number("Maximum stoichiometry in negative electrode")
                .expect("x_100"),
            0.78
        );
        assert_eq!(parameters.number("Initial SOC").expect("soc"), 1.0);
        assert_eq!(parameters.len(), 18);
        assert!(entry.source().contains("Schimpe et al. (2018)"));
    }
}
