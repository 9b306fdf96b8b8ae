#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: f64,
    pub upper: f64,
}

impl Bracket {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RootFindError {
    #[error("root bracket must be finite with lower < upper, got [{lower}, {upper}]")]
    InvalidBracket { lower: f64, upper: f64 },
    #[error(
        "objective does not change sign on [{lower}, {upper}]: f(lower)={f_lower}, f(upper)={f_upper}"
    )]
    NoSignChange {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },
    #[error("objective returned a non-finite value at x={x}")]
    NonFiniteEvaluation { x: f64 },
    #[error(
        "root search did not converge after {iterations} iterations (last estimate {estimate})"
    )]
    NoConvergence { iterations: usize, estimate: f64 },
}

pub trait RootFindingApi {
    fn find_root(
        &self,
        objective: &mut dyn FnMut(f64) -> f64,
        bracket: Bracket,
    ) -> Result<f64, RootFindError>;
}

/// Brent's method: inverse quadratic interpolation and secant steps guarded
/// by bisection on a sign-changing bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrentSolver {
    pub abs_tolerance: f64,
    pub rel_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BrentSolver {
    fn default() -> Self {
        Self {
            abs_tolerance: 1.0e-30,
            rel_tolerance: 1.0e-12,
            max_iterations: 200,
        }
    }
}

impl RootFindingApi for BrentSolver {
    fn find_root(
        &self,
        objective: &mut dyn FnMut(f64) -> f64,
        bracket: Bracket,
    ) -> Result<f64, RootFindError> {
        validate_bracket(bracket)?;

        let mut a = bracket.lower;
        let mut b = bracket.upper;
        let mut fa = evaluate(objective, a)?;
        let mut fb = evaluate(objective, b)?;

        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(RootFindError::NoSignChange {
                lower: a,
                upper: b,
                f_lower: fa,
                f_upper: fb,
            });
        }

        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.max_iterations {
            if fb.signum() == fc.signum() {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tolerance = 2.0 * f64::EPSILON * b.abs()
                + 0.5 * (self.abs_tolerance + self.rel_tolerance * b.abs());
            let midpoint = 0.5 * (c - b);
            if midpoint.abs() <= tolerance || fb == 0.0 {
                return Ok(b);
            }

            if e.abs() >= tolerance && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * midpoint * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * midpoint * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                } else {
                    p = -p;
                }

                let interpolation_limit = 3.0 * midpoint * q - (tolerance * q).abs();
                let previous_step_limit = (e * q).abs();
                if 2.0 * p < interpolation_limit.min(previous_step_limit) {
                    e = d;
                    d = p / q;
                } else {
                    d = midpoint;
                    e = d;
                }
            } else {
                d = midpoint;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tolerance {
                d
            } else {
                tolerance.copysign(midpoint)
            };
            fb = evaluate(objective, b)?;
        }

        Err(RootFindError::NoConvergence {
            iterations: self.max_iterations,
            estimate: b,
        })
    }
}

/// Grows `bracket.upper` geometrically (keeping `lower`) until the objective
/// changes sign, giving up after `max_expansions` steps.
pub fn expand_bracket(
    objective: &mut dyn FnMut(f64) -> f64,
    bracket: Bracket,
    factor: f64,
    max_expansions: usize,
) -> Result<Bracket, RootFindError> {
    validate_bracket(bracket)?;

    let f_lower = evaluate(objective, bracket.lower)?;
    let mut upper = bracket.upper;
    let mut f_upper = evaluate(objective, upper)?;

    for _ in 0..max_expansions {
        if f_lower == 0.0 || f_upper == 0.0 || f_lower.signum() != f_upper.signum() {
            return Ok(Bracket::new(bracket.lower, upper));
        }
        upper = bracket.lower + (upper - bracket.lower) * factor;
        f_upper = evaluate(objective, upper)?;
    }

    if f_lower.signum() != f_upper.signum() {
        return Ok(Bracket::new(bracket.lower, upper));
    }
    Err(RootFindError::NoSignChange {
        lower: bracket.lower,
        upper,
        f_lower,
        f_upper,
    })
}

fn validate_bracket(bracket: Bracket) -> Result<(), RootFindError> {
    if !bracket.lower.is_finite() || !bracket.upper.is_finite() || bracket.lower >= bracket.upper {
        return Err(RootFindError::InvalidBracket {
            lower: bracket.lower,
            upper: bracket.upper,
        });
    }
    Ok(())
}

fn evaluate(objective: &mut dyn FnMut(f64) -> f64, x: f64) -> Result<f64, RootFindError> {
    let value = objective(x);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RootFindError::NonFiniteEvaluation { x })
    }
}
