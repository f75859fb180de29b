//! Linear time-history response to ground acceleration by the Newmark-β method.
//!
//! For stiffness `K`, mass `M` and damping `C` (typically the Rayleigh matrix from
//! [`crate::ModalAnalysis::rayleigh_damping`]), the relative displacement `u` of a structure
//! whose base moves with acceleration `a_g(t)` satisfies
//!
//! ```text
//! M u'' + C u' + K u = -M ι a_g(t)
//! ```
//!
//! where `ι` is the influence vector (all ones for a shear building shaken horizontally).
//! The incremental Newmark scheme solves the effective system
//!
//! ```text
//! K̂ Δu = Δp̂,   K̂ = K + γ/(βΔt) C + 1/(βΔt²) M
//! ```
//!
//! once per step. `K̂` is symmetric positive-definite whenever `M` is and `K`, `C` are
//! positive semi-definite, so it is factorized once with the same Cholesky kernel the
//! eigensolver uses. Accelerations are recomputed from equilibrium after every step so
//! round-off in the increments cannot accumulate into the acceleration history.

use crate::{
    algorithms::cholesky::{self, CholeskyFactor},
    error::{EigenError, EigenErrorKind},
    matrix::DenseMatrix,
};
use faer::Mat;

/// Integration parameters of the Newmark family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewmarkParams {
    /// Time step `Δt` between ground-motion samples.
    pub time_step: f64,
    /// `γ`; `1/2` avoids numerical damping.
    pub gamma: f64,
    /// `β`; `1/4` with `γ = 1/2` is the unconditionally stable average-acceleration method.
    pub beta: f64,
}

impl NewmarkParams {
    /// The constant average-acceleration method (`γ = 1/2`, `β = 1/4`).
    pub fn average_acceleration(time_step: f64) -> Self {
        Self {
            time_step,
            gamma: 0.5,
            beta: 0.25,
        }
    }

    /// The linear-acceleration method (`γ = 1/2`, `β = 1/6`), conditionally stable.
    pub fn linear_acceleration(time_step: f64) -> Self {
        Self {
            time_step,
            gamma: 0.5,
            beta: 1.0 / 6.0,
        }
    }

    fn validate(&self) -> Result<(), EigenError> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(EigenErrorKind::InputError(format!(
                "time step must be finite and positive, got {}",
                self.time_step
            ))
            .into());
        }
        if !(self.gamma.is_finite() && self.beta.is_finite() && self.beta > 0.0) {
            return Err(EigenErrorKind::InputError(format!(
                "Newmark parameters must be finite with beta > 0, got gamma={} beta={}",
                self.gamma, self.beta
            ))
            .into());
        }
        Ok(())
    }
}

/// Response history, one state per ground-motion sample.
///
/// `displacement[s][i]` is the relative displacement of degree of freedom `i` at time
/// `s * time_step`; likewise for velocity and acceleration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHistory {
    pub time_step: f64,
    pub displacement: Vec<Vec<f64>>,
    pub velocity: Vec<Vec<f64>>,
    pub acceleration: Vec<Vec<f64>>,
}

impl ResponseHistory {
    /// Number of recorded states.
    pub fn len(&self) -> usize {
        self.displacement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displacement.is_empty()
    }

    /// Largest absolute displacement of each degree of freedom over the whole history.
    pub fn peak_displacements(&self) -> Vec<f64> {
        let n = self.displacement.first().map_or(0, Vec::len);
        (0..n)
            .map(|i| {
                self.displacement
                    .iter()
                    .fold(0.0_f64, |acc, state| acc.max(state[i].abs()))
            })
            .collect()
    }
}

/// Integrates the response of `(K, M, C)` to the sampled ground acceleration, starting at rest.
///
/// `ground_acceleration[s]` is the base acceleration at time `s * params.time_step`; the
/// influence vector is all ones.
pub fn ground_motion_response(
    stiffness: &DenseMatrix,
    mass: &DenseMatrix,
    damping: &DenseMatrix,
    ground_acceleration: &[f64],
    params: &NewmarkParams,
) -> Result<ResponseHistory, EigenError> {
    params.validate()?;
    let n = mass.dim();
    for other in [stiffness.dim(), damping.dim()] {
        if other != n {
            return Err(EigenErrorKind::DimensionMismatch { a: other, b: n }.into());
        }
    }
    if let Some(step) = ground_acceleration.iter().position(|a| !a.is_finite()) {
        return Err(EigenErrorKind::InputError(format!(
            "ground acceleration sample {step} is not finite"
        ))
        .into());
    }

    let NewmarkParams {
        time_step: dt,
        gamma,
        beta,
    } = *params;
    let (k, m, c) = (stiffness.as_faer(), mass.as_faer(), damping.as_faer());

    let mass_factor = cholesky::factorize(m, f64::EPSILON)?;
    let effective = Mat::from_fn(n, n, |i, j| {
        k[(i, j)] + gamma / (beta * dt) * c[(i, j)] + m[(i, j)] / (beta * dt * dt)
    });
    let effective_factor = cholesky::factorize(effective.as_ref(), f64::EPSILON)?;
    log::debug!(
        "Newmark integration of {n} degree(s) of freedom over {} step(s), dt = {dt}, gamma = {gamma}, beta = {beta}",
        ground_acceleration.len().saturating_sub(1)
    );

    let mut history = ResponseHistory {
        time_step: dt,
        displacement: Vec::with_capacity(ground_acceleration.len()),
        velocity: Vec::with_capacity(ground_acceleration.len()),
        acceleration: Vec::with_capacity(ground_acceleration.len()),
    };
    let Some((&first, rest)) = ground_acceleration.split_first() else {
        return Ok(history);
    };

    let mut u = vec![0.0; n];
    let mut v = vec![0.0; n];
    let mut a = equilibrium_acceleration(stiffness, mass, damping, &mass_factor, &u, &v, first);
    history.displacement.push(u.clone());
    history.velocity.push(v.clone());
    history.acceleration.push(a.clone());

    let mut previous = first;
    for &current in rest {
        // Δp̂ = -M ι Δa_g + (M/(βΔt) + γ/β C) v + (M/(2β) + Δt(γ/(2β) - 1) C) a
        let inertia: Vec<f64> = (0..n)
            .map(|i| v[i] / (beta * dt) + a[i] / (2.0 * beta))
            .collect();
        let viscous: Vec<f64> = (0..n)
            .map(|i| gamma / beta * v[i] + dt * (gamma / (2.0 * beta) - 1.0) * a[i])
            .collect();
        let m_inertia = mass.apply(&inertia);
        let c_viscous = damping.apply(&viscous);
        let m_iota = mass.apply(&vec![1.0; n]);
        let rhs: Vec<f64> = (0..n)
            .map(|i| -m_iota[i] * (current - previous) + m_inertia[i] + c_viscous[i])
            .collect();

        let du = effective_factor.solve(&rhs);
        for i in 0..n {
            let dv = gamma / (beta * dt) * du[i] - gamma / beta * v[i]
                + dt * (1.0 - gamma / (2.0 * beta)) * a[i];
            u[i] += du[i];
            v[i] += dv;
        }
        a = equilibrium_acceleration(stiffness, mass, damping, &mass_factor, &u, &v, current);

        history.displacement.push(u.clone());
        history.velocity.push(v.clone());
        history.acceleration.push(a.clone());
        previous = current;
    }

    Ok(history)
}

/// Solves `M a = -M ι a_g - C v - K u` for the relative acceleration.
fn equilibrium_acceleration(
    stiffness: &DenseMatrix,
    mass: &DenseMatrix,
    damping: &DenseMatrix,
    mass_factor: &CholeskyFactor,
    u: &[f64],
    v: &[f64],
    ground: f64,
) -> Vec<f64> {
    let n = u.len();
    let m_iota = mass.apply(&vec![1.0; n]);
    let ku = stiffness.apply(u);
    let cv = damping.apply(v);
    let rhs: Vec<f64> = (0..n)
        .map(|i| -m_iota[i] * ground - cv[i] - ku[i])
        .collect();
    mass_factor.solve(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::ModalAnalysis;
    use std::f64::consts::PI;

    fn two_storey() -> (DenseMatrix, DenseMatrix) {
        let k = DenseMatrix::from_rows(&[[364.8, -182.4], [-182.4, 182.4]]).unwrap();
        let m = DenseMatrix::from_rows(&[[0.407, 0.0], [0.0, 0.407]]).unwrap();
        (k, m)
    }

    #[test]
    fn test_undamped_oscillator_matches_closed_form() {
        // u'' + ω² u = 1 from rest: u(t) = (1 - cos ωt) / ω².
        let omega = 2.0 * PI;
        let k = DenseMatrix::from_rows(&[[omega * omega]]).unwrap();
        let m = DenseMatrix::identity(1).unwrap();
        let c = DenseMatrix::zeros(1).unwrap();
        let dt = 1.0 / 200.0;
        let ground = vec![-1.0; 401];

        let history =
            ground_motion_response(&k, &m, &c, &ground, &NewmarkParams::average_acceleration(dt))
                .unwrap();
        assert_eq!(history.len(), 401);
        assert_eq!(history.acceleration[0], vec![1.0]);

        let amplitude = 1.0 / (omega * omega);
        for (s, state) in history.displacement.iter().enumerate() {
            let t = s as f64 * dt;
            let exact = amplitude * (1.0 - (omega * t).cos());
            assert!(
                (state[0] - exact).abs() < 2e-3 * amplitude,
                "step {s}: {} vs {exact}",
                state[0]
            );
        }
        // Average acceleration neither adds nor removes energy.
        let peak = history.peak_displacements()[0];
        assert!((peak - 2.0 * amplitude).abs() < 1e-3 * amplitude);
    }

    #[test]
    fn test_damped_frame_settles_at_static_deflection() {
        let (k, m) = two_storey();
        let modal = ModalAnalysis::from_matrices(&k, &m).unwrap();
        let c = modal.rayleigh_damping(&k, &m, 1.0, 0, 1).unwrap();
        let ground = vec![-1.0; 2001];

        let history = ground_motion_response(
            &k,
            &m,
            &c,
            &ground,
            &NewmarkParams::average_acceleration(0.005),
        )
        .unwrap();

        // K u = M ι, and [[2, -1], [-1, 1]]^{-1} = [[1, 1], [1, 2]].
        let unit = 0.407 / 182.4;
        let last = history.displacement.last().unwrap();
        assert!((last[0] - 2.0 * unit).abs() < 1e-8 * unit);
        assert!((last[1] - 3.0 * unit).abs() < 1e-8 * unit);
        assert!(history.velocity.last().unwrap().iter().all(|v| v.abs() < 1e-8));
    }

    #[test]
    fn test_linear_acceleration_tracks_average_acceleration() {
        let (k, m) = two_storey();
        let modal = ModalAnalysis::from_matrices(&k, &m).unwrap();
        let c = modal.rayleigh_damping(&k, &m, 0.05, 0, 1).unwrap();
        let ground: Vec<f64> = (0..500).map(|s| (s as f64 * 0.002 * 10.0).sin()).collect();

        let average =
            ground_motion_response(&k, &m, &c, &ground, &NewmarkParams::average_acceleration(0.002))
                .unwrap();
        let linear =
            ground_motion_response(&k, &m, &c, &ground, &NewmarkParams::linear_acceleration(0.002))
                .unwrap();
        let peak = average.peak_displacements();
        for (p_avg, p_lin) in peak.iter().zip(linear.peak_displacements()) {
            assert!((p_avg - p_lin).abs() < 1e-2 * p_avg, "{p_avg} vs {p_lin}");
        }
    }

    #[test]
    fn test_empty_record_and_bad_input() {
        let (k, m) = two_storey();
        let c = DenseMatrix::zeros(2).unwrap();
        let params = NewmarkParams::average_acceleration(0.01);

        let history = ground_motion_response(&k, &m, &c, &[], &params).unwrap();
        assert!(history.is_empty());

        let err = ground_motion_response(&k, &m, &c, &[0.0, f64::NAN], &params).unwrap_err();
        assert!(matches!(err.kind(), EigenErrorKind::InputError(_)));

        let bad_step = NewmarkParams::average_acceleration(0.0);
        assert!(ground_motion_response(&k, &m, &c, &[0.0], &bad_step).is_err());

        let small = DenseMatrix::identity(1).unwrap();
        let err = ground_motion_response(&k, &m, &small, &[0.0], &params).unwrap_err();
        assert!(matches!(err.kind(), EigenErrorKind::DimensionMismatch { a: 1, b: 2 }));
    }
}
