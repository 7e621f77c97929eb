//! Incident power density estimator
//!
//! For a wire on the x axis carrying current `Is(x)` and a target point `r`:
//!
//! ```text
//! Ex = 1/(j4πωε₀) · ( -∫ Is'(x') ∂G/∂x' dx'  -  γ² ∫ Is(x') G dx' )
//! Hy = 1/(4π)     ·      ∫ Is(x') ∂G/∂z  dx'
//! S  = Ex · conj(Hy)
//! ```
//!
//! with `γ = j√(ω²μ₀ε₀)` and `G = exp(-jkR)/R`. The injected
//! [`GreenGradient`] differentiates with respect to the target point. `G`
//! depends on `r - r'` only, so the source partial in the Ex slope term is
//! `∂G/∂x' = -∂G/∂x`, while Hy uses the target partial `∂G/∂z` directly.
//! Integrals along the wire use a [`CompositeRule`] built once for the
//! source grid.
//!
//! Over a [`TargetGrid`] the real part of `S` is stored in a
//! [`PowerDensityField`], and the absorbed power per standoff plane is
//!
//! ```text
//! S_ab = 1/(2A) ∫∫ Re(S) dx dy
//! ```

use crate::antenna::AntennaCurrent;
use crate::derivative::GreenGradient;
use crate::error::{IpdError, Result};
use crate::target::{FieldPoint, PowerDensityField, TargetGrid};
use math_em_numerics::parallel::try_parallel_map_indexed;
use math_em_numerics::{CompositeRule, CompositeRule2d, HoloborodkoDifferentiator, NumericsError};
use math_em_wave::constants::{EPSILON_0, MU_0};
use math_em_wave::green::green_function_at;
use math_em_wave::{Point, WaveParameters};
use ndarray::{Array1, ArrayView1, Axis};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Numerical settings shared by every cell of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorOptions {
    /// Window size of the composite quadrature rule (2 = trapezoid, 3 = Simpson)
    pub quadrature_n: usize,
    /// Holoborodko stencil length for the current derivative
    pub stencil: usize,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            quadrature_n: 3,
            stencil: HoloborodkoDifferentiator::DEFAULT_LENGTH,
        }
    }
}

/// Field phasors at one target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Electric field, x component
    pub ex: Complex64,
    /// Magnetic field, y component
    pub hy: Complex64,
}

impl FieldSample {
    /// `S = Ex · conj(Hy)`
    pub fn power_density(&self) -> Complex64 {
        self.ex * self.hy.conj()
    }
}

/// Estimator for one antenna current at one frequency.
///
/// Holds only immutable data; every target point is evaluated
/// independently.
pub struct IpdEstimator<'g> {
    antenna: AntennaCurrent,
    current_x: Array1<Complex64>,
    sources: Vec<Point>,
    rule: CompositeRule,
    wave: WaveParameters,
    gradient: &'g dyn GreenGradient,
    options: EstimatorOptions,
    e_prefix: Complex64,
    h_prefix: f64,
    gamma2: Complex64,
}

impl std::fmt::Debug for IpdEstimator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpdEstimator")
            .field("frequency", &self.wave.frequency)
            .field("sources", &self.sources.len())
            .field("gradient", &self.gradient.name())
            .field("options", &self.options)
            .finish()
    }
}

impl<'g> IpdEstimator<'g> {
    /// Prepare the current derivative, quadrature weights and prefactors.
    pub fn new(
        antenna: AntennaCurrent,
        frequency: f64,
        gradient: &'g dyn GreenGradient,
        options: EstimatorOptions,
    ) -> Result<Self> {
        let wave = WaveParameters::from_frequency(frequency)?;
        let differentiator = HoloborodkoDifferentiator::new(options.stencil)?;
        let current_x = antenna.derivative(&differentiator)?;
        let rule = CompositeRule::new(antenna.grid(), options.quadrature_n)?;
        let sources = antenna.grid().iter().map(|&x| Point::on_x_axis(x)).collect();

        let omega = wave.omega;
        let gamma = Complex64::new(0.0, (omega * omega * MU_0 * EPSILON_0).sqrt());

        log::debug!(
            "estimator at {:.4e} Hz: {} source samples, gradient {}, quadrature n = {}",
            frequency,
            antenna.len(),
            gradient.name(),
            options.quadrature_n
        );

        Ok(Self {
            antenna,
            current_x,
            sources,
            rule,
            wave,
            gradient,
            options,
            e_prefix: Complex64::new(0.0, 4.0 * PI * omega * EPSILON_0).inv(),
            h_prefix: 1.0 / (4.0 * PI),
            gamma2: gamma * gamma,
        })
    }

    pub fn wave(&self) -> &WaveParameters {
        &self.wave
    }

    pub fn antenna(&self) -> &AntennaCurrent {
        &self.antenna
    }

    /// `dIs/dx` used in the Ex integral
    pub fn current_derivative(&self) -> ArrayView1<'_, Complex64> {
        self.current_x.view()
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.options
    }

    /// Ex and Hy at a target point.
    pub fn fields_at(&self, target: &Point) -> Result<FieldSample> {
        let k = self.wave.k;
        let current = self.antenna.current();
        let n = self.sources.len();

        let mut slope_term = Array1::<Complex64>::zeros(n);
        let mut potential_term = Array1::<Complex64>::zeros(n);
        let mut magnetic_term = Array1::<Complex64>::zeros(n);

        for (i, source) in self.sources.iter().enumerate() {
            let g = green_function_at(target, source, k)
                .map_err(|e| IpdError::at_source(e, target, i))?;
            let grad = self
                .gradient
                .gradient(target, source, k)
                .map_err(|e| match e {
                    IpdError::Wave(w) => IpdError::at_source(w, target, i),
                    other => other,
                })?;

            // ∂G/∂x' = -∂G/∂x
            slope_term[i] = -self.current_x[i] * grad[0];
            potential_term[i] = current[i] * g;
            magnetic_term[i] = current[i] * grad[2];
        }

        let slope = self.rule.integrate(slope_term.view())?;
        let potential = self.rule.integrate(potential_term.view())?;
        let magnetic = self.rule.integrate(magnetic_term.view())?;

        Ok(FieldSample {
            ex: self.e_prefix * (-slope - self.gamma2 * potential),
            hy: magnetic * self.h_prefix,
        })
    }

    /// Complex power density `S = Ex · conj(Hy)` at a target point.
    pub fn power_density_at(&self, target: &Point) -> Result<Complex64> {
        Ok(self.fields_at(target)?.power_density())
    }

    /// Power density at a [`FieldPoint`], which must carry this estimator's
    /// frequency.
    pub fn evaluate(&self, point: &FieldPoint) -> Result<Complex64> {
        let f = self.wave.frequency;
        if (point.frequency - f).abs() > 1e-9 * f {
            return Err(IpdError::Config(format!(
                "field point at {} Hz evaluated by an estimator at {} Hz",
                point.frequency, f
            )));
        }
        self.power_density_at(&point.position)
    }

    /// Evaluate `Re(S)` at every point of the target grid.
    ///
    /// Cells are independent and evaluated in parallel; the first failing
    /// cell aborts the whole fill.
    pub fn fill(&self, grid: &TargetGrid) -> Result<PowerDensityField> {
        let samples = try_parallel_map_indexed(grid.len(), |index| -> Result<f64> {
            Ok(self.power_density_at(&grid.point_at(index))?.re)
        })?;
        Ok(PowerDensityField::from_samples(grid.shape(), samples))
    }

    /// `S_ab = 1/(2A) ∫∫ Re(S) dx dy` for each standoff plane of `grid`.
    pub fn absorbed_power(&self, field: &PowerDensityField, grid: &TargetGrid) -> Result<Array1<f64>> {
        let (nx, ny, nz) = grid.shape();
        let (fx, fy, fz) = field.shape();
        if (fx, fy, fz) != (nx, ny, nz) {
            return Err(NumericsError::ShapeMismatch {
                context: "power density field",
                expected: grid.len(),
                got: fx * fy * fz,
            }
            .into());
        }

        let area = grid.signed_area()?;
        let rule = CompositeRule2d::new(grid.x(), grid.y(), self.options.quadrature_n)?;
        let planes = rule.integrate_planes(field.view(), Axis(0), Axis(1))?;
        Ok(planes.mapv(|p| p / (2.0 * area)))
    }

    /// Fill the grid and reduce it to absorbed power per plane.
    pub fn estimate(&self, grid: &TargetGrid) -> Result<Array1<f64>> {
        let field = self.fill(grid)?;
        self.absorbed_power(&field, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antenna::{AntennaSource, SinusoidalDipole};
    use crate::derivative::{AutomaticGradient, FiniteDifferenceGradient};
    use approx::assert_relative_eq;
    use math_em_numerics::Grid;

    const FREQUENCY: f64 = 1.0e9;

    fn dipole_current() -> AntennaCurrent {
        SinusoidalDipole::half_wave(FREQUENCY, 51, 1.0)
            .unwrap()
            .current_at(FREQUENCY)
            .unwrap()
    }

    #[test]
    fn test_prefactors() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let k = est.wave().k;
        // γ² = -k²
        assert_relative_eq!(est.gamma2.re, -k * k, max_relative = 1e-12);
        assert!(est.gamma2.im.abs() < 1e-12 * k * k);
        assert_relative_eq!(
            est.e_prefix.im,
            -1.0 / (4.0 * PI * est.wave().omega * EPSILON_0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_far_broadside_power_flows_outward() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let lambda = est.wave().wavelength();
        let s = est.power_density_at(&Point::new(0.0, 0.0, 10.0 * lambda)).unwrap();
        assert!(s.re > 0.0);
        // Radiated power density is mostly real far away
        assert!(s.im.abs() < 0.1 * s.re);
    }

    #[test]
    fn test_far_field_decays_as_inverse_square() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let lambda = est.wave().wavelength();
        let s1 = est.power_density_at(&Point::new(0.0, 0.0, 20.0 * lambda)).unwrap().re;
        let s2 = est.power_density_at(&Point::new(0.0, 0.0, 40.0 * lambda)).unwrap().re;
        assert_relative_eq!(s1 / s2, 4.0, max_relative = 0.05);
    }

    #[test]
    fn test_singular_cell_reports_source_index() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let on_wire = Point::on_x_axis(est.antenna().grid()[10]);
        match est.fields_at(&on_wire).unwrap_err() {
            IpdError::SingularGeometry { source_index, .. } => assert_eq!(source_index, 10),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fill_aborts_on_singular_cell() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let half = 0.5 * est.antenna().grid().width();
        let grid = TargetGrid::new(
            Grid::linspace(-half, half, 51).unwrap(),
            Grid::linspace(-0.01, 0.01, 3).unwrap(),
            Grid::new(vec![0.0, 0.01]).unwrap(),
        );
        // y = 0, z = 0 row lies on the wire
        assert!(est.fill(&grid).unwrap_err().is_singular());
    }

    #[test]
    fn test_fill_matches_pointwise() {
        let fd = FiniteDifferenceGradient::uniform(1e-5).unwrap();
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &fd, EstimatorOptions::default()).unwrap();
        let grid = TargetGrid::centered(0.1, 0.1, 4, 3, &[0.05, 0.1]).unwrap();
        let field = est.fill(&grid).unwrap();
        for i in 0..4 {
            for j in 0..3 {
                for k in 0..2 {
                    let s = est.power_density_at(&grid.point(i, j, k)).unwrap();
                    assert_eq!(field.view()[[i, j, k]], s.re);
                }
            }
        }
    }

    #[test]
    fn test_absorbed_power_of_uniform_field() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let grid = TargetGrid::centered(0.2, 0.3, 7, 9, &[0.1, 0.2]).unwrap();
        let field = PowerDensityField::from_samples((7, 9, 2), vec![4.0; 7 * 9 * 2]);
        let s_ab = est.absorbed_power(&field, &grid).unwrap();
        // ∫∫ 4 dA / 2A = 2
        assert_relative_eq!(s_ab[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(s_ab[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_absorbed_power_shape_mismatch() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let grid = TargetGrid::centered(0.2, 0.3, 7, 9, &[0.1]).unwrap();
        let field = PowerDensityField::from_samples((7, 9, 2), vec![0.0; 126]);
        assert!(est.absorbed_power(&field, &grid).unwrap_err().is_numerics_error());
    }

    #[test]
    fn test_evaluate_checks_frequency() {
        let est = IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, EstimatorOptions::default())
            .unwrap();
        let p = Point::new(0.0, 0.0, 0.1);
        let s = est.evaluate(&FieldPoint::new(p, FREQUENCY)).unwrap();
        assert_eq!(s, est.power_density_at(&p).unwrap());
        assert!(est.evaluate(&FieldPoint::new(p, 2.0 * FREQUENCY)).unwrap_err().is_config_error());
    }

    #[test]
    fn test_invalid_options() {
        let opts = EstimatorOptions {
            quadrature_n: 1,
            stencil: 7,
        };
        assert!(IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, opts).is_err());
        let opts = EstimatorOptions {
            quadrature_n: 3,
            stencil: 8,
        };
        assert!(IpdEstimator::new(dipole_current(), FREQUENCY, &AutomaticGradient, opts).is_err());
        assert!(
            IpdEstimator::new(dipole_current(), -1.0, &AutomaticGradient, EstimatorOptions::default())
                .unwrap_err()
                .is_config_error()
        );
    }
}
