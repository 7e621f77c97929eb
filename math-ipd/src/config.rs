//! JSON configuration for power density sweeps

use crate::antenna::{AntennaSource, SinusoidalDipole, TabulatedAntenna};
use crate::derivative::GradientStrategy;
use crate::error::{IpdError, Result};
use crate::estimator::EstimatorOptions;
use crate::target::TargetGrid;
use math_em_numerics::holoborodko::STENCIL_LENGTHS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete sweep configuration loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpdConfig {
    /// Antenna current source
    pub antenna: AntennaConfig,
    /// Target planes
    pub target: TargetConfig,
    /// Frequency configuration
    pub frequencies: FrequencyConfig,
    /// Gradient strategies to compare
    #[serde(default)]
    pub derivatives: DerivativeConfig,
    /// Quadrature settings
    #[serde(default)]
    pub quadrature: QuadratureConfig,
    /// Current differentiator settings
    #[serde(default)]
    pub differentiator: DifferentiatorConfig,
    /// Floating-point precision of the step-size study
    #[serde(default)]
    pub precision: Precision,
    /// Evaluate target cells on all cores
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Run metadata
    #[serde(default)]
    pub metadata: MetadataConfig,
}

fn default_true() -> bool {
    true
}

/// Antenna specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AntennaConfig {
    /// Sinusoidal dipole of fixed length
    #[serde(rename = "dipole")]
    Dipole {
        /// Total length (m)
        length: f64,
        /// Number of source samples
        #[serde(default = "default_samples")]
        samples: usize,
        /// Feed current (A)
        #[serde(default = "default_amplitude")]
        amplitude: f64,
    },
    /// Sinusoidal dipole cut to half a wavelength at a design frequency
    #[serde(rename = "half_wave_dipole")]
    HalfWaveDipole {
        /// Design frequency (Hz)
        design_frequency: f64,
        /// Number of source samples
        #[serde(default = "default_samples")]
        samples: usize,
        /// Feed current (A)
        #[serde(default = "default_amplitude")]
        amplitude: f64,
    },
    /// Currents tabulated per frequency in a JSON file
    #[serde(rename = "tabulated")]
    Tabulated {
        /// Path to a JSON array of `{frequency, x, ireal, iimag}` tables
        path: PathBuf,
    },
}

fn default_samples() -> usize {
    101
}

fn default_amplitude() -> f64 {
    1.0
}

impl AntennaConfig {
    /// Build the antenna source
    pub fn to_source(&self) -> Result<Box<dyn AntennaSource>> {
        Ok(match self {
            AntennaConfig::Dipole {
                length,
                samples,
                amplitude,
            } => Box::new(SinusoidalDipole::new(*length, *samples, *amplitude)?),
            AntennaConfig::HalfWaveDipole {
                design_frequency,
                samples,
                amplitude,
            } => Box::new(SinusoidalDipole::half_wave(
                *design_frequency,
                *samples,
                *amplitude,
            )?),
            AntennaConfig::Tabulated { path } => Box::new(TabulatedAntenna::from_file(path)?),
        })
    }
}

/// Target plane(s) centred over the antenna, parallel to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Extent along x (m)
    pub width: f64,
    /// Extent along y (m)
    pub height: f64,
    /// Samples along x
    #[serde(default = "default_resolution")]
    pub nx: usize,
    /// Samples along y
    #[serde(default = "default_resolution")]
    pub ny: usize,
    /// Distances `d` from the antenna plane (m)
    pub standoffs: Vec<f64>,
}

fn default_resolution() -> usize {
    21
}

impl TargetConfig {
    pub fn to_grid(&self) -> Result<TargetGrid> {
        TargetGrid::centered(self.width, self.height, self.nx, self.ny, &self.standoffs)
    }
}

/// Frequency sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyConfig {
    /// Minimum frequency (Hz)
    pub min_freq: f64,
    /// Maximum frequency (Hz)
    pub max_freq: f64,
    /// Number of frequency points
    #[serde(default = "default_num_points")]
    pub num_points: usize,
    /// Spacing between points
    #[serde(default)]
    pub spacing: FrequencySpacing,
}

fn default_num_points() -> usize {
    1
}

/// Frequency spacing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencySpacing {
    #[default]
    Logarithmic,
    Linear,
}

impl FrequencyConfig {
    /// Generate frequency array based on configuration
    pub fn generate_frequencies(&self) -> Vec<f64> {
        match self.spacing {
            FrequencySpacing::Linear => lin_space(self.min_freq, self.max_freq, self.num_points),
            FrequencySpacing::Logarithmic => log_space(self.min_freq, self.max_freq, self.num_points),
        }
    }
}

/// Generate logarithmically spaced values
pub fn log_space(start: f64, end: f64, num: usize) -> Vec<f64> {
    if num < 2 {
        return vec![start];
    }
    let log_start = start.ln();
    let log_end = end.ln();
    (0..num)
        .map(|i| (log_start + (log_end - log_start) * i as f64 / (num - 1) as f64).exp())
        .collect()
}

/// Generate linearly spaced values
pub fn lin_space(start: f64, end: f64, num: usize) -> Vec<f64> {
    if num < 2 {
        return vec![start];
    }
    (0..num)
        .map(|i| start + (end - start) * i as f64 / (num - 1) as f64)
        .collect()
}

/// Gradient strategies to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativeConfig {
    /// Include the dual-number gradient (also the reference for FD errors)
    #[serde(default = "default_true")]
    pub automatic: bool,
    /// Finite-difference steps; the decade sweep 1e-2 ... 1e-12 when absent
    #[serde(default)]
    pub steps: Option<Vec<f64>>,
}

impl Default for DerivativeConfig {
    fn default() -> Self {
        Self {
            automatic: true,
            steps: None,
        }
    }
}

impl DerivativeConfig {
    /// Finite-difference steps to run
    pub fn fd_steps(&self) -> Vec<f64> {
        match &self.steps {
            Some(steps) => steps.clone(),
            None => (2..=12).map(|m| 10f64.powi(-m)).collect(),
        }
    }

    /// Strategies in run order, automatic first
    pub fn strategies(&self) -> Vec<GradientStrategy> {
        let mut out = Vec::new();
        if self.automatic {
            out.push(GradientStrategy::Automatic);
        }
        out.extend(
            self.fd_steps()
                .into_iter()
                .map(|delta| GradientStrategy::FiniteDifference { delta }),
        );
        out
    }
}

/// Quadrature settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadratureConfig {
    /// Composite rule window (samples per local polynomial)
    #[serde(default = "default_quadrature_n")]
    pub n: usize,
}

fn default_quadrature_n() -> usize {
    3
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            n: default_quadrature_n(),
        }
    }
}

/// Current differentiator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentiatorConfig {
    /// Holoborodko stencil length (5, 7, 9 or 11)
    #[serde(default = "default_stencil")]
    pub stencil: usize,
}

fn default_stencil() -> usize {
    7
}

impl Default for DifferentiatorConfig {
    fn default() -> Self {
        Self {
            stencil: default_stencil(),
        }
    }
}

/// Floating-point precision, chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// `f64`
    #[default]
    Double,
    /// `f32`
    Single,
}

impl Precision {
    /// Machine epsilon of the selected type
    pub fn epsilon(&self) -> f64 {
        match self {
            Precision::Double => f64::EPSILON,
            Precision::Single => f32::EPSILON as f64,
        }
    }

    /// Central-difference step balancing O(δ²) truncation against O(ε/δ)
    /// round-off, up to a function-dependent constant: `ε^(1/3)`.
    pub fn balanced_step(&self) -> f64 {
        self.epsilon().cbrt()
    }
}

/// Run metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Run description
    #[serde(default)]
    pub description: String,
    /// Author name
    #[serde(default)]
    pub author: String,
}

impl IpdConfig {
    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: IpdConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let f = &self.frequencies;
        if !(f.min_freq.is_finite() && f.min_freq > 0.0) {
            return Err(IpdError::InvalidFrequency {
                frequency: f.min_freq,
            });
        }
        if !(f.max_freq.is_finite() && f.max_freq >= f.min_freq) {
            return Err(IpdError::Config(format!(
                "max_freq ({}) must be finite and >= min_freq ({})",
                f.max_freq, f.min_freq
            )));
        }
        if f.num_points == 0 {
            return Err(IpdError::Config("num_points must be >= 1".to_string()));
        }

        let t = &self.target;
        if !(t.width > 0.0 && t.height > 0.0) {
            return Err(IpdError::InvalidArea {
                area: t.width * t.height,
            });
        }
        if t.nx < 2 || t.ny < 2 {
            return Err(IpdError::Config(format!(
                "target needs at least 2 samples per axis, got {} x {}",
                t.nx, t.ny
            )));
        }
        if t.standoffs.is_empty() {
            return Err(IpdError::Config("at least one standoff distance is required".to_string()));
        }
        if let Some(d) = t.standoffs.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
            return Err(IpdError::Config(format!(
                "standoff distances must be > 0 to keep clear of the antenna, got {d}"
            )));
        }

        if let Some(delta) = self.derivatives.fd_steps().iter().find(|d| !(d.is_finite() && **d > 0.0)) {
            return Err(IpdError::Config(format!(
                "finite-difference steps must be > 0, got {delta}"
            )));
        }
        if self.derivatives.strategies().is_empty() {
            return Err(IpdError::Config("no gradient strategy selected".to_string()));
        }

        if self.quadrature.n < 2 {
            return Err(IpdError::Config(format!(
                "quadrature window must be >= 2, got {}",
                self.quadrature.n
            )));
        }
        if !STENCIL_LENGTHS.contains(&self.differentiator.stencil) {
            return Err(IpdError::Config(format!(
                "stencil length must be one of {:?}, got {}",
                STENCIL_LENGTHS, self.differentiator.stencil
            )));
        }

        Ok(())
    }

    /// Per-cell numerical settings
    pub fn estimator_options(&self) -> EstimatorOptions {
        EstimatorOptions {
            quadrature_n: self.quadrature.n,
            stencil: self.differentiator.stencil,
        }
    }
}
