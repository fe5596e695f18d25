//! The closed set of release mechanisms and their selector strings.

use std::fmt;
use std::str::FromStr;

use log::info;
use rand::Rng;

use crate::{
    OdCounts, OdDomain, OdTrips, PrivacyError, PrivacyResult, bounded_sum_gdp, bounded_sum_ldp,
    sketch_frequencies, threshold_suppression,
};

// ── Parameters ────────────────────────────────────────────────────────────────

/// Raw mechanism parameters as supplied by the caller.  Which ones are
/// required depends on the selected mechanism.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MechanismParams {
    pub epsilon:      Option<f64>,
    pub sensitivity:  Option<u32>,
    pub k:            Option<usize>,
    pub m:            Option<usize>,
    pub threshold:    Option<u64>,
    /// Sketch only: replace negative estimates by zero.
    pub clip_at_zero: bool,
}

/// Validated parameters of the sketch mechanism.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SketchParams {
    pub epsilon:      f64,
    pub sensitivity:  u32,
    /// Number of hash functions.
    pub k:            usize,
    /// Sketch width.
    pub m:            usize,
    pub clip_at_zero: bool,
}

// ── MechanismKind ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MechanismKind {
    Suppression,
    GlobalDp,
    LocalDp,
    Sketch,
}

impl MechanismKind {
    /// Name written to the `construction` column of released tables.
    pub fn name(self) -> &'static str {
        match self {
            MechanismKind::Suppression => "k_anonymous",
            MechanismKind::GlobalDp => "GDP",
            MechanismKind::LocalDp => "naive_LDP",
            MechanismKind::Sketch => "CMS",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MechanismKind {
    type Err = PrivacyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suppression" | "k_anonymous" => Ok(MechanismKind::Suppression),
            "gdp" => Ok(MechanismKind::GlobalDp),
            "ldp" | "naive_ldp" => Ok(MechanismKind::LocalDp),
            "cms" => Ok(MechanismKind::Sketch),
            _ => Err(PrivacyError::UnknownMechanism(s.to_string())),
        }
    }
}

// ── Mechanism ─────────────────────────────────────────────────────────────────

/// A fully parameterised release mechanism.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mechanism {
    Suppression { threshold: u64 },
    GlobalDp { epsilon: f64, sensitivity: u32 },
    LocalDp { epsilon: f64, sensitivity: u32 },
    Sketch(SketchParams),
}

impl Mechanism {
    /// Resolve a selector string and parameters into a mechanism.
    pub fn from_selector(selector: &str, params: &MechanismParams) -> PrivacyResult<Self> {
        let kind: MechanismKind = selector.parse()?;
        let name = kind.name();
        let mechanism = match kind {
            MechanismKind::Suppression => Mechanism::Suppression {
                threshold: require(name, "threshold", params.threshold)?,
            },
            MechanismKind::GlobalDp => Mechanism::GlobalDp {
                epsilon:     require(name, "epsilon", params.epsilon)?,
                sensitivity: require(name, "sensitivity", params.sensitivity)?,
            },
            MechanismKind::LocalDp => Mechanism::LocalDp {
                epsilon:     require(name, "epsilon", params.epsilon)?,
                sensitivity: require(name, "sensitivity", params.sensitivity)?,
            },
            MechanismKind::Sketch => Mechanism::Sketch(SketchParams {
                epsilon:      require(name, "epsilon", params.epsilon)?,
                sensitivity:  require(name, "sensitivity", params.sensitivity)?,
                k:            require(name, "k", params.k)?,
                m:            require(name, "m", params.m)?,
                clip_at_zero: params.clip_at_zero,
            }),
        };
        mechanism.validate()?;
        Ok(mechanism)
    }

    pub fn kind(&self) -> MechanismKind {
        match self {
            Mechanism::Suppression { .. } => MechanismKind::Suppression,
            Mechanism::GlobalDp { .. } => MechanismKind::GlobalDp,
            Mechanism::LocalDp { .. } => MechanismKind::LocalDp,
            Mechanism::Sketch(_) => MechanismKind::Sketch,
        }
    }

    pub fn validate(&self) -> PrivacyResult<()> {
        match *self {
            Mechanism::Suppression { .. } => Ok(()),
            Mechanism::GlobalDp { epsilon, .. } | Mechanism::LocalDp { epsilon, .. } => {
                check_epsilon(epsilon)
            }
            Mechanism::Sketch(p) => {
                check_epsilon(p.epsilon)?;
                if p.k == 0 {
                    return Err(PrivacyError::InvalidParameter("k must be at least 1".into()));
                }
                if p.m < 2 {
                    return Err(PrivacyError::InvalidParameter(format!(
                        "m must be at least 2, got {}",
                        p.m
                    )));
                }
                Ok(())
            }
        }
    }

    /// The parameters to append to the released table.
    pub fn echo(&self) -> ParameterEcho {
        let mut echo = ParameterEcho { construction: self.kind().name(), ..ParameterEcho::default() };
        match *self {
            Mechanism::Suppression { threshold } => echo.threshold = Some(threshold),
            Mechanism::GlobalDp { epsilon, sensitivity } | Mechanism::LocalDp { epsilon, sensitivity } => {
                echo.epsilon = Some(epsilon);
                echo.sensitivity = Some(sensitivity);
            }
            Mechanism::Sketch(p) => {
                echo.epsilon = Some(p.epsilon);
                echo.sensitivity = Some(p.sensitivity);
                echo.k = Some(p.k);
                echo.m = Some(p.m);
            }
        }
        echo
    }

    /// Release an OD table for `trips`.  Every trip's pair must be in
    /// `domain`.
    ///
    /// No trips gives an empty table, except for the sketch, which still
    /// reports one (zero) estimate per domain pair.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        trips:  &OdTrips,
        domain: &OdDomain,
        rng:    &mut R,
    ) -> PrivacyResult<OdCounts> {
        if trips.is_empty() && !matches!(self, Mechanism::Sketch(_)) {
            return Ok(OdCounts::default());
        }
        info!("{}: {} trips over {} pairs", self.kind(), trips.len(), domain.len());
        match *self {
            Mechanism::Suppression { threshold } => threshold_suppression(trips, domain, threshold),
            Mechanism::GlobalDp { epsilon, sensitivity } => {
                bounded_sum_gdp(trips, domain, sensitivity, epsilon, rng)
            }
            Mechanism::LocalDp { epsilon, sensitivity } => {
                bounded_sum_ldp(trips, domain, sensitivity, epsilon, rng)
            }
            Mechanism::Sketch(ref p) => sketch_frequencies(trips, domain, p, rng),
        }
    }
}

fn require<T>(mechanism: &'static str, parameter: &'static str, value: Option<T>) -> PrivacyResult<T> {
    value.ok_or(PrivacyError::MissingParameter { mechanism, parameter })
}

fn check_epsilon(epsilon: f64) -> PrivacyResult<()> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(PrivacyError::InvalidParameter(format!(
            "epsilon must be positive and finite, got {epsilon}"
        )))
    }
}

// ── ParameterEcho ─────────────────────────────────────────────────────────────

/// Mechanism identity and parameters, appended to each output row by the
/// writer.  Parameters a mechanism does not use are `None`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ParameterEcho {
    pub construction: &'static str,
    pub epsilon:      Option<f64>,
    pub sensitivity:  Option<u32>,
    pub k:            Option<usize>,
    pub m:            Option<usize>,
    pub threshold:    Option<u64>,
}
