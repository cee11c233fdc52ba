//! Independent voltage sources.

use std::fmt;

use crate::circuit::Node;

/// Value of an independent voltage source.
///
/// Phase angles are always given in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceValue {
    /// Constant voltage (volts).
    Dc(f64),
    /// Sinusoid at the single analysis frequency: `magnitude∠phase_deg`.
    Phasor { magnitude: f64, phase_deg: f64 },
}

impl SourceValue {
    /// Create a phasor value from magnitude and phase in degrees.
    pub fn phasor(magnitude: f64, phase_deg: f64) -> Self {
        Self::Phasor {
            magnitude,
            phase_deg,
        }
    }

    /// Whether this value forces complex (AC) arithmetic.
    pub fn is_phasor(&self) -> bool {
        matches!(self, Self::Phasor { .. })
    }

    /// Multiply the value by `k`.
    ///
    /// A phasor keeps a non-negative magnitude; a negative `k` turns the
    /// phase by 180°, wrapped into (-180°, 180°].
    pub fn scaled(&self, k: f64) -> Self {
        match *self {
            Self::Dc(v) => Self::Dc(v * k),
            Self::Phasor {
                magnitude,
                phase_deg,
            } if k < 0.0 => {
                let mut phase_deg = phase_deg + 180.0;
                if phase_deg > 180.0 {
                    phase_deg -= 360.0;
                }
                Self::Phasor {
                    magnitude: magnitude * -k,
                    phase_deg,
                }
            }
            Self::Phasor {
                magnitude,
                phase_deg,
            } => Self::Phasor {
                magnitude: magnitude * k,
                phase_deg,
            },
        }
    }
}

impl fmt::Display for SourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dc(v) => write!(f, "{}", v),
            Self::Phasor {
                magnitude,
                phase_deg,
            } => write!(f, "{}∠{}", magnitude, phase_deg),
        }
    }
}

/// A voltage source component.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = value
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSource {
    pub name: String,
    pub nodes: [Node; 2], // [positive, negative]
    pub value: SourceValue,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(
        name: impl Into<String>,
        positive: impl Into<Node>,
        negative: impl Into<Node>,
        value: SourceValue,
    ) -> Self {
        Self {
            name: name.into(),
            nodes: [positive.into(), negative.into()],
            value,
        }
    }

    /// Create a DC voltage source.
    pub fn dc(name: impl Into<String>, positive: impl Into<Node>, negative: impl Into<Node>, volts: f64) -> Self {
        Self::new(name, positive, negative, SourceValue::Dc(volts))
    }

    /// Create an AC voltage source from magnitude and phase in degrees.
    pub fn ac(
        name: impl Into<String>,
        positive: impl Into<Node>,
        negative: impl Into<Node>,
        magnitude: f64,
        phase_deg: f64,
    ) -> Self {
        Self::new(name, positive, negative, SourceValue::phasor(magnitude, phase_deg))
    }

    /// Check the source value, returning a description of the problem.
    pub fn value_problem(&self) -> Option<&'static str> {
        match self.value {
            SourceValue::Dc(v) if !v.is_finite() => Some("has a non-finite voltage"),
            SourceValue::Dc(_) => None,
            SourceValue::Phasor {
                magnitude,
                phase_deg,
            } => {
                if !magnitude.is_finite() || !phase_deg.is_finite() {
                    Some("has a non-finite phasor")
                } else if magnitude < 0.0 {
                    Some("has a negative phasor magnitude")
                } else {
                    None
                }
            }
        }
    }
}
