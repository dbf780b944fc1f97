use std::fmt;
use std::str::FromStr;

use rand::Rng;

/// Confidence band profile of the estimator variant in use. Freeway
/// sensors see more stable conditions and report tighter, higher bands
/// than arterial ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidencePolicy {
    Freeway,
    Arterial,
}

/// Daytime window shared by both policies
pub const DAY_HOURS: (u32, u32) = (6, 20);

impl ConfidencePolicy {
    /// Uniform sampling band (low, high) for the given hour.
    pub fn band(&self, hour: u32) -> (f32, f32) {
        let is_day = hour >= DAY_HOURS.0 && hour <= DAY_HOURS.1;
        match self {
            ConfidencePolicy::Freeway => {
                if is_day {
                    (0.85, 0.95)
                } else {
                    (0.75, 0.90)
                }
            }
            ConfidencePolicy::Arterial => {
                if is_day {
                    (0.75, 0.95)
                } else {
                    (0.60, 0.80)
                }
            }
        }
    }
    pub fn sample(&self, hour: u32, rng: &mut impl Rng) -> f32 {
        let (low, high) = self.band(hour);
        rng.random_range(low..high)
    }
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        ConfidencePolicy::Freeway
    }
}

impl FromStr for ConfidencePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "freeway" => Ok(ConfidencePolicy::Freeway),
            "arterial" => Ok(ConfidencePolicy::Arterial),
            _ => Err(format!("Unknown confidence policy: '{}'", s)),
        }
    }
}

impl fmt::Display for ConfidencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfidencePolicy::Freeway => write!(f, "freeway"),
            ConfidencePolicy::Arterial => write!(f, "arterial"),
        }
    }
}
