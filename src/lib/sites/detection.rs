use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse severity label derived from estimated speed and hourly flow.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Normal,
    Heavy,
    Severe,
    Peak,
}

impl Scenario {
    /// Evaluated in order, first match wins.
    pub fn classify(speed: f32, hourly_flow: u32) -> Self {
        if speed < 30.0 {
            return Scenario::Severe;
        }
        if speed < 50.0 {
            return Scenario::Heavy;
        }
        if hourly_flow > 5000 {
            return Scenario::Peak;
        }
        Scenario::Normal
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scenario::Normal => write!(f, "normal"),
            Scenario::Heavy => write!(f, "heavy"),
            Scenario::Severe => write!(f, "severe"),
            Scenario::Peak => write!(f, "peak"),
        }
    }
}

/// One row per estimator invocation. Rows are append-only: the worker
/// never mutates or deletes what has been registered.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Detection {
    /// Site identifier, e.g. "M3-NB"
    #[schema(example = "M3-NB")]
    pub site_id: String,
    pub site_name: String,
    /// Unix Timestamp (milliseconds)
    #[schema(example = 1693386819000i64)]
    pub timestamp: i64,
    /// Vehicles counted over the sampling interval
    pub flow_count: u32,
    /// Extrapolated vehicles per hour
    #[schema(example = 4850)]
    pub hour_count: u32,
    /// Extrapolated vehicles per minute
    pub minute_count: u32,
    /// Estimated speed, km/h
    #[schema(example = 78.0)]
    pub estimated_speed: f32,
    /// Fraction of time the sensing point is covered by a vehicle, 0.01-0.95
    pub occupancy: f32,
    /// Vehicles per kilometer per lane
    pub density: f32,
    /// Detection confidence, 0.60-0.95
    pub avg_confidence: f32,
    pub scenario: Scenario,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_scenario() {
        let cases = vec![
            (25.0, 1000, Scenario::Severe),
            (45.0, 4000, Scenario::Heavy),
            (80.0, 6000, Scenario::Peak),
            (80.0, 1000, Scenario::Normal),
            (29.9, 6000, Scenario::Severe),
            (49.9, 6000, Scenario::Heavy),
            (50.0, 5000, Scenario::Normal),
        ];
        for (speed, flow, correct_answer) in cases {
            let answer = Scenario::classify(speed, flow);
            assert_eq!(answer, correct_answer, "speed={} flow={}", speed, flow);
        }
    }
}
