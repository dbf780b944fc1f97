use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lib::sites::Detection;

/// Monitored road. Mitchell and Kwinana are freeway corridors,
/// Mounts Bay and Stirling are arterial ones.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Corridor {
    Mitchell,
    Kwinana,
    MountsBay,
    Stirling,
}

impl Corridor {
    pub fn all() -> [Corridor; 4] {
        [
            Corridor::Mitchell,
            Corridor::Kwinana,
            Corridor::MountsBay,
            Corridor::Stirling,
        ]
    }
}

impl Default for Corridor {
    fn default() -> Self {
        Corridor::Mitchell
    }
}

impl FromStr for Corridor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mitchell" => Ok(Corridor::Mitchell),
            "kwinana" => Ok(Corridor::Kwinana),
            "mounts_bay" => Ok(Corridor::MountsBay),
            "stirling" => Ok(Corridor::Stirling),
            _ => Err(format!("Unknown corridor: '{}'", s)),
        }
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Corridor::Mitchell => write!(f, "mitchell"),
            Corridor::Kwinana => write!(f, "kwinana"),
            Corridor::MountsBay => write!(f, "mounts_bay"),
            Corridor::Stirling => write!(f, "stirling"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Northbound,
    Southbound,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Northbound
    }
}

impl FromStr for Direction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "northbound" | "nb" => Ok(Direction::Northbound),
            "southbound" | "sb" => Ok(Direction::Southbound),
            _ => Err(format!("Unknown direction: '{}'", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Northbound => write!(f, "northbound"),
            Direction::Southbound => write!(f, "southbound"),
        }
    }
}

/// Static descriptor of a single monitoring site plus its accumulated
/// detection history. Created once at seed time; everything except the
/// `active` flag stays immutable afterwards.
#[derive(Debug)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub corridor: Corridor,
    pub direction: Direction,
    pub lanes: u16,
    pub distance_km: f32,
    pub longitude: f32,
    pub latitude: f32,
    pub speed_limit: u16,
    pub active: bool,
    pub detections: Vec<Detection>,
    pub last_detection: Option<Detection>,
}

impl Site {
    pub fn new(
        id: String,
        name: String,
        corridor: Corridor,
        direction: Direction,
        lanes: u16,
        distance_km: f32,
        longitude: f32,
        latitude: f32,
        speed_limit: u16,
        active: bool,
    ) -> Self {
        Site {
            id,
            name,
            corridor,
            direction,
            lanes,
            distance_km,
            longitude,
            latitude,
            speed_limit,
            active,
            detections: vec![],
            last_detection: None,
        }
    }
    /// Appends a detection row. History is append-only.
    pub fn register_detection(&mut self, detection: Detection) {
        self.last_detection = Some(detection.clone());
        self.detections.push(detection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corridor_from_str() {
        let inputs = vec!["mitchell", "kwinana", "mounts_bay", "stirling", "Mitchell"];
        let correct_answers = vec![
            Corridor::Mitchell,
            Corridor::Kwinana,
            Corridor::MountsBay,
            Corridor::Stirling,
            Corridor::Mitchell,
        ];
        for (i, input) in inputs.iter().enumerate() {
            let answer = Corridor::from_str(input).unwrap();
            assert_eq!(answer, correct_answers[i]);
        }
        assert!(Corridor::from_str("tonkin").is_err());
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(Direction::from_str("northbound").unwrap(), Direction::Northbound);
        assert_eq!(Direction::from_str("SB").unwrap(), Direction::Southbound);
        assert!(Direction::from_str("eastbound").is_err());
    }

    #[test]
    fn test_corridor_roundtrip() {
        for corridor in Corridor::all() {
            let parsed = Corridor::from_str(&corridor.to_string()).unwrap();
            assert_eq!(parsed, corridor);
        }
    }
}
