use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::dynamics::state::SimConfig;
use crate::error::Result;
use crate::vehicle::Lander;
use super::fsm::LandingFsmSettings;

/// Everything a landing run needs. Every section falls back to its
/// defaults when missing from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub lander: Lander,
    pub fsm: LandingFsmSettings,
    pub controller: ControllerConfig,
    pub sim: SimConfig,
    /// Heights (m) reported as events when first descended through.
    pub callouts: Vec<f64>,
}

impl Scenario {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(s)?;
        scenario.controller.validate()?;
        Ok(scenario)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    #[test]
    fn empty_document_gives_defaults() {
        let s = Scenario::from_json_str("{}").unwrap();
        assert_eq!(s, Scenario::default());
    }

    #[test]
    fn sections_override_independently() {
        let s = Scenario::from_json_str(
            r#"{
                "lander": { "name": "Heavy", "mass": 3.0 },
                "controller": { "kp": 0.7 },
                "sim": { "initial_altitude": 40.0, "initial_velocity": [1.0, 0.0, -2.0] }
            }"#,
        )
        .unwrap();
        assert_eq!(s.lander.name, "Heavy");
        assert_eq!(s.lander.mass, 3.0);
        assert_eq!(s.lander.max_thrust, 30.0);
        assert_eq!(s.controller.params.kp, 0.7);
        assert_eq!(s.sim.initial_altitude, 40.0);
        assert_eq!(s.sim.initial_velocity.z, -2.0);
        assert_eq!(s.fsm, LandingFsmSettings::default());
    }

    #[test]
    fn invalid_controller_section_rejected() {
        let err = Scenario::from_json_str(r#"{ "controller": { "kp": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ZeroGain)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, r#"{ "sim": { "descent_rate": 1.0 } }"#).unwrap();
        let s = Scenario::from_json_file(&path).unwrap();
        assert_eq!(s.sim.descent_rate, 1.0);
    }
}
