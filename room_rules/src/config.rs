//! Tuning and layout configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::{ObjectPath, StorySequence};
use crate::mechanics::{Pose, TeleportTarget};

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Doctor patrol timing. The actual duration is drawn from `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            min_seconds: 10.0,
            max_seconds: 20.0,
        }
    }
}

/// Treatment-room scream countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreamConfig {
    pub time_limit_seconds: f64,
    /// If false, a timeout only stops the scream instead of failing the run.
    pub fail_on_timeout: bool,
    pub timeout_reason: String,
    pub toast_on_scream: String,
    pub trigger_once: bool,
    pub auto_set_in_treatment: bool,
}

impl Default for ScreamConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 12.0,
            fail_on_timeout: true,
            timeout_reason: "You failed to calm her down in time.".to_string(),
            toast_on_scream: "A piercing scream echoes!".to_string(),
            trigger_once: true,
            auto_set_in_treatment: true,
        }
    }
}

/// Expected answers and rules for the admission questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireConfig {
    pub expected_name: String,
    pub expected_age: u32,
    pub expected_ward: String,
    pub require_ward: bool,
    pub time_limit_seconds: f64,
    pub fail_reason: String,
    /// Once passed, reopening only shows a reminder.
    pub one_time_only: bool,
}

impl Default for QuestionnaireConfig {
    fn default() -> Self {
        Self {
            expected_name: "L. Zhang".to_string(),
            expected_age: 19,
            expected_ward: "302".to_string(),
            require_ward: true,
            time_limit_seconds: 20.0,
            fail_reason: "Nurse found you. Game Over.".to_string(),
            one_time_only: true,
        }
    }
}

/// The office elevator: what opens once the circuit is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    pub door: ObjectPath,
    pub panel: ObjectPath,
    pub auto_open_when_circuit_fixed: bool,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            door: ObjectPath::new("Office/Elevator/Door"),
            panel: ObjectPath::new("Office/Elevator/Panel"),
            auto_open_when_circuit_fixed: true,
        }
    }
}

/// Where the player lands in each room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Also the restart spawn.
    pub patient_room: Pose,
    pub office: Pose,
    pub treatment_room: Pose,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            patient_room: Pose::new([0.0, 0.05, -2.0], 0.0),
            office: Pose::new([0.0, 0.05, 10.5], 0.0),
            treatment_room: Pose::new([0.0, -2.95, 13.0], 180.0),
        }
    }
}

impl SpawnConfig {
    pub fn pose(&self, target: TeleportTarget) -> Pose {
        match target {
            TeleportTarget::PatientRoom => self.patient_room,
            TeleportTarget::Office => self.office,
            TeleportTarget::TreatmentRoom => self.treatment_room,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub door_password: String,

    /// Seed for the patrol-duration RNG. `None` seeds from entropy.
    pub seed: Option<u64>,

    pub chase: ChaseConfig,
    pub scream: ScreamConfig,
    pub questionnaire: QuestionnaireConfig,
    pub spawns: SpawnConfig,
    pub elevator: ElevatorConfig,

    /// Objects re-enabled on restart even if this session never disabled them.
    pub restore_on_restart: Vec<ObjectPath>,

    /// Toast shown when a session starts.
    pub objective_toast: String,
    /// Toast shown after a restart.
    pub restart_toast: String,

    pub intro: Option<StorySequence>,
    pub play_intro_on_start: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            door_password: "251012".to_string(),
            seed: None,
            chase: ChaseConfig::default(),
            scream: ScreamConfig::default(),
            questionnaire: QuestionnaireConfig::default(),
            spawns: SpawnConfig::default(),
            elevator: ElevatorConfig::default(),
            restore_on_restart: vec![
                ObjectPath::new("PatientRoom/Door"),
                ObjectPath::new("Office/Doll"),
            ],
            objective_toast: "Objective: Go to the Lock. Press E to enter password.".to_string(),
            restart_toast: "Restarted. Objective: Unlock the door at Lock.".to_string(),
            intro: None,
            play_intro_on_start: false,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from TOML text. Missing keys use defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.door_password.trim().is_empty() {
            return Err(ConfigError::Invalid("door_password must not be blank".into()));
        }
        let durations = [
            ("chase.min_seconds", self.chase.min_seconds),
            ("chase.max_seconds", self.chase.max_seconds),
            ("scream.time_limit_seconds", self.scream.time_limit_seconds),
            ("questionnaire.time_limit_seconds", self.questionnaire.time_limit_seconds),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, secs)| !secs.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be a finite number", name)));
        }
        if self.chase.min_seconds < 0.0 || self.chase.min_seconds > self.chase.max_seconds {
            return Err(ConfigError::Invalid(format!(
                "chase duration range [{}, {}] is empty or negative",
                self.chase.min_seconds, self.chase.max_seconds
            )));
        }
        if self.scream.time_limit_seconds <= 0.0 {
            return Err(ConfigError::Invalid("scream.time_limit_seconds must be positive".into()));
        }
        if self.questionnaire.time_limit_seconds <= 0.0 {
            return Err(ConfigError::Invalid(
                "questionnaire.time_limit_seconds must be positive".into(),
            ));
        }
        if self.play_intro_on_start
            && self.intro.as_ref().map_or(true, |intro| intro.lines.is_empty())
        {
            return Err(ConfigError::Invalid(
                "play_intro_on_start needs an intro with at least one line".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.door_password, "251012");
        assert_eq!(config.restore_on_restart.len(), 2);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            door_password = "1234"
            seed = 7

            [chase]
            min_seconds = 10.0
            max_seconds = 10.0

            [spawns.patient_room]
            position = [1.0, 0.0, 2.0]
            yaw = 90.0
            "#,
        )
        .unwrap();

        assert_eq!(config.door_password, "1234");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.chase.max_seconds, 10.0);
        assert_eq!(config.spawns.patient_room, Pose::new([1.0, 0.0, 2.0], 90.0));
        assert_eq!(config.spawns.office, SpawnConfig::default().office);
        assert_eq!(config.scream, ScreamConfig::default());
    }

    #[test]
    fn test_elevator_from_toml() {
        let config = GameConfig::from_toml_str(
            r#"
            [elevator]
            door = "Lobby/Lift/Door"
            auto_open_when_circuit_fixed = false
            "#,
        )
        .unwrap();

        assert_eq!(config.elevator.door, ObjectPath::new("Lobby/Lift/Door"));
        assert_eq!(config.elevator.panel, ElevatorConfig::default().panel);
        assert!(!config.elevator.auto_open_when_circuit_fixed);
    }

    #[test]
    fn test_intro_from_toml() {
        let config = GameConfig::from_toml_str(
            r#"
            play_intro_on_start = true

            [intro]
            lines = ["Room 302.", "Someone locked the door."]
            "#,
        )
        .unwrap();

        assert!(config.play_intro_on_start);
        assert_eq!(config.intro.unwrap().lines.len(), 2);
    }

    #[test]
    fn test_invalid_chase_range() {
        let err = GameConfig::from_toml_str(
            r#"
            [chase]
            min_seconds = 20.0
            max_seconds = 5.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_non_finite_durations_rejected() {
        let mut config = GameConfig::default();
        config.chase.min_seconds = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.chase.max_seconds = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.scream.time_limit_seconds = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let err = GameConfig::from_toml_str("[questionnaire]\ntime_limit_seconds = nan").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_blank_password_rejected() {
        let err = GameConfig::from_toml_str("door_password = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_intro_required_when_enabled() {
        let err = GameConfig::from_toml_str("play_intro_on_start = true").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = GameConfig::from_toml_str("door_password = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_spawn_lookup() {
        let spawns = SpawnConfig::default();
        assert_eq!(spawns.pose(TeleportTarget::TreatmentRoom).yaw, 180.0);
        assert_eq!(spawns.pose(TeleportTarget::PatientRoom), spawns.patient_room);
    }
}
