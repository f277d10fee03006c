//! Game mechanics: well-known flags, teleport targets, poses and the game clock.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Flags the built-in scene relies on.
///
/// Flags are stored by name, so scenes may also use their own names
/// (e.g. `safe_opened`); these variants are just the canonical spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameFlag {
    DoorUnlocked,
    CircuitFixed,
    InChase,
    IsHidden,
    InTreatment,
    Screaming,
    GirlCalmed,
    QuestionnairePassed,
    /// Standing on the elevator platform.
    OnPlatform,
}

impl GameFlag {
    /// Every well-known flag.
    pub const ALL: [GameFlag; 9] = [
        GameFlag::DoorUnlocked,
        GameFlag::CircuitFixed,
        GameFlag::InChase,
        GameFlag::IsHidden,
        GameFlag::InTreatment,
        GameFlag::Screaming,
        GameFlag::GirlCalmed,
        GameFlag::QuestionnairePassed,
        GameFlag::OnPlatform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameFlag::DoorUnlocked => "doorUnlocked",
            GameFlag::CircuitFixed => "circuitFixed",
            GameFlag::InChase => "inChase",
            GameFlag::IsHidden => "isHidden",
            GameFlag::InTreatment => "inTreatment",
            GameFlag::Screaming => "screaming",
            GameFlag::GirlCalmed => "girlCalmed",
            GameFlag::QuestionnairePassed => "questionnairePassed",
            GameFlag::OnPlatform => "onPlatform",
        }
    }
}

impl AsRef<str> for GameFlag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for GameFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GameFlag::ALL
            .into_iter()
            .find(|flag| flag.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown game flag: {}", wanted))
    }
}

impl std::fmt::Display for GameFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named rooms the player can be teleported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeleportTarget {
    PatientRoom,
    Office,
    TreatmentRoom,
}

/// A world position plus heading (yaw in degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    pub position: [f32; 3],
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: [f32; 3], yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// Which ending an ending button leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EndingKind {
    #[default]
    Success,
    Fail,
}

impl EndingKind {
    /// Guess the ending from an object name: `fail`/`red` mean failure,
    /// `success`/`blue` mean success. Anything else keeps `fallback`.
    pub fn detect(object_name: &str, fallback: EndingKind) -> EndingKind {
        let name = object_name.to_lowercase();
        if name.contains("fail") || name.contains("red") {
            EndingKind::Fail
        } else if name.contains("success") || name.contains("blue") {
            EndingKind::Success
        } else {
            fallback
        }
    }
}

/// Monotonic game time in seconds since session start.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
pub struct Timestamp(pub f64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// The timestamp `secs` seconds after this one.
    pub fn after(&self, secs: f64) -> Timestamp {
        Timestamp(self.0 + secs)
    }

    /// Seconds from this timestamp until `later`, never negative.
    pub fn secs_until(&self, later: Timestamp) -> f64 {
        (later.0 - self.0).max(0.0)
    }
}
