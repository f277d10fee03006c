//! Timed admission questionnaire.

use room_rules::{ObjectPath, QuestionnaireConfig, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timers::Deadline;

/// What the player typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionnaireForm {
    pub name: String,
    pub age: String,
    pub ward: String,
}

impl QuestionnaireForm {
    pub fn new(name: impl Into<String>, age: impl Into<String>, ward: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            ward: ward.into(),
        }
    }
}

/// Why the questionnaire ended badly. Every variant fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormRejection {
    #[error("Form incomplete.")]
    Incomplete,

    #[error("Age must be a number.")]
    AgeNotNumber,

    #[error("Incorrect information.")]
    Incorrect,

    #[error("Time is up.")]
    TimeUp,

    #[error("You left the form unfinished.")]
    Abandoned,
}

/// Validate a submitted form. Name and ward compare case-insensitively.
pub fn check_form(form: &QuestionnaireForm, config: &QuestionnaireConfig) -> Result<(), FormRejection> {
    let name = form.name.trim();
    let age = form.age.trim();
    let ward = form.ward.trim();

    if name.is_empty() || age.is_empty() || (config.require_ward && ward.is_empty()) {
        return Err(FormRejection::Incomplete);
    }

    let age: i32 = age.parse().map_err(|_| FormRejection::AgeNotNumber)?;

    let name_ok = name.eq_ignore_ascii_case(config.expected_name.trim());
    let age_ok = i64::from(age) == i64::from(config.expected_age);
    let ward_ok = !config.require_ward || ward.eq_ignore_ascii_case(config.expected_ward.trim());

    if name_ok && age_ok && ward_ok {
        Ok(())
    } else {
        Err(FormRejection::Incorrect)
    }
}

/// The open form: its countdown and the paper object it was opened from.
#[derive(Debug, Clone, Default)]
pub struct QuestionnaireSession {
    open: bool,
    deadline: Deadline,
    source: Option<ObjectPath>,
}

impl QuestionnaireSession {
    /// Open the form with a countdown. Rejected while already open.
    pub fn open(&mut self, now: Timestamp, secs: f64, source: Option<ObjectPath>) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.deadline.start(now, secs);
        self.source = source;
        true
    }

    /// Close the form, returning the object it was opened from.
    pub fn close(&mut self) -> Option<ObjectPath> {
        self.open = false;
        self.deadline.cancel();
        self.source.take()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.open && self.deadline.is_due(now)
    }

    pub fn remaining(&self, now: Timestamp) -> Option<f64> {
        if self.open {
            self.deadline.remaining(now)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
