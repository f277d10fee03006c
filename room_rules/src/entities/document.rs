//! Readable documents: notes, forms, evidence photos, wristbands.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DocumentId;

/// A document the player can open and read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    /// Identity used for the read-documents set. Untitled scraps may have none.
    #[serde(default)]
    pub id: Option<DocumentId>,
    pub title: String,
    pub body: String,
    /// Optional image asset shown next to the text.
    #[serde(default)]
    pub image: Option<String>,
}

impl DocumentData {
    /// Create a new document with the given id and title.
    pub fn new(id: &str, title: impl Into<String>) -> Self {
        Self {
            id: DocumentId::parse(id),
            title: title.into(),
            body: String::new(),
            image: None,
        }
    }

    /// Set the body text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the image asset.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Fields printed on a patient wristband.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wristband {
    pub patient_name: String,
    pub sex: String,
    pub age: u32,
    pub ward_number: u32,
    pub admitted_days_ago: u32,
}

impl Default for Wristband {
    fn default() -> Self {
        Self {
            patient_name: "Lu".to_string(),
            sex: "F".to_string(),
            age: 19,
            ward_number: 302,
            admitted_days_ago: 7,
        }
    }
}

impl Wristband {
    /// Admission date relative to `today`.
    pub fn admitted_on(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.admitted_days_ago)))
            .unwrap_or(today)
    }

    /// Render the wristband as a document, dated relative to `today`.
    pub fn to_document(&self, today: NaiveDate) -> DocumentData {
        let body = format!(
            "Name: {}\nSex: {}\nAge: {}\nAdmit Date: {}\nWard: {}",
            self.patient_name,
            self.sex,
            self.age,
            self.admitted_on(today).format("%d %b %Y"),
            self.ward_number
        );
        DocumentData::new(&format!("wristband_{}", self.ward_number), "Patient Wristband")
            .with_body(body)
    }
}
