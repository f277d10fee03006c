//! Document viewer state: the open document and an optional pickup offer.

use room_rules::{DocumentData, ObjectPath};

/// "Pick up" context shown alongside a document opened from the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupOffer {
    pub item: String,
    pub document: DocumentData,
    /// World object to remove once picked up.
    pub source: Option<ObjectPath>,
    /// Destroy the source instead of disabling it.
    pub destroy_source: bool,
}

/// The currently open document, if any.
#[derive(Debug, Clone, Default)]
pub struct DocumentViewer {
    current: Option<DocumentData>,
    pickup: Option<PickupOffer>,
}

impl DocumentViewer {
    /// Open a document for reading. Rejected while one is already open.
    pub fn open(&mut self, document: DocumentData) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(document);
        self.pickup = None;
        true
    }

    /// Open a document with a "Pick up" button.
    pub fn open_for_pickup(&mut self, offer: PickupOffer) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(offer.document.clone());
        self.pickup = Some(offer);
        true
    }

    /// Close the document and clear any pickup context. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        self.pickup = None;
        self.current.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&DocumentData> {
        self.current.as_ref()
    }

    pub fn pickup(&self) -> Option<&PickupOffer> {
        self.pickup.as_ref()
    }

    /// Remove the pickup offer so it can be carried out.
    pub fn take_pickup(&mut self) -> Option<PickupOffer> {
        self.pickup.take()
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.pickup = None;
    }
}
