//! Actions: the state transitions a rule can trigger.

use room_rules::{DocumentData, ElementId, ObjectPath, StorySequence, TeleportTarget, Wristband};
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::manager::GameManager;
use crate::modal::PickupOffer;

fn default_true() -> bool {
    true
}

fn default_toast_seconds() -> f64 {
    2.0
}

/// Typed access to the player's inventory.
///
/// Pickup actions go through this capability instead of poking at game state,
/// so inventory side effects (the "Picked up" toast) stay in one place.
pub trait InventoryMutator {
    /// Add an item. Returns `true` if it was not held before.
    fn add_item(&mut self, item: &str, document: Option<DocumentData>) -> bool;

    fn remove_item(&mut self, item: &str) -> bool;

    fn has_item(&self, item: &str) -> bool;
}

/// A single step in an element's success or fail list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    SetFlag {
        flag: String,
        #[serde(default = "default_true")]
        value: bool,
    },
    AddItem {
        item: String,
        #[serde(default)]
        document: Option<DocumentData>,
    },
    RemoveItem {
        item: String,
    },
    /// Add an item, then remove the element's own object from the world.
    PickupItem {
        item: String,
        #[serde(default)]
        destroy: bool,
    },
    Teleport {
        target: TeleportTarget,
    },
    Toast {
        message: String,
        #[serde(default = "default_toast_seconds")]
        seconds: f64,
    },
    StartChase,
    OpenDoor {
        object: ObjectPath,
    },
    ToggleDrawer {
        drawer: ObjectPath,
    },
    /// Send the elevator platform to the other floor.
    TravelElevator {
        platform: ObjectPath,
    },
    SetActive {
        object: ObjectPath,
        active: bool,
    },
    SetActiveSelf {
        active: bool,
    },
    DestroySelf,
    ShowDocument {
        document: DocumentData,
        #[serde(default = "default_true")]
        mark_read: bool,
    },
    /// Show a document with a "Pick up" button that collects `item`.
    ShowThenPickup {
        document: DocumentData,
        item: String,
        #[serde(default = "default_true")]
        destroy_on_collect: bool,
        /// Refuse to open while another document is showing.
        #[serde(default = "default_true")]
        block_while_open: bool,
    },
    ShowWristband {
        #[serde(default)]
        wristband: Wristband,
    },
    ShowStory {
        sequence: StorySequence,
    },
    OpenQuestionnaire,
    ShowEnding {
        text: String,
    },
    StopScreamTimer,
}

impl Action {
    pub fn set_flag(flag: impl AsRef<str>, value: bool) -> Self {
        Action::SetFlag {
            flag: flag.as_ref().to_string(),
            value,
        }
    }

    pub fn toast(message: impl Into<String>, seconds: f64) -> Self {
        Action::Toast {
            message: message.into(),
            seconds,
        }
    }

    /// Short name used in reports and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Action::SetFlag { .. } => "set_flag",
            Action::AddItem { .. } => "add_item",
            Action::RemoveItem { .. } => "remove_item",
            Action::PickupItem { .. } => "pickup_item",
            Action::Teleport { .. } => "teleport",
            Action::Toast { .. } => "toast",
            Action::StartChase => "start_chase",
            Action::OpenDoor { .. } => "open_door",
            Action::ToggleDrawer { .. } => "toggle_drawer",
            Action::TravelElevator { .. } => "travel_elevator",
            Action::SetActive { .. } => "set_active",
            Action::SetActiveSelf { .. } => "set_active_self",
            Action::DestroySelf => "destroy_self",
            Action::ShowDocument { .. } => "show_document",
            Action::ShowThenPickup { .. } => "show_then_pickup",
            Action::ShowWristband { .. } => "show_wristband",
            Action::ShowStory { .. } => "show_story",
            Action::OpenQuestionnaire => "open_questionnaire",
            Action::ShowEnding { .. } => "show_ending",
            Action::StopScreamTimer => "stop_scream_timer",
        }
    }

    pub(crate) fn execute(&self, gm: &mut GameManager, source: &ActionSource) -> Result<(), ActionError> {
        match self {
            Action::SetFlag { flag, value } => {
                if flag.trim().is_empty() {
                    return Err(ActionError::MissingTarget("flag name".into()));
                }
                gm.state_mut().set_flag(flag, *value);
                Ok(())
            }
            Action::AddItem { item, document } => {
                let item = require_item(item)?;
                gm.add_item(item, document.clone());
                Ok(())
            }
            Action::RemoveItem { item } => {
                let item = require_item(item)?;
                gm.remove_item(item);
                Ok(())
            }
            Action::PickupItem { item, destroy } => {
                let item = require_item(item)?;
                let object = source.require_object(self.label())?;
                gm.add_item(item, None);
                if *destroy {
                    gm.destroy_object(object)
                } else {
                    gm.set_object_active(object, false)
                }
            }
            Action::Teleport { target } => {
                gm.teleport(*target);
                Ok(())
            }
            Action::Toast { message, seconds } => {
                gm.toast(message, *seconds);
                Ok(())
            }
            Action::StartChase => {
                gm.start_chase();
                Ok(())
            }
            Action::OpenDoor { object } => gm.open_object(object),
            Action::ToggleDrawer { drawer } => gm.toggle_object(drawer),
            Action::TravelElevator { platform } => gm.travel_elevator(platform),
            Action::SetActive { object, active } => gm.set_object_active(object, *active),
            Action::SetActiveSelf { active } => {
                let object = source.require_object(self.label())?;
                gm.set_object_active(object, *active)
            }
            Action::DestroySelf => {
                let object = source.require_object(self.label())?;
                gm.destroy_object(object)
            }
            Action::ShowDocument {
                document,
                mark_read,
            } => {
                gm.open_document(document.clone())?;
                if *mark_read {
                    if let Some(id) = &document.id {
                        gm.state_mut().mark_read(id.as_str());
                    }
                }
                Ok(())
            }
            Action::ShowThenPickup {
                document,
                item,
                destroy_on_collect,
                block_while_open,
            } => {
                if gm.is_document_open() {
                    if *block_while_open {
                        return Err(ActionError::Rejected("a document is already open"));
                    }
                    gm.close_document();
                }
                if item.trim().is_empty() {
                    return gm.open_document(document.clone());
                }
                gm.open_document_for_pickup(PickupOffer {
                    item: item.trim().to_string(),
                    document: document.clone(),
                    source: source.object.clone(),
                    destroy_source: *destroy_on_collect,
                })
            }
            Action::ShowWristband { wristband } => {
                let document = wristband.to_document(gm.today());
                gm.open_document(document)
            }
            Action::ShowStory { sequence } => gm.play_story(sequence.clone()),
            Action::OpenQuestionnaire => gm.open_questionnaire(source.object.clone()),
            Action::ShowEnding { text } => {
                gm.end(text);
                Ok(())
            }
            Action::StopScreamTimer => {
                gm.stop_scream_timer();
                Ok(())
            }
        }
    }
}

fn require_item(item: &str) -> Result<&str, ActionError> {
    let item = item.trim();
    if item.is_empty() {
        Err(ActionError::MissingTarget("item id".into()))
    } else {
        Ok(item)
    }
}

/// The element an action list runs on behalf of.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSource {
    pub element: ElementId,
    pub name: String,
    /// The element's backing world object, for "self" actions.
    pub object: Option<ObjectPath>,
}

impl ActionSource {
    /// A source for actions run outside any element.
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            element: ElementId::nil(),
            name: name.into(),
            object: None,
        }
    }

    fn require_object(&self, action: &str) -> Result<&ObjectPath, ActionError> {
        self.object
            .as_ref()
            .filter(|object| !object.is_empty())
            .ok_or_else(|| ActionError::MissingTarget(format!("object for {}", action)))
    }
}

/// Which of an element's lists ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Success,
    Fail,
}

/// Result of one action in a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub action: &'static str,
    pub result: Result<(), ActionError>,
}

/// Per-action results of running one branch, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub branch: Branch,
    pub outcomes: Vec<ActionOutcome>,
}

impl ActionReport {
    pub fn new(branch: Branch) -> Self {
        Self {
            branch,
            outcomes: Vec::new(),
        }
    }

    /// True when every action succeeded.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Run every action in order. A failing action is recorded and logged; the
/// rest of the list still runs.
pub(crate) fn run_actions(
    gm: &mut GameManager,
    actions: &[Action],
    source: &ActionSource,
    branch: Branch,
) -> ActionReport {
    let mut report = ActionReport::new(branch);

    for action in actions {
        let result = action.execute(gm, source);
        match &result {
            Ok(()) => {}
            Err(err) if err.is_rejection() => {
                tracing::debug!(element = %source.name, action = action.label(), %err, "action rejected");
            }
            Err(err) => {
                tracing::error!(element = %source.name, action = action.label(), %err, "action failed");
            }
        }
        report.outcomes.push(ActionOutcome {
            action: action.label(),
            result,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;
    use room_rules::{GameConfig, GameFlag};

    fn manager() -> GameManager {
        GameManager::new(GameConfig::default(), Collaborators::detached())
    }

    #[test]
    fn test_partial_failure_keeps_running() {
        let mut gm = manager();
        let actions = vec![
            Action::set_flag(GameFlag::CircuitFixed, true),
            Action::DestroySelf,
            Action::toast("Circuit connected.", 1.6),
        ];
        let report = run_actions(&mut gm, &actions, &ActionSource::detached("box"), Branch::Success);

        assert_eq!(report.len(), 3);
        assert!(!report.is_clean());
        let failures: Vec<_> = report.failures().map(|outcome| outcome.action).collect();
        assert_eq!(failures, vec!["destroy_self"]);

        assert!(gm.state().flag(GameFlag::CircuitFixed));
        assert_eq!(gm.snapshot().toast.as_deref(), Some("Circuit connected."));
    }

    #[test]
    fn test_second_document_rejected() {
        let mut gm = manager();
        let show = Action::ShowDocument {
            document: DocumentData::new("note", "Note"),
            mark_read: true,
        };
        let source = ActionSource::detached("note");

        assert!(show.execute(&mut gm, &source).is_ok());
        assert_eq!(
            show.execute(&mut gm, &source),
            Err(ActionError::Rejected("a document is already open"))
        );
        assert!(gm.state().has_read("note"));
        assert_eq!(gm.modal().block_count(), 1);
    }

    #[test]
    fn test_blank_item_is_missing_target() {
        let mut gm = manager();
        let add = Action::AddItem {
            item: "  ".into(),
            document: None,
        };
        assert!(matches!(
            add.execute(&mut gm, &ActionSource::detached("x")),
            Err(ActionError::MissingTarget(_))
        ));
    }

    #[test]
    fn test_action_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            actions: Vec<Action>,
        }

        let parsed: Wrapper = toml::from_str(
            r#"
            [[actions]]
            kind = "set_flag"
            flag = "doorUnlocked"

            [[actions]]
            kind = "toast"
            message = "Door unlocked."

            [[actions]]
            kind = "teleport"
            target = "TreatmentRoom"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.actions[0], Action::set_flag("doorUnlocked", true));
        assert_eq!(parsed.actions[1], Action::toast("Door unlocked.", 2.0));
        assert_eq!(
            parsed.actions[2],
            Action::Teleport {
                target: TeleportTarget::TreatmentRoom
            }
        );
    }
}
