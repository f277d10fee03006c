//! Ready-made elements for the hospital escape scene.

use room_rules::{DocumentData, EndingKind, GameFlag, ObjectPath, StorySequence, TeleportTarget, Wristband};

use super::SceneDefinition;
use crate::rules::{Action, Condition, InteractionElement, Trigger};

/// Flag set once a safe has been opened.
pub const SAFE_OPENED: &str = "safe_opened";

/// Keypad lock on the patient room door. Uses the configured door password.
pub fn door_lock(object: &str, door_pivot: &str) -> InteractionElement {
    InteractionElement::new("door_lock")
        .with_object(object)
        .with_prompt("Enter password")
        .with_gate(vec![Condition::flag(GameFlag::DoorUnlocked, false)])
        .with_trigger(Trigger::Keypad)
        .with_conditions(vec![Condition::keypad_password(None)])
        .on_success(vec![
            Action::set_flag(GameFlag::DoorUnlocked, true),
            Action::OpenDoor {
                object: ObjectPath::new(door_pivot),
            },
            Action::toast("Door unlocked.", 1.5),
        ])
        .on_fail(vec![Action::toast("Wrong code.", 1.5)])
}

/// Fixing the circuit starts the doctor's patrol.
pub fn electrical_box(object: &str) -> InteractionElement {
    InteractionElement::new("electrical_box")
        .with_object(object)
        .with_prompt("Connect circuit")
        .with_conditions(vec![
            Condition::flag(GameFlag::DoorUnlocked, true),
            Condition::flag(GameFlag::CircuitFixed, false),
        ])
        .allow_interact_when_failing(false)
        .on_success(vec![
            Action::set_flag(GameFlag::CircuitFixed, true),
            Action::toast("Circuit connected.", 1.6),
            Action::StartChase,
        ])
}

/// A loose item. Disabled rather than destroyed so a restart brings it back.
pub fn pickup_item(object: &str, item: &str) -> InteractionElement {
    InteractionElement::new(format!("pickup_{}", item.to_lowercase()))
        .with_object(object)
        .with_prompt(format!("Pick up {}", item))
        .with_conditions(vec![
            Condition::flag(GameFlag::DoorUnlocked, true),
            Condition::has_item(item, false),
        ])
        .allow_interact_when_failing(false)
        .on_success(vec![Action::PickupItem {
            item: item.to_string(),
            destroy: false,
        }])
}

/// An item that is read first and collected from the document view.
pub fn inspectable_pickup(object: &str, item: &str, document: DocumentData) -> InteractionElement {
    InteractionElement::new(format!("inspect_{}", item.to_lowercase()))
        .with_object(object)
        .with_prompt(format!("Inspect {}", item))
        .with_conditions(vec![Condition::has_item(item, false)])
        .allow_interact_when_failing(false)
        .on_success(vec![Action::ShowThenPickup {
            document,
            item: item.to_string(),
            destroy_on_collect: false,
            block_while_open: true,
        }])
}

/// The closet. Only usable after the circuit is fixed and before reaching
/// the treatment room; hiding during the patrol sends the player down.
pub fn hiding_spot(object: &str) -> InteractionElement {
    InteractionElement::new("hiding_spot")
        .with_object(object)
        .with_prompt("Enter closet (hide)")
        .with_gate(vec![
            Condition::flag(GameFlag::CircuitFixed, true),
            Condition::flag(GameFlag::InTreatment, false),
        ])
        .with_conditions(vec![Condition::flag(GameFlag::InChase, true)])
        .on_success(vec![
            Action::set_flag(GameFlag::IsHidden, true),
            Action::set_flag(GameFlag::InChase, false),
            Action::set_flag(GameFlag::InTreatment, true),
            Action::Teleport {
                target: TeleportTarget::TreatmentRoom,
            },
            Action::set_flag(GameFlag::Screaming, true),
            Action::toast("A piercing scream echoes!", 2.2),
        ])
        .on_fail(vec![Action::toast(
            "You feel unsafe. Fix circuit first to trigger the patrol.",
            2.0,
        )])
}

/// The screaming girl. The calming item is kept so it can still be viewed.
pub fn girl(object: &str, calming_item: &str) -> InteractionElement {
    InteractionElement::new("girl")
        .with_object(object)
        .with_prompt("Calm the girl")
        .with_gate(vec![
            Condition::flag(GameFlag::InTreatment, true),
            Condition::flag(GameFlag::GirlCalmed, false),
        ])
        .with_conditions(vec![Condition::has_item(calming_item, true)])
        .on_success(vec![
            Action::set_flag(GameFlag::Screaming, false),
            Action::set_flag(GameFlag::GirlCalmed, true),
            Action::toast("She focuses on the object and slowly calms down...", 2.2),
        ])
        .on_fail(vec![Action::toast("You need something to calm her down.", 2.0)])
}

/// One of the two treatment-room buttons. The ending is picked from the
/// object name (`fail`/`red` or `success`/`blue`), else `fallback`.
pub fn ending_button(object: &str, fallback: EndingKind) -> InteractionElement {
    let path = ObjectPath::new(object);
    let kind = EndingKind::detect(path.leaf(), fallback);
    let (prompt, text) = match kind {
        EndingKind::Success => ("Press (Success)", "SUCCESS: You escaped."),
        EndingKind::Fail => ("Press (Fail)", "FAIL: You pressed the wrong button."),
    };

    InteractionElement::new(format!("ending_{}", path.leaf().to_lowercase()))
        .with_object(path)
        .with_prompt(prompt)
        .with_guard(
            Condition::flag(GameFlag::InTreatment, true),
            "You are not in the Treatment Room.",
        )
        .with_guard(Condition::flag(GameFlag::GirlCalmed, true), "Calm her down first.")
        .on_success(vec![
            Action::StopScreamTimer,
            Action::ShowEnding {
                text: text.to_string(),
            },
        ])
}

/// A keypad safe holding `loot`. With `require_questionnaire`, the form
/// must be passed before the keypad opens.
pub fn safe(object: &str, door: &str, loot: &str, password: &str, require_questionnaire: bool) -> InteractionElement {
    let mut element = InteractionElement::new("safe")
        .with_object(object)
        .with_prompt("Use Safe")
        .with_trigger(Trigger::Keypad);

    if require_questionnaire {
        element = element.with_guard(
            Condition::flag(GameFlag::QuestionnairePassed, true),
            "Please complete the questionnaire first.",
        );
    }

    element
        .with_guard(Condition::flag(SAFE_OPENED, false), "It's already open.")
        .with_conditions(vec![Condition::keypad_password(Some(password))])
        .on_success(vec![
            Action::set_flag(SAFE_OPENED, true),
            Action::toast("Unlocked.", 1.2),
            Action::OpenDoor {
                object: ObjectPath::new(door),
            },
            Action::SetActive {
                object: ObjectPath::new(loot),
                active: true,
            },
        ])
        .on_fail(vec![Action::toast("Wrong code.", 1.5)])
}

/// The admission form lying in the office.
pub fn questionnaire_paper(object: &str) -> InteractionElement {
    InteractionElement::new("questionnaire")
        .with_object(object)
        .with_prompt("Fill in the form")
        .on_success(vec![Action::OpenQuestionnaire])
}

pub fn drawer(object: &str) -> InteractionElement {
    let path = ObjectPath::new(object);
    InteractionElement::new(format!("drawer_{}", path.leaf().to_lowercase()))
        .with_object(path.clone())
        .with_prompt("Open/Close drawer")
        .on_success(vec![Action::ToggleDrawer { drawer: path }])
}

/// Elevator call panel. Dead until the circuit is fixed.
pub fn elevator_panel(object: &str, panel: &str) -> InteractionElement {
    InteractionElement::new("elevator_panel")
        .with_object(object)
        .with_prompt("Toggle panel")
        .with_guard(
            Condition::flag(GameFlag::CircuitFixed, true),
            "Please fix the circuit first.",
        )
        .on_success(vec![Action::ToggleDrawer {
            drawer: ObjectPath::new(panel),
        }])
}

/// The button inside the elevator. Travels only with power and the player aboard.
pub fn elevator_travel_button(object: &str, platform: &str) -> InteractionElement {
    InteractionElement::new("elevator_travel")
        .with_object(object)
        .with_prompt("Start elevator")
        .with_guard(
            Condition::flag(GameFlag::CircuitFixed, true),
            "Please connect the circuit first.",
        )
        .with_guard(
            Condition::flag(GameFlag::OnPlatform, true),
            "Stand on the elevator platform first.",
        )
        .on_success(vec![Action::TravelElevator {
            platform: ObjectPath::new(platform),
        }])
}

pub fn wristband(object: &str, wristband: Wristband) -> InteractionElement {
    InteractionElement::new("wristband")
        .with_object(object)
        .with_prompt("Read wristband")
        .on_success(vec![Action::ShowWristband { wristband }])
}

/// An object that plays a story when used.
pub fn story_trigger(name: &str, object: &str, sequence: StorySequence) -> InteractionElement {
    InteractionElement::new(name)
        .with_object(object)
        .with_prompt("Look")
        .on_success(vec![Action::ShowStory { sequence }])
}

/// The full hospital level.
pub fn hospital_scene() -> SceneDefinition {
    let photo = DocumentData::new("office_photo", "Old Photo")
        .with_body("A girl in a ward bed, clutching a rag doll. Someone wrote \"302\" on the back.")
        .with_image("photo.png");
    let memo = StorySequence::new([
        "The memo is dated last week.",
        "\"Patient in 302 responds only to familiar objects.\"",
    ])
    .with_title("Nurse's Memo");

    SceneDefinition::new()
        .with_element(door_lock("PatientRoom/Lock", "PatientRoom/DoorPivot"))
        .with_element(wristband("PatientRoom/Wristband", Wristband::default()))
        .with_element(pickup_item("PatientRoom/GirlRelevant", "GirlRelevant"))
        .with_element(electrical_box("Office/ElectricalBox"))
        .with_element(inspectable_pickup("Office/Photo", "Photo", photo))
        .with_element(questionnaire_paper("Office/Questionnaire"))
        .with_element(drawer("Office/Desk/Drawer"))
        .with_element(safe("Office/Safe", "Office/Safe/Door", "Office/Safe/Loot", "0420", true))
        .with_element(story_trigger("nurse_memo", "Office/Memo", memo))
        .with_element(hiding_spot("Office/Closet"))
        .with_element(elevator_panel("Office/ElevatorPanel", "Office/Elevator/Panel"))
        .with_element(elevator_travel_button(
            "Office/Elevator/TravelButton",
            "Office/Elevator/Platform",
        ))
        .with_element(girl("TreatmentRoom/Girl", "GirlRelevant"))
        .with_element(ending_button("TreatmentRoom/Button_Blue", EndingKind::Success))
        .with_element(ending_button("TreatmentRoom/Button_Red", EndingKind::Fail))
}
