//! The game manager: single owner of game state, the modal stack and every
//! timer, and the only entry point for the renderer and input adapter.

mod input;
mod snapshot;

pub use input::*;
pub use snapshot::*;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use room_rules::{
    DocumentData, ElementId, GameConfig, GameFlag, GameState, ObjectPath, StorySequence,
    TeleportTarget, Timestamp,
};

use crate::collaborators::{Collaborators, PlayerBody, WorldObjects};
use crate::error::{ActionError, SceneError};
use crate::modal::{
    check_form, DocumentViewer, FormRejection, KeypadSession, KeypadSubmit, ModalStack,
    PickupOffer, QuestionnaireForm, QuestionnaireSession, Surface,
};
use crate::rules::{
    run_actions, Action, ActionReport, ActionSource, Branch, ConditionContext, InteractionElement,
    InventoryMutator, Trigger,
};
use crate::scene::SceneDefinition;
use crate::story::StoryPlayer;
use crate::timers::{ChaseTick, ChaseTimer, ScreamTick, ScreamTimer, Toast};

const CAUGHT_REASON: &str = "Doctor found you (you didn't hide in time).";

/// What happened when the player pressed interact on an element.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractOutcome {
    /// Blocked by a modal, a closed gate or failing conditions. Nothing ran.
    Rejected,
    /// A guard failed; its toast is shown.
    Guarded(String),
    /// The keypad opened; the element resolves when a code is submitted.
    AwaitingKeypad,
    Completed(ActionReport),
}

/// Coordinates rules, modals and timers for one play session.
pub struct GameManager {
    config: GameConfig,
    state: GameState,
    modal: ModalStack,
    player: Box<dyn PlayerBody>,
    world: Box<dyn WorldObjects>,

    elements: HashMap<ElementId, Rc<InteractionElement>>,

    keypad: KeypadSession<GameManager>,
    documents: DocumentViewer,
    questionnaire: QuestionnaireSession,
    story: StoryPlayer,
    chase: ChaseTimer,
    scream: ScreamTimer,
    scream_fired: bool,
    elevator_opened: bool,

    toast: Option<Toast>,
    hint: String,
    ending: Option<String>,

    /// Objects this session disabled; re-enabled on restart.
    disabled_objects: BTreeSet<ObjectPath>,
    /// Destroyed objects can't come back.
    destroyed_objects: BTreeSet<ObjectPath>,

    rng: StdRng,
    now: Timestamp,
    today: NaiveDate,
    restarts: u32,
    last_report: Option<ActionReport>,
}

impl GameManager {
    pub fn new(config: GameConfig, collaborators: Collaborators) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let Collaborators {
            input,
            player,
            world,
        } = collaborators;

        Self {
            config,
            state: GameState::new(),
            modal: ModalStack::new(input),
            player,
            world,
            elements: HashMap::new(),
            keypad: KeypadSession::new(),
            documents: DocumentViewer::default(),
            questionnaire: QuestionnaireSession::default(),
            story: StoryPlayer::default(),
            chase: ChaseTimer::default(),
            scream: ScreamTimer::default(),
            scream_fired: false,
            elevator_opened: false,
            toast: None,
            hint: String::new(),
            ending: None,
            disabled_objects: BTreeSet::new(),
            destroyed_objects: BTreeSet::new(),
            rng,
            now: Timestamp::ZERO,
            today: chrono::Local::now().date_naive(),
            restarts: 0,
            last_report: None,
        }
    }

    /// Begin the session: objective toast, input mode, optional intro.
    pub fn start(&mut self, now: Timestamp) {
        self.now = now;
        tracing::info!("session started");

        let objective = self.config.objective_toast.clone();
        self.toast(&objective, 3.0);
        self.modal.apply();

        if self.config.play_intro_on_start {
            if let Some(intro) = self.config.intro.clone() {
                if let Err(err) = self.play_story(intro) {
                    tracing::warn!(%err, "intro story not played");
                }
            }
        }
    }

    // ---- elements ----

    pub fn register(&mut self, element: InteractionElement) -> Result<ElementId, SceneError> {
        let id = element.id;
        if self.elements.contains_key(&id) {
            return Err(SceneError::DuplicateElement(id));
        }
        tracing::debug!(element = %element.name, %id, "element registered");
        self.elements.insert(id, Rc::new(element));
        Ok(id)
    }

    /// Register every element of a scene, in order.
    pub fn load_scene(&mut self, scene: SceneDefinition) -> Result<Vec<ElementId>, SceneError> {
        scene
            .elements
            .into_iter()
            .map(|element| self.register(element))
            .collect()
    }

    pub fn element(&self, id: ElementId) -> Option<&InteractionElement> {
        self.elements.get(&id).map(Rc::as_ref)
    }

    /// Find an element by name (first match).
    pub fn element_named(&self, name: &str) -> Option<ElementId> {
        self.elements
            .values()
            .find(|element| element.name == name)
            .map(|element| element.id)
    }

    fn condition_ctx(&self) -> ConditionContext<'_> {
        ConditionContext {
            state: &self.state,
            door_password: &self.config.door_password,
            world: self.world.as_ref(),
        }
    }

    pub fn can_interact(&self, id: ElementId) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|element| element.can_interact(self.modal.is_blocking(), &self.condition_ctx()))
    }

    /// Press interact on an element.
    pub fn interact(&mut self, id: ElementId) -> Result<InteractOutcome, ActionError> {
        let element = self
            .elements
            .get(&id)
            .cloned()
            .ok_or(ActionError::UnknownElement(id))?;

        if !element.can_interact(self.modal.is_blocking(), &self.condition_ctx()) {
            tracing::debug!(element = %element.name, "interaction rejected");
            return Ok(InteractOutcome::Rejected);
        }

        let guard_toast = element
            .failing_guard(&self.condition_ctx())
            .map(|guard| guard.toast.clone());
        if let Some(message) = guard_toast {
            tracing::debug!(element = %element.name, %message, "guard failed");
            self.toast(&message, 2.0);
            return Ok(InteractOutcome::Guarded(message));
        }

        match element.trigger {
            Trigger::Direct => Ok(InteractOutcome::Completed(self.run_branch(&element))),
            Trigger::Keypad => {
                self.state.clear_keypad_entry();
                let element_id = element.id;
                let opened = self.open_keypad(
                    Box::new(move |gm: &mut GameManager, _code: &str| gm.resolve_element(element_id)),
                    "",
                );
                if opened {
                    Ok(InteractOutcome::AwaitingKeypad)
                } else {
                    Ok(InteractOutcome::Rejected)
                }
            }
        }
    }

    fn resolve_element(&mut self, id: ElementId) {
        match self.elements.get(&id).cloned() {
            Some(element) => {
                self.run_branch(&element);
            }
            None => tracing::warn!(%id, "keypad submitted for an unregistered element"),
        }
    }

    fn run_branch(&mut self, element: &InteractionElement) -> ActionReport {
        let passed = element.conditions_pass(&self.condition_ctx());
        tracing::debug!(element = %element.name, passed, "conditions evaluated");

        let (branch, actions) = if passed {
            (Branch::Success, &element.on_success)
        } else {
            (Branch::Fail, &element.on_fail)
        };
        let report = run_actions(self, actions, &element.source(), branch);
        self.last_report = Some(report.clone());
        report
    }

    /// Run an ad-hoc action list outside any element.
    pub fn run_actions(&mut self, actions: &[Action], source: &ActionSource) -> ActionReport {
        let report = run_actions(self, actions, source, Branch::Success);
        self.last_report = Some(report.clone());
        report
    }

    // ---- frame loop ----

    /// Advance one frame.
    ///
    /// Story input is resolved first and swallows the rest of the frame's
    /// input. While an ending is shown only restart is accepted. Timers run
    /// next; if they restart the session, world interaction is skipped.
    pub fn tick(&mut self, now: Timestamp, input: &FrameInput) {
        self.now = now;
        let restarts_before = self.restarts;

        let story_consumed = self.story.is_open() && self.ending.is_none();
        if story_consumed {
            if input.advance_story || input.story_clicked {
                self.story.request_advance();
            }
            if input.skip_story {
                self.story.request_skip();
            }
            self.story.tick(now, &mut self.modal);
        } else {
            self.handle_ui_input(input);
        }

        if self.ending.is_some() {
            if input.restart {
                self.restart();
            }
            return;
        }

        if self.restarts == restarts_before {
            self.tick_timers(now);
        }
        if self.restarts != restarts_before {
            return;
        }

        self.update_focus(input.focused, input.interact && !story_consumed);
    }

    fn handle_ui_input(&mut self, input: &FrameInput) {
        if input.toggle_inventory {
            self.toggle_inventory();
        }
        if self.ending.is_some() {
            return;
        }

        if input.close_document {
            self.close_document();
        }
        if input.pick_up_document {
            self.pick_up_from_document();
        }
        if let Some(item) = &input.view_item {
            if let Err(err) = self.view_item(item) {
                tracing::debug!(%item, %err, "inventory view ignored");
            }
        }

        match &input.keypad {
            Some(KeypadInput::Submit(code)) => {
                self.submit_keypad(code);
            }
            Some(KeypadInput::Cancel) => {
                self.cancel_keypad();
            }
            None => {}
        }

        match &input.questionnaire {
            Some(QuestionnaireInput::Submit(form)) => {
                self.submit_questionnaire(form);
            }
            Some(QuestionnaireInput::Close) => {
                self.abandon_questionnaire();
            }
            None => {}
        }
    }

    fn tick_timers(&mut self, now: Timestamp) {
        self.auto_open_elevator();

        match self.chase.tick(now, &mut self.state) {
            ChaseTick::Caught => {
                tracing::info!("caught during patrol");
                self.fail(CAUGHT_REASON);
                return;
            }
            ChaseTick::Escaped => tracing::info!("patrol evaded"),
            ChaseTick::Idle | ChaseTick::Running => {}
        }

        match self.scream.tick(now, &self.state) {
            ScreamTick::TimedOut => {
                let reason = self.config.scream.timeout_reason.clone();
                tracing::info!(fail = self.config.scream.fail_on_timeout, "scream timed out");
                self.toast(&reason, 2.0);
                if self.config.scream.fail_on_timeout {
                    self.fail(&reason);
                    return;
                }
                self.state.set_flag(GameFlag::Screaming, false);
            }
            ScreamTick::Calmed => tracing::info!("scream stopped in time"),
            ScreamTick::Idle | ScreamTick::Running => {}
        }

        if self.questionnaire.is_due(now) {
            self.reject_questionnaire(FormRejection::TimeUp);
        }
    }

    fn update_focus(&mut self, focused: Option<ElementId>, interact: bool) {
        let Some(id) = focused.filter(|id| self.can_interact(*id)) else {
            self.hint.clear();
            return;
        };

        if let Some(element) = self.elements.get(&id) {
            self.hint = element.prompt.clone();
        }
        if interact {
            if let Err(err) = self.interact(id) {
                tracing::warn!(%err, "interaction failed");
            }
        }
    }

    // ---- presentation ----

    pub fn toast(&mut self, message: &str, seconds: f64) {
        self.toast = Some(Toast::new(message, self.now, seconds));
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = hint.into();
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        let now = self.now;
        let blocking = self.modal.is_blocking();

        let document = self.documents.current().map(|doc| DocumentView {
            title: doc.title.clone(),
            body: doc.body.clone(),
            image: doc.image.clone(),
            pickup: self.documents.pickup().map(|offer| PickupButton {
                item: offer.item.clone(),
                label: if self.state.has_item(&offer.item) {
                    "Picked"
                } else {
                    "Pick up"
                },
            }),
        });

        let chase_seconds_left = if self.state.flag(GameFlag::InChase)
            && !self.state.flag(GameFlag::IsHidden)
            && self.ending.is_none()
        {
            self.chase.remaining(now)
        } else {
            None
        };

        let scream_seconds_left = if self.state.flag(GameFlag::Screaming)
            && !self.state.flag(GameFlag::GirlCalmed)
        {
            self.scream.remaining(now)
        } else {
            None
        };

        let toast = self.toast.as_ref().filter(|toast| toast.is_visible(now));

        PresentationSnapshot {
            now: now.as_secs(),
            hint: (!blocking && !self.hint.is_empty()).then(|| self.hint.clone()),
            toast: toast.map(|toast| toast.text.clone()),
            toast_expires_at: toast.map(|toast| toast.expires_at.as_secs()),
            inventory_open: self.modal.surface(Surface::Inventory),
            inventory: self
                .state
                .inventory()
                .map(|item| InventoryRow {
                    item: item.to_string(),
                    has_document: self.state.item_document(item).is_some(),
                })
                .collect(),
            document,
            keypad: self.keypad.is_open().then(|| KeypadView {
                input: self.keypad.input().to_string(),
            }),
            questionnaire_seconds_left: self.questionnaire.remaining(now),
            story: self.story.view(),
            chase_seconds_left,
            scream_seconds_left,
            ending: self.ending.clone(),
            blocking,
        }
    }

    // ---- keypad ----

    /// Open the keypad with a submit callback. Rejected while one is pending.
    pub fn open_keypad(&mut self, on_submit: KeypadSubmit<GameManager>, prefill: &str) -> bool {
        if !self.keypad.open(on_submit, prefill) {
            tracing::debug!("keypad already open");
            return false;
        }
        self.modal.push();
        true
    }

    pub fn set_keypad_input(&mut self, text: &str) {
        self.keypad.set_input(text);
    }

    /// Submit a code: record it, close the keypad, then run the callback.
    pub fn submit_keypad(&mut self, code: &str) -> bool {
        if !self.keypad.is_open() {
            return false;
        }
        self.keypad.set_input(code);
        let Some((entry, on_submit)) = self.keypad.take_submit() else {
            return false;
        };
        self.state.record_keypad_entry(&entry);
        self.modal.pop();
        on_submit(self, &entry);
        true
    }

    pub fn cancel_keypad(&mut self) -> bool {
        if !self.keypad.cancel() {
            return false;
        }
        self.modal.pop();
        true
    }

    // ---- documents & inventory ----

    pub fn is_document_open(&self) -> bool {
        self.documents.is_open()
    }

    pub fn open_document(&mut self, document: DocumentData) -> Result<(), ActionError> {
        if !self.documents.open(document) {
            return Err(ActionError::Rejected("a document is already open"));
        }
        self.modal.push();
        Ok(())
    }

    /// Open a document with a "Pick up" button. Opening counts as reading it.
    pub fn open_document_for_pickup(&mut self, offer: PickupOffer) -> Result<(), ActionError> {
        let read_id = offer.document.id.clone();
        if !self.documents.open_for_pickup(offer) {
            return Err(ActionError::Rejected("a document is already open"));
        }
        if let Some(id) = read_id {
            self.state.mark_read(id.as_str());
        }
        self.modal.push();
        Ok(())
    }

    pub fn close_document(&mut self) -> bool {
        if !self.documents.close() {
            return false;
        }
        self.modal.pop();
        true
    }

    /// Collect the offered item, remove its source object and close the document.
    /// Does nothing once the item is held, matching the disabled "Picked" button.
    pub fn pick_up_from_document(&mut self) -> bool {
        let held = match self.documents.pickup() {
            Some(offer) => self.state.has_item(&offer.item),
            None => return false,
        };
        if held {
            tracing::debug!("pickup ignored, item already held");
            return false;
        }
        let Some(offer) = self.documents.take_pickup() else {
            return false;
        };

        self.add_item(&offer.item, Some(offer.document.clone()));
        if let Some(source) = &offer.source {
            let removed = if offer.destroy_source {
                self.destroy_object(source)
            } else {
                self.set_object_active(source, false)
            };
            if let Err(err) = removed {
                tracing::warn!(%err, "pickup source not removed");
            }
        }

        self.close_document();
        true
    }

    /// Open the document attached to a held item.
    pub fn view_item(&mut self, item: &str) -> Result<(), ActionError> {
        let document = self
            .state
            .item_document(item)
            .cloned()
            .ok_or_else(|| ActionError::MissingTarget(format!("document for {}", item.trim())))?;
        self.open_document(document)
    }

    /// Show or hide the inventory. Ignored while the ending is shown.
    pub fn toggle_inventory(&mut self) -> bool {
        if self.ending.is_some() {
            return false;
        }
        let open = !self.modal.surface(Surface::Inventory);
        self.modal.set_surface(Surface::Inventory, open);
        true
    }

    // ---- story ----

    pub fn play_story(&mut self, sequence: StorySequence) -> Result<(), ActionError> {
        self.story.play(sequence, self.now, &mut self.modal)
    }

    pub fn request_story_advance(&mut self) {
        self.story.request_advance();
    }

    pub fn skip_story(&mut self) {
        self.story.request_skip();
    }

    pub fn is_story_open(&self) -> bool {
        self.story.is_open()
    }

    // ---- questionnaire ----

    pub fn open_questionnaire(&mut self, source: Option<ObjectPath>) -> Result<(), ActionError> {
        if self.config.questionnaire.one_time_only && self.state.flag(GameFlag::QuestionnairePassed) {
            self.toast("You already completed the form.", 1.5);
            return Ok(());
        }

        let secs = self.config.questionnaire.time_limit_seconds;
        if !self.questionnaire.open(self.now, secs, source) {
            return Err(ActionError::Rejected("the questionnaire is already open"));
        }
        tracing::info!(seconds = secs, "questionnaire opened");
        self.modal.push();
        Ok(())
    }

    /// Submit the form. Returns whether it was accepted; a rejected form fails the run.
    pub fn submit_questionnaire(&mut self, form: &QuestionnaireForm) -> bool {
        if !self.questionnaire.is_open() {
            return false;
        }

        match check_form(form, &self.config.questionnaire) {
            Ok(()) => {
                let source = self.questionnaire.close();
                self.modal.pop();
                self.state.set_flag(GameFlag::QuestionnairePassed, true);
                tracing::info!("questionnaire accepted");
                self.toast("Form accepted! You may proceed.", 2.5);
                if let Some(paper) = source {
                    if let Err(err) = self.set_object_active(&paper, false) {
                        tracing::warn!(%err, "questionnaire paper not disabled");
                    }
                }
                true
            }
            Err(rejection) => {
                self.reject_questionnaire(rejection);
                false
            }
        }
    }

    /// Close the form unfinished, which fails the run.
    pub fn abandon_questionnaire(&mut self) -> bool {
        if !self.questionnaire.is_open() {
            return false;
        }
        self.reject_questionnaire(FormRejection::Abandoned);
        true
    }

    fn reject_questionnaire(&mut self, rejection: FormRejection) {
        self.questionnaire.close();
        self.modal.pop();
        tracing::info!(%rejection, "questionnaire rejected");
        let reason = format!("{} ({})", self.config.questionnaire.fail_reason, rejection);
        self.fail(&reason);
    }

    // ---- chase, scream, zones ----

    /// Start the doctor's patrol with a duration drawn from the configured range.
    pub fn start_chase(&mut self) -> f64 {
        let min = self.config.chase.min_seconds;
        let max = self.config.chase.max_seconds;
        let secs = if min.is_finite() && max.is_finite() && max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        };
        self.start_chase_for(secs);
        secs
    }

    pub fn start_chase_for(&mut self, secs: f64) {
        self.chase.start(self.now, secs, &mut self.state);
        tracing::info!(seconds = secs, "patrol started");
        self.toast(
            &format!("Doctor patrol started ({:.0}s). Hide in the closet!", secs),
            2.2,
        );
    }

    /// The player walked into the treatment room's scream trigger.
    /// Returns whether the scream started.
    pub fn enter_scream_zone(&mut self) -> bool {
        if self.config.scream.auto_set_in_treatment {
            self.state.set_flag(GameFlag::InTreatment, true);
        }
        if self.state.flag(GameFlag::GirlCalmed) {
            return false;
        }
        if self.config.scream.trigger_once && self.scream_fired {
            return false;
        }

        self.scream_fired = true;
        self.state.set_flag(GameFlag::Screaming, true);
        let message = self.config.scream.toast_on_scream.clone();
        if !message.is_empty() {
            self.toast(&message, 2.0);
        }
        let secs = self.config.scream.time_limit_seconds;
        self.scream.start(self.now, secs);
        tracing::info!(seconds = secs, "scream started");
        true
    }

    pub fn stop_scream_timer(&mut self) {
        if self.scream.is_running() {
            tracing::info!("scream timer stopped");
        }
        self.scream.stop();
    }

    /// The player stepped onto the elevator platform. Ends a running chase;
    /// returns whether it did.
    pub fn enter_safe_zone(&mut self) -> bool {
        self.state.set_flag(GameFlag::OnPlatform, true);
        if !self.state.flag(GameFlag::InChase) {
            return false;
        }
        self.state.set_flag(GameFlag::IsHidden, true);
        self.state.set_flag(GameFlag::InChase, false);
        tracing::info!("hidden on the elevator platform");
        true
    }

    pub fn leave_safe_zone(&mut self) {
        self.state.set_flag(GameFlag::OnPlatform, false);
    }

    /// Open the elevator door and panel the first time the circuit is fixed.
    fn auto_open_elevator(&mut self) {
        let elevator = &self.config.elevator;
        if self.elevator_opened
            || !elevator.auto_open_when_circuit_fixed
            || !self.state.flag(GameFlag::CircuitFixed)
        {
            return;
        }
        self.elevator_opened = true;

        let door = elevator.door.clone();
        let panel = elevator.panel.clone();
        tracing::info!(%door, "elevator powered");
        if let Err(err) = self.open_object(&door) {
            tracing::warn!(%err, "elevator door not opened");
        }
        if self.world.is_open(&panel) != Some(true) {
            if let Err(err) = self.open_object(&panel) {
                tracing::warn!(%err, "elevator panel not opened");
            }
        }
    }

    // ---- world requests ----

    pub fn teleport(&mut self, target: TeleportTarget) {
        let pose = self.config.spawns.pose(target);
        tracing::debug!(?target, "teleport");
        self.player.teleport(pose);
    }

    pub fn open_object(&mut self, object: &ObjectPath) -> Result<(), ActionError> {
        if self.world.open(object) {
            Ok(())
        } else {
            Err(ActionError::UnknownObject(object.to_string()))
        }
    }

    pub fn toggle_object(&mut self, object: &ObjectPath) -> Result<(), ActionError> {
        if self.world.toggle(object) {
            Ok(())
        } else {
            Err(ActionError::UnknownObject(object.to_string()))
        }
    }

    /// Move the elevator platform, carrying the player, to the other floor.
    pub fn travel_elevator(&mut self, platform: &ObjectPath) -> Result<(), ActionError> {
        tracing::info!(%platform, "elevator travelling");
        self.toggle_object(platform)
    }

    /// Enable or disable an object. Disabled objects come back on restart.
    pub fn set_object_active(&mut self, object: &ObjectPath, active: bool) -> Result<(), ActionError> {
        if !self.world.set_active(object, active) {
            return Err(ActionError::UnknownObject(object.to_string()));
        }
        if active {
            self.disabled_objects.remove(object);
        } else {
            self.disabled_objects.insert(object.clone());
        }
        Ok(())
    }

    pub fn destroy_object(&mut self, object: &ObjectPath) -> Result<(), ActionError> {
        if !self.world.destroy(object) {
            return Err(ActionError::UnknownObject(object.to_string()));
        }
        self.disabled_objects.remove(object);
        self.destroyed_objects.insert(object.clone());
        Ok(())
    }

    // ---- session lifecycle ----

    /// Show an ending. Terminal until restart.
    pub fn end(&mut self, text: &str) {
        tracing::info!(%text, "ending shown");
        self.ending = Some(text.to_string());
        self.modal.set_surface(Surface::Ending, true);
    }

    /// Fail the run: restart, then show why.
    pub fn fail(&mut self, reason: &str) {
        tracing::info!(%reason, "run failed");
        self.restart();
        self.toast(&format!("FAIL: {}", reason), 2.5);
    }

    /// Return to a fresh session: state cleared, modals closed, timers
    /// cancelled, disabled objects re-enabled and the player at the spawn.
    pub fn restart(&mut self) {
        tracing::info!(restarts = self.restarts + 1, "restarting session");

        self.state.reset();
        self.keypad.cancel();
        self.documents.reset();
        self.questionnaire.reset();
        self.story.reset();
        self.chase.reset();
        self.scream.stop();
        self.scream_fired = false;
        self.elevator_opened = false;
        self.ending = None;
        self.hint.clear();
        self.last_report = None;
        self.modal.reset();

        let mut restore = std::mem::take(&mut self.disabled_objects);
        restore.extend(self.config.restore_on_restart.iter().cloned());
        for object in &restore {
            if self.destroyed_objects.contains(object) {
                tracing::warn!(%object, "destroyed object can't be restored");
                continue;
            }
            if !self.world.set_active(object, true) {
                tracing::debug!(%object, "restore target not found");
            }
        }

        self.teleport(TeleportTarget::PatientRoom);
        self.restarts += 1;

        let message = self.config.restart_toast.clone();
        self.toast(&message, 2.5);
    }

    // ---- accessors ----

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn modal(&self) -> &ModalStack {
        &self.modal
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Pin the calendar date used for dated documents.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn restart_count(&self) -> u32 {
        self.restarts
    }

    pub fn ending(&self) -> Option<&str> {
        self.ending.as_deref()
    }

    /// Report of the most recent branch run, for diagnostics.
    pub fn last_report(&self) -> Option<&ActionReport> {
        self.last_report.as_ref()
    }
}

impl InventoryMutator for GameManager {
    fn add_item(&mut self, item: &str, document: Option<DocumentData>) -> bool {
        let added = self.state.add_item(item, document);
        self.toast(&format!("Picked up: {}", item.trim()), 2.0);
        added
    }

    fn remove_item(&mut self, item: &str) -> bool {
        self.state.remove_item(item)
    }

    fn has_item(&self, item: &str) -> bool {
        self.state.has_item(item)
    }
}

impl std::fmt::Debug for GameManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameManager")
            .field("now", &self.now)
            .field("state", &self.state)
            .field("modal", &self.modal)
            .field("elements", &self.elements.len())
            .field("ending", &self.ending)
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Condition;

    fn manager() -> GameManager {
        GameManager::new(GameConfig::default(), Collaborators::detached())
    }

    #[test]
    fn test_start_shows_objective() {
        let mut gm = manager();
        gm.start(Timestamp::ZERO);
        assert_eq!(
            gm.snapshot().toast.as_deref(),
            Some("Objective: Go to the Lock. Press E to enter password.")
        );
    }

    #[test]
    fn test_start_plays_intro() {
        let config = GameConfig {
            intro: Some(StorySequence::new(["You wake up.", "The door is locked."])),
            play_intro_on_start: true,
            ..GameConfig::default()
        };
        let mut gm = GameManager::new(config, Collaborators::detached());
        gm.start(Timestamp::ZERO);

        assert!(gm.is_story_open());
        assert_eq!(gm.snapshot().story.unwrap().line, "You wake up.");
        assert!(gm.modal().is_blocking());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut gm = manager();
        let element = InteractionElement::new("lamp");
        gm.register(element.clone()).unwrap();
        assert!(matches!(gm.register(element), Err(SceneError::DuplicateElement(_))));
    }

    #[test]
    fn test_hint_follows_focus() {
        let mut gm = manager();
        let id = gm
            .register(InteractionElement::new("lamp").with_prompt("Switch on"))
            .unwrap();

        gm.tick(Timestamp::from_secs(0.1), &FrameInput::looking_at(id));
        assert_eq!(gm.snapshot().hint.as_deref(), Some("Switch on"));

        gm.tick(Timestamp::from_secs(0.2), &FrameInput::idle());
        assert_eq!(gm.snapshot().hint, None);
    }

    #[test]
    fn test_blocked_interaction_is_rejected() {
        let mut gm = manager();
        let id = gm
            .register(InteractionElement::new("lamp").on_success(vec![Action::toast("on", 1.0)]))
            .unwrap();

        gm.toggle_inventory();
        assert_eq!(gm.interact(id), Ok(InteractOutcome::Rejected));

        gm.toggle_inventory();
        assert!(matches!(gm.interact(id), Ok(InteractOutcome::Completed(_))));
    }

    #[test]
    fn test_guard_toasts_and_stops() {
        let mut gm = manager();
        let id = gm
            .register(
                InteractionElement::new("button")
                    .with_guard(Condition::flag(GameFlag::InTreatment, true), "Not here.")
                    .on_success(vec![Action::ShowEnding { text: "done".into() }]),
            )
            .unwrap();

        assert_eq!(gm.interact(id), Ok(InteractOutcome::Guarded("Not here.".into())));
        assert_eq!(gm.ending(), None);
        assert_eq!(gm.snapshot().toast.as_deref(), Some("Not here."));
    }

    #[test]
    fn test_unknown_element() {
        let mut gm = manager();
        let id = ElementId::new();
        assert_eq!(gm.interact(id), Err(ActionError::UnknownElement(id)));
    }

    #[test]
    fn test_ending_only_accepts_restart() {
        let mut gm = manager();
        gm.end("SUCCESS: You escaped.");
        assert!(gm.modal().is_blocking());

        let toggle = FrameInput {
            toggle_inventory: true,
            ..FrameInput::default()
        };
        gm.tick(Timestamp::from_secs(1.0), &toggle);
        assert!(!gm.modal().surface(Surface::Inventory));

        let restart = FrameInput {
            restart: true,
            ..FrameInput::default()
        };
        gm.tick(Timestamp::from_secs(2.0), &restart);
        assert_eq!(gm.ending(), None);
        assert_eq!(gm.restart_count(), 1);
        assert!(!gm.modal().is_blocking());
    }

    #[test]
    fn test_view_item_document() {
        let mut gm = manager();
        gm.add_item("Photo", Some(DocumentData::new("photo", "Old Photo")));
        gm.add_item("Key", None);

        assert!(gm.view_item("key").is_err());
        assert!(gm.view_item("photo").is_ok());
        assert_eq!(gm.snapshot().document.unwrap().title, "Old Photo");

        let rows = gm.snapshot().inventory;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|row| row.item == "Photo" && row.has_document));
    }

    #[test]
    fn test_seeded_chase_duration_in_range() {
        let config = GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        };
        let mut gm = GameManager::new(config, Collaborators::detached());
        let secs = gm.start_chase();
        assert!((10.0..=20.0).contains(&secs));
        assert!(gm.state().flag(GameFlag::InChase));
    }

    #[test]
    fn test_pickup_ignored_when_item_held() {
        let mut gm = manager();
        gm.add_item("Photo", None);

        let offer = PickupOffer {
            item: "Photo".into(),
            document: DocumentData::new("office_photo", "Old Photo"),
            source: Some(ObjectPath::new("Office/Photo")),
            destroy_source: false,
        };
        gm.open_document_for_pickup(offer).unwrap();
        assert_eq!(gm.snapshot().document.unwrap().pickup.unwrap().label, "Picked");

        assert!(!gm.pick_up_from_document());
        assert!(gm.is_document_open());
        assert_eq!(gm.modal().block_count(), 1);
        assert!(gm.state().item_document("Photo").is_none());
    }

    #[test]
    fn test_toast_expiry_in_snapshot() {
        let mut gm = manager();
        gm.tick(Timestamp::from_secs(1.0), &FrameInput::idle());
        gm.toast("Unlocked.", 1.5);

        let snapshot = gm.snapshot();
        assert_eq!(snapshot.toast.as_deref(), Some("Unlocked."));
        assert_eq!(snapshot.toast_expires_at, Some(2.5));

        gm.tick(Timestamp::from_secs(3.0), &FrameInput::idle());
        let snapshot = gm.snapshot();
        assert_eq!(snapshot.toast, None);
        assert_eq!(snapshot.toast_expires_at, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut gm = manager();
        gm.start(Timestamp::ZERO);
        let json = gm.snapshot().to_json().unwrap();
        assert!(json.contains("\"blocking\":false"));
    }
}
