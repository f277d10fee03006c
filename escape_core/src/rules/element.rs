//! Interactive elements: one generic type configured entirely by data.

use room_rules::{ElementId, ObjectPath};
use serde::{Deserialize, Serialize};

use super::{evaluate, Action, ActionSource, Condition, ConditionContext};

fn default_true() -> bool {
    true
}

fn default_prompt() -> String {
    "Interact".to_string()
}

/// Conditions checked before anything else. While closed, the element shows
/// no prompt and ignores interaction entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HardGate {
    pub all: Vec<Condition>,
}

/// A precondition that explains itself: when `condition` fails, `toast` is
/// shown and nothing else runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub condition: Condition,
    pub toast: String,
}

/// What pressing interact does once the gate and guards pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Evaluate conditions and run a branch right away.
    #[default]
    Direct,
    /// Open the keypad; the branch runs when a code is submitted.
    Keypad,
}

/// A scene object with rules attached.
///
/// Structure is fixed once registered. All runtime state lives in
/// [`GameState`](room_rules::GameState), never on the element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionElement {
    #[serde(default)]
    pub id: ElementId,
    pub name: String,

    /// Backing world object, target of the "self" actions.
    #[serde(default)]
    pub object: Option<ObjectPath>,

    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// AND the conditions when true, OR them when false.
    #[serde(default = "default_true")]
    pub require_all: bool,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub on_success: Vec<Action>,
    #[serde(default)]
    pub on_fail: Vec<Action>,

    /// Let the player interact (and hit `on_fail`) while conditions fail.
    #[serde(default = "default_true")]
    pub allow_interact_when_failing: bool,

    #[serde(default)]
    pub gate: Option<HardGate>,
    #[serde(default)]
    pub guards: Vec<Guard>,
    #[serde(default)]
    pub trigger: Trigger,
}

impl InteractionElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            object: None,
            prompt: default_prompt(),
            require_all: true,
            conditions: Vec::new(),
            on_success: Vec::new(),
            on_fail: Vec::new(),
            allow_interact_when_failing: true,
            gate: None,
            guards: Vec::new(),
            trigger: Trigger::Direct,
        }
    }

    pub fn with_object(mut self, object: impl Into<ObjectPath>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Pass when any condition holds instead of all of them.
    pub fn require_any(mut self) -> Self {
        self.require_all = false;
        self
    }

    pub fn on_success(mut self, actions: Vec<Action>) -> Self {
        self.on_success = actions;
        self
    }

    pub fn on_fail(mut self, actions: Vec<Action>) -> Self {
        self.on_fail = actions;
        self
    }

    pub fn allow_interact_when_failing(mut self, allow: bool) -> Self {
        self.allow_interact_when_failing = allow;
        self
    }

    pub fn with_gate(mut self, all: Vec<Condition>) -> Self {
        self.gate = Some(HardGate { all });
        self
    }

    pub fn with_guard(mut self, condition: Condition, toast: impl Into<String>) -> Self {
        self.guards.push(Guard {
            condition,
            toast: toast.into(),
        });
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn source(&self) -> ActionSource {
        ActionSource {
            element: self.id,
            name: self.name.clone(),
            object: self.object.clone(),
        }
    }

    pub fn gate_open(&self, ctx: &ConditionContext<'_>) -> bool {
        self.gate
            .as_ref()
            .map_or(true, |gate| evaluate(&gate.all, true, ctx))
    }

    pub fn conditions_pass(&self, ctx: &ConditionContext<'_>) -> bool {
        evaluate(&self.conditions, self.require_all, ctx)
    }

    /// Whether the prompt shows and interact is accepted.
    ///
    /// A gate, when present, decides on its own: the condition list is then
    /// only used to pick a branch.
    pub fn can_interact(&self, blocking: bool, ctx: &ConditionContext<'_>) -> bool {
        if blocking {
            return false;
        }
        if self.gate.is_some() {
            return self.gate_open(ctx);
        }
        self.allow_interact_when_failing || self.conditions_pass(ctx)
    }

    /// The first guard whose condition fails, if any.
    pub fn failing_guard(&self, ctx: &ConditionContext<'_>) -> Option<&Guard> {
        self.guards.iter().find(|guard| !guard.condition.check(ctx))
    }
}
