//! Keypad session: a single pending submit callback plus the typed text.

/// Callback run after the keypad has closed, with the submitted code.
pub type KeypadSubmit<C> = Box<dyn FnOnce(&mut C, &str)>;

/// Holds at most one pending keypad request.
///
/// `C` is the context the callback receives (the game manager). The session
/// itself knows nothing about blocking; the caller pairs it with the modal stack.
pub struct KeypadSession<C> {
    pending: Option<KeypadSubmit<C>>,
    input: String,
}

impl<C> KeypadSession<C> {
    /// Longest code the keypad accepts.
    pub const MAX_LEN: usize = 16;

    pub fn new() -> Self {
        Self {
            pending: None,
            input: String::new(),
        }
    }

    /// Start a session. Rejected (returns `false`) while another is pending.
    pub fn open(&mut self, on_submit: KeypadSubmit<C>, prefill: &str) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(on_submit);
        self.set_input(prefill);
        true
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the typed text, truncated to [`Self::MAX_LEN`] characters.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.chars().take(Self::MAX_LEN).collect();
    }

    /// End the session, handing back the typed code and the callback.
    pub fn take_submit(&mut self) -> Option<(String, KeypadSubmit<C>)> {
        let callback = self.pending.take()?;
        Some((std::mem::take(&mut self.input), callback))
    }

    /// Drop the pending request without running it. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.input.clear();
        self.pending.take().is_some()
    }
}

impl<C> Default for KeypadSession<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for KeypadSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypadSession")
            .field("open", &self.is_open())
            .field("input", &self.input)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pending_request() {
        let mut keypad: KeypadSession<Vec<String>> = KeypadSession::new();
        assert!(keypad.open(Box::new(|log, code| log.push(format!("a:{}", code))), ""));
        assert!(!keypad.open(Box::new(|log, code| log.push(format!("b:{}", code))), ""));

        keypad.set_input("1234");
        let (code, callback) = keypad.take_submit().unwrap();
        let mut log = Vec::new();
        callback(&mut log, &code);

        assert_eq!(log, vec!["a:1234"]);
        assert!(!keypad.is_open());
        assert_eq!(keypad.input(), "");
    }

    #[test]
    fn test_input_truncated() {
        let mut keypad: KeypadSession<()> = KeypadSession::new();
        keypad.open(Box::new(|_, _| {}), "12345678901234567890");
        assert_eq!(keypad.input().len(), KeypadSession::<()>::MAX_LEN);
    }

    #[test]
    fn test_cancel_drops_callback() {
        let mut keypad: KeypadSession<u32> = KeypadSession::new();
        keypad.open(Box::new(|count, _| *count += 1), "99");

        assert!(keypad.cancel());
        assert!(!keypad.cancel());
        assert!(keypad.take_submit().is_none());
        assert_eq!(keypad.input(), "");
    }
}
