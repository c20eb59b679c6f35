//! Pointer and keyboard input
//!
//! A platform-neutral input model for the scatterplot surface:
//! - Pointer events in screen pixels relative to the surface
//! - Keyboard events for modifiers and escape
//! - The key map binding modifier keys to lasso, rotate and merge

use serde::{Deserialize, Serialize};

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on macOS
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// A modifier key that can be bound to an action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Alt,
    Cmd,
    Ctrl,
    Meta,
    Shift,
}

impl ModifierKey {
    /// Whether this key is held in `modifiers` (cmd and meta share a flag)
    pub fn is_held(&self, modifiers: &Modifiers) -> bool {
        match self {
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Cmd | ModifierKey::Meta => modifiers.meta,
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Shift => modifiers.shift,
        }
    }
}

/// Action a modifier key can trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    /// Primary drag draws a lasso
    Lasso,
    /// Primary drag uses the camera's other drag action
    Rotate,
    /// Selections add to the current selection
    Merge,
}

/// Binding of modifier keys to actions.
///
/// Keys left out of a serialized map are unbound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<KeyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<KeyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctrl: Option<KeyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<KeyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<KeyAction>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::empty()
            .bind(ModifierKey::Alt, KeyAction::Rotate)
            .bind(ModifierKey::Shift, KeyAction::Lasso)
            .bind(ModifierKey::Cmd, KeyAction::Merge)
    }
}

impl KeyMap {
    /// A key map with no bindings
    pub fn empty() -> Self {
        Self {
            alt: None,
            cmd: None,
            ctrl: None,
            meta: None,
            shift: None,
        }
    }

    fn slot(&mut self, key: ModifierKey) -> &mut Option<KeyAction> {
        match key {
            ModifierKey::Alt => &mut self.alt,
            ModifierKey::Cmd => &mut self.cmd,
            ModifierKey::Ctrl => &mut self.ctrl,
            ModifierKey::Meta => &mut self.meta,
            ModifierKey::Shift => &mut self.shift,
        }
    }

    fn bindings(&self) -> [(ModifierKey, Option<KeyAction>); 5] {
        [
            (ModifierKey::Alt, self.alt),
            (ModifierKey::Cmd, self.cmd),
            (ModifierKey::Ctrl, self.ctrl),
            (ModifierKey::Meta, self.meta),
            (ModifierKey::Shift, self.shift),
        ]
    }

    pub fn bind(mut self, key: ModifierKey, action: KeyAction) -> Self {
        *self.slot(key) = Some(action);
        self
    }

    pub fn action_for(&self, key: ModifierKey) -> Option<KeyAction> {
        self.bindings()
            .into_iter()
            .find_map(|(bound_key, action)| (bound_key == key).then_some(action).flatten())
    }

    /// First key bound to `action`
    pub fn key_for(&self, action: KeyAction) -> Option<ModifierKey> {
        self.bindings()
            .into_iter()
            .find_map(|(key, bound)| (bound == Some(action)).then_some(key))
    }

    /// Whether any key bound to `action` is held
    pub fn is_active(&self, action: KeyAction, modifiers: &Modifiers) -> bool {
        self.bindings()
            .into_iter()
            .any(|(key, bound)| bound == Some(action) && key.is_held(modifiers))
    }
}

/// How a plain primary drag is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "camelCase")]
pub enum MouseMode {
    #[default]
    PanZoom,
    Lasso,
    Rotate,
}

/// Keys the engine reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Shift,
    Control,
    Alt,
    Meta,
    Unknown(u32),
}

/// Keyboard event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed/released
    pub key: Key,
    /// Whether the key was pressed (true) or released (false)
    pub pressed: bool,
    /// Modifier state after the event
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn pressed(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            pressed: true,
            modifiers,
        }
    }

    pub fn released(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            pressed: false,
            modifiers,
        }
    }
}

/// Mouse button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Pointer event in screen pixels relative to the surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerEvent {
    /// Button pressed
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Pointer moved
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Button released (anywhere, not only over the surface)
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Wheel scrolled; `line_mode` deltas count lines instead of pixels
    #[serde(rename_all = "camelCase")]
    Wheel {
        x: f64,
        y: f64,
        delta_y: f64,
        #[serde(default)]
        line_mode: bool,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Pointer entered the surface
    Enter { x: f64, y: f64 },

    /// Pointer left the surface
    Leave,

    /// Double click
    DoubleClick {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Input focus lost mid-gesture
    Cancel,
}

impl PointerEvent {
    /// Get position for events that have one
    pub fn position(&self) -> Option<[f64; 2]> {
        match self {
            PointerEvent::Down { x, y, .. }
            | PointerEvent::Move { x, y, .. }
            | PointerEvent::Up { x, y, .. }
            | PointerEvent::Wheel { x, y, .. }
            | PointerEvent::Enter { x, y }
            | PointerEvent::DoubleClick { x, y, .. } => Some([*x, *y]),
            PointerEvent::Leave | PointerEvent::Cancel => None,
        }
    }

    /// Get modifiers for events that have them
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Wheel { modifiers, .. }
            | PointerEvent::DoubleClick { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }

    pub fn down(x: f64, y: f64, modifiers: Modifiers) -> Self {
        PointerEvent::Down {
            x,
            y,
            button: MouseButton::Left,
            modifiers,
        }
    }

    pub fn moved(x: f64, y: f64, modifiers: Modifiers) -> Self {
        PointerEvent::Move { x, y, modifiers }
    }

    pub fn up(x: f64, y: f64, modifiers: Modifiers) -> Self {
        PointerEvent::Up {
            x,
            y,
            button: MouseButton::Left,
            modifiers,
        }
    }
}
