//! Input events for canvas interaction.
//!
//! Coordinates are canvas-local: the host subtracts the canvas origin
//! before handing events over.

use serde::{Deserialize, Serialize};

use crate::{ContentKind, SectionId};

/// Key names the editor reacts to (DOM `KeyboardEvent.key` values).
pub mod keys {
    /// Toggles canvas (split) mode.
    pub const ALT: &str = "Alt";
    /// Held to split vertically instead of horizontally.
    pub const CONTROL: &str = "Control";
    /// Deletes the selected section.
    pub const BACKSPACE: &str = "Backspace";
    /// Deletes the selected section.
    pub const DELETE: &str = "Delete";
    /// Leaves content editing.
    pub const ENTER: &str = "Enter";
    /// With Control/Meta: undo.
    pub const UNDO: &str = "z";
    /// With Control/Meta: redo.
    pub const REDO: &str = "y";
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Primary button pressed over the canvas.
    PointerDown {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Pointer moved.
    PointerMove {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Primary button released.
    PointerUp {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Pointer left the canvas.
    PointerLeave,

    /// Click on a section.
    Click {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Double click on a section.
    DoubleClick {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },

    /// Scroll wheel over a section.
    Wheel {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Vertical scroll delta (positive scrolls down).
        delta_y: f64,
    },

    /// Keyboard event.
    Key {
        /// Key name.
        key: String,
        /// Whether the key is pressed.
        pressed: bool,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },

    /// Mouse down on a section's merge handle.
    MergeHandleDown {
        /// Section owning the handle.
        section: SectionId,
    },

    /// A toolbar item is dragged over the canvas.
    DragOver {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// The dragged toolbar item left its section.
    DragLeave,

    /// A toolbar item was dropped.
    Drop {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Kind of content carried by the dragged item.
        kind: ContentKind,
    },
}

impl InputEvent {
    /// Key-down event with no modifiers.
    #[must_use]
    pub fn key_down(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            pressed: true,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Key-up event with no modifiers.
    #[must_use]
    pub fn key_up(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            pressed: false,
            modifiers: KeyModifiers::default(),
        }
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
#[serde(default)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Control or Command, the platform shortcut modifier.
    #[must_use]
    pub const fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Modifiers with only Control held.
    #[must_use]
    pub const fn ctrl() -> Self {
        Self {
            shift: false,
            ctrl: true,
            alt: false,
            meta: false,
        }
    }
}
