//! # PageGrid CLI
//!
//! Replays scripted editor sessions against [`pagegrid_core::Editor`].
//!
//! A script is a JSON array of [`ScriptStep`]s. Each step is either a raw
//! [`InputEvent`] (tagged with `"type"`) or a host [`Command`] (tagged with
//! `"command"`). Commands address sections by canvas position because
//! section ids are generated fresh on every run.
//!
//! ```json
//! [
//!   { "command": "toggle_canvas_mode" },
//!   { "type": "pointer_down", "x": 400, "y": 300 },
//!   { "type": "drop", "x": 100, "y": 100, "kind": "image" },
//!   { "command": "attach_media", "x": 100, "y": 100, "kind": "image", "reference": "blob:a" },
//!   { "command": "undo" }
//! ]
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::{Path, PathBuf};

use pagegrid_core::{
    ContentKind, Editor, EditorConfig, EditorError, InputEvent, Layout, Outcome, Point, SectionId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Script JSON did not parse.
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),

    /// Engine-level error (bad configuration, serialization).
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// A command addressed a point with no section under it.
    #[error("Step {step}: no section at ({x}, {y})")]
    NoSectionAt {
        /// Zero-based step index.
        step: usize,
        /// Canvas x coordinate.
        x: f64,
        /// Canvas y coordinate.
        y: f64,
    },
}

/// Result alias for replay operations.
pub type ReplayResult<T> = std::result::Result<T, ReplayError>;

/// Host-side actions that are not pointer or keyboard input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Answer a media request with a file reference.
    AttachMedia {
        /// Canvas x of the target section.
        x: f64,
        /// Canvas y of the target section.
        y: f64,
        /// Media kind.
        kind: ContentKind,
        /// Object URL or other opaque reference.
        reference: String,
    },
    /// Replace the text of a text section.
    EditText {
        /// Canvas x of the target section.
        x: f64,
        /// Canvas y of the target section.
        y: f64,
        /// New text.
        value: String,
    },
    /// Remove a section's content.
    ClearContent {
        /// Canvas x of the target section.
        x: f64,
        /// Canvas y of the target section.
        y: f64,
    },
    /// Press the merge handle of the section under a point.
    MergeFrom {
        /// Canvas x of the source section.
        x: f64,
        /// Canvas y of the source section.
        y: f64,
    },
    /// Flip the split tool.
    ToggleCanvasMode,
    /// Undo one step.
    Undo,
    /// Redo one step.
    Redo,
}

/// One entry in a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// A host command.
    Command(Command),
    /// A raw input event.
    Event(InputEvent),
}

/// Read a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// steps.
pub fn load_script(path: &Path) -> ReplayResult<Vec<ScriptStep>> {
    let text = read(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Read and validate an editor configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or fails
/// validation.
pub fn load_config(path: &Path) -> ReplayResult<EditorConfig> {
    let text = read(path)?;
    Ok(EditorConfig::from_json(&text)?)
}

/// Read a layout saved as JSON, to resume editing from.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a layout.
pub fn load_layout(path: &Path) -> ReplayResult<Layout> {
    let text = read(path)?;
    Ok(Layout::from_json(&text)?)
}

fn read(path: &Path) -> ReplayResult<String> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Run every step against the editor, returning one outcome per step.
///
/// # Errors
///
/// Stops at the first command whose point has no section under it.
pub fn replay(editor: &mut Editor, steps: &[ScriptStep]) -> ReplayResult<Vec<Outcome>> {
    let mut outcomes = Vec::with_capacity(steps.len());
    for (step, entry) in steps.iter().enumerate() {
        let outcome = match entry {
            ScriptStep::Event(event) => editor.handle(event),
            ScriptStep::Command(command) => run_command(editor, step, command)?,
        };
        tracing::debug!(step, ?outcome, "Replayed step");
        outcomes.push(outcome);
    }
    tracing::info!(
        steps = steps.len(),
        sections = editor.layout().len(),
        "Replay finished"
    );
    Ok(outcomes)
}

fn run_command(editor: &mut Editor, step: usize, command: &Command) -> ReplayResult<Outcome> {
    let outcome = match command {
        Command::AttachMedia {
            x,
            y,
            kind,
            reference,
        } => {
            let id = section_at(editor, step, *x, *y)?;
            editor.attach_media(id, *kind, reference.clone())
        }
        Command::EditText { x, y, value } => {
            let id = section_at(editor, step, *x, *y)?;
            editor.edit_text(id, value.clone())
        }
        Command::ClearContent { x, y } => {
            let id = section_at(editor, step, *x, *y)?;
            editor.clear_content(id)
        }
        Command::MergeFrom { x, y } => {
            let section = section_at(editor, step, *x, *y)?;
            editor.handle(&InputEvent::MergeHandleDown { section })
        }
        Command::ToggleCanvasMode => editor.toggle_canvas_mode(),
        Command::Undo => editor.undo(),
        Command::Redo => editor.redo(),
    };
    Ok(outcome)
}

fn section_at(editor: &Editor, step: usize, x: f64, y: f64) -> ReplayResult<SectionId> {
    editor
        .layout()
        .section_at(Point::new(x, y))
        .map(|s| s.id)
        .ok_or(ReplayError::NoSectionAt { step, x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegrid_core::{Content, Rect};

    fn editor() -> Editor {
        Editor::new(Rect::from_xywh(0.0, 0.0, 800.0, 600.0), EditorConfig::default())
    }

    #[test]
    fn steps_parse_as_commands_or_events() {
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[
                {"command": "toggle_canvas_mode"},
                {"type": "pointer_down", "x": 400, "y": 300},
                {"command": "attach_media", "x": 1, "y": 1, "kind": "video", "reference": "blob:v"}
            ]"#,
        )
        .expect("script should parse");

        assert_eq!(steps[0], ScriptStep::Command(Command::ToggleCanvasMode));
        assert_eq!(
            steps[1],
            ScriptStep::Event(InputEvent::PointerDown { x: 400.0, y: 300.0 })
        );
        assert!(matches!(
            steps[2],
            ScriptStep::Command(Command::AttachMedia {
                kind: ContentKind::Video,
                ..
            })
        ));
    }

    #[test]
    fn unknown_step_is_rejected() {
        let parsed: Result<Vec<ScriptStep>, _> =
            serde_json::from_str(r#"[{"command": "explode"}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn replay_split_and_fill() {
        let mut editor = editor();
        let steps = vec![
            ScriptStep::Command(Command::ToggleCanvasMode),
            ScriptStep::Event(InputEvent::PointerDown { x: 400.0, y: 300.0 }),
            ScriptStep::Command(Command::AttachMedia {
                x: 100.0,
                y: 100.0,
                kind: ContentKind::Image,
                reference: "blob:a".to_string(),
            }),
        ];

        let outcomes = replay(&mut editor, &steps).expect("replay should succeed");
        assert_eq!(
            outcomes,
            vec![
                Outcome::StateChanged,
                Outcome::LayoutChanged,
                Outcome::LayoutChanged
            ]
        );
        assert_eq!(editor.layout().len(), 2);
        let top = editor
            .layout()
            .section_at(Point::new(100.0, 100.0))
            .expect("top section");
        assert_eq!(top.content, Some(Content::image("blob:a")));
    }

    #[test]
    fn command_outside_canvas_fails_with_step_index() {
        let mut editor = editor();
        let steps = vec![
            ScriptStep::Command(Command::Undo),
            ScriptStep::Command(Command::ClearContent { x: 5000.0, y: 5.0 }),
        ];
        let err = replay(&mut editor, &steps).expect_err("point is off canvas");
        assert!(matches!(err, ReplayError::NoSectionAt { step: 1, .. }));
    }
}
