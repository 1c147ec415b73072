//! Interaction controller.
//!
//! [`Editor`] owns the undo history of [`Layout`] snapshots plus the
//! transient UI state that never enters history: selection, the section
//! being edited, hover, merge drag, drop target and the canvas (split)
//! mode flag. Input events are resolved against the present layout and
//! turned into geometry operations whose results are committed.

use serde::{Deserialize, Serialize};

use crate::event::keys;
use crate::{
    Content, ContentKind, EditorConfig, EditorResult, FramingUpdate, History, InputEvent,
    KeyModifiers, Layout, Orientation, Point, Rect, SectionId,
};

/// State of an in-progress media pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanDrag {
    /// Pointer position when the drag started.
    pub start: Point,
    /// Horizontal offset when the drag started.
    pub initial_x_offset: f64,
    /// Vertical offset when the drag started.
    pub initial_y_offset: f64,
}

/// Mutually exclusive interaction phases.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing selected or in progress.
    #[default]
    Idle,
    /// An empty section is selected.
    SectionSelected {
        /// Selected section.
        section: SectionId,
    },
    /// Media in a section is being panned/zoomed.
    EditingContent {
        /// Section being edited.
        section: SectionId,
        /// Active pan drag, if the pointer is down.
        pan: Option<PanDrag>,
        /// Whether this session already created its history entry.
        session_committed: bool,
    },
    /// Dragging from a merge handle.
    Merging {
        /// Section the drag started from.
        source: SectionId,
        /// Section currently under the pointer.
        target: Option<SectionId>,
    },
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    /// Transient state (selection, hover, mode...) changed.
    StateChanged,
    /// A new layout was committed (or amended) in history.
    LayoutChanged,
    /// The host should pick a media file for the section and call
    /// [`Editor::attach_media`].
    MediaRequested {
        /// Section the item was dropped on.
        section: SectionId,
        /// Requested media kind.
        kind: ContentKind,
    },
}

/// Overlay line previewing where a split would cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    /// One pixel wide (or tall) line rectangle.
    pub rect: Rect,
    /// Direction of the cut it previews.
    pub orientation: Orientation,
}

/// The page editor: history plus interaction state.
#[derive(Debug, Clone)]
pub struct Editor {
    history: History<Layout>,
    config: EditorConfig,
    phase: Phase,
    canvas_mode: bool,
    split_modifier: bool,
    pointer: Point,
    hovered: Option<SectionId>,
    drop_target: Option<SectionId>,
}

impl Editor {
    /// Create an editor whose canvas is a single empty section.
    ///
    /// `config` is used as given. Configurations from outside the program
    /// should go through [`Editor::try_new`].
    #[must_use]
    pub fn new(bounds: Rect, config: EditorConfig) -> Self {
        let mut editor = Self::with_config(config);
        editor.history.reset(Layout::initialize(bounds));
        editor
    }

    /// Like [`Editor::new`], but validates `config` first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Config`] if the configuration is invalid.
    pub fn try_new(bounds: Rect, config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self::new(bounds, config))
    }

    /// Resume editing a saved layout. History starts at `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Config`] if the configuration is invalid.
    pub fn from_layout(layout: Layout, config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        tracing::info!("Resuming layout with {} sections", layout.len());
        let mut editor = Self::with_config(config);
        editor.history.reset(layout);
        Ok(editor)
    }

    /// Create an editor that waits for [`Editor::set_bounds`] before it
    /// has any sections. `config` is used as given.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => History::with_limit(Layout::default(), limit),
            None => History::new(Layout::default()),
        };
        Self {
            history,
            config,
            phase: Phase::Idle,
            canvas_mode: false,
            split_modifier: false,
            pointer: Point::default(),
            hovered: None,
            drop_target: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The present layout.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        self.history.present()
    }

    /// Undo history.
    #[must_use]
    pub fn history(&self) -> &History<Layout> {
        &self.history
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current interaction phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Selected section.
    #[must_use]
    pub fn selected(&self) -> Option<SectionId> {
        match self.phase {
            Phase::SectionSelected { section } => Some(section),
            _ => None,
        }
    }

    /// Section whose media is being edited.
    #[must_use]
    pub fn editing(&self) -> Option<SectionId> {
        match self.phase {
            Phase::EditingContent { section, .. } => Some(section),
            _ => None,
        }
    }

    /// Merge source and current candidate target.
    #[must_use]
    pub fn merge_state(&self) -> Option<(SectionId, Option<SectionId>)> {
        match self.phase {
            Phase::Merging { source, target } => Some((source, target)),
            _ => None,
        }
    }

    /// Section under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<SectionId> {
        self.hovered
    }

    /// Section highlighted as a drop target.
    #[must_use]
    pub fn drop_target(&self) -> Option<SectionId> {
        self.drop_target
    }

    /// Whether the split tool is active.
    #[must_use]
    pub fn canvas_mode(&self) -> bool {
        self.canvas_mode
    }

    /// Orientation a split would use right now.
    #[must_use]
    pub fn split_orientation(&self) -> Orientation {
        if self.split_modifier {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Check if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The split preview line, shown in canvas mode over the hovered
    /// section while nothing is being edited.
    #[must_use]
    pub fn guideline(&self) -> Option<Guideline> {
        if !self.canvas_mode || self.editing().is_some() {
            return None;
        }
        let section = self.layout().get(self.hovered?)?;
        let r = section.rect;
        let guideline = match self.split_orientation() {
            Orientation::Vertical => Guideline {
                rect: Rect::from_xywh(self.pointer.x, r.y, 1.0, r.height),
                orientation: Orientation::Vertical,
            },
            Orientation::Horizontal => Guideline {
                rect: Rect::from_xywh(r.x, self.pointer.y, r.width, 1.0),
                orientation: Orientation::Horizontal,
            },
        };
        Some(guideline)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Switch the split tool on or off. Turning it off clears selection
    /// and editing.
    pub fn toggle_canvas_mode(&mut self) -> Outcome {
        self.canvas_mode = !self.canvas_mode;
        if !self.canvas_mode {
            self.phase = Phase::Idle;
        }
        tracing::info!(
            "Canvas mode {}",
            if self.canvas_mode { "on" } else { "off" }
        );
        Outcome::StateChanged
    }

    /// Step back one layout.
    pub fn undo(&mut self) -> Outcome {
        if !self.history.can_undo() {
            return Outcome::Ignored;
        }
        self.history.undo();
        self.after_history_jump();
        Outcome::LayoutChanged
    }

    /// Step forward one layout.
    pub fn redo(&mut self) -> Outcome {
        if !self.history.can_redo() {
            return Outcome::Ignored;
        }
        self.history.redo();
        self.after_history_jump();
        Outcome::LayoutChanged
    }

    /// Place selected media (an object URL or other opaque reference) in a
    /// section after a [`Outcome::MediaRequested`].
    pub fn attach_media(
        &mut self,
        section: SectionId,
        kind: ContentKind,
        reference: impl Into<String>,
    ) -> Outcome {
        if !kind.is_placeable() {
            tracing::debug!("Media of kind {kind} cannot be placed in {section}");
            return Outcome::Ignored;
        }
        let next = self
            .layout()
            .set_content(section, Content::from_kind(kind, reference));
        self.commit(next)
    }

    /// Commit an inline text edit.
    pub fn edit_text(&mut self, section: SectionId, value: impl Into<String>) -> Outcome {
        let next = self.layout().update_content_value(section, value);
        self.commit(next)
    }

    /// Remove a section's content (the delete button on populated sections).
    pub fn clear_content(&mut self, section: SectionId) -> Outcome {
        let next = self.layout().clear_content(section);
        self.commit(next)
    }

    /// Adopt new canvas bounds.
    ///
    /// The first valid bounds create the initial section. Later changes
    /// rescale every snapshot in history, so content and undo survive a
    /// resize.
    pub fn set_bounds(&mut self, bounds: Rect) -> Outcome {
        if !bounds.is_valid() {
            tracing::warn!("Ignoring invalid canvas bounds {bounds:?}");
            return Outcome::Ignored;
        }
        let current = self.layout();
        if current.is_empty() && !self.history.can_undo() && !self.history.can_redo() {
            self.history.reset(Layout::initialize(bounds));
        } else if current.bounds().approx_eq(&bounds) {
            return Outcome::Ignored;
        } else {
            tracing::info!(
                "Rescaling canvas from {}x{} to {}x{}",
                current.bounds().width,
                current.bounds().height,
                bounds.width,
                bounds.height
            );
            self.history.map_all(|layout| layout.rescaled(bounds));
        }
        self.prune_stale();
        Outcome::LayoutChanged
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    /// Process an input event.
    pub fn handle(&mut self, event: &InputEvent) -> Outcome {
        tracing::trace!("Input event: {event:?}");
        match event {
            InputEvent::PointerMove { x, y } => self.on_pointer_move(Point::new(*x, *y)),
            InputEvent::PointerDown { x, y } => self.on_pointer_down(Point::new(*x, *y)),
            InputEvent::PointerUp { .. } => self.on_pointer_up(),
            InputEvent::PointerLeave => {
                if self.hovered.take().is_some() {
                    Outcome::StateChanged
                } else {
                    Outcome::Ignored
                }
            }
            InputEvent::Click { x, y } => self.on_click(Point::new(*x, *y)),
            InputEvent::DoubleClick { x, y, modifiers } => {
                self.on_double_click(Point::new(*x, *y), *modifiers)
            }
            InputEvent::Wheel { x, y, delta_y } => self.on_wheel(Point::new(*x, *y), *delta_y),
            InputEvent::Key {
                key,
                pressed,
                modifiers,
            } => self.on_key(key, *pressed, *modifiers),
            InputEvent::MergeHandleDown { section } => self.on_merge_handle_down(*section),
            InputEvent::DragOver { x, y } => {
                let target = self
                    .layout()
                    .section_at(Point::new(*x, *y))
                    .filter(|s| s.is_empty())
                    .map(|s| s.id);
                self.set_drop_target(target)
            }
            InputEvent::DragLeave => self.set_drop_target(None),
            InputEvent::Drop { x, y, kind } => self.on_drop(Point::new(*x, *y), *kind),
        }
    }

    fn on_pointer_move(&mut self, point: Point) -> Outcome {
        self.pointer = point;
        self.hovered = self.layout().section_at(point).map(|s| s.id);

        match self.phase {
            Phase::Merging { source, .. } => {
                let target = self.layout().merge_candidate_at(point, source).map(|s| s.id);
                self.phase = Phase::Merging { source, target };
                Outcome::StateChanged
            }
            Phase::EditingContent {
                section,
                pan: Some(drag),
                ..
            } => {
                let update = FramingUpdate {
                    scale: None,
                    x_offset: Some(drag.initial_x_offset + (point.x - drag.start.x)),
                    y_offset: Some(drag.initial_y_offset + (point.y - drag.start.y)),
                };
                self.apply_framing(section, update)
            }
            _ => Outcome::StateChanged,
        }
    }

    fn on_pointer_down(&mut self, point: Point) -> Outcome {
        self.pointer = point;
        self.hovered = self.layout().section_at(point).map(|s| s.id);

        match self.phase {
            Phase::EditingContent {
                section,
                session_committed,
                ..
            } => {
                let Some(framing) = self
                    .layout()
                    .get(section)
                    .filter(|s| s.contains_point(point))
                    .and_then(|s| s.content.as_ref())
                    .and_then(Content::framing)
                    .copied()
                else {
                    return Outcome::Ignored;
                };
                self.phase = Phase::EditingContent {
                    section,
                    pan: Some(PanDrag {
                        start: point,
                        initial_x_offset: framing.x_offset,
                        initial_y_offset: framing.y_offset,
                    }),
                    session_committed,
                };
                Outcome::StateChanged
            }
            Phase::Merging { .. } => Outcome::Ignored,
            Phase::Idle | Phase::SectionSelected { .. } => {
                if !self.canvas_mode {
                    return Outcome::Ignored;
                }
                let Some(target) = self
                    .hovered
                    .and_then(|id| self.layout().get(id))
                    .filter(|s| s.is_empty())
                    .map(|s| s.id)
                else {
                    return Outcome::Ignored;
                };
                let next = self.layout().split(target, point, self.split_orientation());
                self.commit(next)
            }
        }
    }

    fn on_pointer_up(&mut self) -> Outcome {
        match self.phase {
            Phase::Merging {
                source,
                target: Some(target),
            } => {
                self.phase = Phase::Idle;
                let next = self
                    .layout()
                    .merge(source, target, self.config.merge_policy);
                match self.commit(next) {
                    Outcome::Ignored => Outcome::StateChanged,
                    outcome => outcome,
                }
            }
            Phase::Merging {
                source,
                target: None,
            } => {
                tracing::debug!("Merge from {source} cancelled");
                self.phase = Phase::SectionSelected { section: source };
                self.prune_stale();
                Outcome::StateChanged
            }
            Phase::EditingContent {
                section,
                pan: Some(_),
                session_committed,
            } => {
                self.phase = Phase::EditingContent {
                    section,
                    pan: None,
                    session_committed,
                };
                Outcome::StateChanged
            }
            _ => Outcome::Ignored,
        }
    }

    fn on_click(&mut self, point: Point) -> Outcome {
        if self.editing().is_some() {
            self.phase = Phase::Idle;
            return Outcome::StateChanged;
        }
        let previous = self.phase;
        self.phase = match self.layout().section_at(point) {
            Some(section) if section.is_empty() => Phase::SectionSelected {
                section: section.id,
            },
            _ => Phase::Idle,
        };
        if self.phase == previous {
            Outcome::Ignored
        } else {
            Outcome::StateChanged
        }
    }

    fn on_double_click(&mut self, point: Point, modifiers: KeyModifiers) -> Outcome {
        if !modifiers.command() {
            return Outcome::Ignored;
        }
        let Some(section) = self
            .layout()
            .section_at(point)
            .filter(|s| s.content.as_ref().is_some_and(Content::is_framed))
            .map(|s| s.id)
        else {
            return Outcome::Ignored;
        };
        tracing::debug!("Editing media in {section}");
        self.phase = Phase::EditingContent {
            section,
            pan: None,
            session_committed: false,
        };
        Outcome::StateChanged
    }

    fn on_wheel(&mut self, point: Point, delta_y: f64) -> Outcome {
        let Some(section) = self.editing() else {
            return Outcome::Ignored;
        };
        let Some(scale) = self
            .layout()
            .get(section)
            .filter(|s| s.contains_point(point))
            .and_then(|s| s.content.as_ref())
            .and_then(Content::framing)
            .map(|f| f.scale)
        else {
            return Outcome::Ignored;
        };
        let update = FramingUpdate {
            scale: Some(scale - delta_y * self.config.wheel_zoom_step),
            ..FramingUpdate::default()
        };
        self.apply_framing(section, update)
    }

    fn on_key(&mut self, key: &str, pressed: bool, modifiers: KeyModifiers) -> Outcome {
        if key == keys::CONTROL {
            self.split_modifier = pressed;
            return Outcome::StateChanged;
        }
        if !pressed {
            return Outcome::Ignored;
        }

        if modifiers.command() && key == keys::UNDO {
            return self.undo();
        }
        if modifiers.command() && key == keys::REDO {
            return self.redo();
        }

        match (key, self.phase) {
            (keys::BACKSPACE | keys::DELETE, Phase::SectionSelected { section }) => {
                self.phase = Phase::Idle;
                let next = self.layout().delete_section(section);
                match self.commit(next) {
                    Outcome::Ignored => Outcome::StateChanged,
                    outcome => outcome,
                }
            }
            (keys::ENTER, Phase::EditingContent { .. }) => {
                self.phase = Phase::Idle;
                Outcome::StateChanged
            }
            (keys::ALT, _) => self.toggle_canvas_mode(),
            _ => Outcome::Ignored,
        }
    }

    fn on_merge_handle_down(&mut self, section: SectionId) -> Outcome {
        let selected_empty = self.selected() == Some(section)
            && self.layout().get(section).is_some_and(|s| s.is_empty());
        if !selected_empty {
            return Outcome::Ignored;
        }
        self.phase = Phase::Merging {
            source: section,
            target: None,
        };
        Outcome::StateChanged
    }

    fn on_drop(&mut self, point: Point, kind: ContentKind) -> Outcome {
        self.drop_target = None;
        if !kind.is_placeable() {
            tracing::debug!("Drop of {kind} rejected, not a toolbar item");
            return Outcome::StateChanged;
        }
        let Some(section) = self
            .layout()
            .section_at(point)
            .filter(|s| s.is_empty())
            .map(|s| s.id)
        else {
            tracing::debug!("Drop of {kind} rejected, no empty section at {point:?}");
            return Outcome::StateChanged;
        };
        if kind.needs_media_source() {
            return Outcome::MediaRequested { section, kind };
        }
        let content = Content::text(self.config.default_text.clone());
        let next = self.layout().set_content(section, content);
        self.commit(next)
    }

    fn set_drop_target(&mut self, target: Option<SectionId>) -> Outcome {
        if self.drop_target == target {
            return Outcome::Ignored;
        }
        self.drop_target = target;
        Outcome::StateChanged
    }

    // -----------------------------------------------------------------------
    // History plumbing
    // -----------------------------------------------------------------------

    fn commit(&mut self, next: Layout) -> Outcome {
        if !self.history.commit(next) {
            return Outcome::Ignored;
        }
        // Later pans or zooms start a new step instead of amending this edit.
        if let Phase::EditingContent {
            session_committed, ..
        } = &mut self.phase
        {
            *session_committed = false;
        }
        self.after_layout_change();
        Outcome::LayoutChanged
    }

    /// Pan/zoom within an editing session: the first change creates a
    /// history entry, later ones amend it.
    fn apply_framing(&mut self, section: SectionId, update: FramingUpdate) -> Outcome {
        let next = self
            .layout()
            .update_content_transform(section, update, self.config.min_scale);
        let Phase::EditingContent {
            session_committed, ..
        } = &mut self.phase
        else {
            return Outcome::Ignored;
        };
        let changed = if *session_committed {
            self.history.amend(next)
        } else {
            let committed = self.history.commit(next);
            *session_committed = committed;
            committed
        };
        if changed {
            Outcome::LayoutChanged
        } else {
            Outcome::Ignored
        }
    }

    fn after_history_jump(&mut self) {
        if let Phase::EditingContent { section, .. } = self.phase {
            self.phase = Phase::EditingContent {
                section,
                pan: None,
                session_committed: false,
            };
        }
        self.after_layout_change();
    }

    fn after_layout_change(&mut self) {
        if cfg!(debug_assertions) {
            if let Err(e) = self.layout().verify_tiling() {
                tracing::warn!("Layout no longer tiles the canvas: {e}");
            }
        }
        self.prune_stale();
    }

    /// Drop transient references to sections that no longer exist.
    fn prune_stale(&mut self) {
        let layout = self.history.present();
        self.phase = match self.phase {
            Phase::SectionSelected { section } if !layout.contains(section) => Phase::Idle,
            Phase::EditingContent { section, .. } if !layout.contains(section) => Phase::Idle,
            Phase::Merging { source, .. } if !layout.contains(source) => Phase::Idle,
            Phase::Merging {
                source,
                target: Some(target),
            } if !layout.contains(target) => Phase::Merging {
                source,
                target: None,
            },
            phase => phase,
        };
        if self.hovered.is_some() {
            self.hovered = layout.section_at(self.pointer).map(|s| s.id);
        }
        self.drop_target = self.drop_target.filter(|id| layout.contains(*id));
    }
}
