//! Editor Workflow Integration Tests
//!
//! Drives the editor the way the browser front-end does:
//! - Split mode toggling and splitting with the Control modifier
//! - Toolbar drops (text inline, media through file selection)
//! - Delete with neighbor reclaim
//! - Merge drags
//! - Undo/redo across all of the above

use pagegrid_core::event::keys;
use pagegrid_core::{
    Content, ContentKind, Editor, EditorConfig, InputEvent, KeyModifiers, Layout, MergePolicy,
    Orientation, Outcome, Phase, Point, Rect, Section, SectionId,
};

/// Create an editor over an 800x600 canvas.
fn editor() -> Editor {
    Editor::new(Rect::from_xywh(0.0, 0.0, 800.0, 600.0), EditorConfig::default())
}

/// Id of the section under a point.
fn section_at(editor: &Editor, x: f64, y: f64) -> SectionId {
    editor
        .layout()
        .section_at(Point::new(x, y))
        .map(|s| s.id)
        .expect("a section under the point")
}

/// Press and release a key with Control held.
fn ctrl_key(key: &str) -> InputEvent {
    InputEvent::Key {
        key: key.to_string(),
        pressed: true,
        modifiers: KeyModifiers::ctrl(),
    }
}

// ============================================================================
// Geometry scenarios
// ============================================================================

#[test]
fn test_split_then_delete_reclaims_full_canvas() {
    let layout = Layout::initialize(Rect::from_xywh(0.0, 0.0, 800.0, 600.0));
    let s0 = layout.sections()[0].id;
    assert_eq!(layout.sections()[0].rect, Rect::from_xywh(0.0, 0.0, 800.0, 600.0));

    let layout = layout.split(s0, Point::new(400.0, 300.0), Orientation::Vertical);
    let rects: Vec<Rect> = layout.sections().iter().map(|s| s.rect).collect();
    assert_eq!(
        rects,
        vec![
            Rect::from_xywh(0.0, 0.0, 400.0, 600.0),
            Rect::from_xywh(400.0, 0.0, 400.0, 600.0),
        ]
    );

    let (left, right) = (layout.sections()[0].id, layout.sections()[1].id);
    let layout = layout.set_content(left, Content::text("Title"));
    let layout = layout.delete_section(right);

    assert_eq!(layout.len(), 1);
    let survivor = &layout.sections()[0];
    assert_eq!(survivor.id, left);
    assert_eq!(survivor.rect, Rect::from_xywh(0.0, 0.0, 800.0, 600.0));
    assert_eq!(survivor.content, Some(Content::text("Title")));
    layout.verify_tiling().expect("canvas is fully reclaimed");
}

#[test]
fn test_non_adjacent_merge_takes_bounding_box_and_target_content() {
    let source = Section::new(Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let target = Section::new(Rect::from_xywh(200.0, 0.0, 100.0, 100.0))
        .with_content(Some(Content::image("blob:photo")));
    let (source_id, target_id) = (source.id, target.id);
    let layout = Layout::from_sections(
        Rect::from_xywh(0.0, 0.0, 300.0, 100.0),
        vec![source, target],
    );

    let merged = layout.merge(source_id, target_id, MergePolicy::Permissive);
    assert_eq!(merged.len(), 1);
    let section = &merged.sections()[0];
    assert_eq!(section.id, target_id);
    assert_eq!(section.rect, Rect::from_xywh(0.0, 0.0, 300.0, 100.0));
    assert_eq!(section.content, Some(Content::image("blob:photo")));
}

// ============================================================================
// Interactive workflows
// ============================================================================

#[test]
fn test_build_page_with_header_and_two_columns() {
    let mut editor = editor();

    // Split mode on, cut a 100px header.
    editor.handle(&InputEvent::key_down(keys::ALT));
    editor.handle(&InputEvent::PointerMove { x: 400.0, y: 100.0 });
    let guide = editor.guideline().expect("guideline in canvas mode");
    assert_eq!(guide.orientation, Orientation::Horizontal);
    assert_eq!(
        editor.handle(&InputEvent::PointerDown { x: 400.0, y: 100.0 }),
        Outcome::LayoutChanged
    );

    // Hold Control and cut the body into two columns.
    editor.handle(&InputEvent::key_down(keys::CONTROL));
    editor.handle(&InputEvent::PointerDown { x: 300.0, y: 400.0 });
    editor.handle(&InputEvent::key_up(keys::CONTROL));
    assert_eq!(editor.layout().len(), 3);
    editor.layout().verify_tiling().expect("page tiles");

    // Drop a text block in the header.
    let header = section_at(&editor, 400.0, 50.0);
    editor.handle(&InputEvent::DragOver { x: 400.0, y: 50.0 });
    assert_eq!(editor.drop_target(), Some(header));
    editor.handle(&InputEvent::Drop {
        x: 400.0,
        y: 50.0,
        kind: ContentKind::Text,
    });
    editor.edit_text(header, "Quarterly report");

    // Drop an image in the right column; the host answers with a URL.
    let right = section_at(&editor, 600.0, 400.0);
    let outcome = editor.handle(&InputEvent::Drop {
        x: 600.0,
        y: 400.0,
        kind: ContentKind::Image,
    });
    assert_eq!(
        outcome,
        Outcome::MediaRequested {
            section: right,
            kind: ContentKind::Image
        }
    );
    editor.attach_media(right, ContentKind::Image, "blob:chart");

    let layout = editor.layout();
    assert_eq!(
        layout.get(header).and_then(|s| s.content.clone()),
        Some(Content::text("Quarterly report"))
    );
    assert_eq!(
        layout.get(right).and_then(|s| s.content.clone()),
        Some(Content::image("blob:chart"))
    );
    assert_eq!(
        layout.get(right).map(|s| s.rect),
        Some(Rect::from_xywh(300.0, 100.0, 500.0, 500.0))
    );
}

#[test]
fn test_delete_prefers_empty_neighbor_over_populated() {
    let mut editor = editor();
    editor.toggle_canvas_mode();
    editor.handle(&InputEvent::key_down(keys::CONTROL));
    editor.handle(&InputEvent::PointerDown { x: 200.0, y: 10.0 });
    editor.handle(&InputEvent::PointerDown { x: 400.0, y: 10.0 });
    editor.handle(&InputEvent::key_up(keys::CONTROL));

    let left = section_at(&editor, 100.0, 300.0);
    let middle = section_at(&editor, 300.0, 300.0);
    let right = section_at(&editor, 600.0, 300.0);
    editor.attach_media(left, ContentKind::Video, "blob:clip");

    editor.handle(&InputEvent::Click { x: 300.0, y: 300.0 });
    assert_eq!(editor.selected(), Some(middle));
    editor.handle(&InputEvent::key_down(keys::DELETE));

    let layout = editor.layout();
    assert!(!layout.contains(middle));
    assert_eq!(
        layout.get(right).map(|s| s.rect),
        Some(Rect::from_xywh(200.0, 0.0, 600.0, 600.0))
    );
    assert_eq!(
        layout.get(left).map(|s| s.rect),
        Some(Rect::from_xywh(0.0, 0.0, 200.0, 600.0))
    );
    assert_eq!(editor.phase(), Phase::Idle);
}

#[test]
fn test_merge_drag_and_undo_restores_both_sections() {
    let mut editor = editor();
    editor.toggle_canvas_mode();
    editor.handle(&InputEvent::PointerDown { x: 400.0, y: 300.0 });
    let top = section_at(&editor, 400.0, 100.0);
    let bottom = section_at(&editor, 400.0, 500.0);
    let split_layout = editor.layout().clone();

    editor.handle(&InputEvent::Click { x: 400.0, y: 100.0 });
    editor.handle(&InputEvent::MergeHandleDown { section: top });
    editor.handle(&InputEvent::PointerMove { x: 400.0, y: 500.0 });
    assert_eq!(editor.merge_state(), Some((top, Some(bottom))));
    editor.handle(&InputEvent::PointerUp { x: 400.0, y: 500.0 });

    assert_eq!(editor.layout().len(), 1);
    assert_eq!(editor.layout().sections()[0].id, bottom);

    editor.handle(&ctrl_key(keys::UNDO));
    assert_eq!(editor.layout(), &split_layout);
    editor.handle(&ctrl_key(keys::REDO));
    assert_eq!(editor.layout().len(), 1);
}

#[test]
fn test_new_edit_after_undo_clears_redo() {
    let mut editor = editor();
    editor.toggle_canvas_mode();
    editor.handle(&InputEvent::PointerDown { x: 400.0, y: 300.0 });
    editor.handle(&ctrl_key(keys::UNDO));
    assert!(editor.can_redo());

    let only = section_at(&editor, 10.0, 10.0);
    editor.attach_media(only, ContentKind::Image, "blob:new");
    assert!(!editor.can_redo());
    assert_eq!(editor.handle(&ctrl_key(keys::REDO)), Outcome::Ignored);
}

#[test]
fn test_exact_merge_policy_keeps_tiling_under_interaction() {
    let config = EditorConfig {
        merge_policy: MergePolicy::Exact,
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(Rect::from_xywh(0.0, 0.0, 600.0, 600.0), config);
    editor.toggle_canvas_mode();
    // Two rows, then split the top row into columns.
    editor.handle(&InputEvent::PointerDown { x: 300.0, y: 300.0 });
    editor.handle(&InputEvent::key_down(keys::CONTROL));
    editor.handle(&InputEvent::PointerDown { x: 300.0, y: 100.0 });
    editor.handle(&InputEvent::key_up(keys::CONTROL));

    // Top-left into bottom row: bounding box would swallow top-right.
    let top_left = section_at(&editor, 100.0, 100.0);
    editor.handle(&InputEvent::Click { x: 100.0, y: 100.0 });
    editor.handle(&InputEvent::MergeHandleDown { section: top_left });
    editor.handle(&InputEvent::PointerMove { x: 300.0, y: 500.0 });
    editor.handle(&InputEvent::PointerUp { x: 300.0, y: 500.0 });
    assert_eq!(editor.layout().len(), 3, "loose merge rejected");

    // Top-left into top-right shares an edge and is accepted.
    let top_right = section_at(&editor, 500.0, 100.0);
    editor.handle(&InputEvent::Click { x: 100.0, y: 100.0 });
    editor.handle(&InputEvent::MergeHandleDown { section: top_left });
    editor.handle(&InputEvent::PointerMove { x: 500.0, y: 100.0 });
    editor.handle(&InputEvent::PointerUp { x: 500.0, y: 100.0 });
    assert_eq!(editor.layout().len(), 2);
    assert_eq!(
        editor.layout().get(top_right).map(|s| s.rect),
        Some(Rect::from_xywh(0.0, 0.0, 600.0, 300.0))
    );
    editor.layout().verify_tiling().expect("exact merges keep tiling");
}

#[test]
fn test_clear_content_then_section_accepts_drop_again() {
    let mut editor = editor();
    let only = section_at(&editor, 10.0, 10.0);
    editor.attach_media(only, ContentKind::Image, "blob:a");
    editor.handle(&InputEvent::DragOver { x: 10.0, y: 10.0 });
    assert_eq!(editor.drop_target(), None);

    editor.clear_content(only);
    editor.handle(&InputEvent::DragOver { x: 10.0, y: 10.0 });
    assert_eq!(editor.drop_target(), Some(only));
    editor.handle(&InputEvent::DragLeave);
    assert_eq!(editor.drop_target(), None);
}
