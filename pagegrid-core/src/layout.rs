//! Layout snapshots: the canvas bounds and the sections tiling them.

use serde::{Deserialize, Serialize};

use crate::section::EDGE_EPSILON;
use crate::{EditorError, EditorResult, Point, Rect, Section, SectionId};

/// An immutable-by-convention snapshot of the page.
///
/// Every editing operation returns a new `Layout`; history entries are
/// plain values of this type, compared structurally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Canvas rectangle the sections tile.
    bounds: Rect,
    /// Sections in insertion order.
    sections: Vec<Section>,
}

impl Layout {
    /// Assemble a layout from existing sections without checks.
    #[must_use]
    pub fn from_sections(bounds: Rect, sections: Vec<Section>) -> Self {
        Self { bounds, sections }
    }

    /// Canvas rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// All sections in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the layout has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Get a section by ID.
    #[must_use]
    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Check if a section with this ID exists.
    #[must_use]
    pub fn contains(&self, id: SectionId) -> bool {
        self.get(id).is_some()
    }

    /// Find the first section containing the point (edges inclusive).
    #[must_use]
    pub fn section_at(&self, point: Point) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains_point(point))
    }

    /// Find the merge target under the pointer: the last section
    /// containing the point, excluding `source`.
    #[must_use]
    pub fn merge_candidate_at(&self, point: Point, source: SectionId) -> Option<&Section> {
        self.sections
            .iter()
            .rev()
            .find(|s| s.id != source && s.contains_point(point))
    }

    /// Rescale every section proportionally onto new bounds.
    ///
    /// Ids and content are kept; relative geometry (and therefore the
    /// tiling) is preserved.
    #[must_use]
    pub fn rescaled(&self, bounds: Rect) -> Self {
        if self.bounds.width <= 0.0 || self.bounds.height <= 0.0 {
            return Self::initialize(bounds);
        }
        let sx = bounds.width / self.bounds.width;
        let sy = bounds.height / self.bounds.height;
        let sections = self
            .sections
            .iter()
            .map(|s| {
                let local = Rect::from_xywh(
                    s.rect.x - self.bounds.x,
                    s.rect.y - self.bounds.y,
                    s.rect.width,
                    s.rect.height,
                )
                .scaled(sx, sy);
                Section {
                    rect: Rect::from_xywh(
                        local.x + bounds.x,
                        local.y + bounds.y,
                        local.width,
                        local.height,
                    ),
                    ..s.clone()
                }
            })
            .collect();
        Self { bounds, sections }
    }

    /// Verify that the sections tile the bounds exactly.
    ///
    /// Checks that every section is valid and inside the bounds, that no
    /// two sections overlap, and that their areas sum to the canvas area.
    /// Together these imply a gap-free, overlap-free cover.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::TilingViolation`] describing the first
    /// problem found.
    pub fn verify_tiling(&self) -> EditorResult<()> {
        for section in &self.sections {
            if !section.rect.is_valid() {
                return Err(EditorError::TilingViolation(format!(
                    "section {} has degenerate geometry {:?}",
                    section.id, section.rect
                )));
            }
            if !self.bounds.encloses(&section.rect) {
                return Err(EditorError::TilingViolation(format!(
                    "section {} at {:?} leaves the canvas {:?}",
                    section.id, section.rect, self.bounds
                )));
            }
        }

        for (i, a) in self.sections.iter().enumerate() {
            for b in &self.sections[i + 1..] {
                if a.id == b.id {
                    return Err(EditorError::TilingViolation(format!(
                        "duplicate section id {}",
                        a.id
                    )));
                }
                if a.rect.intersection_area(&b.rect) > 0.0 {
                    return Err(EditorError::TilingViolation(format!(
                        "sections {} and {} overlap",
                        a.id, b.id
                    )));
                }
            }
        }

        let covered: f64 = self.sections.iter().map(|s| s.rect.area()).sum();
        let expected = self.bounds.area();
        if (covered - expected).abs() > EDGE_EPSILON * expected.max(1.0) {
            return Err(EditorError::TilingViolation(format!(
                "sections cover {covered} of {expected} square pixels"
            )));
        }
        Ok(())
    }

    /// Serialize the layout to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        serde_json::to_string(self).map_err(EditorError::Serialization)
    }

    /// Look up a section, failing when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SectionNotFound`] if no section has `id`.
    pub fn require(&self, id: SectionId) -> EditorResult<&Section> {
        self.get(id).ok_or_else(|| EditorError::SectionNotFound(id.to_string()))
    }

    /// Deserialize a layout from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(EditorError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Content;

    fn two_columns() -> (Layout, SectionId, SectionId) {
        let left = Section::new(Rect::from_xywh(0.0, 0.0, 400.0, 600.0));
        let right = Section::new(Rect::from_xywh(400.0, 0.0, 400.0, 600.0));
        let (l, r) = (left.id, right.id);
        (
            Layout::from_sections(Rect::from_xywh(0.0, 0.0, 800.0, 600.0), vec![left, right]),
            l,
            r,
        )
    }

    #[test]
    fn section_at_prefers_first_on_shared_edge() {
        let (layout, left, right) = two_columns();
        assert_eq!(layout.section_at(Point::new(400.0, 10.0)).map(|s| s.id), Some(left));
        assert_eq!(layout.section_at(Point::new(401.0, 10.0)).map(|s| s.id), Some(right));
        assert!(layout.section_at(Point::new(900.0, 10.0)).is_none());
    }

    #[test]
    fn require_reports_missing_sections() {
        let (layout, left, _) = two_columns();
        assert_eq!(layout.require(left).map(|s| s.id).ok(), Some(left));
        let missing = SectionId::new();
        let err = layout.require(missing).expect_err("unknown id");
        assert!(matches!(err, EditorError::SectionNotFound(ref id) if *id == missing.to_string()));
    }

    #[test]
    fn merge_candidate_excludes_source_and_prefers_last() {
        let (layout, left, right) = two_columns();
        let on_edge = Point::new(400.0, 10.0);
        assert_eq!(layout.merge_candidate_at(on_edge, left).map(|s| s.id), Some(right));
        assert_eq!(layout.merge_candidate_at(on_edge, right).map(|s| s.id), Some(left));
        assert!(layout.merge_candidate_at(Point::new(10.0, 10.0), left).is_none());
    }

    #[test]
    fn verify_tiling_accepts_exact_cover() {
        let (layout, _, _) = two_columns();
        layout.verify_tiling().expect("two columns tile the canvas");
    }

    #[test]
    fn verify_tiling_reports_gap_and_overlap() {
        let bounds = Rect::from_xywh(0.0, 0.0, 800.0, 600.0);
        let gap = Layout::from_sections(
            bounds,
            vec![Section::new(Rect::from_xywh(0.0, 0.0, 400.0, 600.0))],
        );
        assert!(matches!(gap.verify_tiling(), Err(EditorError::TilingViolation(_))));

        let overlap = Layout::from_sections(
            bounds,
            vec![
                Section::new(Rect::from_xywh(0.0, 0.0, 500.0, 600.0)),
                Section::new(Rect::from_xywh(300.0, 0.0, 500.0, 600.0)),
            ],
        );
        assert!(matches!(overlap.verify_tiling(), Err(EditorError::TilingViolation(_))));
    }

    #[test]
    fn rescaled_keeps_ids_content_and_tiling() {
        let (layout, left, _) = two_columns();
        let layout = layout.set_content(left, Content::text("keep me"));
        let resized = layout.rescaled(Rect::from_xywh(0.0, 0.0, 1600.0, 300.0));

        resized.verify_tiling().expect("rescale preserves tiling");
        let section = resized.get(left).expect("left survives");
        assert_eq!(section.rect, Rect::from_xywh(0.0, 0.0, 800.0, 300.0));
        assert_eq!(section.content, Some(Content::text("keep me")));
    }

    #[test]
    fn json_roundtrip_preserves_equality() {
        let (layout, _, _) = two_columns();
        let json = layout.to_json().expect("serialize");
        let parsed = Layout::from_json(&json).expect("deserialize");
        assert_eq!(parsed, layout);
    }
}
