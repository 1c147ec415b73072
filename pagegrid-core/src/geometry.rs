//! Geometry engine: split, delete-with-reclaim and merge.
//!
//! Every operation borrows a [`Layout`] and builds a new one. The input is
//! never modified, and a request that names a missing section (or that
//! would produce degenerate geometry) returns an unchanged copy.
//!
//! Each operation constructs its output so that, given a tiling input,
//! the result still tiles the canvas. The two documented exceptions are a
//! delete with no edge-aligned neighbor (which leaves a gap) and a
//! [`MergePolicy::Permissive`] merge of sections that do not share an edge.

use serde::{Deserialize, Serialize};

use crate::section::{approx_eq, EDGE_EPSILON};
use crate::{Content, FramingUpdate, Layout, Point, Rect, Section, SectionId};

/// Direction of the cut made by a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Vertical cut line; pieces sit side by side.
    Vertical,
    /// Horizontal cut line; pieces are stacked.
    Horizontal,
}

/// How strictly a merge checks that the two sections belong together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Any two sections merge into their bounding box, touching or not.
    #[default]
    Permissive,
    /// Only merge sections that share a full edge, so the bounding box is
    /// exactly their union.
    Exact,
}

/// Which side of the deleted section the absorbing neighbor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjacency {
    Horizontal,
    Vertical,
}

/// How `a` and `b` share a full edge, if they do.
///
/// Horizontal neighbors have the same top and height and touch left to
/// right; vertical neighbors have the same left and width and touch top
/// to bottom.
fn shared_edge(a: &Rect, b: &Rect) -> Option<Adjacency> {
    if approx_eq(a.y, b.y)
        && approx_eq(a.height, b.height)
        && (approx_eq(a.right(), b.x) || approx_eq(a.x, b.right()))
    {
        Some(Adjacency::Horizontal)
    } else if approx_eq(a.x, b.x)
        && approx_eq(a.width, b.width)
        && (approx_eq(a.bottom(), b.y) || approx_eq(a.y, b.bottom()))
    {
        Some(Adjacency::Vertical)
    } else {
        None
    }
}

impl Layout {
    /// Create a layout with one empty section covering `bounds`.
    #[must_use]
    pub fn initialize(bounds: Rect) -> Self {
        tracing::info!(
            "Initializing canvas {}x{} at ({}, {})",
            bounds.width,
            bounds.height,
            bounds.x,
            bounds.y
        );
        Self::from_sections(bounds, vec![Section::new(bounds)])
    }

    /// Split a section at `point`.
    ///
    /// The first piece (nearer the origin) inherits the content, the second
    /// starts empty; both get fresh ids. A cut on or outside the section's
    /// edges is rejected.
    #[must_use]
    pub fn split(&self, target: SectionId, point: Point, orientation: Orientation) -> Self {
        let Some(section) = self.get(target) else {
            tracing::debug!("Split ignored, section not found: {target}");
            return self.clone();
        };
        let t = section.rect;

        let (first, second) = match orientation {
            Orientation::Vertical => {
                if point.x <= t.x + EDGE_EPSILON || point.x >= t.right() - EDGE_EPSILON {
                    tracing::debug!("Degenerate vertical split of {target} at x={}", point.x);
                    return self.clone();
                }
                (
                    Rect::from_xywh(t.x, t.y, point.x - t.x, t.height),
                    Rect::from_xywh(point.x, t.y, t.right() - point.x, t.height),
                )
            }
            Orientation::Horizontal => {
                if point.y <= t.y + EDGE_EPSILON || point.y >= t.bottom() - EDGE_EPSILON {
                    tracing::debug!("Degenerate horizontal split of {target} at y={}", point.y);
                    return self.clone();
                }
                (
                    Rect::from_xywh(t.x, t.y, t.width, point.y - t.y),
                    Rect::from_xywh(t.x, point.y, t.width, t.bottom() - point.y),
                )
            }
        };

        let content = section.content.clone();
        let mut sections: Vec<Section> = self
            .sections()
            .iter()
            .filter(|s| s.id != target)
            .cloned()
            .collect();
        sections.push(Section::new(first).with_content(content));
        sections.push(Section::new(second));
        tracing::debug!("Split {target} {orientation:?}");
        Self::from_sections(self.bounds(), sections)
    }

    /// Delete a section and hand its area to one edge-aligned neighbor.
    ///
    /// Neighbors are tried in order: empty horizontal, populated
    /// horizontal, empty vertical, populated vertical. The neighbor keeps
    /// its id and content. Without a neighbor the section is simply removed.
    #[must_use]
    pub fn delete_section(&self, target: SectionId) -> Self {
        let Some(deleted) = self.get(target) else {
            tracing::debug!("Delete ignored, section not found: {target}");
            return self.clone();
        };
        let d = deleted.rect;
        let others: Vec<&Section> = self.sections().iter().filter(|s| s.id != target).collect();

        let horizontal = others
            .iter()
            .filter(|s| shared_edge(&s.rect, &d) == Some(Adjacency::Horizontal));
        let vertical = others
            .iter()
            .filter(|s| shared_edge(&s.rect, &d) == Some(Adjacency::Vertical));

        let chosen = horizontal
            .clone()
            .find(|s| s.is_empty())
            .map(|s| (*s, Adjacency::Horizontal))
            .or_else(|| {
                horizontal
                    .clone()
                    .find(|s| !s.is_empty())
                    .map(|s| (*s, Adjacency::Horizontal))
            })
            .or_else(|| {
                vertical
                    .clone()
                    .find(|s| s.is_empty())
                    .map(|s| (*s, Adjacency::Vertical))
            })
            .or_else(|| {
                vertical
                    .clone()
                    .find(|s| !s.is_empty())
                    .map(|s| (*s, Adjacency::Vertical))
            });

        let Some((neighbor, adjacency)) = chosen else {
            tracing::debug!("Deleted {target} with no neighbor to reclaim its area");
            return Self::from_sections(self.bounds(), others.into_iter().cloned().collect());
        };

        let n = neighbor.rect;
        let x = d.x.min(n.x);
        let y = d.y.min(n.y);
        let rect = match adjacency {
            Adjacency::Horizontal => Rect::from_xywh(x, y, d.width + n.width, d.height),
            Adjacency::Vertical => Rect::from_xywh(x, y, d.width, d.height + n.height),
        };
        let expanded = Section {
            id: neighbor.id,
            rect,
            content: neighbor.content.clone(),
        };

        let mut sections: Vec<Section> = others
            .iter()
            .filter(|s| s.id != neighbor.id)
            .map(|s| (*s).clone())
            .collect();
        sections.push(expanded);
        tracing::debug!("Deleted {target}, {} expanded {adjacency:?}", neighbor.id);
        Self::from_sections(self.bounds(), sections)
    }

    /// Merge `source` into `target`, producing their bounding box.
    ///
    /// The result keeps the target's id and content; the source's content
    /// is discarded.
    #[must_use]
    pub fn merge(&self, source: SectionId, target: SectionId, policy: MergePolicy) -> Self {
        if source == target {
            tracing::debug!("Merge ignored, source and target are both {source}");
            return self.clone();
        }
        let (Some(src), Some(dst)) = (self.get(source), self.get(target)) else {
            tracing::debug!("Merge ignored, missing section among {source} and {target}");
            return self.clone();
        };

        if policy == MergePolicy::Exact && shared_edge(&src.rect, &dst.rect).is_none() {
            tracing::debug!("Merge of {source} into {target} rejected, no shared edge");
            return self.clone();
        }
        let rect = src.rect.bounding_box(&dst.rect);

        let merged = Section {
            id: dst.id,
            rect,
            content: dst.content.clone(),
        };
        let mut sections: Vec<Section> = self
            .sections()
            .iter()
            .filter(|s| s.id != source && s.id != target)
            .cloned()
            .collect();
        sections.push(merged);
        tracing::debug!("Merged {source} into {target}");
        Self::from_sections(self.bounds(), sections)
    }

    /// Place content in a section, replacing whatever was there.
    #[must_use]
    pub fn set_content(&self, target: SectionId, content: Content) -> Self {
        self.replace_section(target, "set_content", |s| Some(s.with_content(Some(content))))
    }

    /// Remove a section's content.
    #[must_use]
    pub fn clear_content(&self, target: SectionId) -> Self {
        self.replace_section(target, "clear_content", |s| Some(s.with_content(None)))
    }

    /// Replace the text or media reference of existing content.
    #[must_use]
    pub fn update_content_value(&self, target: SectionId, value: impl Into<String>) -> Self {
        let value = value.into();
        self.replace_section(target, "update_content_value", |mut s| {
            let content = s.content.take()?;
            Some(s.with_content(Some(content.with_value(value))))
        })
    }

    /// Pan or zoom framed media. Text and pdf content is left as is.
    #[must_use]
    pub fn update_content_transform(
        &self,
        target: SectionId,
        update: FramingUpdate,
        min_scale: f64,
    ) -> Self {
        self.replace_section(target, "update_content_transform", |mut s| {
            let framing = s.content.as_mut()?.framing_mut()?;
            *framing = framing.apply(update, min_scale);
            Some(s)
        })
    }

    /// Rebuild the layout with one section swapped in place.
    ///
    /// `f` returning `None` means the operation does not apply.
    fn replace_section<F>(&self, target: SectionId, op: &str, f: F) -> Self
    where
        F: FnOnce(Section) -> Option<Section>,
    {
        let Some(index) = self.sections().iter().position(|s| s.id == target) else {
            tracing::debug!("{op} ignored, section not found: {target}");
            return self.clone();
        };
        let mut sections = self.sections().to_vec();
        let Some(updated) = f(sections[index].clone()) else {
            tracing::debug!("{op} not applicable to {target}");
            return self.clone();
        };
        sections[index] = updated;
        Self::from_sections(self.bounds(), sections)
    }
}
