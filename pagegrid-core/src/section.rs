//! Sections - the rectangular regions that tile a page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EditorError, EditorResult};

/// Tolerance used when comparing edges produced by split arithmetic.
pub const EDGE_EPSILON: f64 = 1e-6;

/// Default zoom factor for framed media.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Compare two coordinates within [`EDGE_EPSILON`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EDGE_EPSILON
}

/// Unique identifier for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(Uuid);

impl SectionId {
    /// Create a new unique section ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in canvas-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position (pixels from the canvas left edge).
    pub x: f64,
    /// Y position (pixels from the canvas top edge).
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle without validation.
    #[must_use]
    pub const fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle with a strictly positive, finite extent.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidGeometry`] for zero, negative or
    /// non-finite dimensions.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> EditorResult<Self> {
        let rect = Self::from_xywh(x, y, width, height);
        if rect.is_valid() {
            Ok(rect)
        } else {
            Err(EditorError::InvalidGeometry(format!(
                "[{x}, {y}, {width}, {height}]"
            )))
        }
    }

    /// Whether all components are finite and the extent is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if a point lies within the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn bounding_box(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::from_xywh(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Area shared with another rectangle (zero when they only touch).
    #[must_use]
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > EDGE_EPSILON && h > EDGE_EPSILON {
            w * h
        } else {
            0.0
        }
    }

    /// Whether `other` lies inside this rectangle, within [`EDGE_EPSILON`].
    #[must_use]
    pub fn encloses(&self, other: &Rect) -> bool {
        other.x >= self.x - EDGE_EPSILON
            && other.y >= self.y - EDGE_EPSILON
            && other.right() <= self.right() + EDGE_EPSILON
            && other.bottom() <= self.bottom() + EDGE_EPSILON
    }

    /// Component-wise comparison within [`EDGE_EPSILON`].
    #[must_use]
    pub fn approx_eq(&self, other: &Rect) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.width, other.width)
            && approx_eq(self.height, other.height)
    }

    /// Scale position and extent by independent factors.
    #[must_use]
    pub fn scaled(&self, sx: f64, sy: f64) -> Rect {
        Rect::from_xywh(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }
}

/// Plain tag of a content variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Editable text block.
    Text,
    /// Still image.
    Image,
    /// Looping video.
    Video,
    /// PDF document (reserved, no handler creates it).
    Pdf,
}

impl ContentKind {
    /// Whether this kind is media that the host must select a file for.
    #[must_use]
    pub const fn needs_media_source(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }

    /// Whether the toolbar offers this kind. Pdf is reserved: sections may
    /// carry it, but no drop or media answer creates it.
    #[must_use]
    pub const fn is_placeable(self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// Placement of media inside its section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Framing {
    /// Zoom factor (1.0 = fit).
    pub scale: f64,
    /// Horizontal pan in pixels.
    pub x_offset: f64,
    /// Vertical pan in pixels.
    pub y_offset: f64,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

/// Partial framing change; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FramingUpdate {
    /// New zoom factor.
    pub scale: Option<f64>,
    /// New horizontal pan.
    pub x_offset: Option<f64>,
    /// New vertical pan.
    pub y_offset: Option<f64>,
}

impl Framing {
    /// Apply a partial update, flooring the scale at `min_scale`.
    #[must_use]
    pub fn apply(self, update: FramingUpdate, min_scale: f64) -> Self {
        Self {
            scale: update.scale.map_or(self.scale, |s| s.max(min_scale)),
            x_offset: update.x_offset.unwrap_or(self.x_offset),
            y_offset: update.y_offset.unwrap_or(self.y_offset),
        }
    }
}

/// Media occupying a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// A text block.
    Text {
        /// Text content.
        value: String,
    },

    /// An image.
    Image {
        /// Image URI or object URL.
        src: String,
        /// Placement within the section.
        #[serde(default)]
        framing: Framing,
    },

    /// A video.
    Video {
        /// Video URI or object URL.
        src: String,
        /// Placement within the section.
        #[serde(default)]
        framing: Framing,
    },

    /// A PDF document.
    Pdf {
        /// Document URI.
        src: String,
    },
}

impl Content {
    /// Text content.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Image content with default framing.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            framing: Framing::default(),
        }
    }

    /// Video content with default framing.
    #[must_use]
    pub fn video(src: impl Into<String>) -> Self {
        Self::Video {
            src: src.into(),
            framing: Framing::default(),
        }
    }

    /// Build content of `kind` from a text value or media reference.
    #[must_use]
    pub fn from_kind(kind: ContentKind, value: impl Into<String>) -> Self {
        match kind {
            ContentKind::Text => Self::text(value),
            ContentKind::Image => Self::image(value),
            ContentKind::Video => Self::video(value),
            ContentKind::Pdf => Self::Pdf { src: value.into() },
        }
    }

    /// The variant tag.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::Image { .. } => ContentKind::Image,
            Self::Video { .. } => ContentKind::Video,
            Self::Pdf { .. } => ContentKind::Pdf,
        }
    }

    /// Text value or media reference.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Text { value } => value,
            Self::Image { src, .. } | Self::Video { src, .. } | Self::Pdf { src } => src,
        }
    }

    /// Replace the text value or media reference, keeping framing.
    #[must_use]
    pub fn with_value(self, value: impl Into<String>) -> Self {
        let value = value.into();
        match self {
            Self::Text { .. } => Self::Text { value },
            Self::Image { framing, .. } => Self::Image {
                src: value,
                framing,
            },
            Self::Video { framing, .. } => Self::Video {
                src: value,
                framing,
            },
            Self::Pdf { .. } => Self::Pdf { src: value },
        }
    }

    /// Framing of pannable media; `None` for text and pdf.
    #[must_use]
    pub fn framing(&self) -> Option<&Framing> {
        match self {
            Self::Image { framing, .. } | Self::Video { framing, .. } => Some(framing),
            Self::Text { .. } | Self::Pdf { .. } => None,
        }
    }

    /// Mutable framing of pannable media.
    pub fn framing_mut(&mut self) -> Option<&mut Framing> {
        match self {
            Self::Image { framing, .. } | Self::Video { framing, .. } => Some(framing),
            Self::Text { .. } | Self::Pdf { .. } => None,
        }
    }

    /// Whether this content can be panned and zoomed.
    #[must_use]
    pub fn is_framed(&self) -> bool {
        self.framing().is_some()
    }
}

/// A rectangular region of the canvas holding at most one content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier.
    pub id: SectionId,
    /// Position and size.
    pub rect: Rect,
    /// Optional content.
    pub content: Option<Content>,
}

impl Section {
    /// Create an empty section with a fresh id.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            id: SectionId::new(),
            rect,
            content: None,
        }
    }

    /// Set the content.
    #[must_use]
    pub fn with_content(mut self, content: Option<Content>) -> Self {
        self.content = content;
        self
    }

    /// Whether the section holds no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// Check if a point (in canvas coordinates) is within this section.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_image_and_video_ask_for_media() {
        assert!(ContentKind::Image.needs_media_source());
        assert!(ContentKind::Video.needs_media_source());
        assert!(!ContentKind::Text.needs_media_source());
        assert!(!ContentKind::Pdf.needs_media_source());
        assert!(!ContentKind::Pdf.is_placeable());
        assert!(ContentKind::Text.is_placeable());
    }

    #[test]
    fn rect_new_rejects_degenerate_extent() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_ok());
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_err());
        assert!(Rect::new(f64::NAN, 0.0, 10.0, 10.0).is_err());
    }

    #[test]
    fn contains_includes_edges() {
        let rect = Rect::from_xywh(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(110.0, 60.0)));
        assert!(!rect.contains(Point::new(110.5, 30.0)));
    }

    #[test]
    fn bounding_box_spans_disjoint_rects() {
        let a = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_xywh(200.0, 0.0, 100.0, 100.0);
        assert_eq!(a.bounding_box(&b), Rect::from_xywh(0.0, 0.0, 300.0, 100.0));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_xywh(100.0, 0.0, 100.0, 100.0);
        assert!(a.intersection_area(&b).abs() < f64::EPSILON);

        let c = Rect::from_xywh(50.0, 50.0, 100.0, 100.0);
        assert!((a.intersection_area(&c) - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn framing_update_floors_scale() {
        let framing = Framing::default().apply(
            FramingUpdate {
                scale: Some(0.1),
                x_offset: Some(12.0),
                y_offset: None,
            },
            0.5,
        );
        assert!((framing.scale - 0.5).abs() < f64::EPSILON);
        assert!((framing.x_offset - 12.0).abs() < f64::EPSILON);
        assert!(framing.y_offset.abs() < f64::EPSILON);
    }

    #[test]
    fn only_media_is_framed() {
        assert!(Content::image("blob:a").is_framed());
        assert!(Content::video("blob:b").is_framed());
        assert!(!Content::text("hello").is_framed());
        assert!(!Content::from_kind(ContentKind::Pdf, "doc.pdf").is_framed());
    }

    #[test]
    fn with_value_keeps_framing() {
        let mut content = Content::image("blob:a");
        if let Some(framing) = content.framing_mut() {
            framing.scale = 2.0;
        }
        let content = content.with_value("blob:b");
        assert_eq!(content.value(), "blob:b");
        assert!((content.framing().map_or(0.0, |f| f.scale) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn content_serializes_with_type_tag() {
        let json = serde_json::to_value(Content::text("hi")).expect("serialize");
        assert_eq!(json["type"], "text");
        assert_eq!(json["value"], "hi");

        let parsed: Content =
            serde_json::from_str(r#"{"type":"video","src":"blob:v"}"#).expect("deserialize");
        assert_eq!(parsed, Content::video("blob:v"));
    }
}
