#![forbid(unsafe_code)]

//! Host surface contract for the stage.
//!
//! The stage never touches a DOM directly. It asks a [`StageSurface`] to wrap
//! the container's children in a clipping layer plus a translated content
//! layer, to measure both boxes, and to move the content layer. The web
//! frontend implements this against real elements; [`HeadlessSurface`] keeps
//! everything in memory for tests and benchmarks.

use crate::error::ScrollerError;
use crate::geometry::{ScrollPosition, Size};

/// Structural and geometric operations the stage needs from its host.
pub trait StageSurface {
    /// Move the container's children into the synthetic layers.
    ///
    /// Called once per stage; a second call must be a no-op.
    fn wrap_content(&mut self) -> Result<(), ScrollerError>;

    /// Move the children back, in original order, and drop the layers.
    fn unwrap_content(&mut self);

    /// Native scroll offset of the container before wrapping.
    fn native_scroll_offset(&self) -> ScrollPosition;

    /// Client box of the container.
    fn viewport_size(&self) -> Size;

    /// Rendered box of the content layer.
    fn content_size(&self) -> Size;

    /// Translate the content layer so `position` sits at the viewport origin.
    fn render_translate(&mut self, position: ScrollPosition);

    /// Undo native scrolling that leaked into the clipping layer.
    fn reset_native_scroll(&mut self);
}

/// In-memory surface.
///
/// Children are opaque labels. Wrapping moves them out of the container into
/// the content layer; unwrapping puts them back in order.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    container: Vec<String>,
    layer: Vec<String>,
    wrapped: bool,
    viewport: Size,
    content: Size,
    native_offset: ScrollPosition,
    leaked_offset: ScrollPosition,
    translate: ScrollPosition,
    renders: usize,
    reject_wrap: Option<String>,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            viewport,
            content,
            ..Self::default()
        }
    }

    /// Container children before wrapping.
    #[must_use]
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.container = children.into_iter().map(Into::into).collect();
        self
    }

    /// Native scroll offset reported at init.
    #[must_use]
    pub fn with_native_offset(mut self, offset: ScrollPosition) -> Self {
        self.native_offset = offset;
        self
    }

    /// Make `wrap_content` fail with `reason`.
    #[must_use]
    pub fn rejecting_wrap(mut self, reason: impl Into<String>) -> Self {
        self.reject_wrap = Some(reason.into());
        self
    }

    /// Change the measured content box (e.g. after content grew).
    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
    }

    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Simulate native scrolling of the clipping layer (focus, find-in-page).
    pub fn leak_native_scroll(&mut self, offset: ScrollPosition) {
        self.leaked_offset = offset;
    }

    /// Children currently attached directly to the container.
    #[must_use]
    pub fn container_children(&self) -> &[String] {
        &self.container
    }

    /// Children currently inside the content layer.
    #[must_use]
    pub fn layer_children(&self) -> &[String] {
        &self.layer
    }

    #[must_use]
    pub const fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Last translation applied to the content layer.
    #[must_use]
    pub const fn translate(&self) -> ScrollPosition {
        self.translate
    }

    /// Number of `render_translate` calls so far.
    #[must_use]
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    #[must_use]
    pub const fn leaked_offset(&self) -> ScrollPosition {
        self.leaked_offset
    }
}

impl StageSurface for HeadlessSurface {
    fn wrap_content(&mut self) -> Result<(), ScrollerError> {
        if let Some(reason) = &self.reject_wrap {
            return Err(ScrollerError::Surface(reason.clone()));
        }
        if self.wrapped {
            return Ok(());
        }
        self.layer = std::mem::take(&mut self.container);
        self.wrapped = true;
        Ok(())
    }

    fn unwrap_content(&mut self) {
        if !self.wrapped {
            return;
        }
        self.container.append(&mut self.layer);
        self.wrapped = false;
    }

    fn native_scroll_offset(&self) -> ScrollPosition {
        self.native_offset
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn content_size(&self) -> Size {
        self.content
    }

    fn render_translate(&mut self, position: ScrollPosition) {
        self.translate = position;
        self.renders += 1;
    }

    fn reset_native_scroll(&mut self) {
        self.leaked_offset = ScrollPosition::default();
    }
}
