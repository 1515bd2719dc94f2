#![forbid(unsafe_code)]

//! DOM side of the stage and the scrollbar elements.
//!
//! [`DomStage`] moves the container's child nodes into two synthetic layers:
//!
//! ```text
//! container (overflow: visible, position: relative)
//! └── clip layer   (absolute, overflow: hidden, sized to the container)
//!     └── content layer (absolute, translated)
//!         └── original children…
//! ```
//!
//! Unwrapping moves the children back in front of the clip layer and
//! restores the container's inline style attribute.

use scroller_core::{Axis, ScrollBarView, ScrollPosition, ScrollerError, Size, StageSurface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, Node};

use crate::style::{self, Declaration};

fn surface_error(context: &str, err: &JsValue) -> ScrollerError {
    ScrollerError::Surface(format!("{context}: {err:?}"))
}

/// Apply declarations, logging (not failing on) rejected properties.
pub(crate) fn apply_style(element: &HtmlElement, declarations: &[Declaration]) {
    let css = element.style();
    for (property, value) in declarations {
        if let Err(err) = css.set_property(property, value) {
            tracing::warn!(target: "scroller.web", property, ?err, "style property rejected");
        }
    }
}

fn set_style(element: &HtmlElement, declaration: Declaration) {
    apply_style(element, std::slice::from_ref(&declaration));
}

/// `<div data-test=…>` with the given styles.
pub(crate) fn create_div(
    document: &Document,
    test_id: Option<&str>,
    declarations: &[Declaration],
) -> Result<HtmlElement, ScrollerError> {
    let element = document
        .create_element("div")
        .map_err(|e| surface_error("create div", &e))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| ScrollerError::Surface("created element is not an HtmlElement".into()))?;
    if let Some(id) = test_id {
        element
            .set_attribute("data-test", id)
            .map_err(|e| surface_error("set data-test", &e))?;
    }
    apply_style(&element, declarations);
    Ok(element)
}

fn child_nodes(parent: &Node) -> Vec<Node> {
    let list = parent.child_nodes();
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

struct Layers {
    clip: HtmlElement,
    content: HtmlElement,
    container_style: Option<String>,
    native_offset: ScrollPosition,
}

/// Stage surface backed by a real container element.
pub(crate) struct DomStage {
    container: HtmlElement,
    layers: Option<Layers>,
}

impl DomStage {
    pub(crate) fn new(container: HtmlElement) -> Self {
        Self {
            container,
            layers: None,
        }
    }

    pub(crate) fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Clipping layer, present while wrapped.
    pub(crate) fn clip_layer(&self) -> Option<&HtmlElement> {
        self.layers.as_ref().map(|l| &l.clip)
    }
}

impl StageSurface for DomStage {
    fn wrap_content(&mut self) -> Result<(), ScrollerError> {
        if self.layers.is_some() {
            return Ok(());
        }
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| ScrollerError::Surface("container has no owner document".into()))?;

        let native_offset = ScrollPosition::new(
            f64::from(self.container.scroll_left()),
            f64::from(self.container.scroll_top()),
        );
        let rect = self.container.get_bounding_client_rect();
        let clip = create_div(
            &document,
            Some("stage"),
            &style::clip_layer(rect.width(), rect.height()),
        )?;
        let content = create_div(&document, None, &style::content_layer())?;

        let children = child_nodes(&self.container);
        self.container
            .append_child(&clip)
            .map_err(|e| surface_error("attach clip layer", &e))?;
        clip.append_child(&content)
            .map_err(|e| surface_error("attach content layer", &e))?;
        for child in &children {
            content
                .append_child(child)
                .map_err(|e| surface_error("move child into content layer", &e))?;
        }

        let container_style = self.container.get_attribute("style");
        apply_style(&self.container, &style::container());
        tracing::debug!(target: "scroller.web", children = children.len(), "content wrapped");

        self.layers = Some(Layers {
            clip,
            content,
            container_style,
            native_offset,
        });
        Ok(())
    }

    fn unwrap_content(&mut self) {
        let Some(layers) = self.layers.take() else {
            return;
        };
        for child in child_nodes(&layers.content) {
            if let Err(err) = self.container.insert_before(&child, Some(layers.clip.as_ref())) {
                tracing::warn!(target: "scroller.web", ?err, "failed to restore child");
            }
        }
        layers.clip.remove();
        let restored = match &layers.container_style {
            Some(original) => self.container.set_attribute("style", original),
            None => self.container.remove_attribute("style"),
        };
        if let Err(err) = restored {
            tracing::warn!(target: "scroller.web", ?err, "failed to restore container style");
        }
        tracing::debug!(target: "scroller.web", "content unwrapped");
    }

    fn native_scroll_offset(&self) -> ScrollPosition {
        self.layers.as_ref().map_or_else(
            || {
                ScrollPosition::new(
                    f64::from(self.container.scroll_left()),
                    f64::from(self.container.scroll_top()),
                )
            },
            |l| l.native_offset,
        )
    }

    fn viewport_size(&self) -> Size {
        Size::new(
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
        )
    }

    fn content_size(&self) -> Size {
        self.layers.as_ref().map_or_else(Size::default, |l| {
            Size::new(
                f64::from(l.content.offset_width()),
                f64::from(l.content.offset_height()),
            )
        })
    }

    fn render_translate(&mut self, position: ScrollPosition) {
        if let Some(layers) = &self.layers {
            set_style(&layers.content, ("transform", style::translate(position)));
        }
    }

    fn reset_native_scroll(&mut self) {
        if let Some(layers) = &self.layers {
            layers.clip.set_scroll_top(0);
            layers.clip.set_scroll_left(0);
        }
    }
}

/// Track and cursor elements of one scrollbar.
pub(crate) struct ScrollBarElements {
    pub(crate) track: HtmlElement,
    cursor: HtmlElement,
    axis: Axis,
}

impl ScrollBarElements {
    /// Create the elements and append the track to `container`.
    pub(crate) fn create(
        container: &HtmlElement,
        axis: Axis,
        class_name: &str,
    ) -> Result<Self, ScrollerError> {
        let document = container
            .owner_document()
            .ok_or_else(|| ScrollerError::Surface("container has no owner document".into()))?;
        let track = create_div(&document, Some("scrollbar-container"), &style::track(axis))?;
        track.set_class_name(class_name);
        let cursor = create_div(&document, Some("scrollbar-cursor"), &style::cursor(axis))?;
        track
            .append_child(&cursor)
            .map_err(|e| surface_error("attach scrollbar cursor", &e))?;
        container
            .append_child(&track)
            .map_err(|e| surface_error("attach scrollbar track", &e))?;
        tracing::debug!(target: "scroller.web", ?axis, "scrollbar created");
        Ok(Self {
            track,
            cursor,
            axis,
        })
    }

    /// Sync the elements with a view snapshot.
    pub(crate) fn render(&self, view: &ScrollBarView, fade_inactive: bool) {
        debug_assert_eq!(view.axis, self.axis);
        set_style(&self.track, style::display(view.visible));
        if !view.visible {
            return;
        }
        set_style(&self.cursor, style::cursor_length(self.axis, view.cursor_length));
        apply_style(&self.cursor, &style::cursor_placement(view.placement));
        if fade_inactive {
            set_style(&self.track, style::opacity(view.opaque));
        }
    }

    pub(crate) fn remove(&self) {
        self.track.remove();
    }
}
