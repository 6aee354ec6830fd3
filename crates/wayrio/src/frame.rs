//! Frame composition
//!
//! Turns the core state into an ordered paint plan for one output:
//! background and bottom layer surfaces, then views bottom-up, the drag
//! overlay for the active gesture, top layer surfaces, the menu, and
//! overlay layer surfaces last. The renderer walks the list front to back
//! and draws; nothing here touches protocol objects.

use smithay::utils::{Logical, Point, Rectangle};

use crate::geometry::{self, Area};
use crate::input::Gesture;
use crate::layers::{LayerId, ShellLayer};
use crate::output::OutputId;
use crate::state::Wayrio;
use crate::view::ViewId;

/// The overlay drawn for an in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPreview {
    /// Border-only rectangle: a carried window or a dragged edge.
    Outline(Rectangle<i32, Logical>),
    /// Filled rectangle: a sweep that will become real geometry.
    Sweep(Rectangle<i32, Logical>),
}

/// One thing to draw, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintElement {
    /// A layer surface at its layout-space box.
    Layer {
        id: LayerId,
        rect: Rectangle<i32, Logical>,
    },
    /// A view's border frame; `focused` selects the active border color.
    ViewBorder {
        view: ViewId,
        rect: Rectangle<i32, Logical>,
        focused: bool,
    },
    /// A view's content at its layout-space position.
    ViewContent {
        view: ViewId,
        rect: Rectangle<i32, Logical>,
    },
    Preview(DragPreview),
    /// The menu with the entry index currently under the cursor.
    Menu {
        rect: Rectangle<i32, Logical>,
        selected: Option<usize>,
    },
}

impl Wayrio {
    /// The overlay implied by the active gesture, if it has one.
    pub fn drag_preview(&mut self) -> Option<DragPreview> {
        let cursor = self.cursor_i32();
        match self.gesture {
            Gesture::BorderDrag { view, area, origin } => {
                let size = self.views.get(view)?.content.current_size();
                let rect = self
                    .canon
                    .canon(geometry::candidate_box(area, origin, size, cursor));
                Some(DragPreview::Outline(rect))
            }
            Gesture::Move { view, grab } => {
                let size = self.views.get(view)?.content.current_size();
                let rect = Rectangle::new(
                    Point::from((cursor.x - grab.x, cursor.y - grab.y)),
                    size,
                );
                Some(DragPreview::Outline(rect))
            }
            Gesture::NewEnd { origin } => {
                Some(DragPreview::Sweep(geometry::new_view_box(origin, cursor)))
            }
            Gesture::ResizeEnd { view, origin } => {
                let size = self.views.get(view)?.content.current_size();
                Some(DragPreview::Sweep(geometry::candidate_box(
                    Area::BottomRight,
                    origin,
                    size,
                    cursor,
                )))
            }
            _ => None,
        }
    }

    /// Layer-surface elements of one bucket, in arrival order, offset
    /// into layout space.
    fn layer_elements(&self, output: OutputId, layer: ShellLayer) -> Vec<PaintElement> {
        let Some(out) = self.outputs.get(output) else {
            return Vec::new();
        };
        let origin = out.position;
        out.bucket(layer)
            .iter()
            .filter_map(|&id| {
                self.layers.get(id).map(|surface| {
                    let mut rect = surface.geo;
                    rect.loc.x += origin.x;
                    rect.loc.y += origin.y;
                    PaintElement::Layer { id, rect }
                })
            })
            .collect()
    }

    /// The full paint plan for one output, bottom first.
    pub fn compose(&mut self, output: OutputId) -> Vec<PaintElement> {
        if self.outputs.get(output).is_none() {
            return Vec::new();
        }
        let mut plan = Vec::new();

        plan.extend(self.layer_elements(output, ShellLayer::Background));
        plan.extend(self.layer_elements(output, ShellLayer::Bottom));

        let focused = self.focused();
        for (id, view) in self.views.paint_order() {
            let Some(border) = view.border_box() else {
                continue;
            };
            plan.push(PaintElement::ViewBorder {
                view: id,
                rect: border,
                focused: focused == Some(id),
            });
            if let Some(position) = view.position {
                plan.push(PaintElement::ViewContent {
                    view: id,
                    rect: Rectangle::new(position, view.content.current_size()),
                });
            }
        }

        if let Some(preview) = self.drag_preview() {
            plan.push(PaintElement::Preview(preview));
        }

        plan.extend(self.layer_elements(output, ShellLayer::Top));

        if let Some(rect) = self.menu.rect() {
            plan.push(PaintElement::Menu {
                rect,
                selected: self.menu.selected(self.cursor),
            });
        }

        plan.extend(self.layer_elements(output, ShellLayer::Overlay));
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::input::{ButtonState, BTN_RIGHT};
    use crate::layers::{Anchor, LayerAttrs, LayerEvent};
    use crate::view::test_support::test_content;
    use crate::view::ViewEvent;
    use smithay::utils::Size;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new(Point::from((x, y)), Size::from((w, h)))
    }

    fn state_with_view() -> (Wayrio, ViewId) {
        let mut state = Wayrio::new(Config::default());
        state.add_output("TEST-1", Size::from((800, 600)));
        let (content, _) = test_content(200, 150);
        let id = state.add_view(Box::new(content));
        state.handle_view_event(id, ViewEvent::Mapped);
        state.views.get_mut(id).expect("view").position = Some(Point::from((100, 100)));
        (state, id)
    }

    #[test]
    fn move_preview_tracks_cursor_minus_grab() {
        let (mut state, id) = state_with_view();
        state.gesture = Gesture::Move {
            view: id,
            grab: Point::from((5, 5)),
        };
        state.cursor = Point::from((120.0, 80.0));
        assert_eq!(
            state.drag_preview(),
            Some(DragPreview::Outline(rect(115, 75, 200, 150)))
        );
    }

    #[test]
    fn undersized_border_drag_preview_clamps_to_minimum() {
        let (mut state, id) = state_with_view();
        state.gesture = Gesture::BorderDrag {
            view: id,
            area: Area::Right,
            origin: Point::from((100, 100)),
        };
        state.cursor = Point::from((320.0, 150.0));
        let wide = state.drag_preview();
        assert_eq!(wide, Some(DragPreview::Outline(rect(100, 100, 220, 150))));

        // dragging the right edge inside the minimum width: the cursor
        // edge stays put and the far edge gives way
        state.cursor = Point::from((150.0, 150.0));
        assert_eq!(
            state.drag_preview(),
            Some(DragPreview::Outline(rect(50, 100, 100, 150)))
        );
    }

    #[test]
    fn new_sweep_preview_is_filled() {
        let (mut state, _) = state_with_view();
        state.gesture = Gesture::NewEnd {
            origin: Point::from((400, 400)),
        };
        state.cursor = Point::from((550.0, 520.0));
        assert_eq!(
            state.drag_preview(),
            Some(DragPreview::Sweep(rect(400, 400, 150, 120)))
        );
    }

    #[test]
    fn compose_orders_layers_views_menu() {
        let (mut state, view) = state_with_view();
        let output = state.outputs.first().expect("output");

        let (bg_handle, _) = crate::layers::test_support::test_handle();
        let bg = state
            .add_layer_surface(Some(output), ShellLayer::Background, Box::new(bg_handle))
            .expect("background");
        state.handle_layer_event(
            bg,
            LayerEvent::Committed {
                attrs: LayerAttrs {
                    anchor: Anchor::all(),
                    ..Default::default()
                },
            },
        );

        let (ov_handle, _) = crate::layers::test_support::test_handle();
        let overlay = state
            .add_layer_surface(Some(output), ShellLayer::Overlay, Box::new(ov_handle))
            .expect("overlay");

        // open the menu over empty space
        state.pointer_moved(Point::from((600.0, 500.0)));
        state.pointer_button(BTN_RIGHT, ButtonState::Pressed);

        let plan = state.compose(output);
        let kinds: Vec<&str> = plan
            .iter()
            .map(|e| match e {
                PaintElement::Layer { id, .. } if *id == bg => "background",
                PaintElement::Layer { id, .. } if *id == overlay => "overlay",
                PaintElement::Layer { .. } => "layer",
                PaintElement::ViewBorder { .. } => "border",
                PaintElement::ViewContent { .. } => "content",
                PaintElement::Preview(_) => "preview",
                PaintElement::Menu { .. } => "menu",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["background", "border", "content", "menu", "overlay"]
        );

        // the view's border box wraps its content box
        let border = plan.iter().find_map(|e| match e {
            PaintElement::ViewBorder { view: v, rect, .. } if *v == view => Some(*rect),
            _ => None,
        });
        assert_eq!(border, Some(rect(95, 95, 210, 160)));
    }
}
