//! Central compositor state
//!
//! [`Wayrio`] owns the registries, the active gesture, and the menu, and
//! dispatches the lifecycle events the external protocol layer feeds in.
//! Handlers return [`SeatRequest`]s instead of touching protocol objects,
//! so the core stays deterministic and testable.

use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::config::Config;
use crate::cursor::CursorIcon;
use crate::geometry::CanonCache;
use crate::input::{Gesture, SeatRequest};
use crate::layers::{self, LayerAttrs, LayerEvent, LayerHandle, LayerId, LayerMap, LayerSurface, ShellLayer};
use crate::menu::Menu;
use crate::output::{OutputEvent, OutputId, OutputRegistry};
use crate::view::{SurfaceContent, ViewEvent, ViewId, ViewRegistry};

/// A window slot reserved for a helper process that has not connected yet.
#[derive(Debug, Clone, Copy)]
pub struct PendingView {
    pub pid: i32,
    pub rect: Rectangle<i32, Logical>,
}

pub struct Wayrio {
    pub config: Config,
    pub views: ViewRegistry,
    pub outputs: OutputRegistry,
    pub layers: LayerMap,
    pub menu: Menu,
    pub gesture: Gesture,
    /// Single-slot memo shared by the drag preview and the commit path.
    pub canon: CanonCache,
    /// Pointer position in output-layout space.
    pub cursor: Point<f64, Logical>,
    pub cursor_icon: CursorIcon,
    /// Keyboard-focused view; kept separate from the z-order so focus
    /// changes and raises stay independent.
    focused: Option<ViewId>,
    pending_views: Vec<PendingView>,
}

impl Wayrio {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            views: ViewRegistry::default(),
            outputs: OutputRegistry::default(),
            layers: LayerMap::default(),
            menu: Menu::default(),
            gesture: Gesture::None,
            canon: CanonCache::default(),
            cursor: Point::from((0.0, 0.0)),
            cursor_icon: CursorIcon::Default,
            focused: None,
            pending_views: Vec::new(),
        }
    }

    /// Pointer position truncated to layout units.
    pub fn cursor_i32(&self) -> Point<i32, Logical> {
        Point::from((self.cursor.x as i32, self.cursor.y as i32))
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    pub fn pending_views(&self) -> &[PendingView] {
        &self.pending_views
    }

    pub(crate) fn push_pending(&mut self, pending: PendingView) {
        self.pending_views.push(pending);
    }

    // ---- views ----------------------------------------------------------

    /// Register a freshly created toplevel.
    pub fn add_view(&mut self, content: Box<dyn SurfaceContent>) -> ViewId {
        let id = self.views.insert(content);
        tracing::debug!(?id, "new toplevel");
        id
    }

    pub fn handle_view_event(&mut self, id: ViewId, event: ViewEvent) -> Vec<SeatRequest> {
        match event {
            ViewEvent::InitialCommit => {
                self.consume_pending(id);
                Vec::new()
            }
            ViewEvent::Mapped => {
                self.views.map(id);
                self.place_on_map(id);
                self.focus_view(id)
            }
            ViewEvent::Destroyed => {
                if self.gesture.grabbed_view() == Some(id) {
                    tracing::debug!(?id, "grabbed view destroyed, cancelling gesture");
                    self.end_gesture();
                }
                if self.focused == Some(id) {
                    self.focused = None;
                }
                self.views.remove(id);
                Vec::new()
            }
        }
    }

    /// Apply a reserved placement if the mapping client was spawned by us.
    fn consume_pending(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let Some(pid) = view.content.client_pid() else {
            return;
        };
        let Some(idx) = self.pending_views.iter().position(|p| p.pid == pid) else {
            return;
        };
        let pending = self.pending_views.remove(idx);
        view.position = Some(pending.rect.loc);
        view.content.set_size(pending.rect.size);
        tracing::debug!(?id, pid, rect = ?pending.rect, "placed spawned window");
    }

    /// Center unplaced views on the output under the pointer.
    fn place_on_map(&mut self, id: ViewId) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if view.position.is_some() {
            return;
        }
        let output = self
            .outputs
            .output_at(self.cursor)
            .or_else(|| self.outputs.first());
        let position = match output.and_then(|o| self.outputs.get(o)) {
            Some(out) => {
                let size = view.content.current_size();
                Point::from((
                    out.position.x + (out.resolution.w / 2 - size.w / 2),
                    out.position.y + (out.resolution.h / 2 - size.h / 2),
                ))
            }
            None => Point::from((0, 0)),
        };
        if let Some(view) = self.views.get_mut(id) {
            view.position = Some(position);
        }
    }

    /// Activate a view, raise it, and ask the seat to move keyboard focus.
    pub(crate) fn focus_view(&mut self, id: ViewId) -> Vec<SeatRequest> {
        if self.focused == Some(id) {
            self.views.raise(id);
            return Vec::new();
        }
        if let Some(prev) = self.focused.take() {
            if let Some(view) = self.views.get(prev) {
                view.content.set_activated(false);
            }
        }
        let Some(view) = self.views.get(id) else {
            return Vec::new();
        };
        view.content.set_activated(true);
        self.views.raise(id);
        self.focused = Some(id);
        vec![SeatRequest::KeyboardEnter { view: id }]
    }

    /// Reposition and resize a view to a committed drag rectangle.
    pub(crate) fn apply_box(&mut self, id: ViewId, rect: Rectangle<i32, Logical>) {
        if let Some(view) = self.views.get_mut(id) {
            view.position = Some(rect.loc);
            view.content.set_size(rect.size);
        }
    }

    /// Return to the idle state, dropping every per-gesture memo.
    pub(crate) fn end_gesture(&mut self) {
        self.gesture = Gesture::None;
        self.canon.reset();
        self.cursor_icon = CursorIcon::Default;
    }

    // ---- outputs --------------------------------------------------------

    pub fn add_output(&mut self, name: &str, resolution: Size<i32, Logical>) -> OutputId {
        self.outputs.add(name, resolution, &self.config)
    }

    pub fn handle_output_event(&mut self, id: OutputId, event: OutputEvent) {
        match event {
            OutputEvent::Resized { resolution } => {
                if let Some(output) = self.outputs.get_mut(id) {
                    output.resolution = resolution;
                }
                self.arrange(id);
            }
            OutputEvent::Removed => {
                let Some(output) = self.outputs.remove(id) else {
                    return;
                };
                // layer surfaces cannot outlive their output
                for bucket in output.layers {
                    for layer_id in bucket {
                        if let Some(surface) = self.layers.remove(layer_id) {
                            surface.handle.close();
                        }
                    }
                }
                tracing::info!(name = %output.name, "output removed");
            }
        }
    }

    pub(crate) fn arrange(&mut self, id: OutputId) {
        if let Some(output) = self.outputs.get_mut(id) {
            layers::arrange_output(output, &mut self.layers);
        }
    }

    // ---- layer surfaces -------------------------------------------------

    /// Register a new layer surface. Surfaces without an output preference
    /// land on the output under the pointer; with no outputs at all the
    /// surface is closed immediately.
    pub fn add_layer_surface(
        &mut self,
        output: Option<OutputId>,
        layer: ShellLayer,
        handle: Box<dyn LayerHandle>,
    ) -> Option<LayerId> {
        let Some(output_id) = output
            .or_else(|| self.outputs.output_at(self.cursor))
            .or_else(|| self.outputs.first())
        else {
            tracing::warn!("layer surface with no output to land on");
            handle.close();
            return None;
        };
        let id = self.layers.insert(LayerSurface {
            output: output_id,
            layer,
            attrs: LayerAttrs::default(),
            geo: Rectangle::new(Point::from((0, 0)), Size::from((0, 0))),
            handle,
        });
        if let Some(out) = self.outputs.get_mut(output_id) {
            out.layers[layer.index()].push(id);
        }
        self.arrange(output_id);
        Some(id)
    }

    pub fn handle_layer_event(&mut self, id: LayerId, event: LayerEvent) {
        match event {
            LayerEvent::Committed { attrs } => {
                let Some(surface) = self.layers.get_mut(id) else {
                    return;
                };
                surface.attrs = attrs;
                let output = surface.output;
                self.arrange(output);
            }
            LayerEvent::Destroyed => {
                let Some(surface) = self.layers.remove(id) else {
                    return;
                };
                if let Some(output) = self.outputs.get_mut(surface.output) {
                    output.layers[surface.layer.index()].retain(|l| *l != id);
                }
                self.arrange(surface.output);
            }
        }
    }
}
