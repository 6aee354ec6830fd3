//! Views: managed toplevel windows
//!
//! A [`View`] pairs a position in the shared output-layout space with an
//! opaque handle to the client's surface content. Views live in an arena
//! keyed by stable [`ViewId`] handles; the z-order is a separate ordered
//! list of handles (head = topmost), so destroy-time invalidation is a
//! single table removal.

use std::collections::HashMap;

use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::geometry::{self, Area, WINDOW_BORDER};

/// Stable handle for a view, valid until the view is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u32);

/// Surface content exposed by the external protocol layer.
///
/// Everything the core needs from a client window: local hit testing,
/// size negotiation, activation, and close requests. Implementations are
/// proxies onto protocol objects and use interior mutability.
pub trait SurfaceContent {
    /// Hit-test the actual surface tree at a view-local point; returns the
    /// surface-local coordinates on a hit.
    fn hit_test_local(&self, point: Point<f64, Logical>) -> Option<Point<f64, Logical>>;

    /// The client's current committed size.
    fn current_size(&self) -> Size<i32, Logical>;

    /// Ask the client to resize.
    fn set_size(&self, size: Size<i32, Logical>);

    /// Toggle the activated (focused) appearance.
    fn set_activated(&self, activated: bool);

    /// Ask the client to close; the client may ignore this.
    fn request_close(&self);

    /// PID of the owning client, for placement correlation.
    fn client_pid(&self) -> Option<i32>;
}

/// A managed toplevel window.
pub struct View {
    /// Top-left corner in output-layout space; `None` until first placed.
    pub position: Option<Point<i32, Logical>>,
    /// Last hit-test classification; read by drag math and the renderer.
    pub area: Area,
    pub content: Box<dyn SurfaceContent>,
}

impl View {
    /// The view's bordered rectangle, if placed.
    pub fn border_box(&self) -> Option<Rectangle<i32, Logical>> {
        let pos = self.position?;
        let size = self.content.current_size();
        Some(Rectangle::new(
            Point::from((pos.x - WINDOW_BORDER, pos.y - WINDOW_BORDER)),
            Size::from((size.w + WINDOW_BORDER * 2, size.h + WINDOW_BORDER * 2)),
        ))
    }
}

/// Result of scanning the view stack under a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// The surface content itself; `local` is surface-local.
    Content {
        view: ViewId,
        local: Point<f64, Logical>,
    },
    /// The border frame around the content.
    Border { view: ViewId, area: Area },
}

impl Hit {
    pub fn view(&self) -> ViewId {
        match *self {
            Hit::Content { view, .. } | Hit::Border { view, .. } => view,
        }
    }
}

/// The z-ordered set of mapped views.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<ViewId, View>,
    /// Mapped views only; head = topmost / most recently focused.
    z_order: Vec<ViewId>,
    next: u32,
}

impl ViewRegistry {
    /// Register a freshly created toplevel. It joins the z-order on map.
    pub fn insert(&mut self, content: Box<dyn SurfaceContent>) -> ViewId {
        let id = ViewId(self.next);
        self.next += 1;
        self.views.insert(
            id,
            View {
                position: None,
                area: Area::Surface,
                content,
            },
        );
        id
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    /// Add a view to the top of the z-order on first map.
    pub fn map(&mut self, id: ViewId) {
        if self.views.contains_key(&id) && !self.z_order.contains(&id) {
            self.z_order.insert(0, id);
        }
    }

    /// Remove a destroyed view; a no-op for unknown handles.
    pub fn remove(&mut self, id: ViewId) -> Option<View> {
        self.z_order.retain(|v| *v != id);
        self.views.remove(&id)
    }

    /// The topmost mapped view, if any.
    pub fn top(&self) -> Option<ViewId> {
        self.z_order.first().copied()
    }

    /// Move a mapped view to the head of the z-order.
    pub fn raise(&mut self, id: ViewId) {
        if let Some(idx) = self.z_order.iter().position(|v| *v == id) {
            self.z_order.remove(idx);
            self.z_order.insert(0, id);
        }
    }

    /// Mapped views, topmost first.
    pub fn stack(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.z_order.iter().copied()
    }

    /// Mapped views in paint order (bottom first).
    pub fn paint_order(&self) -> impl Iterator<Item = (ViewId, &View)> + '_ {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.views.get(id).map(|v| (*id, v)))
    }

    pub fn mapped_count(&self) -> usize {
        self.z_order.len()
    }

    /// Find the view under `point`, topmost first.
    ///
    /// Content takes priority over the border: the surface tree is queried
    /// first, and only then the bordered rectangle. The winning view's
    /// `area` field records the classification.
    pub fn hit_test(&mut self, point: Point<f64, Logical>) -> Option<Hit> {
        for &id in &self.z_order {
            let Some(view) = self.views.get_mut(&id) else {
                continue;
            };
            let Some(pos) = view.position else {
                continue;
            };
            let local = Point::<f64, Logical>::from((
                point.x - pos.x as f64,
                point.y - pos.y as f64,
            ));
            if let Some(surface_local) = view.content.hit_test_local(local) {
                view.area = Area::Surface;
                return Some(Hit::Content {
                    view: id,
                    local: surface_local,
                });
            }
            if let Some(border_box) = view.border_box() {
                if border_box.to_f64().contains(point) {
                    let area = geometry::classify(border_box, point);
                    view.area = area;
                    return Some(Hit::Border { view: id, area });
                }
            }
        }
        None
    }
}

/// Lifecycle notifications from the external protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// First commit carrying a buffer; placement hints are consumed here.
    InitialCommit,
    /// The surface became visible; the view joins the z-order.
    Mapped,
    /// The toplevel went away.
    Destroyed,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Recording fake for [`SurfaceContent`].
    #[derive(Debug)]
    pub struct ContentLog {
        pub size: Size<i32, Logical>,
        pub set_sizes: Vec<Size<i32, Logical>>,
        pub activations: Vec<bool>,
        pub close_requests: u32,
        pub pid: Option<i32>,
    }

    pub struct TestContent(pub Rc<RefCell<ContentLog>>);

    pub fn test_content(w: i32, h: i32) -> (TestContent, Rc<RefCell<ContentLog>>) {
        let log = Rc::new(RefCell::new(ContentLog {
            size: Size::from((w, h)),
            set_sizes: Vec::new(),
            activations: Vec::new(),
            close_requests: 0,
            pid: None,
        }));
        (TestContent(log.clone()), log)
    }

    impl SurfaceContent for TestContent {
        fn hit_test_local(&self, point: Point<f64, Logical>) -> Option<Point<f64, Logical>> {
            let size = self.0.borrow().size;
            let inside = point.x >= 0.0
                && point.y >= 0.0
                && point.x < size.w as f64
                && point.y < size.h as f64;
            inside.then_some(point)
        }

        fn current_size(&self) -> Size<i32, Logical> {
            self.0.borrow().size
        }

        fn set_size(&self, size: Size<i32, Logical>) {
            let mut log = self.0.borrow_mut();
            log.set_sizes.push(size);
            log.size = size;
        }

        fn set_activated(&self, activated: bool) {
            self.0.borrow_mut().activations.push(activated);
        }

        fn request_close(&self) {
            self.0.borrow_mut().close_requests += 1;
        }

        fn client_pid(&self) -> Option<i32> {
            self.0.borrow().pid
        }
    }
}
