//! Shell-layer arrange engine
//!
//! Layer surfaces (panels, wallpapers, lock screens) are positioned by a
//! deterministic two-pass pipeline over each output: surfaces reserving
//! exclusive space first, then the rest, with overlay surfaces placed
//! before top, bottom, and background within each pass. A surface whose
//! anchors and margins produce a negative extent is closed and dropped.

use std::collections::HashMap;

use bitflags::bitflags;
use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::output::Output;

bitflags! {
    /// Edges of the output a layer surface is anchored to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Anchor: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

impl Anchor {
    const BOTH_HORIZ: Anchor = Anchor::LEFT.union(Anchor::RIGHT);
    const BOTH_VERT: Anchor = Anchor::TOP.union(Anchor::BOTTOM);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// The four stacking layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellLayer {
    Background,
    Bottom,
    Top,
    Overlay,
}

impl ShellLayer {
    /// Paint order, bottom first.
    pub const ALL: [ShellLayer; 4] = [
        ShellLayer::Background,
        ShellLayer::Bottom,
        ShellLayer::Top,
        ShellLayer::Overlay,
    ];

    /// Arrange precedence: higher layers claim exclusive space first.
    const PRECEDENCE: [ShellLayer; 4] = [
        ShellLayer::Overlay,
        ShellLayer::Top,
        ShellLayer::Bottom,
        ShellLayer::Background,
    ];

    pub fn index(self) -> usize {
        match self {
            ShellLayer::Background => 0,
            ShellLayer::Bottom => 1,
            ShellLayer::Top => 2,
            ShellLayer::Overlay => 3,
        }
    }
}

/// Client-committed positioning state for a layer surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerAttrs {
    pub anchor: Anchor,
    pub margins: Margins,
    /// Positive: units of exclusive space to reserve. 0: none. -1: ignore
    /// other surfaces' reservations and span the full output.
    pub exclusive_zone: i32,
    /// Requested size; 0 on an axis means "stretch" when anchored to both
    /// opposite edges.
    pub desired_size: Size<i32, Logical>,
    pub keyboard_interactive: bool,
}

impl Default for LayerAttrs {
    fn default() -> Self {
        Self {
            anchor: Anchor::empty(),
            margins: Margins::default(),
            exclusive_zone: 0,
            desired_size: Size::from((0, 0)),
            keyboard_interactive: false,
        }
    }
}

/// Protocol-side handle for a layer surface.
pub trait LayerHandle {
    /// Tell the client the size the arrange pass settled on.
    fn configure(&self, size: Size<i32, Logical>);

    /// Close the surface; used when its committed state is unsatisfiable.
    fn close(&self);
}

/// Stable handle for a layer surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

pub struct LayerSurface {
    pub output: crate::output::OutputId,
    pub layer: ShellLayer,
    pub attrs: LayerAttrs,
    /// Output-local box from the last arrange pass.
    pub geo: Rectangle<i32, Logical>,
    pub handle: Box<dyn LayerHandle>,
}

#[derive(Default)]
pub struct LayerMap {
    surfaces: HashMap<LayerId, LayerSurface>,
    next: u32,
}

impl LayerMap {
    pub fn insert(&mut self, surface: LayerSurface) -> LayerId {
        let id = LayerId(self.next);
        self.next += 1;
        self.surfaces.insert(id, surface);
        id
    }

    pub fn get(&self, id: LayerId) -> Option<&LayerSurface> {
        self.surfaces.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut LayerSurface> {
        self.surfaces.get_mut(&id)
    }

    pub fn remove(&mut self, id: LayerId) -> Option<LayerSurface> {
        self.surfaces.remove(&id)
    }
}

/// Commit notifications for a layer surface. Creation goes through
/// [`crate::state::Wayrio::add_layer_surface`], which hands back the id.
#[derive(Debug)]
pub enum LayerEvent {
    /// The client committed new positioning state.
    Committed { attrs: LayerAttrs },
    Destroyed,
}

/// Compute the output-local box for the committed attributes within
/// `bounds`, or `None` if the margins leave a negative extent.
pub fn layer_surface_box(
    attrs: &LayerAttrs,
    bounds: Rectangle<i32, Logical>,
) -> Option<Rectangle<i32, Logical>> {
    let anchor = attrs.anchor;
    let m = attrs.margins;
    let mut w = attrs.desired_size.w;
    let mut h = attrs.desired_size.h;

    let mut x;
    if anchor.contains(Anchor::BOTH_HORIZ) && w == 0 {
        x = bounds.loc.x;
        w = bounds.size.w;
    } else if anchor.contains(Anchor::LEFT) {
        x = bounds.loc.x;
    } else if anchor.contains(Anchor::RIGHT) {
        x = bounds.loc.x + (bounds.size.w - w);
    } else {
        x = bounds.loc.x + (bounds.size.w / 2 - w / 2);
    }

    let mut y;
    if anchor.contains(Anchor::BOTH_VERT) && h == 0 {
        y = bounds.loc.y;
        h = bounds.size.h;
    } else if anchor.contains(Anchor::TOP) {
        y = bounds.loc.y;
    } else if anchor.contains(Anchor::BOTTOM) {
        y = bounds.loc.y + (bounds.size.h - h);
    } else {
        y = bounds.loc.y + (bounds.size.h / 2 - h / 2);
    }

    if anchor.contains(Anchor::BOTH_HORIZ) {
        x += m.left;
        w -= m.left + m.right;
    } else if anchor.contains(Anchor::LEFT) {
        x += m.left;
    } else if anchor.contains(Anchor::RIGHT) {
        x -= m.right;
    }

    if anchor.contains(Anchor::BOTH_VERT) {
        y += m.top;
        h -= m.top + m.bottom;
    } else if anchor.contains(Anchor::TOP) {
        y += m.top;
    } else if anchor.contains(Anchor::BOTTOM) {
        y -= m.bottom;
    }

    if w < 0 || h < 0 {
        return None;
    }
    Some(Rectangle::new(Point::from((x, y)), Size::from((w, h))))
}

/// Shrink `usable` by a surface's exclusive reservation. A surface carves
/// space off an edge when it is anchored to that edge and to both edges
/// perpendicular to it; a single-edge anchor reserves nothing.
fn apply_exclusive(usable: &mut Rectangle<i32, Logical>, attrs: &LayerAttrs) {
    if attrs.exclusive_zone <= 0 {
        return;
    }
    let zone = attrs.exclusive_zone;
    let m = attrs.margins;

    struct Edge {
        with_sides: Anchor,
        margin: i32,
        // applied to usable.loc and usable.size on a match
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
    }
    let edges = [
        Edge {
            with_sides: Anchor::TOP.union(Anchor::BOTH_HORIZ),
            margin: m.top,
            dx: 0,
            dy: 1,
            dw: 0,
            dh: -1,
        },
        Edge {
            with_sides: Anchor::BOTTOM.union(Anchor::BOTH_HORIZ),
            margin: m.bottom,
            dx: 0,
            dy: 0,
            dw: 0,
            dh: -1,
        },
        Edge {
            with_sides: Anchor::LEFT.union(Anchor::BOTH_VERT),
            margin: m.left,
            dx: 1,
            dy: 0,
            dw: -1,
            dh: 0,
        },
        Edge {
            with_sides: Anchor::RIGHT.union(Anchor::BOTH_VERT),
            margin: m.right,
            dx: 0,
            dy: 0,
            dw: -1,
            dh: 0,
        },
    ];
    for edge in &edges {
        if attrs.anchor.contains(edge.with_sides) {
            let claim = zone + edge.margin;
            usable.loc.x += edge.dx * claim;
            usable.loc.y += edge.dy * claim;
            usable.size.w += edge.dw * claim;
            usable.size.h += edge.dh * claim;
        }
    }
}

fn arrange_layer(
    output: &mut Output,
    layers: &mut LayerMap,
    layer: ShellLayer,
    full: Rectangle<i32, Logical>,
    usable: &mut Rectangle<i32, Logical>,
    exclusive_pass: bool,
) {
    let mut rejected = Vec::new();
    for &id in output.bucket(layer) {
        let Some(surface) = layers.get_mut(id) else {
            continue;
        };
        if exclusive_pass != (surface.attrs.exclusive_zone > 0) {
            continue;
        }
        let bounds = if surface.attrs.exclusive_zone == -1 {
            full
        } else {
            *usable
        };
        match layer_surface_box(&surface.attrs, bounds) {
            Some(geo) => {
                surface.geo = geo;
                apply_exclusive(usable, &surface.attrs);
                surface.handle.configure(geo.size);
            }
            None => {
                tracing::warn!(?id, "layer surface has negative extent, closing");
                surface.handle.close();
                rejected.push(id);
            }
        }
    }
    for id in rejected {
        output.layers[layer.index()].retain(|l| *l != id);
        layers.remove(id);
    }
}

/// Re-run the full arrange pipeline for one output and return the usable
/// area left over after exclusive reservations.
pub fn arrange_output(output: &mut Output, layers: &mut LayerMap) -> Rectangle<i32, Logical> {
    let full = output.local_rect();
    let mut usable = full;

    for exclusive_pass in [true, false] {
        for layer in ShellLayer::PRECEDENCE {
            arrange_layer(output, layers, layer, full, &mut usable, exclusive_pass);
        }
    }

    output.topmost_interactive = [ShellLayer::Overlay, ShellLayer::Top]
        .into_iter()
        .find_map(|layer| {
            output
                .bucket(layer)
                .iter()
                .rev()
                .copied()
                .find(|id| {
                    layers
                        .get(*id)
                        .is_some_and(|s| s.attrs.keyboard_interactive)
                })
        });

    tracing::debug!(output = %output.name, ?usable, "arranged layer surfaces");
    usable
}
