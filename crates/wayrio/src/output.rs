//! Output registry
//!
//! Per-output state: position in the shared layout space, effective
//! resolution, and the four ordered layer-surface buckets the arrange
//! engine works over. Outputs are keyed by stable handles; views and layer
//! surfaces refer to them without owning them.

use std::collections::HashMap;

use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::config::Config;
use crate::layers::{LayerId, ShellLayer};

/// Stable handle for an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputId(u32);

pub struct Output {
    pub name: String,
    /// Top-left corner in the shared output-layout space.
    pub position: Point<i32, Logical>,
    /// Effective resolution in layout units.
    pub resolution: Size<i32, Logical>,
    /// Integer scale factor from the config; the renderer applies it.
    pub scale: i32,
    /// Layer-surface buckets in arrival order, indexed by [`ShellLayer`].
    pub layers: [Vec<LayerId>; 4],
    /// Topmost keyboard-interactive layer surface, recomputed on arrange.
    /// Reserved for focus routing; nothing consumes it yet.
    pub topmost_interactive: Option<LayerId>,
}

impl Output {
    /// The output's rectangle in its own coordinate space (origin at 0,0);
    /// the arrange engine works in these coordinates.
    pub fn local_rect(&self) -> Rectangle<i32, Logical> {
        Rectangle::new(Point::from((0, 0)), self.resolution)
    }

    /// The output's rectangle in the shared layout space.
    pub fn layout_rect(&self) -> Rectangle<i32, Logical> {
        Rectangle::new(self.position, self.resolution)
    }

    pub fn bucket(&self, layer: ShellLayer) -> &[LayerId] {
        &self.layers[layer.index()]
    }
}

/// Lifecycle notifications for outputs. Arrival goes through
/// [`OutputRegistry::add`] since it must hand back the new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Resized { resolution: Size<i32, Logical> },
    Removed,
}

#[derive(Default)]
pub struct OutputRegistry {
    outputs: HashMap<OutputId, Output>,
    order: Vec<OutputId>,
    next: u32,
}

impl OutputRegistry {
    /// Register a new output. An explicit position from the config wins;
    /// otherwise the output is placed flush right of the existing layout.
    pub fn add(&mut self, name: &str, resolution: Size<i32, Logical>, config: &Config) -> OutputId {
        let position = match config.output(name).and_then(|c| c.position()) {
            Some(pos) => Point::from(pos),
            None => Point::from((self.right_edge(), 0)),
        };
        let resolution = config
            .output(name)
            .and_then(|c| c.mode())
            .map(Size::from)
            .unwrap_or(resolution);
        let scale = config.output(name).and_then(|c| c.scale).unwrap_or(1);

        let id = OutputId(self.next);
        self.next += 1;
        self.outputs.insert(
            id,
            Output {
                name: name.to_owned(),
                position,
                resolution,
                scale,
                layers: Default::default(),
                topmost_interactive: None,
            },
        );
        self.order.push(id);
        tracing::info!(name, ?position, ?resolution, "output added");
        id
    }

    fn right_edge(&self) -> i32 {
        self.order
            .iter()
            .filter_map(|id| self.outputs.get(id))
            .map(|o| o.position.x + o.resolution.w)
            .max()
            .unwrap_or(0)
    }

    pub fn get(&self, id: OutputId) -> Option<&Output> {
        self.outputs.get(&id)
    }

    pub fn get_mut(&mut self, id: OutputId) -> Option<&mut Output> {
        self.outputs.get_mut(&id)
    }

    pub fn remove(&mut self, id: OutputId) -> Option<Output> {
        self.order.retain(|o| *o != id);
        self.outputs.remove(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn first(&self) -> Option<OutputId> {
        self.order.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutputId, &Output)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.outputs.get(id).map(|o| (*id, o)))
    }

    /// The output whose layout rectangle contains `point`.
    pub fn output_at(&self, point: Point<f64, Logical>) -> Option<OutputId> {
        self.iter()
            .find(|(_, o)| o.layout_rect().to_f64().contains(point))
            .map(|(id, _)| id)
    }
}
