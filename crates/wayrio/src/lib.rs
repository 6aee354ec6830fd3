//! wayrio compositor core
//!
//! The interactive heart of a rio-style Wayland window manager: a modal
//! gesture state machine, the hit-test and drag geometry it consumes, a
//! right-click action menu, and the layer-shell arrange engine for anchored
//! panels and bars.
//!
//! The display-server toolkit (renderer, wire protocol, input drivers) is an
//! external collaborator. It feeds events into [`state::Wayrio`] through the
//! per-entity event enums and acts on the [`input::SeatRequest`] values the
//! handlers return; the renderer reads the frame snapshot in [`frame`].

pub mod config;
pub mod cursor;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod layers;
pub mod logging;
pub mod menu;
pub mod output;
pub mod spawn;
pub mod state;
pub mod view;
