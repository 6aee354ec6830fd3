//! The modal interaction state machine
//!
//! Every pointer and keyboard event funnels through the current
//! [`Gesture`]. In the idle state events route to clients; once a gesture
//! begins the pointer is detached from clients and each button event
//! advances the gesture until it commits or is cancelled. Handlers mutate
//! core state directly and return [`SeatRequest`]s for the protocol layer
//! to execute.

use smithay::utils::{Logical, Point};

use crate::cursor::{self, CursorIcon};
use crate::geometry::{self, Area};
use crate::menu::MenuAction;
use crate::spawn;
use crate::state::{PendingView, Wayrio};
use crate::view::{Hit, ViewId};

/// evdev code for the left mouse button.
pub const BTN_LEFT: u32 = 0x110;

/// evdev code for the right mouse button.
pub const BTN_RIGHT: u32 = 0x111;

/// xkb keysym for Escape.
pub const KEY_ESCAPE: u32 = 0xff1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// The modal interaction state. Variants carry exactly the data their
/// stage needs, so stale grabs cannot outlive the gesture they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Idle; events route to clients.
    None,
    /// The action menu is open.
    Menu,
    /// "New" chosen; waiting for the first corner of the sweep.
    NewStart,
    /// Sweeping out a new window from `origin`.
    NewEnd { origin: Point<i32, Logical> },
    /// "Move" chosen; waiting for a window pick.
    MoveSelect,
    /// Carrying a window; `grab` is the cursor offset inside it.
    Move {
        view: ViewId,
        grab: Point<i32, Logical>,
    },
    /// "Resize" chosen; waiting for a window pick.
    ResizeSelect,
    /// Window picked; waiting for the first corner of the resize sweep.
    ResizeStart { view: ViewId },
    /// Sweeping out the new size from `origin`.
    ResizeEnd {
        view: ViewId,
        origin: Point<i32, Logical>,
    },
    /// Dragging a border zone; `origin` is the view's top-left at grab time.
    BorderDrag {
        view: ViewId,
        area: Area,
        origin: Point<i32, Logical>,
    },
    /// "Delete" chosen; waiting for a window pick.
    DeleteSelect,
    /// Reserved for window hiding; picks fall through to idle.
    HideSelect,
}

impl Gesture {
    /// The view a gesture holds a grab on, if any.
    pub fn grabbed_view(&self) -> Option<ViewId> {
        match *self {
            Gesture::Move { view, .. }
            | Gesture::ResizeStart { view }
            | Gesture::ResizeEnd { view, .. }
            | Gesture::BorderDrag { view, .. } => Some(view),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::None)
    }
}

/// Side effects for the protocol layer: everything the core wants done to
/// the seat but cannot do itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatRequest {
    /// Move pointer focus to a view's surface (enter if needed, then
    /// motion) at the given surface-local position.
    PointerFocus {
        view: ViewId,
        local: Point<f64, Logical>,
    },
    ClearPointerFocus,
    /// Deliver a button event to the focused surface.
    ForwardButton { button: u32, state: ButtonState },
    /// Deliver an axis event to the focused surface.
    ForwardAxis { horizontal: f64, vertical: f64 },
    /// Deliver a frame (event-batch boundary) to the focused surface.
    ForwardFrame,
    /// Move keyboard focus to a view's surface.
    KeyboardEnter { view: ViewId },
}

impl Wayrio {
    /// Pointer motion in layout space.
    pub fn pointer_moved(&mut self, position: Point<f64, Logical>) -> Vec<SeatRequest> {
        self.cursor = position;
        match self.gesture {
            Gesture::None => match self.views.hit_test(position) {
                Some(Hit::Content { view, local }) => {
                    self.cursor_icon = CursorIcon::Default;
                    vec![SeatRequest::PointerFocus { view, local }]
                }
                Some(Hit::Border { area, .. }) => {
                    self.cursor_icon = area.glyph();
                    vec![SeatRequest::ClearPointerFocus]
                }
                None => {
                    self.cursor_icon = CursorIcon::Default;
                    vec![SeatRequest::ClearPointerFocus]
                }
            },
            // selection is recomputed from the cursor at query time
            Gesture::Menu => Vec::new(),
            _ => {
                self.cursor_icon = cursor::glyph_for(&self.gesture, None);
                Vec::new()
            }
        }
    }

    /// A button event; the heart of the modal scheme. In the idle state
    /// buttons route to clients or begin direct manipulation; in every
    /// other state they advance the active gesture.
    pub fn pointer_button(&mut self, button: u32, state: ButtonState) -> Vec<SeatRequest> {
        let cursor = self.cursor;
        let cursor_i = self.cursor_i32();
        let mut reqs = Vec::new();
        match self.gesture {
            Gesture::None => match self.views.hit_test(cursor) {
                Some(Hit::Content { view, .. })
                | Some(Hit::Border {
                    view,
                    area: Area::Surface,
                }) => {
                    reqs.extend(self.focus_view(view));
                    reqs.push(SeatRequest::ForwardButton { button, state });
                }
                Some(Hit::Border { view, area }) => {
                    reqs.extend(self.focus_view(view));
                    if state == ButtonState::Pressed {
                        let Some(position) = self.views.get(view).and_then(|v| v.position)
                        else {
                            return reqs;
                        };
                        if button == BTN_RIGHT {
                            let grab = Point::from((
                                cursor_i.x - position.x,
                                cursor_i.y - position.y,
                            ));
                            self.gesture = Gesture::Move { view, grab };
                            self.cursor_icon = CursorIcon::Grabbing;
                            tracing::debug!(?view, ?grab, "direct move grab");
                        } else {
                            self.gesture = Gesture::BorderDrag {
                                view,
                                area,
                                origin: position,
                            };
                            self.cursor_icon = area.glyph();
                            tracing::debug!(?view, ?area, "border drag");
                        }
                        reqs.push(SeatRequest::ClearPointerFocus);
                    }
                }
                None => {
                    if state == ButtonState::Pressed && button == BTN_RIGHT {
                        self.menu.open_at(cursor_i);
                        self.gesture = Gesture::Menu;
                        self.cursor_icon = CursorIcon::Default;
                        reqs.push(SeatRequest::ClearPointerFocus);
                    }
                }
            },
            Gesture::Menu => self.menu_button(state),
            Gesture::NewStart => {
                if state == ButtonState::Pressed {
                    self.gesture = Gesture::NewEnd { origin: cursor_i };
                }
            }
            Gesture::NewEnd { origin } => {
                self.commit_new_view(origin, cursor_i);
                self.end_gesture();
            }
            Gesture::MoveSelect => {
                if state == ButtonState::Pressed {
                    match self.pick_view(cursor) {
                        Some((view, position)) => {
                            let grab = Point::from((
                                cursor_i.x - position.x,
                                cursor_i.y - position.y,
                            ));
                            self.gesture = Gesture::Move { view, grab };
                            self.cursor_icon = CursorIcon::Grabbing;
                        }
                        None => self.end_gesture(),
                    }
                }
            }
            Gesture::Move { view, grab } => {
                let position =
                    Point::from((cursor_i.x - grab.x, cursor_i.y - grab.y));
                if let Some(v) = self.views.get_mut(view) {
                    v.position = Some(position);
                }
                self.end_gesture();
            }
            Gesture::ResizeSelect => {
                if state == ButtonState::Pressed {
                    match self.pick_view(cursor) {
                        Some((view, _)) => {
                            self.gesture = Gesture::ResizeStart { view };
                            self.cursor_icon = CursorIcon::Grabbing;
                        }
                        None => self.end_gesture(),
                    }
                }
            }
            Gesture::ResizeStart { view } => {
                if state == ButtonState::Pressed {
                    // the sweep always grows from its first corner
                    if let Some(v) = self.views.get_mut(view) {
                        v.area = Area::BottomRight;
                    }
                    self.gesture = Gesture::ResizeEnd {
                        view,
                        origin: cursor_i,
                    };
                }
            }
            Gesture::ResizeEnd { view, origin } => {
                if let Some(size) = self.views.get(view).map(|v| v.content.current_size()) {
                    let (w, h) =
                        geometry::drag_extent(Area::BottomRight, origin, size, cursor_i);
                    if geometry::meets_minimum(w, h) {
                        let rect =
                            geometry::candidate_box(Area::BottomRight, origin, size, cursor_i);
                        self.apply_box(view, rect);
                    } else {
                        tracing::debug!(w, h, "resize sweep below minimum, aborting");
                    }
                }
                self.end_gesture();
            }
            Gesture::BorderDrag { view, area, origin } => {
                if let Some(size) = self.views.get(view).map(|v| v.content.current_size()) {
                    let rect = self
                        .canon
                        .canon(geometry::candidate_box(area, origin, size, cursor_i));
                    self.apply_box(view, rect);
                }
                self.end_gesture();
            }
            Gesture::DeleteSelect => {
                if state == ButtonState::Pressed {
                    if let Some(hit) = self.views.hit_test(cursor) {
                        if let Some(view) = self.views.get(hit.view()) {
                            view.content.request_close();
                        }
                    }
                    self.end_gesture();
                }
            }
            Gesture::HideSelect => {
                if state == ButtonState::Pressed {
                    self.end_gesture();
                }
            }
        }
        reqs
    }

    /// Axis events always route to the focused surface.
    pub fn pointer_axis(&mut self, horizontal: f64, vertical: f64) -> Vec<SeatRequest> {
        vec![SeatRequest::ForwardAxis {
            horizontal,
            vertical,
        }]
    }

    /// Frame events mark batch boundaries and always pass through.
    pub fn pointer_frame(&mut self) -> Vec<SeatRequest> {
        vec![SeatRequest::ForwardFrame]
    }

    /// A key press; returns true when the core consumed it. Escape cancels
    /// any in-flight gesture without touching window geometry.
    pub fn key_pressed(&mut self, keysym: u32) -> bool {
        if keysym == KEY_ESCAPE && !matches!(self.gesture, Gesture::None | Gesture::Menu) {
            tracing::debug!(gesture = ?self.gesture, "escape cancels gesture");
            self.end_gesture();
            return true;
        }
        false
    }

    /// Resolve a *_SELECT pick under the cursor to a placed view.
    fn pick_view(
        &mut self,
        cursor: Point<f64, Logical>,
    ) -> Option<(ViewId, Point<i32, Logical>)> {
        let hit = self.views.hit_test(cursor)?;
        let position = self.views.get(hit.view())?.position?;
        Some((hit.view(), position))
    }

    fn menu_button(&mut self, state: ButtonState) {
        if self.menu.contains(self.cursor) {
            // commits whichever entry is under the cursor right now, on
            // press or release alike
            let action = self.menu.action_at(self.cursor);
            self.menu.close();
            match action {
                Some(MenuAction::New) => {
                    self.gesture = Gesture::NewStart;
                    self.cursor_icon = cursor::glyph_for(&self.gesture, None);
                }
                Some(MenuAction::Resize) => {
                    self.gesture = Gesture::ResizeSelect;
                    self.cursor_icon = CursorIcon::Hand;
                }
                Some(MenuAction::Move) => {
                    self.gesture = Gesture::MoveSelect;
                    self.cursor_icon = CursorIcon::Hand;
                }
                Some(MenuAction::Delete) => {
                    self.gesture = Gesture::DeleteSelect;
                    self.cursor_icon = CursorIcon::Hand;
                }
                // hiding is not implemented; the pick dissolves
                Some(MenuAction::Hide) | None => self.end_gesture(),
            }
            if let Some(action) = action {
                tracing::debug!(?action, "menu action chosen");
            }
        } else if state == ButtonState::Pressed {
            self.menu.close();
            self.end_gesture();
        }
    }

    /// Commit a completed new-window sweep: reserve the rectangle and
    /// spawn the helper that will populate it.
    fn commit_new_view(&mut self, origin: Point<i32, Logical>, cursor: Point<i32, Logical>) {
        let (w, h) = geometry::sweep_extent(origin, cursor);
        if !geometry::meets_minimum(w, h) {
            tracing::debug!(w, h, "new-window sweep below minimum, aborting");
            return;
        }
        let rect = geometry::new_view_box(origin, cursor);
        let command = self.config.new_window_command();
        match spawn::spawn_command(&command) {
            Ok(pid) => {
                tracing::info!(pid, ?rect, "spawned helper for new window");
                self.push_pending(PendingView { pid, rect });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn helper, abandoning new window");
            }
        }
    }
}
