//! Cursor glyph policy
//!
//! Every (gesture, hovered-area) pair maps deterministically to a stock
//! xcursor glyph. The external input backend applies the name to its cursor
//! theme; during a border drag the glyph is pinned to the grabbed corner.

use crate::geometry::Area;
use crate::input::Gesture;

/// Stock pointer glyphs, by xcursor name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    /// Pick-a-window hand shown during the *_SELECT states.
    Hand,
    Grabbing,
    TopLeftCorner,
    TopSide,
    TopRightCorner,
    LeftSide,
    RightSide,
    BottomLeftCorner,
    BottomSide,
    BottomRightCorner,
}

impl CursorIcon {
    /// The xcursor theme name for this glyph.
    pub fn name(self) -> &'static str {
        match self {
            CursorIcon::Default => "left_ptr",
            CursorIcon::Hand => "hand1",
            CursorIcon::Grabbing => "grabbing",
            CursorIcon::TopLeftCorner => "top_left_corner",
            CursorIcon::TopSide => "top_side",
            CursorIcon::TopRightCorner => "top_right_corner",
            CursorIcon::LeftSide => "left_side",
            CursorIcon::RightSide => "right_side",
            CursorIcon::BottomLeftCorner => "bottom_left_corner",
            CursorIcon::BottomSide => "bottom_side",
            CursorIcon::BottomRightCorner => "bottom_right_corner",
        }
    }
}

impl Area {
    /// The resize glyph for a border zone.
    pub fn glyph(self) -> CursorIcon {
        match self {
            Area::TopLeft => CursorIcon::TopLeftCorner,
            Area::Top => CursorIcon::TopSide,
            Area::TopRight => CursorIcon::TopRightCorner,
            Area::Left => CursorIcon::LeftSide,
            Area::Surface => CursorIcon::Default,
            Area::Right => CursorIcon::RightSide,
            Area::BottomLeft => CursorIcon::BottomLeftCorner,
            Area::Bottom => CursorIcon::BottomSide,
            Area::BottomRight => CursorIcon::BottomRightCorner,
        }
    }
}

/// The glyph implied by the current gesture and, in the idle state, the
/// border zone under the pointer.
pub fn glyph_for(gesture: &Gesture, hovered: Option<Area>) -> CursorIcon {
    match gesture {
        Gesture::MoveSelect
        | Gesture::ResizeSelect
        | Gesture::DeleteSelect
        | Gesture::HideSelect => CursorIcon::Hand,
        Gesture::Move { .. } => CursorIcon::Grabbing,
        Gesture::BorderDrag { area, .. } => area.glyph(),
        Gesture::NewStart | Gesture::ResizeStart { .. } => CursorIcon::TopLeftCorner,
        Gesture::NewEnd { .. } | Gesture::ResizeEnd { .. } => CursorIcon::Grabbing,
        Gesture::None => hovered.map(Area::glyph).unwrap_or_default(),
        Gesture::Menu => CursorIcon::Default,
    }
}
