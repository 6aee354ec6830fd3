//! Drag and hit-test geometry
//!
//! Pure functions for the gesture engine: classifying where on a window's
//! border the pointer sits, and turning a grab origin plus the live cursor
//! into the rectangle an in-progress drag implies.
//!
//! # Design Contract
//!
//! - All functions are **pure** - no side effects, no state mutation
//! - Deterministic - same inputs always produce same outputs
//! - [`candidate_box`] never yields an extent below the 100x100 minimum,
//!   so a preview built from it is never degenerate
//!
//! # NOT Responsible For
//!
//! - Gesture sequencing (see `input.rs`)
//! - Scanning the view stack (see `view.rs` - `hit_test` lives there)

use smithay::utils::{Logical, Point, Rectangle, Size};

/// Width of the server-side window border, in layout units.
pub const WINDOW_BORDER: i32 = 5;

/// Minimum window width accepted by any interactive gesture.
pub const MIN_WIDTH: i32 = 100;

/// Minimum window height accepted by any interactive gesture.
pub const MIN_HEIGHT: i32 = 100;

/// Distance from a border-box edge that still counts as that edge.
const EDGE_BAND: i32 = 20;

/// Where on a view the pointer landed.
///
/// The nine zones form a 3x3 grid over the bordered rectangle: four corners,
/// four edge middles, and the center. The center carries the same meaning as
/// a direct content hit and never starts a border drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    TopLeft,
    Top,
    TopRight,
    Left,
    Surface,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Area {
    /// The eight border zones, in grid order.
    pub const BORDERS: [Area; 8] = [
        Area::TopLeft,
        Area::Top,
        Area::TopRight,
        Area::Left,
        Area::Right,
        Area::BottomLeft,
        Area::Bottom,
        Area::BottomRight,
    ];

    fn from_grid(col: usize, row: usize) -> Area {
        match 3 * row + col {
            0 => Area::TopLeft,
            1 => Area::Top,
            2 => Area::TopRight,
            3 => Area::Left,
            4 => Area::Surface,
            5 => Area::Right,
            6 => Area::BottomLeft,
            7 => Area::Bottom,
            _ => Area::BottomRight,
        }
    }
}

/// 1-D classifier: 0 within [`EDGE_BAND`] of the near edge, 2 within it of
/// the far edge, 1 otherwise.
fn band(v: i32, lo: i32, extent: i32) -> usize {
    let v = v - lo;
    if v < EDGE_BAND {
        0
    } else if v > extent - EDGE_BAND {
        2
    } else {
        1
    }
}

/// Classify a point against a view's bordered rectangle.
///
/// The caller has already established the point lies inside `border_box`
/// (and outside the actual surface content).
pub fn classify(border_box: Rectangle<i32, Logical>, point: Point<f64, Logical>) -> Area {
    let col = band(point.x as i32, border_box.loc.x, border_box.size.w);
    let row = band(point.y as i32, border_box.loc.y, border_box.size.h);
    Area::from_grid(col, row)
}

/// Which edge of an axis tracks the cursor during a drag on `area`.
#[derive(Debug, Clone, Copy)]
enum Follow {
    /// The low (left/top) edge follows the cursor.
    Low,
    /// The high (right/bottom) edge follows the cursor.
    High,
    /// Both edges stay at the view's original extent.
    Neither,
}

fn follow_x(area: Area) -> Follow {
    match area {
        Area::TopLeft | Area::Left | Area::BottomLeft => Follow::Low,
        Area::TopRight | Area::Right | Area::BottomRight => Follow::High,
        Area::Top | Area::Bottom | Area::Surface => Follow::Neither,
    }
}

fn follow_y(area: Area) -> Follow {
    match area {
        Area::TopLeft | Area::Top | Area::TopRight => Follow::Low,
        Area::BottomLeft | Area::Bottom | Area::BottomRight => Follow::High,
        Area::Left | Area::Right | Area::Surface => Follow::Neither,
    }
}

/// Resolve one axis of a drag: the anchored edge pair is `anchor_lo..anchor_hi`
/// (the view's original extent), and the following edge tracks `cursor`.
///
/// When the following edge crosses its anchored counterpart the pair is
/// swapped and re-anchored two border widths past the crossed edge, so the
/// extent degrades toward zero instead of going negative - the drag handle
/// flips to the opposite corner.
fn resolve_axis(follow: Follow, anchor_lo: i32, anchor_hi: i32, cursor: i32) -> (i32, i32) {
    match follow {
        Follow::Neither => (anchor_lo, anchor_hi),
        Follow::Low => {
            if anchor_hi < cursor {
                (anchor_hi + WINDOW_BORDER * 2, cursor)
            } else {
                (cursor, anchor_hi)
            }
        }
        Follow::High => {
            if cursor < anchor_lo {
                (cursor, anchor_lo - WINDOW_BORDER * 2)
            } else {
                (anchor_lo, cursor)
            }
        }
    }
}

/// Enforce the minimum extent on a resolved axis.
///
/// The edge carrying the cursor stays where the cursor put it; the opposite
/// edge is pushed outward by the shortfall.
fn clamp_axis(lo: i32, hi: i32, follow: Follow, min: i32) -> (i32, i32) {
    if hi - lo >= min {
        (lo, hi)
    } else {
        match follow {
            Follow::High => (hi - min, hi),
            Follow::Low | Follow::Neither => (lo, lo + min),
        }
    }
}

fn resolve(
    area: Area,
    origin: Point<i32, Logical>,
    size: Size<i32, Logical>,
    cursor: Point<i32, Logical>,
) -> ((i32, i32), (i32, i32)) {
    let x = resolve_axis(follow_x(area), origin.x, origin.x + size.w, cursor.x);
    let y = resolve_axis(follow_y(area), origin.y, origin.y + size.h, cursor.y);
    (x, y)
}

/// Raw width/height implied by a drag, before the minimum-size clamp.
///
/// Either value may be below the minimum (or negative inside the flip
/// window); commit paths that abort on under-sized geometry check this.
pub fn drag_extent(
    area: Area,
    origin: Point<i32, Logical>,
    size: Size<i32, Logical>,
    cursor: Point<i32, Logical>,
) -> (i32, i32) {
    let ((x1, x2), (y1, y2)) = resolve(area, origin, size, cursor);
    (x2 - x1, y2 - y1)
}

/// The rectangle an in-progress drag implies.
///
/// `origin` is the view's top-left for border drags, or the first-click
/// point for a two-click resize sweep; `size` is the view's current content
/// size. The result always satisfies the minimum extent.
pub fn candidate_box(
    area: Area,
    origin: Point<i32, Logical>,
    size: Size<i32, Logical>,
    cursor: Point<i32, Logical>,
) -> Rectangle<i32, Logical> {
    debug_assert!(area != Area::Surface, "surface hits never start a drag");
    let ((x1, x2), (y1, y2)) = resolve(area, origin, size, cursor);
    let (x1, x2) = clamp_axis(x1, x2, follow_x(area), MIN_WIDTH);
    let (y1, y2) = clamp_axis(y1, y2, follow_y(area), MIN_HEIGHT);
    Rectangle::new(Point::from((x1, y1)), Size::from((x2 - x1, y2 - y1)))
}

/// Raw width/height of a new-window sweep, before the minimum clamp.
pub fn sweep_extent(start: Point<i32, Logical>, cursor: Point<i32, Logical>) -> (i32, i32) {
    ((start.x - cursor.x).abs(), (start.y - cursor.y).abs())
}

/// Normalize a new-window sweep into a non-negative rectangle.
///
/// No prior anchor exists, so the axes simply swap; width and height are
/// clamped up to the minimum for preview purposes.
pub fn new_view_box(
    start: Point<i32, Logical>,
    cursor: Point<i32, Logical>,
) -> Rectangle<i32, Logical> {
    let x = start.x.min(cursor.x);
    let y = start.y.min(cursor.y);
    let (w, h) = sweep_extent(start, cursor);
    Rectangle::new(
        Point::from((x, y)),
        Size::from((w.max(MIN_WIDTH), h.max(MIN_HEIGHT))),
    )
}

/// Does a raw extent satisfy the interactive minimum?
pub fn meets_minimum(width: i32, height: i32) -> bool {
    width >= MIN_WIDTH && height >= MIN_HEIGHT
}

/// Single-slot memo of the last box that satisfied the minimum extent.
///
/// One slot suffices: only one gesture is ever active at a time.
#[derive(Debug, Default)]
pub struct CanonCache {
    last: Option<Rectangle<i32, Logical>>,
}

impl CanonCache {
    /// Return `rect` unchanged if it meets the minimum, else the last box
    /// that did.
    pub fn canon(&mut self, rect: Rectangle<i32, Logical>) -> Rectangle<i32, Logical> {
        if meets_minimum(rect.size.w, rect.size.h) {
            self.last = Some(rect);
            rect
        } else {
            self.last.unwrap_or(rect)
        }
    }

    /// Drop the memo when a gesture ends.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> Point<i32, Logical> {
        Point::from((x, y))
    }

    fn sz(w: i32, h: i32) -> Size<i32, Logical> {
        Size::from((w, h))
    }

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new(pt(x, y), sz(w, h))
    }

    fn fpt(x: f64, y: f64) -> Point<f64, Logical> {
        Point::from((x, y))
    }

    #[test]
    fn classify_all_nine_zones() {
        // 300x300 border box at (100, 100): bands are 20 wide
        let b = rect(100, 100, 300, 300);
        assert_eq!(classify(b, fpt(105.0, 105.0)), Area::TopLeft);
        assert_eq!(classify(b, fpt(250.0, 105.0)), Area::Top);
        assert_eq!(classify(b, fpt(395.0, 105.0)), Area::TopRight);
        assert_eq!(classify(b, fpt(105.0, 250.0)), Area::Left);
        assert_eq!(classify(b, fpt(250.0, 250.0)), Area::Surface);
        assert_eq!(classify(b, fpt(395.0, 250.0)), Area::Right);
        assert_eq!(classify(b, fpt(105.0, 395.0)), Area::BottomLeft);
        assert_eq!(classify(b, fpt(250.0, 395.0)), Area::Bottom);
        assert_eq!(classify(b, fpt(395.0, 395.0)), Area::BottomRight);
    }

    #[test]
    fn classify_band_boundaries() {
        let b = rect(0, 0, 100, 100);
        // 19 is inside the near band, 20 is not
        assert_eq!(classify(b, fpt(19.0, 50.0)), Area::Left);
        assert_eq!(classify(b, fpt(20.0, 50.0)), Area::Surface);
        // 81 is inside the far band (v > extent - 20), 80 is not
        assert_eq!(classify(b, fpt(81.0, 50.0)), Area::Right);
        assert_eq!(classify(b, fpt(80.0, 50.0)), Area::Surface);
    }

    #[test]
    fn top_left_drag_pins_bottom_right() {
        // View at (100,100) size 200x150, cursor pulls the top-left corner
        // out to (90,80): bottom-right stays pinned at (300,250).
        let b = candidate_box(Area::TopLeft, pt(100, 100), sz(200, 150), pt(90, 80));
        assert_eq!(b, rect(90, 80, 210, 170));
    }

    #[test]
    fn bottom_right_sweep_from_origin() {
        let b = candidate_box(Area::BottomRight, pt(10, 20), sz(200, 150), pt(400, 300));
        assert_eq!(b, rect(10, 20, 390, 280));
    }

    #[test]
    fn zero_extent_sweep_clamps_to_minimum() {
        // cursor == grab origin: the cursor edge stays, the anchor is pushed
        let c = pt(150, 150);
        let b = candidate_box(Area::BottomRight, c, sz(200, 150), c);
        assert_eq!(b.size.w, MIN_WIDTH);
        assert_eq!(b.size.h, MIN_HEIGHT);
        // bottom-right corner pinned under the cursor
        assert_eq!(b.loc.x + b.size.w, 150);
        assert_eq!(b.loc.y + b.size.h, 150);
    }

    #[test]
    fn right_edge_drag_flips_past_left_edge() {
        // View at x=200 width 200; dragging the right edge to x=50 crosses
        // the left edge: the pair swaps and re-anchors at 200 - 2*border.
        let b = candidate_box(Area::Right, pt(200, 100), sz(200, 200), pt(50, 200));
        assert_eq!(b.loc.x, 50);
        assert_eq!(b.loc.x + b.size.w, 200 - WINDOW_BORDER * 2);
        // y axis untouched by a pure horizontal drag
        assert_eq!(b.loc.y, 100);
        assert_eq!(b.size.h, 200);
    }

    #[test]
    fn bottom_drag_flips_past_top_edge() {
        let (w, h) = drag_extent(Area::Bottom, pt(100, 300), sz(200, 200), pt(150, 100));
        assert_eq!(w, 200);
        // flipped: extent from cursor (100) up to 300 - 2*border
        assert_eq!(h, 300 - WINDOW_BORDER * 2 - 100);
    }

    #[test]
    fn candidate_box_meets_minimum_for_every_border_area() {
        let origin = pt(100, 100);
        let size = sz(200, 150);
        let cursors = [
            pt(100, 100),
            pt(0, 0),
            pt(500, 500),
            pt(100, 500),
            pt(500, 100),
            pt(103, 98),
            pt(301, 251),
        ];
        for area in Area::BORDERS {
            for cursor in cursors {
                let b = candidate_box(area, origin, size, cursor);
                assert!(
                    b.size.w >= MIN_WIDTH && b.size.h >= MIN_HEIGHT,
                    "{area:?} at {cursor:?} gave {b:?}"
                );
            }
        }
    }

    #[test]
    fn drag_extent_reports_undersized_geometry() {
        // A two-unit sweep is below the minimum; commit paths abort on this.
        let (w, h) = drag_extent(Area::BottomRight, pt(100, 100), sz(200, 150), pt(102, 102));
        assert!(!meets_minimum(w, h));
    }

    #[test]
    fn new_view_box_normalizes_inverted_sweep() {
        let b = new_view_box(pt(400, 300), pt(100, 50));
        assert_eq!(b, rect(100, 50, 300, 250));
    }

    #[test]
    fn new_view_box_clamps_up_to_minimum() {
        let b = new_view_box(pt(100, 100), pt(110, 104));
        assert_eq!(b.loc, pt(100, 100));
        assert_eq!(b.size, sz(MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn canon_is_identity_on_valid_boxes() {
        let mut cache = CanonCache::default();
        let b = rect(10, 10, 150, 150);
        assert_eq!(cache.canon(b), b);
        assert_eq!(cache.canon(b), b);
    }

    #[test]
    fn canon_holds_last_valid_box() {
        let mut cache = CanonCache::default();
        let good = rect(10, 10, 150, 150);
        let bad = rect(10, 10, 30, 150);
        assert_eq!(cache.canon(good), good);
        assert_eq!(cache.canon(bad), good);
        // a new valid box replaces the memo
        let good2 = rect(0, 0, 200, 200);
        assert_eq!(cache.canon(good2), good2);
        assert_eq!(cache.canon(bad), good2);
    }
}
