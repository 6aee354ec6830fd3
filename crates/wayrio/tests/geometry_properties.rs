//! Property tests for the drag geometry engine.

use proptest::prelude::*;
use smithay::utils::{Point, Size};
use wayrio::geometry::{
    self, Area, CanonCache, MIN_HEIGHT, MIN_WIDTH,
};

fn any_border_area() -> impl Strategy<Value = Area> {
    prop::sample::select(Area::BORDERS.to_vec())
}

proptest! {
    /// A drag rectangle never falls below the minimum extent, wherever
    /// the cursor goes.
    #[test]
    fn candidate_box_meets_minimum(
        area in any_border_area(),
        ox in -500i32..2000,
        oy in -500i32..2000,
        w in MIN_WIDTH..1500,
        h in MIN_HEIGHT..1500,
        cx in -1000i32..3000,
        cy in -1000i32..3000,
    ) {
        let rect = geometry::candidate_box(
            area,
            Point::from((ox, oy)),
            Size::from((w, h)),
            Point::from((cx, cy)),
        );
        prop_assert!(rect.size.w >= MIN_WIDTH);
        prop_assert!(rect.size.h >= MIN_HEIGHT);
    }

    /// Edges not involved in the drag keep the view's original extent.
    #[test]
    fn uninvolved_axis_is_untouched(
        ox in 0i32..1000,
        oy in 0i32..1000,
        w in MIN_WIDTH..1000,
        h in MIN_HEIGHT..1000,
        cx in -1000i32..3000,
        cy in -1000i32..3000,
    ) {
        let origin = Point::from((ox, oy));
        let size = Size::from((w, h));
        let cursor = Point::from((cx, cy));

        // vertical edge drags leave the y extent alone
        for area in [Area::Left, Area::Right] {
            let rect = geometry::candidate_box(area, origin, size, cursor);
            prop_assert_eq!(rect.loc.y, oy);
            prop_assert_eq!(rect.size.h, h);
        }
        // horizontal edge drags leave the x extent alone
        for area in [Area::Top, Area::Bottom] {
            let rect = geometry::candidate_box(area, origin, size, cursor);
            prop_assert_eq!(rect.loc.x, ox);
            prop_assert_eq!(rect.size.w, w);
        }
    }

    /// A new-window sweep normalizes to the same rectangle regardless of
    /// drag direction.
    #[test]
    fn sweep_direction_does_not_matter(
        ax in -500i32..2000,
        ay in -500i32..2000,
        bx in -500i32..2000,
        by in -500i32..2000,
    ) {
        let a = Point::from((ax, ay));
        let b = Point::from((bx, by));
        prop_assert_eq!(geometry::new_view_box(a, b), geometry::new_view_box(b, a));
        prop_assert_eq!(geometry::sweep_extent(a, b), geometry::sweep_extent(b, a));
    }

    /// Replaying a box through the memo is idempotent: a box that meets
    /// the minimum always comes back unchanged.
    #[test]
    fn canon_is_idempotent_for_valid_boxes(
        area in any_border_area(),
        ox in 0i32..1000,
        oy in 0i32..1000,
        w in MIN_WIDTH..1000,
        h in MIN_HEIGHT..1000,
        cx in -1000i32..3000,
        cy in -1000i32..3000,
    ) {
        let rect = geometry::candidate_box(
            area,
            Point::from((ox, oy)),
            Size::from((w, h)),
            Point::from((cx, cy)),
        );
        let mut cache = CanonCache::default();
        let first = cache.canon(rect);
        prop_assert_eq!(first, rect);
        prop_assert_eq!(cache.canon(first), rect);
    }
}
