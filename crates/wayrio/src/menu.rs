//! The right-click action menu
//!
//! A single, non-nested popup with a fixed action list. The menu is open iff
//! it has an origin. Selection is never stored: it is recomputed from the
//! cursor position every time it is queried, so a click commits whichever
//! action is under the cursor *at click time*.

use smithay::utils::{Logical, Point, Rectangle, Size};

/// The fixed action list, rendered top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    New,
    Resize,
    Move,
    Delete,
    Hide,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::New,
        MenuAction::Resize,
        MenuAction::Move,
        MenuAction::Delete,
        MenuAction::Hide,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::New => "New",
            MenuAction::Resize => "Resize",
            MenuAction::Move => "Move",
            MenuAction::Delete => "Delete",
            MenuAction::Hide => "Hide",
        }
    }
}

/// Menu frame border, in layout units.
const BORDER: i32 = 3;

/// Vertical gap between entries, also the outer text margin.
const MARGIN: i32 = 4;

/// The global popup menu.
#[derive(Debug)]
pub struct Menu {
    /// Top-left corner; `Some` iff the menu is open.
    origin: Option<Point<i32, Logical>>,
    /// Label extents, updated by the renderer when it rasterizes the
    /// entries; geometry below derives from the last supplied values.
    label_sizes: [Size<i32, Logical>; 5],
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            origin: None,
            // Plausible extents for an unthemed renderer; replaced on the
            // first frame that measures real labels.
            label_sizes: [Size::from((48, 16)); 5],
        }
    }
}

impl Menu {
    pub fn is_open(&self) -> bool {
        self.origin.is_some()
    }

    pub fn open_at(&mut self, origin: Point<i32, Logical>) {
        self.origin = Some(origin);
    }

    pub fn close(&mut self) {
        self.origin = None;
    }

    pub fn origin(&self) -> Option<Point<i32, Logical>> {
        self.origin
    }

    /// Record measured label extents from the renderer.
    pub fn set_label_sizes(&mut self, sizes: [Size<i32, Logical>; 5]) {
        self.label_sizes = sizes;
    }

    /// Overall menu size from the last measured labels.
    pub fn size(&self) -> Size<i32, Logical> {
        let widest = self.label_sizes.iter().map(|s| s.w).max().unwrap_or(0);
        let stacked: i32 = self.label_sizes.iter().map(|s| s.h + MARGIN).sum();
        Size::from((
            widest + BORDER * 2 + MARGIN,
            stacked + BORDER * 2 - MARGIN,
        ))
    }

    /// The menu's bounding box, if open.
    pub fn rect(&self) -> Option<Rectangle<i32, Logical>> {
        Some(Rectangle::new(self.origin?, self.size()))
    }

    pub fn contains(&self, cursor: Point<f64, Logical>) -> bool {
        self.rect().is_some_and(|r| r.to_f64().contains(cursor))
    }

    /// Hit box of entry `index`, if open.
    fn entry_rect(&self, index: usize) -> Option<Rectangle<i32, Logical>> {
        let origin = self.origin?;
        let width = self.size().w - BORDER;
        let mut y = origin.y + MARGIN;
        for (i, label) in self.label_sizes.iter().enumerate() {
            let rect = Rectangle::new(
                // one-unit fudge so the hit box lines up with the drawn row
                Point::from((origin.x + MARGIN - 1, y - 1)),
                Size::from((width, label.h + MARGIN)),
            );
            if i == index {
                return Some(rect);
            }
            y += label.h + MARGIN;
        }
        None
    }

    /// Index of the entry under the cursor, recomputed on every call.
    pub fn selected(&self, cursor: Point<f64, Logical>) -> Option<usize> {
        (0..MenuAction::ALL.len()).find(|&i| {
            self.entry_rect(i)
                .is_some_and(|r| r.to_f64().contains(cursor))
        })
    }

    /// The action under the cursor, if any.
    pub fn action_at(&self, cursor: Point<f64, Logical>) -> Option<MenuAction> {
        self.selected(cursor).map(|i| MenuAction::ALL[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_menu() -> Menu {
        let mut menu = Menu::default();
        menu.open_at(Point::from((100, 100)));
        menu
    }

    #[test]
    fn closed_menu_selects_nothing() {
        let menu = Menu::default();
        assert!(!menu.is_open());
        assert_eq!(menu.selected(Point::from((0.0, 0.0))), None);
        assert_eq!(menu.rect(), None);
    }

    #[test]
    fn selection_tracks_cursor_rows() {
        let menu = open_menu();
        let x = 120.0;
        // Entry i spans 20 units of height (16 + margin); rows begin at
        // origin.y + margin.
        assert_eq!(menu.selected(Point::from((x, 105.0))), Some(0));
        assert_eq!(menu.selected(Point::from((x, 125.0))), Some(1));
        assert_eq!(menu.selected(Point::from((x, 145.0))), Some(2));
        assert_eq!(menu.selected(Point::from((x, 165.0))), Some(3));
        assert_eq!(menu.selected(Point::from((x, 185.0))), Some(4));
    }

    #[test]
    fn action_commits_at_query_time() {
        let menu = open_menu();
        assert_eq!(menu.action_at(Point::from((120.0, 125.0))), Some(MenuAction::Resize));
        // same menu, cursor moved: different answer, no stored state
        assert_eq!(menu.action_at(Point::from((120.0, 145.0))), Some(MenuAction::Move));
    }

    #[test]
    fn cursor_outside_box_selects_nothing() {
        let menu = open_menu();
        assert_eq!(menu.selected(Point::from((400.0, 120.0))), None);
        assert!(!menu.contains(Point::from((400.0, 120.0))));
        assert!(menu.contains(Point::from((120.0, 120.0))));
    }

    #[test]
    fn size_derives_from_widest_label() {
        let mut menu = open_menu();
        menu.set_label_sizes([
            Size::from((30, 16)),
            Size::from((60, 16)),
            Size::from((40, 16)),
            Size::from((55, 16)),
            Size::from((35, 16)),
        ]);
        let size = menu.size();
        assert_eq!(size.w, 60 + 3 * 2 + 4);
        assert_eq!(size.h, 5 * (16 + 4) + 3 * 2 - 4);
    }
}
