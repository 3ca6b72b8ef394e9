use emath::{Pos2, Rect, Vec2};

use crate::Constraints;

/// Half-width of a grip's square hit zone, in screen pixels.
pub const HANDLE_HIT_RADIUS: f32 = 8.0;

/// One of the eight compass-direction resize grips around the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Handle {
    /// All grips, corners first so hit-testing prefers them over the edge
    /// grips they overlap.
    pub const ALL: [Handle; 8] = [
        Handle::NW,
        Handle::NE,
        Handle::SE,
        Handle::SW,
        Handle::N,
        Handle::E,
        Handle::S,
        Handle::W,
    ];

    /// True when dragging this grip moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Handle::W | Handle::NW | Handle::SW)
    }

    /// True when dragging this grip moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(self, Handle::E | Handle::NE | Handle::SE)
    }

    /// True when dragging this grip moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Handle::N | Handle::NW | Handle::NE)
    }

    /// True when dragging this grip moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::S | Handle::SW | Handle::SE)
    }

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::NW | Handle::NE | Handle::SE | Handle::SW)
    }

    /// Where the grip sits on a rect.
    pub fn position(self, rect: Rect) -> Pos2 {
        match self {
            Handle::N => rect.center_top(),
            Handle::NE => rect.right_top(),
            Handle::E => rect.right_center(),
            Handle::SE => rect.right_bottom(),
            Handle::S => rect.center_bottom(),
            Handle::SW => rect.left_bottom(),
            Handle::W => rect.left_center(),
            Handle::NW => rect.left_top(),
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// The set of grips a surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Handles(u8);

impl Handles {
    pub const NONE: Handles = Handles(0);

    pub fn all() -> Self {
        Handle::ALL.iter().fold(Self::NONE, |set, &h| set.with(h))
    }

    /// The grips available under the given constraints: N/S need a free
    /// height, E/W a free width, and the corners need both extents unpinned.
    /// A fixed ratio keeps the corners and drops the edge grips.
    pub fn for_constraints(constraints: &Constraints) -> Self {
        let mut set = Self::NONE;
        if constraints.fixed_height.is_none() && constraints.fixed_ratio.is_none() {
            set = set.with(Handle::N).with(Handle::S);
        }
        if constraints.fixed_width.is_none() && constraints.fixed_ratio.is_none() {
            set = set.with(Handle::E).with(Handle::W);
        }
        if constraints.effective_fixed_width().is_none()
            && constraints.effective_fixed_height().is_none()
        {
            set = set
                .with(Handle::NW)
                .with(Handle::NE)
                .with(Handle::SE)
                .with(Handle::SW);
        }
        set
    }

    pub fn with(self, handle: Handle) -> Self {
        Handles(self.0 | handle.bit())
    }

    pub fn contains(self, handle: Handle) -> bool {
        self.0 & handle.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Handle> {
        Handle::ALL.into_iter().filter(move |h| self.contains(*h))
    }

    /// Topmost grip under `pos` for a selection drawn at `screen_rect`, both
    /// in screen units. Corners win over the edge grips they touch.
    pub fn hit(self, pos: Pos2, screen_rect: Rect) -> Option<Handle> {
        self.iter().find(|handle| {
            let zone = Rect::from_center_size(
                handle.position(screen_rect),
                Vec2::splat(HANDLE_HIT_RADIUS * 2.0),
            );
            zone.contains(pos)
        })
    }
}
