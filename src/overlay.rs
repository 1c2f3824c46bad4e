//! Drag and resize geometry for a georeferenced overlay.
//!
//! Nine handles sit on the overlay box: four corners, four edge midpoints
//! and the center. A gesture snapshots the box when it starts and every
//! pointer move is resolved against that snapshot, never against the
//! box as it was mid-drag. Updates that would invert or collapse the box
//! are discarded and the last valid candidate stays in effect.

use log::trace;

use crate::geom::{GeoBounds, GeoPoint, MIN_SPAN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    SouthWest,
    SouthEast,
    NorthEast,
    NorthWest,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::SouthWest,
        Corner::SouthEast,
        Corner::NorthEast,
        Corner::NorthWest,
    ];

    fn of(self, bounds: &GeoBounds) -> GeoPoint {
        match self {
            Corner::SouthWest => GeoPoint::new(bounds.south(), bounds.west()),
            Corner::SouthEast => GeoPoint::new(bounds.south(), bounds.east()),
            Corner::NorthEast => GeoPoint::new(bounds.north(), bounds.east()),
            Corner::NorthWest => GeoPoint::new(bounds.north(), bounds.west()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    West,
    East,
    South,
    North,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::West, Side::East, Side::South, Side::North];

    fn midpoint(self, bounds: &GeoBounds) -> GeoPoint {
        let c = bounds.center();
        match self {
            Side::West => GeoPoint::new(c.lat, bounds.west()),
            Side::East => GeoPoint::new(c.lat, bounds.east()),
            Side::South => GeoPoint::new(bounds.south(), c.lng),
            Side::North => GeoPoint::new(bounds.north(), c.lng),
        }
    }
}

/// One of the nine manipulation handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Corner(Corner),
    Edge(Side),
    Center,
}

impl Handle {
    /// Where this handle sits on `bounds`.
    pub fn position(self, bounds: &GeoBounds) -> GeoPoint {
        match self {
            Handle::Corner(corner) => corner.of(bounds),
            Handle::Edge(side) => side.midpoint(bounds),
            Handle::Center => bounds.center(),
        }
    }

    pub fn all() -> impl Iterator<Item = Handle> {
        Corner::ALL
            .into_iter()
            .map(Handle::Corner)
            .chain(Side::ALL.into_iter().map(Handle::Edge))
            .chain(std::iter::once(Handle::Center))
    }
}

/// How corner handles resize the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeMode {
    /// Corners scale the box uniformly about its center, keeping
    /// width/height at `ratio`.
    AspectLocked { ratio: f64 },
    /// Corners move independently; the box is the min/max of all four.
    /// The other three corners stay put, so a corner drag can only grow the
    /// box. Only the edge handles shrink it in this mode.
    FreeForm,
}

impl ResizeMode {
    /// Lock the aspect ratio when the source shape's ratio is known.
    pub fn for_aspect(aspect: Option<f64>) -> Self {
        match aspect {
            Some(ratio) if ratio.is_finite() && ratio > 0.0 => ResizeMode::AspectLocked { ratio },
            _ => ResizeMode::FreeForm,
        }
    }
}

/// Notifications for collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsEvent {
    /// Mid-gesture update, for live feedback only.
    Preview(GeoBounds),
    /// Gesture finished; the box is authoritative. Expensive work goes here.
    Committed(GeoBounds),
}

/// Candidate box for moving `handle` to `pointer`, resolved against `snapshot`.
///
/// Returns `None` if the result would be inverted or degenerate.
pub fn resize(
    snapshot: &GeoBounds,
    handle: Handle,
    pointer: GeoPoint,
    mode: ResizeMode,
) -> Option<GeoBounds> {
    if !pointer.is_finite() {
        return None;
    }
    match (handle, mode) {
        (Handle::Corner(corner), ResizeMode::AspectLocked { ratio }) => {
            let center = snapshot.center();
            let half_diagonal = corner.of(snapshot).flat_distance(center);
            if !(half_diagonal > 0.0) {
                return None;
            }
            let scale = pointer.flat_distance(center) / half_diagonal;
            let floor = MIN_SPAN.max(MIN_SPAN / ratio);
            let half_height = (snapshot.height() / 2.0 * scale).max(floor);
            GeoBounds::from_center(center, half_height, half_height * ratio)
        }
        (Handle::Corner(moved), ResizeMode::FreeForm) => {
            let corners: Vec<GeoPoint> = Corner::ALL
                .iter()
                .map(|&c| if c == moved { pointer } else { c.of(snapshot) })
                .collect();
            GeoBounds::enclosing(&corners)
        }
        (Handle::Edge(side), _) => {
            let (mut s, mut w, mut n, mut e) = (
                snapshot.south(),
                snapshot.west(),
                snapshot.north(),
                snapshot.east(),
            );
            match side {
                Side::West => w = pointer.lng,
                Side::East => e = pointer.lng,
                Side::South => s = pointer.lat,
                Side::North => n = pointer.lat,
            }
            GeoBounds::new(s, w, n, e)
        }
        (Handle::Center, _) => {
            GeoBounds::from_center(pointer, snapshot.height() / 2.0, snapshot.width() / 2.0)
        }
    }
}

/// An active drag. Holds the box as it was when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    pub snapshot: GeoBounds,
    pub candidate: GeoBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Dragging(DragSession),
}

/// The overlay's box plus the gesture currently manipulating it.
#[derive(Debug, Clone)]
pub struct OverlayTransform {
    bounds: GeoBounds,
    mode: ResizeMode,
    gesture: Gesture,
}

impl OverlayTransform {
    pub fn new(bounds: GeoBounds, mode: ResizeMode) -> Self {
        Self {
            bounds,
            mode,
            gesture: Gesture::Idle,
        }
    }

    /// Committed box. Unaffected by an in-progress drag.
    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Box to draw right now: the drag candidate if dragging.
    pub fn live_bounds(&self) -> GeoBounds {
        match self.gesture {
            Gesture::Dragging(session) => session.candidate,
            Gesture::Idle => self.bounds,
        }
    }

    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.gesture {
            Gesture::Dragging(session) => Some(session),
            Gesture::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging(_))
    }

    /// Handle positions on the live box.
    pub fn handles(&self) -> Vec<(Handle, GeoPoint)> {
        let live = self.live_bounds();
        Handle::all().map(|h| (h, h.position(&live))).collect()
    }

    /// Replace the box outright, e.g. after placing a new overlay.
    /// Ignored mid-drag.
    pub fn set_bounds(&mut self, bounds: GeoBounds) {
        if !self.is_dragging() {
            self.bounds = bounds;
        }
    }

    /// Start dragging `handle`. A gesture already in progress is replaced.
    pub fn begin(&mut self, handle: Handle) {
        trace!("begin drag {:?}", handle);
        self.gesture = Gesture::Dragging(DragSession {
            handle,
            snapshot: self.bounds,
            candidate: self.bounds,
        });
    }

    /// Pointer moved. Returns a preview event when the update is accepted.
    pub fn drag(&mut self, pointer: GeoPoint) -> Option<BoundsEvent> {
        let Gesture::Dragging(session) = &mut self.gesture else {
            return None;
        };
        let candidate = resize(&session.snapshot, session.handle, pointer, self.mode)?;
        session.candidate = candidate;
        Some(BoundsEvent::Preview(candidate))
    }

    /// Pointer released. Commits the last accepted candidate.
    pub fn end(&mut self) -> Option<BoundsEvent> {
        let Gesture::Dragging(session) = std::mem::replace(&mut self.gesture, Gesture::Idle) else {
            return None;
        };
        self.bounds = session.candidate;
        trace!("commit {:?}", self.bounds);
        Some(BoundsEvent::Committed(self.bounds))
    }

    /// Abandon the gesture, keeping the box from before it started.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }
}
