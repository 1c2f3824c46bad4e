//! Freehand drawing with undo/redo.

use crate::compose::Route;
use crate::geom::GeoPoint;

/// Prior states kept for undo.
const MAX_HISTORY: usize = 100;

/// Points captured during one pointer-down to pointer-up gesture.
pub type DrawnLine = Vec<GeoPoint>;

/// A collection of drawn lines plus snapshot history.
#[derive(Debug, Clone, Default)]
pub struct Sketch {
    lines: Vec<DrawnLine>,
    /// Line being drawn, not yet part of `lines`.
    active: Option<DrawnLine>,
    undo: Vec<Vec<DrawnLine>>,
    redo: Vec<Vec<DrawnLine>>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DrawnLine] {
        &self.lines
    }

    pub fn active(&self) -> Option<&DrawnLine> {
        self.active.as_ref()
    }

    /// Pointer down.
    pub fn begin(&mut self, at: GeoPoint) {
        let mut line = Vec::new();
        if at.is_finite() {
            line.push(at);
        }
        self.active = Some(line);
    }

    /// Pointer moved while down.
    pub fn extend(&mut self, to: GeoPoint) {
        if let Some(line) = self.active.as_mut() {
            if to.is_finite() && line.last() != Some(&to) {
                line.push(to);
            }
        }
    }

    /// Pointer up. Lines with fewer than two points are discarded.
    pub fn finish(&mut self) {
        let Some(line) = self.active.take() else {
            return;
        };
        if line.len() < 2 {
            return;
        }
        self.checkpoint();
        self.lines.push(line);
    }

    /// Remove every line. Undoable.
    pub fn clear(&mut self) {
        self.active = None;
        if self.lines.is_empty() {
            return;
        }
        self.checkpoint();
        self.lines.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.redo.push(std::mem::replace(&mut self.lines, previous));
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push(std::mem::replace(&mut self.lines, next));
        true
    }

    /// Flatten all lines, in drawing order, into one route.
    pub fn to_route(&self) -> Route {
        Route::from(self.lines.concat())
    }

    fn checkpoint(&mut self) {
        self.undo.push(self.lines.clone());
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(sketch: &mut Sketch, pts: &[(f64, f64)]) {
        let mut iter = pts.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng));
        if let Some(first) = iter.next() {
            sketch.begin(first);
        }
        for p in iter {
            sketch.extend(p);
        }
        sketch.finish();
    }

    #[test]
    fn undo_and_redo_walk_history() {
        let mut sketch = Sketch::new();
        draw(&mut sketch, &[(0.0, 0.0), (0.0, 1.0)]);
        draw(&mut sketch, &[(1.0, 1.0), (1.0, 2.0), (1.0, 3.0)]);
        assert_eq!(sketch.lines().len(), 2);

        assert!(sketch.undo());
        assert_eq!(sketch.lines().len(), 1);
        assert!(sketch.redo());
        assert_eq!(sketch.lines().len(), 2);

        sketch.clear();
        assert!(sketch.lines().is_empty());
        assert!(sketch.undo());
        assert_eq!(sketch.lines().len(), 2);

        // New drawing after undo drops the redo branch.
        sketch.undo();
        draw(&mut sketch, &[(5.0, 5.0), (6.0, 6.0)]);
        assert!(!sketch.can_redo());
    }

    #[test]
    fn taps_are_not_lines() {
        let mut sketch = Sketch::new();
        draw(&mut sketch, &[(0.0, 0.0)]);
        draw(&mut sketch, &[(0.0, 0.0), (0.0, 0.0)]);
        assert!(sketch.lines().is_empty());
        assert!(!sketch.can_undo());
    }

    #[test]
    fn route_flattens_in_drawing_order() {
        let mut sketch = Sketch::new();
        draw(&mut sketch, &[(0.0, 0.0), (0.0, 1.0)]);
        draw(&mut sketch, &[(2.0, 2.0), (3.0, 3.0)]);
        let route = sketch.to_route();
        assert_eq!(
            route.points(),
            &[
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(2.0, 2.0),
                GeoPoint::new(3.0, 3.0),
            ]
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut sketch = Sketch::new();
        for i in 0..(MAX_HISTORY + 10) {
            draw(&mut sketch, &[(i as f64, 0.0), (i as f64, 1.0)]);
        }
        let mut undone = 0;
        while sketch.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY);
    }
}
