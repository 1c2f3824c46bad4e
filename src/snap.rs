//! Road snapping: waypoint decimation and segment stitching.
//!
//! Segments are requested one at a time, in order. A failed segment is
//! replaced by a straight line between its waypoints so the route never
//! breaks; only that one segment degrades.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::error::ServiceError;
use crate::geom::GeoPoint;
use crate::services::RoutingService;

/// Keep every `ceil(n / max_waypoints)`-th point, always including the last.
///
/// Input within budget is returned unchanged.
pub fn decimate(points: &[GeoPoint], max_waypoints: usize) -> Vec<GeoPoint> {
    let max = max_waypoints.max(2);
    if points.len() <= max {
        return points.to_vec();
    }
    let stride = points.len().div_ceil(max);
    let mut kept: Vec<GeoPoint> = points.iter().copied().step_by(stride).collect();
    if (points.len() - 1) % stride != 0 {
        kept.extend(points.last().copied());
    }
    kept
}

/// Result of a snap, with the number of segments that fell back to straight lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapped {
    pub points: Vec<GeoPoint>,
    pub degraded_segments: usize,
}

/// Replace each waypoint-to-waypoint segment with a routed path.
///
/// For every segment after the first, the routed path's first point is
/// dropped since it repeats the previous segment's last point.
pub async fn snap_to_roads<R: RoutingService>(router: &R, waypoints: &[GeoPoint]) -> Snapped {
    if waypoints.len() < 2 {
        return Snapped {
            points: waypoints.to_vec(),
            degraded_segments: 0,
        };
    }

    let mut points: Vec<GeoPoint> = Vec::new();
    let mut degraded_segments = 0;
    for (i, pair) in waypoints.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let first = i == 0;
        match router.route(from, to).await {
            Ok(path) if !path.is_empty() => {
                let skip = usize::from(!first);
                points.extend(path.into_iter().skip(skip));
            }
            outcome => {
                match outcome {
                    Err(err) => warn!("segment {} failed: {}, using straight line", i, err),
                    Ok(_) => warn!("segment {} came back empty, using straight line", i),
                }
                degraded_segments += 1;
                if first {
                    points.push(from);
                }
                points.push(to);
            }
        }
    }
    Snapped {
        points,
        degraded_segments,
    }
}

/// Road snapper that allows one snap at a time.
///
/// A snap requested while another is in flight is refused with
/// [`ServiceError::Busy`], so a slow earlier request can never overwrite
/// a newer result.
#[derive(Debug)]
pub struct Snapper<R> {
    router: R,
    max_waypoints: usize,
    in_flight: AtomicBool,
}

impl<R: RoutingService> Snapper<R> {
    pub fn new(router: R, max_waypoints: usize) -> Self {
        Self {
            router,
            max_waypoints,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Decimate `points` to the waypoint budget and snap them to roads.
    pub async fn snap(&self, points: &[GeoPoint]) -> Result<Snapped, ServiceError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(ServiceError::Busy)?;
        let waypoints = decimate(points, self.max_waypoints);
        info!(
            "Snap        {} points \u{2192} {} waypoints",
            points.len(),
            waypoints.len()
        );
        let snapped = snap_to_roads(&self.router, &waypoints).await;
        info!(
            "Snapped     {} points, {} of {} segments straight",
            snapped.points.len(),
            snapped.degraded_segments,
            waypoints.len().saturating_sub(1)
        );
        Ok(snapped)
    }
}

/// Clears the in-flight flag when the snap finishes or its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng)
    }

    /// Routes via a midpoint; fails on the listed segment indices.
    struct MockRouter {
        fail: Vec<usize>,
        calls: RefCell<usize>,
    }

    impl MockRouter {
        fn failing(fail: &[usize]) -> Self {
            Self {
                fail: fail.to_vec(),
                calls: RefCell::new(0),
            }
        }
    }

    impl RoutingService for MockRouter {
        async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<Vec<GeoPoint>, ServiceError> {
            let call = {
                let mut calls = self.calls.borrow_mut();
                *calls += 1;
                *calls - 1
            };
            if self.fail.contains(&call) {
                return Err(ServiceError::Unreachable("mock".into()));
            }
            let mid = p((from.lat + to.lat) / 2.0, (from.lng + to.lng) / 2.0 + 0.001);
            Ok(vec![from, mid, to])
        }
    }

    struct EmptyRouter;

    impl RoutingService for EmptyRouter {
        async fn route(&self, _: GeoPoint, _: GeoPoint) -> Result<Vec<GeoPoint>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn waypoints(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| p(i as f64 * 0.01, 0.0)).collect()
    }

    #[test]
    fn decimation_keeps_last_point() {
        let pts = waypoints(10);
        assert_eq!(decimate(&pts, 20), pts);

        // stride ceil(10/4) = 3: indices 0, 3, 6, 9.
        let kept = decimate(&pts, 4);
        assert_eq!(kept, vec![pts[0], pts[3], pts[6], pts[9]]);

        // stride ceil(10/3) = 4: indices 0, 4, 8, then the forced last.
        let kept = decimate(&pts, 3);
        assert_eq!(kept, vec![pts[0], pts[4], pts[8], pts[9]]);
    }

    #[test]
    fn stitching_has_no_duplicate_junctions() {
        let wps = waypoints(4);
        let snapped = block_on(snap_to_roads(&MockRouter::failing(&[]), &wps));
        assert_eq!(snapped.degraded_segments, 0);
        // 3 points for the first segment, 2 more for each later one.
        assert_eq!(snapped.points.len(), 3 + 2 + 2);
        assert!(snapped.points.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(snapped.points.first(), wps.first());
        assert_eq!(snapped.points.last(), wps.last());
    }

    #[test]
    fn one_failed_segment_degrades_to_a_straight_line() {
        let wps = waypoints(4);
        let snapped = block_on(snap_to_roads(&MockRouter::failing(&[1]), &wps));
        assert_eq!(snapped.degraded_segments, 1);
        assert_eq!(snapped.points.len(), 3 + 1 + 2);
        // Straight segment: waypoint 1 directly followed by waypoint 2.
        assert_eq!(snapped.points[2], wps[1]);
        assert_eq!(snapped.points[3], wps[2]);
        assert_eq!(snapped.points.last(), wps.last());
    }

    #[test]
    fn failed_first_segment_inserts_both_waypoints() {
        let wps = waypoints(3);
        let snapped = block_on(snap_to_roads(&MockRouter::failing(&[0]), &wps));
        assert_eq!(snapped.points[..2], [wps[0], wps[1]]);
        assert_eq!(snapped.points.len(), 2 + 2);
    }

    #[test]
    fn empty_responses_count_as_failures() {
        let wps = waypoints(3);
        let snapped = block_on(snap_to_roads(&EmptyRouter, &wps));
        assert_eq!(snapped.points, wps);
        assert_eq!(snapped.degraded_segments, 2);
    }

    #[test]
    fn fewer_than_two_waypoints_pass_through() {
        let one = waypoints(1);
        let snapped = block_on(snap_to_roads(&EmptyRouter, &one));
        assert_eq!(snapped.points, one);
    }

    #[test]
    fn snapper_refuses_overlapping_requests() {
        let snapper = Snapper::new(MockRouter::failing(&[]), 25);
        let flag = InFlight::acquire(&snapper.in_flight).unwrap();
        assert!(snapper.is_busy());
        let err = block_on(snapper.snap(&waypoints(3))).unwrap_err();
        assert!(matches!(err, ServiceError::Busy));
        drop(flag);

        let snapped = block_on(snapper.snap(&waypoints(3))).unwrap();
        assert_eq!(snapped.points.len(), 5);
        assert!(!snapper.is_busy());
    }
}
