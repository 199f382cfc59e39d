//! Arc text paths for the cover.
//!
//! Angles here are "top-clockwise" degrees: 0 points straight up from the
//! centre and positive angles sweep clockwise, on a canvas whose y axis
//! points down. Arcs are always drawn clockwise from the start angle to the
//! end angle, taking the long way round when that span exceeds 180 degrees.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A circular arc: centre, radius and a clockwise span in top-clockwise degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// SVG path data for an arc, along with the geometry it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcPath {
    /// `M sx sy A r r 0 large 1 ex ey`
    pub d: String,
    pub start: Point,
    pub end: Point,
    /// Point at the middle of the clockwise span, for centring text
    pub anchor: Point,
    /// Clockwise span from start to end, in `[0, 360)`
    pub extent_deg: f64,
    pub large_arc: bool,
}

/// Convert top-clockwise degrees into radians in the usual canvas convention
/// (0 pointing right, increasing towards +y).
pub fn top_clockwise_to_radians(degrees: f64) -> f64 {
    (degrees - 90.0) * PI / 180.0
}

/// The point on the circle at `degrees` top-clockwise.
pub fn point_on_circle(center_x: f64, center_y: f64, radius: f64, degrees: f64) -> Point {
    let radians = top_clockwise_to_radians(degrees);
    Point {
        x: center_x + radius * radians.cos(),
        y: center_y + radius * radians.sin(),
    }
}

/// Clockwise angular distance from `start` to `end`, in `[0, 360)`.
///
/// Equal angles (modulo 360) give 0, not a full turn.
pub fn clockwise_extent(start_deg: f64, end_deg: f64) -> f64 {
    (end_deg.rem_euclid(360.0) - start_deg.rem_euclid(360.0)).rem_euclid(360.0)
}

/// Format a coordinate with three decimals, without ever printing `-0.000`.
pub fn format_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0.000".to_string()
    } else {
        format!("{rounded:.3}")
    }
}

/// Build the SVG path for `spec`.
pub fn make_arc_path(spec: &ArcSpec) -> ArcPath {
    let ArcSpec {
        center_x,
        center_y,
        radius,
        start_angle_deg,
        end_angle_deg,
    } = *spec;

    let start = point_on_circle(center_x, center_y, radius, start_angle_deg);
    let end = point_on_circle(center_x, center_y, radius, end_angle_deg);
    let extent_deg = clockwise_extent(start_angle_deg, end_angle_deg);
    let anchor = point_on_circle(
        center_x,
        center_y,
        radius,
        start_angle_deg + extent_deg / 2.0,
    );
    let large_arc = extent_deg > 180.0;

    let r = format_coord(radius);
    let d = format!(
        "M {} {} A {r} {r} 0 {} 1 {} {}",
        format_coord(start.x),
        format_coord(start.y),
        u8::from(large_arc),
        format_coord(end.x),
        format_coord(end.y),
    );

    ArcPath {
        d,
        start,
        end,
        anchor,
        extent_deg,
        large_arc,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn spec(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> ArcSpec {
        ArcSpec {
            center_x: cx,
            center_y: cy,
            radius: r,
            start_angle_deg: start,
            end_angle_deg: end,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn top_clockwise_angles_map_onto_the_canvas() {
        // straight up, then three, six and nine o'clock
        let up = point_on_circle(0.0, 0.0, 1.0, 0.0);
        assert_close(up.x, 0.0);
        assert_close(up.y, -1.0);

        let right = point_on_circle(0.0, 0.0, 1.0, 90.0);
        assert_close(right.x, 1.0);
        assert_close(right.y, 0.0);

        let down = point_on_circle(0.0, 0.0, 1.0, 180.0);
        assert_close(down.x, 0.0);
        assert_close(down.y, 1.0);

        let left = point_on_circle(0.0, 0.0, 1.0, 270.0);
        assert_close(left.x, -1.0);
        assert_close(left.y, 0.0);

        assert_close(top_clockwise_to_radians(90.0), 0.0);
        assert_close(top_clockwise_to_radians(0.0), -PI / 2.0);
    }

    #[test]
    fn quarter_arc_from_top_to_three_o_clock() {
        let path = make_arc_path(&spec(100.0, 100.0, 50.0, 0.0, 90.0));
        assert_close(path.start.x, 100.0);
        assert_close(path.start.y, 50.0);
        assert_close(path.end.x, 150.0);
        assert_close(path.end.y, 100.0);
        assert_close(path.extent_deg, 90.0);
        assert!(!path.large_arc);
        assert_eq!(
            path.d,
            "M 100.000 50.000 A 50.000 50.000 0 0 1 150.000 100.000"
        );
    }

    #[test]
    fn extent_wraps_through_zero() {
        assert_close(clockwise_extent(350.0, 10.0), 20.0);
        assert_close(clockwise_extent(-30.0, 30.0), 60.0);
        assert_close(clockwise_extent(10.0, 350.0), 340.0);
        assert_close(clockwise_extent(720.0, 90.0), 90.0);

        let path = make_arc_path(&spec(0.0, 0.0, 10.0, 350.0, 10.0));
        assert_close(path.extent_deg, 20.0);
        assert!(!path.large_arc);
    }

    #[test]
    fn spans_over_half_a_turn_use_the_large_arc() {
        let path = make_arc_path(&spec(0.0, 0.0, 10.0, 0.0, 270.0));
        assert!(path.large_arc);
        assert!(path.d.contains(" 0 1 1 "));

        let path = make_arc_path(&spec(0.0, 0.0, 10.0, 0.0, 180.0));
        assert!(!path.large_arc);
    }

    #[test]
    fn equal_angles_give_a_zero_length_arc() {
        assert_eq!(clockwise_extent(45.0, 45.0), 0.0);
        assert_eq!(clockwise_extent(45.0, 405.0), 0.0);

        let path = make_arc_path(&spec(10.0, 10.0, 5.0, 45.0, 405.0));
        assert_eq!(path.extent_deg, 0.0);
        assert!(!path.large_arc);
        assert_eq!(format_coord(path.start.x), format_coord(path.end.x));
        assert_eq!(format_coord(path.start.y), format_coord(path.end.y));
    }

    #[test]
    fn zero_radius_collapses_onto_the_centre() {
        let path = make_arc_path(&spec(-4.0, 7.5, 0.0, 30.0, 200.0));
        assert_eq!(path.d, "M -4.000 7.500 A 0.000 0.000 0 0 1 -4.000 7.500");
    }

    #[test]
    fn anchor_sits_at_the_middle_of_the_span() {
        let path = make_arc_path(&spec(0.0, 0.0, 10.0, 300.0, 60.0));
        assert_close(path.extent_deg, 120.0);
        assert_close(path.anchor.x, 0.0);
        assert_close(path.anchor.y, -10.0);
    }

    #[test]
    fn coordinates_never_print_negative_zero() {
        assert_eq!(format_coord(-0.0), "0.000");
        assert_eq!(format_coord(-0.0001), "0.000");
        assert_eq!(format_coord(1.23456), "1.235");
        assert_eq!(format_coord(-2.5), "-2.500");
    }
}
