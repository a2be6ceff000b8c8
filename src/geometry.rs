use std::f32::consts::PI;

/// Wraps an angle in radians into the range (-π, π].
///
/// # Examples
/// ```
/// use std::f32::consts::PI;
/// use orts_route_graph::geometry::wrap_angle;
///
/// assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
/// assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
/// ```
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped += 2.0 * PI;
    }
    wrapped
}

/// Calculates the shortest angular distance between two angles in radians.
///
/// Returns a value in the range [0, π], representing the smallest angle
/// between the two input angles when considering the circular nature of angles.
///
/// # Examples
/// ```
/// use std::f32::consts::PI;
/// use orts_route_graph::geometry::angle_difference;
///
/// // Angles wrapping around (350° and 10° are only 20° apart)
/// let diff = angle_difference(350.0 * PI / 180.0, 10.0 * PI / 180.0);
/// assert!((diff - 20.0 * PI / 180.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn angle_difference(a1: f32, a2: f32) -> f32 {
    wrap_angle(a1 - a2).abs()
}

/// Computes the 2D cross product to determine the orientation of a point relative to a line.
///
/// Returns a positive value if the point is to the left of the line (counter-clockwise),
/// negative if to the right (clockwise), and zero if collinear.
#[must_use]
pub fn cross_product_2d(line_start: (f32, f32), line_end: (f32, f32), point: (f32, f32)) -> f32 {
    (line_end.0 - line_start.0) * (point.1 - line_start.1) -
    (line_end.1 - line_start.1) * (point.0 - line_start.0)
}

/// Winding-number containment test for a closed polygon (last vertex joins the first).
///
/// Points exactly on an edge count as inside.
#[must_use]
pub fn point_in_polygon(point: (f32, f32), polygon: &[(f32, f32)]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut winding = 0i32;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        let side = cross_product_2d(a, b, point);

        if side == 0.0 && point_on_segment(point, a, b) {
            return true;
        }

        if a.1 <= point.1 {
            if b.1 > point.1 && side > 0.0 {
                winding += 1;
            }
        } else if b.1 <= point.1 && side < 0.0 {
            winding -= 1;
        }
    }
    winding != 0
}

fn point_on_segment(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> bool {
    point.0 >= a.0.min(b.0) && point.0 <= a.0.max(b.0) &&
    point.1 >= a.1.min(b.1) && point.1 <= a.1.max(b.1)
}

/// Vertex average of a polygon; `None` for an empty polygon.
#[must_use]
pub fn polygon_centroid(polygon: &[(f32, f32)]) -> Option<(f32, f32)> {
    if polygon.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = polygon.len() as f32;
    let sum_x: f32 = polygon.iter().map(|(x, _)| x).sum();
    let sum_z: f32 = polygon.iter().map(|(_, z)| z).sum();
    Some((sum_x / count, sum_z / count))
}

#[must_use]
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<(f32, f32)> {
        vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(2.0 * PI)).abs() < 1e-5);
        assert!((wrap_angle(PI / 2.0 + 4.0 * PI) - PI / 2.0).abs() < 1e-4);
        assert!(wrap_angle(-3.0 * PI / 2.0) > 0.0);
    }

    #[test]
    fn test_angle_difference_symmetric() {
        assert!((angle_difference(0.1, 0.3) - angle_difference(0.3, 0.1)).abs() < 1e-6);
        assert!((angle_difference(PI, -PI)).abs() < 1e-5);
    }

    #[test]
    fn test_point_in_polygon() {
        let poly = square();
        assert!(point_in_polygon((5.0, 5.0), &poly));
        assert!(!point_in_polygon((15.0, 5.0), &poly));
        assert!(!point_in_polygon((5.0, -1.0), &poly));
    }

    #[test]
    fn test_point_on_edge_is_inside() {
        assert!(point_in_polygon((10.0, 5.0), &square()));
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(!point_in_polygon((0.0, 0.0), &[(0.0, 0.0), (1.0, 1.0)]));
    }

    #[test]
    fn test_polygon_centroid() {
        assert_eq!(polygon_centroid(&square()), Some((5.0, 5.0)));
        assert_eq!(polygon_centroid(&[]), None);
    }
}
