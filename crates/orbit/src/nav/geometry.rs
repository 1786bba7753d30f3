use super::item::{ItemId, NavigationItem};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Offset from the menu center, in screen coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Center,
    Item(ItemId),
    Outside,
}

pub fn angle_step(count: usize) -> f64 {
    2.0 * PI / count as f64
}

/// Angle of slot `index` in radians, `start_angle` given in degrees.
pub fn slot_angle(index: usize, count: usize, start_angle: f64) -> f64 {
    start_angle.to_radians() + index as f64 * angle_step(count)
}

pub fn angle_difference(a: f64, b: f64) -> f64 {
    // shortest way around the circle
    ((a - b + PI).rem_euclid(2.0 * PI) - PI).abs()
}

/// Slots advance clockwise from `start_angle`. An empty ring maps to the center.
pub fn radial_position(index: usize, count: usize, radius: f64, start_angle: f64) -> Point {
    if count == 0 {
        return Point::default();
    }

    let angle = slot_angle(index, count, start_angle);
    Point::new(radius * angle.cos(), radius * angle.sin())
}

pub fn hit_test(
    point: Point,
    items: &[NavigationItem],
    radius: f64,
    center_size: f64,
    item_size: f64,
    start_angle: f64,
) -> HitTarget {
    let dist = point.distance(Point::default());

    // dead zone
    if dist <= center_size / 2.0 {
        return HitTarget::Center;
    }
    if dist > radius + item_size / 2.0 {
        return HitTarget::Outside;
    }

    let count = items.len();
    let cursor = point.angle();

    items
        .iter()
        .filter(|item| item.is_selectable())
        .min_by(|a, b| {
            angle_difference(cursor, slot_angle(a.position, count, start_angle)).total_cmp(
                &angle_difference(cursor, slot_angle(b.position, count, start_angle)),
            )
        })
        .map_or(HitTarget::Outside, |item| HitTarget::Item(item.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn ring(n: usize) -> Vec<NavigationItem> {
        (0..n)
            .map(|i| NavigationItem::new(format!("item-{i}"), format!("Item {i}"), "#", i))
            .collect()
    }

    #[test]
    fn test_positions_lie_on_circle_evenly_spaced() {
        for n in 1..=12 {
            let points: Vec<Point> = (0..n).map(|i| radial_position(i, n, 100.0, 0.0)).collect();

            for p in &points {
                assert!((p.distance(Point::default()) - 100.0).abs() < EPS);
            }

            let step = angle_step(n);
            for i in 0..n {
                let a = points[i].angle();
                let b = points[(i + 1) % n].angle();
                if n > 1 {
                    assert!((angle_difference(b, a) - step.min(2.0 * PI - step)).abs() < EPS);
                }
            }

            for i in 0..n {
                for j in (i + 1)..n {
                    assert!(points[i].distance(points[j]) > EPS, "n={n} i={i} j={j}");
                }
            }
        }
    }

    #[test]
    fn test_first_item_points_east() {
        let p = radial_position(0, 6, 120.0, 0.0);
        assert!((p.x - 120.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn test_start_angle_rotates_ring() {
        // -90 degrees is straight up on screen
        let p = radial_position(0, 4, 50.0, -90.0);
        assert!(p.x.abs() < EPS);
        assert!((p.y + 50.0).abs() < EPS);

        let q = radial_position(1, 4, 50.0, -90.0);
        assert!((q.x - 50.0).abs() < EPS);
        assert!(q.y.abs() < EPS);
    }

    #[test]
    fn test_empty_ring_is_center() {
        assert_eq!(radial_position(0, 0, 120.0, 0.0), Point::default());
        assert_eq!(radial_position(3, 0, 120.0, 45.0), Point::default());
    }

    #[test]
    fn test_hit_test_regions() {
        let items = ring(4);

        assert_eq!(
            hit_test(Point::new(5.0, 5.0), &items, 100.0, 40.0, 30.0, 0.0),
            HitTarget::Center
        );
        assert_eq!(
            hit_test(Point::new(500.0, 0.0), &items, 100.0, 40.0, 30.0, 0.0),
            HitTarget::Outside
        );
        assert_eq!(
            hit_test(Point::new(90.0, 10.0), &items, 100.0, 40.0, 30.0, 0.0),
            HitTarget::Item(ItemId::from("item-0"))
        );
        assert_eq!(
            hit_test(Point::new(0.0, 80.0), &items, 100.0, 40.0, 30.0, 0.0),
            HitTarget::Item(ItemId::from("item-1"))
        );
    }

    #[test]
    fn test_hit_test_skips_disabled_items() {
        let mut items = ring(4);
        items[1] = items[1].clone().disabled();

        let hit = hit_test(Point::new(5.0, 80.0), &items, 100.0, 40.0, 30.0, 0.0);
        assert_eq!(hit, HitTarget::Item(ItemId::from("item-0")));
    }
}
