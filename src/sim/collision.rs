//! Axis-separated collision resolution against solid platforms
//!
//! Bodies move one axis at a time. After each axis move the body is pushed
//! out of whatever it entered, using the previous position to decide which
//! side it came from.

use super::geom::Rect;
use super::platform::Platform;
use crate::consts::{LANDING_TOLERANCE, SIDE_TOLERANCE};

/// Result of the horizontal pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HorizontalContact {
    /// Stopped by a platform's left face (moving right)
    pub hit_left_face: bool,
    /// Stopped by a platform's right face (moving left)
    pub hit_right_face: bool,
    /// Clamped at the playfield's side edges
    pub clamped: bool,
}

impl HorizontalContact {
    pub fn blocked(&self) -> bool {
        self.hit_left_face || self.hit_right_face || self.clamped
    }
}

/// Result of the vertical pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerticalContact {
    /// Resting on top of a platform after this pass
    pub landed: bool,
    /// Bumped the underside of a platform
    pub hit_ceiling: bool,
    /// Downward speed at the moment of landing (0 if no landing)
    pub impact_speed: f32,
}

/// Push `body` out of any platform it entered horizontally
///
/// A platform counts when the vertical extents overlap strictly and the
/// horizontal extents overlap or touch, so a body that exactly reaches a wall
/// is stopped on that tick while a body resting on a floor is left alone.
/// Side is inferred from `prev_x` (the body's left edge before the move).
pub fn resolve_horizontal(
    body: &mut Rect,
    prev_x: f32,
    vel_x: &mut f32,
    platforms: &[Platform],
    field_width: f32,
) -> HorizontalContact {
    let mut contact = HorizontalContact::default();
    let prev_right = prev_x + body.w;

    for platform in platforms {
        let p = &platform.bounds;
        if !(body.overlaps_y(p) && body.touches_x(p)) {
            continue;
        }
        if prev_right <= p.left() + SIDE_TOLERANCE {
            body.x = p.left() - body.w;
            *vel_x = 0.0;
            contact.hit_left_face = true;
        } else if prev_x >= p.right() - SIDE_TOLERANCE {
            body.x = p.right();
            *vel_x = 0.0;
            contact.hit_right_face = true;
        }
    }

    let max_x = (field_width - body.w).max(0.0);
    if body.x < 0.0 {
        body.x = 0.0;
        *vel_x = 0.0;
        contact.clamped = true;
    } else if body.x > max_x {
        body.x = max_x;
        *vel_x = 0.0;
        contact.clamped = true;
    }

    contact
}

/// Land on or bump into platforms after a vertical move
///
/// Only platforms overlapping the body horizontally by more than the landing
/// tolerance are considered, which stops edge flicker when standing on a lip.
pub fn resolve_vertical(
    body: &mut Rect,
    prev_y: f32,
    vel_y: &mut f32,
    platforms: &[Platform],
) -> VerticalContact {
    let mut contact = VerticalContact::default();
    let prev_bottom = prev_y + body.h;

    for platform in platforms {
        let p = &platform.bounds;
        if !body.overlaps_x_inset(p, LANDING_TOLERANCE) {
            continue;
        }

        let landing = body.bottom() >= p.top() && prev_bottom <= p.top() + LANDING_TOLERANCE;
        let bumping = body.top() <= p.bottom() && prev_y >= p.bottom() - LANDING_TOLERANCE;
        if landing && *vel_y >= 0.0 {
            body.y = p.top() - body.h;
            contact.impact_speed = contact.impact_speed.max(*vel_y);
            *vel_y = 0.0;
            contact.landed = true;
        } else if bumping && *vel_y < 0.0 {
            body.y = p.bottom();
            *vel_y = 0.0;
            contact.hit_ceiling = true;
        }
    }

    contact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Platform {
        Platform::wood(100.0, 400.0, 50.0, 150.0)
    }

    #[test]
    fn test_horizontal_stop_at_left_face() {
        // Right edge moved 95 -> 100 and touches the wall's left face
        let mut body = Rect::new(60.0, 490.0, 40.0, 60.0);
        let mut vx = 5.0;
        let c = resolve_horizontal(&mut body, 55.0, &mut vx, &[wall()], 800.0);
        assert!(c.hit_left_face);
        assert_eq!(body.right(), 100.0);
        assert_eq!(vx, 0.0);
    }

    #[test]
    fn test_horizontal_stop_at_right_face() {
        let mut body = Rect::new(146.0, 490.0, 40.0, 60.0);
        let mut vx = -5.0;
        let c = resolve_horizontal(&mut body, 151.0, &mut vx, &[wall()], 800.0);
        assert!(c.hit_right_face);
        assert_eq!(body.left(), 150.0);
        assert_eq!(vx, 0.0);
    }

    #[test]
    fn test_horizontal_ignores_floor_under_resting_body() {
        let floor = Platform::wood(0.0, 550.0, 800.0, 50.0);
        let mut body = Rect::new(300.0, 490.0, 40.0, 60.0);
        let mut vx = 5.0;
        let c = resolve_horizontal(&mut body, 295.0, &mut vx, &[floor], 800.0);
        assert!(!c.blocked());
        assert_eq!(vx, 5.0);
        assert_eq!(body.x, 300.0);
    }

    #[test]
    fn test_horizontal_clamps_to_field() {
        let mut body = Rect::new(-3.0, 0.0, 40.0, 60.0);
        let mut vx = -3.0;
        let c = resolve_horizontal(&mut body, 0.0, &mut vx, &[], 800.0);
        assert!(c.clamped);
        assert_eq!(body.x, 0.0);
        assert_eq!(vx, 0.0);

        let mut body = Rect::new(765.0, 0.0, 40.0, 60.0);
        let mut vx = 5.0;
        resolve_horizontal(&mut body, 760.0, &mut vx, &[], 800.0);
        assert_eq!(body.x, 760.0);
        assert_eq!(vx, 0.0);
    }

    #[test]
    fn test_vertical_landing() {
        let floor = Platform::wood(0.0, 550.0, 800.0, 50.0);
        let mut body = Rect::new(300.0, 497.0, 40.0, 60.0);
        let mut vy = 7.0;
        let c = resolve_vertical(&mut body, 490.0, &mut vy, &[floor]);
        assert!(c.landed);
        assert_eq!(c.impact_speed, 7.0);
        assert_eq!(body.bottom(), 550.0);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_vertical_no_landing_when_coming_from_below() {
        let ledge = Platform::wood(100.0, 420.0, 250.0, 25.0);
        // Previous bottom well below the ledge top: passing up through it
        let mut body = Rect::new(150.0, 380.0, 40.0, 60.0);
        let mut vy = 2.0;
        let c = resolve_vertical(&mut body, 378.0, &mut vy, &[ledge]);
        assert!(!c.landed);
        assert_eq!(vy, 2.0);
    }

    #[test]
    fn test_vertical_ceiling_bump() {
        let ledge = Platform::wood(100.0, 420.0, 250.0, 25.0);
        let mut body = Rect::new(150.0, 440.0, 40.0, 60.0);
        let mut vy = -10.0;
        let c = resolve_vertical(&mut body, 450.0, &mut vy, &[ledge]);
        assert!(c.hit_ceiling);
        assert_eq!(body.top(), 445.0);
        assert_eq!(vy, 0.0);
    }

    #[test]
    fn test_vertical_edge_tolerance() {
        // Only 4px of overlap with the ledge: not enough to stand on
        let ledge = Platform::wood(100.0, 420.0, 250.0, 25.0);
        let mut body = Rect::new(64.0, 365.0, 40.0, 60.0);
        let mut vy = 5.0;
        let c = resolve_vertical(&mut body, 360.0, &mut vy, &[ledge]);
        assert!(!c.landed);
    }
}
