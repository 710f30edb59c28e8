//! Collision resolution between the player and the playfield
//!
//! Everything here is a pure function of its inputs. The caller decides what
//! to do with the verdict (clamping, dying, soft-stopping at the ceiling).

use super::state::{DeathType, Rect, Razor};
use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
use crate::tuning::Tuning;

/// Screen bounds the player is tested against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
        }
    }
}

/// Outcome of one collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    None,
    /// Hitbox reached the floor (terminal)
    Floor,
    /// Hitbox reached the top edge (not terminal)
    Ceiling,
    /// Hit the blade above the gap
    RazorTop(Razor),
    /// Hit the blade below the gap
    RazorBottom(Razor),
}

impl Collision {
    pub fn is_terminal(&self) -> bool {
        self.death_type().is_some()
    }

    pub fn death_type(&self) -> Option<DeathType> {
        match self {
            Collision::Floor => Some(DeathType::Floor),
            Collision::RazorTop(_) => Some(DeathType::RazorTop),
            Collision::RazorBottom(_) => Some(DeathType::RazorBottom),
            Collision::None | Collision::Ceiling => None,
        }
    }

    /// The razor involved, if any
    pub fn razor(&self) -> Option<&Razor> {
        match self {
            Collision::RazorTop(r) | Collision::RazorBottom(r) => Some(r),
            _ => None,
        }
    }
}

/// Classify the player's hitbox against the floor, razors and ceiling
///
/// Precedence is floor, then razors in spawn order (first hit wins), then
/// ceiling. Blade overlap is strict, so a hitbox that only touches a blade
/// edge does not collide. Floor and ceiling contact are inclusive.
pub fn resolve_collision(
    hitbox: &Rect,
    razors: &[Razor],
    playfield: &Playfield,
    tuning: &Tuning,
) -> Collision {
    if hitbox.bottom >= playfield.height {
        return Collision::Floor;
    }

    for razor in razors {
        if hitbox.overlaps(&razor.top_blade(tuning)) {
            return Collision::RazorTop(*razor);
        }
        if hitbox.overlaps(&razor.bottom_blade(tuning)) {
            return Collision::RazorBottom(*razor);
        }
    }

    if hitbox.top <= 0.0 {
        return Collision::Ceiling;
    }

    Collision::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn razor_at(x: f32, gap_y: f32) -> Razor {
        Razor {
            id: 1,
            x,
            gap_y,
            scored: false,
        }
    }

    /// Hitbox whose left edge sits at `left` and top at `top`
    fn hitbox(left: f32, top: f32) -> Rect {
        let size = PLAYER_WIDTH - 2.0 * HITBOX_PADDING;
        Rect::new(left, top, left + size, top + size)
    }

    #[test]
    fn test_open_air_is_none() {
        let tuning = Tuning::default();
        let hb = hitbox(310.0, 700.0);
        assert_eq!(resolve_collision(&hb, &[], &Playfield::default(), &tuning), Collision::None);
    }

    #[test]
    fn test_floor_is_inclusive() {
        let tuning = Tuning::default();
        let size = PLAYER_WIDTH - 2.0 * HITBOX_PADDING;
        let hb = hitbox(310.0, GAME_HEIGHT - size);
        assert_eq!(resolve_collision(&hb, &[], &Playfield::default(), &tuning), Collision::Floor);
        let hb = hitbox(310.0, GAME_HEIGHT - size - 1.0);
        assert_eq!(resolve_collision(&hb, &[], &Playfield::default(), &tuning), Collision::None);
    }

    #[test]
    fn test_ceiling_is_soft() {
        let tuning = Tuning::default();
        let hb = hitbox(310.0, 0.0);
        let verdict = resolve_collision(&hb, &[], &Playfield::default(), &tuning);
        assert_eq!(verdict, Collision::Ceiling);
        assert!(!verdict.is_terminal());
    }

    #[test]
    fn test_top_blade_tangent_vs_overlap() {
        let tuning = Tuning::default();
        let razor = razor_at(400.0, 800.0);
        let field = Playfield::default();

        // Horizontally inside the blade; hitbox top exactly at the gap start
        let hb = hitbox(400.0, 800.0);
        assert_eq!(resolve_collision(&hb, &[razor], &field, &tuning), Collision::None);

        let hb = hitbox(400.0, 799.0);
        assert_eq!(resolve_collision(&hb, &[razor], &field, &tuning), Collision::RazorTop(razor));
    }

    #[test]
    fn test_bottom_blade_tangent_vs_overlap() {
        let tuning = Tuning::default();
        let razor = razor_at(400.0, 600.0);
        let field = Playfield::default();
        let size = PLAYER_WIDTH - 2.0 * HITBOX_PADDING;
        let gap_end = 600.0 + RAZOR_GAP;

        let hb = hitbox(400.0, gap_end - size);
        assert_eq!(resolve_collision(&hb, &[razor], &field, &tuning), Collision::None);

        let hb = hitbox(400.0, gap_end - size + 1.0);
        assert_eq!(
            resolve_collision(&hb, &[razor], &field, &tuning),
            Collision::RazorBottom(razor)
        );
    }

    #[test]
    fn test_blade_margin_is_horizontal_tangent() {
        let tuning = Tuning::default();
        let razor = razor_at(600.0, 800.0);
        let field = Playfield::default();
        let size = PLAYER_WIDTH - 2.0 * HITBOX_PADDING;
        // Vertically in the top blade's range
        let top = 300.0;

        // Right edge touching the blade's inset left edge
        let hb = hitbox(600.0 + BLADE_MARGIN - size, top);
        assert_eq!(resolve_collision(&hb, &[razor], &field, &tuning), Collision::None);

        let hb = hitbox(600.0 + BLADE_MARGIN - size + 1.0, top);
        assert_eq!(resolve_collision(&hb, &[razor], &field, &tuning), Collision::RazorTop(razor));
    }

    #[test]
    fn test_floor_takes_precedence_over_razor() {
        let tuning = Tuning::default();
        let size = PLAYER_WIDTH - 2.0 * HITBOX_PADDING;
        let razor = razor_at(300.0, 300.0);
        let hb = hitbox(310.0, GAME_HEIGHT - size + 5.0);
        assert_eq!(
            resolve_collision(&hb, &[razor], &Playfield::default(), &tuning),
            Collision::Floor
        );
    }

    #[test]
    fn test_first_razor_in_spawn_order_wins() {
        let tuning = Tuning::default();
        let a = Razor { id: 1, ..razor_at(320.0, 900.0) };
        let b = Razor { id: 2, ..razor_at(340.0, 900.0) };
        let hb = hitbox(310.0, 500.0);
        let verdict = resolve_collision(&hb, &[a, b], &Playfield::default(), &tuning);
        assert_eq!(verdict.razor().map(|r| r.id), Some(1));
    }

    proptest! {
        #[test]
        fn prop_inside_gap_never_collides(
            gap_y in MIN_RAZOR_Y..MAX_RAZOR_Y,
            razor_x in -200.0f32..1100.0,
            slack in 0.0f32..0.99,
        ) {
            let tuning = Tuning::default();
            let size = PLAYER_WIDTH - 2.0 * HITBOX_PADDING;
            // Any hitbox fully inside the gap (touching allowed) is safe
            let top = gap_y + slack * (RAZOR_GAP - size);
            let hb = hitbox(310.0, top);
            let razors = [razor_at(razor_x, gap_y)];
            let verdict = resolve_collision(&hb, &razors, &Playfield::default(), &tuning);
            prop_assert!(!verdict.is_terminal());
        }

        #[test]
        fn prop_overlap_with_top_blade_always_detected(
            gap_y in MIN_RAZOR_Y..MAX_RAZOR_Y,
            depth in 1.0f32..200.0,
        ) {
            let tuning = Tuning::default();
            let hb = hitbox(400.0, gap_y - depth);
            let razors = [razor_at(400.0, gap_y)];
            let verdict = resolve_collision(&hb, &razors, &Playfield::default(), &tuning);
            prop_assert_eq!(verdict.death_type(), Some(DeathType::RazorTop));
        }
    }
}
