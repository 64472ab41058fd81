//! Movement system - random walk for every non-dormant stance

use rand::Rng;

use crate::components::{Direction, GridPos, Stance};

/// Energy spent on every movement attempt, successful or not
pub const MOVE_COST: f64 = 0.5;

/// Move one cell in a uniformly random direction.
///
/// Dormant entities stay put and pay nothing. Any other stance pays
/// [`MOVE_COST`]; a step that would leave the grid is discarded.
/// Returns the energy spent.
pub fn move_agent(
    pos: &mut GridPos,
    stance: Stance,
    width: usize,
    height: usize,
    rng: &mut impl Rng,
) -> f64 {
    if !stance.is_mobile() {
        return 0.0;
    }

    let dir = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
    if let Some(next) = pos.step(dir, width, height) {
        *pos = next;
    }
    MOVE_COST
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_dormant_stays_and_pays_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut pos = GridPos::new(2, 2);
        let cost = move_agent(&mut pos, Stance::Dormant, 5, 5, &mut rng);
        assert_eq!(cost, 0.0);
        assert_eq!(pos, GridPos::new(2, 2));
    }

    #[test]
    fn test_every_mobile_stance_moves_one_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for stance in [Stance::Seek, Stance::Social, Stance::Holy, Stance::Drill, Stance::Flee] {
            let mut pos = GridPos::new(2, 2);
            let cost = move_agent(&mut pos, stance, 5, 5, &mut rng);
            assert_eq!(cost, MOVE_COST);
            assert_eq!(pos.manhattan(2, 2), 1);
        }
    }

    #[test]
    fn test_blocked_move_still_costs() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // A 1x1 grid has no neighbours
        for _ in 0..20 {
            let mut pos = GridPos::new(0, 0);
            let cost = move_agent(&mut pos, Stance::Seek, 1, 1, &mut rng);
            assert_eq!(cost, MOVE_COST);
            assert_eq!(pos, GridPos::new(0, 0));
        }
    }

    #[test]
    fn test_walk_stays_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut pos = GridPos::new(0, 0);
        for _ in 0..1000 {
            move_agent(&mut pos, Stance::Flee, 4, 3, &mut rng);
            assert!(pos.x < 4 && pos.y < 3);
        }
    }
}
