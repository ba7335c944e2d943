//! Spawner - Paces new enemies and boosts
//!
//! A countdown fires one entity at a time; the reload shrinks as the score
//! climbs, down to a fixed floor.

use rand::Rng;

use crate::game::config::GameConfig;
use crate::game::entity::{Entity, EntityKind, LANE_COUNT};

/// Spawn pacing logic
pub struct Spawner;

impl Spawner {
    /// Frames until the next spawn at the given score
    pub fn interval_for(score: u64, config: &GameConfig) -> i32 {
        let shave = (score / config.spawn_score_step).min(i32::MAX as u64) as i32;
        config
            .spawn_base_interval
            .saturating_sub(shave)
            .max(config.spawn_min_interval)
    }

    /// Pick a uniformly random lane and roll for a boost
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Entity {
        let kind = if rng.gen_bool(config.boost_probability) {
            EntityKind::Boost
        } else {
            EntityKind::Enemy
        };
        Entity::spawn(kind, rng.gen_range(0..LANE_COUNT))
    }

    /// Advance the countdown by one frame, returning an entity when it fires
    pub fn update<R: Rng + ?Sized>(
        timer: &mut i32,
        score: u64,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<Entity> {
        *timer -= 1;
        if *timer > 0 {
            return None;
        }
        *timer = Self::interval_for(score, config);
        Some(Self::roll(rng, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn interval_shrinks_with_score_and_bottoms_out() {
        let config = GameConfig::default();
        assert_eq!(Spawner::interval_for(0, &config), 48);
        assert_eq!(Spawner::interval_for(49, &config), 48);
        assert_eq!(Spawner::interval_for(50, &config), 47);
        assert_eq!(Spawner::interval_for(1000, &config), 28);
        assert_eq!(Spawner::interval_for(1500, &config), 18);
        assert_eq!(Spawner::interval_for(u64::MAX, &config), 18);
    }

    #[test]
    fn fires_when_countdown_runs_out() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut timer = 0;

        assert!(Spawner::update(&mut timer, 0, &config, &mut rng).is_some());
        assert_eq!(timer, 48);

        for _ in 0..47 {
            assert!(Spawner::update(&mut timer, 0, &config, &mut rng).is_none());
        }
        assert!(Spawner::update(&mut timer, 0, &config, &mut rng).is_some());
    }

    #[test]
    fn lanes_stay_in_range_and_boosts_are_a_minority() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut boosts = 0;
        let mut lanes_seen = [false; LANE_COUNT];

        for _ in 0..2000 {
            let e = Spawner::roll(&mut rng, &config);
            assert!(e.lane < LANE_COUNT);
            lanes_seen[e.lane] = true;
            if e.kind == EntityKind::Boost {
                boosts += 1;
            }
        }

        assert!(lanes_seen.iter().all(|&s| s), "every lane should be used");
        assert!((300..500).contains(&boosts), "expected ~20% boosts, got {boosts}/2000");
    }

    #[test]
    fn probability_extremes_are_respected() {
        let mut rng = StdRng::seed_from_u64(1);
        let all_boosts = GameConfig {
            boost_probability: 1.0,
            ..Default::default()
        };
        let no_boosts = GameConfig {
            boost_probability: 0.0,
            ..Default::default()
        };
        for _ in 0..50 {
            assert_eq!(Spawner::roll(&mut rng, &all_boosts).kind, EntityKind::Boost);
            assert_eq!(Spawner::roll(&mut rng, &no_boosts).kind, EntityKind::Enemy);
        }
    }
}
