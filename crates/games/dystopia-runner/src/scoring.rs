use crate::config::ScoringConfig;

/// What a laser bolt hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Enemy,
    Obstacle,
}

/// Points for eliminating `target` with a laser.
///
/// Enemies pay full value; obstacles half, unless configured separately.
pub fn elimination_score(target: HitTarget, cfg: &ScoringConfig) -> u64 {
    match target {
        HitTarget::Enemy => cfg.enemy_elimination,
        HitTarget::Obstacle => cfg.obstacle_elimination,
    }
}

/// Distance points for one tick of survival.
pub fn distance_score(cfg: &ScoringConfig) -> u64 {
    cfg.per_tick
}
