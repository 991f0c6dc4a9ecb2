use ballistic_game::compute::*;
use ballistic_game::entities::*;
use ballistic_game::error::GameError;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn point(x: i32, y: i32) -> Target {
    Target::point(x, y).unwrap()
}

fn obstacle(x: i32, height: i32) -> Target {
    Target::obstacle(x, height).unwrap()
}

fn boss(x: i32, y: i32, health: i32) -> Target {
    Target::boss(x, y, health).unwrap()
}

/// Index of the target a fresh bullet hits.
fn shoot(angle: i32, force: i32, targets: &[Target]) -> Option<usize> {
    Bullet::new(angle, force).unwrap().simulate_index(targets)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[test]
fn cells_round_half_to_even() {
    assert_eq!(to_cell((0.4, 0.6)), (0, 1));
    assert_eq!(to_cell((0.5, 1.5)), (0, 2));
    assert_eq!(to_cell((2.5, 3.5)), (2, 4));
    assert_eq!(to_cell((31.64, 15.93)), (32, 16));
}

#[test]
fn field_bounds() {
    assert!(in_bounds((0.0, 0.0)));
    assert!(in_bounds((MAX_X, MAX_Y)));
    assert!(!in_bounds((MAX_X + 0.001, 1.0)));
    assert!(!in_bounds((1.0, -0.001)));
    assert!(!in_bounds((1.0, MAX_Y + 0.001)));
}

#[test]
fn only_obstacles_left_is_vacuous_on_empty() {
    assert!(only_obstacles_left(&[]));
    assert!(only_obstacles_left(&[obstacle(3, 2), obstacle(5, 1)]));
    assert!(!only_obstacles_left(&[obstacle(3, 2), point(5, 1)]));
    assert!(!only_obstacles_left(&[boss(3, 2, 1)]));
}

// ── Bullet::simulate ──────────────────────────────────────────────────────────

#[test]
fn simulate_without_targets_misses() {
    let mut bullet = Bullet::new(45, 100).unwrap();
    assert!(bullet.simulate(&[]).is_none());
    assert!(!bullet.trajectory().is_empty());
}

#[test]
fn simulate_returns_the_hit_target() {
    let targets = [point(1, 1)];
    let mut bullet = Bullet::new(45, 100).unwrap();
    let hit = bullet.simulate(&targets).unwrap();
    assert!(std::ptr::eq(hit, &targets[0]));
}

#[test]
fn simulate_misses_ground_target_next_to_cannon() {
    assert_eq!(shoot(45, 100, &[point(1, 0)]), None);
}

#[test]
fn trajectory_starts_with_origin_twice() {
    let mut bullet = Bullet::new(45, 100).unwrap();
    bullet.simulate(&[]);
    let t = bullet.trajectory();
    assert_eq!(t[0], (0.0, 0.0));
    assert_eq!(t[1], (0.0, 0.0));
    assert!(t[2].0 > 0.0 && t[2].1 > 0.0);
}

#[test]
fn trajectory_stops_at_hit_cell() {
    let mut bullet = Bullet::new(45, 100).unwrap();
    bullet.simulate(&[point(1, 1)]);
    let t = bullet.trajectory();
    assert_eq!(t.len(), 5);
    assert_eq!(to_cell(*t.last().unwrap()), (1, 1));
    assert_eq!(bullet.cell(), (1, 1));
}

#[test]
fn trajectory_never_records_out_of_bounds_points() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let angle = rng.gen_range(1..=89);
        let force = rng.gen_range(0..=100);
        let mut bullet = Bullet::new(angle, force).unwrap();
        assert!(bullet.simulate(&[]).is_none());
        assert!(bullet.trajectory().iter().all(|&p| in_bounds(p)));
        assert!(!in_bounds(bullet.position()), "{angle}° {force}% stayed in bounds");
    }
}

#[test]
fn zero_force_drops_at_the_cannon() {
    let mut bullet = Bullet::new(30, 0).unwrap();
    assert!(bullet.simulate(&[]).is_none());
    assert_eq!(bullet.trajectory(), &[(0.0, 0.0), (0.0, 0.0)]);
}

#[test]
fn target_on_the_cannon_is_hit_immediately() {
    let mut bullet = Bullet::new(45, 0).unwrap();
    assert_eq!(bullet.simulate_index(&[point(0, 0)]), Some(0));
    assert_eq!(bullet.trajectory().len(), 1);
}

#[test]
fn obstacle_hit() {
    assert_eq!(shoot(45, 96, &[obstacle(32, 16)]), Some(0));
}

#[test]
fn obstacle_miss() {
    assert_eq!(shoot(45, 100, &[obstacle(32, 16)]), None);
}

#[test]
fn target_above_obstacle_hit() {
    let targets = [obstacle(32, 16), point(32, 16)];
    assert_eq!(shoot(45, 100, &targets), Some(1));
}

#[test]
fn target_above_obstacle_miss() {
    let targets = [obstacle(32, 16), point(32, 16)];
    assert_eq!(shoot(45, 69, &targets), None);
}

#[test]
fn boss_hit() {
    let targets = [obstacle(32, 16), point(32, 16), boss(28, 0, 2)];
    assert_eq!(shoot(45, 69, &targets), Some(2));
}

#[test]
fn boss_next_to_cannon_hit() {
    let targets = [obstacle(32, 16), point(32, 16), boss(1, 0, 2)];
    assert_eq!(shoot(45, 100, &targets), Some(2));
}

#[test]
fn boss_miss() {
    let targets = [obstacle(32, 16), point(32, 16), boss(28, 0, 2)];
    assert_eq!(shoot(45, 50, &targets), None);
}

#[test]
fn obstacle_shields_the_far_target() {
    let targets = [point(32, 0), obstacle(16, 8), point(16, 8)];
    assert_eq!(shoot(45, 71, &targets), Some(2));
    let targets = [point(32, 0), obstacle(16, 8)];
    assert_eq!(shoot(45, 71, &targets), Some(0));
}

#[test]
fn list_order_decides_shared_cells() {
    let first = [point(32, 16), obstacle(32, 17)];
    let second = [obstacle(32, 17), point(32, 16)];
    assert_eq!(shoot(45, 100, &first), Some(0));
    assert_eq!(shoot(45, 100, &second), Some(0));
}

#[test]
fn simulate_is_deterministic() {
    let mut rng = seeded_rng();
    let targets = [obstacle(20, 6), point(32, 0), boss(10, 10, 3), point(25, 12)];
    for _ in 0..50 {
        let angle = rng.gen_range(1..=89);
        let force = rng.gen_range(0..=100);
        let mut a = Bullet::new(angle, force).unwrap();
        let mut b = Bullet::new(angle, force).unwrap();
        assert_eq!(a.simulate_index(&targets), b.simulate_index(&targets));
        assert_eq!(a.trajectory(), b.trajectory());
    }
}

// ── Level::simulate_attempt ───────────────────────────────────────────────────

#[test]
fn attempt_hit_wins_level() {
    let mut level = Level::new(1, vec![point(32, 16), obstacle(32, 16)]).unwrap();
    let hit = level.simulate_attempt(45, 100).unwrap();
    assert_eq!(hit, Some(point(32, 16)));
    assert_eq!(level.attempts(), 0);
    assert!(level.result());
    assert_eq!(level.targets(), &[obstacle(32, 16)]);
    assert_eq!(level.state(), LevelState::Won);
}

#[test]
fn attempt_on_obstacle_loses_level() {
    let mut level = Level::new(1, vec![point(32, 16), obstacle(32, 16)]).unwrap();
    let hit = level.simulate_attempt(45, 90).unwrap();
    assert_eq!(hit, Some(obstacle(32, 16)));
    assert_eq!(level.attempts(), 0);
    assert!(!level.result());
    assert_eq!(level.targets().len(), 2);
    assert_eq!(level.state(), LevelState::Lost);
}

#[test]
fn attempt_records_trajectory() {
    let mut level = Level::new(2, vec![point(32, 0)]).unwrap();
    level.simulate_attempt(45, 50).unwrap();
    let first = level.trajectory().to_vec();
    assert!(!first.is_empty());

    level.simulate_attempt(45, 100).unwrap();
    assert_ne!(level.trajectory(), first.as_slice());

    let mut bullet = Bullet::new(45, 100).unwrap();
    bullet.simulate(&[point(32, 0)]);
    assert_eq!(level.trajectory(), bullet.trajectory());
}

#[test]
fn miss_still_costs_an_attempt() {
    let mut level = Level::new(3, vec![point(1, 0)]).unwrap();
    assert_eq!(level.simulate_attempt(45, 100).unwrap(), None);
    assert_eq!(level.attempts(), 2);
    assert!(!level.result());
    assert_eq!(level.state(), LevelState::Active);
}

#[test]
fn boss_survives_until_health_runs_out() {
    let mut level = Level::new(4, vec![boss(1, 0, 2)]).unwrap();

    let hit = level.simulate_attempt(45, 100).unwrap().unwrap();
    assert_eq!(hit.health(), Some(1));
    assert_eq!(level.targets().len(), 1);
    assert_eq!(level.targets()[0].health(), Some(1));
    assert!(!level.result());

    let hit = level.simulate_attempt(45, 100).unwrap().unwrap();
    assert_eq!(hit.health(), Some(0));
    assert!(level.targets().is_empty());
    assert!(level.result());
    assert_eq!(level.attempts(), 2);
    assert_eq!(level.state(), LevelState::Won);
}

#[test]
fn clearing_every_target_wins() {
    let mut level = Level::new(1, vec![point(1, 1)]).unwrap();
    level.simulate_attempt(45, 100).unwrap();
    assert!(level.targets().is_empty());
    assert!(level.result());
}

#[test]
fn invalid_shot_leaves_level_untouched() {
    let mut level = Level::new(2, vec![point(1, 1)]).unwrap();
    assert_eq!(level.simulate_attempt(0, 50), Err(GameError::Angle(0)));
    assert_eq!(level.simulate_attempt(90, 50), Err(GameError::Angle(90)));
    assert_eq!(level.simulate_attempt(45, 101), Err(GameError::Force(101)));
    assert_eq!(level.attempts(), 2);
    assert!(level.trajectory().is_empty());
    assert_eq!(level.targets().len(), 1);
    assert!(!level.result());
}

#[test]
fn attempts_never_go_below_zero() {
    let mut level = Level::new(1, vec![point(20, 20)]).unwrap();
    level.simulate_attempt(45, 10).unwrap();
    assert_eq!(level.state(), LevelState::Lost);
    // Nothing stops a caller from shooting again; the counter just stays put.
    level.simulate_attempt(45, 10).unwrap();
    assert_eq!(level.attempts(), 0);
}

#[test]
fn every_attempt_costs_exactly_one() {
    let mut rng = seeded_rng();
    let targets = vec![obstacle(20, 6), point(32, 0), boss(10, 10, 3), point(25, 12)];
    let mut level = Level::new(30, targets).unwrap();
    for remaining in (0..30).rev() {
        let before = level.targets().len();
        let angle = rng.gen_range(1..=89);
        let force = rng.gen_range(0..=100);
        let hit = level.simulate_attempt(angle, force).unwrap();
        assert_eq!(level.attempts(), remaining);
        assert!(level.targets().len() >= before.saturating_sub(1));
        if hit.is_none() {
            assert_eq!(level.targets().len(), before);
        }
        assert_eq!(level.result(), only_obstacles_left(level.targets()));
    }
}

// ── Campaign::advance ─────────────────────────────────────────────────────────

fn two_stage_campaign() -> Campaign {
    Campaign::new(vec![
        Level::new(2, vec![point(1, 1)]).unwrap(),
        Level::new(1, vec![obstacle(32, 16), point(32, 16)]).unwrap(),
    ])
}

#[test]
fn advance_waits_for_active_stage() {
    let mut campaign = two_stage_campaign();
    campaign.current_level_mut().unwrap().simulate_attempt(45, 10).unwrap();
    assert_eq!(campaign.advance(), CampaignStatus::InProgress);
    assert_eq!(campaign.stage_number(), 1);
}

#[test]
fn advance_through_all_stages_wins() {
    let mut campaign = two_stage_campaign();

    campaign.current_level_mut().unwrap().simulate_attempt(45, 100).unwrap();
    assert_eq!(campaign.advance(), CampaignStatus::InProgress);
    assert_eq!(campaign.stage_number(), 2);

    campaign.current_level_mut().unwrap().simulate_attempt(45, 100).unwrap();
    assert_eq!(campaign.advance(), CampaignStatus::Won);
    assert!(campaign.current_level().is_none());
    assert_eq!(campaign.stage_number(), 2);
}

#[test]
fn losing_a_stage_ends_the_campaign() {
    let mut campaign = two_stage_campaign();
    campaign.current_level_mut().unwrap().simulate_attempt(45, 100).unwrap();
    campaign.advance();

    campaign.current_level_mut().unwrap().simulate_attempt(45, 90).unwrap();
    assert_eq!(campaign.advance(), CampaignStatus::Lost);
    assert!(campaign.current_level_mut().is_none());
    assert_eq!(campaign.advance(), CampaignStatus::Lost);
}
