//! Divide & Conquer headless driver
//!
//! Runs a session at a fixed frame rate with a seeded autoplayer issuing line
//! requests, logging every notification. Useful for soak-testing the kernel.
//!
//! Usage: `divide-conquer [seed] [seconds]` (set `RUST_LOG=info` for events)

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use divide_conquer::sim::{Direction, EngineEvent, EngineMode};
use divide_conquer::{GameSession, SessionEvent, Settings};

/// Frame period of the driver loop
const FRAME_DT: f64 = 1.0 / 60.0;
/// Seconds between autoplayer line attempts
const THINK_INTERVAL: f64 = 0.75;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    let settings = Settings::load(std::path::Path::new("divide_conquer.json"));
    log::info!("Divide & Conquer (headless) seed={} duration={}s", seed, seconds);

    let mut session = GameSession::new(settings, seed);
    let mut player = Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);

    let mut now = 0.0;
    let mut next_think = THINK_INTERVAL;
    let mut splits = 0u32;
    let mut hits = 0u32;
    let mut games = 1u32;
    let mut best_level = 0u32;

    session.new_game(now);
    while now < seconds {
        now += FRAME_DT;

        if now >= next_think && session.engine().mode() == EngineMode::Bouncing {
            next_think = now + THINK_INTERVAL;
            if let Some((direction, point)) = pick_line(&session, &mut player) {
                session.request_line(direction, point);
            }
        }

        for event in session.tick(now) {
            match event {
                SessionEvent::Engine(EngineEvent::RegionsChanged { .. }) => splits += 1,
                SessionEvent::Engine(EngineEvent::BallHitLine { .. }) => hits += 1,
                SessionEvent::Engine(EngineEvent::AreaChanged { fraction_filled }) => {
                    log::debug!("{:.1}% filled", fraction_filled * 100.0);
                }
                SessionEvent::LevelUp { level, .. } => best_level = best_level.max(level),
                SessionEvent::GameOver { level } => {
                    best_level = best_level.max(level);
                    games += 1;
                    session.new_game(now);
                }
            }
        }
    }

    best_level = best_level.max(session.level());
    println!(
        "{:.0}s simulated: {} games, {} splits, {} line hits, best level {}",
        seconds, games, splits, hits, best_level
    );
    match session.save() {
        Ok(blob) => println!("final snapshot: {} bytes", blob.len()),
        Err(e) => log::error!("Snapshot failed: {}", e),
    }
}

/// Choose a random interior point of a random live region
fn pick_line(session: &GameSession, rng: &mut Pcg32) -> Option<(Direction, Vec2)> {
    let regions = session.engine().regions();
    if regions.is_empty() {
        return None;
    }
    let region = &regions[rng.random_range(0..regions.len())];
    let rect = region.rect;
    let point = Vec2::new(
        rect.left + rect.width() * rng.random_range(0.1f32..0.9),
        rect.top + rect.height() * rng.random_range(0.1f32..0.9),
    );
    let direction = if rect.width() >= rect.height() {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    Some((direction, point))
}
