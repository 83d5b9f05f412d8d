//! Game session: lives, levels and game over on top of the partition engine
//!
//! The engine only reports what happened; the session decides what it means.
//! A level is won once the claimed fraction passes the tuning threshold, the
//! next level adds a ball, and every few levels a life is handed back.

use glam::Vec2;

use crate::error::StateError;
use crate::settings::Settings;
use crate::sim::{Direction, EngineEvent, EngineMode, PartitionEngine};

/// Notification from a session call
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Forwarded engine notification
    Engine(EngineEvent),
    /// A new level started with `level` balls
    LevelUp { level: u32, bonus_life: bool },
    /// Lives ran out; the engine is `Paused` until the next `new_game`
    GameOver { level: u32 },
}

pub struct GameSession {
    engine: PartitionEngine,
    settings: Settings,
}

impl GameSession {
    pub fn new(mut settings: Settings, seed: u64) -> Self {
        settings.tuning = settings.tuning.sanitized();
        let engine = PartitionEngine::new(settings.tuning.clone(), seed);
        Self { engine, settings }
    }

    /// Start over at level one with the difficulty's starting lives
    pub fn new_game(&mut self, now: f64) -> Vec<SessionEvent> {
        let lives = self.settings.difficulty.lives_to_start();
        let balls = self.settings.tuning.new_game_balls;
        log::info!(
            "New game: {} difficulty, {} lives",
            self.settings.difficulty.as_str(),
            lives
        );
        self.engine.set_lives(lives);
        self.engine.reset(now, balls);
        self.apply_policy(now)
    }

    pub fn tick(&mut self, now: f64) -> Vec<SessionEvent> {
        self.engine.tick(now);
        self.apply_policy(now)
    }

    pub fn request_line(&mut self, direction: Direction, point: Vec2) -> bool {
        self.engine.request_line(direction, point)
    }

    pub fn pause(&mut self) -> bool {
        self.engine.pause()
    }

    pub fn resume(&mut self, now: f64) -> bool {
        self.engine.resume(now)
    }

    fn apply_policy(&mut self, now: f64) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        let mut pending = self.engine.drain_events();
        while !pending.is_empty() {
            for event in pending {
                let threshold = self.settings.tuning.level_up_threshold;
                let lives_out =
                    matches!(event, EngineEvent::BallHitLine { .. }) && self.engine.lives() == 0;
                let level_won = matches!(
                    event,
                    EngineEvent::AreaChanged { fraction_filled } if fraction_filled > threshold
                ) && self.engine.mode().is_running();

                out.push(SessionEvent::Engine(event));
                if lives_out {
                    self.engine.game_over();
                    log::info!("Game over at level {}", self.level());
                    out.push(SessionEvent::GameOver { level: self.level() });
                } else if level_won {
                    out.push(self.level_up(now));
                }
            }
            pending = self.engine.drain_events();
        }
        out
    }

    fn level_up(&mut self, now: f64) -> SessionEvent {
        let level = self.engine.ball_count() + 1;
        let bonus_life = level % self.settings.tuning.bonus_life_every == 0;
        if bonus_life {
            self.engine.add_life();
        }
        log::info!(
            "Level up: {} balls{}",
            level,
            if bonus_life { ", bonus life" } else { "" }
        );
        self.engine.reset(now, level);
        SessionEvent::LevelUp { level, bonus_life }
    }

    /// Current level (number of balls in play)
    pub fn level(&self) -> u32 {
        self.engine.ball_count()
    }

    pub fn lives(&self) -> u32 {
        self.engine.lives()
    }

    pub fn is_game_over(&self) -> bool {
        self.engine.mode() == EngineMode::Paused
    }

    pub fn engine(&self) -> &PartitionEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn save(&self) -> Result<String, StateError> {
        self.engine.serialize()
    }

    pub fn restore(mut settings: Settings, blob: &str) -> Result<Self, StateError> {
        settings.tuning = settings.tuning.sanitized();
        let engine = PartitionEngine::deserialize(settings.tuning.clone(), blob)?;
        log::info!(
            "Restored session: level {}, {} lives, {:?}",
            engine.ball_count(),
            engine.lives(),
            engine.mode()
        );
        Ok(Self { engine, settings })
    }
}
