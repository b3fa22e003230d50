//! Centralized error types for the game.
//!
//! This module defines all error types used throughout the application,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur during game operation.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors in level or sprite configuration, detected at construction time.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("No animation set registered for entity kind: {0}")]
    MissingAnimationSet(String),

    #[error("Animation set for {kind} is missing its default state: {state}")]
    MissingDefaultState { kind: String, state: String },
}

/// Errors related to animation definitions.
#[derive(thiserror::Error, Debug)]
pub enum AnimationError {
    #[error("Invalid frame interval: {0}")]
    InvalidFrameInterval(f32),
}

/// Errors related to entity operations.
#[derive(thiserror::Error, Debug)]
pub enum EntityError {
    #[error("Companion entity no longer exists")]
    CompanionMissing,

    #[error("No player entity found")]
    PlayerMissing,
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
