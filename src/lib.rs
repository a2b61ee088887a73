// Domain layer - grid state and the stepping rule
pub mod domain;

// Application layer - camera, clock, session state machine
pub mod application;

// Infrastructure - input polling, rendering, disk persistence, CLI
pub mod config;
pub mod input;
pub mod persistence;
pub mod rendering;

// Re-exports for convenience
pub use application::{Camera, Command, RunState, Session, SessionConfig};
pub use config::Config;
pub use domain::{Cell, Engine, FadePolicy, Grid, Topology};
