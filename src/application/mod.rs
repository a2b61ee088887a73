mod camera;
mod clock;
mod session;

pub use camera::Camera;
pub use clock::Clock;
pub use session::{Command, RunState, Session, SessionConfig};
