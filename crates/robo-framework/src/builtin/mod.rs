//! Built-in handlers and adapters shipped with the framework.
//!
//! | Item | Kind | Trigger | Behaviour |
//! |------|------|---------|-----------|
//! | [`Echo`] | handler | `^echo\s+(?P<message>.+)` | replies the message |
//! | [`Ping`] | handler | `^ping$` | replies `pong` |
//! | [`Help`] | handler | `^help(?:\s+(?P<filter>.+))?$` | lists documented triggers |
//! | [`NullAdapter`] | adapter | | records outbound messages |
//!
//! The three handlers are what [`Robot::register_defaults`] registers.
//!
//! [`Robot::register_defaults`]: crate::robot::Robot::register_defaults

mod echo;
mod help;
mod null;
mod ping;

pub use echo::Echo;
pub use help::Help;
pub use null::NullAdapter;
pub use ping::Ping;
