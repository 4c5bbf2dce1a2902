//! Quetz API record types.

mod channel;
mod member;
mod package;
mod role;
mod upload;
mod user;

pub use channel::*;
pub use member::*;
pub use package::*;
pub use role::*;
pub use upload::*;
pub use user::*;
