mod redis_message;
mod redis_publisher;

pub use self::{redis_message::*, redis_publisher::*};
