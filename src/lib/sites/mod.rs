mod sites;
mod detection;

pub use self::{sites::*, detection::*};
