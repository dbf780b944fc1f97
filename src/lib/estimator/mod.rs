mod flow;
mod speed;
mod confidence;
mod estimator;

pub use self::{flow::*, speed::*, confidence::*, estimator::*};
