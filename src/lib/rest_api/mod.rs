mod rest_api;
mod services;
mod sites_list;
pub mod sites_stats;
mod detections_list;
mod sites_mutations;
mod toml_mutations;

pub use self::{rest_api::*, services::*};
