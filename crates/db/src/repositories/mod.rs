//! Repository layer: one zero-sized struct per table with async query functions.

mod route_mix_repo;
mod trunk_repo;

pub use route_mix_repo::RouteMixRepo;
pub use trunk_repo::TrunkRepo;
