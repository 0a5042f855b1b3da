pub mod route_mix;
pub mod trunk;
