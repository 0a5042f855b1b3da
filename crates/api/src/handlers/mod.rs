pub mod routemix;
pub mod trunks;
