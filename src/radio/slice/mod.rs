mod macros;
mod ro;
mod rw;

pub use ro::ROSlice;
pub use rw::RWSlice;
