pub mod asset;
pub mod object;

pub use asset::*;
pub use object::*;
