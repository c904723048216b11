pub mod animation;
pub mod ordering;
pub mod region;
pub mod selection;

pub use animation::*;
pub use ordering::*;
pub use region::*;
pub use selection::*;
