pub mod presenter;
pub mod query;
pub mod session;
pub mod symbology;

pub use presenter::*;
pub use query::*;
pub use session::*;
pub use symbology::*;
