pub mod trip;
pub mod summary;
pub mod settings;

pub use trip::*;
pub use summary::*;
pub use settings::*;
