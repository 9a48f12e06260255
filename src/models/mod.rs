mod matrix;
pub use self::matrix::*;

mod primitives;
pub use self::primitives::*;

mod problem;
pub use self::problem::*;

mod time_window;
pub use self::time_window::*;
