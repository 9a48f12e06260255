mod context;
pub use self::context::*;
mod evaluate;
pub use self::evaluate::*;
mod individual;
pub use self::individual::*;
mod penalty;
pub use self::penalty::*;

pub mod improvement;
