/// the Luby series for restart intervals
pub mod luby;

pub use self::luby::*;
