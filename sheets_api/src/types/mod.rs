mod value_range;
pub use self::value_range::{Row, ValueRange};
