//! Native value representations for scalar literals.

mod scalar;

pub use self::scalar::ScalarValue;
