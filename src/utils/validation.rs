use validator::Validate;

use crate::error::Result;

/// Runs `validator` rules and converts failures into the crate error.
pub fn validate<T: Validate>(val: &T) -> Result<()> {
    val.validate()?;
    Ok(())
}
