use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Payload checks that run after decoding and before any store call
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        for (index, item) in self.iter().enumerate() {
            item.validate().map_err(|e| ValidationError::Entry {
                index,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }
}
