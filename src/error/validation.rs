use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Invalid stage '{value}'. Expected 'DURATION:TARGET' (e.g., 30s:5).")]
    InvalidStageFormat { value: String },
    #[error("Invalid stage target in '{value}': {source}")]
    InvalidStageTarget {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid stage duration in '{value}': {source}")]
    InvalidStageDuration {
        value: String,
        #[source]
        source: Box<ValidationError>,
    },
    #[cfg(test)]
    #[error("{0}")]
    Test(String),
}

#[cfg(test)]
impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::Test(value)
    }
}

#[cfg(test)]
impl From<&'static str> for ValidationError {
    fn from(value: &'static str) -> Self {
        ValidationError::Test(value.to_owned())
    }
}
