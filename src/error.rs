use self::Error::*;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The column handed to a single imputation step was not sorted ascending.
    PreconditionViolation { column: Option<usize> },
    Configuration(ConfigurationError),
    /// The sampler raised while resolving a column.
    SamplerFailure {
        column: Option<usize>,
        source: anyhow::Error,
    },
    /// Covariate rows do not line up with the response.
    ShapeMismatch { expected: usize, actual: usize },
    /// A lower bound at or above the upper bound claimed more rows than exist.
    OverlappingBounds { lower: f64, upper: f64 },
    MissingValues { column: usize },
    InvalidTable(String),
    Cache(anyhow::Error),
}

/// Problems with how an imputer was set up or called. None of these mutate
/// any data.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    MissingBounds,
    BoundCountMismatch { columns: usize, upper: usize, lower: usize },
    NonFiniteBound { column: usize, value: f64 },
    UnsupportedColumnChoice(usize),
    DeterministicMultipleImputation(usize),
    ZeroImputations,
    ZeroSweeps,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ConfigurationError::*;
        match self {
            MissingBounds => write!(
                f,
                "both upper and lower censoring bounds must be provided, use None entries for unbounded sides"
            ),
            BoundCountMismatch { columns, upper, lower } => write!(
                f,
                "table has {} columns but received {} upper and {} lower bounds",
                columns, upper, lower
            ),
            NonFiniteBound { column, value } => {
                write!(f, "bound {} for column {} is not finite", value, column)
            }
            UnsupportedColumnChoice(n) => write!(
                f,
                "selecting {} covariate columns is not implemented, only all columns are supported",
                n
            ),
            DeterministicMultipleImputation(n) => write!(
                f,
                "{} imputations requested without posterior sampling, multiple imputation needs sample_posterior",
                n
            ),
            ZeroImputations => write!(f, "number of imputations must be at least one"),
            ZeroSweeps => write!(f, "at least one imputation sweep is required"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PreconditionViolation { column: Some(column) } => {
                write!(f, "column {} must be sorted ascending before imputation", column)
            }
            PreconditionViolation { column: None } => {
                write!(f, "values must be sorted ascending before imputation")
            }
            Configuration(e) => write!(f, "configuration error: {}", e),
            SamplerFailure {
                column: Some(column),
                source,
            } => write!(f, "sampler failed on column {}: {}", column, source),
            SamplerFailure { column: None, source } => write!(f, "sampler failed: {}", source),
            ShapeMismatch { expected, actual } => write!(
                f,
                "expected {} covariate rows to match the response but found {}",
                expected, actual
            ),
            OverlappingBounds { lower, upper } => write!(
                f,
                "lower bound {} and upper bound {} censor more values than the column holds",
                lower, upper
            ),
            MissingValues { column } => {
                write!(f, "column {} contains missing values which cannot be sorted", column)
            }
            InvalidTable(reason) => write!(f, "invalid table: {}", reason),
            Cache(e) => write!(f, "model cache error: {}", e),
        }
    }
}

impl Error {
    /// Attach the column index to errors raised before the column was known.
    pub(crate) fn in_column(self, index: usize) -> Self {
        match self {
            PreconditionViolation { column: None } => PreconditionViolation {
                column: Some(index),
            },
            SamplerFailure { column: None, source } => SamplerFailure {
                column: Some(index),
                source,
            },
            other => other,
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Configuration(e)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SamplerFailure { source, .. } => Some(&**source),
            Cache(e) => Some(&**e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
