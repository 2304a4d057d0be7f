use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold out of range, empty credentials, etc.).
    ConfigValidation(String),
    /// An input file or payload could not be parsed.
    InputParse { source: String, message: String },
    /// Missing required column in CSV input.
    MissingColumn { source: String, column: String },
    /// A source adapter failed to produce its listing.
    Source { source: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InputParse { source, message } => {
                write!(f, "input '{source}': {message}")
            }
            Self::MissingColumn { source, column } => {
                write!(f, "input '{source}': missing column '{column}'")
            }
            Self::Source { source, message } => {
                write!(f, "source '{source}': {message}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<std::io::Error> for ReconError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
