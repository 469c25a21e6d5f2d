pub type VisResult<T> = Result<T, VisError>;

/// Structural problems with an input table or an enumerated field.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} has to be one of the following: {} (got '{value}')", .allowed.join(", "))]
    InvalidValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{field} has to be numeric (got '{value}')")]
    NotNumeric { field: String, value: String },

    #[error("{table} table is missing mandatory column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("{table} table, line {line}: column '{column}' value '{value}' is not a number")]
    InvalidNumber {
        table: String,
        line: usize,
        column: String,
        value: String,
    },

    #[error("{table} table, line {line}: mandatory column '{column}' is empty")]
    EmptyCell {
        table: String,
        line: usize,
        column: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum VisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "plot {plot_id}: yValues must be specified if multiple different observables are available ({})",
        .candidates.join(", ")
    )]
    Ambiguity {
        plot_id: String,
        candidates: Vec<String>,
    },

    #[error(
        "plot {plot_id}, x = {x_value}: datapoints with inconsistent noiseParameters ({})",
        .values.join(", ")
    )]
    InconsistentNoise {
        plot_id: String,
        x_value: String,
        values: Vec<String>,
    },

    #[error("plot {plot_id}, x = {x_value}: {reason}")]
    UnsupportedMode {
        plot_id: String,
        x_value: String,
        reason: String,
    },

    #[error("{0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
}
