use snafu::Snafu;

pub type CustomResult<T> = Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{} already exists", what))]
    AlreadyExistsError { what: String },

    #[snafu(display("invalid name: {}", name))]
    InvalidNameError { name: String },

    #[snafu(display("event {} is full", event_id))]
    EventFullError { event_id: i32 },

    #[snafu(display("registration for event {} is closed", event_id))]
    RegistrationClosedError { event_id: i32 },

    #[snafu(display("event {} does not accept results in its current status", event_id))]
    ResultsNotOpenError { event_id: i32 },

    #[snafu(display("invalid result sheet: {}", reason))]
    InvalidResultSheetError { reason: String },

    #[snafu(display("unknown event status: {}", status))]
    UnknownStatusError { status: String },

    #[snafu(display("file does not exist: {}", path))]
    FileDoesNotExistError { path: String },

    #[snafu(display("permission denied: {}", path))]
    PermissionDeniedError { path: String },

    #[snafu(display("database error: {}", source))]
    DatabaseError { source: diesel::result::Error },
}

impl From<diesel::result::Error> for Error {
    fn from(source: diesel::result::Error) -> Self {
        Error::DatabaseError { source }
    }
}
