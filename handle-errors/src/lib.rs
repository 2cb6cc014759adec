use config::ConfigError;
use sqlx::migrate::MigrateError;
use std::io::Error as StdIoError;
use tracing::{event, instrument, Level};
use warp::{
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{InvalidQuery, Reject},
    Rejection, Reply,
};

#[derive(Debug)]
pub enum Error {
    MissingField(&'static str),
    InvalidId(&'static str),
    MissingReference(&'static str),
    Conflict(&'static str),
    NotFound,
    Timeout,
    DatabaseQueryError(sqlx::Error),
    MigrationError(MigrateError),
    ConfigError(ConfigError),
    StdFileError(StdIoError),
    InvalidSeed(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::MissingField(field) => write!(f, "Missing `{}` in request body", field),
            Error::InvalidId(field) => write!(f, "Invalid `{}`", field),
            Error::MissingReference(field) => write!(f, "The `{}` does not exist", field),
            Error::Conflict(resource) => write!(f, "The {} name already exists", resource),
            Error::NotFound => write!(f, "Not found"),
            Error::Timeout => write!(f, "Request timed out"),
            Error::DatabaseQueryError(ref e) => {
                write!(f, "Query could not be executed: {}", e)
            }
            Error::MigrationError(ref e) => write!(f, "Cannot migrate data: {}", e),
            Error::ConfigError(ref e) => write!(f, "Cannot load configuration: {}", e),
            Error::StdFileError(ref e) => write!(f, "Cannot read file: {}", e),
            Error::InvalidSeed(ref e) => write!(f, "Cannot parse seed data: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::ConfigError(e)
    }
}

impl From<MigrateError> for Error {
    fn from(e: MigrateError) -> Self {
        Error::MigrationError(e)
    }
}

/// Postgres `unique_violation`.
const DUPLICATE_KEY: &str = "23505";

impl Error {
    /// Classifies a failed write against a collection with a unique `name`.
    /// Duplicate-key violations become `Conflict`, everything else stays a
    /// database error.
    pub fn from_write(e: sqlx::Error, resource: &'static str) -> Self {
        if let sqlx::Error::Database(err) = &e {
            if err.code().as_deref() == Some(DUPLICATE_KEY) {
                return Error::Conflict(resource);
            }
        }
        Error::DatabaseQueryError(e)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidId(_)
            | Error::MissingReference(_)
            | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        let status = error.status();
        if status.is_server_error() {
            event!(Level::ERROR, "{}", error);
        } else {
            event!(Level::WARN, "{}", error);
        }
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error".to_string(),
            _ => error.to_string(),
        };
        Ok(warp::reply::with_status(message, status))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::WARN, "{}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::FORBIDDEN,
        ))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::WARN, "{}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::BAD_REQUEST,
        ))
    } else if let Some(error) = r.find::<InvalidQuery>() {
        event!(Level::WARN, "{}", error);
        Ok(warp::reply::with_status(
            error.to_string(),
            StatusCode::BAD_REQUEST,
        ))
    } else {
        Ok(warp::reply::with_status(
            "Route not found".to_string(),
            StatusCode::NOT_FOUND,
        ))
    }
}
