/// Errors surfaced by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Already Exists: {0}")]
    AlreadyExists(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Database Error: {0}")]
    Database(String),

    #[error("Connection Error: {0}")]
    Connection(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RepositoryError::NotFound(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        RepositoryError::AlreadyExists(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        RepositoryError::Validation(msg.into())
    }

    pub fn database<T: Into<String>>(msg: T) -> Self {
        RepositoryError::Database(msg.into())
    }

    pub fn connection<T: Into<String>>(msg: T) -> Self {
        RepositoryError::Connection(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RepositoryError::Serialization(msg.into())
    }
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::Write(_) => {
                // E11000 is the duplicate key error code
                let msg = err.to_string();
                if msg.contains("E11000") {
                    RepositoryError::AlreadyExists(format!("Duplicate key: {}", err))
                } else {
                    RepositoryError::Database(format!("Write error: {}", err))
                }
            }
            ErrorKind::Authentication { .. } => {
                RepositoryError::Connection(format!("Authentication failed: {}", err))
            }
            ErrorKind::InvalidArgument { .. } => {
                RepositoryError::Validation(format!("Invalid argument: {}", err))
            }
            ErrorKind::Io(_) => RepositoryError::Connection(format!("IO error: {}", err)),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<bson::ser::Error> for RepositoryError {
    fn from(err: bson::ser::Error) -> Self {
        RepositoryError::Serialization(format!("BSON serialization error: {}", err))
    }
}

impl From<bson::de::Error> for RepositoryError {
    fn from(err: bson::de::Error) -> Self {
        RepositoryError::Serialization(format!("BSON deserialization error: {}", err))
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
