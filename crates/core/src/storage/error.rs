use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Group",
            id: "G12345678901".to_string(),
        };
        assert_eq!(error.to_string(), "Group not found: G12345678901");
    }

    #[test]
    fn test_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "ContactEdge",
            id: "u-1/G1".to_string(),
        };
        assert_eq!(error.to_string(), "ContactEdge already exists: u-1/G1");
    }

    #[test]
    fn test_query_failed_display() {
        let error = RepositoryError::QueryFailed("disk I/O error".to_string());
        assert_eq!(error.to_string(), "Query failed: disk I/O error");
    }
}
