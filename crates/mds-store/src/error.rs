//! Store error type.

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Unique key collision on insert.
    AlreadyExists,
    /// Database cannot be reached or the pool is exhausted.
    Unavailable,
    /// Stored data cannot be decoded.
    Corrupt,
    /// In-memory state was poisoned by a panicking writer.
    Poisoned,
    /// Other database error.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    /// Backend identifier (e.g., "Sqlite", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// A stored value failed to decode.
    #[must_use]
    pub fn corrupt(what: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Corrupt).with_source(CorruptValue(what.into()))
    }
}

#[derive(Debug)]
struct CorruptValue(String);

impl std::fmt::Display for CorruptValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CorruptValue {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreErrorKind::AlreadyExists,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreErrorKind::Unavailable
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => StoreErrorKind::Corrupt,
            _ => StoreErrorKind::Other,
        };
        Self::new(kind).with_backend("Sqlite").with_source(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::AlreadyExists => "Already exists",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Corrupt => "Corrupt data",
            StoreErrorKind::Poisoned => "Poisoned state",
            StoreErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_simple() {
        assert_eq!(StoreError::new(StoreErrorKind::Unavailable).to_string(), "Unavailable");
    }

    #[test]
    fn test_display_full() {
        let err = StoreError::corrupt("bad timestamp `x`").with_backend("Sqlite");
        assert_eq!(err.to_string(), "[Sqlite] Corrupt data: bad timestamp `x`");
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, StoreErrorKind::Unavailable);
        assert_eq!(err.backend, Some("Sqlite"));
        assert!(err.downcast_source::<sqlx::Error>().is_some());
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        assert_eq!(
            StoreError::from(sqlx::Error::RowNotFound).kind,
            StoreErrorKind::Other
        );
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
