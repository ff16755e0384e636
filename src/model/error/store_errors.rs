/// failures of a single durable store operation
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StoreError {
    /// the value does not have the shape required by its key
    SchemaViolation,
    /// the underlying medium could not be read from or written to
    StorageFault,
}

/// failures while opening a durable store
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpenStoreError {
    /// the directory holding the store could not be created
    CreateDirectory,
    /// no connection to the store file could be made
    Connection,
    /// the store file exists but its tables could not be created or checked
    Initialize,
    /// a schema migration failed, nothing was committed
    Migration,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseKeyError {
    /// the key is not one of the known slots
    UnknownKey(String),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseVersionError {
    /// the version is not in `major.minor.patch` form
    Malformed(String),
}
