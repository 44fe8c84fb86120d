/// An error that can occur during command handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user-defined command function returned an error.
    #[error("command error: {0}")]
    Command(#[source] anyhow::Error),
    /// The in-memory structure did not match the received interaction.
    #[error("command structure mismatch: {0}")]
    StructureMismatch(&'static str),
}

impl Error {
    /// Constructs a new [`Error::Command`] variant.
    pub fn command(error: impl Into<anyhow::Error>) -> Self {
        Self::Command(error.into())
    }

    /// Constructs a new [`Error::StructureMismatch`] variant.
    #[cold]
    pub fn structure_mismatch(message: &'static str) -> Self {
        Self::StructureMismatch(message)
    }
}
