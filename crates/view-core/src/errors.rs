pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// A read or seek on the underlying stream failed while building the view.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// The file backing a view could not be opened or mapped.
    #[error("opening {}: {source}", path.display())]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line index chunk size must be at least 1 byte (got {0})")]
    InvalidChunkSize(usize),
}

impl ViewError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| ViewError::Io { context, source }
    }
}
