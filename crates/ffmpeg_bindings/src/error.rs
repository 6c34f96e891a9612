#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not installed or not runnable")]
    NotInstalled(String),
    #[error("{program} exited with status {status:?}: {stderr}")]
    CommandFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("Could not parse media duration from '{0}'")]
    InvalidDuration(String),
    #[error("Slideshow has no frames")]
    NoFrames,
}
