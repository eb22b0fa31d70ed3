use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to build the global thread pool")]
    BuildThreadPool(#[source] rayon::ThreadPoolBuildError),

    #[error("Failed to create output directory {0}")]
    CreateOutputDir(String, #[source] std::io::Error),
}
