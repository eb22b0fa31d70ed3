#[cfg(test)]
mod fixture;
pub use fixture::Fixture;

#[cfg(test)]
mod runner;
pub use runner::GendistRunnerBuilder;
