mod database;
mod retry;
mod slider_repo;
mod store;

pub use database::Database;
pub use slider_repo::SliderRepository;
pub use store::SliderStore;
