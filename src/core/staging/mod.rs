pub mod manager;

pub use manager::StagingManager;
