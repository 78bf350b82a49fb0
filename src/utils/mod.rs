pub mod activation;
pub mod env_plan;
pub mod executor;
pub mod expand;
pub mod paths;
