pub mod project;

pub use crate::domain::project::{ProjectConfig, ProjectPaths};
pub use project::{load_config_file, load_project_config};
