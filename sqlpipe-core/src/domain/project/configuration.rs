// src/domain/project/configuration.rs

use crate::domain::record::{TableSpec, sale_table, store_table};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(rename = "data-path", default = "default_data_path")]
    pub data_path: String,

    #[serde(rename = "sql-path", default = "default_sql_path")]
    pub sql_path: String,

    #[serde(rename = "artifacts-path", default = "default_artifacts_path")]
    pub artifacts_path: String,

    #[serde(default = "default_database")]
    #[validate(length(min = 1, message = "Database file name cannot be empty"))]
    pub database: String,

    /// Per-connection statements applied before the clean script.
    #[serde(default = "default_session")]
    pub session: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub scripts: ScriptsConfig,

    #[serde(default = "default_loads")]
    #[validate(nested)]
    pub loads: Vec<LoadConfig>,
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct ScriptsConfig {
    #[validate(length(min = 1))]
    pub clean: String,
    #[validate(length(min = 1))]
    pub bootstrap: String,
    #[serde(default)]
    pub queries: Vec<String>,
}

/// One CSV file loaded into one table.
#[derive(Debug, Deserialize, Serialize, Validate, Clone, PartialEq)]
pub struct LoadConfig {
    #[validate(length(min = 1, message = "Load source cannot be empty"))]
    pub source: String,

    #[serde(flatten)]
    #[validate(nested)]
    pub table: TableSpec,
}

/// Absolute locations derived from a config and a project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub data_dir: PathBuf,
    pub sql_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    pub db_path: PathBuf,
}

impl ProjectConfig {
    pub fn paths(&self, project_dir: &Path) -> ProjectPaths {
        let artifacts_dir = project_dir.join(&self.artifacts_path);
        ProjectPaths {
            data_dir: project_dir.join(&self.data_path),
            sql_dir: project_dir.join(&self.sql_path),
            db_path: artifacts_dir.join(&self.database),
            artifacts_dir,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "retail".to_string(),
            version: default_version(),
            data_path: default_data_path(),
            sql_path: default_sql_path(),
            artifacts_path: default_artifacts_path(),
            database: default_database(),
            session: default_session(),
            scripts: ScriptsConfig::default(),
            loads: default_loads(),
        }
    }
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            clean: "case_retail_clean.sql".to_string(),
            bootstrap: "case_retail_bootstrap.sql".to_string(),
            queries: vec![
                "case_retail_query_store_count.sql".to_string(),
                "case_retail_query_sales_count.sql".to_string(),
                "case_retail_query_sales_aggregate.sql".to_string(),
                "case_retail_query_sales_by_category.sql".to_string(),
                "case_retail_query_kpi_revenue.sql".to_string(),
            ],
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_data_path() -> String {
    "data/retail".to_string()
}
fn default_sql_path() -> String {
    "sql/duckdb".to_string()
}
fn default_artifacts_path() -> String {
    "artifacts/duckdb".to_string()
}
fn default_database() -> String {
    "retail.duckdb".to_string()
}
fn default_session() -> Vec<String> {
    vec!["SET preserve_insertion_order = true".to_string()]
}
// store before sale: sale.store_id references store
fn default_loads() -> Vec<LoadConfig> {
    vec![
        LoadConfig {
            source: "store.csv".to_string(),
            table: store_table(),
        },
        LoadConfig {
            source: "sale.csv".to_string(),
            table: sale_table(),
        },
    ]
}
