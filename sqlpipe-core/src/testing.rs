// sqlpipe-core/src/testing.rs
//
// Scratch copy of demos/retail for pipeline tests.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::application::pipeline::Pipeline;
use crate::domain::project::{ProjectConfig, ProjectPaths};
use crate::infrastructure::config::load_config_file;
use crate::ports::logger::PipelineLogger;

pub struct RetailProject {
    _tmp: TempDir,
    root: PathBuf,
    pub config: ProjectConfig,
}

impl RetailProject {
    pub fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let demo = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("demos/retail");

        let root = tmp.path().join("retail");
        fs::create_dir_all(&root)?;
        let mut options = fs_extra::dir::CopyOptions::new();
        options.content_only = true;
        fs_extra::dir::copy(&demo, &root, &options)
            .map_err(|e| anyhow::anyhow!("copying {:?}: {}", demo, e))?;

        // leftovers from a manual run of the demo
        let artifacts = root.join("artifacts");
        if artifacts.exists() {
            fs::remove_dir_all(&artifacts)?;
        }

        let config = load_config_file(&root.join("sqlpipe.yaml"))?;
        Ok(Self {
            _tmp: tmp,
            root,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self) -> ProjectPaths {
        self.config.paths(&self.root)
    }

    pub fn db_path(&self) -> PathBuf {
        self.paths().db_path
    }

    pub fn pipeline<'a>(&'a self, logger: &'a dyn PipelineLogger) -> Pipeline<'a> {
        Pipeline::new(&self.config, self.paths(), logger)
    }

    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        fs::write(self.root.join(rel), content)?;
        Ok(())
    }

    pub fn append(&self, rel: &str, content: &str) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(self.root.join(rel))?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}
