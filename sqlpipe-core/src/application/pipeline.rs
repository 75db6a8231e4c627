// sqlpipe-core/src/application/pipeline.rs

use duckdb::{Connection, Transaction};
use std::fs;
use std::path::PathBuf;
use tracing::instrument;

use crate::application::loader::load_source;
use crate::application::report::run_query;
use crate::application::script::{apply_session, run_script};
use crate::domain::project::{ProjectConfig, ProjectPaths};
use crate::domain::report::QueryReport;
use crate::domain::stage::Stage;
use crate::error::PipelineError;
use crate::infrastructure::adapters::duckdb::{close_database, open_database};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::logger::PipelineLogger;

/// What a successful run leaves behind, besides the database file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub db_path: PathBuf,
    /// (table, rows inserted), in load order
    pub loaded: Vec<(String, usize)>,
    /// one report per query script, in declared order
    pub reports: Vec<QueryReport>,
}

impl RunSummary {
    pub fn rows_loaded(&self, table: &str) -> Option<usize> {
        self.loaded
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, n)| *n)
    }

    pub fn report(&self, name: &str) -> Option<&QueryReport> {
        self.reports.iter().find(|r| r.name == name)
    }
}

/// Pipeline Orchestrator.
///
/// Owns the single connection of a run and drives the fixed stage sequence:
/// INIT, PRAGMA_SETUP, CLEAN, BOOTSTRAP, LOAD(each table), COMMIT, QUERY(each
/// script), CLOSE. Once INIT has opened the connection, CLOSE runs on every
/// exit path; a failed load is rolled back explicitly before that.
pub struct Pipeline<'a> {
    config: &'a ProjectConfig,
    paths: ProjectPaths,
    logger: &'a dyn PipelineLogger,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ProjectConfig, paths: ProjectPaths, logger: &'a dyn PipelineLogger) -> Self {
        Self {
            config,
            paths,
            logger,
        }
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    #[instrument(skip(self), fields(project = %self.config.name))]
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        self.logger.info(&format!(
            "START pipeline {} (v{})",
            self.config.name, self.config.version
        ));
        self.logger
            .info(&format!("DATA_DIR: {}", self.paths.data_dir.display()));
        self.logger
            .info(&format!("SQL_DIR: {}", self.paths.sql_dir.display()));
        self.logger
            .info(&format!("DB_PATH: {}", self.paths.db_path.display()));

        let mut conn = self.stage(Stage::Init, || self.init())?;
        let outcome = self.run_stages(&mut conn);
        let result = self.close(conn, outcome);

        if result.is_ok() {
            self.logger
                .info(&format!("END pipeline {}", self.config.name));
        }
        result
    }

    fn init(&self) -> Result<Connection, PipelineError> {
        let dir = &self.paths.artifacts_dir;
        fs::create_dir_all(dir).map_err(|source| InfrastructureError::OutputDirectory {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(open_database(&self.paths.db_path)?)
    }

    fn run_stages(&self, conn: &mut Connection) -> Result<RunSummary, PipelineError> {
        self.stage(Stage::PragmaSetup, || {
            apply_session(conn, &self.config.session, self.logger)
        })?;

        let scripts = &self.config.scripts;
        self.stage(Stage::Clean, || {
            run_script(conn, &self.paths.sql_dir.join(&scripts.clean), self.logger)
        })?;
        self.stage(Stage::Bootstrap, || {
            run_script(conn, &self.paths.sql_dir.join(&scripts.bootstrap), self.logger)
        })?;

        let loaded = self.load_and_commit(conn)?;

        let mut reports = Vec::with_capacity(scripts.queries.len());
        for query in &scripts.queries {
            let report = self.stage(Stage::Query(query.clone()), || {
                let path = self.paths.sql_dir.join(query);
                self.logger.info("");
                self.logger
                    .info(&format!("RUN SQL query: {}", path.display()));
                run_query(conn, &path)
            })?;
            self.log_report(&report);
            reports.push(report);
        }

        Ok(RunSummary {
            db_path: self.paths.db_path.clone(),
            loaded,
            reports,
        })
    }

    /// LOAD(..) stages and COMMIT share one transaction.
    fn load_and_commit(&self, conn: &mut Connection) -> Result<Vec<(String, usize)>, PipelineError> {
        let tx = conn
            .transaction()
            .map_err(|source| InfrastructureError::Transaction {
                action: "begin",
                source,
            })?;

        let loaded = match self.load_all(&tx) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.rollback(tx);
                return Err(err);
            }
        };

        self.stage(Stage::Commit, || {
            tx.commit()
                .map_err(|source| InfrastructureError::Transaction {
                    action: "commit",
                    source,
                })?;
            self.logger.info("COMMIT: data load complete");
            Ok(())
        })?;
        Ok(loaded)
    }

    fn load_all(&self, tx: &Transaction<'_>) -> Result<Vec<(String, usize)>, PipelineError> {
        let mut loaded = Vec::with_capacity(self.config.loads.len());
        for load in &self.config.loads {
            let table = load.table.name.clone();
            let inserted = self.stage(Stage::Load(table.clone()), || {
                load_source(tx, load, &self.paths.data_dir, self.logger)
            })?;
            loaded.push((table, inserted));
        }
        Ok(loaded)
    }

    // Ne jamais compter sur close() pour jeter le travail non commité.
    fn rollback(&self, tx: Transaction<'_>) {
        match tx.rollback() {
            Ok(()) => self.logger.warn("ROLLBACK: data load discarded"),
            Err(e) => self.logger.error(&format!("ROLLBACK failed: {}", e)),
        }
    }

    fn close(
        &self,
        conn: Connection,
        outcome: Result<RunSummary, PipelineError>,
    ) -> Result<RunSummary, PipelineError> {
        self.logger.info(&format!("START {}", Stage::Close));
        let closed = close_database(conn, &self.paths.db_path);

        match (outcome, closed) {
            (outcome, Ok(())) => {
                self.logger.info(&format!("END {}", Stage::Close));
                outcome
            }
            (Ok(_), Err(close_err)) => {
                let err = PipelineError::from(close_err);
                self.logger
                    .error(&format!("FAILED {}: {}", Stage::Close, err));
                Err(err)
            }
            // the stage error is the one worth reporting
            (Err(err), Err(close_err)) => {
                self.logger
                    .error(&format!("FAILED {}: {}", Stage::Close, close_err));
                Err(err)
            }
        }
    }

    fn log_report(&self, report: &QueryReport) {
        self.logger.info("====================================");
        self.logger.info(&report.name);
        self.logger.info("====================================");
        for line in report.lines() {
            self.logger.info(&line);
        }
    }

    fn stage<T>(
        &self,
        stage: Stage,
        body: impl FnOnce() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        self.logger.info(&format!("START {}", stage));
        match body() {
            Ok(value) => {
                self.logger.info(&format!("END {}", stage));
                Ok(value)
            }
            Err(err) => {
                self.logger.error(&format!("FAILED {}: {}", stage, err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::infrastructure::logging::MemoryLogger;
    use crate::testing::RetailProject;
    use anyhow::Result;
    use std::path::Path;

    fn count(db_path: &Path, table: &str) -> Result<i64> {
        let conn = open_database(db_path)?;
        let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        close_database(conn, db_path)?;
        Ok(n)
    }

    #[test]
    fn test_round_trip_counts_and_aggregates() -> Result<()> {
        let project = RetailProject::new()?;
        let logger = MemoryLogger::new();
        let summary = project.pipeline(&logger).run()?;

        assert_eq!(summary.rows_loaded("store"), Some(3));
        assert_eq!(summary.rows_loaded("sale"), Some(5));
        assert_eq!(summary.reports.len(), 5);

        let store_count = summary.report("case_retail_query_store_count.sql").unwrap();
        assert_eq!(store_count.scalar(), Some("3"));
        let sale_count = summary.report("case_retail_query_sales_count.sql").unwrap();
        assert_eq!(sale_count.scalar(), Some("5"));

        // 45.50 + 199.99 + 62.25 + 80.00 + 149.50
        let aggregate = summary.report("case_retail_query_sales_aggregate.sql").unwrap();
        insta::assert_snapshot!(aggregate.lines().join("\n"), @r"
        sale_count, total_quantity, total_amount, avg_amount
        5, 12, 537.24, 107.45
        ");

        let by_category = summary
            .report("case_retail_query_sales_by_category.sql")
            .unwrap();
        insta::assert_snapshot!(by_category.lines().join("\n"), @r"
        product_category, sale_count, total_quantity, total_amount
        Electronics, 2, 2, 349.49
        Grocery, 2, 8, 107.75
        Apparel, 1, 2, 80.0
        ");

        let kpi = summary.report("case_retail_query_kpi_revenue.sql").unwrap();
        insta::assert_snapshot!(kpi.lines().join("\n"), @r"
        store_id, store_name, region, revenue
        S001, Downtown Market, Central, 245.49
        S002, Riverside Goods, East, 211.75
        S003, Prairie Outlet, West, 80.0
        ");
        Ok(())
    }

    #[test]
    fn test_stages_run_in_fixed_order() -> Result<()> {
        let project = RetailProject::new()?;
        let logger = MemoryLogger::new();
        project.pipeline(&logger).run()?;

        let order = [
            "START INIT",
            "START PRAGMA_SETUP",
            "START CLEAN",
            "START BOOTSTRAP",
            "START LOAD(store)",
            "DONE loading store rows: 3",
            "START LOAD(sale)",
            "START COMMIT",
            "COMMIT: data load complete",
            "START QUERY(case_retail_query_store_count.sql)",
            "START QUERY(case_retail_query_kpi_revenue.sql)",
            "START CLOSE",
            "END CLOSE",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|marker| logger.position(marker).expect(marker))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        Ok(())
    }

    #[test]
    fn test_reversed_load_order_hits_foreign_key() -> Result<()> {
        let project = RetailProject::new()?;
        let mut config = project.config.clone();
        config.loads.reverse();

        let logger = MemoryLogger::new();
        let err = Pipeline::new(&config, project.paths(), &logger)
            .run()
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Infrastructure(InfrastructureError::ScriptExecution { .. })
        ));
        assert!(logger.position("FAILED LOAD(sale)").is_some());
        assert_eq!(count(&project.db_path(), "sale")?, 0);
        Ok(())
    }

    #[test]
    fn test_malformed_sale_rolls_back_whole_load() -> Result<()> {
        let project = RetailProject::new()?;
        project.append("data/retail/sale.csv", "T006,S001,Grocery,many,10.00,2026-01-09\n")?;

        let logger = MemoryLogger::new();
        let err = project.pipeline(&logger).run().unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Domain(DomainError::RecordCoercion { ref field, row: 6, .. }) if field == "quantity"
        ));
        assert_eq!(logger.count("LOAD CSV -> table sale"), 1);
        assert_eq!(logger.count("DONE loading sale"), 0);
        assert!(logger.position("ROLLBACK: data load discarded").is_some());
        assert_eq!(logger.count("COMMIT: data load complete"), 0);

        assert_eq!(count(&project.db_path(), "sale")?, 0);
        // rollback covers the whole load transaction, store included
        assert_eq!(count(&project.db_path(), "store")?, 0);
        Ok(())
    }

    #[test]
    fn test_failed_rerun_leaves_no_partial_sale_rows() -> Result<()> {
        let project = RetailProject::new()?;
        project.pipeline(&MemoryLogger::new()).run()?;

        // unknown store: the 6th sale violates the foreign key mid-load
        project.append("data/retail/sale.csv", "T006,S999,Grocery,1,10.00,2026-01-09\n")?;
        let logger = MemoryLogger::new();
        assert!(project.pipeline(&logger).run().is_err());

        assert!(logger.position("FAILED LOAD(sale)").is_some());
        assert_eq!(count(&project.db_path(), "sale")?, 0);
        Ok(())
    }

    #[test]
    fn test_rerun_is_idempotent() -> Result<()> {
        let project = RetailProject::new()?;
        let first = project.pipeline(&MemoryLogger::new()).run()?;
        let second = project.pipeline(&MemoryLogger::new()).run()?;

        assert_eq!(first.loaded, second.loaded);
        assert_eq!(first.reports, second.reports);
        assert_eq!(count(&project.db_path(), "sale")?, 5);
        Ok(())
    }

    #[test]
    fn test_missing_query_still_closes_once() -> Result<()> {
        let project = RetailProject::new()?;
        let mut config = project.config.clone();
        config.scripts.queries.insert(1, "case_retail_query_missing.sql".to_string());

        let logger = MemoryLogger::new();
        let err = Pipeline::new(&config, project.paths(), &logger)
            .run()
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Infrastructure(InfrastructureError::ScriptNotFound { .. })
        ));
        assert_eq!(logger.count("END CLOSE"), 1);
        assert_eq!(logger.count("START QUERY("), 2);

        // handle released: the file can move and reopen right away
        let moved = project.root().join("moved.duckdb");
        std::fs::rename(project.db_path(), &moved)?;
        assert_eq!(count(&moved, "store")?, 3);
        Ok(())
    }

    #[test]
    fn test_bootstrap_failure_skips_load() -> Result<()> {
        let project = RetailProject::new()?;
        project.write("sql/duckdb/case_retail_bootstrap.sql", "CREATE TABLE store (;")?;

        let logger = MemoryLogger::new();
        let err = project.pipeline(&logger).run().unwrap_err();

        assert!(err.to_string().contains("case_retail_bootstrap.sql"));
        assert!(logger.position("FAILED BOOTSTRAP").is_some());
        assert!(logger.position("START LOAD(store)").is_none());
        assert_eq!(logger.count("END CLOSE"), 1);
        Ok(())
    }

    #[test]
    fn test_header_only_sale_file_loads_zero_rows() -> Result<()> {
        let project = RetailProject::new()?;
        project.write(
            "data/retail/sale.csv",
            "sale_id,store_id,product_category,quantity,amount,sale_date\n",
        )?;

        let summary = project.pipeline(&MemoryLogger::new()).run()?;
        assert_eq!(summary.rows_loaded("sale"), Some(0));
        assert_eq!(
            summary
                .report("case_retail_query_sales_count.sql")
                .and_then(|r| r.scalar()),
            Some("0")
        );
        Ok(())
    }

    #[test]
    fn test_unwritable_artifacts_dir_is_resource_error() -> Result<()> {
        let project = RetailProject::new()?;
        // a file where the artifacts directory should go
        project.write("artifacts", "not a directory")?;

        let logger = MemoryLogger::new();
        let err = project.pipeline(&logger).run().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Infrastructure(InfrastructureError::OutputDirectory { .. })
        ));
        assert!(logger.position("FAILED INIT").is_some());
        assert_eq!(logger.count("START CLOSE"), 0);
        Ok(())
    }
}
