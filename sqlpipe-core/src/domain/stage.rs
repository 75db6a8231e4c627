// sqlpipe-core/src/domain/stage.rs

use std::fmt;

/// One step of a pipeline run. Runs are strictly sequential:
/// INIT -> PRAGMA_SETUP -> CLEAN -> BOOTSTRAP -> LOAD(..) -> COMMIT -> QUERY(..) -> CLOSE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Init,
    PragmaSetup,
    Clean,
    Bootstrap,
    Load(String),
    Commit,
    Query(String),
    Close,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => f.write_str("INIT"),
            Stage::PragmaSetup => f.write_str("PRAGMA_SETUP"),
            Stage::Clean => f.write_str("CLEAN"),
            Stage::Bootstrap => f.write_str("BOOTSTRAP"),
            Stage::Load(table) => write!(f, "LOAD({})", table),
            Stage::Commit => f.write_str("COMMIT"),
            Stage::Query(name) => write!(f, "QUERY({})", name),
            Stage::Close => f.write_str("CLOSE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(Stage::PragmaSetup.to_string(), "PRAGMA_SETUP");
        assert_eq!(Stage::Load("sale".into()).to_string(), "LOAD(sale)");
        assert_eq!(
            Stage::Query("case_retail_query_store_count.sql".into()).to_string(),
            "QUERY(case_retail_query_store_count.sql)"
        );
    }
}
