//! Rule file loading and table lifecycle.
//!
//! The table is always built from the rule file as a whole: any
//! malformed line aborts the load and the previously published table
//! stays in place. A partially built table is never visible.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::parse::{parse_rules, ParseError};
use super::table::RedirectTable;
use crate::config::ReloadMode;

/// Failure to load the rule file.
#[derive(Debug)]
pub enum RulesError {
    /// The rule file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A rule line failed to parse.
    Parse { path: PathBuf, source: ParseError },
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read rule file {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "bad rule file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Owns the published redirect table and its reload policy.
///
/// In `Cached` mode one immutable table is shared by all requests;
/// a reload builds a complete replacement and swaps it in atomically,
/// so a reader sees either the old table or the new one. In
/// `PerRequest` mode every resolution re-reads the rule file.
#[derive(Debug)]
pub struct RuleStore {
    path: PathBuf,
    mode: ReloadMode,
    current: RwLock<Arc<RedirectTable>>,
}

impl RuleStore {
    /// Load the rule file and publish the initial table.
    ///
    /// A missing or malformed rule file is an error here; the caller
    /// should treat it as fatal rather than start without rules.
    pub async fn open(path: PathBuf, mode: ReloadMode) -> Result<Self, RulesError> {
        let table = load_table(&path).await?;
        Ok(Self {
            path,
            mode,
            current: RwLock::new(Arc::new(table)),
        })
    }

    /// Table to resolve the current request against.
    ///
    /// `PerRequest` mode re-reads and re-parses the rule file; a
    /// failure surfaces to the caller instead of silently serving
    /// stale or partial rules.
    pub async fn table(&self) -> Result<Arc<RedirectTable>, RulesError> {
        match self.mode {
            ReloadMode::Cached => Ok(Arc::clone(&*self.current.read().await)),
            ReloadMode::PerRequest => Ok(Arc::new(load_table(&self.path).await?)),
        }
    }

    /// Rebuild the table from disk and swap it in.
    ///
    /// Returns the number of rules in the new table. On failure the
    /// previously published table stays in place.
    pub async fn reload(&self) -> Result<usize, RulesError> {
        let table = load_table(&self.path).await?;
        let count = table.len();
        *self.current.write().await = Arc::new(table);
        Ok(count)
    }
}

/// Read and parse the rule file into a fresh table.
async fn load_table(path: &Path) -> Result<RedirectTable, RulesError> {
    let input = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let rules = parse_rules(&input).map_err(|source| RulesError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RedirectTable::build(rules))
}
