//! Database handle and namespace selection.

use crate::document::{Collection, Document};
use crate::models::{BotSettings, GuildRecord};
use scaffold_common::{Result, ScaffoldError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// URI scheme accepted in front of the database path.
const URI_SCHEME: &str = "sled://";

/// Long-lived handle on the sled database file.
#[derive(Debug, Clone)]
pub struct Database {
    db: sled::Db,
}

impl Database {
    /// Opens (or creates) the database named by `uri`.
    ///
    /// Accepts `sled://<path>` or a bare filesystem path.
    pub fn open(uri: &str) -> Result<Self> {
        let path = path_from_uri(uri)?;
        info!("Opening database at {}", path.display());

        let db = sled::open(&path).map_err(|e| {
            ScaffoldError::database_with_source(
                format!("cannot open database at {}", path.display()),
                e,
            )
        })?;

        Ok(Self { db })
    }

    /// In-memory database removed on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| ScaffoldError::database_with_source("cannot open temporary database", e))?;
        Ok(Self { db })
    }

    /// Names of all namespaces that hold at least one collection.
    pub fn namespace_names(&self) -> BTreeSet<String> {
        self.qualified_tree_names()
            .into_iter()
            .filter_map(|name| name.split_once('.').map(|(ns, _)| ns.to_string()))
            .collect()
    }

    /// Collections present in `namespace`.
    pub fn collection_names(&self, namespace: &str) -> BTreeSet<String> {
        let prefix = format!("{namespace}.");
        self.qualified_tree_names()
            .into_iter()
            .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Creates the `settings` and `guilds` collections in `primary` when that
    /// namespace does not exist yet. Returns whether it had to create them.
    pub fn bootstrap(&self, primary: &str) -> Result<bool> {
        if self.namespace_names().contains(primary) {
            debug!("Database {primary} already exists");
            return Ok(false);
        }

        let namespace = self.namespace(primary);
        namespace.collection::<BotSettings>()?;
        namespace.collection::<GuildRecord>()?;
        info!("Created collections for database {primary}");
        Ok(true)
    }

    /// Scoped view onto one namespace.
    pub fn namespace(&self, name: &str) -> Namespace {
        Namespace {
            db: self.db.clone(),
            name: name.to_string(),
        }
    }

    fn qualified_tree_names(&self) -> Vec<String> {
        self.db
            .tree_names()
            .into_iter()
            .filter_map(|raw| String::from_utf8(raw.to_vec()).ok())
            .filter(|name| name.contains('.'))
            .collect()
    }
}

/// One logical database inside the sled file.
#[derive(Debug, Clone)]
pub struct Namespace {
    db: sled::Db,
    name: String,
}

impl Namespace {
    /// Opens (creating if needed) the collection for `T`.
    pub fn collection<T: Document>(&self) -> Result<Collection<T>> {
        let tree_name = format!("{}.{}", self.name, T::COLLECTION);
        let tree = self.db.open_tree(&tree_name).map_err(|e| {
            ScaffoldError::database_with_source(format!("cannot open collection {tree_name}"), e)
        })?;
        Ok(Collection::new(tree))
    }
}

fn path_from_uri(uri: &str) -> Result<PathBuf> {
    let raw = uri.trim();
    let path = raw.strip_prefix(URI_SCHEME).unwrap_or(raw);

    if path.is_empty() {
        return Err(ScaffoldError::config(format!(
            "database URI {uri:?} does not name a path"
        )));
    }
    if raw.contains("://") && !raw.starts_with(URI_SCHEME) {
        return Err(ScaffoldError::config(format!(
            "unsupported database URI scheme in {uri:?}"
        )));
    }

    Ok(Path::new(path).to_path_buf())
}
