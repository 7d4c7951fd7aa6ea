// ABOUTME: Builds and caches per-extractor-type operation tables of composed interceptor chains.
// ABOUTME: Composition runs at most once per (type, host) key, serialized by a mutex.

//! Operation table composition.
//!
//! For every operation in [`Operation::ALL`] the composer starts from the
//! extractor's own implementation and folds the plugin list in reverse,
//! wrapping with each plugin whose predicate accepts (host, operation).
//! The finished table is installed whole and shared by every instance of the
//! extractor type; it is never modified afterwards.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::extractors::operation::Operation;
use crate::extractors::{dispatch, Scraper, ScraperIdentity};
use crate::plugins::{handler, Handler, Plugin};

/// Composed handlers for one extractor type, indexed by operation.
pub struct OperationTable {
    handlers: Vec<Handler>,
    applied: Vec<Vec<String>>,
}

impl OperationTable {
    /// Composes a table for `scraper` from `plugins` (first plugin outermost).
    pub fn compose(scraper: &dyn Scraper, plugins: &[Arc<dyn Plugin>]) -> Self {
        let host = scraper.host();
        let mut handlers = Vec::with_capacity(Operation::ALL.len());
        let mut applied = Vec::with_capacity(Operation::ALL.len());

        for op in Operation::ALL {
            let mut current = base_handler(op);
            let mut names = Vec::new();
            for plugin in plugins.iter().rev() {
                if plugin.should_run(host, op) {
                    current = plugin.wrap(op, current);
                    names.push(plugin.name().to_string());
                }
            }
            names.reverse();
            handlers.push(current);
            applied.push(names);
        }

        Self { handlers, applied }
    }

    /// The composed handler for `op`.
    pub fn handler(&self, op: Operation) -> &Handler {
        &self.handlers[op as usize]
    }

    /// Names of the plugins wrapping `op`, outermost first.
    pub fn plugins_for(&self, op: Operation) -> &[String] {
        &self.applied[op as usize]
    }
}

fn base_handler(op: Operation) -> Handler {
    handler(move |ctx| dispatch(op, ctx))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    type_id: TypeId,
    host: String,
}

/// Cache of composed tables, one per extractor type and host.
pub struct OperationTables {
    plugins: Vec<Arc<dyn Plugin>>,
    tables: Mutex<HashMap<TableKey, Arc<OperationTable>>>,
}

impl OperationTables {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            plugins,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Returns the table for `scraper`'s type, composing it on first use.
    ///
    /// Concurrent first calls for the same type compose exactly once; the
    /// table becomes visible only after every operation has been wrapped.
    pub fn get_or_compose(&self, scraper: &dyn Scraper) -> Arc<OperationTable> {
        let key = TableKey {
            type_id: scraper.type_key(),
            host: scraper.host().to_string(),
        };

        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(table) = tables.get(&key) {
            return Arc::clone(table);
        }

        tracing::debug!(
            scraper = scraper.type_name(),
            host = %key.host,
            plugins = self.plugins.len(),
            "composing operation table"
        );
        let table = Arc::new(OperationTable::compose(scraper, &self.plugins));
        tables.insert(key, Arc::clone(&table));
        table
    }

    /// True if a table for `scraper`'s type has already been composed.
    pub fn is_composed(&self, scraper: &dyn Scraper) -> bool {
        let key = TableKey {
            type_id: scraper.type_key(),
            host: scraper.host().to_string(),
        };
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&key)
    }

    /// Number of composed tables.
    pub fn len(&self) -> usize {
        self.tables.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for OperationTables {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
