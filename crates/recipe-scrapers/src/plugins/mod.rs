// ABOUTME: Plugin trait and handler types for cross-cutting behavior around extraction operations.
// ABOUTME: Includes the Scope predicate helper, a closure-based plugin, and the built-in plugins.

//! Plugin middleware.
//!
//! A [`Plugin`] decides per (host, operation) whether it applies and, if so,
//! wraps the current [`Handler`] in a new one with the same contract. The
//! composer in [`compose`] folds the configured plugin list in reverse so the
//! first-configured plugin ends up outermost.

pub mod compose;
pub mod exceptions;
pub mod html_tags;
pub mod normalize;
pub mod opengraph;
pub mod schemaorg_fill;
pub mod trace;

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::extractors::operation::{Field, Operation};
use crate::extractors::Context;

pub use exceptions::ExceptionHandlingPlugin;
pub use html_tags::HtmlTagStripperPlugin;
pub use normalize::NormalizeStringPlugin;
pub use opengraph::OpenGraphImageFetchPlugin;
pub use schemaorg_fill::SchemaOrgFillPlugin;
pub use trace::TracingPlugin;

/// One callable implementation of an operation.
pub type Handler = Arc<dyn Fn(&Context<'_>) -> Result<Field> + Send + Sync>;

/// Boxes a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Context<'_>) -> Result<Field> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Middleware provider applied to matching operations.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this plugin wraps `op` on extractors serving `host`.
    fn should_run(&self, host: &str, op: Operation) -> bool;

    /// Returns a handler that delegates to `next`, adding this plugin's behavior.
    fn wrap(&self, op: Operation, next: Handler) -> Handler;
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin").field("name", &self.name()).finish()
    }
}

/// Hosts a plugin applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hosts {
    Any,
    Only(Vec<String>),
}

/// The common "these hosts × these operations" predicate.
#[derive(Debug, Clone)]
pub struct Scope {
    hosts: Hosts,
    operations: Vec<Operation>,
}

impl Scope {
    /// Every host, the given operations.
    pub fn operations(operations: &[Operation]) -> Self {
        Self {
            hosts: Hosts::Any,
            operations: operations.to_vec(),
        }
    }

    /// Every host and every operation.
    pub fn all() -> Self {
        Self::operations(&Operation::ALL)
    }

    /// Restricts the scope to the given hosts.
    pub fn on_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = Hosts::Only(hosts.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, host: &str, op: Operation) -> bool {
        let host_ok = match &self.hosts {
            Hosts::Any => true,
            Hosts::Only(list) => list.iter().any(|h| h == host),
        };
        host_ok && self.operations.contains(&op)
    }
}

type Predicate = dyn Fn(&str, Operation) -> bool + Send + Sync;
type Wrapper = dyn Fn(Operation, Handler) -> Handler + Send + Sync;

/// A plugin assembled from two closures.
///
/// ```
/// use recipe_scrapers::plugins::{handler, FnPlugin};
/// use recipe_scrapers::{Field, Operation};
///
/// let shout = FnPlugin::new(
///     "shout",
///     |host, op| host == "x.com" && op == Operation::Title,
///     |_op, next| {
///         handler(move |ctx| match next(ctx)? {
///             Field::Text(t) => Ok(Field::Text(t.to_uppercase())),
///             other => Ok(other),
///         })
///     },
/// );
/// # let _ = shout;
/// ```
pub struct FnPlugin {
    name: String,
    predicate: Box<Predicate>,
    wrapper: Box<Wrapper>,
}

impl FnPlugin {
    pub fn new<P, W>(name: impl Into<String>, predicate: P, wrapper: W) -> Self
    where
        P: Fn(&str, Operation) -> bool + Send + Sync + 'static,
        W: Fn(Operation, Handler) -> Handler + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
            wrapper: Box::new(wrapper),
        }
    }
}

impl Plugin for FnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        (self.predicate)(host, op)
    }

    fn wrap(&self, op: Operation, next: Handler) -> Handler {
        (self.wrapper)(op, next)
    }
}

/// The plugin list used when none is configured.
pub fn default_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(HtmlTagStripperPlugin::default()),
        Arc::new(NormalizeStringPlugin::default()),
        Arc::new(OpenGraphImageFetchPlugin::default()),
        Arc::new(SchemaOrgFillPlugin::default()),
    ]
}
