// ABOUTME: Turns operation errors into configured fallback values instead of propagating them.
// ABOUTME: Installed first (outermost) when the client is built with suppress_exceptions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::extractors::operation::{Attributes, Field, Operation};
use crate::plugins::{handler, Handler, Plugin, Scope};

/// Values returned in place of an error, per operation.
pub type ExceptionDefaults = HashMap<Operation, Field>;

/// Fallback values matching each operation's field kind.
pub fn default_exception_values() -> ExceptionDefaults {
    Operation::ALL
        .iter()
        .map(|&op| {
            let value = match op {
                Operation::Title
                | Operation::Category
                | Operation::Yields
                | Operation::Instructions
                | Operation::Cuisine
                | Operation::Description
                | Operation::Host => Field::Text(String::new()),
                Operation::Language => Field::Text("en".to_string()),
                Operation::Ingredients | Operation::InstructionsList => Field::List(Vec::new()),
                Operation::Nutrients => Field::Map(Attributes::new()),
                Operation::Reviews | Operation::Links => Field::Records(Vec::new()),
                Operation::TotalTime
                | Operation::CookTime
                | Operation::PrepTime
                | Operation::Image
                | Operation::Ratings
                | Operation::Author
                | Operation::SiteName
                | Operation::CanonicalUrl => Field::Null,
            };
            (op, value)
        })
        .collect()
}

/// Catches errors from the rest of the chain and returns the operation's
/// configured default. Operations without a default still propagate.
pub struct ExceptionHandlingPlugin {
    scope: Scope,
    defaults: Arc<ExceptionDefaults>,
}

impl ExceptionHandlingPlugin {
    pub fn new(defaults: ExceptionDefaults) -> Self {
        Self {
            scope: Scope::all(),
            defaults: Arc::new(defaults),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

impl Default for ExceptionHandlingPlugin {
    fn default() -> Self {
        Self::new(default_exception_values())
    }
}

impl Plugin for ExceptionHandlingPlugin {
    fn name(&self) -> &str {
        "exception_handling"
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        self.scope.matches(host, op)
    }

    fn wrap(&self, op: Operation, next: Handler) -> Handler {
        let defaults = Arc::clone(&self.defaults);
        handler(move |ctx| match next(ctx) {
            Ok(field) => Ok(field),
            Err(err) => match defaults.get(&op) {
                Some(value) => {
                    tracing::info!(
                        host = ctx.host(),
                        op = %op,
                        error = %err,
                        "suppressed extraction error"
                    );
                    Ok(value.clone())
                }
                None => Err(err),
            },
        })
    }
}
