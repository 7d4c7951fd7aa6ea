// ABOUTME: Normalizes whitespace and entities in text results.
// ABOUTME: Scoped to title by default.

use crate::extractors::operation::{Field, Operation};
use crate::plugins::{handler, Handler, Plugin, Scope};
use crate::utils::normalize_string;

pub struct NormalizeStringPlugin {
    scope: Scope,
}

impl NormalizeStringPlugin {
    pub fn with_scope(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Default for NormalizeStringPlugin {
    fn default() -> Self {
        Self::with_scope(Scope::operations(&[Operation::Title]))
    }
}

impl Plugin for NormalizeStringPlugin {
    fn name(&self) -> &str {
        "normalize_string"
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        self.scope.matches(host, op)
    }

    fn wrap(&self, _op: Operation, next: Handler) -> Handler {
        handler(move |ctx| match next(ctx)? {
            Field::Text(text) => Ok(Field::Text(normalize_string(&text))),
            other => Ok(other),
        })
    }
}
