// ABOUTME: Strips stray HTML tags from text-valued operation results.
// ABOUTME: Applies to title, instructions and ingredients by default.

use crate::extractors::operation::{Field, Operation};
use crate::plugins::{handler, Handler, Plugin, Scope};
use crate::utils::strip_tags;

pub struct HtmlTagStripperPlugin {
    scope: Scope,
}

impl HtmlTagStripperPlugin {
    pub fn with_scope(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Default for HtmlTagStripperPlugin {
    fn default() -> Self {
        Self::with_scope(Scope::operations(&[
            Operation::Title,
            Operation::Instructions,
            Operation::Ingredients,
        ]))
    }
}

impl Plugin for HtmlTagStripperPlugin {
    fn name(&self) -> &str {
        "html_tag_stripper"
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        self.scope.matches(host, op)
    }

    fn wrap(&self, _op: Operation, next: Handler) -> Handler {
        handler(move |ctx| {
            let field = match next(ctx)? {
                Field::Text(text) => Field::Text(strip_tags(&text)),
                Field::List(items) => Field::List(items.iter().map(|i| strip_tags(i)).collect()),
                other => other,
            };
            Ok(field)
        })
    }
}
