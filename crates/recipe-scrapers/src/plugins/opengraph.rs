// ABOUTME: Falls back to the og:image meta tag when the image operation fails or is empty.
// ABOUTME: The original error is kept when the page has no og:image either.

use crate::extractors::operation::{Field, Operation};
use crate::plugins::{handler, Handler, Plugin, Scope};

const OG_IMAGE: &str = r#"meta[property="og:image"][content]"#;

pub struct OpenGraphImageFetchPlugin {
    scope: Scope,
}

impl OpenGraphImageFetchPlugin {
    pub fn with_scope(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Default for OpenGraphImageFetchPlugin {
    fn default() -> Self {
        Self::with_scope(Scope::operations(&[Operation::Image]))
    }
}

impl Plugin for OpenGraphImageFetchPlugin {
    fn name(&self) -> &str {
        "opengraph_image_fetch"
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        self.scope.matches(host, op)
    }

    fn wrap(&self, op: Operation, next: Handler) -> Handler {
        handler(move |ctx| {
            let result = next(ctx);
            if matches!(&result, Ok(field) if !field.is_empty()) {
                return result;
            }
            match ctx.attr(OG_IMAGE, "content").filter(|c| !c.trim().is_empty()) {
                Some(image) => {
                    tracing::debug!(host = ctx.host(), op = %op, "image from og:image");
                    Ok(Field::Text(image))
                }
                None => result,
            }
        })
    }
}
