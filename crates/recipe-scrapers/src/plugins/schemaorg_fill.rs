// ABOUTME: Fills unimplemented or empty operation results from the page's schema.org Recipe data.
// ABOUTME: Other errors and non-empty results pass through untouched.

use crate::document::SchemaOrg;
use crate::extractors::operation::{Field, Operation};
use crate::plugins::{handler, Handler, Plugin, Scope};

/// Operations the structured-data reader can answer.
const FILLABLE: &[Operation] = &[
    Operation::Title,
    Operation::Category,
    Operation::TotalTime,
    Operation::CookTime,
    Operation::PrepTime,
    Operation::Yields,
    Operation::Image,
    Operation::Nutrients,
    Operation::Language,
    Operation::Ingredients,
    Operation::Instructions,
    Operation::Ratings,
    Operation::Author,
    Operation::Cuisine,
    Operation::Description,
    Operation::SiteName,
];

/// Reads `op` from structured data. `None` if the reader has nothing for it.
pub fn schema_field(schema: &SchemaOrg, op: Operation) -> Option<Field> {
    if !schema.has_data() {
        return None;
    }
    let field = match op {
        Operation::Title => Field::Text(schema.title()?),
        Operation::Category => Field::Text(schema.category()?),
        Operation::TotalTime => Field::Minutes(schema.total_time()?),
        Operation::CookTime => Field::Minutes(schema.cook_time()?),
        Operation::PrepTime => Field::Minutes(schema.prep_time()?),
        Operation::Yields => Field::Text(schema.yields()?),
        Operation::Image => Field::Text(schema.image()?),
        Operation::Nutrients => Field::Map(schema.nutrients()?),
        Operation::Language => Field::Text(schema.language()?),
        Operation::Ingredients => Field::List(schema.ingredients()?),
        Operation::Instructions => Field::Text(schema.instructions()?),
        Operation::Ratings => Field::Number(schema.ratings()?),
        Operation::Author => Field::Text(schema.author()?),
        Operation::Cuisine => Field::Text(schema.cuisine()?),
        Operation::Description => Field::Text(schema.description()?),
        Operation::SiteName => Field::Text(schema.site_name()?),
        _ => return None,
    };
    Some(field)
}

pub struct SchemaOrgFillPlugin {
    scope: Scope,
}

impl SchemaOrgFillPlugin {
    pub fn with_scope(scope: Scope) -> Self {
        Self { scope }
    }
}

impl Default for SchemaOrgFillPlugin {
    fn default() -> Self {
        Self::with_scope(Scope::operations(FILLABLE))
    }
}

impl Plugin for SchemaOrgFillPlugin {
    fn name(&self) -> &str {
        "schemaorg_fill"
    }

    fn should_run(&self, host: &str, op: Operation) -> bool {
        self.scope.matches(host, op)
    }

    fn wrap(&self, op: Operation, next: Handler) -> Handler {
        handler(move |ctx| {
            let result = next(ctx);
            let needs_fill = match &result {
                Ok(field) => field.is_empty(),
                Err(err) => err.is_not_implemented(),
            };
            if !needs_fill {
                return result;
            }
            match schema_field(ctx.schema(), op) {
                Some(field) => {
                    tracing::debug!(host = ctx.host(), op = %op, "filled from schema.org");
                    Ok(field)
                }
                None => result,
            }
        })
    }
}
