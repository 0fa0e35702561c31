//! CREATE SCHEMA scripts

use super::script::describe;
use super::{expect_kind, RenderContext};
use crate::error::RenderError;
use crate::model::{CatalogObject, ObjectKind};
use crate::util::quote_ident;

pub fn render_schema(
    context: &RenderContext<'_>,
    object: &CatalogObject,
) -> Result<String, RenderError> {
    let schema = expect_kind(object, ObjectKind::Schema, "schema")?;
    let quoted = quote_ident(&schema.name);

    let mut create = format!("CREATE SCHEMA {}", quoted);
    if let Some(owner) = schema.owner.as_deref().filter(|o| !o.trim().is_empty()) {
        create.push_str(" AUTHORIZATION ");
        create.push_str(&quote_ident(owner));
    }

    let mut script = context.script();
    script.batch(create);
    context.push_permissions(
        &mut script,
        context.graph.objects().permissions(&quoted),
        &format!("SCHEMA :: {}", quoted),
    );
    if let Some(description) = &schema.description {
        script.batch(describe(description, &[("SCHEMA", schema.name.as_str())]));
    }
    Ok(script.finish())
}
