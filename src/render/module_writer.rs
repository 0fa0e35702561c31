//! Views, triggers, functions and procedures

use super::script::describe;
use super::RenderContext;
use crate::error::RenderError;
use crate::model::{CatalogObject, ObjectKind};

pub fn render_module(
    context: &RenderContext<'_>,
    object: &CatalogObject,
) -> Result<String, RenderError> {
    let module = match object {
        CatalogObject::Module(module) if module.object.kind.is_module() => module,
        CatalogObject::Module(module) => {
            return Err(RenderError::KindMismatch {
                name: module.object.qualified_name(),
                renderer: "module",
                kind: module.object.kind,
            })
        }
        CatalogObject::Plain(plain) if plain.kind.is_module() => {
            return Err(RenderError::NotAModule {
                name: plain.qualified_name(),
                kind: plain.kind,
            })
        }
        CatalogObject::Plain(plain) => {
            return Err(RenderError::KindMismatch {
                name: plain.qualified_name(),
                renderer: "module",
                kind: plain.kind,
            })
        }
    };
    let object = &module.object;
    let name = object.qualified_name();

    let definition = object
        .definition
        .as_deref()
        .map(|text| text.trim_matches(|c| c == '\n' || c == '\r'))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| RenderError::MissingDefinition { name: name.clone() })?;

    let mut script = context.script();

    let mut settings = Vec::new();
    if module.quoted_identifier == Some(true) {
        settings.push("QUOTED_IDENTIFIER");
    }
    if module.ansi_nulls == Some(true) {
        settings.push("ANSI_NULLS");
    }
    if !settings.is_empty() {
        script.batch(format!("SET {} ON", settings.join(", ")));
    }

    script.batch(definition);
    context.push_permissions(
        &mut script,
        context.graph.objects().permissions(&name),
        &name,
    );

    if let Some(description) = &object.description {
        let level1 = match object.kind {
            ObjectKind::View => Some("VIEW"),
            ObjectKind::Function => Some("FUNCTION"),
            ObjectKind::Procedure => Some("PROCEDURE"),
            _ => None,
        };
        match (level1, &object.parent) {
            (Some(level1), _) => script.batch(describe(
                description,
                &[("SCHEMA", object.schema.as_str()), (level1, object.name.as_str())],
            )),
            (None, Some(parent)) => script.batch(describe(
                description,
                &[
                    ("SCHEMA", object.schema.as_str()),
                    (parent.level_type(), parent.name()),
                    ("TRIGGER", object.name.as_str()),
                ],
            )),
            // a trigger without a known parent has no addressable property
            (None, None) => {}
        }
    }

    Ok(script.finish())
}
