use std::fmt::Write;

use declass_core::DeclassAtom;
use smallvec::SmallVec;

use crate::{context::TransformContext, error::TransformError, ResultKind, TransformResult};

/// A scope a generated binding can clash with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionScope {
    Import,
    TopLevel,
    ClassBody,
}

impl CollisionScope {
    pub fn label(self) -> &'static str {
        match self {
            CollisionScope::Import => "import",
            CollisionScope::TopLevel => "top level",
            CollisionScope::ClassBody => "class body",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Collision {
    /// Tag of the first result whose name collided
    pub tag: String,
    pub scopes: SmallVec<[CollisionScope; 3]>,
}

/// Checks the output variables of every result against the passthrough imports,
/// the top-level declarations and the previously produced names.
///
/// Returns the report to prepend to the output, or an error in strict mode.
pub fn detect_collisions(
    results: &[TransformResult],
    ctx: &mut TransformContext,
) -> Result<Option<String>, TransformError> {
    for result in results {
        // `store`, `router` and the like are acquired once, whoever asked for them
        let is_instance_dependency =
            matches!(result.kind, ResultKind::Composable | ResultKind::Import);

        for name in result.output_variables.iter() {
            let mut scopes: SmallVec<[CollisionScope; 3]> = SmallVec::new();

            if ctx.import_scope.contains(name) && !ctx.dropped_imports.contains(name) {
                scopes.push(CollisionScope::Import);
            }
            if ctx.top_level_scope.contains(name) {
                scopes.push(CollisionScope::TopLevel);
            }

            let seen = !ctx.class_body_scope.insert(name.to_owned());
            if seen && !is_instance_dependency {
                scopes.push(CollisionScope::ClassBody);
            }

            if scopes.is_empty() {
                continue;
            }

            record(ctx, name, &result.tag, scopes);
        }
    }

    if ctx.collisions.is_empty() {
        return Ok(None);
    }

    let report = collision_report(ctx);
    tracing::debug!(count = ctx.collisions.len(), "naming collisions");

    if ctx.options.stop_on_collisions {
        return Err(TransformError::NamingCollisions(report));
    }

    Ok(Some(report))
}

fn record(
    ctx: &mut TransformContext,
    name: &DeclassAtom,
    tag: &str,
    scopes: SmallVec<[CollisionScope; 3]>,
) {
    let collision = ctx
        .collisions
        .entry(name.to_owned())
        .or_insert_with(|| Collision {
            tag: tag.to_owned(),
            scopes: SmallVec::new(),
        });

    // Every generated binding lives in the class body scope
    let all = std::iter::once(CollisionScope::ClassBody).chain(scopes);
    for scope in all {
        if !collision.scopes.contains(&scope) {
            collision.scopes.push(scope);
        }
    }
}

fn collision_report(ctx: &TransformContext) -> String {
    let mut report =
        String::from("Naming collisions, the converted bindings shadow or redeclare:\n");

    for (name, collision) in ctx.collisions.iter() {
        let scopes = collision
            .scopes
            .iter()
            .map(|scope| scope.label())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(report, " - `{name}` ({}): {scopes}", collision.tag);
    }

    report
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_utils::{component, convert_ok, convert_strict_err};

    #[test]
    fn it_reports_import_and_top_level_collisions() {
        let source = component("format = 'x';\nhelper() {}")
            .replace(
                "\n@Component",
                "\nimport { format } from \"date-fns\";\nconst helper = 1;\n\n@Component",
            );
        let output = convert_ok(&source);

        assert!(output.contains("Naming collisions"));
        assert!(output.contains(" - `format` (Data-ref): class body, import"));
        assert!(output.contains(" - `helper` (Method): class body, top level"));
    }

    #[test]
    fn it_reports_duplicates_inside_the_class() {
        let output = convert_ok(&component("get total() { return 1; }\ntotal = 2;"));
        assert!(output.contains(" - `total` (Data-ref): class body"));
    }

    #[test]
    fn it_fails_in_strict_mode() {
        let source = component("format = 'x';")
            .replace("\n@Component", "\nimport { format } from \"date-fns\";\n\n@Component");
        let error = convert_strict_err(&source);
        assert_eq!(
            error.to_string(),
            "Naming collisions, the converted bindings shadow or redeclare:\n \
             - `format` (Data-ref): class body, import\n"
        );
    }

    #[test]
    fn it_does_not_report_shared_composables() {
        let output = convert_ok(&component(
            "a() { return this.$store.state.a; }\nb() { return this.$store.state.b; }",
        ));
        assert!(!output.contains("Naming collisions"));
    }
}
