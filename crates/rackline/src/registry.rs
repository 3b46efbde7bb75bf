//! Form registry assembly: the built-in catalog plus declarative specs.

use std::path::Path;

use anyhow::Context;
use rackline_filters::{FormRegistry, catalog, load_specs};
use tracing::info;

/// Builds the registry from the built-in forms and, if given, a JSON file of
/// form specs. Any malformed spec fails the whole build.
pub fn build_registry(forms: Option<&Path>) -> anyhow::Result<FormRegistry> {
    let mut builder = catalog::register_builtin(FormRegistry::builder()).context("invalid built-in form")?;

    if let Some(path) = forms {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read form specs from {}", path.display()))?;
        let specs = load_specs(&json).with_context(|| format!("in {}", path.display()))?;
        for spec in specs {
            let resource_type = spec.resource_type.clone();
            let form = spec
                .into_form()
                .with_context(|| format!("invalid form spec for {}", resource_type))?;
            builder = builder.register(form)?;
            info!(resource_type = %resource_type, "Registered form spec");
        }
    }

    let registry = builder.build();
    info!(resource_types = registry.len(), "Form registry ready");
    Ok(registry)
}
