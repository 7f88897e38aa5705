//! The `check` and `resolve` commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;

use injected_types::{
    AllowedTypesDirective, AttributeResolver, ContentModelManifest, ContentTypeId, ContentTypeModel,
    DefaultScanningRules, DirectiveRegistry, MergeOrigin, PropertyAssigner, PropertyDefinitionModel, PropertyName,
    ScanConfig, ScannedProperty, TypeConflict,
};

/// Where to read the scan configuration and the content model from.
#[derive(Args, Debug)]
pub struct ScanInputs {
    /// Scan configuration (settings and code-declared directives).
    ///
    /// A missing file means default settings and no code-declared directives.
    #[arg(long, env = "INJECTED_TYPES_CONFIG", default_value = "injected-types.toml")]
    pub config: PathBuf,

    /// Content-model manifest listing the content types to scan.
    #[arg(long)]
    pub model: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub inputs: ScanInputs,

    /// The content type to scan.
    pub content_type: ContentTypeId,

    /// The property on that content type.
    pub property: PropertyName,
}

/// Load the configuration, freeze the registry, and build the assigner.
fn load(inputs: &ScanInputs) -> Result<(PropertyAssigner, Vec<ContentTypeModel>)> {
    let config = ScanConfig::load(&inputs.config)?;
    let registry = DirectiveRegistry::from_config(&config.directives)
        .with_context(|| format!("registering directives from {}", inputs.config.display()))?;
    tracing::debug!(
        config = %inputs.config.display(),
        directives = registry.len(),
        "registry loaded"
    );

    let assigner = PropertyAssigner::builder()
        .resolver(AttributeResolver::new(Arc::new(registry)))
        .rules(DefaultScanningRules)
        .settings(config.scan)
        .build()?;

    let models = load_models(&inputs.model)?;
    Ok((assigner, models))
}

fn load_models(path: &Path) -> Result<Vec<ContentTypeModel>> {
    Ok(ContentModelManifest::load(path)?.into_models())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ScannedContentType {
    content_type: ContentTypeId,
    properties: Vec<ScannedProperty>,
}

/// Scan every content type in the manifest. Stops at the first fatal error.
pub fn check(inputs: &ScanInputs) -> Result<()> {
    let (assigner, models) = load(inputs)?;

    let mut scanned = Vec::with_capacity(models.len());
    for model in &models {
        let properties = assigner
            .scan_content_type(model)
            .with_context(|| format!("scanning content type '{}'", model.model_type))?;
        scanned.push(ScannedContentType {
            content_type: model.model_type.clone(),
            properties,
        });
    }

    if inputs.json {
        println!("{}", serde_json::to_string_pretty(&scanned)?);
        return Ok(());
    }

    for content_type in &scanned {
        println!("{}", content_type.content_type);
        for p in &content_type.properties {
            let def = &p.definition;
            match (&def.allowed_types, p.report.origin) {
                (Some(directive), Some(origin)) => {
                    println!("  {}: {directive} ({origin})", def.name);
                }
                _ => println!("  {}: no allowed-types directive", def.name),
            }
            for conflict in &p.report.conflicts {
                println!("    conflict: {conflict}");
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Resolved<'a> {
    content_type: &'a ContentTypeId,
    property: &'a PropertyName,
    origin: Option<MergeOrigin>,
    directive: Option<&'a AllowedTypesDirective>,
    conflicts: &'a [TypeConflict],
}

/// Print the effective directive for one property.
///
/// The property goes through the same assignment as in `check`, so a conflict
/// under `fail_on_conflict` or a directive the scanning rules reject is an
/// error here too.
pub fn resolve(args: &ResolveArgs) -> Result<()> {
    let (assigner, models) = load(&args.inputs)?;

    let Some(model) = models.iter().find(|m| m.model_type == args.content_type) else {
        bail!(
            "content type '{}' is not in {}",
            args.content_type,
            args.inputs.model.display()
        );
    };
    let Some(property) = model.properties.iter().find(|p| p.name == args.property) else {
        bail!(
            "content type '{}' has no property '{}'",
            args.content_type,
            args.property
        );
    };

    let mut definition = PropertyDefinitionModel::new(property.name.clone());
    let report = assigner
        .assign(&mut definition, property, model)
        .with_context(|| format!("scanning content type '{}'", model.model_type))?;

    if args.inputs.json {
        let resolved = Resolved {
            content_type: &model.model_type,
            property: &property.name,
            origin: report.origin,
            directive: definition.allowed_types.as_ref(),
            conflicts: &report.conflicts,
        };
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    match (&definition.allowed_types, report.origin) {
        (Some(directive), Some(origin)) => {
            println!("{}.{}: {directive} ({origin})", model.model_type, property.name);
            for conflict in &report.conflicts {
                println!("  conflict: {conflict}");
            }
        }
        _ => println!("{}.{}: no allowed-types directive", model.model_type, property.name),
    }
    Ok(())
}
