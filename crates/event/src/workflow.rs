use crate::Callsite;

/// Workflow name used when nothing better is available.
pub const DEFAULT_WORKFLOW: &str = "default-workflow";

/// Derives a workflow name from a callsite: the file name with directories
/// and the extension stripped. `billing.py` called from `charge` becomes
/// `billing`.
pub fn derive_workflow(callsite: Option<&Callsite>) -> String {
    let Some(callsite) = callsite else {
        return DEFAULT_WORKFLOW.to_string();
    };

    let file = callsite.file();
    let name = file
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file);

    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };

    if stem.is_empty() {
        DEFAULT_WORKFLOW.to_string()
    } else {
        stem.to_string()
    }
}

/// Applies the workflow precedence: explicit name, then the configured
/// process-wide override, then derivation from the callsite.
pub fn resolve_workflow(
    explicit: Option<&str>,
    configured: Option<&str>,
    callsite: Option<&Callsite>,
) -> String {
    explicit
        .or(configured)
        .map(str::to_string)
        .unwrap_or_else(|| derive_workflow(callsite))
}
