use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AclError;
use crate::policy;
use crate::types::Policy;

/// On-disk representation of the policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyFormat {
    Json,
    Yaml,
}

impl PolicyFormat {
    /// Infer the format from the file extension. Anything that is not
    /// `.yml`/`.yaml` is treated as JSON.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => PolicyFormat::Yaml,
            _ => PolicyFormat::Json,
        }
    }
}

/// Load and validate a policy document, inferring JSON or YAML from the
/// file extension.
pub fn load_policy(path: &Path) -> Result<Policy, AclError> {
    load_policy_with_format(path, None)
}

/// Load and validate a policy document with an explicit format override.
///
/// Load-time errors abort policy activation: a document that fails here
/// must never replace a previously active one.
pub fn load_policy_with_format(
    path: &Path,
    format: Option<PolicyFormat>,
) -> Result<Policy, AclError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AclError::PolicyRead {
        path: path.display().to_string(),
        source,
    })?;

    let format = format.unwrap_or_else(|| PolicyFormat::from_path(path));
    let policy = match format {
        PolicyFormat::Json => policy::from_json_str(&contents)?,
        PolicyFormat::Yaml => policy::from_yaml_str(&contents)?,
    };

    tracing::info!(
        path = %path.display(),
        groups = policy.groups.len(),
        permissions = policy
            .groups
            .iter()
            .map(|g| g.permissions.len())
            .sum::<usize>(),
        deny_all = policy.is_deny_all(),
        "Loaded access control policy"
    );

    Ok(policy)
}
