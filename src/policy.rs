use serde_json::Value;

use crate::errors::AclError;
use crate::types::{Action, Group, MethodSpec, Permission, Policy};

/// Validate a raw policy document into an immutable [`Policy`].
///
/// The document must be a sequence of group entries. An empty sequence is
/// accepted but leaves the policy in the deny-all warning state. Entries
/// without the group shape (a string `group`/`role` field plus a
/// `permissions` sequence) are logged and dropped; a malformed permission
/// entry inside a well-shaped group aborts validation. This is the only
/// stage that may reject the whole document.
pub fn validate(raw: &Value) -> Result<Policy, AclError> {
    let Some(entries) = raw.as_array() else {
        return Err(AclError::PolicyStructure {
            found: value_kind(raw),
        });
    };

    if entries.is_empty() {
        tracing::warn!("policy not set, all traffic will be denied");
        return Ok(Policy::from_groups(Vec::new()));
    }

    let mut groups = Vec::with_capacity(entries.len());
    for entry in entries {
        let role = entry
            .get("group")
            .or_else(|| entry.get("role"))
            .and_then(Value::as_str);
        let permissions = entry.get("permissions").and_then(Value::as_array);

        let (Some(role), Some(permissions)) = (role, permissions) else {
            tracing::error!(
                %entry,
                "group entry missing required shape (`group`, `permissions`), skipping"
            );
            continue;
        };

        let mut validated = Vec::with_capacity(permissions.len());
        for permission in permissions {
            validated.push(validate_permission(role, permission)?);
        }
        groups.push(Group {
            role: role.to_string(),
            permissions: validated,
        });
    }

    Ok(Policy::from_groups(groups))
}

/// Parse and validate a JSON policy document.
pub fn from_json_str(text: &str) -> Result<Policy, AclError> {
    validate(&serde_json::from_str(text)?)
}

/// Parse and validate a YAML policy document.
pub fn from_yaml_str(text: &str) -> Result<Policy, AclError> {
    validate(&serde_yaml::from_str(text)?)
}

fn validate_permission(group: &str, entry: &Value) -> Result<Permission, AclError> {
    let resource = match entry.get("resource").and_then(Value::as_str) {
        Some(resource) if !resource.is_empty() => resource,
        _ => {
            return Err(AclError::RequiredField {
                group: group.to_string(),
                field: "resource",
            })
        }
    };

    let methods = match entry.get("methods") {
        Some(methods) if !methods.is_null() => parse_methods(group, methods)?,
        _ => {
            return Err(AclError::RequiredField {
                group: group.to_string(),
                field: "methods",
            })
        }
    };

    let action = match entry.get("action").and_then(Value::as_str) {
        Some(action) if !action.is_empty() => Action::from(action),
        _ => {
            return Err(AclError::RequiredField {
                group: group.to_string(),
                field: "action",
            })
        }
    };

    Ok(Permission {
        resource: resource.to_string(),
        methods,
        action,
    })
}

/// Resolve the wire `methods` value into its closed shape. The only
/// string form accepted is the `"*"` glob.
fn parse_methods(group: &str, value: &Value) -> Result<MethodSpec, AclError> {
    match value {
        Value::String(s) if s == "*" => Ok(MethodSpec::All),
        Value::String(s) if s.is_empty() => Err(AclError::RequiredField {
            group: group.to_string(),
            field: "methods",
        }),
        Value::String(s) => Err(AclError::UnrecognizedGlob { value: s.clone() }),
        Value::Array(items) => {
            let mut methods = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(method) => methods.push(method.to_string()),
                    None => {
                        return Err(AclError::InvalidMethods {
                            group: group.to_string(),
                        })
                    }
                }
            }
            Ok(MethodSpec::List(methods))
        }
        _ => Err(AclError::InvalidMethods {
            group: group.to_string(),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
