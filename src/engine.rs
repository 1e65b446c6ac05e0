use serde_json::Value;

use crate::errors::AclError;
use crate::extract::{self, ResourceMatch};
use crate::types::{Action, Decision, EvaluationMode, MethodSpec, Policy};

/// Extract the caller's role, preferring a verified credential over the
/// session. Returns `None` when neither source carries a non-empty `role`
/// string field; the caller renders that as 404 "role not found".
pub fn resolve_role(decoded: Option<&Value>, session: Option<&Value>) -> Option<String> {
    for source in [decoded, session] {
        if let Some(role) = source.and_then(|s| s.get("role")).and_then(Value::as_str) {
            if !role.is_empty() {
                return Some(role.to_string());
            }
        }
    }
    tracing::warn!("role not defined, all traffic will be blocked");
    None
}

/// Resolve a decision from the request method and a permission's declared
/// methods, under the given evaluation mode.
///
/// The three modes cover the three policy shapes: an open resource with
/// method exceptions, a locked resource with method exceptions, and a
/// wildcard permission gated by its action alone. Mode selection is the
/// caller's responsibility; [`crate::types::Permission::evaluation_mode`]
/// is the default binding.
pub fn evaluate(
    mode: EvaluationMode,
    method: &str,
    methods: &MethodSpec,
    action: Action,
) -> Result<Decision, AclError> {
    let decision = match (mode, methods) {
        (EvaluationMode::RestrictAllow, MethodSpec::All) => Decision::Allow,
        (EvaluationMode::RestrictAllow, listed) => {
            if listed.contains(method) {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
        (EvaluationMode::RestrictDeny, MethodSpec::All) => Decision::Deny,
        (EvaluationMode::RestrictDeny, listed) => {
            if listed.contains(method) {
                Decision::Deny
            } else {
                Decision::Allow
            }
        }
        (EvaluationMode::GlobActionGated, MethodSpec::All) => match action {
            Action::Deny => Decision::Deny,
            Action::Allow => Decision::Allow,
        },
        // This mode is reserved for wildcard permissions; an explicit
        // method list here is a policy-authoring defect, not a deniable
        // request.
        (EvaluationMode::GlobActionGated, MethodSpec::List(_)) => {
            return Err(AclError::UnrecognizedGlob {
                value: "explicit method sequence".to_string(),
            })
        }
    };
    Ok(decision)
}

/// Evaluate a request end to end: resolve the role, derive the resource
/// from the path, find the matching group and permission, and decide.
///
/// A path with no resource-shaped segments is allowed through without a
/// decision. A resource no permission of the group mentions is a policy
/// gap and denies.
pub fn authorize(
    policy: &Policy,
    decoded: Option<&Value>,
    session: Option<&Value>,
    path: &str,
    method: &str,
    base_path: Option<&str>,
) -> Result<Decision, AclError> {
    let Some(role) = resolve_role(decoded, session) else {
        return Ok(Decision::RoleNotFound);
    };

    let resource = match extract::extract_resource(path, base_path) {
        ResourceMatch::PassThrough => return Ok(Decision::Allow),
        ResourceMatch::Exhausted => None,
        ResourceMatch::Name(name) => Some(name),
    };

    if policy.is_deny_all() {
        return Ok(Decision::Deny);
    }

    let Some(group) = policy.find_group(&role) else {
        return Ok(Decision::GroupNotFound);
    };

    let permission = resource
        .as_deref()
        .and_then(|resource| group.find_permission(resource));
    let Some(permission) = permission else {
        tracing::debug!(
            role = %role,
            resource = resource.as_deref().unwrap_or_default(),
            method = %method,
            "no permission entry for resource, denying"
        );
        return Ok(Decision::Deny);
    };

    evaluate(
        permission.evaluation_mode(),
        method,
        &permission.methods,
        permission.action,
    )
}
