use serde::{Serialize, Serializer};

use crate::errors::AclError;

// ---------- Policy domain types ----------

/// The default effect a permission applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Deny,
}

impl From<&str> for Action {
    /// The literal `"deny"` denies; any other declared action allows.
    fn from(value: &str) -> Self {
        if value == "deny" {
            Action::Deny
        } else {
            Action::Allow
        }
    }
}

/// The methods a permission covers, parsed once at validation time so the
/// decision logic matches on a closed set of shapes instead of re-sniffing
/// the wire value per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSpec {
    /// The `"*"` glob: every method, including ones the policy author
    /// never anticipated.
    All,
    /// An explicit sequence of method names, e.g. `["GET", "POST"]`.
    List(Vec<String>),
}

impl MethodSpec {
    /// Case-sensitive membership test against a request method.
    pub fn contains(&self, method: &str) -> bool {
        match self {
            MethodSpec::All => true,
            MethodSpec::List(methods) => methods.iter().any(|m| m == method),
        }
    }
}

impl Serialize for MethodSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MethodSpec::All => serializer.serialize_str("*"),
            MethodSpec::List(methods) => methods.serialize(serializer),
        }
    }
}

/// A single resource's covered methods and default action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub resource: String,
    pub methods: MethodSpec,
    pub action: Action,
}

impl Permission {
    /// Which decision mode applies to this permission, inferred from its
    /// declared shape: wildcard methods are gated by the action alone,
    /// while explicit method lists restrict in the direction of the action.
    pub fn evaluation_mode(&self) -> EvaluationMode {
        match (&self.methods, self.action) {
            (MethodSpec::All, _) => EvaluationMode::GlobActionGated,
            (MethodSpec::List(_), Action::Allow) => EvaluationMode::RestrictAllow,
            (MethodSpec::List(_), Action::Deny) => EvaluationMode::RestrictDeny,
        }
    }
}

/// A named bundle of permissions attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    #[serde(rename = "group")]
    pub role: String,
    pub permissions: Vec<Permission>,
}

impl Group {
    /// First permission entry whose resource name matches exactly. No
    /// prefix or suffix matching.
    pub fn find_permission(&self, resource: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.resource == resource)
    }
}

/// Validated access-control policy. Immutable after construction -
/// changing the rules means validating a fresh document and swapping the
/// shared reference, so in-flight evaluations always observe one fully
/// validated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub groups: Vec<Group>,
    deny_all: bool,
}

impl Policy {
    /// Build a policy from validated groups. An empty group set is the
    /// "policy not set" warning state: every decision comes back deny.
    pub fn from_groups(groups: Vec<Group>) -> Self {
        let deny_all = groups.is_empty();
        Self { groups, deny_all }
    }

    /// Whether the policy is in the deny-all warning state.
    pub fn is_deny_all(&self) -> bool {
        self.deny_all
    }

    /// First group whose role matches. Duplicate roles are not an error;
    /// later duplicates are simply unreachable.
    pub fn find_group(&self, role: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.role == role)
    }

    /// Serialize back to the wire document shape (a sequence of groups),
    /// suitable for re-validation.
    pub fn to_document(&self) -> Result<serde_json::Value, AclError> {
        Ok(serde_json::to_value(&self.groups)?)
    }
}

// ---------- Decision types ----------

/// Outcome of evaluating a request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Let the request continue down the pipeline.
    Allow,
    /// Terminate with the 403 access-denied payload.
    Deny,
    /// The request carried no role claim.
    RoleNotFound,
    /// No group matches the caller's role.
    GroupNotFound,
}

/// Which of the three decision shapes applies to a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Open resource with method exceptions: listed methods allow, the
    /// rest deny; a wildcard allows everything.
    RestrictAllow,
    /// Locked resource with method exceptions: listed methods deny, the
    /// rest allow; a wildcard denies everything.
    RestrictDeny,
    /// Wildcard-method permission where the action alone decides.
    GlobActionGated,
}
