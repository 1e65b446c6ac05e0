use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AclError {
    #[error("Failed to read policy file `{path}`")]
    #[diagnostic(
        code(turnpike::policy_read),
        help("Check that the file exists and is readable")
    )]
    PolicyRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Policy document must be a sequence of groups, got {found}")]
    #[diagnostic(
        code(turnpike::policy_structure),
        help("The top level of the document is an array: [{{\"group\": \"<role>\", \"permissions\": [...]}}]")
    )]
    PolicyStructure { found: &'static str },

    #[error("Group `{group}`: permission entry is missing required field `{field}`")]
    #[diagnostic(
        code(turnpike::required_field),
        help("Every permission entry must carry `resource`, `methods` and `action`")
    )]
    RequiredField { group: String, field: &'static str },

    #[error("Unrecognised methods glob `{value}`")]
    #[diagnostic(
        code(turnpike::unrecognized_glob),
        help("Use \"*\" to match all methods, or an explicit sequence like [\"GET\", \"POST\"]")
    )]
    UnrecognizedGlob { value: String },

    #[error("Group `{group}`: `methods` must be \"*\" or a sequence of method names")]
    #[diagnostic(code(turnpike::invalid_methods))]
    InvalidMethods { group: String },

    #[error("JSON parse error: {0}")]
    #[diagnostic(code(turnpike::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    #[diagnostic(code(turnpike::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl IntoResponse for AclError {
    fn into_response(self) -> Response {
        // Every variant signals a policy-authoring or configuration defect,
        // never a client mistake: render as a server error, not a 403/404.
        let body = json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
