const CLI_ERROR_CODE_JSON: &str = "json";
const CLI_ERROR_CODE_OUTPUT: &str = "output";

#[derive(Debug)]
pub(crate) enum CliError {
    Tool(slim_scaffold::Error),
    Json(serde_json::Error),
    Output(std::io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Tool(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "json error: {err}"),
            CliError::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Tool(err) => Some(err),
            CliError::Json(err) => Some(err),
            CliError::Output(err) => Some(err),
        }
    }
}

impl From<slim_scaffold::Error> for CliError {
    fn from(err: slim_scaffold::Error) -> Self {
        Self::Tool(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err)
    }
}

impl CliError {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            CliError::Tool(err) => err.code(),
            CliError::Json(_) => CLI_ERROR_CODE_JSON,
            CliError::Output(_) => CLI_ERROR_CODE_OUTPUT,
        }
    }
}

pub(crate) fn tool_error_details(tool: &slim_scaffold::Error) -> Option<serde_json::Value> {
    use slim_scaffold::Error;

    match tool {
        Error::IoPath { op, path, source } => Some(serde_json::json!({
            "kind": "io_path",
            "op": op,
            "path": path.display().to_string(),
            "io_kind": format!("{:?}", source.kind()),
        })),
        Error::InvalidRoot(message) => Some(serde_json::json!({
            "kind": "invalid_root",
            "message": message,
        })),
        Error::InvalidPath(message) => Some(serde_json::json!({
            "kind": "invalid_path",
            "message": message,
        })),
        Error::InvalidUtf8(path) => Some(serde_json::json!({
            "kind": "invalid_utf8",
            "path": path.display().to_string(),
        })),
        Error::FileTooLarge {
            path,
            size_bytes,
            max_bytes,
        } => Some(serde_json::json!({
            "kind": "file_too_large",
            "path": path.display().to_string(),
            "size_bytes": size_bytes,
            "max_bytes": max_bytes,
        })),
        Error::InvalidPatch(message) => Some(serde_json::json!({
            "kind": "invalid_patch",
            "message": message,
        })),
        Error::InvalidSettings(message) => Some(serde_json::json!({
            "kind": "invalid_settings",
            "message": message,
        })),
        Error::Hook { hook, message } => Some(serde_json::json!({
            "kind": "hook",
            "hook": hook,
            "message": message,
        })),
        Error::Json(err) => Some(serde_json::json!({
            "kind": "json",
            "message": err.to_string(),
        })),
        _ => None,
    }
}

pub(crate) fn render_json_error(err: &CliError) -> String {
    let mut error = serde_json::Map::new();
    error.insert(
        "code".to_string(),
        serde_json::Value::String(err.code().to_string()),
    );
    error.insert(
        "message".to_string(),
        serde_json::Value::String(err.to_string()),
    );
    if let CliError::Tool(tool) = err
        && let Some(details) = tool_error_details(tool)
    {
        error.insert("details".to_string(), details);
    }

    let out = serde_json::json!({ "error": error });
    serde_json::to_string(&out).unwrap_or_else(|_| err.to_string())
}
