use serde::Deserialize;

// ===================================================================
// Status line input (received via stdin, snake_case JSON)
// ===================================================================

/// The model block of the status line payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub display_name: String,
}

/// The output style block of the status line payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputStyle {
    pub name: String,
}

/// Session context piped in on every status line refresh.
///
/// Every field is required. Anything else in the payload (`cwd`,
/// `workspace`, `cost`, ...) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionContext {
    pub model: ModelInfo,
    pub version: String,
    pub output_style: OutputStyle,
    pub session_id: String,
}

/// Number of leading characters of the session id shown in the status line.
pub const SESSION_PREFIX_LEN: usize = 8;

impl SessionContext {
    pub fn parse(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    /// The first 8 characters of the session id (the whole id if shorter).
    pub fn session_prefix(&self) -> &str {
        match self.session_id.char_indices().nth(SESSION_PREFIX_LEN) {
            Some((idx, _)) => &self.session_id[..idx],
            None => &self.session_id,
        }
    }
}

#[cfg(test)]
mod tests;
