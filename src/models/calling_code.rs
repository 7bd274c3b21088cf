use serde::{Deserialize, Serialize};

/// One entry of the country calling-code directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallingCode {
    pub display_name: String,
    pub calling_code: String,
}

impl CallingCode {
    pub fn new(display_name: impl Into<String>, calling_code: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            calling_code: normalize_calling_code(&calling_code.into()),
        }
    }

    /// Dropdown label, e.g. `Portugal (+351)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.calling_code)
    }
}

/// Prefix a bare dialing code with `+`. Blank input stays blank.
pub fn normalize_calling_code(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() || code.starts_with('+') {
        code.to_string()
    } else {
        format!("+{}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_calling_code() {
        assert_eq!(normalize_calling_code("351"), "+351");
        assert_eq!(normalize_calling_code("+1"), "+1");
        assert_eq!(normalize_calling_code(" 44 "), "+44");
        assert_eq!(normalize_calling_code(""), "");
    }

    #[test]
    fn test_label() {
        let code = CallingCode::new("Portugal", "351");
        assert_eq!(code.label(), "Portugal (+351)");
    }
}
