//! Settings document validation.
//!
//! # Responsibilities
//! - Structural validation of a parsed document against the settings schema
//! - Semantic checks serde cannot express (proxy completeness, device id shape)
//! - Attach line/column positions to every diagnostic
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function of (text, schema); the document is never mutated
//! - Positions come from a second lightweight scan of the text, since
//!   `serde_json::Value` does not retain spans

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// A single positioned diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// 1-based line of the offending value.
    pub line: usize,
    /// 1-based column of the offending value.
    pub column: usize,
    /// Dotted member path, e.g. `ProxyConfig.UseProxyPort`. Empty for the root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Line: {}, Position: {}]: {} {}",
            self.line, self.column, self.path, self.message
        )
    }
}

/// Parses `text` and validates it against `schema`.
///
/// An empty vector means the document is valid. A syntax error is returned as
/// `Err` since no diagnostics can be produced for text that does not parse.
pub fn validate_document(text: &str, schema: &Value) -> Result<Vec<ValidationError>, serde_json::Error> {
    let document: Value = serde_json::from_str(text)?;
    let positions = PositionIndex::build(text);

    let mut findings = Vec::new();
    check_value(&document, schema, "", &mut findings);
    check_semantics(&document, &mut findings);

    Ok(findings
        .into_iter()
        .map(|(path, message)| {
            let (line, column) = positions.locate(&path);
            ValidationError {
                line,
                column,
                path,
                message,
            }
        })
        .collect())
}

type Finding = (String, String);

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_matches(value: &Value, expected: &str) -> bool {
    let actual = type_name(value);
    actual == expected || (expected == "number" && actual == "integer")
}

fn check_value(value: &Value, schema: &Value, path: &str, out: &mut Vec<Finding>) {
    if let Some(expected) = schema.get("type") {
        let allowed: Vec<&str> = match expected {
            Value::String(t) => vec![t.as_str()],
            Value::Array(ts) => ts.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if !allowed.is_empty() && !allowed.iter().any(|t| type_matches(value, t)) {
            out.push((
                path.to_string(),
                format!(
                    "Invalid type. Expected {} but got {}.",
                    allowed.join(", "),
                    type_name(value)
                ),
            ));
            return;
        }
    }

    if let Some(Value::Array(options)) = schema.get("enum") {
        if !options.contains(value) {
            out.push((
                path.to_string(),
                format!("Value {} is not defined in enum.", value),
            ));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
            if n < min {
                out.push((
                    path.to_string(),
                    format!("{} is less than minimum value of {}.", value, min),
                ));
            }
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
            if n > max {
                out.push((
                    path.to_string(),
                    format!("{} exceeds maximum value of {}.", value, max),
                ));
            }
        }
    }

    if let Value::Object(members) = value {
        check_object(members, schema, path, out);
    }
}

fn check_object(
    members: &serde_json::Map<String, Value>,
    schema: &Value,
    path: &str,
    out: &mut Vec<Finding>,
) {
    if let Some(Value::Array(required)) = schema.get("required") {
        let missing: Vec<&str> = required
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| !members.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            out.push((
                path.to_string(),
                format!(
                    "Required properties are missing from object: {}.",
                    missing.join(", ")
                ),
            ));
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    let closed = matches!(schema.get("additionalProperties"), Some(Value::Bool(false)));

    for (name, member) in members {
        let member_path = child_path(path, name);
        match properties.and_then(|p| p.get(name)) {
            Some(member_schema) => check_value(member, member_schema, &member_path, out),
            None if closed => out.push((
                member_path,
                format!(
                    "Property '{}' has not been defined and the schema does not allow additional properties.",
                    name
                ),
            )),
            None => {}
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_semantics(document: &Value, out: &mut Vec<Finding>) {
    if let Some(proxy) = document.get("ProxyConfig").and_then(Value::as_object) {
        let enabled = |key: &str| proxy.get(key).and_then(Value::as_bool).unwrap_or(false);

        if enabled("UseProxy") {
            if is_blank(proxy.get("UseProxyHost")) || is_blank(proxy.get("UseProxyPort")) {
                out.push((
                    "ProxyConfig.UseProxy".to_string(),
                    "UseProxy is enabled but UseProxyHost and UseProxyPort are not both set."
                        .to_string(),
                ));
            }
            if enabled("UseProxyAuthentication")
                && (is_blank(proxy.get("UseProxyUsername")) || is_blank(proxy.get("UseProxyPassword")))
            {
                out.push((
                    "ProxyConfig.UseProxyAuthentication".to_string(),
                    "UseProxyAuthentication is enabled but UseProxyUsername and UseProxyPassword are not both set."
                        .to_string(),
                ));
            }
        }
    }

    if let Some(device) = document.get("DeviceConfig").and_then(Value::as_object) {
        let custom = device
            .get("DevicePackageName")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("custom"));
        if let (true, Some(id)) = (custom, device.get("DeviceId").and_then(Value::as_str)) {
            if id.is_empty() {
                out.push((
                    "DeviceConfig.DeviceId".to_string(),
                    "DeviceId must be set when DevicePackageName is 'custom'.".to_string(),
                ));
            } else if !id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
                out.push((
                    "DeviceConfig.DeviceId".to_string(),
                    "DeviceId must contain only lowercase hexadecimal digits.".to_string(),
                ));
            }
        }
    }
}

/// Maps dotted member paths to the line/column where their value starts.
struct PositionIndex {
    positions: HashMap<String, (usize, usize)>,
}

impl PositionIndex {
    fn build(text: &str) -> Self {
        let mut scanner = Scanner {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            positions: HashMap::new(),
        };
        // Only called on text serde_json already accepted; a scan failure just
        // leaves later paths unindexed.
        let _ = scanner.value(String::new());
        Self {
            positions: scanner.positions,
        }
    }

    /// Position of `path`, falling back to the nearest indexed ancestor.
    fn locate(&self, path: &str) -> (usize, usize) {
        let mut current = path;
        loop {
            if let Some(pos) = self.positions.get(current) {
                return *pos;
            }
            match current.rfind('.') {
                Some(idx) => current = &current[..idx],
                None if !current.is_empty() => current = "",
                None => return (1, 1),
            }
        }
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    positions: HashMap<String, (usize, usize)>,
}

impl Scanner {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Option<()> {
        self.skip_whitespace();
        (self.bump()? == want).then_some(())
    }

    fn value(&mut self, path: String) -> Option<()> {
        self.skip_whitespace();
        self.positions.insert(path.clone(), (self.line, self.column));
        match self.peek()? {
            '{' => self.object(&path),
            '[' => self.array(&path),
            '"' => self.string().map(|_| ()),
            _ => {
                while matches!(self.peek(), Some(c) if !c.is_whitespace() && !matches!(c, ',' | '}' | ']')) {
                    self.bump();
                }
                Some(())
            }
        }
    }

    fn object(&mut self, path: &str) -> Option<()> {
        self.expect('{')?;
        self.skip_whitespace();
        if self.peek()? == '}' {
            self.bump();
            return Some(());
        }
        loop {
            self.skip_whitespace();
            let key = self.string()?;
            self.expect(':')?;
            self.value(child_path(path, &key))?;
            self.skip_whitespace();
            match self.bump()? {
                ',' => continue,
                '}' => return Some(()),
                _ => return None,
            }
        }
    }

    fn array(&mut self, path: &str) -> Option<()> {
        self.expect('[')?;
        self.skip_whitespace();
        if self.peek()? == ']' {
            self.bump();
            return Some(());
        }
        let mut index = 0;
        loop {
            self.value(format!("{}[{}]", path, index))?;
            index += 1;
            self.skip_whitespace();
            match self.bump()? {
                ',' => continue,
                ']' => return Some(()),
                _ => return None,
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        if self.bump()? != '"' {
            return None;
        }
        let mut out = String::new();
        loop {
            match self.bump()? {
                '"' => return Some(out),
                '\\' => {
                    // Escapes are kept verbatim; keys in this document are plain ASCII.
                    out.push('\\');
                    out.push(self.bump()?);
                }
                c => out.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::settings_schema;

    const VALID: &str = r#"{
  "AuthConfig": {
    "AuthType": "google",
    "GoogleUsername": "user@example.com",
    "GooglePassword": "hunter2",
    "PtcUsername": null,
    "PtcPassword": null
  },
  "ProxyConfig": {
    "UseProxy": false,
    "UseProxyHost": null,
    "UseProxyPort": null,
    "UseProxyAuthentication": false,
    "UseProxyUsername": null,
    "UseProxyPassword": null
  },
  "DeviceConfig": {
    "DevicePlatform": "android",
    "DevicePackageName": "random",
    "DeviceId": "0123456789abcdef"
  }
}"#;

    #[test]
    fn test_valid_document_has_no_errors() {
        let errors = validate_document(VALID, &settings_schema()).unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_type_error_is_positioned() {
        let text = VALID.replace(r#""UseProxy": false"#, r#""UseProxy": "yes""#);
        let errors = validate_document(&text, &settings_schema()).unwrap();

        assert_eq!(errors.len(), 1);
        let err = &errors[0];
        assert_eq!(err.path, "ProxyConfig.UseProxy");
        assert_eq!(err.line, 10);
        assert_eq!(err.column, 17);
        assert!(err.message.contains("Expected boolean but got string"));
    }

    #[test]
    fn test_enum_and_range_errors() {
        let text = VALID
            .replace(r#""AuthType": "google""#, r#""AuthType": "facebook""#)
            .replace(r#""UseProxyPort": null"#, r#""UseProxyPort": 70000"#);
        let errors = validate_document(&text, &settings_schema()).unwrap();

        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"AuthConfig.AuthType"));
        assert!(paths.contains(&"ProxyConfig.UseProxyPort"));
    }

    #[test]
    fn test_unknown_and_missing_members() {
        let text = r#"{ "AuthConfig": { "AuthTyp": "google" }, "ProxyConfig": {} }"#;
        let errors = validate_document(text, &settings_schema()).unwrap();

        assert!(errors
            .iter()
            .any(|e| e.path.is_empty() && e.message.contains("DeviceConfig")));
        assert!(errors
            .iter()
            .any(|e| e.path == "AuthConfig.AuthTyp" && e.message.contains("has not been defined")));
    }

    #[test]
    fn test_null_root_member_is_rejected() {
        let text = VALID.replace(
            r#""AuthConfig": {
    "AuthType": "google",
    "GoogleUsername": "user@example.com",
    "GooglePassword": "hunter2",
    "PtcUsername": null,
    "PtcPassword": null
  }"#,
            r#""AuthConfig": null"#,
        );
        let errors = validate_document(&text, &settings_schema()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "AuthConfig");
        assert_eq!((errors[0].line, errors[0].column), (2, 17));
    }

    #[test]
    fn test_incomplete_proxy_is_reported() {
        let text = VALID
            .replace(r#""UseProxy": false"#, r#""UseProxy": true"#)
            .replace(r#""UseProxyAuthentication": false"#, r#""UseProxyAuthentication": true"#);
        let errors = validate_document(&text, &settings_schema()).unwrap();

        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["ProxyConfig.UseProxy", "ProxyConfig.UseProxyAuthentication"]
        );
    }

    #[test]
    fn test_custom_device_id_must_be_hex() {
        let text = VALID
            .replace(r#""DevicePackageName": "random""#, r#""DevicePackageName": "custom""#)
            .replace("0123456789abcdef", "NOT-HEX");
        let errors = validate_document(&text, &settings_schema()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "DeviceConfig.DeviceId");
    }

    #[test]
    fn test_empty_custom_device_id_is_reported() {
        let text = VALID
            .replace(r#""DevicePackageName": "random""#, r#""DevicePackageName": "custom""#)
            .replace("0123456789abcdef", "");
        let errors = validate_document(&text, &settings_schema()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "DeviceConfig.DeviceId");
        assert!(errors[0].message.contains("must be set"));
    }

    #[test]
    fn test_empty_device_id_is_fine_for_random() {
        let text = VALID.replace("0123456789abcdef", "");
        let errors = validate_document(&text, &settings_schema()).unwrap();
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_mixed_case_platform_is_accepted() {
        for platform in ["iOS", "IOS", "Android"] {
            let text = VALID.replace(
                r#""DevicePlatform": "android""#,
                &format!(r#""DevicePlatform": "{}""#, platform),
            );
            let errors = validate_document(&text, &settings_schema()).unwrap();
            assert!(errors.is_empty(), "{}: {:?}", platform, errors);
        }
    }

    #[test]
    fn test_syntax_error_is_returned() {
        assert!(validate_document("{ not json", &settings_schema()).is_err());
    }

    #[test]
    fn test_display_format() {
        let err = ValidationError {
            line: 3,
            column: 7,
            path: "AuthConfig.AuthType".into(),
            message: "Value \"x\" is not defined in enum.".into(),
        };
        assert_eq!(
            err.to_string(),
            "[Line: 3, Position: 7]: AuthConfig.AuthType Value \"x\" is not defined in enum."
        );
    }
}
