//! Redirect rule file parsing.
//!
//! One rule per line, fields separated by whitespace:
//! - `/old -` or `/old - 410`: the path is gone (HTTP 410)
//! - `/old /new`: temporary redirect (HTTP 307)
//! - `/old /new 301`: redirect with an explicit status code
//!
//! Blank lines and lines starting with `#` are skipped. The first
//! malformed line aborts the whole parse so a broken file never
//! produces a partial rule set.

use hyper::StatusCode;
use std::fmt;

/// Status codes accepted in a rule's third field (besides 410).
pub const REDIRECT_STATUS_CODES: [StatusCode; 4] = [
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::TEMPORARY_REDIRECT,
    StatusCode::PERMANENT_REDIRECT,
];

/// Target field marking a rule as a removal instead of a redirect.
pub const GONE_PLACEHOLDER: &str = "-";

/// A single parsed rule line.
///
/// The two variants keep the data model honest: a gone rule can never
/// carry a target, and a redirect rule always has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The source path was removed with no replacement.
    Gone { source: String },
    /// The source path moved; clients should fetch `target` instead.
    Redirect {
        source: String,
        target: String,
        status: StatusCode,
    },
}

impl Rule {
    /// Path key this rule matches, exactly as written in the rule file.
    pub fn source(&self) -> &str {
        match self {
            Self::Gone { source } | Self::Redirect { source, .. } => source,
        }
    }

    /// Redirect destination; `None` for gone rules.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Gone { .. } => None,
            Self::Redirect { target, .. } => Some(target),
        }
    }

    /// Status code sent to the client for this rule.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Gone { .. } => StatusCode::GONE,
            Self::Redirect { status, .. } => *status,
        }
    }

    /// Parse a single rule line (already stripped of comments/blanks).
    ///
    /// Validation runs in two steps: token count first, then token
    /// content. A `410` in the third field selects a gone rule and
    /// requires the `-` placeholder as the second field; any other
    /// explicit code must be one of the redirect codes. Note that
    /// `/old - 301` is a redirect to the literal target `-`: the
    /// placeholder is only special when the code is 410 or absent.
    pub fn from_line(line: &str) -> Result<Self, LineError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(LineError::Empty);
        }
        if tokens.len() < 2 || tokens.len() > 3 {
            return Err(LineError::TokenCount(tokens.len()));
        }

        let source = tokens[0];
        let second = tokens[1];
        let code = tokens.get(2).copied();

        if code == Some("410") {
            if second == GONE_PLACEHOLDER {
                return Ok(Self::Gone {
                    source: source.to_string(),
                });
            }
            return Err(LineError::GonePlaceholder);
        }

        if second == GONE_PLACEHOLDER && code.is_none() {
            return Ok(Self::Gone {
                source: source.to_string(),
            });
        }

        let status = match code {
            None => StatusCode::TEMPORARY_REDIRECT,
            Some(token) => parse_redirect_status(token)?,
        };

        Ok(Self::Redirect {
            source: source.to_string(),
            target: second.to_string(),
            status,
        })
    }
}

impl fmt::Display for Rule {
    /// Canonical line form; parsing it back yields an equal rule.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            None => write!(f, "{} {GONE_PLACEHOLDER} 410", self.source()),
            Some(target) => write!(f, "{} {target} {}", self.source(), self.status().as_u16()),
        }
    }
}

/// Parse and validate an explicit redirect status token.
fn parse_redirect_status(token: &str) -> Result<StatusCode, LineError> {
    let code: u16 = token
        .parse()
        .map_err(|_| LineError::InvalidStatus(token.to_string()))?;
    let status =
        StatusCode::from_u16(code).map_err(|_| LineError::InvalidStatus(token.to_string()))?;
    if REDIRECT_STATUS_CODES.contains(&status) {
        Ok(status)
    } else {
        Err(LineError::NotRedirect(code))
    }
}

/// Why a single rule line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// No fields at all (whitespace-only input).
    Empty,
    /// Wrong number of whitespace-separated fields.
    TokenCount(usize),
    /// `410` given but the target field is not the `-` placeholder.
    GonePlaceholder,
    /// Third field does not parse as an HTTP status code.
    InvalidStatus(String),
    /// Third field is a status code but not a redirect code.
    NotRedirect(u16),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty rule"),
            Self::TokenCount(n) => write!(f, "expected 2 or 3 fields, found {n}"),
            Self::GonePlaceholder => write!(
                f,
                "gone rules require the target field to be the '{GONE_PLACEHOLDER}' placeholder"
            ),
            Self::InvalidStatus(token) => write!(f, "'{token}' is not an HTTP status code"),
            Self::NotRedirect(code) => write!(
                f,
                "{code} is not a redirect status code (allowed: 301, 302, 307, 308)"
            ),
        }
    }
}

impl std::error::Error for LineError {}

/// Parse failure with the offending line attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number in the rule file.
    pub line: usize,
    /// The offending line, trimmed, as read.
    pub text: String,
    pub kind: LineError,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ({:?}): {}", self.line, self.text, self.kind)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Parse a whole rule file, stopping at the first malformed line.
///
/// Blank lines and `#` comments are skipped; surviving lines go
/// through [`Rule::from_line`] in file order.
pub fn parse_rules(input: &str) -> Result<Vec<Rule>, ParseError> {
    let mut rules = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Rule::from_line(line) {
            Ok(rule) => rules.push(rule),
            Err(kind) => {
                return Err(ParseError {
                    line: idx + 1,
                    text: line.to_string(),
                    kind,
                })
            }
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gone_without_code() {
        let rule = Rule::from_line("/old -").unwrap();
        assert_eq!(
            rule,
            Rule::Gone {
                source: "/old".to_string()
            }
        );
        assert_eq!(rule.status(), StatusCode::GONE);
        assert_eq!(rule.target(), None);
    }

    #[test]
    fn test_gone_with_explicit_410() {
        let rule = Rule::from_line("/old - 410").unwrap();
        assert_eq!(rule.source(), "/old");
        assert_eq!(rule.status(), StatusCode::GONE);
    }

    #[test]
    fn test_redirect_defaults_to_307() {
        let rule = Rule::from_line("/old /new").unwrap();
        assert_eq!(
            rule,
            Rule::Redirect {
                source: "/old".to_string(),
                target: "/new".to_string(),
                status: StatusCode::TEMPORARY_REDIRECT,
            }
        );
    }

    #[test]
    fn test_redirect_with_explicit_code() {
        for (token, status) in [
            ("301", StatusCode::MOVED_PERMANENTLY),
            ("302", StatusCode::FOUND),
            ("307", StatusCode::TEMPORARY_REDIRECT),
            ("308", StatusCode::PERMANENT_REDIRECT),
        ] {
            let rule = Rule::from_line(&format!("/a /b {token}")).unwrap();
            assert_eq!(rule.status(), status);
            assert_eq!(rule.target(), Some("/b"));
        }
    }

    #[test]
    fn test_410_requires_placeholder_target() {
        assert_eq!(
            Rule::from_line("/old /new 410"),
            Err(LineError::GonePlaceholder)
        );
    }

    #[test]
    fn test_dash_with_redirect_code_is_a_redirect() {
        // The placeholder is only special with code 410 or no code at
        // all; "- 301" redirects to a literal "-" target.
        let rule = Rule::from_line("/old - 301").unwrap();
        assert_eq!(rule.target(), Some("-"));
        assert_eq!(rule.status(), StatusCode::MOVED_PERMANENTLY);
    }

    #[test]
    fn test_rejects_non_redirect_status() {
        assert_eq!(Rule::from_line("/a /b 200"), Err(LineError::NotRedirect(200)));
        assert_eq!(Rule::from_line("/a /b 404"), Err(LineError::NotRedirect(404)));
    }

    #[test]
    fn test_rejects_non_numeric_status() {
        assert_eq!(
            Rule::from_line("/a /b moved"),
            Err(LineError::InvalidStatus("moved".to_string()))
        );
        // Out of the valid status range entirely.
        assert_eq!(
            Rule::from_line("/a /b 9999"),
            Err(LineError::InvalidStatus("9999".to_string()))
        );
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        assert_eq!(Rule::from_line(""), Err(LineError::Empty));
        assert_eq!(Rule::from_line("   "), Err(LineError::Empty));
        assert_eq!(Rule::from_line("/lonely"), Err(LineError::TokenCount(1)));
        assert_eq!(
            Rule::from_line("/a /b 301 extra"),
            Err(LineError::TokenCount(4))
        );
    }

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let input = "# header comment\n\n/a /b\n   \n# trailing\n/c -\n";
        let rules = parse_rules(input).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].source(), "/a");
        assert_eq!(rules[1].source(), "/c");
    }

    #[test]
    fn test_parse_reports_offending_line() {
        let input = "/a /b\n/bad /target 410\n/c -\n";
        let err = parse_rules(input).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.text, "/bad /target 410");
        assert_eq!(err.kind, LineError::GonePlaceholder);
        let message = err.to_string();
        assert!(message.contains("line 2"));
        assert!(message.contains("/bad /target 410"));
    }

    #[test]
    fn test_parse_stops_at_first_error() {
        // Both lines are bad; only the first is reported.
        let err = parse_rules("/a /b 200\n/c /d nonsense\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, LineError::NotRedirect(200));
    }

    #[test]
    fn test_display_round_trips_effective_fields() {
        for line in ["/old -", "/old - 410", "/a /b", "/a /b 301", "/x /y 308"] {
            let rule = Rule::from_line(line).unwrap();
            let reparsed = Rule::from_line(&rule.to_string()).unwrap();
            assert_eq!(rule, reparsed, "round trip failed for {line:?}");
        }
    }
}
