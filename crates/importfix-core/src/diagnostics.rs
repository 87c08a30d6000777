//! Parser for bundler resolution diagnostics.
//!
//! Recognises lines of the shape
//!
//! ```text
//! Could not resolve "../services/reelsService" from "Paginas/Reels.tsx"
//! ```
//!
//! as printed by esbuild/rollup, and Vite's `Failed to resolve import "..."
//! from "..."` variant. ANSI colour codes are stripped first. Lines that
//! mention a resolution failure but do not fit the shape are returned as
//! [`Error::MalformedDiagnosticLine`]; everything else is ignored.

use regex_lite::Regex;
use serde::Serialize;

use crate::error::Error;

const DIAGNOSTIC_PATTERN: &str =
    r#"(?:Could not resolve|[Ff]ailed to resolve import)\s+["']([^"']+)["']\s+from\s+["']([^"']+)["']"#;

const ANSI_PATTERN: &str = r"\x1b\[[0-9;]*[A-Za-z]";

/// Phrases that mark a line as a resolution diagnostic.
const TRIGGERS: &[&str] = &["Could not resolve", "ailed to resolve import"];

/// One import the bundler could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    /// Importing file as printed (usually project-relative).
    pub importer: String,
    pub specifier: String,
    /// 1-based line of the diagnostic text.
    pub line: usize,
}

/// Result of parsing diagnostic text.
#[derive(Debug, Default)]
pub struct DiagnosticParse {
    /// Requests in first-seen order, without duplicates.
    pub requests: Vec<ResolutionRequest>,
    /// Lines that looked like diagnostics but could not be parsed.
    pub malformed: Vec<Error>,
}

/// Parse diagnostic output into resolution requests.
#[must_use]
pub fn parse_diagnostics(text: &str) -> DiagnosticParse {
    let mut out = DiagnosticParse::default();

    let (Ok(re), Ok(ansi)) = (Regex::new(DIAGNOSTIC_PATTERN), Regex::new(ANSI_PATTERN)) else {
        return out;
    };

    for (idx, raw) in text.lines().enumerate() {
        let line = ansi.replace_all(raw, "");
        let mut matched = false;

        for caps in re.captures_iter(&line) {
            matched = true;
            let (Some(specifier), Some(importer)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let request = ResolutionRequest {
                importer: importer.as_str().to_string(),
                specifier: specifier.as_str().to_string(),
                line: idx + 1,
            };
            let seen = out
                .requests
                .iter()
                .any(|r| r.importer == request.importer && r.specifier == request.specifier);
            if !seen {
                out.requests.push(request);
            }
        }

        if !matched && TRIGGERS.iter().any(|t| line.contains(t)) {
            out.malformed.push(Error::MalformedDiagnosticLine {
                line: idx + 1,
                text: line.trim().to_string(),
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let parsed =
            parse_diagnostics(r#"Could not resolve "../services/reelsService" from "Paginas/Reels.tsx""#);
        assert_eq!(
            parsed.requests,
            vec![ResolutionRequest {
                importer: "Paginas/Reels.tsx".to_string(),
                specifier: "../services/reelsService".to_string(),
                line: 1,
            }]
        );
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn test_parse_mixed_output() {
        let text = "\
vite v5.0.0 building for production...
transforming...
\x1b[31merror\x1b[39m Could not resolve \"./a\" from \"src/x.ts\"
Could not resolve './b' from 'src/y.tsx'
[vite]: Rollup failed to resolve import \"@/hooks/useAuth\" from \"src/App.tsx\".
build failed
";
        let parsed = parse_diagnostics(text);
        let pairs: Vec<_> = parsed
            .requests
            .iter()
            .map(|r| (r.specifier.as_str(), r.importer.as_str(), r.line))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("./a", "src/x.ts", 3),
                ("./b", "src/y.tsx", 4),
                ("@/hooks/useAuth", "src/App.tsx", 5),
            ]
        );
    }

    #[test]
    fn test_duplicates_dropped() {
        let text = "Could not resolve \"./a\" from \"x.ts\"\nCould not resolve \"./a\" from \"x.ts\"\n";
        assert_eq!(parse_diagnostics(text).requests.len(), 1);
    }

    #[test]
    fn test_malformed_line_collected() {
        let text = "Could not resolve \"./a\"\nsomething else\n";
        let parsed = parse_diagnostics(text);
        assert!(parsed.requests.is_empty());
        assert_eq!(parsed.malformed.len(), 1);
        match &parsed.malformed[0] {
            Error::MalformedDiagnosticLine { line, text } => {
                assert_eq!(*line, 1);
                assert_eq!(text, "Could not resolve \"./a\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unrelated_text_ignored() {
        let parsed = parse_diagnostics("ok\n\nbuilt in 2.1s\n");
        assert!(parsed.requests.is_empty());
        assert!(parsed.malformed.is_empty());
    }
}
