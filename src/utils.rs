//! Utility functions for the Solidity forge server

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::mcp::protocol::{error_codes, Response};

const FENCE: &str = "```";

/// Helper function to deserialize the full MCP `arguments` object into a typed input
pub fn parse_args<T: DeserializeOwned>(args: &Value, req_id: &Value) -> Result<T, Response> {
    from_value(args.clone()).map_err(|e| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Invalid arguments: {}", e),
        )
    })
}

/// Helper function to extract an optional string argument, treating blanks as absent
pub fn get_optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Languages recognised as a tag when code follows the fence on the same line.
const FENCE_LANGUAGES: [&str; 8] = [
    "json", "solidity", "sol", "javascript", "js", "typescript", "ts", "text",
];

/// Removes leading and trailing markdown code fences (with an optional language
/// tag on the opening fence) and surrounding whitespace. Repeats until the text
/// neither starts nor ends with a fence. Only the markers go; content on the
/// fence line is kept.
pub fn strip_code_fences(text: &str) -> String {
    let mut current = text.trim();
    loop {
        let before = current.len();
        if let Some(rest) = current.strip_prefix(FENCE) {
            current = skip_language_tag(rest).trim();
        }
        if let Some(stripped) = current.strip_suffix(FENCE) {
            current = stripped.trim();
        }
        if current.len() == before {
            return current.to_string();
        }
    }
}

fn skip_language_tag(rest: &str) -> &str {
    let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (word, after) = rest.split_at(word_end);
    if word.is_empty() {
        return rest;
    }
    let line_end = after.find('\n').unwrap_or(after.len());
    let tag_only = after[..line_end].trim().is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+#-_.".contains(c));
    if tag_only || FENCE_LANGUAGES.contains(&word.to_ascii_lowercase().as_str()) {
        return after;
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_language_tagged_fence() {
        let raw = "```solidity\n// SPDX\ncontract T {}\n```";
        assert_eq!(strip_code_fences(raw), "// SPDX\ncontract T {}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  contract T {}\n"), "contract T {}");
    }

    #[test]
    fn handles_nested_and_degenerate_fences() {
        assert_eq!(strip_code_fences("```\n```js\nx\n```\n```"), "x");
        assert_eq!(strip_code_fences("``````"), "");
        assert_eq!(strip_code_fences("```"), "");
        assert_eq!(strip_code_fences("code```"), "code");
    }

    #[test]
    fn inner_fences_survive() {
        let raw = "```\nconst a = `x`;\n// ```inner```\nlet b;\n```";
        assert_eq!(strip_code_fences(raw), "const a = `x`;\n// ```inner```\nlet b;");
    }

    #[test]
    fn result_never_has_outer_fences() {
        let samples = [
            "```",
            "````",
            "```\n",
            "x\n```\n```",
            "```ts\n```\n```\ny",
            "  ```a\nb```  ",
            "```describe(\"T\", () => {});```",
            "```json {\"code\": \"x\"}```",
        ];
        for s in samples {
            let out = strip_code_fences(s);
            assert!(!out.starts_with(FENCE), "{:?} -> {:?}", s, out);
            assert!(!out.ends_with(FENCE), "{:?} -> {:?}", s, out);
        }
    }

    #[test]
    fn single_line_fences_keep_their_content() {
        assert_eq!(
            strip_code_fences("```describe(\"T\", () => {});```"),
            "describe(\"T\", () => {});"
        );
        assert_eq!(strip_code_fences("```json {\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```contract A {}```"), "contract A {}");
        assert_eq!(
            strip_code_fences("```solidity pragma solidity ^0.8.20;\ncontract A {}\n```"),
            "pragma solidity ^0.8.20;\ncontract A {}"
        );
    }

    #[test]
    fn optional_str_ignores_blank_and_non_strings() {
        let args = json!({ "a": " x ", "b": "  ", "c": 3 });
        assert_eq!(get_optional_str(&args, "a").as_deref(), Some("x"));
        assert_eq!(get_optional_str(&args, "b"), None);
        assert_eq!(get_optional_str(&args, "c"), None);
        assert_eq!(get_optional_str(&args, "d"), None);
    }
}
