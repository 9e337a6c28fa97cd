pub mod scan;

use serde_json::Value;

/// Serialization format of a tracker block body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    Json,
    Yaml,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Classifies a raw block body by structural prefix/suffix: bracket-delimited
/// text is JSON, everything else is treated as YAML.
pub fn detect_format(text: &str) -> BlockFormat {
    let trimmed = text.trim();
    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    {
        BlockFormat::Json
    } else {
        BlockFormat::Yaml
    }
}

/// Parses a block body into a generic value tree, auto-detecting the format
/// when none is forced. Failures are returned to the caller, never swallowed;
/// it decides whether to skip the block or abort the message.
pub fn parse(text: &str, format: Option<BlockFormat>) -> Result<Value, ParseError> {
    match format.unwrap_or_else(|| detect_format(text)) {
        BlockFormat::Json => Ok(serde_json::from_str(text)?),
        BlockFormat::Yaml => Ok(serde_yaml::from_str(text)?),
    }
}

/// Inverse of [`parse`], for format-conversion use cases. JSON output is
/// pretty-printed; YAML output ends with a newline.
pub fn serialize(tree: &Value, format: BlockFormat) -> Result<String, ParseError> {
    match format {
        BlockFormat::Json => Ok(serde_json::to_string_pretty(tree)?),
        BlockFormat::Yaml => Ok(serde_yaml::to_string(tree)?),
    }
}

/// Renders a value tree as a complete fenced tracker block.
pub fn render_block(
    tree: &Value,
    format: BlockFormat,
    identifier: &str,
) -> Result<String, ParseError> {
    let body = serialize(tree, format)?;
    let body = body.trim_end_matches('\n');
    Ok(format!("```{identifier}\n{body}\n```"))
}

/// Re-encodes an existing block body into `target` format, producing a new
/// fenced block.
pub fn convert_block(
    body: &str,
    target: BlockFormat,
    identifier: &str,
) -> Result<String, ParseError> {
    let tree = parse(body, None)?;
    render_block(&tree, target, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn bracket_delimited_text_is_json() {
        assert_eq!(detect_format("{\"a\": 1}"), BlockFormat::Json);
        assert_eq!(detect_format("  [1, 2]  "), BlockFormat::Json);
    }

    #[test]
    fn everything_else_is_yaml() {
        assert_eq!(detect_format("a: 1\nb: 2"), BlockFormat::Yaml);
        assert_eq!(detect_format("{unclosed"), BlockFormat::Yaml);
    }

    #[test]
    fn parse_auto_detects_both_formats() {
        let from_json = parse("{\"ap\": 50}", None).unwrap();
        let from_yaml = parse("ap: 50", None).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = parse("{ broken", Some(BlockFormat::Json));
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = parse(": :\n\t- bad", Some(BlockFormat::Yaml));
        assert!(matches!(result, Err(ParseError::Yaml(_))));
    }

    #[test]
    fn json_round_trip() {
        let tree = json!({
            "worldData": {"current_date": "2024-06-01", "icons": {"ap": "💖"}},
            "cards": [{"name": "Alice", "ap": 50, "active": true}],
        });
        let text = serialize(&tree, BlockFormat::Json).unwrap();
        assert_eq!(parse(&text, Some(BlockFormat::Json)).unwrap(), tree);
    }

    #[test]
    fn yaml_round_trip() {
        let tree = json!({
            "current_date": "2024-06-01",
            "Alice": {"ap": 50, "items": ["sword", "rope"], "active": false},
        });
        let text = serialize(&tree, BlockFormat::Yaml).unwrap();
        assert_eq!(parse(&text, Some(BlockFormat::Yaml)).unwrap(), tree);
    }

    #[test]
    fn rendered_block_is_fenced_with_identifier() {
        let block = render_block(&json!({"ap": 1}), BlockFormat::Json, "sim-tracker").unwrap();
        assert!(block.starts_with("```sim-tracker\n"));
        assert!(block.ends_with("\n```"));
    }

    #[test]
    fn convert_block_json_to_yaml_and_back() {
        let yaml_block = convert_block("{\"ap\": 50}", BlockFormat::Yaml, "sim").unwrap();
        let body = yaml_block
            .trim_start_matches("```sim\n")
            .trim_end_matches("```");
        assert_eq!(parse(body, None).unwrap(), json!({"ap": 50}));
    }
}
