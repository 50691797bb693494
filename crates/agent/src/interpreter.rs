use thiserror::Error;

pub const SEARCH_TOOL: &str = "search_products";
pub const DETAILS_TOOL: &str = "get_product_details";

const SEARCH_MARKER: &str = "search_term=\"";
const DETAILS_MARKER: &str = "product_id=\"";

/// What the model's free-text reply turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelOutput {
    ToolCall(ToolCall),
    /// No capability name in the text; pass it through as the reply.
    Reply(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolCall {
    SearchProducts { search_term: String },
    GetProductDetails { product_id: String },
}

impl ToolCall {
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::SearchProducts { .. } => SEARCH_TOOL,
            Self::GetProductDetails { .. } => DETAILS_TOOL,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterpretError {
    #[error("model output names `{tool}` but the `{marker}` marker is missing")]
    MissingMarker { tool: &'static str, marker: &'static str },
    #[error("model output has an unterminated argument after `{marker}`")]
    UnterminatedArgument { marker: &'static str },
    #[error("model output has an empty argument after `{marker}`")]
    EmptyArgument { marker: &'static str },
}

/// Scrape the reply for a pseudo tool call.
///
/// This is substring matching over free text, not a grammar: the capability
/// name is located first, then the quoted argument is recovered by splitting
/// on the fixed marker. When both capability names appear, the details
/// lookup takes precedence (the prompt demands a single call per reply).
pub fn interpret(output: &str) -> Result<ModelOutput, InterpretError> {
    if output.contains(DETAILS_TOOL) {
        details_call(output)
    } else if output.contains(SEARCH_TOOL) {
        search_call(output)
    } else {
        Ok(ModelOutput::Reply(output.trim().to_string()))
    }
}

fn search_call(output: &str) -> Result<ModelOutput, InterpretError> {
    let search_term = extract_argument(output, SEARCH_TOOL, SEARCH_MARKER)?;
    Ok(ModelOutput::ToolCall(ToolCall::SearchProducts { search_term }))
}

fn details_call(output: &str) -> Result<ModelOutput, InterpretError> {
    let product_id = extract_argument(output, DETAILS_TOOL, DETAILS_MARKER)?;
    Ok(ModelOutput::ToolCall(ToolCall::GetProductDetails { product_id }))
}

fn extract_argument(
    output: &str,
    tool: &'static str,
    marker: &'static str,
) -> Result<String, InterpretError> {
    let Some((_, tail)) = output.split_once(marker) else {
        return Err(InterpretError::MissingMarker { tool, marker });
    };

    let Some((value, _)) = tail.split_once('"') else {
        return Err(InterpretError::UnterminatedArgument { marker });
    };

    let value = value.trim();
    if value.is_empty() {
        return Err(InterpretError::EmptyArgument { marker });
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{interpret, InterpretError, ModelOutput, ToolCall};

    #[test]
    fn well_formed_search_call_is_recovered() {
        let output = interpret(r#"search_products(search_term="smart devices")"#);
        assert_eq!(
            output,
            Ok(ModelOutput::ToolCall(ToolCall::SearchProducts {
                search_term: "smart devices".to_string()
            }))
        );
    }

    #[test]
    fn well_formed_details_call_is_recovered() {
        let output = interpret(r#"get_product_details(product_id="1001")"#);
        assert_eq!(
            output,
            Ok(ModelOutput::ToolCall(ToolCall::GetProductDetails {
                product_id: "1001".to_string()
            }))
        );
    }

    #[test]
    fn surrounding_prose_does_not_break_extraction() {
        let output = interpret(
            r#"Sure, let me check. search_products(search_term="laptop") I'll report back."#,
        );
        assert_eq!(
            output,
            Ok(ModelOutput::ToolCall(ToolCall::SearchProducts {
                search_term: "laptop".to_string()
            }))
        );
    }

    #[test]
    fn missing_marker_is_an_error() {
        let output = interpret("I would call search_products for you");
        assert!(matches!(output, Err(InterpretError::MissingMarker { .. })));
    }

    #[test]
    fn unterminated_argument_is_an_error() {
        let output = interpret(r#"get_product_details(product_id="1001"#);
        assert!(matches!(output, Err(InterpretError::UnterminatedArgument { .. })));
    }

    #[test]
    fn empty_argument_is_an_error() {
        let output = interpret(r#"search_products(search_term="")"#);
        assert!(matches!(output, Err(InterpretError::EmptyArgument { .. })));
    }

    #[test]
    fn plain_reply_passes_through_trimmed() {
        let output = interpret("  Happy to help with anything else!  ");
        assert_eq!(output, Ok(ModelOutput::Reply("Happy to help with anything else!".to_string())));
    }

    #[test]
    fn details_call_takes_precedence_when_both_appear() {
        let output = interpret(
            r#"search_products(search_term="phone") or maybe get_product_details(product_id="1002")"#,
        );
        assert_eq!(
            output,
            Ok(ModelOutput::ToolCall(ToolCall::GetProductDetails {
                product_id: "1002".to_string()
            }))
        );
    }
}
