//! Model selector values

/// Model name used when the Ollama selection is left as `custom`
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

const OLLAMA_PREFIX: &str = "ollama:";

/// Where a model selector value is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelection {
    /// `ollama:<model>` runs on the local Ollama server
    Ollama(String),
    /// Anything else is an in-page model the embedding layer runs itself
    Embedded(String),
}

impl ModelSelection {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.strip_prefix(OLLAMA_PREFIX) {
            Some(model) => {
                let model = model.trim();
                if model.is_empty() || model == "custom" {
                    ModelSelection::Ollama(DEFAULT_OLLAMA_MODEL.to_string())
                } else {
                    ModelSelection::Ollama(model.to_string())
                }
            }
            None => ModelSelection::Embedded(value.to_string()),
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ModelSelection::Ollama(model) | ModelSelection::Embedded(model) => model,
        }
    }

    pub fn is_ollama(&self) -> bool {
        matches!(self, ModelSelection::Ollama(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            ModelSelection::parse("ollama:mistral"),
            ModelSelection::Ollama("mistral".to_string())
        );
        assert_eq!(ModelSelection::parse("ollama:custom").model(), DEFAULT_OLLAMA_MODEL);

        let embedded = ModelSelection::parse("Llama-3.2-1B-Instruct-q4f16_1-MLC");
        assert!(!embedded.is_ollama());
        assert_eq!(embedded.model(), "Llama-3.2-1B-Instruct-q4f16_1-MLC");
    }
}
