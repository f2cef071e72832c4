//! Outbound request construction

use crate::context::AmbientContext;
use crate::error::{Error, Result};
use crate::provider::{ChatRequest, Message, OutboundRequest, ToolSchema};
use crate::tools::ToolRegistry;

use super::SystemPrompt;

/// Assembles chat requests for one model and tool registry
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    model: String,
    api_key: Option<String>,
    system_prompt: SystemPrompt,
}

impl RequestBuilder {
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.into(),
            // An empty key is as good as none
            api_key: api_key.filter(|k| !k.is_empty()),
            system_prompt: SystemPrompt::new(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: SystemPrompt) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request for `transcript`.
    ///
    /// Fails with [`Error::CredentialMissing`] before doing anything else
    /// when no API key is configured. The initial system message is always
    /// generated fresh and placed first.
    pub fn build(
        &self,
        transcript: &[Message],
        registry: &ToolRegistry,
        ambient: &AmbientContext,
    ) -> Result<OutboundRequest> {
        let api_key = self.api_key.clone().ok_or(Error::CredentialMissing)?;

        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(Message::system(self.system_prompt.build(registry, ambient)));
        messages.extend_from_slice(transcript);

        Ok(OutboundRequest {
            api_key,
            body: ChatRequest {
                model: self.model.clone(),
                messages,
                stream: false,
                tools: registry.list().into_iter().map(ToolSchema::from).collect(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_fails_fast() {
        let builder = RequestBuilder::new("openai/gpt-4.1-mini", None);
        let result = builder.build(
            &[Message::user("hi")],
            &ToolRegistry::new(),
            &AmbientContext::new(),
        );
        assert!(matches!(result, Err(Error::CredentialMissing)));

        let builder = RequestBuilder::new("openai/gpt-4.1-mini", Some(String::new()));
        let result = builder.build(&[], &ToolRegistry::new(), &AmbientContext::new());
        assert!(matches!(result, Err(Error::CredentialMissing)));
    }

    #[test]
    fn test_request_shape() {
        let builder = RequestBuilder::new("openai/gpt-4.1-mini", Some("sk-test".to_string()))
            .with_system_prompt(SystemPrompt::with_base("Be brief.\n"));
        let transcript = vec![Message::system(":ctx"), Message::user("hi")];
        let request = builder
            .build(&transcript, &ToolRegistry::new(), &AmbientContext::new())
            .unwrap();

        assert_eq!(request.api_key, "sk-test");
        assert_eq!(request.body.model, "openai/gpt-4.1-mini");
        assert!(!request.body.stream);
        assert_eq!(request.body.messages.len(), 3);
        assert!(request.body.messages[0].content().unwrap().starts_with("Be brief."));
        assert_eq!(&request.body.messages[1..], &transcript[..]);

        let json = serde_json::to_value(&request.body).unwrap();
        assert_eq!(json["stream"], false);
        assert!(json.get("tools").is_none());
    }
}
