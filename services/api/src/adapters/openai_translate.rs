//! services/api/src/adapters/openai_translate.rs
//!
//! A `TranslationService` backed by an OpenAI chat model, for devices that
//! prefer it over the public MyMemory endpoint.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use storyland_core::ports::{PortError, PortResult, TranslationService};
use storyland_core::Language;

fn language_name(language: Language) -> &'static str {
    match language {
        Language::English => "English",
        Language::Arabic => "Modern Standard Arabic",
    }
}

fn system_prompt(target: Language) -> String {
    format!(
        "You translate children's story text from English into {}. \
         Keep the wording simple enough for a young reader. \
         Respond with ONLY the translation, no quotes, no explanation.",
        language_name(target)
    )
}

pub struct OpenAiTranslationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTranslationAdapter {
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl TranslationService for OpenAiTranslationAdapter {
    async fn translate(&self, text: &str, target: Language) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt(target))
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text.to_string())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .temperature(0.2)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|translated| !translated.is_empty())
            .map(str::to_string)
            .ok_or_else(|| PortError::Unexpected("No translation generated".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_target_language() {
        assert!(system_prompt(Language::Arabic).contains("Arabic"));
        assert!(system_prompt(Language::Arabic).contains("ONLY the translation"));
    }
}
