//! Assistant contract with canned and no-op adapters.

use std::{future::Future, pin::Pin};

use crate::{outage::Outage, AssistantPrompt};

/// Object-safe boxed future used by [`AssistantService`].
pub type AssistantFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External reasoning/response collaborator behind the chat window.
pub trait AssistantService {
    /// Produces one reply for `prompt`.
    fn reply<'a>(&'a self, prompt: &'a AssistantPrompt)
        -> AssistantFuture<'a, Result<String, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Assistant that is never available.
pub struct NoopAssistantService;

impl AssistantService for NoopAssistantService {
    fn reply<'a>(
        &'a self,
        _prompt: &'a AssistantPrompt,
    ) -> AssistantFuture<'a, Result<String, String>> {
        Box::pin(async { Err("assistant is not available on this host".to_string()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Assistant that acknowledges the prompt in its context's voice.
pub struct MemoryAssistantService {
    outage: Outage,
}

impl MemoryAssistantService {
    /// Makes `reply` fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.outage.set(reason);
    }
}

/// Canned reply text used by the in-memory and demo assistants.
pub fn canned_reply(prompt: &AssistantPrompt) -> String {
    format!(
        "**[{}]** I received: \"{}\".",
        prompt.context_label, prompt.message
    )
}

impl AssistantService for MemoryAssistantService {
    fn reply<'a>(
        &'a self,
        prompt: &'a AssistantPrompt,
    ) -> AssistantFuture<'a, Result<String, String>> {
        Box::pin(async move {
            self.outage.check()?;
            Ok(canned_reply(prompt))
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn canned_reply_names_the_context() {
        let prompt = AssistantPrompt {
            context: "coding".to_string(),
            context_label: "Code Companion".to_string(),
            message: "borrowck?".to_string(),
            history: Vec::new(),
        };
        assert_eq!(
            block_on(MemoryAssistantService::default().reply(&prompt)),
            Ok("**[Code Companion]** I received: \"borrowck?\".".to_string())
        );
        assert!(block_on(NoopAssistantService.reply(&prompt)).is_err());
    }
}
