//! `fetch`-backed adapters for the FocusDeck HTTP API.
//!
//! Every authenticated call attaches the stored access token as a bearer header. Transport
//! and non-2xx failures come back as `Err(String)` so the runtime can degrade the affected
//! list instead of failing the shell.

use platform_host::{
    AssistantFuture, AssistantPrompt, AssistantService, AuthFuture, AuthService, ConsentFuture,
    ConsentRecord, ConsentService, ContentFuture, Credentials, DeckRecord, DecksService,
    EmailId, EmailRecord, MailFolder, MailboxFuture, MailboxService, NoteRecord, NotesService,
    OutgoingEmail, TokenPair,
};
use serde::{Deserialize, Serialize};

use crate::{
    bridge::{fetch_json, fetch_status, ApiRequest},
    WebPrefsStore,
};

const NOTES_URL: &str = "/api/notes";
const DECKS_URL: &str = "/api/decks";
const MAIL_URL: &str = "/api/mail";
const MAIL_SEND_URL: &str = "/api/mail/send";
const AUTH_VALIDATE_URL: &str = "/v1/auth/validate";
const AUTH_REFRESH_URL: &str = "/v1/auth/refresh";
const AUTH_LOGIN_URL: &str = "/v1/auth/login";
const CONSENT_URL: &str = "/v1/privacy/consent";
const JARVIS_URL: &str = "/v1/jarvis/chat";

fn authed_get(url: impl Into<String>) -> ApiRequest {
    ApiRequest::get(url).bearer(WebPrefsStore.access_token())
}

/// Maps a validation status code to a verdict. Anything other than success or an auth
/// rejection is a failed check, not an invalid token.
fn validation_verdict(status: u16) -> Result<bool, String> {
    match status {
        200..=299 => Ok(true),
        401 | 403 => Ok(false),
        other => Err(format!("token validation returned HTTP {other}")),
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Auth service backed by `/v1/auth/*`.
pub struct HttpAuthService;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

impl AuthService for HttpAuthService {
    fn validate<'a>(&'a self, access_token: &'a str) -> AuthFuture<'a, Result<bool, String>> {
        Box::pin(async move {
            let request =
                ApiRequest::get(AUTH_VALIDATE_URL).bearer(Some(access_token.to_string()));
            validation_verdict(fetch_status(&request).await?)
        })
    }

    fn refresh<'a>(&'a self, refresh_token: &'a str) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async move {
            let request = ApiRequest::post_json(AUTH_REFRESH_URL, &RefreshBody { refresh_token })?;
            fetch_json(&request).await
        })
    }

    fn sign_in<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> AuthFuture<'a, Result<TokenPair, String>> {
        Box::pin(async move {
            let request = ApiRequest::post_json(AUTH_LOGIN_URL, credentials)?;
            fetch_json(&request).await
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Notes service backed by `/api/notes`.
pub struct HttpNotesService;

impl NotesService for HttpNotesService {
    fn list(&self) -> ContentFuture<'_, Result<Vec<NoteRecord>, String>> {
        Box::pin(async { fetch_json(&authed_get(NOTES_URL)).await })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Deck service backed by `/api/decks`.
pub struct HttpDecksService;

impl DecksService for HttpDecksService {
    fn list(&self) -> ContentFuture<'_, Result<Vec<DeckRecord>, String>> {
        Box::pin(async { fetch_json(&authed_get(DECKS_URL)).await })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Mailbox service backed by `/api/mail`.
pub struct HttpMailboxService;

#[derive(Deserialize)]
struct SendResponse {
    id: EmailId,
}

impl MailboxService for HttpMailboxService {
    fn list(&self, folder: MailFolder) -> MailboxFuture<'_, Result<Vec<EmailRecord>, String>> {
        Box::pin(async move {
            let url = format!("{MAIL_URL}?folder={}", folder.as_str());
            fetch_json(&authed_get(url)).await
        })
    }

    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> MailboxFuture<'a, Result<EmailId, String>> {
        Box::pin(async move {
            let request =
                ApiRequest::post_json(MAIL_SEND_URL, email)?.bearer(WebPrefsStore.access_token());
            let response: SendResponse = fetch_json(&request).await?;
            Ok(response.id)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Consent service backed by `/v1/privacy/consent`.
pub struct HttpConsentService;

impl ConsentService for HttpConsentService {
    fn get_consent(&self) -> ConsentFuture<'_, Result<Vec<ConsentRecord>, String>> {
        Box::pin(async { fetch_json(&authed_get(CONSENT_URL)).await })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Assistant service backed by `/v1/jarvis/chat`.
pub struct HttpAssistantService;

#[derive(Deserialize)]
struct ReplyResponse {
    reply: String,
}

impl AssistantService for HttpAssistantService {
    fn reply<'a>(
        &'a self,
        prompt: &'a AssistantPrompt,
    ) -> AssistantFuture<'a, Result<String, String>> {
        Box::pin(async move {
            let request =
                ApiRequest::post_json(JARVIS_URL, prompt)?.bearer(WebPrefsStore.access_token());
            let response: ReplyResponse = fetch_json(&request).await?;
            Ok(response.reply)
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validation_distinguishes_rejection_from_outage() {
        assert_eq!(validation_verdict(204), Ok(true));
        assert_eq!(validation_verdict(401), Ok(false));
        assert_eq!(
            validation_verdict(502),
            Err("token validation returned HTTP 502".to_string())
        );
    }

    #[test]
    fn host_target_requests_fail_with_the_endpoint_named() {
        let err = block_on(HttpNotesService.list()).expect_err("no fetch off wasm");
        assert!(err.contains("GET /api/notes"), "{err}");
        let err = block_on(HttpMailboxService.list(MailFolder::Sent)).expect_err("no fetch");
        assert!(err.contains("/api/mail?folder=sent"), "{err}");
    }
}
