//! Folder lists, selection and the optimistic send pipeline.

use std::collections::BTreeMap;

use desktop_app_contract::ListState;
use platform_host::{EmailId, EmailRecord, MailFolder, OutgoingEmail};
use serde::{Deserialize, Serialize};

use crate::compose::{ComposeError, ComposeField, ComposeForm};

const LOCAL_ID_PREFIX: &str = "local-";

/// Email window state owned by the desktop runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailState {
    /// Folder shown in the message list.
    pub active_folder: MailFolder,
    folders: BTreeMap<MailFolder, ListState<EmailRecord>>,
    /// Message open in the reading pane.
    pub selected: Option<EmailId>,
    /// Open compose modal.
    pub compose: Option<ComposeForm>,
    unconfirmed: Vec<EmailRecord>,
    next_local_id: u64,
}

impl Default for EmailState {
    fn default() -> Self {
        Self {
            active_folder: MailFolder::Inbox,
            folders: MailFolder::ALL
                .into_iter()
                .map(|folder| (folder, ListState::Loading))
                .collect(),
            selected: None,
            compose: None,
            unconfirmed: Vec::new(),
            next_local_id: 1,
        }
    }
}

/// User and host events for the email window.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailAction {
    /// The mailbox answered a folder listing.
    FolderLoaded {
        /// Listed folder.
        folder: MailFolder,
        /// Listing result.
        result: Result<Vec<EmailRecord>, String>,
    },
    /// Sidebar folder clicked.
    SelectFolder(MailFolder),
    /// Fetch the active folder again.
    Reload,
    /// Message row clicked.
    SelectEmail(EmailId),
    /// Compose button clicked.
    OpenCompose,
    /// Compose field edited.
    EditCompose(ComposeField, String),
    /// Compose modal closed without sending.
    DiscardCompose,
    /// Compose Send clicked.
    Send,
    /// The mailbox answered a send.
    SendFinished {
        /// Provisional id the message was shown under.
        local_id: EmailId,
        /// Server id or failure.
        result: Result<EmailId, String>,
    },
}

/// Host work requested by the email state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailEffect {
    /// List one folder.
    LoadFolder(MailFolder),
    /// Submit a message shown under `local_id`.
    Send {
        /// Provisional id.
        local_id: EmailId,
        /// Message to send.
        email: OutgoingEmail,
    },
    /// Raise a non-blocking shell notice.
    Notice(String),
}

impl EmailState {
    /// Effects to run when an email window opens.
    pub fn on_mount(&self) -> Vec<EmailEffect> {
        vec![EmailEffect::LoadFolder(self.active_folder)]
    }

    /// List state for one folder.
    pub fn folder(&self, folder: MailFolder) -> &ListState<EmailRecord> {
        static LOADING: ListState<EmailRecord> = ListState::Loading;
        self.folders.get(&folder).unwrap_or(&LOADING)
    }

    /// Messages in the active folder, most recent first.
    pub fn active_emails(&self) -> &[EmailRecord] {
        self.folder(self.active_folder).items()
    }

    /// Unread messages in the inbox.
    pub fn unread_count(&self) -> usize {
        self.folder(MailFolder::Inbox)
            .items()
            .iter()
            .filter(|email| !email.is_read)
            .count()
    }

    /// The message open in the reading pane.
    pub fn selected_email(&self) -> Option<&EmailRecord> {
        let id = self.selected.as_ref()?;
        self.active_emails().iter().find(|email| &email.id == id)
    }

    /// Whether `id` is a provisional id for a send still in flight.
    pub fn is_unconfirmed(&self, id: &EmailId) -> bool {
        self.unconfirmed.iter().any(|email| &email.id == id)
    }

    /// Applies one action.
    ///
    /// # Errors
    ///
    /// `Send` with an empty field returns the [`ComposeError`]; the modal stays open with the
    /// error recorded and no folder changes.
    pub fn update(&mut self, action: EmailAction) -> Result<Vec<EmailEffect>, ComposeError> {
        let effects = match action {
            EmailAction::FolderLoaded { folder, result } => {
                self.apply_listing(folder, result);
                Vec::new()
            }
            EmailAction::SelectFolder(folder) => {
                self.active_folder = folder;
                self.selected = None;
                if self.folder(folder).is_loading() {
                    vec![EmailEffect::LoadFolder(folder)]
                } else {
                    Vec::new()
                }
            }
            EmailAction::Reload => vec![EmailEffect::LoadFolder(self.active_folder)],
            EmailAction::SelectEmail(id) => {
                self.mark_read(&id);
                self.selected = Some(id);
                Vec::new()
            }
            EmailAction::OpenCompose => {
                self.compose.get_or_insert_with(ComposeForm::default);
                Vec::new()
            }
            EmailAction::EditCompose(field, value) => {
                if let Some(form) = self.compose.as_mut() {
                    form.set(field, value);
                }
                Vec::new()
            }
            EmailAction::DiscardCompose => {
                self.compose = None;
                Vec::new()
            }
            EmailAction::Send => return self.send(),
            EmailAction::SendFinished { local_id, result } => self.finish_send(local_id, result),
        };
        Ok(effects)
    }

    /// Fills the compose form and sends it in one step.
    ///
    /// # Errors
    ///
    /// Same as [`EmailAction::Send`].
    pub fn fill_and_send(
        &mut self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<Vec<EmailEffect>, ComposeError> {
        self.compose = Some(ComposeForm {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            error: None,
        });
        self.send()
    }

    fn send(&mut self) -> Result<Vec<EmailEffect>, ComposeError> {
        let Some(form) = self.compose.as_mut() else {
            return Ok(Vec::new());
        };
        let email = match form.validate() {
            Ok(email) => email,
            Err(err) => {
                form.error = Some(err);
                return Err(err);
            }
        };

        let local_id = EmailId(format!("{LOCAL_ID_PREFIX}{}", self.next_local_id));
        self.next_local_id += 1;
        let record = EmailRecord {
            id: local_id.clone(),
            sender: format!("To: {}", email.to),
            subject: email.subject.clone(),
            snippet: email.snippet(),
            body: email.body.clone(),
            date: "Sending...".to_string(),
            is_read: true,
        };
        let sent_unlisted = self.folder(MailFolder::Sent).is_loading();
        self.unconfirmed.push(record.clone());
        self.sent_items_mut().insert(0, record);

        self.compose = None;
        self.active_folder = MailFolder::Sent;
        self.selected = None;
        let mut effects = vec![EmailEffect::Send { local_id, email }];
        // The provisional row makes Sent look loaded; fetch the rest of it now.
        if sent_unlisted {
            effects.push(EmailEffect::LoadFolder(MailFolder::Sent));
        }
        Ok(effects)
    }

    fn finish_send(
        &mut self,
        local_id: EmailId,
        result: Result<EmailId, String>,
    ) -> Vec<EmailEffect> {
        let Some(position) = self.unconfirmed.iter().position(|e| e.id == local_id) else {
            return Vec::new();
        };
        self.unconfirmed.remove(position);
        match result {
            Ok(server_id) => {
                if let Some(email) = self
                    .sent_items_mut()
                    .iter_mut()
                    .find(|email| email.id == local_id)
                {
                    email.id = server_id.clone();
                    email.date = "Just now".to_string();
                }
                if self.selected.as_ref() == Some(&local_id) {
                    self.selected = Some(server_id);
                }
                Vec::new()
            }
            Err(reason) => {
                if let Some(email) = self
                    .sent_items_mut()
                    .iter_mut()
                    .find(|email| email.id == local_id)
                {
                    email.date = "Not sent".to_string();
                }
                vec![EmailEffect::Notice(format!("Message could not be sent: {reason}"))]
            }
        }
    }

    fn apply_listing(&mut self, folder: MailFolder, result: Result<Vec<EmailRecord>, String>) {
        let result = match (folder, result) {
            (MailFolder::Sent, Ok(mut listed)) => {
                for pending in self.unconfirmed.iter().rev() {
                    if !listed.iter().any(|email| email.id == pending.id) {
                        listed.insert(0, pending.clone());
                    }
                }
                Ok(listed)
            }
            (_, result) => result,
        };
        let label = format!("{} folder", folder.label());
        self.folders
            .entry(folder)
            .or_default()
            .apply_result(result, &label);
    }

    fn sent_items_mut(&mut self) -> &mut Vec<EmailRecord> {
        self.folders
            .entry(MailFolder::Sent)
            .or_default()
            .ensure_items_mut()
    }

    fn mark_read(&mut self, id: &EmailId) {
        for list in self.folders.values_mut() {
            if let Some(items) = list.items_mut() {
                for email in items.iter_mut().filter(|email| &email.id == id) {
                    email.is_read = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn inbox_email(id: &str, read: bool) -> EmailRecord {
        EmailRecord {
            id: EmailId(id.to_string()),
            sender: "Alice Smith".to_string(),
            subject: format!("Subject {id}"),
            snippet: String::new(),
            body: String::new(),
            date: "Mon".to_string(),
            is_read: read,
        }
    }

    fn loaded() -> EmailState {
        let mut state = EmailState::default();
        state
            .update(EmailAction::FolderLoaded {
                folder: MailFolder::Inbox,
                result: Ok(vec![inbox_email("1", false), inbox_email("2", true)]),
            })
            .expect("load inbox");
        state
    }

    #[test]
    fn quidditch_send_lands_at_head_of_sent_and_closes_modal() {
        let mut state = loaded();
        state.update(EmailAction::OpenCompose).expect("open");
        let effects = state
            .fill_and_send(
                "harry@hogwarts.edu",
                "Quidditch Practice",
                "Don't forget your broom!",
            )
            .expect("valid compose");

        assert_eq!(state.compose, None);
        assert_eq!(state.active_folder, MailFolder::Sent);
        assert_eq!(state.active_emails()[0].subject, "Quidditch Practice");
        assert_eq!(
            effects,
            vec![
                EmailEffect::Send {
                    local_id: EmailId("local-1".to_string()),
                    email: OutgoingEmail {
                        to: "harry@hogwarts.edu".to_string(),
                        subject: "Quidditch Practice".to_string(),
                        body: "Don't forget your broom!".to_string(),
                    },
                },
                EmailEffect::LoadFolder(MailFolder::Sent),
            ]
        );
    }

    #[test]
    fn first_send_fetches_the_rest_of_sent_once() {
        let mut state = EmailState::default();
        let effects = state.fill_and_send("a@b.c", "Hi", "Body").expect("send");
        assert!(effects.contains(&EmailEffect::LoadFolder(MailFolder::Sent)));

        let effects = state.fill_and_send("a@b.c", "Again", "Body").expect("send");
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], EmailEffect::Send { .. }));
    }

    #[test]
    fn empty_subject_keeps_modal_open_and_sent_unchanged() {
        let mut state = loaded();
        state.update(EmailAction::OpenCompose).expect("open");
        let before = state.folder(MailFolder::Sent).clone();

        let err = state
            .fill_and_send("harry@hogwarts.edu", "", "Don't forget your broom!")
            .expect_err("subject required");

        assert_eq!(err, ComposeError::EmptyField(ComposeField::Subject));
        assert_eq!(state.compose.as_ref().and_then(|f| f.error), Some(err));
        assert_eq!(state.folder(MailFolder::Sent), &before);
        assert_eq!(state.active_folder, MailFolder::Inbox);
    }

    #[test]
    fn confirmed_send_swaps_in_server_id() {
        let mut state = loaded();
        state.fill_and_send("a@b.c", "Hi", "Body").expect("send");
        let local = EmailId("local-1".to_string());
        assert!(state.is_unconfirmed(&local));

        state
            .update(EmailAction::SendFinished {
                local_id: local.clone(),
                result: Ok(EmailId("srv-9".to_string())),
            })
            .expect("finish");
        assert_eq!(state.active_emails()[0].id, EmailId("srv-9".to_string()));
        assert!(!state.is_unconfirmed(&local));
    }

    #[test]
    fn failed_send_keeps_message_and_raises_notice() {
        let mut state = loaded();
        state.fill_and_send("a@b.c", "Hi", "Body").expect("send");
        let effects = state
            .update(EmailAction::SendFinished {
                local_id: EmailId("local-1".to_string()),
                result: Err("smtp offline".to_string()),
            })
            .expect("finish");

        assert_eq!(
            effects,
            vec![EmailEffect::Notice(
                "Message could not be sent: smtp offline".to_string()
            )]
        );
        assert_eq!(state.active_emails()[0].date, "Not sent");
    }

    #[test]
    fn sent_listing_keeps_unconfirmed_messages_on_top() {
        let mut state = loaded();
        state.fill_and_send("a@b.c", "Pending", "Body").expect("send");
        state
            .update(EmailAction::FolderLoaded {
                folder: MailFolder::Sent,
                result: Ok(vec![inbox_email("old", true)]),
            })
            .expect("load sent");
        let subjects: Vec<&str> = state
            .active_emails()
            .iter()
            .map(|e| e.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["Pending", "Subject old"]);
    }

    #[test]
    fn selecting_marks_read_and_updates_badge() {
        let mut state = loaded();
        assert_eq!(state.unread_count(), 1);
        state
            .update(EmailAction::SelectEmail(EmailId("1".to_string())))
            .expect("select");
        assert_eq!(state.unread_count(), 0);
        assert_eq!(state.selected_email().map(|e| e.id.0.as_str()), Some("1"));
    }

    #[test]
    fn discard_has_no_side_effects() {
        let mut state = loaded();
        state.update(EmailAction::OpenCompose).expect("open");
        state
            .update(EmailAction::EditCompose(ComposeField::Subject, "draft".to_string()))
            .expect("edit");
        let effects = state.update(EmailAction::DiscardCompose).expect("discard");
        assert!(effects.is_empty());
        assert_eq!(state.compose, None);
        assert!(state.folder(MailFolder::Sent).is_loading());
    }

    #[test]
    fn folders_load_once_and_failures_degrade() {
        let mut state = loaded();
        assert_eq!(
            state.update(EmailAction::SelectFolder(MailFolder::Trash)),
            Ok(vec![EmailEffect::LoadFolder(MailFolder::Trash)])
        );
        state
            .update(EmailAction::FolderLoaded {
                folder: MailFolder::Trash,
                result: Err("HTTP 503".to_string()),
            })
            .expect("degrade");
        assert_eq!(
            state.folder(MailFolder::Trash).notice(),
            Some("Trash folder unavailable: HTTP 503")
        );
        assert_eq!(state.update(EmailAction::SelectFolder(MailFolder::Inbox)), Ok(vec![]));
    }
}
