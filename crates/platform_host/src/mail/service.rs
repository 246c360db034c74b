//! Mailbox contract with an in-memory adapter.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use crate::{outage::Outage, EmailId, EmailRecord, MailFolder, OutgoingEmail};

/// Object-safe boxed future used by [`MailboxService`].
pub type MailboxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// External mailbox store.
pub trait MailboxService {
    /// Lists one folder, most recent first.
    fn list(&self, folder: MailFolder) -> MailboxFuture<'_, Result<Vec<EmailRecord>, String>>;

    /// Sends a message and returns its server id.
    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> MailboxFuture<'a, Result<EmailId, String>>;
}

#[derive(Debug, Default)]
struct MailboxState {
    folders: BTreeMap<MailFolder, Vec<EmailRecord>>,
    sent_count: u64,
}

#[derive(Debug, Clone, Default)]
/// In-memory mailbox. Sent mail is prepended to the `Sent` folder.
pub struct MemoryMailboxService {
    inner: Rc<RefCell<MailboxState>>,
    outage: Outage,
}

impl MemoryMailboxService {
    /// Seeds one folder.
    pub fn with_folder(self, folder: MailFolder, emails: Vec<EmailRecord>) -> Self {
        self.inner.borrow_mut().folders.insert(folder, emails);
        self
    }

    /// Makes every call fail with `reason` until cleared with `None`.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.outage.set(reason);
    }
}

impl MailboxService for MemoryMailboxService {
    fn list(&self, folder: MailFolder) -> MailboxFuture<'_, Result<Vec<EmailRecord>, String>> {
        Box::pin(async move {
            self.outage.check()?;
            Ok(self
                .inner
                .borrow()
                .folders
                .get(&folder)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> MailboxFuture<'a, Result<EmailId, String>> {
        Box::pin(async move {
            self.outage.check()?;
            let mut state = self.inner.borrow_mut();
            state.sent_count += 1;
            let id = EmailId(format!("sent-{}", state.sent_count));
            let record = EmailRecord {
                id: id.clone(),
                sender: email.to.clone(),
                subject: email.subject.clone(),
                snippet: email.snippet(),
                body: email.body.clone(),
                date: "Just now".to_string(),
                is_read: true,
            };
            state
                .folders
                .entry(MailFolder::Sent)
                .or_default()
                .insert(0, record);
            Ok(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn quidditch() -> OutgoingEmail {
        OutgoingEmail {
            to: "harry@hogwarts.edu".to_string(),
            subject: "Quidditch Practice".to_string(),
            body: "Don't forget your broom!".to_string(),
        }
    }

    #[test]
    fn send_prepends_to_sent_folder() {
        let mailbox = MemoryMailboxService::default();
        let id = block_on(mailbox.send(&quidditch())).expect("send");

        let sent = block_on(mailbox.list(MailFolder::Sent)).expect("list sent");
        assert_eq!(sent[0].id, id);
        assert_eq!(sent[0].subject, "Quidditch Practice");
        assert_eq!(sent[0].snippet, "Don't forget your broom!");
    }

    #[test]
    fn unknown_folder_lists_empty_and_outage_fails_send() {
        let mailbox = MemoryMailboxService::default();
        assert!(block_on(mailbox.list(MailFolder::Trash))
            .expect("list")
            .is_empty());
        mailbox.set_unavailable(Some("smtp offline"));
        assert_eq!(
            block_on(mailbox.send(&quidditch())),
            Err("smtp offline".to_string())
        );
    }

    #[test]
    fn long_bodies_are_truncated_in_snippets() {
        let email = OutgoingEmail {
            body: "x".repeat(80),
            ..quidditch()
        };
        assert_eq!(email.snippet().chars().count(), 63);
    }
}
