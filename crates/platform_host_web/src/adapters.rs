use std::rc::Rc;

use platform_host::{HostServices, HostStrategy};

use crate::{
    demo_host_services, HttpAssistantService, HttpAuthService, HttpConsentService,
    HttpDecksService, HttpMailboxService, HttpNotesService, WebPrefsStore,
};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "demo-host")]
    {
        HostStrategy::Demo
    }

    #[cfg(not(feature = "demo-host"))]
    {
        HostStrategy::Http
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

fn http_host_services() -> HostServices {
    HostServices {
        prefs: Rc::new(WebPrefsStore),
        auth: Rc::new(HttpAuthService),
        notes: Rc::new(HttpNotesService),
        decks: Rc::new(HttpDecksService),
        mailbox: Rc::new(HttpMailboxService),
        consent: Rc::new(HttpConsentService),
        assistant: Rc::new(HttpAssistantService),
        host_strategy: HostStrategy::Http,
    }
}

/// Builds the host service bundle for the compile-time selected strategy.
pub fn build_host_services() -> HostServices {
    match selected_host_strategy() {
        HostStrategy::Demo => demo_host_services(),
        HostStrategy::Http | HostStrategy::Headless => http_host_services(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_matches_selected_strategy() {
        assert_eq!(
            build_host_services().host_strategy,
            selected_host_strategy()
        );
        assert_eq!(host_strategy_name(), selected_host_strategy().as_str());
    }
}
