pub mod autoscale;
pub mod get;

use std::sync::Arc;

use hpa_console::services::{ErrorCategory, Navigator};

/// Navigation for a one-shot command. The command reports the error that
/// led to an error page itself, going back just means it is done.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn to_error_page(&self, message: &str, category: Option<ErrorCategory>) {
        let category = category.map(|c| c.as_str()).unwrap_or("error");
        tracing::debug!(%category, %message, "Error page");
    }

    fn back(&self) {
        tracing::debug!("Form done");
    }
}

impl TerminalNavigator {
    pub fn shared() -> Arc<dyn Navigator> {
        Arc::new(TerminalNavigator)
    }
}
