use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::client::{HttpTokenBackend, TokenBackend};
use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::core::i18n::Translator;

use super::clipboard::{ClipboardSink, SystemClipboard};
use super::events::AppEvent;

/// Centralized handle to the collaborators views talk to.
///
/// Created once at startup and passed by reference to views. Everything is
/// cheap to clone so effect tasks can take their own copies.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn TokenBackend>,
    pub clipboard: Arc<dyn ClipboardSink>,
    pub translator: Translator,
    /// Confirmation shown after a successful copy.
    pub copied_text: String,
    pub page_size: u32,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the runtime services from config.
    ///
    /// Fails only if the backend URL is unusable.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, ApiError> {
        let backend = HttpTokenBackend::new(&config.api)?;
        log::info!("Token backend at {}", backend.base_url());
        if config.api.access_token.is_none() {
            log::warn!("No api.access_token configured - requests will be unauthenticated");
        }

        Ok(Self::with_parts(
            config,
            Arc::new(backend),
            Arc::new(SystemClipboard::new()),
            event_tx,
        ))
    }

    /// Assemble services from explicit collaborators.
    pub fn with_parts(
        config: &AppConfig,
        backend: Arc<dyn TokenBackend>,
        clipboard: Arc<dyn ClipboardSink>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let translator = Translator::new(config.ui.locale);
        let copied_text = config
            .ui
            .copied_message
            .clone()
            .unwrap_or_else(|| translator.t("copied to clipboard").to_string());

        Self {
            backend,
            clipboard,
            translator,
            copied_text,
            page_size: config.api.page_size,
            event_tx,
        }
    }

    /// Resolve the signed-in user in the background.
    pub fn load_current_user(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.current_user().await.map_err(|e| {
                log::warn!("Could not resolve current user: {e}");
                e.user_message()
            });
            let _ = tx.send(AppEvent::CurrentUser(result));
        });
    }
}
