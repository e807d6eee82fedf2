//! Executes [`Effect`]s emitted by the reveal protocol.
//!
//! Network effects run as tokio tasks and report back through the app event
//! channel as [`AppEvent::Tokens`]. The clipboard write is synchronous and
//! its outcome is returned directly so the caller can feed it straight back
//! into the model.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::core::reveal::{Effect, Msg};

use super::events::AppEvent;
use super::services::Services;

#[derive(Default)]
pub struct EffectRunner {
    tasks: Vec<JoinHandle<()>>,
}

impl EffectRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spawned tasks that have not finished yet.
    pub fn outstanding(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Run one effect. Returns a message when the outcome is known
    /// immediately.
    pub fn run(&mut self, effect: Effect, services: &Services) -> Option<Msg> {
        self.tasks.retain(|t| !t.is_finished());

        match effect {
            Effect::CreateToken { request, payload } => {
                let backend = Arc::clone(&services.backend);
                let tx = services.event_tx.clone();
                log::info!("Creating API token '{}'", payload.name);
                self.tasks.push(tokio::spawn(async move {
                    let msg = match backend.create_token(payload).await {
                        Ok(issued) => Msg::CreateSucceeded { request, issued },
                        Err(e) => {
                            log::warn!("Token creation failed: {e}");
                            Msg::CreateFailed {
                                request,
                                error: e.user_message(),
                            }
                        }
                    };
                    let _ = tx.send(AppEvent::Tokens(msg));
                }));
                None
            }
            Effect::FetchTokens { request, query } => {
                let backend = Arc::clone(&services.backend);
                let tx = services.event_tx.clone();
                self.tasks.push(tokio::spawn(async move {
                    let msg = match backend.list_tokens(query).await {
                        Ok(page) => Msg::PageLoaded { request, page },
                        Err(e) => {
                            log::warn!("Token listing failed: {e}");
                            Msg::PageFailed {
                                request,
                                error: e.user_message(),
                            }
                        }
                    };
                    let _ = tx.send(AppEvent::Tokens(msg));
                }));
                None
            }
            Effect::CopyToClipboard(secret) => {
                let outcome = services.clipboard.copy(secret.expose()).map_err(|e| {
                    log::warn!("Clipboard copy failed: {e}");
                    e.to_string()
                });
                Some(Msg::CopyFinished(outcome))
            }
            Effect::CancelOutstanding => {
                self.cancel_all();
                None
            }
        }
    }

    fn cancel_all(&mut self) {
        let pending = self.outstanding();
        if pending > 0 {
            log::debug!("Aborting {pending} outstanding request(s)");
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for EffectRunner {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
