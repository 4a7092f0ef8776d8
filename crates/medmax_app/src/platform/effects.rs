use std::path::PathBuf;

use medmax_client::ApiHandle;
use medmax_core::{Effect, Msg};
use medmax_logging::{medmax_debug, medmax_info};

use super::history::History;
use super::persistence;

/// Carries out the router's effects and turns finished requests back into messages.
pub(crate) struct EffectRunner {
    api: ApiHandle,
    history: History,
    state_dir: PathBuf,
    external: Vec<String>,
}

impl EffectRunner {
    pub fn new(api: ApiHandle, start_url: &str, state_dir: PathBuf) -> Self {
        Self {
            api,
            history: History::new(start_url),
            state_dir,
            external: Vec::new(),
        }
    }

    /// Runs `effects` in order. Returns the messages they trigger right away.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::PushUrl(url) => {
                    medmax_debug!("PushUrl {}", url);
                    self.history.push(url.clone());
                    follow_up.push(Msg::UrlChanged(url));
                }
                Effect::LoadExternal(url) => {
                    medmax_info!("LoadExternal {}", url);
                    self.external.push(url);
                }
                Effect::Api { request, reply } => {
                    medmax_debug!("Api {} -> {:?}", request.label(), reply);
                    self.api.submit(request, reply);
                }
                Effect::SetSessionToken(token) => {
                    medmax_debug!("SetSessionToken present={}", token.is_some());
                    persistence::save_session_token(&self.state_dir, token.as_deref());
                    self.api.set_session_token(token);
                }
            }
        }
        follow_up
    }

    /// Steps back in history; the router sees the earlier location as a URL change.
    pub fn back(&mut self) -> Option<Msg> {
        self.history.back().map(|url| Msg::UrlChanged(url.to_string()))
    }

    pub fn poll_completions(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.api.try_recv())
            .map(|done| Msg::ApiCompleted {
                reply: done.reply,
                request: done.request,
                result: done.result,
            })
            .collect()
    }

    /// External locations opened since the last call.
    pub fn take_external(&mut self) -> Vec<String> {
        std::mem::take(&mut self.external)
    }
}
