use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::app::{Action, Effect};
use crate::passage::PassageClient;
use crate::tui::AppEvent;
use crate::verse::VerseClient;

/// Runs effects as background tasks. Each task posts exactly one action
/// back into the event loop when it finishes.
#[derive(Clone)]
pub struct Services {
    verses: VerseClient,
    passages: PassageClient,
    tx: UnboundedSender<AppEvent>,
}

impl Services {
    pub fn new(verses: VerseClient, passages: PassageClient, tx: UnboundedSender<AppEvent>) -> Self {
        Self { verses, passages, tx }
    }

    pub fn run_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::LoadVerse => {
                let verses = self.verses.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let verse = verses.load().await;
                    let _ = tx.send(AppEvent::Action(Action::VerseLoaded(verse)));
                });
            }
            Effect::LoadPassage(request) => {
                info!(token = request.token, reference = %request.reference(), "fetching passage");
                let passages = self.passages.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = passages.fetch(request.book, request.chapter).await;
                    if let Err(e) = &result {
                        warn!(reference = %request.reference(), error = %e, "could not fetch passage");
                    }
                    let _ = tx.send(AppEvent::Action(Action::PassageLoaded {
                        token: request.token,
                        result,
                    }));
                });
            }
        }
    }
}
