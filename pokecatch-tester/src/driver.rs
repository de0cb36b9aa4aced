//! Async host for a [`GameSession`]: fetches outside the session lock and
//! runs flee delays as cancellable tokio tasks.
use pokecatch_game::{
    Clock, CreatureProvider, FleeTicket, GameSession, KeyValueStore, RollSource, ThrowOutcome,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub type SharedSession<P, S, R, C> = Arc<Mutex<GameSession<P, S, R, C>>>;

/// At most one scheduled flee completion. Scheduling again, cancelling or
/// dropping the timer aborts the previous task.
#[derive(Debug, Default)]
pub struct FleeTimer {
    handle: Option<JoinHandle<bool>>,
}

impl FleeTimer {
    pub fn schedule<P, S, R, C>(&mut self, session: SharedSession<P, S, R, C>, ticket: FleeTicket)
    where
        P: CreatureProvider + Send + 'static,
        S: KeyValueStore + Send + 'static,
        R: RollSource + Send + 'static,
        C: Clock + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(ticket.delay).await;
            let mut guard = session.lock().await;
            guard.complete_flee(ticket)
        }));
    }

    /// Abort the pending completion. Returns `true` if one was still queued.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the scheduled completion. Returns whether it reset the
    /// encounter.
    pub async fn wait(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => match handle.await {
                Ok(cleared) => cleared,
                Err(err) => {
                    log::error!("flee completion task failed: {err}");
                    false
                }
            },
            None => false,
        }
    }
}

impl Drop for FleeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct SessionDriver<P, S, R, C> {
    session: SharedSession<P, S, R, C>,
    flee: FleeTimer,
}

impl<P, S, R, C> SessionDriver<P, S, R, C>
where
    P: CreatureProvider + Clone + Send + Sync + 'static,
    S: KeyValueStore + Send + 'static,
    R: RollSource + Send + 'static,
    C: Clock + Send + 'static,
{
    pub fn new(session: GameSession<P, S, R, C>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            flee: FleeTimer::default(),
        }
    }

    #[must_use]
    pub fn session(&self) -> SharedSession<P, S, R, C> {
        Arc::clone(&self.session)
    }

    /// Search for a creature. The session lock is released while the
    /// provider is queried; the session's own guard rejects overlapping
    /// searches.
    pub async fn find(&self) -> bool {
        let (ticket, provider) = {
            let mut session = self.session.lock().await;
            let Some(ticket) = session.begin_find() else {
                return false;
            };
            (ticket, session.provider().clone())
        };
        let result = provider.fetch_by_id(ticket.creature_id).await;
        self.session.lock().await.finish_find(ticket, result)
    }

    pub async fn throw(&mut self) -> ThrowOutcome {
        let outcome = self.session.lock().await.throw_at();
        if let ThrowOutcome::Fleeing(ticket) = outcome {
            self.flee.schedule(Arc::clone(&self.session), ticket);
        }
        outcome
    }

    pub async fn ignore(&mut self) -> bool {
        let ignored = self.session.lock().await.ignore();
        if ignored {
            self.flee.cancel();
        }
        ignored
    }

    /// Drop the current encounter immediately, cancelling any flee timer.
    pub async fn reset_encounter(&mut self) {
        self.flee.cancel();
        self.session.lock().await.clear_encounter();
    }

    /// Wait for a pending flee to finish.
    pub async fn settle(&mut self) -> bool {
        self.flee.wait().await
    }

    #[must_use]
    pub fn flee_pending(&self) -> bool {
        self.flee.is_pending()
    }
}
