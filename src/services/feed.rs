//! Live expense feed
//!
//! Subscribes to one owner's records and turns every store notification into
//! a [`FeedEvent`] carrying the records and their summary statistics. Events
//! travel over a channel; readers that only care about the current state call
//! [`ExpenseFeed::latest`], which keeps the last event and drops the rest.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::auth::IdentityProvider;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, OwnerId};
use crate::reports::{StatsContext, SummaryStats};
use crate::storage::{ExpenseListener, ExpenseStore, Subscription};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Current records, newest first, with their statistics
    Snapshot {
        expenses: Vec<Expense>,
        stats: SummaryStats,
    },
    /// The store failed to persist a change
    Error(String),
}

pub struct ExpenseFeed {
    receiver: Receiver<FeedEvent>,
    subscription: Subscription,
}

impl ExpenseFeed {
    /// Subscribe to `owner`'s records
    ///
    /// The first snapshot is available as soon as this returns.
    pub fn start(
        store: &dyn ExpenseStore,
        owner: OwnerId,
        ctx: StatsContext,
    ) -> ExpenseResult<Self> {
        let (sender, receiver) = mpsc::channel();
        let sender: Mutex<Sender<FeedEvent>> = Mutex::new(sender);

        let listener: ExpenseListener = Arc::new(move |update: Result<&[Expense], &ExpenseError>| {
            let event = match update {
                Ok(expenses) => FeedEvent::Snapshot {
                    stats: SummaryStats::aggregate(expenses, &ctx),
                    expenses: expenses.to_vec(),
                },
                Err(e) => FeedEvent::Error(e.to_string()),
            };
            let Ok(sender) = sender.lock() else {
                warn!("feed sender lock poisoned; dropping event");
                return;
            };
            if sender.send(event).is_err() {
                debug!("feed receiver gone; dropping event");
            }
        });

        let subscription = store.subscribe(owner, listener)?;
        debug!(owner = %owner, "expense feed started");
        Ok(Self {
            receiver,
            subscription,
        })
    }

    /// Start a feed for the signed-in user, or `None` when nobody is signed in
    pub fn for_identity(
        store: &dyn ExpenseStore,
        identity: &dyn IdentityProvider,
        ctx: StatsContext,
    ) -> ExpenseResult<Option<Self>> {
        match identity.current_owner() {
            Some(owner) => Self::start(store, owner, ctx).map(Some),
            None => Ok(None),
        }
    }

    /// The most recent pending event, discarding older ones
    pub fn latest(&self) -> Option<FeedEvent> {
        let mut latest = None;
        while let Ok(event) = self.receiver.try_recv() {
            latest = Some(event);
        }
        latest
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FeedEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Unsubscribe. Events already queued can still be read.
    pub fn stop(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Money, NewExpense};
    use crate::storage::ExpenseRepository;
    use chrono::{NaiveDate, Weekday};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn ctx() -> StatsContext {
        StatsContext::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Weekday::Sun)
    }

    fn input(cents: i64, description: &str) -> NewExpense {
        NewExpense {
            amount: Money::from_cents(cents),
            description: description.into(),
            category: Category::Food,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_initial_snapshot() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        repo.create(owner, input(5000, "Lunch")).unwrap();

        let feed = ExpenseFeed::start(&repo, owner, ctx()).unwrap();
        match feed.latest() {
            Some(FeedEvent::Snapshot { expenses, stats }) => {
                assert_eq!(expenses.len(), 1);
                assert_eq!(stats.total, Money::from_units(50));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(feed.latest().is_none());
    }

    #[test]
    fn test_latest_keeps_last_event() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let feed = ExpenseFeed::start(&repo, owner, ctx()).unwrap();

        repo.create(owner, input(1000, "One")).unwrap();
        repo.create(owner, input(2000, "Two")).unwrap();

        match feed.latest() {
            Some(FeedEvent::Snapshot { expenses, stats }) => {
                assert_eq!(expenses.len(), 2);
                assert_eq!(stats.count, 2);
                assert_eq!(stats.total, Money::from_units(30));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_other_owners_not_delivered() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let feed = ExpenseFeed::start(&repo, owner, ctx()).unwrap();
        feed.latest();

        repo.create(OwnerId::new(), input(1000, "Not mine")).unwrap();
        assert!(feed.latest().is_none());
    }

    #[test]
    fn test_stop_ends_updates() {
        let (_temp, repo) = create_test_repo();
        let owner = OwnerId::new();
        let mut feed = ExpenseFeed::start(&repo, owner, ctx()).unwrap();
        feed.latest();

        feed.stop();
        assert!(!feed.is_active());
        repo.create(owner, input(1000, "After stop")).unwrap();
        assert!(feed.recv_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_no_feed_without_identity() {
        let (_temp, repo) = create_test_repo();
        let nobody: Option<OwnerId> = None;
        assert!(ExpenseFeed::for_identity(&repo, &nobody, ctx())
            .unwrap()
            .is_none());
    }
}
