//! Common test utilities: in-memory collaborator fakes
//!
//! The collaborators are in-process traits, so the integration tests run
//! against small in-memory implementations instead of a containerized
//! backend. Each test constructs its own fakes; nothing is shared between
//! cases.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use condoflow_core::domain::{AuthEvent, Plan, Profile, ResourceKind, Session};
use condoflow_core::error::{AppError, Result};
use condoflow_core::provider::{BillingStore, IdentityProvider, ProfileStore};
use condoflow_core::realtime::{ChangeEvent, ChangeKind, Subscription};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::sync::Semaphore;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 16;

/// Identity provider fake: scripted current session plus an event firehose.
pub struct FakeIdentityProvider {
    session: Mutex<Option<Session>>,
    event_senders: Mutex<Vec<mpsc::Sender<AuthEvent>>>,
    /// When set, `sign_out` blocks until a permit is added — lets tests
    /// observe local state while the provider round-trip is still pending.
    pub sign_out_gate: Option<Arc<Semaphore>>,
    pub sign_out_calls: AtomicUsize,
    pub fail_sign_out: AtomicBool,
    pub password_updates: AtomicUsize,
}

impl FakeIdentityProvider {
    pub fn new(initial: Option<Session>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(initial),
            event_senders: Mutex::new(Vec::new()),
            sign_out_gate: None,
            sign_out_calls: AtomicUsize::new(0),
            fail_sign_out: AtomicBool::new(false),
            password_updates: AtomicUsize::new(0),
        })
    }

    pub fn with_sign_out_gate(initial: Option<Session>, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(initial),
            event_senders: Mutex::new(Vec::new()),
            sign_out_gate: Some(gate),
            sign_out_calls: AtomicUsize::new(0),
            fail_sign_out: AtomicBool::new(false),
            password_updates: AtomicUsize::new(0),
        })
    }

    /// Emit an auth-state change to every subscriber, in order.
    pub async fn emit(&self, event: AuthEvent) {
        *self.session.lock().unwrap() = event.session().cloned();
        let senders = self.event_senders.lock().unwrap().clone();
        for sender in senders {
            sender.send(event.clone()).await.expect("subscriber gone");
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn auth_events(&self) -> Subscription<AuthEvent> {
        let (tx, subscription) = Subscription::channel(CHANNEL_CAPACITY);
        self.event_senders.lock().unwrap().push(tx);
        subscription
    }

    async fn sign_out(&self) -> Result<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.sign_out_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AppError::Identity("network unreachable".to_string()));
        }
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn update_password(&self, _new_password: &str) -> Result<()> {
        self.password_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Profile store fake with per-user fetch barriers for interleaving tests.
pub struct FakeProfileStore {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    barriers: Mutex<HashMap<Uuid, Arc<Semaphore>>>,
    change_senders: Mutex<HashMap<Uuid, Vec<mpsc::Sender<ChangeEvent>>>>,
    pub fail_fetch: AtomicBool,
    pub fetch_count: AtomicUsize,
}

impl FakeProfileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            profiles: Mutex::new(HashMap::new()),
            barriers: Mutex::new(HashMap::new()),
            change_senders: Mutex::new(HashMap::new()),
            fail_fetch: AtomicBool::new(false),
            fetch_count: AtomicUsize::new(0),
        })
    }

    pub fn put_profile(&self, profile: Profile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    /// Block fetches for `user_id` until [`release`](Self::release) is
    /// called.
    pub fn hold_fetches_for(&self, user_id: Uuid) {
        self.barriers
            .lock()
            .unwrap()
            .insert(user_id, Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self, user_id: Uuid) {
        if let Some(barrier) = self.barriers.lock().unwrap().get(&user_id) {
            barrier.add_permits(1);
        }
    }

    /// Push a row-change notification to every subscriber of `user_id`.
    pub async fn push_change(&self, user_id: Uuid, event: ChangeEvent) {
        let senders = self
            .change_senders
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        for sender in senders {
            let _ = sender.send(event.clone()).await;
        }
    }

    /// Wait until at least one live subscription exists for `user_id`.
    /// Registration happens asynchronously inside the resolver loop.
    pub async fn wait_for_subscriber(&self, user_id: Uuid) {
        loop {
            let registered = self
                .change_senders
                .lock()
                .unwrap()
                .get(&user_id)
                .map(|senders| senders.iter().any(|s| !s.is_closed()))
                .unwrap_or(false);
            if registered {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    /// True when every subscription handed out for `user_id` has been
    /// dropped by its consumer.
    pub fn subscribers_gone(&self, user_id: Uuid) -> bool {
        self.change_senders
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|senders| senders.iter().all(|s| s.is_closed()))
            .unwrap_or(true)
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let barrier = self.barriers.lock().unwrap().get(&user_id).cloned();
        if let Some(barrier) = barrier {
            barrier.acquire().await.unwrap().forget();
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::ProfileFetch("backend unavailable".to_string()));
        }
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn subscribe_profile(&self, user_id: Uuid) -> Result<Subscription<ChangeEvent>> {
        let (tx, subscription) = Subscription::channel(CHANNEL_CAPACITY);
        self.change_senders
            .lock()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(tx);
        Ok(subscription)
    }
}

/// Billing store fake: one plan, adjustable per-kind counts.
pub struct FakeBillingStore {
    plan: Mutex<Option<Plan>>,
    counts: Mutex<HashMap<(Uuid, ResourceKind), u64>>,
    resource_senders: Mutex<Vec<mpsc::Sender<ChangeEvent>>>,
    pub fail: AtomicBool,
}

impl FakeBillingStore {
    pub fn new(plan: Option<Plan>) -> Arc<Self> {
        Arc::new(Self {
            plan: Mutex::new(plan),
            counts: Mutex::new(HashMap::new()),
            resource_senders: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    pub fn set_count(&self, administrator_id: Uuid, kind: ResourceKind, count: u64) {
        self.counts
            .lock()
            .unwrap()
            .insert((administrator_id, kind), count);
    }

    /// Simulate a resource created elsewhere: bump the count and notify
    /// subscribers, mirroring the backend's insert notification.
    pub async fn insert_resource(&self, administrator_id: Uuid, kind: ResourceKind) {
        {
            let mut counts = self.counts.lock().unwrap();
            *counts.entry((administrator_id, kind)).or_insert(0) += 1;
        }
        let senders = self.resource_senders.lock().unwrap().clone();
        for sender in senders {
            let _ = sender
                .send(ChangeEvent {
                    kind: ChangeKind::Insert,
                    row_id: Uuid::new_v4(),
                })
                .await;
        }
    }
}

#[async_trait]
impl BillingStore for FakeBillingStore {
    async fn fetch_plan(&self, _administrator_id: Uuid) -> Result<Option<Plan>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Billing("gateway timeout".to_string()));
        }
        Ok(self.plan.lock().unwrap().clone())
    }

    async fn count_resources(&self, administrator_id: Uuid, kind: ResourceKind) -> Result<u64> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Billing("gateway timeout".to_string()));
        }
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(&(administrator_id, kind))
            .copied()
            .unwrap_or(0))
    }

    async fn subscribe_resources(
        &self,
        _administrator_id: Uuid,
        _kind: ResourceKind,
    ) -> Result<Subscription<ChangeEvent>> {
        let (tx, subscription) = Subscription::channel(CHANNEL_CAPACITY);
        self.resource_senders.lock().unwrap().push(tx);
        Ok(subscription)
    }
}

/// Profile fixture with an active status and the given role label.
pub fn profile_for(user_id: Uuid, role: &str) -> Profile {
    Profile {
        id: user_id,
        role: role.to_string(),
        first_name: "Ana".to_string(),
        last_name: "Souza".to_string(),
        email: "ana.souza@example.com".to_string(),
        ..Default::default()
    }
}
