//! In-memory user store for exercising the provisioner without a database.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewSuperuser, UserFlags};
use super::store::{UserSession, UserStore};

/// A full `users` row as the in-memory store keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl StoredUser {
    pub fn regular(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: "$argon2id$existing".to_string(),
            is_active: true,
            is_superuser: false,
            is_verified: false,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
        }
    }
}

/// Operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Begin,
    Find,
    Promote,
    Insert,
    Commit,
    Rollback,
}

#[derive(Default)]
struct Inner {
    rows: Vec<StoredUser>,
    fail: HashSet<FailPoint>,
    /// Row that appears right after the next lookup, as if another process inserted it.
    racing_insert: Option<StoredUser>,
    committed_writes: usize,
    commits: usize,
    rollbacks: usize,
}

#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows<I: IntoIterator<Item = StoredUser>>(rows: I) -> Self {
        let store = Self::new();
        store.lock().rows.extend(rows);
        store
    }

    pub fn fail_on(&self, point: FailPoint) {
        self.lock().fail.insert(point);
    }

    pub fn race_insert_after_lookup(&self, user: StoredUser) {
        self.lock().racing_insert = Some(user);
    }

    pub fn rows(&self) -> Vec<StoredUser> {
        self.lock().rows.clone()
    }

    pub fn find(&self, email: &str) -> Option<StoredUser> {
        self.lock().rows.iter().find(|u| u.email == email).cloned()
    }

    pub fn committed_writes(&self) -> usize {
        self.lock().committed_writes
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    fn check(&self, point: FailPoint) -> anyhow::Result<()> {
        if self.lock().fail.contains(&point) {
            anyhow::bail!("simulated {point:?} failure");
        }
        Ok(())
    }
}

enum Pending {
    Promote(String),
    Insert(StoredUser),
}

pub struct MemorySession {
    store: MemoryUserStore,
    pending: Vec<Pending>,
}

impl MemorySession {
    fn visible(&self, email: &str) -> Option<StoredUser> {
        let mut found = self.store.find(email);
        for op in &self.pending {
            match op {
                Pending::Insert(u) if u.email == email => found = Some(u.clone()),
                Pending::Promote(e) if e == email => {
                    if let Some(u) = found.as_mut() {
                        u.is_superuser = true;
                        u.is_verified = true;
                    }
                }
                _ => {}
            }
        }
        found
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    type Session = MemorySession;

    async fn begin(&self) -> anyhow::Result<MemorySession> {
        self.check(FailPoint::Begin)?;
        Ok(MemorySession {
            store: self.clone(),
            pending: Vec::new(),
        })
    }
}

#[async_trait]
impl UserSession for MemorySession {
    async fn find_by_email(&mut self, email: &str) -> anyhow::Result<Option<UserFlags>> {
        self.store.check(FailPoint::Find)?;
        let found = self.visible(email).map(|u| UserFlags {
            id: u.id,
            is_superuser: u.is_superuser,
        });
        let mut inner = self.store.lock();
        if let Some(raced) = inner.racing_insert.take() {
            inner.rows.push(raced);
        }
        Ok(found)
    }

    async fn promote_to_superuser(&mut self, email: &str) -> anyhow::Result<u64> {
        self.store.check(FailPoint::Promote)?;
        let affected = u64::from(self.visible(email).is_some());
        self.pending.push(Pending::Promote(email.to_string()));
        Ok(affected)
    }

    async fn insert_superuser(&mut self, user: &NewSuperuser<'_>) -> anyhow::Result<()> {
        self.store.check(FailPoint::Insert)?;
        if self.visible(user.email).is_some() {
            anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }
        self.pending.push(Pending::Insert(StoredUser {
            id: user.id,
            email: user.email.to_string(),
            hashed_password: user.hashed_password.clone(),
            is_active: true,
            is_superuser: true,
            is_verified: true,
            first_name: user.first_name.map(str::to_string),
            last_name: user.last_name.map(str::to_string),
        }));
        Ok(())
    }

    async fn commit(self) -> anyhow::Result<()> {
        self.store.check(FailPoint::Commit)?;
        let mut inner = self.store.lock();
        for op in self.pending {
            match op {
                Pending::Promote(email) => {
                    for u in inner.rows.iter_mut().filter(|u| u.email == email) {
                        u.is_superuser = true;
                        u.is_verified = true;
                    }
                }
                Pending::Insert(user) => inner.rows.push(user),
            }
            inner.committed_writes += 1;
        }
        inner.commits += 1;
        Ok(())
    }

    async fn rollback(self) -> anyhow::Result<()> {
        self.store.lock().rollbacks += 1;
        self.store.check(FailPoint::Rollback)
    }
}
