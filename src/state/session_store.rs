use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::editor::StatGrid;
use crate::error::{AppError, Result};
use crate::types::Side;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's pair of editor grids. Created empty, mutated only through
/// `SessionStore::replace_grid`, discarded on `remove` or idle purge.
#[derive(Debug, Clone)]
struct Session {
    pitcher: StatGrid,
    batter: StatGrid,
    last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            pitcher: StatGrid::default(),
            batter: StatGrid::default(),
            last_seen: Instant::now(),
        }
    }

    fn grid(&self, side: Side) -> &StatGrid {
        match side {
            Side::Pitcher => &self.pitcher,
            Side::Batter => &self.batter,
        }
    }

    fn grid_mut(&mut self, side: Side) -> &mut StatGrid {
        match side {
            Side::Pitcher => &mut self.pitcher,
            Side::Batter => &mut self.batter,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

pub struct SessionStore {
    /// session_id → grids
    sessions: DashMap<String, Session>,
    max_sessions: usize,
    max_idle: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, max_idle: Duration) -> Arc<Self> {
        Arc::new(Self {
            sessions: DashMap::new(),
            max_sessions,
            max_idle,
        })
    }

    /// Open a session with two empty standard grids. Idle sessions are purged
    /// first so abandoned ones do not count against the limit.
    pub fn create(&self) -> Result<String> {
        self.purge_idle(self.max_idle);
        if self.sessions.len() >= self.max_sessions {
            return Err(AppError::SessionLimit(self.sessions.len()));
        }
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), Session::new());
        info!(session_id = %id, active = self.sessions.len(), "session created");
        Ok(id)
    }

    /// Snapshot of both grids as `(pitcher, batter)`.
    pub fn tables(&self, id: &str) -> Result<(StatGrid, StatGrid)> {
        let session = self.touch(id)?;
        Ok((session.pitcher.clone(), session.batter.clone()))
    }

    pub fn grid(&self, id: &str, side: Side) -> Result<StatGrid> {
        let session = self.touch(id)?;
        Ok(session.grid(side).clone())
    }

    /// Replace one side's grid wholesale. Returns the new row count.
    pub fn replace_grid(&self, id: &str, side: Side, grid: StatGrid) -> Result<usize> {
        let mut session = self.touch(id)?;
        let rows = grid.row_count();
        *session.grid_mut(side) = grid;
        debug!(session_id = %id, side = %side, rows, "grid replaced");
        Ok(rows)
    }

    /// End a session. Returns false if it did not exist.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session_id = %id, active = self.sessions.len(), "session ended");
        }
        removed
    }

    /// Drop sessions not touched within `max_idle`. Returns how many were dropped.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_seen.elapsed() <= max_idle);
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            info!(purged, active = self.sessions.len(), "idle sessions purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    fn touch(&self, id: &str) -> Result<dashmap::mapref::one::RefMut<'_, String, Session>> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
        session.last_seen = Instant::now();
        Ok(session)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Arc<SessionStore> {
        SessionStore::new(4, Duration::from_secs(3600))
    }

    #[test]
    fn new_session_starts_with_empty_standard_grids() {
        let store = store();
        let id = store.create().unwrap();
        let (pitcher, batter) = store.tables(&id).unwrap();
        assert_eq!(pitcher, StatGrid::default());
        assert_eq!(batter, StatGrid::default());
    }

    #[test]
    fn replace_touches_only_one_side() {
        let store = store();
        let id = store.create().unwrap();
        let grid = StatGrid {
            columns: StatGrid::standard_columns(),
            rows: vec![vec![json!("Fastball"), json!(30)]],
        };

        assert_eq!(store.replace_grid(&id, Side::Batter, grid.clone()).unwrap(), 1);
        assert_eq!(store.grid(&id, Side::Batter).unwrap(), grid);
        assert_eq!(store.grid(&id, Side::Pitcher).unwrap(), StatGrid::default());
    }

    #[test]
    fn sessions_are_isolated() {
        let store = store();
        let a = store.create().unwrap();
        let b = store.create().unwrap();
        assert_ne!(a, b);

        let grid = StatGrid {
            columns: StatGrid::standard_columns(),
            rows: vec![vec![json!("Slider")]],
        };
        store.replace_grid(&a, Side::Pitcher, grid).unwrap();
        assert_eq!(store.grid(&b, Side::Pitcher).unwrap().row_count(), 0);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = store();
        assert!(matches!(store.tables("nope"), Err(AppError::SessionNotFound(_))));
        assert!(!store.remove("nope"));
    }

    #[test]
    fn removed_session_is_gone() {
        let store = store();
        let id = store.create().unwrap();
        assert!(store.remove(&id));
        assert_eq!(store.len(), 0);
        assert!(store.tables(&id).is_err());
    }

    #[test]
    fn limit_is_enforced() {
        let store = SessionStore::new(2, Duration::from_secs(3600));
        store.create().unwrap();
        store.create().unwrap();
        assert!(matches!(store.create(), Err(AppError::SessionLimit(2))));
    }

    #[test]
    fn idle_sessions_are_purged_on_create() {
        let store = SessionStore::new(1, Duration::ZERO);
        let first = store.create().unwrap();
        std::thread::sleep(Duration::from_millis(5));
        // The first session is past its idle window, so it makes room.
        let second = store.create().unwrap();
        assert!(store.tables(&first).is_err());
        assert!(store.tables(&second).is_ok());
    }
}
