//! Game session management.
//!
//! The registry lock is held only to find or insert a session. Each session
//! has its own lock, held for a whole request, so requests on one session
//! never interleave while different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use derive_more::{Display, From};
use quantum_tictactoe::{
    CollapseOption, CollapseResponse, EngineError, Entanglement, ErrorReport, Game, GameSnapshot,
    MoveResponse, Player, QuantumMove, Rules, WinReport,
};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// A single hosted game.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    game: Game,
}

impl GameSession {
    /// Creates a new game session.
    #[instrument]
    pub fn new(id: SessionId, rules: Rules) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            game: Game::new(rules),
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The hosted game.
    pub fn game(&self) -> &Game {
        &self.game
    }
}

/// Session-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum SessionError {
    /// A session with this id already exists.
    #[display("Session {} already exists", _0)]
    #[from(ignore)]
    AlreadyExists(SessionId),

    /// No session has this id.
    #[display("Session {} not found", _0)]
    #[from(ignore)]
    NotFound(SessionId),

    /// A thread panicked while holding a session lock.
    #[display("Session lock poisoned: {}", _0)]
    #[from(ignore)]
    Poisoned(String),

    /// The engine rejected the request.
    #[display("{}", _0)]
    Engine(EngineError),
}

impl std::error::Error for SessionError {}

impl SessionError {
    /// The engine's error report, if the engine rejected the request.
    pub fn engine_report(&self) -> Option<ErrorReport> {
        match self {
            SessionError::Engine(e) => Some(e.report()),
            _ => None,
        }
    }
}

type SharedSession = Arc<Mutex<GameSession>>;

/// Manages all game sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SharedSession>>>,
    rules: Rules,
}

impl SessionManager {
    /// Creates a session manager whose games use `rules`.
    #[instrument]
    pub fn new(rules: Rules) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            rules,
        }
    }

    fn registry(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SharedSession>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|e| SessionError::Poisoned(e.to_string()))
    }

    fn session(&self, id: &str) -> Result<SharedSession, SessionError> {
        let sessions = self.registry()?;
        sessions.get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })
    }

    /// Runs `f` on session `id` while holding that session's lock.
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, EngineError>,
    ) -> Result<T, SessionError> {
        let shared = self.session(id)?;
        let mut session = shared
            .lock()
            .map_err(|e| SessionError::Poisoned(e.to_string()))?;
        f(&mut *session).map_err(|e| {
            warn!(session_id = session.id(), error = %e, "Request rejected");
            SessionError::Engine(e)
        })
    }

    /// Creates a new game session.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: SessionId) -> Result<SessionId, SessionError> {
        let mut sessions = self.registry()?;
        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }

        let session = GameSession::new(id.clone(), self.rules);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Removes a session.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<(), SessionError> {
        let mut sessions = self.registry()?;
        match sessions.remove(id) {
            Some(_) => {
                info!(session_id = id, "Removed session");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    /// Lists all active session ids, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Result<Vec<SessionId>, SessionError> {
        let sessions = self.registry()?;
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        Ok(ids)
    }

    /// Resets a session's game.
    #[instrument(skip(self))]
    pub fn new_game(&self, id: &str) -> Result<GameSnapshot, SessionError> {
        self.with_session(id, |s| s.game.new_game())
    }

    /// Places a quantum move in a session.
    #[instrument(skip(self))]
    pub fn make_quantum_move(
        &self,
        id: &str,
        square1: u8,
        square2: u8,
        player: Player,
    ) -> Result<MoveResponse, SessionError> {
        self.with_session(id, |s| s.game.make_quantum_move(square1, square2, player))
    }

    /// Places a quantum move for whichever player is to move, reading the
    /// turn and placing the move under one lock.
    #[instrument(skip(self))]
    pub fn make_move_for_current_player(
        &self,
        id: &str,
        square1: u8,
        square2: u8,
    ) -> Result<MoveResponse, SessionError> {
        self.with_session(id, |s| {
            let player = s.game().state().current_player();
            s.game.make_quantum_move(square1, square2, player)
        })
    }

    /// Places a quantum move given as a raw square list.
    #[instrument(skip(self))]
    pub fn play_quantum(
        &self,
        id: &str,
        player: Player,
        squares: Vec<u8>,
    ) -> Result<MoveResponse, SessionError> {
        self.with_session(id, |s| s.game.play_quantum(player, squares))
    }

    /// Commits a collapse option in a session.
    #[instrument(skip(self, option))]
    pub fn choose_collapse(
        &self,
        id: &str,
        option: &CollapseOption,
    ) -> Result<CollapseResponse, SessionError> {
        self.with_session(id, |s| s.game.choose_collapse(option))
    }

    /// Commits the offered option at `index` in a session.
    #[instrument(skip(self))]
    pub fn choose_collapse_index(
        &self,
        id: &str,
        index: usize,
    ) -> Result<CollapseResponse, SessionError> {
        self.with_session(id, |s| s.game.choose_collapse_index(index))
    }

    /// Takes back the last accepted action in a session.
    #[instrument(skip(self))]
    pub fn undo(&self, id: &str) -> Result<GameSnapshot, SessionError> {
        self.with_session(id, |s| s.game.undo())
    }

    /// Snapshot of a session's game.
    pub fn get_state(&self, id: &str) -> Result<GameSnapshot, SessionError> {
        self.with_session(id, |s| Ok(s.game().get_state()))
    }

    /// Win evaluation for a session's board.
    pub fn get_winner(&self, id: &str) -> Result<WinReport, SessionError> {
        self.with_session(id, |s| Ok(s.game().get_winner()))
    }

    /// Entanglements in a session's game.
    pub fn get_entanglements(&self, id: &str) -> Result<Vec<Entanglement>, SessionError> {
        self.with_session(id, |s| Ok(s.game().get_entanglements()))
    }

    /// Every move in a session's game.
    pub fn get_moves(&self, id: &str) -> Result<Vec<QuantumMove>, SessionError> {
        self.with_session(id, |s| Ok(s.game().get_moves()))
    }
}
