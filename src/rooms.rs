use std::collections::HashMap;

use parking_lot::Mutex;

use crate::language::Language;
use crate::model::RoomFile;

/// Name of the file every room is seeded with on first join.
pub const SEED_FILE_NAME: &str = "index.js";

/// Outcome of a write against the registry. Missing rooms and files are
/// ordinary outcomes rather than errors: the protocol ignores them without
/// telling the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    MissingRoom,
    MissingFile,
}

/// Authoritative, process-lifetime mapping from room key to its files.
///
/// Rooms are created lazily on first join and never evicted; all state is
/// lost on restart. Room keys are opaque, case-sensitive and unvalidated.
/// One instance is constructed per server process and injected into the
/// connection layer.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, Vec<RoomFile>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the room with the default file on first use. Idempotent;
    /// returns true when the room was newly created.
    pub fn ensure_room(&self, room_id: &str) -> bool {
        let mut rooms = self.rooms.lock();
        if rooms.contains_key(room_id) {
            return false;
        }
        rooms.insert(room_id.to_string(), vec![RoomFile::new(SEED_FILE_NAME)]);
        true
    }

    /// Snapshot of the room's files for transmission. `None` when the room
    /// was never initialized.
    pub fn files(&self, room_id: &str) -> Option<Vec<RoomFile>> {
        self.rooms.lock().get(room_id).cloned()
    }

    /// Overwrite a file's contents. Last write wins unconditionally; there
    /// is no version or conflict check.
    pub fn set_file_code(&self, room_id: &str, file_name: &str, new_code: &str) -> WriteOutcome {
        let mut rooms = self.rooms.lock();
        let Some(files) = rooms.get_mut(room_id) else {
            return WriteOutcome::MissingRoom;
        };
        match files.iter_mut().find(|f| f.file_name == file_name) {
            Some(file) => {
                file.code = new_code.to_string();
                WriteOutcome::Applied
            }
            None => WriteOutcome::MissingFile,
        }
    }

    /// Relabel a file's language. The contents are left untouched.
    pub fn set_file_language(
        &self,
        room_id: &str,
        file_name: &str,
        new_language: Language,
    ) -> WriteOutcome {
        let mut rooms = self.rooms.lock();
        let Some(files) = rooms.get_mut(room_id) else {
            return WriteOutcome::MissingRoom;
        };
        match files.iter_mut().find(|f| f.file_name == file_name) {
            Some(file) => {
                file.language = new_language;
                WriteOutcome::Applied
            }
            None => WriteOutcome::MissingFile,
        }
    }

    /// Append a new file with inferred language and template contents.
    /// Duplicate names are not rejected here; the only duplicate check
    /// lives in the client UI. `None` when the room does not exist.
    pub fn create_file(&self, room_id: &str, file_name: &str) -> Option<RoomFile> {
        let mut rooms = self.rooms.lock();
        let files = rooms.get_mut(room_id)?;
        let file = RoomFile::new(file_name);
        files.push(file.clone());
        Some(file)
    }

    /// Remove the first file whose name matches and return the remaining
    /// list. The list comes back even when nothing matched; the deletion
    /// broadcast carries it either way. `None` when the room does not
    /// exist.
    pub fn delete_file(&self, room_id: &str, file_name: &str) -> Option<Vec<RoomFile>> {
        let mut rooms = self.rooms.lock();
        let files = rooms.get_mut(room_id)?;
        if let Some(idx) = files.iter().position(|f| f.file_name == file_name) {
            files.remove(idx);
        }
        Some(files.clone())
    }
}
