use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::Language;
use crate::model::RoomFile;

/// Events a client may send. Each WebSocket text frame carries one
/// `{"event": <name>, "data": <payload>}` envelope; the names are
/// case-sensitive and match the original client exactly. Frames that fail
/// to deserialize are dropped without a reply.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join (or lazily create) a room. Payload is the bare room key.
    JoinRoom(String),
    #[serde(rename_all = "camelCase")]
    CodeChange {
        room_id: String,
        file_name: String,
        new_code: String,
    },
    #[serde(rename_all = "camelCase")]
    CreateFile { room_id: String, file_name: String },
    #[serde(rename_all = "camelCase")]
    DeleteFile { room_id: String, file_name: String },
    #[serde(rename_all = "camelCase")]
    LanguageChange {
        room_id: String,
        file_name: String,
        new_language: Language,
    },
}

/// Events the server emits, either directly to one connection
/// (`init-files`) or fanned out to a room.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    InitFiles(Vec<RoomFile>),
    #[serde(rename_all = "camelCase")]
    RemoteCodeChange { file_name: String, new_code: String },
    #[serde(rename_all = "camelCase")]
    RemoteLanguageChange {
        file_name: String,
        new_language: Language,
    },
    #[serde(rename_all = "camelCase")]
    FileCreated { file_name: String },
    FileDeleted(Vec<RoomFile>),
}

/// Who in the room a broadcast is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every member except the originating connection.
    Others,
    /// Every member including the originating connection.
    Room,
}

/// Envelope on the process-wide broadcast channel. Every connection task
/// receives every envelope and filters on its own room membership.
#[derive(Debug, Clone)]
pub struct RoomEvent {
    pub room_id: String,
    pub origin: Uuid,
    pub audience: Audience,
    pub event: ServerEvent,
}
