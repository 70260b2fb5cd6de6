use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::api::AppState;
use crate::events::{Audience, ClientEvent, RoomEvent, ServerEvent};
use crate::rooms::WriteOutcome;

/// Drive one client connection: `connected` → `joined(room)` →
/// `disconnected`. The connection belongs to at most one room; a second
/// `join-room` overwrites the membership. Nothing is cleaned up in the
/// registry on disconnect, since rooms are keyed by room only.
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut broadcasts = BroadcastStream::new(state.event_tx.subscribe());
    let mut room: Option<String> = None;

    tracing::debug!(%conn_id, "websocket connected");

    loop {
        tokio::select! {
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => {
                                if handle_event(&state, conn_id, &mut room, event, &mut sender)
                                    .await
                                    .is_err()
                                {
                                    break;
                                }
                            }
                            // Malformed frames are dropped without a reply.
                            Err(err) => {
                                tracing::debug!(%conn_id, %err, "ignoring malformed frame")
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%conn_id, %err, "websocket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            outbound = broadcasts.next() => {
                match outbound {
                    Some(Ok(event)) => {
                        if delivers_to(&event, conn_id, room.as_deref()) {
                            let Ok(frame) = serde_json::to_string(&event.event) else {
                                continue;
                            };
                            if sender.send(Message::Text(frame)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                        tracing::warn!(%conn_id, skipped, "slow connection dropped broadcasts");
                    }
                    None => break,
                }
            }
        }
    }

    tracing::debug!(%conn_id, room = room.as_deref().unwrap_or("-"), "websocket disconnected");
}

/// Whether a broadcast envelope reaches this connection: same room, and the
/// sender is excluded unless the audience includes it.
fn delivers_to(event: &RoomEvent, conn_id: Uuid, room: Option<&str>) -> bool {
    room == Some(event.room_id.as_str())
        && (event.audience == Audience::Room || event.origin != conn_id)
}

async fn handle_event(
    state: &AppState,
    conn_id: Uuid,
    room: &mut Option<String>,
    event: ClientEvent,
    sender: &mut SplitSink<WebSocket, Message>,
) -> Result<()> {
    match event {
        ClientEvent::JoinRoom(room_id) => {
            if state.registry.ensure_room(&room_id) {
                tracing::info!(room = %room_id, "room created");
            }
            *room = Some(room_id.clone());
            let files = state.registry.files(&room_id).unwrap_or_default();
            // Only the joining connection gets the file list.
            let frame = serde_json::to_string(&ServerEvent::InitFiles(files))?;
            sender.send(Message::Text(frame)).await?;
        }
        ClientEvent::CodeChange {
            room_id,
            file_name,
            new_code,
        } => match state.registry.set_file_code(&room_id, &file_name, &new_code) {
            WriteOutcome::Applied => {
                broadcast(
                    state,
                    RoomEvent {
                        room_id,
                        origin: conn_id,
                        audience: Audience::Others,
                        event: ServerEvent::RemoteCodeChange {
                            file_name,
                            new_code,
                        },
                    },
                );
            }
            outcome => {
                tracing::debug!(room = %room_id, file = %file_name, ?outcome, "code-change ignored")
            }
        },
        ClientEvent::LanguageChange {
            room_id,
            file_name,
            new_language,
        } => match state
            .registry
            .set_file_language(&room_id, &file_name, new_language)
        {
            WriteOutcome::Applied => {
                broadcast(
                    state,
                    RoomEvent {
                        room_id,
                        origin: conn_id,
                        audience: Audience::Others,
                        event: ServerEvent::RemoteLanguageChange {
                            file_name,
                            new_language,
                        },
                    },
                );
            }
            outcome => {
                tracing::debug!(room = %room_id, file = %file_name, ?outcome, "language-change ignored")
            }
        },
        ClientEvent::CreateFile { room_id, file_name } => {
            match state.registry.create_file(&room_id, &file_name) {
                Some(file) => {
                    tracing::info!(room = %room_id, file = %file.file_name, language = %file.language, "file created");
                    broadcast(
                        state,
                        RoomEvent {
                            room_id,
                            origin: conn_id,
                            audience: Audience::Room,
                            event: ServerEvent::FileCreated { file_name },
                        },
                    );
                }
                None => {
                    tracing::debug!(room = %room_id, "create-file for unknown room ignored")
                }
            }
        }
        ClientEvent::DeleteFile { room_id, file_name } => {
            match state.registry.delete_file(&room_id, &file_name) {
                // The broadcast fires with the remaining list even when no
                // file matched the name.
                Some(remaining) => {
                    tracing::info!(room = %room_id, file = %file_name, "file delete requested");
                    broadcast(
                        state,
                        RoomEvent {
                            room_id,
                            origin: conn_id,
                            audience: Audience::Room,
                            event: ServerEvent::FileDeleted(remaining),
                        },
                    );
                }
                None => {
                    tracing::debug!(room = %room_id, "delete-file for unknown room ignored")
                }
            }
        }
    }
    Ok(())
}

fn broadcast(state: &AppState, event: RoomEvent) {
    // Send fails only when no connection is subscribed; nothing to do then.
    let _ = state.event_tx.send(event);
}
