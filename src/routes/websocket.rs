use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::info;

use crate::{services::subscribers::SubscriberHub, AppState};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

async fn handle_socket(socket: WebSocket, hub: SubscriberHub) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = hub.subscribe();
    let id = subscription.id;
    info!("WebSocket connected: subscriber={} total={}", id, hub.len());

    loop {
        tokio::select! {
            payload = subscription.receiver.recv() => {
                let Some(payload) = payload else { break };
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let echo = format!("Websocket incoming text was: {}", text.as_str());
                    if sender.send(Message::Text(echo.into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    hub.unsubscribe(id);
    info!("WebSocket disconnected: subscriber={} total={}", id, hub.len());
}
