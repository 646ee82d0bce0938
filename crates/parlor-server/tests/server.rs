//! End-to-end tests that run a real server and drive it with raw
//! WebSocket clients, asserting on the JSON the wire actually carries.

use futures_util::{SinkExt, StreamExt};
use parlor_server::ParlorServerBuilder;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on an ephemeral port and returns its address.
async fn start_server() -> String {
    let server = ParlorServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    format!("ws://{addr}")
}

async fn connect(url: &str) -> WsClient {
    let (ws, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    ws
}

async fn send(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

/// Reads the next data frame and parses it as a JSON event.
async fn next_event(ws: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            ws.next(),
        )
        .await
        .expect("timed out waiting for event")
        .expect("connection closed")
        .unwrap();
        match msg {
            Message::Binary(data) => return serde_json::from_slice(&data).unwrap(),
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            _ => continue,
        }
    }
}

/// Creates a lobby and consumes the three setup events, returning the
/// room code.
async fn create_lobby(ws: &mut WsClient) -> String {
    send(ws, json!({"type": "createLobby"})).await;

    let created = next_event(ws).await;
    assert_eq!(created["type"], "lobbyCreated");
    let code = created["roomCode"].as_str().unwrap().to_string();

    let joined = next_event(ws).await;
    assert_eq!(joined["type"], "joinedRoom");
    let lobby = next_event(ws).await;
    assert_eq!(lobby["type"], "updateLobbyUI");
    code
}

/// Joins an existing lobby and consumes the two setup events.
async fn join_lobby(ws: &mut WsClient, code: &str) -> Value {
    send(ws, json!({"type": "joinLobby", "roomCode": code})).await;
    let joined = next_event(ws).await;
    assert_eq!(joined["type"], "joinedRoom");
    let lobby = next_event(ws).await;
    assert_eq!(lobby["type"], "updateLobbyUI");
    joined
}

#[tokio::test]
async fn test_create_lobby_event_sequence() {
    let url = start_server().await;
    let mut host = connect(&url).await;

    send(&mut host, json!({"type": "createLobby"})).await;

    let created = next_event(&mut host).await;
    assert_eq!(created["type"], "lobbyCreated");
    let code = created["roomCode"].as_str().unwrap();
    assert_eq!(code.len(), 10);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert!(!created["categories"].as_array().unwrap().is_empty());

    let joined = next_event(&mut host).await;
    assert_eq!(joined["type"], "joinedRoom");
    assert_eq!(joined["roomCode"], code);
    assert_eq!(joined["playerName"], "Player1");
    assert_eq!(joined["isHost"], true);

    let lobby = next_event(&mut host).await;
    assert_eq!(lobby["type"], "updateLobbyUI");
    assert_eq!(lobby["roomCode"], code);
    assert_eq!(lobby["players"].as_array().unwrap().len(), 1);
    assert_eq!(lobby["isPlaying"], false);
    assert_eq!(lobby["readyCount"], 0);
    assert_eq!(lobby["settings"]["imposterCount"], 1);
    assert_eq!(lobby["settings"]["timerDurationSeconds"], 600);
}

#[tokio::test]
async fn test_second_player_joins_and_host_sees_roster_grow() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let code = create_lobby(&mut host).await;

    let mut guest = connect(&url).await;
    let joined = join_lobby(&mut guest, &code).await;
    assert_eq!(joined["playerName"], "Player2");
    assert_eq!(joined["isHost"], false);

    let lobby = next_event(&mut host).await;
    assert_eq!(lobby["type"], "updateLobbyUI");
    let players = lobby["players"].as_array().unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0]["name"], "Player1");
    assert_eq!(players[0]["isHost"], true);
    assert_eq!(players[1]["name"], "Player2");
    assert_eq!(players[1]["isHost"], false);
}

#[tokio::test]
async fn test_joining_unknown_room_reports_error() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    send(&mut ws, json!({"type": "joinLobby", "roomCode": "0000000000"})).await;

    let event = next_event(&mut ws).await;
    assert_eq!(event["type"], "error");
    assert!(event["message"].as_str().unwrap().contains("0000000000"));
}

#[tokio::test]
async fn test_malformed_frame_reports_error_and_keeps_connection() {
    let url = start_server().await;
    let mut ws = connect(&url).await;

    ws.send(Message::Text("{not json".into())).await.unwrap();
    let event = next_event(&mut ws).await;
    assert_eq!(event["type"], "error");

    // Connection still works afterwards.
    let code = create_lobby(&mut ws).await;
    assert_eq!(code.len(), 10);
}

#[tokio::test]
async fn test_host_settings_update_broadcasts_to_everyone() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let code = create_lobby(&mut host).await;
    let mut guest = connect(&url).await;
    join_lobby(&mut guest, &code).await;
    next_event(&mut host).await; // roster broadcast for the join

    send(
        &mut host,
        json!({
            "type": "updateSettings",
            "roomCode": code,
            "setting": "imposterCount",
            "value": 2,
        }),
    )
    .await;

    for ws in [&mut host, &mut guest] {
        let lobby = next_event(ws).await;
        assert_eq!(lobby["type"], "updateLobbyUI");
        assert_eq!(lobby["settings"]["imposterCount"], 2);
    }
}

#[tokio::test]
async fn test_round_deals_secret_word_to_everyone_but_one_imposter() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let code = create_lobby(&mut host).await;
    let mut guest = connect(&url).await;
    join_lobby(&mut guest, &code).await;
    next_event(&mut host).await;

    send(&mut host, json!({"type": "startGame", "roomCode": code})).await;

    let host_deal = next_event(&mut host).await;
    let guest_deal = next_event(&mut guest).await;
    for deal in [&host_deal, &guest_deal] {
        assert_eq!(deal["type"], "gameStarted");
        assert!(deal["category"].is_string());
        assert!(deal["startingPlayer"].is_string());
    }

    // Exactly one imposter at default settings for two players, and the
    // imposter never sees the word.
    let imposters = [&host_deal, &guest_deal]
        .iter()
        .filter(|d| d["isImposter"] == true)
        .count();
    assert_eq!(imposters, 1);
    for deal in [&host_deal, &guest_deal] {
        if deal["isImposter"] == true {
            assert!(deal["wordData"].is_null());
        } else {
            assert!(deal["wordData"]["text"].is_string());
        }
    }
}

#[tokio::test]
async fn test_all_ready_fires_after_every_acknowledgment() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let code = create_lobby(&mut host).await;
    let mut guest = connect(&url).await;
    join_lobby(&mut guest, &code).await;
    next_event(&mut host).await;

    send(&mut host, json!({"type": "startGame", "roomCode": code})).await;
    next_event(&mut host).await; // role deal
    next_event(&mut guest).await;

    send(&mut host, json!({"type": "playerReady", "roomCode": code})).await;
    send(&mut guest, json!({"type": "playerReady", "roomCode": code})).await;

    for ws in [&mut host, &mut guest] {
        let ready = next_event(ws).await;
        assert_eq!(ready["type"], "allReady");
        assert_eq!(ready["duration"], 600);
    }
}

#[tokio::test]
async fn test_host_disconnect_migrates_host_to_remaining_player() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let code = create_lobby(&mut host).await;
    let mut guest = connect(&url).await;
    join_lobby(&mut guest, &code).await;
    next_event(&mut host).await;

    host.close(None).await.unwrap();
    drop(host);

    let lobby = next_event(&mut guest).await;
    assert_eq!(lobby["type"], "updateLobbyUI");
    let players = lobby["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["name"], "Player2");
    assert_eq!(players[0]["isHost"], true);
}

#[tokio::test]
async fn test_leave_room_lets_connection_join_another_lobby() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let code = create_lobby(&mut host).await;

    send(&mut host, json!({"type": "leaveRoom", "roomCode": code})).await;

    // The old room is gone; joining it again fails.
    send(&mut host, json!({"type": "joinLobby", "roomCode": code})).await;
    let event = next_event(&mut host).await;
    assert_eq!(event["type"], "error");

    // But the connection is free to create a new lobby.
    let new_code = create_lobby(&mut host).await;
    assert_ne!(new_code, code);
}
