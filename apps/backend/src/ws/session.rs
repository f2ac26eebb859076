use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;
use crate::ws::hub::{OutboundFrame, WsRegistry};
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(
        Uuid::new_v4(),
        app_state.flow.clone(),
        Arc::clone(&app_state.hub),
    );
    ws::start(session, &req, stream)
}

/// One websocket connection. The connection id doubles as the player id for
/// as long as the socket lives.
pub struct WsSession {
    conn_id: Uuid,
    player_id: String,
    flow: GameFlowService,
    hub: Arc<WsRegistry>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(conn_id: Uuid, flow: GameFlowService, hub: Arc<WsRegistry>) -> Self {
        Self {
            conn_id,
            player_id: conn_id.to_string(),
            flow,
            hub,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.hub
            .register(self.player_id.clone(), ctx.address().recipient());
        Self::send_json(
            ctx,
            &ServerMsg::Welcome {
                player_id: self.player_id.clone(),
            },
        );
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.hub.unregister(&self.player_id);
        self.flow.handle_disconnect(&self.player_id);
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(intent) => {
                        debug!(conn_id = %self.conn_id, action = intent.action(), "[WS SESSION] intent");
                        self.flow.handle_intent(&self.player_id, intent);
                    }
                    // Malformed frames are answered, not fatal.
                    Err(err) => {
                        debug!(conn_id = %self.conn_id, error = %err, "[WS SESSION] malformed frame");
                        Self::send_json(
                            ctx,
                            &ServerMsg::error(ErrorCode::BadRequest, "Malformed message"),
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                Self::send_json(
                    ctx,
                    &ServerMsg::error(ErrorCode::BadRequest, "Binary frames are not supported"),
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<OutboundFrame> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: OutboundFrame, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(msg.0);
    }
}
