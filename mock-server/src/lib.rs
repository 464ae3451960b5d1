use std::{collections::HashMap, net::Ipv4Addr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Listen address, read from `IP` and `PORT`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: Ipv4Addr::LOCALHOST,
            port: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let ip = match lookup("IP") {
            Some(raw) => raw
                .parse::<Ipv4Addr>()
                .map_err(|e| anyhow::anyhow!("invalid IP {raw:?}: {e}"))?,
            None => defaults.ip,
        };
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid PORT {raw:?}: {e}"))?,
            None => defaults.port,
        };
        Ok(Self { ip, port })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub data: Map<String, Value>,
}

/// Reply of `/echo`: what the server received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub text: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Record>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/records", get(list_records).post(create_record))
        .route(
            "/records/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/raw", get(raw))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "fixture server listening");
    }
    axum::serve(listener, app()).await
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn list_records(State(db): State<Db>) -> Json<Vec<Record>> {
    let records = db.read().await;
    debug!(count = records.len(), "listing records");
    Json(records.values().cloned().collect())
}

async fn create_record(State(db): State<Db>, Json(data): Json<Map<String, Value>>) -> Json<Record> {
    let record = Record {
        id: Uuid::new_v4(),
        data,
    };
    db.write().await.insert(record.id, record.clone());
    debug!(id = %record.id, fields = record.data.len(), "record created");
    Json(record)
}

async fn get_record(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let records = db.read().await;
    match records.get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => {
            debug!(%id, "record not found");
            not_found()
        }
    }
}

/// Merge the given fields into the record.
async fn update_record(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Map<String, Value>>,
) -> Response {
    let mut records = db.write().await;
    let Some(record) = records.get_mut(&id) else {
        debug!(%id, "update of missing record");
        return not_found();
    };
    debug!(%id, fields = patch.len(), "record updated");
    record.data.extend(patch);
    Json(record.clone()).into_response()
}

async fn delete_record(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    match db.write().await.remove(&id) {
        Some(_) => {
            debug!(%id, "record deleted");
            StatusCode::OK.into_response()
        }
        None => {
            debug!(%id, "delete of missing record");
            not_found()
        }
    }
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => return (StatusCode::BAD_REQUEST, format!("invalid JSON: {e}")).into_response(),
        }
    };
    debug!(%method, content_type = ?content_type, "echoing request");
    Json(Echo {
        method: method.to_string(),
        content_type,
        body,
    })
    .into_response()
}

async fn status(Path(code): Path<u16>, Query(query): Query<TextQuery>) -> Response {
    debug!(code, "answering with requested status");
    match StatusCode::from_u16(code) {
        Ok(status) => (status, query.text).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")).into_response(),
    }
}

async fn raw(Query(query): Query<TextQuery>) -> String {
    query.text
}
