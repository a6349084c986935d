//! Scripted in-process doubles for the backend and the image host

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nutriscan::{ClientConfig, ImageBlob, MemoryCredentialStore, Notice, NutriScanApp};
use nutriscan_client::{
    ApiRequest, ApiResponse, AssetHost, BackendTransport, TransportError, UploadError,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;

pub const ADMIN_LOGIN_BODY: &str = r#"{
    "success": true,
    "user": {"uuid": "u1", "email": "admin@admin.com", "displayName": "Admin"},
    "token": "t1"
}"#;

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, String),
    Timeout,
    Refused,
    /// Waits for one permit on the gate, then answers with the inner reply
    Gated(Arc<Notify>, Box<Reply>),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Json(200, body.to_string())
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Json(status, body.to_string())
    }

    pub fn gated(gate: Arc<Notify>, reply: Reply) -> Self {
        Reply::Gated(gate, Box::new(reply))
    }
}

/// Backend double: replies are queued per path and every request is recorded
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn last_to(&self, path: &str) -> Option<ApiRequest> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

#[async_trait]
impl BackendTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> nutriscan_client::Result<ApiResponse> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        let mut reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(|q| q.pop_front());

        while let Some(Reply::Gated(gate, inner)) = reply {
            gate.notified().await;
            reply = Some(*inner);
        }

        match reply {
            Some(Reply::Json(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(Reply::Timeout) => Err(TransportError::Timeout),
            Some(Reply::Refused) | Some(Reply::Gated(..)) | None => {
                Err(TransportError::Connect(format!("no route to {}", path)))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum UploadReply {
    Url(String),
    Fail,
}

/// Image host double. With a gate set, every upload waits for one permit.
#[derive(Default)]
pub struct ScriptedAssets {
    replies: Mutex<VecDeque<UploadReply>>,
    uploads: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedAssets {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            gate: Some(gate),
            ..Self::default()
        })
    }

    pub fn reply(&self, reply: UploadReply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetHost for ScriptedAssets {
    async fn upload(&self, image: &ImageBlob) -> Result<String, UploadError> {
        self.uploads.lock().unwrap().push(image.file_name.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(UploadReply::Url(url)) => Ok(url),
            Some(UploadReply::Fail) | None => Err(UploadError::Transport(
                TransportError::Connect("image host unreachable".into()),
            )),
        }
    }
}

pub struct Harness {
    pub app: NutriScanApp,
    pub notices: UnboundedReceiver<Notice>,
    pub transport: Arc<ScriptedTransport>,
    pub assets: Arc<ScriptedAssets>,
    pub credentials: Arc<MemoryCredentialStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_assets(ScriptedAssets::new())
    }

    pub fn with_assets(assets: Arc<ScriptedAssets>) -> Self {
        Self::build(ClientConfig::default(), assets)
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::build(config, ScriptedAssets::new())
    }

    fn build(config: ClientConfig, assets: Arc<ScriptedAssets>) -> Self {
        let transport = ScriptedTransport::new();
        let credentials = Arc::new(MemoryCredentialStore::new());
        let (app, notices) = NutriScanApp::with_parts(
            config,
            transport.clone(),
            assets.clone(),
            credentials.clone(),
        );
        Self {
            app,
            notices,
            transport,
            assets,
            credentials,
        }
    }

    pub fn notices(&mut self) -> Vec<Notice> {
        nutriscan::notify::drain(&mut self.notices)
    }

    pub async fn sign_in(&mut self) {
        self.transport.reply("/auth/login", Reply::ok(ADMIN_LOGIN_BODY));
        let result = self.app.auth().login("admin@admin.com", "adminn").await;
        assert!(result.success);
        self.notices();
    }
}

pub fn png(name: &str) -> ImageBlob {
    ImageBlob::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}
