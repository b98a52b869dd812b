#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use capsule_engine::{
    BoxedStream, FailureKind, FetchError, FetchSettings, GeminiClient, InputProvider, Transport,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub const UNREACHABLE_HOST: &str = "unreachable.example";
pub const SILENT_HOST: &str = "silent.example";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(capsule_logging::initialize_for_tests);
}

/// In-memory server: answers each request line with the canned reply for
/// that exact URL, or `51 not found`.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    routes: Arc<HashMap<String, Vec<u8>>>,
    requests: Arc<Mutex<Vec<String>>>,
    connections: Arc<Mutex<Vec<(String, u16)>>>,
}

impl ScriptedTransport {
    pub fn new<I, U, R>(routes: I) -> Self
    where
        I: IntoIterator<Item = (U, R)>,
        U: Into<String>,
        R: Into<Vec<u8>>,
    {
        Self {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(url, reply)| (url.into(), reply.into()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn connections(&self) -> Vec<(String, u16)> {
        self.connections.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, host: &str, port: u16) -> Result<BoxedStream, FetchError> {
        if host == UNREACHABLE_HOST {
            return Err(FetchError::new(FailureKind::Network, "connection refused"));
        }
        self.connections
            .lock()
            .unwrap()
            .push((host.to_string(), port));

        let (client, server) = tokio::io::duplex(64 * 1024);
        let routes = self.routes.clone();
        let requests = self.requests.clone();
        let silent = host == SILENT_HOST;
        tokio::spawn(async move {
            let mut reader = BufReader::new(server);
            let mut line = String::new();
            if reader.read_line(&mut line).await.is_err() {
                return;
            }
            let url = line.trim_end_matches(['\r', '\n']).to_string();
            requests.lock().unwrap().push(url.clone());
            if silent {
                std::future::pending::<()>().await;
            }
            let reply = routes
                .get(&url)
                .cloned()
                .unwrap_or_else(|| b"51 not found\r\n".to_vec());
            let mut server = reader.into_inner();
            let _ = server.write_all(&reply).await;
            let _ = server.shutdown().await;
        });
        Ok(Box::new(client))
    }
}

/// Gives the same answer to every prompt and remembers what was asked.
#[derive(Default)]
pub struct ScriptedInput {
    pub answer: String,
    pub prompts: Mutex<Vec<(String, bool)>>,
}

impl ScriptedInput {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl InputProvider for ScriptedInput {
    fn provide(&self, prompt: &str, sensitive: bool) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), sensitive));
        Some(self.answer.clone())
    }
}

pub fn client(transport: &ScriptedTransport) -> GeminiClient<ScriptedTransport> {
    init_logging();
    GeminiClient::with_transport(transport.clone(), FetchSettings::default())
}

pub fn gemtext(body: &str) -> Vec<u8> {
    format!("20 text/gemini; charset=utf-8\r\n{body}").into_bytes()
}
