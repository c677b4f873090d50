// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory transport for tests: replays canned replies and records requests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use bytes::Bytes;
use futures::stream;
use futures::StreamExt;
use serde_json::Value;

use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::modules::request::SmaRequest;
use crate::raise_error;

use super::{DownloadStream, SmaTransport};

type Reply = Result<Value, (ErrorCode, String)>;
type Download = (Option<String>, Option<u64>, Vec<Result<Bytes, (ErrorCode, String)>>);

#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<Reply>>,
    download: Mutex<Option<Download>>,
    requests: Mutex<Vec<SmaRequest>>,
    login_failure: Option<(ErrorCode, String)>,
    logins: AtomicUsize,
}

impl FakeTransport {
    pub fn replying(value: Value) -> Self {
        let fake = Self::default();
        fake.push_reply(Ok(value));
        fake
    }

    pub fn failing(code: ErrorCode, message: &str) -> Self {
        let fake = Self::default();
        fake.push_reply(Err((code, message.to_string())));
        fake
    }

    pub fn rejecting_login(code: ErrorCode, message: &str) -> Self {
        Self {
            login_failure: Some((code, message.to_string())),
            ..Default::default()
        }
    }

    pub fn serving(filename: Option<&str>, declared_size: Option<u64>, chunks: &[&'static [u8]]) -> Self {
        let fake = Self::default();
        *fake.download.lock().unwrap() = Some((
            filename.map(str::to_string),
            declared_size,
            chunks.iter().map(|c| Ok(Bytes::from_static(c))).collect(),
        ));
        fake
    }

    pub fn serving_broken(chunks: &[&'static [u8]]) -> Self {
        let fake = Self::default();
        let mut body: Vec<_> = chunks.iter().map(|c| Ok(Bytes::from_static(c))).collect();
        body.push(Err((ErrorCode::TransportError, "connection reset".to_string())));
        *fake.download.lock().unwrap() = Some((Some("broken.bin".into()), None, body));
        fake
    }

    pub fn push_reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<SmaRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    fn record(&self, request: &SmaRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

impl SmaTransport for FakeTransport {
    async fn execute(&self, request: &SmaRequest) -> SmaBridgeResult<Value> {
        self.record(request);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(value)) => Ok(value),
            Some(Err((code, message))) => Err(raise_error!(message, code)),
            None => Ok(Value::Null),
        }
    }

    async fn download(&self, request: &SmaRequest) -> SmaBridgeResult<DownloadStream> {
        self.record(request);
        let served = self.download.lock().unwrap().take();
        let (filename, declared_size, chunks) = served.ok_or_else(|| {
            raise_error!("No attachment with that id".into(), ErrorCode::NotFound)
        })?;
        let body = stream::iter(
            chunks
                .into_iter()
                .map(|chunk| chunk.map_err(|(code, message)| raise_error!(message, code))),
        )
        .boxed();
        Ok(DownloadStream {
            filename,
            declared_size,
            body,
        })
    }

    async fn authenticate(&self) -> SmaBridgeResult<()> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        match &self.login_failure {
            Some((code, message)) => Err(raise_error!(message.clone(), *code)),
            None => Ok(()),
        }
    }
}
