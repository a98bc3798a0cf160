//! Scripted in-memory HTTP client shared by the loader tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{self, Cursor};
use std::sync::Mutex;
use std::time::Duration;

use codelab_common::net::{HttpClient, HttpResponse, NetError};
use codelab_loader::Loader;

/// One scripted answer.
#[derive(Clone)]
enum Reply {
    Response {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },
    Transport,
}

/// Answers per URL, in order; the last answer for a URL repeats. Unknown
/// URLs get a 404.
#[derive(Default)]
pub struct FakeClient {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body` for `url`.
    pub fn reply(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(
            url,
            Reply::Response {
                status,
                headers: Vec::new(),
                body: body.into(),
            },
        )
    }

    /// Queue a 200 response carrying one header.
    pub fn reply_with_header(
        self,
        url: &str,
        header: (&str, &str),
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.push(
            url,
            Reply::Response {
                status: 200,
                headers: vec![(header.0.to_string(), header.1.to_string())],
                body: body.into(),
            },
        )
    }

    /// Queue a connection failure for `url`.
    pub fn fail(self, url: &str) -> Self {
        self.push(url, Reply::Transport)
    }

    fn push(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// How many times `url` was requested.
    pub fn count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|requested| *requested == url)
            .count()
    }

    /// Every requested URL, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for FakeClient {
    fn get(&self, url: &str) -> Result<HttpResponse, NetError> {
        self.requests.lock().unwrap().push(url.to_string());
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            replies.get_mut(url).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };
        match reply {
            Some(Reply::Response {
                status,
                headers,
                body,
            }) => Ok(HttpResponse::new(status, headers, Box::new(Cursor::new(body)))),
            Some(Reply::Transport) => Err(NetError::Transport {
                url: url.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            }),
            None => Ok(HttpResponse::new(404, Vec::new(), Box::new(io::empty()))),
        }
    }
}

fn no_sleep(_: Duration) {}

/// A loader over `client` that does not wait between retries.
pub fn loader(client: FakeClient) -> Loader<FakeClient> {
    Loader::new(client).with_sleep(no_sleep)
}
