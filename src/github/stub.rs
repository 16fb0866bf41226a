// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Local HTTP server standing in for the GitHub API in tests.

use crate::config::GitHubConfig;
use reqwest::blocking::Client;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use super::GitHubClient;

type Route = dyn Fn(&str, &str) -> (u16, String) + Send + Sync;

/// A request the server received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Answers every request with `route(method, path)` and records it.
pub struct StubServer {
    url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn start<F>(route: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let route: Arc<Route> = Arc::new(route);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let _ = serve(stream, route.as_ref(), &recorded);
            }
        });

        Self { url, requests }
    }

    pub fn config(&self) -> GitHubConfig {
        GitHubConfig {
            repository: Some("octo/widgets".to_string()),
            api_url: self.url.clone(),
            token: Some("test-token".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_builder(&self.config(), Client::builder().no_proxy()).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(
    mut stream: TcpStream,
    route: &Route,
    recorded: &Mutex<Vec<Recorded>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;

    let (status, response) = route(&method, &path);
    recorded.lock().unwrap().push(Recorded {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    write!(
        stream,
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        response.len(),
        response
    )?;
    stream.flush()
}
