// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Thin request/response client over the daemon's Unix socket, spawning
//! the daemon on first contact if it isn't already listening.

use aio_daemon::{wire, Config, Request, Response};
use std::time::Instant;
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to the daemon: {0}")]
    Connect(std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] wire::ProtocolError),
    #[error("daemon failed to start: {0}")]
    DaemonStartFailed(String),
    #[error("timed out waiting for the daemon to come up")]
    DaemonStartTimeout,
    #[error("the daemon returned an error: {0}")]
    Remote(#[from] aio_core::ToolError),
}

pub struct Client {
    config: Config,
}

impl Client {
    pub fn load() -> Result<Self, ClientError> {
        let config = Config::load().map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send one request, starting the daemon first if the socket isn't live.
    pub async fn call(&self, request: Request) -> Result<Response, ClientError> {
        if !probe_socket(&self.config.socket_path) {
            self.ensure_daemon_running().await?;
        }
        self.send(request).await
    }

    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let mut stream = UnixStream::connect(&self.config.socket_path).await.map_err(ClientError::Connect)?;
        wire::write_request(&mut stream, &request, wire::DEFAULT_TIMEOUT).await?;
        Ok(wire::read_response(&mut stream, wire::DEFAULT_TIMEOUT).await?)
    }

    pub async fn ensure_daemon_running(&self) -> Result<(), ClientError> {
        if probe_socket(&self.config.socket_path) {
            return Ok(());
        }
        crate::daemon_process::start_daemon_background(&self.config)?;

        let deadline = Instant::now() + crate::env::timeout_connect_ms();
        while Instant::now() < deadline {
            if probe_socket(&self.config.socket_path) {
                return Ok(());
            }
            tokio::time::sleep(crate::env::connect_poll_ms()).await;
        }
        Err(ClientError::DaemonStartTimeout)
    }
}

pub fn probe_socket(socket_path: &std::path::Path) -> bool {
    std::os::unix::net::UnixStream::connect(socket_path).is_ok()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
