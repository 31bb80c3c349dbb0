// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP surface: the render API and the editor page.
//!
//! | Route             | Method | Response                                   |
//! |-------------------|--------|--------------------------------------------|
//! | `/`               | GET    | editor page                                |
//! | `/api/mermaid`    | GET    | liveness message                           |
//! | `/api/mermaid`    | POST   | SVG for `{"code": "..."}`, or a text error |

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::render::Renderer;

pub mod api;
mod page;


pub const RENDER_ROUTE: &str = "/api/mermaid";

/// State shared by every handler. The renderer and its configuration are read-only.
#[derive(Clone)]
pub struct AppState {
    renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route(RENDER_ROUTE, get(api::health).post(api::render))
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status >= 500 {
        tracing::error!("{method} {path} -> {status} in {latency_ms:.1}ms");
    } else if status >= 400 {
        tracing::warn!("{method} {path} -> {status} in {latency_ms:.1}ms");
    } else {
        tracing::info!("{method} {path} -> {status} in {latency_ms:.1}ms");
    }

    response
}
