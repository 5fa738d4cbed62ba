//! Server lifecycle: bind, spawn the axum server in the background, and
//! return a handle with a shutdown channel.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::router::api_router;
use crate::state::AppState;

/// Handle to a running API server.
pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// The address actually bound (resolves port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

/// Bind `addr` and serve the API in a background task.
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<ApiServer> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding API server to {addr}"))?;
    let addr = listener.local_addr()?;

    let app = api_router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }
        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medguide_ai::forest::{DecisionTree, ForestArtifact, TreeNode};
    use medguide_ai::{ForestClassifier, InferencePipeline};
    use std::net::Ipv4Addr;

    fn state() -> AppState {
        let artifact = ForestArtifact {
            format_version: 1,
            feature_names: vec!["itching".into(), "skin_rash".into()],
            classes: vec!["Fungal infection".into()],
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Leaf { value: vec![1.0] }],
            }],
        };
        let forest = ForestClassifier::from_artifact(artifact).unwrap();
        AppState::new(InferencePipeline::new(Box::new(forest), None).unwrap(), None)
    }

    #[tokio::test]
    async fn start_serve_and_stop() {
        let server = start_server(state(), SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("server should start");
        assert!(server.addr().port() > 0);

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://{}/predict", server.addr()))
            .json(&serde_json::json!({"symptoms": ["itching"]}))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["prediction"], "Fungal infection");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_an_error() {
        let first = start_server(state(), SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .unwrap();
        let err = start_server(state(), first.addr()).await.err().unwrap();
        assert!(err.to_string().contains("binding"));
        first.shutdown().await;
    }
}
