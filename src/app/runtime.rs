use super::{Component, ComponentState, ShutdownReason, SmileBackApp};
use crate::error::{Result, SmileBackError};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};

/// Cloneable handle that ends [`SmileBackApp::run`]
#[derive(Clone)]
pub struct ShutdownTrigger {
    sender: Arc<Mutex<Option<oneshot::Sender<ShutdownReason>>>>,
}

impl ShutdownTrigger {
    /// Request shutdown; only the first request is delivered
    pub async fn trigger(&self, reason: ShutdownReason) {
        if let Some(sender) = self.sender.lock().await.take() {
            let _ = sender.send(reason);
        }
    }
}

impl SmileBackApp {
    pub fn shutdown_trigger(&self) -> ShutdownTrigger {
        ShutdownTrigger {
            sender: Arc::clone(&self.shutdown_sender),
        }
    }

    /// Start the detection loop and block until a shutdown is requested
    pub async fn run(&mut self) -> Result<i32> {
        let mut controller = self
            .controller
            .take()
            .ok_or_else(|| SmileBackError::system("Controller not initialized"))?;

        let shutdown_receiver = self
            .shutdown_receiver
            .take()
            .ok_or_else(|| SmileBackError::system("Shutdown receiver already taken"))?;

        let token = self.cancellation_token.clone();
        self.tasks.push(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = controller.run() => {}
            }
            info!("Detection loop stopped: {:?}", controller.stats());
        }));
        self.set_component_state(Component::Controller, ComponentState::Running)
            .await;

        info!("SmileBack system is running");

        self.setup_signal_handlers();

        let shutdown_reason = shutdown_receiver
            .await
            .map_err(|_| SmileBackError::system("Shutdown channel closed unexpectedly"))?;

        info!("Shutdown initiated: {:?}", shutdown_reason);

        let exit_code = self.shutdown().await?;

        info!("SmileBack system shutdown complete");
        Ok(exit_code)
    }

    /// Set up signal handlers for graceful shutdown
    fn setup_signal_handlers(&self) {
        // Handle SIGTERM (systemd stop) - Unix only
        #[cfg(unix)]
        {
            let trigger = self.shutdown_trigger();
            tokio::spawn(async move {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        if sigterm.recv().await.is_some() {
                            info!("Received SIGTERM signal");
                            trigger
                                .trigger(ShutdownReason::Signal("SIGTERM".to_string()))
                                .await;
                        }
                    }
                    Err(e) => warn!("Failed to register SIGTERM handler: {}", e),
                }
            });
        }

        // Handle SIGINT (Ctrl+C) - Cross-platform
        let trigger = self.shutdown_trigger();
        tokio::spawn(async move {
            if let Ok(()) = signal::ctrl_c().await {
                info!("Received SIGINT signal (Ctrl+C)");
                trigger
                    .trigger(ShutdownReason::Signal("SIGINT".to_string()))
                    .await;
            }
        });
    }
}
