use super::{Component, ComponentState, SmileBackApp};
use crate::controller::{DetectionController, MotionHandler};
use crate::display::{ChannelDisplaySink, ScoreBoard};
use crate::error::Result;
use crate::gpio::Level;
use crate::network;
use std::sync::Arc;
use tracing::{error, info, warn};

impl SmileBackApp {
    /// Initialize all system components.
    ///
    /// Missing GPIO lines degrade their feature; a missing camera is fatal.
    pub async fn initialize(&mut self) -> Result<()> {
        info!("Initializing SmileBack components");

        self.show_network_address();
        self.initialize_led().await;
        self.initialize_motion_sensor().await;

        let (sink, receiver) = ChannelDisplaySink::new();
        self.tasks
            .push(ScoreBoard::spawn(Arc::clone(&self.board), receiver));
        self.set_component_state(Component::Display, ComponentState::Running)
            .await;

        self.set_component_state(Component::Camera, ComponentState::Starting)
            .await;
        let controller = DetectionController::new(
            Arc::clone(&self.camera),
            Arc::clone(&self.recognizer),
            Arc::new(sink),
            self.motion.clone(),
            self.config.controller.cadence(),
        )
        .await;

        let controller = match controller {
            Ok(controller) => controller,
            Err(e) => {
                error!("Camera initialization failed: {}", e);
                self.set_component_state(Component::Camera, ComponentState::Failed)
                    .await;
                return Err(e);
            }
        };
        self.set_component_state(Component::Camera, ComponentState::Running)
            .await;

        self.controller = Some(controller.with_event_bus(self.event_bus.clone()));
        self.set_component_state(Component::Controller, ComponentState::Stopped)
            .await;

        self.report_degraded().await;
        info!("All components initialized");
        Ok(())
    }

    /// Publish the device address on the board's status line
    fn show_network_address(&self) {
        match network::local_address() {
            Ok(address) => {
                info!("Device network address: {}", address);
                self.board.lock().set_status(address.to_string());
            }
            Err(e) => warn!("Could not determine network address: {}", e),
        }
    }

    async fn initialize_led(&mut self) {
        let line = self.config.gpio.led_line;

        // LED starts high: no motion
        match self.gpio.open_output(line, Level::High) {
            Ok(led) => {
                self.led_line = Some(led);
                self.set_component_state(Component::Led, ComponentState::Running)
                    .await;
            }
            Err(e) => {
                warn!("Status LED disabled: {}", e);
                self.set_component_state(Component::Led, ComponentState::Degraded)
                    .await;
            }
        }
    }

    async fn initialize_motion_sensor(&mut self) {
        let line = self.config.gpio.motion_line;

        let input = match self.gpio.open_input(line) {
            Ok(input) => input,
            Err(e) => {
                warn!("Motion sensor disabled, no detections will run: {}", e);
                self.set_component_state(Component::MotionSensor, ComponentState::Degraded)
                    .await;
                return;
            }
        };

        let handler = MotionHandler::new(self.motion.clone(), self.led_line.clone())
            .with_event_bus(self.event_bus.clone());

        match handler.attach(input.as_ref()) {
            Ok(()) => {
                self.motion_line = Some(input);
                self.set_component_state(Component::MotionSensor, ComponentState::Running)
                    .await;
            }
            Err(e) => {
                warn!("Motion sensor disabled, edge notification failed: {}", e);
                self.set_component_state(Component::MotionSensor, ComponentState::Degraded)
                    .await;
            }
        }
    }
}
