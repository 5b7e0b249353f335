use super::{Component, ComponentState, SmileBackApp};
use std::collections::BTreeMap;
use tracing::{debug, warn};

impl SmileBackApp {
    pub async fn set_component_state(&self, component: Component, state: ComponentState) {
        let previous = self.component_states.lock().await.insert(component, state);
        if previous != Some(state) {
            debug!("{} {:?} -> {:?}", component, previous, state);
        }
    }

    pub async fn get_component_state(&self, component: Component) -> Option<ComponentState> {
        self.component_states.lock().await.get(&component).copied()
    }

    /// Snapshot of every tracked component, in a stable order
    pub async fn get_all_component_states(&self) -> BTreeMap<Component, ComponentState> {
        self.component_states.lock().await.clone()
    }

    /// Optional components that came up without their hardware
    pub async fn degraded_components(&self) -> Vec<Component> {
        self.component_states
            .lock()
            .await
            .iter()
            .filter(|(_, state)| **state == ComponentState::Degraded)
            .map(|(component, _)| *component)
            .collect()
    }

    /// Log one line naming every feature running without hardware
    pub(super) async fn report_degraded(&self) {
        let degraded = self.degraded_components().await;
        if degraded.is_empty() {
            return;
        }

        let names: Vec<String> = degraded.iter().map(ToString::to_string).collect();
        warn!("Running without: {}", names.join(", "));
    }
}
