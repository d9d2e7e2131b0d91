use log::info;
use serde::{Deserialize, Serialize};

use super::{LoadState, LoaderHandle};

/// One timed transition of a demo script.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seconds after the script starts.
    pub at: f64,
    pub state: LoadState,
}

impl ScriptStep {
    pub fn new(at: f64, state: LoadState) -> Self {
        Self { at, state }
    }
}

/// Idle, a progress ramp in tenths, then finished.
pub fn default_script() -> Vec<ScriptStep> {
    let mut steps = vec![ScriptStep::new(0.0, LoadState::Idle)];
    for tenth in 0..=10 {
        steps.push(ScriptStep::new(
            0.5 + tenth as f64 * 0.4,
            LoadState::Progressing(tenth as f64 / 10.0),
        ));
    }
    steps.push(ScriptStep::new(5.3, LoadState::Finished));
    steps
}

/// Stand-in for the web loader: publishes a timeline of states as the frame
/// clock passes each step.
pub struct ScriptedLoader {
    handle: LoaderHandle,
    steps: Vec<ScriptStep>,
    next: usize,
    started_at: Option<f64>,
}

impl ScriptedLoader {
    pub fn new(handle: LoaderHandle, mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            handle,
            steps,
            next: 0,
            started_at: None,
        }
    }

    /// Publish every step due at `now`. The first call fixes the start time.
    /// Returns how many states were published.
    pub fn advance(&mut self, now: f64) -> usize {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now - started_at;
        let mut published = 0;
        while let Some(step) = self.steps.get(self.next) {
            if step.at > elapsed {
                break;
            }
            self.handle.publish(step.state.clone());
            self.next += 1;
            published += 1;
        }
        if published > 0 && self.is_done() {
            info!("Demo script finished after {:.1}s", elapsed);
        }
        published
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.steps.len()
    }
}
