use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::EntityId;
use crate::remote::{RemoteError, RemoteResult, RemoteSync};
use crate::sync::PendingMutation;

/// Scripted outcome for one replay call
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Succeed,
    Fail(&'static str),
}

/// Remote double that records every replay and answers from a script.
/// Once the script runs out every call succeeds.
#[derive(Default)]
pub struct ScriptedRemote {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<PendingMutation>>,
    hook: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ScriptedRemote {
    pub fn with_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Run `hook` in the middle of every replay, while the queue lock is free.
    pub fn on_replay(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<EntityId> {
        self.replayed().into_iter().map(|call| call.id).collect()
    }

    pub fn replayed(&self) -> Vec<PendingMutation> {
        self.calls.lock().unwrap().clone()
    }
}

impl RemoteSync for ScriptedRemote {
    async fn replay(&self, mutation: &PendingMutation) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(mutation.clone());
        if let Some(hook) = &self.hook {
            hook();
        }
        tokio::task::yield_now().await;

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Fail(message)) => Err(RemoteError::Rejected(message.to_string())),
            Some(Step::Succeed) | None => Ok(()),
        }
    }
}
