use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use crate::{
    domain::{BridgeError, Reading},
    port::ReadingSource
};

/// One scripted decoder answer.
#[derive(Debug, Clone)]
pub enum Step {
    Payload(String),
    Empty,
    Failure(String),
    Panic(String)
}

impl Step {
    pub fn payload<P: Into<String>>(payload: P) -> Self {
        Self::Payload(payload.into())
    }
}

/// Replays a fixed sequence of decoder answers, then reports empty forever.
///
/// Clones share the script, so a test can keep a handle to append steps or
/// count calls while the poller owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    calls: usize
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = Step>>(steps: I) -> Self {
        Self { script: Arc::new(Mutex::new(Script { steps: steps.into_iter().collect(), calls: 0 })) }
    }

    pub fn push(&self, step: Step) {
        self.script.lock().steps.push_back(step);
    }

    pub fn calls(&self) -> usize {
        self.script.lock().calls
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().steps.len()
    }
}

impl ReadingSource for ScriptedSource {
    fn current_reading(&self) -> Result<Option<Reading>, BridgeError> {
        let step = {
            let mut script = self.script.lock();
            script.calls += 1;
            script.steps.pop_front().unwrap_or(Step::Empty)
        };

        match step {
            Step::Payload(payload) if payload.is_empty() => Ok(None),
            Step::Payload(payload) => Ok(Some(Reading::from(payload))),
            Step::Empty => Ok(None),
            Step::Failure(msg) => Err(BridgeError::Decoder(msg)),
            Step::Panic(msg) => panic!("{msg}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_then_runs_dry() {
        let source = ScriptedSource::new([Step::payload("a"), Step::Empty, Step::Failure("unplugged".into())]);

        assert_eq!(source.current_reading().unwrap().unwrap().as_str(), "a");
        assert!(source.current_reading().unwrap().is_none());
        assert!(matches!(source.current_reading(), Err(BridgeError::Decoder(msg)) if msg == "unplugged"));
        assert!(source.current_reading().unwrap().is_none());
        assert_eq!(source.calls(), 4);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn empty_payload_means_no_reading() {
        let source = ScriptedSource::new([Step::payload("")]);
        assert!(source.current_reading().unwrap().is_none());
    }

    #[test]
    fn clones_share_script() {
        let source = ScriptedSource::default();
        let handle = source.clone();
        handle.push(Step::payload("late"));
        assert_eq!(source.current_reading().unwrap().unwrap().as_str(), "late");
        assert_eq!(handle.calls(), 1);
    }
}
