//! Directive dispatch to host output channels.
//!
//! The host supplies two sinks: one for the haptic wearable, one for
//! speech or display. They are independent; a failure in one is logged and
//! does not stop the other, and never feeds back into guidance state.

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::directive::{Directive, HapticCommand};
use crate::error::Result;

/// Fire-and-forget channel to the wearable.
pub trait HapticSink {
    fn send(&mut self, command: HapticCommand) -> Result<()>;
}

/// Speech or display channel.
pub trait SpeechSink {
    /// Speak immediately, interrupting whatever phrase is currently playing.
    fn speak_now(&mut self, phrase: &str) -> Result<()>;
}

pub struct DirectiveDispatcher<H, S> {
    haptic: H,
    speech: S,
}

impl<H: HapticSink, S: SpeechSink> DirectiveDispatcher<H, S> {
    pub fn new(haptic: H, speech: S) -> Self {
        Self { haptic, speech }
    }

    pub fn dispatch(&mut self, directive: &Directive) {
        debug!("dispatching {directive:?}");
        let rendered = directive.render();

        if let Some(command) = rendered.haptic {
            if let Err(e) = self.haptic.send(command) {
                warn!("haptic sink failed for {command:?}: {e}");
            }
        }
        if let Some(phrase) = rendered.phrase {
            if let Err(e) = self.speech.speak_now(&phrase) {
                warn!("speech sink failed for {phrase:?}: {e}");
            }
        }
    }

    /// Dispatch directives in arrival order until every sender is dropped.
    pub async fn run(mut self, mut directives: mpsc::UnboundedReceiver<Directive>) {
        while let Some(directive) = directives.recv().await {
            self.dispatch(&directive);
        }
        debug!("directive channel closed");
    }
}
