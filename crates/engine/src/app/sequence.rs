use tracing::debug;

use super::input::InputSnapshot;
use super::scene::Scene;
use super::session::GameWorld;

/// What a sequence step sees on each frame it is polled.
pub struct StepContext<'a> {
    pub dt_seconds: f32,
    pub input: &'a InputSnapshot,
    pub world: &'a mut GameWorld,
    pub scene: &'a mut Scene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Done,
}

/// Completion policy for a text step: timed display, or hold until the
/// interact edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAdvance {
    AfterSeconds(f32),
    OnInteract,
}

/// One cutscene step. Heterogeneous kinds share a single driving contract:
/// polled once per frame while active, self-reporting completion. A step that
/// never reports `Done` stalls its sequence forever; that is an authoring
/// bug, not detected here.
pub enum SequenceStep {
    /// Runs its action once per index-visit, then completes immediately.
    /// The zero-duration mutation step (freeze/unfreeze, toggle scene state).
    Run(Box<dyn FnMut(&mut StepContext)>),
    /// Drives an in-flight operation (screen fade, deferred work) until it
    /// reports completion.
    Poll(Box<dyn FnMut(&mut StepContext) -> StepStatus>),
    /// Completes after a fixed duration of frame time, measured from the
    /// first frame the step is active (the timer starts lazily).
    Wait {
        duration_seconds: f32,
        elapsed: Option<f32>,
    },
    /// Publishes a dialogue line while active. The first poll establishes
    /// visibility and never completes; afterwards the configured advance
    /// policy decides. The line is cleared on completion.
    Text {
        text: String,
        advance: TextAdvance,
        elapsed: Option<f32>,
    },
}

impl SequenceStep {
    pub fn run(action: impl FnMut(&mut StepContext) + 'static) -> Self {
        Self::Run(Box::new(action))
    }

    pub fn poll(poll: impl FnMut(&mut StepContext) -> StepStatus + 'static) -> Self {
        Self::Poll(Box::new(poll))
    }

    pub fn wait_seconds(duration_seconds: f32) -> Self {
        Self::Wait {
            duration_seconds,
            elapsed: None,
        }
    }

    pub fn text(text: impl Into<String>, advance: TextAdvance) -> Self {
        Self::Text {
            text: text.into(),
            advance,
            elapsed: None,
        }
    }

    fn poll_frame(&mut self, ctx: &mut StepContext) -> StepStatus {
        match self {
            Self::Run(action) => {
                action(ctx);
                StepStatus::Done
            }
            Self::Poll(poll) => poll(ctx),
            Self::Wait {
                duration_seconds,
                elapsed,
            } => {
                let elapsed = elapsed.get_or_insert(0.0);
                *elapsed += ctx.dt_seconds;
                if *elapsed >= *duration_seconds {
                    StepStatus::Done
                } else {
                    StepStatus::Pending
                }
            }
            Self::Text {
                text,
                advance,
                elapsed,
            } => match elapsed {
                None => {
                    *elapsed = Some(0.0);
                    ctx.world.set_dialogue(text.clone());
                    StepStatus::Pending
                }
                Some(shown) => {
                    *shown += ctx.dt_seconds;
                    let done = match advance {
                        TextAdvance::AfterSeconds(duration) => *shown >= *duration,
                        TextAdvance::OnInteract => ctx.input.interact_pressed(),
                    };
                    if done {
                        ctx.world.clear_dialogue();
                        StepStatus::Done
                    } else {
                        StepStatus::Pending
                    }
                }
            },
        }
    }

    fn rearm(&mut self) {
        match self {
            Self::Wait { elapsed, .. } | Self::Text { elapsed, .. } => *elapsed = None,
            Self::Run(_) | Self::Poll(_) => {}
        }
    }
}

/// An ordered cutscene script. Exactly one step is active at a time; the
/// cursor advances by exactly one when the active step reports `Done`, which
/// makes double-advancing structurally impossible.
#[derive(Default)]
pub struct Sequence {
    steps: Vec<SequenceStep>,
    cursor: usize,
}

impl Sequence {
    pub fn new(steps: Vec<SequenceStep>) -> Self {
        Self { steps, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Drives the active step for one frame.
    pub fn execute(&mut self, ctx: &mut StepContext) {
        let Some(step) = self.steps.get_mut(self.cursor) else {
            return;
        };
        if step.poll_frame(ctx) == StepStatus::Done {
            self.cursor += 1;
        }
    }

    /// Rewinds to the first step and re-arms every timed step. Side effects
    /// already performed are not undone; a revisited `Run` step executes its
    /// action again.
    pub fn reset(&mut self) {
        self.cursor = 0;
        for step in &mut self.steps {
            step.rearm();
        }
    }
}

/// Owns at most one active sequence. There is no queueing: installing a new
/// sequence abandons the old one outright, and any in-flight `Poll` work
/// inside it is orphaned (fire-and-forget, with no cancellation hook).
#[derive(Default)]
pub struct SequenceExecutor {
    active: Option<Sequence>,
}

impl SequenceExecutor {
    pub fn play(&mut self, sequence: Sequence) {
        if self.active.is_some() {
            debug!(steps = sequence.len(), "sequence_replaced");
        }
        self.active = Some(sequence);
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn active(&self) -> Option<&Sequence> {
        self.active.as_ref()
    }

    pub(crate) fn take_active(&mut self) -> Option<Sequence> {
        self.active.take()
    }

    /// Puts a polled sequence back, unless a step already installed a
    /// replacement during the same frame.
    pub(crate) fn restore(&mut self, sequence: Sequence) {
        if self.active.is_none() {
            self.active = Some(sequence);
        }
    }
}
