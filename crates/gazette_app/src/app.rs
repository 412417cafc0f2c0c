use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use gazette_core::{update, AppState, AppViewModel, Msg, Phase, Stage};

use crate::effects::EffectRunner;
use crate::render;

const EVENT_WAIT: Duration = Duration::from_millis(100);

/// Owns the core state and feeds it messages, running whatever effects come
/// back.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    last_progress: Option<(Stage, u32)>,
}

impl App {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            last_progress: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies one message. Returns the new view when something visible
    /// changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    /// Pumps engine events until the job succeeds or fails, printing a line
    /// whenever the stage or progress moves. Fails if the engine stops first.
    pub fn run_until_settled(&mut self, out: &mut impl Write) -> anyhow::Result<Phase> {
        self.print_progress(out)?;
        while matches!(self.state.phase(), Phase::Submitting | Phase::Polling) {
            let Some(msg) = self
                .runner
                .next_msg(EVENT_WAIT)
                .context("waiting for the processing job")?
            else {
                continue;
            };
            self.dispatch(msg);
            self.print_progress(out)?;
        }
        Ok(self.state.phase())
    }

    fn print_progress(&mut self, out: &mut impl Write) -> io::Result<()> {
        let view = self.state.view();
        let Some(stage) = view.stage else {
            return Ok(());
        };
        if self.last_progress == Some((stage, view.progress)) {
            return Ok(());
        }
        self.last_progress = Some((stage, view.progress));
        writeln!(out, "{}", render::progress_line(&view))
    }
}
