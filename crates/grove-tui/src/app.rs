//! Event loop: terminal events and effect results in, model updates and
//! frames out.
//!
//! The loop owns the only copy of the model. Every change goes through
//! `grove_core::app::update`; its effects are handed to the runtime, whose
//! results arrive on `action_rx` and are drained after each terminal event.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, trace};

use grove_core::app::{self, Action};
use grove_core::component::{banner, recipe, recipes_form};
use grove_core::dashboard;
use grove_core::poll::{PollAction, PollModel};
use grove_core::recipes::{self, Panel};
use grove_core::{Effects, GroveConfig, Runtime};

use crate::event::{Event, EventReader};
use crate::tui::Tui;
use crate::view::{self, ViewState};

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    SelectNext,
    SelectPrev,
    Dispatch(Action),
}

pub struct App {
    model: app::Model,
    ui: ViewState,
    runtime: Runtime<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Effects of `init`, run once the loop starts.
    startup: Option<Effects<Action>>,
    poll_interval: Duration,
    poll_max_backoff: Duration,
    last_ping: Option<Instant>,
    running: bool,
}

impl App {
    pub fn new(config: &GroveConfig) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let runtime = Runtime::from_config(config, action_tx)?;
        Ok(Self::with_runtime(config, runtime, action_rx))
    }

    /// `action_rx` must receive what `runtime` delivers.
    fn with_runtime(
        config: &GroveConfig,
        runtime: Runtime<Action>,
        action_rx: mpsc::UnboundedReceiver<Action>,
    ) -> Self {
        let (model, mut startup) = app::init(
            config.latest_url.clone(),
            config.recipes_origin_template.clone(),
        );
        if let Some(origin) = config.default_origin.clone() {
            startup = startup.and(Effects::send(Action::Recipes(recipes::Action::Configure(
                origin,
            ))));
        }

        Self {
            model,
            ui: ViewState::default(),
            runtime,
            action_rx,
            startup: Some(startup),
            poll_interval: config.poll_interval,
            poll_max_backoff: config.poll_max_backoff,
            last_ping: None,
            running: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // polling clock resolution
            Duration::from_millis(33),  // ~30 FPS render
        );

        self.start();
        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(command) = map_key(&self.model, &self.ui, key) {
                        self.execute(command);
                    }
                }
                Event::Tick => {
                    let due = poll_due(
                        &self.model.dashboard.poll,
                        self.last_ping,
                        Instant::now(),
                        self.poll_interval,
                        self.poll_max_backoff,
                    );
                    if due {
                        self.dispatch(Action::Dashboard(dashboard::Action::Poll(PollAction::Ping)));
                    }
                }
                Event::Render | Event::Resize => {
                    tui.draw(|frame| view::render(frame, &self.model, &self.ui))?;
                }
            }

            self.drain_actions();
        }

        info!("event loop ended");
        Ok(())
    }

    /// Run the startup effects and apply the actions they queue at once,
    /// so the initial ping is recorded before the first tick.
    fn start(&mut self) {
        if let Some(startup) = self.startup.take() {
            self.runtime.run(startup);
        }
        self.drain_actions();
    }

    fn drain_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::SelectNext => {
                self.ui.selected = self.ui.selected.saturating_add(1);
                self.ui.clamp(self.model.recipes.recipes.len());
            }
            Command::SelectPrev => self.ui.selected = self.ui.selected.saturating_sub(1),
            Command::Dispatch(action) => self.dispatch(action),
        }
    }

    fn dispatch(&mut self, action: Action) {
        if matches!(
            action,
            Action::Dashboard(dashboard::Action::Poll(PollAction::Ping))
        ) {
            self.last_ping = Some(Instant::now());
        }
        trace!(?action, "dispatch");

        let (model, effects) = app::update(self.model.clone(), action);
        self.model = model;
        self.runtime.run(effects);
        self.ui.clamp(self.model.recipes.recipes.len());
    }
}

/// The polling clock: ping when no fetch is outstanding and the backoff
/// for the current miss streak has elapsed since the last ping.
pub fn poll_due(
    poll: &PollModel,
    last_ping: Option<Instant>,
    now: Instant,
    interval: Duration,
    max_backoff: Duration,
) -> bool {
    if poll.is_waiting() {
        return false;
    }
    let wait = poll.backoff(interval, max_backoff);
    last_ping.is_none_or(|last| now.saturating_duration_since(last) >= wait)
}

/// Map a key press to a command, given what is on screen.
///
/// Layers, topmost first: the start confirmation, the recipe form, the
/// recipe list, the dashboard.
pub fn map_key(model: &app::Model, ui: &ViewState, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    if model.pending_start.is_some() {
        return match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Command::Dispatch(Action::ConfirmStart)),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Command::Dispatch(Action::CancelStart)),
            _ => None,
        };
    }

    let recipes_action = |a| Some(Command::Dispatch(Action::Recipes(a)));

    if model.recipes.modal.is_open && model.recipes.active_panel == Panel::Form {
        let form = |a| recipes_action(recipes::Action::Form(a));
        return match key.code {
            KeyCode::Esc => recipes_action(recipes::Action::ActivatePanel(Panel::List)),
            KeyCode::Enter => form(recipes_form::Action::Submit),
            KeyCode::Backspace => form(recipes_form::Action::Backspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                form(recipes_form::Action::Clear)
            }
            KeyCode::Char(c) => form(recipes_form::Action::Insert(c)),
            _ => None,
        };
    }

    if model.recipes.modal.is_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('r') => recipes_action(recipes::Action::Close),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::SelectPrev),
            KeyCode::Enter => {
                let id = model.recipes.recipes.order().get(ui.selected)?.clone();
                recipes_action(recipes::Action::ByID(id, recipe::Action::Activate))
            }
            KeyCode::Char('n') => recipes_action(recipes::Action::ActivatePanel(Panel::Form)),
            KeyCode::Char('s') => recipes_action(recipes::Action::Sync),
            KeyCode::Char('d') => recipes_action(recipes::Action::Banner(banner::Action::Dismiss)),
            KeyCode::Char('f') => recipes_action(recipes::Action::Banner(banner::Action::Refresh)),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('r') => recipes_action(recipes::Action::Open),
        KeyCode::Char('p') if !model.dashboard.poll.is_waiting() => Some(Command::Dispatch(
            Action::Dashboard(dashboard::Action::Poll(PollAction::Ping)),
        )),
        KeyCode::Char('d') => recipes_action(recipes::Action::Banner(banner::Action::Dismiss)),
        KeyCode::Char('f') => recipes_action(recipes::Action::Banner(banner::Action::Refresh)),
        _ => None,
    }
}
