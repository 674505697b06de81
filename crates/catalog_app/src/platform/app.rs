use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use anyhow::Context;
use catalog_core::{Msg, QueryStore, SearchViewModel, SortOption};
use catalog_engine::EngineHandle;
use catalog_logging::{catalog_info, catalog_warn};
use chrono::Local;
use clap::Parser;

use super::config::Args;
use super::effects::EffectRunner;
use super::input::{parse_command, Command, HELP};
use super::render::{render, RenderOptions};

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Core(Msg),
    Sort(Option<SortOption>),
    Help,
    Invalid(String),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    catalog_logging::initialize(&config.log).context("failed to initialize logging")?;
    catalog_info!("starting against {}", config.client.base_url);

    let engine =
        EngineHandle::new(config.client.clone()).context("failed to start the catalog engine")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(engine, event_tx.clone());
    spawn_stdin_reader(event_tx.clone());

    let mut session = Session::new(effects, io::stdout());
    session.handle(AppEvent::Core(Msg::Started))?;
    if let Some(term) = config.initial_search {
        session.handle(AppEvent::Core(Msg::SearchSubmitted(term)))?;
    }

    while let Ok(event) = event_rx.recv() {
        if !session.handle(event)? {
            break;
        }
    }
    session.effects.shutdown();
    catalog_info!("session ended");
    Ok(())
}

fn spawn_stdin_reader(events: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    catalog_warn!("failed to read input: {}", err);
                    break;
                }
            };
            let event = match parse_command(&line) {
                Command::Search(term) => AppEvent::Core(Msg::SearchSubmitted(term)),
                Command::LoadMore => AppEvent::Core(Msg::LoadMoreClicked),
                Command::Sort(option) => AppEvent::Sort(option),
                Command::Help => AppEvent::Help,
                Command::Unknown(reason) => AppEvent::Invalid(reason),
                Command::Quit => AppEvent::Quit,
            };
            if events.send(event).is_err() {
                return;
            }
        }
        let _ = events.send(AppEvent::Quit);
    });
}

struct Session<W: Write> {
    store: QueryStore,
    effects: EffectRunner,
    latest: Arc<Mutex<Option<SearchViewModel>>>,
    view: SearchViewModel,
    options: RenderOptions,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(effects: EffectRunner, out: W) -> Self {
        let mut store = QueryStore::new();
        let latest = Arc::new(Mutex::new(None));
        let sink = latest.clone();
        store.subscribe(move |view: &SearchViewModel| {
            *sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(view.clone());
        });
        let view = store.snapshot();

        Self {
            store,
            effects,
            latest,
            view,
            options: RenderOptions::default(),
            out,
        }
    }

    /// Returns false once the session should end.
    fn handle(&mut self, event: AppEvent) -> io::Result<bool> {
        match event {
            AppEvent::Core(msg) => {
                let effects = self.store.dispatch(msg);
                self.effects.enqueue(effects);
                let changed = self
                    .latest
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                if let Some(view) = changed {
                    self.view = view;
                    self.options.updated_at = Some(Local::now().format("%H:%M:%S").to_string());
                    self.redraw()?;
                }
            }
            AppEvent::Sort(option) => {
                self.options.sort = option;
                self.redraw()?;
            }
            AppEvent::Help => writeln!(self.out, "{HELP}")?,
            AppEvent::Invalid(reason) => writeln!(self.out, "{reason} (try /help)")?,
            AppEvent::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn redraw(&mut self) -> io::Result<()> {
        write!(self.out, "\n{}", render(&self.view, &self.options))?;
        self.out.flush()
    }
}
