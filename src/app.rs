use std::{
    cell::RefCell,
    path::PathBuf,
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::{
    announcer::Announcer,
    api::HttpMarketApi,
    chart::TerminalChartFactory,
    cli::Args,
    compare::SlotId,
    config::Config,
    data::{DisplayMode, Ticker, TimeRange},
    events::{log_notification, AppEvent, Target},
    fetch::{FetchRequest, Fetcher},
    helper::cycle,
    logger,
    preferences::{self, Preferences},
    render::{DirtyFlags, RenderState},
    state::{Dashboard, DashboardSettings, View},
    toast::ToastLevel,
    ui::styles,
    views::{self, not_found, Screen},
    widgets::{InputOutcome, Loading, LogPanel, Terminal, TickerInput},
};

pub const LANGUAGES: [&str; 3] = ["en", "es", "zh-CN"];
const DEFAULT_TICKER: &str = "AAPL";
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// What a key press asks the app to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Search(Target),
    SetMode(DisplayMode),
    RangePreset(usize),
    PickSuggestion(usize),
    CycleNewsFilter,
    ToggleCompare,
    Refresh,
    CycleLanguage,
    CyclePalette,
    ToggleHelp,
    ToggleLogPanel,
    Dismiss,
}

/// Screen facts that change what a key means
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub view: View,
    pub not_found: bool,
}

/// Map a key press outside any popup to a command
pub fn command_for(event: KeyEvent, context: KeyContext) -> Option<Command> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    if matches!(event, ctrl!('c')) {
        return Some(Command::Quit);
    }
    if event.code == KeyCode::Esc {
        return Some(Command::Dismiss);
    }
    if !KeyModifiers::SHIFT.contains(event.modifiers) {
        return None;
    }
    let KeyCode::Char(c) = event.code else {
        return None;
    };

    Some(match c {
        'q' => Command::Quit,
        '/' => Command::Search(Target::Main),
        'a' => Command::Search(Target::Slot(SlotId::A)),
        'b' => Command::Search(Target::Slot(SlotId::B)),
        'l' => Command::SetMode(DisplayMode::Line),
        'c' => Command::SetMode(DisplayMode::Candlestick),
        '1'..='5' => {
            let index = usize::from(c as u8 - b'1');
            let on_not_found = context.not_found && context.view == View::Single;
            if on_not_found && index < not_found::SUGGESTIONS.len() {
                Command::PickSuggestion(index)
            } else {
                Command::RangePreset(index)
            }
        }
        'n' => Command::CycleNewsFilter,
        'p' => Command::ToggleCompare,
        'r' => Command::Refresh,
        'L' => Command::CycleLanguage,
        'C' => Command::CyclePalette,
        '?' => Command::ToggleHelp,
        '`' => Command::ToggleLogPanel,
        _ => return None,
    })
}

/// Next language after `current`, wrapping around
pub fn next_language(current: &str) -> &'static str {
    let index = LANGUAGES.iter().position(|lang| *lang == current);
    cycle::next(index, LANGUAGES.len())
        .and_then(|idx| LANGUAGES.get(idx))
        .copied()
        .unwrap_or(LANGUAGES[0])
}

pub struct App {
    dashboard: Dashboard,
    fetcher: Fetcher,
    input: TickerInput,
    log_panel: LogPanel,
    announcer: Rc<RefCell<Announcer>>,
    loading: Loading,
    help: bool,
    first_visit: bool,
    prefs: Preferences,
    prefs_path: PathBuf,
    render: RenderState,
}

impl App {
    fn new(
        config: &Config,
        fetcher: Fetcher,
        prefs: Preferences,
        prefs_path: PathBuf,
        range: TimeRange,
    ) -> Self {
        let factory = Rc::new(TerminalChartFactory::new(config.charts));
        let mut dashboard = Dashboard::new(
            factory,
            DashboardSettings {
                mode: prefs.display_mode,
                range,
                ceiling: config.price_ceiling,
            },
        );

        let announcer = Rc::new(RefCell::new(Announcer::default()));
        dashboard.bus_mut().subscribe(log_notification);
        dashboard.bus_mut().subscribe({
            let announcer = announcer.clone();
            move |notification| announcer.borrow_mut().hear(notification)
        });

        let mut input = TickerInput::default();
        if let Some(ticker) = prefs.last_ticker.clone() {
            input.remember(ticker);
        }

        let first_visit = !prefs.has_visited_before;
        Self {
            dashboard,
            fetcher,
            input,
            log_panel: LogPanel::default(),
            announcer,
            loading: Loading::default(),
            help: first_visit,
            first_visit,
            prefs,
            prefs_path,
            render: RenderState::new(),
        }
    }

    fn dispatch(&self, request: FetchRequest) {
        tracing::info!(
            pane = ?request.target,
            ticker = %request.ticker,
            generation = request.generation,
            "fetching"
        );
        drop(self.fetcher.dispatch(request));
    }

    fn search(&mut self, target: Target, ticker: Ticker) {
        let view = match target {
            Target::Main => View::Single,
            Target::Slot(_) => View::Compare,
        };
        let dirty = self.dashboard.show_view(view);
        self.render.mark_dirty(dirty);
        if target == Target::Main {
            self.prefs.last_ticker = Some(ticker.clone());
        }
        let request = self.dashboard.search(target, ticker);
        self.dispatch(request);
        self.loading = Loading::default();
        self.render.mark_dirty(DirtyFlags::NONE.mark_state_change());
    }

    /// Parse a ticker from the command line, falling back with a toast when invalid
    fn initial_ticker(&mut self, raw: Option<&str>, fallback: Ticker) -> Ticker {
        match raw {
            None => fallback,
            Some(raw) => Ticker::parse(raw).unwrap_or_else(|| {
                tracing::warn!(input = raw, "invalid ticker on the command line");
                self.dashboard
                    .toasts_mut()
                    .push(ToastLevel::Warning, t!("Search.Invalid", input = raw));
                fallback
            }),
        }
    }

    fn start(&mut self, args: &Args) {
        let default = Ticker::parse(DEFAULT_TICKER);
        let remembered = self.prefs.last_ticker.clone().or(default);
        let Some(remembered) = remembered else {
            return;
        };

        let main = self.initial_ticker(args.ticker.as_deref(), remembered.clone());
        self.search(Target::Main, main);

        if let Some((a, b)) = &args.compare {
            let a = self.initial_ticker(Some(a.as_str()), remembered.clone());
            let b = self.initial_ticker(Some(b.as_str()), remembered);
            self.search(Target::Slot(SlotId::A), a);
            self.search(Target::Slot(SlotId::B), b);
        }
    }

    fn set_language(&mut self, language: &str) {
        rust_i18n::set_locale(language);
        self.prefs.language = Some(language.to_string());
        tracing::info!(language, "language changed");
    }

    /// Returns false when the app should quit
    fn handle_key(&mut self, event: KeyEvent) -> bool {
        if self.input.is_visible() {
            match self.input.handle_key(event) {
                InputOutcome::Submitted { target, ticker } => self.search(target, ticker),
                InputOutcome::Cancelled | InputOutcome::Pending => {}
            }
            self.render.mark_dirty(DirtyFlags::ALL);
            return true;
        }

        let context = KeyContext {
            view: self.dashboard.view(),
            not_found: self.dashboard.main().not_found().is_some(),
        };
        let Some(command) = command_for(event, context) else {
            return true;
        };
        tracing::trace!(?command, "key command");

        let today = logger::today();
        let dirty = match command {
            Command::Quit => return false,
            Command::Search(target) => {
                self.help = false;
                self.input.open(target);
                DirtyFlags::POPUP_SEARCH
            }
            Command::SetMode(mode) => {
                self.prefs.display_mode = mode;
                self.dashboard.set_mode(mode, today)
            }
            Command::RangePreset(index) => match TimeRange::preset(index) {
                Some(range) => {
                    self.prefs.time_range = range;
                    self.dashboard.set_range(range, today)
                }
                None => DirtyFlags::NONE,
            },
            Command::PickSuggestion(index) => {
                if let Some(ticker) = not_found::suggestion(index) {
                    self.search(Target::Main, ticker);
                }
                DirtyFlags::ALL
            }
            Command::CycleNewsFilter => self.dashboard.cycle_news_filter(),
            Command::ToggleCompare => self.dashboard.toggle_view(),
            Command::Refresh => {
                for request in self.dashboard.refresh() {
                    self.dispatch(request);
                }
                DirtyFlags::ALL
            }
            Command::CycleLanguage => {
                let next = next_language(&rust_i18n::locale());
                self.set_language(next);
                DirtyFlags::ALL
            }
            Command::CyclePalette => {
                let palette = styles::palette().next();
                styles::set_palette(palette);
                self.prefs.palette = palette;
                DirtyFlags::ALL
            }
            Command::ToggleHelp => {
                self.help = !self.help;
                self.first_visit = false;
                DirtyFlags::ALL
            }
            Command::ToggleLogPanel => {
                self.log_panel.toggle();
                DirtyFlags::ALL
            }
            Command::Dismiss => {
                self.help = false;
                self.first_visit = false;
                if self.log_panel.is_visible() {
                    self.log_panel.toggle();
                }
                DirtyFlags::ALL
            }
        };
        self.render.mark_dirty(dirty);
        true
    }

    /// Work done on every render tick before deciding whether to draw
    fn tick(&mut self, now: Instant) {
        if self.dashboard.toasts_mut().prune(now) {
            self.render.mark_dirty(DirtyFlags::TOAST);
        }
        if self.announcer.borrow_mut().expire(now) {
            self.render.mark_dirty(DirtyFlags::FOOTER);
        }
        if self.dashboard.is_loading() {
            self.render.mark_dirty(DirtyFlags::LOADING | DirtyFlags::HEADER);
        }
        if self.log_panel.is_visible() {
            self.render.mark_dirty(DirtyFlags::LOG_PANEL);
        }
    }

    fn draw(&mut self, terminal: &mut Terminal, now: Instant) -> std::io::Result<()> {
        let announcer = self.announcer.borrow();
        let screen = Screen {
            dashboard: &self.dashboard,
            input: &self.input,
            announcement: announcer.current(now),
            help: self.help,
            first_visit: self.first_visit,
            loading: self.loading.widget(now),
        };
        let log_panel = &mut self.log_panel;
        terminal.draw(|frame| views::render(frame, &screen, log_panel))?;
        Ok(())
    }

    fn save_preferences(&mut self) {
        self.prefs.has_visited_before = true;
        self.prefs.time_range = self.dashboard.range();
        self.prefs.display_mode = self.dashboard.mode();
        let prefs = std::mem::take(&mut self.prefs).stamped();
        match preferences::save_to(&prefs, &self.prefs_path) {
            Ok(()) => tracing::info!(path = %self.prefs_path.display(), "preferences saved"),
            Err(err) => tracing::error!(error = %err, "failed to save preferences"),
        }
        self.prefs = prefs;
    }
}

pub async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let api = HttpMarketApi::new(&config.api_base, config.timeout)?;
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let fetcher = Fetcher::new(Arc::new(api), tx);

    let prefs_path = preferences::default_path(config.data_dir.as_deref());
    let prefs = preferences::load_from(&prefs_path).unwrap_or_default();

    let language = config
        .locale
        .clone()
        .or_else(|| prefs.language.clone())
        .unwrap_or_else(|| LANGUAGES[0].to_string());
    rust_i18n::set_locale(&language);
    styles::set_palette(prefs.palette);

    let range = args.range.unwrap_or(prefs.time_range);
    let mut app = App::new(&config, fetcher, prefs, prefs_path, range);
    app.start(&args);

    let mut terminal = Terminal::new()?;
    let mut render_tick = tokio::time::interval(RENDER_INTERVAL);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut events = crossterm::event::EventStream::new();
    app.render.mark_all_dirty();

    loop {
        tokio::select! {
            _ = render_tick.tick() => {
                let now = Instant::now();
                app.tick(now);
                if app.render.needs_render() {
                    app.draw(&mut terminal, now)?;
                    app.render.clear();
                } else {
                    app.render.skip();
                }
            }
            Some(event) = rx.recv() => {
                let dirty = app.dashboard.apply(event, logger::today());
                app.render.mark_dirty(dirty);
            }
            Some(event) = tokio_stream::StreamExt::next(&mut events) => {
                match event {
                    Ok(Event::Key(key)) => {
                        if !app.handle_key(key) {
                            break;
                        }
                    }
                    Ok(Event::Resize(..)) => app.render.mark_all_dirty(),
                    Ok(_) => {}
                    Err(err) => {
                        tracing::error!(error = %err, "failed to read terminal event");
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!(stats = %app.render.stats(), "render loop finished");
    app.save_preferences();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> KeyContext {
        KeyContext::default()
    }

    fn shifted(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
    }

    #[test]
    fn maps_bindings() {
        assert_eq!(command_for(key!('/'), single()), Some(Command::Search(Target::Main)));
        assert_eq!(
            command_for(key!('b'), single()),
            Some(Command::Search(Target::Slot(SlotId::B)))
        );
        assert_eq!(
            command_for(key!('c'), single()),
            Some(Command::SetMode(DisplayMode::Candlestick))
        );
        assert_eq!(command_for(key!('3'), single()), Some(Command::RangePreset(2)));
        assert_eq!(command_for(key!('n'), single()), Some(Command::CycleNewsFilter));
        assert_eq!(command_for(key!('p'), single()), Some(Command::ToggleCompare));
        assert_eq!(command_for(key!('r'), single()), Some(Command::Refresh));
        assert_eq!(command_for(key!('`'), single()), Some(Command::ToggleLogPanel));
        assert_eq!(command_for(key!(Esc), single()), Some(Command::Dismiss));
        assert_eq!(command_for(key!('x'), single()), None);
    }

    #[test]
    fn shifted_keys() {
        assert_eq!(command_for(shifted('L'), single()), Some(Command::CycleLanguage));
        assert_eq!(command_for(shifted('C'), single()), Some(Command::CyclePalette));
        assert_eq!(command_for(shifted('?'), single()), Some(Command::ToggleHelp));
        assert_eq!(command_for(key!('L'), single()), Some(Command::CycleLanguage));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(command_for(key!('q'), single()), Some(Command::Quit));
        assert_eq!(command_for(ctrl!('c'), single()), Some(Command::Quit));
        let alt_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT);
        assert_eq!(command_for(alt_q, single()), None);
    }

    #[test]
    fn digits_pick_suggestions_on_not_found() {
        let context = KeyContext {
            view: View::Single,
            not_found: true,
        };
        assert_eq!(command_for(key!('1'), context), Some(Command::PickSuggestion(0)));
        assert_eq!(command_for(key!('4'), context), Some(Command::PickSuggestion(3)));
        assert_eq!(command_for(key!('5'), context), Some(Command::RangePreset(4)));

        let compare = KeyContext {
            view: View::Compare,
            not_found: true,
        };
        assert_eq!(command_for(key!('1'), compare), Some(Command::RangePreset(0)));
    }

    #[test]
    fn ignores_key_release() {
        let mut event = key!('q');
        event.kind = KeyEventKind::Release;
        assert_eq!(command_for(event, single()), None);
    }

    #[test]
    fn language_cycle() {
        assert_eq!(next_language("en"), "es");
        assert_eq!(next_language("es"), "zh-CN");
        assert_eq!(next_language("zh-CN"), "en");
        assert_eq!(next_language("fr"), "en");
    }
}
