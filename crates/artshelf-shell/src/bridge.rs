// SPDX-License-Identifier: AGPL-3.0
// Artshelf Shell - Session Bridge
//
// Runs the screens on a single task. The input loop sends commands in,
// views and notices come back out as events.

use crate::commands::{ShellCommand, HELP};
use crate::render;
use artshelf_core::{
    DetailScreen, FavoritesScreen, HomeScreen, Notice, RemovalRequest, Session,
};
use async_channel::{Receiver, Sender};

/// What the session task reports back to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Full redraw of the current screen
    View(String),
    /// Toast
    Notice(Notice),
    /// Ask the user to confirm removing this many favorites
    ConfirmRemoval { count: usize },
    /// Plain message (help text, wrong-screen hints)
    Message(String),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenKind {
    Home,
    Favorites,
    Detail,
}

/// Bridge between the input loop and the session task
pub struct SessionBridge {
    command_tx: Sender<ShellCommand>,
    event_rx: Receiver<ShellEvent>,
}

impl SessionBridge {
    /// Spawn the session task on the current tokio runtime
    pub fn new(session: Session) -> Self {
        let (command_tx, command_rx) = async_channel::bounded::<ShellCommand>(32);
        let (event_tx, event_rx) = async_channel::bounded::<ShellEvent>(64);

        tokio::spawn(async move {
            Self::run_session(session, command_rx, event_tx).await;
        });

        Self {
            command_tx,
            event_rx,
        }
    }

    async fn run_session(
        session: Session,
        command_rx: Receiver<ShellCommand>,
        event_tx: Sender<ShellEvent>,
    ) {
        let mut state = ShellState::new(session);
        let mut search_rx = state.favorites.search_updates();

        state.open_home(&event_tx).await;

        loop {
            tokio::select! {
                // Handle commands from UI
                cmd = command_rx.recv() => {
                    match cmd {
                        Ok(cmd) => {
                            if !state.handle(cmd, &event_tx).await {
                                let _ = event_tx.send(ShellEvent::Exit).await;
                                break;
                            }
                        }
                        Err(_) => break, // Channel closed
                    }
                }
                // Redraw once a search query settles
                changed = search_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if state.current == ScreenKind::Favorites {
                        let view = render::favorites(&state.favorites);
                        if event_tx.send(ShellEvent::View(view)).await.is_err() {
                            break; // Channel closed
                        }
                    }
                }
            }
        }

        tracing::info!("Session task finished");
    }

    /// Send a command to the session task
    pub async fn send(&self, command: ShellCommand) -> bool {
        self.command_tx.send(command).await.is_ok()
    }

    /// Get event receiver for subscribing to session events
    pub fn event_receiver(&self) -> Receiver<ShellEvent> {
        self.event_rx.clone()
    }
}

/// Screens owned by the session task
struct ShellState {
    session: Session,
    home: HomeScreen,
    favorites: FavoritesScreen,
    detail: Option<DetailScreen>,
    current: ScreenKind,
}

impl ShellState {
    fn new(session: Session) -> Self {
        Self {
            home: session.home_screen(),
            favorites: session.favorites_screen(),
            detail: None,
            current: ScreenKind::Home,
            session,
        }
    }

    async fn emit(&self, event_tx: &Sender<ShellEvent>, event: ShellEvent) {
        let _ = event_tx.send(event).await;
    }

    async fn redraw(&self, event_tx: &Sender<ShellEvent>) {
        let view = match self.current {
            ScreenKind::Home => render::home(&self.home),
            ScreenKind::Favorites => render::favorites(&self.favorites),
            ScreenKind::Detail => match &self.detail {
                Some(detail) => render::detail(detail),
                None => render::home(&self.home),
            },
        };
        self.emit(event_tx, ShellEvent::View(view)).await;
    }

    fn leave_current(&mut self) {
        if self.current == ScreenKind::Favorites {
            self.favorites.on_blur();
        }
    }

    async fn open_home(&mut self, event_tx: &Sender<ShellEvent>) {
        self.leave_current();
        self.current = ScreenKind::Home;
        if self.home.visible_items().is_empty() {
            if let Some(notice) = self.home.refresh_catalog().await {
                self.emit(event_tx, ShellEvent::Notice(notice)).await;
            }
        }
        self.home.on_focus().await;
        self.redraw(event_tx).await;
    }

    /// Returns false when the user asked to quit
    async fn handle(&mut self, cmd: ShellCommand, event_tx: &Sender<ShellEvent>) -> bool {
        tracing::debug!("Handling {:?}", cmd);
        match cmd {
            ShellCommand::Quit => return false,
            ShellCommand::Help => {
                self.emit(event_tx, ShellEvent::Message(HELP.to_string())).await;
            }
            ShellCommand::ShowHome => self.open_home(event_tx).await,
            ShellCommand::ShowFavorites => {
                self.leave_current();
                self.current = ScreenKind::Favorites;
                self.favorites.on_focus().await;
                self.redraw(event_tx).await;
            }
            ShellCommand::ShowDetail { id } => {
                let item = self
                    .home
                    .item(&id)
                    .cloned()
                    .or_else(|| self.favorites.find(&id).cloned());
                match item {
                    Some(item) => {
                        self.leave_current();
                        let mut detail = self.session.detail_screen(item);
                        detail.load().await;
                        self.detail = Some(detail);
                        self.current = ScreenKind::Detail;
                        self.redraw(event_tx).await;
                    }
                    None => {
                        self.emit(event_tx, ShellEvent::Notice(Notice::UnknownItem)).await;
                    }
                }
            }
            ShellCommand::RefreshCatalog => {
                if let Some(notice) = self.home.refresh_catalog().await {
                    self.emit(event_tx, ShellEvent::Notice(notice)).await;
                }
                if self.current == ScreenKind::Home {
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::FilterBrand { brand } => {
                if self.require(ScreenKind::Home, event_tx).await {
                    self.home.select_brand(brand);
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::AddFavorite { id } => {
                if self.require(ScreenKind::Home, event_tx).await {
                    let notice = self.home.add_favorite(&id).await;
                    self.emit(event_tx, ShellEvent::Notice(notice)).await;
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::Search { text } => {
                if self.require(ScreenKind::Favorites, event_tx).await {
                    self.favorites.type_query(&text);
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::ToggleSelection { id } => {
                if self.require(ScreenKind::Favorites, event_tx).await {
                    self.favorites.toggle(&id);
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::ToggleAll => {
                if self.require(ScreenKind::Favorites, event_tx).await {
                    self.favorites.toggle_all();
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::RequestRemoval => {
                if self.require(ScreenKind::Favorites, event_tx).await {
                    let event = match self.favorites.request_removal() {
                        RemovalRequest::Confirm { count } => ShellEvent::ConfirmRemoval { count },
                        RemovalRequest::Rejected(notice) => ShellEvent::Notice(notice),
                    };
                    self.emit(event_tx, event).await;
                }
            }
            ShellCommand::ConfirmRemoval => {
                if self.require(ScreenKind::Favorites, event_tx).await {
                    let notice = self.favorites.confirm_removal().await;
                    self.emit(event_tx, ShellEvent::Notice(notice)).await;
                    self.redraw(event_tx).await;
                }
            }
            ShellCommand::CancelRemoval => {
                if self.require(ScreenKind::Favorites, event_tx).await {
                    self.favorites.cancel_removal();
                }
            }
            ShellCommand::AddComment { rating, text } => {
                if self.require(ScreenKind::Detail, event_tx).await {
                    if let Some(detail) = self.detail.as_mut() {
                        let notice = detail.submit_comment(&text, rating).await;
                        self.emit(event_tx, ShellEvent::Notice(notice)).await;
                        self.redraw(event_tx).await;
                    }
                }
            }
            ShellCommand::FilterRating { filter } => {
                if self.require(ScreenKind::Detail, event_tx).await {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.set_rating_filter(filter);
                    }
                    self.redraw(event_tx).await;
                }
            }
        }
        true
    }

    /// Tell the user when a command belongs to another screen
    async fn require(&self, screen: ScreenKind, event_tx: &Sender<ShellEvent>) -> bool {
        if self.current == screen {
            return true;
        }
        let name = match screen {
            ScreenKind::Home => "home",
            ScreenKind::Favorites => "favorites",
            ScreenKind::Detail => "detail <id>",
        };
        self.emit(
            event_tx,
            ShellEvent::Message(format!("Open '{}' first", name)),
        )
        .await;
        false
    }
}
