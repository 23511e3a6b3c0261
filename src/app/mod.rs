use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use log::info;

use crate::store::{NoteStore, load_notes};

mod graph;
mod physics;
mod render_utils;
mod sizing;
mod ui;
mod viewport;

use viewport::Viewport;

pub struct SlipMapApp {
    notes_path: PathBuf,
    state: AppState,
    reload_rx: Option<Receiver<Result<NoteStore, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<NoteStore, String>>,
    },
    Ready(Box<MapModel>),
    Error(String),
}

/// State of the neighborhood map view: the note snapshot, the anchor and
/// depth selection, viewport and press tracking, plus the cached layout
/// arena that carries node positions across rebuilds.
struct MapModel {
    store: NoteStore,
    active_note_id: Option<String>,
    requested_depth: usize,
    max_available_depth: usize,
    viewport: Viewport,
    press_started: Option<(String, f64)>,
    highlighted_id: Option<String>,
    graph_dirty: bool,
    graph_cache: Option<MapGraph>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Arena of currently-visible nodes. Neighbor references are stored as
/// indices into `nodes`, never as owning pointers, so the cyclic note graph
/// stays cycle-free on the Rust side. `edges` are directed anterior->note
/// pairs used for arrow rendering.
struct MapGraph {
    nodes: Vec<MapNode>,
    index_by_id: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

/// One visible note with its transient layout state. `world_pos`/`velocity`
/// are owned by the layout engine and only mutated during a step or a
/// collision pass.
struct MapNode {
    id: String,
    world_pos: Vec2,
    velocity: Vec2,
    size: Vec2,
    content: String,
    tags: Vec<String>,
}

impl MapModel {
    fn new(store: NoteStore) -> Self {
        Self {
            store,
            active_note_id: None,
            requested_depth: 1,
            max_available_depth: 1,
            viewport: Viewport::new(),
            press_started: None,
            highlighted_id: None,
            graph_dirty: true,
            graph_cache: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    /// Swaps in a fresh snapshot. Layout positions survive through
    /// `graph_cache`; only membership changes on the next rebuild.
    fn replace_store(&mut self, store: NoteStore) {
        if let Some(active) = &self.active_note_id
            && store.get(active).is_none()
        {
            self.active_note_id = None;
        }
        self.store = store;
        self.graph_dirty = true;
    }

    /// Anchor change from a tap. Exploration depth is anchor-scoped, so the
    /// requested depth resets to its floor.
    fn set_anchor(&mut self, id: String) {
        if self.store.get(&id).is_none() {
            return;
        }
        info!("anchor changed to note {id}");
        self.active_note_id = Some(id);
        self.requested_depth = 1;
        self.graph_dirty = true;
    }

    fn effective_depth(&self) -> usize {
        self.requested_depth.clamp(1, self.max_available_depth)
    }

    fn can_increase_depth(&self) -> bool {
        self.effective_depth() < self.max_available_depth
    }

    fn can_decrease_depth(&self) -> bool {
        self.effective_depth() > 1
    }

    fn increase_depth(&mut self) {
        if self.can_increase_depth() {
            self.requested_depth = self.effective_depth() + 1;
            self.graph_dirty = true;
        }
    }

    fn decrease_depth(&mut self) {
        if self.can_decrease_depth() {
            self.requested_depth = self.effective_depth() - 1;
            self.graph_dirty = true;
        }
    }

    fn show(&mut self, ctx: &Context, reload_requested: &mut bool, is_loading: bool) -> bool {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("slipmap");
                    ui.separator();
                    ui.label(format!("notes: {}", self.store.note_count()));
                    ui.label(format!("links: {}", self.store.link_count()));
                    ui.label(format!(
                        "visible: {} notes, {} edges",
                        self.visible_node_count, self.visible_edge_count
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload notes"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading notes...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_map(ui);
            }
        });

        self.draw_map_controls(ctx)
    }
}

impl SlipMapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, notes_path: PathBuf) -> Self {
        let state = Self::start_load(notes_path.clone());
        Self {
            notes_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(notes_path: PathBuf) -> Receiver<Result<NoteStore, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_notes(&notes_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(notes_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(notes_path),
        }
    }
}

impl eframe::App for SlipMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut close_requested = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(store) => AppState::Ready(Box::new(MapModel::new(store))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading notes...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the note snapshot");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.notes_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                close_requested = model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.notes_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(store)) => model.replace_store(store),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }

        if close_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}
