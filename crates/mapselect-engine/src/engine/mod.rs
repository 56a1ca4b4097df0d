// Imports
use crate::config::SelectConfig;
use crate::extract;
use crate::feature::{Feature, SelectedItem};
use crate::filter;
use crate::layers::LayerTree;
use crate::mapview::MapView;
use crate::overlay::{OverlayLayer, OverlayStyle};
use crate::prompts::{ChoiceEntry, PromptPresenter};
use crate::remote::RemoteFeatureSource;
use crate::selection::{apply_query_result, SelectionManager};
use crate::tools::bufferselect::BufferStage;
use crate::tools::{GestureSurface, ToolAction, ToolHolder, ToolStyle};
use crate::widgetflags::WidgetFlags;
use geo::{Coord, Geometry};
use mapselect_geom::buffer::{self, BufferError};
use mapselect_geom::gesture::GestureEvent;
use mapselect_geom::query::QueryGeometry;
use tracing::error;

/// Title of the feature disambiguation prompt.
pub const PROMPT_TITLE_FEATURE_CHOICE: &str = "Du har valt flera objekt:";
/// Title of the buffer radius prompt.
pub const PROMPT_TITLE_RADIUS_INPUT: &str = "Ange buffert i meter (ex 10,4):";
/// Title of the profile settings prompt.
pub const PROMPT_TITLE_PROFILE_CHOICE: &str = "Välj aktiv konfiguration:";

/// Feature lookup hit tolerance around the pointer, in display pixels.
const HIT_TOLERANCE_PX: f64 = 0.5;

/// An immutable view into the engine state, borrowed field-wise so the tool holder can
/// be borrowed mutably alongside it.
#[derive(Debug)]
pub struct EngineView<'a> {
    pub config: &'a SelectConfig,
    pub mapview: &'a MapView,
    pub layers: &'a LayerTree,
    pub overlay: &'a OverlayLayer,
}

/// A mutable view into the engine state.
#[derive(Debug)]
pub struct EngineViewMut<'a> {
    pub config: &'a mut SelectConfig,
    pub mapview: &'a mut MapView,
    pub layers: &'a mut LayerTree,
    pub overlay: &'a mut OverlayLayer,
}

impl EngineViewMut<'_> {
    pub fn as_im(&self) -> EngineView<'_> {
        EngineView {
            config: self.config,
            mapview: self.mapview,
            layers: self.layers,
            overlay: self.overlay,
        }
    }
}

/// The external collaborators the engine drives during event handling.
pub struct Collaborators<'a> {
    pub remote: &'a dyn RemoteFeatureSource,
    pub prompts: &'a dyn PromptPresenter,
    pub selection: &'a mut dyn SelectionManager,
    pub surface: &'a dyn GestureSurface,
}

/// The multi selection engine.
#[derive(Debug, Default)]
pub struct SelectEngine {
    pub config: SelectConfig,
    pub mapview: MapView,
    pub layers: LayerTree,
    pub overlay: OverlayLayer,
    toolholder: ToolHolder,
}

impl SelectEngine {
    pub fn new(config: SelectConfig, mapview: MapView, layers: LayerTree) -> Self {
        Self {
            config,
            mapview,
            layers,
            overlay: OverlayLayer::default(),
            toolholder: ToolHolder::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.toolholder.is_enabled()
    }

    pub fn current_tool(&self) -> Option<ToolStyle> {
        self.toolholder.current_style()
    }

    /// Enable or disable selection. Disabling is a full reset: the sketch mode ends,
    /// the overlay and the selection are cleared.
    #[must_use]
    pub fn set_enabled(&mut self, enabled: bool, collab: &mut Collaborators) -> WidgetFlags {
        let view = EngineView {
            config: &self.config,
            mapview: &self.mapview,
            layers: &self.layers,
            overlay: &self.overlay,
        };
        let mut widget_flags =
            self.toolholder
                .set_enabled(enabled, self.config.default_tool, &view, collab.surface);

        if !enabled {
            widget_flags |= self.overlay.clear();
            collab.selection.clear();
            widget_flags.selection_modified = true;
            widget_flags.redraw = true;
        }
        widget_flags
    }

    /// Switch to another tool style.
    #[must_use]
    pub fn change_tool(&mut self, style: ToolStyle, collab: &mut Collaborators) -> WidgetFlags {
        let view = EngineView {
            config: &self.config,
            mapview: &self.mapview,
            layers: &self.layers,
            overlay: &self.overlay,
        };
        self.toolholder.change_style(style, &view, collab.surface)
    }

    /// Handle a gesture event with the current tool and run the resulting action.
    #[must_use]
    pub async fn handle_gesture_event(
        &mut self,
        event: GestureEvent,
        collab: &mut Collaborators<'_>,
    ) -> WidgetFlags {
        let (action, mut widget_flags) = self.toolholder.handle_event(
            event,
            &mut EngineViewMut {
                config: &mut self.config,
                mapview: &mut self.mapview,
                layers: &mut self.layers,
                overlay: &mut self.overlay,
            },
        );
        widget_flags |= self.handle_tool_action(action, collab).await;
        widget_flags
    }

    async fn handle_tool_action(
        &mut self,
        action: ToolAction,
        collab: &mut Collaborators<'_>,
    ) -> WidgetFlags {
        match action {
            ToolAction::None => WidgetFlags::default(),
            ToolAction::Query { geometry, remove } => {
                self.run_query(geometry, remove, collab).await
            }
            ToolAction::FeatureLookup { coordinate, remove } => {
                self.feature_lookup(coordinate, remove, collab).await
            }
            ToolAction::PickReference { coordinate } => {
                self.run_buffer_pick(coordinate, collab).await
            }
        }
    }

    /// Run a spatial query and apply the result to the selection.
    async fn run_query(
        &mut self,
        geometry: QueryGeometry,
        remove: bool,
        collab: &mut Collaborators<'_>,
    ) -> WidgetFlags {
        let extent = geometry.extent();
        let profile = self.config.active_profile().clone();
        let resolution = self.mapview.resolution();

        let items =
            extract::collect(&mut self.layers, &profile, resolution, extent, collab.remote).await;
        let items = filter::items_intersecting_geometry(items, &geometry, self.mapview.crs());

        apply_query_result(items, remove, collab.selection)
    }

    /// Run a feature lookup at a coordinate and apply the result to the selection.
    async fn feature_lookup(
        &mut self,
        coordinate: Coord<f64>,
        remove: bool,
        collab: &mut Collaborators<'_>,
    ) -> WidgetFlags {
        let items = self.lookup_items(coordinate, collab.remote).await;
        apply_query_result(items, remove, collab.selection)
    }

    /// All features under a coordinate. The remote feature info results come first,
    /// local hits are appended after, deduplicated by identity.
    async fn lookup_items(
        &self,
        coordinate: Coord<f64>,
        remote: &dyn RemoteFeatureSource,
    ) -> Vec<SelectedItem> {
        let mut items = match remote.fetch_at_coordinate(coordinate).await {
            Ok(Ok(items)) => items,
            Ok(Err(e)) => {
                error!("Remote feature lookup failed, Err: {e:?}");
                Vec::new()
            }
            Err(_) => {
                error!("Remote feature lookup failed, the request was abandoned.");
                Vec::new()
            }
        };

        let resolution = self.mapview.resolution();
        let tolerance = HIT_TOLERANCE_PX * resolution;
        let profile = self.config.active_profile();
        let local =
            extract::features_at_coordinate(&self.layers, profile, resolution, coordinate, tolerance);
        for item in local {
            if !items.iter().any(|held| held.identity() == item.identity()) {
                items.push(item);
            }
        }
        items
    }

    /// Run the buffer flow for a clicked reference coordinate: disambiguate the
    /// reference feature when needed, prompt for a radius, preview the zone and run the
    /// zone query.
    async fn run_buffer_pick(
        &mut self,
        coordinate: Coord<f64>,
        collab: &mut Collaborators<'_>,
    ) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();

        let mut candidates = self.lookup_items(coordinate, collab.remote).await;
        if candidates.is_empty() {
            return widget_flags;
        }

        let reference = if candidates.len() == 1 {
            candidates.remove(0)
        } else {
            if let Some(buffer) = self.toolholder.buffer_select_mut() {
                buffer.set_stage(BufferStage::AwaitChoice);
            }
            let entries = candidates
                .iter()
                .map(|item| {
                    let title_attribute = self
                        .layers
                        .layer_info(&item.layer_name)
                        .and_then(|layer| layer.title_attribute.as_deref());
                    ChoiceEntry {
                        title: item.feature.display_title(title_attribute).to_string(),
                        layer_title: item.layer_title.clone(),
                    }
                })
                .collect();
            let answer = collab
                .prompts
                .present_feature_choice(PROMPT_TITLE_FEATURE_CHOICE, entries)
                .await;
            widget_flags |= self.overlay.clear();
            match answer {
                Ok(index) if index < candidates.len() => candidates.remove(index),
                _ => {
                    if let Some(buffer) = self.toolholder.buffer_select_mut() {
                        buffer.set_stage(BufferStage::AwaitPick);
                    }
                    return widget_flags;
                }
            }
        };

        if let Some(buffer) = self.toolholder.buffer_select_mut() {
            buffer.set_stage(BufferStage::AwaitRadius);
        }

        loop {
            let answer = match collab
                .prompts
                .present_radius_input(PROMPT_TITLE_RADIUS_INPUT)
                .await
            {
                Ok(answer) => answer,
                Err(_) => break,
            };
            // Decimal commas are accepted.
            let Ok(radius_m) = answer.trim().replace(',', ".").parse::<f64>() else {
                continue;
            };

            match buffer::buffer(&reference.feature.geometry, radius_m, self.mapview.crs()) {
                Ok(zone) => {
                    let preview = Feature::new(
                        format!("buffer-{}", reference.feature.id),
                        Geometry::MultiPolygon(zone.clone()),
                    );
                    widget_flags |= self.overlay.set_preview(preview, OverlayStyle::Buffer);
                    if let Some(buffer) = self.toolholder.buffer_select_mut() {
                        buffer.set_stage(BufferStage::AwaitPick);
                    }
                    widget_flags |= self
                        .run_query(QueryGeometry::Area(zone), false, collab)
                        .await;
                    return widget_flags;
                }
                Err(BufferError::NonPositiveDistance) => continue,
                Err(e) => {
                    error!("Buffering the reference feature failed, Err: {e:?}");
                    break;
                }
            }
        }

        if let Some(buffer) = self.toolholder.buffer_select_mut() {
            buffer.set_stage(BufferStage::AwaitPick);
        }
        widget_flags
    }

    /// Preview a disambiguation candidate on the overlay, clearing the preview when
    /// `None` is passed.
    #[must_use]
    pub fn preview_choice(&mut self, feature: Option<&Feature>) -> WidgetFlags {
        match feature {
            Some(feature) => self.overlay.set_preview(feature.clone(), OverlayStyle::Choose),
            None => self.overlay.clear(),
        }
    }

    /// Show the profile settings prompt and activate the picked profile.
    #[must_use]
    pub async fn show_settings(&mut self, collab: &mut Collaborators<'_>) -> WidgetFlags {
        let mut widget_flags = WidgetFlags::default();

        let names = self
            .config
            .profiles
            .iter()
            .map(|profile| profile.name.clone())
            .collect::<Vec<_>>();
        if names.len() < 2 {
            return widget_flags;
        }
        let active = self.config.active_profile.min(names.len() - 1);

        match collab
            .prompts
            .present_profile_choice(PROMPT_TITLE_PROFILE_CHOICE, names, active)
            .await
        {
            Ok(index) => {
                self.config.set_active_profile(index);
                widget_flags.refresh_ui = true;
            }
            // Dismissing keeps the active profile.
            Err(_) => {}
        }
        widget_flags
    }
}
