// Trajscope Edit Dispatcher
//
// Reacts to hover and edit events from the interaction layer, updates the
// editor state and enqueues the matching backend query.
//
// Mode transitions:
//
// ```text
//            hover (View/Modify only)
//   View ───────────────────────────▶ Modify
//    ▲ ▲                                │
//    │ └── addFeature ◀── DrawPoint ◀───┤ draw buttons
//    └──── addFeature ◀── DrawLine  ◀───┘
// ```

use log::{debug, info, warn};
use trajscope_utils::{
    ColorPicker, EditEvent, EditType, Feature, GeometryKind, HoverEvent, InteractionMode,
};

use super::state::{EditorState, LayerProps};
use crate::integrations::{IntegrationError, QueryKind, QueryRequest, QuerySender};

/// What an edit event caused
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EditOutcome {
    /// Query handed to the worker, if any
    pub query: Option<QueryRequest>,
    /// Id given to a newly drawn feature
    pub assigned_id: Option<u64>,
}

pub struct EditDispatcher {
    state: EditorState,
    queries: QuerySender,
}

impl EditDispatcher {
    pub fn new(queries: QuerySender) -> Self {
        Self::with_state(EditorState::new(), queries)
    }

    /// Use a fixed color sequence (reproducible output)
    pub fn with_colors(colors: ColorPicker, queries: QuerySender) -> Self {
        Self::with_state(EditorState::with_colors(colors), queries)
    }

    pub fn with_state(state: EditorState, queries: QuerySender) -> Self {
        Self { state, queries }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn mode(&self) -> InteractionMode {
        self.state.mode
    }

    /// Props for the editable geometry layer
    pub fn layer_props(&self) -> LayerProps<'_> {
        LayerProps::of(&self.state)
    }

    /// Explicit mode change (draw buttons)
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.state.mode != mode {
            debug!("trajscope: mode {} -> {}", self.state.mode, mode);
        }
        self.state.mode = mode;
    }

    /// Hovering an existing feature makes it the selection and switches to
    /// Modify. Edit handles (points carrying `featureIndex`) are ignored, and
    /// so is everything while drawing.
    ///
    /// # Returns
    ///
    /// `true` if the selection changed hands to the hovered feature.
    pub fn on_hover(&mut self, event: Option<&HoverEvent>) -> bool {
        if self.state.mode.is_drawing() {
            return false;
        }

        let Some(event) = event else {
            return false;
        };
        let Some(object) = event.object.as_ref() else {
            return false;
        };
        if object.geometry.is_point() && object.properties.feature_index.is_some() {
            return false;
        }
        let Some(index) = event.feature_index() else {
            return false;
        };

        self.state.selected = vec![index];
        self.state.mode = InteractionMode::Modify;
        true
    }

    /// Apply a completed edit. The updated collection always replaces the
    /// local copy; what else happens depends on the edit type.
    pub fn on_edit(&mut self, event: EditEvent) -> EditOutcome {
        debug!("trajscope: edit {}", event.edit_type);
        self.state.features = event.updated_data;

        match event.edit_type {
            EditType::AddFeature => self.finish_draw(),
            EditType::FinishMovePosition => self.finish_move(),
            EditType::Other(_) => EditOutcome::default(),
        }
    }

    fn finish_draw(&mut self) -> EditOutcome {
        let drawn_in = self.state.mode;
        self.state.mode = InteractionMode::View;

        if self.state.features.is_empty() {
            warn!("trajscope: addFeature with an empty collection, nothing to tag");
            return EditOutcome::default();
        }

        let color = self.state.colors.next_color();
        let id = self.state.take_id();
        let feature = match self.state.features.last_mut() {
            Some(feature) => feature,
            None => return EditOutcome::default(),
        };
        feature.properties.color = Some(color);
        feature.properties.id = Some(id);
        info!(
            "trajscope: feature {} drawn ({})",
            id,
            feature.geometry.kind()
        );

        let kind = match drawn_in {
            InteractionMode::DrawPoint => Some(QueryKind::Point),
            InteractionMode::DrawLine => Some(QueryKind::Trajectory),
            _ => None,
        };
        let feature = feature.clone();
        let query = kind.and_then(|kind| self.enqueue(kind, &feature));

        EditOutcome {
            query,
            assigned_id: Some(id),
        }
    }

    fn finish_move(&mut self) -> EditOutcome {
        let Some(&index) = self.state.selected.first() else {
            return EditOutcome::default();
        };
        let Some(feature) = self.state.features.get(index).cloned() else {
            warn!(
                "trajscope: selected index {} is outside the collection ({} features)",
                index,
                self.state.features.len()
            );
            return EditOutcome::default();
        };

        let kind = match feature.geometry.kind() {
            GeometryKind::Point => QueryKind::Point,
            GeometryKind::LineString => QueryKind::Trajectory,
            other => {
                debug!("trajscope: moved {} is not queried", other);
                return EditOutcome::default();
            }
        };

        EditOutcome {
            query: self.enqueue(kind, &feature),
            assigned_id: None,
        }
    }

    /// Hand a query for `feature` to the worker without waiting on it
    fn enqueue(&self, kind: QueryKind, feature: &Feature) -> Option<QueryRequest> {
        let Some(request) = QueryRequest::for_feature(kind, feature) else {
            warn!(
                "trajscope: {} query skipped, feature has no position or id",
                kind
            );
            return None;
        };

        if let Err(e) = self.queries.send(request).map_err(IntegrationError::from) {
            warn!("trajscope: {} dropped: {}", request, e);
            return None;
        }
        debug!("trajscope: {} queued", request);
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::{query_channel, QueryParams};
    use tokio::sync::mpsc::UnboundedReceiver;
    use trajscope_utils::{FeatureCollection, Geometry};

    fn dispatcher() -> (EditDispatcher, UnboundedReceiver<QueryRequest>) {
        let (tx, rx) = query_channel();
        (
            EditDispatcher::with_colors(ColorPicker::with_seed_hue(0.1), tx),
            rx,
        )
    }

    fn drain(rx: &mut UnboundedReceiver<QueryRequest>) -> Vec<QueryRequest> {
        let mut out = Vec::new();
        while let Ok(request) = rx.try_recv() {
            out.push(request);
        }
        out
    }

    /// Collection as the interaction layer reports it after drawing `new`
    fn with_added(dispatcher: &EditDispatcher, new: Feature) -> EditEvent {
        let mut features = dispatcher.state().features().features.clone();
        features.push(new);
        EditEvent::new(FeatureCollection::with_features(features), EditType::AddFeature)
    }

    fn draw(dispatcher: &mut EditDispatcher, mode: InteractionMode, feature: Feature) -> EditOutcome {
        dispatcher.set_mode(mode);
        let event = with_added(dispatcher, feature);
        dispatcher.on_edit(event)
    }

    #[test]
    fn test_ids_increase_from_zero() {
        let (mut dispatcher, _rx) = dispatcher();

        let ids: Vec<_> = (0..4)
            .map(|i| {
                draw(
                    &mut dispatcher,
                    InteractionMode::DrawPoint,
                    Feature::point(i as f64, 0.0),
                )
                .assigned_id
            })
            .collect();

        assert_eq!(ids, vec![Some(0), Some(1), Some(2), Some(3)]);
        let stored: Vec<_> = dispatcher
            .state()
            .features()
            .features
            .iter()
            .map(|f| f.properties.id)
            .collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_ids_ignore_preexisting_features() {
        let (mut dispatcher, _rx) = dispatcher();
        let existing = vec![Feature::point(0.0, 0.0), Feature::point(1.0, 1.0)];
        let mut features = existing;
        features.push(Feature::point(2.0, 2.0));

        dispatcher.set_mode(InteractionMode::DrawPoint);
        let outcome = dispatcher.on_edit(EditEvent::new(
            FeatureCollection::with_features(features),
            EditType::AddFeature,
        ));

        assert_eq!(outcome.assigned_id, Some(0));
    }

    #[test]
    fn test_draw_point_issues_one_point_query() {
        let (mut dispatcher, mut rx) = dispatcher();

        let outcome = draw(
            &mut dispatcher,
            InteractionMode::DrawPoint,
            Feature::point(139.5, 35.5),
        );

        let queries = drain(&mut rx);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].kind, QueryKind::Point);
        assert_eq!(outcome.query, Some(queries[0]));
    }

    #[test]
    fn test_draw_line_issues_one_trajectory_query() {
        let (mut dispatcher, mut rx) = dispatcher();

        draw(
            &mut dispatcher,
            InteractionMode::DrawLine,
            Feature::line_string(vec![[139.7, 35.6], [139.8, 35.7], [139.9, 35.8]]),
        );

        let queries = drain(&mut rx);
        assert_eq!(
            queries,
            vec![QueryRequest::trajectory(QueryParams::new([139.7, 35.6], 0))]
        );
    }

    #[test]
    fn test_add_feature_resets_to_view() {
        for mode in [
            InteractionMode::DrawPoint,
            InteractionMode::DrawLine,
            InteractionMode::Modify,
            InteractionMode::View,
        ] {
            let (mut dispatcher, _rx) = dispatcher();
            draw(&mut dispatcher, mode, Feature::point(0.0, 0.0));
            assert_eq!(dispatcher.mode(), InteractionMode::View);
        }
    }

    #[test]
    fn test_add_outside_draw_mode_tags_without_query() {
        let (mut dispatcher, mut rx) = dispatcher();

        let outcome = draw(&mut dispatcher, InteractionMode::View, Feature::point(0.0, 0.0));

        assert_eq!(outcome.assigned_id, Some(0));
        assert_eq!(outcome.query, None);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_third_point_scenario() {
        let (mut dispatcher, mut rx) = dispatcher();
        draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(139.0, 35.0));
        draw(&mut dispatcher, InteractionMode::DrawLine, Feature::line_string(vec![[139.1, 35.1]]));
        drain(&mut rx);

        let outcome = draw(
            &mut dispatcher,
            InteractionMode::DrawPoint,
            Feature::point(139.5, 35.5),
        );

        assert_eq!(outcome.assigned_id, Some(2));
        let feature = &dispatcher.state().features().features[2];
        assert_eq!(feature.properties.id, Some(2));
        assert!(feature.properties.color.is_some());

        let queries = drain(&mut rx);
        assert_eq!(queries, vec![QueryRequest::point(QueryParams::new([139.5, 35.5], 2))]);
        assert_eq!(
            crate::integrations::build_url(
                "http://127.0.0.1:9999/querypoint",
                queries[0].params.to_pairs()
            )
            .unwrap()
            .query(),
            Some("lon=139.5&lat=35.5&id=2")
        );
    }

    #[test]
    fn test_add_keeps_existing_properties() {
        let (mut dispatcher, _rx) = dispatcher();
        let mut feature = Feature::point(0.0, 0.0);
        feature
            .properties
            .extra
            .insert("label".to_string(), serde_json::json!("depot"));

        draw(&mut dispatcher, InteractionMode::DrawPoint, feature);

        let stored = &dispatcher.state().features().features[0];
        assert_eq!(stored.properties.extra["label"], serde_json::json!("depot"));
        assert_eq!(stored.properties.id, Some(0));
    }

    #[test]
    fn test_add_with_empty_collection() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.set_mode(InteractionMode::DrawPoint);

        let outcome = dispatcher.on_edit(EditEvent::new(FeatureCollection::new(), EditType::AddFeature));

        assert_eq!(outcome, EditOutcome::default());
        assert_eq!(dispatcher.mode(), InteractionMode::View);
        assert_eq!(dispatcher.state().next_id(), 0);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_empty_line_is_not_queried() {
        let (mut dispatcher, mut rx) = dispatcher();

        let outcome = draw(&mut dispatcher, InteractionMode::DrawLine, Feature::line_string(vec![]));

        assert_eq!(outcome.assigned_id, Some(0));
        assert_eq!(outcome.query, None);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_move_without_selection() {
        let (mut dispatcher, mut rx) = dispatcher();
        draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(0.0, 0.0));
        drain(&mut rx);
        dispatcher.set_mode(InteractionMode::Modify);

        let data = dispatcher.state().features().clone();
        let outcome = dispatcher.on_edit(EditEvent::new(data, EditType::FinishMovePosition));

        assert_eq!(outcome, EditOutcome::default());
        assert_eq!(dispatcher.mode(), InteractionMode::Modify);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_move_selected_line_queries_new_position() {
        let (mut dispatcher, mut rx) = dispatcher();
        draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(0.0, 0.0));
        draw(
            &mut dispatcher,
            InteractionMode::DrawLine,
            Feature::line_string(vec![[139.0, 35.0], [139.1, 35.1]]),
        );
        drain(&mut rx);

        let line = dispatcher.state().features().features[1].clone();
        assert!(dispatcher.on_hover(Some(&HoverEvent::new(1, line))));
        assert_eq!(dispatcher.mode(), InteractionMode::Modify);

        let mut moved = dispatcher.state().features().clone();
        moved.features[1].geometry = Geometry::LineString {
            coordinates: vec![[140.0, 36.0], [140.1, 36.1]],
        };
        dispatcher.on_edit(EditEvent::new(moved, EditType::FinishMovePosition));

        assert_eq!(
            drain(&mut rx),
            vec![QueryRequest::trajectory(QueryParams::new([140.0, 36.0], 1))]
        );
        assert_eq!(dispatcher.mode(), InteractionMode::Modify);
    }

    #[test]
    fn test_move_selected_point() {
        let (mut dispatcher, mut rx) = dispatcher();
        draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(139.5, 35.5));
        drain(&mut rx);

        let point = dispatcher.state().features().features[0].clone();
        dispatcher.on_hover(Some(&HoverEvent::new(0, point)));

        let mut moved = dispatcher.state().features().clone();
        moved.features[0].geometry = Geometry::Point {
            coordinates: [139.6, 35.4],
        };
        let outcome = dispatcher.on_edit(EditEvent::new(moved, EditType::FinishMovePosition));

        let expected = QueryRequest::point(QueryParams::new([139.6, 35.4], 0));
        assert_eq!(outcome.query, Some(expected));
        assert_eq!(drain(&mut rx), vec![expected]);
    }

    #[test]
    fn test_move_with_stale_selection() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.on_hover(Some(&HoverEvent::new(5, Feature::point(0.0, 0.0))));

        let outcome = dispatcher.on_edit(EditEvent::new(
            FeatureCollection::new(),
            EditType::FinishMovePosition,
        ));

        assert_eq!(outcome, EditOutcome::default());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_other_edit_only_replaces_collection() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.set_mode(InteractionMode::DrawLine);

        let data = FeatureCollection::with_features(vec![Feature::point(1.0, 1.0)]);
        let outcome = dispatcher.on_edit(EditEvent::new(
            data.clone(),
            EditType::Other("addTentativePosition".to_string()),
        ));

        assert_eq!(outcome, EditOutcome::default());
        assert_eq!(dispatcher.state().features(), &data);
        assert_eq!(dispatcher.mode(), InteractionMode::DrawLine);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_hover_selects_in_view_and_modify() {
        let (mut dispatcher, _rx) = dispatcher();
        let line = Feature::line_string(vec![[0.0, 0.0], [1.0, 1.0]]);

        assert!(dispatcher.on_hover(Some(&HoverEvent::new(0, line.clone()))));
        assert_eq!(dispatcher.state().selected_indexes(), &[0]);
        assert_eq!(dispatcher.mode(), InteractionMode::Modify);

        assert!(dispatcher.on_hover(Some(&HoverEvent::new(2, line))));
        assert_eq!(dispatcher.state().selected_indexes(), &[2]);
    }

    #[test]
    fn test_hover_ignored_while_drawing() {
        for mode in [InteractionMode::DrawPoint, InteractionMode::DrawLine] {
            let (mut dispatcher, _rx) = dispatcher();
            dispatcher.set_mode(mode);

            let hovered = dispatcher.on_hover(Some(&HoverEvent::new(0, Feature::point(0.0, 0.0))));

            assert!(!hovered);
            assert_eq!(dispatcher.mode(), mode);
            assert!(dispatcher.state().selected_indexes().is_empty());
        }
    }

    #[test]
    fn test_hover_ignores_edit_handles() {
        let (mut dispatcher, _rx) = dispatcher();
        let mut handle = Feature::point(0.0, 0.0);
        handle.properties.feature_index = Some(0);

        assert!(!dispatcher.on_hover(Some(&HoverEvent::new(0, handle))));
        assert_eq!(dispatcher.mode(), InteractionMode::View);
    }

    #[test]
    fn test_hover_on_empty_map() {
        let (mut dispatcher, _rx) = dispatcher();

        assert!(!dispatcher.on_hover(None));
        assert!(!dispatcher.on_hover(Some(&HoverEvent {
            index: -1,
            object: None,
        })));
        assert_eq!(dispatcher.mode(), InteractionMode::View);
    }

    #[test]
    fn test_closed_queue_keeps_state() {
        let (tx, rx) = query_channel();
        drop(rx);
        let mut dispatcher = EditDispatcher::new(tx);

        let outcome = draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(0.0, 0.0));

        assert_eq!(outcome.query, None);
        assert_eq!(outcome.assigned_id, Some(0));
        assert_eq!(dispatcher.state().features().len(), 1);
        assert_eq!(dispatcher.mode(), InteractionMode::View);
    }

    #[test]
    fn test_colors_are_valid_and_distinct() {
        let (mut dispatcher, _rx) = dispatcher();
        draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(0.0, 0.0));
        draw(&mut dispatcher, InteractionMode::DrawPoint, Feature::point(1.0, 1.0));

        let colors: Vec<_> = dispatcher
            .state()
            .features()
            .features
            .iter()
            .map(|f| f.properties.color.unwrap())
            .collect();
        assert_ne!(colors[0], colors[1]);
    }
}
