use map_event_state::replay::{self, ScenarioStep};
use map_event_state::{
    transition_event_state, CollectionSet, EventHandler, EventStateMode, Feature,
    FeatureCollection, FeatureEvent, FeatureRef, InteractionOptions, InteractionType,
    InteractiveRegistry, LongHoverTimer, PickedFeature, RecordingTarget, RenderingHandle,
};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn bound_collection(
    source_id: &str,
    features: Vec<Feature>,
) -> (FeatureCollection, Rc<RefCell<RecordingTarget>>) {
    let recorder = Rc::new(RefCell::new(RecordingTarget::new()));
    let mut collection = FeatureCollection::bound(
        RenderingHandle::new(source_id, [format!("{source_id}-layer")]),
        recorder.clone(),
    );
    collection.show(features);
    recorder.borrow_mut().clear_calls();
    (collection, recorder)
}

#[test]
fn test_concrete_scenario_from_geojson() {
    let features: Vec<Feature> = serde_json::from_value(json!([{ "id": "2" }, { "id": "5" }]))
        .expect("GeoJSON muss parsebar sein");
    let (mut collection, _recorder) = bound_collection("places", features);
    let two = FeatureRef::from("2");

    collection.put_event_state(&two, InteractionType::Hover, EventStateMode::Put, true);
    assert_eq!(
        serde_json::to_value(collection.features()).unwrap(),
        json!([
            { "id": "2", "properties": { "eventState": "hover" } },
            { "id": "5", "properties": {} }
        ])
    );

    collection.put_event_state(&two, InteractionType::Click, EventStateMode::Put, true);
    assert_eq!(
        serde_json::to_value(collection.features()).unwrap(),
        json!([
            { "id": "2", "properties": { "eventState": "click" } },
            { "id": "5", "properties": {} }
        ])
    );

    let before = collection.features().to_vec();
    let result =
        collection.put_event_state(&two, InteractionType::Hover, EventStateMode::Put, true);
    assert_eq!(result, None);
    assert_eq!(collection.features(), before.as_slice());
}

#[test]
fn test_priority_invariant_for_all_pairs() {
    for current in InteractionType::ALL {
        for incoming in InteractionType::ALL {
            let (mut collection, _recorder) =
                bound_collection("places", vec![Feature::with_id(1u64)]);
            let target = FeatureRef::Index(0);
            collection.put_event_state(&target, current, EventStateMode::Put, true);
            collection.put_event_state(&target, incoming, EventStateMode::Put, true);

            let expected = if current.is_high_priority() && !incoming.is_high_priority() {
                current
            } else {
                incoming
            };
            assert_eq!(
                collection.features()[0].event_state(),
                Some(expected),
                "{current} gefolgt von {incoming}"
            );
        }
    }
}

#[test]
fn test_put_keeps_at_most_one_holder_per_state() {
    let ids = ["a", "b", "c", "d"];
    let (mut collection, _recorder) =
        bound_collection("places", ids.iter().map(|id| Feature::with_id(*id)).collect());

    for id in ids.iter().chain(ids.iter().rev()) {
        collection.put_event_state(
            &FeatureRef::from(*id),
            InteractionType::Hover,
            EventStateMode::Put,
            true,
        );
        let holders = collection
            .features()
            .iter()
            .filter(|f| f.event_state() == Some(InteractionType::Hover))
            .count();
        assert_eq!(holders, 1, "nach put auf '{id}'");
    }
}

#[test]
fn test_repeated_put_is_idempotent_without_flush() {
    let (mut collection, recorder) = bound_collection("places", vec![Feature::with_id("x")]);
    let x = FeatureRef::from("x");

    collection.put_event_state(&x, InteractionType::Click, EventStateMode::Put, true);
    collection.put_event_state(&x, InteractionType::Click, EventStateMode::Put, true);
    collection.clean_event_state(&x, InteractionType::Click, true);
    collection.clean_event_state(&x, InteractionType::Click, true);

    assert_eq!(recorder.borrow().flush_count(), 2);
}

#[test]
fn test_registry_refresh_keeps_callback_invokable() {
    let mut registry = InteractiveRegistry::new();
    let handle1 = RenderingHandle::new("places", ["places-icons"]);
    let handle2 = RenderingHandle::new("places", ["places-icons-rebuilt"]);
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let cb: EventHandler = Rc::new(move |_: &FeatureEvent| counter.set(counter.get() + 1));

    registry.add_event_handler(&handle1, cb.clone(), InteractionType::Click);
    assert!(!registry.has(&handle2));

    assert_eq!(registry.update_if_registered(&[handle2.clone()]), 1);

    assert!(registry.has(&handle2));
    let handlers = registry.handlers("places", InteractionType::Click);
    assert_eq!(handlers.len(), 1);
    assert!(Rc::ptr_eq(&handlers[0], &cb));

    let dispatched = registry.dispatch(&FeatureEvent {
        interaction: InteractionType::Click,
        point: glam::Vec2::ZERO,
        target: PickedFeature::new(Feature::with_id("1"), "places", "places-icons-rebuilt"),
        index: Some(0),
    });
    assert_eq!(dispatched, 1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_transition_with_shared_target_orders_flushes() {
    let recorder = Rc::new(RefCell::new(RecordingTarget::new()));
    let mut collections = CollectionSet::new();
    for source in ["first", "second"] {
        let mut collection = FeatureCollection::bound(
            RenderingHandle::new(source, [format!("{source}-layer")]),
            recorder.clone(),
        );
        collection.show(vec![Feature::with_id("1"), Feature::with_id("2")]);
        collections.insert_owned(collection);
    }
    recorder.borrow_mut().clear_calls();

    let a = PickedFeature::new(Feature::with_id("1"), "first", "first-layer");
    let b = PickedFeature::new(Feature::with_id("2"), "first", "first-layer");
    let c = PickedFeature::new(Feature::with_id("1"), "second", "second-layer");

    let t1 = transition_event_state(
        &mut collections,
        InteractionType::Hover,
        EventStateMode::Put,
        Some(&a),
        None,
    );
    let t2 = transition_event_state(
        &mut collections,
        InteractionType::Hover,
        EventStateMode::Put,
        Some(&b),
        t1.active.as_ref(),
    );
    transition_event_state(
        &mut collections,
        InteractionType::Hover,
        EventStateMode::Put,
        Some(&c),
        t2.active.as_ref(),
    );

    assert_eq!(
        recorder.borrow().flushed_sources(),
        vec!["first", "first", "first", "second"]
    );
}

#[test]
fn test_replay_fixture_scenario() {
    let scenario = replay::parse_scenario(include_str!("fixtures/hover_click_scenario.json"))
        .expect("Szenario muss parsebar sein");
    assert_eq!(scenario.sources.len(), 3);
    assert!(matches!(scenario.steps[5], ScenarioStep::Control(_)));

    let report = replay::run(&scenario, InteractionOptions::default());
    let flushed: Vec<Vec<&str>> = report
        .steps
        .iter()
        .map(|step| step.flushed.iter().map(String::as_str).collect())
        .collect();

    assert_eq!(
        flushed,
        vec![
            vec!["places"],
            vec![],
            vec!["places"],
            // Klick auf "2" bleibt stehen, nur die Route wird gehovert
            vec!["routes"],
            vec!["routes"],
            vec!["places"],
            vec!["places"],
            vec![],
            vec!["places"],
        ]
    );
    assert_eq!(report.flush_count(), 7);

    assert!(report.steps[1].mouse_in_motion_over_hovered_feature);
    assert_eq!(report.steps[0].long_hover_timer, LongHoverTimer::Schedule);
    assert_eq!(report.steps[3].active.as_deref(), Some("routes:11"));
    assert_eq!(report.steps[4].active, None);
    assert_eq!(report.steps[6].active.as_deref(), Some("places:5"));
    assert_eq!(report.steps[7].long_hover_timer, LongHoverTimer::Cancel);
}
