use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use map_event_state::{
    replay, transition_event_state, CollectionSet, EventStateMode, Feature, FeatureCollection,
    FeatureRef, InteractionController, InteractionOptions, InteractionSample, InteractionType,
    PickedFeature, RecordingTarget, RenderingHandle,
};
use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

fn build_synthetic_features(feature_count: usize) -> Vec<Feature> {
    (0..feature_count)
        .map(|index| {
            Feature::with_id(index as u64)
                .with_property("name", format!("Feature {index}"))
                .with_property("rank", (index % 7) as u64)
        })
        .collect()
}

fn build_collection(feature_count: usize) -> FeatureCollection {
    let recorder = Rc::new(RefCell::new(RecordingTarget::new()));
    let mut collection =
        FeatureCollection::bound(RenderingHandle::new("places", ["places-icons"]), recorder);
    collection.show(build_synthetic_features(feature_count));
    collection
}

fn build_pointer_path(count: usize, feature_count: usize) -> Vec<InteractionSample> {
    (0..count)
        .map(|i| {
            // Jeweils vier Samples über demselben Feature, dann Wechsel
            let id = ((i / 4) * 31 % feature_count) as u64;
            InteractionSample::PointerMove {
                point: Vec2::new((i % 1000) as f32 + 0.37, ((i * 7) % 1000) as f32 + 0.63),
                picked: Some(PickedFeature::new(
                    Feature::with_id(id),
                    "places",
                    "places-icons",
                )),
            }
        })
        .collect()
}

fn bench_put_event_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_event_state");

    for &feature_count in &[1_000usize, 10_000usize] {
        let mut collection = build_collection(feature_count);
        let targets: Vec<FeatureRef> = (0..256)
            .map(|i| FeatureRef::Id(((i * 37) % feature_count as u64).into()))
            .collect();

        group.bench_function(BenchmarkId::new("put_by_id", feature_count), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for target in &targets {
                    if collection
                        .put_event_state(
                            black_box(target),
                            InteractionType::Hover,
                            EventStateMode::Put,
                            false,
                        )
                        .is_some()
                    {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });

        group.bench_function(BenchmarkId::new("put_and_flush", feature_count), |b| {
            let mut toggle = 0usize;
            b.iter(|| {
                toggle = (toggle + 1) % feature_count;
                collection.put_event_state(
                    black_box(&FeatureRef::Index(toggle)),
                    InteractionType::Click,
                    EventStateMode::Put,
                    true,
                )
            })
        });
    }

    group.finish();
}

fn bench_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition_event_state");

    for &feature_count in &[1_000usize, 10_000usize] {
        let mut collections = CollectionSet::new();
        collections.insert_owned(build_collection(feature_count));
        let picks: Vec<PickedFeature> = (0..256)
            .map(|i| {
                PickedFeature::new(
                    Feature::with_id(((i * 37) % feature_count) as u64),
                    "places",
                    "places-icons",
                )
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("hover_chain", feature_count),
            &picks,
            |b, picks| {
                b.iter(|| {
                    let mut prev: Option<PickedFeature> = None;
                    for pick in picks {
                        let transition = transition_event_state(
                            &mut collections,
                            InteractionType::Hover,
                            EventStateMode::Put,
                            Some(black_box(pick)),
                            prev.as_ref(),
                        );
                        prev = transition.active;
                    }
                    black_box(prev.is_some())
                })
            },
        );
    }

    group.finish();
}

fn bench_controller_samples(c: &mut Criterion) {
    let feature_count = 10_000;
    let samples = build_pointer_path(1024, feature_count);

    c.bench_function("controller_pointer_path_10k", |b| {
        let mut controller = InteractionController::new(InteractionOptions::default());
        controller.add_collection(build_collection(feature_count));
        b.iter(|| {
            let mut dispatched = 0usize;
            for sample in &samples {
                dispatched += controller.handle_sample(black_box(sample.clone())).dispatched;
            }
            controller.handle_sample(InteractionSample::PointerLeave);
            black_box(dispatched)
        })
    });
}

fn bench_scenario_parsing(c: &mut Criterion) {
    let json = include_str!("../tests/fixtures/hover_click_scenario.json");

    c.bench_function("scenario_parse_fixture", |b| {
        b.iter(|| {
            let scenario = replay::parse_scenario(black_box(json)).expect("Szenario parse failed");
            black_box(scenario.steps.len())
        })
    });
}

criterion_group!(
    core_benches,
    bench_put_event_state,
    bench_transitions,
    bench_controller_samples,
    bench_scenario_parsing
);
criterion_main!(core_benches);
