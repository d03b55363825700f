use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sheetkit_foundation::{
    step, ContainerMetrics, Detent, DetentModel, DismissPolicy, EdgeInsets, EngineState,
    GestureContext, GestureEvent, PanPhase, PanSample, Size,
};

fn detents() -> Vec<Detent> {
    vec![
        Detent::Large,
        Detent::fixed("peek", 120.0),
        Detent::Hidden,
        Detent::custom(|context| context.content_size.height * 0.7),
        Detent::Medium,
    ]
}

fn sort_detents(c: &mut Criterion) {
    let metrics = ContainerMetrics::new(Size::new(390.0, 844.0), EdgeInsets::top(47.0));

    c.bench_function("sort_detents_cold_cache", |b| {
        b.iter(|| {
            let mut model = DetentModel::new(Vec::new(), None);
            black_box(model.sort_by_height(detents(), Some(&metrics)))
        });
    });

    let mut model = DetentModel::new(detents(), None);
    c.bench_function("sort_detents_warm_cache", |b| {
        b.iter(|| black_box(model.sort_by_height(detents(), Some(&metrics))));
    });
}

fn step_drag(c: &mut Criterion) {
    let metrics = ContainerMetrics::new(Size::new(390.0, 844.0), EdgeInsets::top(47.0));
    let mut model = DetentModel::new(detents(), None);
    let sorted = model.sort_by_height(model.to_vec(), Some(&metrics));
    model.set_resorted_detents(sorted, metrics.size);
    let context = GestureContext {
        layout: model.layout(Some(&metrics)),
        displayed_height: 422.0,
        policy: DismissPolicy::default(),
    };
    let state = EngineState::default();

    c.bench_function("step_drag_changed", |b| {
        let mut translation = 0.0_f32;
        b.iter(|| {
            translation = (translation + 3.0) % 300.0;
            let event = GestureEvent::SheetPan(PanSample::vertical(
                PanPhase::Changed,
                -translation,
                -120.0,
            ));
            black_box(step(&state, &event, &context))
        });
    });

    c.bench_function("step_drag_release", |b| {
        let event = GestureEvent::SheetPan(PanSample::vertical(PanPhase::Ended, 80.0, 640.0));
        b.iter(|| black_box(step(&state, &event, &context)));
    });
}

criterion_group!(benches, sort_detents, step_drag);
criterion_main!(benches);
