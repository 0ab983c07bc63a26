use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use silence::overlay_view::{self, BadgePainter};
use silence_rendering::{BackgroundStyle, BadgeContent, BadgeRenderer, BadgeStyle, IconStyle};

/// Full overlay frame at common DPI scales.
fn bench_render_badge(c: &mut Criterion) {
    let renderer = BadgeRenderer::new();
    let mut group = c.benchmark_group("Badge Render");

    for (label, show_text) in [("icon", false), ("text", true)] {
        let style = BadgeStyle {
            show_text,
            ..BadgeStyle::default()
        };
        for scale in [1.0f32, 1.5, 2.0] {
            group.bench_with_input(
                BenchmarkId::new(label, scale),
                &scale,
                |b, &scale| {
                    b.iter(|| {
                        let bitmap = renderer
                            .paint(&style, &BadgeContent::steady(black_box(true)), scale)
                            .expect("render");
                        black_box(bitmap)
                    });
                },
            );
        }
    }

    group.finish();
}

/// Mid-crossfade frame with a light background and monochrome glyph.
fn bench_crossfade_frame(c: &mut Criterion) {
    let renderer = BadgeRenderer::new();
    let style = BadgeStyle {
        background: BackgroundStyle::Light,
        icon: IconStyle::Monochrome,
        show_text: true,
        ..BadgeStyle::default()
    };
    let content = BadgeContent {
        muted: false,
        content_alpha: 0.4,
        highlight: true,
    };

    c.bench_function("Crossfade Frame", |b| {
        b.iter(|| black_box(renderer.paint(&style, black_box(&content), 1.25)))
    });
}

fn bench_measure(c: &mut Criterion) {
    let renderer = BadgeRenderer::new();
    let style = BadgeStyle {
        show_text: true,
        ..BadgeStyle::default()
    };
    c.bench_function("Badge Measure", |b| {
        b.iter(|| black_box(renderer.measure(&style, black_box(true), 1.0)))
    });
}

fn bench_tray_icon(c: &mut Criterion) {
    let renderer = BadgeRenderer::new();
    c.bench_function("Tray Icon", |b| {
        b.iter(|| black_box(overlay_view::tray_icon(&renderer, black_box(false))))
    });
}

criterion_group!(
    benches,
    bench_render_badge,
    bench_crossfade_frame,
    bench_measure,
    bench_tray_icon
);
criterion_main!(benches);
