//! Chart Component
//!
//! Glucose time-series chart on HTML5 Canvas: fixed 0-400 mg/dL value
//! domain, threshold-colored background zones, a monotone interpolated
//! line, and one zone-colored marker per reading. Only the time axis
//! rescales with the data; the value axis never auto-scales.

use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::global::{categorize, GlobalState, Reading, Zone, HIGH_THRESHOLD, LOW_THRESHOLD};

/// Fixed value-axis ceiling (mg/dL)
const VALUE_MAX: f64 = 400.0;

const DEFAULT_WIDTH: f64 = 800.0;
/// The chart never shrinks below this, however narrow the container gets
const MIN_WIDTH: f64 = 600.0;
const HEIGHT: f64 = 400.0;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

const LINE_COLOR: &str = "#FF9800";

/// Glucose time-series chart component
#[component]
pub fn Chart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();
    let (width, set_width) = create_signal(DEFAULT_WIDTH);

    // Follow the container width across window resizes
    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            set_width.set(container_width(&canvas));

            let canvas = canvas.clone();
            let on_resize = Closure::wrap(Box::new(move || {
                // the listener outlives the component; ignore writes after
                // the signal is disposed
                let _ = set_width.try_set(container_width(&canvas));
            }) as Box<dyn FnMut()>);

            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
            }
            on_resize.forget();
        }
    });

    // Redraw on every window update or resize
    create_effect(move |_| {
        let readings = state.readings.get();
        let width = width.get();

        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, readings.as_slice(), width);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full rounded-lg"
            />

            <ChartLegend />
        </div>
    }
}

/// Legend for the three glucose zones
#[component]
fn ChartLegend() -> impl IntoView {
    view! {
        <div class="flex justify-center flex-wrap gap-4 mt-4">
            {[Zone::Low, Zone::Good, Zone::High]
                .into_iter()
                .map(|zone| {
                    view! {
                        <div class="flex items-center space-x-2">
                            <div
                                class="w-3 h-3 rounded-full"
                                style=format!("background-color: {}", zone.color())
                            />
                            <span class="text-sm text-gray-300">{zone.label()}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

fn container_width(canvas: &HtmlCanvasElement) -> f64 {
    canvas
        .parent_element()
        .map(|el| (el.client_width() as f64 - 40.0).max(MIN_WIDTH))
        .unwrap_or(DEFAULT_WIDTH)
}

/// Draw the full chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, readings: &[Reading], width: f64) {
    canvas.set_width(width as u32);
    canvas.set_height(HEIGHT as u32);

    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    // Value axis is fixed: y position depends only on the glucose value
    let y_of = |value: f64| MARGIN_TOP + (1.0 - value / VALUE_MAX) * chart_height;

    // Clear canvas
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, HEIGHT);

    draw_zones(&ctx, chart_width, y_of);
    draw_grid(&ctx, chart_width, y_of);

    if readings.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No readings yet", width / 2.0 - 60.0, HEIGHT / 2.0);
        return;
    }

    // Time axis follows the data extent
    let min_ts = readings.iter().map(|r| r.timestamp).min().unwrap_or(0);
    let max_ts = readings.iter().map(|r| r.timestamp).max().unwrap_or(0);
    let span = ((max_ts - min_ts) as f64).max(1.0);

    let x_of =
        |ts: i64| MARGIN_LEFT + ((ts - min_ts) as f64 / span) * chart_width;

    let points: Vec<(f64, f64)> = readings
        .iter()
        .map(|r| (x_of(r.timestamp), y_of(r.value as f64)))
        .collect();

    // Line through all points
    if points.len() > 1 {
        let tangents = monotone_tangents(&points);

        ctx.set_stroke_style(&LINE_COLOR.into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(points[0].0, points[0].1);
        for i in 0..points.len() - 1 {
            let (x0, y0) = points[i];
            let (x1, y1) = points[i + 1];
            let dx = (x1 - x0) / 3.0;
            ctx.bezier_curve_to(
                x0 + dx,
                y0 + tangents[i] * dx,
                x1 - dx,
                y1 - tangents[i + 1] * dx,
                x1,
                y1,
            );
        }
        ctx.stroke();
    }

    // One marker per reading, colored by its own zone
    for (reading, &(x, y)) in readings.iter().zip(points.iter()) {
        ctx.set_fill_style(&categorize(reading.value).color().into());
        ctx.begin_path();
        let _ = ctx.arc(x, y, 4.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }

    // Time tick labels
    ctx.set_fill_style(&"#9ca3af".into());
    ctx.set_font("12px sans-serif");

    let num_labels = 5;
    for i in 0..=num_labels {
        let ts = min_ts + i * (max_ts - min_ts) / num_labels;
        let x = MARGIN_LEFT + (i as f64 / num_labels as f64) * chart_width;

        let label = chrono::DateTime::from_timestamp_millis(ts)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default();

        let _ = ctx.fill_text(&label, x - 15.0, HEIGHT - 10.0);
    }
}

/// Fixed background bands: low below 80, good 80-130, high above 130
fn draw_zones(ctx: &CanvasRenderingContext2d, chart_width: f64, y_of: impl Fn(f64) -> f64) {
    let low = LOW_THRESHOLD as f64;
    let high = HIGH_THRESHOLD as f64;

    ctx.set_fill_style(&"rgba(243, 156, 18, 0.12)".into());
    ctx.fill_rect(MARGIN_LEFT, y_of(low), chart_width, y_of(0.0) - y_of(low));

    ctx.set_fill_style(&"rgba(39, 174, 96, 0.12)".into());
    ctx.fill_rect(MARGIN_LEFT, y_of(high), chart_width, y_of(low) - y_of(high));

    ctx.set_fill_style(&"rgba(231, 76, 60, 0.12)".into());
    ctx.fill_rect(MARGIN_LEFT, y_of(VALUE_MAX), chart_width, y_of(high) - y_of(VALUE_MAX));

    // Zone labels along the right edge
    ctx.set_font("11px sans-serif");
    ctx.set_text_align("end");
    let label_x = MARGIN_LEFT + chart_width - 8.0;

    ctx.set_fill_style(&Zone::Low.color().into());
    let _ = ctx.fill_text("TOO LOW", label_x, y_of(40.0));
    ctx.set_fill_style(&Zone::Good.color().into());
    let _ = ctx.fill_text("GOOD", label_x, y_of(105.0));
    ctx.set_fill_style(&Zone::High.color().into());
    let _ = ctx.fill_text("TOO HIGH", label_x, y_of(200.0));

    ctx.set_text_align("start");
}

/// Horizontal grid lines every 50 mg/dL with value labels
fn draw_grid(ctx: &CanvasRenderingContext2d, chart_width: f64, y_of: impl Fn(f64) -> f64) {
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    let mut value = 0.0;
    while value <= VALUE_MAX {
        let y = y_of(value);

        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(MARGIN_LEFT + chart_width, y);
        ctx.stroke();

        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&format!("{}", value as i32), 12.0, y + 4.0);

        value += 50.0;
    }
}

/// Tangents for a monotone cubic through the points (Fritsch-Carlson
/// weighted harmonic mean). Flat and locally extremal points get a zero
/// tangent, so the curve never overshoots the data.
fn monotone_tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let h: Vec<f64> = points.windows(2).map(|w| w[1].0 - w[0].0).collect();
    let d: Vec<f64> = points
        .windows(2)
        .map(|w| (w[1].1 - w[0].1) / (w[1].0 - w[0].0).max(f64::EPSILON))
        .collect();

    let mut m = vec![0.0; n];
    m[0] = d[0];
    m[n - 1] = d[n - 2];
    for i in 1..n - 1 {
        if d[i - 1] * d[i] <= 0.0 {
            m[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            m[i] = (w1 + w2) / (w1 / d[i - 1] + w2 / d[i]);
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_segments_get_zero_tangents() {
        let points = [(0.0, 100.0), (10.0, 100.0), (20.0, 100.0), (30.0, 100.0)];
        let m = monotone_tangents(&points);
        assert!(m.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_monotone_data_keeps_tangent_sign() {
        let points = [(0.0, 10.0), (10.0, 30.0), (25.0, 35.0), (30.0, 80.0)];
        let m = monotone_tangents(&points);
        assert!(m.iter().all(|&t| t >= 0.0));
    }

    #[test]
    fn test_local_extremum_gets_zero_tangent() {
        let points = [(0.0, 10.0), (10.0, 50.0), (20.0, 10.0)];
        let m = monotone_tangents(&points);
        assert_eq!(m[1], 0.0);
    }

    #[test]
    fn test_single_point() {
        assert_eq!(monotone_tangents(&[(5.0, 5.0)]), vec![0.0]);
    }
}
