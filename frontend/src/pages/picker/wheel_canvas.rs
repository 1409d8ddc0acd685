use std::f64::consts::{FRAC_PI_2, PI, TAU};

use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

// Cycled across segments; adjacent segments only share a color when the
// list wraps around the palette.
const SEGMENT_COLORS: [&str; 8] = [
    "#f97316", // Orange
    "#06b6d4", // Cyan
    "#8b5cf6", // Violet
    "#ec4899", // Pink
    "#22c55e", // Green
    "#eab308", // Gold
    "#3b82f6", // Blue
    "#ef4444", // Red
];

const MAX_LABEL_CHARS: usize = 14;

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub labels: Vec<String>,
    /// Cumulative rotation in radians.
    pub rotation: f64,
    pub is_spinning: bool,
}

fn display_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let truncated: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}\u{2026}", truncated)
    }
}

fn label_font(segment_count: usize) -> &'static str {
    if segment_count <= 8 {
        "bold 20px 'Segoe UI', Roboto, system-ui, sans-serif"
    } else if segment_count <= 20 {
        "bold 15px 'Segoe UI', Roboto, system-ui, sans-serif"
    } else {
        "bold 11px 'Segoe UI', Roboto, system-ui, sans-serif"
    }
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        let labels = props.labels.clone();
        let rotation = props.rotation;
        let is_spinning = props.is_spinning;

        use_effect_with(
            (labels, rotation, is_spinning),
            move |(labels, rotation, is_spinning)| {
                if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                    let context = canvas
                        .get_context("2d")
                        .unwrap()
                        .unwrap()
                        .dyn_into::<CanvasRenderingContext2d>()
                        .unwrap();

                    draw_wheel(&context, &canvas, labels, *rotation, *is_spinning);
                }
                || ()
            },
        );
    }

    html! {
        <div class="relative">
            <canvas
                ref={canvas_ref}
                width="450"
                height="450"
                class="w-full max-w-[450px] h-auto rounded-full shadow-lg transition-all duration-300"
                style={if props.is_spinning {
                    "filter: drop-shadow(0px 5px 20px rgba(130, 100, 255, 0.4));"
                } else {
                    "filter: drop-shadow(0px 5px 15px rgba(0, 0, 0, 0.2));"
                }}
            />
        </div>
    }
}

fn draw_wheel(
    context: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    labels: &[String],
    rotation: f64,
    is_spinning: bool,
) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let radius = if width < height { width / 2.0 - 20.0 } else { height / 2.0 - 20.0 };

    context.clear_rect(0.0, 0.0, width, height);

    let is_dark_mode = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|el| el.class_list().contains("dark"))
        .unwrap_or(false);

    // Outer glow
    let glow_intensity = if is_spinning { 0.25 } else { 0.15 };
    context.begin_path();
    if is_dark_mode {
        context.set_fill_style_str(&format!("rgba(130, 100, 255, {})", glow_intensity));
    } else {
        context.set_fill_style_str(&format!("rgba(100, 130, 255, {})", glow_intensity));
    }
    let _ = context.arc(center_x, center_y, radius + 15.0, 0.0, TAU);
    context.fill();

    // Wheel background
    context.begin_path();
    if is_dark_mode {
        context.set_fill_style_str("#1a1c2e");
    } else {
        context.set_fill_style_str("#f0f2ff");
    }
    let _ = context.arc(center_x, center_y, radius, 0.0, TAU);
    context.fill();

    let segment_count = labels.len().max(1);
    let segment_angle = TAU / segment_count as f64;

    context.save();

    // Move to center, rotate, then move back
    let _ = context.translate(center_x, center_y);
    let _ = context.rotate(rotation);
    let _ = context.translate(-center_x, -center_y);

    // Segment zero begins under the pointer when the wheel is at rest, so
    // the drawn wheel and the index resolution stay in lockstep.
    for (i, _) in labels.iter().enumerate() {
        let start = -FRAC_PI_2 + i as f64 * segment_angle;
        context.begin_path();
        context.set_fill_style_str(SEGMENT_COLORS[i % SEGMENT_COLORS.len()]);
        context.move_to(center_x, center_y);
        let _ = context.arc(center_x, center_y, radius, start, start + segment_angle);
        context.fill();
    }

    // Segment dividers
    if segment_count > 1 {
        context.set_stroke_style_str(if is_dark_mode {
            "rgba(255, 255, 255, 0.7)"
        } else {
            "rgba(255, 255, 255, 0.9)"
        });
        context.set_line_width(2.5);
        for i in 0..segment_count {
            let angle = -FRAC_PI_2 + i as f64 * segment_angle;
            context.begin_path();
            context.move_to(center_x, center_y);
            context.line_to(
                center_x + radius * angle.cos(),
                center_y + radius * angle.sin(),
            );
            context.stroke();
        }
    }

    // Labels, rotated into the middle of their segments
    context.set_text_align("center");
    context.set_text_baseline("middle");
    context.set_fill_style_str("#ffffff");
    context.set_shadow_color(if is_dark_mode { "rgba(0, 0, 0, 0.7)" } else { "rgba(0, 0, 0, 0.5)" });
    context.set_shadow_blur(3.0);
    context.set_shadow_offset_x(1.0);
    context.set_shadow_offset_y(1.0);
    context.set_font(label_font(segment_count));

    for (i, label) in labels.iter().enumerate() {
        let mid = -FRAC_PI_2 + (i as f64 + 0.5) * segment_angle;
        context.save();
        let _ = context.translate(center_x, center_y);
        let _ = context.rotate(mid);
        let _ = context.translate(radius * 0.62, 0.0);
        let _ = context.fill_text(&display_label(label), 0.0, 0.0);
        context.restore();
    }

    context.set_shadow_color("rgba(0, 0, 0, 0)");
    context.set_shadow_blur(0.0);
    context.set_shadow_offset_x(0.0);
    context.set_shadow_offset_y(0.0);

    context.restore();

    // Hub
    let inner_radius = radius * 0.12;
    context.begin_path();
    if is_dark_mode {
        context.set_fill_style_str("#2d3142");
    } else {
        context.set_fill_style_str("#8b5cf6");
    }
    let _ = context.arc(center_x, center_y, inner_radius, 0.0, TAU);
    context.fill();

    context.begin_path();
    context.set_fill_style_str("#ffffff");
    let _ = context.arc(center_x, center_y, inner_radius * 0.35, 0.0, TAU);
    context.fill();

    // Outer ring
    context.begin_path();
    if is_spinning {
        let pulse = (js_sys::Date::now() / 400.0).sin() * 0.2 + 0.5;
        let stroke_color = if is_dark_mode {
            format!("rgba(180, 130, 255, {})", pulse)
        } else {
            format!("rgba(130, 100, 255, {})", pulse)
        };
        context.set_stroke_style_str(&stroke_color);
        context.set_line_width(5.0);
    } else {
        context.set_stroke_style_str(if is_dark_mode {
            "rgba(180, 130, 255, 0.5)"
        } else {
            "rgba(130, 100, 255, 0.5)"
        });
        context.set_line_width(4.0);
    }
    let _ = context.arc(center_x, center_y, radius - 2.0, 0.0, TAU);
    context.stroke();

    // Fixed pointer at the top of the wheel
    context.set_shadow_color(if is_spinning {
        "rgba(255, 215, 130, 0.8)"
    } else {
        "rgba(255, 215, 0, 0.6)"
    });
    context.set_shadow_blur(if is_spinning { 10.0 } else { 4.0 });

    let pointer_width = 16.0;
    let pointer_height = 26.0;
    context.begin_path();
    context.move_to(center_x, center_y - radius + 8.0);
    context.line_to(center_x - pointer_width, center_y - radius - pointer_height);
    context.line_to(center_x + pointer_width, center_y - radius - pointer_height);
    context.close_path();

    if is_spinning {
        context.set_fill_style_str("#ffd700");
    } else {
        context.set_fill_style_str("#f59e0b");
    }
    context.fill();

    context.set_stroke_style_str("#e69500");
    context.set_line_width(1.5);
    context.stroke();

    context.set_shadow_color("rgba(0, 0, 0, 0)");
    context.set_shadow_blur(0.0);

    // Sparkle ring while the wheel is in motion
    if is_spinning {
        let time = js_sys::Date::now();
        for i in 0..12 {
            let angle = (time / 1000.0 + i as f64 * TAU / 12.0) % TAU;
            let distance = radius * 1.05 + (time / 500.0 + i as f64).sin() * 8.0;
            let x = center_x + distance * angle.cos();
            let y = center_y + distance * angle.sin();
            let size = 2.0 + (time / 300.0 + i as f64).sin() * 1.5;

            context.begin_path();
            context.set_fill_style_str("rgba(255, 215, 130, 0.7)");
            let _ = context.arc(x, y, size, 0.0, PI * 2.0);
            context.fill();
        }
    }
}
