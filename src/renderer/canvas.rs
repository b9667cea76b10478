//! Immediate-mode 2D drawing surface
//!
//! The scene renderer talks to [`Canvas`], which mirrors the subset of the
//! HTML canvas 2D context it needs. The browser context implements it
//! directly; [`RecordingCanvas`] captures calls for headless runs and tests.

use std::convert::Infallible;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Vertical text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
        }
    }
}

/// 2D drawing context
pub trait Canvas {
    type Error;

    fn save(&mut self);
    fn restore(&mut self);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    /// Drop shadow for subsequent fills (`blur` 0 disables it)
    fn set_shadow(&mut self, color: &str, blur: f32);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32)
    -> Result<(), Self::Error>;
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        start: f32,
        end: f32,
    ) -> Result<(), Self::Error>;
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), Self::Error>;
    /// Rendered width of `text` in the current font
    fn measure_text(&mut self, text: &str) -> Result<f32, Self::Error>;
}

/// A single recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f32),
    GlobalAlpha(f32),
    Shadow(String, f32),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadraticCurveTo(f32, f32, f32, f32),
    Arc { x: f32, y: f32, radius: f32 },
    Ellipse { x: f32, y: f32, radius_x: f32, radius_y: f32 },
    ClosePath,
    Fill,
    Stroke,
    FillText { text: String, x: f32, y: f32 },
}

/// Canvas that records every call instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
    /// Glyph advance used by `measure_text`
    pub char_width: f32,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            char_width: 10.0,
        }
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Canvas for RecordingCanvas {
    type Error = Infallible;

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.push(DrawCommand::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.push(DrawCommand::StrokeStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(DrawCommand::LineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_shadow(&mut self, color: &str, blur: f32) {
        self.push(DrawCommand::Shadow(color.to_string(), blur));
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawCommand::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawCommand::TextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawCommand::TextBaseline(baseline));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.push(DrawCommand::FillRect { x, y, w, h });
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::LineTo(x, y));
    }

    fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.push(DrawCommand::QuadraticCurveTo(cpx, cpy, x, y));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, _start: f32, _end: f32) -> Result<(), Infallible> {
        self.push(DrawCommand::Arc { x, y, radius });
        Ok(())
    }

    fn ellipse(
        &mut self,
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        _rotation: f32,
        _start: f32,
        _end: f32,
    ) -> Result<(), Infallible> {
        self.push(DrawCommand::Ellipse {
            x,
            y,
            radius_x,
            radius_y,
        });
        Ok(())
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), Infallible> {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str) -> Result<f32, Infallible> {
        Ok(text.chars().count() as f32 * self.char_width)
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::CanvasRenderingContext2d;

    use super::{Canvas, TextAlign, TextBaseline};

    impl Canvas for CanvasRenderingContext2d {
        type Error = JsValue;

        fn save(&mut self) {
            CanvasRenderingContext2d::save(self);
        }

        fn restore(&mut self) {
            CanvasRenderingContext2d::restore(self);
        }

        fn set_fill_style(&mut self, color: &str) {
            self.set_fill_style_str(color);
        }

        fn set_stroke_style(&mut self, color: &str) {
            self.set_stroke_style_str(color);
        }

        fn set_line_width(&mut self, width: f32) {
            CanvasRenderingContext2d::set_line_width(self, width as f64);
        }

        fn set_global_alpha(&mut self, alpha: f32) {
            CanvasRenderingContext2d::set_global_alpha(self, alpha as f64);
        }

        fn set_shadow(&mut self, color: &str, blur: f32) {
            self.set_shadow_color(color);
            self.set_shadow_blur(blur as f64);
        }

        fn set_font(&mut self, font: &str) {
            CanvasRenderingContext2d::set_font(self, font);
        }

        fn set_text_align(&mut self, align: TextAlign) {
            CanvasRenderingContext2d::set_text_align(self, align.as_str());
        }

        fn set_text_baseline(&mut self, baseline: TextBaseline) {
            CanvasRenderingContext2d::set_text_baseline(self, baseline.as_str());
        }

        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
            CanvasRenderingContext2d::fill_rect(self, x as f64, y as f64, w as f64, h as f64);
        }

        fn begin_path(&mut self) {
            CanvasRenderingContext2d::begin_path(self);
        }

        fn move_to(&mut self, x: f32, y: f32) {
            CanvasRenderingContext2d::move_to(self, x as f64, y as f64);
        }

        fn line_to(&mut self, x: f32, y: f32) {
            CanvasRenderingContext2d::line_to(self, x as f64, y as f64);
        }

        fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
            CanvasRenderingContext2d::quadratic_curve_to(
                self, cpx as f64, cpy as f64, x as f64, y as f64,
            );
        }

        fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) -> Result<(), JsValue> {
            CanvasRenderingContext2d::arc(
                self,
                x as f64,
                y as f64,
                radius as f64,
                start as f64,
                end as f64,
            )
        }

        fn ellipse(
            &mut self,
            x: f32,
            y: f32,
            radius_x: f32,
            radius_y: f32,
            rotation: f32,
            start: f32,
            end: f32,
        ) -> Result<(), JsValue> {
            CanvasRenderingContext2d::ellipse(
                self,
                x as f64,
                y as f64,
                radius_x as f64,
                radius_y as f64,
                rotation as f64,
                start as f64,
                end as f64,
            )
        }

        fn close_path(&mut self) {
            CanvasRenderingContext2d::close_path(self);
        }

        fn fill(&mut self) {
            CanvasRenderingContext2d::fill(self);
        }

        fn stroke(&mut self) {
            CanvasRenderingContext2d::stroke(self);
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), JsValue> {
            CanvasRenderingContext2d::fill_text(self, text, x as f64, y as f64)
        }

        fn measure_text(&mut self, text: &str) -> Result<f32, JsValue> {
            Ok(CanvasRenderingContext2d::measure_text(self, text)?.width() as f32)
        }
    }
}
