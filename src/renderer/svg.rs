//! SVG generation from a page projection

use std::collections::BTreeMap;

use crate::arc::value_ratio;
use crate::layout::{prop_number, BoundingBox, Point};
use crate::projection::{ArcGeometry, ProjectedWidget, Projection};

use super::PreviewConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: PreviewConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    /// Current group nesting, for indentation
    depth: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            depth: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone()
    }

    fn push(&mut self, element: String) {
        let pad = if self.config.indent { "  ".repeat(self.depth) } else { String::new() };
        self.elements.push(pad + &element);
    }

    /// Add palette tokens as CSS custom properties (`color.bg` → `--color-bg`)
    pub fn add_palette(&mut self, palette: &BTreeMap<String, String>) {
        if palette.is_empty() {
            return;
        }
        let mut css = String::from(":root {\n");
        for (token, value) in palette {
            css.push_str(&format!("    --{}: {};\n", css_token(token), value));
        }
        css.push_str("  }");
        self.styles.push(css);
    }

    /// Add the wireframe class rules
    pub fn add_base_styles(&mut self) {
        let p = self.prefix();
        self.styles.push(format!(
            ".{p}canvas {{ fill: var(--color-bg, #0B0F14); }}\n  \
             .{p}box {{ fill: var(--color-card, #111827); stroke: var(--color-muted, #9CA3AF); stroke-width: 1; }}\n  \
             .{p}track {{ fill: none; stroke: var(--color-muted, #9CA3AF); stroke-linecap: round; }}\n  \
             .{p}indicator {{ fill: none; stroke: var(--color-text, #E5E7EB); stroke-linecap: round; }}\n  \
             .{p}fill {{ fill: var(--color-text, #E5E7EB); }}\n  \
             .{p}text {{ fill: var(--color-text, #E5E7EB); font-family: sans-serif; font-size: 12px; }}\n  \
             .{p}id {{ fill: var(--color-muted, #9CA3AF); font-family: monospace; font-size: 8px; }}\n  \
             .{p}hidden {{ opacity: 0.3; stroke-dasharray: 4 2; }}"
        ));
    }

    /// Add a rectangle covering `bounds`
    pub fn add_rect(&mut self, bounds: &BoundingBox, classes: &[String]) {
        self.push(format!(
            r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            classes.join(" "),
            fmt_num(bounds.x),
            fmt_num(bounds.y),
            fmt_num(bounds.width),
            fmt_num(bounds.height),
        ));
    }

    /// Add a stroked path; `attrs` is appended verbatim
    pub fn add_path(&mut self, d: &str, classes: &[String], attrs: &str) {
        self.push(format!(r#"<path class="{}" d="{}"{}/>"#, classes.join(" "), d, attrs));
    }

    /// Add a text element anchored at `(x, y)`
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, class: &str, anchor: &str) {
        self.push(format!(
            r#"<text class="{}" x="{}" y="{}" text-anchor="{}" dominant-baseline="middle">{}</text>"#,
            class,
            fmt_num(x),
            fmt_num(y),
            anchor,
            escape_xml(text)
        ));
    }

    /// Open a group for one widget
    pub fn start_group(&mut self, widget_id: &str, classes: &[String]) {
        self.push(format!(
            r#"<g data-widget="{}" class="{}">"#,
            escape_xml(widget_id),
            classes.join(" ")
        ));
        self.depth += 1;
    }

    pub fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push("</g>".to_string());
    }

    /// Finish the document with `canvas` (plus margin) as the viewBox
    pub fn build(self, canvas: BoundingBox) -> String {
        let m = self.config.margin;
        let (w, h) = (fmt_num(canvas.width + 2.0 * m), fmt_num(canvas.height + 2.0 * m));
        let sep = if self.config.indent { "\n" } else { "" };

        let mut lines = Vec::with_capacity(self.elements.len() + self.styles.len() + 5);
        if self.config.xml_declaration {
            lines.push(r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string());
        }
        lines.push(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {w} {h}" width="{w}" height="{h}">"#,
            fmt_num(canvas.x - m),
            fmt_num(canvas.y - m),
        ));
        if !self.styles.is_empty() {
            lines.push("  <style>".to_string());
            lines.extend(self.styles.iter().map(|s| format!("  {s}")));
            lines.push("  </style>".to_string());
        }
        lines.extend(self.elements);
        lines.push("</svg>".to_string());
        lines.join(sep)
    }
}

/// Render a projection to an SVG wireframe
pub fn render_svg(projection: &Projection, config: &PreviewConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_palette(&config.palette);
    builder.add_base_styles();

    let prefix = builder.prefix();
    builder.add_rect(&projection.canvas, &[format!("{prefix}canvas")]);

    for widget in &projection.widgets {
        if !widget.visible && !config.show_hidden {
            continue;
        }
        render_widget(widget, &mut builder, config);
    }

    builder.build(projection.canvas)
}

/// Render a single widget to the builder
fn render_widget(widget: &ProjectedWidget, builder: &mut SvgBuilder, config: &PreviewConfig) {
    let p = builder.prefix();
    let mut classes = vec![format!("{p}widget"), format!("{p}{}", css_token(&widget.kind))];
    if !widget.visible {
        classes.push(format!("{p}hidden"));
    }
    if widget.is_checked() {
        classes.push(format!("{p}checked"));
    }
    builder.start_group(&widget.id, &classes);

    let b = widget.bounds;
    match (widget.kind.as_str(), widget.arc.as_ref()) {
        (_, Some(arc)) => render_arc(widget, arc, builder, config),
        ("slider" | "bar", _) => {
            builder.add_rect(&b, &[format!("{p}box")]);
            let min = prop_number(&widget.props, "min_value").unwrap_or(0.0);
            let max = prop_number(&widget.props, "max_value").unwrap_or(100.0);
            let ratio = value_ratio(min, max, widget.display_value().unwrap_or(min));
            let filled = BoundingBox::new(b.x, b.y, b.width * ratio, b.height);
            builder.add_rect(&filled, &[format!("{p}fill")]);
        }
        ("switch" | "checkbox", _) => {
            builder.add_rect(&b, &[format!("{p}box")]);
            if widget.is_checked() {
                let knob = (b.height - 4.0).max(0.0);
                let inner = BoundingBox::new(b.right() - knob - 2.0, b.y + 2.0, knob, knob);
                builder.add_rect(&inner, &[format!("{p}fill")]);
            }
        }
        _ => builder.add_rect(&b, &[format!("{p}box")]),
    }

    if let Some(text) = widget.display_text() {
        let c = b.center();
        builder.add_text(text, c.x, c.y, &format!("{p}text"), "middle");
    }
    if config.show_ids {
        builder.add_text(&widget.id, b.x + 2.0, b.y + 6.0, &format!("{p}id"), "start");
    }

    builder.end_group();
}

fn render_arc(widget: &ProjectedWidget, arc: &ArcGeometry, builder: &mut SvgBuilder, config: &PreviewConfig) {
    let p = builder.prefix();
    let b = widget.bounds;
    let width = prop_number(&widget.style, "arc_width")
        .unwrap_or(config.default_arc_width)
        .max(1.0);
    let radius = (b.width.min(b.height) - width) / 2.0;
    let stroke = format!(r#" stroke-width="{}""#, fmt_num(width));
    let center = b.center();

    if let Some(d) = arc_path_d(center, radius, arc.background.start_deg, arc.background.sweep_cw) {
        builder.add_path(&d, &[format!("{p}track")], &stroke);
    }
    if let Some(d) = arc_path_d(center, radius, arc.indicator.from_deg, arc.indicator.sweep) {
        builder.add_path(&d, &[format!("{p}indicator")], &stroke);
    }
}

fn arc_point(center: Point, radius: f64, deg: f64) -> Point {
    let rad = deg.to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// SVG path data for an arc of signed `sweep` degrees starting at `from_deg`
///
/// Positive sweeps run clockwise on screen. A full circle is split in two
/// halves since a single SVG arc cannot start and end on the same point.
pub fn arc_path_d(center: Point, radius: f64, from_deg: f64, sweep: f64) -> Option<String> {
    if radius <= 0.0 || !sweep.is_finite() || sweep.abs() < 1e-9 {
        return None;
    }
    let sweep = sweep.clamp(-360.0, 360.0);
    let flag = if sweep > 0.0 { 1 } else { 0 };
    let r = fmt_num(radius);
    let start = arc_point(center, radius, from_deg);

    if sweep.abs() >= 360.0 {
        let mid = arc_point(center, radius, from_deg + sweep / 2.0);
        return Some(format!(
            "M{} {} A{r} {r} 0 1 {flag} {} {} A{r} {r} 0 1 {flag} {} {}",
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(mid.x),
            fmt_num(mid.y),
            fmt_num(start.x),
            fmt_num(start.y),
        ));
    }

    let end = arc_point(center, radius, from_deg + sweep);
    let large = if sweep.abs() > 180.0 { 1 } else { 0 };
    Some(format!(
        "M{} {} A{r} {r} 0 {large} {flag} {} {}",
        fmt_num(start.x),
        fmt_num(start.y),
        fmt_num(end.x),
        fmt_num(end.y),
    ))
}

/// Round to three decimals and drop trailing zeros
fn fmt_num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 {
        "0".to_string()
    } else {
        format!("{}", r)
    }
}

fn css_token(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Link, TargetAction};
    use crate::document::Page;
    use crate::layout::{LayoutConfig, Widget};
    use crate::live::{EntityState, Snapshot};
    use crate::projection::project;
    use serde_json::json;

    #[test]
    fn test_label_text_is_escaped() {
        assert_eq!(escape_xml(r#"Temp "in" <°C> & 'out'"#), "Temp &quot;in&quot; &lt;°C&gt; &amp; &apos;out&apos;");
    }

    #[test]
    fn test_compact_output() {
        let mut builder = SvgBuilder::new(PreviewConfig::new().with_indent(false).with_xml_declaration(false));
        builder.start_group("w", &["a".to_string()]);
        builder.end_group();
        assert_eq!(
            builder.build(BoundingBox::new(0.0, 0.0, 10.0, 20.0)),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 20" width="10" height="20"><g data-widget="w" class="a"></g></svg>"#
        );
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(-1e-12), "0");
        assert_eq!(fmt_num(1.23456), "1.235");
    }

    #[test]
    fn test_arc_path_quarter() {
        let d = arc_path_d(Point::new(50.0, 50.0), 40.0, 270.0, 90.0).unwrap();
        assert_eq!(d, "M50 10 A40 40 0 0 1 90 50");
    }

    #[test]
    fn test_arc_path_counter_clockwise_large() {
        let d = arc_path_d(Point::new(0.0, 0.0), 10.0, 0.0, -270.0).unwrap();
        assert_eq!(d, "M10 0 A10 10 0 1 0 0 10");
    }

    #[test]
    fn test_arc_path_full_circle_split() {
        let d = arc_path_d(Point::new(0.0, 0.0), 10.0, 0.0, 360.0).unwrap();
        assert_eq!(d, "M10 0 A10 10 0 1 1 -10 0 A10 10 0 1 1 10 0");
    }

    #[test]
    fn test_arc_path_empty() {
        assert_eq!(arc_path_d(Point::new(0.0, 0.0), 10.0, 0.0, 0.0), None);
        assert_eq!(arc_path_d(Point::new(0.0, 0.0), 0.0, 0.0, 90.0), None);
    }

    #[test]
    fn test_palette_css() {
        let mut palette = BTreeMap::new();
        palette.insert("color.bg".to_string(), "#000000".to_string());
        let mut builder = SvgBuilder::new(PreviewConfig::default());
        builder.add_palette(&palette);
        let svg = builder.build(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(svg.contains("--color-bg: #000000;"));
    }

    #[test]
    fn test_render_page() {
        let page = Page::new("main", "Main")
            .with_widget(Widget::new("t", "label", 10.0, 10.0, 100.0, 20.0).with_prop("text", json!("Temp")))
            .with_widget(Widget::new("g", "arc", 200.0, 10.0, 100.0, 100.0));
        let mut snap = Snapshot::new();
        snap.apply_state("sensor.t", EntityState::new("21.4"));
        let links = vec![Link::new("sensor.t", "t", TargetAction::LabelText).with_format("%.1f <C>")];
        let projection = project(&page, &links, &snap, &LayoutConfig::default()).unwrap();

        let svg = render_svg(&projection, &PreviewConfig::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 480 320""#));
        assert!(svg.contains(r#"data-widget="t""#));
        assert!(svg.contains("21.4 &lt;C&gt;"));
        assert!(svg.contains(r#"class="td-track""#));
        // value 0: no indicator
        assert!(!svg.contains(r#"class="td-indicator""#));
    }

    #[test]
    fn test_hidden_widgets_only_in_debug() {
        let page = Page::new("p", "P").with_widget(Widget::new("w", "container", 0.0, 0.0, 10.0, 10.0));
        let mut snap = Snapshot::new();
        snap.apply_state("input_boolean.show", EntityState::new(""));
        let links = vec![Link::new("input_boolean.show", "w", TargetAction::ObjHidden)];
        let projection = project(&page, &links, &snap, &LayoutConfig::default()).unwrap();

        assert!(!render_svg(&projection, &PreviewConfig::default()).contains(r#"data-widget="w""#));
        let debug = render_svg(&projection, &PreviewConfig::default().with_debug(true));
        assert!(debug.contains(r#"class="td-widget td-container td-hidden""#));
    }
}
