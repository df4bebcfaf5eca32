//! Mirror property values into the render handles.
//!
//! Every function here is a pure projection of a node's property values onto
//! the host. None of them read back from the host except
//! [`Render::InputValue`], which skips the write when the live value already
//! matches.

use super::kind::WidgetKind;
use super::node::{Handles, WidgetNode};
use super::schema::{PropertySpec, Render};
use super::value::Value;
use crate::host::{Handle, Host};
use crate::id::WidgetId;

/// Suffix of a text input's inner element id.
pub const INPUT_SUFFIX: &str = "input";

/// Suffix of a button's icon element id.
pub const ICON_SUFFIX: &str = "i";

/// Resolves the kind of another widget by identity (for label targets).
pub(crate) type KindLookup<'a> = &'a dyn Fn(WidgetId) -> Option<WidgetKind>;

/// Render the fixed structure of a freshly created outer element: identity,
/// grid area and the container display mode.
pub(crate) fn structure(host: &mut dyn Host, id: WidgetId, kind: WidgetKind, outer: Handle) {
    let id = id.to_string();
    host.set_attribute(outer, "id", &id);
    host.set_style(outer, "grid-area", Some(&id));
    match kind {
        WidgetKind::Panel => host.set_style(outer, "display", Some("flex")),
        WidgetKind::Grid => host.set_style(outer, "display", Some("grid")),
        _ => return,
    }
    host.set_style(outer, "align-items", Some("baseline"));
}

/// Create the inner `input` element of a text input under `outer`.
pub(crate) fn inner_input(host: &mut dyn Host, id: WidgetId, kind: WidgetKind, outer: Handle) -> Handle {
    let inner = host.create_handle("input");
    host.set_attribute(inner, "type", "text");
    host.set_attribute(inner, "id", &id.sub_element(INPUT_SUFFIX));
    host.set_attribute(inner, "class", kind.name());
    host.append_child(outer, inner);
    inner
}

/// Apply one property of `node` to its handles.
pub(crate) fn apply(host: &mut dyn Host, node: &WidgetNode, spec: &PropertySpec, lookup: KindLookup<'_>) {
    let handles = node.live_handles();
    let value = node.get(spec.name).unwrap_or(&Value::Null);
    let outer = handles.outer;

    match spec.render {
        Render::Visibility => {
            let visible = value.as_bool().unwrap_or(true);
            host.set_style(outer, "visibility", Some(if visible { "inherit" } else { "hidden" }));
        }
        Render::Style(property) => {
            let text = value.as_str().filter(|s| !s.is_empty());
            host.set_style(outer, property, text);
        }
        Render::Dimension(property) => {
            host.set_style(outer, property, value.to_css_length().as_deref());
        }
        Render::Pixels(property) => {
            let px = format!("{}px", value.as_int().unwrap_or(0));
            host.set_style(outer, property, Some(&px));
        }
        Render::FlexDirection => {
            let vertical = value.as_bool().unwrap_or(false);
            host.set_style(outer, "flex-direction", Some(if vertical { "column" } else { "row" }));
        }
        Render::FlexWrap => {
            let wrap = value.as_bool().unwrap_or(false);
            host.set_style(outer, "flex-wrap", Some(if wrap { "wrap" } else { "nowrap" }));
        }
        Render::Tracks(property) => {
            let tracks = value.as_list().unwrap_or_default();
            let rendered = (!tracks.is_empty()).then(|| tracks_template(tracks));
            host.set_style(outer, property, rendered.as_deref());
        }
        Render::Classes => {
            let classes = value.as_list().unwrap_or_default();
            host.set_attribute(outer, "class", &classes.join(" "));
        }
        Render::Text => host.set_text(outer, value.as_str().unwrap_or_default()),
        Render::ButtonContent => button_content(host, node, outer),
        Render::Enabled => {
            let enabled = value.as_bool().unwrap_or(true);
            flag(host, handles.focus(), "disabled", !enabled);
        }
        Render::Flag(name, part) => flag(host, handles.part(part), name, value.as_bool().unwrap_or(false)),
        Render::Attribute(name, part) => match value.as_str().filter(|s| !s.is_empty()) {
            Some(text) => host.set_attribute(handles.part(part), name, text),
            None => host.remove_attribute(handles.part(part), name),
        },
        Render::LabelFor => match value.as_str() {
            Some(target) => host.set_attribute(outer, "for", &label_target(target, lookup)),
            None => host.remove_attribute(outer, "for"),
        },
        Render::InputValue => input_value(host, handles, value.as_str().unwrap_or_default()),
    }
}

fn flag(host: &mut dyn Host, handle: Handle, name: &str, on: bool) {
    if on {
        host.set_attribute(handle, name, "");
    } else {
        host.remove_attribute(handle, name);
    }
}

fn input_value(host: &mut dyn Host, handles: Handles, value: &str) {
    let inner = handles.focus();
    if host.value(inner) != value {
        host.set_value(inner, value);
    }
}

/// Create the detached icon element of a button. It is reused by every
/// content render and only attached while the icon is set.
pub(crate) fn icon_element(host: &mut dyn Host, id: WidgetId) -> Handle {
    let icon = host.create_handle("i");
    host.set_attribute(icon, "id", &id.sub_element(ICON_SUFFIX));
    icon
}

/// Optional icon element followed by the text, separated by a space when
/// both are present.
fn button_content(host: &mut dyn Host, node: &WidgetNode, outer: Handle) {
    let text = node.get("text").and_then(Value::as_str).unwrap_or_default();
    let icon = node.get("icon").and_then(Value::as_str).unwrap_or_default();

    host.replace_children(outer, &[]);
    let mut separator = "";
    if let Some(i) = node.live_handles().icon.filter(|_| !icon.is_empty()) {
        host.set_attribute(i, "class", &format!("icon {icon}"));
        host.append_child(outer, i);
        separator = " ";
    }
    if !text.is_empty() {
        host.append_text(outer, &format!("{separator}{text}"));
    }
}

/// The `for` attribute of a label: a text input's inner element, or the
/// target widget's own element.
fn label_target(target: &str, lookup: KindLookup<'_>) -> String {
    match WidgetId::parse(target) {
        Some(id) if lookup(id) == Some(WidgetKind::TextInput) => id.sub_element(INPUT_SUFFIX),
        _ => target.to_owned(),
    }
}

/// Render a grid track list.
///
/// When every track is in `px` or `%`, each `P%` track becomes
/// `calc(P% - Xpx)` with `X = P * total_px / 100`, so percentages apply to the
/// space left after the fixed tracks.
pub fn tracks_template(tracks: &[String]) -> String {
    let percent_or_px = tracks
        .iter()
        .all(|t| t.ends_with('%') || t.ends_with("px"));
    if !percent_or_px {
        return tracks.join(" ");
    }
    let total_px: f64 = tracks
        .iter()
        .filter_map(|t| t.strip_suffix("px"))
        .filter_map(|n| n.trim().parse::<f64>().ok())
        .sum();

    tracks
        .iter()
        .map(|track| match track.strip_suffix('%').and_then(|p| p.trim().parse::<f64>().ok()) {
            Some(percent) => format!("calc({track} - {}px)", number(percent * total_px / 100.0)),
            None => track.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Normalise a track list entry: integers become pixels.
pub fn normalize_track(track: &str) -> String {
    match track.trim().parse::<i64>() {
        Ok(px) => format!("{px}px"),
        Err(_) => track.to_owned(),
    }
}
