//! Text rendering of the in-memory host tree for assertions and snapshots.

use crate::host::memory::{HostNode, MemoryHost};
use crate::host::Handle;

const INDENT: &str = "  ";

/// Render `handle` and everything below it as indented HTML.
///
/// Attributes appear in name order followed by a `style` attribute with the
/// inline styles in name order. A form element's live value is shown as a
/// `value` attribute. Text nodes get a line of their own. There is no
/// trailing newline.
pub fn outer_html(host: &MemoryHost, handle: Handle) -> String {
    let mut lines = Vec::new();
    write_node(host, handle, 0, &mut lines);
    lines.join("\n")
}

/// Render every child of the mount point `id`, one after another.
pub fn mounted_html(host: &MemoryHost, id: &str) -> String {
    let Some(anchor) = host.mount_point(id) else {
        return String::new();
    };
    host.children_of(anchor)
        .iter()
        .map(|&child| outer_html(host, child))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_node(host: &MemoryHost, handle: Handle, depth: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    match host.node(handle) {
        Some(HostNode::Text(text)) => lines.push(format!("{pad}{text}")),
        Some(HostNode::Element(element)) => {
            let mut open = format!("{pad}<{}", element.tag);
            for (name, value) in &element.attributes {
                open.push_str(&format!(" {name}=\"{value}\""));
            }
            if !element.value.is_empty() {
                open.push_str(&format!(" value=\"{}\"", element.value));
            }
            if !element.styles.is_empty() {
                let styles: Vec<_> = element
                    .styles
                    .iter()
                    .map(|(property, value)| format!("{property}: {value}"))
                    .collect();
                open.push_str(&format!(" style=\"{}\"", styles.join("; ")));
            }
            open.push('>');
            lines.push(open);
            for &child in host.children_of(handle) {
                write_node(host, child, depth + 1, lines);
            }
            lines.push(format!("{pad}</{}>", element.tag));
        }
        None => {}
    }
}

// ===========================================================================
// Tests
// ===========================================================================
