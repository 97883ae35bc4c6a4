use super::node::{ItemContent, ResolvedNode};
use crate::value::display_scalar;
use serde_json::Value;
use std::fmt;

/// A wrapper to display a resolved tree as an indented outline.
/// Handy when checking what a specification resolves to for a given model.
pub struct DisplayTree<'a> {
    pub nodes: &'a [ResolvedNode],
}

impl<'a> fmt::Display for DisplayTree<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            self.fmt_as_tree(node, f, "", i + 1 == count)?;
        }
        Ok(())
    }
}

impl<'a> DisplayTree<'a> {
    fn fmt_as_tree(
        &self,
        node: &ResolvedNode,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        write!(f, "{}{}", prefix, node_marker)?;
        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        match node {
            ResolvedNode::Item(item) => {
                let label = item.label.as_deref().unwrap_or("");
                let marker = if item.required { " *" } else { "" };
                match &item.content {
                    ItemContent::Control(control) => writeln!(
                        f,
                        "item {}{} [{}] {} = {}",
                        item.name,
                        marker,
                        control.kind,
                        label,
                        Self::format_value(control.value.as_ref())
                    )?,
                    ItemContent::Custom { .. } => {
                        writeln!(f, "item {}{} [custom] {}", item.name, marker, label)?
                    }
                }
            }
            ResolvedNode::Control(control) => writeln!(
                f,
                "control {} [{}] = {}",
                control.name.as_ref().map(|n| n.to_string()).unwrap_or_default(),
                control.kind,
                Self::format_value(control.value.as_ref())
            )?,
            ResolvedNode::Custom { name, .. } => match name {
                Some(name) => writeln!(f, "custom {}", name)?,
                None => writeln!(f, "custom")?,
            },
            ResolvedNode::Row { columns, .. } => {
                writeln!(f, "row")?;
                let count = columns.len();
                for (i, column) in columns.iter().enumerate() {
                    let is_last_column = i + 1 == count;
                    let marker = if is_last_column { "└── " } else { "├── " };
                    writeln!(f, "{}{}col {}", child_prefix, marker, Value::Object(column.layout.clone()))?;
                    let column_prefix =
                        format!("{}{}", child_prefix, if is_last_column { "    " } else { "│   " });
                    self.fmt_as_tree(&column.node, f, &column_prefix, true)?;
                }
            }
            ResolvedNode::Group { children, .. } => {
                writeln!(f, "group")?;
                self.fmt_children(children, f, &child_prefix)?;
            }
            ResolvedNode::List { children, .. } => {
                writeln!(f, "list")?;
                self.fmt_children(children, f, &child_prefix)?;
            }
            ResolvedNode::Section { title, children, .. } => {
                writeln!(f, "section {}", title.as_deref().unwrap_or(""))?;
                self.fmt_children(children, f, &child_prefix)?;
            }
            ResolvedNode::Title { text, .. } => writeln!(f, "title {}", text)?,
            ResolvedNode::Divider { text, .. } => match text {
                Some(text) => writeln!(f, "divider {}", text)?,
                None => writeln!(f, "divider")?,
            },
        }
        Ok(())
    }

    fn fmt_children(
        &self,
        children: &[ResolvedNode],
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
    ) -> fmt::Result {
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            self.fmt_as_tree(child, f, prefix, i + 1 == count)?;
        }
        Ok(())
    }

    fn format_value(value: Option<&Value>) -> String {
        match value {
            None => "undefined".to_string(),
            Some(Value::String(s)) => format!("{:?}", s),
            Some(other) => display_scalar(other),
        }
    }
}
