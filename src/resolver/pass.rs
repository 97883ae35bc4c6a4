use super::layout::column_layout;
use crate::config::EngineConfig;
use crate::context::ContextSnapshot;
use crate::control::{ControlFactory, ResolvedProps};
use crate::error::ResolveError;
use crate::gate::dependencies_changed;
use crate::output::{Diagnostic, ItemContent, ResolvedColumn, ResolvedItem, ResolvedNode};
use crate::spec::{ControlKind, FieldSpec, LeafSpec, Prop, ShouldUpdate, SpecKind};
use crate::value::Path;
use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use std::sync::Arc;

/// The cached output of one dynamic node, together with everything its
/// resolution reported.
#[derive(Clone)]
pub(super) struct Boundary {
    /// `None` when the node resolved to nothing, e.g. because it was hidden.
    output: Option<ResolvedNode>,
    /// Initial values of every leaf inside the boundary.
    initials: Vec<(Path, Value)>,
    diagnostics: Vec<Diagnostic>,
    /// Keys of every boundary nested inside this one, at any depth.
    nested: Vec<String>,
    watch: Vec<Path>,
    should_update: Option<ShouldUpdate>,
    /// The settled model this output was resolved against. Unset until the
    /// pass that produced it has been committed.
    model: Option<Arc<Value>>,
}

impl Boundary {
    /// Records the model the producing pass settled on, seeds included.
    pub(super) fn settle(&mut self, model: &Arc<Value>) {
        if self.model.is_none() {
            self.model = Some(Arc::clone(model));
        }
    }

    fn dependencies_changed(&self, ctx: &ContextSnapshot) -> bool {
        match &self.model {
            Some(model) => dependencies_changed(&self.watch, self.should_update.as_ref(), model, ctx.values(), ctx),
            None => true,
        }
    }
}

/// The state of a single depth-first resolution pass.
pub(super) struct Pass<'a> {
    factory: &'a ControlFactory,
    config: &'a EngineConfig,
    ctx: &'a ContextSnapshot,
    /// Whether cached boundaries may be reused at all.
    reuse: bool,
    previous: &'a AHashMap<String, Boundary>,
    pub(super) next: AHashMap<String, Boundary>,
    claimed: AHashSet<String>,
    order: Vec<String>,
    initials: Vec<(Path, Value)>,
    pub(super) recomputed: Vec<String>,
    pub(super) reused: Vec<String>,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) seeds: Vec<(Path, Value)>,
}

impl<'a> Pass<'a> {
    pub(super) fn new(
        factory: &'a ControlFactory,
        config: &'a EngineConfig,
        ctx: &'a ContextSnapshot,
        reuse: bool,
        previous: &'a AHashMap<String, Boundary>,
    ) -> Self {
        Self {
            factory,
            config,
            ctx,
            reuse,
            previous,
            next: AHashMap::new(),
            claimed: AHashSet::new(),
            order: Vec::new(),
            initials: Vec::new(),
            recomputed: Vec::new(),
            reused: Vec::new(),
            diagnostics: Vec::new(),
            seeds: Vec::new(),
        }
    }

    /// Resolves one node at `position`. `None` means the node produced no output.
    pub(super) fn resolve_node(
        &mut self,
        spec: &FieldSpec,
        position: &str,
    ) -> Result<Option<ResolvedNode>, ResolveError> {
        if spec.is_dynamic() {
            self.resolve_boundary(spec, position)
        } else {
            self.resolve_static(spec, position)
        }
    }

    fn boundary_key(&mut self, spec: &FieldSpec, position: &str) -> String {
        let key = match &spec.key {
            Some(key) if !self.claimed.contains(key) => key.clone(),
            Some(key) => {
                log::warn!(
                    "duplicate boundary key '{}' at {}, falling back to its position",
                    key,
                    position
                );
                position.to_string()
            }
            None => position.to_string(),
        };
        self.claimed.insert(key.clone());
        key
    }

    fn resolve_boundary(
        &mut self,
        spec: &FieldSpec,
        position: &str,
    ) -> Result<Option<ResolvedNode>, ResolveError> {
        let key = self.boundary_key(spec, position);
        let previous = self.previous;

        if let Some(cached) = previous.get(&key).filter(|cached| self.reuse && !self.is_stale(cached)) {
            log::debug!("reusing boundary '{}'", key);
            let mut output = cached.output.clone();
            if let Some(node) = output.as_mut() {
                self.refresh_values(node, &cached.initials);
            }
            self.adopt(&key, cached);
            self.reused.push(key);
            return Ok(output);
        }

        let initial_start = self.initials.len();
        let diagnostic_start = self.diagnostics.len();
        let order_start = self.order.len();

        let output = self.resolve_static(spec, position)?;
        log::debug!("recomputed boundary '{}'", key);

        let boundary = Boundary {
            output: output.clone(),
            initials: self.initials[initial_start..].to_vec(),
            diagnostics: self.diagnostics[diagnostic_start..].to_vec(),
            nested: self.order[order_start..].to_vec(),
            watch: spec.watch.clone(),
            should_update: spec.should_update.clone(),
            model: None,
        };
        self.next.insert(key.clone(), boundary);
        self.order.push(key.clone());
        self.recomputed.push(key);
        Ok(output)
    }

    /// A boundary is stale when its own gate, or the gate of any boundary
    /// nested inside it, reports a change since it was resolved.
    fn is_stale(&self, cached: &Boundary) -> bool {
        cached.dependencies_changed(self.ctx)
            || cached.nested.iter().any(|key| match self.previous.get(key) {
                Some(inner) => inner.dependencies_changed(self.ctx),
                None => true,
            })
    }

    /// Rebinds every control of a reused output to the current model.
    fn refresh_values(&mut self, node: &mut ResolvedNode, initials: &[(Path, Value)]) {
        for control in node.controls_mut() {
            let Some(name) = &control.name else {
                continue;
            };
            control.value = match name.get(self.ctx.values()) {
                Some(current) => Some(current.clone()),
                None => {
                    let initial = initials.iter().find(|(path, _)| path == name).map(|(_, value)| value.clone());
                    if let Some(initial) = &initial {
                        self.seeds.push((name.clone(), initial.clone()));
                    }
                    initial
                }
            };
        }
    }

    /// Carries a cached boundary and the boundaries nested in it into this pass.
    fn adopt(&mut self, key: &str, cached: &Boundary) {
        let previous = self.previous;
        self.initials.extend(cached.initials.iter().cloned());
        self.diagnostics.extend(cached.diagnostics.iter().cloned());
        for nested in &cached.nested {
            if let Some(inner) = previous.get(nested) {
                self.claimed.insert(nested.clone());
                self.next.insert(nested.clone(), inner.clone());
                self.order.push(nested.clone());
            }
        }
        self.next.insert(key.to_string(), cached.clone());
        self.order.push(key.to_string());
    }

    fn resolve_static(
        &mut self,
        spec: &FieldSpec,
        position: &str,
    ) -> Result<Option<ResolvedNode>, ResolveError> {
        let node = Self::node_label(spec, position);

        if let SpecKind::Malformed { reason } = &spec.kind {
            self.skip(position, format!("malformed node: {}", reason));
            return Ok(None);
        }

        if self.prop(&spec.hidden, &node, "hidden")? {
            log::trace!("{} ({}) is hidden", node, spec.kind.tag());
            return Ok(None);
        }
        log::trace!("resolving {} ({})", node, spec.kind.tag());

        let resolved = match &spec.kind {
            SpecKind::Field(leaf) => return self.resolve_leaf(leaf, &node, position),
            SpecKind::Row(row) => {
                let gutter = self
                    .optional(&row.gutter, &node, "gutter")?
                    .unwrap_or_else(|| self.config.row_gutter.clone());
                let align = self.optional(&row.align, &node, "align")?;
                let justify = self.optional(&row.justify, &node, "justify")?;
                let props = self.prop(&row.props, &node, "props")?;

                let mut columns = Vec::with_capacity(row.columns.len());
                for (index, column) in row.columns.iter().enumerate() {
                    let child_position = format!("{}.{}", position, index);
                    if let Some(child) = self.resolve_node(&column.child, &child_position)? {
                        columns.push(ResolvedColumn {
                            layout: column_layout(&column.size, self.config),
                            node: child,
                        });
                    }
                }
                ResolvedNode::Row {
                    gutter,
                    align,
                    justify,
                    props,
                    columns,
                }
            }
            SpecKind::Group(group) => ResolvedNode::Group {
                gap: self
                    .optional(&group.gap, &node, "gap")?
                    .unwrap_or_else(|| self.config.group_gap.clone()),
                align: self.optional(&group.align, &node, "align")?,
                wrap: group.wrap,
                props: self.prop(&group.props, &node, "props")?,
                children: self.resolve_children(&group.children, position)?,
            },
            SpecKind::List(list) => ResolvedNode::List {
                gap: self
                    .optional(&list.gap, &node, "gap")?
                    .unwrap_or_else(|| self.config.list_gap.clone()),
                props: self.prop(&list.props, &node, "props")?,
                children: self.resolve_children(&list.children, position)?,
            },
            SpecKind::Section(section) => ResolvedNode::Section {
                title: self.optional(&section.title, &node, "title")?,
                subtitle: self.optional(&section.subtitle, &node, "subtitle")?,
                card: self.prop(&section.card, &node, "card")?,
                props: self.prop(&section.props, &node, "props")?,
                children: self.resolve_children(&section.children, position)?,
            },
            SpecKind::Title(title) => ResolvedNode::Title {
                text: self.prop(&title.text, &node, "text")?,
                subtitle: self.optional(&title.subtitle, &node, "subtitle")?,
                level: title.level,
            },
            SpecKind::Divider(divider) => ResolvedNode::Divider {
                text: self.optional(&divider.text, &node, "text")?,
                dashed: divider.dashed,
                orientation: divider.orientation.clone(),
            },
            SpecKind::Malformed { .. } => return Ok(None),
        };
        Ok(Some(resolved))
    }

    fn resolve_children(
        &mut self,
        children: &[FieldSpec],
        position: &str,
    ) -> Result<Vec<ResolvedNode>, ResolveError> {
        let mut resolved = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            let child_position = format!("{}.{}", position, index);
            if let Some(node) = self.resolve_node(child, &child_position)? {
                resolved.push(node);
            }
        }
        Ok(resolved)
    }

    fn resolve_leaf(
        &mut self,
        leaf: &LeafSpec,
        node: &str,
        position: &str,
    ) -> Result<Option<ResolvedNode>, ResolveError> {
        // An empty path would bind the whole model.
        let name = self.optional(&leaf.name, node, "name")?.filter(|name| !name.is_empty());

        if let ControlKind::Custom(component) = &leaf.control {
            let content = self.prop(component, node, "component")?;
            return Ok(Some(match name {
                Some(name) if !leaf.no_item => {
                    let label = self.optional(&leaf.label, node, "label")?;
                    let content = ItemContent::Custom { node: content };
                    ResolvedNode::Item(self.resolve_item(leaf, node, name, label, content)?)
                }
                name => ResolvedNode::Custom { name, content },
            }));
        }

        let Some(name) = name else {
            self.skip(position, format!("'{}' field has no name", leaf.control.tag()));
            return Ok(None);
        };
        let label = self.optional(&leaf.label, node, "label")?;

        let initial = self.optional(&leaf.initial_value, node, "initialValue")?;
        if let Some(initial) = &initial {
            self.initials.push((name.clone(), initial.clone()));
        }
        let value = match name.get(self.ctx.values()) {
            Some(current) => Some(current.clone()),
            None => {
                if let Some(initial) = &initial {
                    self.seeds.push((name.clone(), initial.clone()));
                }
                initial
            }
        };

        let props = ResolvedProps {
            tag: leaf.control.tag().to_string(),
            name: name.clone(),
            label: label.clone(),
            placeholder: self.optional(&leaf.placeholder, node, "placeholder")?,
            value,
            disabled: self.prop(&leaf.disabled, node, "disabled")? || self.ctx.disabled() || self.ctx.loading(),
            options: self.optional(&leaf.options, node, "options")?,
            label_key: leaf.label_key.clone(),
            value_key: leaf.value_key.clone(),
            control_props: self.prop(&leaf.control_props, node, "controlProps")?,
        };
        let control = self.factory.build(&leaf.control, &props, self.config)?;

        if leaf.no_item {
            return Ok(Some(ResolvedNode::Control(control)));
        }
        let item = self.resolve_item(leaf, node, name, label, ItemContent::Control(control))?;
        Ok(Some(ResolvedNode::Item(item)))
    }

    /// Wraps leaf content in its item: label, help texts and validation metadata.
    fn resolve_item(
        &self,
        leaf: &LeafSpec,
        node: &str,
        name: Path,
        label: Option<String>,
        content: ItemContent,
    ) -> Result<ResolvedItem, ResolveError> {
        let rules = self.prop(&leaf.rules, node, "rules")?;
        let required = match self.optional(&leaf.required, node, "required")? {
            Some(required) => required,
            None => rules
                .iter()
                .any(|rule| rule.get("required") == Some(&Value::Bool(true))),
        };
        Ok(ResolvedItem {
            name,
            label,
            tooltip: self.optional(&leaf.tooltip, node, "tooltip")?,
            extra: self.optional(&leaf.extra, node, "extra")?,
            required,
            rules,
            dependencies: leaf.dependencies.clone(),
            props: self.prop(&leaf.item_props, node, "itemProps")?,
            content,
        })
    }

    fn prop<T: Clone + 'static>(
        &self,
        prop: &Prop<T>,
        node: &str,
        property: &'static str,
    ) -> Result<T, ResolveError> {
        prop.resolve(self.ctx).map_err(|source| ResolveError::Property {
            node: node.to_string(),
            property,
            source,
        })
    }

    fn optional<T: Clone + 'static>(
        &self,
        prop: &Option<Prop<T>>,
        node: &str,
        property: &'static str,
    ) -> Result<Option<T>, ResolveError> {
        prop.as_ref().map(|p| self.prop(p, node, property)).transpose()
    }

    fn skip(&mut self, position: &str, message: String) {
        log::warn!("skipping node at {}: {}", position, message);
        self.diagnostics.push(Diagnostic {
            position: position.to_string(),
            message,
        });
    }

    /// A readable identity for error messages: key, literal name, or position.
    fn node_label(spec: &FieldSpec, position: &str) -> String {
        if let Some(key) = &spec.key {
            return key.clone();
        }
        spec.leaf()
            .and_then(|leaf| leaf.name.as_ref())
            .and_then(Prop::as_literal)
            .map(|name| name.to_string())
            .unwrap_or_else(|| position.to_string())
    }
}
