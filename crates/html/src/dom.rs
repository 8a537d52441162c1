//! Arena-backed element tree.
//!
//! Nodes are addressed by a stable `NodeId` rather than owned through
//! parent/child pointers, so detach/reattach during render-tree
//! construction never needs to fight the borrow checker.

/// Index into a [`Document`]'s node arena. Stable for the document's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Element {
        tag: String,
        /// Preserves source order; lookups use linear scan (the attribute
        /// sets involved are tiny).
        attributes: Vec<(String, String)>,
        /// Populated once by the style attacher; empty until then.
        style: Vec<(String, String)>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug)]
struct Slot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// An element tree rooted at `html`. Owns every node in a flat arena.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Document {
    /// Builds a document around a freshly-created root element.
    /// Used by the parser, which always starts from an `html` element.
    pub(crate) fn with_root(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        let root = Slot {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element {
                tag: tag.into(),
                attributes,
                style: Vec::new(),
            },
        };
        Document {
            slots: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn alloc_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        attributes: Vec<(String, String)>,
    ) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            parent: Some(parent),
            children: Vec::new(),
            kind: NodeKind::Element {
                tag: tag.into(),
                attributes,
                style: Vec::new(),
            },
        });
        self.slots[parent.index()].children.push(id);
        id
    }

    pub(crate) fn alloc_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            parent: Some(parent),
            children: Vec::new(),
            kind: NodeKind::Text { text: text.into() },
        });
        self.slots[parent.index()].children.push(id);
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.slots[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.index()].children
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text { text } => Some(text.as_str()),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn id_attr(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "id")
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attr(id, "class")
            .into_iter()
            .flat_map(|list| list.split_whitespace())
    }

    pub fn style(&self, id: NodeId) -> &[(String, String)] {
        match self.kind(id) {
            NodeKind::Element { style, .. } => style.as_slice(),
            NodeKind::Text { .. } => &[],
        }
    }

    /// Overwrites the computed style map for an element. Called exactly
    /// once per element by the style attacher.
    pub fn set_style(&mut self, id: NodeId, style: Vec<(String, String)>) {
        if let NodeKind::Element { style: slot, .. } = &mut self.slots[id.index()].kind {
            *slot = style;
        }
    }

    /// Allocates a synthesized element with no backing place in the real
    /// element tree: `parent` is recorded only so the render-tree builder
    /// can read its resolved style back off when wrapping an anonymous
    /// block, but `parent`'s children list is left untouched. Used by
    /// `render_tree::anonymous_block`.
    pub fn alloc_floating_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            parent: Some(parent),
            children: Vec::new(),
            kind: NodeKind::Element {
                tag: tag.into(),
                attributes: Vec::new(),
                style: Vec::new(),
            },
        });
        id
    }
}
