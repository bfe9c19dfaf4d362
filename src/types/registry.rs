//! Node-type registry for one document dialect.
//!
//! The [`TypeRegistry`] interns every [`NodeType`] of a dialect in an arena
//! addressed by [`NodeTypeId`]. Child relationships point at ids, so the
//! graph may contain cycles (`Schema -> Schema`); anything that searches it
//! must guard against revisiting a type.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{Result, StyleguideError};

/// Name of the extension-point type every registry carries.
pub const SPEC_EXTENSION: &str = "SpecExtension";

/// Index of a node type inside its [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeTypeId(usize);

impl NodeTypeId {
    /// Position of the type in registry order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a property (or map/list entry) of a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildType {
    /// A structured node of the given type.
    Node(NodeTypeId),
    /// A terminal value with no type of its own.
    Scalar,
}

impl ChildType {
    fn node(self) -> Option<NodeTypeId> {
        match self {
            ChildType::Node(id) => Some(id),
            ChildType::Scalar => None,
        }
    }
}

/// A named node type and the shape of its children.
#[derive(Debug, Clone)]
pub struct NodeType {
    name: String,
    properties: IndexMap<String, ChildType>,
    additional_properties: Option<ChildType>,
    items: Option<ChildType>,
    extensions_prefix: Option<String>,
}

impl NodeType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct, named properties.
    pub fn properties(&self) -> &IndexMap<String, ChildType> {
        &self.properties
    }

    /// Value type of a keyed collection of children.
    pub fn additional_properties(&self) -> Option<ChildType> {
        self.additional_properties
    }

    /// Element type of a list of children.
    pub fn items(&self) -> Option<ChildType> {
        self.items
    }

    /// Prefix marking vendor-extension keys (`x-`), if the type accepts them.
    pub fn extensions_prefix(&self) -> Option<&str> {
        self.extensions_prefix.as_deref()
    }

    /// Structured child types reachable in one step, excluding extensions.
    ///
    /// Order: properties in declaration order, then the map value type,
    /// then the list element type.
    pub fn child_types(&self) -> impl Iterator<Item = NodeTypeId> + '_ {
        self.properties
            .values()
            .copied()
            .chain(self.additional_properties)
            .chain(self.items)
            .filter_map(ChildType::node)
    }
}

/// Reference to a child type by name, before interning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildRef {
    Named(String),
    Scalar,
}

impl From<&str> for ChildRef {
    fn from(name: &str) -> Self {
        ChildRef::Named(name.to_string())
    }
}

/// Definition of a node type in terms of other type names.
///
/// ```
/// use apistyle::types::TypeDefinition;
///
/// let operation = TypeDefinition::new()
///     .property("responses", "Responses")
///     .scalar("operationId")
///     .extensions("x-");
/// assert_eq!(operation.properties.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeDefinition {
    pub properties: IndexMap<String, ChildRef>,
    pub additional_properties: Option<ChildRef>,
    pub items: Option<ChildRef>,
    pub extensions_prefix: Option<String>,
}

impl TypeDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property holding a node of `type_name`.
    pub fn property(mut self, name: impl Into<String>, type_name: &str) -> Self {
        self.properties.insert(name.into(), ChildRef::from(type_name));
        self
    }

    /// Add a terminal property.
    pub fn scalar(mut self, name: impl Into<String>) -> Self {
        self.properties.insert(name.into(), ChildRef::Scalar);
        self
    }

    /// Declare a keyed collection whose values are `type_name` nodes.
    pub fn map_of(mut self, type_name: &str) -> Self {
        self.additional_properties = Some(ChildRef::from(type_name));
        self
    }

    /// Declare a list whose elements are `type_name` nodes.
    pub fn list_of(mut self, type_name: &str) -> Self {
        self.items = Some(ChildRef::from(type_name));
        self
    }

    /// Accept vendor extensions under `prefix`.
    pub fn extensions(mut self, prefix: impl Into<String>) -> Self {
        self.extensions_prefix = Some(prefix.into());
        self
    }
}

/// Collects named type definitions and interns them into a [`TypeRegistry`].
#[derive(Debug, Clone, Default)]
pub struct TypeRegistryBuilder {
    definitions: IndexMap<String, TypeDefinition>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a type.
    pub fn define(mut self, name: impl Into<String>, definition: TypeDefinition) -> Self {
        self.definitions.insert(name.into(), definition);
        self
    }

    /// Intern all definitions.
    ///
    /// Fails with [`StyleguideError::UnknownNodeType`] if a definition
    /// refers to a type that was never defined.
    pub fn build(self) -> Result<TypeRegistry> {
        let mut by_name: HashMap<String, NodeTypeId> = HashMap::new();
        for (index, name) in self.definitions.keys().enumerate() {
            by_name.insert(name.clone(), NodeTypeId(index));
        }

        let mut definitions = self.definitions;
        if !by_name.contains_key(SPEC_EXTENSION) {
            by_name.insert(SPEC_EXTENSION.to_string(), NodeTypeId(definitions.len()));
            definitions.insert(SPEC_EXTENSION.to_string(), TypeDefinition::new());
        }

        let resolve = |child: &ChildRef, owner: &str| -> Result<ChildType> {
            match child {
                ChildRef::Scalar => Ok(ChildType::Scalar),
                ChildRef::Named(name) => by_name.get(name).copied().map(ChildType::Node).ok_or_else(
                    || StyleguideError::UnknownNodeType {
                        name: name.clone(),
                        referenced_from: owner.to_string(),
                    },
                ),
            }
        };

        let mut types = Vec::with_capacity(definitions.len());
        for (name, definition) in &definitions {
            let mut properties = IndexMap::with_capacity(definition.properties.len());
            for (prop, child) in &definition.properties {
                properties.insert(prop.clone(), resolve(child, name)?);
            }
            let additional_properties = definition
                .additional_properties
                .as_ref()
                .map(|c| resolve(c, name))
                .transpose()?;
            let items = definition
                .items
                .as_ref()
                .map(|c| resolve(c, name))
                .transpose()?;

            types.push(NodeType {
                name: name.clone(),
                properties,
                additional_properties,
                items,
                extensions_prefix: definition.extensions_prefix.clone(),
            });
        }

        let spec_extension = by_name[SPEC_EXTENSION];
        Ok(TypeRegistry {
            types,
            by_name,
            spec_extension,
        })
    }
}

/// Closed set of node types for one dialect.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<NodeType>,
    by_name: HashMap<String, NodeTypeId>,
    spec_extension: NodeTypeId,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Get a type by id.
    pub fn get(&self, id: NodeTypeId) -> &NodeType {
        &self.types[id.0]
    }

    /// Look up the id of a type name.
    pub fn id_of(&self, name: &str) -> Option<NodeTypeId> {
        self.by_name.get(name).copied()
    }

    /// Look up a type by name.
    pub fn by_name(&self, name: &str) -> Option<&NodeType> {
        self.id_of(name).map(|id| self.get(id))
    }

    /// Iterate over all types in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeTypeId, &NodeType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, node_type)| (NodeTypeId(index), node_type))
    }

    /// The vendor-extension type.
    pub fn spec_extension(&self) -> NodeTypeId {
        self.spec_extension
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
