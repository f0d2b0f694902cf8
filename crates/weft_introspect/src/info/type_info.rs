use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use weft_utils::hash::{FixedHashState, HashMap};

use crate::info::{AttributeInfo, MethodInfo, ParentInfo, Type, TypeKind, Typed};

// -----------------------------------------------------------------------------
// TypeInfo

/// Static description of a type: kind, supertypes, attributes and setters.
///
/// Attributes and methods keep their declaration order. Name lookups go
/// through an index built alongside, as the pair is immutable once the
/// descriptor is published.
///
/// Built once per type, usually inside [`Typed::type_info`] with a
/// [`TypeInfoCell`](crate::info::TypeInfoCell).
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    parent: Option<ParentInfo>,
    interfaces: Box<[fn() -> &'static TypeInfo]>,
    attributes: Box<[AttributeInfo]>,
    attribute_indices: HashMap<&'static str, usize>,
    methods: Box<[MethodInfo]>,
}

impl TypeInfo {
    /// Creates a descriptor for `T` with no supertypes, attributes or methods.
    pub fn new<T: ?Sized + 'static>(kind: TypeKind) -> Self {
        Self::with_type(Type::of::<T>(), kind)
    }

    /// Creates a descriptor under an explicit [`Type`] (see [`Type::named`]).
    pub fn with_type(ty: Type, kind: TypeKind) -> Self {
        Self {
            ty,
            kind,
            parent: None,
            interfaces: Box::new([]),
            attributes: Box::new([]),
            attribute_indices: HashMap::with_hasher(FixedHashState),
            methods: Box::new([]),
        }
    }

    /// Sets the direct supertype.
    pub fn with_parent(mut self, parent: ParentInfo) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Adds an implemented interface, described by `dyn Trait: Typed`.
    pub fn with_interface<I: Typed + ?Sized>(mut self) -> Self {
        let mut interfaces = Vec::from(self.interfaces);
        interfaces.push(I::type_info);
        self.interfaces = interfaces.into_boxed_slice();
        self
    }

    /// Appends attributes, in declaration order.
    ///
    /// A repeated name keeps its first declaration in the index.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = AttributeInfo>) -> Self {
        let mut all = Vec::from(self.attributes);
        for attribute in attributes {
            self.attribute_indices
                .entry(attribute.name())
                .or_insert(all.len());
            all.push(attribute);
        }
        self.attributes = all.into_boxed_slice();
        self
    }

    /// Appends setter methods.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = MethodInfo>) -> Self {
        let mut all = Vec::from(self.methods);
        all.extend(methods);
        self.methods = all.into_boxed_slice();
        self
    }

    // ---------------------------------------------------------------------
    // Identity

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    // ---------------------------------------------------------------------
    // Members

    /// Attributes declared by this type only, in declaration order.
    #[inline]
    pub fn attributes(&self) -> &[AttributeInfo] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        let index = *self.attribute_indices.get(name)?;
        self.attributes.get(index)
    }

    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name() == name)
    }

    // ---------------------------------------------------------------------
    // Hierarchy

    #[inline]
    pub fn parent(&self) -> Option<&ParentInfo> {
        self.parent.as_ref()
    }

    /// Directly implemented interfaces, in declaration order.
    pub fn interfaces(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.interfaces.iter().map(|f| f())
    }

    /// Direct supertypes: the parent first, then the interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.parent
            .iter()
            .map(ParentInfo::type_info)
            .chain(self.interfaces())
    }

    /// The parent chain, starting with `self`, most-derived first.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Returns `true` if values of this type can be used where `ty` is expected:
    /// `ty` is this type, an ancestor, or an interface implemented anywhere in the chain.
    pub fn is_assignable_to(&self, ty: TypeId) -> bool {
        self.type_id() == ty || self.supertypes().any(|s| s.is_assignable_to(ty))
    }
}

impl PartialEq for TypeInfo {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Ancestors

/// Iterator over a type and its parents, see [`TypeInfo::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a TypeInfo>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent().map(ParentInfo::type_info);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::info::{AttributeInfo, ParentInfo, TypeInfo, TypeInfoCell, TypeKind, Typed};

    trait Shape {}

    impl Typed for dyn Shape {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Interface))
        }
    }

    #[derive(Default)]
    struct Base {
        id: u32,
    }

    impl Typed for Base {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::new::<Self>(TypeKind::Struct)
                    .with_interface::<dyn Shape>()
                    .with_attributes([AttributeInfo::new::<Self, u32>("id", |b| &mut b.id)])
            })
        }
    }

    #[derive(Default)]
    struct Circle {
        base: Base,
        label: String,
    }

    impl Typed for Circle {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::new::<Self>(TypeKind::Struct)
                    .with_parent(ParentInfo::new::<Self, Base>(|c| &mut c.base))
                    .with_attributes([AttributeInfo::new::<Self, String>("label", |c| &mut c.label)])
            })
        }
    }

    #[test]
    fn ancestors_walk_parent_chain() {
        let names: Vec<_> = Circle::type_info().ancestors().map(TypeInfo::name).collect();
        assert_eq!(names, ["Circle", "Base"]);
    }

    #[test]
    fn assignability_follows_interfaces() {
        let circle = Circle::type_info();
        assert!(circle.is_assignable_to(TypeId::of::<Circle>()));
        assert!(circle.is_assignable_to(TypeId::of::<Base>()));
        assert!(circle.is_assignable_to(TypeId::of::<dyn Shape>()));
        assert!(!circle.is_assignable_to(TypeId::of::<u32>()));
        assert!(!Base::type_info().is_assignable_to(TypeId::of::<Circle>()));
    }

    #[test]
    fn ancestor_attribute_written_through_upcast() {
        let circle_info = Circle::type_info();
        let parent = circle_info.parent().unwrap();
        let id = parent.type_info().attribute("id").unwrap();

        let mut circle = Circle::default();
        let base = parent.upcast(&mut circle).unwrap();
        id.write(base, serde_json::json!(9)).unwrap();
        assert_eq!(circle.base.id, 9);
        assert!(circle_info.attribute("id").is_none());
    }
}
