//! Types shared by the tests of this crate.

use alloc::string::String;

use serde::Deserialize;
use weft_introspect::info::{
    AttributeFlags, AttributeInfo, MethodInfo, ParentInfo, TypeInfo, TypeInfoCell, TypeKind, Typed,
};
use weft_introspect::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitFromValue};

// -----------------------------------------------------------------------------
// Interfaces

pub(crate) trait Pet {}
pub(crate) trait Walker: Pet {}
pub(crate) trait Talker {}

impl Typed for dyn Pet {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Interface))
    }
}

impl Typed for dyn Walker {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Interface).with_interface::<dyn Pet>())
    }
}

impl Typed for dyn Talker {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Interface))
    }
}

impl GetTypeMeta for dyn Pet {}
impl GetTypeMeta for dyn Walker {}
impl GetTypeMeta for dyn Talker {}

// -----------------------------------------------------------------------------
// Animal / Dog
//
// `Dog` embeds its parent and shadows `name`.

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Animal {
    pub name: String,
    pub age: u32,
}

impl Pet for Animal {}

impl Typed for Animal {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>(TypeKind::Struct)
                .with_interface::<dyn Pet>()
                .with_attributes([
                    AttributeInfo::constant::<u32>("LEGS"),
                    AttributeInfo::new::<Self, String>("name", |a| &mut a.name),
                    AttributeInfo::new::<Self, u32>("age", |a| &mut a.age),
                ])
        })
    }
}

impl GetTypeMeta for Animal {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Dog {
    pub animal: Animal,
    pub name: String,
    pub breed: String,
}

impl Typed for Dog {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>(TypeKind::Struct)
                .with_parent(ParentInfo::new::<Self, Animal>(|d| &mut d.animal))
                .with_attributes([
                    AttributeInfo::new::<Self, String>("name", |d| &mut d.name),
                    AttributeInfo::new::<Self, String>("breed", |d| &mut d.breed),
                ])
        })
    }
}

impl GetTypeMeta for Dog {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        meta
    }
}

// -----------------------------------------------------------------------------
// Robot

#[derive(Debug, Default)]
pub(crate) struct Robot {
    pub serial: String,
}

impl Pet for Robot {}
impl Walker for Robot {}
impl Talker for Robot {}

impl Typed for Robot {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>(TypeKind::Struct)
                .with_interface::<dyn Walker>()
                .with_interface::<dyn Talker>()
                .with_attributes([AttributeInfo::new::<Self, String>("serial", |r| &mut r.serial)])
        })
    }
}

impl GetTypeMeta for Robot {}

// -----------------------------------------------------------------------------
// Color

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) enum Color {
    Red,
    Green,
}

impl Typed for Color {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>(TypeKind::Enum)
                .with_attributes([AttributeInfo::constant::<u32>("ordinal").with_flags(AttributeFlags::empty())])
        })
    }
}

impl GetTypeMeta for Color {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitFromValue>(FromType::<Self>::from_type());
        meta
    }
}

// -----------------------------------------------------------------------------
// EmptyList / ArrayList

#[derive(Debug, Default)]
pub(crate) struct EmptyList;

#[derive(Debug, Default)]
pub(crate) struct ArrayList;

impl Typed for EmptyList {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Collection))
    }
}

impl Typed for ArrayList {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Collection))
    }
}

impl GetTypeMeta for EmptyList {}
impl GetTypeMeta for ArrayList {}

// -----------------------------------------------------------------------------
// Person
//
// `nickname` and `id` have no write accessor; only `nickname` has a setter.
// `id` is declared but never stored.
// `title` is written through a renamed setter when a mapping is registered.

#[derive(Debug, Default)]
pub(crate) struct Person {
    pub nickname: String,
    pub title: String,
}

impl Typed for Person {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>(TypeKind::Struct)
                .with_attributes([
                    AttributeInfo::constant::<String>("nickname").with_flags(AttributeFlags::empty()),
                    AttributeInfo::new::<Self, String>("title", |p| &mut p.title),
                    AttributeInfo::constant::<u64>("id").with_flags(AttributeFlags::empty()),
                ])
                .with_methods([
                    MethodInfo::setter::<Self, String>("set_nickname", |p, v| p.nickname = v),
                    MethodInfo::setter::<Self, String>("assign_title", |p, v| p.title = v.to_uppercase()),
                ])
        })
    }
}

impl GetTypeMeta for Person {}

// -----------------------------------------------------------------------------
// Registry

/// Built-in scalars plus every fixture type.
pub(crate) fn registry() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register::<Dog>();
    types.register::<Robot>();
    types.register::<Color>();
    types.register::<EmptyList>();
    types.register::<ArrayList>();
    types.register::<Person>();
    types
}
