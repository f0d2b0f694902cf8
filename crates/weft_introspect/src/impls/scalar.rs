use alloc::string::String;
use core::time::Duration;
use std::time::SystemTime;

use crate::info::{TypeInfo, TypeInfoCell, TypeKind, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault, TypeTraitFromValue};

macro_rules! impl_scalar {
    ($kind:ident: $($ty:ty),+ $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: TypeInfoCell = TypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::$kind))
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta.insert_trait::<TypeTraitFromValue>(FromType::<Self>::from_type());
                meta
            }
        }
    )+};
}

impl_scalar!(Number: i8, i16, i32, i64, i128, isize);
impl_scalar!(Number: u8, u16, u32, u64, u128, usize);
impl_scalar!(Number: f32, f64);
impl_scalar!(Boolean: bool);
impl_scalar!(Text: char, String);
impl_scalar!(Temporal: Duration);

// No meaningful default instant.
impl Typed for SystemTime {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Temporal))
    }
}

impl GetTypeMeta for SystemTime {
    fn get_type_meta() -> TypeMeta {
        let mut meta = TypeMeta::of::<Self>();
        meta.insert_trait::<TypeTraitFromValue>(FromType::<Self>::from_type());
        meta
    }
}

/// Registers every type of this module.
pub(crate) fn register_scalars(registry: &mut TypeRegistry) {
    macro_rules! register {
        ($($ty:ty),+ $(,)?) => {$(
            registry.register::<$ty>();
        )+};
    }

    register!(bool, char, String, Duration, SystemTime);
    register!(i8, i16, i32, i64, i128, isize);
    register!(u8, u16, u32, u64, u128, usize);
    register!(f32, f64);
}
