use alloc::boxed::Box;
use core::any::Any;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::info::Typed;
use crate::registry::FromType;

/// Builds an instance of the registered type directly from a JSON value.
///
/// Used for value-like types (scalars, enum constants) that are read whole
/// rather than attribute by attribute.
#[derive(Clone)]
pub struct TypeTraitFromValue {
    func: fn(Value) -> Result<Box<dyn Any + Send>, serde_json::Error>,
}

impl TypeTraitFromValue {
    #[inline]
    pub fn from_value(&self, value: Value) -> Result<Box<dyn Any + Send>, serde_json::Error> {
        (self.func)(value)
    }
}

impl<T: DeserializeOwned + Typed + Send> FromType<T> for TypeTraitFromValue {
    fn from_type() -> Self {
        Self {
            func: |value| {
                let value: T = serde_json::from_value(value)?;
                Ok(Box::new(value))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::info::{TypeInfo, TypeInfoCell, TypeKind, Typed};
    use crate::registry::{FromType, TypeTraitFromValue};

    #[derive(Deserialize, Debug, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    impl Typed for Color {
        fn type_info() -> &'static TypeInfo {
            static CELL: TypeInfoCell = TypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Enum))
        }
    }

    #[test]
    fn builds_enum_constant() {
        let from_value: TypeTraitFromValue = FromType::<Color>::from_type();

        let green = from_value.from_value(json!("Green")).unwrap();
        assert_eq!(green.downcast_ref::<Color>(), Some(&Color::Green));
        let red = from_value.from_value(json!("Red")).unwrap();
        assert_eq!(red.downcast_ref::<Color>(), Some(&Color::Red));
        assert!(from_value.from_value(json!("Blue")).is_err());
    }
}
