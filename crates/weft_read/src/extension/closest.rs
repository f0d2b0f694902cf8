use alloc::vec::Vec;
use core::any::TypeId;

use weft_introspect::info::{Type, TypeInfo};
use weft_utils::hash::{FixedHashState, HashSet};

use crate::extension::layered::Layered;

/// The most specific key of `table` that `info` is assignable to.
///
/// An exact key always wins. Otherwise supertypes are searched breadth-first
/// (parent and interfaces are one step away), and the first distance with any
/// registered key decides. Several keys at that distance are ranked by table
/// order: baseline rows first, then overlay rows by first insertion.
pub(crate) fn closest<V>(table: &Layered<Type, V>, info: &'static TypeInfo) -> Option<Type> {
    if table.contains_key(&info.ty()) {
        return Some(info.ty());
    }

    let mut seen: HashSet<TypeId> = HashSet::with_hasher(FixedHashState);
    seen.insert(info.type_id());
    let mut level: Vec<&'static TypeInfo> = info.supertypes().collect();

    while !level.is_empty() {
        level.retain(|t| seen.insert(t.type_id()));

        let best = level
            .iter()
            .filter_map(|t| table.position(&t.ty()).map(|rank| (rank, t.ty())))
            .min_by_key(|(rank, _)| *rank);
        if let Some((_, ty)) = best {
            return Some(ty);
        }

        level = level.iter().flat_map(|t| t.supertypes()).collect();
    }
    None
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;
    use weft_introspect::info::{Type, TypeInfo, Typed};

    use super::closest;
    use crate::extension::layered::Layered;
    use crate::fixtures::{Animal, Dog, Pet, Robot, Talker, Walker};

    fn table(keys: &[Type]) -> Layered<Type, ()> {
        let mut table = Layered::new(None);
        for key in keys {
            table.insert(*key, ());
        }
        table
    }

    #[test]
    fn exact_beats_inherited() {
        let mut t = table(&[Type::of::<Animal>()]);
        assert_eq!(closest(&t, Dog::type_info()), Some(Type::of::<Animal>()));

        t.insert(Type::of::<Dog>(), ());
        assert_eq!(closest(&t, Dog::type_info()), Some(Type::of::<Dog>()));
        assert_eq!(closest(&t, Animal::type_info()), Some(Type::of::<Animal>()));
    }

    #[test]
    fn nearer_supertype_wins() {
        // `dyn Pet` is two steps from `Robot`, through `dyn Walker`.
        let t = table(&[Type::of::<dyn Pet>(), Type::of::<dyn Talker>()]);
        assert_eq!(closest(&t, Robot::type_info()), Some(Type::of::<dyn Talker>()));

        // Through `Animal`, also two steps from `Dog`.
        assert_eq!(closest(&t, Dog::type_info()), Some(Type::of::<dyn Pet>()));
    }

    #[test]
    fn unrelated_is_none() {
        let t = table(&[Type::of::<Dog>()]);
        assert_eq!(closest(&t, Robot::type_info()), None);
        assert_eq!(closest(&t, Animal::type_info()), None);
    }

    fn candidates() -> [(Type, usize); 3] {
        [
            (Type::of::<dyn Walker>(), 1),
            (Type::of::<dyn Talker>(), 1),
            (Type::of::<dyn Pet>(), 2),
        ]
    }

    proptest! {
        #[test]
        fn first_registered_among_nearest(
            order in proptest::sample::subsequence(alloc::vec![0_usize, 1, 2], 0..=3).prop_shuffle()
        ) {
            let all = candidates();
            let keys: Vec<Type> = order.iter().map(|i| all[*i].0).collect();
            let t = table(&keys);

            let nearest = order.iter().map(|i| all[*i].1).min();
            let expected = nearest.and_then(|d| {
                order.iter().map(|i| all[*i]).find(|(_, distance)| *distance == d).map(|(ty, _)| ty)
            });

            let info: &'static TypeInfo = Robot::type_info();
            prop_assert_eq!(closest(&t, info), expected);
        }
    }
}
