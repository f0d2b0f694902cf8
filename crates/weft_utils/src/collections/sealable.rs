//! A list whose structural mutators can be switched off from the outside.
//!
//! The switch is a [`SealFlag`], a cheap shared handle owned by whoever
//! controls the lifecycle (usually a configuration builder). The flag is read
//! on **every** mutating call, never captured when a list or a view over it is
//! created, so one list instance changes behavior the moment its owner seals.
//!
//! Read-only operations never look at the flag.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Bound, Index, RangeBounds};
use core::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

// -----------------------------------------------------------------------------
// SealFlag

/// Error returned by any mutating call made after the owning [`SealFlag`] was sealed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("this collection has been sealed and is now read-only")]
pub struct SealedError;

/// A shared, monotonic "sealed" switch.
///
/// Cloning the flag shares the same state. Once [`seal`](SealFlag::seal) has
/// been called on any clone, every clone reports sealed forever.
///
/// # Examples
///
/// ```
/// use weft_utils::collections::SealFlag;
///
/// let owner = SealFlag::new();
/// let observer = owner.clone();
///
/// assert!(!observer.is_sealed());
/// assert!(owner.seal());
/// assert!(!owner.seal()); // already sealed
/// assert!(observer.is_sealed());
/// ```
#[derive(Clone, Default)]
pub struct SealFlag(Arc<AtomicBool>);

impl SealFlag {
    /// Creates an unsealed flag.
    #[inline]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Returns `true` once the flag has been sealed.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Seals the flag.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// flag was already sealed.
    #[inline]
    pub fn seal(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    /// Returns `Err(SealedError)` if the flag is sealed.
    #[inline]
    pub fn check(&self) -> Result<(), SealedError> {
        if self.is_sealed() {
            Err(SealedError)
        } else {
            Ok(())
        }
    }

    /// Returns `true` if both handles share the same state.
    #[inline]
    pub fn same_as(&self, other: &SealFlag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SealFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SealFlag").field(&self.is_sealed()).finish()
    }
}

// -----------------------------------------------------------------------------
// SealableVec

/// An ordered sequence guarded by a [`SealFlag`].
///
/// Mutators return `Err(SealedError)` when the flag is sealed at call time and
/// leave the contents untouched. Index arguments follow [`Vec`] conventions
/// and panic when out of bounds.
///
/// # Examples
///
/// ```
/// use weft_utils::collections::{SealFlag, SealableVec, SealedError};
///
/// let flag = SealFlag::new();
/// let mut list = SealableVec::new(flag.clone());
///
/// list.push(1).unwrap();
/// list.push(2).unwrap();
///
/// flag.seal();
///
/// assert_eq!(list.push(3), Err(SealedError));
/// assert_eq!(list.as_slice(), &[1, 2]);
/// ```
pub struct SealableVec<T> {
    items: Vec<T>,
    seal: SealFlag,
}

impl<T> SealableVec<T> {
    /// Creates an empty list guarded by `seal`.
    #[inline]
    pub fn new(seal: SealFlag) -> Self {
        Self {
            items: Vec::new(),
            seal,
        }
    }

    /// Wraps existing items, guarded by `seal`.
    #[inline]
    pub fn from_vec(items: Vec<T>, seal: SealFlag) -> Self {
        Self { items, seal }
    }

    /// Returns the flag guarding this list.
    #[inline]
    pub fn seal_flag(&self) -> &SealFlag {
        &self.seal
    }

    /// Returns `true` if mutators are currently rejected.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.seal.is_sealed()
    }

    // ---------------------------------------------------------------------
    // Read-only

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(value)
    }

    /// Index of the first element equal to `value`.
    pub fn position(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|v| v == value)
    }

    /// Index of the last element equal to `value`.
    pub fn last_position(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().rposition(|v| v == value)
    }

    /// Copies the items into a new list guarded by `seal`.
    pub fn fork(&self, seal: SealFlag) -> Self
    where
        T: Clone,
    {
        Self::from_vec(self.items.clone(), seal)
    }

    /// Consumes the list, returning the items.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    // ---------------------------------------------------------------------
    // Mutators

    pub fn push(&mut self, value: T) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.push(value);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, SealedError> {
        self.seal.check()?;
        Ok(core::mem::replace(&mut self.items[index], value))
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, SealedError> {
        self.seal.check()?;
        Ok(self.items.remove(index))
    }

    /// Removes the first element equal to `value`, returning whether one was found.
    pub fn remove_item(&mut self, value: &T) -> Result<bool, SealedError>
    where
        T: PartialEq,
    {
        self.seal.check()?;
        match self.position(value) {
            Some(index) => {
                self.items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.extend(iter);
        Ok(())
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.retain(f);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.clear();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Views

    /// Returns a bidirectional cursor starting before the first element.
    ///
    /// Its mutators consult the flag when they are called, not when the
    /// cursor was created.
    #[inline]
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            items: &mut self.items,
            seal: &self.seal,
            next: 0,
            last: None,
        }
    }

    /// Returns a mutable view of a sub-range.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn range_mut(&mut self, range: impl RangeBounds<usize>) -> SubRangeMut<'_, T> {
        let (start, end) = resolve_range(range, self.items.len());
        SubRangeMut {
            items: &mut self.items,
            seal: &self.seal,
            start,
            end,
        }
    }
}

impl<T> Index<usize> for SealableVec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a SealableVec<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Compares contents only; the flags are ignored.
impl<T: PartialEq> PartialEq for SealableVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: PartialEq> PartialEq<[T]> for SealableVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items == other
    }
}

impl<T: fmt::Debug> fmt::Debug for SealableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// Cursor

/// A list cursor over a [`SealableVec`], in the style of a bidirectional list iterator.
///
/// The cursor sits *between* elements. [`next`](Cursor::next) and
/// [`previous`](Cursor::previous) move it and remember the element they
/// returned; [`remove`](Cursor::remove) and [`set`](Cursor::set) act on that
/// element.
pub struct Cursor<'a, T> {
    items: &'a mut Vec<T>,
    seal: &'a SealFlag,
    next: usize,
    last: Option<usize>,
}

impl<T> Cursor<'_, T> {
    #[inline]
    pub fn has_next(&self) -> bool {
        self.next < self.items.len()
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.next > 0
    }

    #[inline]
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Returns `None` at the start of the list.
    #[inline]
    pub fn previous_index(&self) -> Option<usize> {
        self.next.checked_sub(1)
    }

    pub fn next(&mut self) -> Option<&T> {
        let index = self.next;
        let item = self.items.get(index)?;
        self.next += 1;
        self.last = Some(index);
        Some(item)
    }

    pub fn previous(&mut self) -> Option<&T> {
        let index = self.next.checked_sub(1)?;
        self.next = index;
        self.last = Some(index);
        self.items.get(index)
    }

    /// Removes the element last returned by `next` or `previous`.
    ///
    /// Returns `Ok(None)` if no element has been returned since the last
    /// structural change.
    pub fn remove(&mut self) -> Result<Option<T>, SealedError> {
        self.seal.check()?;
        let Some(index) = self.last.take() else {
            return Ok(None);
        };
        if index < self.next {
            self.next -= 1;
        }
        Ok(Some(self.items.remove(index)))
    }

    /// Replaces the element last returned by `next` or `previous`.
    ///
    /// Returns `Ok(None)`, dropping `value`, if there is no such element.
    pub fn set(&mut self, value: T) -> Result<Option<T>, SealedError> {
        self.seal.check()?;
        let Some(index) = self.last else {
            return Ok(None);
        };
        Ok(Some(core::mem::replace(&mut self.items[index], value)))
    }

    /// Inserts `value` before the cursor position.
    pub fn insert(&mut self, value: T) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.insert(self.next, value);
        self.next += 1;
        self.last = None;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// SubRangeMut

/// A mutable window `[start, end)` over a [`SealableVec`].
///
/// Indices are relative to the window. Structural changes made through the
/// window grow or shrink it, and are seen by the underlying list.
pub struct SubRangeMut<'a, T> {
    items: &'a mut Vec<T>,
    seal: &'a SealFlag,
    start: usize,
    end: usize,
}

impl<T> SubRangeMut<'_, T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[self.start..self.end]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, SealedError> {
        self.seal.check()?;
        assert!(index < self.len(), "sub-range index {index} out of bounds");
        Ok(core::mem::replace(&mut self.items[self.start + index], value))
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), SealedError> {
        self.seal.check()?;
        assert!(index <= self.len(), "sub-range index {index} out of bounds");
        self.items.insert(self.start + index, value);
        self.end += 1;
        Ok(())
    }

    /// Appends `value` at the end of the window.
    pub fn push(&mut self, value: T) -> Result<(), SealedError> {
        let len = self.len();
        self.insert(len, value)
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, SealedError> {
        self.seal.check()?;
        assert!(index < self.len(), "sub-range index {index} out of bounds");
        self.end -= 1;
        Ok(self.items.remove(self.start + index))
    }

    /// Removes every element of the window from the underlying list.
    pub fn clear(&mut self) -> Result<(), SealedError> {
        self.seal.check()?;
        self.items.drain(self.start..self.end);
        self.end = self.start;
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for SubRangeMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

fn resolve_range(range: impl RangeBounds<usize>, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s + 1,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e + 1,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    assert!(start <= end, "range start {start} is greater than end {end}");
    assert!(end <= len, "range end {end} out of bounds for length {len}");
    (start, end)
}

// -----------------------------------------------------------------------------
// Tests
