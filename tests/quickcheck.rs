#![cfg(feature = "quickcheck")]

use compare::Compare;
use quickcheck::{Arbitrary, Gen};
use rbtree::map::{self, Map};

pub trait OccupiedEntry<K, C> where C: Compare<K> {
    fn entry<'a, V>(&self, map: &'a mut Map<K, V, C>) -> Option<map::OccupiedEntry<'a, K, V, C>>;
}

#[derive(Clone, Debug)]
pub struct RemoveEntry<R>(R);

impl<R> Arbitrary for RemoveEntry<R> where R: Arbitrary {
    fn arbitrary(g: &mut Gen) -> Self { RemoveEntry(R::arbitrary(g)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(RemoveEntry)) }
}

impl<R, K, C> Remove<K, C> for RemoveEntry<R> where R: OccupiedEntry<K, C>, C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> {
        self.0.entry(map).map(map::OccupiedEntry::remove_entry)
    }
}

macro_rules! occupied_entry {
    ($K:ty, $V:ty, $R:ty) => {
        mod occupied_entry {
            remove!{$K, $V, crate::RemoveEntry<$R>}
        }
    }
}

pub trait Remove<K, C> where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)>;
}

macro_rules! remove {
    ($K:ty, $V:ty, $R:ty) => {
        mod remove {
            use crate::Remove;
            use quickcheck::{quickcheck, TestResult};
            use rbtree::Map;

            #[test]
            fn removes_key() {
                fn test(mut map: Map<$K, $V>, removal: $R) -> TestResult {
                    match removal.remove(&mut map) {
                        None => TestResult::discard(),
                        Some((ref key, _)) => TestResult::from_bool(
                            !map.contains_key(key) &&
                            map.get(key).is_none() &&
                            map.get_mut(key).is_none() &&
                            map.find(key).is_end() &&
                            map.iter().find(|e| e.0 == key).is_none()
                        ),
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> TestResult);
            }

            #[test]
            fn affects_no_others() {
                fn test(mut map: Map<$K, $V>, removal: $R) -> bool {
                    let old_map = map.clone();

                    match removal.remove(&mut map) {
                        None => map == old_map,
                        Some((ref key, _)) =>
                            map.iter().collect::<Vec<_>>() ==
                                old_map.iter().filter(|e| e.0 != key).collect::<Vec<_>>()
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }

            #[test]
            fn sets_len() {
                fn test(mut map: Map<$K, $V>, removal: $R) -> bool {
                    let old_len = map.len();

                    match removal.remove(&mut map) {
                        None => map.len() == old_len,
                        Some(_) => map.len() == old_len - 1,
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Find<Q>(Q);

impl<Q> Arbitrary for Find<Q> where Q: Arbitrary {
    fn arbitrary(g: &mut Gen) -> Self { Find(Q::arbitrary(g)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(Find)) }
}

impl<Q, K, C> Remove<K, C> for Find<Q> where C: Compare<K> + Compare<Q, K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> { map.remove(&self.0) }
}

impl<K, C> OccupiedEntry<K, C> for Find<K> where K: Clone, C: Compare<K> {
    fn entry<'a, V>(&self, map: &'a mut Map<K, V, C>) -> Option<map::OccupiedEntry<'a, K, V, C>> {
        match map.entry(self.0.clone()) {
            map::Entry::Occupied(e) => Some(e),
            map::Entry::Vacant(_) => None,
        }
    }
}

pub trait Insert<K> {
    fn key(&self) -> K;
    fn insert<V, C>(self, map: &mut Map<K, V, C>, value: V) -> Option<V> where C: Compare<K>;
}

impl<K> Insert<K> for Find<K> where K: Clone {
    fn key(&self) -> K { self.0.clone() }

    fn insert<V, C>(self, map: &mut Map<K, V, C>, value: V) -> Option<V> where C: Compare<K> {
        map.insert(self.0, value)
    }
}

#[derive(Clone, Debug)]
pub struct FindEntry<K>(K);

impl<K> Arbitrary for FindEntry<K> where K: Arbitrary {
    fn arbitrary(g: &mut Gen) -> Self { FindEntry(K::arbitrary(g)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(FindEntry)) }
}

impl<K> Insert<K> for FindEntry<K> where K: Clone {
    fn key(&self) -> K { self.0.clone() }

    fn insert<V, C>(self, map: &mut Map<K, V, C>, value: V) -> Option<V> where C: Compare<K> {
        use rbtree::map::Entry;

        match map.entry(self.0) {
            Entry::Occupied(mut e) => Some(e.insert(value)),
            Entry::Vacant(e) => { e.insert(value); None }
        }
    }
}

/// Inserts through `insert_or_assign`, recovering the old value from a prior lookup.
#[derive(Clone, Debug)]
pub struct Assign<K>(K);

impl<K> Arbitrary for Assign<K> where K: Arbitrary {
    fn arbitrary(g: &mut Gen) -> Self { Assign(K::arbitrary(g)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(Assign)) }
}

impl<K> Insert<K> for Assign<K> where K: Clone {
    fn key(&self) -> K { self.0.clone() }

    fn insert<V, C>(self, map: &mut Map<K, V, C>, value: V) -> Option<V> where C: Compare<K> {
        let old = map.extract_key(&self.0).map(|node| node.into_value().1);
        let (_, inserted) = map.insert_or_assign(self.0, value);
        assert!(inserted);
        old
    }
}

macro_rules! insert {
    ($K:ty, $V:ty, $R:ty) => {
        mod insert {
            use crate::Insert;
            use quickcheck::quickcheck;
            use rbtree::Map;

            #[test]
            fn sets_len() {
                fn test(mut map: Map<$K, $V>, r: $R, value: $V) -> bool {
                    let old_len = map.len();

                    if r.insert(&mut map, value).is_some() {
                        map.len() == old_len
                    } else {
                        map.len() == old_len + 1
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R, $V) -> bool);
            }

            #[test]
            fn inserts_key() {
                fn test(mut map: Map<$K, $V>, r: $R, mut value: $V) -> bool {
                    let key = r.key();
                    r.insert(&mut map, value);

                    map.contains_key(&key) &&
                    map.get(&key) == Some(&value) &&
                    map.get_mut(&key) == Some(&mut value) &&
                    map.iter().filter(|e| *e.0 == key).collect::<Vec<_>>() == [(&key, &value)]
                }

                quickcheck(test as fn(Map<$K, $V>, $R, $V) -> bool);
            }

            #[test]
            fn affects_no_others() {
                fn test(mut map: Map<$K, $V>, r: $R, value: $V) -> bool {
                    let old_map = map.clone();
                    let key = r.key();
                    r.insert(&mut map, value);

                    map.iter().filter(|e| *e.0 != key).collect::<Vec<_>>() ==
                        old_map.iter().filter(|e| *e.0 != key).collect::<Vec<_>>()
                }

                quickcheck(test as fn(Map<$K, $V>, $R, $V) -> bool);
            }

            #[test]
            fn returns_old_value() {
                fn test(mut map: Map<$K, $V>, r: $R, value: $V) -> bool {
                    let key = r.key();
                    map.get(&key).cloned() == r.insert(&mut map, value)
                }

                quickcheck(test as fn(Map<$K, $V>, $R, $V) -> bool);
            }
        }
    }
}

mod find {
    mod entry {
        use quickcheck::quickcheck;
        use rbtree::map::{Entry, Map};

        #[test]
        fn agrees_with_get() {
            fn test(mut map: Map<u32, u16>, key: u32) -> bool {
                let value = map.get(&key).cloned();

                match map.entry(key) {
                    Entry::Occupied(e) => value == Some(*e.get()),
                    Entry::Vacant(_) => value.is_none(),
                }
            }

            quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
        }

        insert!{u32, u16, crate::FindEntry<u32>}
    }

    mod assign {
        insert!{u32, u16, crate::Assign<u32>}
    }

    insert!{u32, u16, crate::Find<u32>}
    occupied_entry!{u32, u16, crate::Find<u32>}
    remove!{u32, u16, crate::Find<u32>}
}

#[derive(Clone, Debug)]
struct Max;

impl Arbitrary for Max { fn arbitrary(_g: &mut Gen) -> Self { Max } }

impl<K, C> Remove<K, C> for Max where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> { map.remove_last() }
}

impl<K, C> OccupiedEntry<K, C> for Max where C: Compare<K> {
    fn entry<'a, V>(&self, map: &'a mut Map<K, V, C>) -> Option<map::OccupiedEntry<'a, K, V, C>> {
        map.last_entry()
    }
}

mod last {
    use quickcheck::quickcheck;
    use rbtree::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            map.last() == map.iter().rev().next()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn agrees_with_end() {
        fn test(map: Map<u32, u16>) -> bool {
            map.last() == map.get_at(map.prev(map.end())) &&
            map.last() == map.get_at(map.rbegin())
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    occupied_entry!{u32, u16, crate::Max}
    remove!{u32, u16, crate::Max}
}

#[derive(Clone, Debug)]
struct Min;

impl Arbitrary for Min { fn arbitrary(_g: &mut Gen) -> Self { Min } }

impl<K, C> Remove<K, C> for Min where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> { map.remove_first() }
}

impl<K, C> OccupiedEntry<K, C> for Min where C: Compare<K> {
    fn entry<'a, V>(&self, map: &'a mut Map<K, V, C>) -> Option<map::OccupiedEntry<'a, K, V, C>> {
        map.first_entry()
    }
}

mod first {
    use quickcheck::quickcheck;
    use rbtree::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            map.first() == map.iter().next()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    occupied_entry!{u32, u16, crate::Min}
    remove!{u32, u16, crate::Min}
}

/// Removes the entry a cursor reaches after `n` steps from the start, wrapping around.
#[derive(Clone, Debug)]
struct Nth(usize);

impl Arbitrary for Nth {
    fn arbitrary(g: &mut Gen) -> Self { Nth(usize::arbitrary(g)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(Nth)) }
}

impl<K, C> Remove<K, C> for Nth where C: Compare<K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> {
        if map.is_empty() { return None; }

        let mut cursor = map.begin();
        for _ in 0..self.0 % map.len() { cursor = map.next(cursor); }
        map.extract(cursor).map(|node| node.into_value())
    }
}

mod nth {
    remove!{u32, u16, crate::Nth}
}

#[derive(Clone, Debug)]
struct Succ<Q>(Q, bool);

impl<Q> Arbitrary for Succ<Q> where Q: Arbitrary {
    fn arbitrary(g: &mut Gen) -> Self { Succ(Q::arbitrary(g), bool::arbitrary(g)) }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((self.0.clone(), self.1).shrink().map(|(key, inc)| Succ(key, inc)))
    }
}

impl<Q, K, C> Remove<K, C> for Succ<Q> where C: Compare<K> + Compare<Q, K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> {
        map.remove_succ(&self.0, self.1)
    }
}

impl<Q, K, C> OccupiedEntry<K, C> for Succ<Q> where C: Compare<K> + Compare<Q, K> {
    fn entry<'a, V>(&self, map: &'a mut Map<K, V, C>) -> Option<map::OccupiedEntry<'a, K, V, C>> {
        map.succ_entry(&self.0, self.1)
    }
}

mod succ {
    use quickcheck::quickcheck;
    use rbtree::Map;

    #[test]
    fn exclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.succ(&key, false) == map.iter().find(|e| *e.0 > key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn inclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.succ(&key, true) == map.iter().find(|e| *e.0 >= key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    occupied_entry!{u32, u16, crate::Succ<u32>}
    remove!{u32, u16, crate::Succ<u32>}
}

#[derive(Clone, Debug)]
struct Pred<Q>(Q, bool);

impl<Q> Arbitrary for Pred<Q> where Q: Arbitrary {
    fn arbitrary(g: &mut Gen) -> Self { Pred(Q::arbitrary(g), bool::arbitrary(g)) }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((self.0.clone(), self.1).shrink().map(|(key, inc)| Pred(key, inc)))
    }
}

impl<Q, K, C> Remove<K, C> for Pred<Q> where C: Compare<K> + Compare<Q, K> {
    fn remove<V>(&self, map: &mut Map<K, V, C>) -> Option<(K, V)> {
        map.remove_pred(&self.0, self.1)
    }
}

impl<Q, K, C> OccupiedEntry<K, C> for Pred<Q> where C: Compare<K> + Compare<Q, K> {
    fn entry<'a, V>(&self, map: &'a mut Map<K, V, C>) -> Option<map::OccupiedEntry<'a, K, V, C>> {
        map.pred_entry(&self.0, self.1)
    }
}

mod pred {
    use quickcheck::quickcheck;
    use rbtree::Map;

    #[test]
    fn exclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.pred(&key, false) == map.iter().rev().find(|e| *e.0 < key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn inclusive_agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.pred(&key, true) == map.iter().rev().find(|e| *e.0 <= key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    occupied_entry!{u32, u16, crate::Pred<u32>}
    remove!{u32, u16, crate::Pred<u32>}
}

mod iter {
    use quickcheck::quickcheck;
    use rbtree::Map;

    #[test]
    fn ascends() {
        fn test(map: Map<u32, u16>) -> bool {
            map.iter().zip(map.iter().skip(1)).all(|(e1, e2)| e1.0 < e2.0)
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn descends_when_reversed() {
        fn test(map: Map<u32, u16>) -> bool {
            map.iter().rev().zip(map.iter().rev().skip(1)).all(|(e2, e1)| e2.0 > e1.0)
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn size_hint_is_exact() {
        fn test(map: Map<u32, u16>) -> bool {
            let mut len = map.len();
            let mut it = map.iter();

            loop {
                if it.size_hint() != (len, Some(len)) { return false; }
                if it.next().is_none() { break; }
                len -= 1;
            }

            len == 0 && it.size_hint() == (0, Some(0))
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn agrees_with_cursors() {
        fn test(map: Map<u32, u16>) -> bool {
            let mut cursor = map.begin();
            let mut stepped = vec![];

            while let Some(e) = map.get_at(cursor) {
                stepped.push(e);
                cursor = map.next(cursor);
            }

            stepped == map.iter().collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }
}

mod range {
    use quickcheck::{quickcheck, Arbitrary, Gen};
    use rbtree::Map;
    use std::ops::Bound::*;

    #[derive(Clone, Debug)]
    struct Bound<T>(std::ops::Bound<T>);

    impl<T> Bound<T> {
        fn as_ref(&self) -> Bound<&T> {
            Bound(match self.0 {
                Included(ref t) => Included(t),
                Excluded(ref t) => Excluded(t),
                Unbounded => Unbounded,
            })
        }
    }

    impl<T> Arbitrary for Bound<T> where T: Arbitrary {
        fn arbitrary(g: &mut Gen) -> Self {
            Bound(match u8::arbitrary(g) % 3 {
                0 => Included(T::arbitrary(g)),
                1 => Excluded(T::arbitrary(g)),
                _ => Unbounded,
            })
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            match self.0 {
                Included(ref t) => Box::new(t.shrink().map(|t| Bound(Included(t)))),
                Excluded(ref t) => Box::new(t.shrink().map(|t| Bound(Excluded(t)))),
                Unbounded => Box::new(None.into_iter()),
            }
        }
    }

    #[test]
    fn range() {
        fn test(map: Map<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
            let r = map.range(min.as_ref().0, max.as_ref().0);

            let i = map.iter()
                .skip_while(|e| match min.0 {
                    Included(ref t) => e.0 < t,
                    Excluded(ref t) => e.0 <= t,
                    Unbounded => false,
                })
                .take_while(|e| match max.0 {
                    Included(ref t) => e.0 <= t,
                    Excluded(ref t) => e.0 < t,
                    Unbounded => true,
                });

            r.collect::<Vec<_>>() == i.collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>, Bound<u32>, Bound<u32>) -> bool);
    }

    #[test]
    fn range_rev() {
        fn test(map: Map<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
            let r = map.range(min.as_ref().0, max.as_ref().0).rev();

            let i = map.iter().rev()
                .skip_while(|e| match max.0 {
                    Included(ref t) => e.0 > t,
                    Excluded(ref t) => e.0 >= t,
                    Unbounded => false,
                })
                .take_while(|e| match min.0 {
                    Included(ref t) => e.0 >= t,
                    Excluded(ref t) => e.0 > t,
                    Unbounded => true,
                });

            r.collect::<Vec<_>>() == i.collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>, Bound<u32>, Bound<u32>) -> bool);
    }
}

mod multi_map {
    use quickcheck::quickcheck;
    use rbtree::MultiMap;

    #[test]
    fn keeps_every_entry() {
        fn test(entries: Vec<(u8, u16)>) -> bool {
            let map: MultiMap<u8, u16> = entries.iter().cloned().collect();

            let mut sorted = entries.clone();
            sorted.sort_by_key(|e| e.0);

            map.len() == entries.len() &&
            map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>() == sorted
        }

        quickcheck(test as fn(Vec<(u8, u16)>) -> bool);
    }

    #[test]
    fn equal_range_covers_count() {
        fn test(map: MultiMap<u8, u16>, key: u8) -> bool {
            let (first, last) = map.equal_range(&key);

            map.range_at(first, last).all(|e| *e.0 == key) &&
            map.range_at(first, last).count() == map.count(&key) &&
            map.get_all(&key).count() == map.iter().filter(|e| *e.0 == key).count()
        }

        quickcheck(test as fn(MultiMap<u8, u16>, u8) -> bool);
    }

    #[test]
    fn remove_erases_run() {
        fn test(mut map: MultiMap<u8, u16>, key: u8) -> bool {
            let old_len = map.len();
            let count = map.count(&key);

            map.remove(&key) == count && map.len() == old_len - count && !map.contains_key(&key)
        }

        quickcheck(test as fn(MultiMap<u8, u16>, u8) -> bool);
    }
}

mod set {
    use quickcheck::quickcheck;
    use rbtree::{MultiSet, Set};

    #[test]
    fn subset_agrees_with_contains() {
        fn test(a: Set<u8>, b: Set<u8>) -> bool {
            a.is_subset(&b) == a.iter().all(|item| b.contains(item)) &&
            a.is_disjoint(&b) == a.iter().all(|item| !b.contains(item)) &&
            a.is_superset(&b) == b.is_subset(&a)
        }

        quickcheck(test as fn(Set<u8>, Set<u8>) -> bool);
    }

    #[test]
    fn multi_set_counts_duplicates() {
        fn test(items: Vec<u8>, item: u8) -> bool {
            let set: MultiSet<u8> = items.iter().cloned().collect();
            set.count(&item) == items.iter().filter(|i| **i == item).count()
        }

        quickcheck(test as fn(Vec<u8>, u8) -> bool);
    }

    #[test]
    fn erase_range_removes_span() {
        fn test(mut set: Set<u8>, a: u8, b: u8) -> bool {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let expected: Vec<u8> = set.iter().cloned().filter(|i| *i < lo || *i >= hi).collect();

            let (first, last) = (set.lower_bound(&lo), set.lower_bound(&hi));
            set.erase_range(first, last);

            set.iter().cloned().collect::<Vec<_>>() == expected
        }

        quickcheck(test as fn(Set<u8>, u8, u8) -> bool);
    }
}
