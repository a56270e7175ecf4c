use compare::{natural, Natural};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::{Config, TestLogger};
use std::cell::Cell;
use std::cmp::Ordering;
use std::ops::Bound::{self, Excluded, Included, Unbounded};
use std::rc::Rc;
use crate::cmp::First;
use crate::node::test::assert_red_black;
use crate::node::{Color, Side};
use super::{Cursor, Tree};

type Ints = Tree<u32, Natural<u32>>;

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn multi(values: &[u32]) -> Ints {
    let mut tree = Tree::with_cmp(natural());
    for &value in values { tree.multi_insert(value).unwrap(); }
    tree
}

fn unique(values: &[u32]) -> Ints {
    let mut tree = Tree::with_cmp(natural());
    for &value in values { tree.single_insert(value).unwrap(); }
    tree
}

fn contents(tree: &Ints) -> Vec<u32> { tree.iter().cloned().collect() }

/// Collects the values from `first` up to `last` by stepping cursors.
fn walk(tree: &Ints, mut first: Cursor, last: Cursor) -> Vec<u32> {
    let mut values = vec![];
    while first != last {
        values.push(*tree.get(first).unwrap());
        first = tree.next(first);
    }
    values
}

#[test]
fn test_bounds_with_duplicates() {
    let tree = multi(&[5, 2, 3, 2, 1, 2]);
    assert_eq!(contents(&tree), [1, 2, 2, 2, 3, 5]);

    let lower = tree.lower_bound(&2);
    assert_eq!(tree.get(lower), Some(&2));
    assert_eq!(tree.get(tree.prev(lower)), Some(&1));

    let upper = tree.upper_bound(&2);
    assert_eq!(tree.get(upper), Some(&3));

    let (first, last) = tree.equal_range(&2);
    assert_eq!((first, last), (lower, upper));
    assert_eq!(walk(&tree, first, last), [2, 2, 2]);
    assert_eq!(tree.count(&2), 3);

    let (first, last) = tree.equal_range(&4);
    assert_eq!(first, last);
    assert_eq!(tree.get(first), Some(&5));
    assert_eq!(tree.count(&4), 0);

    assert!(tree.lower_bound(&6).is_end());
    assert!(tree.upper_bound(&5).is_end());
    assert_eq!(tree.find_first(&2), lower);
    assert!(tree.find(&4).is_end());
    assert_eq!(tree.get(tree.find(&2)), Some(&2));
}

#[test]
fn test_sentinels() {
    let mut tree = unique(&[2, 4, 6]);

    assert_eq!(tree.get(tree.prev(tree.end())), Some(&6));
    assert_eq!(tree.next(tree.end()), tree.begin());
    assert_eq!(tree.get(tree.next(tree.rend())), Some(&6));
    assert_eq!(tree.get(tree.prev(tree.rend())), Some(&2));
    assert_eq!(tree.next(tree.rbegin()), tree.prev(tree.prev(tree.end())).reverse());

    let end = tree.end();
    let rend = tree.rend();
    let four = tree.find(&4);

    tree.single_insert(8).unwrap();
    tree.remove(&2);

    assert_eq!(end, tree.end());
    assert_eq!(rend, tree.rend());
    assert_eq!(tree.get(tree.prev(end)), Some(&8));
    assert_eq!(tree.get(tree.next(rend)), Some(&8));
    assert_eq!(tree.get(tree.prev(rend)), Some(&4));
    assert_eq!(tree.get(four), Some(&4));
    assert_eq!(tree.prev(four), tree.end());
}

#[test]
fn test_empty_tree_cursors() {
    let tree = unique(&[]);
    assert!(tree.is_empty());
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.rbegin(), tree.rend());
    assert_eq!(tree.next(tree.end()), tree.end());
    assert_eq!(tree.prev(tree.end()), tree.end());
    assert_eq!(tree.get(tree.end()), None);
    assert_eq!(tree.first(), None);
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn test_reverse_traversal() {
    let tree = unique(&[3, 1, 2]);
    let mut values = vec![];
    let mut cursor = tree.rbegin();

    while cursor != tree.rend() {
        values.push(*tree.get(cursor).unwrap());
        cursor = tree.next(cursor);
    }

    assert_eq!(values, [3, 2, 1]);
    assert_eq!(tree.iter().rev().cloned().collect::<Vec<_>>(), [3, 2, 1]);
}

#[test]
fn test_three_ascending_inserts() {
    let mut tree = unique(&[10, 20, 30]);
    let links = tree.arena().links();

    let root = links.root().unwrap();
    assert_eq!(*tree.arena().value(root), 20);
    assert_eq!(links.color(root), Color::Black);

    let left = links.child(root, Side::Left).unwrap();
    let right = links.child(root, Side::Right).unwrap();
    assert_eq!((*tree.arena().value(left), links.color(left)), (10, Color::Red));
    assert_eq!((*tree.arena().value(right), links.color(right)), (30, Color::Red));
    assert_red_black(tree.arena());

    assert_eq!(tree.remove(&10), Some(10));
    let links = tree.arena().links();
    let root = links.root().unwrap();
    assert_eq!(*tree.arena().value(root), 20);
    assert_eq!(links.color(root), Color::Black);
    assert_eq!(links.child(root, Side::Left), None);

    let right = links.child(root, Side::Right).unwrap();
    assert_eq!((*tree.arena().value(right), links.color(right)), (30, Color::Red));
    assert_eq!(tree.len(), 2);
    assert_red_black(tree.arena());
}

#[test]
fn test_single_insert_is_idempotent() {
    let mut tree: Tree<(u32, &str), Natural<u32>, First> = Tree::with_cmp(natural());

    let (first, inserted) = tree.single_insert((1, "a")).unwrap();
    assert!(inserted);

    let (again, inserted) = tree.single_insert((1, "b")).unwrap();
    assert!(!inserted);
    assert_eq!(again, first);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(again), Some(&(1, "a")));

    let position = tree.multi_insert((1, "c")).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.prev(position), first);
    assert_eq!(tree.get_mapped_mut(position).map(|e| *e.1), Some("c"));
}

#[test]
fn test_insert_then_erase_round_trips() {
    let mut tree = unique(&[8, 3, 11, 1, 5, 9, 14]);
    let before = contents(&tree);

    let (position, inserted) = tree.single_insert(6).unwrap();
    assert!(inserted);
    assert_eq!(tree.len(), before.len() + 1);

    let next = tree.erase(position);
    assert_eq!(tree.get(next), Some(&8));
    assert_eq!(contents(&tree), before);
    assert_red_black(tree.arena());
}

#[test]
fn test_erase_reverse_cursor() {
    let mut tree = unique(&[1, 2, 3]);
    let two = tree.find(&2).reverse();
    let next = tree.erase(two);
    assert_eq!(tree.get(next), Some(&1));
    assert_eq!(tree.erase(next), tree.rend());
    assert_eq!(contents(&tree), [3]);
}

#[test]
#[should_panic(expected = "cursor refers to a removed node")]
fn test_stale_cursor_panics() {
    let mut tree = unique(&[1, 2, 3]);
    let two = tree.find(&2);
    tree.remove(&2);
    tree.single_insert(4).unwrap();
    tree.get(two);
}

#[test]
#[should_panic(expected = "cannot erase the end position")]
fn test_erase_end_panics() {
    let mut tree = unique(&[1]);
    let end = tree.end();
    tree.erase(end);
}

#[test]
fn test_erase_range_across_rotations() {
    init_logger();

    let values: Vec<u32> = (1..=40).collect();
    let mut tree = unique(&values);

    let first = tree.lower_bound(&5);
    let last = tree.lower_bound(&31);
    assert_eq!(tree.erase_range(first, last), last);

    let expected: Vec<u32> = (1..5).chain(31..=40).collect();
    assert_eq!(contents(&tree), expected);
    assert_eq!(walk(&tree, tree.begin(), tree.end()), expected);
    assert_eq!(tree.len(), expected.len());
    assert_red_black(tree.arena());

    let first = tree.begin();
    let last = tree.end();
    assert!(tree.erase_range(first, last).is_end());
    assert!(tree.is_empty());
}

#[test]
fn test_erase_range_random() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let len = rng.gen_range(1..200);
        let values: Vec<u32> = (0..len).map(|_| rng.gen_range(0..100)).collect();
        let mut tree = multi(&values);

        let mut model = values.clone();
        model.sort();

        let lo = rng.gen_range(0..100);
        let hi = rng.gen_range(lo..=100);
        let first = tree.lower_bound(&lo);
        let last = tree.lower_bound(&hi);
        tree.erase_range(first, last);

        model.retain(|&value| value < lo || value >= hi);
        assert_eq!(contents(&tree), model);
        assert_eq!(tree.len(), model.len());
        assert_red_black(tree.arena());
    }
}

#[test]
fn test_erase_key_and_remove() {
    let mut tree = multi(&[4, 2, 2, 7, 2, 9]);
    assert_eq!(tree.erase_key(&2), 3);
    assert_eq!(tree.erase_key(&2), 0);
    assert_eq!(tree.remove(&7), Some(7));
    assert_eq!(tree.remove(&7), None);
    assert_eq!(contents(&tree), [4, 9]);
    assert_red_black(tree.arena());
}

#[test]
fn test_first_last_pop() {
    let mut tree = unique(&[5, 1, 9]);
    assert_eq!(tree.first(), Some(&1));
    assert_eq!(tree.last(), Some(&9));
    assert_eq!(tree.pop_first(), Some(1));
    assert_eq!(tree.pop_last(), Some(9));
    assert_eq!(tree.pop_last(), Some(5));
    assert_eq!(tree.pop_first(), None);
}

#[derive(Debug)]
struct Counted {
    id: u32,
    drops: Rc<Cell<usize>>,
}

impl Drop for Counted {
    fn drop(&mut self) { self.drops.set(self.drops.get() + 1); }
}

fn by_id(l: &Counted, r: &Counted) -> Ordering { l.id.cmp(&r.id) }

type CountedTree = Tree<Counted, fn(&Counted, &Counted) -> Ordering>;

#[test]
fn test_extract_and_insert_node() {
    init_logger();

    let drops = Rc::new(Cell::new(0));
    let mut source = CountedTree::with_cmp(by_id);
    let mut target = CountedTree::with_cmp(by_id);

    for id in 0..10 {
        source.single_insert(Counted { id: id, drops: drops.clone() }).unwrap();
    }

    let three = source.find(&Counted { id: 3, drops: drops.clone() });
    assert_eq!(drops.get(), 1);

    let handle = source.extract(three).unwrap();
    assert_eq!(handle.value().id, 3);
    assert_eq!(source.len(), 9);
    assert_red_black(source.arena());

    let result = target.insert_node(handle).unwrap();
    assert!(result.inserted);
    assert!(result.node.is_none());
    assert_eq!(target.get(result.position).map(|c| c.id), Some(3));
    assert_eq!(drops.get(), 1);

    let handle = target.extract(result.position).unwrap();
    let result = source.insert_node(handle).unwrap();
    assert!(result.inserted);
    assert_eq!(source.iter().map(|c| c.id).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    assert_eq!(drops.get(), 1);

    let four = source.find(&Counted { id: 4, drops: drops.clone() });
    let handle = source.extract(four).unwrap();
    source.single_insert(Counted { id: 4, drops: drops.clone() }).unwrap();

    let result = source.insert_node(handle).unwrap();
    assert!(!result.inserted);
    assert_eq!(source.get(result.position).map(|c| c.id), Some(4));
    assert_eq!(drops.get(), 2);

    drop(result);
    assert_eq!(drops.get(), 3);

    assert!(source.extract(source.end()).is_none());
    drop(source);
    assert_eq!(drops.get(), 13);
}

#[test]
fn test_multi_insert_node() {
    let mut tree = multi(&[1, 2, 3]);
    let two = tree.find(&2);
    let handle = tree.extract(two).unwrap();
    let position = tree.multi_insert(2).unwrap();
    let again = tree.multi_insert_node(handle).unwrap();

    assert_eq!(tree.prev(again), position);
    assert_eq!(contents(&tree), [1, 2, 2, 3]);
}

#[test]
fn test_range_by_bounds() {
    fn range(tree: &Ints, min: Bound<&u32>, max: Bound<&u32>) -> Vec<u32> {
        tree.range_by(min, max).cloned().collect()
    }

    let tree = multi(&[1, 3, 3, 5, 7]);
    let range = |min, max| range(&tree, min, max);
    assert_eq!(range(Unbounded, Unbounded), [1, 3, 3, 5, 7]);
    assert_eq!(range(Included(&3), Included(&5)), [3, 3, 5]);
    assert_eq!(range(Excluded(&3), Unbounded), [5, 7]);
    assert_eq!(range(Unbounded, Excluded(&3)), [1]);
    assert_eq!(range(Included(&3), Excluded(&3)), Vec::<u32>::new());
    assert_eq!(range(Excluded(&3), Excluded(&3)), Vec::<u32>::new());
    assert_eq!(range(Included(&6), Included(&2)), Vec::<u32>::new());
    assert_eq!(range(Included(&8), Unbounded), Vec::<u32>::new());

    assert_eq!(tree.range_by(Included(&2), Included(&6)).rev().cloned().collect::<Vec<_>>(),
               [5, 3, 3]);
}

#[test]
fn test_range_with_crossed_cursors() {
    let tree = unique(&[1, 2, 3, 4, 5, 6, 7]);
    let (two, six) = (tree.find(&2), tree.find(&6));

    assert_eq!(tree.range(two, six).cloned().collect::<Vec<_>>(), [2, 3, 4, 5]);
    assert_eq!(tree.range(six, two).count(), 0);
    assert_eq!(tree.range(six, tree.begin()).count(), 0);
    assert_eq!(tree.range(six, tree.end()).cloned().collect::<Vec<_>>(), [6, 7]);
    assert_eq!(tree.range(tree.end(), two).count(), 0);
}

#[test]
fn test_iterators() {
    let mut tree = unique(&[3, 1, 4, 5, 9, 2, 6]);

    let mut it = tree.iter();
    assert_eq!(it.len(), 7);
    assert_eq!(it.next(), Some(&1));
    assert_eq!(it.next_back(), Some(&9));
    assert_eq!(it.len(), 5);
    assert_eq!(it.cloned().collect::<Vec<_>>(), [2, 3, 4, 5, 6]);

    for value in tree.iter_mut() { *value *= 10; }
    assert_eq!(contents(&tree), [10, 20, 30, 40, 50, 60, 90]);

    let first = tree.find(&30);
    let last = tree.find(&60);
    assert_eq!(tree.range(first, last).cloned().collect::<Vec<_>>(), [30, 40, 50]);
    assert_eq!(tree.range(last, tree.end()).cloned().collect::<Vec<_>>(), [60, 90]);
    assert_eq!(tree.range(first, first).next(), None);

    let mut it = tree.into_iter();
    assert_eq!(it.next_back(), Some(90));
    assert_eq!(it.len(), 6);
    assert_eq!(it.collect::<Vec<_>>(), [10, 20, 30, 40, 50, 60]);
}

#[test]
fn test_clear_and_reuse() {
    init_logger();

    let mut tree = unique(&[1, 2, 3]);
    let two = tree.find(&2);
    tree.clear();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.begin(), tree.end());

    tree.try_reserve(16).unwrap();
    for value in (0..16).rev() { tree.single_insert(value).unwrap(); }
    assert_eq!(contents(&tree), (0..16).collect::<Vec<_>>());
    assert_red_black(tree.arena());
    assert_ne!(tree.find(&2), two);
}

#[test]
fn test_random_workload() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = unique(&[]);
    let mut model = ::std::collections::BTreeSet::new();

    for _ in 0..2000 {
        let value = rng.gen_range(0..500);
        if rng.gen_bool(0.6) {
            let (_, inserted) = tree.single_insert(value).unwrap();
            assert_eq!(inserted, model.insert(value));
        } else {
            assert_eq!(tree.remove(&value).is_some(), model.remove(&value));
        }
    }

    assert_red_black(tree.arena());
    assert_eq!(tree.len(), model.len());
    assert!(tree.iter().eq(model.iter()));
}
