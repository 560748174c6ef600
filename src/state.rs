use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// A node in the search graph.
///
/// Identity (`Eq` + `Hash`) must depend on the configuration only, never on
/// the lineage, so the engine's visited set recognises the same configuration
/// reached along different paths.
pub trait State: Eq + Hash + Sized {
    fn lineage(&self) -> &Lineage<Self>;

    /// Consumes the state, handing back its lineage.
    fn into_lineage(self) -> Lineage<Self>;

    /// Every state reachable in one move, each with `self` as its parent.
    fn possible_moves(self: &Rc<Self>) -> Vec<Self>;

    fn is_solution(&self) -> bool;

    fn is_solvable(&self) -> bool;

    /// Estimate of the moves still needed to reach the goal.
    fn heuristic(&self) -> usize;

    fn parent(&self) -> Option<&Rc<Self>> {
        self.lineage().parent()
    }

    fn distance(&self) -> usize {
        self.lineage().distance()
    }

    /// Priority used by best-first search: distance so far plus the estimate.
    fn score(&self) -> usize {
        self.distance() + self.heuristic()
    }
}

/// Parent link and distance from the root, fixed at construction.
pub struct Lineage<S: State> {
    parent: Option<Rc<S>>,
    distance: usize,
}

impl<S: State> Lineage<S> {
    pub fn root() -> Self {
        Self {
            parent: None,
            distance: 0,
        }
    }

    pub fn child_of(parent: &Rc<S>) -> Self {
        Self {
            parent: Some(Rc::clone(parent)),
            distance: parent.distance() + 1,
        }
    }

    /// Keeps an existing parent; the distance is derived from it again.
    pub fn from_parent(parent: Option<Rc<S>>) -> Self {
        match parent {
            Some(parent) => Self::child_of(&parent),
            None => Self::root(),
        }
    }

    pub fn parent(&self) -> Option<&Rc<S>> {
        self.parent.as_ref()
    }

    pub fn distance(&self) -> usize {
        self.distance
    }
}

impl<S: State> Clone for Lineage<S> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            distance: self.distance,
        }
    }
}

impl<S: State> fmt::Debug for Lineage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lineage")
            .field("has_parent", &self.parent.is_some())
            .field("distance", &self.distance)
            .finish()
    }
}

// Depth-first paths can be hundreds of thousands of states long, so the chain
// is released in a loop rather than through nested drops.
impl<S: State> Drop for Lineage<S> {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(state) => next = state.into_lineage().parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Walks parent links from `goal` back to the root and returns the states in
/// root-to-goal order.
pub fn build_path<S: State>(goal: &Rc<S>) -> Vec<Rc<S>> {
    let mut path = Vec::with_capacity(goal.distance() + 1);
    let mut current = Some(Rc::clone(goal));

    while let Some(state) = current {
        current = state.parent().cloned();
        path.push(state);
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    // A walk along the integers; the goal is `target`.
    struct Step {
        value: i64,
        target: i64,
        lineage: Lineage<Step>,
    }

    impl Step {
        fn root(value: i64, target: i64) -> Self {
            Self {
                value,
                target,
                lineage: Lineage::root(),
            }
        }
    }

    impl PartialEq for Step {
        fn eq(&self, other: &Self) -> bool {
            self.value == other.value
        }
    }

    impl Eq for Step {}

    impl Hash for Step {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.value.hash(state);
        }
    }

    impl State for Step {
        fn lineage(&self) -> &Lineage<Self> {
            &self.lineage
        }

        fn into_lineage(self) -> Lineage<Self> {
            self.lineage
        }

        fn possible_moves(self: &Rc<Self>) -> Vec<Self> {
            [self.value - 1, self.value + 1]
                .into_iter()
                .map(|value| Step {
                    value,
                    target: self.target,
                    lineage: Lineage::child_of(self),
                })
                .collect()
        }

        fn is_solution(&self) -> bool {
            self.value == self.target
        }

        fn is_solvable(&self) -> bool {
            true
        }

        fn heuristic(&self) -> usize {
            self.value.abs_diff(self.target) as usize
        }
    }

    #[test]
    fn successors_are_one_step_further_from_root() {
        let root = Rc::new(Step::root(0, 3));
        assert_eq!(root.distance(), 0);
        assert!(root.parent().is_none());

        for next in root.possible_moves() {
            assert_eq!(next.distance(), 1);
            assert!(Rc::ptr_eq(next.parent().unwrap(), &root));
        }
    }

    #[test]
    fn score_adds_distance_and_heuristic() {
        let root = Rc::new(Step::root(0, 3));
        let right = root.possible_moves().pop().unwrap();
        assert_eq!(right.value, 1);
        assert_eq!(right.score(), 1 + 2);
    }

    #[test]
    fn from_parent_recomputes_distance() {
        let root = Rc::new(Step::root(0, 3));
        let child = Rc::new(root.possible_moves().pop().unwrap());
        let copied: Lineage<Step> = Lineage::from_parent(child.parent().cloned());
        assert_eq!(copied.distance(), 1);
        assert!(Rc::ptr_eq(copied.parent().unwrap(), &root));
        assert_eq!(Lineage::<Step>::from_parent(None).distance(), 0);
    }

    #[test]
    fn lineage_is_fixed_once_built() {
        let root = Rc::new(Step::root(0, 3));
        let child = root.possible_moves().pop().unwrap();

        let copied = child.lineage().clone();
        assert_eq!(copied.distance(), 1);
        assert!(Rc::ptr_eq(copied.parent().unwrap(), &root));

        let released = child.into_lineage();
        assert_eq!(released.distance(), 1);
        assert!(Rc::ptr_eq(released.parent().unwrap(), &root));
        assert_eq!(root.distance(), 0);
    }

    #[test]
    fn path_runs_from_root_to_goal() {
        let mut current = Rc::new(Step::root(0, 3));
        for _ in 0..3 {
            current = Rc::new(current.possible_moves().pop().unwrap());
        }

        let path = build_path(&current);
        let values: Vec<i64> = path.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
        assert!(path.last().unwrap().is_solution());
    }

    #[test]
    fn root_alone_is_a_single_element_path() {
        let root = Rc::new(Step::root(5, 5));
        let path = build_path(&root);
        assert_eq!(path.len(), 1);
        assert!(Rc::ptr_eq(&path[0], &root));
    }

    #[test]
    fn long_chains_drop_without_recursion() {
        let mut current = Rc::new(Step::root(0, -1));
        for _ in 0..500_000 {
            current = Rc::new(current.possible_moves().pop().unwrap());
        }
        assert_eq!(current.distance(), 500_000);
        drop(current);
    }
}
