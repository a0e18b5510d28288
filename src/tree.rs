/// A rooted tree with any number of children per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<T> {
    pub value: T,
    pub children: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    pub fn leaf(value: T) -> Self {
        Tree {
            value,
            children: Vec::new(),
        }
    }

    pub fn with_children(value: T, children: Vec<Tree<T>>) -> Self {
        Tree { value, children }
    }

    pub fn push(&mut self, child: Tree<T>) -> &mut Self {
        self.children.push(child);
        self
    }
}

impl<T: Ord + Clone> Tree<T> {
    /// Smallest value in the subtree rooted here. Walks the whole subtree on every call.
    pub fn min_value(&self) -> T {
        self.children
            .iter()
            .map(Tree::min_value)
            .fold(self.value.clone(), |min, v| if v < min { v } else { min })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_is_its_own_minimum() {
        assert_eq!(Tree::leaf(42).min_value(), 42);
    }

    #[test]
    fn minimum_of_flat_tree() {
        let root = Tree::with_children(10, vec![Tree::leaf(5), Tree::leaf(8), Tree::leaf(3)]);
        assert_eq!(root.min_value(), 3);
    }

    #[test]
    fn minimum_reaches_deep_nodes() {
        let mut deep = Tree::leaf(7);
        deep.push(Tree::with_children(9, vec![Tree::leaf(-1)]));
        let root = Tree::with_children(2, vec![Tree::leaf(4), deep]);
        assert_eq!(root.min_value(), -1);
    }

    #[test]
    fn root_can_be_minimum() {
        let root = Tree::with_children("a", vec![Tree::leaf("b"), Tree::leaf("c")]);
        assert_eq!(root.min_value(), "a");
    }

    #[test]
    fn reflects_mutation_without_caching() {
        let mut root = Tree::with_children(10, vec![Tree::leaf(5)]);
        assert_eq!(root.min_value(), 5);
        root.children[0].value = 20;
        assert_eq!(root.min_value(), 10);
    }
}
