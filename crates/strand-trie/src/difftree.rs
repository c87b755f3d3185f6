//! The dual-cursor tree differ.
//!
//! Two [`TrieIter`]s walk the source and target trees in the same total
//! order (depth-first pre-order, siblings byte-sorted by name). At every
//! round the differ compares the two current paths and picks one of a
//! small set of transitions:
//!
//! - unequal paths: the lagging side's current subtree exists only on that
//!   side, so it is expanded into per-leaf insertions or deletions and
//!   pruned from its iterator;
//! - equal paths, predicate-equal nodes: both subtrees are identical, so
//!   both are pruned without producing output. This is what keeps diff
//!   cost proportional to the size of the change rather than the trees;
//! - equal paths, both internal: descend both sides in lockstep;
//! - equal paths, both leaves: a single modification;
//! - equal paths, different kinds: the old node is deleted (expanded if it
//!   was a subtree) and the new one inserted (likewise expanded). No
//!   modification is ever reported across kinds.
//!
//! Every round either consumes a node from one side or from both, so the
//! loop terminates after at most |A| + |B| rounds. Output order is
//! emission order; callers needing a canonical order sort the result.

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::change::{Change, Changes};
use crate::error::{DiffError, DiffResult};
use crate::iter::TrieIter;
use crate::node::Node;

/// Cooperative cancellation flag for long-running diffs.
///
/// Cheap to clone; all clones share the flag, so one thread can hand a
/// clone to [`diff_tree_with_cancel`] and trip the original later. The
/// differ polls the token once per round, before inspecting the cursors;
/// it never interrupts a round in progress.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token. Irreversible.
    pub fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Relaxed);
    }

    /// Returns `true` once the token has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Relaxed)
    }
}

/// Compute the changes that transform `from` into `to`.
///
/// `None` on either side stands for the empty tree, making the result pure
/// insertions or pure deletions. `hash_equal` decides whether two
/// same-path nodes are identical for pruning purposes; it must be
/// reflexive and symmetric (transitivity is not required: the predicate is
/// only ever consulted for same-path pairs). The usual predicate is
/// `|a, b| a.hash() == b.hash()`.
///
/// The returned change set is in traversal order and contains each path at
/// most once; every change designates a leaf path.
pub fn diff_tree<N, F>(from: Option<&N>, to: Option<&N>, hash_equal: F) -> DiffResult<Changes<N>>
where
    N: Node,
    F: Fn(&N, &N) -> bool,
{
    diff_tree_with_cancel(from, to, hash_equal, &CancelToken::new())
}

/// As [`diff_tree`], but polls `cancel` once per round. When the token
/// trips, the call returns [`DiffError::Cancelled`] and the partial result
/// is discarded.
pub fn diff_tree_with_cancel<N, F>(
    from: Option<&N>,
    to: Option<&N>,
    hash_equal: F,
    cancel: &CancelToken,
) -> DiffResult<Changes<N>>
where
    N: Node,
    F: Fn(&N, &N) -> bool,
{
    let mut changes = Changes::new();
    let mut from_iter = match from {
        Some(root) => TrieIter::new(root)?,
        None => TrieIter::empty(),
    };
    let mut to_iter = match to {
        Some(root) => TrieIter::new(root)?,
        None => TrieIter::empty(),
    };

    loop {
        if cancel.is_cancelled() {
            return Err(DiffError::Cancelled);
        }

        match (from_iter.peek(), to_iter.peek()) {
            (None, None) => break,

            // Only the source remains: everything left is deleted.
            (Some(old), None) => {
                changes.add_recursive_delete(old)?;
                from_iter.next_sibling()?;
            }

            // Only the target remains: everything left is inserted.
            (None, Some(new)) => {
                changes.add_recursive_insert(new)?;
                to_iter.next_sibling()?;
            }

            (Some(old), Some(new)) => match old.compare(&new) {
                // The source is behind: its current subtree has no
                // counterpart on the target side.
                std::cmp::Ordering::Less => {
                    changes.add_recursive_delete(old)?;
                    from_iter.next_sibling()?;
                }

                // The target is behind: symmetric.
                std::cmp::Ordering::Greater => {
                    changes.add_recursive_insert(new)?;
                    to_iter.next_sibling()?;
                }

                std::cmp::Ordering::Equal => {
                    if hash_equal(old.node(), new.node()) {
                        // Identical subtrees: prune both sides.
                        from_iter.next_sibling()?;
                        to_iter.next_sibling()?;
                    } else {
                        match (old.is_leaf(), new.is_leaf()) {
                            // Both internal: contents differ somewhere
                            // below, descend in lockstep.
                            (false, false) => {
                                from_iter.step()?;
                                to_iter.step()?;
                            }

                            // Subtree became a leaf.
                            (false, true) => {
                                changes.add_recursive_delete(old)?;
                                changes.push(Change::insert(new));
                                from_iter.next_sibling()?;
                                to_iter.next_sibling()?;
                            }

                            // Leaf became a subtree.
                            (true, false) => {
                                changes.push(Change::delete(old));
                                changes.add_recursive_insert(new)?;
                                from_iter.next_sibling()?;
                                to_iter.next_sibling()?;
                            }

                            // Both leaves with different content.
                            (true, true) => {
                                changes.push(Change::modify(old, new));
                                from_iter.step()?;
                                to_iter.step()?;
                            }
                        }
                    }
                }
            },
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::Action;
    use crate::fsnode::FsNode;
    use crate::node::{NodeError, NodeResult};
    use strand_types::ObjectId;

    fn hashes_equal(a: &FsNode, b: &FsNode) -> bool {
        a.hash() == b.hash()
    }

    /// Render a change set in the `+path -path *path` convention, sorted.
    fn render(changes: &Changes<FsNode>) -> Vec<String> {
        let mut out: Vec<String> = changes
            .iter()
            .map(|c| match c.action().unwrap() {
                Action::Insert => format!("+{}", c.to.as_ref().unwrap()),
                Action::Delete => format!("-{}", c.from.as_ref().unwrap()),
                Action::Modify => format!("*{}", c.from.as_ref().unwrap()),
            })
            .collect();
        out.sort();
        out
    }

    fn parse_expected(expected: &str) -> Vec<String> {
        let mut out: Vec<String> =
            expected.split_whitespace().map(str::to_string).collect();
        out.sort();
        out
    }

    fn reverse_expected(expected: &[String]) -> Vec<String> {
        let mut out: Vec<String> = expected
            .iter()
            .map(|c| match c.as_bytes()[0] {
                b'+' => format!("-{}", &c[1..]),
                b'-' => format!("+{}", &c[1..]),
                _ => c.clone(),
            })
            .collect();
        out.sort();
        out
    }

    fn run_one(from: &FsNode, to: &FsNode, want: &[String], context: &str) {
        let plain = diff_tree(Some(from), Some(to), hashes_equal).unwrap();
        assert_eq!(render(&plain), want, "{context}");

        // The cancellable entry point with an untripped token must agree.
        let token = CancelToken::new();
        let cancellable =
            diff_tree_with_cancel(Some(from), Some(to), hashes_equal, &token).unwrap();
        assert_eq!(render(&cancellable), want, "{context} [with token]");
    }

    /// Run a scenario forwards and reversed: the reversed diff must swap
    /// insertions and deletions and keep modifications.
    fn check(from: &str, to: &str, expected: &str) {
        let a = FsNode::parse(from).unwrap();
        let b = FsNode::parse(to).unwrap();
        let want = parse_expected(expected);
        run_one(&a, &b, &want, &format!("{from} -> {to}"));
        run_one(
            &b,
            &a,
            &reverse_expected(&want),
            &format!("{from} -> {to} [reversed]"),
        );
    }

    fn check_all(cases: &[(&str, &str, &str)]) {
        for (from, to, expected) in cases {
            check(from, to, expected);
        }
    }

    // -----------------------------------------------------------------------
    // Scenario corpus
    // -----------------------------------------------------------------------

    #[test]
    fn empty_vs_empty() {
        check_all(&[
            ("()", "()", ""),
            ("A()", "A()", ""),
            ("A()", "()", ""),
            ("A()", "B()", ""),
        ]);
    }

    #[test]
    fn basic_cases() {
        check_all(&[
            ("()", "()", ""),
            ("()", "(a<>)", "+a"),
            ("()", "(a<1>)", "+a"),
            ("()", "(a())", ""),
            ("()", "(a(b()))", ""),
            ("()", "(a(b<>))", "+a/b"),
            ("()", "(a(b<1>))", "+a/b"),
            ("(a<>)", "(a<>)", ""),
            ("(a<>)", "(a<1>)", "*a"),
            ("(a<>)", "(a())", "-a"),
            ("(a<>)", "(a(b()))", "-a"),
            ("(a<>)", "(a(b<>))", "-a +a/b"),
            ("(a<>)", "(a(b<1>))", "-a +a/b"),
            ("(a<>)", "(c())", "-a"),
            ("(a<>)", "(c(b()))", "-a"),
            ("(a<>)", "(c(b<>))", "-a +c/b"),
            ("(a<>)", "(c(b<1>))", "-a +c/b"),
            ("(a<>)", "(c(a()))", "-a"),
            ("(a<>)", "(c(a<>))", "-a +c/a"),
            ("(a<>)", "(c(a<1>))", "-a +c/a"),
            ("(a<1>)", "(a<1>)", ""),
            ("(a<1>)", "(a<2>)", "*a"),
            ("(a<1>)", "(b<1>)", "-a +b"),
            ("(a<1>)", "(b<2>)", "-a +b"),
            ("(a<1>)", "(a())", "-a"),
            ("(a<1>)", "(a(b()))", "-a"),
            ("(a<1>)", "(a(b<>))", "-a +a/b"),
            ("(a<1>)", "(a(b<1>))", "-a +a/b"),
            ("(a<1>)", "(a(b<2>))", "-a +a/b"),
            ("(a<1>)", "(c())", "-a"),
            ("(a<1>)", "(c(b()))", "-a"),
            ("(a<1>)", "(c(b<>))", "-a +c/b"),
            ("(a<1>)", "(c(b<1>))", "-a +c/b"),
            ("(a<1>)", "(c(b<2>))", "-a +c/b"),
            ("(a<1>)", "(c(a()))", "-a"),
            ("(a<1>)", "(c(a<>))", "-a +c/a"),
            ("(a<1>)", "(c(a<1>))", "-a +c/a"),
            ("(a<1>)", "(c(a<2>))", "-a +c/a"),
            ("(a())", "(a())", ""),
            ("(a())", "(b())", ""),
            ("(a())", "(a(b()))", ""),
            ("(a())", "(b(a()))", ""),
            ("(a())", "(a(b<>))", "+a/b"),
            ("(a())", "(a(b<1>))", "+a/b"),
            ("(a())", "(b(a<>))", "+b/a"),
            ("(a())", "(b(a<1>))", "+b/a"),
        ]);
    }

    #[test]
    fn horizontals() {
        check_all(&[
            ("()", "(a<> b<>)", "+a +b"),
            ("()", "(a<> b<1>)", "+a +b"),
            ("()", "(a<> b())", "+a"),
            ("()", "(a() b<>)", "+b"),
            ("()", "(a<1> b<>)", "+a +b"),
            ("()", "(a<1> b<1>)", "+a +b"),
            ("()", "(a<1> b<2>)", "+a +b"),
            ("()", "(a<1> b())", "+a"),
            ("()", "(a() b<1>)", "+b"),
            ("()", "(a() b())", ""),
            ("()", "(a<> b<> c<> d<>)", "+a +b +c +d"),
            ("()", "(a<> b<1> c() d<> e<2> f())", "+a +b +d +e"),
        ]);
    }

    #[test]
    fn verticals() {
        check_all(&[
            ("()", "(z<>)", "+z"),
            ("()", "(a(z<>))", "+a/z"),
            ("()", "(a(b(z<>)))", "+a/b/z"),
            ("()", "(a(b(c(z<>))))", "+a/b/c/z"),
            ("()", "(a(b(c(d(z<>)))))", "+a/b/c/d/z"),
            ("()", "(a(b(c(d(z<1>)))))", "+a/b/c/d/z"),
        ]);
    }

    #[test]
    fn single_inserts() {
        check_all(&[
            ("()", "(z<>)", "+z"),
            ("(a())", "(a(z<>))", "+a/z"),
            ("(a())", "(a(b(z<>)))", "+a/b/z"),
            ("(a(b(c())))", "(a(b(c(z<>))))", "+a/b/c/z"),
            ("(a<> b<> c<>)", "(a<> b<> c<> z<>)", "+z"),
            ("(a(b<> c<> d<>))", "(a(b<> c<> d<> z<>))", "+a/z"),
            ("(a(b(c<> d<> e<>)))", "(a(b(c<> d<> e<> z<>)))", "+a/b/z"),
            ("(a(b<>) f<>)", "(a(b<>) f<> z<>)", "+z"),
            ("(a(b<>) f<>)", "(a(b<> z<>) f<>)", "+a/z"),
        ]);
    }

    #[test]
    fn mixed_tree_against_empty_and_variants() {
        let crazy = "(f(e(l<1>) a(n(o(p())) k<1>)) d<1> h(j(i<1> c<2> m<>) b() g<>))";
        check_all(&[
            (
                crazy,
                "()",
                "-d -f/e/l -f/a/k -h/j/i -h/j/c -h/j/m -h/g",
            ),
            (crazy, crazy, ""),
            (
                crazy,
                "(d<1>)",
                "-f/e/l -f/a/k -h/j/i -h/j/c -h/j/m -h/g",
            ),
            (
                crazy,
                "(d<1> h(b() g<>))",
                "-f/e/l -f/a/k -h/j/i -h/j/c -h/j/m",
            ),
            (
                crazy,
                "(d<1> f(e(l()) a()) h(b() g<>))",
                "-f/e/l -f/a/k -h/j/i -h/j/c -h/j/m",
            ),
            (
                crazy,
                "(d<1> f(e(l<1>) a()) h(b() g<>))",
                "-f/a/k -h/j/i -h/j/c -h/j/m",
            ),
            (
                crazy,
                "(d<2> f(e(l<2>) a(s(t<1>))) h(b() g<> r<> j(i<> c<3> m<>)))",
                "+f/a/s/t +h/r -f/a/k *d *f/e/l *h/j/c *h/j/i",
            ),
            (
                crazy,
                "(f(e(l<2>) a(n(o(p<1>)) k<>)) h(j(i<1> c<2> m<>) b() g<>))",
                "*f/e/l +f/a/n/o/p *f/a/k -d",
            ),
            (
                crazy,
                "(f(e(l<1>) a(n(o(p(r<1>))) k<1>)) d<1> h(j(i<1> c<2> b() m<>) g<1>))",
                "+f/a/n/o/p/r *h/g",
            ),
        ]);
    }

    #[test]
    fn same_names_at_different_depths() {
        check_all(&[
            ("(a(a(a<>)))", "(a(a(a<1>)))", "*a/a/a"),
            ("(a(b(a<>)))", "(a(b(a<>)) b(a<>))", "+b/a"),
            ("(a(b(a<>)))", "(a(b()) b(a<>))", "-a/b/a +b/a"),
        ]);
    }

    #[test]
    fn sibling_insert_next_to_existing_subtree() {
        check_all(&[(
            "(a(b(c.go<1>) b.go<2>))",
            "(a(b(c.go<1> d.go<3>) b.go<2>))",
            "+a/b/d.go",
        )]);
    }

    #[test]
    fn byte_distinct_names_that_render_identically() {
        // One name uses a precomposed e-acute, the other the ASCII letter
        // followed by a combining acute. They render the same but are
        // different byte strings, hence different children.
        let p1 = "TestAppWithUnicod\u{e9}Path";
        let p2 = "TestAppWithUnicode\u{301}Path";
        assert_ne!(p1, p2);

        check(
            &format!("({p1}(x.go<1>))"),
            &format!("({p1}(x.go<1>) {p2}(x.go<1>))"),
            &format!("+{p2}/x.go"),
        );
        check(
            &format!("({p2}(x.go<1>))"),
            &format!("({p1}(x.go<1>) {p2}(x.go<1>))"),
            &format!("+{p1}/x.go"),
        );
    }

    // -----------------------------------------------------------------------
    // Empty-tree arguments
    // -----------------------------------------------------------------------

    #[test]
    fn absent_roots_mean_empty_trees() {
        let tree = FsNode::parse("(a<1> b(c<2>))").unwrap();

        let inserts = diff_tree(None, Some(&tree), hashes_equal).unwrap();
        assert_eq!(render(&inserts), ["+a", "+b/c"]);

        let deletes = diff_tree(Some(&tree), None, hashes_equal).unwrap();
        assert_eq!(render(&deletes), ["-a", "-b/c"]);

        let nothing = diff_tree::<FsNode, _>(None, None, hashes_equal).unwrap();
        assert!(nothing.is_empty());
    }

    // -----------------------------------------------------------------------
    // Universal properties
    // -----------------------------------------------------------------------

    #[test]
    fn self_diff_is_empty() {
        let crazy = "(f(e(l<1>) a(n(o(p())) k<1>)) d<1> h(j(i<1> c<2> m<>) b() g<>))";
        let tree = FsNode::parse(crazy).unwrap();
        let changes = diff_tree(Some(&tree), Some(&tree), hashes_equal).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn every_change_designates_a_leaf_and_paths_are_unique() {
        let from = FsNode::parse("(a(b<1> c(d<2>)) e<3> f(g()))").unwrap();
        let to = FsNode::parse("(a(b<9> x<4>) f(g(h<5>)) z<6>)").unwrap();
        let changes = diff_tree(Some(&from), Some(&to), hashes_equal).unwrap();
        assert!(!changes.is_empty());

        let mut seen = std::collections::HashSet::new();
        for change in &changes {
            for side in [&change.from, &change.to] {
                if let Some(path) = side {
                    assert!(path.is_leaf(), "non-leaf path {path} in output");
                }
            }
            let rendered = change.path().unwrap().to_string();
            assert!(seen.insert(rendered.clone()), "path {rendered} emitted twice");
        }
    }

    #[test]
    fn relaxed_predicate_suppresses_differences() {
        // A predicate that calls everything at the same path equal turns
        // any same-shape diff into silence.
        let from = FsNode::parse("(a<1> b(c<2>))").unwrap();
        let to = FsNode::parse("(a<9> b(c<8>))").unwrap();
        let changes = diff_tree(Some(&from), Some(&to), |_: &FsNode, _: &FsNode| true).unwrap();
        assert!(changes.is_empty());
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    #[test]
    fn pre_tripped_token_cancels_before_any_output() {
        let from = FsNode::parse("()").unwrap();
        let to = FsNode::parse("(a<> b<1> c() d<> e<2> f())").unwrap();

        let token = CancelToken::new();
        token.cancel();
        let err = diff_tree_with_cancel(Some(&from), Some(&to), hashes_equal, &token)
            .unwrap_err();
        assert!(matches!(err, DiffError::Cancelled));
        assert!(err.to_string().contains("operation canceled"));
    }

    #[test]
    fn token_clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    // -----------------------------------------------------------------------
    // Node access failures
    // -----------------------------------------------------------------------

    /// A node whose children cannot be materialised, standing in for a
    /// failing backing store.
    #[derive(Clone, Debug)]
    struct BrokenNode {
        name: String,
        leaf: bool,
    }

    impl Node for BrokenNode {
        fn name(&self) -> &str {
            &self.name
        }

        fn hash(&self) -> ObjectId {
            ObjectId::digest(self.name.as_bytes())
        }

        fn is_leaf(&self) -> bool {
            self.leaf
        }

        fn children(&self) -> NodeResult<Vec<Self>> {
            if self.leaf {
                return Ok(Vec::new());
            }
            if self.name.is_empty() {
                // The root materialises fine; only the subtree fails.
                return Ok(vec![BrokenNode {
                    name: "unreadable".to_string(),
                    leaf: false,
                }]);
            }
            Err(NodeError::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "backend offline",
            )))
        }
    }

    #[test]
    fn backing_store_failure_halts_the_diff() {
        let root = BrokenNode {
            name: String::new(),
            leaf: false,
        };
        let err = diff_tree(Some(&root), None, |a: &BrokenNode, b: &BrokenNode| {
            a.hash() == b.hash()
        })
        .unwrap_err();
        assert!(matches!(err, DiffError::NodeAccess(_)));
        assert!(err.to_string().contains("node access failed"));
        assert!(err.to_string().contains("backend offline"));
    }
}
