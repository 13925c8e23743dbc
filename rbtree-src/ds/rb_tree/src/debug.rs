use std::fmt::Debug;

use compare::Compare;

use super::{
    navigate::{maximum, minimum},
    Color, RbTree, Side, NIL,
};

impl<K: Debug, V: Debug, C> RbTree<K, V, C> {
    /// Dumps the tree shape to stderr, right subtrees on top.
    pub fn visualize(&self) {
        fn dfs<K: Debug, V: Debug, C>(
            tree: &RbTree<K, V, C>,
            x: usize,
            prefix: &mut String,
            side: Option<Side>,
        ) {
            if x == NIL {
                return;
            }
            let len = prefix.len();
            prefix.push_str(match side {
                Some(Side::Left) => "│   ",
                _ => "    ",
            });
            dfs(tree, tree.links[x].right(), prefix, Some(Side::Right));
            prefix.truncate(len);

            let branch = match side {
                None => "",
                Some(Side::Right) => "┌── ",
                Some(Side::Left) => "└── ",
            };
            let color = match tree.links[x].color {
                Color::Red => 'R',
                Color::Black => 'B',
            };
            if let Some((k, v)) = &tree.elems[x] {
                eprintln!("{prefix}{branch}{k:?}: {v:?} ({color})");
            }

            prefix.push_str(match side {
                Some(Side::Right) => "│   ",
                _ => "    ",
            });
            dfs(tree, tree.links[x].left(), prefix, Some(Side::Left));
            prefix.truncate(len);
        }

        dfs(self, self.root, &mut String::new(), None);
    }
}

impl<K, V, C: Compare<K>> RbTree<K, V, C> {
    pub fn assert_invariants(&self) {
        let links = &self.links;
        assert_eq!(links.len(), self.elems.len());
        assert_eq!(links[NIL].color, Color::Black, "sentinel must be black");
        assert!(self.elems[NIL].is_none(), "sentinel must be empty");

        if self.root == NIL {
            assert_eq!(self.len, 0);
            assert_eq!(self.leftmost, NIL);
            assert_eq!(self.rightmost, NIL);
        } else {
            assert_eq!(links[self.root].color, Color::Black, "root must be black");
            assert_eq!(links[self.root].parent, NIL);
            assert_eq!(self.leftmost, minimum(links, self.root));
            assert_eq!(self.rightmost, maximum(links, self.root));
        }

        // returns (number of nodes, black height)
        fn dfs<K, V, C>(tree: &RbTree<K, V, C>, x: usize) -> (usize, usize) {
            if x == NIL {
                return (0, 1);
            }
            let link = &tree.links[x];
            assert!(tree.elems[x].is_some(), "slot {x} in the tree holds nothing");
            for c in link.children {
                if c == NIL {
                    continue;
                }
                assert_eq!(tree.links[c].parent, x, "broken parent link");
                if link.color == Color::Red {
                    assert_eq!(tree.links[c].color, Color::Black, "red-red at {x}");
                }
            }
            let (ln, lh) = dfs(tree, link.left());
            let (rn, rh) = dfs(tree, link.right());
            assert_eq!(lh, rh, "unequal black heights below {x}");
            let h = lh + (link.color == Color::Black) as usize;
            (ln + rn + 1, h)
        }
        let (count, _) = dfs(self, self.root);
        assert_eq!(count, self.len);

        let keys: Vec<_> = self.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), self.len);
        for w in keys.windows(2) {
            if self.unique {
                assert!(self.cmp.lt(w[0], w[1]), "keys out of order");
            } else {
                assert!(!self.cmp.lt(w[1], w[0]), "keys out of order");
            }
        }

        assert_eq!(self.free.len() + self.len + 1, links.len());
        for &x in &self.free {
            assert_ne!(x, NIL);
            assert!(self.elems[x].is_none(), "free slot {x} holds an element");
        }
    }
}
