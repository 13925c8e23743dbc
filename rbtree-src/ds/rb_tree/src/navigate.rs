use super::{Link, NIL};

pub(crate) fn minimum(links: &[Link], mut x: usize) -> usize {
    while links[x].left() != NIL {
        x = links[x].left();
    }
    x
}

pub(crate) fn maximum(links: &[Link], mut x: usize) -> usize {
    while links[x].right() != NIL {
        x = links[x].right();
    }
    x
}

/// The next node in order, or `NIL` if `x` is the rightmost one.
pub(crate) fn successor(links: &[Link], mut x: usize) -> usize {
    debug_assert_ne!(x, NIL);
    if links[x].right() != NIL {
        return minimum(links, links[x].right());
    }
    let mut p = links[x].parent;
    while p != NIL && links[p].right() == x {
        x = p;
        p = links[p].parent;
    }
    p
}

/// The previous node in order, or `NIL` if `x` is the leftmost one.
pub(crate) fn predecessor(links: &[Link], mut x: usize) -> usize {
    debug_assert_ne!(x, NIL);
    if links[x].left() != NIL {
        return maximum(links, links[x].left());
    }
    let mut p = links[x].parent;
    while p != NIL && links[p].left() == x {
        x = p;
        p = links[p].parent;
    }
    p
}
