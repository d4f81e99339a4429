use tree_filter::{
    apply_filter, apply_text_filter, clear_filter, FilterFlags, FilterMode, FilterOptions, Node,
    NodeBuilder, NodeId, PresentationState, Tree,
};

// A -> [B -> [D, E], C]
fn scenario_tree() -> Tree<char> {
    Tree::new(NodeBuilder::folder(
        "root",
        'A',
        vec![
            NodeBuilder::folder(
                "b-node",
                'B',
                vec![
                    NodeBuilder::leaf("target", 'D'),
                    NodeBuilder::leaf("other", 'E'),
                ],
            ),
            NodeBuilder::leaf("c-node", 'C'),
        ],
    ))
}

/// Deterministic pseudo-random tree with titles drawn from a small alphabet.
fn generated_tree(seed: u64, nodes: usize) -> Tree<usize> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    let mut tree = Tree::new(NodeBuilder::folder("n0", 0, Vec::new()));
    let mut folders = vec![tree.root()];
    for i in 1..nodes {
        let parent = folders[next() % folders.len()];
        let title = format!("{}{}", ["alpha", "beta", "gamma", "delta"][next() % 4], i);
        if next() % 3 == 0 {
            tree.add_child(parent, NodeBuilder::leaf(title, i)).unwrap();
        } else {
            let id = tree
                .add_child(parent, NodeBuilder::folder(title, i, Vec::new()))
                .unwrap();
            folders.push(id);
        }
    }
    tree
}

fn collect<T: Copy>(tree: &Tree<T>, pick: impl Fn(&FilterFlags) -> bool) -> Vec<T> {
    tree.pre_order()
        .map(|id| tree.node(id))
        .filter(|node| pick(node.flags()))
        .map(|node| *node.data())
        .collect()
}

fn flags_of<T>(tree: &Tree<T>) -> Vec<FilterFlags> {
    tree.pre_order().map(|id| *tree.node(id).flags()).collect()
}

fn all_options() -> Vec<FilterOptions> {
    let mut out = Vec::new();
    for mode in [FilterMode::Dim, FilterMode::Hide] {
        for leaves_only in [false, true] {
            for keep_children in [false, true] {
                out.push(FilterOptions {
                    mode,
                    leaves_only,
                    keep_children,
                });
            }
        }
    }
    out
}

fn contains_a(node: &Node<usize>) -> bool {
    node.title().starts_with("alpha") || node.title().starts_with("gamma")
}

#[test]
fn substring_match_shows_match_and_ancestors() {
    let mut tree = scenario_tree();
    let count = apply_text_filter(&mut tree, "target", FilterOptions::default()).unwrap();

    assert_eq!(count, 1);
    assert_eq!(collect(&tree, |f| f.matched), vec!['D']);
    assert_eq!(collect(&tree, |f| f.sub_match), vec!['A', 'B']);
    assert_eq!(collect(&tree, FilterFlags::is_visible), vec!['A', 'B', 'D']);
    assert_eq!(collect(&tree, |f| f.hide), vec!['E', 'C']);
}

#[test]
fn keep_children_scenario() {
    let mut tree = scenario_tree();
    let options = FilterOptions {
        keep_children: true,
        ..FilterOptions::default()
    };
    let count = apply_text_filter(&mut tree, "b-node", options).unwrap();

    assert_eq!(count, 1);
    assert_eq!(collect(&tree, |f| f.matched), vec!['B']);
    assert_eq!(collect(&tree, |f| f.sub_match), vec!['A']);
    assert_eq!(collect(&tree, |f| f.child_sub_match), vec!['D', 'E']);
    assert_eq!(collect(&tree, FilterFlags::is_visible), vec!['A', 'B', 'D', 'E']);
    assert_eq!(collect(&tree, |f| f.hide), vec!['C']);
}

#[test]
fn leaves_only_scenario() {
    let mut tree = scenario_tree();
    let options = FilterOptions {
        leaves_only: true,
        ..FilterOptions::default()
    };
    let count = apply_text_filter(&mut tree, "root", options).unwrap();

    assert_eq!(count, 0);
    assert!(collect(&tree, FilterFlags::is_visible).is_empty());
}

#[test]
fn hide_mode_removes_only_hidden_nodes() {
    let mut tree = scenario_tree();
    let options = FilterOptions {
        mode: FilterMode::Hide,
        ..FilterOptions::default()
    };
    apply_text_filter(&mut tree, "target", options).unwrap();

    let states: Vec<PresentationState> = tree
        .pre_order()
        .map(|id| tree.presentation(id).state())
        .collect();
    assert_eq!(
        states,
        vec![
            PresentationState::AncestorOfMatch,
            PresentationState::AncestorOfMatch,
            PresentationState::Matched,
            PresentationState::Hidden,
            PresentationState::Hidden,
        ]
    );
}

#[test]
fn applying_twice_is_idempotent() {
    for options in all_options() {
        let mut tree = generated_tree(7, 300);
        let first = apply_filter(&mut tree, &contains_a, options);
        let flags = flags_of(&tree);
        let second = apply_filter(&mut tree, &contains_a, options);

        assert_eq!(first, second);
        assert_eq!(flags, flags_of(&tree), "{options:?}");
    }
}

#[test]
fn clear_resets_every_flag() {
    for options in all_options() {
        let mut tree = generated_tree(11, 200);
        apply_filter(&mut tree, &contains_a, options);
        clear_filter(&mut tree);

        assert!(!tree.filter_state().is_active());
        assert!(flags_of(&tree).iter().all(|f| *f == FilterFlags::default()));
        assert!(tree
            .pre_order()
            .all(|id| tree.presentation(id).state() == PresentationState::Normal));
    }
}

#[test]
fn every_ancestor_of_a_match_is_visible() {
    for options in all_options() {
        let mut tree = generated_tree(23, 400);
        apply_filter(&mut tree, &contains_a, options);

        for node in tree.nodes().filter(|node| node.flags().matched) {
            for ancestor in tree.ancestors(node.id()) {
                let flags = ancestor.flags();
                assert!(flags.is_visible());
                assert!(flags.sub_match || flags.child_sub_match);
            }
        }
    }
}

/// A visible node is a match, an ancestor of one, or (with keep_children)
/// on the path from a match down to a non-matching leaf.
#[test]
fn visible_nodes_are_justified() {
    for options in all_options() {
        let mut tree = generated_tree(5, 400);
        apply_filter(&mut tree, &contains_a, options);

        let is_match = |id: NodeId| tree.node(id).flags().matched;
        let has_matching_descendant = |id: NodeId| {
            tree.nodes()
                .any(|node| node.flags().matched && tree.ancestors(node.id()).any(|a| a.id() == id))
        };
        let has_matching_ancestor = |id: NodeId| tree.ancestors(id).any(|a| a.flags().matched);

        for id in tree.pre_order() {
            if !tree.node(id).flags().is_visible() {
                continue;
            }
            let justified = is_match(id)
                || has_matching_descendant(id)
                || (options.keep_children && has_matching_ancestor(id));
            assert!(justified, "{:?} visible without reason ({options:?})", tree.path(id));
        }
    }
}

#[test]
fn leaves_only_never_matches_folders() {
    let options = FilterOptions {
        leaves_only: true,
        ..FilterOptions::default()
    };
    let mut tree = generated_tree(3, 300);
    apply_filter(&mut tree, &|_: &Node<usize>| true, options);

    for node in tree.nodes() {
        assert_eq!(node.flags().matched, node.is_leaf());
    }
}

#[test]
fn count_matches_gated_predicate_hits() {
    for options in all_options() {
        let mut tree = generated_tree(17, 300);
        let expected = tree
            .nodes()
            .filter(|node| (!options.leaves_only || node.is_leaf()) && contains_a(node))
            .count();

        assert_eq!(apply_filter(&mut tree, &contains_a, options), expected);
    }
}

/// Reference propagation that re-walks every ancestor for every match.
fn unmemoized<T>(tree: &Tree<T>, predicate: impl Fn(&Node<T>) -> bool, options: FilterOptions) -> Vec<FilterFlags> {
    let mut flags = vec![
        FilterFlags {
            hide: true,
            ..FilterFlags::default()
        };
        tree.node_count()
    ];

    for id in tree.pre_order() {
        let node = tree.node(id);
        if (!options.leaves_only || node.is_leaf()) && predicate(node) {
            flags[id.index()].hide = false;
            flags[id.index()].matched = true;
            for ancestor in tree.ancestors(id) {
                flags[ancestor.id().index()].hide = false;
                flags[ancestor.id().index()].sub_match = true;
            }
        } else if options.keep_children && node.is_leaf() {
            if tree.ancestors(id).any(|a| flags[a.id().index()].matched) {
                for step in std::iter::once(node).chain(tree.ancestors(id)) {
                    let f = &mut flags[step.id().index()];
                    if f.matched {
                        break;
                    }
                    f.hide = false;
                    f.child_sub_match = true;
                }
            }
        }
    }

    tree.pre_order().map(|id| flags[id.index()]).collect()
}

#[test]
fn memoized_propagation_matches_full_walk() {
    for seed in [1, 2, 3, 42] {
        for options in all_options() {
            let mut tree = generated_tree(seed, 250);
            let expected = unmemoized(&tree, contains_a, options);
            apply_filter(&mut tree, &contains_a, options);
            assert_eq!(flags_of(&tree), expected, "seed {seed} {options:?}");
        }
    }
}
