//! End-to-end enumerator behavior on small hand-checked cohorts.

use oncomotif::{
    catalog::{AlterationCatalog, ColorId},
    enumerate::{enumerate_exact, enumerate_mismatch, ColorRule},
    error::MotifError,
    loader::{parse_alterations_str, parse_network_str},
    network::Network,
    subnetwork::{ColoredNode, ColoredNodeSet},
};

fn build(network: &str, alterations: &str) -> (Network, AlterationCatalog) {
    let network = parse_network_str(network);
    let catalog = AlterationCatalog::build(&parse_alterations_str(alterations), &network)
        .expect("catalog builds");
    (network, catalog)
}

fn colored_set(
    network: &Network,
    catalog: &AlterationCatalog,
    nodes: &[(&str, &str)],
) -> ColoredNodeSet {
    nodes
        .iter()
        .map(|(gene, alteration)| {
            let node = network.node_index(gene).expect("gene in network");
            let color = catalog.alterations.get(alteration).expect("known type") as ColorId + 1;
            ColoredNode::new(node, color)
        })
        .collect()
}

const TRIANGLE: &str = "A B\nB C\nA C\n";

// Each sample supports exactly one edge of the triangle.
const PAIRWISE: &str = "\
s1 A MUT
s1 B MUT
s2 B MUT
s2 C MUT
s3 A MUT
s3 C MUT
";

#[test]
fn triangle_seeds_but_cannot_grow() {
    let (network, catalog) = build(TRIANGLE, PAIRWISE);
    let levels = enumerate_exact(&catalog, &network, 1, &ColorRule::Any);

    // No sample has all three genes mutated, so growth stops at level 0.
    assert_eq!(levels.len(), 1);
    let seeds = &levels[0];
    assert_eq!(seeds.len(), 3);
    for (set, mask) in seeds.iter() {
        assert_eq!(set.len(), 2);
        assert_eq!(mask.len(), 1);
    }
    let expected = colored_set(&network, &catalog, &[("A", "MUT"), ("B", "MUT")]);
    assert!(seeds.iter().any(|(set, _)| *set == expected));
}

#[test]
fn shared_sample_grows_the_triangle_once() {
    // s4 carries all three genes, so the 3-node set becomes supported; the
    // three join paths deriving it must collapse to one entry.
    let alterations = format!("{PAIRWISE}s4 A MUT\ns4 B MUT\ns4 C MUT\n");
    let (network, catalog) = build(TRIANGLE, &alterations);
    let levels = enumerate_exact(&catalog, &network, 1, &ColorRule::Any);

    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].len(), 3);
    let terminal = &levels[1];
    assert_eq!(terminal.len(), 1);
    let (set, mask) = terminal.iter().next().unwrap();
    let expected = colored_set(
        &network,
        &catalog,
        &[("A", "MUT"), ("B", "MUT"), ("C", "MUT")],
    );
    assert_eq!(*set, expected);
    // Only s4 (sample index 3) supports the full triangle.
    assert_eq!(mask.iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn threshold_above_cohort_size_terminates_immediately() {
    let (network, catalog) = build(TRIANGLE, PAIRWISE);
    let levels = enumerate_exact(&catalog, &network, 4, &ColorRule::Any);
    assert_eq!(levels.len(), 1);
    assert!(levels[0].is_empty());
}

#[test]
fn colorful_rule_rejects_monochromatic_growth() {
    let alterations = format!("{PAIRWISE}s4 A MUT\ns4 B MUT\ns4 C MUT\n");
    let (network, catalog) = build(TRIANGLE, &alterations);
    let levels = enumerate_exact(&catalog, &network, 1, &ColorRule::Colorful);

    // Seeds are exempt from the colorfulness requirement, but the all-MUT
    // 3-node candidate is monochromatic and must be rejected regardless of
    // its support.
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].len(), 3);
}

#[test]
fn background_rule_accepts_single_foreground_node() {
    let (network, catalog) = build(
        "A B\nB C\n",
        "\
s1 A EXPROUT
s1 B MUT
s1 C EXPROUT
s2 A EXPROUT
s2 B MUT
s2 C EXPROUT
",
    );
    let background = catalog.alterations.get("EXPROUT").unwrap() as ColorId + 1;
    let rule = ColorRule::BackgroundExclusive { background };
    let levels = enumerate_exact(&catalog, &network, 2, &rule);

    let terminal = levels.last().unwrap();
    let expected = colored_set(
        &network,
        &catalog,
        &[("A", "EXPROUT"), ("B", "MUT"), ("C", "EXPROUT")],
    );
    assert_eq!(levels.len(), 2);
    assert!(terminal.iter().any(|(set, _)| *set == expected));
}

#[test]
fn background_rule_rejects_three_foreground_nodes() {
    // All three genes are altered with a foreground color in both samples;
    // DEL only exists to put a background color in the catalog.
    let alterations = "\
s1 A MUT
s1 B MUT
s1 C MUT
s2 A MUT
s2 B MUT
s2 C MUT
s1 A DEL
";
    let (network, catalog) = build(TRIANGLE, alterations);
    let background = catalog.alterations.get("DEL").unwrap() as ColorId + 1;
    let rule = ColorRule::BackgroundExclusive { background };
    let levels = enumerate_exact(&catalog, &network, 2, &rule);

    // The 3-node all-MUT candidate has support 2 but three foreground
    // nodes, so growth must produce nothing.
    assert_eq!(levels.len(), 1);
    assert!(!levels[0].is_empty());
}

#[test]
fn mismatch_tolerance_grows_where_exact_cannot() {
    let network_text = "A B\nB C\n";
    let alterations = "\
s1 A MUT
s1 B MUT
s1 C MUT
s2 A MUT
s2 B MUT
s3 B MUT
s3 C MUT
";
    let (network, catalog) = build(network_text, alterations);

    // Exactly one sample (s1) matches all of A, B, C; the exact enumerator
    // stops at the edge level under a threshold of 2.
    let exact = enumerate_exact(&catalog, &network, 2, &ColorRule::Any);
    assert_eq!(exact.len(), 1);

    // Allowing one mismatched node keeps all three samples in play.
    let tolerant = enumerate_mismatch(&catalog, &network, 2, 1).unwrap();
    assert_eq!(tolerant.len(), 2);
    let terminal = tolerant.last().unwrap();
    let expected = colored_set(
        &network,
        &catalog,
        &[("A", "MUT"), ("B", "MUT"), ("C", "MUT")],
    );
    let (_, profile) = terminal
        .iter()
        .find(|(set, _)| **set == expected)
        .expect("path A-B-C is reachable with one mismatch");
    assert_eq!(profile.exact().iter().collect::<Vec<_>>(), vec![0]);
    assert_eq!(profile.union().iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(profile.support(), 3);
}

#[test]
fn mismatch_bound_outside_range_is_fatal() {
    let (network, catalog) = build(TRIANGLE, PAIRWISE);
    let err = enumerate_mismatch(&catalog, &network, 1, 3).unwrap_err();
    assert!(matches!(err, MotifError::BadDelta(3)));
    assert_eq!(err.exit_code(), 5);
}
