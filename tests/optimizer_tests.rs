#[cfg(test)]
mod tests {
    use relalg::optimizer::{
        Optimizer, OptimizerConfig, ProjectionFusion, RenameFusion, RewriteError, Rule,
        SelectionBelowProjection, SelectionFusion, SelectionIntoSetOperation,
    };
    use relalg::params::ParamError;
    use relalg::*;
    use std::collections::HashMap;

    // Helper functions to build trees for testing
    fn rel(name: &str) -> Node {
        Node::relation(name)
    }

    fn schemas(entries: &[(&str, &[&str])]) -> HashMap<String, Schema> {
        entries
            .iter()
            .map(|(name, attributes)| {
                (
                    name.to_string(),
                    attributes.iter().map(|a| a.to_string()).collect(),
                )
            })
            .collect()
    }

    // ========================================================================
    // Selection fusion
    // ========================================================================

    #[test]
    fn test_equal_selections_collapse() {
        let node = Node::selection("a", Node::selection("a", Node::selection("a", rel("R"))));
        let (fused, changes) = SelectionFusion.apply(node).unwrap();
        assert_eq!(fused, Node::selection("a", rel("R")));
        assert_eq!(changes, 2);

        let (again, changes) = SelectionFusion.apply(fused.clone()).unwrap();
        assert_eq!(again, fused);
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_different_selections_merge_with_and() {
        let node = tree("σ x > 1 (σ y < 2 (R))").unwrap();
        let (fused, changes) = SelectionFusion.apply(node).unwrap();
        assert_eq!(fused, tree("σ x > 1 and y < 2 (R)").unwrap());
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_selection_with_or_is_kept_apart() {
        let node = tree("σ x > 1 or y < 2 (σ z (R))").unwrap();
        let (result, changes) = SelectionFusion.apply(node.clone()).unwrap();
        assert_eq!(result, node);
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_parenthesized_or_merges() {
        let node = tree("σ (x or y) (σ z (R))").unwrap();
        let (result, changes) = SelectionFusion.apply(node).unwrap();
        assert_eq!(result, Node::selection("(x or y) and z", rel("R")));
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_selection_fusion_below_binary() {
        let node = tree("A ∪ σ p (σ q (B))").unwrap();
        let (result, changes) = SelectionFusion.apply(node).unwrap();
        assert_eq!(result, tree("A ∪ σ p and q (B)").unwrap());
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_parenthesized_predicate_leads_merge() {
        let node = tree("σ c (σ (a or b) (R))").unwrap();
        let (result, changes) = SelectionFusion.apply(node).unwrap();
        assert_eq!(result, Node::selection("(a or b) and c", rel("R")));
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_two_parenthesized_predicates_are_kept_apart() {
        let node = tree("σ (a or b) (σ (c or d) (R))").unwrap();
        let (result, changes) = SelectionFusion.apply(node.clone()).unwrap();
        assert_eq!(result, node);
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_optimized_trees_parse_back() {
        let corpus = [
            "σ c (σ (a or b) (R))",
            "σ (a or b) (σ c (R))",
            "σ (a or b) (σ (c or d) (R))",
            "σ name == '(' (σ (a or b) (R ∪ S))",
            "σ x (σ y (π k (A - B)))",
            "ρ a➡b (ρ b➡c (R)) ⋈ S",
        ];

        for expression in corpus {
            let optimized = optimize(tree(expression).unwrap()).unwrap();
            let rendered = optimized.to_string();
            let reparsed = tree(&rendered).unwrap();
            assert_eq!(optimized, reparsed, "Failed for: {} (rendered {})", expression, rendered);
        }
    }

    // ========================================================================
    // Selection into set operations
    // ========================================================================

    #[test]
    fn test_selection_distributes_over_set_operations() {
        let test_cases = vec![
            ("σ p (X ∪ Y)", "σ p (X) ∪ σ p (Y)"),
            ("σ p (X - Y)", "σ p (X) - σ p (Y)"),
            ("σ p (X ∩ Y)", "σ p (X) ∩ σ p (Y)"),
        ];

        for (input, expected) in test_cases {
            let (result, changes) = SelectionIntoSetOperation.apply(tree(input).unwrap()).unwrap();
            assert_eq!(result, tree(expected).unwrap(), "Failed for: {}", input);
            assert_eq!(changes, 1);
        }
    }

    #[test]
    fn test_selection_stays_above_joins() {
        for input in ["σ p (X ⋈ Y)", "σ p (X * Y)", "σ p (X ÷ Y)", "σ p (X ⋉ Y)"] {
            let node = tree(input).unwrap();
            let (result, changes) = SelectionIntoSetOperation.apply(node.clone()).unwrap();
            assert_eq!(result, node, "Failed for: {}", input);
            assert_eq!(changes, 0);
        }
    }

    #[test]
    fn test_selection_pushes_through_nested_set_operations() {
        let node = tree("σ p ((X ∪ Y) - Z)").unwrap();
        let (result, changes) = SelectionIntoSetOperation.apply(node).unwrap();
        assert_eq!(result, tree("σ p (X) ∪ σ p (Y) - σ p (Z)").unwrap());
        assert_eq!(changes, 2);
    }

    #[test]
    fn test_push_through_preserves_schema() {
        let relations = schemas(&[("X", &["id", "name"]), ("Y", &["id", "name"]), ("Z", &["id", "name"])]);

        for input in ["σ p (X ∪ Y)", "σ p ((X ∪ Y) - Z)", "σ p (X ∩ Y)"] {
            let node = tree(input).unwrap();
            let before = result_format(&node, &relations).unwrap();
            let (rewritten, _) = SelectionIntoSetOperation.apply(node).unwrap();
            let after = result_format(&rewritten, &relations).unwrap();
            assert_eq!(before, after, "Failed for: {}", input);
        }
    }

    // ========================================================================
    // Projection fusion and selection below projection
    // ========================================================================

    #[test]
    fn test_projection_fusion_keeps_outermost() {
        let node = tree("π a (π a, b (π a, b, c (R)))").unwrap();
        let (result, changes) = ProjectionFusion.apply(node).unwrap();
        assert_eq!(result, Node::projection("a", rel("R")));
        assert_eq!(changes, 2);
    }

    #[test]
    fn test_selection_moves_below_projection() {
        let node = tree("σ a > 1 (π a, b (R))").unwrap();
        let (result, changes) = SelectionBelowProjection.apply(node).unwrap();
        assert_eq!(result, tree("π a, b (σ a > 1 (R))").unwrap());
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_selection_below_projection_preserves_schema() {
        let relations = schemas(&[("R", &["a", "b", "c"])]);
        let node = tree("σ a > 1 (π a, b (R))").unwrap();
        let before = result_format(&node, &relations).unwrap();
        let (rewritten, _) = SelectionBelowProjection.apply(node).unwrap();
        assert_eq!(result_format(&rewritten, &relations).unwrap(), before);
    }

    // ========================================================================
    // Rename fusion
    // ========================================================================

    #[test]
    fn test_rename_composition() {
        let node = tree("ρ b➡c (ρ a➡b (R))").unwrap();
        let (result, changes) = RenameFusion.apply(node).unwrap();
        assert_eq!(result, tree("ρ a➡c (R)").unwrap());
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_rename_composition_schema() {
        let relations = schemas(&[("R", &["a", "x"])]);
        let node = tree("ρ b➡c (ρ a➡b (R))").unwrap();
        assert_eq!(result_format(&node, &relations).unwrap(), vec!["c", "x"]);

        let (fused, _) = RenameFusion.apply(node).unwrap();
        assert_eq!(result_format(&fused, &relations).unwrap(), vec!["c", "x"]);
    }

    #[test]
    fn test_rename_chain_resolves() {
        let node = tree("ρ c➡d (ρ b➡c (ρ a➡b (R)))").unwrap();
        let (result, changes) = RenameFusion.apply(node).unwrap();
        assert_eq!(result, tree("ρ a➡d (R)").unwrap());
        assert_eq!(changes, 2);
    }

    #[test]
    fn test_inverse_renames_cancel() {
        let node = tree("ρ b➡a (ρ a➡b (R))").unwrap();
        let (result, changes) = RenameFusion.apply(node).unwrap();
        assert_eq!(result, rel("R"));
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_unrelated_renames_merge() {
        let node = tree("ρ x➡y (ρ a➡b (R))").unwrap();
        let (result, _) = RenameFusion.apply(node).unwrap();
        assert_eq!(result, Node::rename("a➡b,x➡y", rel("R")));

        let relations = schemas(&[("R", &["a", "x", "z"])]);
        assert_eq!(result_format(&result, &relations).unwrap(), vec!["b", "y", "z"]);
    }

    #[test]
    fn test_inner_rename_applies_first() {
        let node = tree("ρ a➡b (ρ b➡c (R))").unwrap();
        let relations = schemas(&[("R", &["a", "b", "x"])]);
        assert_eq!(result_format(&node, &relations).unwrap(), vec!["b", "c", "x"]);

        let (result, changes) = RenameFusion.apply(node).unwrap();
        assert_eq!(result, Node::rename("b➡c,a➡b", rel("R")));
        assert_eq!(changes, 1);
        assert_eq!(result_format(&result, &relations).unwrap(), vec!["b", "c", "x"]);
    }

    #[test]
    fn test_malformed_rename_fails() {
        let node = tree("ρ a (ρ b➡c (R))").unwrap();
        let err = RenameFusion.apply(node).unwrap_err();
        assert_eq!(
            err,
            RewriteError::Param(ParamError::MalformedRename("a".to_string()))
        );
    }

    // ========================================================================
    // Fixpoint driver
    // ========================================================================

    #[test]
    fn test_optimize_to_fixpoint() {
        let node = tree("σ p (σ p (π a (π a, b (R ∪ S))))").unwrap();
        let optimized = Optimizer::new().optimize(node).unwrap();
        assert_eq!(optimized.node.to_string(), "π a (σ p (R) ∪ σ p (S))");
        assert_eq!(optimized.rounds, 3);
        assert_eq!(optimized.rewrites, 4);
    }

    #[test]
    fn test_optimize_fuses_then_pushes() {
        let node = tree("σ x (σ y (π k (A - B)))").unwrap();
        let optimized = Optimizer::new().optimize(node).unwrap();
        assert_eq!(
            optimized.node.to_string(),
            "π k (σ x and y (A) - σ x and y (B))"
        );
    }

    #[test]
    fn test_rounds_are_bounded() {
        let corpus = [
            "R",
            "π name (σ age > 30 (people ⋈ skills))",
            "σ p (σ p (π a (π a, b (R ∪ S))))",
            "σ x (σ y (π k (A - B)))",
            "ρ c➡d (ρ b➡c (ρ a➡b (R)))",
            "σ a (σ b (σ c (X ∩ Y - Z)))",
            "π a (σ p (π a, b (σ q (R))))",
        ];

        for expression in corpus {
            let optimized = Optimizer::new().optimize(tree(expression).unwrap()).unwrap();
            assert!(
                optimized.rounds <= 4,
                "{} took {} rounds",
                expression,
                optimized.rounds
            );
        }
    }

    #[test]
    fn test_rounds_do_not_grow_with_operand_count() {
        for n in [2, 8, 32] {
            let union = (1..n)
                .map(|i| format!("R{}", i))
                .fold(rel("R0"), |acc, name| {
                    Node::binary(BinaryOp::Union, acc, rel(&name))
                });
            let optimized = Optimizer::new()
                .optimize(Node::selection("p", union))
                .unwrap();
            assert_eq!(optimized.rounds, 2, "Failed for {} operands", n);
            assert_eq!(optimized.rewrites, n - 1);
        }
    }

    #[test]
    fn test_already_optimal_tree_takes_one_round() {
        let node = tree("π a (σ p (R)) ⋈ S").unwrap();
        let optimized = Optimizer::new().optimize(node.clone()).unwrap();
        assert_eq!(optimized.node, node);
        assert_eq!(optimized.rounds, 1);
        assert_eq!(optimized.rewrites, 0);
    }

    #[test]
    fn test_round_limit() {
        let node = tree("σ p (σ p (R))").unwrap();

        let err = Optimizer::with_config(OptimizerConfig { max_rounds: 1 })
            .optimize(node.clone())
            .unwrap_err();
        assert_eq!(err, RewriteError::RoundLimitExceeded { rounds: 1 });

        let optimized = Optimizer::with_config(OptimizerConfig { max_rounds: 2 })
            .optimize(node)
            .unwrap();
        assert_eq!(optimized.rounds, 2);
    }

    #[test]
    fn test_custom_rule_set() {
        let optimizer = Optimizer::with_rules(vec![Box::new(ProjectionFusion)], OptimizerConfig::default());
        assert_eq!(optimizer.rule_names(), vec!["projection_fusion"]);

        // Selection rules are not part of this optimizer
        let node = tree("σ p (σ p (π a (π b (R))))").unwrap();
        let optimized = optimizer.optimize(node).unwrap();
        assert_eq!(optimized.node, tree("σ p (σ p (π a (R)))").unwrap());
    }

    #[test]
    fn test_default_rule_order() {
        assert_eq!(
            Optimizer::new().rule_names(),
            vec![
                "selection_fusion",
                "selection_into_set_operation",
                "projection_fusion",
                "selection_below_projection",
                "rename_fusion",
            ]
        );
    }

    #[test]
    fn test_optimize_shortcut() {
        let node = tree("ρ b➡c (ρ a➡b (R))").unwrap();
        assert_eq!(optimize(node).unwrap(), tree("ρ a➡c (R)").unwrap());
    }
}
