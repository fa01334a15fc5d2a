//! Decision tree / forest regressor stored as JSON.
//!
//! Document layout:
//!
//! ```json
//! {
//!   "name": "aqi_forest",
//!   "n_features": 9,
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 7, "threshold": 30.0, "left": 1, "right": 2 },
//!         { "value": 42.0 },
//!         { "value": 118.5 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A single tree may be given directly as a top-level `nodes` array.
//! Nodes are stored in pre-order: every child index is greater than its
//! parent's, which rules out cycles. A split sends the row left when
//! `x[feature] <= threshold`. A forest predicts the mean of its trees.

use crate::models::AqiModel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk the tree for one feature row.
    fn evaluate(&self, features: &[f32]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if f64::from(features[*feature]) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            anyhow::bail!("tree has no nodes");
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        anyhow::bail!("leaf {} has a non-finite value", index);
                    }
                }
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        anyhow::bail!(
                            "node {} splits on feature {} but the model has {} features",
                            index,
                            feature,
                            n_features
                        );
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            anyhow::bail!("node {} has invalid child index {}", index, child);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// On-disk document, either a forest or a single tree
#[derive(Debug, Deserialize)]
struct TreeDocument {
    #[serde(default)]
    name: Option<String>,
    n_features: usize,
    #[serde(default)]
    trees: Vec<DecisionTree>,
    #[serde(default)]
    nodes: Vec<TreeNode>,
}

/// Tree-ensemble regressor evaluated in-process
#[derive(Debug, Clone)]
pub struct TreeRegressor {
    name: String,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl TreeRegressor {
    /// Build a regressor from validated trees
    pub fn new(name: impl Into<String>, n_features: usize, trees: Vec<DecisionTree>) -> Result<Self> {
        if trees.is_empty() {
            anyhow::bail!("model contains no trees");
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(n_features)
                .with_context(|| format!("invalid tree {}", i))?;
        }

        Ok(Self {
            name: name.into(),
            n_features,
            trees,
        })
    }

    /// Parse a JSON model document
    pub fn from_json(json: &str, default_name: &str) -> Result<Self> {
        let doc: TreeDocument =
            serde_json::from_str(json).context("Failed to parse tree model JSON")?;

        let mut trees = doc.trees;
        if !doc.nodes.is_empty() {
            trees.push(DecisionTree { nodes: doc.nodes });
        }

        let name = doc.name.unwrap_or_else(|| default_name.to_string());
        Self::new(name, doc.n_features, trees)
    }

    /// Load a JSON model file
    pub fn from_file<P: AsRef<Path>>(path: P, name: &str) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .context(format!("Failed to read model from {:?}", path))?;
        let model = Self::from_json(&json, name)?;

        info!(
            model = %model.name,
            trees = model.trees.len(),
            n_features = model.n_features,
            "Tree model loaded successfully"
        );

        Ok(model)
    }

    /// Number of trees in the ensemble
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl AqiModel for TreeRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&mut self, features: &[f32]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            anyhow::bail!(
                "X has {} features, but {} is expecting {} features as input",
                features.len(),
                self.name,
                self.n_features
            );
        }

        let sum: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        Ok(vec![sum / self.trees.len() as f64])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUMP: &str = r#"{
        "n_features": 9,
        "nodes": [
            { "feature": 7, "threshold": 30.0, "left": 1, "right": 2 },
            { "value": 42.0 },
            { "value": 118.5 }
        ]
    }"#;

    fn row(pm25: f32) -> Vec<f32> {
        vec![1.0, 20.0, 5.0, 10.0, 15.0, 2.0, 3.0, pm25, 60.0]
    }

    #[test]
    fn test_single_tree() {
        let mut model = TreeRegressor::from_json(STUMP, "stump").unwrap();
        assert_eq!(model.name(), "stump");
        assert_eq!(model.tree_count(), 1);
        assert_eq!(model.feature_count(), Some(9));

        // Threshold is inclusive on the left branch
        assert_eq!(model.predict(&row(30.0)).unwrap(), vec![42.0]);
        assert_eq!(model.predict(&row(30.5)).unwrap(), vec![118.5]);
    }

    #[test]
    fn test_forest_averages_trees() {
        let json = r#"{
            "name": "forest",
            "n_features": 9,
            "trees": [
                { "nodes": [ { "value": 40.0 } ] },
                { "nodes": [
                    { "feature": 0, "threshold": 2.0, "left": 1, "right": 2 },
                    { "value": 60.0 },
                    { "value": 200.0 }
                ] }
            ]
        }"#;
        let mut model = TreeRegressor::from_json(json, "ignored").unwrap();
        assert_eq!(model.name(), "forest");
        assert_eq!(model.tree_count(), 2);

        let prediction = model.predict(&row(10.0)).unwrap();
        assert!((prediction[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let mut model = TreeRegressor::from_json(STUMP, "stump").unwrap();
        let err = model.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.to_string().contains("expecting 9 features"));
    }

    #[test]
    fn test_rejects_invalid_structure() {
        let cycle = r#"{ "n_features": 9, "nodes": [
            { "feature": 0, "threshold": 1.0, "left": 0, "right": 1 },
            { "value": 1.0 }
        ] }"#;
        assert!(TreeRegressor::from_json(cycle, "m").is_err());

        let dangling = r#"{ "n_features": 9, "nodes": [
            { "feature": 0, "threshold": 1.0, "left": 1, "right": 5 },
            { "value": 1.0 }
        ] }"#;
        assert!(TreeRegressor::from_json(dangling, "m").is_err());

        let bad_feature = r#"{ "n_features": 9, "nodes": [
            { "feature": 9, "threshold": 1.0, "left": 1, "right": 2 },
            { "value": 1.0 },
            { "value": 2.0 }
        ] }"#;
        let err = TreeRegressor::from_json(bad_feature, "m").unwrap_err();
        assert!(format!("{:#}", err).contains("feature 9"));

        let empty = r#"{ "n_features": 9 }"#;
        assert!(TreeRegressor::from_json(empty, "m").is_err());

        assert!(TreeRegressor::from_json("not json", "m").is_err());
    }
}
